use stax_mint_report::{config, indexer, registry::VestingRegistry, rpc::RpcClient};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // logs go to stderr, stdout only carries the final confirmation
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    info!("STAX mint report starting...");

    let cfg = config::load()?;
    let registry = VestingRegistry::builtin();
    info!("  RPC URL: {}", cfg.rpc_http_url);
    info!("  Contract: {}", cfg.contract_address);
    info!("  Vesting groups known: {}", registry.len());

    let chain = RpcClient::new(&cfg.rpc_http_url)?;
    indexer::run(&chain, &cfg, &registry).await?;

    println!("CSV file created: {}", cfg.output_path.display());
    Ok(())
}
