// src/registry.rs
use alloy::primitives::{address, Address};
use std::collections::HashMap;

/// Display value for a vesting group that is not in the table
pub const UNKNOWN_GROUP: &str = "N/A";

/// Vesting group credited by `mint` and `mintForShib`. Placeholder address:
/// replace with the deployed private round contract. Runs warn when a mint
/// lands elsewhere.
pub const PRIVATE_ROUND: Address = address!("7d3a0cf5c1f84ad2c2de37a1c76d8f1b5bc2a2e1");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VestingGroupInfo {
    pub address: Address,
    pub title: &'static str,
    pub subtitle: &'static str,
}

/// Vesting groups of the $STAX sale. The addresses are placeholders and must
/// be replaced with the deployed vesting contracts; until then real groups
/// resolve to `N/A`.
const VESTING_GROUPS: &[VestingGroupInfo] = &[
    VestingGroupInfo {
        address: PRIVATE_ROUND,
        title: "Private Round",
        subtitle: "10% at TGE, then linear monthly over 12 months",
    },
    VestingGroupInfo {
        address: address!("4b2e9d8f0a6c13e5b7f9a2d4c6e8b0a1f3d5c7e9"),
        title: "Seed Round",
        subtitle: "3 month cliff, then linear monthly over 18 months",
    },
    VestingGroupInfo {
        address: address!("a19c3e5f7b2d4f6a8c0e1b3d5f7a9c2e4b6d8f0a"),
        title: "Team",
        subtitle: "12 month cliff, then linear monthly over 24 months",
    },
    VestingGroupInfo {
        address: address!("c8e0a2b4d6f81a3c5e7b9d0f2a4c6e8b1d3f5a7c"),
        title: "Advisors",
        subtitle: "6 month cliff, then linear monthly over 12 months",
    },
    VestingGroupInfo {
        address: address!("2f4a6c8e0b1d3f5a7c9e2b4d6f8a0c1e3b5d7f9a"),
        title: "Marketing",
        subtitle: "5% at TGE, then linear monthly over 24 months",
    },
    VestingGroupInfo {
        address: address!("e6b8d0f2a4c61e3b5d7f9a0c2e4b6d8f1a3c5e7b"),
        title: "Liquidity",
        subtitle: "100% at TGE",
    },
];

/// Read-only address → vesting group lookup, built once at startup
#[derive(Debug, Clone)]
pub struct VestingRegistry {
    groups: HashMap<Address, VestingGroupInfo>,
}

impl VestingRegistry {
    pub fn builtin() -> Self {
        Self::from_entries(VESTING_GROUPS)
    }

    pub fn from_entries(entries: &[VestingGroupInfo]) -> Self {
        let groups = entries.iter().map(|g| (g.address, *g)).collect();
        Self { groups }
    }

    pub fn lookup(&self, address: &Address) -> Option<&VestingGroupInfo> {
        self.groups.get(address)
    }

    /// Title and subtitle for the report, `N/A` for unknown groups
    pub fn describe(&self, address: &Address) -> (&'static str, &'static str) {
        match self.lookup(address) {
            Some(g) => (g.title, g.subtitle),
            None => (UNKNOWN_GROUP, UNKNOWN_GROUP),
        }
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
