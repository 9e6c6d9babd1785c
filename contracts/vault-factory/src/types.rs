use soroban_sdk::{contracttype, Address};

/// Factory-wide settings handed to every vault it creates
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FactoryConfig {
    /// AMM factory used to resolve or create pools
    pub amm_factory: Address,
    pub treasury: Address,
    /// Share of pool fees paid to the treasury, in bps
    pub treasury_fee_bps: u32,
}
