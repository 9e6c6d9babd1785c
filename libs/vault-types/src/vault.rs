use soroban_sdk::{contracttype, Address, BytesN, String};

/// Per-depositor proportional basis record.
///
/// `token0`/`token1` track how much of each asset the depositor's current
/// shares were minted against. They grow on mint and shrink proportionally on
/// burn and outgoing transfers. `exists` never flips back to false.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct UserVault {
    pub exists: bool,
    pub token0: i128,
    pub token1: i128,
}

/// A depositor record joined with its address, as returned by pagination
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UserVaultInfo {
    pub user: Address,
    pub token0: i128,
    pub token1: i128,
}

/// Fee rates in basis points
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FeeRates {
    /// Charged on a depositor's payout at burn
    pub managing_fee_bps: u32,
    /// Charged on pool fees when they are pulled into the vault
    pub performance_fee_bps: u32,
    /// Charged on pool fees alongside the performance fee, paid to the treasury
    pub treasury_fee_bps: u32,
}

/// Share allowance with expiration, as in SEP-41 tokens
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AllowanceValue {
    pub amount: i128,
    pub expiration_ledger: u32,
}

/// Vault creation data supplied by the factory owner
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VaultInitData {
    /// Operator of the new vault; `None` is rejected
    pub manager: Option<Address>,
    /// Share token name
    pub name: String,
    /// Share token symbol
    pub symbol: String,
    /// Starting price used only when the pool does not exist yet
    pub initial_sqrt_price_x96: Option<u128>,
}

/// Arguments the factory passes to a freshly deployed vault
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VaultInitParams {
    pub factory: Address,
    pub pool: Address,
    pub manager: Address,
    pub treasury: Address,
    pub treasury_fee_bps: u32,
    /// Wasm hash the vault was deployed from
    pub implementation: BytesN<32>,
    pub name: String,
    pub symbol: String,
}

/// Immutable vault configuration, fixed at initialization
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VaultConfig {
    pub factory: Address,
    pub pool: Address,
    pub token0: Address,
    pub token1: Address,
    /// Pool fee tier in hundredths of bps
    pub fee: u32,
    pub tick_spacing: i32,
    pub treasury: Address,
    pub name: String,
    pub symbol: String,
}

/// Mutable vault state.
///
/// Every behavior version reads and writes the vault through this record,
/// so fields are only ever appended.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VaultState {
    pub manager: Address,
    pub lower_tick: i32,
    pub upper_tick: i32,
    /// True while the range is live; false once liquidity was removed and
    /// the range collapsed to `lower_tick == upper_tick`
    pub in_position: bool,
    pub mint_started: bool,
    pub paused: bool,
    pub fees: FeeRates,
    pub manager_balance_0: i128,
    pub manager_balance_1: i128,
    pub treasury_balance_0: i128,
    pub treasury_balance_1: i128,
    pub total_supply: i128,
}
