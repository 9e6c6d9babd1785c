//! Data returned by the concentrated-liquidity pool a vault manages.
//!
//! Field names follow the pool's own storage layout so values decode
//! directly from `get_state`, `get_config`, `get_tick` and `get_position`.

use soroban_sdk::{contracttype, Address};

/// Current pool state
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolState {
    /// Current sqrt(price) as Q64.96
    pub sqrt_price_x96: u128,
    /// Current tick index
    pub tick: i32,
    /// Total liquidity currently in range
    pub liquidity: u128,
    /// Fee growth global for token0 (Q128.128, wrapping)
    pub fee_growth_global_0_x128: u128,
    /// Fee growth global for token1 (Q128.128, wrapping)
    pub fee_growth_global_1_x128: u128,
    pub protocol_fees_0: i128,
    pub protocol_fees_1: i128,
}

impl PoolState {
    pub fn new(sqrt_price_x96: u128, tick: i32) -> Self {
        Self {
            sqrt_price_x96,
            tick,
            liquidity: 0,
            fee_growth_global_0_x128: 0,
            fee_growth_global_1_x128: 0,
            protocol_fees_0: 0,
            protocol_fees_1: 0,
        }
    }
}

/// Pool configuration - immutable after creation
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolConfig {
    pub factory: Address,
    /// Token0 address (lower address)
    pub token0: Address,
    /// Token1 address (higher address)
    pub token1: Address,
    /// Fee tier in hundredths of bps
    pub fee: u32,
    pub tick_spacing: i32,
    pub max_liquidity_per_tick: u128,
}

/// Per-tick fee bookkeeping needed to derive fee growth inside a range
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TickInfo {
    pub liquidity_gross: u128,
    pub liquidity_net: i128,
    /// Fee growth on the other side of this tick (token0)
    pub fee_growth_outside_0_x128: u128,
    /// Fee growth on the other side of this tick (token1)
    pub fee_growth_outside_1_x128: u128,
    pub initialized: bool,
}

/// A position held in the pool, keyed by (owner, tick_lower, tick_upper)
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PositionInfo {
    pub liquidity: u128,
    /// Fee growth inside at last update (token0)
    pub fee_growth_inside_0_last_x128: u128,
    /// Fee growth inside at last update (token1)
    pub fee_growth_inside_1_last_x128: u128,
    /// Fees and burned principal not yet collected (token0)
    pub tokens_owed_0: u128,
    /// Fees and burned principal not yet collected (token1)
    pub tokens_owed_1: u128,
}
