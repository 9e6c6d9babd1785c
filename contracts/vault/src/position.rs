//! The vault's single pool position: range validation, deposits,
//! withdrawals and fee accrual.

use crate::error::VaultError;
use crate::pool::{self, to_i128, to_u128};
use soroban_sdk::Env;
use vault_math::{
    fee_growth_inside, fees_earned, get_amounts_for_liquidity, get_liquidity_for_amounts,
    get_sqrt_ratio_at_tick,
};
use vault_types::{PoolState, PositionInfo, VaultConfig, VaultState, MAX_TICK, MIN_TICK};

/// Amounts returned by a withdrawal, with principal and fees separated
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Withdrawal {
    pub burned0: i128,
    pub burned1: i128,
    pub fee0: i128,
    pub fee1: i128,
}

pub fn validate_ticks(tick_lower: i32, tick_upper: i32, tick_spacing: i32) -> Result<(), VaultError> {
    if tick_lower < MIN_TICK || tick_upper > MAX_TICK {
        return Err(VaultError::TicksOutOfRange);
    }
    if tick_lower >= tick_upper || tick_lower % tick_spacing != 0 || tick_upper % tick_spacing != 0 {
        return Err(VaultError::InvalidTicksSpacing);
    }
    Ok(())
}

pub fn range_sqrt_prices(env: &Env, tick_lower: i32, tick_upper: i32) -> (u128, u128) {
    (
        get_sqrt_ratio_at_tick(env, tick_lower),
        get_sqrt_ratio_at_tick(env, tick_upper),
    )
}

/// The vault's position in its current range
pub fn current(env: &Env, config: &VaultConfig, state: &VaultState) -> PositionInfo {
    pool::get_position(env, &config.pool, state.lower_tick, state.upper_tick)
}

/// Token amounts backing `liquidity` in the current range at the pool price
pub fn amounts_for_liquidity(
    env: &Env,
    state: &VaultState,
    pool_state: &PoolState,
    liquidity: u128,
) -> Result<(i128, i128), VaultError> {
    if liquidity == 0 {
        return Ok((0, 0));
    }
    let (sqrt_lower, sqrt_upper) = range_sqrt_prices(env, state.lower_tick, state.upper_tick);
    let (amount0, amount1) =
        get_amounts_for_liquidity(env, pool_state.sqrt_price_x96, sqrt_lower, sqrt_upper, liquidity);
    Ok((to_i128(amount0)?, to_i128(amount1)?))
}

/// Largest liquidity `amount0`/`amount1` can fund in `[tick_lower, tick_upper]`
pub fn liquidity_for_amounts(
    env: &Env,
    pool_state: &PoolState,
    tick_lower: i32,
    tick_upper: i32,
    amount0: i128,
    amount1: i128,
) -> Result<u128, VaultError> {
    let (sqrt_lower, sqrt_upper) = range_sqrt_prices(env, tick_lower, tick_upper);
    Ok(get_liquidity_for_amounts(
        env,
        pool_state.sqrt_price_x96,
        sqrt_lower,
        sqrt_upper,
        to_u128(amount0)?,
        to_u128(amount1)?,
    ))
}

/// Mint `liquidity` into `[tick_lower, tick_upper]`, returning the amounts
/// the pool pulled from the vault.
pub fn deposit(
    env: &Env,
    config: &VaultConfig,
    pool_state: &PoolState,
    tick_lower: i32,
    tick_upper: i32,
    liquidity: u128,
) -> Result<(i128, i128), VaultError> {
    if liquidity == 0 {
        return Ok((0, 0));
    }
    let (sqrt_lower, sqrt_upper) = range_sqrt_prices(env, tick_lower, tick_upper);
    let expected =
        get_amounts_for_liquidity(env, pool_state.sqrt_price_x96, sqrt_lower, sqrt_upper, liquidity);
    let (used0, used1) = pool::mint(
        env,
        &config.pool,
        (&config.token0, &config.token1),
        tick_lower,
        tick_upper,
        liquidity,
        expected,
    );
    Ok((to_i128(used0)?, to_i128(used1)?))
}

/// Burn `liquidity` from the current range and collect everything owed.
///
/// The pool settles all accrued fees of the position on burn, so whatever is
/// collected beyond the burned principal is fee income.
pub fn withdraw(
    env: &Env,
    config: &VaultConfig,
    state: &VaultState,
    liquidity: u128,
) -> Result<Withdrawal, VaultError> {
    let (burned0, burned1) = pool::burn(env, &config.pool, state.lower_tick, state.upper_tick, liquidity);
    let (collected0, collected1) =
        pool::collect_all(env, &config.pool, state.lower_tick, state.upper_tick);
    Ok(Withdrawal {
        burned0: to_i128(burned0)?,
        burned1: to_i128(burned1)?,
        fee0: to_i128(collected0.saturating_sub(burned0))?,
        fee1: to_i128(collected1.saturating_sub(burned1))?,
    })
}

/// Gross fees the position has accrued but the vault has not yet pulled
pub fn pending_fees(
    env: &Env,
    config: &VaultConfig,
    state: &VaultState,
    pool_state: &PoolState,
    position: &PositionInfo,
) -> Result<(i128, i128), VaultError> {
    if position.liquidity == 0 {
        return Ok((
            to_i128(position.tokens_owed_0)?,
            to_i128(position.tokens_owed_1)?,
        ));
    }

    let lower = pool::get_tick(env, &config.pool, state.lower_tick);
    let upper = pool::get_tick(env, &config.pool, state.upper_tick);
    let inside0 = fee_growth_inside(
        pool_state.tick,
        state.lower_tick,
        state.upper_tick,
        pool_state.fee_growth_global_0_x128,
        lower.fee_growth_outside_0_x128,
        upper.fee_growth_outside_0_x128,
    );
    let inside1 = fee_growth_inside(
        pool_state.tick,
        state.lower_tick,
        state.upper_tick,
        pool_state.fee_growth_global_1_x128,
        lower.fee_growth_outside_1_x128,
        upper.fee_growth_outside_1_x128,
    );

    let fee0 = position.tokens_owed_0
        + fees_earned(env, inside0, position.fee_growth_inside_0_last_x128, position.liquidity);
    let fee1 = position.tokens_owed_1
        + fees_earned(env, inside1, position.fee_growth_inside_1_last_x128, position.liquidity);
    Ok((to_i128(fee0)?, to_i128(fee1)?))
}
