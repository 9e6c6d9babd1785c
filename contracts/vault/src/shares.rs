//! Share ledger, depositor basis records and share pricing.

use crate::error::VaultError;
use crate::fees;
use crate::pool::{self, to_i128};
use crate::position;
use crate::storage;
use soroban_sdk::{token, Address, Env};
use vault_math::{get_amounts_for_liquidity, mint_amounts_for_supply, prorate_basis, share_of};
use vault_types::{UserVault, VaultConfig, VaultState};

// === Ledger ===

/// Load a depositor record, adding the depositor to the enumeration list
/// the first time it is seen.
fn register_user(env: &Env, user: &Address) -> UserVault {
    let mut record = storage::get_user_vault(env, user);
    if !record.exists {
        record.exists = true;
        storage::push_user(env, user);
    }
    record
}

/// Issue `shares` to `to` against the deposited amounts
pub fn mint_shares(
    env: &Env,
    state: &mut VaultState,
    to: &Address,
    shares: i128,
    amount0: i128,
    amount1: i128,
) {
    let balance = storage::get_balance(env, to);
    storage::set_balance(env, to, balance + shares);
    state.total_supply += shares;

    let mut record = register_user(env, to);
    record.token0 += amount0;
    record.token1 += amount1;
    storage::set_user_vault(env, to, &record);
}

/// Destroy `shares` held by `from` and shrink its basis proportionally
pub fn burn_shares(
    env: &Env,
    state: &mut VaultState,
    from: &Address,
    shares: i128,
) -> Result<(), VaultError> {
    let balance = storage::get_balance(env, from);
    if balance < shares {
        return Err(VaultError::InsufficientBalance);
    }

    let mut record = storage::get_user_vault(env, from);
    record.token0 = prorate_basis(env, record.token0, balance, shares).0;
    record.token1 = prorate_basis(env, record.token1, balance, shares).0;
    storage::set_user_vault(env, from, &record);

    storage::set_balance(env, from, balance - shares);
    state.total_supply -= shares;
    Ok(())
}

/// Move shares between holders. The basis moves with them in proportion.
pub fn transfer(env: &Env, from: &Address, to: &Address, amount: i128) -> Result<(), VaultError> {
    if amount < 0 {
        return Err(VaultError::InvalidAmount);
    }
    let from_balance = storage::get_balance(env, from);
    if from_balance < amount {
        return Err(VaultError::InsufficientBalance);
    }
    if amount == 0 || from == to {
        return Ok(());
    }

    let mut from_record = storage::get_user_vault(env, from);
    let (kept0, moved0) = prorate_basis(env, from_record.token0, from_balance, amount);
    let (kept1, moved1) = prorate_basis(env, from_record.token1, from_balance, amount);
    from_record.token0 = kept0;
    from_record.token1 = kept1;
    storage::set_user_vault(env, from, &from_record);

    let mut to_record = register_user(env, to);
    to_record.token0 += moved0;
    to_record.token1 += moved1;
    storage::set_user_vault(env, to, &to_record);

    storage::set_balance(env, from, from_balance - amount);
    let to_balance = storage::get_balance(env, to);
    storage::set_balance(env, to, to_balance + amount);
    Ok(())
}

pub fn spend_allowance(
    env: &Env,
    from: &Address,
    spender: &Address,
    amount: i128,
) -> Result<(), VaultError> {
    let mut allowance = storage::get_allowance(env, from, spender);
    if allowance.amount < amount {
        return Err(VaultError::InsufficientAllowance);
    }
    if amount > 0 {
        allowance.amount -= amount;
        storage::set_allowance(env, from, spender, &allowance);
    }
    Ok(())
}

// === Pricing ===

/// Shares and amounts a deposit would be charged.
///
/// `liquidity` is set for the first deposit into a live range, where shares
/// equal the liquidity minted and the pool pulls exactly the quoted amounts.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MintQuote {
    pub shares: i128,
    pub amount0: i128,
    pub amount1: i128,
    pub liquidity: Option<u128>,
}

pub fn idle_balances(env: &Env, config: &VaultConfig) -> (i128, i128) {
    let vault = env.current_contract_address();
    (
        token::Client::new(env, &config.token0).balance(&vault),
        token::Client::new(env, &config.token1).balance(&vault),
    )
}

/// Token amounts that belong to shareholders.
///
/// Counts the position at the current pool price, pending fees net of the
/// performance and treasury cuts, and idle tokens minus the balances
/// reserved for the manager and treasury.
pub fn underlying_balances(
    env: &Env,
    config: &VaultConfig,
    state: &VaultState,
) -> Result<(i128, i128), VaultError> {
    let (position0, position1, fee0, fee1) = if state.in_position {
        let pool_state = pool::get_pool_state(env, &config.pool);
        let current = position::current(env, config, state);
        let (amount0, amount1) =
            position::amounts_for_liquidity(env, state, &pool_state, current.liquidity)?;
        let (gross0, gross1) = position::pending_fees(env, config, state, &pool_state, &current)?;
        let (net0, net1) = fees::net_of_performance_fee(env, &state.fees, gross0, gross1);
        (amount0, amount1, net0, net1)
    } else {
        (0, 0, 0, 0)
    };

    let (idle0, idle1) = idle_balances(env, config);
    let free0 = (fee0 + idle0 - state.manager_balance_0 - state.treasury_balance_0).max(0);
    let free1 = (fee1 + idle1 - state.manager_balance_1 - state.treasury_balance_1).max(0);
    Ok((position0 + free0, position1 + free1))
}

pub fn underlying_balances_by_share(
    env: &Env,
    config: &VaultConfig,
    state: &VaultState,
    shares: i128,
) -> Result<(i128, i128), VaultError> {
    let (amount0, amount1) = underlying_balances(env, config, state)?;
    Ok((
        share_of(env, amount0, shares, state.total_supply),
        share_of(env, amount1, shares, state.total_supply),
    ))
}

/// Price a deposit of at most `amount0_max`/`amount1_max`
pub fn quote_mint(
    env: &Env,
    config: &VaultConfig,
    state: &VaultState,
    amount0_max: i128,
    amount1_max: i128,
) -> Result<MintQuote, VaultError> {
    if !state.mint_started {
        return Err(VaultError::MintNotStarted);
    }

    if state.total_supply > 0 {
        let (current0, current1) = underlying_balances(env, config, state)?;
        let amounts = mint_amounts_for_supply(
            env,
            state.total_supply,
            current0,
            current1,
            amount0_max,
            amount1_max,
        )
        .ok_or(VaultError::ZeroUnderlyingBalance)?;
        return Ok(MintQuote {
            shares: amounts.shares,
            amount0: amounts.amount0,
            amount1: amounts.amount1,
            liquidity: None,
        });
    }

    if !state.in_position {
        return Err(VaultError::MintNotAllowed);
    }

    let pool_state = pool::get_pool_state(env, &config.pool);
    let liquidity = position::liquidity_for_amounts(
        env,
        &pool_state,
        state.lower_tick,
        state.upper_tick,
        amount0_max,
        amount1_max,
    )?;
    let (sqrt_lower, sqrt_upper) =
        position::range_sqrt_prices(env, state.lower_tick, state.upper_tick);
    let (amount0, amount1) =
        get_amounts_for_liquidity(env, pool_state.sqrt_price_x96, sqrt_lower, sqrt_upper, liquidity);
    Ok(MintQuote {
        shares: to_i128(liquidity)?,
        amount0: to_i128(amount0)?,
        amount1: to_i128(amount1)?,
        liquidity: Some(liquidity),
    })
}
