//! Calls into the concentrated-liquidity pool the vault manages.
//!
//! The vault is always the position owner and the recipient. The pool pulls
//! deposits with `token.transfer(vault, pool, amount)`, so those transfers
//! are pre-authorized before each call that triggers one. Swap input is
//! pulled with `transfer_from` against an allowance that only lives for the
//! duration of the swap, since the pool decides how much of it to consume.

use crate::error::VaultError;
use soroban_sdk::auth::{ContractContext, InvokerContractAuthEntry, SubContractInvocation};
use soroban_sdk::{token, vec, Address, Env, IntoVal, Symbol, Vec};
use vault_types::{PoolConfig, PoolState, PositionInfo, TickInfo};

pub fn get_pool_state(env: &Env, pool: &Address) -> PoolState {
    env.invoke_contract(pool, &Symbol::new(env, "get_state"), Vec::new(env))
}

pub fn get_pool_config(env: &Env, pool: &Address) -> PoolConfig {
    env.invoke_contract(pool, &Symbol::new(env, "get_config"), Vec::new(env))
}

pub fn get_tick(env: &Env, pool: &Address, tick: i32) -> TickInfo {
    env.invoke_contract(pool, &Symbol::new(env, "get_tick"), (tick,).into_val(env))
}

pub fn get_position(env: &Env, pool: &Address, tick_lower: i32, tick_upper: i32) -> PositionInfo {
    if tick_lower >= tick_upper {
        return PositionInfo::default();
    }
    env.invoke_contract(
        pool,
        &Symbol::new(env, "get_position"),
        (env.current_contract_address(), tick_lower, tick_upper).into_val(env),
    )
}

/// Deposit `liquidity` into the range. `expected` are the amounts the pool
/// will pull at the current price.
pub fn mint(
    env: &Env,
    pool: &Address,
    tokens: (&Address, &Address),
    tick_lower: i32,
    tick_upper: i32,
    liquidity: u128,
    expected: (u128, u128),
) -> (u128, u128) {
    authorize_pull(env, pool, tokens.0, expected.0);
    authorize_pull(env, pool, tokens.1, expected.1);
    env.invoke_contract(
        pool,
        &Symbol::new(env, "mint"),
        (env.current_contract_address(), tick_lower, tick_upper, liquidity).into_val(env),
    )
}

/// Withdraw `liquidity`; a zero amount only settles accrued fees
pub fn burn(env: &Env, pool: &Address, tick_lower: i32, tick_upper: i32, liquidity: u128) -> (u128, u128) {
    env.invoke_contract(
        pool,
        &Symbol::new(env, "burn"),
        (env.current_contract_address(), tick_lower, tick_upper, liquidity).into_val(env),
    )
}

/// Collect everything the pool owes the vault's position
pub fn collect_all(env: &Env, pool: &Address, tick_lower: i32, tick_upper: i32) -> (u128, u128) {
    let vault = env.current_contract_address();
    env.invoke_contract(
        pool,
        &Symbol::new(env, "collect"),
        (vault.clone(), vault, tick_lower, tick_upper, u128::MAX, u128::MAX).into_val(env),
    )
}

/// Exact-input swap paid from the vault's idle balance
pub fn swap(
    env: &Env,
    pool: &Address,
    token_in: &Address,
    zero_for_one: bool,
    amount_in: i128,
    sqrt_price_limit_x96: u128,
) -> (i128, i128) {
    let vault = env.current_contract_address();
    let token = token::Client::new(env, token_in);
    let expiration = env.ledger().sequence();
    token.approve(&vault, pool, &amount_in, &expiration);
    let amounts = env.invoke_contract(
        pool,
        &Symbol::new(env, "swap"),
        (vault.clone(), zero_for_one, amount_in, sqrt_price_limit_x96).into_val(env),
    );
    token.approve(&vault, pool, &0, &expiration);
    amounts
}

fn authorize_pull(env: &Env, pool: &Address, token: &Address, amount: u128) {
    if amount == 0 {
        return;
    }
    let args = (env.current_contract_address(), pool.clone(), amount as i128).into_val(env);
    let entries: Vec<InvokerContractAuthEntry> = vec![
        env,
        InvokerContractAuthEntry::Contract(SubContractInvocation {
            context: ContractContext {
                contract: token.clone(),
                fn_name: Symbol::new(env, "transfer"),
                args,
            },
            sub_invocations: Vec::new(env),
        }),
    ];
    env.authorize_as_current_contract(entries);
}

// === Amount conversions at the pool boundary ===

pub fn to_i128(amount: u128) -> Result<i128, VaultError> {
    i128::try_from(amount).map_err(|_| VaultError::AmountOverflow)
}

pub fn to_u128(amount: i128) -> Result<u128, VaultError> {
    u128::try_from(amount).map_err(|_| VaultError::AmountOverflow)
}
