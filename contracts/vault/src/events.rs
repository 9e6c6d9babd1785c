//! Vault events

use soroban_sdk::{Address, BytesN, Env, Symbol};

pub fn emit_minted(env: &Env, receiver: &Address, shares: i128, amount0: i128, amount1: i128) {
    env.events().publish(
        (Symbol::new(env, "minted"),),
        (receiver.clone(), shares, amount0, amount1),
    );
}

pub fn emit_burned(env: &Env, owner: &Address, shares: i128, amount0: i128, amount1: i128) {
    env.events().publish(
        (Symbol::new(env, "burned"),),
        (owner.clone(), shares, amount0, amount1),
    );
}

/// Gross pool fees pulled into the vault
pub fn emit_fees_earned(env: &Env, fee0: i128, fee1: i128) {
    env.events()
        .publish((Symbol::new(env, "fees_earned"),), (fee0, fee1));
}

pub fn emit_managing_fee_earned(env: &Env, owner: &Address, fee0: i128, fee1: i128) {
    env.events().publish(
        (Symbol::new(env, "managing_fee_earned"),),
        (owner.clone(), fee0, fee1),
    );
}

pub fn emit_mint_started(env: &Env) {
    env.events().publish((Symbol::new(env, "mint_started"),), ());
}

pub fn emit_ticks_set(env: &Env, lower_tick: i32, upper_tick: i32) {
    env.events()
        .publish((Symbol::new(env, "ticks_set"),), (lower_tick, upper_tick));
}

pub fn emit_in_position_status_set(env: &Env, in_position: bool) {
    env.events()
        .publish((Symbol::new(env, "in_position_status_set"),), in_position);
}

pub fn emit_liquidity_added(
    env: &Env,
    liquidity: u128,
    lower_tick: i32,
    upper_tick: i32,
    amount0: i128,
    amount1: i128,
) {
    env.events().publish(
        (Symbol::new(env, "liquidity_added"),),
        (liquidity, lower_tick, upper_tick, amount0, amount1),
    );
}

pub fn emit_liquidity_removed(
    env: &Env,
    liquidity: u128,
    lower_tick: i32,
    upper_tick: i32,
    amount0: i128,
    amount1: i128,
) {
    env.events().publish(
        (Symbol::new(env, "liquidity_removed"),),
        (liquidity, lower_tick, upper_tick, amount0, amount1),
    );
}

pub fn emit_swapped(env: &Env, zero_for_one: bool, amount0: i128, amount1: i128) {
    env.events().publish(
        (Symbol::new(env, "swapped"),),
        (zero_for_one, amount0, amount1),
    );
}

pub fn emit_fees_updated(env: &Env, managing_fee_bps: u32, performance_fee_bps: u32) {
    env.events().publish(
        (Symbol::new(env, "fees_updated"),),
        (managing_fee_bps, performance_fee_bps),
    );
}

pub fn emit_manager_collected(env: &Env, manager: &Address, amount0: i128, amount1: i128) {
    env.events().publish(
        (Symbol::new(env, "manager_collected"),),
        (manager.clone(), amount0, amount1),
    );
}

pub fn emit_treasury_collected(env: &Env, treasury: &Address, amount0: i128, amount1: i128) {
    env.events().publish(
        (Symbol::new(env, "treasury_collected"),),
        (treasury.clone(), amount0, amount1),
    );
}

pub fn emit_paused(env: &Env, paused: bool) {
    let name = if paused { "paused" } else { "unpaused" };
    env.events().publish((Symbol::new(env, name),), ());
}

pub fn emit_ownership_transferred(env: &Env, previous: Option<Address>, manager: &Address) {
    env.events().publish(
        (Symbol::new(env, "ownership_transferred"),),
        (previous, manager.clone()),
    );
}

pub fn emit_transfer(env: &Env, from: &Address, to: &Address, amount: i128) {
    env.events().publish(
        (Symbol::new(env, "transfer"), from.clone(), to.clone()),
        amount,
    );
}

pub fn emit_approve(
    env: &Env,
    from: &Address,
    spender: &Address,
    amount: i128,
    expiration_ledger: u32,
) {
    env.events().publish(
        (Symbol::new(env, "approve"), from.clone(), spender.clone()),
        (amount, expiration_ledger),
    );
}

pub fn emit_vault_upgraded(env: &Env, wasm_hash: &BytesN<32>, version: u32) {
    env.events().publish(
        (Symbol::new(env, "vault_upgraded"),),
        (wasm_hash.clone(), version),
    );
}
