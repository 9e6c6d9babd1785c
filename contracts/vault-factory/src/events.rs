//! Factory events

use soroban_sdk::{Address, BytesN, Env, Symbol};

pub fn emit_vault_created(
    env: &Env,
    token0: &Address,
    token1: &Address,
    fee: u32,
    pool: &Address,
    vault: &Address,
) {
    env.events().publish(
        (Symbol::new(env, "vault_created"), token0.clone(), token1.clone(), fee),
        (pool.clone(), vault.clone()),
    );
}

pub fn emit_vault_impl_upgraded(env: &Env, vault: &Address, implementation: &BytesN<32>) {
    env.events().publish(
        (Symbol::new(env, "vault_impl_upgraded"),),
        (vault.clone(), implementation.clone()),
    );
}

pub fn emit_implementation_registered(env: &Env, implementation: &BytesN<32>) {
    env.events().publish(
        (Symbol::new(env, "implementation_registered"),),
        implementation.clone(),
    );
}

pub fn emit_ownership_transferred(env: &Env, previous: Option<Address>, owner: &Address) {
    env.events().publish(
        (Symbol::new(env, "ownership_transferred"),),
        (previous, owner.clone()),
    );
}

pub fn emit_treasury_updated(env: &Env, treasury: &Address, treasury_fee_bps: u32) {
    env.events().publish(
        (Symbol::new(env, "treasury_updated"),),
        (treasury.clone(), treasury_fee_bps),
    );
}
