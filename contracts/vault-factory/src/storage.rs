use crate::error::FactoryError;
use crate::types::FactoryConfig;
use soroban_sdk::{contracttype, Address, BytesN, Env, IntoVal, Val};

// Vaults are listed with indexed storage (VaultCount + VaultAt), one
// ledger entry per vault, so the registry never hits entry size limits.

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Owner,
    Config,
    /// Registered vault wasm hash -> true
    Implementation(BytesN<32>),
    /// (token0, token1, fee) -> vault address
    Vault(Address, Address, u32),
    /// Total number of vaults created
    VaultCount,
    /// Vault address at creation index
    VaultAt(u32),
    /// Vault address -> true
    IsVault(Address),
}

const INSTANCE_TTL_THRESHOLD: u32 = 17280;
const INSTANCE_TTL_EXTEND: u32 = 518400;
const PERSISTENT_TTL_THRESHOLD: u32 = 17280;
const PERSISTENT_TTL_EXTEND: u32 = 518400;

pub fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_EXTEND);
}

fn set_persistent<V: IntoVal<Env, Val>>(env: &Env, key: &DataKey, value: &V) {
    env.storage().persistent().set(key, value);
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_EXTEND);
}

// === Owner and config ===

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Owner)
}

pub fn get_owner(env: &Env) -> Result<Address, FactoryError> {
    env.storage()
        .instance()
        .get(&DataKey::Owner)
        .ok_or(FactoryError::NotInitialized)
}

pub fn set_owner(env: &Env, owner: &Address) {
    env.storage().instance().set(&DataKey::Owner, owner);
}

pub fn get_config(env: &Env) -> Result<FactoryConfig, FactoryError> {
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(FactoryError::NotInitialized)
}

pub fn set_config(env: &Env, config: &FactoryConfig) {
    env.storage().instance().set(&DataKey::Config, config);
}

// === Implementations ===

pub fn is_implementation(env: &Env, wasm_hash: &BytesN<32>) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::Implementation(wasm_hash.clone()))
}

pub fn add_implementation(env: &Env, wasm_hash: &BytesN<32>) {
    set_persistent(env, &DataKey::Implementation(wasm_hash.clone()), &true);
}

// === Vault registry ===

pub fn get_vault(env: &Env, token0: &Address, token1: &Address, fee: u32) -> Option<Address> {
    env.storage()
        .persistent()
        .get(&DataKey::Vault(token0.clone(), token1.clone(), fee))
}

pub fn is_vault(env: &Env, vault: &Address) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::IsVault(vault.clone()))
}

pub fn get_vault_count(env: &Env) -> u32 {
    env.storage()
        .instance()
        .get(&DataKey::VaultCount)
        .unwrap_or(0)
}

pub fn get_vault_at(env: &Env, index: u32) -> Option<Address> {
    env.storage().persistent().get(&DataKey::VaultAt(index))
}

/// Index a new vault by pair and by creation order
pub fn add_vault(env: &Env, token0: &Address, token1: &Address, fee: u32, vault: &Address) {
    let count = get_vault_count(env);
    set_persistent(
        env,
        &DataKey::Vault(token0.clone(), token1.clone(), fee),
        vault,
    );
    set_persistent(env, &DataKey::VaultAt(count), vault);
    set_persistent(env, &DataKey::IsVault(vault.clone()), &true);
    env.storage()
        .instance()
        .set(&DataKey::VaultCount, &(count + 1));
}
