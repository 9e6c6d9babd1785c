use crate::error::VaultError;
use soroban_sdk::{contracttype, Address, BytesN, Env};
use vault_types::{AllowanceValue, UserVault, VaultConfig, VaultState};

// ============================================================================
// Storage layout
// ============================================================================
// Instance: Config, State, Implementation, Version, UserCount
// Persistent: one entry per share holder (balance, basis record, allowance)
//             and one entry per depositor index
//
// The depositor list uses indexed storage (UserCount + UserAt) so no single
// ledger entry grows with the number of depositors.
// ============================================================================

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    /// Immutable configuration
    Config,
    /// Mutable vault state
    State,
    /// Wasm hash currently backing this vault
    Implementation,
    /// Bumped on every upgrade
    Version,
    /// Share balance per holder
    Balance(Address),
    /// (owner, spender) -> AllowanceValue
    Allowance(Address, Address),
    /// Proportional basis record per depositor
    UserVault(Address),
    /// Number of depositors ever recorded
    UserCount,
    /// Depositor at index
    UserAt(u32),
}

const INSTANCE_TTL_THRESHOLD: u32 = 17280; // ~1 day
const INSTANCE_TTL_EXTEND: u32 = 518400; // ~30 days
const PERSISTENT_TTL_THRESHOLD: u32 = 17280;
const PERSISTENT_TTL_EXTEND: u32 = 518400;

pub fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_EXTEND);
}

fn extend_persistent_ttl(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_EXTEND);
}

// === Config ===

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

pub fn get_config(env: &Env) -> Result<VaultConfig, VaultError> {
    extend_instance_ttl(env);
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(VaultError::NotInitialized)
}

pub fn set_config(env: &Env, config: &VaultConfig) {
    env.storage().instance().set(&DataKey::Config, config);
    extend_instance_ttl(env);
}

// === State ===

pub fn get_state(env: &Env) -> Result<VaultState, VaultError> {
    env.storage()
        .instance()
        .get(&DataKey::State)
        .ok_or(VaultError::NotInitialized)
}

pub fn set_state(env: &Env, state: &VaultState) {
    env.storage().instance().set(&DataKey::State, state);
    extend_instance_ttl(env);
}

// === Implementation ===

pub fn get_implementation(env: &Env) -> Option<BytesN<32>> {
    env.storage().instance().get(&DataKey::Implementation)
}

pub fn get_version(env: &Env) -> u32 {
    env.storage().instance().get(&DataKey::Version).unwrap_or(0)
}

/// Record a new backing implementation and return the new version
pub fn set_implementation(env: &Env, wasm_hash: &BytesN<32>) -> u32 {
    let version = get_version(env) + 1;
    env.storage()
        .instance()
        .set(&DataKey::Implementation, wasm_hash);
    env.storage().instance().set(&DataKey::Version, &version);
    version
}

// === Balances ===

pub fn get_balance(env: &Env, owner: &Address) -> i128 {
    let key = DataKey::Balance(owner.clone());
    match env.storage().persistent().get(&key) {
        Some(balance) => {
            extend_persistent_ttl(env, &key);
            balance
        }
        None => 0,
    }
}

pub fn set_balance(env: &Env, owner: &Address, balance: i128) {
    let key = DataKey::Balance(owner.clone());
    if balance == 0 {
        env.storage().persistent().remove(&key);
    } else {
        env.storage().persistent().set(&key, &balance);
        extend_persistent_ttl(env, &key);
    }
}

// === Allowances ===

pub fn get_allowance(env: &Env, owner: &Address, spender: &Address) -> AllowanceValue {
    let key = DataKey::Allowance(owner.clone(), spender.clone());
    let allowance: Option<AllowanceValue> = env.storage().persistent().get(&key);
    match allowance {
        Some(value) if value.expiration_ledger >= env.ledger().sequence() => value,
        _ => AllowanceValue {
            amount: 0,
            expiration_ledger: 0,
        },
    }
}

pub fn set_allowance(env: &Env, owner: &Address, spender: &Address, value: &AllowanceValue) {
    let key = DataKey::Allowance(owner.clone(), spender.clone());
    if value.amount == 0 {
        env.storage().persistent().remove(&key);
    } else {
        env.storage().persistent().set(&key, value);
        extend_persistent_ttl(env, &key);
    }
}

// === Depositor records ===

pub fn get_user_vault(env: &Env, user: &Address) -> UserVault {
    env.storage()
        .persistent()
        .get(&DataKey::UserVault(user.clone()))
        .unwrap_or_default()
}

pub fn set_user_vault(env: &Env, user: &Address, record: &UserVault) {
    let key = DataKey::UserVault(user.clone());
    env.storage().persistent().set(&key, record);
    extend_persistent_ttl(env, &key);
}

pub fn get_user_count(env: &Env) -> u32 {
    env.storage()
        .instance()
        .get(&DataKey::UserCount)
        .unwrap_or(0)
}

pub fn get_user_at(env: &Env, index: u32) -> Option<Address> {
    env.storage().persistent().get(&DataKey::UserAt(index))
}

/// Append a depositor to the enumeration list
pub fn push_user(env: &Env, user: &Address) {
    let count = get_user_count(env);
    let key = DataKey::UserAt(count);
    env.storage().persistent().set(&key, user);
    extend_persistent_ttl(env, &key);
    env.storage()
        .instance()
        .set(&DataKey::UserCount, &(count + 1));
}
