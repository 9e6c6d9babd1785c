use soroban_sdk::{contracttype, Address, Env};
use vault_types::{PoolConfig, PoolState, PositionInfo};

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Config,
    State,
    /// (owner, tick_lower, tick_upper) -> PositionInfo
    Position(Address, i32, i32),
    /// (token0, token1, fee) -> pool, kept by the mock AMM factory
    Pool(Address, Address, u32),
    /// Pool handed out by the next create_pool call
    PreparedPool,
}

pub fn get_config(env: &Env) -> PoolConfig {
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .expect("Pool not initialized")
}

pub fn set_config(env: &Env, config: &PoolConfig) {
    env.storage().instance().set(&DataKey::Config, config);
}

pub fn get_state(env: &Env) -> PoolState {
    env.storage()
        .instance()
        .get(&DataKey::State)
        .expect("Pool not initialized")
}

pub fn set_state(env: &Env, state: &PoolState) {
    env.storage().instance().set(&DataKey::State, state);
}

pub fn get_position(env: &Env, owner: &Address, tick_lower: i32, tick_upper: i32) -> PositionInfo {
    env.storage()
        .persistent()
        .get(&DataKey::Position(owner.clone(), tick_lower, tick_upper))
        .unwrap_or_default()
}

pub fn set_position(
    env: &Env,
    owner: &Address,
    tick_lower: i32,
    tick_upper: i32,
    info: &PositionInfo,
) {
    let key = DataKey::Position(owner.clone(), tick_lower, tick_upper);
    if info.liquidity == 0 && info.tokens_owed_0 == 0 && info.tokens_owed_1 == 0 {
        env.storage().persistent().remove(&key);
    } else {
        env.storage().persistent().set(&key, info);
    }
}
