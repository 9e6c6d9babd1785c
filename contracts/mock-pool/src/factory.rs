use crate::storage::DataKey;
use soroban_sdk::{contract, contractimpl, Address, Env, IntoVal, Symbol};
use vault_types::PoolConfig;

/// AMM factory stand-in resolving pools by (token0, token1, fee)
#[contract]
pub struct MockAmmFactory;

#[contractimpl]
impl MockAmmFactory {
    /// Index an already initialized pool under its own config
    pub fn register_pool(env: Env, pool: Address) {
        let config: PoolConfig =
            env.invoke_contract(&pool, &Symbol::new(&env, "get_config"), ().into_val(&env));
        env.storage().persistent().set(
            &DataKey::Pool(config.token0, config.token1, config.fee),
            &pool,
        );
    }

    /// Queue an uninitialized pool for the next `create_pool`
    pub fn prepare_pool(env: Env, pool: Address) {
        env.storage().instance().set(&DataKey::PreparedPool, &pool);
    }

    pub fn get_pool(env: Env, token_a: Address, token_b: Address, fee: u32) -> Option<Address> {
        let (token0, token1) = sort_tokens(token_a, token_b);
        env.storage()
            .persistent()
            .get(&DataKey::Pool(token0, token1, fee))
    }

    pub fn create_pool(
        env: Env,
        token_a: Address,
        token_b: Address,
        fee: u32,
        initial_sqrt_price_x96: u128,
    ) -> Address {
        let (token0, token1) = sort_tokens(token_a, token_b);
        let key = DataKey::Pool(token0.clone(), token1.clone(), fee);
        if env.storage().persistent().has(&key) {
            panic!("Pool already exists");
        }
        let pool: Address = env
            .storage()
            .instance()
            .get(&DataKey::PreparedPool)
            .expect("No pool prepared");
        env.storage().instance().remove(&DataKey::PreparedPool);

        let tick_spacing: i32 = match fee {
            500 => 10,
            3000 => 60,
            10000 => 200,
            _ => panic!("Fee not enabled"),
        };
        env.invoke_contract::<()>(
            &pool,
            &Symbol::new(&env, "initialize"),
            (
                env.current_contract_address(),
                token0,
                token1,
                fee,
                tick_spacing,
                initial_sqrt_price_x96,
            )
                .into_val(&env),
        );
        env.storage().persistent().set(&key, &pool);
        pool
    }
}

fn sort_tokens(token_a: Address, token_b: Address) -> (Address, Address) {
    if token_a < token_b {
        (token_a, token_b)
    } else {
        (token_b, token_a)
    }
}
