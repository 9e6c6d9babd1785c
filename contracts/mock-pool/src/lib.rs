#![no_std]
//! Concentrated-liquidity pool stand-in for vault tests.
//!
//! Exposes the same entry points and return types the vault consumes from a
//! real pool, but models a single price region: ticks are never crossed, so
//! every position is assumed to straddle the current price for as long as
//! it holds liquidity. Fee growth is tracked per unit of liquidity exactly
//! like a real pool, which lets tests observe fee accrual from swaps.

mod factory;
mod storage;

pub use factory::{MockAmmFactory, MockAmmFactoryClient};

use soroban_sdk::{contract, contractimpl, token, Address, Env, U256};
use storage::{get_config, get_position, get_state, set_config, set_position, set_state, DataKey};
use vault_math::{
    fee_growth_inside, fees_earned, get_amount0_for_liquidity, get_amount1_for_liquidity,
    get_amounts_for_liquidity, get_sqrt_ratio_at_tick, get_tick_at_sqrt_ratio, mul_div,
    mul_div_rounding_up, narrow,
};
use vault_types::{PoolConfig, PoolState, PositionInfo, TickInfo, Q96};

const FEE_DENOMINATOR: u128 = 1_000_000;

#[contract]
pub struct MockPool;

#[contractimpl]
impl MockPool {
    pub fn initialize(
        env: Env,
        factory: Address,
        token0: Address,
        token1: Address,
        fee: u32,
        tick_spacing: i32,
        sqrt_price_x96: u128,
    ) {
        if env.storage().instance().has(&DataKey::Config) {
            panic!("Already initialized");
        }
        if token0 >= token1 {
            panic!("token0 must be less than token1");
        }
        let tick = get_tick_at_sqrt_ratio(&env, sqrt_price_x96);
        set_config(
            &env,
            &PoolConfig {
                factory,
                token0,
                token1,
                fee,
                tick_spacing,
                max_liquidity_per_tick: u128::MAX,
            },
        );
        set_state(&env, &PoolState::new(sqrt_price_x96, tick));
    }

    /// Exact-input swap within the current price region.
    ///
    /// Returns (amount0, amount1); negative values are paid out.
    pub fn swap(
        env: Env,
        recipient: Address,
        zero_for_one: bool,
        amount_specified: i128,
        sqrt_price_limit_x96: u128,
    ) -> (i128, i128) {
        recipient.require_auth();
        if amount_specified <= 0 {
            panic!("exact output not supported");
        }
        let config = get_config(&env);
        let mut state = get_state(&env);
        if state.liquidity == 0 {
            panic!("no liquidity");
        }

        let fee = config.fee as u128;
        let amount_in = amount_specified as u128;
        let mut amount_less_fee = amount_in - mul_div_rounding_up(&env, amount_in, fee, FEE_DENOMINATOR);
        let price = state.sqrt_price_x96;
        let liquidity = state.liquidity;

        let mut next = if zero_for_one {
            // sqrt_next = L / (L / sqrt_p + amount)
            let scaled = U256::from_u128(&env, liquidity).shl(96);
            let denominator = scaled
                .div(&U256::from_u128(&env, price))
                .add(&U256::from_u128(&env, amount_less_fee));
            narrow(&scaled.div(&denominator))
        } else {
            price + mul_div(&env, amount_less_fee, Q96, liquidity)
        };

        let limited = if zero_for_one {
            sqrt_price_limit_x96 > next
        } else {
            sqrt_price_limit_x96 < next
        };
        if limited {
            next = sqrt_price_limit_x96;
            amount_less_fee = if zero_for_one {
                get_amount0_for_liquidity(&env, next, price, liquidity) + 1
            } else {
                get_amount1_for_liquidity(&env, price, next, liquidity) + 1
            };
        }
        let paid = if limited {
            amount_less_fee + mul_div_rounding_up(&env, amount_less_fee, fee, FEE_DENOMINATOR - fee)
        } else {
            amount_in
        };
        let fee_amount = paid - amount_less_fee;

        let (amount0_out, amount1_out) = if zero_for_one {
            (0, get_amount1_for_liquidity(&env, next, price, liquidity))
        } else {
            (get_amount0_for_liquidity(&env, price, next, liquidity), 0)
        };

        let growth = fee_growth_delta(&env, fee_amount, liquidity);
        if zero_for_one {
            state.fee_growth_global_0_x128 = state.fee_growth_global_0_x128.wrapping_add(growth);
        } else {
            state.fee_growth_global_1_x128 = state.fee_growth_global_1_x128.wrapping_add(growth);
        }
        state.sqrt_price_x96 = next;
        state.tick = get_tick_at_sqrt_ratio(&env, next);
        set_state(&env, &state);

        let pool = env.current_contract_address();
        let token0 = token::Client::new(&env, &config.token0);
        let token1 = token::Client::new(&env, &config.token1);
        if zero_for_one {
            token0.transfer_from(&pool, &recipient, &pool, &(paid as i128));
            token1.transfer(&pool, &recipient, &(amount1_out as i128));
            (paid as i128, -(amount1_out as i128))
        } else {
            token1.transfer_from(&pool, &recipient, &pool, &(paid as i128));
            token0.transfer(&pool, &recipient, &(amount0_out as i128));
            (-(amount0_out as i128), paid as i128)
        }
    }

    /// Add liquidity, pulling the owed amounts from `recipient`
    pub fn mint(
        env: Env,
        recipient: Address,
        tick_lower: i32,
        tick_upper: i32,
        amount: u128,
    ) -> (u128, u128) {
        recipient.require_auth();
        let config = get_config(&env);
        let mut state = get_state(&env);
        validate_ticks(tick_lower, tick_upper, config.tick_spacing);

        let mut position = poke(&env, &state, &recipient, tick_lower, tick_upper);
        let (amount0, amount1) = range_amounts(&env, &state, tick_lower, tick_upper, amount);
        position.liquidity += amount;
        set_position(&env, &recipient, tick_lower, tick_upper, &position);
        if state.tick >= tick_lower && state.tick < tick_upper {
            state.liquidity += amount;
        }
        set_state(&env, &state);

        let pool = env.current_contract_address();
        if amount0 > 0 {
            token::Client::new(&env, &config.token0).transfer(&recipient, &pool, &(amount0 as i128));
        }
        if amount1 > 0 {
            token::Client::new(&env, &config.token1).transfer(&recipient, &pool, &(amount1 as i128));
        }
        (amount0, amount1)
    }

    /// Remove liquidity; the principal is credited to tokens owed
    pub fn burn(
        env: Env,
        owner: Address,
        tick_lower: i32,
        tick_upper: i32,
        amount: u128,
    ) -> (u128, u128) {
        owner.require_auth();
        let mut state = get_state(&env);

        let mut position = poke(&env, &state, &owner, tick_lower, tick_upper);
        if amount > position.liquidity {
            panic!("insufficient liquidity");
        }
        let (amount0, amount1) = range_amounts(&env, &state, tick_lower, tick_upper, amount);
        position.liquidity -= amount;
        position.tokens_owed_0 += amount0;
        position.tokens_owed_1 += amount1;
        set_position(&env, &owner, tick_lower, tick_upper, &position);
        if amount > 0 && state.tick >= tick_lower && state.tick < tick_upper {
            state.liquidity -= amount;
            set_state(&env, &state);
        }
        (amount0, amount1)
    }

    /// Pay out up to the requested amounts of tokens owed
    pub fn collect(
        env: Env,
        owner: Address,
        recipient: Address,
        tick_lower: i32,
        tick_upper: i32,
        amount0_requested: u128,
        amount1_requested: u128,
    ) -> (u128, u128) {
        owner.require_auth();
        let config = get_config(&env);
        let mut position = get_position(&env, &owner, tick_lower, tick_upper);

        let amount0 = amount0_requested.min(position.tokens_owed_0);
        let amount1 = amount1_requested.min(position.tokens_owed_1);
        position.tokens_owed_0 -= amount0;
        position.tokens_owed_1 -= amount1;
        set_position(&env, &owner, tick_lower, tick_upper, &position);

        let pool = env.current_contract_address();
        if amount0 > 0 {
            token::Client::new(&env, &config.token0).transfer(&pool, &recipient, &(amount0 as i128));
        }
        if amount1 > 0 {
            token::Client::new(&env, &config.token1).transfer(&pool, &recipient, &(amount1 as i128));
        }
        (amount0, amount1)
    }

    // === View Functions ===

    pub fn get_state(env: Env) -> PoolState {
        get_state(&env)
    }

    pub fn get_config(env: Env) -> PoolConfig {
        get_config(&env)
    }

    /// Ticks are never crossed here, so their outside growth stays zero
    pub fn get_tick(_env: Env, _tick: i32) -> TickInfo {
        TickInfo::default()
    }

    pub fn get_position(env: Env, owner: Address, tick_lower: i32, tick_upper: i32) -> PositionInfo {
        get_position(&env, &owner, tick_lower, tick_upper)
    }
}

fn validate_ticks(tick_lower: i32, tick_upper: i32, tick_spacing: i32) {
    if tick_lower >= tick_upper {
        panic!("tick_lower must be less than tick_upper");
    }
    if tick_lower % tick_spacing != 0 || tick_upper % tick_spacing != 0 {
        panic!("ticks must be multiples of tick spacing");
    }
}

fn range_amounts(
    env: &Env,
    state: &PoolState,
    tick_lower: i32,
    tick_upper: i32,
    liquidity: u128,
) -> (u128, u128) {
    get_amounts_for_liquidity(
        env,
        state.sqrt_price_x96,
        get_sqrt_ratio_at_tick(env, tick_lower),
        get_sqrt_ratio_at_tick(env, tick_upper),
        liquidity,
    )
}

/// Credit fees accrued since the last checkpoint to tokens owed
fn poke(
    env: &Env,
    state: &PoolState,
    owner: &Address,
    tick_lower: i32,
    tick_upper: i32,
) -> PositionInfo {
    let mut position = get_position(env, owner, tick_lower, tick_upper);
    let inside0 = fee_growth_inside(
        state.tick,
        tick_lower,
        tick_upper,
        state.fee_growth_global_0_x128,
        0,
        0,
    );
    let inside1 = fee_growth_inside(
        state.tick,
        tick_lower,
        tick_upper,
        state.fee_growth_global_1_x128,
        0,
        0,
    );
    position.tokens_owed_0 += fees_earned(
        env,
        inside0,
        position.fee_growth_inside_0_last_x128,
        position.liquidity,
    );
    position.tokens_owed_1 += fees_earned(
        env,
        inside1,
        position.fee_growth_inside_1_last_x128,
        position.liquidity,
    );
    position.fee_growth_inside_0_last_x128 = inside0;
    position.fee_growth_inside_1_last_x128 = inside1;
    position
}

/// fee * 2^128 / liquidity
fn fee_growth_delta(env: &Env, fee_amount: u128, liquidity: u128) -> u128 {
    narrow(
        &U256::from_u128(env, fee_amount)
            .shl(128)
            .div(&U256::from_u128(env, liquidity)),
    )
}
