//! Conversions between pool liquidity and token amounts over a price range.
//!
//! All results round down, so amounts derived from liquidity never exceed
//! what the pool pays out and liquidity derived from amounts never asks the
//! pool for more than the caller holds.

use crate::full_math::{mul_div, narrow};
use soroban_sdk::{Env, U256};
use vault_types::Q96;

fn sorted(sqrt_ratio_a_x96: u128, sqrt_ratio_b_x96: u128) -> (u128, u128) {
    if sqrt_ratio_a_x96 > sqrt_ratio_b_x96 {
        (sqrt_ratio_b_x96, sqrt_ratio_a_x96)
    } else {
        (sqrt_ratio_a_x96, sqrt_ratio_b_x96)
    }
}

/// L = amount0 * sqrt_pa * sqrt_pb / (sqrt_pb - sqrt_pa)
pub fn get_liquidity_for_amount0(
    env: &Env,
    sqrt_ratio_a_x96: u128,
    sqrt_ratio_b_x96: u128,
    amount0: u128,
) -> u128 {
    let (lower, upper) = sorted(sqrt_ratio_a_x96, sqrt_ratio_b_x96);
    if lower == upper {
        return 0;
    }
    let intermediate = U256::from_u128(env, lower)
        .mul(&U256::from_u128(env, upper))
        .shr(96);
    let liquidity = U256::from_u128(env, amount0)
        .mul(&intermediate)
        .div(&U256::from_u128(env, upper - lower));
    narrow(&liquidity)
}

/// L = amount1 / (sqrt_pb - sqrt_pa)
pub fn get_liquidity_for_amount1(
    env: &Env,
    sqrt_ratio_a_x96: u128,
    sqrt_ratio_b_x96: u128,
    amount1: u128,
) -> u128 {
    let (lower, upper) = sorted(sqrt_ratio_a_x96, sqrt_ratio_b_x96);
    if lower == upper {
        return 0;
    }
    mul_div(env, amount1, Q96, upper - lower)
}

/// Largest liquidity that both amounts can fund at the current price
pub fn get_liquidity_for_amounts(
    env: &Env,
    sqrt_ratio_x96: u128,
    sqrt_ratio_a_x96: u128,
    sqrt_ratio_b_x96: u128,
    amount0: u128,
    amount1: u128,
) -> u128 {
    let (lower, upper) = sorted(sqrt_ratio_a_x96, sqrt_ratio_b_x96);

    if sqrt_ratio_x96 <= lower {
        get_liquidity_for_amount0(env, lower, upper, amount0)
    } else if sqrt_ratio_x96 < upper {
        let liquidity0 = get_liquidity_for_amount0(env, sqrt_ratio_x96, upper, amount0);
        let liquidity1 = get_liquidity_for_amount1(env, lower, sqrt_ratio_x96, amount1);
        liquidity0.min(liquidity1)
    } else {
        get_liquidity_for_amount1(env, lower, upper, amount1)
    }
}

/// amount0 = L * 2^96 * (sqrt_pb - sqrt_pa) / (sqrt_pb * sqrt_pa)
///
/// Evaluated as floor(L*2^96/sqrt_pa - L*2^96/sqrt_pb) with the remainders
/// compared exactly, so the 2^96 shift never truncates large liquidity.
pub fn get_amount0_for_liquidity(
    env: &Env,
    sqrt_ratio_a_x96: u128,
    sqrt_ratio_b_x96: u128,
    liquidity: u128,
) -> u128 {
    let (lower, upper) = sorted(sqrt_ratio_a_x96, sqrt_ratio_b_x96);
    if lower == 0 {
        panic!("sqrt price is zero");
    }
    let numerator = U256::from_u128(env, liquidity).shl(96);
    let lower_256 = U256::from_u128(env, lower);
    let upper_256 = U256::from_u128(env, upper);

    let mut amount = numerator.div(&lower_256).sub(&numerator.div(&upper_256));
    let rem_lower = numerator.rem_euclid(&lower_256);
    let rem_upper = numerator.rem_euclid(&upper_256);
    if rem_lower.mul(&upper_256) < rem_upper.mul(&lower_256) {
        amount = amount.sub(&U256::from_u32(env, 1));
    }
    narrow(&amount)
}

/// amount1 = L * (sqrt_pb - sqrt_pa) / 2^96
pub fn get_amount1_for_liquidity(
    env: &Env,
    sqrt_ratio_a_x96: u128,
    sqrt_ratio_b_x96: u128,
    liquidity: u128,
) -> u128 {
    let (lower, upper) = sorted(sqrt_ratio_a_x96, sqrt_ratio_b_x96);
    mul_div(env, liquidity, upper - lower, Q96)
}

/// Token amounts represented by `liquidity` at the current price
pub fn get_amounts_for_liquidity(
    env: &Env,
    sqrt_ratio_x96: u128,
    sqrt_ratio_a_x96: u128,
    sqrt_ratio_b_x96: u128,
    liquidity: u128,
) -> (u128, u128) {
    let (lower, upper) = sorted(sqrt_ratio_a_x96, sqrt_ratio_b_x96);

    if sqrt_ratio_x96 <= lower {
        (get_amount0_for_liquidity(env, lower, upper, liquidity), 0)
    } else if sqrt_ratio_x96 < upper {
        (
            get_amount0_for_liquidity(env, sqrt_ratio_x96, upper, liquidity),
            get_amount1_for_liquidity(env, lower, sqrt_ratio_x96, liquidity),
        )
    } else {
        (0, get_amount1_for_liquidity(env, lower, upper, liquidity))
    }
}
