use soroban_sdk::{Env, U256};

/// Multiply and divide with 256-bit intermediate precision (rounds down)
/// Returns (a * b) / denominator
pub fn mul_div(env: &Env, a: u128, b: u128, denominator: u128) -> u128 {
    if denominator == 0 {
        panic!("Division by zero");
    }
    let product = U256::from_u128(env, a).mul(&U256::from_u128(env, b));
    narrow(&product.div(&U256::from_u128(env, denominator)))
}

/// Multiply and divide with 256-bit intermediate precision (rounds up)
/// Returns ceil((a * b) / denominator)
pub fn mul_div_rounding_up(env: &Env, a: u128, b: u128, denominator: u128) -> u128 {
    if denominator == 0 {
        panic!("Division by zero");
    }
    let product = U256::from_u128(env, a).mul(&U256::from_u128(env, b));
    let denominator = U256::from_u128(env, denominator);
    let quotient = narrow(&product.div(&denominator));
    if product.rem_euclid(&denominator) > U256::from_u32(env, 0) {
        quotient + 1
    } else {
        quotient
    }
}

/// Returns (a * b) >> 128, used to turn Q128 fee growth into token amounts
pub fn mul_shr_128(env: &Env, a: u128, b: u128) -> u128 {
    let product = U256::from_u128(env, a).mul(&U256::from_u128(env, b));
    narrow(&product.shr(128))
}

/// Convert U256 to u128, panics if the value does not fit
pub fn narrow(value: &U256) -> u128 {
    match value.to_u128() {
        Some(v) => v,
        None => panic!("U256 overflow when converting to u128"),
    }
}
