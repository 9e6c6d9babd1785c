use crate::full_math::mul_shr_128;
use soroban_sdk::Env;

/// Fee growth per unit of liquidity inside `[tick_lower, tick_upper)`.
///
/// Fee growth counters are modular, so every subtraction wraps.
pub fn fee_growth_inside(
    tick_current: i32,
    tick_lower: i32,
    tick_upper: i32,
    fee_growth_global_x128: u128,
    lower_outside_x128: u128,
    upper_outside_x128: u128,
) -> u128 {
    let below = if tick_current >= tick_lower {
        lower_outside_x128
    } else {
        fee_growth_global_x128.wrapping_sub(lower_outside_x128)
    };
    let above = if tick_current < tick_upper {
        upper_outside_x128
    } else {
        fee_growth_global_x128.wrapping_sub(upper_outside_x128)
    };
    fee_growth_global_x128.wrapping_sub(below).wrapping_sub(above)
}

/// Fees accrued by `liquidity` since the position last checkpointed
/// `fee_growth_inside_last_x128`.
pub fn fees_earned(
    env: &Env,
    fee_growth_inside_x128: u128,
    fee_growth_inside_last_x128: u128,
    liquidity: u128,
) -> u128 {
    let delta = fee_growth_inside_x128.wrapping_sub(fee_growth_inside_last_x128);
    mul_shr_128(env, delta, liquidity)
}
