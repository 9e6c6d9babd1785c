//! Share issuance, proportional payout and basis-point fee arithmetic.
//!
//! Token amounts and share counts are i128 to match the Soroban token
//! interface. Products go through `SorobanFixedPoint`, which widens to 256
//! bits when `x * y` would overflow.

use soroban_fixed_point_math::SorobanFixedPoint;
use soroban_sdk::Env;
use vault_types::BPS_DENOMINATOR;

/// Shares and token amounts charged for one deposit
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MintAmounts {
    pub shares: i128,
    pub amount0: i128,
    pub amount1: i128,
}

/// Price a deposit into a vault that already has `total_supply` shares.
///
/// Shares follow whichever of the two ratios `max / current` binds, and the
/// amounts charged round up so existing holders are never diluted. Returns
/// `None` when the vault holds neither token, since shares cannot be priced.
pub fn mint_amounts_for_supply(
    env: &Env,
    total_supply: i128,
    amount0_current: i128,
    amount1_current: i128,
    amount0_max: i128,
    amount1_max: i128,
) -> Option<MintAmounts> {
    let shares = match (amount0_current > 0, amount1_current > 0) {
        (false, false) => return None,
        (false, true) => amount1_max.fixed_mul_floor(env, &total_supply, &amount1_current),
        (true, false) => amount0_max.fixed_mul_floor(env, &total_supply, &amount0_current),
        (true, true) => {
            let shares0 = amount0_max.fixed_mul_floor(env, &total_supply, &amount0_current);
            let shares1 = amount1_max.fixed_mul_floor(env, &total_supply, &amount1_current);
            shares0.min(shares1)
        }
    };

    Some(MintAmounts {
        shares,
        amount0: share_of_rounding_up(env, amount0_current, shares, total_supply),
        amount1: share_of_rounding_up(env, amount1_current, shares, total_supply),
    })
}

/// floor(amount * shares / total)
pub fn share_of(env: &Env, amount: i128, shares: i128, total: i128) -> i128 {
    if total == 0 || amount == 0 || shares == 0 {
        return 0;
    }
    amount.fixed_mul_floor(env, &shares, &total)
}

/// ceil(amount * shares / total)
pub fn share_of_rounding_up(env: &Env, amount: i128, shares: i128, total: i128) -> i128 {
    if total == 0 || amount == 0 || shares == 0 {
        return 0;
    }
    amount.fixed_mul_ceil(env, &shares, &total)
}

/// floor(amount * bps / 10_000)
pub fn bps_of(env: &Env, amount: i128, bps: u32) -> i128 {
    if bps == 0 || amount == 0 {
        return 0;
    }
    amount.fixed_mul_floor(env, &(bps as i128), &(BPS_DENOMINATOR as i128))
}

/// Pool fees divided between the manager, the treasury and shareholders
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct FeeSplit {
    pub manager: i128,
    pub treasury: i128,
    pub net: i128,
}

/// Split a gross fee amount by the performance and treasury rates.
/// `performance_bps + treasury_bps` must not exceed 10_000.
pub fn split_fee(env: &Env, gross: i128, performance_bps: u32, treasury_bps: u32) -> FeeSplit {
    let manager = bps_of(env, gross, performance_bps);
    let treasury = bps_of(env, gross, treasury_bps);
    FeeSplit {
        manager,
        treasury,
        net: gross - manager - treasury,
    }
}

/// Move a proportional slice of a basis record.
///
/// The holder had `balance` shares and gives up `shares`. Returns
/// `(kept, moved)`, where `kept = basis * (balance - shares) / balance`
/// rounded down and `kept + moved == basis`.
pub fn prorate_basis(env: &Env, basis: i128, balance: i128, shares: i128) -> (i128, i128) {
    if balance <= 0 || shares >= balance {
        return (0, basis);
    }
    let kept = share_of(env, basis, balance - shares, balance);
    (kept, basis - kept)
}
