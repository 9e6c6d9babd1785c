//! Fee rates and fee accounting.
//!
//! Pool fees pulled into the vault are split three ways: the performance
//! fee goes to the manager, the treasury fee to the treasury, and the rest
//! stays with shareholders. Both cuts are tracked as reserved balances that
//! the underlying balance excludes until collected.

use crate::error::VaultError;
use crate::events;
use crate::position;
use soroban_sdk::Env;
use vault_math::{bps_of, split_fee};
use vault_types::{FeeRates, VaultConfig, VaultState, BPS_DENOMINATOR, MAX_MANAGING_FEE_BPS, MAX_PERFORMANCE_FEE_BPS};

pub fn validate_fee_rates(rates: &FeeRates) -> Result<(), VaultError> {
    if rates.managing_fee_bps > MAX_MANAGING_FEE_BPS {
        return Err(VaultError::InvalidManagingFee);
    }
    if rates.performance_fee_bps > MAX_PERFORMANCE_FEE_BPS
        || rates.performance_fee_bps + rates.treasury_fee_bps > BPS_DENOMINATOR
    {
        return Err(VaultError::InvalidPerformanceFee);
    }
    Ok(())
}

/// Gross fees net of the manager and treasury cuts
pub fn net_of_performance_fee(env: &Env, rates: &FeeRates, fee0: i128, fee1: i128) -> (i128, i128) {
    let split0 = split_fee(env, fee0, rates.performance_fee_bps, rates.treasury_fee_bps);
    let split1 = split_fee(env, fee1, rates.performance_fee_bps, rates.treasury_fee_bps);
    (split0.net, split1.net)
}

/// Credit the manager and treasury cuts of freshly pulled pool fees
pub fn apply_performance_fee(env: &Env, state: &mut VaultState, fee0: i128, fee1: i128) {
    let split0 = split_fee(env, fee0, state.fees.performance_fee_bps, state.fees.treasury_fee_bps);
    let split1 = split_fee(env, fee1, state.fees.performance_fee_bps, state.fees.treasury_fee_bps);
    state.manager_balance_0 += split0.manager;
    state.manager_balance_1 += split1.manager;
    state.treasury_balance_0 += split0.treasury;
    state.treasury_balance_1 += split1.treasury;
}

/// Charge the managing fee on a burn payout and credit it to the manager.
/// Returns the fee taken per token.
pub fn apply_managing_fee(env: &Env, state: &mut VaultState, amount0: i128, amount1: i128) -> (i128, i128) {
    let fee0 = bps_of(env, amount0, state.fees.managing_fee_bps);
    let fee1 = bps_of(env, amount1, state.fees.managing_fee_bps);
    state.manager_balance_0 += fee0;
    state.manager_balance_1 += fee1;
    (fee0, fee1)
}

/// Pull accrued fees out of the pool position into the vault.
///
/// Pokes the position with a zero-liquidity burn, collects what it owes and
/// books the performance fee. Emits `fees_earned` with the gross amounts.
pub fn pull_fees(env: &Env, config: &VaultConfig, state: &mut VaultState) -> Result<(i128, i128), VaultError> {
    let mut fees = (0, 0);
    if state.in_position && position::current(env, config, state).liquidity > 0 {
        let withdrawal = position::withdraw(env, config, state, 0)?;
        apply_performance_fee(env, state, withdrawal.fee0, withdrawal.fee1);
        fees = (withdrawal.fee0, withdrawal.fee1);
    }
    events::emit_fees_earned(env, fees.0, fees.1);
    Ok(fees)
}
