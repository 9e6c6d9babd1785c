#![no_std]
//! Liquidity vault: one concentrated-liquidity position run by a manager on
//! behalf of many depositors, who hold the vault's own share token.

mod access;
mod error;
mod events;
mod fees;
mod pool;
mod position;
mod shares;
mod storage;

pub use error::VaultError;

use pool::to_u128;
use soroban_sdk::{contract, contractimpl, token, Address, BytesN, Env, String, Vec};
use vault_math::{mul_div, share_of};
use vault_types::{
    inclusive_page, AllowanceValue, FeeRates, UserVault, UserVaultInfo, VaultConfig,
    VaultInitParams, VaultState, DEFAULT_PERFORMANCE_FEE_BPS, SHARE_DECIMALS,
};

#[contract]
pub struct LiquidityVault;

#[contractimpl]
impl LiquidityVault {
    /// Bind the vault to its pool. Called once by the factory right after
    /// deployment.
    pub fn initialize(env: Env, params: VaultInitParams) -> Result<(), VaultError> {
        if storage::is_initialized(&env) {
            return Err(VaultError::AlreadyInitialized);
        }
        params.factory.require_auth();

        let pool_config = pool::get_pool_config(&env, &params.pool);
        let fee_rates = FeeRates {
            managing_fee_bps: 0,
            performance_fee_bps: DEFAULT_PERFORMANCE_FEE_BPS,
            treasury_fee_bps: params.treasury_fee_bps,
        };
        fees::validate_fee_rates(&fee_rates)?;

        storage::set_config(
            &env,
            &VaultConfig {
                factory: params.factory,
                pool: params.pool,
                token0: pool_config.token0,
                token1: pool_config.token1,
                fee: pool_config.fee,
                tick_spacing: pool_config.tick_spacing,
                treasury: params.treasury,
                name: params.name,
                symbol: params.symbol,
            },
        );
        storage::set_state(
            &env,
            &VaultState {
                manager: params.manager.clone(),
                lower_tick: 0,
                upper_tick: 0,
                in_position: false,
                mint_started: false,
                paused: false,
                fees: fee_rates,
                manager_balance_0: 0,
                manager_balance_1: 0,
                treasury_balance_0: 0,
                treasury_balance_1: 0,
                total_supply: 0,
            },
        );
        storage::set_implementation(&env, &params.implementation);

        events::emit_ownership_transferred(&env, None, &params.manager);
        Ok(())
    }

    // === Depositor operations ===

    /// Deposit at most `amount0_max`/`amount1_max` for shares.
    ///
    /// The first deposit into a live range mints shares equal to the
    /// liquidity it adds. Later deposits are priced against the underlying
    /// balances so existing holders are not diluted.
    pub fn mint(
        env: Env,
        depositor: Address,
        amount0_max: i128,
        amount1_max: i128,
        amount0_min: i128,
        amount1_min: i128,
    ) -> Result<i128, VaultError> {
        depositor.require_auth();
        storage::extend_instance_ttl(&env);

        let config = storage::get_config(&env)?;
        let mut state = storage::get_state(&env)?;
        access::require_not_paused(&state)?;
        if amount0_max < 0 || amount1_max < 0 {
            return Err(VaultError::InvalidAmount);
        }

        let quote = shares::quote_mint(&env, &config, &state, amount0_max, amount1_max)?;
        if quote.shares <= 0 {
            return Err(VaultError::InvalidMintAmount);
        }
        if quote.amount0 < amount0_min || quote.amount1 < amount1_min {
            return Err(VaultError::SlippageExceedThreshold);
        }

        let vault = env.current_contract_address();
        if quote.amount0 > 0 {
            token::Client::new(&env, &config.token0).transfer(&depositor, &vault, &quote.amount0);
        }
        if quote.amount1 > 0 {
            token::Client::new(&env, &config.token1).transfer(&depositor, &vault, &quote.amount1);
        }

        if state.in_position {
            let pool_state = pool::get_pool_state(&env, &config.pool);
            let liquidity = match quote.liquidity {
                Some(liquidity) => liquidity,
                None => position::liquidity_for_amounts(
                    &env,
                    &pool_state,
                    state.lower_tick,
                    state.upper_tick,
                    quote.amount0,
                    quote.amount1,
                )?,
            };
            position::deposit(
                &env,
                &config,
                &pool_state,
                state.lower_tick,
                state.upper_tick,
                liquidity,
            )?;
        }

        shares::mint_shares(
            &env,
            &mut state,
            &depositor,
            quote.shares,
            quote.amount0,
            quote.amount1,
        );
        storage::set_state(&env, &state);

        events::emit_minted(&env, &depositor, quote.shares, quote.amount0, quote.amount1);
        Ok(quote.shares)
    }

    /// Redeem `shares` for the proportional share of the position and idle
    /// balances, less the managing fee.
    pub fn burn(
        env: Env,
        depositor: Address,
        shares: i128,
        amount0_min: i128,
        amount1_min: i128,
    ) -> Result<(i128, i128), VaultError> {
        depositor.require_auth();
        storage::extend_instance_ttl(&env);

        let config = storage::get_config(&env)?;
        let mut state = storage::get_state(&env)?;
        access::require_not_paused(&state)?;
        if shares <= 0 {
            return Err(VaultError::InvalidBurnAmount);
        }
        if storage::get_balance(&env, &depositor) < shares {
            return Err(VaultError::InsufficientBalance);
        }

        let total_supply = state.total_supply;
        let (amount0, amount1) = if state.in_position {
            let current = position::current(&env, &config, &state);
            let withdrawal = if current.liquidity > 0 {
                let liquidity = mul_div(
                    &env,
                    to_u128(shares)?,
                    current.liquidity,
                    to_u128(total_supply)?,
                );
                position::withdraw(&env, &config, &state, liquidity)?
            } else {
                position::Withdrawal::default()
            };
            fees::apply_performance_fee(&env, &mut state, withdrawal.fee0, withdrawal.fee1);
            events::emit_fees_earned(&env, withdrawal.fee0, withdrawal.fee1);

            // Idle tokens excluding what was just withdrawn for this burn
            let (idle0, idle1) = shares::idle_balances(&env, &config);
            let passive0 = (idle0
                - withdrawal.burned0
                - state.manager_balance_0
                - state.treasury_balance_0)
                .max(0);
            let passive1 = (idle1
                - withdrawal.burned1
                - state.manager_balance_1
                - state.treasury_balance_1)
                .max(0);
            (
                withdrawal.burned0 + share_of(&env, passive0, shares, total_supply),
                withdrawal.burned1 + share_of(&env, passive1, shares, total_supply),
            )
        } else {
            let (underlying0, underlying1) = shares::underlying_balances(&env, &config, &state)?;
            (
                share_of(&env, underlying0, shares, total_supply),
                share_of(&env, underlying1, shares, total_supply),
            )
        };

        let (fee0, fee1) = fees::apply_managing_fee(&env, &mut state, amount0, amount1);
        let amount0_out = amount0 - fee0;
        let amount1_out = amount1 - fee1;
        if amount0_out < amount0_min || amount1_out < amount1_min {
            return Err(VaultError::SlippageExceedThreshold);
        }

        shares::burn_shares(&env, &mut state, &depositor, shares)?;
        storage::set_state(&env, &state);

        let vault = env.current_contract_address();
        if amount0_out > 0 {
            token::Client::new(&env, &config.token0).transfer(&vault, &depositor, &amount0_out);
        }
        if amount1_out > 0 {
            token::Client::new(&env, &config.token1).transfer(&vault, &depositor, &amount1_out);
        }

        events::emit_managing_fee_earned(&env, &state.manager, fee0, fee1);
        events::emit_burned(&env, &depositor, shares, amount0_out, amount1_out);
        Ok((amount0_out, amount1_out))
    }

    // === Manager operations ===

    /// Set the range that minting deposits into. Only possible while the
    /// vault has no shares and no live range.
    pub fn update_ticks(env: Env, lower_tick: i32, upper_tick: i32) -> Result<(), VaultError> {
        let mut state = access::require_manager(&env)?;
        let config = storage::get_config(&env)?;
        if state.total_supply != 0 || state.in_position {
            return Err(VaultError::TicksUpdateNotAllowed);
        }
        position::validate_ticks(lower_tick, upper_tick, config.tick_spacing)?;

        state.lower_tick = lower_tick;
        state.upper_tick = upper_tick;
        state.in_position = true;
        let first_range = !state.mint_started;
        state.mint_started = true;
        storage::set_state(&env, &state);

        events::emit_in_position_status_set(&env, true);
        events::emit_ticks_set(&env, lower_tick, upper_tick);
        if first_range {
            events::emit_mint_started(&env);
        }
        Ok(())
    }

    /// Deploy idle balances into a new range after `remove_liquidity`.
    ///
    /// Returns the liquidity added and the amounts the pool pulled. A zero
    /// liquidity quote leaves the vault out of position.
    pub fn add_liquidity(
        env: Env,
        lower_tick: i32,
        upper_tick: i32,
        amount0_max: i128,
        amount1_max: i128,
        amount0_min: i128,
        amount1_min: i128,
    ) -> Result<(u128, i128, i128), VaultError> {
        let mut state = access::require_manager(&env)?;
        let config = storage::get_config(&env)?;
        if state.in_position {
            return Err(VaultError::LiquidityAlreadyAdded);
        }
        position::validate_ticks(lower_tick, upper_tick, config.tick_spacing)?;
        if amount0_max < 0 || amount1_max < 0 {
            return Err(VaultError::InvalidAmount);
        }

        let (idle0, idle1) = shares::idle_balances(&env, &config);
        let amount0 = amount0_max
            .min(idle0 - state.manager_balance_0 - state.treasury_balance_0)
            .max(0);
        let amount1 = amount1_max
            .min(idle1 - state.manager_balance_1 - state.treasury_balance_1)
            .max(0);

        let pool_state = pool::get_pool_state(&env, &config.pool);
        let liquidity = position::liquidity_for_amounts(
            &env,
            &pool_state,
            lower_tick,
            upper_tick,
            amount0,
            amount1,
        )?;
        if liquidity == 0 {
            return Ok((0, 0, 0));
        }

        let (used0, used1) =
            position::deposit(&env, &config, &pool_state, lower_tick, upper_tick, liquidity)?;
        if used0 < amount0_min || used1 < amount1_min {
            return Err(VaultError::SlippageExceedThreshold);
        }

        state.lower_tick = lower_tick;
        state.upper_tick = upper_tick;
        state.in_position = true;
        storage::set_state(&env, &state);

        events::emit_ticks_set(&env, lower_tick, upper_tick);
        events::emit_in_position_status_set(&env, true);
        events::emit_liquidity_added(&env, liquidity, lower_tick, upper_tick, used0, used1);
        Ok((liquidity, used0, used1))
    }

    /// Withdraw the whole position into idle balances and take the vault
    /// out of position.
    pub fn remove_liquidity(env: Env, amount0_min: i128, amount1_min: i128) -> Result<(), VaultError> {
        let mut state = access::require_manager(&env)?;
        let config = storage::get_config(&env)?;

        let current = position::current(&env, &config, &state);
        if current.liquidity > 0 {
            let withdrawal = position::withdraw(&env, &config, &state, current.liquidity)?;
            if withdrawal.burned0 < amount0_min || withdrawal.burned1 < amount1_min {
                return Err(VaultError::SlippageExceedThreshold);
            }
            fees::apply_performance_fee(&env, &mut state, withdrawal.fee0, withdrawal.fee1);
            events::emit_liquidity_removed(
                &env,
                current.liquidity,
                state.lower_tick,
                state.upper_tick,
                withdrawal.burned0,
                withdrawal.burned1,
            );
            events::emit_fees_earned(&env, withdrawal.fee0, withdrawal.fee1);
        }

        state.upper_tick = state.lower_tick;
        state.in_position = false;
        storage::set_state(&env, &state);

        events::emit_in_position_status_set(&env, false);
        Ok(())
    }

    /// Exact-input swap of idle balances through the pool.
    /// Returns the pool's signed deltas; negative amounts were received.
    pub fn swap(
        env: Env,
        zero_for_one: bool,
        amount_specified: i128,
        sqrt_price_limit_x96: u128,
        min_amount_out: i128,
    ) -> Result<(i128, i128), VaultError> {
        access::require_manager(&env)?;
        let config = storage::get_config(&env)?;
        if amount_specified <= 0 {
            return Err(VaultError::InvalidAmount);
        }

        let token_in = if zero_for_one { &config.token0 } else { &config.token1 };
        let (amount0, amount1) = pool::swap(
            &env,
            &config.pool,
            token_in,
            zero_for_one,
            amount_specified,
            sqrt_price_limit_x96,
        );
        let received = if zero_for_one { -amount1 } else { -amount0 };
        if received < min_amount_out {
            return Err(VaultError::SlippageExceedThreshold);
        }

        events::emit_swapped(&env, zero_for_one, amount0, amount1);
        Ok((amount0, amount1))
    }

    /// Collect accrued pool fees into the vault. Returns the gross amounts.
    pub fn pull_fee_from_pool(env: Env) -> Result<(i128, i128), VaultError> {
        let mut state = access::require_manager(&env)?;
        let config = storage::get_config(&env)?;
        let collected = fees::pull_fees(&env, &config, &mut state)?;
        storage::set_state(&env, &state);
        Ok(collected)
    }

    pub fn update_fees(
        env: Env,
        managing_fee_bps: u32,
        performance_fee_bps: u32,
    ) -> Result<(), VaultError> {
        let mut state = access::require_manager(&env)?;
        let config = storage::get_config(&env)?;
        let rates = FeeRates {
            managing_fee_bps,
            performance_fee_bps,
            treasury_fee_bps: state.fees.treasury_fee_bps,
        };
        fees::validate_fee_rates(&rates)?;

        // Fees accrued so far are charged at the old rates
        if state.in_position {
            fees::pull_fees(&env, &config, &mut state)?;
        }
        state.fees = rates;
        storage::set_state(&env, &state);

        events::emit_fees_updated(&env, managing_fee_bps, performance_fee_bps);
        Ok(())
    }

    pub fn collect_manager(env: Env) -> Result<(i128, i128), VaultError> {
        let mut state = access::require_manager(&env)?;
        let config = storage::get_config(&env)?;
        let amount0 = state.manager_balance_0;
        let amount1 = state.manager_balance_1;
        state.manager_balance_0 = 0;
        state.manager_balance_1 = 0;
        storage::set_state(&env, &state);

        pay_out(&env, &config, &state.manager, amount0, amount1);
        events::emit_manager_collected(&env, &state.manager, amount0, amount1);
        Ok((amount0, amount1))
    }

    pub fn collect_treasury(env: Env) -> Result<(i128, i128), VaultError> {
        let config = access::require_treasury(&env)?;
        let mut state = storage::get_state(&env)?;
        let amount0 = state.treasury_balance_0;
        let amount1 = state.treasury_balance_1;
        state.treasury_balance_0 = 0;
        state.treasury_balance_1 = 0;
        storage::set_state(&env, &state);

        pay_out(&env, &config, &config.treasury, amount0, amount1);
        events::emit_treasury_collected(&env, &config.treasury, amount0, amount1);
        Ok((amount0, amount1))
    }

    pub fn pause(env: Env) -> Result<(), VaultError> {
        set_paused(&env, true)
    }

    pub fn unpause(env: Env) -> Result<(), VaultError> {
        set_paused(&env, false)
    }

    pub fn transfer_ownership(env: Env, new_manager: Address) -> Result<(), VaultError> {
        let mut state = access::require_manager(&env)?;
        let previous = state.manager.clone();
        state.manager = new_manager.clone();
        storage::set_state(&env, &state);

        events::emit_ownership_transferred(&env, Some(previous), &new_manager);
        Ok(())
    }

    // === Upgrade ===

    /// Swap the vault's executable code. Storage is left untouched.
    pub fn upgrade(env: Env, new_wasm_hash: BytesN<32>) -> Result<u32, VaultError> {
        access::require_factory(&env)?;
        let version = storage::set_implementation(&env, &new_wasm_hash);
        events::emit_vault_upgraded(&env, &new_wasm_hash, version);
        env.deployer().update_current_contract_wasm(new_wasm_hash);
        Ok(version)
    }

    pub fn implementation(env: Env) -> Option<BytesN<32>> {
        storage::get_implementation(&env)
    }

    pub fn version(env: Env) -> u32 {
        storage::get_version(&env)
    }

    // === Share token ===

    pub fn balance(env: Env, id: Address) -> i128 {
        storage::get_balance(&env, &id)
    }

    pub fn total_supply(env: Env) -> Result<i128, VaultError> {
        Ok(storage::get_state(&env)?.total_supply)
    }

    pub fn decimals(_env: Env) -> u32 {
        SHARE_DECIMALS
    }

    pub fn name(env: Env) -> Result<String, VaultError> {
        Ok(storage::get_config(&env)?.name)
    }

    pub fn symbol(env: Env) -> Result<String, VaultError> {
        Ok(storage::get_config(&env)?.symbol)
    }

    pub fn transfer(env: Env, from: Address, to: Address, amount: i128) -> Result<(), VaultError> {
        from.require_auth();
        shares::transfer(&env, &from, &to, amount)?;
        events::emit_transfer(&env, &from, &to, amount);
        Ok(())
    }

    pub fn transfer_from(
        env: Env,
        spender: Address,
        from: Address,
        to: Address,
        amount: i128,
    ) -> Result<(), VaultError> {
        spender.require_auth();
        if amount < 0 {
            return Err(VaultError::InvalidAmount);
        }
        shares::spend_allowance(&env, &from, &spender, amount)?;
        shares::transfer(&env, &from, &to, amount)?;
        events::emit_transfer(&env, &from, &to, amount);
        Ok(())
    }

    pub fn approve(
        env: Env,
        from: Address,
        spender: Address,
        amount: i128,
        expiration_ledger: u32,
    ) -> Result<(), VaultError> {
        from.require_auth();
        if amount < 0 {
            return Err(VaultError::InvalidAmount);
        }
        if amount > 0 && expiration_ledger < env.ledger().sequence() {
            return Err(VaultError::InvalidAmount);
        }
        storage::set_allowance(
            &env,
            &from,
            &spender,
            &AllowanceValue {
                amount,
                expiration_ledger,
            },
        );
        events::emit_approve(&env, &from, &spender, amount, expiration_ledger);
        Ok(())
    }

    pub fn allowance(env: Env, from: Address, spender: Address) -> i128 {
        storage::get_allowance(&env, &from, &spender).amount
    }

    // === Views ===

    /// Shares and amounts a `mint` with these maximums would produce
    pub fn get_mint_amounts(
        env: Env,
        amount0_max: i128,
        amount1_max: i128,
    ) -> Result<(i128, i128, i128), VaultError> {
        let config = storage::get_config(&env)?;
        let state = storage::get_state(&env)?;
        let quote = shares::quote_mint(&env, &config, &state, amount0_max, amount1_max)?;
        Ok((quote.shares, quote.amount0, quote.amount1))
    }

    pub fn get_underlying_balances(env: Env) -> Result<(i128, i128), VaultError> {
        let config = storage::get_config(&env)?;
        let state = storage::get_state(&env)?;
        shares::underlying_balances(&env, &config, &state)
    }

    pub fn get_underlying_balances_by_share(env: Env, shares: i128) -> Result<(i128, i128), VaultError> {
        let config = storage::get_config(&env)?;
        let state = storage::get_state(&env)?;
        shares::underlying_balances_by_share(&env, &config, &state, shares)
    }

    /// Gross fees accrued in the pool position and not yet pulled
    pub fn get_current_fees(env: Env) -> Result<(i128, i128), VaultError> {
        let config = storage::get_config(&env)?;
        let state = storage::get_state(&env)?;
        if !state.in_position {
            return Ok((0, 0));
        }
        let pool_state = pool::get_pool_state(&env, &config.pool);
        let current = position::current(&env, &config, &state);
        position::pending_fees(&env, &config, &state, &pool_state, &current)
    }

    /// Depositor records at enumeration indices `start..=end`, clamped to
    /// the depositor count and at most 50 entries.
    pub fn get_user_vaults(env: Env, start: u32, end: u32) -> Vec<UserVaultInfo> {
        let (from, to) = inclusive_page(start, end, storage::get_user_count(&env));
        let mut result = Vec::new(&env);
        for index in from..to {
            if let Some(user) = storage::get_user_at(&env, index) {
                let record = storage::get_user_vault(&env, &user);
                result.push_back(UserVaultInfo {
                    user,
                    token0: record.token0,
                    token1: record.token1,
                });
            }
        }
        result
    }

    pub fn user_count(env: Env) -> u32 {
        storage::get_user_count(&env)
    }

    pub fn get_user_vault(env: Env, user: Address) -> UserVault {
        storage::get_user_vault(&env, &user)
    }

    pub fn get_state(env: Env) -> Result<VaultState, VaultError> {
        storage::get_state(&env)
    }

    pub fn get_config(env: Env) -> Result<VaultConfig, VaultError> {
        storage::get_config(&env)
    }

    pub fn get_fee_rates(env: Env) -> Result<FeeRates, VaultError> {
        Ok(storage::get_state(&env)?.fees)
    }

    pub fn manager(env: Env) -> Result<Address, VaultError> {
        Ok(storage::get_state(&env)?.manager)
    }

    pub fn lower_tick(env: Env) -> Result<i32, VaultError> {
        Ok(storage::get_state(&env)?.lower_tick)
    }

    pub fn upper_tick(env: Env) -> Result<i32, VaultError> {
        Ok(storage::get_state(&env)?.upper_tick)
    }

    pub fn in_position(env: Env) -> Result<bool, VaultError> {
        Ok(storage::get_state(&env)?.in_position)
    }

    pub fn mint_started(env: Env) -> Result<bool, VaultError> {
        Ok(storage::get_state(&env)?.mint_started)
    }

    pub fn paused(env: Env) -> Result<bool, VaultError> {
        Ok(storage::get_state(&env)?.paused)
    }

    pub fn manager_balances(env: Env) -> Result<(i128, i128), VaultError> {
        let state = storage::get_state(&env)?;
        Ok((state.manager_balance_0, state.manager_balance_1))
    }

    pub fn treasury_balances(env: Env) -> Result<(i128, i128), VaultError> {
        let state = storage::get_state(&env)?;
        Ok((state.treasury_balance_0, state.treasury_balance_1))
    }
}

fn set_paused(env: &Env, paused: bool) -> Result<(), VaultError> {
    let mut state = access::require_manager(env)?;
    state.paused = paused;
    storage::set_state(env, &state);
    events::emit_paused(env, paused);
    Ok(())
}

fn pay_out(env: &Env, config: &VaultConfig, to: &Address, amount0: i128, amount1: i128) {
    let vault = env.current_contract_address();
    if amount0 > 0 {
        token::Client::new(env, &config.token0).transfer(&vault, to, &amount0);
    }
    if amount1 > 0 {
        token::Client::new(env, &config.token1).transfer(&vault, to, &amount1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mock_pool::{MockPool, MockPoolClient};
    use soroban_sdk::testutils::{Address as _, Events, Ledger};
    use soroban_sdk::token::{StellarAssetClient, TokenClient};
    use soroban_sdk::{Address, BytesN, Env, String, Symbol, TryFromVal, TryIntoVal, Val, Vec};
    use vault_types::{VaultInitParams, MAX_SQRT_RATIO, MIN_SQRT_RATIO, Q96};

    const FULL_LOWER: i32 = -443580;
    const FULL_UPPER: i32 = 443580;
    const TREASURY_FEE_BPS: u32 = 100;

    struct Setup<'a> {
        env: Env,
        vault: LiquidityVaultClient<'a>,
        pool: MockPoolClient<'a>,
        token0: Address,
        token1: Address,
        manager: Address,
        factory: Address,
        treasury: Address,
    }

    impl Setup<'_> {
        fn funded_user(&self, amount: i128) -> Address {
            let user = Address::generate(&self.env);
            StellarAssetClient::new(&self.env, &self.token0).mint(&user, &amount);
            StellarAssetClient::new(&self.env, &self.token1).mint(&user, &amount);
            user
        }

        fn balance0(&self, id: &Address) -> i128 {
            TokenClient::new(&self.env, &self.token0).balance(id)
        }

        fn balance1(&self, id: &Address) -> i128 {
            TokenClient::new(&self.env, &self.token1).balance(id)
        }

        /// Trade against the pool from an outside account
        fn trade(&self, zero_for_one: bool, amount_in: i128) {
            let trader = self.funded_user(amount_in);
            let limit = if zero_for_one {
                MIN_SQRT_RATIO + 1
            } else {
                MAX_SQRT_RATIO - 1
            };
            let token_in = if zero_for_one { &self.token0 } else { &self.token1 };
            let expiration = self.env.ledger().sequence() + 100;
            TokenClient::new(&self.env, token_in).approve(&trader, &self.pool.address, &amount_in, &expiration);
            self.pool.swap(&trader, &zero_for_one, &amount_in, &limit);
        }

        /// Data of the vault's events named `name` from the last invocation
        fn events(&self, name: &str) -> Vec<Val> {
            let topic = Symbol::new(&self.env, name);
            let mut found = Vec::new(&self.env);
            for (contract, topics, data) in self.env.events().all().iter() {
                if contract != self.vault.address {
                    continue;
                }
                let first = topics.get(0).and_then(|t| Symbol::try_from_val(&self.env, &t).ok());
                if first == Some(topic.clone()) {
                    found.push_back(data);
                }
            }
            found
        }
    }

    fn setup<'a>() -> Setup<'a> {
        let env = Env::default();
        env.mock_all_auths();

        let admin = Address::generate(&env);
        let a = env.register_stellar_asset_contract_v2(admin.clone()).address();
        let b = env.register_stellar_asset_contract_v2(admin).address();
        let (token0, token1) = if a < b { (a, b) } else { (b, a) };

        let pool_id = env.register(MockPool, ());
        let pool = MockPoolClient::new(&env, &pool_id);
        pool.initialize(&Address::generate(&env), &token0, &token1, &3000u32, &60i32, &Q96);

        let manager = Address::generate(&env);
        let factory = Address::generate(&env);
        let treasury = Address::generate(&env);
        let vault_id = env.register(LiquidityVault, ());
        let vault = LiquidityVaultClient::new(&env, &vault_id);
        vault.initialize(&VaultInitParams {
            factory: factory.clone(),
            pool: pool_id,
            manager: manager.clone(),
            treasury: treasury.clone(),
            treasury_fee_bps: TREASURY_FEE_BPS,
            implementation: BytesN::from_array(&env, &[7u8; 32]),
            name: String::from_str(&env, "Vault Share"),
            symbol: String::from_str(&env, "VLT"),
        });

        Setup {
            env,
            vault,
            pool,
            token0,
            token1,
            manager,
            factory,
            treasury,
        }
    }

    /// Full-range vault with one depositor holding 20_000_000 shares
    fn setup_with_depositor<'a>() -> (Setup<'a>, Address) {
        let s = setup();
        s.vault.update_ticks(&FULL_LOWER, &FULL_UPPER);
        let depositor = s.funded_user(1_000_000_000);
        s.vault.mint(&depositor, &20_000_000, &30_000_000, &0, &0);
        (s, depositor)
    }

    // === Initialization ===

    #[test]
    fn test_initialize_reads_pool_config() {
        let s = setup();
        let config = s.vault.get_config();
        assert_eq!(config.token0, s.token0);
        assert_eq!(config.token1, s.token1);
        assert_eq!(config.fee, 3000);
        assert_eq!(config.tick_spacing, 60);
        assert_eq!(config.factory, s.factory);
        assert_eq!(config.treasury, s.treasury);

        assert_eq!(s.vault.manager(), s.manager);
        let rates = s.vault.get_fee_rates();
        assert_eq!(rates.managing_fee_bps, 0);
        assert_eq!(rates.performance_fee_bps, 250);
        assert_eq!(rates.treasury_fee_bps, TREASURY_FEE_BPS);

        assert!(!s.vault.mint_started());
        assert!(!s.vault.in_position());
        assert_eq!(s.vault.total_supply(), 0);
        assert_eq!(s.vault.decimals(), 7);
        assert_eq!(s.vault.symbol(), String::from_str(&s.env, "VLT"));
        assert_eq!(
            s.vault.implementation(),
            Some(BytesN::from_array(&s.env, &[7u8; 32]))
        );
        assert_eq!(s.vault.version(), 1);
    }

    #[test]
    #[should_panic(expected = "Error(Contract, #1)")]
    fn test_initialize_twice() {
        let s = setup();
        s.vault.initialize(&VaultInitParams {
            factory: s.factory.clone(),
            pool: s.pool.address.clone(),
            manager: s.manager.clone(),
            treasury: s.treasury.clone(),
            treasury_fee_bps: 0,
            implementation: BytesN::from_array(&s.env, &[7u8; 32]),
            name: String::from_str(&s.env, "Vault Share"),
            symbol: String::from_str(&s.env, "VLT"),
        });
    }

    #[test]
    fn test_uninitialized_vault() {
        let env = Env::default();
        env.mock_all_auths();
        let vault = LiquidityVaultClient::new(&env, &env.register(LiquidityVault, ()));
        assert_eq!(vault.try_get_state(), Err(Ok(VaultError::NotInitialized)));
        assert_eq!(vault.try_pause(), Err(Ok(VaultError::NotInitialized)));
        assert_eq!(vault.version(), 0);
    }

    // === Ticks ===

    #[test]
    fn test_update_ticks_starts_minting() {
        let s = setup();
        s.vault.update_ticks(&FULL_LOWER, &FULL_UPPER);

        let status = s.events("in_position_status_set");
        assert_eq!(status.len(), 1);
        assert!(bool::try_from_val(&s.env, &status.get_unchecked(0)).unwrap());
        let ticks = s.events("ticks_set");
        assert_eq!(ticks.len(), 1);
        let range: (i32, i32) = ticks.get_unchecked(0).try_into_val(&s.env).unwrap();
        assert_eq!(range, (FULL_LOWER, FULL_UPPER));
        assert_eq!(s.events("mint_started").len(), 1);

        assert!(s.vault.mint_started());
        assert!(s.vault.in_position());
        assert_eq!(s.vault.lower_tick(), FULL_LOWER);
        assert_eq!(s.vault.upper_tick(), FULL_UPPER);
    }

    #[test]
    fn test_update_ticks_validation() {
        let s = setup();
        assert_eq!(
            s.vault.try_update_ticks(&-443640, &FULL_UPPER),
            Err(Ok(VaultError::TicksOutOfRange))
        );
        assert_eq!(
            s.vault.try_update_ticks(&-100, &100),
            Err(Ok(VaultError::InvalidTicksSpacing))
        );
        assert_eq!(
            s.vault.try_update_ticks(&600, &-600),
            Err(Ok(VaultError::InvalidTicksSpacing))
        );
        assert!(!s.vault.mint_started());
    }

    #[test]
    #[should_panic(expected = "Error(Contract, #22)")]
    fn test_update_ticks_while_in_position() {
        let s = setup();
        s.vault.update_ticks(&FULL_LOWER, &FULL_UPPER);
        s.vault.update_ticks(&-600, &600);
    }

    #[test]
    fn test_update_ticks_requires_manager() {
        let s = setup();
        s.vault.update_ticks(&FULL_LOWER, &FULL_UPPER);
        let auths = s.env.auths();
        assert_eq!(auths.len(), 1);
        assert_eq!(auths[0].0, s.manager);
    }

    // === Mint ===

    #[test]
    #[should_panic(expected = "Error(Contract, #10)")]
    fn test_mint_before_ticks() {
        let s = setup();
        let depositor = s.funded_user(1_000_000_000);
        s.vault.mint(&depositor, &1_000_000, &1_000_000, &0, &0);
    }

    #[test]
    fn test_first_mint_issues_liquidity_as_shares() {
        let s = setup();
        s.vault.update_ticks(&FULL_LOWER, &FULL_UPPER);
        let depositor = s.funded_user(1_000_000_000);

        assert_eq!(
            s.vault.get_mint_amounts(&20_000_000, &30_000_000),
            (20_000_000, 19_999_999, 19_999_999)
        );
        let shares = s.vault.mint(&depositor, &20_000_000, &30_000_000, &0, &0);

        assert_eq!(shares, 20_000_000);
        assert_eq!(s.vault.balance(&depositor), 20_000_000);
        assert_eq!(s.vault.total_supply(), 20_000_000);
        assert_eq!(s.balance0(&depositor), 1_000_000_000 - 19_999_999);
        assert_eq!(s.balance1(&depositor), 1_000_000_000 - 19_999_999);

        let position = s.pool.get_position(&s.vault.address, &FULL_LOWER, &FULL_UPPER);
        assert_eq!(position.liquidity, 20_000_000);
        assert_eq!(s.balance0(&s.vault.address), 0);
        assert_eq!(s.balance1(&s.vault.address), 0);

        let record = s.vault.get_user_vault(&depositor);
        assert!(record.exists);
        assert_eq!((record.token0, record.token1), (19_999_999, 19_999_999));
    }

    #[test]
    fn test_second_mint_is_priced_on_underlying() {
        let (s, _) = setup_with_depositor();
        assert_eq!(s.vault.get_underlying_balances(), (19_999_999, 19_999_999));

        let second = s.funded_user(1_000_000_000);
        let shares = s.vault.mint(&second, &20_000_000, &20_000_000, &0, &0);

        assert_eq!(shares, 20_000_001);
        assert_eq!(s.balance0(&second), 1_000_000_000 - 20_000_000);
        assert_eq!(s.balance1(&second), 1_000_000_000 - 20_000_000);
        assert_eq!(s.vault.total_supply(), 40_000_001);
        assert_eq!(s.vault.user_count(), 2);

        let position = s.pool.get_position(&s.vault.address, &FULL_LOWER, &FULL_UPPER);
        assert_eq!(position.liquidity, 40_000_000);
    }

    #[test]
    #[should_panic(expected = "Error(Contract, #30)")]
    fn test_mint_slippage() {
        let s = setup();
        s.vault.update_ticks(&FULL_LOWER, &FULL_UPPER);
        let depositor = s.funded_user(1_000_000_000);
        s.vault.mint(&depositor, &20_000_000, &30_000_000, &20_000_000, &0);
    }

    #[test]
    #[should_panic(expected = "Error(Contract, #12)")]
    fn test_mint_zero_shares() {
        let s = setup();
        s.vault.update_ticks(&FULL_LOWER, &FULL_UPPER);
        let depositor = s.funded_user(1_000_000_000);
        s.vault.mint(&depositor, &0, &0, &0, &0);
    }

    #[test]
    #[should_panic(expected = "Error(Contract, #52)")]
    fn test_mint_negative_amount() {
        let s = setup();
        s.vault.update_ticks(&FULL_LOWER, &FULL_UPPER);
        let depositor = s.funded_user(1_000_000_000);
        s.vault.mint(&depositor, &-1, &1_000, &0, &0);
    }

    // === Burn ===

    #[test]
    fn test_burn_all_with_managing_fee() {
        let (s, depositor) = setup_with_depositor();
        s.vault.update_fees(&50, &250);

        let (amount0, amount1) = s.vault.burn(&depositor, &20_000_000, &0, &0);

        assert_eq!((amount0, amount1), (19_900_000, 19_900_000));
        let managing = s.events("managing_fee_earned");
        assert_eq!(managing.len(), 1);
        let earned: (Address, i128, i128) = managing.get_unchecked(0).try_into_val(&s.env).unwrap();
        assert_eq!(earned, (s.manager.clone(), 99_999, 99_999));
        let burned = s.events("burned");
        assert_eq!(burned.len(), 1);
        let redeemed: (Address, i128, i128, i128) = burned.get_unchecked(0).try_into_val(&s.env).unwrap();
        assert_eq!(redeemed, (depositor.clone(), 20_000_000, 19_900_000, 19_900_000));

        assert_eq!(s.vault.manager_balances(), (99_999, 99_999));
        assert_eq!(s.vault.balance(&depositor), 0);
        assert_eq!(s.vault.total_supply(), 0);
        assert_eq!(s.balance0(&depositor), 1_000_000_000 - 19_999_999 + 19_900_000);

        let record = s.vault.get_user_vault(&depositor);
        assert!(record.exists);
        assert_eq!((record.token0, record.token1), (0, 0));
        assert_eq!(
            s.pool
                .get_position(&s.vault.address, &FULL_LOWER, &FULL_UPPER)
                .liquidity,
            0
        );
    }

    #[test]
    fn test_partial_burn_scales_basis() {
        let (s, depositor) = setup_with_depositor();
        let (amount0, amount1) = s.vault.burn(&depositor, &5_000_000, &0, &0);

        assert!(amount0 > 0 && amount1 > 0);
        assert_eq!(s.vault.balance(&depositor), 15_000_000);
        let record = s.vault.get_user_vault(&depositor);
        assert_eq!(record.token0, 14_999_999);
        assert_eq!(record.token1, 14_999_999);
    }

    #[test]
    #[should_panic(expected = "Error(Contract, #13)")]
    fn test_burn_zero() {
        let (s, depositor) = setup_with_depositor();
        s.vault.burn(&depositor, &0, &0, &0);
    }

    #[test]
    #[should_panic(expected = "Error(Contract, #50)")]
    fn test_burn_more_than_balance() {
        let (s, depositor) = setup_with_depositor();
        s.vault.burn(&depositor, &20_000_001, &0, &0);
    }

    #[test]
    #[should_panic(expected = "Error(Contract, #30)")]
    fn test_burn_slippage() {
        let (s, depositor) = setup_with_depositor();
        s.vault.burn(&depositor, &20_000_000, &20_000_000, &0);
    }

    // === Pause ===

    #[test]
    fn test_pause_blocks_mint_and_burn() {
        let (s, depositor) = setup_with_depositor();
        s.vault.pause();
        assert!(s.vault.paused());

        assert_eq!(
            s.vault.try_mint(&depositor, &1_000_000, &1_000_000, &0, &0),
            Err(Ok(VaultError::Paused))
        );
        assert_eq!(
            s.vault.try_burn(&depositor, &1_000_000, &0, &0),
            Err(Ok(VaultError::Paused))
        );

        s.vault.unpause();
        assert!(!s.vault.paused());
        s.vault.burn(&depositor, &1_000_000, &0, &0);
    }

    // === Fees ===

    #[test]
    fn test_pull_fee_splits_performance_and_treasury() {
        let (s, _) = setup_with_depositor();
        s.trade(true, 1_000_000);

        let (pending0, pending1) = s.vault.get_current_fees();
        assert!(pending0 >= 2_999 && pending0 <= 3_000);
        assert_eq!(pending1, 0);

        let (fee0, fee1) = s.vault.pull_fee_from_pool();
        assert_eq!((fee0, fee1), (pending0, pending1));
        // Reported gross, before the performance and treasury cuts
        let earned = s.events("fees_earned");
        assert_eq!(earned.len(), 1);
        let gross: (i128, i128) = earned.get_unchecked(0).try_into_val(&s.env).unwrap();
        assert_eq!(gross, (pending0, pending1));
        assert_eq!(s.vault.manager_balances(), (fee0 * 250 / 10_000, 0));
        assert_eq!(s.vault.treasury_balances(), (fee0 * 100 / 10_000, 0));
        assert_eq!(s.balance0(&s.vault.address), fee0);

        // Nothing accrued since the last pull
        assert_eq!(s.vault.pull_fee_from_pool(), (0, 0));
        assert_eq!(s.vault.get_current_fees(), (0, 0));
    }

    #[test]
    fn test_underlying_excludes_reserved_fees() {
        let (s, _) = setup_with_depositor();
        s.trade(false, 1_000_000);

        let before = s.vault.get_underlying_balances();
        let (_, fee1) = s.vault.pull_fee_from_pool();
        let after = s.vault.get_underlying_balances();

        assert!(fee1 > 0);
        assert_eq!(before, after);
        let (_, manager1) = s.vault.manager_balances();
        let (_, treasury1) = s.vault.treasury_balances();
        assert_eq!(s.balance1(&s.vault.address), fee1);
        assert_eq!(manager1, fee1 * 250 / 10_000);
        assert_eq!(treasury1, fee1 * 100 / 10_000);
    }

    #[test]
    fn test_update_fees_validation() {
        let s = setup();
        assert_eq!(
            s.vault.try_update_fees(&10_001, &250),
            Err(Ok(VaultError::InvalidManagingFee))
        );
        assert_eq!(
            s.vault.try_update_fees(&0, &10_001),
            Err(Ok(VaultError::InvalidPerformanceFee))
        );
        // performance + treasury (100) may not exceed 100%
        assert_eq!(
            s.vault.try_update_fees(&0, &9_901),
            Err(Ok(VaultError::InvalidPerformanceFee))
        );

        s.vault.update_fees(&10_000, &9_900);
        let rates = s.vault.get_fee_rates();
        assert_eq!(rates.managing_fee_bps, 10_000);
        assert_eq!(rates.performance_fee_bps, 9_900);
    }

    #[test]
    fn test_update_fees_charges_accrued_at_old_rate() {
        let (s, _) = setup_with_depositor();
        s.trade(true, 1_000_000);
        let (pending0, _) = s.vault.get_current_fees();

        s.vault.update_fees(&0, &5_000);

        assert_eq!(s.vault.manager_balances(), (pending0 * 250 / 10_000, 0));
        assert_eq!(s.vault.get_current_fees(), (0, 0));
    }

    #[test]
    fn test_collect_manager_and_treasury() {
        let (s, depositor) = setup_with_depositor();
        s.vault.update_fees(&50, &250);
        s.trade(true, 1_000_000);
        s.vault.pull_fee_from_pool();
        s.vault.burn(&depositor, &20_000_000, &0, &0);

        let (manager0, manager1) = s.vault.manager_balances();
        let (treasury0, _) = s.vault.treasury_balances();
        assert!(manager0 > 0 && manager1 > 0 && treasury0 > 0);

        assert_eq!(s.vault.collect_manager(), (manager0, manager1));
        assert_eq!(s.balance0(&s.manager), manager0);
        assert_eq!(s.balance1(&s.manager), manager1);
        assert_eq!(s.vault.manager_balances(), (0, 0));

        let collected = s.vault.collect_treasury();
        assert_eq!(collected.0, treasury0);
        assert_eq!(s.balance0(&s.treasury), treasury0);
        assert_eq!(s.vault.treasury_balances(), (0, 0));
    }

    #[test]
    fn test_collect_treasury_requires_treasury() {
        let s = setup();
        s.vault.collect_treasury();
        let auths = s.env.auths();
        assert_eq!(auths.len(), 1);
        assert_eq!(auths[0].0, s.treasury);
    }

    // === Rebalancing ===

    #[test]
    fn test_remove_then_add_liquidity() {
        let (s, _) = setup_with_depositor();
        s.vault.remove_liquidity(&0, &0);

        assert!(!s.vault.in_position());
        assert_eq!(s.vault.upper_tick(), s.vault.lower_tick());
        assert_eq!(s.balance0(&s.vault.address), 19_999_999);
        assert_eq!(s.vault.get_underlying_balances(), (19_999_999, 19_999_999));

        let (liquidity, used0, used1) =
            s.vault
                .add_liquidity(&-600, &600, &i128::MAX, &i128::MAX, &0, &0);
        assert!(liquidity > 0);
        assert!(used0 <= 19_999_999 && used1 <= 19_999_999);
        assert!(s.vault.in_position());
        assert_eq!(s.vault.lower_tick(), -600);
        assert_eq!(s.vault.upper_tick(), 600);
        assert_eq!(
            s.pool.get_position(&s.vault.address, &-600, &600).liquidity,
            liquidity
        );
    }

    #[test]
    fn test_remove_liquidity_without_position() {
        let s = setup();
        s.vault.update_ticks(&FULL_LOWER, &FULL_UPPER);
        s.vault.remove_liquidity(&0, &0);

        let status = s.events("in_position_status_set");
        assert_eq!(status.len(), 1);
        assert!(!bool::try_from_val(&s.env, &status.get_unchecked(0)).unwrap());
        assert_eq!(s.events("fees_earned").len(), 0);
        assert_eq!(s.events("liquidity_removed").len(), 0);

        assert!(!s.vault.in_position());
        assert_eq!(s.vault.upper_tick(), FULL_LOWER);
    }

    #[test]
    fn test_mint_started_only_on_first_range() {
        let s = setup();
        s.vault.update_ticks(&FULL_LOWER, &FULL_UPPER);
        s.vault.remove_liquidity(&0, &0);

        s.vault.update_ticks(&-600, &600);
        let ticks = s.events("ticks_set");
        assert_eq!(ticks.len(), 1);
        let range: (i32, i32) = ticks.get_unchecked(0).try_into_val(&s.env).unwrap();
        assert_eq!(range, (-600, 600));
        assert_eq!(s.events("in_position_status_set").len(), 1);
        assert_eq!(s.events("mint_started").len(), 0);

        assert!(s.vault.mint_started());
        assert_eq!(s.vault.lower_tick(), -600);
        assert_eq!(s.vault.upper_tick(), 600);
    }

    #[test]
    #[should_panic(expected = "Error(Contract, #30)")]
    fn test_remove_liquidity_slippage() {
        let (s, _) = setup_with_depositor();
        s.vault.remove_liquidity(&30_000_000, &0);
    }

    #[test]
    fn test_add_liquidity_validation() {
        let (s, _) = setup_with_depositor();
        assert_eq!(
            s.vault.try_add_liquidity(&-600, &600, &1_000, &1_000, &0, &0),
            Err(Ok(VaultError::LiquidityAlreadyAdded))
        );

        s.vault.remove_liquidity(&0, &0);
        assert_eq!(
            s.vault.try_add_liquidity(&-601, &600, &1_000, &1_000, &0, &0),
            Err(Ok(VaultError::InvalidTicksSpacing))
        );
        assert_eq!(
            s.vault.try_add_liquidity(&-600, &443640, &1_000, &1_000, &0, &0),
            Err(Ok(VaultError::TicksOutOfRange))
        );
        assert_eq!(
            s.vault
                .try_add_liquidity(&-600, &600, &1_000_000, &1_000_000, &2_000_000, &0),
            Err(Ok(VaultError::SlippageExceedThreshold))
        );
    }

    #[test]
    fn test_mint_not_allowed_after_exit() {
        let (s, depositor) = setup_with_depositor();
        s.vault.remove_liquidity(&0, &0);
        let (amount0, amount1) = s.vault.burn(&depositor, &20_000_000, &0, &0);
        assert_eq!((amount0, amount1), (19_999_999, 19_999_999));

        assert_eq!(
            s.vault.try_mint(&depositor, &1_000_000, &1_000_000, &0, &0),
            Err(Ok(VaultError::MintNotAllowed))
        );

        s.vault.update_ticks(&-600, &600);
        assert!(s.vault.mint(&depositor, &1_000_000, &1_000_000, &0, &0) > 0);
    }

    #[test]
    fn test_mint_while_out_of_position() {
        let (s, _) = setup_with_depositor();
        s.vault.remove_liquidity(&0, &0);

        let second = s.funded_user(1_000_000_000);
        let shares = s.vault.mint(&second, &1_000_000, &1_000_000, &0, &0);

        assert!(shares > 0);
        // Deposits stay idle until the next add_liquidity
        assert!(s.balance0(&s.vault.address) > 19_999_999);
    }

    #[test]
    fn test_swap_idle_balances() {
        let (s, _) = setup_with_depositor();
        s.vault.remove_liquidity(&0, &0);
        // Put liquidity in the pool from another provider so the swap has depth
        let lp = s.funded_user(1_000_000_000);
        s.pool.mint(&lp, &-600, &600, &100_000_000);

        let (amount0, amount1) = s
            .vault
            .swap(&true, &1_000_000, &(MIN_SQRT_RATIO + 1), &900_000);

        assert_eq!(amount0, 1_000_000);
        assert!(amount1 < -900_000);
        assert_eq!(s.balance0(&s.vault.address), 19_999_999 - 1_000_000);
        assert_eq!(s.balance1(&s.vault.address), 19_999_999 - amount1);
    }

    #[test]
    fn test_swap_stops_at_price_limit() {
        let (s, _) = setup_with_depositor();
        s.vault.remove_liquidity(&0, &0);
        let lp = s.funded_user(1_000_000_000);
        s.pool.mint(&lp, &-600, &600, &100_000_000);
        let limit = Q96 - Q96 / 10_000;

        // The limit caps the output well below the requested minimum
        assert_eq!(
            s.vault.try_swap(&true, &5_000_000, &limit, &1_000_000),
            Err(Ok(VaultError::SlippageExceedThreshold))
        );

        let (amount0, amount1) = s.vault.swap(&true, &5_000_000, &limit, &0);
        let swapped = s.events("swapped");
        assert_eq!(swapped.len(), 1);
        let reported: (bool, i128, i128) = swapped.get_unchecked(0).try_into_val(&s.env).unwrap();
        assert_eq!(reported, (true, amount0, amount1));

        assert!(amount0 > 0 && amount0 < 5_000_000);
        assert!(amount1 < 0);
        assert_eq!(s.pool.get_state().sqrt_price_x96, limit);
        assert_eq!(s.balance0(&s.vault.address), 19_999_999 - amount0);
        assert_eq!(s.balance1(&s.vault.address), 19_999_999 - amount1);
        assert_eq!(
            TokenClient::new(&s.env, &s.token0).allowance(&s.vault.address, &s.pool.address),
            0
        );
    }

    #[test]
    fn test_swap_validation() {
        let (s, _) = setup_with_depositor();
        StellarAssetClient::new(&s.env, &s.token0).mint(&s.vault.address, &10_000);
        assert_eq!(
            s.vault.try_swap(&true, &0, &(MIN_SQRT_RATIO + 1), &0),
            Err(Ok(VaultError::InvalidAmount))
        );
        assert_eq!(
            s.vault
                .try_swap(&true, &10_000, &(MIN_SQRT_RATIO + 1), &1_000_000),
            Err(Ok(VaultError::SlippageExceedThreshold))
        );
    }

    // === Access control ===

    #[test]
    fn test_manager_operations_reject_other_callers() {
        let (s, _) = setup_with_depositor();
        s.env.mock_auths(&[]);

        assert!(s.vault.try_pause().is_err());
        assert!(s.vault.try_update_fees(&100, &100).is_err());
        assert!(s.vault.try_remove_liquidity(&0, &0).is_err());
        assert!(s.vault.try_collect_manager().is_err());
        assert!(s.vault.try_transfer_ownership(&Address::generate(&s.env)).is_err());
        assert!(s.vault.try_upgrade(&BytesN::from_array(&s.env, &[9u8; 32])).is_err());

        assert!(!s.vault.paused());
        assert_eq!(s.vault.get_fee_rates().managing_fee_bps, 0);
        assert!(s.vault.in_position());
        assert_eq!(s.vault.version(), 1);
    }

    #[test]
    fn test_transfer_ownership() {
        let s = setup();
        let new_manager = Address::generate(&s.env);
        s.vault.transfer_ownership(&new_manager);
        assert_eq!(s.vault.manager(), new_manager);

        s.vault.pause();
        let auths = s.env.auths();
        assert_eq!(auths[0].0, new_manager);
    }

    // === Share token ===

    #[test]
    fn test_transfer_moves_basis() {
        let (s, depositor) = setup_with_depositor();
        let receiver = Address::generate(&s.env);

        s.vault.transfer(&depositor, &receiver, &10_000_000);

        assert_eq!(s.vault.balance(&depositor), 10_000_000);
        assert_eq!(s.vault.balance(&receiver), 10_000_000);
        let sender_record = s.vault.get_user_vault(&depositor);
        let receiver_record = s.vault.get_user_vault(&receiver);
        assert_eq!(sender_record.token0, 9_999_999);
        assert_eq!(receiver_record.token0, 10_000_000);
        assert_eq!(sender_record.token0 + receiver_record.token0, 19_999_999);
        assert!(receiver_record.exists);
        assert_eq!(s.vault.user_count(), 2);
    }

    #[test]
    fn test_transfer_to_self_keeps_basis() {
        let (s, depositor) = setup_with_depositor();
        s.vault.transfer(&depositor, &depositor, &5_000_000);
        assert_eq!(s.vault.balance(&depositor), 20_000_000);
        assert_eq!(s.vault.get_user_vault(&depositor).token0, 19_999_999);
        assert_eq!(s.vault.user_count(), 1);
    }

    #[test]
    fn test_transfer_validation() {
        let (s, depositor) = setup_with_depositor();
        let receiver = Address::generate(&s.env);
        assert_eq!(
            s.vault.try_transfer(&depositor, &receiver, &-1),
            Err(Ok(VaultError::InvalidAmount))
        );
        assert_eq!(
            s.vault.try_transfer(&depositor, &receiver, &20_000_001),
            Err(Ok(VaultError::InsufficientBalance))
        );
    }

    #[test]
    fn test_transfer_from_spends_allowance() {
        let (s, depositor) = setup_with_depositor();
        let spender = Address::generate(&s.env);
        let receiver = Address::generate(&s.env);
        let expiration = s.env.ledger().sequence() + 100;

        s.vault.approve(&depositor, &spender, &6_000_000, &expiration);
        assert_eq!(s.vault.allowance(&depositor, &spender), 6_000_000);

        s.vault
            .transfer_from(&spender, &depositor, &receiver, &4_000_000);
        assert_eq!(s.vault.allowance(&depositor, &spender), 2_000_000);
        assert_eq!(s.vault.balance(&receiver), 4_000_000);

        assert_eq!(
            s.vault
                .try_transfer_from(&spender, &depositor, &receiver, &2_000_001),
            Err(Ok(VaultError::InsufficientAllowance))
        );
    }

    #[test]
    fn test_allowance_expires() {
        let (s, depositor) = setup_with_depositor();
        let spender = Address::generate(&s.env);
        let expiration = s.env.ledger().sequence() + 10;
        s.vault.approve(&depositor, &spender, &1_000, &expiration);

        s.env.ledger().with_mut(|li| li.sequence_number = expiration + 1);
        assert_eq!(s.vault.allowance(&depositor, &spender), 0);
    }

    #[test]
    fn test_transferred_shares_burn_for_receiver() {
        let (s, depositor) = setup_with_depositor();
        let receiver = Address::generate(&s.env);
        s.vault.transfer(&depositor, &receiver, &10_000_000);

        let (amount0, amount1) = s.vault.burn(&receiver, &10_000_000, &0, &0);
        assert!(amount0 > 0 && amount1 > 0);
        assert_eq!(s.balance0(&receiver), amount0);
        assert_eq!(s.vault.get_user_vault(&receiver).token0, 0);
    }

    // === Depositor enumeration ===

    #[test]
    fn test_get_user_vaults_pagination() {
        let (s, first) = setup_with_depositor();
        let second = s.funded_user(1_000_000_000);
        let third = s.funded_user(1_000_000_000);
        s.vault.mint(&second, &1_000_000, &1_000_000, &0, &0);
        s.vault.mint(&third, &1_000_000, &1_000_000, &0, &0);

        let all = s.vault.get_user_vaults(&0, &10);
        assert_eq!(all.len(), 3);
        assert_eq!(all.get(0).unwrap().user, first);
        assert_eq!(all.get(2).unwrap().user, third);

        let first_only = s.vault.get_user_vaults(&0, &0);
        assert_eq!(first_only.len(), 1);
        assert_eq!(first_only.get(0).unwrap().token0, 19_999_999);

        let tail = s.vault.get_user_vaults(&1, &2);
        assert_eq!(tail.len(), 2);
        assert_eq!(tail.get(0).unwrap().user, second);

        assert_eq!(s.vault.get_user_vaults(&5, &9).len(), 0);
    }

    #[test]
    fn test_burned_depositors_stay_listed() {
        let (s, depositor) = setup_with_depositor();
        s.vault.burn(&depositor, &20_000_000, &0, &0);
        assert_eq!(s.vault.user_count(), 1);
        assert!(s.vault.get_user_vault(&depositor).exists);
    }

    // === Share price ===

    #[test]
    fn test_underlying_by_share() {
        let (s, _) = setup_with_depositor();
        assert_eq!(
            s.vault.get_underlying_balances_by_share(&10_000_000),
            (9_999_999, 9_999_999)
        );
        assert_eq!(s.vault.get_underlying_balances_by_share(&0), (0, 0));
    }

    #[test]
    fn test_fees_accrue_to_remaining_holders() {
        let (s, depositor) = setup_with_depositor();
        let before = s.vault.get_underlying_balances_by_share(&10_000_000);
        s.trade(true, 1_000_000);
        s.trade(false, 1_000_000);
        s.vault.pull_fee_from_pool();

        let value = s.vault.get_underlying_balances_by_share(&10_000_000);
        assert!(value.0 + value.1 > before.0 + before.1);

        let (amount0, amount1) = s.vault.burn(&depositor, &20_000_000, &0, &0);
        assert!(amount0 + amount1 > 2 * 19_999_999 - 2);
        let (manager0, _) = s.vault.manager_balances();
        let (treasury0, _) = s.vault.treasury_balances();
        assert_eq!(s.balance0(&s.vault.address), manager0 + treasury0);
    }
}
