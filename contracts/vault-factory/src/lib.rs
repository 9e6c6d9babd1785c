#![no_std]
//! Vault factory: creates one liquidity vault per (token0, token1, fee),
//! keeps the registry of vaults and vault implementations, and is the only
//! party allowed to upgrade a vault's code.

mod error;
mod events;
mod storage;
mod types;

pub use error::FactoryError;
pub use types::FactoryConfig;

use soroban_sdk::{contract, contractimpl, Address, BytesN, Env, IntoVal, Symbol, Vec};
use vault_types::{inclusive_page, VaultInitData, VaultInitParams, BPS_DENOMINATOR};

#[contract]
pub struct VaultFactory;

#[contractimpl]
impl VaultFactory {
    pub fn initialize(
        env: Env,
        owner: Address,
        amm_factory: Address,
        treasury: Address,
        treasury_fee_bps: u32,
    ) -> Result<(), FactoryError> {
        if storage::is_initialized(&env) {
            return Err(FactoryError::AlreadyInitialized);
        }
        owner.require_auth();
        validate_treasury_fee(treasury_fee_bps)?;

        storage::set_owner(&env, &owner);
        storage::set_config(
            &env,
            &FactoryConfig {
                amm_factory,
                treasury,
                treasury_fee_bps,
            },
        );
        storage::extend_instance_ttl(&env);

        events::emit_ownership_transferred(&env, None, &owner);
        Ok(())
    }

    /// Allow vaults to be created from or upgraded to `wasm_hash`.
    /// The hash must already be uploaded to the network.
    pub fn register_implementation(env: Env, wasm_hash: BytesN<32>) -> Result<(), FactoryError> {
        require_owner(&env)?;
        storage::add_implementation(&env, &wasm_hash);
        events::emit_implementation_registered(&env, &wasm_hash);
        Ok(())
    }

    /// Deploy and initialize a vault for the pool of `token_a`/`token_b` at
    /// `fee`. The pool is created first when it does not exist and
    /// `init_data` carries a starting price.
    pub fn create_vault(
        env: Env,
        token_a: Address,
        token_b: Address,
        fee: u32,
        implementation: BytesN<32>,
        init_data: VaultInitData,
    ) -> Result<Address, FactoryError> {
        require_owner(&env)?;
        let config = storage::get_config(&env)?;

        let (token0, token1) = if token_a < token_b {
            (token_a, token_b)
        } else {
            (token_b, token_a)
        };
        if token0 == token1 {
            return Err(FactoryError::ZeroPoolAddress);
        }
        let manager = init_data.manager.ok_or(FactoryError::ZeroManagerAddress)?;
        if !storage::is_implementation(&env, &implementation) {
            return Err(FactoryError::ImplIsNotAContract);
        }
        if storage::get_vault(&env, &token0, &token1, fee).is_some() {
            return Err(FactoryError::VaultAlreadyExists);
        }

        let pool = resolve_pool(
            &env,
            &config.amm_factory,
            &token0,
            &token1,
            fee,
            init_data.initial_sqrt_price_x96,
        )?;

        // Deterministic salt from vault count + fee
        let vault_count = storage::get_vault_count(&env);
        let mut salt_bytes = [0u8; 32];
        salt_bytes[0..4].copy_from_slice(&vault_count.to_be_bytes());
        salt_bytes[4..8].copy_from_slice(&fee.to_be_bytes());
        let salt = BytesN::from_array(&env, &salt_bytes);

        let vault = env
            .deployer()
            .with_current_contract(salt)
            .deploy_v2(implementation.clone(), ());

        let params = VaultInitParams {
            factory: env.current_contract_address(),
            pool: pool.clone(),
            manager,
            treasury: config.treasury,
            treasury_fee_bps: config.treasury_fee_bps,
            implementation,
            name: init_data.name,
            symbol: init_data.symbol,
        };
        env.invoke_contract::<()>(
            &vault,
            &Symbol::new(&env, "initialize"),
            (params,).into_val(&env),
        );

        storage::add_vault(&env, &token0, &token1, fee, &vault);
        storage::extend_instance_ttl(&env);

        events::emit_vault_created(&env, &token0, &token1, fee, &pool, &vault);
        Ok(vault)
    }

    pub fn upgrade_vault(
        env: Env,
        vault: Address,
        implementation: BytesN<32>,
    ) -> Result<(), FactoryError> {
        require_owner(&env)?;
        validate_upgrade(&env, &vault, &implementation)?;
        upgrade(&env, &vault, &implementation);
        Ok(())
    }

    /// Upgrade several vaults at once. Every pair is validated before the
    /// first upgrade runs.
    pub fn upgrade_vaults(
        env: Env,
        vaults: Vec<Address>,
        implementations: Vec<BytesN<32>>,
    ) -> Result<(), FactoryError> {
        require_owner(&env)?;
        if vaults.len() != implementations.len() {
            return Err(FactoryError::LengthMismatch);
        }
        for (vault, implementation) in vaults.iter().zip(implementations.iter()) {
            validate_upgrade(&env, &vault, &implementation)?;
        }
        for (vault, implementation) in vaults.iter().zip(implementations.iter()) {
            upgrade(&env, &vault, &implementation);
        }
        Ok(())
    }

    pub fn transfer_ownership(env: Env, new_owner: Address) -> Result<(), FactoryError> {
        let owner = require_owner(&env)?;
        storage::set_owner(&env, &new_owner);
        events::emit_ownership_transferred(&env, Some(owner), &new_owner);
        Ok(())
    }

    /// Change the treasury for vaults created from now on
    pub fn set_treasury(env: Env, treasury: Address, treasury_fee_bps: u32) -> Result<(), FactoryError> {
        require_owner(&env)?;
        validate_treasury_fee(treasury_fee_bps)?;
        let mut config = storage::get_config(&env)?;
        config.treasury = treasury.clone();
        config.treasury_fee_bps = treasury_fee_bps;
        storage::set_config(&env, &config);
        events::emit_treasury_updated(&env, &treasury, treasury_fee_bps);
        Ok(())
    }

    // === Views ===

    /// Vaults at creation indices `start..=end`, clamped to the vault count
    /// and at most 50 entries.
    pub fn get_vault_addresses(env: Env, start: u32, end: u32) -> Vec<Address> {
        let (from, to) = inclusive_page(start, end, storage::get_vault_count(&env));
        let mut vaults = Vec::new(&env);
        for index in from..to {
            if let Some(vault) = storage::get_vault_at(&env, index) {
                vaults.push_back(vault);
            }
        }
        vaults
    }

    pub fn vault_count(env: Env) -> u32 {
        storage::get_vault_count(&env)
    }

    pub fn get_vault(env: Env, token_a: Address, token_b: Address, fee: u32) -> Option<Address> {
        let (token0, token1) = if token_a < token_b {
            (token_a, token_b)
        } else {
            (token_b, token_a)
        };
        storage::get_vault(&env, &token0, &token1, fee)
    }

    pub fn is_vault(env: Env, vault: Address) -> bool {
        storage::is_vault(&env, &vault)
    }

    pub fn is_implementation(env: Env, wasm_hash: BytesN<32>) -> bool {
        storage::is_implementation(&env, &wasm_hash)
    }

    pub fn owner(env: Env) -> Result<Address, FactoryError> {
        storage::get_owner(&env)
    }

    pub fn get_config(env: Env) -> Result<FactoryConfig, FactoryError> {
        storage::get_config(&env)
    }
}

fn require_owner(env: &Env) -> Result<Address, FactoryError> {
    let owner = storage::get_owner(env)?;
    owner.require_auth();
    Ok(owner)
}

fn validate_treasury_fee(treasury_fee_bps: u32) -> Result<(), FactoryError> {
    if treasury_fee_bps > BPS_DENOMINATOR {
        return Err(FactoryError::InvalidTreasuryFee);
    }
    Ok(())
}

fn validate_upgrade(env: &Env, vault: &Address, implementation: &BytesN<32>) -> Result<(), FactoryError> {
    if !storage::is_vault(env, vault) {
        return Err(FactoryError::VaultNotFound);
    }
    if !storage::is_implementation(env, implementation) {
        return Err(FactoryError::ImplIsNotAContract);
    }
    Ok(())
}

fn upgrade(env: &Env, vault: &Address, implementation: &BytesN<32>) {
    env.invoke_contract::<u32>(
        vault,
        &Symbol::new(env, "upgrade"),
        (implementation.clone(),).into_val(env),
    );
    events::emit_vault_impl_upgraded(env, vault, implementation);
}

/// Find the pool for the pair, creating it when a starting price is given
fn resolve_pool(
    env: &Env,
    amm_factory: &Address,
    token0: &Address,
    token1: &Address,
    fee: u32,
    initial_sqrt_price_x96: Option<u128>,
) -> Result<Address, FactoryError> {
    let existing: Option<Address> = env.invoke_contract(
        amm_factory,
        &Symbol::new(env, "get_pool"),
        (token0.clone(), token1.clone(), fee).into_val(env),
    );
    if let Some(pool) = existing {
        return Ok(pool);
    }
    let sqrt_price_x96 = initial_sqrt_price_x96.ok_or(FactoryError::ZeroPoolAddress)?;
    Ok(env.invoke_contract(
        amm_factory,
        &Symbol::new(env, "create_pool"),
        (token0.clone(), token1.clone(), fee, sqrt_price_x96).into_val(env),
    ))
}
