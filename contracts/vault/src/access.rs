//! Authorization guards run at the top of every mutating entry point.
//!
//! The vault manager operates the vault. The factory alone may replace its
//! code, and the treasury alone collects treasury fees.

use crate::error::VaultError;
use crate::storage;
use soroban_sdk::Env;
use vault_types::{VaultConfig, VaultState};

/// Load state and require the current manager's authorization
pub fn require_manager(env: &Env) -> Result<VaultState, VaultError> {
    let state = storage::get_state(env)?;
    state.manager.require_auth();
    Ok(state)
}

pub fn require_factory(env: &Env) -> Result<VaultConfig, VaultError> {
    let config = storage::get_config(env)?;
    config.factory.require_auth();
    Ok(config)
}

pub fn require_treasury(env: &Env) -> Result<VaultConfig, VaultError> {
    let config = storage::get_config(env)?;
    config.treasury.require_auth();
    Ok(config)
}

pub fn require_not_paused(state: &VaultState) -> Result<(), VaultError> {
    if state.paused {
        return Err(VaultError::Paused);
    }
    Ok(())
}
