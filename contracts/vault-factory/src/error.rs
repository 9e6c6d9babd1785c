use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum FactoryError {
    AlreadyInitialized = 1,
    NotInitialized = 2,

    // Vault creation
    ZeroPoolAddress = 10,
    ZeroManagerAddress = 11,
    ImplIsNotAContract = 12,
    VaultAlreadyExists = 13,

    // Upgrades
    VaultNotFound = 20,
    LengthMismatch = 21,

    InvalidTreasuryFee = 30,
}
