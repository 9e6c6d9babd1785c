use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum VaultError {
    AlreadyInitialized = 1,
    NotInitialized = 2,

    // Minting and burning
    MintNotStarted = 10,
    MintNotAllowed = 11,
    InvalidMintAmount = 12,
    InvalidBurnAmount = 13,
    ZeroUnderlyingBalance = 14,
    Paused = 15,

    // Position management
    TicksOutOfRange = 20,
    InvalidTicksSpacing = 21,
    TicksUpdateNotAllowed = 22,
    LiquidityAlreadyAdded = 23,

    // Economic bounds
    SlippageExceedThreshold = 30,

    // Fees
    InvalidManagingFee = 40,
    InvalidPerformanceFee = 41,

    // Share token
    InsufficientBalance = 50,
    InsufficientAllowance = 51,
    InvalidAmount = 52,
    AmountOverflow = 53,
}
