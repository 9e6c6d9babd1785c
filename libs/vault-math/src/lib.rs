#![no_std]

pub mod fee_growth;
pub mod full_math;
pub mod liquidity_amounts;
pub mod share_math;
pub mod tick_math;

pub use fee_growth::*;
pub use full_math::*;
pub use liquidity_amounts::*;
pub use share_math::*;
pub use tick_math::*;
