#![no_std]

mod pool;
mod vault;

pub use pool::*;
pub use vault::*;

/// Q96 constant (2^96) for fixed-point sqrt prices
pub const Q96: u128 = 1 << 96;

/// Minimum tick index
/// Limited by u128 sqrt price representation
pub const MIN_TICK: i32 = -443636;

/// Maximum tick index
/// Limited by u128 sqrt price representation
pub const MAX_TICK: i32 = 443636;

/// Minimum sqrt price (at MIN_TICK)
pub const MIN_SQRT_RATIO: u128 = 18446743374134;

/// Maximum sqrt price (at MAX_TICK), bounded by u128::MAX
pub const MAX_SQRT_RATIO: u128 = 340275971719517849884101479065584693834;

/// Fee rates are expressed in basis points out of this denominator
pub const BPS_DENOMINATOR: u32 = 10_000;

/// Upper bound for the managing fee charged at burn time
pub const MAX_MANAGING_FEE_BPS: u32 = 10_000;

/// Upper bound for the performance fee charged on pool fees
pub const MAX_PERFORMANCE_FEE_BPS: u32 = 10_000;

/// Performance fee a fresh vault starts with (2.5%)
pub const DEFAULT_PERFORMANCE_FEE_BPS: u32 = 250;

/// Largest page returned by paginated views.
/// Keeps reads well under Soroban's per-transaction entry limit.
pub const MAX_PAGE_SIZE: u32 = 50;

/// Share token decimals, matching Stellar asset contracts
pub const SHARE_DECIMALS: u32 = 7;

/// Resolve an inclusive `[start, end]` page over `count` entries.
///
/// Returns the half-open index range to iterate, clamped to `count` and
/// capped at `MAX_PAGE_SIZE` entries. An empty collection or a start past
/// the end yields an empty range.
pub fn inclusive_page(start: u32, end: u32, count: u32) -> (u32, u32) {
    if count == 0 || start >= count || end < start {
        return (0, 0);
    }
    let last = if end >= count { count - 1 } else { end };
    let stop = last + 1;
    let capped = if stop - start > MAX_PAGE_SIZE {
        start + MAX_PAGE_SIZE
    } else {
        stop
    };
    (start, capped)
}
