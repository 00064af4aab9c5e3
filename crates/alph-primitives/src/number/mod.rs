//! Range-checked unsigned integers.
//!
//! Both types expose two flavours of arithmetic: checked operations that
//! return `None` when the result leaves the valid range, and `*_unchecked`
//! operations that panic on violation. The latter are meant for call sites
//! where the caller has already established the bound.

mod uint256;
mod uint32;

pub use self::uint256::U256;
pub use self::uint32::U32;
