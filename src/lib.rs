//! Bonding-curve swap math and quote simulation in pure Rust.
//!
//! This crate is the off-chain pricing engine for a multi-segment
//! constant-liquidity bonding curve: given a pool configuration and a state
//! snapshot it computes exact swap quotes (exact-in, exact-out, partial fill),
//! trading/protocol/referral fees, and it can calibrate a full curve from
//! business-level parameters (market caps, supply splits, vesting). All
//! arithmetic reproduces the on-chain execution engine bit for bit, so quotes
//! can be used as minimum-out / maximum-in guards before submission.
//!
//! # Examples
//!
//! ## Quoting a swap
//! ```no_run
//! use bonding_curve_math::pool::quote::quote_exact_in;
//! use bonding_curve_math::pool::state::{PoolConfig, TradeDirection, VirtualPoolState};
//!
//! # fn demo(config: &PoolConfig, pool: &VirtualPoolState) -> Result<(), bonding_curve_math::error::Error> {
//! let quote = quote_exact_in(
//!     config,
//!     pool,
//!     TradeDirection::QuoteToBase,
//!     pool.activation_point, // current point (slot or timestamp)
//!     1_000_000_000,         // amount in
//!     50,                    // slippage, bps
//!     false,                 // no referral
//! )?;
//! println!("out: {}, min out: {}", quote.amount_out, quote.threshold_amount);
//! # Ok(())
//! # }
//! ```
//!
//! ## Building a curve
//! ```no_run
//! use bonding_curve_math::pool::builder::build_curve;
//! # use bonding_curve_math::pool::builder::BuildCurveParams;
//!
//! # fn demo(params: BuildCurveParams) -> Result<(), bonding_curve_math::error::Error> {
//! let config = build_curve(&params)?;
//! assert_eq!(
//!     config.curve.last().unwrap().sqrt_price,
//!     bonding_curve_math::MAX_SQRT_PRICE,
//! );
//! # Ok(())
//! # }
//! ```

pub use alloy_primitives::U256;

pub mod error;
pub mod fees;
pub mod math;
pub mod pool;

pub use pool::quote::QuoteResult;
pub use pool::state::{PoolConfig, VirtualPoolState};

/// Number of fractional bits in the fixed-point sqrt-price representation.
pub const RESOLUTION: u8 = 64;

/// 1.0 in Q64.64.
pub const ONE_Q64: u128 = 1u128 << RESOLUTION;

/// Fees are expressed as `numerator / FEE_DENOMINATOR`.
pub const FEE_DENOMINATOR: u64 = 1_000_000_000;

/// Hard cap on any fee numerator (99%).
pub const MAX_FEE_NUMERATOR: u64 = 990_000_000;

/// Smallest fee numerator a pool may be configured with (0.01%).
pub const MIN_FEE_NUMERATOR: u64 = 100_000;

/// Basis-point denominator.
pub const BASIS_POINT_MAX: u64 = 10_000;

/// Protocol-wide sqrt-price bounds, Q64.64.
pub const MIN_SQRT_PRICE: u128 = 4_295_048_016;
pub const MAX_SQRT_PRICE: u128 = 79_226_673_521_066_979_257_578_248_091;

/// Maximum number of segments a curve configuration may carry.
pub const MAX_CURVE_POINT: usize = 16;

/// Dynamic-fee scaling: the raw `control * (accumulator * bin_step)^2` value
/// is divided by this scale after adding the rounding offset.
pub const DYNAMIC_FEE_SCALING_FACTOR: u64 = 100_000_000_000;
pub const DYNAMIC_FEE_ROUNDING_OFFSET: u64 = 99_999_999_999;

pub(crate) const U256_Q64: U256 = U256::from_limbs([0, 1, 0, 0]);
pub(crate) const U256_Q128: U256 = U256::from_limbs([0, 0, 1, 0]);
