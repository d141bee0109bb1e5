//! Multi-segment curve walk.
//!
//! The curve is an ascending list of `(sqrt_price, liquidity)` breakpoints.
//! Scanning upward (quote in, base out) the interval below `curve[i]` uses
//! `curve[i].liquidity`; scanning downward the interval is bounded below by
//! `curve[i - 1].sqrt_price`, or by the pool's start price for the first
//! segment. Zero-price or zero-liquidity entries are configuration padding
//! and are skipped; padding only ever trails the real segments.

use crate::error::{CurveError, Error, MathError};
use crate::math::curve_math::{
    delta_base, delta_base_unchecked, delta_quote, delta_quote_unchecked,
    next_sqrt_price_from_input, next_sqrt_price_from_output,
};
use crate::math::fixed_point::{to_amount_u64, Rounding};
use crate::pool::state::PoolConfig;
use alloy_primitives::U256;

/// Result of an exact-in walk. `amount_left` is non-zero when the curve ran
/// out before the whole input was consumed; the quote layer decides whether
/// that is an error or a partial fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraversalResult {
    pub amount_left: u64,
    pub output_amount: u64,
    pub next_sqrt_price: u128,
}

/// Consume quote input moving the price up, producing base output.
pub fn swap_quote_to_base(
    config: &PoolConfig,
    sqrt_price: u128,
    amount_in: u64,
) -> Result<TraversalResult, Error> {
    let mut current = sqrt_price;
    let mut amount_left = amount_in;
    let mut output: u64 = 0;

    for segment in &config.curve {
        if segment.sqrt_price == 0 || segment.liquidity == 0 {
            continue;
        }
        if segment.sqrt_price <= current {
            continue;
        }

        let capacity =
            delta_quote_unchecked(current, segment.sqrt_price, segment.liquidity, Rounding::Up)?;
        if U256::from(amount_left) < capacity {
            let next =
                next_sqrt_price_from_input(current, segment.liquidity, amount_left, false)?;
            let out = delta_base(current, next, segment.liquidity, Rounding::Down)?;
            output = output.checked_add(out).ok_or(MathError::Overflow)?;
            return Ok(TraversalResult {
                amount_left: 0,
                output_amount: output,
                next_sqrt_price: next,
            });
        }

        // capacity <= amount_left, so it fits the 64-bit amount domain.
        amount_left -= to_amount_u64(capacity)?;
        let out = delta_base(current, segment.sqrt_price, segment.liquidity, Rounding::Down)?;
        output = output.checked_add(out).ok_or(MathError::Overflow)?;
        current = segment.sqrt_price;

        if amount_left == 0 {
            break;
        }
    }

    Ok(TraversalResult {
        amount_left,
        output_amount: output,
        next_sqrt_price: current,
    })
}

/// Consume base input moving the price down, producing quote output.
pub fn swap_base_to_quote(
    config: &PoolConfig,
    sqrt_price: u128,
    amount_in: u64,
) -> Result<TraversalResult, Error> {
    let mut current = sqrt_price;
    let mut amount_left = amount_in;
    let mut output: u64 = 0;

    for i in (0..config.curve.len()).rev() {
        let segment = config.curve[i];
        if segment.sqrt_price == 0 || segment.liquidity == 0 {
            continue;
        }
        let lower = if i == 0 {
            config.sqrt_start_price
        } else {
            config.curve[i - 1].sqrt_price
        };
        if lower >= current {
            continue;
        }

        let capacity = delta_base_unchecked(lower, current, segment.liquidity, Rounding::Up)?;
        if U256::from(amount_left) < capacity {
            let next = next_sqrt_price_from_input(current, segment.liquidity, amount_left, true)?;
            let out = delta_quote(next, current, segment.liquidity, Rounding::Down)?;
            output = output.checked_add(out).ok_or(MathError::Overflow)?;
            return Ok(TraversalResult {
                amount_left: 0,
                output_amount: output,
                next_sqrt_price: next,
            });
        }

        amount_left -= to_amount_u64(capacity)?;
        let out = delta_quote(lower, current, segment.liquidity, Rounding::Down)?;
        output = output.checked_add(out).ok_or(MathError::Overflow)?;
        current = lower;

        if amount_left == 0 {
            break;
        }
    }

    Ok(TraversalResult {
        amount_left,
        output_amount: output,
        next_sqrt_price: current,
    })
}

/// Quote input required to produce exactly `out_amount` of base. Fails when
/// the curve cannot produce that much output before its final segment.
pub fn in_amount_quote_to_base(
    config: &PoolConfig,
    sqrt_price: u128,
    out_amount: u64,
) -> Result<(u64, u128), Error> {
    let mut current = sqrt_price;
    let mut out_left = out_amount;
    let mut input: u64 = 0;

    for segment in &config.curve {
        if segment.sqrt_price == 0 || segment.liquidity == 0 {
            continue;
        }
        if segment.sqrt_price <= current {
            continue;
        }

        let capacity =
            delta_base_unchecked(current, segment.sqrt_price, segment.liquidity, Rounding::Down)?;
        if U256::from(out_left) <= capacity {
            let next = next_sqrt_price_from_output(current, segment.liquidity, out_left, false)?;
            let needed = delta_quote(current, next, segment.liquidity, Rounding::Up)?;
            input = input.checked_add(needed).ok_or(MathError::Overflow)?;
            return Ok((input, next));
        }

        out_left -= to_amount_u64(capacity)?;
        let needed = delta_quote(current, segment.sqrt_price, segment.liquidity, Rounding::Up)?;
        input = input.checked_add(needed).ok_or(MathError::Overflow)?;
        current = segment.sqrt_price;
    }

    Err(CurveError::InsufficientLiquidity.into())
}

/// Base input required to produce exactly `out_amount` of quote. Fails when
/// the requested output would push the price below the pool's start price.
pub fn in_amount_base_to_quote(
    config: &PoolConfig,
    sqrt_price: u128,
    out_amount: u64,
) -> Result<(u64, u128), Error> {
    let mut current = sqrt_price;
    let mut out_left = out_amount;
    let mut input: u64 = 0;

    for i in (0..config.curve.len()).rev() {
        let segment = config.curve[i];
        if segment.sqrt_price == 0 || segment.liquidity == 0 {
            continue;
        }
        let lower = if i == 0 {
            config.sqrt_start_price
        } else {
            config.curve[i - 1].sqrt_price
        };
        if lower >= current {
            continue;
        }

        let capacity = delta_quote_unchecked(lower, current, segment.liquidity, Rounding::Down)?;
        if U256::from(out_left) <= capacity {
            let next = next_sqrt_price_from_output(current, segment.liquidity, out_left, true)?;
            let needed = delta_base(next, current, segment.liquidity, Rounding::Up)?;
            input = input.checked_add(needed).ok_or(MathError::Overflow)?;
            return Ok((input, next));
        }

        out_left -= to_amount_u64(capacity)?;
        let needed = delta_base(lower, current, segment.liquidity, Rounding::Up)?;
        input = input.checked_add(needed).ok_or(MathError::Overflow)?;
        current = lower;
    }

    Err(CurveError::InsufficientLiquidity.into())
}
