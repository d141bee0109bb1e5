use crate::error::MathError;
use crate::{RESOLUTION, U256_Q128, U256_Q64};
use alloy_primitives::U256;

const U256_ONE: U256 = U256::ONE;
const U256_TWO: U256 = U256::from_limbs([2, 0, 0, 0]);
const U256_THREE: U256 = U256::from_limbs([3, 0, 0, 0]);

/// Rounding direction for fixed-point division.
///
/// The direction is never arbitrary: every call site rounds against the
/// counterparty so the pool is never short-changed by truncation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    Down,
    Up,
}

/// Computes `a * b / denominator` with full 256-bit precision and the
/// requested rounding, returning a `MathError` on overflow or division
/// by zero.
///
/// This is the single arithmetic kernel for the whole engine; every
/// price, amount and fee division funnels through it so that rounding
/// semantics cannot drift between call sites.
#[inline(always)]
pub fn mul_div(a: U256, b: U256, denominator: U256, rounding: Rounding) -> Result<U256, MathError> {
    if denominator.is_zero() {
        return Err(MathError::DivisionByZero);
    }

    // Degenerate fast path: nothing to divide, so no rounding applies.
    if denominator == U256_ONE || a.is_zero() || b.is_zero() {
        return a.checked_mul(b).ok_or(MathError::Overflow);
    }

    let result = mul_div_floor(a, b, denominator)?;

    match rounding {
        Rounding::Down => Ok(result),
        Rounding::Up => {
            if a.mul_mod(b, denominator) > U256::ZERO {
                if result >= U256::MAX {
                    return Err(MathError::Overflow);
                }
                Ok(result + U256_ONE)
            } else {
                Ok(result)
            }
        }
    }
}

// Full-precision floor(a * b / denominator) over a virtual 512-bit product,
// mulmod decomposition plus a Newton inverse of the odd denominator part.
fn mul_div_floor(a: U256, b: U256, mut denominator: U256) -> Result<U256, MathError> {
    let mm = a.mul_mod(b, U256::MAX);
    let mut prod0 = a.wrapping_mul(b);

    let (mut prod1, borrow1) = mm.overflowing_sub(prod0);
    if borrow1 {
        prod1 = prod1.wrapping_sub(U256_ONE);
    }

    if prod1.is_zero() {
        return Ok(prod0.wrapping_div(denominator));
    }

    if denominator <= prod1 {
        return Err(MathError::Overflow);
    }

    let remainder = a.mul_mod(b, denominator);
    let (prod0_new, borrow2) = prod0.overflowing_sub(remainder);
    prod0 = prod0_new;
    if borrow2 {
        prod1 = prod1.wrapping_sub(U256_ONE);
    }

    let twos = denominator & denominator.wrapping_neg();
    denominator = denominator.wrapping_div(twos);
    prod0 = prod0.wrapping_div(twos);

    let twos_adj = twos
        .wrapping_neg()
        .wrapping_div(twos)
        .wrapping_add(U256_ONE);
    prod0 |= prod1.wrapping_mul(twos_adj);

    let mut inv = U256_THREE.wrapping_mul(denominator) ^ U256_TWO;

    macro_rules! newton_iteration {
        () => {
            inv = inv.wrapping_mul(U256_TWO.wrapping_sub(denominator.wrapping_mul(inv)))
        };
    }

    newton_iteration!();
    newton_iteration!();
    newton_iteration!();
    newton_iteration!();
    newton_iteration!();
    newton_iteration!();

    Ok(prod0.wrapping_mul(inv))
}

/// Divides `a` by `b`, rounding the quotient up on a non-zero remainder.
#[inline(always)]
pub fn div_rounding_up(a: U256, b: U256) -> Result<U256, MathError> {
    if b.is_zero() {
        return Err(MathError::DivisionByZero);
    }
    let (quotient, remainder) = a.div_rem(b);
    if remainder.is_zero() {
        Ok(quotient)
    } else {
        Ok(quotient + U256_ONE)
    }
}

/// Raises a Q64.64 value to an integer power by repeated squaring.
///
/// A zero exponent returns Q64.64 one, a zero base returns zero, and a
/// negative exponent inverts the positive-power result via `2^128 / result`.
/// With `keep_scale == false` the result is shifted back down to an
/// unscaled integer.
pub fn pow_q64(base: u128, exponent: i32, keep_scale: bool) -> Result<u128, MathError> {
    if exponent == 0 {
        return Ok(if keep_scale { crate::ONE_Q64 } else { 1 });
    }
    if base == 0 {
        return Ok(0);
    }

    let invert = exponent < 0;
    let mut exp = exponent.unsigned_abs();
    let mut result = U256_Q64;
    let mut squared = U256::from(base);

    while exp > 0 {
        if exp & 1 == 1 {
            result = result.checked_mul(squared).ok_or(MathError::Overflow)? >> RESOLUTION;
        }
        exp >>= 1;
        if exp > 0 {
            squared = squared.checked_mul(squared).ok_or(MathError::Overflow)? >> RESOLUTION;
        }
    }

    if invert {
        if result.is_zero() {
            return Err(MathError::DivisionByZero);
        }
        result = U256_Q128.wrapping_div(result);
    }

    if !keep_scale {
        result >>= RESOLUTION;
    }

    u128::try_from(result).map_err(|_| MathError::Overflow)
}

/// Integer square root by Newton's method.
///
/// The iterate starts above the true root and decreases monotonically,
/// so the loop terminates as soon as it stops improving.
pub fn isqrt(value: U256) -> U256 {
    if value <= U256_ONE {
        return value;
    }

    let shift = (value.bit_len() + 1) / 2;
    let mut x = U256_ONE << shift;
    loop {
        let y = (x + value / x) >> 1;
        if y >= x {
            return x;
        }
        x = y;
    }
}

/// Checked subtraction; going below zero is a programming or configuration
/// bug in this engine, never a recoverable condition.
#[inline(always)]
pub fn safe_sub_u64(a: u64, b: u64) -> Result<u64, MathError> {
    a.checked_sub(b).ok_or(MathError::NegativeResidual)
}

#[inline(always)]
pub fn safe_sub_u128(a: u128, b: u128) -> Result<u128, MathError> {
    a.checked_sub(b).ok_or(MathError::NegativeResidual)
}

/// Narrows a 256-bit amount to the protocol's 64-bit token amount.
#[inline(always)]
pub(crate) fn to_amount_u64(value: U256) -> Result<u64, MathError> {
    u64::try_from(value).map_err(|_| MathError::AmountOverflow)
}

/// Narrows a 256-bit value to a 128-bit sqrt price or liquidity.
#[inline(always)]
pub(crate) fn to_u128(value: U256) -> Result<u128, MathError> {
    u128::try_from(value).map_err(|_| MathError::Overflow)
}
