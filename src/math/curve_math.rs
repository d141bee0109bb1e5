use crate::error::{CurveError, Error, MathError};
use crate::math::fixed_point::{div_rounding_up, mul_div, to_amount_u64, to_u128, Rounding};
use crate::U256_Q128;
use alloy_primitives::U256;

/// Base-token amount between two sqrt prices for a given liquidity:
/// `L * (P_upper - P_lower) / (P_upper * P_lower)`, full 256-bit precision.
///
/// This is the unchecked 256-bit core used by both quoting and curve
/// construction; quoting goes through [`delta_base`], which also enforces
/// the protocol's 64-bit amount ceiling.
pub fn delta_base_unchecked(
    sqrt_lower: u128,
    sqrt_upper: u128,
    liquidity: u128,
    rounding: Rounding,
) -> Result<U256, Error> {
    if sqrt_upper < sqrt_lower {
        return Err(CurveError::InvertedPriceRange.into());
    }
    if sqrt_lower == 0 || sqrt_upper == 0 {
        return Err(CurveError::SqrtPriceIsZero.into());
    }

    let delta = U256::from(sqrt_upper - sqrt_lower);
    let denominator = U256::from(sqrt_lower) * U256::from(sqrt_upper);

    mul_div(U256::from(liquidity), delta, denominator, rounding).map_err(Error::from)
}

/// [`delta_base_unchecked`] narrowed to the 64-bit token-amount domain.
pub fn delta_base(
    sqrt_lower: u128,
    sqrt_upper: u128,
    liquidity: u128,
    rounding: Rounding,
) -> Result<u64, Error> {
    let amount = delta_base_unchecked(sqrt_lower, sqrt_upper, liquidity, rounding)?;
    to_amount_u64(amount).map_err(Error::from)
}

/// Quote-token amount between two sqrt prices: `L * (P_upper - P_lower)`,
/// scaled down by `2^128` (the two Q64.64 factors collapse into one).
///
/// Rounding up uses ceiling division; rounding down is a plain shift.
pub fn delta_quote_unchecked(
    sqrt_lower: u128,
    sqrt_upper: u128,
    liquidity: u128,
    rounding: Rounding,
) -> Result<U256, Error> {
    if sqrt_upper < sqrt_lower {
        return Err(CurveError::InvertedPriceRange.into());
    }

    let product = U256::from(liquidity) * U256::from(sqrt_upper - sqrt_lower);

    match rounding {
        Rounding::Up => div_rounding_up(product, U256_Q128).map_err(Error::from),
        Rounding::Down => Ok(product >> 128),
    }
}

/// [`delta_quote_unchecked`] narrowed to the 64-bit token-amount domain.
pub fn delta_quote(
    sqrt_lower: u128,
    sqrt_upper: u128,
    liquidity: u128,
    rounding: Rounding,
) -> Result<u64, Error> {
    let amount = delta_quote_unchecked(sqrt_lower, sqrt_upper, liquidity, rounding)?;
    to_amount_u64(amount).map_err(Error::from)
}

/// Next sqrt price after consuming `amount_in` of one token.
///
/// Base input moves the price down and rounds the quotient up:
/// `ceil(P * L / (L + dx * P))`. Quote input moves the price up and rounds
/// the added quotient down: `P + floor(dy * 2^128 / L)`. Both directions
/// round against the trader.
pub fn next_sqrt_price_from_input(
    sqrt_price: u128,
    liquidity: u128,
    amount_in: u64,
    base_for_quote: bool,
) -> Result<u128, Error> {
    if sqrt_price == 0 {
        return Err(CurveError::SqrtPriceIsZero.into());
    }
    if liquidity == 0 {
        return Err(CurveError::LiquidityIsZero.into());
    }
    if amount_in == 0 {
        return Ok(sqrt_price);
    }

    let liquidity_256 = U256::from(liquidity);
    if base_for_quote {
        let product = U256::from(amount_in) * U256::from(sqrt_price);
        let denominator = liquidity_256
            .checked_add(product)
            .ok_or(MathError::Overflow)?;
        let next = mul_div(liquidity_256, U256::from(sqrt_price), denominator, Rounding::Up)?;
        to_u128(next).map_err(Error::from)
    } else {
        let quotient = mul_div(
            U256::from(amount_in),
            U256_Q128,
            liquidity_256,
            Rounding::Down,
        )?;
        let next = U256::from(sqrt_price)
            .checked_add(quotient)
            .ok_or(MathError::Overflow)?;
        to_u128(next).map_err(Error::from)
    }
}

/// Next sqrt price after producing `amount_out` of one token.
///
/// Quote output moves the price down, `P - ceil(dy * 2^128 / L)`, failing
/// with `NegativeResidual` when the price would cross zero. Base output
/// moves the price up, `ceil(P * L / (L - dx * P))`, failing with
/// `InsufficientLiquidity` when the denominator would not stay positive.
pub fn next_sqrt_price_from_output(
    sqrt_price: u128,
    liquidity: u128,
    amount_out: u64,
    base_for_quote: bool,
) -> Result<u128, Error> {
    if sqrt_price == 0 {
        return Err(CurveError::SqrtPriceIsZero.into());
    }
    if liquidity == 0 {
        return Err(CurveError::LiquidityIsZero.into());
    }
    if amount_out == 0 {
        return Ok(sqrt_price);
    }

    let liquidity_256 = U256::from(liquidity);
    if base_for_quote {
        let quotient = mul_div(U256::from(amount_out), U256_Q128, liquidity_256, Rounding::Up)?;
        let price = U256::from(sqrt_price);
        if price <= quotient {
            return Err(MathError::NegativeResidual.into());
        }
        to_u128(price - quotient).map_err(Error::from)
    } else {
        let product = U256::from(amount_out) * U256::from(sqrt_price);
        if liquidity_256 <= product {
            return Err(CurveError::InsufficientLiquidity.into());
        }
        let denominator = liquidity_256 - product;
        let next = mul_div(liquidity_256, U256::from(sqrt_price), denominator, Rounding::Up)?;
        to_u128(next).map_err(Error::from)
    }
}

/// Liquidity that makes `delta_quote(sqrt_lower, sqrt_upper, L)` equal the
/// given quote amount. Curve-construction inverse; rounds down.
pub fn initial_liquidity_from_delta_quote(
    quote_amount: u64,
    sqrt_lower: u128,
    sqrt_upper: u128,
) -> Result<u128, Error> {
    if sqrt_upper <= sqrt_lower {
        return Err(CurveError::InvertedPriceRange.into());
    }

    let liquidity = mul_div(
        U256::from(quote_amount),
        U256_Q128,
        U256::from(sqrt_upper - sqrt_lower),
        Rounding::Down,
    )?;
    to_u128(liquidity).map_err(Error::from)
}

/// Liquidity that makes `delta_base(sqrt_lower, sqrt_upper, L)` equal the
/// given base amount: `dx * P_upper * P_lower / (P_upper - P_lower)`.
pub fn initial_liquidity_from_delta_base(
    base_amount: u64,
    sqrt_upper: u128,
    sqrt_lower: u128,
) -> Result<u128, Error> {
    if sqrt_upper <= sqrt_lower {
        return Err(CurveError::InvertedPriceRange.into());
    }
    if sqrt_lower == 0 {
        return Err(CurveError::SqrtPriceIsZero.into());
    }

    let numerator = U256::from(base_amount) * U256::from(sqrt_upper);
    let liquidity = mul_div(
        numerator,
        U256::from(sqrt_lower),
        U256::from(sqrt_upper - sqrt_lower),
        Rounding::Down,
    )?;
    to_u128(liquidity).map_err(Error::from)
}
