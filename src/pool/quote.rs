//! Swap-quote orchestration: fee model plus curve traversal, with
//! slippage bounds suitable for minimum-out / maximum-in guards.

use crate::error::{CurveError, Error, MathError};
use crate::fees::{FeeMode, FeeOnAmountResult};
use crate::math::fixed_point::div_rounding_up;
use crate::pool::state::{PoolConfig, TradeDirection, VirtualPoolState};
use crate::pool::traversal;
use crate::{BASIS_POINT_MAX, FEE_DENOMINATOR};
use alloy_primitives::U256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SwapFees {
    pub trading_fee: u64,
    pub protocol_fee: u64,
    pub referral_fee: u64,
}

impl From<FeeOnAmountResult> for SwapFees {
    fn from(result: FeeOnAmountResult) -> Self {
        SwapFees {
            trading_fee: result.trading_fee,
            protocol_fee: result.protocol_fee,
            referral_fee: result.referral_fee,
        }
    }
}

/// One answered quote. `threshold_amount` is the slippage guard: minimum
/// output for exact-in quotes, maximum input for exact-out quotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteResult {
    pub amount_in: u64,
    pub amount_out: u64,
    pub threshold_amount: u64,
    pub sqrt_price_before: u128,
    pub next_sqrt_price: u128,
    pub fees: SwapFees,
}

fn validate(
    config: &PoolConfig,
    pool: &VirtualPoolState,
    amount: u64,
    slippage_bps: u64,
) -> Result<(), Error> {
    if amount == 0 {
        return Err(CurveError::AmountIsZero.into());
    }
    if pool.quote_reserve >= config.migration_quote_threshold {
        return Err(CurveError::PoolCompleted.into());
    }
    if slippage_bps > BASIS_POINT_MAX {
        return Err(CurveError::InvalidSlippage.into());
    }
    Ok(())
}

fn min_amount_out(amount_out: u64, slippage_bps: u64) -> u64 {
    ((u128::from(amount_out) * u128::from(BASIS_POINT_MAX - slippage_bps))
        / u128::from(BASIS_POINT_MAX)) as u64
}

fn max_amount_in(amount_in: u64, slippage_bps: u64) -> Result<u64, Error> {
    let bound = (u128::from(amount_in) * u128::from(BASIS_POINT_MAX + slippage_bps))
        / u128::from(BASIS_POINT_MAX);
    u64::try_from(bound).map_err(|_| MathError::AmountOverflow.into())
}

/// Gross amount whose net remainder after `fee_numerator` covers `net`:
/// `ceil(net * FEE_DENOMINATOR / (FEE_DENOMINATOR - fee_numerator))`.
fn gross_up(net: u64, fee_numerator: u64) -> Result<u64, Error> {
    let gross = div_rounding_up(
        U256::from(net) * U256::from(FEE_DENOMINATOR),
        U256::from(FEE_DENOMINATOR - fee_numerator),
    )?;
    u64::try_from(gross).map_err(|_| MathError::AmountOverflow.into())
}

/// Quote a swap of exactly `amount_in`, failing when the curve cannot
/// absorb the whole amount.
pub fn quote_exact_in(
    config: &PoolConfig,
    pool: &VirtualPoolState,
    trade_direction: TradeDirection,
    current_point: u64,
    amount_in: u64,
    slippage_bps: u64,
    has_referral: bool,
) -> Result<QuoteResult, Error> {
    validate(config, pool, amount_in, slippage_bps)?;

    let fee_mode = FeeMode::new(config.collect_fee_mode, trade_direction, has_referral);
    let handler = config.fees.base_fee.handler(config.collect_fee_mode)?;
    let base_numerator = handler.numerator_from_included_amount(
        current_point,
        pool.activation_point,
        trade_direction,
        amount_in,
    )?;
    let fee_numerator = config.fees.total_fee_numerator(
        base_numerator,
        pool.volatility_tracker.volatility_accumulator,
    )?;

    let (traversal_in, input_fees) = if fee_mode.fee_on_input {
        let split = config
            .fees
            .split_fees(amount_in, fee_numerator, fee_mode.has_referral)?;
        (split.amount, Some(split))
    } else {
        (amount_in, None)
    };

    let result = match trade_direction {
        TradeDirection::QuoteToBase => {
            traversal::swap_quote_to_base(config, pool.sqrt_price, traversal_in)?
        }
        TradeDirection::BaseToQuote => {
            traversal::swap_base_to_quote(config, pool.sqrt_price, traversal_in)?
        }
    };
    if result.amount_left > 0 {
        return Err(CurveError::InsufficientLiquidity.into());
    }

    let (amount_out, fees) = match input_fees {
        Some(split) => (result.output_amount, split),
        None => {
            let split = config.fees.split_fees(
                result.output_amount,
                fee_numerator,
                fee_mode.has_referral,
            )?;
            (split.amount, split)
        }
    };

    Ok(QuoteResult {
        amount_in,
        amount_out,
        threshold_amount: min_amount_out(amount_out, slippage_bps),
        sqrt_price_before: pool.sqrt_price,
        next_sqrt_price: result.next_sqrt_price,
        fees: fees.into(),
    })
}

/// Quote the input required to receive exactly `amount_out`.
pub fn quote_exact_out(
    config: &PoolConfig,
    pool: &VirtualPoolState,
    trade_direction: TradeDirection,
    current_point: u64,
    amount_out: u64,
    slippage_bps: u64,
    has_referral: bool,
) -> Result<QuoteResult, Error> {
    validate(config, pool, amount_out, slippage_bps)?;

    let fee_mode = FeeMode::new(config.collect_fee_mode, trade_direction, has_referral);
    let handler = config.fees.base_fee.handler(config.collect_fee_mode)?;

    // When fees come out of the output, the numerator does not depend on
    // the trade size (the rate limiter only ever charges on input), so the
    // requested net output can be grossed up before traversal.
    let (curve_out, output_fee_numerator) = if fee_mode.fee_on_input {
        (amount_out, None)
    } else {
        let base_numerator = handler.numerator_from_included_amount(
            current_point,
            pool.activation_point,
            trade_direction,
            0,
        )?;
        let fee_numerator = config.fees.total_fee_numerator(
            base_numerator,
            pool.volatility_tracker.volatility_accumulator,
        )?;
        (gross_up(amount_out, fee_numerator)?, Some(fee_numerator))
    };

    let (net_input, next_sqrt_price) = match trade_direction {
        TradeDirection::QuoteToBase => {
            traversal::in_amount_quote_to_base(config, pool.sqrt_price, curve_out)?
        }
        TradeDirection::BaseToQuote => {
            traversal::in_amount_base_to_quote(config, pool.sqrt_price, curve_out)?
        }
    };

    let (amount_in, fees) = match output_fee_numerator {
        Some(fee_numerator) => {
            let split =
                config
                    .fees
                    .split_fees(curve_out, fee_numerator, fee_mode.has_referral)?;
            (net_input, split)
        }
        None => {
            // Fees on input: recover the numerator from the net curve
            // input, then gross the input up by it.
            let base_numerator = handler.numerator_from_excluded_amount(
                current_point,
                pool.activation_point,
                trade_direction,
                net_input,
            )?;
            let fee_numerator = config.fees.total_fee_numerator(
                base_numerator,
                pool.volatility_tracker.volatility_accumulator,
            )?;
            let gross_input = gross_up(net_input, fee_numerator)?;
            let split = config
                .fees
                .split_fees(gross_input, fee_numerator, fee_mode.has_referral)?;
            (gross_input, split)
        }
    };

    Ok(QuoteResult {
        amount_in,
        amount_out,
        threshold_amount: max_amount_in(amount_in, slippage_bps)?,
        sqrt_price_before: pool.sqrt_price,
        next_sqrt_price,
        fees: fees.into(),
    })
}

/// Exact-in quote that fills as much as the curve allows instead of
/// failing when liquidity runs out before the whole amount is consumed.
pub fn quote_partial_fill(
    config: &PoolConfig,
    pool: &VirtualPoolState,
    trade_direction: TradeDirection,
    current_point: u64,
    amount_in: u64,
    slippage_bps: u64,
    has_referral: bool,
) -> Result<QuoteResult, Error> {
    validate(config, pool, amount_in, slippage_bps)?;

    let fee_mode = FeeMode::new(config.collect_fee_mode, trade_direction, has_referral);
    let handler = config.fees.base_fee.handler(config.collect_fee_mode)?;
    let base_numerator = handler.numerator_from_included_amount(
        current_point,
        pool.activation_point,
        trade_direction,
        amount_in,
    )?;
    let fee_numerator = config.fees.total_fee_numerator(
        base_numerator,
        pool.volatility_tracker.volatility_accumulator,
    )?;

    let (traversal_in, fees_on_input) = if fee_mode.fee_on_input {
        let split = config
            .fees
            .split_fees(amount_in, fee_numerator, fee_mode.has_referral)?;
        (split.amount, true)
    } else {
        (amount_in, false)
    };

    let result = match trade_direction {
        TradeDirection::QuoteToBase => {
            traversal::swap_quote_to_base(config, pool.sqrt_price, traversal_in)?
        }
        TradeDirection::BaseToQuote => {
            traversal::swap_base_to_quote(config, pool.sqrt_price, traversal_in)?
        }
    };
    let consumed_net = traversal_in - result.amount_left;

    let (consumed_in, amount_out, fees) = if fees_on_input {
        // Re-derive the gross amount that corresponds to the net input the
        // curve actually consumed, never exceeding what was offered.
        let consumed_gross = gross_up(consumed_net, fee_numerator)?.min(amount_in);
        let split = config
            .fees
            .split_fees(consumed_gross, fee_numerator, fee_mode.has_referral)?;
        (consumed_gross, result.output_amount, split)
    } else {
        let split = config.fees.split_fees(
            result.output_amount,
            fee_numerator,
            fee_mode.has_referral,
        )?;
        (consumed_net, split.amount, split)
    };

    Ok(QuoteResult {
        amount_in: consumed_in,
        amount_out,
        threshold_amount: min_amount_out(amount_out, slippage_bps),
        sqrt_price_before: pool.sqrt_price,
        next_sqrt_price: result.next_sqrt_price,
        fees: fees.into(),
    })
}
