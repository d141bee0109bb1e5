//! Curve construction: calibrate a full `PoolConfig` from business-level
//! parameters (market caps, supply splits, vesting schedules).
//!
//! Human-unit inputs (whole-token supplies, market caps and thresholds as
//! `f64`) are floored into raw integer amounts once at this boundary; all
//! curve arithmetic after that point is integer-exact and uses the same
//! rounding rules as quoting, so a built curve round-trips through the
//! quote engine without drift.

use crate::error::{BuildError, Error, MathError};
use crate::math::curve_math::{
    delta_base, delta_quote, initial_liquidity_from_delta_base, initial_liquidity_from_delta_quote,
};
use crate::math::fixed_point::{isqrt, mul_div, to_u128, Rounding};
use crate::pool::state::{
    ActivationType, BaseFeeConfig, CollectFeeMode, CurveSegment, DynamicFeeConfig, PoolConfig,
    PoolFeesConfig,
};
use crate::{MAX_CURVE_POINT, MAX_SQRT_PRICE};
use alloy_primitives::U256;

/// Vesting schedule carved out of the total supply before the tradable
/// amount is derived. Amounts are in whole tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct LockedVestingParams {
    pub amount_per_period: u64,
    pub number_of_period: u64,
    pub cliff_unlock_amount: u64,
    pub frequency: u64,
    pub cliff_duration_from_migration_time: u64,
}

impl LockedVestingParams {
    pub fn total_amount(&self) -> Result<u64, Error> {
        let periodic = self
            .amount_per_period
            .checked_mul(self.number_of_period)
            .ok_or(BuildError::CapacityExceeded("locked vesting amount"))?;
        self.cliff_unlock_amount
            .checked_add(periodic)
            .ok_or_else(|| BuildError::CapacityExceeded("locked vesting amount").into())
    }
}

/// Inputs shared by every constructor: supply, decimals, allocations and
/// the fee/pool knobs passed straight through to the resulting config.
#[derive(Debug, Clone)]
pub struct CommonBuildParams {
    /// Whole tokens, before decimal scaling.
    pub total_token_supply: u64,
    pub token_base_decimal: u8,
    pub token_quote_decimal: u8,
    pub locked_vesting: LockedVestingParams,
    /// Whole tokens kept out of the curve entirely.
    pub leftover: u64,
    pub base_fee: BaseFeeConfig,
    pub dynamic_fee: DynamicFeeConfig,
    pub collect_fee_mode: CollectFeeMode,
    pub activation_type: ActivationType,
    pub protocol_fee_percent: u8,
    pub referral_fee_percent: u8,
}

#[derive(Debug, Clone)]
pub struct BuildCurveParams {
    pub base: CommonBuildParams,
    /// Percentage of the total supply sold by the time the pool migrates,
    /// in (0, 100).
    pub percentage_supply_on_migration: f64,
    /// Quote tokens (whole units) accumulated at migration.
    pub migration_quote_threshold: f64,
}

#[derive(Debug, Clone)]
pub struct BuildCurveWithMarketCapParams {
    pub base: CommonBuildParams,
    pub initial_market_cap: f64,
    pub migration_market_cap: f64,
}

#[derive(Debug, Clone)]
pub struct BuildCurveWithTwoSegmentsParams {
    pub base: CommonBuildParams,
    pub initial_market_cap: f64,
    pub migration_market_cap: f64,
    pub percentage_supply_on_migration: f64,
}

#[derive(Debug, Clone)]
pub struct BuildCurveWithLiquidityWeightsParams {
    pub base: CommonBuildParams,
    pub initial_market_cap: f64,
    pub migration_market_cap: f64,
    /// Per-segment liquidity multipliers; the segment count equals the
    /// weight count.
    pub liquidity_weights: Vec<f64>,
}

fn pow10(decimal: u8) -> Result<u64, Error> {
    10u64
        .checked_pow(u32::from(decimal))
        .ok_or_else(|| BuildError::CapacityExceeded("token decimals").into())
}

/// Floor a human-unit quantity into raw token units.
fn to_raw(human: f64, decimal: u8, what: &'static str) -> Result<u64, Error> {
    if !human.is_finite() || human < 0.0 {
        return Err(BuildError::NonFiniteParameter(what).into());
    }
    let raw = human * 10f64.powi(i32::from(decimal));
    if raw >= u64::MAX as f64 {
        return Err(BuildError::CapacityExceeded(what).into());
    }
    Ok(raw as u64)
}

/// Q64.64 sqrt price implied by a market cap over the whole supply.
fn sqrt_price_from_market_cap(
    market_cap: f64,
    total_token_supply: u64,
    base_decimal: u8,
    quote_decimal: u8,
) -> Result<u128, Error> {
    if !market_cap.is_finite() || market_cap <= 0.0 {
        return Err(BuildError::NonFiniteParameter("market cap").into());
    }
    let price = market_cap / total_token_supply as f64;
    let scaled = price * 10f64.powi(i32::from(quote_decimal) - i32::from(base_decimal));
    let sqrt = scaled.sqrt() * 2f64.powi(64);
    if !sqrt.is_finite() || sqrt < 1.0 {
        return Err(BuildError::NonFiniteParameter("market cap").into());
    }
    Ok(sqrt as u128)
}

struct SupplySplit {
    total_supply: u64,
    tradable: u64,
}

impl CommonBuildParams {
    /// Raw total supply and the portion left after vesting and leftover
    /// carve-outs.
    fn supply_split(&self) -> Result<SupplySplit, Error> {
        let base_unit = pow10(self.token_base_decimal)?;
        let total_supply = self
            .total_token_supply
            .checked_mul(base_unit)
            .ok_or(BuildError::CapacityExceeded("total supply"))?;
        let vesting = self
            .locked_vesting
            .total_amount()?
            .checked_mul(base_unit)
            .ok_or(BuildError::CapacityExceeded("locked vesting amount"))?;
        let leftover = self
            .leftover
            .checked_mul(base_unit)
            .ok_or(BuildError::CapacityExceeded("leftover amount"))?;
        let tradable = total_supply
            .checked_sub(vesting)
            .and_then(|v| v.checked_sub(leftover))
            .ok_or(BuildError::UnsolvableCurve)?;
        Ok(SupplySplit {
            total_supply,
            tradable,
        })
    }
}

/// Derive migration and start prices from the integer amounts, build the
/// first segment, then hand off to [`assemble_config`].
fn finish_from_threshold(
    common: &CommonBuildParams,
    migration_quote_threshold: u64,
    migration_base_amount: u64,
    swap_amount: u64,
) -> Result<PoolConfig, Error> {
    if migration_quote_threshold == 0 || migration_base_amount == 0 || swap_amount == 0 {
        return Err(BuildError::UnsolvableCurve.into());
    }

    // P_migration = sqrt(threshold / migration_base) in Q64.64.
    let sqrt_migration_price = to_u128(isqrt(
        (U256::from(migration_quote_threshold) << 128) / U256::from(migration_base_amount),
    ))?;
    // The start price that makes the first segment hold exactly the swap
    // amount of base.
    let sqrt_start_price = to_u128(mul_div(
        U256::from(sqrt_migration_price),
        U256::from(migration_base_amount),
        U256::from(swap_amount),
        Rounding::Down,
    )?)?;
    if sqrt_start_price == 0 || sqrt_start_price >= sqrt_migration_price {
        return Err(BuildError::UnsolvableCurve.into());
    }

    let liquidity = initial_liquidity_from_delta_quote(
        migration_quote_threshold,
        sqrt_start_price,
        sqrt_migration_price,
    )?;
    if liquidity == 0 {
        return Err(BuildError::UnsolvableCurve.into());
    }

    assemble_config(
        common,
        sqrt_start_price,
        vec![CurveSegment {
            sqrt_price: sqrt_migration_price,
            liquidity,
        }],
        swap_amount,
        migration_quote_threshold,
    )
}

/// True the supply up with a final segment at the protocol maximum price
/// and assemble the immutable config. The final segment is always present,
/// possibly with zero liquidity.
fn assemble_config(
    common: &CommonBuildParams,
    sqrt_start_price: u128,
    mut curve: Vec<CurveSegment>,
    swap_amount: u64,
    migration_quote_threshold: u64,
) -> Result<PoolConfig, Error> {
    // Fail early on a fee configuration quoting would reject.
    common.base_fee.handler(common.collect_fee_mode)?;

    let mut base_used: u64 = 0;
    let mut lower = sqrt_start_price;
    for segment in &curve {
        let amount = delta_base(lower, segment.sqrt_price, segment.liquidity, Rounding::Up)?;
        base_used = base_used.checked_add(amount).ok_or(MathError::Overflow)?;
        lower = segment.sqrt_price;
    }

    let remaining = swap_amount.saturating_sub(base_used);
    if lower < MAX_SQRT_PRICE {
        let liquidity = if remaining > 0 {
            initial_liquidity_from_delta_base(remaining, MAX_SQRT_PRICE, lower)?
        } else {
            0
        };
        curve.push(CurveSegment {
            sqrt_price: MAX_SQRT_PRICE,
            liquidity,
        });
    }
    if curve.len() > MAX_CURVE_POINT {
        return Err(BuildError::CapacityExceeded("curve points").into());
    }

    Ok(PoolConfig {
        curve,
        sqrt_start_price,
        fees: PoolFeesConfig {
            base_fee: common.base_fee,
            dynamic_fee: common.dynamic_fee,
            protocol_fee_percent: common.protocol_fee_percent,
            referral_fee_percent: common.referral_fee_percent,
        },
        collect_fee_mode: common.collect_fee_mode,
        activation_type: common.activation_type,
        migration_quote_threshold,
        token_base_decimal: common.token_base_decimal,
        token_quote_decimal: common.token_quote_decimal,
    })
}

/// Build a curve from a supply percentage and an explicit quote threshold.
pub fn build_curve(params: &BuildCurveParams) -> Result<PoolConfig, Error> {
    let common = &params.base;
    if !(params.percentage_supply_on_migration > 0.0
        && params.percentage_supply_on_migration < 100.0)
    {
        return Err(BuildError::UnsolvableCurve.into());
    }

    let split = common.supply_split()?;
    let migration_base_amount = to_raw(
        common.total_token_supply as f64 * params.percentage_supply_on_migration / 100.0,
        common.token_base_decimal,
        "migration base amount",
    )?;
    let threshold = to_raw(
        params.migration_quote_threshold,
        common.token_quote_decimal,
        "migration quote threshold",
    )?;
    let swap_amount = split
        .tradable
        .checked_sub(migration_base_amount)
        .ok_or(BuildError::UnsolvableCurve)?;

    finish_from_threshold(common, threshold, migration_base_amount, swap_amount)
}

/// Build a curve from initial and migration market caps. The migration
/// split follows the sqrt-price ratio `P_start / (P_start + P_migration)`,
/// which is the integer-exact form of the percentage a single
/// constant-liquidity segment implies.
pub fn build_curve_with_market_cap(
    params: &BuildCurveWithMarketCapParams,
) -> Result<PoolConfig, Error> {
    let common = &params.base;
    let split = common.supply_split()?;

    let sqrt_initial = sqrt_price_from_market_cap(
        params.initial_market_cap,
        common.total_token_supply,
        common.token_base_decimal,
        common.token_quote_decimal,
    )?;
    let sqrt_migration = sqrt_price_from_market_cap(
        params.migration_market_cap,
        common.total_token_supply,
        common.token_base_decimal,
        common.token_quote_decimal,
    )?;
    if sqrt_initial >= sqrt_migration {
        return Err(BuildError::UnsolvableCurve.into());
    }

    let migration_base_amount = u64::try_from(mul_div(
        U256::from(split.tradable),
        U256::from(sqrt_initial),
        U256::from(sqrt_initial) + U256::from(sqrt_migration),
        Rounding::Down,
    )?)
    .map_err(|_| MathError::AmountOverflow)?;
    let swap_amount = split
        .tradable
        .checked_sub(migration_base_amount)
        .ok_or(BuildError::UnsolvableCurve)?;

    let migration_share = migration_base_amount as f64 / split.total_supply as f64;
    let threshold = to_raw(
        params.migration_market_cap * migration_share,
        common.token_quote_decimal,
        "migration quote threshold",
    )?;

    finish_from_threshold(common, threshold, migration_base_amount, swap_amount)
}

/// Build a curve with two solved liquidity segments split at the geometric
/// mean of the initial and migration prices, plus the final true-up
/// segment at the maximum price.
pub fn build_curve_with_two_segments(
    params: &BuildCurveWithTwoSegmentsParams,
) -> Result<PoolConfig, Error> {
    let common = &params.base;
    if !(params.percentage_supply_on_migration > 0.0
        && params.percentage_supply_on_migration < 100.0)
    {
        return Err(BuildError::UnsolvableCurve.into());
    }

    let split = common.supply_split()?;
    let migration_base_amount = to_raw(
        common.total_token_supply as f64 * params.percentage_supply_on_migration / 100.0,
        common.token_base_decimal,
        "migration base amount",
    )?;
    let swap_amount = split
        .tradable
        .checked_sub(migration_base_amount)
        .ok_or(BuildError::UnsolvableCurve)?;
    // Quote raised at migration: migration market cap times the migrated
    // share of supply.
    let threshold = to_raw(
        params.migration_market_cap * params.percentage_supply_on_migration / 100.0,
        common.token_quote_decimal,
        "migration quote threshold",
    )?;
    if threshold == 0 || swap_amount == 0 {
        return Err(BuildError::UnsolvableCurve.into());
    }

    let sqrt_initial = sqrt_price_from_market_cap(
        params.initial_market_cap,
        common.total_token_supply,
        common.token_base_decimal,
        common.token_quote_decimal,
    )?;
    let sqrt_migration = sqrt_price_from_market_cap(
        params.migration_market_cap,
        common.total_token_supply,
        common.token_base_decimal,
        common.token_quote_decimal,
    )?;
    if sqrt_initial >= sqrt_migration {
        return Err(BuildError::UnsolvableCurve.into());
    }
    let sqrt_mid = to_u128(isqrt(
        U256::from(sqrt_initial) * U256::from(sqrt_migration),
    ))?;

    // Solve the 2x2 system tying both liquidities to the quote threshold
    // and the swap amount, in unscaled sqrt-price space.
    let scale = 2f64.powi(64);
    let q_start = sqrt_initial as f64 / scale;
    let q_mid = sqrt_mid as f64 / scale;
    let q_end = sqrt_migration as f64 / scale;

    let quote_coeff_1 = (q_mid - q_start) / scale;
    let quote_coeff_2 = (q_end - q_mid) / scale;
    let base_coeff_1 = (q_mid - q_start) / (q_mid * q_start * scale);
    let base_coeff_2 = (q_end - q_mid) / (q_end * q_mid * scale);

    let det = quote_coeff_1 * base_coeff_2 - quote_coeff_2 * base_coeff_1;
    let threshold_f = threshold as f64;
    let swap_f = swap_amount as f64;
    let liquidity_1 = (threshold_f * base_coeff_2 - quote_coeff_2 * swap_f) / det;
    let liquidity_2 = (quote_coeff_1 * swap_f - base_coeff_1 * threshold_f) / det;
    if !liquidity_1.is_finite()
        || !liquidity_2.is_finite()
        || liquidity_1 <= 0.0
        || liquidity_2 <= 0.0
    {
        return Err(BuildError::UnsolvableCurve.into());
    }

    let curve = vec![
        CurveSegment {
            sqrt_price: sqrt_mid,
            liquidity: liquidity_1 as u128,
        },
        CurveSegment {
            sqrt_price: sqrt_migration,
            liquidity: liquidity_2 as u128,
        },
    ];
    // Recompute the threshold exactly from the materialized integer curve
    // so quoting reproduces it without drift.
    let exact_threshold = delta_quote(sqrt_initial, sqrt_mid, curve[0].liquidity, Rounding::Up)?
        .checked_add(delta_quote(
            sqrt_mid,
            sqrt_migration,
            curve[1].liquidity,
            Rounding::Up,
        )?)
        .ok_or(MathError::Overflow)?;

    assemble_config(common, sqrt_initial, curve, swap_amount, exact_threshold)
}

/// Build a curve from per-segment liquidity weights laid over a geometric
/// price ladder between the two market-cap prices.
pub fn build_curve_with_liquidity_weights(
    params: &BuildCurveWithLiquidityWeightsParams,
) -> Result<PoolConfig, Error> {
    let common = &params.base;
    let weights = &params.liquidity_weights;
    if weights.is_empty() || weights.len() >= MAX_CURVE_POINT {
        return Err(BuildError::CapacityExceeded("curve points").into());
    }
    for weight in weights {
        if !weight.is_finite() || *weight <= 0.0 {
            return Err(BuildError::NonFiniteParameter("liquidity weight").into());
        }
    }

    let split = common.supply_split()?;
    let sqrt_initial = sqrt_price_from_market_cap(
        params.initial_market_cap,
        common.total_token_supply,
        common.token_base_decimal,
        common.token_quote_decimal,
    )?;
    let sqrt_migration = sqrt_price_from_market_cap(
        params.migration_market_cap,
        common.total_token_supply,
        common.token_base_decimal,
        common.token_quote_decimal,
    )?;
    if sqrt_initial >= sqrt_migration {
        return Err(BuildError::UnsolvableCurve.into());
    }

    let migration_base_amount = u64::try_from(mul_div(
        U256::from(split.tradable),
        U256::from(sqrt_initial),
        U256::from(sqrt_initial) + U256::from(sqrt_migration),
        Rounding::Down,
    )?)
    .map_err(|_| MathError::AmountOverflow)?;
    let swap_amount = split
        .tradable
        .checked_sub(migration_base_amount)
        .ok_or(BuildError::UnsolvableCurve)?;
    if swap_amount == 0 {
        return Err(BuildError::UnsolvableCurve.into());
    }

    // Geometric price ladder from the start price to the migration price.
    let scale = 2f64.powi(64);
    let q_start = sqrt_initial as f64 / scale;
    let q_end = sqrt_migration as f64 / scale;
    let ratio = (q_end / q_start).powf(1.0 / weights.len() as f64);

    let mut prices = Vec::with_capacity(weights.len());
    let mut previous = sqrt_initial;
    for step in 1..=weights.len() {
        let price = if step == weights.len() {
            sqrt_migration
        } else {
            // The price range must leave room for one rung per weight.
            if previous + 1 >= sqrt_migration {
                return Err(BuildError::UnsolvableCurve.into());
            }
            let value = (q_start * ratio.powi(step as i32) * scale) as u128;
            value.clamp(previous + 1, sqrt_migration - 1)
        };
        prices.push(price);
        previous = price;
    }

    // One unknown: the liquidity of the first rung; every other rung is a
    // weight multiple of it. Solve it from the combined base constraint.
    let mut base_per_unit = 0f64;
    let mut lower_q = q_start;
    for (price, weight) in prices.iter().zip(weights) {
        let upper_q = *price as f64 / scale;
        base_per_unit += weight * (upper_q - lower_q) / (upper_q * lower_q * scale);
        lower_q = upper_q;
    }
    let unit_liquidity = swap_amount as f64 / base_per_unit;
    if !unit_liquidity.is_finite() || unit_liquidity <= 0.0 {
        return Err(BuildError::UnsolvableCurve.into());
    }

    let mut curve = Vec::with_capacity(weights.len());
    let mut exact_threshold: u64 = 0;
    let mut lower = sqrt_initial;
    for (price, weight) in prices.iter().zip(weights) {
        let liquidity = (unit_liquidity * weight) as u128;
        if liquidity == 0 {
            return Err(BuildError::UnsolvableCurve.into());
        }
        exact_threshold = exact_threshold
            .checked_add(delta_quote(lower, *price, liquidity, Rounding::Up)?)
            .ok_or(MathError::Overflow)?;
        curve.push(CurveSegment {
            sqrt_price: *price,
            liquidity,
        });
        lower = *price;
    }

    assemble_config(common, sqrt_initial, curve, swap_amount, exact_threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::pool::state::BaseFeeMode;
    use crate::pool::traversal::swap_quote_to_base;
    use crate::MAX_SQRT_PRICE;

    fn common(base_decimal: u8, quote_decimal: u8) -> CommonBuildParams {
        CommonBuildParams {
            total_token_supply: 1_000_000_000,
            token_base_decimal: base_decimal,
            token_quote_decimal: quote_decimal,
            locked_vesting: LockedVestingParams::default(),
            leftover: 0,
            base_fee: BaseFeeConfig {
                cliff_fee_numerator: 10_000_000,
                first_factor: 0,
                second_factor: 0,
                third_factor: 0,
                base_fee_mode: BaseFeeMode::FeeSchedulerLinear,
            },
            dynamic_fee: DynamicFeeConfig::default(),
            collect_fee_mode: CollectFeeMode::QuoteToken,
            activation_type: ActivationType::Slot,
            protocol_fee_percent: 20,
            referral_fee_percent: 0,
        }
    }

    #[test]
    fn build_curve_produces_two_segments_at_the_documented_threshold() {
        let config = build_curve(&BuildCurveParams {
            base: common(6, 9),
            percentage_supply_on_migration: 2.983257229832572,
            migration_quote_threshold: 95.07640791476408,
        })
        .unwrap();

        assert_eq!(config.curve.len(), 2);
        assert_eq!(config.curve.last().unwrap().sqrt_price, MAX_SQRT_PRICE);
        assert_eq!(config.migration_quote_threshold, 95_076_407_914);
        // Truncates to 95 whole quote tokens at 9 decimals.
        assert_eq!(config.migration_quote_threshold / 1_000_000_000, 95);
    }

    #[test]
    fn built_curve_absorbs_its_own_migration_threshold() {
        let config = build_curve(&BuildCurveParams {
            base: common(6, 9),
            percentage_supply_on_migration: 2.983257229832572,
            migration_quote_threshold: 95.07640791476408,
        })
        .unwrap();

        let result = swap_quote_to_base(
            &config,
            config.sqrt_start_price,
            config.migration_quote_threshold,
        )
        .unwrap();
        assert_eq!(result.amount_left, 0);
        assert!(result.next_sqrt_price <= MAX_SQRT_PRICE);
    }

    #[test]
    fn market_cap_constructor_orders_its_prices() {
        let config = build_curve_with_market_cap(&BuildCurveWithMarketCapParams {
            base: common(6, 9),
            initial_market_cap: 30.0,
            migration_market_cap: 300.0,
        })
        .unwrap();

        assert!(config.sqrt_start_price > 0);
        assert!(config.sqrt_start_price < config.curve[0].sqrt_price);
        assert_eq!(config.curve.last().unwrap().sqrt_price, MAX_SQRT_PRICE);
        assert!(config.migration_quote_threshold > 0);
    }

    #[test]
    fn inverted_market_caps_are_unsolvable() {
        let result = build_curve_with_market_cap(&BuildCurveWithMarketCapParams {
            base: common(6, 9),
            initial_market_cap: 300.0,
            migration_market_cap: 30.0,
        });
        assert!(matches!(
            result,
            Err(Error::BuildError(BuildError::UnsolvableCurve))
        ));
    }

    #[test]
    fn two_segment_constructor_solves_both_liquidities() {
        let config = build_curve_with_two_segments(&BuildCurveWithTwoSegmentsParams {
            base: common(6, 9),
            initial_market_cap: 30.0,
            migration_market_cap: 300.0,
            percentage_supply_on_migration: 20.0,
        })
        .unwrap();

        // Two solved segments plus the true-up segment at the max price.
        assert_eq!(config.curve.len(), 3);
        assert!(config.sqrt_start_price < config.curve[0].sqrt_price);
        assert!(config.curve[0].sqrt_price < config.curve[1].sqrt_price);
        assert_eq!(config.curve[2].sqrt_price, MAX_SQRT_PRICE);
        assert!(config.curve[0].liquidity > 0);
        assert!(config.curve[1].liquidity > 0);

        // The exact threshold is absorbed by the solved segments.
        let result = swap_quote_to_base(
            &config,
            config.sqrt_start_price,
            config.migration_quote_threshold,
        )
        .unwrap();
        assert_eq!(result.amount_left, 0);
    }

    #[test]
    fn liquidity_weights_shape_the_segment_liquidity() {
        let config = build_curve_with_liquidity_weights(&BuildCurveWithLiquidityWeightsParams {
            base: common(6, 9),
            initial_market_cap: 30.0,
            migration_market_cap: 300.0,
            liquidity_weights: vec![1.0, 2.0, 4.0, 8.0],
        })
        .unwrap();

        // Four weighted rungs plus the true-up segment.
        assert_eq!(config.curve.len(), 5);
        for window in config.curve.windows(2) {
            assert!(window[0].sqrt_price < window[1].sqrt_price);
        }
        // Consecutive rungs double their liquidity like the weights do.
        assert_eq!(config.curve[1].liquidity / config.curve[0].liquidity, 2);
        assert_eq!(config.curve[2].liquidity / config.curve[1].liquidity, 2);
    }

    #[test]
    fn vesting_total_checks_for_overflow() {
        let vesting = LockedVestingParams {
            amount_per_period: u64::MAX / 2,
            number_of_period: 4,
            cliff_unlock_amount: 0,
            frequency: 1,
            cliff_duration_from_migration_time: 0,
        };
        assert!(matches!(
            vesting.total_amount(),
            Err(Error::BuildError(BuildError::CapacityExceeded(_)))
        ));
    }

    #[test]
    fn vesting_and_leftover_shrink_the_tradable_supply() {
        let mut base = common(6, 9);
        base.locked_vesting = LockedVestingParams {
            amount_per_period: 1_000_000,
            number_of_period: 10,
            cliff_unlock_amount: 10_000_000,
            frequency: 1,
            cliff_duration_from_migration_time: 0,
        };
        base.leftover = 50_000_000;

        let with_vesting = build_curve(&BuildCurveParams {
            base,
            percentage_supply_on_migration: 2.983257229832572,
            migration_quote_threshold: 95.07640791476408,
        })
        .unwrap();
        let without = build_curve(&BuildCurveParams {
            base: common(6, 9),
            percentage_supply_on_migration: 2.983257229832572,
            migration_quote_threshold: 95.07640791476408,
        })
        .unwrap();

        // Less tradable supply means the same threshold is reached at a
        // higher starting price.
        assert!(with_vesting.sqrt_start_price > without.sqrt_start_price);
    }

    #[test]
    fn out_of_range_percentage_is_rejected() {
        for pct in [0.0, -1.0, 100.0, f64::NAN] {
            let result = build_curve(&BuildCurveParams {
                base: common(6, 9),
                percentage_supply_on_migration: pct,
                migration_quote_threshold: 95.0,
            });
            assert!(result.is_err(), "{pct}");
        }
    }
}
