//! Fee model: base-fee handlers, volatility fee, fee-mode selection and
//! fee splitting.

pub mod dynamic_fee;
pub mod rate_limiter;
pub mod scheduler;

pub use rate_limiter::FeeRateLimiter;
pub use scheduler::{FeeScheduler, SchedulerMode};

use crate::error::{Error, FeeError};
use crate::math::fixed_point::{mul_div, safe_sub_u64, to_amount_u64, Rounding};
use crate::pool::state::{
    BaseFeeConfig, BaseFeeMode, CollectFeeMode, PoolFeesConfig, TradeDirection,
};
use crate::{BASIS_POINT_MAX, FEE_DENOMINATOR, MAX_FEE_NUMERATOR, MIN_FEE_NUMERATOR};
use alloy_primitives::U256;

/// Where fees are taken for one particular trade. Derived from the pool's
/// collect mode and the trade direction, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeMode {
    /// Deduct fees from the input amount before traversal.
    pub fee_on_input: bool,
    /// Fees are denominated in the base token.
    pub fees_on_base_token: bool,
    pub has_referral: bool,
}

impl FeeMode {
    pub fn new(
        collect_fee_mode: CollectFeeMode,
        trade_direction: TradeDirection,
        has_referral: bool,
    ) -> Self {
        // Base-to-quote trades never pay fees on input; their output is
        // already the quote token.
        let fee_on_input = trade_direction == TradeDirection::QuoteToBase
            && collect_fee_mode == CollectFeeMode::QuoteToken;
        let fees_on_base_token = trade_direction == TradeDirection::QuoteToBase
            && collect_fee_mode == CollectFeeMode::OutputToken;

        FeeMode {
            fee_on_input,
            fees_on_base_token,
            has_referral,
        }
    }
}

/// The three base-fee variants behind one capability set: a numerator for
/// a gross (fee-included) amount and one for a net (fee-excluded) amount.
#[derive(Debug, Clone, Copy)]
pub enum BaseFeeHandler {
    Scheduler(FeeScheduler),
    RateLimiter(FeeRateLimiter),
}

impl BaseFeeHandler {
    pub fn numerator_from_included_amount(
        &self,
        current_point: u64,
        activation_point: u64,
        trade_direction: TradeDirection,
        included_amount: u64,
    ) -> Result<u64, Error> {
        match self {
            BaseFeeHandler::Scheduler(scheduler) => {
                scheduler.current_numerator(current_point, activation_point)
            }
            BaseFeeHandler::RateLimiter(limiter) => {
                if limiter.is_applied(current_point, activation_point, trade_direction) {
                    limiter.numerator_from_included_amount(included_amount)
                } else {
                    Ok(limiter.cliff_fee_numerator)
                }
            }
        }
    }

    pub fn numerator_from_excluded_amount(
        &self,
        current_point: u64,
        activation_point: u64,
        trade_direction: TradeDirection,
        excluded_amount: u64,
    ) -> Result<u64, Error> {
        match self {
            BaseFeeHandler::Scheduler(scheduler) => {
                scheduler.current_numerator(current_point, activation_point)
            }
            BaseFeeHandler::RateLimiter(limiter) => {
                if limiter.is_applied(current_point, activation_point, trade_direction) {
                    limiter.numerator_from_excluded_amount(excluded_amount)
                } else {
                    Ok(limiter.cliff_fee_numerator)
                }
            }
        }
    }
}

impl BaseFeeConfig {
    /// Decode the packed factors into a concrete handler, validating the
    /// combination.
    pub fn handler(&self, collect_fee_mode: CollectFeeMode) -> Result<BaseFeeHandler, FeeError> {
        if self.cliff_fee_numerator < MIN_FEE_NUMERATOR
            || self.cliff_fee_numerator > MAX_FEE_NUMERATOR
        {
            return Err(FeeError::InvalidFeeConfig);
        }

        match self.base_fee_mode {
            BaseFeeMode::FeeSchedulerLinear | BaseFeeMode::FeeSchedulerExponential => {
                // A decaying schedule needs a period frequency.
                if self.first_factor > 0 && self.second_factor == 0 {
                    return Err(FeeError::InvalidFeeConfig);
                }
                let mode = if self.base_fee_mode == BaseFeeMode::FeeSchedulerLinear {
                    SchedulerMode::Linear
                } else {
                    if self.third_factor >= BASIS_POINT_MAX {
                        return Err(FeeError::InvalidFeeConfig);
                    }
                    SchedulerMode::Exponential
                };
                Ok(BaseFeeHandler::Scheduler(FeeScheduler {
                    cliff_fee_numerator: self.cliff_fee_numerator,
                    number_of_period: self.first_factor,
                    period_frequency: self.second_factor,
                    reduction_factor: self.third_factor,
                    mode,
                }))
            }
            BaseFeeMode::RateLimiter => {
                // The limiter prices the quote input, so fees must be
                // collected in the quote token.
                if collect_fee_mode != CollectFeeMode::QuoteToken {
                    return Err(FeeError::InvalidFeeConfig);
                }
                if self.first_factor == 0
                    || u64::from(self.first_factor) >= BASIS_POINT_MAX
                    || self.third_factor == 0
                {
                    return Err(FeeError::InvalidFeeConfig);
                }
                Ok(BaseFeeHandler::RateLimiter(FeeRateLimiter {
                    cliff_fee_numerator: self.cliff_fee_numerator,
                    fee_increment_bps: self.first_factor,
                    max_limiter_duration: self.second_factor,
                    reference_amount: self.third_factor,
                }))
            }
        }
    }
}

/// Outcome of charging a fee on an amount: the post-fee amount plus the
/// three-way fee split. `trading_fee` is the share left to liquidity after
/// the protocol and referral carve-outs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeOnAmountResult {
    pub amount: u64,
    pub trading_fee: u64,
    pub protocol_fee: u64,
    pub referral_fee: u64,
}

impl PoolFeesConfig {
    /// Base numerator plus the volatility fee, capped at the protocol
    /// maximum.
    pub fn total_fee_numerator(
        &self,
        base_fee_numerator: u64,
        volatility_accumulator: u128,
    ) -> Result<u64, Error> {
        let variable = self
            .dynamic_fee
            .variable_fee_numerator(volatility_accumulator)?;
        Ok(base_fee_numerator
            .saturating_add(variable)
            .min(MAX_FEE_NUMERATOR))
    }

    /// Charge `fee_numerator` on `amount` and split the fee. The trading
    /// fee rounds up against the trader; the protocol share is a floored
    /// percentage of it, the referral share a floored percentage of the
    /// protocol share.
    pub fn split_fees(
        &self,
        amount: u64,
        fee_numerator: u64,
        has_referral: bool,
    ) -> Result<FeeOnAmountResult, Error> {
        let trading_fee = to_amount_u64(mul_div(
            U256::from(amount),
            U256::from(fee_numerator),
            U256::from(FEE_DENOMINATOR),
            Rounding::Up,
        )?)?;
        let amount = safe_sub_u64(amount, trading_fee)?;

        let protocol_fee =
            ((u128::from(trading_fee) * u128::from(self.protocol_fee_percent)) / 100) as u64;
        let trading_fee = safe_sub_u64(trading_fee, protocol_fee)?;

        let referral_fee = if has_referral {
            ((u128::from(protocol_fee) * u128::from(self.referral_fee_percent)) / 100) as u64
        } else {
            0
        };
        let protocol_fee = safe_sub_u64(protocol_fee, referral_fee)?;

        Ok(FeeOnAmountResult {
            amount,
            trading_fee,
            protocol_fee,
            referral_fee,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::state::DynamicFeeConfig;

    fn fees(protocol_fee_percent: u8, referral_fee_percent: u8) -> PoolFeesConfig {
        PoolFeesConfig {
            base_fee: BaseFeeConfig {
                cliff_fee_numerator: 10_000_000,
                first_factor: 0,
                second_factor: 0,
                third_factor: 0,
                base_fee_mode: BaseFeeMode::FeeSchedulerLinear,
            },
            dynamic_fee: DynamicFeeConfig::default(),
            protocol_fee_percent,
            referral_fee_percent,
        }
    }

    #[test]
    fn fee_mode_truth_table() {
        let cases = [
            (CollectFeeMode::QuoteToken, TradeDirection::QuoteToBase, true, false),
            (CollectFeeMode::QuoteToken, TradeDirection::BaseToQuote, false, false),
            (CollectFeeMode::OutputToken, TradeDirection::QuoteToBase, false, true),
            (CollectFeeMode::OutputToken, TradeDirection::BaseToQuote, false, false),
        ];
        for (collect, direction, fee_on_input, fees_on_base) in cases {
            let mode = FeeMode::new(collect, direction, false);
            assert_eq!(mode.fee_on_input, fee_on_input, "{collect:?} {direction:?}");
            assert_eq!(mode.fees_on_base_token, fees_on_base, "{collect:?} {direction:?}");
        }
    }

    #[test]
    fn split_fees_carves_referral_out_of_protocol_share() {
        // 1% fee on 1e9 = 1e7; protocol 20% = 2e6; referral 25% of the
        // protocol share = 5e5.
        let result = fees(20, 25).split_fees(1_000_000_000, 10_000_000, true).unwrap();
        assert_eq!(result.amount, 990_000_000);
        assert_eq!(result.trading_fee, 8_000_000);
        assert_eq!(result.protocol_fee, 1_500_000);
        assert_eq!(result.referral_fee, 500_000);
    }

    #[test]
    fn split_fees_without_referral_keeps_the_protocol_share_whole() {
        let result = fees(20, 25).split_fees(1_000_000_000, 10_000_000, false).unwrap();
        assert_eq!(result.protocol_fee, 2_000_000);
        assert_eq!(result.referral_fee, 0);
    }

    #[test]
    fn trading_fee_rounds_up_against_the_trader() {
        // 3 * 1e7 / 1e9 = 0.03 rounds up to 1.
        let result = fees(0, 0).split_fees(3, 10_000_000, false).unwrap();
        assert_eq!(result.trading_fee, 1);
        assert_eq!(result.amount, 2);
    }

    #[test]
    fn total_fee_numerator_is_capped() {
        let mut config = fees(0, 0);
        config.dynamic_fee = DynamicFeeConfig {
            initialized: true,
            variable_fee_control: u32::MAX,
            bin_step: 400,
            ..DynamicFeeConfig::default()
        };
        let total = config
            .total_fee_numerator(980_000_000, 1_000_000)
            .unwrap();
        assert_eq!(total, MAX_FEE_NUMERATOR);
    }

    #[test]
    fn rate_limiter_config_requires_quote_token_collection() {
        let config = BaseFeeConfig {
            cliff_fee_numerator: 10_000_000,
            first_factor: 10,
            second_factor: 100,
            third_factor: 200_000_000,
            base_fee_mode: BaseFeeMode::RateLimiter,
        };
        assert!(config.handler(CollectFeeMode::QuoteToken).is_ok());
        assert!(matches!(
            config.handler(CollectFeeMode::OutputToken),
            Err(FeeError::InvalidFeeConfig)
        ));
    }

    #[test]
    fn cliff_fee_out_of_bounds_is_rejected() {
        let mut config = BaseFeeConfig {
            cliff_fee_numerator: MAX_FEE_NUMERATOR + 1,
            first_factor: 0,
            second_factor: 0,
            third_factor: 0,
            base_fee_mode: BaseFeeMode::FeeSchedulerLinear,
        };
        assert!(config.handler(CollectFeeMode::QuoteToken).is_err());
        config.cliff_fee_numerator = MIN_FEE_NUMERATOR - 1;
        assert!(config.handler(CollectFeeMode::QuoteToken).is_err());
    }
}
