use crate::error::{Error, FeeError, MathError};
use crate::math::fixed_point::isqrt;
use crate::pool::state::TradeDirection;
use crate::{BASIS_POINT_MAX, FEE_DENOMINATOR, MAX_FEE_NUMERATOR};
use alloy_primitives::U256;

/// Trade-size fee: flat at the cliff numerator up to `reference_amount`,
/// then each additional reference-amount slice pays `fee_increment_bps`
/// more, saturating at [`MAX_FEE_NUMERATOR`].
///
/// Only active for quote-to-base trades with quote-token fee collection,
/// and only within `max_limiter_duration` points of activation; outside
/// that window the flat cliff fee applies.
#[derive(Debug, Clone, Copy)]
pub struct FeeRateLimiter {
    pub cliff_fee_numerator: u64,
    pub fee_increment_bps: u16,
    pub max_limiter_duration: u64,
    pub reference_amount: u64,
}

impl FeeRateLimiter {
    pub fn is_applied(
        &self,
        current_point: u64,
        activation_point: u64,
        trade_direction: TradeDirection,
    ) -> bool {
        if trade_direction == TradeDirection::BaseToQuote {
            return false;
        }
        current_point >= activation_point
            && current_point <= activation_point.saturating_add(self.max_limiter_duration)
    }

    /// Per-slice fee increment expressed against [`FEE_DENOMINATOR`].
    pub fn fee_increment_numerator(&self) -> u64 {
        ((u128::from(self.fee_increment_bps) * u128::from(FEE_DENOMINATOR))
            / u128::from(BASIS_POINT_MAX)) as u64
    }

    /// Number of full reference-amount slices before the per-slice fee
    /// saturates at the maximum numerator.
    fn max_index(&self) -> u128 {
        u128::from((MAX_FEE_NUMERATOR - self.cliff_fee_numerator) / self.fee_increment_numerator())
    }

    /// Fee in tokens charged on an included (gross) amount; closed-form
    /// sum of the arithmetic progression of per-slice fees.
    fn fee_amount(&self, included: u128) -> u128 {
        let c = u128::from(self.cliff_fee_numerator);
        let d = u128::from(FEE_DENOMINATOR);
        let i = u128::from(self.fee_increment_numerator());
        let x0 = u128::from(self.reference_amount);

        if included <= x0 {
            return included * c / d;
        }

        let a = (included - x0) / x0;
        let b = (included - x0) % x0;
        let max_index = self.max_index();

        let fee_units = if a < max_index {
            x0 * (c * (a + 1) + i * a * (a + 1) / 2) + b * (c + i * (a + 1))
        } else {
            let saturated = x0 * (c * (max_index + 1) + i * max_index * (max_index + 1) / 2);
            let excess = included - x0 * (max_index + 1);
            saturated + excess * u128::from(MAX_FEE_NUMERATOR)
        };
        fee_units / d
    }

    /// Effective fee numerator for a gross trade amount:
    /// `ceil(fee * FEE_DENOMINATOR / amount)`.
    pub fn numerator_from_included_amount(&self, included_amount: u64) -> Result<u64, Error> {
        if self.reference_amount == 0 || self.fee_increment_bps == 0 {
            return Err(FeeError::InvalidFeeConfig.into());
        }
        if included_amount == 0 || included_amount <= self.reference_amount {
            return Ok(self.cliff_fee_numerator);
        }
        let fee = self.fee_amount(u128::from(included_amount));
        let numerator = (fee * u128::from(FEE_DENOMINATOR)).div_ceil(u128::from(included_amount));
        Ok((numerator as u64).min(MAX_FEE_NUMERATOR))
    }

    /// Effective fee numerator for a net (post-fee) trade amount. The
    /// forward map is inverted via the quadratic formula in its sub-linear
    /// region and corrected against the true forward function.
    pub fn numerator_from_excluded_amount(&self, excluded_amount: u64) -> Result<u64, Error> {
        if self.reference_amount == 0 || self.fee_increment_bps == 0 {
            return Err(FeeError::InvalidFeeConfig.into());
        }
        if excluded_amount == 0 {
            return Ok(self.cliff_fee_numerator);
        }
        let included = self.included_amount_from_excluded(excluded_amount)?;
        let numerator = self.numerator_from_included_amount(included)?;
        if numerator < self.cliff_fee_numerator {
            return Err(FeeError::UndeterminedFee.into());
        }
        Ok(numerator)
    }

    /// Net amount left after the fee when exactly `a + 1` reference-amount
    /// slices are included.
    fn net_at_full_step(&self, a: u128) -> u128 {
        let included = u128::from(self.reference_amount) * (a + 1);
        included - self.fee_amount(included)
    }

    /// Smallest gross amount whose net (post-fee) amount covers
    /// `excluded_amount`.
    fn included_amount_from_excluded(&self, excluded_amount: u64) -> Result<u64, Error> {
        let c = u128::from(self.cliff_fee_numerator);
        let d = u128::from(FEE_DENOMINATOR);
        let i = u128::from(self.fee_increment_numerator());
        let x0 = u128::from(self.reference_amount);
        let y = u128::from(excluded_amount);

        // Within the first reference amount the fee is flat at the cliff.
        if y <= x0 - x0 * c / d {
            let included = (y * d).div_ceil(d - c);
            return Ok(included as u64);
        }

        let max_index = self.max_index();

        // Past the saturation point every extra unit nets (d - MAX) / d.
        let sat_included = x0 * (max_index + 1);
        let sat_net = sat_included - self.fee_amount(sat_included);
        if y > sat_net {
            let excess = ((y - sat_net) * d).div_ceil(d - u128::from(MAX_FEE_NUMERATOR));
            let included = sat_included + excess;
            return u64::try_from(included).map_err(|_| MathError::AmountOverflow.into());
        }

        // Sub-linear region: with a full slices beyond the reference,
        //   net(a) = x0 (a + 1) - x0 (c (a + 1) + i a (a + 1) / 2) / d
        // so net(a) = y reduces to i a^2 - (2d - 2c - i) a + z = 0 with
        // z = 2 y d / x0 - 2 (d - c); the smaller root counts the slices.
        let y_coef = 2 * d - 2 * c - i;
        let z = (2 * y * d / x0).saturating_sub(2 * (d - c));
        let mut a = match (y_coef * y_coef).checked_sub(4 * i * z) {
            Some(disc) => {
                let sqrt_disc = u128::try_from(isqrt(U256::from(disc)))
                    .map_err(|_| MathError::Overflow)?;
                ((y_coef - sqrt_disc) / (2 * i)).min(max_index)
            }
            // Integer truncation pushed the discriminant negative; the
            // correction loop below finds the slice count from zero.
            None => 0,
        };

        // The floored root can land one slice off either way.
        while a > 0 && self.net_at_full_step(a) > y {
            a -= 1;
        }
        while a < max_index && self.net_at_full_step(a + 1) <= y {
            a += 1;
        }

        let remainder = y - self.net_at_full_step(a);
        let included = if remainder == 0 {
            x0 * (a + 1)
        } else {
            let marginal = (c + i * (a + 1)).min(u128::from(MAX_FEE_NUMERATOR));
            x0 * (a + 1) + (remainder * d).div_ceil(d - marginal)
        };
        u64::try_from(included).map_err(|_| MathError::AmountOverflow.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // 100 bps cliff, 10 bps increment, 0.2 * 1e9 reference.
    fn limiter() -> FeeRateLimiter {
        FeeRateLimiter {
            cliff_fee_numerator: 10_000_000,
            fee_increment_bps: 10,
            max_limiter_duration: 100,
            reference_amount: 200_000_000,
        }
    }

    #[test]
    fn amounts_up_to_the_reference_pay_the_cliff_fee() {
        let l = limiter();
        assert_eq!(l.numerator_from_included_amount(1).unwrap(), 10_000_000);
        assert_eq!(
            l.numerator_from_included_amount(200_000_000).unwrap(),
            10_000_000
        );
    }

    #[test]
    fn five_reference_amounts_average_to_120_bps() {
        let l = limiter();
        assert_eq!(
            l.numerator_from_included_amount(1_000_000_000).unwrap(),
            12_000_000
        );
    }

    #[test]
    fn inverse_recovers_the_forward_numerator() {
        let l = limiter();
        // Net of the 1e9 gross trade above: 1e9 - 12e6.
        assert_eq!(
            l.numerator_from_excluded_amount(988_000_000).unwrap(),
            12_000_000
        );
    }

    #[test]
    fn inverse_in_the_flat_region_returns_the_cliff() {
        let l = limiter();
        assert_eq!(
            l.numerator_from_excluded_amount(198_000_000).unwrap(),
            10_000_000
        );
    }

    #[test]
    fn very_large_amounts_approach_the_max_numerator() {
        let l = limiter();
        let numerator = l.numerator_from_included_amount(u64::MAX).unwrap();
        assert!(numerator > 900_000_000);
        assert!(numerator <= MAX_FEE_NUMERATOR);
    }

    #[test]
    fn applies_only_in_the_activation_window_for_quote_to_base() {
        let l = limiter();
        assert!(l.is_applied(100, 50, TradeDirection::QuoteToBase));
        assert!(l.is_applied(150, 50, TradeDirection::QuoteToBase));
        assert!(!l.is_applied(151, 50, TradeDirection::QuoteToBase));
        assert!(!l.is_applied(49, 50, TradeDirection::QuoteToBase));
        assert!(!l.is_applied(100, 50, TradeDirection::BaseToQuote));
    }

    proptest! {
        #[test]
        fn forward_numerator_is_monotonic(amount in 1u64.., bump in 1u64..1_000_000_000) {
            let l = limiter();
            let larger = amount.saturating_add(bump);
            prop_assert!(
                l.numerator_from_included_amount(amount).unwrap()
                    <= l.numerator_from_included_amount(larger).unwrap()
            );
        }

        #[test]
        fn inverse_always_covers_the_requested_net_amount(net in 1u64..1_000_000_000_000_000) {
            let l = limiter();
            let gross = u128::from(l.included_amount_from_excluded(net).unwrap());
            let recovered = gross - l.fee_amount(gross);
            // Ceiling rounding may overshoot by a unit, never undershoot
            // more than the flooring of the closed-form fee.
            prop_assert!(recovered + 1 >= u128::from(net));
        }
    }
}
