use crate::error::{Error, MathError};
use crate::math::fixed_point::to_amount_u64;
use crate::pool::state::DynamicFeeConfig;
use crate::{DYNAMIC_FEE_ROUNDING_OFFSET, DYNAMIC_FEE_SCALING_FACTOR};
use alloy_primitives::U256;

impl DynamicFeeConfig {
    /// Volatility-based fee numerator added on top of the base fee:
    /// `(control * (accumulator * bin_step)^2 + offset) / scale`, rounded
    /// up via the offset. Zero when the config is not initialized or the
    /// market has no accumulated volatility.
    pub fn variable_fee_numerator(&self, volatility_accumulator: u128) -> Result<u64, Error> {
        if !self.initialized || volatility_accumulator == 0 || self.variable_fee_control == 0 {
            return Ok(0);
        }

        let swing = U256::from(volatility_accumulator)
            .checked_mul(U256::from(self.bin_step))
            .ok_or(MathError::Overflow)?;
        let squared = swing.checked_mul(swing).ok_or(MathError::Overflow)?;
        let scaled = squared
            .checked_mul(U256::from(self.variable_fee_control))
            .ok_or(MathError::Overflow)?
            .checked_add(U256::from(DYNAMIC_FEE_ROUNDING_OFFSET))
            .ok_or(MathError::Overflow)?;

        to_amount_u64(scaled / U256::from(DYNAMIC_FEE_SCALING_FACTOR)).map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> DynamicFeeConfig {
        DynamicFeeConfig {
            initialized: true,
            max_volatility_accumulator: 100_000,
            variable_fee_control: 2_000,
            bin_step: 80,
            filter_period: 10,
            decay_period: 120,
            reduction_factor: 5_000,
        }
    }

    #[test]
    fn uninitialized_config_charges_nothing() {
        let mut c = config();
        c.initialized = false;
        assert_eq!(c.variable_fee_numerator(50_000).unwrap(), 0);
    }

    #[test]
    fn zero_volatility_charges_nothing() {
        assert_eq!(config().variable_fee_numerator(0).unwrap(), 0);
    }

    #[test]
    fn variable_fee_grows_with_the_square_of_volatility() {
        // (50_000 * 80)^2 * 2_000 = 3.2e16, scaled by 1e11 with the
        // rounding offset: (3.2e16 + 99_999_999_999) / 1e11 = 320_000.
        assert_eq!(config().variable_fee_numerator(50_000).unwrap(), 320_000);
        // Doubling the volatility quadruples the fee.
        assert_eq!(config().variable_fee_numerator(100_000).unwrap(), 1_280_000);
    }

    #[test]
    fn sub_scale_volatility_still_rounds_up_to_one() {
        let mut c = config();
        c.variable_fee_control = 1;
        c.bin_step = 1;
        assert_eq!(c.variable_fee_numerator(1).unwrap(), 1);
    }
}
