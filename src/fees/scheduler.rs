use crate::error::Error;
use crate::math::fixed_point::pow_q64;
use crate::{BASIS_POINT_MAX, RESOLUTION};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerMode {
    Linear,
    Exponential,
}

/// Time-decaying base fee: starts at the cliff numerator and drops once per
/// `period_frequency` points until `number_of_period` reductions have been
/// applied.
#[derive(Debug, Clone, Copy)]
pub struct FeeScheduler {
    pub cliff_fee_numerator: u64,
    pub number_of_period: u16,
    pub period_frequency: u64,
    /// Linear mode: numerator subtracted per period. Exponential mode:
    /// per-period decay in basis points.
    pub reduction_factor: u64,
    pub mode: SchedulerMode,
}

impl FeeScheduler {
    /// Fee numerator in effect at `current_point`. A zero frequency means
    /// the schedule never decays and the cliff fee is flat.
    pub fn current_numerator(&self, current_point: u64, activation_point: u64) -> Result<u64, Error> {
        if self.period_frequency == 0 {
            return Ok(self.cliff_fee_numerator);
        }

        let elapsed = current_point.saturating_sub(activation_point);
        let period = (elapsed / self.period_frequency).min(u64::from(self.number_of_period));

        match self.mode {
            SchedulerMode::Linear => Ok(self
                .cliff_fee_numerator
                .saturating_sub(self.reduction_factor.saturating_mul(period))),
            SchedulerMode::Exponential => {
                // cliff * ((10000 - reduction) / 10000)^period in Q64.64.
                let decay_base = (u128::from(BASIS_POINT_MAX.saturating_sub(self.reduction_factor))
                    << RESOLUTION)
                    / u128::from(BASIS_POINT_MAX);
                let multiplier = pow_q64(decay_base, period as i32, true)?;
                let fee = (u128::from(self.cliff_fee_numerator) * multiplier) >> RESOLUTION;
                Ok(fee as u64)
            }
        }
    }
}
