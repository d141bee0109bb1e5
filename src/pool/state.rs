//! Pool configuration and point-in-time pool state.
//!
//! Both structs are plain value snapshots: `PoolConfig` is produced once
//! (by the curve builder or decoded from chain state by the caller) and
//! never mutated; `VirtualPoolState` is a read at quote time. Nothing in
//! this crate writes them back.

/// One breakpoint of the bonding curve. `liquidity` applies to the price
/// interval ending at `sqrt_price` when the price moves up, and starting
/// from it when the price moves down. Entries with a zero price or zero
/// liquidity are configuration padding and are ignored by traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CurveSegment {
    pub sqrt_price: u128,
    pub liquidity: u128,
}

/// Which base-fee handler the `first/second/third_factor` fields of
/// [`BaseFeeConfig`] parameterize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseFeeMode {
    FeeSchedulerLinear,
    FeeSchedulerExponential,
    RateLimiter,
}

/// Packed base-fee parameters. Factor meaning depends on `base_fee_mode`:
///
/// | field           | scheduler          | rate limiter         |
/// |-----------------|--------------------|----------------------|
/// | `first_factor`  | number of periods  | fee increment (bps)  |
/// | `second_factor` | period frequency   | max limiter duration |
/// | `third_factor`  | reduction factor   | reference amount     |
#[derive(Debug, Clone, Copy)]
pub struct BaseFeeConfig {
    pub cliff_fee_numerator: u64,
    pub first_factor: u16,
    pub second_factor: u64,
    pub third_factor: u64,
    pub base_fee_mode: BaseFeeMode,
}

/// Volatility-based variable fee parameters. Inactive unless `initialized`
/// is set.
#[derive(Debug, Clone, Copy, Default)]
pub struct DynamicFeeConfig {
    pub initialized: bool,
    pub max_volatility_accumulator: u32,
    pub variable_fee_control: u32,
    pub bin_step: u16,
    pub filter_period: u16,
    pub decay_period: u16,
    pub reduction_factor: u16,
}

/// Volatility state maintained by the execution layer; read-only here.
#[derive(Debug, Clone, Copy, Default)]
pub struct VolatilityTracker {
    pub last_update_timestamp: u64,
    pub sqrt_price_reference: u128,
    pub volatility_accumulator: u128,
    pub volatility_reference: u128,
}

/// Which token trading fees are collected in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectFeeMode {
    QuoteToken,
    OutputToken,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeDirection {
    BaseToQuote,
    QuoteToBase,
}

/// Unit of the pool's activation point (and of `current_point` at quote
/// time).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationType {
    Slot,
    Timestamp,
}

/// All fee knobs of a pool in one place.
#[derive(Debug, Clone, Copy)]
pub struct PoolFeesConfig {
    pub base_fee: BaseFeeConfig,
    pub dynamic_fee: DynamicFeeConfig,
    /// Percent of the trading fee carved out for the protocol, 0..=100.
    pub protocol_fee_percent: u8,
    /// Percent of the protocol fee carved out for a referrer, 0..=100.
    pub referral_fee_percent: u8,
}

/// Immutable pool configuration consumed by quoting.
///
/// `curve` is ordered ascending by `sqrt_price`; the final segment sits at
/// the protocol maximum price. `sqrt_start_price` is the lower bound of the
/// first segment's interval.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub curve: Vec<CurveSegment>,
    pub sqrt_start_price: u128,
    pub fees: PoolFeesConfig,
    pub collect_fee_mode: CollectFeeMode,
    pub activation_type: ActivationType,
    /// Cumulative quote amount at which the pool completes and stops
    /// trading through this engine.
    pub migration_quote_threshold: u64,
    pub token_base_decimal: u8,
    pub token_quote_decimal: u8,
}

/// Point-in-time pool state, owned and mutated only by the execution
/// layer.
#[derive(Debug, Clone, Copy)]
pub struct VirtualPoolState {
    pub sqrt_price: u128,
    pub base_reserve: u64,
    pub quote_reserve: u64,
    pub activation_point: u64,
    pub volatility_tracker: VolatilityTracker,
}
