use bonding_curve_math::math::curve_math::delta_base;
use bonding_curve_math::math::fixed_point::{isqrt, mul_div, Rounding};
use bonding_curve_math::pool::builder::{
    build_curve, BuildCurveParams, CommonBuildParams, LockedVestingParams,
};
use bonding_curve_math::pool::quote::{quote_exact_in, quote_exact_out};
use bonding_curve_math::pool::state::{
    ActivationType, BaseFeeConfig, BaseFeeMode, CollectFeeMode, DynamicFeeConfig, TradeDirection,
    VirtualPoolState, VolatilityTracker,
};
use bonding_curve_math::{PoolConfig, U256};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn built_config() -> PoolConfig {
    build_curve(&BuildCurveParams {
        base: CommonBuildParams {
            total_token_supply: 1_000_000_000,
            token_base_decimal: 6,
            token_quote_decimal: 9,
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
            referral_fee_percent: 20,
        },
        percentage_supply_on_migration: 2.983257229832572,
        migration_quote_threshold: 95.07640791476408,
    })
    .unwrap()
}

fn fresh_pool(config: &PoolConfig) -> VirtualPoolState {
    VirtualPoolState {
        sqrt_price: config.sqrt_start_price,
        base_reserve: u64::MAX,
        quote_reserve: 0,
        activation_point: 0,
        volatility_tracker: VolatilityTracker::default(),
    }
}

fn bench_mul_div(c: &mut Criterion) {
    let a = U256::from(123_456_789_012_345_678u128);
    let b = U256::from(987_654_321_098_765_432u128);
    let denominator = U256::from(1_000_000_007u64);
    c.bench_function("mul_div", |bench| {
        bench.iter(|| {
            mul_div(
                black_box(a),
                black_box(b),
                black_box(denominator),
                Rounding::Up,
            )
            .unwrap()
        })
    });
}

fn bench_isqrt(c: &mut Criterion) {
    let value = U256::from(987_654_321_098_765_432_109_876_543_210u128);
    c.bench_function("isqrt", |bench| {
        bench.iter(|| isqrt(black_box(value)))
    });
}

fn bench_delta_base(c: &mut Criterion) {
    let lower = 1u128 << 64;
    let upper = 18_448_588_748_116_922_571u128;
    let liquidity = 1u128 << 100;
    c.bench_function("delta_base", |bench| {
        bench.iter(|| {
            delta_base(
                black_box(lower),
                black_box(upper),
                black_box(liquidity),
                Rounding::Down,
            )
            .unwrap()
        })
    });
}

fn bench_quote_exact_in(c: &mut Criterion) {
    let config = built_config();
    let pool = fresh_pool(&config);
    c.bench_function("quote_exact_in", |bench| {
        bench.iter(|| {
            quote_exact_in(
                black_box(&config),
                black_box(&pool),
                TradeDirection::QuoteToBase,
                0,
                black_box(1_000_000_000),
                100,
                false,
            )
            .unwrap()
        })
    });
}

fn bench_quote_exact_out(c: &mut Criterion) {
    let config = built_config();
    let pool = fresh_pool(&config);
    c.bench_function("quote_exact_out", |bench| {
        bench.iter(|| {
            quote_exact_out(
                black_box(&config),
                black_box(&pool),
                TradeDirection::QuoteToBase,
                0,
                black_box(1_000_000_000_000),
                100,
                false,
            )
            .unwrap()
        })
    });
}

fn bench_build_curve(c: &mut Criterion) {
    c.bench_function("build_curve", |bench| bench.iter(built_config));
}

criterion_group!(
    benches,
    bench_mul_div,
    bench_isqrt,
    bench_delta_base,
    bench_quote_exact_in,
    bench_quote_exact_out,
    bench_build_curve
);
criterion_main!(benches);
