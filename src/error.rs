use thiserror::Error;

#[derive(Debug, Error)]
pub enum MathError {
    #[error("math error - overflow")]
    Overflow,
    #[error("math error - division by zero")]
    DivisionByZero,
    #[error("math error - subtraction below zero")]
    NegativeResidual,
    #[error("math error - amount exceeds the 64-bit ceiling")]
    AmountOverflow,
}

#[derive(Debug, Error)]
pub enum CurveError {
    #[error("curve error - sqrt price cannot be zero")]
    SqrtPriceIsZero,

    #[error("curve error - liquidity cannot be zero")]
    LiquidityIsZero,

    #[error("curve error - amount cannot be zero")]
    AmountIsZero,

    #[error("curve error - sqrt price range is inverted")]
    InvertedPriceRange,

    #[error("curve error - not enough liquidity to process the entire amount")]
    InsufficientLiquidity,

    #[error("curve error - pool already reached its migration quote threshold")]
    PoolCompleted,

    #[error("curve error - slippage exceeds the basis point max")]
    InvalidSlippage,
}

#[derive(Debug, Error)]
pub enum FeeError {
    #[error("fee error - rate limiter inversion produced a numerator below the cliff")]
    UndeterminedFee,
    #[error("fee error - invalid base fee configuration")]
    InvalidFeeConfig,
}

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("build error - {0} exceeds its integer capacity")]
    CapacityExceeded(&'static str),
    #[error("build error - curve parameters are not solvable")]
    UnsolvableCurve,
    #[error("build error - {0} is not a valid finite number")]
    NonFiniteParameter(&'static str),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    MathError(#[from] MathError),

    #[error(transparent)]
    CurveError(#[from] CurveError),

    #[error(transparent)]
    FeeError(#[from] FeeError),

    #[error(transparent)]
    BuildError(#[from] BuildError),
}
