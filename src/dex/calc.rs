use crate::dex::state::EffectivePoolState;
use crate::errors::QuoteError;
use crate::models::{
    AssetDescriptor, PoolDescriptor, PoolStatus, QuoteRequest, QuoteResponse, QuoteResult, Side,
};
use alloy_primitives::{U256, U512};
use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::{One, ToPrimitive, Zero};
use std::fmt;
use std::str::FromStr;

/// How a venue's deployed contract applies its fee to the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeeMode {
    /// Fee rounded up to whole base units and removed from the input before
    /// the invariant (Raydium `swap_base_in`).
    TruncatedInput,
    /// Fee kept at full scale:
    /// `out = in*(den-num)*R_out / (R_in*den + in*(den-num))` (Uniswap V2 `getAmountOut`).
    ScaledInput,
}

impl FromStr for FeeMode {
    type Err = QuoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "truncated" => Ok(FeeMode::TruncatedInput),
            "scaled" => Ok(FeeMode::ScaledInput),
            other => Err(QuoteError::InvalidFeeMode(other.to_string())),
        }
    }
}

/// Venue trading fee, taken from the input amount before the invariant is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeRate {
    pub numerator: u64,
    pub denominator: u64,
    pub mode: FeeMode,
}

impl FeeRate {
    /// Raydium AMM v4 swap fee (0.25%).
    pub const RAYDIUM_AMM_V4: FeeRate = FeeRate {
        numerator: 25,
        denominator: 10_000,
        mode: FeeMode::TruncatedInput,
    };
    /// Uniswap V2 pair fee (0.30%).
    pub const UNISWAP_V2: FeeRate = FeeRate {
        numerator: 3,
        denominator: 1_000,
        mode: FeeMode::ScaledInput,
    };

    pub fn new(numerator: u64, denominator: u64, mode: FeeMode) -> Result<Self, QuoteError> {
        let fee = Self {
            numerator,
            denominator,
            mode,
        };
        fee.validate()?;
        Ok(fee)
    }

    /// Fee must lie in `[0, 1)`.
    pub fn validate(&self) -> Result<(), QuoteError> {
        if self.denominator == 0 || self.numerator >= self.denominator {
            return Err(QuoteError::InvalidFeeRate {
                numerator: self.numerator,
                denominator: self.denominator,
            });
        }
        Ok(())
    }

    /// Input amount left after a whole-unit fee, rounded up as the on-chain
    /// `swap_base_in` does. Only meaningful for [`FeeMode::TruncatedInput`].
    pub fn amount_after_fee(&self, amount_in: u128) -> Result<u128, QuoteError> {
        self.validate()?;
        let amount = U256::from(amount_in);
        let den = U256::from(self.denominator);
        let fee = (amount * U256::from(self.numerator) + den - U256::from(1u8)) / den;
        let fee = u128::try_from(fee).map_err(|_| QuoteError::Overflow("fee"))?;
        amount_in
            .checked_sub(fee)
            .ok_or(QuoteError::Overflow("amount after fee"))
    }

    /// `(input_reserve', amount_in')` of the invariant, both in the same scale.
    fn scaled_terms(
        &self,
        input_reserve: u128,
        amount_in: u128,
    ) -> Result<(U512, U512), QuoteError> {
        match self.mode {
            FeeMode::TruncatedInput => Ok((
                U512::from(input_reserve),
                U512::from(self.amount_after_fee(amount_in)?),
            )),
            FeeMode::ScaledInput => Ok((
                U512::from(input_reserve) * U512::from(self.denominator),
                U512::from(amount_in) * U512::from(self.denominator - self.numerator),
            )),
        }
    }

    pub fn bps(&self) -> f64 {
        self.numerator as f64 * 10_000.0 / self.denominator as f64
    }
}

/// Most fractional digits a slippage tolerance may carry.
pub const MAX_SLIPPAGE_SCALE: i64 = 18;

/// Slippage tolerance: the fraction of the quoted output the caller accepts
/// losing to adverse execution. Held as an exact decimal in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd)]
pub struct Slippage(BigDecimal);

impl Slippage {
    pub fn new(fraction: BigDecimal) -> Result<Self, QuoteError> {
        let (mut digits, mut scale) = fraction.into_bigint_and_exponent();
        if digits.is_zero() {
            return Ok(Self(BigDecimal::zero()));
        }
        let ten = BigInt::from(10);
        while scale > MAX_SLIPPAGE_SCALE && (&digits % &ten).is_zero() {
            digits /= &ten;
            scale -= 1;
        }
        // Checked before any comparison: aligning an unbounded scale is unbounded work.
        if !(0..=MAX_SLIPPAGE_SCALE).contains(&scale) {
            return Err(QuoteError::InvalidSlippage(format!("{digits}e{}", -scale)));
        }
        let fraction = BigDecimal::new(digits, scale);
        if fraction < BigDecimal::zero() || fraction > BigDecimal::one() {
            return Err(QuoteError::InvalidSlippage(fraction.to_string()));
        }
        Ok(Self(fraction))
    }

    /// 100 bps = 1%.
    pub fn from_bps(bps: u32) -> Result<Self, QuoteError> {
        Self::new(BigDecimal::new(BigInt::from(bps), 4))
    }

    pub fn fraction(&self) -> &BigDecimal {
        &self.0
    }

    /// `floor(amount_out * (1 - tolerance))`.
    pub fn min_amount_out(&self, amount_out: u128) -> Result<u128, QuoteError> {
        let keep = BigDecimal::one() - &self.0;
        let scaled = BigDecimal::from(BigInt::from(amount_out)) * keep;
        let (floored, _) = scaled.with_scale(0).into_bigint_and_exponent();
        floored
            .to_u128()
            .ok_or(QuoteError::Overflow("min amount out"))
    }
}

impl Default for Slippage {
    /// 1%.
    fn default() -> Self {
        Self(BigDecimal::new(BigInt::from(1), 2))
    }
}

impl FromStr for Slippage {
    type Err = QuoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fraction = BigDecimal::from_str(s.trim())
            .map_err(|_| QuoteError::InvalidSlippage(s.to_string()))?;
        Self::new(fraction)
    }
}

impl fmt::Display for Slippage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a venue maps its raw status code onto "trading enabled".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusPolicy {
    /// The venue has no status flag.
    AlwaysActive,
    /// Only these codes allow swaps.
    ActiveCodes(Vec<u64>),
}

impl StatusPolicy {
    pub fn is_active(&self, status: PoolStatus) -> bool {
        match self {
            StatusPolicy::AlwaysActive => true,
            StatusPolicy::ActiveCodes(codes) => codes.contains(&status.0),
        }
    }
}

/// Venue-specific constants the engine is configured with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurveParams {
    pub fee: FeeRate,
    pub status_policy: StatusPolicy,
}

/// Which pool asset is sold and which is bought.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDirection {
    pub side: Side,
    pub input: AssetDescriptor,
    pub output: AssetDescriptor,
}

impl ResolvedDirection {
    pub fn reversed(&self) -> Self {
        Self {
            side: self.side.reversed(),
            input: self.output.clone(),
            output: self.input.clone(),
        }
    }
}

/// Select the (input, output) pair for `input_asset` within `pool`.
pub fn resolve_direction(
    pool: &PoolDescriptor,
    input_asset: &str,
) -> Result<ResolvedDirection, QuoteError> {
    if pool.asset_a.address == input_asset {
        Ok(ResolvedDirection {
            side: Side::AtoB,
            input: pool.asset_a.clone(),
            output: pool.asset_b.clone(),
        })
    } else if pool.asset_b.address == input_asset {
        Ok(ResolvedDirection {
            side: Side::BtoA,
            input: pool.asset_b.clone(),
            output: pool.asset_a.clone(),
        })
    } else {
        Err(QuoteError::InvalidInputAsset {
            asset: input_asset.to_string(),
            asset_a: pool.asset_a.address.clone(),
            asset_b: pool.asset_b.address.clone(),
        })
    }
}

/// Constant-product output for raw reserves: returns `(amount_out, min_amount_out)`.
///
/// `amount_out = floor(output_reserve * in' / (input_reserve' + in'))` where the
/// primed terms carry the fee as the venue's contract applies it (see
/// [`FeeMode`]). Truncation means the engine never reports more than the
/// invariant yields.
pub fn quote_amounts(
    input_reserve: u128,
    output_reserve: u128,
    amount_in: u128,
    slippage: &Slippage,
    fee: FeeRate,
) -> Result<(u128, u128), QuoteError> {
    fee.validate()?;
    if amount_in == 0 {
        return Ok((0, 0));
    }

    let (reserve_term, input_term) = fee.scaled_terms(input_reserve, amount_in)?;
    let denominator = reserve_term + input_term;
    if denominator.is_zero() {
        return Err(QuoteError::DivisionByZero);
    }
    if input_reserve == 0 || output_reserve == 0 {
        return Err(QuoteError::DegenerateReserves {
            input_reserve,
            output_reserve,
        });
    }

    let amount_out = U512::from(output_reserve) * input_term / denominator;
    let amount_out = u128::try_from(amount_out).map_err(|_| QuoteError::Overflow("amount out"))?;
    let min_amount_out = slippage.min_amount_out(amount_out)?;
    Ok((amount_out, min_amount_out))
}

/// Quote `amount_in` of `direction.input` against a pool snapshot.
pub fn compute_amount_out(
    state: &EffectivePoolState,
    direction: &ResolvedDirection,
    amount_in: u128,
    slippage: &Slippage,
    params: &CurveParams,
) -> Result<QuoteResult, QuoteError> {
    if !params.status_policy.is_active(state.status) {
        return Err(QuoteError::PoolInactive(state.status.0));
    }

    let (input_reserve, output_reserve) = state.reserves_for(direction.side);
    let (amount_out, min_amount_out) =
        quote_amounts(input_reserve, output_reserve, amount_in, slippage, params.fee)?;

    Ok(QuoteResult {
        amount_out,
        min_amount_out,
        input_asset: direction.input.clone(),
        output_asset: direction.output.clone(),
    })
}

/// Service-style entry point: raw reserves in, amounts out.
pub fn quote(request: &QuoteRequest, fee: FeeRate) -> Result<QuoteResponse, QuoteError> {
    let slippage: Slippage = request.slippage.parse()?;
    let (input_reserve, output_reserve) = request.reserves.aligned(request.side);
    let (amount_out, min_amount_out) =
        quote_amounts(input_reserve, output_reserve, request.amount_in, &slippage, fee)?;
    Ok(QuoteResponse {
        amount_out,
        min_amount_out,
    })
}
