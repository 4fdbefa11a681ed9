//! Per-venue quoting capability.

use crate::dex::{
    EffectivePoolState, PoolStateFetcher,
    calc::{CurveParams, FeeRate, ResolvedDirection, Slippage, StatusPolicy, compute_amount_out},
};
use crate::errors::{AppError, Result};
use crate::models::QuoteResult;

/// Raydium AMM v4 statuses that allow swaps: `Initialized` and `SwapOnly`.
pub const RAYDIUM_ACTIVE_STATUSES: [u64; 2] = [1, 6];

/// A constant-product venue and its deployed-contract constants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstantProductVenue {
    pub name: String,
    pub params: CurveParams,
}

impl ConstantProductVenue {
    pub fn raydium_amm_v4() -> Self {
        Self {
            name: "raydium-amm-v4".into(),
            params: CurveParams {
                fee: FeeRate::RAYDIUM_AMM_V4,
                status_policy: StatusPolicy::ActiveCodes(RAYDIUM_ACTIVE_STATUSES.to_vec()),
            },
        }
    }

    pub fn uniswap_v2() -> Self {
        Self::evm_pair("uniswap-v2", FeeRate::UNISWAP_V2)
    }

    /// Status-less EVM pair with a configured fee.
    pub fn evm_pair(name: impl Into<String>, fee: FeeRate) -> Self {
        Self {
            name: name.into(),
            params: CurveParams {
                fee,
                status_policy: StatusPolicy::AlwaysActive,
            },
        }
    }
}

/// Quoting capability, one variant per supported venue kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VenueQuoter {
    ConstantProduct(ConstantProductVenue),
    /// Venue known by name whose quoting logic does not exist yet.
    Unimplemented { name: String },
}

impl VenueQuoter {
    pub fn name(&self) -> &str {
        match self {
            VenueQuoter::ConstantProduct(v) => &v.name,
            VenueQuoter::Unimplemented { name } => name,
        }
    }

    pub fn is_implemented(&self) -> bool {
        !matches!(self, VenueQuoter::Unimplemented { .. })
    }

    pub fn quote(
        &self,
        state: &EffectivePoolState,
        direction: &ResolvedDirection,
        amount_in: u128,
        slippage: &Slippage,
    ) -> Result<QuoteResult> {
        match self {
            VenueQuoter::ConstantProduct(venue) => Ok(compute_amount_out(
                state,
                direction,
                amount_in,
                slippage,
                &venue.params,
            )?),
            VenueQuoter::Unimplemented { name } => Err(AppError::VenueUnimplemented(name.clone())),
        }
    }
}

/// A quoter bound to one pool and the collaborator that reads its state.
pub struct Venue<F> {
    pub quoter: VenueQuoter,
    pub fetcher: F,
    pub pool_id: String,
}

impl<F: PoolStateFetcher> Venue<F> {
    pub fn new(quoter: VenueQuoter, fetcher: F, pool_id: impl Into<String>) -> Self {
        Self {
            quoter,
            fetcher,
            pool_id: pool_id.into(),
        }
    }

    pub fn name(&self) -> &str {
        self.quoter.name()
    }

    pub async fn fetch_state(&self) -> Result<EffectivePoolState> {
        self.fetcher.fetch_pool_state(&self.pool_id).await
    }
}
