//! Single-venue quote-and-execute workflow.

use super::types::ArbitrageConfig;
use crate::dex::{EffectivePoolState, PoolStateFetcher, resolve_direction};
use crate::errors::Result;
use crate::executor::SwapExecutor;
use crate::models::{QuoteResult, RunOutcome, TradeRequest};
use crate::utils::{format_human_readable, with_deadline};
use crate::venue::Venue;
use tracing::{info, warn};

pub struct Arbitrager<F, E> {
    venue: Venue<F>,
    executor: E,
    config: ArbitrageConfig,
}

impl<F: PoolStateFetcher, E: SwapExecutor> Arbitrager<F, E> {
    pub fn new(venue: Venue<F>, executor: E, config: ArbitrageConfig) -> Self {
        Self {
            venue,
            executor,
            config,
        }
    }

    pub fn venue(&self) -> &Venue<F> {
        &self.venue
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Quote `request` against freshly fetched pool state.
    pub async fn simulate_amount_out(&self, request: &TradeRequest) -> Result<QuoteResult> {
        let (_, quote) = self.fetch_and_quote(request).await?;
        Ok(quote)
    }

    async fn fetch_and_quote(&self, request: &TradeRequest) -> Result<(EffectivePoolState, QuoteResult)> {
        let state = with_deadline(
            self.config.request_timeout,
            "fetch pool state",
            self.venue.fetch_state(),
        )
        .await?;
        let direction = resolve_direction(&state.descriptor, &request.input_asset)?;
        let quote =
            self.venue
                .quoter
                .quote(&state, &direction, request.amount_in, &self.config.slippage)?;
        Ok((state, quote))
    }

    /// Quote, then submit with `min_amount_out` as the floor and wait for
    /// confirmation. Nothing is submitted if quoting fails.
    pub async fn arbitrage(&self, request: &TradeRequest) -> Result<RunOutcome> {
        let (state, quote) = self.fetch_and_quote(request).await?;

        info!(
            venue = %self.venue.name(),
            slippage = %self.config.slippage,
            "[QUOTE] computed swap {} to {}, minimum amount out {}",
            format_human_readable(
                request.amount_in,
                quote.input_asset.decimals,
                quote.input_asset.label()
            ),
            format_human_readable(
                quote.amount_out,
                quote.output_asset.decimals,
                quote.output_asset.label()
            ),
            format_human_readable(
                quote.min_amount_out,
                quote.output_asset.decimals,
                quote.output_asset.label()
            ),
        );

        if !self.config.execute {
            return Ok(RunOutcome::Quoted { quote });
        }
        if quote.amount_out == 0 {
            warn!(amount_in = request.amount_in, "[EXEC] quote yields no output, not submitting");
            return Ok(RunOutcome::Skipped { quote });
        }

        let handle = with_deadline(
            self.config.request_timeout,
            "submit swap",
            self.executor.submit_swap(
                &state.descriptor,
                request.amount_in,
                quote.min_amount_out,
                &quote.input_asset.address,
            ),
        )
        .await?;
        let confirmation = with_deadline(
            self.config.request_timeout,
            "confirm transaction",
            self.executor.confirm_transaction(&handle),
        )
        .await?;
        info!(tx = %confirmation.handle.id, "[EXEC] swap confirmed");

        Ok(RunOutcome::Executed {
            quote,
            confirmation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dex::{Slippage, StaticPoolFetcher};
    use crate::errors::{AppError, QuoteError};
    use crate::executor::DryRunExecutor;
    use crate::models::{AssetDescriptor, PoolDescriptor, PoolReserves, PoolStatus};
    use crate::venue::{ConstantProductVenue, VenueQuoter};
    use std::time::Duration;

    const POOL: &str = "58oQChx4yWmvKdwLLZzBi4ChoCc2fqCUWBkwMihLYQo2";
    const WSOL: &str = "So11111111111111111111111111111111111111112";
    const USDC: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";

    fn fetcher(status: u64) -> StaticPoolFetcher {
        StaticPoolFetcher::new([EffectivePoolState::new(
            PoolDescriptor {
                pool_id: POOL.into(),
                asset_a: AssetDescriptor::new(WSOL, 9, Some("WSOL")),
                asset_b: AssetDescriptor::new(USDC, 6, Some("USDC")),
            },
            PoolReserves {
                base: 1_000_000,
                quote: 2_000_000,
            },
            PoolStatus(status),
        )])
    }

    fn arbitrager<E: SwapExecutor>(
        fetcher: StaticPoolFetcher,
        executor: E,
        execute: bool,
    ) -> Arbitrager<StaticPoolFetcher, E> {
        let venue = Venue::new(
            VenueQuoter::ConstantProduct(ConstantProductVenue::raydium_amm_v4()),
            fetcher,
            POOL,
        );
        Arbitrager::new(
            venue,
            executor,
            ArbitrageConfig {
                slippage: Slippage::from_bps(100).unwrap(),
                request_timeout: Duration::from_secs(1),
                execute,
            },
        )
    }

    #[tokio::test]
    async fn simulate_uses_fresh_reserves() {
        let f = fetcher(6);
        let arb = arbitrager(f.clone(), DryRunExecutor::new(), false);
        let q = arb
            .simulate_amount_out(&TradeRequest::new(WSOL, 10_000))
            .await
            .unwrap();
        assert_eq!((q.amount_out, q.min_amount_out), (19_752, 19_554));

        f.update_reserves(POOL, PoolReserves { base: 2_000_000, quote: 2_000_000 }, PoolStatus(6))
            .await
            .unwrap();
        let q = arb
            .simulate_amount_out(&TradeRequest::new(WSOL, 10_000))
            .await
            .unwrap();
        // 2_000_000 * 9_975 / 2_009_975
        assert_eq!(q.amount_out, 9_925);
    }

    #[tokio::test]
    async fn executes_with_min_amount_out() {
        let exec = DryRunExecutor::new();
        let arb = arbitrager(fetcher(1), exec.clone(), true);
        let outcome = arb.arbitrage(&TradeRequest::new(WSOL, 10_000)).await.unwrap();

        assert!(matches!(outcome, RunOutcome::Executed { .. }));
        assert_eq!(outcome.exit_code(), 0);
        let swaps = exec.submitted().await;
        assert_eq!(swaps.len(), 1);
        assert_eq!(swaps[0].amount_in, 10_000);
        assert_eq!(swaps[0].min_amount_out, 19_554);
        assert_eq!(swaps[0].input_asset, WSOL);
    }

    #[tokio::test]
    async fn quote_only_when_execution_disabled() {
        let exec = DryRunExecutor::new();
        let arb = arbitrager(fetcher(1), exec.clone(), false);
        let outcome = arb.arbitrage(&TradeRequest::new(USDC, 10_000)).await.unwrap();
        assert!(matches!(outcome, RunOutcome::Quoted { .. }));
        assert_eq!(outcome.quote().output_asset.address, WSOL);
        assert!(exec.submitted().await.is_empty());
    }

    #[tokio::test]
    async fn zero_output_is_skipped() {
        let exec = DryRunExecutor::new();
        let arb = arbitrager(fetcher(1), exec.clone(), true);
        let outcome = arb.arbitrage(&TradeRequest::new(WSOL, 0)).await.unwrap();
        assert!(matches!(outcome, RunOutcome::Skipped { .. }));
        assert_eq!(outcome.exit_code(), 2);
        assert!(exec.submitted().await.is_empty());
    }

    #[tokio::test]
    async fn validation_errors_submit_nothing() {
        let exec = DryRunExecutor::new();
        let arb = arbitrager(fetcher(1), exec.clone(), true);
        let err = arb
            .arbitrage(&TradeRequest::new("4k3Dyjzvzp8eMZWUXbBCjEvwSkkk59S5iCNLY3QrkX6R", 10))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Quote(QuoteError::InvalidInputAsset { .. })));

        let paused = arbitrager(fetcher(2), exec.clone(), true);
        let err = paused.arbitrage(&TradeRequest::new(WSOL, 10)).await.unwrap_err();
        assert!(matches!(err, AppError::Quote(QuoteError::PoolInactive(2))));

        assert!(exec.submitted().await.is_empty());
    }

    #[tokio::test]
    async fn rejected_confirmation_propagates() {
        let arb = arbitrager(fetcher(1), DryRunExecutor::rejecting("price moved"), true);
        let err = arb.arbitrage(&TradeRequest::new(WSOL, 10_000)).await.unwrap_err();
        assert!(matches!(err, AppError::Rejected(_)));
        assert!(err.is_collaborator_error());
    }

    struct StalledFetcher;

    impl PoolStateFetcher for StalledFetcher {
        async fn fetch_pool_state(&self, _pool_id: &str) -> Result<EffectivePoolState> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Err(AppError::Network("unreachable".into()))
        }
    }

    #[tokio::test]
    async fn stalled_fetch_times_out() {
        let venue = Venue::new(
            VenueQuoter::ConstantProduct(ConstantProductVenue::raydium_amm_v4()),
            StalledFetcher,
            POOL,
        );
        let arb = Arbitrager::new(
            venue,
            DryRunExecutor::new(),
            ArbitrageConfig {
                request_timeout: Duration::from_millis(20),
                ..ArbitrageConfig::default()
            },
        );
        let err = arb
            .simulate_amount_out(&TradeRequest::new(WSOL, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Timeout { .. }));
    }
}
