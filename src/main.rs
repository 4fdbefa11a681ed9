use amm_arbitrager::{
    arbitrage::{Arbitrager, compare_quotes},
    config::AppConfig,
    dex::{EvmPairClient, client::address_id, client::parse_address},
    executor::DryRunExecutor,
    models::TradeRequest,
    utils,
    venue::{ConstantProductVenue, Venue, VenueQuoter},
};
use anyhow::Result;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();
    utils::init_logging();

    let config = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "[INIT] invalid configuration");
            return Ok(ExitCode::FAILURE);
        }
    };
    tracing::info!(
        pool_a = %config.pool_a,
        pool_b = ?config.pool_b,
        amount_in = config.amount_in,
        slippage = %config.slippage,
        fee_bps = config.fee.bps(),
        execute = config.execute,
        "[INIT] amm-arbitrager starting"
    );

    let client = EvmPairClient::new(config.rpc_url.as_str())?;
    let input_asset = address_id(parse_address(&config.input_asset)?);
    let request = TradeRequest::new(input_asset, config.amount_in);
    let quoter = |name: &str| VenueQuoter::ConstantProduct(ConstantProductVenue::evm_pair(name, config.fee));

    if let Some(pool_b) = &config.pool_b {
        let venues = vec![
            Venue::new(quoter("venue-a"), client.clone(), config.pool_a.clone()),
            Venue::new(quoter("venue-b"), client.clone(), pool_b.clone()),
        ];
        match compare_quotes(&venues, &request, &config.slippage, config.request_timeout).await {
            Ok(cmp) => {
                for vq in &cmp.ranked {
                    tracing::info!(
                        venue = %vq.venue,
                        pool = %vq.pool_id,
                        report = %serde_json::to_string(&vq.quote)?,
                        "[ARB] venue quote"
                    );
                }
            }
            Err(e) => tracing::warn!(error = %e, "[ARB] venue comparison failed"),
        }
    }

    let arbitrager = Arbitrager::new(
        Venue::new(quoter("venue-a"), client, config.pool_a.clone()),
        DryRunExecutor::new(),
        config.arbitrage_config(),
    );
    match arbitrager.arbitrage(&request).await {
        Ok(outcome) => {
            tracing::info!(
                exit_code = outcome.exit_code(),
                report = %serde_json::to_string(outcome.quote())?,
                "[ARB] run finished"
            );
            Ok(ExitCode::from(outcome.exit_code()))
        }
        Err(e) => {
            tracing::error!(
                error = %e,
                collaborator = e.is_collaborator_error(),
                "[ARB] run failed"
            );
            Ok(ExitCode::FAILURE)
        }
    }
}
