use super::types::{QuoteComparison, VenueQuote};
use crate::dex::{PoolStateFetcher, Slippage, resolve_direction};
use crate::errors::{AppError, Result};
use crate::models::TradeRequest;
use crate::utils::with_deadline;
use crate::venue::Venue;
use std::time::Duration;
use tracing::info;

/// Quote the same request on every venue and rank them by output.
///
/// Fails as a whole if any venue cannot quote: a partial ranking would be
/// misleading. No trade decision is made here.
pub async fn compare_quotes<F: PoolStateFetcher>(
    venues: &[Venue<F>],
    request: &TradeRequest,
    slippage: &Slippage,
    request_timeout: Duration,
) -> Result<QuoteComparison> {
    if venues.is_empty() {
        return Err(AppError::Config("no venues to compare".into()));
    }
    if let Some(v) = venues.iter().find(|v| !v.quoter.is_implemented()) {
        return Err(AppError::VenueUnimplemented(v.name().to_string()));
    }

    let states = futures::future::try_join_all(
        venues
            .iter()
            .map(|v| with_deadline(request_timeout, "fetch pool state", v.fetch_state())),
    )
    .await?;

    let mut ranked = Vec::with_capacity(venues.len());
    for (venue, state) in venues.iter().zip(states.iter()) {
        let direction = resolve_direction(&state.descriptor, &request.input_asset)?;
        let quote = venue
            .quoter
            .quote(state, &direction, request.amount_in, slippage)?;
        ranked.push(VenueQuote {
            venue: venue.name().to_string(),
            pool_id: venue.pool_id.clone(),
            quote,
        });
    }
    // stable: ties keep venue order
    ranked.sort_by(|a, b| b.quote.amount_out.cmp(&a.quote.amount_out));

    let comparison = QuoteComparison { ranked };
    if let Some(best) = comparison.best() {
        info!(
            best_venue = %best.venue,
            best_amount_out = best.quote.amount_out,
            spread = comparison.spread(),
            "[ARB] venue quotes compared"
        );
    }
    Ok(comparison)
}
