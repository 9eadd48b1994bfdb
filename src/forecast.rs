//! Multi-year price forecast.
//!
//! Fans out one valuation request per requested year, holding every other
//! selection attribute fixed, and reassembles the responses into a series
//! ordered by the requested years regardless of completion order.

use crate::breakdown::compute_breakdown;
use crate::config::AppConfig;
use crate::selection::Selection;
use crate::ui;
use crate::valuation::{ValuationError, ValuationProvider};
use anyhow::Result;
use chrono::Datelike;
use comfy_table::Cell;
use futures::future::join_all;
use indicatif::ProgressBar;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// One year of the forecast series. `price` is `None` when that year's
/// valuation call failed; sibling years are unaffected.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastPoint {
    pub year: u16,
    pub price: Option<f64>,
}

#[derive(Debug, Error)]
pub enum ForecastError {
    /// No request of the batch received any response. Partial series are
    /// only produced when the oracle answered at least once.
    #[error("valuation oracle unreachable for the whole batch: {0}")]
    OracleUnreachable(String),
}

/// Requests one valuation per year concurrently and returns the series in
/// the order of `years`.
///
/// A failed or malformed individual response degrades to `price: None` for
/// that year only. The batch as a whole fails only when every request died
/// at transport level. There is no cancellation; a racing resubmission is
/// the caller's concern.
pub async fn forecast(
    provider: &dyn ValuationProvider,
    selection: &Selection,
    years: &[u16],
    pb: ProgressBar,
) -> Result<Vec<ForecastPoint>, ForecastError> {
    let request_futures = years.iter().map(|year| {
        let pb = pb.clone();
        async move {
            let result = provider.predict(selection, *year).await;
            pb.inc(1);
            (*year, result)
        }
    });

    let results = join_all(request_futures).await;
    pb.finish_and_clear();

    let any_response = results
        .iter()
        .any(|(_, r)| !matches!(r, Err(ValuationError::Unreachable(_))));
    if !any_response && !results.is_empty() {
        let reason = results
            .iter()
            .find_map(|(_, r)| match r {
                Err(ValuationError::Unreachable(msg)) => Some(msg.clone()),
                _ => None,
            })
            .unwrap_or_default();
        return Err(ForecastError::OracleUnreachable(reason));
    }

    let series = results
        .into_iter()
        .map(|(year, result)| {
            let price = match result {
                Ok(price) => Some(price),
                Err(e) => {
                    debug!("Valuation failed for year {year}: {e}");
                    None
                }
            };
            ForecastPoint { year, price }
        })
        .collect();

    Ok(series)
}

pub async fn run(config_path: Option<&str>, from: Option<u16>, to: Option<u16>) -> Result<()> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };

    let current_year = chrono::Utc::now().year() as u16;
    let to = to.unwrap_or(current_year);
    let from = from.unwrap_or_else(|| to.saturating_sub(5));
    if from > to {
        anyhow::bail!("Invalid year range: {from} > {to}");
    }
    let years: Vec<u16> = (from..=to).collect();

    let catalog_cache = Arc::new(crate::cache::Cache::new());
    let catalog_provider = crate::providers::http_catalog::HttpCatalogProvider::new(
        config.catalog_base_url(),
        catalog_cache,
    );
    let selection = crate::quote::resolve_live_selection(&catalog_provider, &config.vehicle).await?;

    let oracle_cache = Arc::new(crate::cache::Cache::new());
    let oracle =
        crate::providers::http_oracle::HttpValuationOracle::new(config.oracle_base_url(), oracle_cache);

    let pb = ui::new_progress_bar(years.len() as u64, true);
    pb.set_message("Requesting valuations...");
    let series = forecast(&oracle, &selection, &years, pb).await?;

    println!("{}", display_as_table(&selection, &series, &config.rates));
    Ok(())
}

fn display_as_table(
    selection: &Selection,
    series: &[ForecastPoint],
    rates: &crate::breakdown::Rates,
) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Year"),
        ui::header_cell("Predicted Price (JPY)"),
        ui::header_cell("Landed Total (MNT)"),
    ]);

    for point in series {
        let price = ui::format_optional_cell(point.price, |p| format!("{p:.0}"));
        let landed = ui::format_optional_cell(point.price, |p| {
            format!("{:.0}", compute_breakdown(p, rates).grand_total_mnt)
        });
        table.add_row(vec![Cell::new(point.year.to_string()), price, landed]);
    }

    format!(
        "Forecast: {}\n\n{}",
        ui::style_text(
            &format!("{} {}", selection.maker, selection.model),
            ui::StyleType::Title
        ),
        table
    )
}
