//! Landed-cost quote for a single vehicle.
//!
//! Resolves the configured selection against the live catalog, obtains a
//! predicted auction price (unless one is given explicitly) and prints the
//! full cost breakdown as an invoice-style table.

use crate::breakdown::{CostBreakdown, Rates, compute_breakdown};
use crate::catalog::CatalogProvider;
use crate::config::AppConfig;
use crate::selection::{Selection, resolve_selection};
use crate::ui;
use anyhow::{Context, Result};
use comfy_table::Cell;
use std::sync::Arc;
use tracing::debug;

/// Repairs the configured selection against the live catalog.
///
/// The top-level catalog decides the maker; if that repair changed the maker,
/// the dependent levels are stale and the catalog is refetched scoped to the
/// new maker before the final resolution. A consistent selection never causes
/// the second fetch.
pub async fn resolve_live_selection(
    provider: &dyn CatalogProvider,
    configured: &Selection,
) -> Result<Selection> {
    let catalog = provider
        .fetch_catalog(None)
        .await
        .context("Failed to load vehicle catalog")?;
    let resolution = resolve_selection(&catalog, configured);

    if resolution.selection.maker == configured.maker || resolution.selection.maker.is_empty() {
        return Ok(resolution.selection);
    }

    debug!(
        "Maker changed from '{}' to '{}', refetching scoped catalog",
        configured.maker, resolution.selection.maker
    );
    let scoped = provider
        .fetch_catalog(Some(&resolution.selection.maker))
        .await
        .context("Failed to load maker-scoped catalog")?;
    Ok(resolve_selection(&scoped, &resolution.selection).selection)
}

pub async fn run(config_path: Option<&str>, price_override: Option<f64>) -> Result<()> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };

    let catalog_cache = Arc::new(crate::cache::Cache::new());
    let catalog_provider = crate::providers::http_catalog::HttpCatalogProvider::new(
        config.catalog_base_url(),
        catalog_cache,
    );
    let selection = resolve_live_selection(&catalog_provider, &config.vehicle).await?;

    let price = match price_override {
        Some(price) => price,
        None => {
            let oracle_cache = Arc::new(crate::cache::Cache::new());
            let oracle = crate::providers::http_oracle::HttpValuationOracle::new(
                config.oracle_base_url(),
                oracle_cache,
            );
            let year: u16 = selection
                .year
                .parse()
                .with_context(|| format!("Selected year is not numeric: '{}'", selection.year))?;
            use crate::valuation::ValuationProvider;
            oracle
                .predict(&selection, year)
                .await
                .context("Failed to obtain predicted price")?
        }
    };

    let breakdown = compute_breakdown(price, &config.rates);
    println!("{}", display_as_table(&selection, &breakdown, &config.rates));
    Ok(())
}

fn jpy(amount: f64) -> String {
    format!("{amount:.0} JPY")
}

fn mnt(amount: f64) -> String {
    format!("{amount:.0} MNT")
}

fn display_as_table(selection: &Selection, breakdown: &CostBreakdown, rates: &Rates) -> String {
    let rates = rates.sanitized();
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("#"),
        ui::header_cell("Item"),
        ui::header_cell("Source Amount"),
        ui::header_cell("Rate"),
        ui::header_cell("Domestic Amount"),
    ]);

    let fx = format!("{:.2}", rates.jpy_to_mnt);
    let rows: [(&str, &str, f64, f64); 4] = [
        ("1", "Auction price", breakdown.base_price_jpy, breakdown.base_price_mnt),
        (
            "2",
            "Consumption tax (7%)",
            breakdown.consumption_tax_jpy,
            breakdown.consumption_tax_mnt,
        ),
        (
            "3",
            "Service charge",
            breakdown.service_charge_jpy,
            breakdown.service_charge_mnt,
        ),
        ("4", "Insurance (1.3%)", breakdown.insurance_jpy, breakdown.insurance_mnt),
    ];
    for (no, label, source, domestic) in rows {
        table.add_row(vec![
            Cell::new(no),
            Cell::new(label),
            ui::amount_cell(&jpy(source)),
            Cell::new(&fx),
            ui::amount_cell(&mnt(domestic)),
        ]);
    }
    table.add_row(vec![
        Cell::new(""),
        ui::total_cell("Advance payment"),
        ui::total_cell(&jpy(breakdown.advance_payment_jpy)),
        Cell::new(&fx),
        ui::total_cell(&mnt(breakdown.advance_payment_mnt)),
    ]);

    table.add_row(vec![
        Cell::new("5"),
        Cell::new("Transport"),
        ui::amount_cell(&format!("{:.0} USD", rates.transport_cost_usd)),
        Cell::new(format!("{:.0}", rates.usd_to_mnt)),
        ui::amount_cell(&mnt(breakdown.transport_cost_mnt)),
    ]);
    table.add_row(vec![
        Cell::new("6"),
        Cell::new("Excise tax"),
        Cell::new("-"),
        Cell::new("-"),
        ui::amount_cell(&mnt(breakdown.special_tax_mnt)),
    ]);
    table.add_row(vec![
        Cell::new("7"),
        Cell::new("Customs duty (5% of advance payment)"),
        Cell::new("-"),
        Cell::new("5%"),
        ui::amount_cell(&mnt(breakdown.customs_duty_mnt)),
    ]);
    table.add_row(vec![
        Cell::new("8"),
        Cell::new("Customs VAT ((1+3+4+5) x 10%)"),
        Cell::new("-"),
        Cell::new("10%"),
        ui::amount_cell(&mnt(breakdown.customs_vat_mnt)),
    ]);
    table.add_row(vec![
        Cell::new(""),
        ui::total_cell("Payable in-country"),
        Cell::new("-"),
        Cell::new("-"),
        ui::total_cell(&mnt(breakdown.in_country_total_mnt)),
    ]);

    let title = format!(
        "{} {} ({})",
        selection.maker, selection.model, selection.year
    );
    format!(
        "Quote: {}\n\n{}\n\nGrand Total: {}",
        ui::style_text(&title, ui::StyleType::Title),
        table,
        ui::style_text(&mnt(breakdown.grand_total_mnt), ui::StyleType::TotalValue)
    )
}
