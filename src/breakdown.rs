//! Landed-cost computation engine.
//!
//! Turns a JPY auction price plus a handful of rates into the full itemized
//! MNT cost of bringing the vehicle into the country. The computation mirrors
//! a customs invoice: a fixed linear sequence where every line item depends
//! only on earlier ones. All arithmetic is plain f64 with no rounding;
//! formatting is left to the presentation layer.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Japanese consumption tax applied to the auction price.
pub const CONSUMPTION_TAX_RATE: f64 = 0.07;
/// Transit insurance, as a share of the auction price.
pub const INSURANCE_RATE: f64 = 0.013;
/// Customs duty, as a share of the advance payment.
pub const CUSTOMS_DUTY_RATE: f64 = 0.05;
/// Customs VAT, applied to base + service charge + insurance + transport.
pub const CUSTOMS_VAT_RATE: f64 = 0.10;

const DEFAULT_JPY_TO_MNT: f64 = 24.95;
const DEFAULT_USD_TO_MNT: f64 = 3560.0;
const DEFAULT_TRANSPORT_COST_USD: f64 = 1190.0;
const DEFAULT_SERVICE_CHARGE_JPY: f64 = 120_000.0;
const DEFAULT_SPECIAL_TAX_MNT: f64 = 6_675_000.0;

fn default_jpy_to_mnt() -> f64 {
    DEFAULT_JPY_TO_MNT
}

fn default_usd_to_mnt() -> f64 {
    DEFAULT_USD_TO_MNT
}

fn default_transport_cost_usd() -> f64 {
    DEFAULT_TRANSPORT_COST_USD
}

fn default_service_charge_jpy() -> f64 {
    DEFAULT_SERVICE_CHARGE_JPY
}

fn default_special_tax_mnt() -> f64 {
    DEFAULT_SPECIAL_TAX_MNT
}

/// Conversion rates and fee constants supplied by the caller.
///
/// Every field has a documented default, so a sparse config file still
/// yields a complete set of rates.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Rates {
    /// JPY to MNT exchange rate.
    #[serde(default = "default_jpy_to_mnt")]
    pub jpy_to_mnt: f64,
    /// USD to MNT exchange rate, used for the transport leg.
    #[serde(default = "default_usd_to_mnt")]
    pub usd_to_mnt: f64,
    /// Port-to-border transport cost, in USD.
    #[serde(default = "default_transport_cost_usd")]
    pub transport_cost_usd: f64,
    /// Exporter's service charge, in JPY.
    #[serde(default = "default_service_charge_jpy")]
    pub service_charge_jpy: f64,
    /// Excise tax, already in MNT.
    #[serde(default = "default_special_tax_mnt")]
    pub special_tax_mnt: f64,
}

impl Default for Rates {
    fn default() -> Self {
        Rates {
            jpy_to_mnt: DEFAULT_JPY_TO_MNT,
            usd_to_mnt: DEFAULT_USD_TO_MNT,
            transport_cost_usd: DEFAULT_TRANSPORT_COST_USD,
            service_charge_jpy: DEFAULT_SERVICE_CHARGE_JPY,
            special_tax_mnt: DEFAULT_SPECIAL_TAX_MNT,
        }
    }
}

impl Rates {
    /// Substitutes the documented default for any field that is not a
    /// non-negative finite number. Invalid rates are a per-field policy
    /// matter, never fatal.
    pub fn sanitized(&self) -> Rates {
        fn valid_or(value: f64, fallback: f64, name: &str) -> f64 {
            if value.is_finite() && value >= 0.0 {
                value
            } else {
                debug!("Invalid rate for {name} ({value}), using default {fallback}");
                fallback
            }
        }

        Rates {
            jpy_to_mnt: valid_or(self.jpy_to_mnt, DEFAULT_JPY_TO_MNT, "jpy_to_mnt"),
            usd_to_mnt: valid_or(self.usd_to_mnt, DEFAULT_USD_TO_MNT, "usd_to_mnt"),
            transport_cost_usd: valid_or(
                self.transport_cost_usd,
                DEFAULT_TRANSPORT_COST_USD,
                "transport_cost_usd",
            ),
            service_charge_jpy: valid_or(
                self.service_charge_jpy,
                DEFAULT_SERVICE_CHARGE_JPY,
                "service_charge_jpy",
            ),
            special_tax_mnt: valid_or(
                self.special_tax_mnt,
                DEFAULT_SPECIAL_TAX_MNT,
                "special_tax_mnt",
            ),
        }
    }
}

/// Itemized landed cost. Fields suffixed `_jpy` are in the source currency,
/// `_mnt` in the domestic one. Fully derived: recomputed wholesale on every
/// input change, never patched in place.
#[derive(Debug, Clone, PartialEq)]
pub struct CostBreakdown {
    pub base_price_jpy: f64,
    pub base_price_mnt: f64,
    pub consumption_tax_jpy: f64,
    pub consumption_tax_mnt: f64,
    pub service_charge_jpy: f64,
    pub service_charge_mnt: f64,
    pub insurance_jpy: f64,
    pub insurance_mnt: f64,
    pub advance_payment_jpy: f64,
    pub advance_payment_mnt: f64,
    pub transport_cost_mnt: f64,
    pub special_tax_mnt: f64,
    pub customs_duty_mnt: f64,
    pub customs_vat_mnt: f64,
    pub in_country_total_mnt: f64,
    pub grand_total_mnt: f64,
}

/// Computes the full landed-cost breakdown for a JPY auction price.
///
/// Pure and total: never fails or panics for any non-negative finite input,
/// including zero. Rates are sanitized first, so callers can pass the config
/// file values straight through.
pub fn compute_breakdown(price_jpy: f64, rates: &Rates) -> CostBreakdown {
    let rates = rates.sanitized();

    let base_price_mnt = price_jpy * rates.jpy_to_mnt;

    let consumption_tax_jpy = price_jpy * CONSUMPTION_TAX_RATE;
    let consumption_tax_mnt = consumption_tax_jpy * rates.jpy_to_mnt;

    let service_charge_mnt = rates.service_charge_jpy * rates.jpy_to_mnt;

    let insurance_jpy = price_jpy * INSURANCE_RATE;
    let insurance_mnt = insurance_jpy * rates.jpy_to_mnt;

    let advance_payment_jpy =
        price_jpy + consumption_tax_jpy + rates.service_charge_jpy + insurance_jpy;
    let advance_payment_mnt = advance_payment_jpy * rates.jpy_to_mnt;

    let transport_cost_mnt = rates.transport_cost_usd * rates.usd_to_mnt;

    let customs_duty_mnt = advance_payment_mnt * CUSTOMS_DUTY_RATE;

    // Consumption tax stays out of the VAT base; this matches how customs
    // actually assesses it.
    let customs_vat_base =
        base_price_mnt + service_charge_mnt + insurance_mnt + transport_cost_mnt;
    let customs_vat_mnt = customs_vat_base * CUSTOMS_VAT_RATE;

    let in_country_total_mnt =
        transport_cost_mnt + rates.special_tax_mnt + customs_duty_mnt + customs_vat_mnt;

    let grand_total_mnt = advance_payment_mnt + in_country_total_mnt;

    CostBreakdown {
        base_price_jpy: price_jpy,
        base_price_mnt,
        consumption_tax_jpy,
        consumption_tax_mnt,
        service_charge_jpy: rates.service_charge_jpy,
        service_charge_mnt,
        insurance_jpy,
        insurance_mnt,
        advance_payment_jpy,
        advance_payment_mnt,
        transport_cost_mnt,
        special_tax_mnt: rates.special_tax_mnt,
        customs_duty_mnt,
        customs_vat_mnt,
        in_country_total_mnt,
        grand_total_mnt,
    }
}
