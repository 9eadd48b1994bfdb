//! Cascading selection resolver.
//!
//! A [`Selection`] is only meaningful relative to the catalog it was picked
//! from. When the catalog changes (initial load, or a maker change that
//! rescopes every dependent level) each catalog-backed field is repaired:
//! a value still present in the new catalog is kept, anything else falls back
//! to the catalog's first entry, and an empty catalog clears the field.

use crate::catalog::CatalogSet;
use serde::{Deserialize, Serialize};

/// Vehicle attributes as configured by the user and repaired by the resolver.
///
/// The string fields are catalog-backed; the numeric ones are free-form and
/// pass through untouched.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Selection {
    #[serde(default)]
    pub maker: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub chassis_id: String,
    #[serde(default)]
    pub fuel_type: String,
    #[serde(default)]
    pub colour: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub condition: Option<f64>,
    #[serde(default)]
    pub engine_size: Option<u32>,
    #[serde(default)]
    pub odometer: Option<u32>,
}

/// Outcome of repairing a selection against a catalog.
///
/// `changed` is false exactly when the input was already consistent, which
/// callers use to skip redundant downstream refetches.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub selection: Selection,
    pub changed: bool,
}

/// Repairs a single field value against its catalog.
pub fn resolve_value(catalog: &[String], prior: &str) -> String {
    if catalog.iter().any(|v| v == prior) {
        prior.to_string()
    } else {
        catalog.first().cloned().unwrap_or_default()
    }
}

/// Repairs every catalog-backed field of `prior` against `catalogs`.
///
/// The caller owns the cascade: when the resolved maker differs from the
/// prior one, the dependent catalogs must be refetched scoped to the new
/// maker and the selection resolved again.
pub fn resolve_selection(catalogs: &CatalogSet, prior: &Selection) -> Resolution {
    let selection = Selection {
        maker: resolve_value(&catalogs.makers, &prior.maker),
        model: resolve_value(&catalogs.models, &prior.model),
        chassis_id: resolve_value(&catalogs.chassis_ids, &prior.chassis_id),
        fuel_type: resolve_value(&catalogs.fuels, &prior.fuel_type),
        colour: resolve_value(&catalogs.colours, &prior.colour),
        year: resolve_value(&catalogs.years, &prior.year),
        condition: prior.condition,
        engine_size: prior.engine_size,
        odometer: prior.odometer,
    };
    let changed = selection != *prior;
    Resolution { selection, changed }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn sample_catalogs() -> CatalogSet {
        CatalogSet {
            makers: ids(&["Toyota", "Honda", "Nissan"]),
            models: ids(&["Camry", "Corolla"]),
            chassis_ids: ids(&["AXVH70", "ZRE212"]),
            fuels: ids(&["Petrol", "Hybrid"]),
            colours: ids(&["White", "Black"]),
            years: ids(&["2022", "2021", "2020"]),
        }
    }

    #[test]
    fn test_member_value_is_kept() {
        let catalog = ids(&["Toyota", "Honda"]);
        assert_eq!(resolve_value(&catalog, "Honda"), "Honda");
    }

    #[test]
    fn test_non_member_falls_back_to_first() {
        let catalog = ids(&["Toyota", "Honda"]);
        assert_eq!(resolve_value(&catalog, "Lada"), "Toyota");
        assert_eq!(resolve_value(&catalog, ""), "Toyota");
    }

    #[test]
    fn test_empty_catalog_clears_value() {
        assert_eq!(resolve_value(&[], "Toyota"), "");
    }

    #[test]
    fn test_consistent_selection_is_a_noop() {
        let catalogs = sample_catalogs();
        let prior = Selection {
            maker: "Honda".to_string(),
            model: "Camry".to_string(),
            chassis_id: "AXVH70".to_string(),
            fuel_type: "Hybrid".to_string(),
            colour: "Black".to_string(),
            year: "2021".to_string(),
            condition: Some(4.5),
            engine_size: Some(2500),
            odometer: Some(45_000),
        };

        let resolution = resolve_selection(&catalogs, &prior);
        assert!(!resolution.changed);
        assert_eq!(resolution.selection, prior);
    }

    #[test]
    fn test_stale_fields_are_repaired_to_first() {
        let catalogs = sample_catalogs();
        let prior = Selection {
            maker: "Lada".to_string(),
            model: "Niva".to_string(),
            year: "1988".to_string(),
            ..Default::default()
        };

        let resolution = resolve_selection(&catalogs, &prior);
        assert!(resolution.changed);
        assert_eq!(resolution.selection.maker, "Toyota");
        assert_eq!(resolution.selection.model, "Camry");
        assert_eq!(resolution.selection.chassis_id, "AXVH70");
        assert_eq!(resolution.selection.fuel_type, "Petrol");
        assert_eq!(resolution.selection.colour, "White");
        assert_eq!(resolution.selection.year, "2022");
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let catalogs = sample_catalogs();
        let prior = Selection {
            maker: "Lada".to_string(),
            ..Default::default()
        };

        let first = resolve_selection(&catalogs, &prior);
        let second = resolve_selection(&catalogs, &first.selection);
        assert!(!second.changed);
        assert_eq!(second.selection, first.selection);
    }

    #[test]
    fn test_maker_change_cascade_keeps_still_valid_values() {
        // After a maker change the caller refetches the dependent catalogs;
        // a prior value still present in the rescoped catalog survives.
        let rescoped = CatalogSet {
            makers: ids(&["Honda"]),
            models: ids(&["Accord", "Civic"]),
            chassis_ids: ids(&["CV3"]),
            fuels: ids(&["Petrol", "Hybrid"]),
            colours: ids(&["White", "Black"]),
            years: ids(&["2023", "2022"]),
        };
        let prior = Selection {
            maker: "Honda".to_string(),
            model: "Camry".to_string(),
            fuel_type: "Hybrid".to_string(),
            colour: "Black".to_string(),
            year: "2022".to_string(),
            ..Default::default()
        };

        let resolution = resolve_selection(&rescoped, &prior);
        assert!(resolution.changed);
        assert_eq!(resolution.selection.model, "Accord");
        assert_eq!(resolution.selection.fuel_type, "Hybrid");
        assert_eq!(resolution.selection.colour, "Black");
        assert_eq!(resolution.selection.year, "2022");
    }

    #[test]
    fn test_empty_catalogs_clear_all_fields() {
        let catalogs = CatalogSet::default();
        let prior = Selection {
            maker: "Toyota".to_string(),
            model: "Camry".to_string(),
            ..Default::default()
        };

        let resolution = resolve_selection(&catalogs, &prior);
        assert!(resolution.changed);
        assert_eq!(resolution.selection.maker, "");
        assert_eq!(resolution.selection.model, "");
    }
}
