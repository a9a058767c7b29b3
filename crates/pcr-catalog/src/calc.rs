//! Mass and CO2e-avoidance arithmetic.
//!
//! [`compute`] is a pure function of a matched record and the purchase
//! details; it performs no I/O and keeps no state, so identical inputs give
//! identical results.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::CatalogRecord;

pub const GRAMS_PER_LB: f64 = 453.59237;
pub const KG_PER_LB: f64 = 0.45359237;

/// Default kg CO2e avoided per kg of PCR substituted for virgin resin
/// (the virgin emission factor minus the PCR emission factor). A reporting
/// placeholder; replace with the factor your program mandates.
pub const DEFAULT_CO2E_AVOIDED_KG_PER_KG_PCR: f64 = 1.70;

/// EPA metric tons CO2e emitted per gasoline passenger-vehicle mile, used
/// for the "equivalent miles driven" figure.
pub const MTCO2E_PER_VEHICLE_MILE: f64 = 3.93e-4;

/// Purchase details plus tunable factors for one calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalcInput {
    pub units_purchased: u64,
    /// Overrides the record's PCR percent when set. Values outside
    /// [0, 100] pass through unclamped.
    pub pcr_percent_override: Option<f64>,
    /// kg CO2e avoided per kg PCR. `None` skips the impact block entirely.
    pub avoidance_factor: Option<f64>,
    /// Metric tons CO2e per vehicle mile behind the miles-equivalent
    /// figure. Must be positive; [`crate::Assumptions`] enforces this for
    /// callers going through a session.
    pub mtco2e_per_mile: f64,
}

impl Default for CalcInput {
    fn default() -> Self {
        CalcInput {
            units_purchased: 0,
            pcr_percent_override: None,
            avoidance_factor: None,
            mtco2e_per_mile: MTCO2E_PER_VEHICLE_MILE,
        }
    }
}

/// CO2e-avoidance block of a [`Calculation`], present when an avoidance
/// factor was supplied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Co2eImpact {
    pub pcr_kg: f64,
    pub avoided_kg: f64,
    pub avoided_metric_tons: f64,
    pub miles_equivalent: f64,
}

/// Derived metrics for one part purchase. Ephemeral; nothing is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Calculation {
    /// Total plastic mass in pounds.
    pub total_lbs: f64,
    /// PCR share of the total mass in pounds.
    pub pcr_lbs: f64,
    /// The percent actually applied: override, else record, else 0.
    pub effective_pcr_percent: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impact: Option<Co2eImpact>,
}

#[derive(Debug, Error, PartialEq)]
pub enum ComputeError {
    /// The matched row had no usable unit weight; the data source needs
    /// fixing, there is no sensible default.
    #[error("cannot compute: unit weight unavailable for part {0:?}")]
    MissingUnitWeight(String),
}

/// Derive mass and CO2e figures from a matched record.
///
/// `units_purchased = 0` is legal and yields all-zero figures.
pub fn compute(record: &CatalogRecord, input: &CalcInput) -> Result<Calculation, ComputeError> {
    let grams = record
        .unit_weight_g
        .ok_or_else(|| ComputeError::MissingUnitWeight(record.part_number.clone()))?;

    let total_lbs = (grams * input.units_purchased as f64) / GRAMS_PER_LB;
    let effective_pcr_percent = input
        .pcr_percent_override
        .or(record.pcr_percent)
        .unwrap_or(0.0);
    let pcr_lbs = total_lbs * (effective_pcr_percent / 100.0);

    let impact = input.avoidance_factor.map(|factor| {
        let pcr_kg = pcr_lbs * KG_PER_LB;
        let avoided_kg = pcr_kg * factor;
        let avoided_metric_tons = avoided_kg / 1000.0;
        Co2eImpact {
            pcr_kg,
            avoided_kg,
            avoided_metric_tons,
            miles_equivalent: avoided_metric_tons / input.mtco2e_per_mile,
        }
    });

    Ok(Calculation {
        total_lbs,
        pcr_lbs,
        effective_pcr_percent,
        impact,
    })
}
