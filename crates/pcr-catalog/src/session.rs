//! Memoized catalog access and the per-interaction `evaluate` entry point.
//!
//! The catalog is loaded once per [`Session`] and reused for the life of
//! the process; [`CatalogCache::invalidate`] is the only refresh path. A
//! rebuild swaps the whole `Arc` so readers holding the previous catalog
//! are never exposed to in-place mutation.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::Serialize;
use thiserror::Error;

use crate::calc::{
    compute, CalcInput, Calculation, ComputeError, DEFAULT_CO2E_AVOIDED_KG_PER_KG_PCR,
    MTCO2E_PER_VEHICLE_MILE,
};
use crate::catalog::Catalog;
use crate::load::{load_catalog, LoadError};

/// Tunable assumptions behind the CO2e figures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Assumptions {
    /// kg CO2e avoided per kg PCR vs virgin resin.
    pub avoidance_factor: f64,
    /// Metric tons CO2e per gasoline passenger-vehicle mile.
    pub mtco2e_per_mile: f64,
}

impl Default for Assumptions {
    fn default() -> Self {
        Assumptions {
            avoidance_factor: DEFAULT_CO2E_AVOIDED_KG_PER_KG_PCR,
            mtco2e_per_mile: MTCO2E_PER_VEHICLE_MILE,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum AssumptionError {
    #[error("avoidance factor must be >= 0, got {0}")]
    NegativeAvoidanceFactor(f64),

    #[error("mtCO2e per vehicle mile must be > 0, got {0}")]
    NonPositiveMtco2ePerMile(f64),
}

impl Assumptions {
    pub fn new(avoidance_factor: f64, mtco2e_per_mile: f64) -> Result<Self, AssumptionError> {
        if avoidance_factor < 0.0 {
            return Err(AssumptionError::NegativeAvoidanceFactor(avoidance_factor));
        }
        // Zero would make the miles-equivalent figure infinite.
        if mtco2e_per_mile <= 0.0 {
            return Err(AssumptionError::NonPositiveMtco2ePerMile(mtco2e_per_mile));
        }
        Ok(Assumptions {
            avoidance_factor,
            mtco2e_per_mile,
        })
    }
}

/// Process-lifetime memoization of a loaded catalog.
#[derive(Debug, Default)]
pub struct CatalogCache {
    cached: Mutex<Option<Arc<Catalog>>>,
}

impl CatalogCache {
    /// Return the cached catalog, loading the source on first use. A failed
    /// load caches nothing, so a corrected source can be retried.
    pub fn load(&self, path: &Path) -> Result<Arc<Catalog>, LoadError> {
        let mut slot = self.cached.lock().unwrap();
        if let Some(catalog) = slot.as_ref() {
            return Ok(catalog.clone());
        }
        let catalog = Arc::new(load_catalog(path)?);
        *slot = Some(catalog.clone());
        Ok(catalog)
    }

    /// Drop the cached catalog; the next [`load`](Self::load) rebuilds it
    /// from the source and replaces the cache atomically.
    pub fn invalidate(&self) {
        self.cached.lock().unwrap().take();
    }
}

/// Per-request failures of [`Session::evaluate`]. None of these disturb the
/// cached catalog; the user fixes the input or the data source and retries.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("part number {0:?} not found in catalog")]
    NotFound(String),

    #[error(transparent)]
    Compute(#[from] ComputeError),

    #[error(transparent)]
    Load(#[from] LoadError),
}

/// One data source plus assumptions, serving evaluate calls for the life of
/// the process.
#[derive(Debug)]
pub struct Session {
    source: PathBuf,
    assumptions: Assumptions,
    cache: CatalogCache,
}

impl Session {
    pub fn new(source: PathBuf, assumptions: Assumptions) -> Self {
        Session {
            source,
            assumptions,
            cache: CatalogCache::default(),
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn assumptions(&self) -> Assumptions {
        self.assumptions
    }

    /// The memoized catalog for this session's source.
    pub fn catalog(&self) -> Result<Arc<Catalog>, LoadError> {
        self.cache.load(&self.source)
    }

    /// Force the next catalog access to re-read the source.
    pub fn invalidate(&self) {
        self.cache.invalidate();
    }

    /// Resolve a part number and compute its figures.
    ///
    /// Callers gate on a non-empty part number and `units > 0`; blank input
    /// is the front end's idle state, not an evaluation.
    pub fn evaluate(
        &self,
        part: &str,
        units: u64,
        pcr_percent_override: Option<f64>,
    ) -> Result<Calculation, EvalError> {
        let catalog = self.catalog()?;
        let record = catalog
            .find(part)
            .ok_or_else(|| EvalError::NotFound(part.trim().to_string()))?;
        let input = CalcInput {
            units_purchased: units,
            pcr_percent_override,
            avoidance_factor: Some(self.assumptions.avoidance_factor),
            mtco2e_per_mile: self.assumptions.mtco2e_per_mile,
        };
        Ok(compute(record, &input)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_assumptions() {
        let assumptions = Assumptions::default();
        assert_eq!(assumptions.avoidance_factor, 1.70);
        assert_eq!(assumptions.mtco2e_per_mile, 3.93e-4);
    }

    #[test]
    fn test_negative_factor_rejected() {
        let err = Assumptions::new(-0.5, MTCO2E_PER_VEHICLE_MILE).unwrap_err();
        assert_eq!(err, AssumptionError::NegativeAvoidanceFactor(-0.5));
        assert!(Assumptions::new(0.0, MTCO2E_PER_VEHICLE_MILE).is_ok());
    }

    #[test]
    fn test_non_positive_miles_constant_rejected() {
        let err = Assumptions::new(1.70, 0.0).unwrap_err();
        assert_eq!(err, AssumptionError::NonPositiveMtco2ePerMile(0.0));
        let err = Assumptions::new(1.70, -3.93e-4).unwrap_err();
        assert_eq!(err, AssumptionError::NonPositiveMtco2ePerMile(-3.93e-4));
    }
}
