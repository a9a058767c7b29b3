//! Lookup-and-calculate pipeline for the PCR calculator.
//!
//! The crate turns a part spreadsheet (vendor part number, unit weight in
//! grams, percent post-consumer recycled content) into an in-memory
//! [`catalog::Catalog`], resolves user-supplied part numbers against it, and
//! derives mass and CO2e-avoidance figures from a matched record.
//!
//! The pipeline runs in four stages:
//!
//! * `schema` – maps variant spreadsheet headers onto canonical fields.
//! * `load` – reads a delimited file or Excel workbook into a [`Catalog`].
//! * `calc` – pure arithmetic from a record plus a purchased quantity.
//! * `session` – memoized catalog access and the `evaluate` entry point
//!   that front ends call per user interaction.

pub mod calc;
pub mod catalog;
pub mod load;
pub mod schema;
pub mod session;

pub use calc::{
    compute, CalcInput, Calculation, Co2eImpact, ComputeError,
    DEFAULT_CO2E_AVOIDED_KG_PER_KG_PCR, GRAMS_PER_LB, KG_PER_LB, MTCO2E_PER_VEHICLE_MILE,
};
pub use catalog::{Catalog, CatalogRecord};
pub use load::{load_catalog, read_headers, LoadError};
pub use schema::{normalize_header, resolve_columns, ColumnMap, Field, ResolvedColumn, SchemaError};
pub use session::{Assumptions, AssumptionError, CatalogCache, EvalError, Session};
