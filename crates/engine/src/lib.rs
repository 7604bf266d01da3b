//! `larder-engine` — Household grocery reconciliation engine.
//!
//! Pure engine crate: receives pre-loaded ingredient records, returns a
//! persistence plan (survivors, deletions, patches). No CLI or network
//! dependencies; issuing the resulting delete/patch calls is the caller's
//! job.

pub mod config;
pub mod engine;
pub mod error;
pub mod merge;
pub mod model;
pub mod order;
pub mod quantity;
pub mod subtract;

pub use config::HouseholdConfig;
pub use engine::{load_csv_records, run};
pub use error::EngineError;
pub use model::{IngredientRecord, MergePlan, ReconcileResult, ReorderPlan, StorageInput};
pub use order::OrderingConvention;
pub use quantity::Quantity;
