use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::quantity::Quantity;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A single ingredient row from one storage snapshot.
///
/// `id` is the persistence layer's identity and is absent on records that
/// have not been created yet. Quantity strings are parsed at the load
/// boundary, so by the time a record exists it carries an exact rational.
#[derive(Debug, Clone, Serialize)]
pub struct IngredientRecord {
    pub id: Option<String>,
    pub name: String,
    pub quantity: Quantity,
    pub unit: String,
    pub position: i64,
    pub checked: bool,
}

/// Grouping key: two *unchecked* records merge iff name and unit match
/// byte-for-byte. Checked records are never keyed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey {
    pub name: String,
    pub unit: String,
}

impl GroupKey {
    pub fn of(record: &IngredientRecord) -> Self {
        GroupKey {
            name: record.name.clone(),
            unit: record.unit.clone(),
        }
    }
}

/// Pre-loaded records grouped by storage name.
pub struct StorageInput {
    pub records: HashMap<String, Vec<IngredientRecord>>,
}

// ---------------------------------------------------------------------------
// Plans
// ---------------------------------------------------------------------------

/// Partial update of a survivor's quantity fields.
#[derive(Debug, Clone, Serialize)]
pub struct QuantityPatch {
    pub id: Option<String>,
    pub name: String,
    pub quantity: Quantity,
    pub unit: String,
}

impl QuantityPatch {
    pub fn for_record(record: &IngredientRecord) -> Self {
        QuantityPatch {
            id: record.id.clone(),
            name: record.name.clone(),
            quantity: record.quantity.clone(),
            unit: record.unit.clone(),
        }
    }
}

/// Partial update of one record's position.
#[derive(Debug, Clone, Serialize)]
pub struct PositionPatch {
    pub id: Option<String>,
    pub name: String,
    pub position: i64,
}

impl PositionPatch {
    pub fn for_record(record: &IngredientRecord) -> Self {
        PositionPatch {
            id: record.id.clone(),
            name: record.name.clone(),
            position: record.position,
        }
    }
}

/// Output contract of a grouping or subtraction pass.
///
/// `survivors` is the post-pass list in first-seen order and becomes the
/// caller's new local state. `deletions` are delete-by-identity targets;
/// `quantity_patches` cover every survivor whose quantity changed. The two
/// sets never share a record, so the caller may dispatch all persistence
/// calls concurrently.
#[derive(Debug, Clone, Serialize)]
pub struct MergePlan {
    pub survivors: Vec<IngredientRecord>,
    pub deletions: Vec<IngredientRecord>,
    pub quantity_patches: Vec<QuantityPatch>,
}

impl MergePlan {
    /// True when a pass produced no work: nothing merged, nothing deleted,
    /// nothing to patch.
    pub fn is_clean(&self) -> bool {
        self.deletions.is_empty() && self.quantity_patches.is_empty()
    }
}

/// Output of a reorder operation: the list in its new display order plus
/// position patches for every record whose position changed.
#[derive(Debug, Clone, Serialize)]
pub struct ReorderPlan {
    pub records: Vec<IngredientRecord>,
    pub position_patches: Vec<PositionPatch>,
}

// ---------------------------------------------------------------------------
// Run result
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ReconcileSummary {
    pub storages: usize,
    pub survivors: usize,
    pub deletions: usize,
    pub quantity_patches: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconcileMeta {
    pub config_name: String,
    pub engine_version: String,
    pub run_at: String,
}

/// Full output of [`crate::engine::run`]: one plan per storage, keyed by
/// storage name. The offset pass (pantry vs shopping list), if configured,
/// is already folded into the list storage's plan.
#[derive(Debug, Clone, Serialize)]
pub struct ReconcileResult {
    pub meta: ReconcileMeta,
    pub summary: ReconcileSummary,
    pub storages: BTreeMap<String, MergePlan>,
}
