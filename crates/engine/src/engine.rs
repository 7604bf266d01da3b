use std::collections::{BTreeMap, HashSet};

use crate::config::HouseholdConfig;
use crate::error::EngineError;
use crate::merge::merge_duplicates;
use crate::model::{
    IngredientRecord, MergePlan, ReconcileMeta, ReconcileResult, ReconcileSummary, StorageInput,
};
use crate::quantity::Quantity;
use crate::subtract::subtract_stock;

/// Run a full reconcile: merge every storage, then apply the configured
/// pantry offset to the shopping list. Returns one plan per storage.
pub fn run(config: &HouseholdConfig, input: &StorageInput) -> Result<ReconcileResult, EngineError> {
    let mut storages: BTreeMap<String, MergePlan> = BTreeMap::new();
    for name in config.storages.keys() {
        let records = input
            .records
            .get(name)
            .ok_or_else(|| EngineError::UnknownStorage(format!("storage '{name}' has no data")))?;
        storages.insert(name.clone(), merge_duplicates(records));
    }

    if let Some(ref offset) = config.offset {
        let stock_survivors = storages
            .get(&offset.stock)
            .map(|plan| plan.survivors.clone())
            .ok_or_else(|| EngineError::UnknownStorage(offset.stock.clone()))?;
        let list_plan = storages
            .remove(&offset.list)
            .ok_or_else(|| EngineError::UnknownStorage(offset.list.clone()))?;
        let offset_plan = subtract_stock(&list_plan.survivors, &stock_survivors);
        storages.insert(offset.list.clone(), chain_plans(list_plan, offset_plan));
    }

    let summary = compute_summary(&storages);

    Ok(ReconcileResult {
        meta: ReconcileMeta {
            config_name: config.name.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary,
        storages,
    })
}

/// Fold a later pass's plan over the same storage into an earlier one.
///
/// The later pass operated on the earlier survivors, so its survivor list
/// wins; deletions accumulate; an earlier quantity patch is dropped when
/// the later pass deleted or re-patched that record, keeping delete-set
/// and patch-set disjoint.
fn chain_plans(first: MergePlan, second: MergePlan) -> MergePlan {
    let superseded: HashSet<(String, String)> = second
        .deletions
        .iter()
        .map(|r| (r.name.clone(), r.unit.clone()))
        .chain(
            second
                .quantity_patches
                .iter()
                .map(|p| (p.name.clone(), p.unit.clone())),
        )
        .collect();

    let mut quantity_patches: Vec<_> = first
        .quantity_patches
        .into_iter()
        .filter(|p| !superseded.contains(&(p.name.clone(), p.unit.clone())))
        .collect();
    quantity_patches.extend(second.quantity_patches);

    let mut deletions = first.deletions;
    deletions.extend(second.deletions);

    MergePlan {
        survivors: second.survivors,
        deletions,
        quantity_patches,
    }
}

/// Counts across all storage plans.
pub fn compute_summary(storages: &BTreeMap<String, MergePlan>) -> ReconcileSummary {
    let mut survivors = 0;
    let mut deletions = 0;
    let mut quantity_patches = 0;
    for plan in storages.values() {
        survivors += plan.survivors.len();
        deletions += plan.deletions.len();
        quantity_patches += plan.quantity_patches.len();
    }
    ReconcileSummary {
        storages: storages.len(),
        survivors,
        deletions,
        quantity_patches,
    }
}

/// Load one storage snapshot from CSV.
///
/// Expected header: `id,name,quantity,unit,position,checked` (any column
/// order). Quantity strings are parsed here, at the boundary, so everything
/// downstream works on exact rationals. An empty `id` means the record has
/// not been persisted yet.
pub fn load_csv_records(storage: &str, csv_data: &str) -> Result<Vec<IngredientRecord>, EngineError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(csv_data.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| EngineError::Io(e.to_string()))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let idx = |name: &str| -> Result<usize, EngineError> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| EngineError::MissingColumn {
                storage: storage.into(),
                column: name.into(),
            })
    };

    let id_idx = idx("id")?;
    let name_idx = idx("name")?;
    let quantity_idx = idx("quantity")?;
    let unit_idx = idx("unit")?;
    let position_idx = idx("position")?;
    let checked_idx = idx("checked")?;

    let mut records = Vec::new();

    for row in reader.records() {
        let row = row.map_err(|e| EngineError::Io(e.to_string()))?;

        let id_field = row.get(id_idx).unwrap_or("");
        let id = if id_field.is_empty() {
            None
        } else {
            Some(id_field.to_string())
        };
        let name = row.get(name_idx).unwrap_or("").to_string();
        // Error context: id if persisted, name otherwise
        let record_label = id.clone().unwrap_or_else(|| name.clone());

        let quantity_field = row.get(quantity_idx).unwrap_or("");
        let quantity =
            Quantity::parse(quantity_field).map_err(|_| EngineError::QuantityParse {
                storage: storage.into(),
                record: record_label.clone(),
                value: quantity_field.into(),
            })?;

        let position_field = row.get(position_idx).unwrap_or("");
        let position: i64 =
            position_field
                .trim()
                .parse()
                .map_err(|_| EngineError::PositionParse {
                    storage: storage.into(),
                    record: record_label.clone(),
                    value: position_field.into(),
                })?;

        let checked_field = row.get(checked_idx).unwrap_or("");
        let checked = match checked_field.trim() {
            "true" | "1" => true,
            "false" | "0" | "" => false,
            other => {
                return Err(EngineError::CheckedParse {
                    storage: storage.into(),
                    record: record_label,
                    value: other.into(),
                })
            }
        };

        records.push(IngredientRecord {
            id,
            name,
            quantity,
            unit: row.get(unit_idx).unwrap_or("").to_string(),
            position,
            checked,
        });
    }

    Ok(records)
}
