//! Command implementations: load config + CSV snapshots, call the engine,
//! print plans.
//!
//! Storage file paths in the config are resolved relative to the config
//! file's directory, so a household directory can be moved around freely.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use larder_engine::config::HouseholdConfig;
use larder_engine::engine::{load_csv_records, run};
use larder_engine::merge::merge_duplicates;
use larder_engine::model::{IngredientRecord, MergePlan, ReorderPlan, StorageInput};
use larder_engine::order::{reassign_positions, sort_for_display, swap_move, MoveDirection};
use larder_engine::EngineError;

use crate::CliError;

fn load_config(path: &Path) -> Result<(HouseholdConfig, PathBuf), CliError> {
    let toml = std::fs::read_to_string(path)
        .map_err(|e| CliError::io(format!("{}: {}", path.display(), e)))?;
    let config = HouseholdConfig::from_toml(&toml).map_err(CliError::engine)?;
    let base = path.parent().unwrap_or_else(|| Path::new(".")).to_path_buf();
    Ok((config, base))
}

fn load_storage(
    config: &HouseholdConfig,
    base: &Path,
    storage: &str,
) -> Result<Vec<IngredientRecord>, CliError> {
    let storage_config = config
        .storages
        .get(storage)
        .ok_or_else(|| CliError::engine(EngineError::UnknownStorage(storage.to_string())))?;
    let csv_path = base.join(&storage_config.file);
    let csv_data = std::fs::read_to_string(&csv_path)
        .map_err(|e| CliError::io(format!("{}: {}", csv_path.display(), e)))?;
    load_csv_records(storage, &csv_data).map_err(CliError::engine)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| CliError::io(e.to_string()))?;
    println!("{json}");
    Ok(())
}

fn format_record(record: &IngredientRecord) -> String {
    let mut line = String::new();
    line.push_str(if record.checked { "[x] " } else { "[ ] " });
    line.push_str(&record.name);
    if record.quantity.is_specified() {
        line.push(' ');
        line.push_str(&record.quantity.to_string());
    }
    if !record.unit.is_empty() {
        line.push(' ');
        line.push_str(&record.unit);
    }
    line
}

fn print_merge_plan(storage: &str, plan: &MergePlan) {
    if plan.is_clean() {
        println!("{storage}: clean");
        return;
    }
    println!(
        "{storage}: {} survivors, {} deletions, {} patches",
        plan.survivors.len(),
        plan.deletions.len(),
        plan.quantity_patches.len()
    );
    for record in &plan.deletions {
        println!("  delete {}", format_record(record));
    }
    for patch in &plan.quantity_patches {
        println!("  patch  {} -> {} {}", patch.name, patch.quantity, patch.unit);
    }
}

fn print_reorder_plan(plan: &ReorderPlan) {
    for record in &plan.records {
        println!("{}", format_record(record));
    }
    for patch in &plan.position_patches {
        println!("patch {} -> position {}", patch.name, patch.position);
    }
}

// ---------------------------------------------------------------------------
// run
// ---------------------------------------------------------------------------

pub fn cmd_run(config: PathBuf, json: bool, output: Option<PathBuf>) -> Result<(), CliError> {
    let (config, base) = load_config(&config)?;

    let mut records = HashMap::new();
    for storage in config.storages.keys() {
        records.insert(storage.clone(), load_storage(&config, &base, storage)?);
    }
    let input = StorageInput { records };

    let result = run(&config, &input).map_err(CliError::engine)?;

    if let Some(path) = output {
        let bytes = serde_json::to_vec_pretty(&result).map_err(|e| CliError::io(e.to_string()))?;
        std::fs::write(&path, &bytes)
            .map_err(|e| CliError::io(format!("{}: {}", path.display(), e)))?;
    } else if json {
        print_json(&result)?;
    } else {
        println!(
            "{}: {} storages, {} survivors, {} deletions, {} quantity patches",
            result.meta.config_name,
            result.summary.storages,
            result.summary.survivors,
            result.summary.deletions,
            result.summary.quantity_patches
        );
        for (storage, plan) in &result.storages {
            if plan.is_clean() {
                println!("  {storage}: clean");
            } else {
                println!(
                    "  {storage}: {} survivors, {} deletions, {} patches",
                    plan.survivors.len(),
                    plan.deletions.len(),
                    plan.quantity_patches.len()
                );
            }
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// merge
// ---------------------------------------------------------------------------

pub fn cmd_merge(config: PathBuf, storage: String, json: bool) -> Result<(), CliError> {
    let (config, base) = load_config(&config)?;
    let records = load_storage(&config, &base, &storage)?;
    let plan = merge_duplicates(&records);

    if json {
        print_json(&plan)
    } else {
        print_merge_plan(&storage, &plan);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// move
// ---------------------------------------------------------------------------

pub fn cmd_move(
    config: PathBuf,
    storage: String,
    index: usize,
    direction: MoveDirection,
    json: bool,
) -> Result<(), CliError> {
    let (config, base) = load_config(&config)?;
    let convention = config
        .storages
        .get(&storage)
        .ok_or_else(|| CliError::engine(EngineError::UnknownStorage(storage.clone())))?
        .ordering;
    let records = load_storage(&config, &base, &storage)?;

    let display = sort_for_display(&records, convention);
    let plan = swap_move(&display, index, direction);

    if json {
        print_json(&plan)
    } else {
        print_reorder_plan(&plan);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// sort
// ---------------------------------------------------------------------------

pub fn cmd_sort(config: PathBuf, storage: String, json: bool) -> Result<(), CliError> {
    let (config, base) = load_config(&config)?;
    let convention = config
        .storages
        .get(&storage)
        .ok_or_else(|| CliError::engine(EngineError::UnknownStorage(storage.clone())))?
        .ordering;
    let records = load_storage(&config, &base, &storage)?;

    let display = sort_for_display(&records, convention);
    let plan = reassign_positions(&display, convention);

    if json {
        print_json(&plan)
    } else {
        print_reorder_plan(&plan);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

pub fn cmd_validate(config: PathBuf) -> Result<(), CliError> {
    let (config, base) = load_config(&config)?;

    for (storage, storage_config) in &config.storages {
        let csv_path = base.join(&storage_config.file);
        if !csv_path.is_file() {
            return Err(CliError::io(format!(
                "storage '{}': file not found: {}",
                storage,
                csv_path.display()
            ))
            .with_hint("storage files are resolved relative to the config file"));
        }
    }

    println!("config ok: {} ({} storages)", config.name, config.storages.len());
    Ok(())
}
