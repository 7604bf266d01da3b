use std::collections::HashMap;

use crate::model::{GroupKey, IngredientRecord, MergePlan, QuantityPatch};

/// Collapse duplicate (name, unit) records into one, summing quantities
/// exactly.
///
/// Survivors keep first-seen order. Only two unchecked records ever merge;
/// a checked record is its own singleton group and never blocks a later
/// unchecked record from merging with an earlier one. Merged-away records
/// land in `deletions`; survivors whose quantity changed get a
/// `QuantityPatch`.
///
/// Pure function; idempotent over its own survivors.
pub fn merge_duplicates(records: &[IngredientRecord]) -> MergePlan {
    let mut survivors: Vec<IngredientRecord> = Vec::new();
    let mut original: Vec<Option<crate::quantity::Quantity>> = Vec::new();
    let mut index: HashMap<GroupKey, usize> = HashMap::new();
    let mut deletions = Vec::new();

    for record in records {
        if record.checked {
            survivors.push(record.clone());
            original.push(None);
            continue;
        }
        match index.get(&GroupKey::of(record)) {
            Some(&slot) => {
                let survivor = &mut survivors[slot];
                survivor.quantity = &survivor.quantity + &record.quantity;
                deletions.push(record.clone());
            }
            None => {
                index.insert(GroupKey::of(record), survivors.len());
                original.push(Some(record.quantity.clone()));
                survivors.push(record.clone());
            }
        }
    }

    let quantity_patches = survivors
        .iter()
        .zip(&original)
        .filter(|(survivor, before)| match before {
            Some(q) => *q != survivor.quantity,
            None => false,
        })
        .map(|(survivor, _)| QuantityPatch::for_record(survivor))
        .collect();

    MergePlan {
        survivors,
        deletions,
        quantity_patches,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantity::Quantity;

    fn rec(id: &str, name: &str, quantity: &str, unit: &str, checked: bool) -> IngredientRecord {
        IngredientRecord {
            id: Some(id.to_string()),
            name: name.to_string(),
            quantity: Quantity::parse(quantity).unwrap(),
            unit: unit.to_string(),
            position: 0,
            checked,
        }
    }

    #[test]
    fn duplicates_sum_in_first_seen_order() {
        let records = vec![
            rec("a", "Milk", "1", "l", false),
            rec("b", "Eggs", "10", "", false),
            rec("c", "Milk", "1/2", "l", false),
        ];
        let plan = merge_duplicates(&records);

        assert_eq!(plan.survivors.len(), 2);
        assert_eq!(plan.survivors[0].name, "Milk");
        assert_eq!(plan.survivors[0].quantity, Quantity::from_ratio(3, 2));
        assert_eq!(plan.survivors[1].name, "Eggs");

        assert_eq!(plan.deletions.len(), 1);
        assert_eq!(plan.deletions[0].id.as_deref(), Some("c"));

        assert_eq!(plan.quantity_patches.len(), 1);
        assert_eq!(plan.quantity_patches[0].id.as_deref(), Some("a"));
        assert_eq!(plan.quantity_patches[0].quantity.to_string(), "3/2");
    }

    #[test]
    fn fractional_thirds_sum_to_one_in_any_order() {
        let quantities = ["1/2", "1/3", "1/6"];
        let orders = [[0, 1, 2], [2, 0, 1], [1, 2, 0], [2, 1, 0]];
        for order in orders {
            let records: Vec<_> = order
                .iter()
                .map(|&i| rec(&format!("r{i}"), "Flour", quantities[i], "cup", false))
                .collect();
            let plan = merge_duplicates(&records);
            assert_eq!(plan.survivors.len(), 1);
            assert_eq!(plan.survivors[0].quantity, Quantity::from_integer(1));
            assert_eq!(plan.survivors[0].quantity.to_string(), "1");
        }
    }

    #[test]
    fn checked_record_is_never_merged() {
        let records = vec![
            rec("a", "Milk", "1", "l", true),
            rec("b", "Milk", "1", "l", false),
        ];
        let plan = merge_duplicates(&records);
        assert_eq!(plan.survivors.len(), 2);
        assert!(plan.is_clean());
    }

    #[test]
    fn checked_record_does_not_block_a_later_merge() {
        // b and d must merge even though the checked c sits between them
        let records = vec![
            rec("b", "Milk", "1", "l", false),
            rec("c", "Milk", "2", "l", true),
            rec("d", "Milk", "1/2", "l", false),
        ];
        let plan = merge_duplicates(&records);
        assert_eq!(plan.survivors.len(), 2);
        assert_eq!(plan.survivors[0].quantity, Quantity::from_ratio(3, 2));
        assert!(plan.survivors[1].checked);
        assert_eq!(plan.deletions.len(), 1);
        assert_eq!(plan.deletions[0].id.as_deref(), Some("d"));
    }

    #[test]
    fn unit_mismatch_does_not_merge() {
        let records = vec![
            rec("a", "Milk", "1", "l", false),
            rec("b", "Milk", "1", "ml", false),
        ];
        let plan = merge_duplicates(&records);
        assert_eq!(plan.survivors.len(), 2);
        assert!(plan.is_clean());
    }

    #[test]
    fn name_match_is_case_sensitive() {
        let records = vec![
            rec("a", "Tomato", "1", "", false),
            rec("b", "tomato", "1", "", false),
        ];
        let plan = merge_duplicates(&records);
        assert_eq!(plan.survivors.len(), 2);
    }

    #[test]
    fn merging_an_empty_quantity_patches_nothing() {
        // "1" absorbs "" — value unchanged, so no patch, but the dup is
        // still deleted
        let records = vec![
            rec("a", "Salt", "1", "tsp", false),
            rec("b", "Salt", "", "tsp", false),
        ];
        let plan = merge_duplicates(&records);
        assert_eq!(plan.survivors.len(), 1);
        assert_eq!(plan.deletions.len(), 1);
        assert!(plan.quantity_patches.is_empty());
        assert_eq!(plan.survivors[0].quantity.to_string(), "1");
    }

    #[test]
    fn two_empty_quantities_merge_to_empty() {
        let records = vec![
            rec("a", "Basil", "", "", false),
            rec("b", "Basil", "", "", false),
        ];
        let plan = merge_duplicates(&records);
        assert_eq!(plan.survivors.len(), 1);
        assert_eq!(plan.survivors[0].quantity.to_string(), "");
        assert_eq!(plan.deletions.len(), 1);
    }

    #[test]
    fn idempotent_over_own_survivors() {
        let records = vec![
            rec("a", "Milk", "1", "l", false),
            rec("b", "Milk", "1/2", "l", false),
            rec("c", "Eggs", "10", "", false),
            rec("d", "Milk", "1", "l", true),
        ];
        let first = merge_duplicates(&records);
        let second = merge_duplicates(&first.survivors);
        assert!(second.is_clean());
        assert_eq!(second.survivors.len(), first.survivors.len());
    }
}
