use std::collections::{HashMap, HashSet};

use crate::model::{GroupKey, IngredientRecord, MergePlan, QuantityPatch};

/// Reduce a shopping list's quantities by matching pantry stock.
///
/// Both inputs are assumed merge-clean (already through
/// [`crate::merge::merge_duplicates`]). Each unchecked stock record whose
/// (name, unit) key matches a list entry adds its negated quantity to that
/// entry — the same grouping-key merge as the grouping pass, just with the
/// sign flipped. Touched entries whose quantity drops to zero or below are
/// deleted; untouched entries are never deleted, so an unquantified list
/// entry with no matching stock stays put.
pub fn subtract_stock(list: &[IngredientRecord], stock: &[IngredientRecord]) -> MergePlan {
    let mut entries: Vec<IngredientRecord> = list.to_vec();
    let mut index: HashMap<GroupKey, usize> = HashMap::new();
    for (slot, record) in entries.iter().enumerate() {
        if !record.checked {
            // merge-clean input: unchecked keys are unique
            index.insert(GroupKey::of(record), slot);
        }
    }

    let mut touched: HashSet<usize> = HashSet::new();
    for item in stock {
        if item.checked {
            continue;
        }
        if let Some(&slot) = index.get(&GroupKey::of(item)) {
            let entry = &mut entries[slot];
            entry.quantity = &entry.quantity + &item.quantity.negated();
            touched.insert(slot);
        }
    }

    let mut survivors = Vec::new();
    let mut deletions = Vec::new();
    let mut quantity_patches = Vec::new();
    for (slot, entry) in entries.into_iter().enumerate() {
        if touched.contains(&slot) && entry.quantity.is_zero_or_less() {
            deletions.push(entry);
        } else {
            if touched.contains(&slot) && entry.quantity != list[slot].quantity {
                quantity_patches.push(QuantityPatch::for_record(&entry));
            }
            survivors.push(entry);
        }
    }

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
    fn full_stock_deletes_the_entry() {
        let list = vec![rec("sl_1", "Milk", "1", "l", false)];
        let stock = vec![rec("pa_1", "Milk", "1", "l", false)];
        let plan = subtract_stock(&list, &stock);

        assert!(plan.survivors.is_empty());
        assert_eq!(plan.deletions.len(), 1);
        assert_eq!(plan.deletions[0].id.as_deref(), Some("sl_1"));
        assert!(plan.quantity_patches.is_empty());
    }

    #[test]
    fn partial_stock_reduces_the_entry() {
        let list = vec![rec("sl_1", "Milk", "2", "l", false)];
        let stock = vec![rec("pa_1", "Milk", "1", "l", false)];
        let plan = subtract_stock(&list, &stock);

        assert_eq!(plan.survivors.len(), 1);
        assert_eq!(plan.survivors[0].quantity, Quantity::from_integer(1));
        assert!(plan.deletions.is_empty());
        assert_eq!(plan.quantity_patches.len(), 1);
        assert_eq!(plan.quantity_patches[0].quantity.to_string(), "1");
    }

    #[test]
    fn excess_stock_deletes_the_entry() {
        let list = vec![rec("sl_1", "Milk", "1", "l", false)];
        let stock = vec![rec("pa_1", "Milk", "2", "l", false)];
        let plan = subtract_stock(&list, &stock);
        assert!(plan.survivors.is_empty());
        assert_eq!(plan.deletions.len(), 1);
    }

    #[test]
    fn unit_mismatch_is_not_offset() {
        let list = vec![rec("sl_1", "Milk", "1", "l", false)];
        let stock = vec![rec("pa_1", "Milk", "1000", "ml", false)];
        let plan = subtract_stock(&list, &stock);
        assert_eq!(plan.survivors.len(), 1);
        assert!(plan.is_clean());
    }

    #[test]
    fn unquantified_stock_covers_an_unquantified_need() {
        let list = vec![rec("sl_1", "Basil", "", "", false)];
        let stock = vec![rec("pa_1", "Basil", "", "", false)];
        let plan = subtract_stock(&list, &stock);
        assert!(plan.survivors.is_empty());
        assert_eq!(plan.deletions.len(), 1);
    }

    #[test]
    fn unquantified_stock_does_not_delete_a_quantified_need() {
        let list = vec![rec("sl_1", "Flour", "500", "g", false)];
        let stock = vec![rec("pa_1", "Flour", "", "g", false)];
        let plan = subtract_stock(&list, &stock);

        assert_eq!(plan.survivors.len(), 1);
        assert_eq!(plan.survivors[0].quantity, Quantity::from_integer(500));
        assert!(plan.is_clean());
    }

    #[test]
    fn untouched_unquantified_entry_is_never_deleted() {
        let list = vec![rec("sl_1", "Basil", "", "", false)];
        let stock = vec![rec("pa_1", "Sugar", "1", "kg", false)];
        let plan = subtract_stock(&list, &stock);
        assert_eq!(plan.survivors.len(), 1);
        assert!(plan.is_clean());
    }

    #[test]
    fn checked_records_are_left_alone() {
        let list = vec![
            rec("sl_1", "Milk", "1", "l", true),
            rec("sl_2", "Eggs", "10", "", false),
        ];
        let stock = vec![
            rec("pa_1", "Milk", "1", "l", false),
            rec("pa_2", "Eggs", "10", "", true),
        ];
        let plan = subtract_stock(&list, &stock);

        // Checked list entry is not offset; checked stock contributes nothing
        assert_eq!(plan.survivors.len(), 2);
        assert!(plan.is_clean());
    }

    #[test]
    fn fractional_offset_stays_exact() {
        let list = vec![rec("sl_1", "Butter", "1/2", "lb", false)];
        let stock = vec![rec("pa_1", "Butter", "1/3", "lb", false)];
        let plan = subtract_stock(&list, &stock);

        assert_eq!(plan.survivors.len(), 1);
        assert_eq!(plan.survivors[0].quantity, Quantity::from_ratio(1, 6));
        assert_eq!(plan.quantity_patches[0].quantity.to_string(), "1/6");
    }
}
