use std::cmp::Reverse;

use serde::{Deserialize, Serialize};

use crate::model::{IngredientRecord, PositionPatch, ReorderPlan};

/// Which end of the position scale is shown first.
///
/// Both conventions exist in the wild: single-step reorder endpoints put the
/// first visible item at the highest position, while plain list endpoints
/// sort ascending. Each storage names its own convention in config — there
/// is no global default, and a storage never mixes the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderingConvention {
    /// Lower position value = earlier in the visual list.
    LowerFirst,
    /// Higher position value = earlier in the visual list.
    HigherFirst,
}

/// Single-step move in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

impl MoveDirection {
    fn offset(self) -> isize {
        match self {
            Self::Up => -1,
            Self::Down => 1,
        }
    }
}

/// Sort records into display order for the given convention. Stable, so
/// accidental position ties keep their input order.
pub fn sort_for_display(
    records: &[IngredientRecord],
    convention: OrderingConvention,
) -> Vec<IngredientRecord> {
    let mut out = records.to_vec();
    match convention {
        OrderingConvention::LowerFirst => out.sort_by_key(|r| r.position),
        OrderingConvention::HigherFirst => out.sort_by_key(|r| Reverse(r.position)),
    }
    out
}

/// Swap a record with its display-order neighbor.
///
/// `records` must be in display order. A move past either end is a no-op:
/// the list comes back unchanged with no patches. Otherwise the two entries
/// exchange position values and array slots, and exactly two patches are
/// emitted — the moved record's first, so a partial persistence failure
/// leaves at most one stale row behind it.
pub fn swap_move(
    records: &[IngredientRecord],
    index: usize,
    direction: MoveDirection,
) -> ReorderPlan {
    let mut out = records.to_vec();
    let target = index as isize + direction.offset();
    if index >= out.len() || target < 0 || target as usize >= out.len() {
        return ReorderPlan {
            records: out,
            position_patches: Vec::new(),
        };
    }
    let target = target as usize;

    let moved_position = out[index].position;
    out[index].position = out[target].position;
    out[target].position = moved_position;
    out.swap(index, target);

    // The moved record now sits at `target`
    let position_patches = vec![
        PositionPatch::for_record(&out[target]),
        PositionPatch::for_record(&out[index]),
    ];
    ReorderPlan {
        records: out,
        position_patches,
    }
}

/// Lay positions 1..=N over the given display order.
///
/// Used after a bulk reorder (alphabetical sort, drag rearrange). Only
/// records whose position actually changes are patched, so a list that is
/// already numbered correctly produces an empty plan.
pub fn reassign_positions(
    records: &[IngredientRecord],
    convention: OrderingConvention,
) -> ReorderPlan {
    let len = records.len() as i64;
    let mut out = records.to_vec();
    let mut position_patches = Vec::new();
    for (i, record) in out.iter_mut().enumerate() {
        let position = match convention {
            OrderingConvention::LowerFirst => i as i64 + 1,
            OrderingConvention::HigherFirst => len - i as i64,
        };
        if record.position != position {
            record.position = position;
            position_patches.push(PositionPatch::for_record(record));
        }
    }
    ReorderPlan {
        records: out,
        position_patches,
    }
}
