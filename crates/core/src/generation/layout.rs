//! Horizontal placement of the playable building row and the gap rules it must satisfy.

use std::cmp::Ordering;

use crate::config::LevelConfig;
use crate::model::Building;

/// Planned position and snapped width for one building of the row.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RowSlot {
    pub x: f32,
    pub width: f32,
}

/// Spreads `count` buildings evenly across `scene_width`.
///
/// `gap_fraction` of the width is split into `count + 1` equal gaps (both screen edges
/// included); the rest is shared evenly and snapped down onto the discrete width set.
pub fn plan_building_row(level: &LevelConfig, scene_width: f32, count: usize) -> Vec<RowSlot> {
    if count == 0 {
        return Vec::new();
    }

    let total_gap = scene_width * level.gap_fraction;
    let target_width = (scene_width - total_gap) / count as f32;
    let gap = total_gap / (count + 1) as f32;

    log::debug!(
        "row plan: count={count} scene_width={scene_width} target_width={target_width} gap={gap}"
    );

    (0..count)
        .map(|slot| {
            let x = gap + slot as f32 * (target_width + gap);
            let available = target_width.min(scene_width - x - gap);
            RowSlot { x, width: snap_width(level, available) }
        })
        .collect()
}

/// Largest configured width at or below `available`, else the smallest configured width.
fn snap_width(level: &LevelConfig, available: f32) -> f32 {
    level
        .building_widths
        .iter()
        .copied()
        .filter(|&width| width <= available)
        .fold(None, |widest: Option<f32>, width| Some(widest.map_or(width, |w| w.max(width))))
        .unwrap_or_else(|| level.smallest_width())
}

fn by_left_edge(a: &Building, b: &Building) -> Ordering {
    a.rect.x.total_cmp(&b.rect.x)
}

/// True iff every pair of horizontally adjacent buildings is separated by at least `min_gap`.
pub fn validate_building_gaps(buildings: &[Building], min_gap: f32) -> bool {
    let mut sorted: Vec<&Building> = buildings.iter().collect();
    sorted.sort_by(|a, b| by_left_edge(a, b));
    sorted.windows(2).all(|pair| pair[1].rect.x - pair[0].rect.right() >= min_gap)
}

pub fn buildings_within_bounds(buildings: &[Building], scene_width: f32) -> bool {
    buildings.iter().all(|building| building.rect.x >= 0.0 && building.rect.right() <= scene_width)
}

/// Deterministic repair: sorts by x, pushes each building right until it clears its
/// predecessor by `min_gap`, then drops any building that no longer fits the scene.
pub fn ensure_navigation_gaps(
    mut buildings: Vec<Building>,
    scene_width: f32,
    min_gap: f32,
) -> Vec<Building> {
    buildings.sort_by(by_left_edge);

    for index in 1..buildings.len() {
        let required_x = buildings[index - 1].rect.right() + min_gap;
        if buildings[index].rect.x < required_x {
            buildings[index].rect.x = required_x;
        }
    }

    let before = buildings.len();
    buildings.retain(|building| building.rect.right() <= scene_width);
    if buildings.len() < before {
        log::debug!("gap repair dropped {} overflowing building(s)", before - buildings.len());
    }
    buildings
}
