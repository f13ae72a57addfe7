//! Line-of-sight reachability between platforms, checked against clearance-inflated
//! building bounds.

mod geometry;

pub use geometry::segment_intersects_rect;

use std::f32::consts::FRAC_PI_4;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::SceneConfig;
use crate::model::{Building, BuildingId, Point, Rect};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlatformId(pub u32);

impl fmt::Display for PlatformId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "platform_{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformKind {
    TaxiSpawn,
    PassengerPickup,
    PassengerDropoff,
    Neutral,
}

/// An interaction point supplied by the gameplay layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub id: PlatformId,
    pub rect: Rect,
    pub kind: PlatformKind,
    pub building_id: Option<BuildingId>,
    pub landable: bool,
}

impl Platform {
    /// Horizontal center of the platform's top edge; all routing starts and ends here.
    pub fn anchor(&self) -> Point {
        Point::new(self.rect.center_x(), self.rect.y)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NavigationPath {
    pub from: PlatformId,
    pub to: PlatformId,
    pub reachable: bool,
    /// Buildings whose inflated bounds cut the route, in input order.
    pub obstacles: Vec<BuildingId>,
    /// Intermediate point for two-leg routes; `None` for direct paths.
    pub waypoint: Option<Point>,
}

/// Horizontal free span between two adjacent buildings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BuildingGap {
    pub x: f32,
    pub width: f32,
}

impl BuildingGap {
    pub fn center_x(self) -> f32 {
        self.x + self.width / 2.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NavigationValidator {
    clearance: f32,
    safe_landing_clearance: f32,
    min_gap: f32,
}

impl NavigationValidator {
    pub fn new(config: &SceneConfig) -> Self {
        Self {
            clearance: config.navigation.clearance,
            safe_landing_clearance: config.navigation.safe_landing_clearance,
            min_gap: config.level.min_building_gap,
        }
    }

    pub fn can_reach_platform(
        &self,
        from: &Platform,
        to: &Platform,
        buildings: &[Building],
    ) -> bool {
        self.has_clear_path(from.anchor(), to.anchor(), buildings)
    }

    pub fn navigation_path(
        &self,
        from: &Platform,
        to: &Platform,
        buildings: &[Building],
    ) -> NavigationPath {
        let obstacles = self.obstacles_between(from.anchor(), to.anchor(), buildings);
        NavigationPath {
            from: from.id,
            to: to.id,
            reachable: obstacles.is_empty(),
            obstacles,
            waypoint: None,
        }
    }

    /// Every building whose inflated bounds intersect the segment.
    pub fn obstacles_between(
        &self,
        start: Point,
        end: Point,
        buildings: &[Building],
    ) -> Vec<BuildingId> {
        buildings
            .iter()
            .filter(|building| self.blocks(building, start, end))
            .map(|building| building.id)
            .collect()
    }

    pub fn has_clear_path(&self, start: Point, end: Point, buildings: &[Building]) -> bool {
        !buildings.iter().any(|building| self.blocks(building, start, end))
    }

    fn blocks(&self, building: &Building, start: Point, end: Point) -> bool {
        segment_intersects_rect(start, end, building.rect.inflated(self.clearance))
    }

    /// Gaps of at least the minimum building gap between horizontally adjacent buildings.
    pub fn building_gaps(&self, buildings: &[Building]) -> Vec<BuildingGap> {
        let mut sorted: Vec<&Building> = buildings.iter().collect();
        sorted.sort_by(|a, b| a.rect.x.total_cmp(&b.rect.x));
        sorted
            .windows(2)
            .map(|pair| {
                let x = pair[0].rect.right();
                BuildingGap { x, width: pair[1].rect.x - x }
            })
            .filter(|gap| gap.width >= self.min_gap)
            .collect()
    }

    /// Two-leg routes through a waypoint above each gap, kept when both legs are clear.
    /// The waypoint sits one safe landing clearance above the higher endpoint.
    pub fn find_alternate_paths(
        &self,
        from: &Platform,
        to: &Platform,
        buildings: &[Building],
    ) -> Vec<NavigationPath> {
        let (start, end) = (from.anchor(), to.anchor());
        let waypoint_y = start.y.min(end.y) - self.safe_landing_clearance;

        self.building_gaps(buildings)
            .into_iter()
            .map(|gap| Point::new(gap.center_x(), waypoint_y))
            .filter(|&waypoint| {
                self.has_clear_path(start, waypoint, buildings)
                    && self.has_clear_path(waypoint, end, buildings)
            })
            .map(|waypoint| NavigationPath {
                from: from.id,
                to: to.id,
                reachable: true,
                obstacles: Vec::new(),
                waypoint: Some(waypoint),
            })
            .collect()
    }

    /// Probe points upper-left, straight above and upper-right of the platform at twice the
    /// safe landing clearance, kept when the descent to the anchor is clear.
    pub fn safe_landing_approaches(
        &self,
        platform: &Platform,
        buildings: &[Building],
    ) -> Vec<Point> {
        let anchor = platform.anchor();
        let distance = self.safe_landing_clearance * 2.0;

        [-FRAC_PI_4, 0.0, FRAC_PI_4]
            .into_iter()
            .map(|angle: f32| {
                Point::new(anchor.x + angle.sin() * distance, anchor.y - angle.cos() * distance)
            })
            .filter(|&probe| self.has_clear_path(probe, anchor, buildings))
            .collect()
    }

    /// The spawn reaches every pickup directly, and every pickup reaches at least one dropoff.
    pub fn validate_level_navigation(
        &self,
        spawn: &Platform,
        platforms: &[Platform],
        buildings: &[Building],
    ) -> bool {
        for pickup in of_kind(platforms, PlatformKind::PassengerPickup) {
            if !self.can_reach_platform(spawn, pickup, buildings) {
                log::debug!("{} cannot reach pickup {}", spawn.id, pickup.id);
                return false;
            }
        }

        for pickup in of_kind(platforms, PlatformKind::PassengerPickup) {
            let served = of_kind(platforms, PlatformKind::PassengerDropoff)
                .any(|dropoff| self.can_reach_platform(pickup, dropoff, buildings));
            if !served {
                log::debug!("pickup {} reaches no dropoff", pickup.id);
                return false;
            }
        }
        true
    }
}

fn of_kind(platforms: &[Platform], kind: PlatformKind) -> impl Iterator<Item = &Platform> {
    platforms.iter().filter(move |platform| platform.kind == kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Color, Material};

    fn building(id: u32, rect: Rect) -> Building {
        Building {
            id: BuildingId(id),
            rect,
            windows: Vec::new(),
            color: Color(0x252526),
            material: Material::Concrete,
            is_tall: false,
        }
    }

    fn platform(id: u32, kind: PlatformKind, anchor_x: f32, anchor_y: f32) -> Platform {
        Platform {
            id: PlatformId(id),
            rect: Rect::new(anchor_x - 20.0, anchor_y, 40.0, 10.0),
            kind,
            building_id: None,
            landable: true,
        }
    }

    fn validator() -> NavigationValidator {
        NavigationValidator::new(&SceneConfig::default())
    }

    #[test]
    fn platforms_with_nothing_between_are_reachable() {
        let buildings = [building(1, Rect::new(500.0, 200.0, 100.0, 80.0))];
        let from = platform(1, PlatformKind::PassengerPickup, 50.0, 100.0);
        let to = platform(2, PlatformKind::PassengerDropoff, 300.0, 100.0);

        assert!(validator().can_reach_platform(&from, &to, &buildings));
        let path = validator().navigation_path(&from, &to, &buildings);
        assert!(path.reachable);
        assert!(path.obstacles.is_empty());
        assert_eq!(path.waypoint, None);
    }

    #[test]
    fn building_straddling_the_midpoint_blocks_and_is_reported() {
        let buildings = [
            building(1, Rect::new(180.0, 100.0, 40.0, 180.0)),
            building(2, Rect::new(600.0, 100.0, 40.0, 180.0)),
        ];
        let from = platform(1, PlatformKind::PassengerPickup, 0.0, 150.0);
        let to = platform(2, PlatformKind::PassengerDropoff, 400.0, 150.0);

        let path = validator().navigation_path(&from, &to, &buildings);
        assert!(!path.reachable);
        assert_eq!(path.obstacles, vec![BuildingId(1)]);
        assert!(!validator().can_reach_platform(&from, &to, &buildings));
    }

    #[test]
    fn only_wide_enough_gaps_are_reported() {
        let buildings = [
            building(3, Rect::new(400.0, 200.0, 100.0, 80.0)),
            building(1, Rect::new(0.0, 200.0, 100.0, 80.0)),
            building(2, Rect::new(180.0, 200.0, 100.0, 80.0)),
        ];
        let gaps = validator().building_gaps(&buildings);
        // 100..180 is exactly the minimum gap, 280..400 is wider.
        assert_eq!(
            gaps,
            vec![BuildingGap { x: 100.0, width: 80.0 }, BuildingGap { x: 280.0, width: 120.0 }]
        );

        let narrow = [
            building(1, Rect::new(0.0, 200.0, 100.0, 80.0)),
            building(2, Rect::new(179.0, 200.0, 100.0, 80.0)),
        ];
        assert!(validator().building_gaps(&narrow).is_empty());
    }

    #[test]
    fn alternate_route_climbs_out_of_the_gap() {
        let buildings = [
            building(1, Rect::new(0.0, 180.0, 100.0, 100.0)),
            building(2, Rect::new(200.0, 150.0, 100.0, 130.0)),
        ];
        let low = platform(1, PlatformKind::PassengerPickup, 150.0, 250.0);
        let high = platform(2, PlatformKind::PassengerDropoff, 250.0, 60.0);

        assert!(!validator().can_reach_platform(&low, &high, &buildings));
        let routes = validator().find_alternate_paths(&low, &high, &buildings);

        assert_eq!(routes.len(), 1);
        assert!(routes[0].reachable);
        assert_eq!(routes[0].waypoint, Some(Point::new(150.0, 30.0)));
    }

    #[test]
    fn landing_probes_are_filtered_by_neighbouring_buildings() {
        let buildings = [
            building(1, Rect::new(0.0, 180.0, 100.0, 100.0)),
            building(2, Rect::new(200.0, 150.0, 100.0, 130.0)),
        ];

        let open_sky = platform(1, PlatformKind::Neutral, 250.0, 60.0);
        assert_eq!(validator().safe_landing_approaches(&open_sky, &buildings).len(), 3);

        let in_gap = platform(2, PlatformKind::Neutral, 150.0, 250.0);
        let approaches = validator().safe_landing_approaches(&in_gap, &buildings);
        assert_eq!(approaches.len(), 1);
        assert!((approaches[0].x - 150.0).abs() < 1e-4);
        assert!((approaches[0].y - 190.0).abs() < 1e-4);
    }

    #[test]
    fn level_navigation_requires_spawn_to_pickup_and_pickup_to_dropoff() {
        let wall = [building(1, Rect::new(300.0, 0.0, 40.0, 280.0))];
        let spawn = platform(0, PlatformKind::TaxiSpawn, 50.0, 100.0);
        let pickup = platform(1, PlatformKind::PassengerPickup, 200.0, 100.0);
        let near_dropoff = platform(2, PlatformKind::PassengerDropoff, 100.0, 120.0);
        let far_dropoff = platform(3, PlatformKind::PassengerDropoff, 600.0, 100.0);

        let validator = validator();
        assert!(validator.validate_level_navigation(
            &spawn,
            &[pickup.clone(), near_dropoff.clone(), far_dropoff.clone()],
            &wall,
        ));
        let unserved = [pickup.clone(), far_dropoff];
        assert!(!validator.validate_level_navigation(&spawn, &unserved, &wall));

        let stranded_pickup = platform(4, PlatformKind::PassengerPickup, 650.0, 100.0);
        assert!(!validator.validate_level_navigation(
            &spawn,
            &[pickup, near_dropoff, stranded_pickup],
            &wall,
        ));
    }

    #[test]
    fn platforms_without_pickups_validate_trivially() {
        let spawn = platform(0, PlatformKind::TaxiSpawn, 50.0, 100.0);
        let neutral = platform(1, PlatformKind::Neutral, 90.0, 100.0);
        assert!(validator().validate_level_navigation(&spawn, &[neutral], &[]));
    }
}
