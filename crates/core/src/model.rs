//! Public data model handed to the rendering and gameplay collaborators.

use std::fmt;

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

use crate::arena::{EntityArena, PlaneId};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle with a top-left origin; y grows downwards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(self) -> f32 {
        self.y + self.height
    }

    pub fn center_x(self) -> f32 {
        self.x + self.width / 2.0
    }

    /// True when `inner` lies fully inside `self`, edges included.
    pub fn contains(self, inner: &Rect) -> bool {
        inner.x >= self.x
            && inner.y >= self.y
            && inner.right() <= self.right()
            && inner.bottom() <= self.bottom()
    }

    /// Grows the rectangle outward by `margin` on every side.
    pub fn inflated(self, margin: f32) -> Self {
        Self {
            x: self.x - margin,
            y: self.y - margin,
            width: self.width + 2.0 * margin,
            height: self.height + 2.0 * margin,
        }
    }

    pub fn translated(self, dx: f32, dy: f32) -> Self {
        Self { x: self.x + dx, y: self.y + dy, ..self }
    }
}

/// 0xRRGGBB.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub u32);

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BuildingId(pub u32);

impl fmt::Display for BuildingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "building_{}", self.0)
    }
}

/// How the renderer fills a building footprint. Generation output does not depend on it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Material {
    #[default]
    Plain,
    Brick,
    Concrete,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowKind {
    #[default]
    Standard,
    Bay,
    Small,
}

impl WindowKind {
    /// Width and height delta relative to the grid's standard window.
    pub fn size_adjustment(self) -> (f32, f32) {
        match self {
            Self::Standard => (0.0, 0.0),
            Self::Bay => (6.0, 4.0),
            Self::Small => (-4.0, -6.0),
        }
    }
}

/// A window positioned relative to its building's top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Window {
    pub rect: Rect,
    pub lit: bool,
    pub kind: WindowKind,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub id: BuildingId,
    pub rect: Rect,
    pub windows: Vec<Window>,
    pub color: Color,
    pub material: Material,
    /// Whether the height boost was applied.
    pub is_tall: bool,
}

impl Building {
    /// The building's own footprint in local coordinates.
    pub fn local_bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.rect.width, self.rect.height)
    }

    /// Scene-space rectangle of one of this building's windows.
    pub fn window_scene_rect(&self, window: &Window) -> Rect {
        window.rect.translated(self.rect.x, self.rect.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkylineDepth {
    Far,
    VeryFar,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BackgroundWindow {
    /// Relative to the owning background building.
    pub rect: Rect,
    pub lit: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BackgroundBuilding {
    pub rect: Rect,
    pub color: Color,
    pub alpha: f32,
    pub depth: SkylineDepth,
    pub windows: Option<Vec<BackgroundWindow>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloudLayer {
    Background,
    Midground,
    Foreground,
}

impl CloudLayer {
    pub const ALL: [CloudLayer; 3] = [Self::Background, Self::Midground, Self::Foreground];
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cloud {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub alpha: f32,
    /// Horizontal drift per frame.
    pub speed: f32,
    pub cluster_id: u32,
    pub layer: CloudLayer,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BirdDistance {
    Far,
    Medium,
    Close,
}

impl BirdDistance {
    pub const ALL: [BirdDistance; 3] = [Self::Far, Self::Medium, Self::Close];
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bird {
    pub x: f32,
    pub y: f32,
    /// Rest height the wavering oscillates around.
    pub base_y: f32,
    pub size: f32,
    /// Signed: positive flies right.
    pub speed: f32,
    pub waver_amplitude: f32,
    pub waver_frequency: f32,
    pub phase: f32,
    pub distance: BirdDistance,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaneClass {
    Small,
    Medium,
    Large,
}

impl PlaneClass {
    pub const ALL: [PlaneClass; 3] = [Self::Small, Self::Medium, Self::Large];
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    /// Signed: positive flies right.
    pub speed: f32,
    pub class: PlaneClass,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Heading {
    Left,
    Right,
}

impl Heading {
    pub fn of_speed(speed: f32) -> Self {
        if speed < 0.0 { Self::Left } else { Self::Right }
    }

    pub fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }

    /// X coordinate just outside the edge an entity with this heading enters from.
    pub fn entry_x(self, scene_width: f32, margin: f32) -> f32 {
        match self {
            Self::Left => scene_width + margin,
            Self::Right => -margin,
        }
    }

    /// True once `x` has crossed the edge this heading leaves through.
    pub fn has_exited(self, x: f32, scene_width: f32, margin: f32) -> bool {
        match self {
            Self::Left => x < -margin,
            Self::Right => x > scene_width + margin,
        }
    }
}

/// The generated content package for one scene.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// Left to right.
    pub buildings: Vec<Building>,
    pub clouds: Vec<Cloud>,
    pub background: Vec<BackgroundBuilding>,
    /// Filled at runtime by the plane spawner.
    #[serde(skip)]
    pub planes: EntityArena<PlaneId, Plane>,
    pub width: f32,
    pub height: f32,
}

impl Level {
    /// Stable byte encoding of the generated (static) content.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        push_f32(&mut bytes, self.width);
        push_f32(&mut bytes, self.height);

        bytes.extend((self.buildings.len() as u32).to_le_bytes());
        for building in &self.buildings {
            bytes.extend(building.id.0.to_le_bytes());
            push_rect(&mut bytes, building.rect);
            bytes.extend(building.color.0.to_le_bytes());
            bytes.push(match building.material {
                Material::Plain => 0,
                Material::Brick => 1,
                Material::Concrete => 2,
            });
            bytes.push(u8::from(building.is_tall));
            bytes.extend((building.windows.len() as u32).to_le_bytes());
            for window in &building.windows {
                push_rect(&mut bytes, window.rect);
                bytes.push(u8::from(window.lit));
                bytes.push(match window.kind {
                    WindowKind::Standard => 0,
                    WindowKind::Bay => 1,
                    WindowKind::Small => 2,
                });
            }
        }

        bytes.extend((self.clouds.len() as u32).to_le_bytes());
        for cloud in &self.clouds {
            push_rect(&mut bytes, Rect::new(cloud.x, cloud.y, cloud.width, cloud.height));
            push_f32(&mut bytes, cloud.alpha);
            push_f32(&mut bytes, cloud.speed);
            bytes.extend(cloud.cluster_id.to_le_bytes());
            bytes.push(match cloud.layer {
                CloudLayer::Background => 0,
                CloudLayer::Midground => 1,
                CloudLayer::Foreground => 2,
            });
        }

        bytes.extend((self.background.len() as u32).to_le_bytes());
        for building in &self.background {
            push_rect(&mut bytes, building.rect);
            bytes.extend(building.color.0.to_le_bytes());
            push_f32(&mut bytes, building.alpha);
            bytes.push(match building.depth {
                SkylineDepth::Far => 0,
                SkylineDepth::VeryFar => 1,
            });
            match &building.windows {
                None => bytes.push(0),
                Some(windows) => {
                    bytes.push(1);
                    bytes.extend((windows.len() as u32).to_le_bytes());
                    for window in windows {
                        push_rect(&mut bytes, window.rect);
                        bytes.push(u8::from(window.lit));
                    }
                }
            }
        }

        bytes
    }

    /// xxh3 of [`Level::canonical_bytes`].
    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }

    pub fn building(&self, id: BuildingId) -> Option<&Building> {
        self.buildings.iter().find(|building| building.id == id)
    }
}

fn push_f32(bytes: &mut Vec<u8>, value: f32) {
    bytes.extend(value.to_bits().to_le_bytes());
}

fn push_rect(bytes: &mut Vec<u8>, rect: Rect) {
    push_f32(bytes, rect.x);
    push_f32(bytes, rect.y);
    push_f32(bytes, rect.width);
    push_f32(bytes, rect.height);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn containment_includes_touching_edges() {
        let outer = Rect::new(0.0, 0.0, 100.0, 50.0);
        assert!(outer.contains(&Rect::new(0.0, 0.0, 100.0, 50.0)));
        assert!(outer.contains(&Rect::new(88.0, 34.0, 12.0, 16.0)));
        assert!(!outer.contains(&Rect::new(89.0, 34.0, 12.0, 16.0)));
        assert!(!outer.contains(&Rect::new(-0.5, 0.0, 12.0, 16.0)));
    }

    #[test]
    fn inflation_grows_every_side() {
        let inflated = Rect::new(100.0, 100.0, 50.0, 40.0).inflated(20.0);
        assert_eq!(inflated, Rect::new(80.0, 80.0, 90.0, 80.0));
        assert_eq!(inflated.right(), 170.0);
        assert_eq!(inflated.bottom(), 160.0);
    }

    #[test]
    fn heading_entry_and_exit_are_on_opposite_edges() {
        assert_eq!(Heading::Right.entry_x(700.0, 40.0), -40.0);
        assert!(!Heading::Right.has_exited(-40.0, 700.0, 40.0));
        assert!(Heading::Right.has_exited(741.0, 700.0, 40.0));
        assert_eq!(Heading::Left.entry_x(700.0, 40.0), 740.0);
        assert!(!Heading::Left.has_exited(740.0, 700.0, 40.0));
        assert!(Heading::Left.has_exited(-41.0, 700.0, 40.0));
        assert_eq!(Heading::of_speed(-0.4), Heading::Left);
    }

    #[test]
    fn window_scene_rect_offsets_by_building_origin() {
        let building = Building {
            id: BuildingId(1),
            rect: Rect::new(70.0, 190.0, 96.0, 90.0),
            windows: Vec::new(),
            color: Color(0x1f1f1f),
            material: Material::Brick,
            is_tall: false,
        };
        let rect = Rect::new(10.0, 8.0, 12.0, 16.0);
        let window = Window { rect, lit: true, kind: WindowKind::Standard };
        assert_eq!(building.window_scene_rect(&window), Rect::new(80.0, 198.0, 12.0, 16.0));
        assert_eq!(building.id.to_string(), "building_1");
        assert_eq!(building.color.to_string(), "#1f1f1f");
    }

    #[test]
    fn window_kinds_adjust_the_standard_cell() {
        let (width, height) = (12.0, 16.0);
        assert_eq!(WindowKind::default(), WindowKind::Standard);
        assert_eq!(WindowKind::Standard.size_adjustment(), (0.0, 0.0));

        let (bay_w, bay_h) = WindowKind::Bay.size_adjustment();
        assert!(bay_w > 0.0 && bay_h > 0.0);
        assert_eq!((width + bay_w, height + bay_h), (18.0, 20.0));

        let (small_w, small_h) = WindowKind::Small.size_adjustment();
        assert!(small_w < 0.0 && small_h < 0.0);
        assert_eq!((width + small_w, height + small_h), (8.0, 10.0));
    }

    #[test]
    fn fingerprint_tracks_content_changes() {
        let mut level = Level {
            buildings: Vec::new(),
            clouds: Vec::new(),
            background: Vec::new(),
            planes: EntityArena::new(),
            width: 700.0,
            height: 300.0,
        };
        let baseline = level.fingerprint();
        assert_eq!(baseline, level.clone().fingerprint());

        level.width = 701.0;
        assert_ne!(baseline, level.fingerprint());
    }
}
