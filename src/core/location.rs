//! World position to human-readable place labels.
//!
//! A label is the map grid cell (`D7`) optionally followed by the nearest
//! notable landmark in parentheses (`D7 (Large Oil Rig)`).

use serde::{Deserialize, Serialize};

use super::config::WorldSettings;
use super::model::{flat, Position};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldBounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_z: f32,
    pub max_z: f32,
}

impl WorldBounds {
    /// Square world centred on the origin, as the simulation lays it out.
    pub fn square(size: f32) -> Self {
        let half = size / 2.0;
        Self {
            min_x: -half,
            max_x: half,
            min_z: -half,
            max_z: half,
        }
    }

    fn is_valid(&self) -> bool {
        self.max_x > self.min_x && self.max_z > self.min_z
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandmarkKind {
    LargeOilRig,
    OilRig,
    Excavator,
}

impl LandmarkKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::LargeOilRig => "Large Oil Rig",
            Self::OilRig => "Oil Rig",
            Self::Excavator => "Giant Excavator",
        }
    }
}

pub const CARGO_SHIP: &str = "Cargo Ship";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub kind: LandmarkKind,
    pub position: Position,
}

/// Static world layout reported by the simulation at start-up.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldMap {
    pub bounds: Option<WorldBounds>,
    #[serde(default)]
    pub landmarks: Vec<Landmark>,
}

/// What the simulation knows about the entity at the position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntityContext {
    pub aboard_cargo_ship: bool,
}

pub struct LocationResolver {
    map: WorldMap,
    settings: WorldSettings,
}

impl LocationResolver {
    pub fn new(map: WorldMap, settings: WorldSettings) -> Self {
        Self { map, settings }
    }

    pub fn set_map(&mut self, map: WorldMap) {
        self.map = map;
    }

    pub fn set_settings(&mut self, settings: WorldSettings) {
        self.settings = settings;
    }

    /// Label for `pos`, or an empty string when the world is not known yet.
    ///
    /// Positions outside the world bounds clamp to the nearest edge cell.
    pub fn resolve(&self, pos: Position, entity: Option<&EntityContext>, hide_landmark: bool) -> String {
        let grid = match self.grid_cell(pos) {
            Some(grid) => grid,
            None => return String::new(),
        };

        if entity.is_some_and(|e| e.aboard_cargo_ship) {
            return format!("{} ({})", grid, CARGO_SHIP);
        }
        if hide_landmark {
            return grid;
        }
        match self.nearest_landmark(pos) {
            Some(kind) => format!("{} ({})", grid, kind.display_name()),
            None => grid,
        }
    }

    fn grid_cell(&self, pos: Position) -> Option<String> {
        let bounds = self.map.bounds.filter(WorldBounds::is_valid)?;
        let cell = self.settings.grid_cell_size;
        if !(cell > 0.0) || !pos.x.is_finite() || !pos.z.is_finite() {
            return None;
        }

        let columns = ((bounds.max_x - bounds.min_x) / cell).ceil().max(1.0);
        let rows = ((bounds.max_z - bounds.min_z) / cell).ceil().max(1.0);

        let column = ((pos.x - bounds.min_x) / cell).floor().clamp(0.0, columns - 1.0);
        let row = ((bounds.max_z - pos.z) / cell).floor().clamp(0.0, rows - 1.0);

        Some(format!("{}{}", column_letters(column as u32), row as u32))
    }

    fn nearest_landmark(&self, pos: Position) -> Option<LandmarkKind> {
        let here = flat(pos);
        self.map
            .landmarks
            .iter()
            .filter_map(|landmark| {
                let distance = here.distance(flat(landmark.position));
                (distance <= self.radius(landmark.kind)).then_some((distance, landmark.kind))
            })
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, kind)| kind)
    }

    fn radius(&self, kind: LandmarkKind) -> f32 {
        match kind {
            LandmarkKind::LargeOilRig => self.settings.large_oil_rig_radius,
            LandmarkKind::OilRig => self.settings.oil_rig_radius,
            LandmarkKind::Excavator => self.settings.excavator_radius,
        }
    }
}

/// Spreadsheet-style column name: 0 -> A, 25 -> Z, 26 -> AA.
fn column_letters(mut index: u32) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(char::from(b'A' + (index % 26) as u8));
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    letters.iter().rev().collect()
}
