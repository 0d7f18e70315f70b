use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::location::WorldMap;

/// Network identifier of a simulation entity. Assumed unique and stable for
/// the lifetime of the entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u64);

pub type PlayerId = String;

/// World position. Only `x` and `z` matter for grid and landmark lookups.
pub type Position = Vec3;

/// Horizontal projection used for all distance checks.
pub fn flat(pos: Position) -> Vec2 {
    Vec2::new(pos.x, pos.z)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    CargoPlane,
    SupplyDrop,
    /// Anything else the simulation reports. Ignored.
    Other(String),
}

/// The player who asked for a supply drop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    pub id: PlayerId,
    pub name: String,
}

/// A supply drop explicitly requested by a player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalledDrop {
    pub aircraft: Option<EntityId>,
    pub drop: Option<EntityId>,
    pub player: Option<Caller>,
}

impl CalledDrop {
    pub fn matches(&self, aircraft: Option<EntityId>, drop: Option<EntityId>) -> bool {
        (aircraft.is_some() && self.aircraft == aircraft) || (drop.is_some() && self.drop == drop)
    }
}

/// Inbound event from the simulation. Every callback the host raises is
/// translated into one of these and fed through a single ingestion point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SimEvent {
    /// World layout is known; nothing but destruction is handled before this.
    ServerInitialized {
        world: WorldMap,
    },
    EntitySpawned {
        entity: EntityId,
        kind: EntityKind,
        position: Position,
        /// Drop point of an aircraft, if already known.
        #[serde(default)]
        destination: Option<Position>,
        /// Aircraft that released this entity (supply drops only).
        #[serde(default)]
        source_aircraft: Option<EntityId>,
        #[serde(default)]
        aboard_cargo_ship: bool,
    },
    DropLanded {
        entity: EntityId,
        position: Position,
        #[serde(default)]
        aboard_cargo_ship: bool,
    },
    EntityDestroyed {
        entity: EntityId,
    },
    SupplyCalled {
        aircraft: EntityId,
        #[serde(default)]
        player: Option<Caller>,
    },
}

impl SimEvent {
    pub fn entity(&self) -> Option<EntityId> {
        match self {
            Self::ServerInitialized { .. } => None,
            Self::EntitySpawned { entity, .. }
            | Self::DropLanded { entity, .. }
            | Self::EntityDestroyed { entity } => Some(*entity),
            Self::SupplyCalled { aircraft, .. } => Some(*aircraft),
        }
    }
}
