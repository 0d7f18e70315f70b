// Alert model types.

use serde::{Deserialize, Serialize};

use crate::core::config::AlertSettings;
use crate::core::lang::keys;

/// Kinds of inbound events that can raise an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlertKind {
    /// A supply aircraft entered the map
    CargoPlane,
    /// A supply drop left its aircraft
    SupplyDrop,
    /// A supply drop touched the ground
    SupplyDropLanded,
}

impl AlertKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::CargoPlane => "Cargo Plane",
            Self::SupplyDrop => "Supply Drop",
            Self::SupplyDropLanded => "Supply Drop Landed",
        }
    }

    /// Template key used for the headline message
    pub fn message_key(&self) -> &'static str {
        match self {
            Self::CargoPlane => keys::CARGO_PLANE,
            Self::SupplyDrop => keys::SUPPLY_DROP_DROPPED,
            Self::SupplyDropLanded => keys::SUPPLY_DROP_LANDED,
        }
    }

    /// Whether this kind is configured to reach user-facing sinks
    pub fn is_enabled(&self, settings: &AlertSettings) -> bool {
        match self {
            Self::CargoPlane => settings.cargo_plane,
            Self::SupplyDrop => settings.supply_drop,
            Self::SupplyDropLanded => settings.supply_drop_landed,
        }
    }

    pub fn all() -> &'static [AlertKind] {
        &[Self::CargoPlane, Self::SupplyDrop, Self::SupplyDropLanded]
    }
}

/// One logical notification, produced per triggering event and consumed
/// immediately by the dispatcher. Never queued beyond the one-tick defer.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationEvent {
    pub kind: AlertKind,
    pub key: &'static str,
    /// Already-rendered fragments substituted into the template
    pub params: Vec<String>,
    /// User-facing (true) or log-only (false)
    pub alert: bool,
}

impl NotificationEvent {
    pub fn new(kind: AlertKind, params: Vec<String>, alert: bool) -> Self {
        Self {
            kind,
            key: kind.message_key(),
            params,
            alert,
        }
    }
}
