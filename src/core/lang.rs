//! Message templates.
//!
//! Templates use positional placeholders (`{0}`, `{1}`, ...). The built-in
//! catalog is English; operators can override any key from a JSON file.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Source of message templates, optionally per recipient locale.
pub trait Localization {
    fn template(&self, key: &str, locale: Option<&str>) -> Option<String>;
}

pub mod keys {
    pub const CARGO_PLANE: &str = "CargoPlane_";
    pub const SUPPLY_DROP_DROPPED: &str = "SupplyDropDropped";
    pub const SUPPLY_DROP_LANDED: &str = "SupplyDropLanded_";
    pub const LOCATION: &str = "Location";
    pub const DESTINATION: &str = "Destination";
    pub const SUPPLY_DROP_PLAYER: &str = "SupplyDropPlayer";
    pub const DISCORD_MESSAGE: &str = "DiscordMessage_";
}

const DEFAULT_MESSAGES: &[(&str, &str)] = &[
    (keys::CARGO_PLANE, "Cargo Plane inbound{0}{1}{2}"),
    (keys::SUPPLY_DROP_DROPPED, "Supply Drop dropped{0}{1}"),
    (keys::SUPPLY_DROP_LANDED, "Supply Drop landed{0}{1}"),
    (keys::LOCATION, " at <color=#ffa500>{0}</color>"),
    (keys::DESTINATION, " heading to <color=#ffa500>{0}</color>"),
    (keys::SUPPLY_DROP_PLAYER, " (called by {0})"),
    (keys::DISCORD_MESSAGE, "{0}"),
];

#[derive(Debug, Clone)]
pub struct MessageCatalog {
    messages: HashMap<String, String>,
}

impl MessageCatalog {
    pub fn english() -> Self {
        Self {
            messages: DEFAULT_MESSAGES
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    pub fn empty() -> Self {
        Self {
            messages: HashMap::new(),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, template: impl Into<String>) {
        self.messages.insert(key.into(), template.into());
    }

    /// Merge a flat JSON object of key -> template over the catalog.
    /// Returns how many keys were applied; unreadable files apply none.
    pub fn load_overrides(&mut self, path: impl AsRef<Path>) -> usize {
        let path = path.as_ref();
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                log::warn!("Failed to read messages {:?}: {}", path, e);
                return 0;
            }
        };
        match serde_json::from_str::<HashMap<String, String>>(&content) {
            Ok(overrides) => {
                let count = overrides.len();
                self.messages.extend(overrides);
                count
            }
            Err(e) => {
                log::warn!("Ignoring malformed messages {:?}: {}", path, e);
                0
            }
        }
    }
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self::english()
    }
}

impl Localization for MessageCatalog {
    fn template(&self, key: &str, _locale: Option<&str>) -> Option<String> {
        self.messages.get(key).cloned()
    }
}
