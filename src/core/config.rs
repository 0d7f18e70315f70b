use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;

use super::lang::MessageCatalog;

const SETTINGS_FILE: &str = "settings.json";
const MESSAGES_FILE: &str = "messages.json";

/// Plugin settings. Every section falls back to its defaults when missing
/// from settings.json.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub alerts: AlertSettings,
    pub notifications: NotificationSettings,
    pub ui_notify: UiNotifySettings,
    pub webhook: WebhookSettings,
    pub logging: LoggingSettings,
    pub misc: MiscSettings,
    pub world: WorldSettings,
}

/// Which event types raise user-facing alerts.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AlertSettings {
    pub cargo_plane: bool,
    pub supply_drop: bool,
    pub supply_drop_landed: bool,
}

impl Default for AlertSettings {
    fn default() -> Self {
        Self {
            cargo_plane: true,
            supply_drop: true,
            supply_drop_landed: true,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct NotificationSettings {
    pub chat: bool,
    pub popup: bool,
    /// Avatar shown next to chat broadcasts (0 = server default)
    pub chat_icon_id: u64,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            chat: true,
            popup: false,
            chat_icon_id: 0,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct UiNotifySettings {
    pub enabled: bool,
    pub style: i32,
    /// Recipients need this permission to see overlay notifications
    pub capability: String,
}

impl Default for UiNotifySettings {
    fn default() -> Self {
        Self {
            enabled: false,
            style: 0,
            capability: "uinotify.see".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct WebhookSettings {
    pub enabled: bool,
    pub url: String,
    /// Send a titled panel instead of plain text
    pub embedded: bool,
    pub embed_title: String,
    pub embed_color: u32,
}

impl Default for WebhookSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            url: String::new(),
            embedded: false,
            embed_title: "Inbound".to_string(),
            embed_color: 3_447_003,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingSettings {
    pub console: bool,
    pub file: bool,
    /// Log non-alert events too
    pub all_events: bool,
    pub file_path: PathBuf,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            console: true,
            file: false,
            all_events: false,
            file_path: PathBuf::from("inbound_log.txt"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct MiscSettings {
    pub show_supply_player: bool,
    pub hide_called_supply: bool,
    pub hide_random_supply: bool,
}

impl Default for MiscSettings {
    fn default() -> Self {
        Self {
            show_supply_player: true,
            hide_called_supply: false,
            hide_random_supply: false,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct WorldSettings {
    pub grid_cell_size: f32,
    pub oil_rig_radius: f32,
    pub large_oil_rig_radius: f32,
    pub excavator_radius: f32,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            grid_cell_size: 146.3,
            oil_rig_radius: 150.0,
            large_oil_rig_radius: 200.0,
            excavator_radius: 150.0,
        }
    }
}

/// Owns the files an operator edits: `settings.json` and the optional
/// `messages.json` template overrides.
pub struct ConfigManager {
    settings_path: PathBuf,
    messages_path: PathBuf,
}

impl ConfigManager {
    pub fn new(config_dir: impl AsRef<Path>) -> Self {
        let dir = config_dir.as_ref();
        Self {
            settings_path: dir.join(SETTINGS_FILE),
            messages_path: dir.join(MESSAGES_FILE),
        }
    }

    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    /// Missing or unreadable settings fall back to defaults.
    pub fn load(&self) -> Settings {
        match self.read() {
            Ok(Some(settings)) => settings,
            Ok(None) => Settings::default(),
            Err(e) => {
                log::warn!("Ignoring {:?}: {}", self.settings_path, e);
                Settings::default()
            }
        }
    }

    /// Like [`load`](Self::load), but writes the result back so the file
    /// lists every option, including ones added since it was written.
    /// A file that fails to parse is left alone for the operator to fix.
    pub fn load_or_init(&self) -> Settings {
        let settings = match self.read() {
            Ok(Some(settings)) => settings,
            Ok(None) => {
                log::info!("Creating default settings at {:?}", self.settings_path);
                Settings::default()
            }
            Err(e) => {
                log::warn!("Ignoring {:?}: {}", self.settings_path, e);
                return Settings::default();
            }
        };
        if let Err(e) = self.save(&settings) {
            log::warn!("Failed to write {:?}: {}", self.settings_path, e);
        }
        settings
    }

    /// English templates with any overrides from `messages.json` applied.
    pub fn load_catalog(&self) -> MessageCatalog {
        let mut catalog = MessageCatalog::english();
        if self.messages_path.exists() {
            let applied = catalog.load_overrides(&self.messages_path);
            log::info!("Loaded {} message overrides", applied);
        }
        catalog
    }

    /// Writes next to the target and renames, so a crash mid-write never
    /// leaves a truncated settings file behind.
    pub fn save(&self, settings: &Settings) -> io::Result<()> {
        if let Some(parent) = self.settings_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let staged = self.settings_path.with_extension("json.tmp");
        fs::write(&staged, serde_json::to_string_pretty(settings)?)?;
        fs::rename(&staged, &self.settings_path)
    }

    fn read(&self) -> io::Result<Option<Settings>> {
        match fs::read_to_string(&self.settings_path) {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}
