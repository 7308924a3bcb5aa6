use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tauri::State;

use crate::pets::{PetColor, PetSize, PetType};
use crate::state::AppState;

/// Get the config directory using platform-appropriate location.
///
/// - macOS: `~/Library/Application Support/deskpets/`
/// - Linux: `~/.config/deskpets/` (or `$XDG_CONFIG_HOME`)
/// - Windows: `%APPDATA%/deskpets/`
///
/// Falls back to `~/.deskpets/` if the platform dir is unavailable.
pub(crate) fn config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("deskpets"))
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".deskpets")
        })
}

/// Load a JSON config file, returning Default if missing or corrupt.
/// Logs warnings/errors when the file exists but cannot be read or parsed,
/// so corrupt files are visible in logs instead of silently resetting state.
pub(crate) fn load_json_config<T: DeserializeOwned + Default>(filename: &str) -> T {
    let path = config_dir().join(filename);
    if !path.exists() {
        return T::default();
    }
    let content = match std::fs::read_to_string(&path) {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(path = %path.display(), "could not read config: {e}");
            return T::default();
        }
    };
    match serde_json::from_str(&content) {
        Ok(v) => v,
        Err(e) => {
            tracing::error!(path = %path.display(), "corrupt config: {e}, using defaults");
            T::default()
        }
    }
}

/// Save a JSON config file atomically (temp file + rename).
/// Sets 0600 permissions on Unix.
pub(crate) fn save_json_config<T: Serialize>(filename: &str, config: &T) -> Result<(), String> {
    let dir = config_dir();
    std::fs::create_dir_all(&dir).map_err(|e| format!("Failed to create config directory: {e}"))?;

    let json = serde_json::to_string_pretty(config)
        .map_err(|e| format!("Failed to serialize config: {e}"))?;

    let target = dir.join(filename);
    let temp = dir.join(format!("{}.tmp.{}", filename, std::process::id()));

    std::fs::write(&temp, &json).map_err(|e| format!("Failed to write temp config: {e}"))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(&temp, perms)
            .map_err(|e| format!("Failed to set config permissions: {e}"))?;
    }

    // Atomic rename: either the old file or new file exists, never partial
    std::fs::rename(&temp, &target).map_err(|e| {
        let _ = std::fs::remove_file(&temp);
        format!("Failed to commit config: {e}")
    })?;

    Ok(())
}

// ---------------------------------------------------------------------------
// PetsConfig
// ---------------------------------------------------------------------------

/// Deserialize an enum field leniently: an unrecognized value falls back to
/// the field's default instead of failing the whole config file. Keeps a
/// hand-edited `pet_type: "dragon"` from wiping the rest of the config.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

/// User-chosen pet tuple plus shell theme. Each enum field is validated
/// against its allow-list on load; invalid values become defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct PetsConfig {
    #[serde(default, deserialize_with = "lenient")]
    pub(crate) pet_type: PetType,
    #[serde(default, deserialize_with = "lenient")]
    pub(crate) pet_color: PetColor,
    #[serde(default, deserialize_with = "lenient")]
    pub(crate) pet_size: PetSize,
    /// Background theme name for the shell ("none" = plain background)
    #[serde(default = "default_theme")]
    pub(crate) theme: String,
}

fn default_theme() -> String {
    "none".to_string()
}

impl Default for PetsConfig {
    fn default() -> Self {
        Self {
            pet_type: PetType::Cat,
            pet_color: PetColor::Brown,
            pet_size: PetSize::Nano,
            theme: default_theme(),
        }
    }
}

pub(crate) const PETS_CONFIG_FILE: &str = "config.json";

// ---------------------------------------------------------------------------
// Tauri commands
// ---------------------------------------------------------------------------

/// Load configuration from the cached AppState.
#[tauri::command]
pub(crate) fn load_pets_config(state: State<'_, Arc<AppState>>) -> PetsConfig {
    state.config.read().clone()
}

/// Save configuration to disk, update the AppState cache, and push the new
/// spec to any open pet windows (the settings-change path).
#[tauri::command]
pub(crate) fn save_pets_config(
    app: tauri::AppHandle,
    state: State<'_, Arc<AppState>>,
    config: PetsConfig,
) -> Result<(), String> {
    let changed = *state.config.read() != config;

    save_json_config(PETS_CONFIG_FILE, &config)?;
    *state.config.write() = config.clone();

    if changed {
        let spec = crate::pets::PetSpecification::from_config(&config);
        crate::panel::notify_spec_changed(&app, &state, &spec)?;
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
