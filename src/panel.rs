//! Thin controllers over the two pet surfaces: the always-present main
//! view and the on-demand pet panel window. The webview script is driven
//! exclusively through a fixed vocabulary of one-way events.

use tauri::{AppHandle, Emitter, Manager};
use url::Url;

use crate::assets::PETS_ORIGIN;
use crate::pets::PetSpecification;
use crate::state::AppState;

/// On-demand floating panel, at most one at a time.
pub(crate) const PANEL_LABEL: &str = "pet-panel";

/// Events understood by the webview script.
pub(crate) const EVENT_SPAWN_PET: &str = "spawn-pet";
pub(crate) const EVENT_THROW_BALL: &str = "throw-ball";
pub(crate) const EVENT_UPDATE_PET: &str = "update-pet";
pub(crate) const EVENT_RESET_PETS: &str = "reset-pets";

/// Shell URL for a pet window, with the spec in the query string.
pub(crate) fn shell_url(spec: &PetSpecification) -> Result<Url, String> {
    let mut url = Url::parse(&format!("{PETS_ORIGIN}/index.html"))
        .map_err(|e| format!("Failed to build shell URL: {e}"))?;
    url.query_pairs_mut()
        .append_pair("type", spec.kind.as_str())
        .append_pair("color", spec.color.as_str())
        .append_pair("size", spec.size.as_str());
    Ok(url)
}

pub(crate) fn panel_is_open(app: &AppHandle) -> bool {
    app.get_webview_window(PANEL_LABEL).is_some()
}

/// Show the pet panel. If one already exists with the same spec it is
/// focused; with a different spec it is told to re-render; otherwise a new
/// window is created pointed at the shell. Returns true when a window was
/// newly created.
pub(crate) fn create_or_show(
    app: &AppHandle,
    state: &AppState,
    spec: PetSpecification,
) -> Result<bool, String> {
    let spec = spec.normalized();

    if let Some(window) = app.get_webview_window(PANEL_LABEL) {
        if state.panel_spec.read().as_ref() == Some(&spec) {
            window
                .set_focus()
                .map_err(|e| format!("Failed to focus pet panel: {e}"))?;
            return Ok(false);
        }
        *state.panel_spec.write() = Some(spec.clone());
        app.emit_to(PANEL_LABEL, EVENT_UPDATE_PET, &spec)
            .map_err(|e| format!("Failed to send {EVENT_UPDATE_PET}: {e}"))?;
        return Ok(false);
    }

    let url = shell_url(&spec)?;
    tauri::WebviewWindowBuilder::new(app, PANEL_LABEL, tauri::WebviewUrl::External(url))
        .title("Pet Panel")
        .inner_size(520.0, 360.0)
        .build()
        .map_err(|e| format!("Failed to create pet panel: {e}"))?;
    *state.panel_spec.write() = Some(spec);
    tracing::info!(target: "deskpets::panel", "pet panel created");
    Ok(true)
}

/// Tell the panel script to spawn one pet. Color constraints are applied
/// before the event leaves the host.
pub(crate) fn spawn_pet(app: &AppHandle, spec: &PetSpecification) -> Result<(), String> {
    let spec = spec.normalized();
    app.emit_to(
        PANEL_LABEL,
        EVENT_SPAWN_PET,
        serde_json::json!({ "type": spec.kind, "color": spec.color }),
    )
    .map_err(|e| format!("Failed to send {EVENT_SPAWN_PET}: {e}"))
}

pub(crate) fn throw_ball(app: &AppHandle) -> Result<(), String> {
    app.emit_to(PANEL_LABEL, EVENT_THROW_BALL, ())
        .map_err(|e| format!("Failed to send {EVENT_THROW_BALL}: {e}"))
}

/// Push a changed spec to every pet surface (panel and main view).
pub(crate) fn notify_spec_changed(
    app: &AppHandle,
    state: &AppState,
    spec: &PetSpecification,
) -> Result<(), String> {
    let spec = spec.normalized();
    if panel_is_open(app) {
        *state.panel_spec.write() = Some(spec.clone());
    }
    app.emit(EVENT_UPDATE_PET, &spec)
        .map_err(|e| format!("Failed to send {EVENT_UPDATE_PET}: {e}"))
}

/// Tell every pet surface to drop its extra pets.
pub(crate) fn reset_pets(app: &AppHandle) -> Result<(), String> {
    app.emit(EVENT_RESET_PETS, ())
        .map_err(|e| format!("Failed to send {EVENT_RESET_PETS}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pets::{PetColor, PetSize, PetType};

    #[test]
    fn shell_url_carries_the_spec() {
        let spec = PetSpecification::new(PetColor::Black, PetType::Clippy, PetSize::Medium);
        let url = shell_url(&spec).unwrap();
        assert_eq!(url.scheme(), "pets");
        assert_eq!(url.path(), "/index.html");
        let query: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(query.contains(&("type".to_string(), "clippy".to_string())));
        assert!(query.contains(&("color".to_string(), "black".to_string())));
        assert!(query.contains(&("size".to_string(), "medium".to_string())));
    }

    #[test]
    fn shell_url_encodes_kebab_case_types() {
        let spec = PetSpecification::new(PetColor::Yellow, PetType::RubberDuck, PetSize::Nano);
        let url = shell_url(&spec).unwrap();
        assert!(url.query().unwrap().contains("type=rubber-duck"));
    }
}
