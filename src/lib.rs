pub(crate) mod assets;
pub(crate) mod config;
mod menu;
pub(crate) mod panel;
pub(crate) mod pets;
pub(crate) mod state;

use std::sync::Arc;

use tauri::{AppHandle, Emitter, Manager, State};
use tauri_plugin_dialog::{DialogExt, MessageDialogKind};

use pets::{allowed_colors, normalize_color, PetColor, PetSpecification, PetType};
use state::AppState;

/// Open (or reveal) the pet panel with the configured pet. When the panel
/// is newly created, pets persisted from previous sessions are re-spawned
/// into it.
#[tauri::command]
fn start_pets(app: AppHandle, state: State<'_, Arc<AppState>>) -> Result<(), String> {
    let spec = PetSpecification::from_config(&state.config.read());
    let created = panel::create_or_show(&app, &state, spec)?;

    if created {
        for item in state.collection_snapshot() {
            panel::spawn_pet(&app, &item)?;
        }
    }
    Ok(())
}

/// Pick the color for a newly spawned pet: honor the request when it is a
/// legal choice for the species, otherwise repair the default.
fn choose_spawn_color(pet_type: PetType, requested: Option<PetColor>) -> PetColor {
    match requested {
        Some(color) if allowed_colors(pet_type).contains(&color) => color,
        _ => normalize_color(PetColor::default(), pet_type),
    }
}

/// Spawn one additional pet into the open panel and persist it.
#[tauri::command]
fn spawn_pet(
    app: AppHandle,
    state: State<'_, Arc<AppState>>,
    pet_type: PetType,
    pet_color: Option<PetColor>,
) -> Result<PetSpecification, String> {
    if !panel::panel_is_open(&app) {
        return Err("No pet panel is open".to_string());
    }

    let color = choose_spawn_color(pet_type, pet_color);
    let spec = PetSpecification::new(color, pet_type, state.config.read().pet_size);
    panel::spawn_pet(&app, &spec)?;
    state.push_pet(spec.clone())?;
    Ok(spec)
}

/// Throw a ball for the pets to chase. No-op when no panel is open.
#[tauri::command]
fn throw_ball(app: AppHandle) -> Result<(), String> {
    if panel::panel_is_open(&app) {
        panel::throw_ball(&app)?;
    }
    Ok(())
}

/// Forget all spawned pets, on screen and on disk.
#[tauri::command]
fn delete_pets(app: AppHandle, state: State<'_, Arc<AppState>>) -> Result<(), String> {
    state.clear_pets()?;
    panel::reset_pets(&app)
}

#[tauri::command]
fn get_pet_collection(state: State<'_, Arc<AppState>>) -> Vec<PetSpecification> {
    state.collection_snapshot()
}

/// Color choices for the spawn picker, per species.
#[tauri::command]
fn allowed_pet_colors(pet_type: PetType) -> Vec<PetColor> {
    allowed_colors(pet_type).to_vec()
}

/// Surface an error reported by the webview script as a native dialog.
#[tauri::command]
fn report_alert(app: AppHandle, message: String) {
    tracing::error!(target: "deskpets::webview", "{message}");
    app.dialog()
        .message(message)
        .kind(MessageDialogKind::Error)
        .title("Deskpets")
        .show(|_| {});
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let state = Arc::new(AppState::load());

    let builder = tauri::Builder::default();
    let builder = assets::register_pets_protocol(builder);
    builder
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_dialog::init())
        .plugin(tauri_plugin_window_state::Builder::new().build())
        .plugin(tauri_plugin_single_instance::init(|app, _args, _cwd| {
            // Focus the existing window when another instance is launched
            if let Some(window) = app.get_webview_window("main") {
                let _ = window.unminimize();
                let _ = window.set_focus();
            }
        }))
        .manage(state)
        .setup(|app| {
            let m = menu::build_menu(app)?;
            app.set_menu(m)?;
            app.on_menu_event(|app_handle, event| {
                let _ = app_handle.emit("menu-action", event.id().0.as_str());
            });
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            start_pets,
            spawn_pet,
            throw_ball,
            delete_pets,
            get_pet_collection,
            allowed_pet_colors,
            report_alert,
            config::load_pets_config,
            config::save_pets_config,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
