use tauri::menu::{MenuBuilder, MenuItemBuilder, PredefinedMenuItem, SubmenuBuilder};
use tauri::{App, Wry};

/// Build the native system menu bar.
///
/// Custom items use string IDs (e.g. "start-pets") that are emitted to the
/// frontend via `app.emit("menu-action", id)` so the JS side can dispatch to
/// the same handlers used by the invoke commands.
pub fn build_menu(app: &App) -> Result<tauri::menu::Menu<Wry>, tauri::Error> {
    let is_macos = cfg!(target_os = "macos");

    macro_rules! item {
        ($id:expr, $label:expr, $accel:expr) => {
            MenuItemBuilder::with_id($id, $label)
                .accelerator($accel)
                .build(app)?
        };
        ($id:expr, $label:expr) => {
            MenuItemBuilder::with_id($id, $label).build(app)?
        };
    }

    // ---------- File ----------
    let mut file = SubmenuBuilder::new(app, "&File");
    file = file.item(&item!("settings", "Settings", "CmdOrCtrl+,"));
    if !is_macos {
        // On Windows/Linux, Quit lives in File menu
        file = file
            .separator()
            .item(&PredefinedMenuItem::quit(app, None)?);
    }
    let file = file.build()?;

    // ---------- Pets ----------
    let pets = SubmenuBuilder::new(app, "&Pets")
        .item(&item!(
            "start-pets",
            "Start Pet Session",
            "CmdOrCtrl+Shift+P"
        ))
        .item(&item!(
            "spawn-pet",
            "Spawn Additional Pet",
            "CmdOrCtrl+Shift+A"
        ))
        .separator()
        .item(&item!("throw-ball", "Throw Ball", "CmdOrCtrl+Shift+B"))
        .separator()
        .item(&item!("delete-pets", "Remove All Pets"))
        .build()?;

    // ---------- Help ----------
    let help = SubmenuBuilder::new(app, "&Help")
        .item(&item!("about", "About Deskpets"))
        .build()?;

    // ---------- Assemble ----------
    let mut menu = MenuBuilder::new(app);

    if is_macos {
        // macOS: App menu with standard items
        let app_menu = SubmenuBuilder::new(app, "Deskpets")
            .item(&PredefinedMenuItem::about(app, Some("About Deskpets"), None)?)
            .separator()
            .item(&PredefinedMenuItem::services(app, None)?)
            .separator()
            .item(&PredefinedMenuItem::hide(app, None)?)
            .item(&PredefinedMenuItem::hide_others(app, None)?)
            .item(&PredefinedMenuItem::show_all(app, None)?)
            .separator()
            .item(&PredefinedMenuItem::quit(app, None)?)
            .build()?;
        menu = menu.item(&app_menu);
    }

    let menu = menu.item(&file).item(&pets).item(&help).build()?;

    Ok(menu)
}
