//! Usage: Application menu (macOS only: Quit + standard Edit shortcuts; no menu elsewhere).

#[cfg(target_os = "macos")]
const MENU_QUIT_ID: &str = "app.quit";
#[cfg(target_os = "macos")]
static QUIT_HANDLER_REGISTERED: std::sync::atomic::AtomicBool =
    std::sync::atomic::AtomicBool::new(false);

#[cfg(target_os = "macos")]
pub(crate) fn install_application_menu(app: &tauri::AppHandle) -> Result<(), String> {
    use tauri::menu::{Menu, MenuItem, PredefinedMenuItem, Submenu};

    let quit_item = MenuItem::with_id(app, MENU_QUIT_ID, "Quit", true, Some("Command+Q"))
        .map_err(|e| format!("failed to create quit menu item: {e}"))?;
    let app_submenu = Submenu::with_items(app, &app.package_info().name, true, &[&quit_item])
        .map_err(|e| format!("failed to create app submenu: {e}"))?;

    let edit_submenu = Submenu::with_items(
        app,
        "Edit",
        true,
        &[
            &PredefinedMenuItem::undo(app, Some("Undo"))
                .map_err(|e| format!("failed to create undo menu item: {e}"))?,
            &PredefinedMenuItem::redo(app, Some("Redo"))
                .map_err(|e| format!("failed to create redo menu item: {e}"))?,
            &PredefinedMenuItem::separator(app)
                .map_err(|e| format!("failed to create menu separator: {e}"))?,
            &PredefinedMenuItem::cut(app, Some("Cut"))
                .map_err(|e| format!("failed to create cut menu item: {e}"))?,
            &PredefinedMenuItem::copy(app, Some("Copy"))
                .map_err(|e| format!("failed to create copy menu item: {e}"))?,
            &PredefinedMenuItem::paste(app, Some("Paste"))
                .map_err(|e| format!("failed to create paste menu item: {e}"))?,
            &PredefinedMenuItem::select_all(app, Some("Select All"))
                .map_err(|e| format!("failed to create select-all menu item: {e}"))?,
        ],
    )
    .map_err(|e| format!("failed to create edit submenu: {e}"))?;

    let menu = Menu::with_items(app, &[&app_submenu, &edit_submenu])
        .map_err(|e| format!("failed to create application menu: {e}"))?;

    // The menu is rebuilt whenever the main window is recreated; the handler is app-wide.
    if !QUIT_HANDLER_REGISTERED.swap(true, std::sync::atomic::Ordering::SeqCst) {
        app.on_menu_event(|app, event| {
            if event.id == MENU_QUIT_ID {
                tracing::info!("quit requested from application menu");
                app.exit(0);
            }
        });
    }

    app.set_menu(menu)
        .map_err(|e| format!("failed to set application menu: {e}"))?;
    Ok(())
}

#[cfg(not(target_os = "macos"))]
pub(crate) fn install_application_menu(app: &tauri::AppHandle) -> Result<(), String> {
    app.remove_menu()
        .map_err(|e| format!("failed to remove application menu: {e}"))?;
    Ok(())
}
