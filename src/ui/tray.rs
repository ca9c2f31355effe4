//! System tray icon and menu.
//!
//! The tray runs on its own thread because [`TrayIcon`] is not `Send`:
//! the thread builds the icon, pumps the platform message queue, turns
//! menu and click events into [`TrayCommand`]s for the overlay, and
//! refreshes the tooltip from its own sample feed.

use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::Sender;
use thiserror::Error;
use tray_icon::menu::{Menu, MenuEvent, MenuId, MenuItem};
use tray_icon::{Icon, MouseButton, MouseButtonState, TrayIcon, TrayIconBuilder, TrayIconEvent};

use crate::handoff::RateConsumer;
use crate::lifecycle::{Lifecycle, TaskHandle};
use crate::net::rate::RateSample;
use crate::ui::format::tray_tooltip;

/// Icon bitmap edge length in pixels
pub const ICON_SIZE: u32 = 32;

/// Light green, same as the overlay background
const ICON_GREEN: (u8, u8, u8) = (0x90, 0xEE, 0x90);

/// Tooltip before the first sample arrives
const IDLE_TOOLTIP: &str = "Network Traffic Monitor";

/// How often the tray loop pumps events and polls its feeds
const POLL: Duration = Duration::from_millis(100);

/// Commands the tray issues to the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayCommand {
    /// Restore the overlay window at its remembered position
    ShowWindow,
    /// Tear everything down and exit
    Exit,
}

/// Errors that can occur with tray operations
#[derive(Error, Debug)]
pub enum TrayError {
    #[error("Failed to create tray icon: {0}")]
    CreationFailed(String),

    #[error("Failed to update tray icon: {0}")]
    UpdateFailed(String),
}

/// Render the tray bitmap: a filled light-green circle with a black plus
/// sign, transparent outside the circle.
pub fn icon_rgba() -> Vec<u8> {
    let mut rgba = vec![0u8; (ICON_SIZE * ICON_SIZE * 4) as usize];
    let (r, g, b) = ICON_GREEN;

    let center = (ICON_SIZE as f32 - 1.0) / 2.0;
    let radius = center;
    for y in 0..ICON_SIZE {
        for x in 0..ICON_SIZE {
            let dx = x as f32 - center;
            let dy = y as f32 - center;
            if dx * dx + dy * dy <= radius * radius {
                let i = ((y * ICON_SIZE + x) * 4) as usize;
                rgba[i] = r;
                rgba[i + 1] = g;
                rgba[i + 2] = b;
                rgba[i + 3] = 255;
            }
        }
    }

    // Plus sign, both bars 5px wide
    fill_rect(&mut rgba, (6, 14), (26, 18), (0, 0, 0));
    fill_rect(&mut rgba, (14, 6), (18, 26), (0, 0, 0));
    rgba
}

fn fill_rect(rgba: &mut [u8], min: (u32, u32), max: (u32, u32), color: (u8, u8, u8)) {
    for y in min.1..=max.1 {
        for x in min.0..=max.0 {
            let i = ((y * ICON_SIZE + x) * 4) as usize;
            rgba[i] = color.0;
            rgba[i + 1] = color.1;
            rgba[i + 2] = color.2;
            rgba[i + 3] = 255;
        }
    }
}

/// Menu item ids mapped to commands, built once next to the menu itself.
struct MenuDispatch {
    entries: Vec<(MenuId, TrayCommand)>,
}

impl MenuDispatch {
    fn lookup(&self, id: &MenuId) -> Option<TrayCommand> {
        self.entries
            .iter()
            .find(|(entry_id, _)| entry_id == id)
            .map(|(_, command)| *command)
    }
}

fn build_tray() -> Result<(TrayIcon, MenuDispatch), TrayError> {
    let show = MenuItem::new("Show", true, None);
    let exit = MenuItem::new("Exit", true, None);

    let menu = Menu::new();
    menu.append_items(&[&show, &exit])
        .map_err(|e| TrayError::CreationFailed(e.to_string()))?;

    let dispatch = MenuDispatch {
        entries: vec![
            (show.id().clone(), TrayCommand::ShowWindow),
            (exit.id().clone(), TrayCommand::Exit),
        ],
    };

    let icon = Icon::from_rgba(icon_rgba(), ICON_SIZE, ICON_SIZE)
        .map_err(|e| TrayError::CreationFailed(e.to_string()))?;

    let tray = TrayIconBuilder::new()
        .with_icon(icon)
        .with_tooltip(IDLE_TOOLTIP)
        .with_menu(Box::new(menu))
        .build()
        .map_err(|e| TrayError::CreationFailed(e.to_string()))?;

    Ok((tray, dispatch))
}

fn refresh_tooltip(tray: &TrayIcon, sample: &RateSample) -> Result<(), TrayError> {
    tray.set_tooltip(Some(tray_tooltip(sample)))
        .map_err(|e| TrayError::UpdateFailed(e.to_string()))
}

/// Spawn the tray subsystem on its own thread.
///
/// If the platform refuses a tray icon (headless session, no status
/// area), the task logs a warning and returns, leaving the overlay
/// running window-only.
pub fn spawn(
    lifecycle: Arc<Lifecycle>,
    samples: RateConsumer,
    commands: Sender<TrayCommand>,
    ui_ctx: egui::Context,
) -> std::io::Result<TaskHandle> {
    TaskHandle::spawn("tray", move || run(&lifecycle, samples, commands, ui_ctx))
}

fn run(
    lifecycle: &Lifecycle,
    samples: RateConsumer,
    commands: Sender<TrayCommand>,
    ui_ctx: egui::Context,
) {
    let (tray, dispatch) = match build_tray() {
        Ok(built) => built,
        Err(e) => {
            tracing::warn!(error = %e, "tray unavailable, running window-only");
            return;
        }
    };
    tracing::info!("tray icon ready");

    let menu_events = MenuEvent::receiver();
    let icon_events = TrayIconEvent::receiver();

    while lifecycle.is_running() {
        pump_platform_events();

        while let Ok(event) = menu_events.try_recv() {
            if let Some(command) = dispatch.lookup(event.id()) {
                forward(&commands, command, &ui_ctx);
            }
        }

        while let Ok(event) = icon_events.try_recv() {
            // Left click on the icon restores the window, same as Show.
            if let TrayIconEvent::Click {
                button: MouseButton::Left,
                button_state: MouseButtonState::Up,
                ..
            } = event
            {
                forward(&commands, TrayCommand::ShowWindow, &ui_ctx);
            }
        }

        if let Some(sample) = samples.latest() {
            if let Err(e) = refresh_tooltip(&tray, &sample) {
                tracing::debug!(error = %e, "tooltip refresh failed");
            }
        }

        std::thread::sleep(POLL);
    }

    drop(tray);
    tracing::info!("tray stopped");
}

fn forward(commands: &Sender<TrayCommand>, command: TrayCommand, ui_ctx: &egui::Context) {
    tracing::debug!(?command, "tray command");
    if command == TrayCommand::ShowWindow {
        // Restore directly as well: a hidden window may not be rendering
        // frames, and the viewport command queue survives until it does.
        ui_ctx.send_viewport_cmd(egui::ViewportCommand::Visible(true));
        ui_ctx.send_viewport_cmd(egui::ViewportCommand::Focus);
    }
    let _ = commands.try_send(command);
    ui_ctx.request_repaint();
}

/// Deliver queued Win32 messages so the tray's hidden event window (which
/// lives on this thread) sees its clicks.
#[cfg(windows)]
fn pump_platform_events() {
    use windows::Win32::Foundation::HWND;
    use windows::Win32::UI::WindowsAndMessaging::{
        DispatchMessageW, PeekMessageW, TranslateMessage, MSG, PM_REMOVE,
    };

    unsafe {
        let mut msg = MSG::default();
        while PeekMessageW(&mut msg, HWND::default(), 0, 0, PM_REMOVE).as_bool() {
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }
}

/// Other platforms deliver tray events through the crate's own channels.
#[cfg(not(windows))]
fn pump_platform_events() {}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(rgba: &[u8], x: u32, y: u32) -> (u8, u8, u8, u8) {
        let i = ((y * ICON_SIZE + x) * 4) as usize;
        (rgba[i], rgba[i + 1], rgba[i + 2], rgba[i + 3])
    }

    #[test]
    fn test_icon_corners_transparent() {
        let rgba = icon_rgba();
        for (x, y) in [(0, 0), (31, 0), (0, 31), (31, 31)] {
            assert_eq!(pixel(&rgba, x, y).3, 0, "corner ({x},{y}) inside circle");
        }
    }

    #[test]
    fn test_icon_plus_sign_is_black() {
        let rgba = icon_rgba();
        assert_eq!(pixel(&rgba, 16, 16), (0, 0, 0, 255));
        assert_eq!(pixel(&rgba, 8, 16), (0, 0, 0, 255));
        assert_eq!(pixel(&rgba, 16, 8), (0, 0, 0, 255));
    }

    #[test]
    fn test_icon_circle_is_green() {
        let rgba = icon_rgba();
        let (r, g, b) = ICON_GREEN;
        assert_eq!(pixel(&rgba, 5, 16), (r, g, b, 255));
        assert_eq!(pixel(&rgba, 16, 3), (r, g, b, 255));
    }
}
