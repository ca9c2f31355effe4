//! Application wiring: runtime options, channels, background tasks, and
//! the UI event loop.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use crossbeam_channel::bounded;

use crate::handoff::{rate_channel, DEFAULT_CAPACITY};
use crate::lifecycle::{Coordinator, Lifecycle};
use crate::net::counters::NetCounters;
use crate::net::sampler::Sampler;
use crate::ui::overlay::{self, OverlayApp};
use crate::ui::tray::{self, TrayCommand};

/// Window-system application name and title
const APP_NAME: &str = "Network Monitor";

/// Depth of the tray -> overlay command queue
const COMMAND_CAPACITY: usize = 8;

/// Shortest accepted poll interval
const MIN_TICK_MS: u64 = 100;

/// Runtime options, defaults matching the stock widget.
#[derive(Debug, Clone, PartialEq)]
pub struct AppOptions {
    /// Interval between network counter polls
    pub tick_interval: Duration,
    /// Initial overlay position in screen coordinates
    pub position: (f32, f32),
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            tick_interval: crate::DEFAULT_TICK_INTERVAL,
            position: (overlay::DEFAULT_POSITION[0], overlay::DEFAULT_POSITION[1]),
        }
    }
}

impl AppOptions {
    /// Parse an `--interval` value in milliseconds.
    pub fn set_interval_ms(&mut self, raw: &str) -> Result<()> {
        let ms: u64 = raw
            .parse()
            .map_err(|_| anyhow!("invalid interval '{raw}', expected milliseconds"))?;
        if ms < MIN_TICK_MS {
            return Err(anyhow!("interval must be at least {MIN_TICK_MS} ms"));
        }
        self.tick_interval = Duration::from_millis(ms);
        Ok(())
    }

    /// Parse a `--position` value of the form `X,Y`.
    pub fn set_position(&mut self, raw: &str) -> Result<()> {
        let (x, y) = raw
            .split_once(',')
            .ok_or_else(|| anyhow!("invalid position '{raw}', expected X,Y"))?;
        let x: f32 = x
            .trim()
            .parse()
            .map_err(|_| anyhow!("invalid position x in '{raw}'"))?;
        let y: f32 = y
            .trim()
            .parse()
            .map_err(|_| anyhow!("invalid position y in '{raw}'"))?;
        self.position = (x, y);
        Ok(())
    }
}

fn native_options(options: &AppOptions) -> eframe::NativeOptions {
    let viewport = egui::ViewportBuilder::default()
        .with_title(APP_NAME)
        .with_inner_size(overlay::WINDOW_SIZE)
        .with_position(egui::pos2(options.position.0, options.position.1))
        .with_decorations(false)
        .with_resizable(false)
        .with_always_on_top()
        .with_taskbar(false);

    eframe::NativeOptions {
        viewport,
        centered: false,
        persist_window: false,
        ..Default::default()
    }
}

/// Build every execution context and run the UI event loop to completion.
///
/// Returns once the overlay has closed and the teardown has finished, so
/// the caller can simply exit.
pub fn run(options: AppOptions) -> Result<()> {
    tracing::info!(version = crate::VERSION, "starting network monitor");

    let lifecycle = Lifecycle::new();
    let (ui_tx, ui_rx) = rate_channel(DEFAULT_CAPACITY);
    let (tray_tx, tray_rx) = rate_channel(DEFAULT_CAPACITY);
    let (command_tx, command_rx) = bounded::<TrayCommand>(COMMAND_CAPACITY);

    let native = native_options(&options);
    let position = egui::pos2(options.position.0, options.position.1);
    let tick = options.tick_interval;

    eframe::run_native(
        APP_NAME,
        native,
        Box::new(move |cc| {
            let ctx = cc.egui_ctx.clone();

            // Ctrl+C flips the flag and nudges the UI; the overlay owns
            // the ordered teardown, and the exit code stays zero.
            {
                let lifecycle = Arc::clone(&lifecycle);
                let ctx = ctx.clone();
                if let Err(e) = ctrlc::set_handler(move || {
                    tracing::info!("interrupt received");
                    lifecycle.request_shutdown();
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    ctx.request_repaint();
                }) {
                    tracing::warn!(error = %e, "could not install Ctrl+C handler");
                }
            }

            let wake_ctx = ctx.clone();
            let sampler = Sampler::new(NetCounters::new(), tick, vec![ui_tx, tray_tx])
                .spawn(Arc::clone(&lifecycle), move || wake_ctx.request_repaint())
                .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;

            // A tray that cannot even spawn leaves the app window-only,
            // same as a tray that fails to build.
            let tray = match tray::spawn(Arc::clone(&lifecycle), tray_rx, command_tx, ctx) {
                Ok(handle) => Some(handle),
                Err(e) => {
                    tracing::warn!(error = %e, "could not start tray task, running window-only");
                    None
                }
            };

            let coordinator = Coordinator::new(
                lifecycle,
                ui_rx.clone(),
                tray,
                Some(sampler),
                crate::JOIN_TIMEOUT,
            );
            Ok(Box::new(OverlayApp::new(
                coordinator,
                ui_rx,
                command_rx,
                position,
            )))
        }),
    )
    .map_err(|e| anyhow!("window system failure: {e}"))?;

    tracing::info!("network monitor exited");
    Ok(())
}
