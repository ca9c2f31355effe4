//! The always-on-top throughput overlay window.
//!
//! A small borderless strip showing "up / down" rates. Left-drag moves it,
//! right-click opens a menu, and hiding sends it to the tray. The overlay
//! also owns the [`Coordinator`], so every exit path funnels through the
//! same ordered teardown.

use std::time::{Duration, Instant};

use crossbeam_channel::Receiver;

use crate::handoff::RateConsumer;
use crate::lifecycle::Coordinator;
use crate::net::rate::RateSample;
use crate::ui::format::format_speed_compact;
use crate::ui::tray::TrayCommand;

/// Overlay size, a strip just tall enough for one text line
pub const WINDOW_SIZE: [f32; 2] = [180.0, 22.0];

/// Default screen position of the overlay
pub const DEFAULT_POSITION: [f32; 2] = [100.0, 100.0];

/// Widget background (light green)
const BACKGROUND: egui::Color32 = egui::Color32::from_rgb(0x90, 0xEE, 0x90);
const TEXT_COLOR: egui::Color32 = egui::Color32::BLACK;
const TEXT_SIZE: f32 = 12.0;

/// How often the always-on-top level is re-asserted
const REPIN_INTERVAL: Duration = Duration::from_secs(1);

/// Fallback frame cadence, so commands and close requests are noticed
/// even when no samples arrive
const IDLE_REPAINT: Duration = Duration::from_millis(250);

pub struct OverlayApp {
    coordinator: Coordinator,
    samples: RateConsumer,
    commands: Receiver<TrayCommand>,
    text: String,
    position: egui::Pos2,
    hidden: bool,
    last_repin: Instant,
}

impl OverlayApp {
    pub fn new(
        coordinator: Coordinator,
        samples: RateConsumer,
        commands: Receiver<TrayCommand>,
        position: egui::Pos2,
    ) -> Self {
        Self {
            coordinator,
            samples,
            commands,
            text: rate_text(0.0, 0.0),
            position,
            hidden: false,
            last_repin: Instant::now(),
        }
    }

    fn apply_sample(&mut self, sample: &RateSample) {
        self.text = rate_text(sample.bytes_per_sec_sent, sample.bytes_per_sec_recv);
    }

    fn hide_to_tray(&mut self, ctx: &egui::Context) {
        self.hidden = true;
        ctx.send_viewport_cmd(egui::ViewportCommand::Visible(false));
        tracing::debug!("overlay hidden to tray");
    }

    fn show_from_tray(&mut self, ctx: &egui::Context) {
        self.hidden = false;
        ctx.send_viewport_cmd(egui::ViewportCommand::Visible(true));
        ctx.send_viewport_cmd(egui::ViewportCommand::OuterPosition(self.position));
        ctx.send_viewport_cmd(egui::ViewportCommand::Focus);
        tracing::debug!(x = self.position.x, y = self.position.y, "overlay restored");
    }

    /// Run the overlay's half of the teardown, then ask the window system
    /// to destroy the window. Safe to call on every frame once shutdown
    /// has started.
    fn request_exit(&mut self, ctx: &egui::Context) {
        if self.coordinator.begin() {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }

    fn draw(&mut self, ctx: &egui::Context) -> (bool, bool) {
        let mut hide = false;
        let mut exit = false;

        let frame = egui::Frame::none()
            .fill(BACKGROUND)
            .inner_margin(egui::Margin::symmetric(4.0, 2.0));

        egui::CentralPanel::default().frame(frame).show(ctx, |ui| {
            let response = ui.interact(
                ui.max_rect(),
                egui::Id::new("overlay-surface"),
                egui::Sense::click_and_drag(),
            );

            // Borderless window, so dragging the surface moves it.
            if response.drag_started_by(egui::PointerButton::Primary) {
                ctx.send_viewport_cmd(egui::ViewportCommand::StartDrag);
            }

            response.context_menu(|ui| {
                if ui.button("Hide to Tray").clicked() {
                    hide = true;
                    ui.close_menu();
                }
                ui.separator();
                if ui.button("Exit").clicked() {
                    exit = true;
                    ui.close_menu();
                }
            });

            ui.horizontal_centered(|ui| {
                ui.label(
                    egui::RichText::new(self.text.as_str())
                        .color(TEXT_COLOR)
                        .size(TEXT_SIZE),
                );
            });
        });

        (hide, exit)
    }
}

impl eframe::App for OverlayApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Once the flag is flipped (Ctrl+C, or a second frame after an
        // exit command) there is no more UI work, only finishing the close.
        if self.coordinator.lifecycle().is_shutting_down() {
            self.request_exit(ctx);
            return;
        }

        // The window has no titlebar, but the window manager can still ask
        // it to close; treat that as exit.
        if ctx.input(|i| i.viewport().close_requested()) {
            self.request_exit(ctx);
            return;
        }

        let mut show = false;
        let mut exit = false;
        while let Ok(command) = self.commands.try_recv() {
            match command {
                TrayCommand::ShowWindow => show = true,
                TrayCommand::Exit => exit = true,
            }
        }
        if exit {
            self.request_exit(ctx);
            return;
        }

        // Everything queued is drained, only the newest is rendered.
        if let Some(sample) = self.samples.latest() {
            self.apply_sample(&sample);
        }

        if show {
            self.show_from_tray(ctx);
        }

        if !self.hidden {
            // Remember where the user dragged the window, for restores.
            if let Some(rect) = ctx.input(|i| i.viewport().outer_rect) {
                self.position = rect.min;
            }

            if self.last_repin.elapsed() >= REPIN_INTERVAL {
                self.last_repin = Instant::now();
                ctx.send_viewport_cmd(egui::ViewportCommand::WindowLevel(
                    egui::WindowLevel::AlwaysOnTop,
                ));
            }
        }

        let (hide, exit) = self.draw(ctx);
        if hide {
            self.hide_to_tray(ctx);
        }
        if exit {
            self.request_exit(ctx);
            return;
        }

        ctx.request_repaint_after(IDLE_REPAINT);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        // The window is gone at this point; joins the sampler and releases
        // the remaining handles.
        self.coordinator.finish();
        tracing::info!("overlay closed");
    }
}

fn rate_text(sent_bps: f64, recv_bps: f64) -> String {
    format!(
        "↑ {}   ↓ {}",
        format_speed_compact(sent_bps),
        format_speed_compact(recv_bps)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handoff::rate_channel;
    use crate::lifecycle::Lifecycle;
    use std::time::Instant;

    fn overlay() -> OverlayApp {
        let lifecycle = Lifecycle::new();
        let (_sample_tx, sample_rx) = rate_channel(4);
        let (_command_tx, command_rx) = crossbeam_channel::bounded(4);
        let coordinator = Coordinator::new(
            lifecycle,
            sample_rx.clone(),
            None,
            None,
            Duration::from_secs(1),
        );
        OverlayApp::new(
            coordinator,
            sample_rx,
            command_rx,
            egui::pos2(DEFAULT_POSITION[0], DEFAULT_POSITION[1]),
        )
    }

    #[test]
    fn test_initial_text_is_zero_rates() {
        let app = overlay();
        assert_eq!(app.text, "↑ 0.0 KB/s   ↓ 0.0 KB/s");
    }

    #[test]
    fn test_sample_updates_text() {
        let mut app = overlay();
        app.apply_sample(&RateSample {
            bytes_per_sec_sent: 2048.0,
            bytes_per_sec_recv: 1_048_576.0,
            taken_at: Instant::now(),
        });
        assert_eq!(app.text, "↑ 2.0 KB/s   ↓ 1.0 MB/s");
    }
}
