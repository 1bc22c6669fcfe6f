//! Overlay Presentation Layer
//!
//! A transparent egui_overlay window covering one monitor. It stays
//! click-through until the selector is armed or the pointer is over the
//! panel or the marquee, so the desktop underneath keeps working.

pub mod panel;
pub mod selection;
pub mod widgets;

use anyhow::Result;
use egui::{CursorIcon, LayerId, Pos2};
use egui_overlay::{egui_render_three_d::ThreeDBackend, egui_window_glfw_passthrough::GlfwBackend, EguiOverlay};
use std::time::Duration;
use tracing::{debug, info};

use crate::capture::MonitorInfo;
use crate::config::OverlaySettings;
use crate::hotkey::{HotkeyAction, HotkeyManager};
use crate::overlay::panel::PanelController;
use crate::overlay::selection::{CursorHint, PressTarget, SelectorMode};
use crate::overlay::widgets::{MarqueeStyle, PanelStyle};
use crate::shared::{AppState, Point};

/// Overlay window manager
pub struct OverlayManager {
    app: OverlayApp,
}

impl OverlayManager {
    pub fn new(
        state: AppState,
        controller: PanelController,
        hotkeys: Option<HotkeyManager>,
        monitor: Option<MonitorInfo>,
        settings: &OverlaySettings,
    ) -> Self {
        let panel_style = PanelStyle {
            width: settings.panel_width,
            opacity: settings.opacity.clamp(0.0, 1.0),
            ..PanelStyle::default()
        };
        Self {
            app: OverlayApp {
                state,
                controller,
                hotkeys,
                monitor,
                positioned: false,
                panel_style,
                marquee_style: MarqueeStyle::default(),
            },
        }
    }

    /// Run the overlay event loop (blocking)
    /// This should be called from the main thread
    pub fn run(self) -> Result<()> {
        info!("Starting overlay...");
        egui_overlay::start(self.app);
        Ok(())
    }
}

/// The egui overlay application
struct OverlayApp {
    state: AppState,
    controller: PanelController,
    hotkeys: Option<HotkeyManager>,
    monitor: Option<MonitorInfo>,
    positioned: bool,
    panel_style: PanelStyle,
    marquee_style: MarqueeStyle,
}

impl OverlayApp {
    /// Cover the target monitor once the window exists
    fn position_window(&mut self, glfw_backend: &mut GlfwBackend) {
        if self.positioned {
            return;
        }
        self.positioned = true;
        if let Some(monitor) = &self.monitor {
            let (width, height) = monitor.logical_size();
            glfw_backend.window.set_pos(monitor.position.0, monitor.position.1);
            glfw_backend.set_window_size([width, height]);
            info!(
                "Overlay covering monitor {} ({}) at {:?}, {}x{} logical",
                monitor.index, monitor.name, monitor.position, width, height
            );
        }
    }

    fn handle_hotkeys(&mut self) {
        let Some(hotkeys) = &self.hotkeys else {
            return;
        };
        for action in hotkeys.poll_events() {
            debug!("Hotkey: {:?}", action);
            match action {
                HotkeyAction::TogglePanel => self.controller.toggle_panel(&self.state),
                HotkeyAction::ToggleSelection if self.state.panel.visible => {
                    self.controller.toggle_selection(&mut self.state)
                }
                HotkeyAction::ToggleSelection => {}
            }
        }
    }

    /// Feed this frame's pointer and keyboard input to the selector
    fn route_input(&mut self, ctx: &egui::Context) {
        let (pressed, released, pos, escape) = ctx.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.latest_pos(),
                i.key_pressed(egui::Key::Escape),
            )
        });
        let selector = &mut self.state.selector;

        if escape && matches!(selector.mode(), SelectorMode::Armed | SelectorMode::Drawing { .. }) {
            selector.exit();
            return;
        }

        let Some(pos) = pos.map(to_point) else {
            return;
        };

        if pressed {
            let target = if ctx.is_pointer_over_area() {
                PressTarget::Panel
            } else if selector.region().is_some_and(|r| r.contains(pos)) {
                PressTarget::Marquee
            } else {
                PressTarget::Surface
            };
            selector.pointer_pressed(pos, target);
        }

        selector.pointer_moved(pos);

        if released {
            selector.pointer_released(pos);
        }
    }

    fn pointer_over_marquee(&self, ctx: &egui::Context) -> bool {
        let pos = ctx.input(|i| i.pointer.latest_pos());
        match (pos, self.state.selector.region()) {
            (Some(pos), Some(region)) => region.contains(to_point(pos)),
            _ => false,
        }
    }

    fn update_cursor(&self, ctx: &egui::Context, over_marquee: bool) {
        let icon = match self.state.selector.cursor_hint() {
            CursorHint::Crosshair => CursorIcon::Crosshair,
            CursorHint::Grab => CursorIcon::Grabbing,
            CursorHint::Default if over_marquee && !ctx.is_pointer_over_area() => CursorIcon::Grab,
            CursorHint::Default => return,
        };
        ctx.set_cursor_icon(icon);
    }
}

impl EguiOverlay for OverlayApp {
    fn gui_run(
        &mut self,
        egui_ctx: &egui::Context,
        _default_gfx_backend: &mut ThreeDBackend,
        glfw_backend: &mut GlfwBackend,
    ) {
        self.position_window(glfw_backend);

        self.controller.poll_settings(&mut self.state);
        self.handle_hotkeys();
        self.controller.poll_settled(&mut self.state);

        if !self.state.panel.visible {
            glfw_backend.set_passthrough(true);
            egui_ctx.request_repaint_after(Duration::from_millis(100));
            return;
        }

        self.route_input(egui_ctx);

        let painter = egui_ctx.layer_painter(LayerId::background());
        widgets::paint_selection(
            &painter,
            egui_ctx.screen_rect(),
            &self.state.selector,
            &self.marquee_style,
        );

        let actions = widgets::render_panel(egui_ctx, &mut self.state, &self.panel_style);
        for action in actions {
            self.controller.handle_action(&mut self.state, action);
        }

        let over_marquee = self.pointer_over_marquee(egui_ctx);
        self.update_cursor(egui_ctx, over_marquee);

        let interactive = self.state.selector.captures_input()
            || over_marquee
            || egui_ctx.is_pointer_over_area()
            || egui_ctx.wants_pointer_input()
            || egui_ctx.wants_keyboard_input();
        glfw_backend.set_passthrough(!interactive);

        let repaint = if self.state.selector.captures_input() || self.state.panel.is_busy() {
            Duration::from_millis(16)
        } else {
            Duration::from_millis(100)
        };
        egui_ctx.request_repaint_after(repaint);
    }
}

fn to_point(pos: Pos2) -> Point {
    Point::new(pos.x, pos.y)
}
