//! Custom egui widgets for the overlay

use egui::{Color32, Painter, Pos2, Rect, RichText, Rounding, Stroke, Vec2};

use crate::overlay::selection::RegionSelector;
use crate::shared::{AppState, PanelAction, Region, RESULT_PLACEHOLDER};

/// Style configuration for the result panel
#[derive(Debug, Clone)]
pub struct PanelStyle {
    /// Background color (RGBA)
    pub background: [f32; 4],
    /// Text color (RGBA)
    pub text_color: [f32; 4],
    /// Border radius
    pub corner_radius: f32,
    /// Padding
    pub padding: f32,
    /// Panel width in logical pixels
    pub width: f32,
    /// Multiplier applied to background alpha
    pub opacity: f32,
}

impl Default for PanelStyle {
    fn default() -> Self {
        Self {
            background: [0.1, 0.1, 0.1, 0.85],
            text_color: [1.0, 1.0, 1.0, 1.0],
            corner_radius: 8.0,
            padding: 12.0,
            width: 300.0,
            opacity: 0.95,
        }
    }
}

/// Style for the marquee and the dimmed overlay behind it
#[derive(Debug, Clone)]
pub struct MarqueeStyle {
    /// Shade over the whole monitor while selecting
    pub dim: [f32; 4],
    pub fill: [f32; 4],
    pub border: [f32; 4],
    pub border_width: f32,
}

impl Default for MarqueeStyle {
    fn default() -> Self {
        Self {
            dim: [0.0, 0.0, 0.0, 0.25],
            fill: [0.2, 0.5, 1.0, 0.12],
            border: [0.3, 0.6, 1.0, 1.0],
            border_width: 2.0,
        }
    }
}

/// Convert an RGBA float color, scaling alpha by `opacity`
pub fn to_color32(rgba: [f32; 4], opacity: f32) -> Color32 {
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_rgba_unmultiplied(
        channel(rgba[0]),
        channel(rgba[1]),
        channel(rgba[2]),
        channel(rgba[3] * opacity),
    )
}

pub fn region_rect(region: &Region) -> Rect {
    Rect::from_min_size(
        Pos2::new(region.x, region.y),
        Vec2::new(region.width, region.height),
    )
}

/// Header text describing the current selection
pub fn selection_label(region: Option<Region>) -> String {
    match region {
        Some(r) if r.is_usable() => format!("{:.0} × {:.0}", r.width, r.height),
        Some(_) => "selection too small".to_string(),
        None => "no selection".to_string(),
    }
}

/// Dim the screen while selecting and outline the current region
pub fn paint_selection(painter: &Painter, screen: Rect, selector: &RegionSelector, style: &MarqueeStyle) {
    if selector.captures_input() {
        painter.rect_filled(screen, Rounding::ZERO, to_color32(style.dim, 1.0));
    }

    if let Some(region) = selector.region() {
        let rect = region_rect(&region);
        painter.rect_filled(rect, Rounding::ZERO, to_color32(style.fill, 1.0));
        painter.rect_stroke(
            rect,
            Rounding::ZERO,
            Stroke::new(style.border_width, to_color32(style.border, 1.0)),
        );
    }
}

/// Draw the floating result panel and collect the actions it raised
pub fn render_panel(ctx: &egui::Context, state: &mut AppState, style: &PanelStyle) -> Vec<PanelAction> {
    let mut actions = Vec::new();
    let text_color = to_color32(style.text_color, 1.0);

    let frame = egui::Frame::none()
        .fill(to_color32(style.background, style.opacity))
        .rounding(Rounding::same(style.corner_radius))
        .inner_margin(style.padding);

    egui::Window::new("Marquee OCR")
        .id(egui::Id::new("result_panel"))
        .title_bar(false)
        .resizable(false)
        .collapsible(false)
        .movable(true)
        .frame(frame)
        .default_pos(Pos2::new(40.0, 40.0))
        .default_width(style.width)
        .show(ctx, |ui| {
            ui.set_width(style.width);
            ui.horizontal(|ui| {
                ui.label(RichText::new("Marquee OCR").strong().color(text_color));
                ui.label(RichText::new(selection_label(state.selector.region())).weak());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.small_button("✕").on_hover_text("Turn off").clicked() {
                        actions.push(PanelAction::Disable);
                    }
                    if state.panel.is_busy() {
                        ui.spinner();
                    }
                });
            });
            ui.separator();

            ui.horizontal(|ui| {
                if ui
                    .selectable_label(state.selector.captures_input(), "✛ Draw")
                    .on_hover_text("Draw a selection (Esc to cancel)")
                    .clicked()
                {
                    actions.push(PanelAction::ToggleSelection);
                }
                if ui
                    .add_enabled(state.selector.region().is_some(), egui::Button::new("⎼ Erase"))
                    .clicked()
                {
                    actions.push(PanelAction::ClearSelection);
                }
                if ui.button("Extract").clicked() {
                    actions.push(PanelAction::RunExtraction);
                }
            });

            ui.horizontal(|ui| {
                let hint = if state.settings.credential.is_empty() {
                    "Gemini API key"
                } else {
                    "API key saved"
                };
                let field = ui.add(
                    egui::TextEdit::singleline(&mut state.panel.credential_draft)
                        .password(true)
                        .hint_text(hint)
                        .desired_width(style.width - 70.0),
                );
                let submitted = field.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                let can_save = !state.panel.credential_draft.trim().is_empty();
                if (ui.add_enabled(can_save, egui::Button::new("Save")).clicked() || submitted) && can_save {
                    actions.push(PanelAction::SaveCredential(state.panel.credential_draft.clone()));
                }
            });

            ui.add_space(4.0);
            egui::ScrollArea::vertical().max_height(240.0).show(ui, |ui| {
                // Read-only but still selectable for copying
                let mut text = state.panel.text.as_str();
                ui.add(
                    egui::TextEdit::multiline(&mut text)
                        .hint_text(RESULT_PLACEHOLDER)
                        .text_color(text_color)
                        .desired_rows(6)
                        .desired_width(f32::INFINITY),
                );
            });
        });

    actions
}
