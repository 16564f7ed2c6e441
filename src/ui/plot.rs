use eframe::egui::{
    self, epaint::TextShape, Align2, Color32, FontId, Pos2, RichText, Sense, Stroke, Ui, Vec2,
};

use crate::chart::axes::{AxisDescriptor, Orientation};
use crate::chart::{LabelRole, PlotModel};
use crate::state::AppState;

const TICK_LEN: f32 = 6.0;
const FADE_IN_SECS: f32 = 0.2;
const FADE_OUT_SECS: f32 = 0.5;

// ---------------------------------------------------------------------------
// Scatter plot (central panel)
// ---------------------------------------------------------------------------

/// Render the scatter plot in the central panel and track hover.
pub fn scatter_plot(ui: &mut Ui, state: &mut AppState) {
    if state.loading && state.plot.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.spinner();
        });
        return;
    }

    let Some(plot) = &state.plot else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to view the scatter plot  (File → Open…)");
        });
        return;
    };

    let canvas = plot.canvas;
    let size = Vec2::new(canvas.width as f32, canvas.height as f32);

    let mut pointer = None;
    egui::ScrollArea::both()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            let (response, painter) = ui.allocate_painter(size, Sense::hover());
            let origin = response.rect.min;
            let to_screen = |x: f64, y: f64| origin + Vec2::new(x as f32, y as f32);

            painter.rect_filled(response.rect, 0.0, ui.visuals().extreme_bg_color);

            let text_color = ui.visuals().text_color();
            if let Some(axes) = &plot.axes {
                draw_axis(&painter, &axes.x_axis, text_color, &to_screen);
                draw_axis(&painter, &axes.y_axis, text_color, &to_screen);
            }

            for (i, point) in plot.points.iter().enumerate() {
                let fill = if state.hovered == Some(i) {
                    state.palette.hover
                } else {
                    state.palette.fill
                };
                painter.circle(
                    to_screen(point.x, point.y),
                    point.r as f32,
                    fill,
                    Stroke::new(0.5, state.palette.outline),
                );
            }

            draw_labels(&painter, plot, text_color, &to_screen);

            for (i, note) in plot.diagnostics.iter().enumerate() {
                painter.text(
                    to_screen(canvas.width - canvas.margin, canvas.margin * 0.3 + 14.0 * i as f64),
                    Align2::RIGHT_TOP,
                    note,
                    FontId::proportional(11.0),
                    ui.visuals().warn_fg_color,
                );
            }

            pointer = response
                .hover_pos()
                .map(|p| ((p.x - origin.x) as f64, (p.y - origin.y) as f64));
        });

    state.hover_at(pointer);
    tooltip(ui.ctx(), state);
}

fn draw_axis(
    painter: &egui::Painter,
    axis: &AxisDescriptor,
    color: Color32,
    to_screen: &impl Fn(f64, f64) -> Pos2,
) {
    let stroke = Stroke::new(1.0, color);
    let font = FontId::proportional(11.0);

    match axis.orientation {
        Orientation::Bottom => {
            let y = axis.anchor;
            painter.line_segment([to_screen(axis.span.min, y), to_screen(axis.span.max, y)], stroke);
            for tick in &axis.ticks {
                let at = to_screen(tick.position, y);
                painter.line_segment([at, at + Vec2::new(0.0, TICK_LEN)], stroke);
                painter.text(
                    at + Vec2::new(0.0, TICK_LEN + 2.0),
                    Align2::CENTER_TOP,
                    &tick.label,
                    font.clone(),
                    color,
                );
            }
        }
        Orientation::Left => {
            let x = axis.anchor;
            painter.line_segment([to_screen(x, axis.span.min), to_screen(x, axis.span.max)], stroke);
            for tick in &axis.ticks {
                let at = to_screen(x, tick.position);
                painter.line_segment([at, at - Vec2::new(TICK_LEN, 0.0)], stroke);
                painter.text(
                    at - Vec2::new(TICK_LEN + 2.0, 0.0),
                    Align2::RIGHT_CENTER,
                    &tick.label,
                    font.clone(),
                    color,
                );
            }
        }
    }
}

fn draw_labels(
    painter: &egui::Painter,
    plot: &PlotModel,
    color: Color32,
    to_screen: &impl Fn(f64, f64) -> Pos2,
) {
    for label in &plot.labels {
        let font = match label.role {
            LabelRole::Title => FontId::proportional(18.0),
            LabelRole::AxisLabel => FontId::proportional(13.0),
        };
        let galley = painter.layout_no_wrap(label.text.to_string(), font, color);
        let anchor = to_screen(label.x, label.y);

        let pos = match label.role {
            LabelRole::Title => anchor - Vec2::new(0.0, galley.size().y),
            // Rotate about the galley's top-left corner, then shift so the
            // rotated text is centred on the anchor.
            LabelRole::AxisLabel => {
                let half = galley.size() / 2.0;
                let (sin, cos) = label.angle.sin_cos();
                let rotated = Vec2::new(half.x * cos - half.y * sin, half.x * sin + half.y * cos);
                anchor - rotated
            }
        };
        painter.add(TextShape::new(pos, galley, color).with_angle(label.angle));
    }
}

// ---------------------------------------------------------------------------
// Hover tooltip
// ---------------------------------------------------------------------------

/// Fading tooltip for the hovered point. The last hovered payload is kept so
/// it can fade out after the pointer leaves.
fn tooltip(ctx: &egui::Context, state: &AppState) {
    let id = egui::Id::new("point_tooltip");
    let visible = state.hovered.is_some();
    let duration = if visible { FADE_IN_SECS } else { FADE_OUT_SECS };
    let opacity = ctx.animate_bool_with_time(id, visible, duration);

    let text_id = id.with("text");
    if let Some(point) = state.hovered.and_then(|i| state.plot.as_ref()?.points.get(i)) {
        ctx.data_mut(|d| d.insert_temp(text_id, point.tooltip.text()));
    }
    if opacity <= 0.0 {
        return;
    }
    let Some(text) = ctx.data(|d| d.get_temp::<String>(text_id)) else {
        return;
    };

    let pos = ctx
        .pointer_hover_pos()
        .or_else(|| ctx.pointer_latest_pos())
        .unwrap_or(Pos2::ZERO)
        + Vec2::new(12.0, -28.0);

    egui::Area::new(id.with("area"))
        .order(egui::Order::Tooltip)
        .fixed_pos(pos)
        .interactable(false)
        .show(ctx, |ui: &mut Ui| {
            ui.set_opacity(opacity * 0.9);
            egui::Frame::popup(ui.style()).show(ui, |ui: &mut Ui| {
                ui.label(RichText::new(text).monospace());
            });
        });
}
