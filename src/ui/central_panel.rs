//! Central panel UI module: paints the rendered floor plan, handles zoom,
//! and forwards pointer input to the editor in plan units.

use std::sync::Arc;

use eframe::egui::{
    self, Align2, Color32, Context, FontId, Painter, Pos2, Rect, Sense, Shape, Stroke, Vec2,
};
use parking_lot::RwLock;

use crate::editor::Editor;
use crate::render::{Color, DrawCommand, Frame, TextAnchor};
use crate::utils::geometry::{self, Point2D};

/// Gap around the plan inside the scroll area, in pixels.
const CANVAS_MARGIN: f32 = 16.0;

/// The `CentralPanel` struct provides the main viewport for the editor.
/// It paints the current [`Frame`] and turns raw egui pointer state into
/// press/move/release calls on the editor.
pub struct CentralPanel {
    editor: Arc<RwLock<Editor>>,

    /// Primary button state last frame, for edge detection.
    primary_was_down: bool,

    /// Whether the current press started on the canvas.
    pressed_on_canvas: bool,
}

impl CentralPanel {
    pub fn new(editor: Arc<RwLock<Editor>>) -> Self {
        Self {
            editor,
            primary_was_down: false,
            pressed_on_canvas: false,
        }
    }

    /// Called each frame to update the central panel.
    pub fn update(&mut self, ctx: &Context) {
        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(Color32::from_gray(200)))
            .show(ctx, |ui| {
                let Some(frame) = self.editor.read().frame() else {
                    ui.centered_and_justified(|ui| {
                        ui.label("No floor plan loaded.");
                    });
                    return;
                };

                egui::ScrollArea::both().show(ui, |ui| {
                    let size = Vec2::new(frame.width as f32, frame.height as f32)
                        + Vec2::splat(2.0 * CANVAS_MARGIN);
                    let (response, painter) = ui.allocate_painter(size, Sense::click_and_drag());
                    let origin = response.rect.min + Vec2::splat(CANVAS_MARGIN);

                    paint_frame(&painter, origin, &frame);
                    self.handle_pointer(ui, &response, origin, &frame);
                });
            });
    }

    fn handle_pointer(&mut self, ui: &egui::Ui, response: &egui::Response, origin: Pos2, frame: &Frame) {
        let (hover, primary_down, zoom_delta) = {
            let input = ui.input();
            (input.pointer.hover_pos(), input.pointer.primary_down(), input.zoom_delta())
        };

        let mut editor = self.editor.write();

        if response.hovered() && zoom_delta != 1.0 {
            let zoom = editor.zoom() * zoom_delta as f64;
            editor.set_zoom(zoom);
        }

        let plan_point = hover.map(|pos| {
            let local = pos - origin;
            frame.to_plan(Point2D::new(local.x as f64, local.y as f64))
        });

        if primary_down && !self.primary_was_down && response.hovered() {
            if let Some(point) = plan_point {
                editor.pointer_down(point);
                self.pressed_on_canvas = true;
            }
        }
        if let Some(point) = plan_point {
            if response.hovered() || self.pressed_on_canvas {
                if editor.pointer_move(point) {
                    ui.ctx().request_repaint();
                }
            }
        }
        if !primary_down && self.primary_was_down && self.pressed_on_canvas {
            editor.pointer_up();
            self.pressed_on_canvas = false;
        }
        self.primary_was_down = primary_down;
    }
}

fn color32(color: Color) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}

fn to_screen(origin: Pos2, frame: &Frame, point: Point2D) -> Pos2 {
    let p = frame.to_screen(point);
    origin + Vec2::new(p.x as f32, p.y as f32)
}

fn to_screen_rect(origin: Pos2, frame: &Frame, rect: geometry::Rect) -> Rect {
    let min = to_screen(origin, frame, Point2D::new(rect.x, rect.y));
    let max = to_screen(origin, frame, Point2D::new(rect.right(), rect.bottom()));
    Rect::from_min_max(min, max)
}

/// Paints draw commands in order, scaling plan units by the frame's zoom.
fn paint_frame(painter: &Painter, origin: Pos2, frame: &Frame) {
    let scale = frame.scale as f32;
    for command in &frame.commands {
        match command {
            DrawCommand::FillRect { rect, color } => {
                painter.rect_filled(to_screen_rect(origin, frame, *rect), 0.0, color32(*color));
            }
            DrawCommand::StrokeRect { rect, color, width } => {
                painter.rect_stroke(
                    to_screen_rect(origin, frame, *rect),
                    0.0,
                    Stroke::new(*width as f32, color32(*color)),
                );
            }
            DrawCommand::Line { from, to, color, width } => {
                painter.line_segment(
                    [to_screen(origin, frame, *from), to_screen(origin, frame, *to)],
                    Stroke::new(*width as f32, color32(*color)),
                );
            }
            DrawCommand::Polygon {
                points,
                fill,
                stroke,
                stroke_width,
            } => {
                let points = points.iter().map(|p| to_screen(origin, frame, *p)).collect();
                painter.add(Shape::convex_polygon(
                    points,
                    color32(*fill),
                    Stroke::new(*stroke_width as f32, color32(*stroke)),
                ));
            }
            DrawCommand::Circle {
                center,
                radius,
                fill,
                stroke,
                stroke_width,
            } => {
                painter.circle(
                    to_screen(origin, frame, *center),
                    *radius as f32 * scale,
                    color32(*fill),
                    Stroke::new(*stroke_width as f32, color32(*stroke)),
                );
            }
            DrawCommand::Text {
                position,
                text,
                size,
                color,
                anchor,
            } => {
                let align = match anchor {
                    TextAnchor::Center => Align2::CENTER_CENTER,
                    TextAnchor::TopLeft => Align2::LEFT_TOP,
                };
                painter.text(
                    to_screen(origin, frame, *position),
                    align,
                    text,
                    FontId::proportional(*size as f32 * scale),
                    color32(*color),
                );
            }
        }
    }
}
