// src/render/mod.rs
//! Turns a floor plan into a flat list of draw commands.
//!
//! Geometry stays in plan units. Zoom is carried once on the [`Frame`] and
//! applied by whatever paints it, so shapes, hit-testing, and output agree.

mod color;

pub use color::Color;

use crate::layout::{FloorPlan, TablePlacement, TableShape, TableStatus};
use crate::utils::geometry::{
    center, handle_positions, local_to_world, rotated_corners, Point2D, Rect, ResizeHandle,
};

/// Side of a drawn resize handle, in plan units.
pub const HANDLE_SIZE: f64 = 8.0;
/// Offset of a table's drop shadow, in plan units.
pub const SHADOW_OFFSET: f64 = 3.0;
/// Grids finer than this are not drawn.
const MIN_GRID_STEP: f64 = 2.0;
const ELLIPSE_SEGMENTS: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewOptions {
    pub show_grid: bool,
    pub grid_step: f64,
    pub zoom: f64,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            show_grid: true,
            grid_step: 20.0,
            zoom: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Center,
    TopLeft,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect {
        rect: Rect,
        color: Color,
    },
    StrokeRect {
        rect: Rect,
        color: Color,
        width: f64,
    },
    Line {
        from: Point2D,
        to: Point2D,
        color: Color,
        width: f64,
    },
    /// Closed polygon, used for rotated rectangles.
    Polygon {
        points: Vec<Point2D>,
        fill: Color,
        stroke: Color,
        stroke_width: f64,
    },
    Circle {
        center: Point2D,
        radius: f64,
        fill: Color,
        stroke: Color,
        stroke_width: f64,
    },
    Text {
        position: Point2D,
        text: String,
        size: f64,
        color: Color,
        anchor: TextAnchor,
    },
}

/// One rendered pass. Commands are in paint order.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Plan units to pixels.
    pub scale: f64,
    pub width: f64,
    pub height: f64,
    pub commands: Vec<DrawCommand>,
}

impl Frame {
    pub fn to_screen(&self, point: Point2D) -> Point2D {
        point.scale(self.scale)
    }

    pub fn to_plan(&self, screen: Point2D) -> Point2D {
        if self.scale > 0.0 {
            screen.scale(1.0 / self.scale)
        } else {
            screen
        }
    }
}

pub fn status_color(status: TableStatus) -> Color {
    match status {
        TableStatus::Available => color::AVAILABLE,
        TableStatus::Occupied => color::OCCUPIED,
        TableStatus::Reserved => color::RESERVED,
        TableStatus::Cleaning => color::CLEANING,
    }
}

/// Renders `plan` with `selection` highlighted.
///
/// Order: background, grid, areas, tables in array order, then the handles
/// of the selected table so they are never covered.
pub fn render(plan: &FloorPlan, selection: Option<&str>, view: &ViewOptions) -> Frame {
    let mut commands = Vec::new();
    let bounds = Rect::new(0.0, 0.0, plan.width, plan.height);

    commands.push(DrawCommand::FillRect {
        rect: bounds,
        color: color::BACKGROUND,
    });
    if view.show_grid {
        draw_grid(&mut commands, bounds, view.grid_step);
    }
    for area in &plan.areas {
        let tint = Color::from_hex(&area.color).unwrap_or(color::AREA_FALLBACK);
        commands.push(DrawCommand::FillRect {
            rect: area.rect(),
            color: tint.with_alpha(60),
        });
        commands.push(DrawCommand::StrokeRect {
            rect: area.rect(),
            color: tint,
            width: 1.5,
        });
        commands.push(DrawCommand::Text {
            position: area.label_anchor(),
            text: area.name.clone(),
            size: 13.0,
            color: tint,
            anchor: TextAnchor::TopLeft,
        });
    }
    for placement in &plan.tables {
        draw_table(&mut commands, placement, selection == Some(placement.table_id.as_str()));
    }
    if let Some(selected) = selection.and_then(|id| plan.placement(id)) {
        draw_handles(&mut commands, selected);
    }

    Frame {
        scale: view.zoom,
        width: plan.width * view.zoom,
        height: plan.height * view.zoom,
        commands,
    }
}

fn draw_grid(commands: &mut Vec<DrawCommand>, bounds: Rect, step: f64) {
    if !step.is_finite() || step < MIN_GRID_STEP {
        return;
    }
    let mut x = step;
    while x < bounds.right() {
        commands.push(DrawCommand::Line {
            from: Point2D::new(x, bounds.y),
            to: Point2D::new(x, bounds.bottom()),
            color: color::GRID,
            width: 1.0,
        });
        x += step;
    }
    let mut y = step;
    while y < bounds.bottom() {
        commands.push(DrawCommand::Line {
            from: Point2D::new(bounds.x, y),
            to: Point2D::new(bounds.right(), y),
            color: color::GRID,
            width: 1.0,
        });
        y += step;
    }
}

fn draw_table(commands: &mut Vec<DrawCommand>, p: &TablePlacement, selected: bool) {
    let fill = status_color(p.status);
    let (stroke, stroke_width) = if selected {
        (color::SELECTION, 2.5)
    } else {
        (color::TABLE_STROKE, 1.5)
    };

    match p.shape {
        TableShape::Circle if p.width != p.height => {
            let outline = ellipse_outline(p);
            commands.push(DrawCommand::Polygon {
                points: outline
                    .iter()
                    .map(|c| c.offset(SHADOW_OFFSET, SHADOW_OFFSET))
                    .collect(),
                fill: color::SHADOW,
                stroke: color::SHADOW,
                stroke_width: 0.0,
            });
            commands.push(DrawCommand::Polygon {
                points: outline,
                fill,
                stroke,
                stroke_width,
            });
        }
        TableShape::Circle => {
            let radius = p.width / 2.0;
            let c = center(p);
            commands.push(DrawCommand::Circle {
                center: c.offset(SHADOW_OFFSET, SHADOW_OFFSET),
                radius,
                fill: color::SHADOW,
                stroke: color::SHADOW,
                stroke_width: 0.0,
            });
            commands.push(DrawCommand::Circle {
                center: c,
                radius,
                fill,
                stroke,
                stroke_width,
            });
        }
        TableShape::Rectangle | TableShape::Square => {
            let corners = rotated_corners(p);
            commands.push(DrawCommand::Polygon {
                points: corners
                    .iter()
                    .map(|c| c.offset(SHADOW_OFFSET, SHADOW_OFFSET))
                    .collect(),
                fill: color::SHADOW,
                stroke: color::SHADOW,
                stroke_width: 0.0,
            });
            commands.push(DrawCommand::Polygon {
                points: corners.to_vec(),
                fill,
                stroke,
                stroke_width,
            });
        }
    }

    let c = center(p);
    commands.push(DrawCommand::Text {
        position: c.offset(0.0, -7.0),
        text: p.label.clone(),
        size: 14.0,
        color: color::TEXT,
        anchor: TextAnchor::Center,
    });
    commands.push(DrawCommand::Text {
        position: c.offset(0.0, 9.0),
        text: format!("{} seats", p.capacity),
        size: 11.0,
        color: color::TEXT,
        anchor: TextAnchor::Center,
    });
}

/// A loaded "circle" whose sides differ is drawn as its rotated ellipse.
fn ellipse_outline(p: &TablePlacement) -> Vec<Point2D> {
    let c = center(p);
    let (rx, ry) = (p.width / 2.0, p.height / 2.0);
    (0..ELLIPSE_SEGMENTS)
        .map(|i| {
            let t = i as f64 / ELLIPSE_SEGMENTS as f64 * std::f64::consts::TAU;
            local_to_world(p, Point2D::new(c.x + rx * t.cos(), c.y + ry * t.sin()))
        })
        .collect()
}

fn draw_handles(commands: &mut Vec<DrawCommand>, p: &TablePlacement) {
    let handles = handle_positions(p);
    let half = HANDLE_SIZE / 2.0;
    for handle in ResizeHandle::all() {
        let at = local_to_world(p, handles.get(*handle));
        let rect = Rect::new(at.x - half, at.y - half, HANDLE_SIZE, HANDLE_SIZE);
        commands.push(DrawCommand::FillRect {
            rect,
            color: color::HANDLE_FILL,
        });
        commands.push(DrawCommand::StrokeRect {
            rect,
            color: color::SELECTION,
            width: 1.5,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Area;
    use assert_approx_eq::assert_approx_eq;

    fn plan() -> FloorPlan {
        let mut plan = FloorPlan::new("p", "Main", 200.0, 100.0);
        plan.areas.push(Area::new("Patio", "#88cc88", Rect::new(0.0, 0.0, 100.0, 100.0)));
        plan.add_placement(TablePlacement::new("T1", "1", 10.0, 10.0));
        let mut t2 = TablePlacement::new("T2", "2", 100.0, 10.0);
        t2.shape = TableShape::Circle;
        plan.add_placement(t2);
        plan
    }

    fn first_index(frame: &Frame, pred: impl Fn(&DrawCommand) -> bool) -> usize {
        frame.commands.iter().position(pred).unwrap()
    }

    #[test]
    fn test_draw_order() {
        let frame = render(&plan(), Some("T1"), &ViewOptions::default());
        assert!(matches!(frame.commands[0], DrawCommand::FillRect { .. }));

        let grid = first_index(&frame, |c| matches!(c, DrawCommand::Line { .. }));
        let area = first_index(&frame, |c| matches!(c, DrawCommand::StrokeRect { color, .. } if *color != color::SELECTION));
        let table = first_index(&frame, |c| matches!(c, DrawCommand::Polygon { .. }));
        let circle = first_index(&frame, |c| matches!(c, DrawCommand::Circle { .. }));
        let handle = first_index(&frame, |c| matches!(c, DrawCommand::StrokeRect { color, .. } if *color == color::SELECTION));
        assert!(grid < area && area < table && table < circle && circle < handle);

        let last = frame.commands.len() - 1;
        assert!(matches!(frame.commands[last], DrawCommand::StrokeRect { color, .. } if color == color::SELECTION));
    }

    #[test]
    fn test_grid_toggle() {
        let mut view = ViewOptions::default();
        let with_grid = render(&plan(), None, &view);
        // 200x100 at step 20: 9 vertical + 4 horizontal interior lines.
        let lines = with_grid.commands.iter().filter(|c| matches!(c, DrawCommand::Line { .. })).count();
        assert_eq!(lines, 13);

        view.show_grid = false;
        let without = render(&plan(), None, &view);
        assert!(!without.commands.iter().any(|c| matches!(c, DrawCommand::Line { .. })));
    }

    #[test]
    fn test_no_handles_without_selection() {
        let frame = render(&plan(), None, &ViewOptions::default());
        let handles = frame
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::StrokeRect { color, .. } if *color == color::SELECTION))
            .count();
        assert_eq!(handles, 0);

        let frame = render(&plan(), Some("T2"), &ViewOptions::default());
        let handles = frame
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::StrokeRect { color, .. } if *color == color::SELECTION))
            .count();
        assert_eq!(handles, 4);
    }

    #[test]
    fn test_zoom_scales_frame_only() {
        let view = ViewOptions {
            zoom: 2.0,
            ..ViewOptions::default()
        };
        let frame = render(&plan(), None, &view);
        assert_eq!(frame.width, 400.0);
        assert_eq!(frame.to_screen(Point2D::new(10.0, 5.0)), Point2D::new(20.0, 10.0));
        assert_eq!(frame.to_plan(Point2D::new(20.0, 10.0)), Point2D::new(10.0, 5.0));
        let polygon = frame
            .commands
            .iter()
            .find_map(|c| match c {
                DrawCommand::Polygon { points, fill, .. } if *fill != color::SHADOW => Some(points.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(polygon[0], Point2D::new(10.0, 10.0));
    }

    #[test]
    fn test_handles_follow_rotation() {
        let mut plan = plan();
        plan.placement_mut("T1").unwrap().set_rotation(90.0);
        let frame = render(&plan, Some("T1"), &ViewOptions::default());
        let first_handle = frame
            .commands
            .iter()
            .find_map(|c| match c {
                DrawCommand::FillRect { rect, color } if *color == color::HANDLE_FILL => Some(*rect),
                _ => None,
            })
            .unwrap();
        // nw of the 80x80 table at (10,10) turns onto the top-right corner.
        assert_approx_eq!(first_handle.center().x, 90.0);
        assert_approx_eq!(first_handle.center().y, 10.0);
    }

    #[test]
    fn test_stretched_circle_draws_as_ellipse() {
        let mut plan = plan();
        plan.placement_mut("T2").unwrap().height = 120.0;
        let frame = render(&plan, None, &ViewOptions::default());
        assert!(!frame.commands.iter().any(|c| matches!(c, DrawCommand::Circle { .. })));
        let widest = frame
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Polygon { points, .. } => Some(points.len()),
                _ => None,
            })
            .max();
        assert_eq!(widest, Some(ELLIPSE_SEGMENTS));
    }

    #[test]
    fn test_label_shows_capacity() {
        let mut plan = plan();
        plan.placement_mut("T1").unwrap().capacity = 6;
        let frame = render(&plan, None, &ViewOptions::default());
        assert!(frame
            .commands
            .iter()
            .any(|c| matches!(c, DrawCommand::Text { text, .. } if text == "6 seats")));
    }
}
