//! Drawing callbacks consumed from the rendering collaborator.
//!
//! Handles and controllers only decide what to draw. Shapes are passed in
//! model coordinates; icons and labels are positioned in view coordinates.

use crate::shapes::Shape;
use crate::style::{IconStyle, ShapeStyle};
use kurbo::Point;

/// Canvas for shapes and handle icons.
pub trait GeoCanvas {
    fn draw_shape(&mut self, shape: &Shape, style: &ShapeStyle);

    fn draw_icon(&mut self, view_point: Point, style: &IconStyle);
}

/// Canvas for text labels.
pub trait LabelCanvas {
    fn draw_label(&mut self, text: &str, view_point: Point);
}

/// A recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Shape { shape: Shape, style: ShapeStyle },
    Icon { view_point: Point, style: IconStyle },
    Label { text: String, view_point: Point },
}

/// Display list that records every call, for hosts that render later and
/// for tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingCanvas {
    pub commands: Vec<DrawCommand>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn shapes(&self) -> impl Iterator<Item = &Shape> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Shape { shape, .. } => Some(shape),
            _ => None,
        })
    }

    pub fn icon_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Icon { .. }))
            .count()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Label { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl GeoCanvas for RecordingCanvas {
    fn draw_shape(&mut self, shape: &Shape, style: &ShapeStyle) {
        self.commands.push(DrawCommand::Shape {
            shape: shape.clone(),
            style: style.clone(),
        });
    }

    fn draw_icon(&mut self, view_point: Point, style: &IconStyle) {
        self.commands.push(DrawCommand::Icon {
            view_point,
            style: style.clone(),
        });
    }
}

impl LabelCanvas for RecordingCanvas {
    fn draw_label(&mut self, text: &str, view_point: Point) {
        self.commands.push(DrawCommand::Label {
            text: text.to_string(),
            view_point,
        });
    }
}
