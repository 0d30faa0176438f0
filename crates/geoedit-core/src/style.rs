//! Drawing styles passed to the canvas collaborator.

use peniko::Color;
use serde::{Deserialize, Serialize};

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Same color with a different alpha.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self::new(rgba.r, rgba.g, rgba.b, rgba.a)
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

const HANDLE_BLUE: SerializableColor = SerializableColor::rgb(33, 150, 243);
const HANDLE_ORANGE: SerializableColor = SerializableColor::rgb(255, 152, 0);
const WHITE: SerializableColor = SerializableColor::rgb(255, 255, 255);
const GREY: SerializableColor = SerializableColor::rgb(120, 120, 120);

/// Stroke and fill used to draw a shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    pub stroke_color: SerializableColor,
    pub stroke_width: f64,
    #[serde(default)]
    pub fill_color: Option<SerializableColor>,
    /// Dash pattern in view pixels; empty for solid strokes.
    #[serde(default)]
    pub dash: Vec<f64>,
}

impl ShapeStyle {
    pub fn stroke(&self) -> Color {
        self.stroke_color.into()
    }

    pub fn fill(&self) -> Option<Color> {
        self.fill_color.map(Into::into)
    }

    pub fn set_stroke(&mut self, color: Color) {
        self.stroke_color = color.into();
    }

    pub fn set_fill(&mut self, color: Option<Color>) {
        self.fill_color = color.map(Into::into);
    }

    fn helper() -> Self {
        Self {
            stroke_color: GREY,
            stroke_width: 1.0,
            fill_color: None,
            dash: vec![4.0, 4.0],
        }
    }
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            stroke_color: HANDLE_BLUE,
            stroke_width: 2.0,
            fill_color: Some(HANDLE_BLUE.with_alpha(64)),
            dash: Vec::new(),
        }
    }
}

/// Outline of an icon drawn at a handle location.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum IconShape {
    #[default]
    Circle,
    Square,
    Diamond,
    Cross,
}

/// Icon drawn at a point in view space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IconStyle {
    pub shape: IconShape,
    /// Size in view pixels.
    pub size: f64,
    pub fill_color: SerializableColor,
    pub stroke_color: SerializableColor,
}

impl IconStyle {
    pub fn new(shape: IconShape, size: f64, fill_color: SerializableColor) -> Self {
        Self {
            shape,
            size,
            fill_color,
            stroke_color: WHITE,
        }
    }
}

impl Default for IconStyle {
    fn default() -> Self {
        Self::new(IconShape::Circle, 10.0, HANDLE_BLUE)
    }
}

/// Styles of everything drawn by edit handles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditHandleStyles {
    /// Regular point handle.
    pub point: IconStyle,
    /// Point handle while being dragged.
    pub active_point: IconStyle,
    /// Handle that inserts a new point.
    pub insert_point: IconStyle,
    /// Handle that only adjusts a dimension (radius, width, height).
    pub dimension_point: IconStyle,
    /// Marker drawn where a snap target was found.
    pub snap_icon: IconStyle,
    /// Construction lines such as radii and axes.
    pub helper: ShapeStyle,
    /// The feature while it is being edited or created.
    pub feature: ShapeStyle,
}

impl Default for EditHandleStyles {
    fn default() -> Self {
        Self {
            point: IconStyle::default(),
            active_point: IconStyle::new(IconShape::Circle, 12.0, HANDLE_ORANGE),
            insert_point: IconStyle::new(IconShape::Circle, 7.0, HANDLE_BLUE.with_alpha(128)),
            dimension_point: IconStyle::new(IconShape::Diamond, 10.0, HANDLE_BLUE),
            snap_icon: IconStyle::new(IconShape::Cross, 14.0, HANDLE_ORANGE),
            helper: ShapeStyle::helper(),
            feature: ShapeStyle::default(),
        }
    }
}
