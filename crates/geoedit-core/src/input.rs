//! Normalized gesture and key events.
//!
//! Raw platform input is translated into these value types by the host before
//! it reaches the controller chain.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::NONE
        }
    }

    /// Whether any modifier key is held.
    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }
}

/// Device that produced a gesture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputType {
    #[default]
    Mouse,
    Touch,
}

/// Kind of a normalized gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
pub enum GestureEventType {
    DOWN,
    MOVE,
    DRAG,
    DRAG_END,
    UP,
    SINGLE_CLICK_UP,
    SINGLE_CLICK_CONFIRMED,
    DOUBLE_CLICK,
    LONG_PRESS,
    SHOW_PRESS,
    CONTEXT_MENU,
    SCROLL,
    PINCH,
    PINCH_END,
    ROTATE,
    ROTATE_END,
    TWO_FINGER_DRAG,
    TWO_FINGER_DRAG_END,
}

impl GestureEventType {
    /// Gestures that continue a gesture started by an earlier event.
    pub fn is_continuation(self) -> bool {
        matches!(
            self,
            GestureEventType::DRAG
                | GestureEventType::DRAG_END
                | GestureEventType::PINCH
                | GestureEventType::PINCH_END
                | GestureEventType::ROTATE
                | GestureEventType::ROTATE_END
                | GestureEventType::TWO_FINGER_DRAG
                | GestureEventType::TWO_FINGER_DRAG_END
        )
    }
}

/// Extra data carried by multi-finger and wheel gestures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum GestureDetail {
    #[default]
    None,
    /// Wheel steps, positive away from the user.
    Scroll { amount: f64 },
    Pinch {
        scale_factor: f64,
        scale_factor_from_start: f64,
    },
    Rotate {
        angle: f64,
        angle_from_start: f64,
    },
}

/// A normalized pointer gesture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GestureEvent {
    pub kind: GestureEventType,
    /// Position in view (screen) coordinates.
    pub view_point: Point,
    pub input_type: InputType,
    pub modifiers: Modifiers,
    pub button: Option<MouseButton>,
    /// The event that started the gesture this event continues.
    pub down_event: Option<Box<GestureEvent>>,
    pub detail: GestureDetail,
}

impl GestureEvent {
    pub fn new(kind: GestureEventType, view_point: Point) -> Self {
        Self {
            kind,
            view_point,
            input_type: InputType::Mouse,
            modifiers: Modifiers::NONE,
            button: Some(MouseButton::Left),
            down_event: None,
            detail: GestureDetail::None,
        }
    }

    pub fn with_input(mut self, input_type: InputType) -> Self {
        self.input_type = input_type;
        if input_type == InputType::Touch {
            self.button = None;
        }
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_button(mut self, button: Option<MouseButton>) -> Self {
        self.button = button;
        self
    }

    pub fn with_down_event(mut self, down_event: GestureEvent) -> Self {
        self.down_event = Some(Box::new(down_event));
        self
    }

    pub fn with_detail(mut self, detail: GestureDetail) -> Self {
        self.detail = detail;
        self
    }

    pub fn is_touch(&self) -> bool {
        self.input_type == InputType::Touch
    }

    pub fn is_mouse(&self) -> bool {
        self.input_type == InputType::Mouse
    }

    /// Point where the current gesture started, or this event's point.
    pub fn start_point(&self) -> Point {
        self.down_event
            .as_ref()
            .map_or(self.view_point, |down| down.view_point)
    }
}

/// Key press direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyEventType {
    Down,
    Up,
}

/// Keyboard event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub kind: KeyEventType,
    pub key: String,
}

impl KeyEvent {
    pub fn down(key: impl Into<String>) -> Self {
        Self {
            kind: KeyEventType::Down,
            key: key.into(),
        }
    }

    pub fn up(key: impl Into<String>) -> Self {
        Self {
            kind: KeyEventType::Up,
            key: key.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifiers_any() {
        assert!(!Modifiers::default().any());
        assert!(Modifiers::shift().any());
        assert!(Modifiers::ctrl().any());
    }

    #[test]
    fn test_touch_drops_button() {
        let e = GestureEvent::new(GestureEventType::DOWN, Point::new(1.0, 2.0))
            .with_input(InputType::Touch);
        assert!(e.is_touch());
        assert_eq!(e.button, None);
    }

    #[test]
    fn test_start_point_uses_down_event() {
        let down = GestureEvent::new(GestureEventType::DOWN, Point::new(5.0, 5.0));
        let drag = GestureEvent::new(GestureEventType::DRAG, Point::new(9.0, 7.0))
            .with_down_event(down.clone());
        assert_eq!(drag.start_point(), Point::new(5.0, 5.0));
        assert_eq!(down.start_point(), Point::new(5.0, 5.0));
        assert!(drag.kind.is_continuation());
        assert!(!down.kind.is_continuation());
    }

    #[test]
    fn test_gesture_serialization() {
        let e = GestureEvent::new(GestureEventType::SCROLL, Point::new(3.0, 4.0))
            .with_detail(GestureDetail::Scroll { amount: -1.0 });
        let json = serde_json::to_string(&e).unwrap();
        let back: GestureEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, e);
    }
}
