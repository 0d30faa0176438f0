//! Settings of an edit or create session.

use crate::error::{EditError, EditResult};
use crate::input::{GestureEvent, InputType};
use crate::snap::{GRID_SIZE, SnapMode};
use crate::style::EditHandleStyles;
use serde::{Deserialize, Serialize};

/// Options threaded through every handle of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditSettings {
    /// Finish on a single click instead of a double click.
    pub finish_on_single_click: bool,
    /// Points a point list needs before it may finish.
    pub minimum_point_count: usize,
    /// Points at which a point list finishes; `None` is unlimited.
    pub maximum_point_count: Option<usize>,
    /// Allow adding points continuously by dragging from the last point.
    pub freehand: bool,
    /// Handle pick radius in view pixels, for mouse input.
    pub mouse_interaction_radius: f64,
    /// Handle pick radius in view pixels, for touch input.
    pub touch_interaction_radius: f64,
    pub snap_mode: SnapMode,
    pub grid_size: f64,
    pub styles: EditHandleStyles,
}

impl Default for EditSettings {
    fn default() -> Self {
        Self {
            finish_on_single_click: false,
            minimum_point_count: 0,
            maximum_point_count: None,
            freehand: true,
            mouse_interaction_radius: 10.0,
            touch_interaction_radius: 20.0,
            snap_mode: SnapMode::Shapes,
            grid_size: GRID_SIZE,
            styles: EditHandleStyles::default(),
        }
    }
}

impl EditSettings {
    pub fn with_point_count(mut self, minimum: usize, maximum: Option<usize>) -> Self {
        self.minimum_point_count = minimum;
        self.maximum_point_count = maximum;
        self
    }

    pub fn with_finish_on_single_click(mut self, finish_on_single_click: bool) -> Self {
        self.finish_on_single_click = finish_on_single_click;
        self
    }

    pub fn with_freehand(mut self, freehand: bool) -> Self {
        self.freehand = freehand;
        self
    }

    pub fn with_snap_mode(mut self, snap_mode: SnapMode) -> Self {
        self.snap_mode = snap_mode;
        self
    }

    /// Pick radius in view pixels for the device that produced `event`.
    pub fn interaction_radius(&self, event: &GestureEvent) -> f64 {
        match event.input_type {
            InputType::Mouse => self.mouse_interaction_radius,
            InputType::Touch => self.touch_interaction_radius,
        }
    }

    /// Whether `count` points reached the maximum.
    pub fn is_maximum_reached(&self, count: usize) -> bool {
        self.maximum_point_count.is_some_and(|max| count >= max)
    }

    pub fn validate(&self) -> EditResult<()> {
        if let Some(max) = self.maximum_point_count {
            if max < self.minimum_point_count {
                return Err(EditError::InvalidSettings(format!(
                    "maximum point count {max} below minimum {}",
                    self.minimum_point_count
                )));
            }
        }
        if self.mouse_interaction_radius < 0.0 || self.touch_interaction_radius < 0.0 {
            return Err(EditError::InvalidSettings(
                "interaction radius must not be negative".to_string(),
            ));
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> EditResult<Self> {
        let settings: Self =
            serde_json::from_str(json).map_err(|e| EditError::InvalidSettings(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> EditResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| EditError::InvalidSettings(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::GestureEventType;
    use kurbo::Point;

    #[test]
    fn test_defaults() {
        let settings = EditSettings::default();
        assert!(!settings.finish_on_single_click);
        assert!(settings.freehand);
        assert_eq!(settings.maximum_point_count, None);
        assert!(!settings.is_maximum_reached(1000));
    }

    #[test]
    fn test_interaction_radius_per_device() {
        let settings = EditSettings::default();
        let mouse = GestureEvent::new(GestureEventType::DOWN, Point::ZERO);
        let touch = mouse.clone().with_input(InputType::Touch);
        assert!((settings.interaction_radius(&mouse) - 10.0).abs() < 1e-9);
        assert!((settings.interaction_radius(&touch) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_json_partial_and_validation() {
        let settings = EditSettings::from_json(r#"{"maximum_point_count": 4, "freehand": false}"#).unwrap();
        assert_eq!(settings.maximum_point_count, Some(4));
        assert!(!settings.freehand);
        assert!(settings.is_maximum_reached(4));

        let err = EditSettings::from_json(r#"{"minimum_point_count": 5, "maximum_point_count": 2}"#);
        assert!(matches!(err, Err(EditError::InvalidSettings(_))));

        let json = settings.to_json().unwrap();
        assert_eq!(EditSettings::from_json(&json).unwrap(), settings);
    }
}
