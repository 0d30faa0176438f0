//! View transform between view (screen) and model coordinates.

use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Zoom factor applied per scroll step.
pub const ZOOM_STEP: f64 = 1.2;

/// Camera manages the view transform of a map view.
///
/// It handles panning (translation) and zooming (scaling) operations,
/// converting between view coordinates and model coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Current translation offset (pan)
    pub offset: Vec2,
    /// View pixels per model unit
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
            min_zoom: 1.0 / 64.0,
            max_zoom: 64.0,
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Model to view transform.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.zoom)
    }

    /// View to model transform.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.offset)
    }

    pub fn view_to_model(&self, view_point: Point) -> Point {
        self.inverse_transform() * view_point
    }

    pub fn model_to_view(&self, model_point: Point) -> Point {
        self.transform() * model_point
    }

    /// Convert a length in view pixels to model units.
    pub fn view_to_model_distance(&self, pixels: f64) -> f64 {
        pixels / self.zoom
    }

    /// Pan the camera by a delta in view coordinates.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Zoom by `factor`, keeping the given view point fixed.
    pub fn zoom_at(&mut self, view_point: Point, factor: f64) {
        self.set_zoom_at(view_point, self.zoom * factor);
    }

    /// Set an absolute zoom, keeping the given view point fixed.
    pub fn set_zoom_at(&mut self, view_point: Point, zoom: f64) {
        let new_zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return;
        }
        let model_point = self.view_to_model(view_point);
        self.zoom = new_zoom;
        let drifted = self.model_to_view(model_point);
        self.offset += view_point - drifted;
    }

    /// Nearest power-of-two scale level for `zoom`.
    pub fn snap_zoom(zoom: f64) -> f64 {
        2f64.powf(zoom.log2().round())
    }

    /// Visible model area of a viewport.
    pub fn visible_rect(&self, viewport: Size) -> Rect {
        let p0 = self.view_to_model(Point::ZERO);
        let p1 = self.view_to_model(Point::new(viewport.width, viewport.height));
        Rect::from_points(p0, p1)
    }

    pub fn reset(&mut self) {
        self.offset = Vec2::ZERO;
        self.zoom = 1.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_camera_is_identity() {
        let camera = Camera::new();
        let p = Point::new(100.0, 200.0);
        let m = camera.view_to_model(p);
        assert!((m.x - p.x).abs() < f64::EPSILON);
        assert!((m.y - p.y).abs() < f64::EPSILON);
    }

    #[test]
    fn test_view_to_model_with_offset_and_zoom() {
        let mut camera = Camera::new();
        camera.offset = Vec2::new(50.0, 100.0);
        camera.zoom = 2.0;
        let m = camera.view_to_model(Point::new(150.0, 300.0));
        assert!((m.x - 50.0).abs() < 1e-9);
        assert!((m.y - 100.0).abs() < 1e-9);
        assert!((camera.view_to_model_distance(10.0) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_at_keeps_point_fixed() {
        let mut camera = Camera::new();
        camera.offset = Vec2::new(30.0, -20.0);
        let anchor = Point::new(123.0, 456.0);
        let before = camera.view_to_model(anchor);
        camera.zoom_at(anchor, 1.5);
        let after = camera.view_to_model(anchor);
        assert!((before.x - after.x).abs() < 1e-9);
        assert!((before.y - after.y).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_clamp() {
        let mut camera = Camera::new();
        camera.zoom_at(Point::ZERO, 0.0001);
        assert!((camera.zoom - camera.min_zoom).abs() < f64::EPSILON);
        camera.zoom_at(Point::ZERO, 1e6);
        assert!((camera.zoom - camera.max_zoom).abs() < f64::EPSILON);
    }

    #[test]
    fn test_snap_zoom() {
        assert!((Camera::snap_zoom(1.3) - 1.0).abs() < 1e-9);
        assert!((Camera::snap_zoom(3.2) - 4.0).abs() < 1e-9);
        assert!((Camera::snap_zoom(0.3) - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_visible_rect() {
        let mut camera = Camera::new();
        camera.zoom = 2.0;
        let r = camera.visible_rect(Size::new(200.0, 100.0));
        assert!((r.width() - 100.0).abs() < 1e-9);
        assert!((r.height() - 50.0).abs() < 1e-9);
    }
}
