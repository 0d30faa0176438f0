//! Per-dispatch context threaded through the handle graph.

use crate::error::EditResult;
use crate::feature::{Feature, FeatureId, FeatureLayer};
use crate::input::GestureEvent;
use crate::settings::EditSettings;
use crate::shapes::Shape;
use crate::snap::{SnapResult, snap_point};
use crate::view::View;
use kurbo::Point;

/// Borrowed view of one edit or create session for the duration of a
/// dispatch.
///
/// The shape may be a sub-shape of the feature's shape; see
/// [`EditContext::sub_context`].
pub struct EditContext<'a> {
    pub view: &'a View,
    pub layer: &'a FeatureLayer,
    pub feature_id: FeatureId,
    pub properties: &'a serde_json::Map<String, serde_json::Value>,
    pub settings: &'a EditSettings,
    shape: &'a mut Shape,
}

impl<'a> EditContext<'a> {
    pub fn new(
        view: &'a View,
        layer: &'a FeatureLayer,
        feature: &'a mut Feature,
        settings: &'a EditSettings,
    ) -> Self {
        let Feature {
            id,
            shape,
            properties,
        } = feature;
        Self {
            view,
            layer,
            feature_id: *id,
            properties,
            settings,
            shape,
        }
    }

    pub fn shape(&self) -> &Shape {
        self.shape
    }

    pub fn shape_mut(&mut self) -> &mut Shape {
        self.shape
    }

    /// Context for the same feature, narrowed to sub-shape `index`.
    pub fn sub_context(&mut self, index: usize) -> EditResult<EditContext<'_>> {
        let shape = self.shape.sub_shape_mut(index)?;
        Ok(EditContext {
            view: self.view,
            layer: self.layer,
            feature_id: self.feature_id,
            properties: self.properties,
            settings: self.settings,
            shape,
        })
    }

    /// Run `f` with a read-only context narrowed to sub-shape `index`.
    ///
    /// The sub-shape is copied, so changes made through the inner context
    /// are discarded.
    pub fn with_sub_shape<R>(&self, index: usize, f: impl FnOnce(&EditContext<'_>) -> R) -> EditResult<R> {
        let mut shape = self.shape.sub_shape(index)?.clone();
        let sub = EditContext {
            view: self.view,
            layer: self.layer,
            feature_id: self.feature_id,
            properties: self.properties,
            settings: self.settings,
            shape: &mut shape,
        };
        Ok(f(&sub))
    }

    /// Interaction radius in model units for the event's device.
    pub fn model_radius(&self, event: &GestureEvent) -> f64 {
        self.view
            .camera
            .view_to_model_distance(self.settings.interaction_radius(event))
    }

    pub fn to_view(&self, model_point: Point) -> Point {
        self.view.camera.model_to_view(model_point)
    }

    pub fn to_model(&self, view_point: Point) -> Point {
        self.view.camera.view_to_model(view_point)
    }

    /// Model point under the event, snapped per the settings.
    ///
    /// Other features of the view are snap targets; the edited one is not.
    pub fn snap(&self, event: &GestureEvent) -> SnapResult {
        let model_point = self.to_model(event.view_point);
        if !self.settings.snap_mode.is_enabled() {
            return SnapResult::none(model_point);
        }
        let targets = if self.settings.snap_mode.snaps_to_shapes() {
            self.view.snap_targets(self.feature_id)
        } else {
            Vec::new()
        };
        snap_point(
            model_point,
            self.settings.snap_mode,
            self.settings.grid_size,
            &targets,
            self.model_radius(event),
        )
    }

    /// Whether a model point lies within the interaction radius of the
    /// event's view point.
    pub fn interacts(&self, event: &GestureEvent, model_point: Point) -> bool {
        self.to_view(model_point).distance(event.view_point) <= self.settings.interaction_radius(event)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Fixture shared by handle, editor and controller tests.

    use super::*;
    use crate::feature::LayerId;
    use crate::snap::SnapMode;
    use kurbo::Size;

    pub struct Fixture {
        pub view: View,
        pub layer_id: LayerId,
        pub feature: Feature,
        pub settings: EditSettings,
    }

    impl Fixture {
        pub fn new(shape: Shape) -> Self {
            let _ = env_logger::builder().is_test(true).try_init();
            let mut view = View::new(Size::new(800.0, 600.0));
            let layer_id = view.add_layer(crate::feature::FeatureLayer::new("edit"));
            Self {
                view,
                layer_id,
                feature: Feature::new(shape),
                settings: EditSettings::default().with_snap_mode(SnapMode::None),
            }
        }

        pub fn ctx(&mut self) -> EditContext<'_> {
            let layer = self
                .view
                .layer(self.layer_id)
                .expect("fixture layer exists");
            EditContext::new(&self.view, layer, &mut self.feature, &self.settings)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::Fixture;
    use super::*;
    use crate::input::GestureEventType;
    use crate::shapes::{Bounds, ExtrudedShape, ShapeType};
    use crate::snap::SnapMode;

    #[test]
    fn test_sub_context_narrows_shape() {
        let extruded = ExtrudedShape::new(Shape::Bounds(Bounds::new(0.0, 0.0, 1.0, 1.0)), 0.0, 5.0);
        let mut fx = Fixture::new(Shape::ExtrudedShape(extruded));
        let mut ctx = fx.ctx();
        {
            let mut sub = ctx.sub_context(0).unwrap();
            assert_eq!(sub.shape().shape_type(), ShapeType::Bounds);
            sub.shape_mut().translate(kurbo::Vec2::new(1.0, 0.0));
        }
        assert!(ctx.sub_context(1).is_err());
        assert_eq!(ctx.shape().focus_point(), Point::new(1.5, 0.5));
    }

    #[test]
    fn test_snap_to_other_features() {
        let mut fx = Fixture::new(Shape::Point(Point::ZERO));
        fx.settings.snap_mode = SnapMode::Shapes;
        let other = Feature::new(Shape::Point(Point::new(100.0, 100.0)));
        fx.view.layer_mut(fx.layer_id).unwrap().add(other);

        let ctx = fx.ctx();
        let near = GestureEvent::new(GestureEventType::DRAG, Point::new(104.0, 97.0));
        assert_eq!(ctx.snap(&near).point, Point::new(100.0, 100.0));
        let far = GestureEvent::new(GestureEventType::DRAG, Point::new(130.0, 100.0));
        assert!(!ctx.snap(&far).is_snapped());
    }

    #[test]
    fn test_interacts_uses_view_distance() {
        let mut fx = Fixture::new(Shape::Point(Point::ZERO));
        fx.view.camera.zoom = 2.0;
        let ctx = fx.ctx();
        // Model (4, 0) is 8 view pixels from the origin.
        let e = GestureEvent::new(GestureEventType::DOWN, Point::ZERO);
        assert!(ctx.interacts(&e, Point::new(4.0, 0.0)));
        assert!(!ctx.interacts(&e, Point::new(6.0, 0.0)));
    }
}
