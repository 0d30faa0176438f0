use super::Controller;
use crate::canvas::{GeoCanvas, LabelCanvas};
use crate::context::EditContext;
use crate::editor::handles::{CompositeEditHandle, EditHandle};
use crate::editor::{CompositeEditor, Editor, SavedState};
use crate::error::{EditError, EditResult};
use crate::evented::{ControllerEvent, EventedSupport, HandleEvent};
use crate::feature::{Feature, FeatureId, LayerId};
use crate::input::{GestureEvent, GestureEventType, KeyEvent};
use crate::result::HandleEventResult;
use crate::settings::EditSettings;
use crate::view::{Cursor, View};

/// State of a running edit. The feature is a working copy; the layer keeps
/// the original until the edit finishes.
struct Session {
    layer: LayerId,
    feature: Feature,
    handle: CompositeEditHandle,
    saved: SavedState,
}

/// Edits one existing feature with the handles of its editor.
///
/// While active the feature is hidden in the view and drawn by the
/// controller instead. A double click nobody handled (or a single click,
/// with `finish_on_single_click`) finishes the edit and writes the feature
/// back to its layer.
pub struct EditController {
    editor: Box<dyn Editor>,
    settings: EditSettings,
    layer: LayerId,
    feature_id: FeatureId,
    session: Option<Session>,
    events: EventedSupport<ControllerEvent>,
}

impl EditController {
    pub fn new(layer: LayerId, feature_id: FeatureId) -> Self {
        Self {
            editor: Box::new(CompositeEditor::default()),
            settings: EditSettings::default(),
            layer,
            feature_id,
            session: None,
            events: EventedSupport::new(),
        }
    }

    pub fn with_editor(mut self, editor: Box<dyn Editor>) -> Self {
        self.editor = editor;
        self
    }

    pub fn with_settings(mut self, settings: EditSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &EditSettings {
        &self.settings
    }

    /// Has no effect once the controller is active.
    pub fn set_point_count(&mut self, minimum: usize, maximum: Option<usize>) {
        if self.is_active() {
            log::warn!("Ignoring point count change on an active edit controller");
            return;
        }
        self.settings.minimum_point_count = minimum;
        self.settings.maximum_point_count = maximum;
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Working copy of the edited feature.
    pub fn feature(&self) -> Option<&Feature> {
        self.session.as_ref().map(|s| &s.feature)
    }

    fn start(&mut self, view: &mut View) -> EditResult<()> {
        let layer = view.layer(self.layer)?;
        let mut feature = layer
            .get(self.feature_id)
            .cloned()
            .ok_or_else(|| EditError::UnknownFeature(self.feature_id.to_string()))?;
        let (saved, handle) = {
            let ctx = EditContext::new(view, layer, &mut feature, &self.settings);
            (self.editor.save_state(&ctx), self.editor.edit_handle(&ctx)?)
        };
        log::info!(
            "Editing feature {} with the {} editor",
            self.feature_id,
            self.editor.name()
        );
        view.set_feature_hidden(self.feature_id, true);
        self.session = Some(Session {
            layer: self.layer,
            feature,
            handle,
            saved,
        });
        Ok(())
    }

    /// End the session without committing, restoring the saved state.
    fn abandon(&mut self, view: &mut View) -> EditResult<()> {
        let Some(mut session) = self.session.take() else {
            return Ok(());
        };
        view.set_feature_hidden(session.feature.id, false);
        let layer = view.layer(session.layer)?;
        let mut ctx = EditContext::new(view, layer, &mut session.feature, &self.settings);
        self.editor.restore_state(session.saved, &mut ctx)
    }

    /// Commit the working copy to the layer and end the session.
    ///
    /// Each handle action already reported its own `Finished` change, so
    /// committing emits no shape event.
    pub fn finish(&mut self, view: &mut View) -> EditResult<()> {
        let Some(session) = self.session.take() else {
            return Ok(());
        };
        view.set_feature_hidden(session.feature.id, false);
        view.layer_mut(session.layer)?.put(session.feature);
        log::debug!("Finished editing feature {}", self.feature_id);
        Ok(())
    }

    /// Drop the running edit and start editing another feature.
    pub fn restart(&mut self, view: &mut View, layer: LayerId, feature_id: FeatureId) -> EditResult<()> {
        self.abandon(view)?;
        self.layer = layer;
        self.feature_id = feature_id;
        self.start(view)?;
        self.events.emit(ControllerEvent::Restarted);
        Ok(())
    }

    fn is_finish_gesture(&self, event: &GestureEvent) -> bool {
        if self.settings.finish_on_single_click {
            event.kind == GestureEventType::SINGLE_CLICK_UP
        } else {
            event.kind == GestureEventType::DOUBLE_CLICK
        }
    }

    /// Run `f` against the session's handle and bubble its events.
    fn dispatch(
        &mut self,
        view: &View,
        f: impl FnOnce(&mut CompositeEditHandle, &mut EditContext<'_>) -> HandleEventResult,
    ) -> Option<HandleEventResult> {
        let session = self.session.as_mut()?;
        let layer = match view.layer(session.layer) {
            Ok(layer) => layer,
            Err(e) => {
                log::warn!("Edit session lost its layer: {e}");
                return None;
            }
        };
        let mut ctx = EditContext::new(view, layer, &mut session.feature, &self.settings);
        let result = f(&mut session.handle, &mut ctx);
        for event in session.handle.events().take_pending() {
            match event {
                HandleEvent::EditShape(e) => self.events.emit(ControllerEvent::EditShape(e)),
                HandleEvent::Invalidated | HandleEvent::Flipped { .. } => {
                    self.events.emit(ControllerEvent::Invalidated)
                }
            }
        }
        Some(result)
    }

    fn finish_result(&mut self, view: &mut View) -> HandleEventResult {
        if let Err(e) = self.finish(view) {
            log::error!("Failed to commit edited feature: {e}");
        }
        HandleEventResult::HANDLED | HandleEventResult::REQUEST_FINISH
    }
}

impl Controller for EditController {
    fn on_activate(&mut self, view: &mut View) -> EditResult<()> {
        self.start(view)?;
        self.events.emit(ControllerEvent::Activated);
        Ok(())
    }

    fn on_deactivate(&mut self, view: &mut View) -> EditResult<()> {
        let restored = self.abandon(view);
        self.events.emit(ControllerEvent::Deactivated);
        restored
    }

    fn on_gesture_event(&mut self, event: &GestureEvent, view: &mut View) -> HandleEventResult {
        let Some(result) = self.dispatch(view, |handle, ctx| handle.on_gesture_event(event, ctx)) else {
            return HandleEventResult::IGNORED;
        };
        if result.is_request_finish() || (result.is_ignored() && self.is_finish_gesture(event)) {
            return self.finish_result(view);
        }
        result
    }

    fn on_key_event(&mut self, event: &KeyEvent, view: &mut View) -> HandleEventResult {
        let Some(result) = self.dispatch(view, |handle, ctx| handle.on_key_event(event, ctx)) else {
            return HandleEventResult::IGNORED;
        };
        if result.is_request_finish() {
            return self.finish_result(view);
        }
        result
    }

    fn on_draw(&mut self, canvas: &mut dyn GeoCanvas, view: &View) {
        let style = self.settings.styles.feature.clone();
        self.dispatch(view, |handle, ctx| {
            if handle.should_paint_feature(ctx) {
                canvas.draw_shape(ctx.shape(), &style);
            }
            handle.on_draw(canvas, ctx);
            HandleEventResult::IGNORED
        });
    }

    fn on_draw_label(&mut self, canvas: &mut dyn LabelCanvas, view: &View) {
        self.dispatch(view, |handle, ctx| {
            handle.on_draw_label(canvas, ctx);
            HandleEventResult::IGNORED
        });
    }

    fn get_cursor(&mut self, event: &GestureEvent, view: &View) -> Option<Cursor> {
        let mut cursor = None;
        self.dispatch(view, |handle, ctx| {
            cursor = handle.get_cursor(event, ctx);
            HandleEventResult::IGNORED
        });
        cursor
    }

    fn events(&mut self) -> &mut EventedSupport<ControllerEvent> {
        &mut self.events
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::view_with;
    use super::*;
    use crate::canvas::RecordingCanvas;
    use crate::editor::handles::test_support::*;
    use crate::evented::EditShapeStatus;
    use crate::shapes::{Polyline, Shape, ShapeType};
    use crate::snap::SnapMode;
    use kurbo::Point;

    fn controller(layer: LayerId, id: FeatureId) -> EditController {
        EditController::new(layer, id).with_settings(EditSettings::default().with_snap_mode(SnapMode::None))
    }

    fn drag_point(edit: &mut EditController, view: &mut View, from: (f64, f64), to: (f64, f64)) {
        let start = down(from.0, from.1);
        edit.on_gesture_event(&start, view);
        edit.on_gesture_event(&drag(&start, to.0, to.1), view);
        edit.on_gesture_event(&drag_end(&start, to.0, to.1), view);
    }

    #[test]
    fn test_edit_commits_on_unhandled_double_click() {
        let (mut view, layer, id) = view_with(Shape::Point(Point::new(100.0, 100.0)));
        let mut edit = controller(layer, id);
        edit.on_activate(&mut view).unwrap();
        assert!(view.is_feature_hidden(id));
        assert_eq!(edit.events().take_pending(), vec![ControllerEvent::Activated]);

        drag_point(&mut edit, &mut view, (100.0, 100.0), (150.0, 120.0));
        assert_eq!(edit.feature().unwrap().shape, Shape::Point(Point::new(150.0, 120.0)));
        assert_eq!(
            view.feature(layer, id).unwrap().shape,
            Shape::Point(Point::new(100.0, 100.0))
        );
        assert!(
            edit.events()
                .take_pending()
                .iter()
                .any(|e| matches!(e, ControllerEvent::EditShape(s) if s.status == EditShapeStatus::InProgress))
        );

        let result = edit.on_gesture_event(&double_click(500.0, 500.0), &mut view);
        assert!(result.is_request_finish());
        assert!(!edit.is_active());
        assert!(!view.is_feature_hidden(id));
        assert_eq!(
            view.feature(layer, id).unwrap().shape,
            Shape::Point(Point::new(150.0, 120.0))
        );
    }

    #[test]
    fn test_one_finished_event_per_drag() {
        let (mut view, layer, id) = view_with(Shape::Point(Point::new(100.0, 100.0)));
        let mut edit = controller(layer, id);
        edit.on_activate(&mut view).unwrap();
        drag_point(&mut edit, &mut view, (100.0, 100.0), (150.0, 120.0));
        edit.on_gesture_event(&double_click(500.0, 500.0), &mut view);

        let finished: Vec<_> = edit
            .events()
            .take_pending()
            .into_iter()
            .filter_map(|e| match e {
                ControllerEvent::EditShape(s) if s.status == EditShapeStatus::Finished => Some(s.shape),
                _ => None,
            })
            .collect();
        assert_eq!(finished, vec![Shape::Point(Point::new(150.0, 120.0))]);
    }

    #[test]
    fn test_single_click_finishes_when_configured() {
        let (mut view, layer, id) = view_with(Shape::Point(Point::new(100.0, 100.0)));
        let settings = EditSettings::default()
            .with_snap_mode(SnapMode::None)
            .with_finish_on_single_click(true);
        let mut edit = EditController::new(layer, id).with_settings(settings);
        edit.on_activate(&mut view).unwrap();
        assert!(edit.on_gesture_event(&double_click(500.0, 500.0), &mut view).is_ignored());
        assert!(edit.on_gesture_event(&click(500.0, 500.0), &mut view).is_request_finish());
    }

    #[test]
    fn test_deactivate_without_finish_discards_edit() {
        let (mut view, layer, id) = view_with(Shape::Point(Point::new(100.0, 100.0)));
        let mut edit = controller(layer, id);
        edit.on_activate(&mut view).unwrap();
        drag_point(&mut edit, &mut view, (100.0, 100.0), (150.0, 120.0));
        edit.events().take_pending();

        edit.on_deactivate(&mut view).unwrap();
        assert!(!view.is_feature_hidden(id));
        assert_eq!(
            view.feature(layer, id).unwrap().shape,
            Shape::Point(Point::new(100.0, 100.0))
        );
        assert_eq!(edit.events().take_pending(), vec![ControllerEvent::Deactivated]);
    }

    #[test]
    fn test_point_count_fixed_while_active() {
        let (mut view, layer, id) = view_with(Shape::Point(Point::ZERO));
        let mut edit = controller(layer, id);
        edit.set_point_count(2, Some(5));
        edit.on_activate(&mut view).unwrap();
        edit.set_point_count(4, None);
        assert_eq!(edit.settings().minimum_point_count, 2);
        assert_eq!(edit.settings().maximum_point_count, Some(5));
    }

    #[test]
    fn test_restart_switches_feature() {
        let (mut view, layer, first) = view_with(Shape::Point(Point::ZERO));
        let second = Feature::new(Shape::Polyline(Polyline::new(vec![
            Point::new(200.0, 200.0),
            Point::new(300.0, 200.0),
        ])));
        let second_id = second.id;
        view.layer_mut(layer).unwrap().add(second);

        let mut edit = controller(layer, first);
        edit.on_activate(&mut view).unwrap();
        edit.restart(&mut view, layer, second_id).unwrap();
        assert!(!view.is_feature_hidden(first));
        assert!(view.is_feature_hidden(second_id));
        assert_eq!(edit.feature().map(|f| f.id), Some(second_id));
        assert_eq!(edit.events().take_pending().last(), Some(&ControllerEvent::Restarted));
    }

    #[test]
    fn test_draws_working_copy_and_handles() {
        let (mut view, layer, id) = view_with(Shape::Polyline(Polyline::new(vec![
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
        ])));
        let mut edit = controller(layer, id);
        edit.on_activate(&mut view).unwrap();
        let mut canvas = RecordingCanvas::new();
        edit.on_draw(&mut canvas, &view);
        assert!(canvas.shapes().any(|s| s.shape_type() == ShapeType::Polyline));
        assert!(canvas.icon_count() >= 2);
    }

    #[test]
    fn test_missing_feature_fails_activation() {
        let (mut view, layer, _) = view_with(Shape::Point(Point::ZERO));
        let mut edit = controller(layer, FeatureId::new());
        assert!(matches!(
            edit.on_activate(&mut view),
            Err(EditError::UnknownFeature(_))
        ));
        assert!(!edit.is_active());
    }
}
