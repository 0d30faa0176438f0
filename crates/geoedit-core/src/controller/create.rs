//! Interactive creation of new features.

use super::Controller;
use crate::canvas::{GeoCanvas, LabelCanvas};
use crate::context::EditContext;
use crate::editor::handles::EditHandle;
use crate::editor::{CompositeEditor, Editor};
use crate::error::{EditError, EditResult};
use crate::evented::{ControllerEvent, EditShapeEvent, EventedSupport, HandleEvent};
use crate::feature::{Feature, LayerId};
use crate::input::{GestureEvent, KeyEvent};
use crate::result::HandleEventResult;
use crate::settings::EditSettings;
use crate::shapes::{Shape, ShapeType};
use crate::view::{Cursor, View};

/// When a created feature counts as done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The controller finishes right away.
    Immediate,
    /// The host finishes later through [`CreateController::complete`].
    /// Until then the feature stays on screen and input is ignored.
    Deferred,
}

/// Decisions of a [`CreateController`].
pub trait CreateHooks {
    /// Layer that receives the new feature.
    fn on_choose_layer(&mut self, view: &View) -> EditResult<LayerId> {
        view.top_editable_layer()
            .ok_or_else(|| EditError::UnknownLayer("no visible editable layer".into()))
    }

    /// Seed feature whose shape the create handle fills in.
    fn on_create_new_object(&mut self, view: &View, layer: LayerId) -> EditResult<Feature>;

    fn on_object_created(&mut self, view: &mut View, layer: LayerId, feature: &Feature) -> EditResult<Completion> {
        view.layer_mut(layer)?.add(feature.clone());
        Ok(Completion::Immediate)
    }
}

struct Session {
    layer: LayerId,
    feature: Feature,
    handle: Box<dyn EditHandle>,
    /// Whether the handle changed the seed shape at all.
    created: bool,
}

/// Deferred feature waiting for [`CreateController::complete`].
struct Pending {
    feature: Feature,
    completed: bool,
}

/// Runs the create handle of the editor matching the seed feature.
pub struct CreateController<H> {
    hooks: H,
    editor: Box<dyn Editor>,
    settings: EditSettings,
    session: Option<Session>,
    pending: Option<Pending>,
    events: EventedSupport<ControllerEvent>,
}

impl<H: CreateHooks> CreateController<H> {
    pub fn new(hooks: H) -> Self {
        Self {
            hooks,
            editor: Box::new(CompositeEditor::default()),
            settings: EditSettings::default(),
            session: None,
            pending: None,
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

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    pub fn settings(&self) -> &EditSettings {
        &self.settings
    }

    /// Has no effect once the controller is active.
    pub fn set_point_count(&mut self, minimum: usize, maximum: Option<usize>) {
        if self.session.is_some() {
            log::warn!("Ignoring point count change on an active create controller");
            return;
        }
        self.settings.minimum_point_count = minimum;
        self.settings.maximum_point_count = maximum;
    }

    /// Feature under construction.
    pub fn feature(&self) -> Option<&Feature> {
        self.session.as_ref().map(|s| &s.feature)
    }

    /// Feature handed to [`CreateHooks::on_object_created`] that still
    /// waits for [`CreateController::complete`].
    pub fn pending_feature(&self) -> Option<&Feature> {
        self.pending.as_ref().map(|p| &p.feature)
    }

    /// Finish a deferred creation on the next event.
    pub fn complete(&mut self) {
        if let Some(pending) = &mut self.pending {
            pending.completed = true;
        }
    }

    fn start(&mut self, view: &View) -> EditResult<()> {
        let layer_id = self.hooks.on_choose_layer(view)?;
        let mut feature = self.hooks.on_create_new_object(view, layer_id)?;
        let layer = view.layer(layer_id)?;
        let shape_type = feature.shape.shape_type();
        let handle = {
            let ctx = EditContext::new(view, layer, &mut feature, &self.settings);
            self.editor.get_create_handle(&ctx)?
        }
        .ok_or(EditError::UnsupportedCreation(shape_type))?;
        log::info!("Creating a {shape_type} in layer {}", layer.name);
        self.session = Some(Session {
            layer: layer_id,
            feature,
            handle,
            created: false,
        });
        Ok(())
    }

    /// Discard the current feature and start a new one.
    pub fn restart(&mut self, view: &mut View) -> EditResult<()> {
        self.session = None;
        self.pending = None;
        self.start(view)?;
        self.events.emit(ControllerEvent::Restarted);
        Ok(())
    }

    /// End the session, committing the feature if a shape was created.
    ///
    /// Returns the completion reported by the hooks, or `None` when nothing
    /// was committed.
    pub fn finish(&mut self, view: &mut View) -> EditResult<Option<Completion>> {
        let Some(session) = self.session.take() else {
            return Ok(None);
        };
        if !session.created {
            log::debug!("Create session ended without a shape");
            return Ok(None);
        }
        let completion = self
            .hooks
            .on_object_created(view, session.layer, &session.feature)?;
        self.events
            .emit(ControllerEvent::EditShape(EditShapeEvent::finished(&session.feature.shape)));
        if completion == Completion::Deferred {
            self.pending = Some(Pending {
                feature: session.feature,
                completed: false,
            });
        }
        Ok(Some(completion))
    }

    fn finish_result(&mut self, view: &mut View) -> HandleEventResult {
        match self.finish(view) {
            Ok(Some(Completion::Deferred)) => HandleEventResult::HANDLED,
            Ok(_) => HandleEventResult::HANDLED | HandleEventResult::REQUEST_FINISH,
            Err(e) => {
                log::error!("Failed to commit created feature: {e}");
                HandleEventResult::HANDLED | HandleEventResult::REQUEST_FINISH
            }
        }
    }

    /// Result for input arriving while a deferred feature waits.
    fn pending_result(&mut self) -> Option<HandleEventResult> {
        let completed = self.pending.as_ref()?.completed;
        if completed {
            self.pending = None;
            Some(HandleEventResult::HANDLED | HandleEventResult::REQUEST_FINISH)
        } else {
            Some(HandleEventResult::IGNORED)
        }
    }

    fn dispatch(
        &mut self,
        view: &View,
        f: impl FnOnce(&mut Box<dyn EditHandle>, &mut EditContext<'_>) -> HandleEventResult,
    ) -> Option<HandleEventResult> {
        let session = self.session.as_mut()?;
        let layer = match view.layer(session.layer) {
            Ok(layer) => layer,
            Err(e) => {
                log::warn!("Create session lost its layer: {e}");
                return None;
            }
        };
        let mut ctx = EditContext::new(view, layer, &mut session.feature, &self.settings);
        let result = f(&mut session.handle, &mut ctx);
        // The committed feature is reported as finished by `finish`.
        for event in session.handle.events().take_pending() {
            match event {
                HandleEvent::EditShape(e) => {
                    session.created = true;
                    self.events.emit(ControllerEvent::EditShape(e.into_in_progress()));
                }
                HandleEvent::Invalidated | HandleEvent::Flipped { .. } => {
                    self.events.emit(ControllerEvent::Invalidated)
                }
            }
        }
        Some(result)
    }
}

impl<H: CreateHooks> Controller for CreateController<H> {
    fn on_activate(&mut self, view: &mut View) -> EditResult<()> {
        self.pending = None;
        self.start(view)?;
        self.events.emit(ControllerEvent::Activated);
        Ok(())
    }

    fn on_deactivate(&mut self, _view: &mut View) -> EditResult<()> {
        self.session = None;
        self.pending = None;
        self.events.emit(ControllerEvent::Deactivated);
        Ok(())
    }

    fn on_gesture_event(&mut self, event: &GestureEvent, view: &mut View) -> HandleEventResult {
        if let Some(result) = self.pending_result() {
            return result;
        }
        let Some(result) = self.dispatch(view, |handle, ctx| handle.on_gesture_event(event, ctx)) else {
            return HandleEventResult::IGNORED;
        };
        if result.is_request_finish() {
            return self.finish_result(view);
        }
        result
    }

    fn on_key_event(&mut self, event: &KeyEvent, view: &mut View) -> HandleEventResult {
        if let Some(result) = self.pending_result() {
            return result;
        }
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
        if let Some(pending) = &self.pending {
            canvas.draw_shape(&pending.feature.shape, &style);
            return;
        }
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

/// Creates features of one shape type with fixed properties.
#[derive(Debug, Clone)]
pub struct BasicCreate {
    shape_type: ShapeType,
    properties: serde_json::Map<String, serde_json::Value>,
}

impl BasicCreate {
    /// Composed shapes have no create handle and are rejected.
    pub fn new(shape_type: ShapeType) -> EditResult<Self> {
        match shape_type {
            ShapeType::ShapeList | ShapeType::ComplexPolygon | ShapeType::ExtrudedShape => {
                Err(EditError::UnsupportedCreation(shape_type))
            }
            _ => Ok(Self {
                shape_type,
                properties: serde_json::Map::new(),
            }),
        }
    }

    pub fn with_properties(mut self, properties: serde_json::Map<String, serde_json::Value>) -> Self {
        self.properties = properties;
        self
    }

    pub fn shape_type(&self) -> ShapeType {
        self.shape_type
    }
}

impl CreateHooks for BasicCreate {
    fn on_create_new_object(&mut self, _view: &View, _layer: LayerId) -> EditResult<Feature> {
        Ok(Feature::new(Shape::empty(self.shape_type)).with_properties(self.properties.clone()))
    }
}

pub type BasicCreateController = CreateController<BasicCreate>;

impl BasicCreateController {
    /// Controller for `shape_type` with the point count its shapes need.
    pub fn basic(shape_type: ShapeType) -> EditResult<Self> {
        let minimum = match shape_type {
            ShapeType::Polygon => 3,
            ShapeType::Polyline => 2,
            _ => 0,
        };
        let settings = EditSettings::default().with_point_count(minimum, None);
        Ok(Self::new(BasicCreate::new(shape_type)?).with_settings(settings))
    }
}
