//! Controllers: top-level input handlers installed on a [`Map`](crate::map::Map).
//!
//! A controller receives every gesture and key event of the view. Pick
//! controllers turn a view point into features, navigation controllers move
//! the camera, and the edit and create controllers run an editor's handles
//! against one feature. [`CompositeController`] chains controllers so that
//! the first one handling an event wins.

mod composite;
mod create;
mod edit;
mod navigate;
mod noop;
mod pick;

pub use composite::CompositeController;
pub use create::{BasicCreate, BasicCreateController, Completion, CreateController, CreateHooks};
pub use edit::EditController;
pub use navigate::{DefaultController, NavigateController, PanController, ZoomController};
pub use noop::NoopController;
pub use pick::{ContextMenuController, HoverController, PickController, PickHooks, SelectController};

use crate::canvas::{GeoCanvas, LabelCanvas};
use crate::error::EditResult;
use crate::evented::{ControllerEvent, EventedSupport};
use crate::input::{GestureEvent, KeyEvent};
use crate::result::HandleEventResult;
use crate::view::{Cursor, View};

pub trait Controller {
    fn on_activate(&mut self, _view: &mut View) -> EditResult<()> {
        Ok(())
    }

    fn on_deactivate(&mut self, _view: &mut View) -> EditResult<()> {
        Ok(())
    }

    fn on_gesture_event(&mut self, _event: &GestureEvent, _view: &mut View) -> HandleEventResult {
        HandleEventResult::IGNORED
    }

    fn on_key_event(&mut self, _event: &KeyEvent, _view: &mut View) -> HandleEventResult {
        HandleEventResult::IGNORED
    }

    /// Draw whatever the controller shows on top of the layers.
    ///
    /// Takes `&mut self` because drawing an edit session borrows the
    /// session's feature mutably for the context.
    fn on_draw(&mut self, _canvas: &mut dyn GeoCanvas, _view: &View) {}

    fn on_draw_label(&mut self, _canvas: &mut dyn LabelCanvas, _view: &View) {}

    fn get_cursor(&mut self, _event: &GestureEvent, _view: &View) -> Option<Cursor> {
        None
    }

    /// Request a redraw.
    fn invalidate(&mut self) {
        self.events().emit(ControllerEvent::Invalidated);
    }

    fn events(&mut self) -> &mut EventedSupport<ControllerEvent>;
}

/// Implements [`Controller`] for a newtype around a [`CompositeController`].
macro_rules! delegate_controller {
    ($name:ty) => {
        impl $crate::controller::Controller for $name {
            fn on_activate(&mut self, view: &mut $crate::view::View) -> $crate::error::EditResult<()> {
                self.0.on_activate(view)
            }

            fn on_deactivate(&mut self, view: &mut $crate::view::View) -> $crate::error::EditResult<()> {
                self.0.on_deactivate(view)
            }

            fn on_gesture_event(
                &mut self,
                event: &$crate::input::GestureEvent,
                view: &mut $crate::view::View,
            ) -> $crate::result::HandleEventResult {
                self.0.on_gesture_event(event, view)
            }

            fn on_key_event(
                &mut self,
                event: &$crate::input::KeyEvent,
                view: &mut $crate::view::View,
            ) -> $crate::result::HandleEventResult {
                self.0.on_key_event(event, view)
            }

            fn on_draw(&mut self, canvas: &mut dyn $crate::canvas::GeoCanvas, view: &$crate::view::View) {
                self.0.on_draw(canvas, view)
            }

            fn on_draw_label(&mut self, canvas: &mut dyn $crate::canvas::LabelCanvas, view: &$crate::view::View) {
                self.0.on_draw_label(canvas, view)
            }

            fn get_cursor(
                &mut self,
                event: &$crate::input::GestureEvent,
                view: &$crate::view::View,
            ) -> Option<$crate::view::Cursor> {
                self.0.get_cursor(event, view)
            }

            fn invalidate(&mut self) {
                self.0.invalidate()
            }

            fn events(&mut self) -> &mut $crate::evented::EventedSupport<$crate::evented::ControllerEvent> {
                self.0.events()
            }
        }
    };
}

pub(crate) use delegate_controller;
