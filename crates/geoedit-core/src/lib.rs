//! GeoEdit Core Library
//!
//! Direct-manipulation editing of planar geometry. Controllers receive the
//! normalized gestures of a [`Map`], editors turn a shape into edit handles,
//! and handles mutate the shape through an [`EditContext`].

pub mod camera;
pub mod canvas;
pub mod context;
pub mod controller;
pub mod editor;
pub mod error;
pub mod evented;
pub mod feature;
pub mod input;
pub mod map;
pub mod result;
pub mod settings;
pub mod shapes;
pub mod snap;
pub mod style;
pub mod view;

pub use camera::Camera;
pub use canvas::{DrawCommand, GeoCanvas, LabelCanvas, RecordingCanvas};
pub use context::EditContext;
pub use controller::{
    BasicCreateController, CompositeController, Controller, CreateController, CreateHooks, DefaultController,
    EditController, NavigateController, NoopController,
};
pub use editor::handles::{CascadingEditHandle, CompositeEditHandle, EditHandle, ThreeStepEditHandle};
pub use editor::{CompositeEditor, Editor};
pub use error::{EditError, EditResult};
pub use evented::{ControllerEvent, EditShapeEvent, EditShapeStatus, EventedSupport, HandleEvent};
pub use feature::{Feature, FeatureId, FeatureLayer, LayerId};
pub use input::{GestureEvent, GestureEventType, InputType, KeyEvent, Modifiers};
pub use map::Map;
pub use result::HandleEventResult;
pub use settings::EditSettings;
pub use shapes::{Shape, ShapeType};
pub use snap::{GRID_SIZE, SnapMode, SnapResult, SnapTarget, SnapTargetKind, snap_point, snap_to_grid};
pub use style::{EditHandleStyles, IconStyle, ShapeStyle};
pub use view::{Cursor, View};
