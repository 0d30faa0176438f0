//! View state shared by every controller: camera, layers, selection, hover.

use crate::camera::Camera;
use crate::error::{EditError, EditResult};
use crate::feature::{Feature, FeatureId, FeatureLayer, LayerId};
use crate::snap::SnapTarget;
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// CSS-style cursor requested by a handle or controller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cursor {
    Default,
    Pointer,
    Grab,
    Grabbing,
    Move,
    Crosshair,
    Custom(String),
}

impl Cursor {
    pub fn as_str(&self) -> &str {
        match self {
            Cursor::Default => "default",
            Cursor::Pointer => "pointer",
            Cursor::Grab => "grab",
            Cursor::Grabbing => "grabbing",
            Cursor::Move => "move",
            Cursor::Crosshair => "crosshair",
            Cursor::Custom(name) => name,
        }
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which painted parts of a feature a pick considers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaintRepresentation {
    /// The shape itself.
    Body,
    /// The label drawn at the shape's focus point.
    Label,
}

/// A feature found under a view point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PickInfo {
    pub layer: LayerId,
    pub feature: FeatureId,
    pub representation: PaintRepresentation,
}

/// How a pick result modifies the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionType {
    /// Replace the selection.
    New,
    Add,
    Remove,
    Toggle,
}

/// Menu opened at a view point for the picked features.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextMenu {
    pub view_point: Point,
    pub items: Vec<PickInfo>,
}

/// Everything a controller reads or modifies besides itself.
#[derive(Debug, Default)]
pub struct View {
    pub camera: Camera,
    pub viewport: Size,
    /// Layers from bottom to top.
    layers: Vec<FeatureLayer>,
    selection: HashMap<LayerId, HashSet<FeatureId>>,
    hovered: Vec<PickInfo>,
    /// Features drawn by an active controller instead of their layer.
    hidden: HashSet<FeatureId>,
    cursor: Option<Cursor>,
    context_menu: Option<ContextMenu>,
}

impl View {
    pub fn new(viewport: Size) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    /// Add a layer on top.
    pub fn add_layer(&mut self, layer: FeatureLayer) -> LayerId {
        let id = layer.id;
        self.layers.push(layer);
        id
    }

    pub fn remove_layer(&mut self, id: LayerId) -> Option<FeatureLayer> {
        let index = self.layers.iter().position(|l| l.id == id)?;
        self.selection.remove(&id);
        self.hovered.retain(|p| p.layer != id);
        Some(self.layers.remove(index))
    }

    pub fn layers(&self) -> &[FeatureLayer] {
        &self.layers
    }

    pub fn layer(&self, id: LayerId) -> EditResult<&FeatureLayer> {
        self.layers
            .iter()
            .find(|l| l.id == id)
            .ok_or_else(|| EditError::UnknownLayer(id.to_string()))
    }

    pub fn layer_mut(&mut self, id: LayerId) -> EditResult<&mut FeatureLayer> {
        self.layers
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| EditError::UnknownLayer(id.to_string()))
    }

    /// Topmost layer that is both visible and editable.
    pub fn top_editable_layer(&self) -> Option<LayerId> {
        self.layers
            .iter()
            .rev()
            .find(|l| l.visible && l.editable)
            .map(|l| l.id)
    }

    pub fn feature(&self, layer: LayerId, id: FeatureId) -> Option<&Feature> {
        self.layer(layer).ok().and_then(|l| l.get(id))
    }

    // --- Selection ---

    pub fn selection(&self, layer: LayerId) -> impl Iterator<Item = FeatureId> + '_ {
        self.selection.get(&layer).into_iter().flatten().copied()
    }

    pub fn is_selected(&self, layer: LayerId, id: FeatureId) -> bool {
        self.selection.get(&layer).is_some_and(|s| s.contains(&id))
    }

    pub fn selection_count(&self) -> usize {
        self.selection.values().map(HashSet::len).sum()
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Apply picked features to the selection.
    pub fn select(&mut self, picks: &[PickInfo], selection_type: SelectionType) {
        if selection_type == SelectionType::New {
            self.selection.clear();
        }
        for pick in picks {
            let set = self.selection.entry(pick.layer).or_default();
            match selection_type {
                SelectionType::New | SelectionType::Add => {
                    set.insert(pick.feature);
                }
                SelectionType::Remove => {
                    set.remove(&pick.feature);
                }
                SelectionType::Toggle => {
                    if !set.remove(&pick.feature) {
                        set.insert(pick.feature);
                    }
                }
            }
        }
        self.selection.retain(|_, set| !set.is_empty());
        log::debug!(
            "Selection {:?} of {} picks, {} selected",
            selection_type,
            picks.len(),
            self.selection_count()
        );
    }

    // --- Hover ---

    pub fn hovered(&self) -> &[PickInfo] {
        &self.hovered
    }

    /// Replace the hover set. Returns true if it changed.
    pub fn set_hovered(&mut self, picks: Vec<PickInfo>) -> bool {
        if self.hovered == picks {
            return false;
        }
        self.hovered = picks;
        true
    }

    // --- Cursor and menu ---

    pub fn cursor(&self) -> Option<&Cursor> {
        self.cursor.as_ref()
    }

    pub fn set_cursor(&mut self, cursor: Option<Cursor>) {
        self.cursor = cursor;
    }

    pub fn context_menu(&self) -> Option<&ContextMenu> {
        self.context_menu.as_ref()
    }

    pub fn open_context_menu(&mut self, menu: ContextMenu) {
        self.context_menu = Some(menu);
    }

    pub fn close_context_menu(&mut self) -> Option<ContextMenu> {
        self.context_menu.take()
    }

    // --- Drawing support ---

    pub fn set_feature_hidden(&mut self, id: FeatureId, hidden: bool) {
        if hidden {
            self.hidden.insert(id);
        } else {
            self.hidden.remove(&id);
        }
    }

    pub fn is_feature_hidden(&self, id: FeatureId) -> bool {
        self.hidden.contains(&id)
    }

    // --- Picking and snapping ---

    /// Features under a view point, topmost layer and feature first.
    ///
    /// `sensitivity` is in view pixels. Only layers accepted by `filter` are
    /// searched. Unless `multiple` is set, at most one pick is returned.
    pub fn pick_at(
        &self,
        view_point: Point,
        sensitivity: f64,
        representations: &[PaintRepresentation],
        multiple: bool,
        filter: impl Fn(&FeatureLayer) -> bool,
    ) -> Vec<PickInfo> {
        let model_point = self.camera.view_to_model(view_point);
        let tolerance = self.camera.view_to_model_distance(sensitivity);
        let mut picks = Vec::new();

        for layer in self.layers.iter().rev().filter(|l| l.visible && filter(l)) {
            for feature in layer.features().rev() {
                let hit = representations.iter().copied().find(|r| match r {
                    PaintRepresentation::Body => feature.shape.hit_test(model_point, tolerance),
                    PaintRepresentation::Label => {
                        feature.shape.focus_point().distance(model_point) <= tolerance
                    }
                });
                if let Some(representation) = hit {
                    picks.push(PickInfo {
                        layer: layer.id,
                        feature: feature.id,
                        representation,
                    });
                    if !multiple {
                        return picks;
                    }
                }
            }
        }
        picks
    }

    /// Snap targets of every visible feature except `exclude`.
    pub fn snap_targets(&self, exclude: FeatureId) -> Vec<SnapTarget> {
        self.layers
            .iter()
            .filter(|l| l.visible)
            .flat_map(FeatureLayer::features)
            .filter(|f| f.id != exclude)
            .flat_map(|f| {
                let focus = SnapTarget::focus(f.shape.focus_point());
                f.shape
                    .control_points()
                    .into_iter()
                    .map(SnapTarget::vertex)
                    .chain(std::iter::once(focus))
            })
            .collect()
    }
}
