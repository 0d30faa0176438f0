//! Features and the layers that hold them.

use crate::shapes::Shape;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

/// Unique identifier of a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FeatureId(pub Uuid);

impl FeatureId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for FeatureId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Unique identifier of a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayerId(pub Uuid);

impl LayerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A shape with identity and free-form properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub id: FeatureId,
    pub shape: Shape,
    #[serde(default)]
    pub properties: serde_json::Map<String, serde_json::Value>,
}

impl Feature {
    pub fn new(shape: Shape) -> Self {
        Self {
            id: FeatureId::new(),
            shape,
            properties: serde_json::Map::new(),
        }
    }

    pub fn with_properties(mut self, properties: serde_json::Map<String, serde_json::Value>) -> Self {
        self.properties = properties;
        self
    }
}

/// Ordered collection of features with interaction flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureLayer {
    pub id: LayerId,
    pub name: String,
    pub editable: bool,
    pub visible: bool,
    pub selectable: bool,
    pub hoverable: bool,
    features: HashMap<FeatureId, Feature>,
    /// Z-order of features (back to front).
    z_order: Vec<FeatureId>,
}

impl FeatureLayer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: LayerId::new(),
            name: name.into(),
            editable: true,
            visible: true,
            selectable: true,
            hoverable: true,
            features: HashMap::new(),
            z_order: Vec::new(),
        }
    }

    pub fn with_editable(mut self, editable: bool) -> Self {
        self.editable = editable;
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn with_selectable(mut self, selectable: bool) -> Self {
        self.selectable = selectable;
        self
    }

    pub fn with_hoverable(mut self, hoverable: bool) -> Self {
        self.hoverable = hoverable;
        self
    }

    /// Add a feature on top. Returns the replaced feature if the id existed.
    pub fn add(&mut self, feature: Feature) -> Option<Feature> {
        let id = feature.id;
        self.z_order.retain(|&other| other != id);
        self.z_order.push(id);
        self.features.insert(id, feature)
    }

    /// Insert or replace a feature, keeping its z-order position.
    pub fn put(&mut self, feature: Feature) -> Option<Feature> {
        let id = feature.id;
        if !self.features.contains_key(&id) {
            self.z_order.push(id);
        }
        self.features.insert(id, feature)
    }

    pub fn get(&self, id: FeatureId) -> Option<&Feature> {
        self.features.get(&id)
    }

    pub fn contains(&self, id: FeatureId) -> bool {
        self.features.contains_key(&id)
    }

    pub fn remove(&mut self, id: FeatureId) -> Option<Feature> {
        self.z_order.retain(|&other| other != id);
        self.features.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Features in z-order (back to front).
    pub fn features(&self) -> impl DoubleEndedIterator<Item = &Feature> {
        self.z_order.iter().filter_map(|id| self.features.get(id))
    }

    /// Features hit at a model point, topmost first.
    pub fn features_at(&self, point: Point, tolerance: f64) -> Vec<&Feature> {
        self.features()
            .rev()
            .filter(|f| f.shape.hit_test(point, tolerance))
            .collect()
    }
}
