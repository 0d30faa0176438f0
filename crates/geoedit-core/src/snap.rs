//! Snapping of model points to the grid and to other features.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Default grid size in model units.
pub const GRID_SIZE: f64 = 20.0;

/// Snap mode for aligning points to grid or other features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SnapMode {
    /// No snapping.
    None,
    /// Snap to grid intersections.
    Grid,
    /// Snap to vertices and focus points of other features.
    #[default]
    Shapes,
    /// Shapes first, then grid.
    All,
}

impl SnapMode {
    /// Cycle to the next snap mode.
    pub fn next(self) -> Self {
        match self {
            SnapMode::None => SnapMode::Grid,
            SnapMode::Grid => SnapMode::Shapes,
            SnapMode::Shapes => SnapMode::All,
            SnapMode::All => SnapMode::None,
        }
    }

    pub fn snaps_to_grid(self) -> bool {
        matches!(self, SnapMode::Grid | SnapMode::All)
    }

    pub fn snaps_to_shapes(self) -> bool {
        matches!(self, SnapMode::Shapes | SnapMode::All)
    }

    pub fn is_enabled(self) -> bool {
        self != SnapMode::None
    }
}

/// Type of snap target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SnapTargetKind {
    /// Vertex or control point of a shape.
    Vertex,
    /// Focus (center) point of a shape.
    Focus,
    /// Grid intersection.
    Grid,
}

/// A point that can be snapped to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapTarget {
    pub point: Point,
    pub kind: SnapTargetKind,
}

impl SnapTarget {
    pub fn vertex(point: Point) -> Self {
        Self {
            point,
            kind: SnapTargetKind::Vertex,
        }
    }

    pub fn focus(point: Point) -> Self {
        Self {
            point,
            kind: SnapTargetKind::Focus,
        }
    }
}

/// Result of a snap operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapResult {
    /// The snapped point, or the input point when nothing was found.
    pub point: Point,
    /// What was snapped to.
    pub target: Option<SnapTargetKind>,
}

impl SnapResult {
    /// Create a result with no snapping.
    pub fn none(point: Point) -> Self {
        Self {
            point,
            target: None,
        }
    }

    pub fn is_snapped(&self) -> bool {
        self.target.is_some()
    }
}

/// Snap a point to the nearest grid intersection.
pub fn snap_to_grid(point: Point, grid_size: f64) -> SnapResult {
    if grid_size <= 0.0 {
        return SnapResult::none(point);
    }
    SnapResult {
        point: Point::new(
            (point.x / grid_size).round() * grid_size,
            (point.y / grid_size).round() * grid_size,
        ),
        target: Some(SnapTargetKind::Grid),
    }
}

/// Snap a point to the nearest target within `threshold`.
pub fn snap_to_targets(point: Point, targets: &[SnapTarget], threshold: f64) -> SnapResult {
    let mut best: Option<&SnapTarget> = None;
    let mut best_dist_sq = threshold * threshold;

    for target in targets {
        let dist_sq = (point - target.point).hypot2();
        if dist_sq <= best_dist_sq {
            best_dist_sq = dist_sq;
            best = Some(target);
        }
    }

    match best {
        Some(target) => SnapResult {
            point: target.point,
            target: Some(target.kind),
        },
        None => SnapResult::none(point),
    }
}

/// Snap a point according to `mode`. Absent targets yield the raw point.
pub fn snap_point(
    point: Point,
    mode: SnapMode,
    grid_size: f64,
    targets: &[SnapTarget],
    threshold: f64,
) -> SnapResult {
    match mode {
        SnapMode::None => SnapResult::none(point),
        SnapMode::Grid => snap_to_grid(point, grid_size),
        SnapMode::Shapes => snap_to_targets(point, targets, threshold),
        SnapMode::All => {
            let shape_result = snap_to_targets(point, targets, threshold);
            if shape_result.is_snapped() {
                shape_result
            } else {
                snap_to_grid(point, grid_size)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_mode_cycle() {
        assert_eq!(SnapMode::None.next(), SnapMode::Grid);
        assert_eq!(SnapMode::All.next(), SnapMode::None);
        assert!(SnapMode::All.snaps_to_grid());
        assert!(SnapMode::All.snaps_to_shapes());
        assert!(!SnapMode::None.is_enabled());
    }

    #[test]
    fn test_snap_to_grid() {
        let result = snap_to_grid(Point::new(23.0, 37.0), 20.0);
        assert!((result.point.x - 20.0).abs() < f64::EPSILON);
        assert!((result.point.y - 40.0).abs() < f64::EPSILON);
        assert_eq!(result.target, Some(SnapTargetKind::Grid));
    }

    #[test]
    fn test_snap_to_targets_picks_nearest() {
        let targets = [
            SnapTarget::vertex(Point::new(10.0, 0.0)),
            SnapTarget::focus(Point::new(3.0, 0.0)),
        ];
        let result = snap_to_targets(Point::new(1.0, 0.0), &targets, 20.0);
        assert_eq!(result.point, Point::new(3.0, 0.0));
        assert_eq!(result.target, Some(SnapTargetKind::Focus));
    }

    #[test]
    fn test_snap_outside_threshold_falls_back() {
        let targets = [SnapTarget::vertex(Point::new(100.0, 100.0))];
        let raw = Point::new(1.0, 1.0);
        let result = snap_point(raw, SnapMode::Shapes, GRID_SIZE, &targets, 5.0);
        assert!(!result.is_snapped());
        assert_eq!(result.point, raw);

        let result = snap_point(raw, SnapMode::All, GRID_SIZE, &targets, 5.0);
        assert_eq!(result.point, Point::ZERO);
    }
}
