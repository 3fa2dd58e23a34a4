//! Interactive editing of custom-curve control points.
//!
//! Points carry a [`PointId`] that survives re-sorting, so a drag keeps
//! addressing the same point even when it crosses a neighbour.

use crate::curve::{ControlPoint, IntensityCurve};

pub const DEFAULT_SNAP_RADIUS: f64 = 20.0;
pub const MIN_POINT_X: f64 = 1.0;
pub const MAX_POINT_X: f64 = 99.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointId(u64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditorPoint {
    pub id: PointId,
    pub point: ControlPoint,
}

/// What a press on the canvas did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Inserted(PointId),
    /// The press landed near an existing point, which is now being dragged.
    Grabbed(PointId),
}

impl AddOutcome {
    pub fn id(self) -> PointId {
        match self {
            AddOutcome::Inserted(id) | AddOutcome::Grabbed(id) => id,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PointEditor {
    points: Vec<EditorPoint>,
    next_id: u64,
    snap_radius: f64,
    active: Option<PointId>,
    dragging: bool,
}

impl Default for PointEditor {
    fn default() -> Self {
        Self::new(DEFAULT_SNAP_RADIUS)
    }
}

impl PointEditor {
    pub fn new(snap_radius: f64) -> Self {
        Self {
            points: Vec::new(),
            next_id: 0,
            snap_radius,
            active: None,
            dragging: false,
        }
    }

    pub fn from_points(points: impl IntoIterator<Item = ControlPoint>, snap_radius: f64) -> Self {
        let mut editor = Self::new(snap_radius);
        for point in points {
            let id = editor.allocate_id();
            editor.points.push(EditorPoint {
                id,
                point: clamp_point(point),
            });
        }
        editor.sort();
        editor
    }

    pub fn from_curve(curve: &IntensityCurve, snap_radius: f64) -> Self {
        Self::from_points(curve.control_points.iter().flatten().copied(), snap_radius)
    }

    pub fn entries(&self) -> &[EditorPoint] {
        &self.points
    }

    /// Control points in ascending x order.
    pub fn points(&self) -> Vec<ControlPoint> {
        self.points.iter().map(|entry| entry.point).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, id: PointId) -> Option<ControlPoint> {
        self.points.iter().find(|entry| entry.id == id).map(|entry| entry.point)
    }

    pub fn position(&self, id: PointId) -> Option<usize> {
        self.points.iter().position(|entry| entry.id == id)
    }

    pub fn id_at(&self, index: usize) -> Option<PointId> {
        self.points.get(index).map(|entry| entry.id)
    }

    pub fn active(&self) -> Option<PointId> {
        self.active
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Nearest point within the snap radius of `coord`.
    pub fn hit_test(&self, coord: ControlPoint) -> Option<PointId> {
        self.points
            .iter()
            .map(|entry| (entry.id, entry.point.distance(&coord)))
            .filter(|(_, distance)| *distance <= self.snap_radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    pub fn add_point(&mut self, coord: ControlPoint) -> AddOutcome {
        if let Some(id) = self.hit_test(coord) {
            self.active = Some(id);
            self.dragging = true;
            return AddOutcome::Grabbed(id);
        }

        let id = self.allocate_id();
        self.points.push(EditorPoint {
            id,
            point: clamp_point(coord),
        });
        self.sort();
        self.active = Some(id);
        self.dragging = true;
        AddOutcome::Inserted(id)
    }

    /// Moves `id` to `coord`. Returns false when the id is unknown.
    pub fn move_point(&mut self, id: PointId, coord: ControlPoint) -> bool {
        let Some(entry) = self.points.iter_mut().find(|entry| entry.id == id) else {
            return false;
        };
        entry.point = clamp_point(coord);
        self.sort();
        true
    }

    /// Moves the active point while a drag is in progress.
    pub fn drag_to(&mut self, coord: ControlPoint) -> bool {
        match (self.dragging, self.active) {
            (true, Some(id)) => self.move_point(id, coord),
            _ => false,
        }
    }

    pub fn delete_point(&mut self, id: PointId) -> Option<ControlPoint> {
        let index = self.position(id)?;
        if self.active == Some(id) {
            self.active = None;
            self.dragging = false;
        }
        Some(self.points.remove(index).point)
    }

    pub fn delete_at(&mut self, index: usize) -> Option<ControlPoint> {
        let id = self.id_at(index)?;
        self.delete_point(id)
    }

    pub fn end_drag(&mut self) {
        self.dragging = false;
    }

    /// Writes the points back into a copy of `curve`.
    pub fn apply_to(&self, curve: &IntensityCurve) -> IntensityCurve {
        IntensityCurve {
            control_points: Some(self.points()),
            ..curve.clone()
        }
    }

    fn allocate_id(&mut self) -> PointId {
        let id = PointId(self.next_id);
        self.next_id += 1;
        id
    }

    fn sort(&mut self) {
        self.points.sort_by(|a, b| a.point.x.total_cmp(&b.point.x));
    }
}

pub fn clamp_point(point: ControlPoint) -> ControlPoint {
    let x = if point.x.is_nan() { MIN_POINT_X } else { point.x };
    let y = if point.y.is_nan() { 0.0 } else { point.y };
    ControlPoint::new(x.clamp(MIN_POINT_X, MAX_POINT_X), y.clamp(0.0, 100.0))
}
