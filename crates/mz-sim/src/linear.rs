//! `LinearMover`: a reference engine that moves each group along a fixed
//! polyline at constant speed.
//!
//! A group is a rigid body `length` blocks long whose front sits `head`
//! blocks along its track.  Each tick it plans a straight segment from the
//! front to the point `speed` blocks further on, and moves by whatever the
//! tick loop allows.  It stops for good at the end of its track.

use mz_core::{BlockPos, GroupId, Vec3, WorldId};
use mz_spatial::Segment;

use crate::{Decision, Mover, SimError, SimResult};

/// Occupancy is sampled this far behind the front, so a group stopped
/// exactly on a region face is not counted as inside it.
const OCCUPANCY_EPSILON: f64 = 1e-3;

/// A polyline with cumulative distances.
#[derive(Clone, Debug)]
pub struct Track {
    points: Vec<Vec3>,
    cumulative: Vec<f64>,
}

impl Track {
    /// Fails on fewer than two points.
    pub fn new(points: Vec<Vec3>) -> SimResult<Self> {
        if points.len() < 2 {
            return Err(SimError::Config(format!("track needs at least two points, got {}", points.len())));
        }
        let mut cumulative = Vec::with_capacity(points.len());
        let mut total = 0.0;
        cumulative.push(0.0);
        for w in points.windows(2) {
            total += w[0].distance(w[1]);
            cumulative.push(total);
        }
        Ok(Self { points, cumulative })
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// Point `distance` along the track, clamped to its ends.
    pub fn point_at(&self, distance: f64) -> Vec3 {
        let d = distance.clamp(0.0, self.length());
        let i = self.cumulative.partition_point(|&c| c <= d).clamp(1, self.points.len() - 1);
        let (a, b) = (self.points[i - 1], self.points[i]);
        let span = self.cumulative[i] - self.cumulative[i - 1];
        if span <= 0.0 {
            return a;
        }
        a + (b - a) * ((d - self.cumulative[i - 1]) / span)
    }
}

#[derive(Clone, Debug)]
struct Body {
    track: Track,
    world: WorldId,
    head: f64,
    speed: f64,
    length: f64,
}

#[derive(Default)]
pub struct LinearMover {
    bodies: Vec<Body>,
}

impl LinearMover {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the next group.  Groups must be added in `GroupId` order.
    pub fn add_group(&mut self, track: Track, speed: f64, length: f64) -> GroupId {
        self.add_group_in(WorldId(0), track, speed, length)
    }

    pub fn add_group_in(&mut self, world: WorldId, track: Track, speed: f64, length: f64) -> GroupId {
        self.bodies.push(Body { track, world, head: 0.0, speed: speed.max(0.0), length: length.max(0.0) });
        GroupId((self.bodies.len() - 1) as u32)
    }

    /// Distance the group's front has covered along its track.
    pub fn head(&self, group: GroupId) -> f64 {
        self.bodies.get(group.index()).map_or(0.0, |b| b.head)
    }

    pub fn set_speed(&mut self, group: GroupId, speed: f64) {
        if let Some(b) = self.bodies.get_mut(group.index()) {
            b.speed = speed.max(0.0);
        }
    }

    pub fn is_finished(&self, group: GroupId) -> bool {
        self.bodies.get(group.index()).is_none_or(|b| b.head >= b.track.length())
    }
}

impl Mover for LinearMover {
    fn group_count(&self) -> usize {
        self.bodies.len()
    }

    fn world(&self, group: GroupId) -> WorldId {
        self.bodies.get(group.index()).map_or(WorldId(0), |b| b.world)
    }

    fn current_position(&self, group: GroupId) -> Vec3 {
        self.bodies.get(group.index()).map_or(Vec3::ZERO, |b| b.track.point_at(b.head))
    }

    fn planned_segment(&self, group: GroupId) -> Option<Segment> {
        let b = self.bodies.get(group.index())?;
        if b.speed <= 0.0 || b.head >= b.track.length() {
            return None;
        }
        let end = (b.head + b.speed).min(b.track.length());
        Some(Segment::new(b.track.point_at(b.head), b.track.point_at(end)))
    }

    fn occupied_cells(&self, group: GroupId) -> Vec<BlockPos> {
        let Some(b) = self.bodies.get(group.index()) else {
            return Vec::new();
        };
        let front = (b.head - OCCUPANCY_EPSILON).max(0.0);
        let mut cells: Vec<BlockPos> = Vec::new();
        let steps = b.length.ceil() as usize;
        for k in 0..=steps {
            let d = (front - k as f64).max(front - b.length).max(0.0);
            let cell = BlockPos::containing(b.track.point_at(d));
            if !cells.contains(&cell) {
                cells.push(cell);
            }
        }
        cells
    }

    fn apply(&mut self, group: GroupId, decision: Decision) {
        let Some(b) = self.bodies.get_mut(group.index()) else {
            return;
        };
        let end = (b.head + b.speed).min(b.track.length());
        let planned = b.track.point_at(b.head).distance(b.track.point_at(end));
        // The segment is a chord; travel is measured along the track.
        let allowed = decision.allowed(planned);
        let ratio = if planned > 0.0 { allowed / planned } else { 0.0 };
        b.head += (end - b.head) * ratio;
    }
}
