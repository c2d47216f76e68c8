// Discrete ray/voxel traversal (Amanatides & Woo).
//
// Enumerates, in ray order, every voxel a ray passes through, handing each
// one to a caller-supplied visitor that decides whether to keep going. This
// is the shared primitive under collision sweeps; it knows nothing about the
// grid, so visiting voxels outside it is the visitor's business.
//
// Two invariants matter to callers:
// - Ties are broken X, then Z, then Y. When the ray leaves a voxel through
//   an edge or corner, the face on the higher-priority axis is crossed first.
//   Collision results depend on this, so it must never change.
// - At most `MAX_TRAVERSAL_STEPS` voxels are visited. Running out is not an
//   error; callers that need to know whether the end was reached check the
//   returned `TraversalEnd`.
//
// An axis whose direction component is exactly zero never crosses a face
// (`t_max` and `t_delta` stay infinite), so a zero-length direction visits
// only the start voxel.

use crate::types::{Axis, VoxelCoord};
use cgmath::{Point3, Vector3};

/// Hard cap on the number of voxels visited by one traversal.
pub const MAX_TRAVERSAL_STEPS: usize = 100;

/// One voxel visited by a traversal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VoxelStep {
    pub voxel: VoxelCoord,
    /// Ray parameter at which the ray entered this voxel (0 for the start).
    pub t: f32,
    /// The axis whose face was crossed to enter this voxel. `None` for the
    /// start voxel.
    pub entered_via: Option<Axis>,
}

/// Why a traversal ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TraversalEnd {
    /// The visitor returned `false`.
    Stopped,
    /// A bounded segment arrived at its destination voxel (which is not
    /// visited).
    Reached,
    /// The step cap was hit, the ray cannot leave its current voxel, or the
    /// next voxel coordinate does not fit in `i32`.
    Exhausted,
}

/// Walk the voxels along `direction` from `start`, calling `visitor` on each
/// until it returns `false` or the step cap is reached.
pub fn traverse<F>(start: Point3<f32>, direction: Vector3<f32>, mut visitor: F) -> TraversalEnd
where
    F: FnMut(VoxelStep) -> bool,
{
    let mut voxel = VoxelCoord::containing(start);

    // Step direction (+1 or -1) and tMax/tDelta for each axis.
    let mut step = [0i32; 3];
    let mut t_max = [f32::INFINITY; 3];
    let mut t_delta = [f32::INFINITY; 3];

    for axis in Axis::ALL {
        let i = axis.index();
        let d = direction[i];
        let cell = voxel.get(axis) as f32;
        if d > 0.0 {
            step[i] = 1;
            t_delta[i] = 1.0 / d;
            t_max[i] = ((cell + 1.0) - start[i]) / d;
        } else if d < 0.0 {
            step[i] = -1;
            t_delta[i] = 1.0 / -d;
            t_max[i] = (start[i] - cell) / -d;
        }
        // If d == 0, step/t_max/t_delta stay at 0/INF/INF; the axis never advances.
    }

    let mut current = VoxelStep {
        voxel,
        t: 0.0,
        entered_via: None,
    };

    for _ in 0..MAX_TRAVERSAL_STEPS {
        if !visitor(current) {
            return TraversalEnd::Stopped;
        }

        // Smallest t_max wins; strict `<` keeps the earlier axis in
        // TRAVERSAL_PRIORITY on ties.
        let mut next = Axis::TRAVERSAL_PRIORITY[0];
        for axis in &Axis::TRAVERSAL_PRIORITY[1..] {
            if t_max[axis.index()] < t_max[next.index()] {
                next = *axis;
            }
        }
        let i = next.index();
        if !t_max[i].is_finite() {
            return TraversalEnd::Exhausted;
        }

        // Coordinates that saturated to the edge of `i32` cannot step further.
        let Some(moved) = voxel.offset(next, step[i]) else {
            return TraversalEnd::Exhausted;
        };
        voxel = moved;
        current = VoxelStep {
            voxel,
            t: t_max[i],
            entered_via: Some(next),
        };
        t_max[i] += t_delta[i];
    }

    TraversalEnd::Exhausted
}

/// Walk the voxels on the segment from `start` to `end`, visiting the start
/// voxel through the voxel just before `floor(end)`. The destination voxel
/// itself is never visited; its occupancy is the caller's concern.
pub fn trace_segment<F>(start: Point3<f32>, end: Point3<f32>, mut visitor: F) -> TraversalEnd
where
    F: FnMut(VoxelStep) -> bool,
{
    let end_voxel = VoxelCoord::containing(end);
    let mut reached = false;
    let result = traverse(start, end - start, |step| {
        if step.voxel == end_voxel {
            reached = true;
            return false;
        }
        visitor(step)
    });
    if reached {
        TraversalEnd::Reached
    } else {
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(start: Point3<f32>, dir: Vector3<f32>) -> (Vec<VoxelCoord>, TraversalEnd) {
        let mut seen = Vec::new();
        let end = traverse(start, dir, |s| {
            seen.push(s.voxel);
            true
        });
        (seen, end)
    }

    #[test]
    fn straight_ray_visits_consecutive_voxels() {
        let mut seen = Vec::new();
        traverse(Point3::new(0.5, 0.5, 0.5), Vector3::new(1.0, 0.0, 0.0), |s| {
            seen.push(s.voxel);
            seen.len() < 4
        });
        assert_eq!(
            seen,
            vec![
                VoxelCoord::new(0, 0, 0),
                VoxelCoord::new(1, 0, 0),
                VoxelCoord::new(2, 0, 0),
                VoxelCoord::new(3, 0, 0),
            ]
        );
    }

    #[test]
    fn negative_direction_steps_down() {
        let mut seen = Vec::new();
        let end = traverse(Point3::new(2.5, 3.5, 0.5), Vector3::new(0.0, -1.0, 0.0), |s| {
            seen.push(s.voxel);
            s.voxel.y > 0
        });
        assert_eq!(end, TraversalEnd::Stopped);
        assert_eq!(seen.len(), 4);
        assert_eq!(seen[3], VoxelCoord::new(2, 0, 0));
    }

    #[test]
    fn corner_crossing_breaks_ties_x_then_z_then_y() {
        let mut steps = Vec::new();
        traverse(Point3::new(0.5, 0.5, 0.5), Vector3::new(1.0, 1.0, 1.0), |s| {
            steps.push(s);
            steps.len() < 4
        });
        let voxels: Vec<_> = steps.iter().map(|s| s.voxel).collect();
        assert_eq!(
            voxels,
            vec![
                VoxelCoord::new(0, 0, 0),
                VoxelCoord::new(1, 0, 0),
                VoxelCoord::new(1, 0, 1),
                VoxelCoord::new(1, 1, 1),
            ]
        );
        let faces: Vec<_> = steps.iter().map(|s| s.entered_via).collect();
        assert_eq!(faces, vec![None, Some(Axis::X), Some(Axis::Z), Some(Axis::Y)]);
        // All three faces are crossed at the same parameter.
        assert_eq!(steps[1].t, 0.5);
        assert_eq!(steps[3].t, 0.5);
    }

    #[test]
    fn z_beats_y_on_tie_without_x() {
        let (seen, _) = collect(Point3::new(0.5, 0.5, 0.5), Vector3::new(0.0, 1.0, 1.0));
        assert_eq!(seen[1], VoxelCoord::new(0, 0, 1));
        assert_eq!(seen[2], VoxelCoord::new(0, 1, 1));
    }

    #[test]
    fn identical_inputs_visit_identical_sequences() {
        let start = Point3::new(3.2, 1.7, 9.9);
        let dir = Vector3::new(-0.3, 0.45, -1.1);
        assert_eq!(collect(start, dir), collect(start, dir));
    }

    #[test]
    fn zero_direction_visits_start_once() {
        let (seen, end) = collect(Point3::new(1.5, 1.5, 1.5), Vector3::new(0.0, 0.0, 0.0));
        assert_eq!(seen, vec![VoxelCoord::new(1, 1, 1)]);
        assert_eq!(end, TraversalEnd::Exhausted);
    }

    #[test]
    fn near_zero_component_still_terminates_within_cap() {
        let (seen, end) = collect(
            Point3::new(0.5, 0.5, 0.5),
            Vector3::new(1.0, 1e-30, 0.0),
        );
        assert_eq!(end, TraversalEnd::Exhausted);
        assert_eq!(seen.len(), MAX_TRAVERSAL_STEPS);
        // The tiny y component never gets to cross a face.
        assert!(seen.iter().all(|v| v.y == 0));
    }

    #[test]
    fn huge_start_coordinate_ends_without_overflow() {
        // 3e9 saturates to i32::MAX, so the first +x step has nowhere to go.
        let (seen, end) = collect(Point3::new(3.0e9, 0.5, 0.5), Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(end, TraversalEnd::Exhausted);
        assert_eq!(seen, vec![VoxelCoord::new(i32::MAX, 0, 0)]);

        let (seen, end) = collect(Point3::new(0.5, -3.0e9, 0.5), Vector3::new(0.0, -1.0, 0.0));
        assert_eq!(end, TraversalEnd::Exhausted);
        assert_eq!(seen.len(), 1);
    }

    #[test]
    fn segment_stops_before_destination_voxel() {
        let mut seen = Vec::new();
        let end = trace_segment(Point3::new(0.5, 0.5, 0.5), Point3::new(3.5, 0.5, 0.5), |s| {
            seen.push(s.voxel);
            true
        });
        assert_eq!(end, TraversalEnd::Reached);
        assert_eq!(
            seen,
            vec![
                VoxelCoord::new(0, 0, 0),
                VoxelCoord::new(1, 0, 0),
                VoxelCoord::new(2, 0, 0),
            ]
        );
    }

    #[test]
    fn segment_within_one_voxel_visits_nothing() {
        let mut visits = 0;
        let end = trace_segment(Point3::new(0.2, 0.2, 0.2), Point3::new(0.8, 0.9, 0.1), |_| {
            visits += 1;
            true
        });
        assert_eq!(end, TraversalEnd::Reached);
        assert_eq!(visits, 0);
    }

    #[test]
    fn segment_visitor_can_stop_early() {
        let end = trace_segment(Point3::new(0.5, 0.5, 0.5), Point3::new(5.5, 0.5, 0.5), |s| {
            s.voxel.x < 2
        });
        assert_eq!(end, TraversalEnd::Stopped);
    }
}
