//! Stepped-DDA raycasting against `World` voxel occupancy.

use crate::world::World;
use glam::Vec3;

/// Step size in world units between successive samples along the ray.
const STEP: f32 = 0.01;

/// Result of a successful raycast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    /// World-space integer coordinate of the first non-air voxel hit.
    pub block_pos: (i32, i32, i32),
    /// The empty cell immediately before the hit, along the ray — the
    /// natural placement target for a "place block" action.
    pub previous_voxel: (i32, i32, i32),
    /// Distance travelled from `origin` to the hit, in world units.
    pub distance: f32,
    /// The exact point in space where the ray entered the hit voxel.
    pub hit_pos: Vec3,
}

/// March from `origin` along `direction` (need not be normalized) in fixed
/// `STEP`-sized increments, returning the first non-air voxel encountered
/// within `max_distance`, or `None` if nothing was hit.
pub fn cast(world: &World, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RaycastHit> {
    let dir = direction.normalize_or_zero();
    if dir == Vec3::ZERO {
        return None;
    }

    let mut travelled = 0.0f32;
    let mut previous = floor_voxel(origin);

    while travelled <= max_distance {
        let point = origin + dir * travelled;
        let voxel = floor_voxel(point);

        if world.voxel_at(voxel.0, voxel.1, voxel.2) != crate::chunk::BLOCK_AIR {
            return Some(RaycastHit {
                block_pos: voxel,
                previous_voxel: previous,
                distance: travelled,
                hit_pos: point,
            });
        }

        previous = voxel;
        travelled += STEP;
    }

    None
}

fn floor_voxel(p: Vec3) -> (i32, i32, i32) {
    (p.x.floor() as i32, p.y.floor() as i32, p.z.floor() as i32)
}
