//! Raycast targeting of world pickups.

use crate::ItemPickup;
use gridwalk_common::{Camera, Ray, ray_sphere};

/// Ray from the eye along the normalized look direction.
pub fn view_ray(camera: &Camera) -> Ray {
    Ray::new(camera.position, camera.view_vector())
}

/// Indices (list order) of every pickup whose sphere the view ray hits
/// closer than `reach`.
pub fn targeted(camera: &Camera, pickups: &[ItemPickup], radius: f32, reach: f32) -> Vec<usize> {
    let ray = view_ray(camera);
    pickups
        .iter()
        .enumerate()
        .filter(|(_, pickup)| {
            ray_sphere(&ray, pickup.position, radius).is_some_and(|hit| hit.distance < reach)
        })
        .map(|(i, _)| i)
        .collect()
}
