use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle on the XZ plane (`x`/`y` is the minimum corner).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn max(&self) -> Vec2 {
        Vec2::new(self.x + self.width, self.y + self.height)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// A ray with a unit-length direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Build a ray, normalizing `direction`. A zero direction stays zero and
    /// never hits anything.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    pub fn at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }
}

/// Result of a successful ray query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Distance from the ray origin along its direction.
    pub distance: f32,
    pub point: Vec3,
    pub normal: Vec3,
}

/// Intersect `ray` with a sphere. Returns the nearest hit in front of the
/// origin; when the origin is inside the sphere the exit point is returned.
pub fn ray_sphere(ray: &Ray, center: Vec3, radius: f32) -> Option<RayHit> {
    if ray.direction == Vec3::ZERO {
        return None;
    }

    let to_center = center - ray.origin;
    let projection = to_center.dot(ray.direction);
    let dist_sq = to_center.length_squared();
    let discriminant = radius * radius - (dist_sq - projection * projection);
    if discriminant < 0.0 {
        return None;
    }

    let half_chord = discriminant.sqrt();
    let inside = dist_sq < radius * radius;
    let distance = if inside {
        projection + half_chord
    } else {
        projection - half_chord
    };
    if distance < 0.0 {
        return None;
    }

    let point = ray.at(distance);
    let outward = (point - center).normalize_or_zero();
    Some(RayHit {
        distance,
        point,
        normal: if inside { -outward } else { outward },
    })
}

/// True if a circle overlaps (or touches) a rectangle.
pub fn circle_rect_overlap(center: Vec2, radius: f32, rect: Rect) -> bool {
    let closest = center.clamp(rect.min(), rect.max());
    center.distance_squared(closest) <= radius * radius
}

/// Rotate `v` around `axis` by `angle` radians (right-handed).
pub fn rotate_about_axis(v: Vec3, axis: Vec3, angle: f32) -> Vec3 {
    let axis = axis.normalize_or_zero();
    if axis == Vec3::ZERO {
        return v;
    }
    Quat::from_axis_angle(axis, angle) * v
}
