//! Axis-aligned bounds of transformed cubes, used to recenter group pivots.
use glam::{Mat3, Quat, Vec3};

use crate::scatter::planner::Placement;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        let half = half_extents.abs();
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// World bounds of a cube with `half_extents` after `placement` is applied.
    pub fn of_cube(half_extents: Vec3, placement: &Placement) -> Self {
        Self::of_transformed(
            half_extents,
            placement.position,
            placement.rotation(),
            placement.scale(),
        )
    }

    /// Bounds of a box with `half_extents` scaled, rotated, then translated.
    pub fn of_transformed(
        half_extents: Vec3,
        translation: Vec3,
        rotation: Quat,
        scale: Vec3,
    ) -> Self {
        let rotation = Mat3::from_quat(rotation);
        let scaled = half_extents.abs() * scale.abs();
        // Element-wise |R| * h gives the extent along each world axis.
        let abs = Mat3::from_cols(
            rotation.x_axis.abs(),
            rotation.y_axis.abs(),
            rotation.z_axis.abs(),
        );
        Self::from_center_half_extents(translation, abs * scaled)
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn contains_point(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// Union of all boxes, or `None` for an empty iterator.
    pub fn union_all<I: IntoIterator<Item = Aabb>>(boxes: I) -> Option<Aabb> {
        boxes.into_iter().reduce(|acc, b| acc.union(&b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn unrotated_cube_scales_about_its_position() {
        let p = Placement::new(Vec3::new(1.0, 2.0, 3.0), Vec3::ZERO, 2.0);
        let b = Aabb::of_cube(Vec3::splat(0.5), &p);
        assert!(approx(b.min, Vec3::new(0.0, 1.0, 2.0)));
        assert!(approx(b.max, Vec3::new(2.0, 3.0, 4.0)));
        assert!(approx(b.center(), p.position));
    }

    #[test]
    fn rotated_cube_grows_bounds() {
        let p = Placement::new(Vec3::ZERO, Vec3::new(0.0, 45.0, 0.0), 1.0);
        let b = Aabb::of_cube(Vec3::splat(0.5), &p);
        let diag = std::f32::consts::FRAC_1_SQRT_2;
        assert!(approx(b.max, Vec3::new(diag, 0.5, diag)));
        assert!(approx(b.min, -b.max));
    }

    #[test]
    fn non_uniform_scale_follows_rotation() {
        let rotation = Quat::from_rotation_z(std::f32::consts::FRAC_PI_2);
        let b = Aabb::of_transformed(
            Vec3::splat(0.5),
            Vec3::new(0.0, 0.0, 3.0),
            rotation,
            Vec3::new(2.0, 1.0, 1.0),
        );
        assert!(approx(b.max, Vec3::new(0.5, 1.0, 3.5)));
        assert!(approx(b.min, Vec3::new(-0.5, -1.0, 2.5)));
    }

    #[test]
    fn union_all_covers_every_box() {
        let boxes = [
            Aabb::new(Vec3::ZERO, Vec3::ONE),
            Aabb::new(Vec3::splat(-2.0), Vec3::splat(-1.0)),
        ];
        let u = Aabb::union_all(boxes).expect("non-empty");
        assert_eq!(u.min, Vec3::splat(-2.0));
        assert_eq!(u.max, Vec3::ONE);
        assert!(approx(u.center(), Vec3::splat(-0.5)));
        assert!(u.contains_point(Vec3::splat(0.5)));
        assert!(Aabb::union_all(std::iter::empty()).is_none());
    }

    #[test]
    fn new_orders_corners() {
        let b = Aabb::new(Vec3::ONE, Vec3::ZERO);
        assert_eq!(b.min, Vec3::ZERO);
        assert_eq!(b.size(), Vec3::ONE);
    }
}
