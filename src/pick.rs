//! Object picking.
//!
//! Picking is done on the CPU: the pointer position is unprojected into a world
//! space ray which is then intersected with the triangles of the pickable
//! meshes, transformed by their current world [`Instance`]. Only the hero is
//! pickable, so a per-triangle test with a bounding sphere early-out is cheap
//! enough to run on every pointer move.
//!
//! Pickable objects are registered as [`Target`]s: a mesh plus the transform it
//! is drawn with. Children (the inner shell of the hero) are tested together with
//! their parent so that a hit on either counts as a hit on the object.

use cgmath::{InnerSpace, Matrix4, Vector2, Vector3, Vector4};

use crate::{
    camera::PerspectiveCamera,
    data_structures::{geometry::PolyMesh, instance::Instance},
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vector3<f32>,
    pub direction: Vector3<f32>,
}

impl Ray {
    pub fn new(origin: Vector3<f32>, direction: Vector3<f32>) -> Self {
        Self { origin, direction }
    }

    pub fn at(&self, t: f32) -> Vector3<f32> {
        self.origin + self.direction * t
    }

    /// Möller–Trumbore intersection. Triangles are hit from both sides, matching the
    /// double-sided wireframe material. Returns the distance along the ray.
    pub fn intersect_triangle(&self, [a, b, c]: [Vector3<f32>; 3]) -> Option<f32> {
        const EPSILON: f32 = 1.0e-7;
        let edge1 = b - a;
        let edge2 = c - a;
        let h = self.direction.cross(edge2);
        let det = edge1.dot(h);
        if det.abs() < EPSILON {
            return None;
        }
        let inv_det = 1.0 / det;
        let s = self.origin - a;
        let u = inv_det * s.dot(h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }
        let q = s.cross(edge1);
        let v = inv_det * self.direction.dot(q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }
        let t = inv_det * edge2.dot(q);
        (t > EPSILON).then_some(t)
    }

    /// Whether the ray passes within `radius` of `centre` in front of the origin.
    pub fn hits_sphere(&self, centre: Vector3<f32>, radius: f32) -> bool {
        let to_centre = centre - self.origin;
        let along = to_centre.dot(self.direction);
        let closest = to_centre.magnitude2() - along * along;
        if closest > radius * radius {
            return false;
        }
        // behind the origin only counts when the origin is inside the sphere
        along >= 0.0 || to_centre.magnitude2() <= radius * radius
    }
}

/// A pickable mesh together with the transform it is currently drawn with.
pub struct Target<'a> {
    pub mesh: &'a PolyMesh,
    pub transform: Instance,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    pub distance: f32,
    pub point: Vector3<f32>,
    /// Index into the target list that was hit first.
    pub target: usize,
}

/// Casts rays from the camera through normalized device coordinates.
#[derive(Debug, Default)]
pub struct Raycaster {
    ray: Option<Ray>,
}

impl Raycaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_from_camera(&mut self, ndc: Vector2<f32>, camera: &PerspectiveCamera) {
        self.ray = camera.ray_from_ndc(ndc);
        if self.ray.is_none() {
            log::debug!("camera matrix is not invertible, picking skipped");
        }
    }

    pub fn ray(&self) -> Option<Ray> {
        self.ray
    }

    /// Nearest hit across all targets, if any.
    pub fn intersect(&self, targets: &[Target]) -> Option<Hit> {
        let ray = self.ray?;
        targets
            .iter()
            .enumerate()
            .filter_map(|(idx, target)| {
                intersect_mesh(&ray, target.mesh, &target.transform.to_matrix()).map(|distance| Hit {
                    distance,
                    point: ray.at(distance),
                    target: idx,
                })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}

fn transform_point(matrix: &Matrix4<f32>, v: Vector3<f32>) -> Vector3<f32> {
    (matrix * Vector4::new(v.x, v.y, v.z, 1.0)).truncate()
}

fn intersect_mesh(ray: &Ray, mesh: &PolyMesh, world: &Matrix4<f32>) -> Option<f32> {
    let centre = transform_point(world, Vector3::new(0.0, 0.0, 0.0));
    let max_scale = [world.x, world.y, world.z]
        .iter()
        .map(|axis| axis.truncate().magnitude())
        .fold(0.0, f32::max);
    if !ray.hits_sphere(centre, mesh.bounding_radius() * max_scale) {
        return None;
    }
    (0..mesh.triangles.len())
        .filter_map(|idx| {
            let tri = mesh.triangle(idx).map(|v| transform_point(world, v));
            ray.intersect_triangle(tri)
        })
        .min_by(f32::total_cmp)
}
