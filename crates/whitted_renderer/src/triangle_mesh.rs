//! Indexed triangle mesh primitive.
//!
//! Faces reference the mesh's own vertex pool by index. A bounding sphere
//! around the pool lets rays that cannot touch the mesh skip the face scan.

use std::sync::Arc;

use thiserror::Error;
use whitted_core::{Material, MaterialError, MaterialLibrary, Mesh};
use whitted_math::{Aabb, Placement, Ray, Vector3, EPSILON};

use crate::primitive::{Hit, Primitive};
use crate::triangle::{barycentric, face_normal, intersect};

/// Errors that can occur while placing a mesh.
#[derive(Error, Debug, PartialEq)]
pub enum MeshPlacementError {
    #[error("Mesh has already been placed in the scene")]
    AlreadyPlaced,
}

/// A face of the mesh: three indices into the vertex pool.
#[derive(Clone, Debug)]
pub struct Face {
    pub indices: [usize; 3],
    /// Unit normal, zero for degenerate faces
    pub normal: Vector3,
    pub material: Arc<Material>,
}

/// Conservative sphere around every vertex.
#[derive(Clone, Copy, Debug, PartialEq)]
struct BoundingSphere {
    center: Vector3,
    radius: f64,
}

impl BoundingSphere {
    /// Centered on the bounding-box midpoint with half its diagonal as radius.
    fn around(vertices: &[Vector3]) -> Option<Self> {
        if vertices.is_empty() {
            return None;
        }
        let bounds = Aabb::enclosing(vertices);
        Some(Self {
            center: bounds.centroid(),
            // Slack keeps faces lying exactly on the sphere inside it.
            radius: bounds.diagonal() * 0.5 * (1.0 + 1e-9) + EPSILON,
        })
    }

    /// False only when a normalized ray cannot reach the sphere.
    fn may_hit(&self, ray: &Ray) -> bool {
        let oc = self.center - ray.origin;
        let radius_sq = self.radius * self.radius;
        let dist_sq = oc.length_squared();
        if dist_sq <= radius_sq {
            return true;
        }

        let projection = oc.dot(ray.direction);
        projection >= 0.0 && dist_sq - projection * projection <= radius_sq
    }
}

/// A triangle mesh primitive.
pub struct TriangleMesh {
    vertices: Vec<Vector3>,
    faces: Vec<Face>,
    bounds: Option<BoundingSphere>,
    placed: bool,
}

impl TriangleMesh {
    /// Build a mesh primitive from loaded geometry.
    ///
    /// Faces bound to a material with `usemtl` look it up in `materials`;
    /// the rest use `default_material`.
    pub fn new(
        mesh: &Mesh,
        materials: &MaterialLibrary,
        default_material: Arc<Material>,
    ) -> Result<Self, MaterialError> {
        let vertices = mesh.positions().to_vec();
        let faces = mesh
            .faces()
            .iter()
            .map(|face| -> Result<Face, MaterialError> {
                let material = match &face.material {
                    Some(name) => materials.get(name)?,
                    None => Arc::clone(&default_material),
                };
                Ok(Face {
                    indices: face.indices,
                    normal: Self::normal_of(&vertices, face.indices),
                    material,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::from_parts(vertices, faces))
    }

    /// Build a mesh where every face uses the same material.
    pub fn with_material(mesh: &Mesh, material: Arc<Material>) -> Self {
        let vertices = mesh.positions().to_vec();
        let faces = mesh
            .faces()
            .iter()
            .map(|face| Face {
                indices: face.indices,
                normal: Self::normal_of(&vertices, face.indices),
                material: Arc::clone(&material),
            })
            .collect();

        Self::from_parts(vertices, faces)
    }

    fn from_parts(vertices: Vec<Vector3>, faces: Vec<Face>) -> Self {
        let degenerate = faces.iter().filter(|f| f.normal == Vector3::ZERO).count();
        if degenerate > 0 {
            log::warn!("Mesh has {} degenerate faces that rays will pass through", degenerate);
        }

        let bounds = BoundingSphere::around(&vertices);
        Self {
            vertices,
            faces,
            bounds,
            placed: false,
        }
    }

    fn normal_of(vertices: &[Vector3], [a, b, c]: [usize; 3]) -> Vector3 {
        face_normal(vertices[a], vertices[b], vertices[c])
    }

    fn corners(&self, face: &Face) -> (Vector3, Vector3, Vector3) {
        let [a, b, c] = face.indices;
        (self.vertices[a], self.vertices[b], self.vertices[c])
    }

    /// Move the mesh into the scene.
    ///
    /// Vertices are recentered on their bounding-box midpoint, rotated about
    /// X, Y then Z, scaled by `scale / diagonal`, then translated. A mesh can
    /// only be placed once.
    pub fn apply_placement(&mut self, placement: &Placement) -> Result<(), MeshPlacementError> {
        if self.placed {
            return Err(MeshPlacementError::AlreadyPlaced);
        }

        let bounds = Aabb::enclosing(&self.vertices);
        let matrix = placement.matrix(&bounds);
        for vertex in &mut self.vertices {
            *vertex = matrix.transform_point3(*vertex);
        }

        for face in &mut self.faces {
            face.normal = Self::normal_of(&self.vertices, face.indices);
        }
        self.bounds = BoundingSphere::around(&self.vertices);
        self.placed = true;

        log::debug!(
            "Placed mesh at {:?} (rotation {:?}, scale {:?})",
            placement.position,
            placement.rotation_degrees,
            placement.scale
        );
        Ok(())
    }

    pub fn is_placed(&self) -> bool {
        self.placed
    }

    pub fn vertices(&self) -> &[Vector3] {
        &self.vertices
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Center and radius of the bounding sphere, if the mesh has vertices.
    pub fn bounding_sphere(&self) -> Option<(Vector3, f64)> {
        self.bounds.map(|s| (s.center, s.radius))
    }
}

impl Primitive for TriangleMesh {
    fn raycast(&self, ray: &Ray) -> Option<Hit<'_>> {
        let ray = ray.normalized()?;
        if !self.bounds.is_some_and(|s| s.may_hit(&ray)) {
            return None;
        }

        let mut closest: Option<(f64, &Face)> = None;
        for face in &self.faces {
            let (a, b, c) = self.corners(face);
            if let Some(t) = intersect(a, b, c, face.normal, &ray) {
                if closest.map_or(true, |(best, _)| t < best) {
                    closest = Some((t, face));
                }
            }
        }

        closest.map(|(distance, face)| Hit {
            distance,
            normal: face.normal,
            material: &face.material,
        })
    }

    /// Normal of the face containing `point`; when no face contains it, the
    /// face whose plane lies nearest.
    fn normal_at(&self, point: Vector3) -> Vector3 {
        const TOLERANCE: f64 = 1e-6;

        let mut best: Option<(bool, f64, Vector3)> = None;
        for face in &self.faces {
            if face.normal == Vector3::ZERO {
                continue;
            }
            let (a, b, c) = self.corners(face);
            let plane_distance = (point - a).dot(face.normal).abs();
            let inside = barycentric(a, b, c, point)
                .is_some_and(|w| w.iter().all(|&x| x >= -TOLERANCE && x <= 1.0 + TOLERANCE));

            let better = match best {
                None => true,
                Some((best_inside, best_distance, _)) => {
                    (inside && !best_inside)
                        || (inside == best_inside && plane_distance < best_distance)
                }
            };
            if better {
                best = Some((inside, plane_distance, face.normal));
            }
        }

        best.map_or(Vector3::ZERO, |(_, _, normal)| normal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use whitted_core::MeshFace;
    use whitted_math::Color;

    /// Unit square in the z = 0 plane, facing +Z, split into two faces.
    fn square() -> Mesh {
        Mesh::new(
            vec![
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(1.0, 0.0, 0.0),
                Vector3::new(1.0, 1.0, 0.0),
                Vector3::new(0.0, 1.0, 0.0),
            ],
            vec![
                MeshFace::new([0, 1, 2]).with_material("red"),
                MeshFace::new([0, 2, 3]),
            ],
        )
        .unwrap()
    }

    fn red_library() -> MaterialLibrary {
        let mut library = MaterialLibrary::new();
        library.insert(Material::new("red", Color::new(1.0, 0.0, 0.0)));
        library
    }

    #[test]
    fn test_faces_resolve_materials() {
        let default = Arc::new(Material::default());
        let mesh = TriangleMesh::new(&square(), &red_library(), Arc::clone(&default)).unwrap();

        assert_eq!(mesh.faces()[0].material.name, "red");
        assert!(Arc::ptr_eq(&mesh.faces()[1].material, &default));
        for face in mesh.faces() {
            assert!((face.normal - Vector3::Z).length() < 1e-12);
        }
    }

    #[test]
    fn test_unknown_face_material_is_an_error() {
        let result = TriangleMesh::new(&square(), &MaterialLibrary::new(), Arc::new(Material::default()));
        assert!(matches!(result, Err(MaterialError::Unknown(name)) if name == "red"));
    }

    #[test]
    fn test_mesh_hit_reports_face_material() {
        let mesh = TriangleMesh::new(&square(), &red_library(), Arc::new(Material::default())).unwrap();
        let down = Vector3::new(0.0, 0.0, -1.0);

        // Below the diagonal: face 0.
        let hit = mesh.raycast(&Ray::new(Vector3::new(0.7, 0.2, 2.0), down)).unwrap();
        assert!((hit.distance - 2.0).abs() < 1e-12);
        assert_eq!(hit.material.name, "red");

        // Above the diagonal: face 1.
        let hit = mesh.raycast(&Ray::new(Vector3::new(0.2, 0.7, 2.0), down)).unwrap();
        assert_eq!(hit.material.name, "default");

        // Outside the square.
        assert!(mesh.raycast(&Ray::new(Vector3::new(2.0, 0.5, 2.0), down)).is_none());
    }

    #[test]
    fn test_mesh_nearest_face_wins() {
        let mesh = Mesh::new(
            vec![
                Vector3::new(-1.0, -1.0, 0.0),
                Vector3::new(1.0, -1.0, 0.0),
                Vector3::new(0.0, 1.0, 0.0),
                Vector3::new(-1.0, -1.0, 2.0),
                Vector3::new(1.0, -1.0, 2.0),
                Vector3::new(0.0, 1.0, 2.0),
            ],
            vec![MeshFace::new([0, 1, 2]), MeshFace::new([3, 4, 5])],
        )
        .unwrap();
        let mesh = TriangleMesh::with_material(&mesh, Arc::new(Material::default()));

        let hit = mesh
            .raycast(&Ray::new(Vector3::new(0.0, 0.0, 5.0), Vector3::new(0.0, 0.0, -1.0)))
            .unwrap();
        assert!((hit.distance - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_bounding_sphere_skip_matches_face_scan() {
        let mesh = TriangleMesh::with_material(&square(), Arc::new(Material::default()));
        let origins = [
            Vector3::new(0.5, 0.5, 3.0),
            Vector3::new(0.5, 0.5, 0.2),
            Vector3::new(5.0, 5.0, 5.0),
            Vector3::new(-3.0, 0.5, 1.0),
        ];
        let targets = [
            Vector3::new(0.25, 0.5, 0.0),
            Vector3::new(0.9, 0.05, 0.0),
            Vector3::new(3.0, 3.0, 0.0),
        ];

        for origin in origins {
            for target in targets {
                let ray = Ray::new(origin, target - origin);
                let unit = ray.normalized().unwrap();
                let brute = mesh.faces().iter().any(|face| {
                    let (a, b, c) = mesh.corners(face);
                    intersect(a, b, c, face.normal, &unit).is_some()
                });
                assert_eq!(mesh.raycast(&ray).is_some(), brute, "{:?} -> {:?}", origin, target);
            }
        }
    }

    #[test]
    fn test_empty_mesh_is_never_hit() {
        let empty = Mesh::new(Vec::new(), Vec::new()).unwrap();
        let mesh = TriangleMesh::with_material(&empty, Arc::new(Material::default()));
        assert!(mesh.bounding_sphere().is_none());
        assert!(mesh.raycast(&Ray::new(Vector3::ZERO, Vector3::X)).is_none());
    }

    #[test]
    fn test_apply_placement() {
        let mut mesh = TriangleMesh::with_material(&square(), Arc::new(Material::default()));
        let placement = Placement::at(Vector3::new(0.0, 0.0, -10.0))
            .with_rotation(Vector3::new(0.0, 90.0, 0.0))
            .with_scale(Vector3::splat(2.0_f64.sqrt() * 3.0));

        mesh.apply_placement(&placement).unwrap();
        assert!(mesh.is_placed());

        // The square now faces +X, spans 3 units per side and is centered at
        // the target position.
        for face in mesh.faces() {
            assert!((face.normal - Vector3::X).length() < 1e-12);
        }
        let (center, radius) = mesh.bounding_sphere().unwrap();
        assert!((center - Vector3::new(0.0, 0.0, -10.0)).length() < 1e-12);
        assert!((radius - 1.5 * 2.0_f64.sqrt()).abs() < 1e-6);

        let hit = mesh
            .raycast(&Ray::new(Vector3::new(4.0, 0.3, -10.2), -Vector3::X))
            .unwrap();
        assert!((hit.distance - 4.0).abs() < 1e-9);
        assert!((hit.normal - Vector3::X).length() < 1e-12);
    }

    #[test]
    fn test_second_placement_is_rejected() {
        let mut mesh = TriangleMesh::with_material(&square(), Arc::new(Material::default()));
        mesh.apply_placement(&Placement::default()).unwrap();
        let before = mesh.vertices().to_vec();

        assert_eq!(
            mesh.apply_placement(&Placement::at(Vector3::ONE)),
            Err(MeshPlacementError::AlreadyPlaced)
        );
        assert_eq!(mesh.vertices(), &before[..]);
    }

    #[test]
    fn test_normal_at_picks_containing_face() {
        let tilted = Mesh::new(
            vec![
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(1.0, 0.0, 0.0),
                Vector3::new(0.0, 1.0, 0.0),
                Vector3::new(0.0, 0.0, 1.0),
            ],
            vec![MeshFace::new([0, 1, 2]), MeshFace::new([0, 3, 1])],
        )
        .unwrap();
        let mesh = TriangleMesh::with_material(&tilted, Arc::new(Material::default()));

        assert!((mesh.normal_at(Vector3::new(0.2, 0.2, 0.0)) - Vector3::Z).length() < 1e-12);
        assert!((mesh.normal_at(Vector3::new(0.2, 0.0, 0.2)) - Vector3::Y).length() < 1e-12);
    }
}
