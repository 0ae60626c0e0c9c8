//! CPU-side geometry factories.
//!
//! Meshes are kept as plain vertex/triangle lists so that they can be both
//! uploaded as wireframe line lists and intersected by the picking code.

use std::collections::HashSet;

use cgmath::{InnerSpace, Vector3};
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Indexed triangle mesh.
#[derive(Clone, Debug, Default)]
pub struct PolyMesh {
    pub vertices: Vec<Vector3<f32>>,
    pub triangles: Vec<[u32; 3]>,
}

impl PolyMesh {
    /// Unique undirected edges, each as `(low, high)` vertex indices.
    pub fn edges(&self) -> Vec<(u32, u32)> {
        let mut seen = HashSet::new();
        let mut edges = Vec::new();
        for tri in &self.triangles {
            for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                let key = (a.min(b), a.max(b));
                if seen.insert(key) {
                    edges.push(key);
                }
            }
        }
        edges
    }

    /// Line-list vertices for wireframe rendering: two positions per edge.
    pub fn wireframe(&self) -> Vec<Vector3<f32>> {
        self.edges()
            .into_iter()
            .flat_map(|(a, b)| [self.vertices[a as usize], self.vertices[b as usize]])
            .collect()
    }

    pub fn triangle(&self, idx: usize) -> [Vector3<f32>; 3] {
        let [a, b, c] = self.triangles[idx];
        [
            self.vertices[a as usize],
            self.vertices[b as usize],
            self.vertices[c as usize],
        ]
    }

    /// Radius of the smallest origin-centred sphere containing every vertex.
    pub fn bounding_radius(&self) -> f32 {
        self.vertices
            .iter()
            .map(|v| v.magnitude())
            .fold(0.0, f32::max)
    }
}

/// Geodesic sphere built by subdividing each icosahedron face into `(detail + 1)²`
/// triangles and projecting every vertex onto the sphere of `radius`.
pub fn icosahedron(radius: f32, detail: u32) -> PolyMesh {
    let t = (1.0 + 5.0_f32.sqrt()) / 2.0;
    let base = [
        [-1.0, t, 0.0],
        [1.0, t, 0.0],
        [-1.0, -t, 0.0],
        [1.0, -t, 0.0],
        [0.0, -1.0, t],
        [0.0, 1.0, t],
        [0.0, -1.0, -t],
        [0.0, 1.0, -t],
        [t, 0.0, -1.0],
        [t, 0.0, 1.0],
        [-t, 0.0, -1.0],
        [-t, 0.0, 1.0],
    ]
    .map(Vector3::from);
    const FACES: [[usize; 3]; 20] = [
        [0, 11, 5],
        [0, 5, 1],
        [0, 1, 7],
        [0, 7, 10],
        [0, 10, 11],
        [1, 5, 9],
        [5, 11, 4],
        [11, 10, 2],
        [10, 7, 6],
        [7, 1, 8],
        [3, 9, 4],
        [3, 4, 2],
        [3, 2, 6],
        [3, 6, 8],
        [3, 8, 9],
        [4, 9, 5],
        [2, 4, 11],
        [6, 2, 10],
        [8, 6, 7],
        [9, 8, 1],
    ];

    let mut builder = MeshBuilder::new(radius);
    let cols = detail as usize + 1;
    for [ia, ib, ic] in FACES {
        let (a, b, c) = (base[ia], base[ib], base[ic]);
        // rows[i][j]: i walks from edge ab towards c, j walks along the row
        let rows: Vec<Vec<Vector3<f32>>> = (0..=cols)
            .map(|i| {
                let f = i as f32 / cols as f32;
                let aj = a + (c - a) * f;
                let bj = b + (c - b) * f;
                let len = cols - i;
                (0..=len)
                    .map(|j| {
                        if len == 0 {
                            aj
                        } else {
                            aj + (bj - aj) * (j as f32 / len as f32)
                        }
                    })
                    .collect()
            })
            .collect();
        for i in 0..cols {
            for j in 0..(2 * (cols - i) - 1) {
                let k = j / 2;
                if j % 2 == 0 {
                    builder.push([rows[i][k + 1], rows[i + 1][k], rows[i][k]]);
                } else {
                    builder.push([rows[i][k + 1], rows[i + 1][k + 1], rows[i + 1][k]]);
                }
            }
        }
    }
    builder.finish()
}

/// Deduplicates projected vertices shared between neighbouring faces.
///
/// Shared vertices are computed from different faces and differ by rounding
/// noise, so matching uses a tolerance on the unit sphere.
struct MeshBuilder {
    radius: f32,
    units: Vec<Vector3<f32>>,
    mesh: PolyMesh,
}

impl MeshBuilder {
    const EPSILON: f32 = 1.0e-4;

    fn new(radius: f32) -> Self {
        Self {
            radius,
            units: Vec::new(),
            mesh: PolyMesh::default(),
        }
    }

    fn vertex(&mut self, v: Vector3<f32>) -> u32 {
        let unit = v.normalize();
        if let Some(idx) = self
            .units
            .iter()
            .position(|u| (*u - unit).magnitude2() < Self::EPSILON * Self::EPSILON)
        {
            return idx as u32;
        }
        self.units.push(unit);
        self.mesh.vertices.push(unit * self.radius);
        (self.mesh.vertices.len() - 1) as u32
    }

    fn push(&mut self, tri: [Vector3<f32>; 3]) {
        let tri = tri.map(|v| self.vertex(v));
        self.mesh.triangles.push(tri);
    }

    fn finish(self) -> PolyMesh {
        self.mesh
    }
}

/// Square grid on the XZ plane centred at the origin, as line-list vertices.
pub fn grid_lines(size: f32, divisions: u32) -> Vec<Vector3<f32>> {
    let half = size / 2.0;
    let divisions = divisions.max(1);
    let step = size / divisions as f32;
    (0..=divisions)
        .flat_map(|i| {
            let p = -half + step * i as f32;
            [
                Vector3::new(-half, 0.0, p),
                Vector3::new(half, 0.0, p),
                Vector3::new(p, 0.0, -half),
                Vector3::new(p, 0.0, half),
            ]
        })
        .collect()
}

/// `count` points uniformly scattered in a cube of edge `spread` centred at the origin.
pub fn particle_field(count: u32, spread: f32, seed: u64) -> Vec<Vector3<f32>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let half = spread / 2.0;
    (0..count)
        .map(|_| {
            Vector3::new(
                rng.gen_range(-half..half),
                rng.gen_range(-half..half),
                rng.gen_range(-half..half),
            )
        })
        .collect()
}
