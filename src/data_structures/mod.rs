//! Scene data: procedural geometry, per-object transforms and GPU textures.
//!
//! - `geometry` builds the icosahedron, grid and particle point sets on the CPU
//! - `instance` holds per-object transformation and material data
//! - `texture` wraps the depth buffer

pub mod geometry;
pub mod instance;
pub mod texture;
