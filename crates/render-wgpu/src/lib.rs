//! wgpu render backend for the grid viewer.
//!
//! Draws the quad field as one instanced draw: a shared unit quad mesh plus
//! a per-quad model matrix, sampled from a single diffuse texture.
//!
//! # Invariants
//! - The renderer never mutates camera or scene state.
//! - The camera contributes only a view matrix; projection is owned here.
//! - Instance data is uploaded once at construction; the scene is static.

mod gpu;
mod shaders;

pub use gpu::GridRenderer;
