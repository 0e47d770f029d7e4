//! Vertex deduplication and buffer emission.
//!
//! Every distinct `(position, tex_coord, normal)` reference triplet seen in a
//! face becomes one output vertex. Later occurrences of the same triplet reuse
//! the slot assigned on first sight.

use std::collections::HashMap;

use glam::{Vec2, Vec3};

use crate::error::{ImportError, ImportResult};
use crate::model::Model;
use crate::options::ImportOptions;

/// The attribute references of one face corner, 0-based.
///
/// A component that the file did not supply holds [`FaceVertexKey::ABSENT`].
/// Equality over all three components is the deduplication identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FaceVertexKey {
    pub position: i32,
    pub tex_coord: i32,
    pub normal: i32,
}

impl FaceVertexKey {
    pub const ABSENT: i32 = -1;

    /// Build a key from the 1-based indices written in an OBJ file.
    ///
    /// A texture or normal index of `0` also becomes [`FaceVertexKey::ABSENT`],
    /// so `1/0/1` and `1//1` share a vertex; both resolve to the default attribute.
    pub fn from_obj(position: i32, tex_coord: Option<i32>, normal: Option<i32>) -> Self {
        let zero_based = |i: i32| i.saturating_sub(1);
        FaceVertexKey {
            position: zero_based(position),
            tex_coord: tex_coord.map_or(Self::ABSENT, zero_based),
            normal: normal.map_or(Self::ABSENT, zero_based),
        }
    }
}

/// Raw attributes in declaration order.
#[derive(Debug, Default)]
pub(crate) struct AttributePools {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub tex_coords: Vec<Vec2>,
}

fn next_slot(emitted: usize) -> ImportResult<u32> {
    u32::try_from(emitted).map_err(|_| ImportError::TooManyVertices)
}

fn resolve<T: Copy>(pool: &[T], index: i32) -> Option<T> {
    usize::try_from(index).ok().and_then(|i| pool.get(i).copied())
}

/// Accumulates the output buffers for one import.
pub(crate) struct MeshBuilder<'a> {
    options: &'a ImportOptions,
    table: HashMap<FaceVertexKey, u32>,
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    tex_coords: Vec<Vec2>,
    indices: Vec<u32>,
    dropped_faces: usize,
}

impl<'a> MeshBuilder<'a> {
    pub fn new(options: &'a ImportOptions) -> Self {
        MeshBuilder {
            options,
            table: HashMap::new(),
            positions: Vec::new(),
            normals: Vec::new(),
            tex_coords: Vec::new(),
            indices: Vec::new(),
            dropped_faces: 0,
        }
    }

    /// Emit one triangle. A face with any corner referencing an undeclared
    /// position is dropped whole and counted.
    pub fn push_face(
        &mut self,
        pools: &AttributePools,
        face: [FaceVertexKey; 3],
        line: usize,
    ) -> ImportResult<()> {
        // Keys already in the table resolved when they were added, and pools only grow.
        let mut positions = [Vec3::ZERO; 3];
        for (key, position) in face.iter().zip(&mut positions) {
            match resolve(&pools.positions, key.position) {
                Some(p) => *position = p,
                None => {
                    tracing::debug!(
                        line,
                        position = i64::from(key.position) + 1,
                        declared = pools.positions.len(),
                        "dropping face with out-of-range position reference"
                    );
                    self.dropped_faces += 1;
                    return Ok(());
                }
            }
        }

        for (key, position) in face.into_iter().zip(positions) {
            let slot = match self.table.get(&key) {
                Some(&slot) => slot,
                None => self.emit(pools, key, position)?,
            };
            self.indices.push(slot);
        }
        Ok(())
    }

    fn emit(&mut self, pools: &AttributePools, key: FaceVertexKey, position: Vec3) -> ImportResult<u32> {
        let slot = next_slot(self.positions.len())?;
        self.positions.push(position);

        if self.options.emit_normals {
            let normal = resolve(&pools.normals, key.normal).unwrap_or(self.options.default_normal);
            self.normals.push(normal);
        }
        if self.options.emit_tex_coords {
            let uv = resolve(&pools.tex_coords, key.tex_coord).unwrap_or(Vec2::ZERO);
            self.tex_coords.push(uv);
        }

        self.table.insert(key, slot);
        Ok(slot)
    }

    pub fn finish(self) -> ImportResult<Model> {
        if self.positions.is_empty() {
            return Err(ImportError::EmptyMesh);
        }

        tracing::debug!(
            vertices = self.positions.len(),
            triangles = self.indices.len() / 3,
            dropped_faces = self.dropped_faces,
            "built mesh buffers"
        );

        Ok(Model {
            positions: self.positions,
            normals: self.options.emit_normals.then_some(self.normals),
            tex_coords: self.options.emit_tex_coords.then_some(self.tex_coords),
            indices: self.indices,
            dropped_faces: self.dropped_faces,
        })
    }
}
