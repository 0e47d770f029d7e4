use glam::{Vec2, Vec3};

/// One emitted vertex, gathered from the parallel buffers of a [`Model`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub p: Vec3,
    pub uv: Option<Vec2>,
    pub normal: Option<Vec3>,
}

/// Render-ready output of an import.
///
/// `normals` and `tex_coords` are present when the matching stream was
/// requested and are then parallel to `positions`. `indices` holds three
/// entries per triangle, each a slot into the vertex buffers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Model {
    pub positions: Vec<Vec3>,
    pub normals: Option<Vec<Vec3>>,
    pub tex_coords: Option<Vec<Vec2>>,
    pub indices: Vec<u32>,
    /// Faces skipped because a corner referenced a position that was never declared.
    pub dropped_faces: usize,
}

impl Model {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn vertex(&self, slot: usize) -> Option<Vertex> {
        let p = *self.positions.get(slot)?;
        Some(Vertex {
            p,
            uv: self.tex_coords.as_ref().and_then(|t| t.get(slot).copied()),
            normal: self.normals.as_ref().and_then(|n| n.get(slot).copied()),
        })
    }

    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Axis-aligned bounds of the emitted positions, `None` for an empty model.
    pub fn bounds(&self) -> Option<Bounds> {
        let (first, rest) = self.positions.split_first()?;
        let (min, max) = rest
            .iter()
            .fold((*first, *first), |(min, max), p| (min.min(*p), max.max(*p)));
        Some(Bounds { min, max })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn extents(&self) -> Vec3 {
        self.max - self.min
    }

    /// Radius of the sphere around [`Bounds::center`] that encloses the box.
    pub fn radius(&self) -> f32 {
        self.extents().length() * 0.5
    }
}
