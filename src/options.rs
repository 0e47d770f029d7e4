use glam::Vec3;

/// Controls which attribute streams an import emits.
///
/// Positions and indices are always emitted. Normals are on by default,
/// texture coordinates are off; both are parsed either way.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImportOptions {
    pub emit_normals: bool,
    pub emit_tex_coords: bool,
    /// Normal used for a vertex whose normal reference is absent or out of range.
    pub default_normal: Vec3,
}

impl Default for ImportOptions {
    fn default() -> Self {
        ImportOptions {
            emit_normals: true,
            emit_tex_coords: false,
            default_normal: Vec3::Y,
        }
    }
}

impl ImportOptions {
    /// Positions and indices only.
    pub fn positions_only() -> Self {
        ImportOptions {
            emit_normals: false,
            ..ImportOptions::default()
        }
    }

    #[must_use]
    pub fn with_normals(mut self, emit: bool) -> Self {
        self.emit_normals = emit;
        self
    }

    #[must_use]
    pub fn with_tex_coords(mut self, emit: bool) -> Self {
        self.emit_tex_coords = emit;
        self
    }

    #[must_use]
    pub fn with_default_normal(mut self, normal: Vec3) -> Self {
        self.default_normal = normal;
        self
    }
}
