//! Import Wavefront OBJ triangle meshes into render-ready buffers.
//!
//! An import reads `v`, `vn`, `vt` and `f` records in one pass and produces a
//! deduplicated vertex buffer (positions, plus normals and texture
//! coordinates on request) and a triangle index buffer referencing it.
//!
//! ```
//! use objbuf::{parse_obj_file, ImportOptions};
//!
//! let obj = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
//! let model = parse_obj_file(obj, &ImportOptions::default()).unwrap();
//! assert_eq!(model.indices, vec![0, 1, 2]);
//! ```
//!
//! Imports share no state, so independent files can be imported on as many
//! threads as the caller likes.

mod dedup;
mod error;
mod obj;
mod options;
pub mod model;

pub use self::dedup::FaceVertexKey;
pub use self::error::{ImportError, ImportResult};
pub use self::model::{Bounds, Model, Vertex};
pub use self::obj::{load_obj_file, parse_obj_file, read_obj};
pub use self::options::ImportOptions;
