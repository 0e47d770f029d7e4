use std::io;
use std::path::{Path, PathBuf};

/// Everything that can stop an import.
#[derive(thiserror::Error, Debug)]
pub enum ImportError {
    /// The input could not be opened or read. Nothing is returned.
    #[error("unable to read OBJ source{}: {source}", location(.path.as_deref()))]
    SourceUnavailable {
        path: Option<PathBuf>,
        #[source]
        source: io::Error,
    },

    /// A record whose numeric payload failed to parse. Aborts the import.
    #[error("malformed record at line {line} ({reason}): {record}")]
    MalformedRecord {
        line: usize,
        record: String,
        reason: &'static str,
    },

    #[error("OBJ data contains no usable vertices")]
    EmptyMesh,

    /// More distinct vertices than a `u32` index buffer can address.
    #[error("mesh has more vertices than u32 indices can address")]
    TooManyVertices,
}

fn location(path: Option<&Path>) -> String {
    match path {
        Some(path) => format!(" {}", path.display()),
        None => String::new(),
    }
}

impl ImportError {
    pub(crate) fn unavailable(path: Option<&Path>, source: io::Error) -> Self {
        ImportError::SourceUnavailable {
            path: path.map(Path::to_path_buf),
            source,
        }
    }

    pub(crate) fn malformed(line: usize, record: &str, reason: &'static str) -> Self {
        ImportError::MalformedRecord {
            line,
            record: record.to_string(),
            reason,
        }
    }
}

pub type ImportResult<T> = Result<T, ImportError>;
