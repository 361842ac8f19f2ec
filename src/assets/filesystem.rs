//! Filesystem stream sources
//!
//! Opens arbitrary paths for the stream route. Paths are used exactly as the
//! client sent them, with no root directory and no canonicalization.

use crate::http::FileChunks;
use std::io;
use std::path::Path;
use tokio::fs::File;

/// An opened file ready to be streamed
#[derive(Debug)]
pub struct StreamSource {
    file: File,
    len: u64,
}

impl StreamSource {
    /// Exact size in bytes, taken from the open handle
    pub const fn len(&self) -> u64 {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Hand the file over to a chunked response body
    pub fn into_chunks(self) -> FileChunks {
        FileChunks::new(self.file, self.len)
    }
}

/// Open `path` for streaming.
///
/// Returns `Ok(None)` when nothing exists at `path`. Directories and other
/// non-regular files are reported as errors, as is any failure to open or
/// stat the file.
pub async fn open_stream(path: &Path) -> io::Result<Option<StreamSource>> {
    let file = match File::open(path).await {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };

    let meta = file.metadata().await?;
    if !meta.is_file() {
        return Err(io::Error::other(format!(
            "{} is not a regular file",
            path.display()
        )));
    }

    Ok(Some(StreamSource {
        file,
        len: meta.len(),
    }))
}
