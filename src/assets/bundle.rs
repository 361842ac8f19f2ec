//! Bundled read-only asset set
//!
//! Assets are compiled into the binary by default. A directory can be used
//! instead so the front-end can be swapped without rebuilding; lookups in
//! that mode are confined to the directory.

use hyper::body::Bytes;
use std::collections::HashMap;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tokio::fs;

macro_rules! embed {
    ($name:literal) => {
        ($name, include_bytes!(concat!("../../assets/", $name)).as_slice())
    };
}

/// Assets shipped inside the binary, keyed by their bundle-relative name.
const EMBEDDED: &[(&str, &[u8])] = &[
    embed!("static/index.html"),
    embed!("static/main.js"),
    embed!("static/styles.css"),
    embed!("static/favicon.svg"),
    embed!("videos.json"),
];

/// Read-only asset set shared by every worker
#[derive(Debug, Clone)]
pub enum AssetBundle {
    /// In-memory entries (embedded or supplied by the caller)
    Memory(Arc<HashMap<String, Bytes>>),
    /// Files under a root directory, read on each request
    Directory(Arc<PathBuf>),
}

impl AssetBundle {
    /// The asset set compiled into the binary
    pub fn embedded() -> Self {
        Self::from_entries(
            EMBEDDED
                .iter()
                .map(|(name, data)| (*name, Bytes::from_static(data))),
        )
    }

    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Bytes>,
    {
        let map = entries
            .into_iter()
            .map(|(name, data)| (name.into(), data.into()))
            .collect();
        Self::Memory(Arc::new(map))
    }

    pub fn from_dir(root: impl Into<PathBuf>) -> Self {
        Self::Directory(Arc::new(root.into()))
    }

    /// Embedded set unless a directory override is given
    pub fn from_config(dir: Option<&str>) -> Self {
        dir.map_or_else(Self::embedded, Self::from_dir)
    }

    /// Read an asset by its bundle-relative name (e.g. `static/index.html`).
    ///
    /// `Ok(None)` means the asset is not part of the set. Errors are only
    /// possible for directory-backed bundles.
    pub async fn read(&self, name: &str) -> io::Result<Option<Bytes>> {
        match self {
            Self::Memory(entries) => Ok(entries.get(name).cloned()),
            Self::Directory(root) => {
                let Some(path) = confine(root, name) else {
                    return Ok(None);
                };
                match fs::metadata(&path).await {
                    Ok(meta) if meta.is_file() => fs::read(&path).await.map(|data| Some(Bytes::from(data))),
                    Ok(_) => Ok(None),
                    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
                    Err(e) => Err(e),
                }
            }
        }
    }

    /// Names of in-memory entries, sorted. Empty for directory bundles.
    pub fn names(&self) -> Vec<&str> {
        match self {
            Self::Memory(entries) => {
                let mut names: Vec<&str> = entries.keys().map(String::as_str).collect();
                names.sort_unstable();
                names
            }
            Self::Directory(_) => Vec::new(),
        }
    }
}

/// Join `name` under `root`, refusing anything that could leave it.
///
/// Names are matched literally like in-memory entries: empty segments
/// (`static//x.css`) and `.` segments are not collapsed, they just miss.
fn confine(root: &Path, name: &str) -> Option<PathBuf> {
    if name.split('/').any(|segment| segment.is_empty() || segment == ".") {
        return None;
    }
    let relative = Path::new(name);
    if relative.components().any(|c| !matches!(c, Component::Normal(_))) {
        return None;
    }
    Some(root.join(relative))
}
