//! Loading declarative views from JSON files and directories.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info, instrument};
use view_core::{Result, ViewError};

use crate::json::{parse_json_views, JsonViewDefinition};

/// Loads a single file whose top-level object maps view names to definitions.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub async fn load_json_views(
    path: impl AsRef<Path>,
) -> Result<BTreeMap<String, JsonViewDefinition>> {
    let path = path.as_ref();
    let views = read_view_file(path).await?;
    info!(views = views.len(), "step: json views loaded");
    Ok(views)
}

/// Loads every `.json` file under `dir`, recursively.
///
/// A file at `a/b/c.json` holding view `x` yields key `a.b.c.x`. Other files are ignored; one bad file
/// fails the whole load.
#[instrument(skip_all, fields(dir = %dir.as_ref().display()))]
pub async fn load_json_views_dir(
    dir: impl AsRef<Path>,
) -> Result<BTreeMap<String, JsonViewDefinition>> {
    let mut views = BTreeMap::new();
    let mut pending: Vec<(PathBuf, Vec<String>)> = vec![(dir.as_ref().to_path_buf(), Vec::new())];

    while let Some((current, prefix)) = pending.pop() {
        let mut entries = tokio::fs::read_dir(&current).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()).map(str::to_string) else {
                continue;
            };

            if entry.file_type().await?.is_dir() {
                let mut nested = prefix.clone();
                nested.push(name);
                pending.push((path, nested));
                continue;
            }

            let Some(stem) = name.strip_suffix(".json") else {
                debug!(path = %path.display(), "step: skipping non-json file");
                continue;
            };

            let mut segments = prefix.clone();
            segments.push(stem.to_string());
            let file_prefix = segments.join(".");
            for (key, definition) in read_view_file(&path).await? {
                views.insert(format!("{file_prefix}.{key}"), definition);
            }
        }
    }

    info!(views = views.len(), "step: json view directory loaded");
    Ok(views)
}

async fn read_view_file(path: &Path) -> Result<BTreeMap<String, JsonViewDefinition>> {
    let content = tokio::fs::read(path).await?;
    let value: Value = serde_json::from_slice(&content).map_err(|source| ViewError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    parse_json_views(value).map_err(|e| match e {
        ViewError::Parse(source) => ViewError::Json {
            path: path.to_path_buf(),
            source,
        },
        ViewError::Config(msg) => ViewError::Config(format!("{}: {msg}", path.display())),
        other => other,
    })
}
