use std::{
    io::{self, Write},
    path::Path,
};

use tokio::task;

/// Replaces the file at `path` with `contents`. The data is staged in a temporary file next to
/// `path`, synced, then renamed over it, so the file always holds either the old or the new
/// document. A crash only leaves the staged file behind.
pub async fn replace_file(path: &Path, contents: Vec<u8>) -> Result<(), io::Error> {
    let path = path.to_owned();
    task::spawn_blocking(move || -> Result<(), io::Error> {
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        let prefix = match path.file_name() {
            Some(name) => format!(".{}.", name.to_string_lossy()),
            None => ".".to_string(),
        };

        let mut staged = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(".tmp")
            .tempfile_in(dir)?;
        staged.write_all(&contents)?;
        staged.as_file().sync_all()?;
        staged.persist(&path)?;
        Ok(())
    })
    .await
    .map_err(io::Error::other)?
}
