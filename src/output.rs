//! Output files.
//!
//! Writers stage into a hidden sibling file and rename it over the target, so
//! an interrupted write leaves either the previous file or nothing.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{CorpusError, Result};

fn staging_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.tmp", name))
}

fn write_err(path: &Path) -> impl FnOnce(std::io::Error) -> CorpusError + '_ {
    move |source| CorpusError::WriteOutput {
        path: path.to_path_buf(),
        source,
    }
}

/// Stage `fill` into a temporary file and move it to `path`.
/// Returns the number of bytes written.
fn write_atomic<F>(path: &Path, fill: F) -> Result<u64>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<()>,
{
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err(parent))?;
    }

    let staging = staging_path(path);
    let result = (|| {
        let file = File::create(&staging).map_err(write_err(&staging))?;
        let mut writer = BufWriter::new(file);
        fill(&mut writer)?;
        writer.flush().map_err(write_err(&staging))?;
        let file = writer
            .into_inner()
            .map_err(|e| write_err(&staging)(e.into_error()))?;
        file.sync_all().map_err(write_err(&staging))?;
        let bytes = file.metadata().map_err(write_err(&staging))?.len();
        fs::rename(&staging, path).map_err(write_err(path))?;
        Ok(bytes)
    })();

    if result.is_err() {
        let _ = fs::remove_file(&staging);
    }
    result
}

/// Write one compact JSON object per line.
pub fn write_jsonl<T, I>(path: &Path, records: I) -> Result<u64>
where
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    write_atomic(path, |writer| {
        for record in records {
            serde_json::to_writer(&mut *writer, &record)?;
            writer.write_all(b"\n").map_err(write_err(path))?;
        }
        Ok(())
    })
}

/// Write a single pretty-printed JSON document.
pub fn write_json_pretty<T: Serialize>(path: &Path, value: &T) -> Result<u64> {
    write_atomic(path, |writer| {
        serde_json::to_writer_pretty(&mut *writer, value)?;
        writer.write_all(b"\n").map_err(write_err(path))?;
        Ok(())
    })
}
