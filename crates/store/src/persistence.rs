// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared snapshot persistence for the on-disk store default (§3.1): each
//! store's state is a `serde`-serializable snapshot written as
//! zstd-compressed JSON, using atomic write-to-temp-then-rename and
//! corrupt-to-`.bak` recovery. Any type implementing the `kiln-core` store
//! traits may replace this default; it is not mandated.

use crate::error::StorageError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::warn;

const ZSTD_LEVEL: i32 = 3;
const MAX_BAK_FILES: u32 = 3;

/// Save `value` atomically: serialize to JSON, zstd-compress, write to a
/// `.tmp` sibling, `fsync`, then rename over `path`.
pub fn save_snapshot<T: Serialize>(path: &Path, value: &T) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let tmp_path = path.with_extension("tmp");
    {
        let file = File::create(&tmp_path)?;
        let writer = BufWriter::new(file);
        let mut encoder = zstd::Encoder::new(writer, ZSTD_LEVEL)?;
        serde_json::to_writer(&mut encoder, value)?;
        let writer = encoder.finish()?;
        let file = writer.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()?;
    }
    fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Load a snapshot if the file exists.
///
/// Returns `Ok(None)` if the file is absent. A corrupt snapshot is rotated
/// to a `.bak` file and reported as [`StorageError::Corrupt`] rather than
/// silently discarded, so the caller can classify it as a data-corruption
/// outcome rather than an ordinary I/O failure.
pub fn load_snapshot<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StorageError> {
    if !path.exists() {
        return Ok(None);
    }

    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let decoded = match zstd::Decoder::new(reader) {
        Ok(decoder) => serde_json::from_reader(decoder),
        Err(e) => Err(e.into()),
    };

    match decoded {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            let bak_path = rotate_bak_path(path);
            warn!(
                error = %e,
                path = %path.display(),
                bak = %bak_path.display(),
                "corrupt store snapshot, moving to .bak",
            );
            fs::rename(path, &bak_path)?;
            Err(StorageError::Corrupt(format!(
                "{}: {}",
                path.display(),
                e
            )))
        }
    }
}

/// Picks the next `.bak` / `.bak.N` path, rotating older backups out. Keeps
/// up to [`MAX_BAK_FILES`] generations.
fn rotate_bak_path(path: &Path) -> PathBuf {
    let bak = |n: u32| {
        if n == 1 {
            path.with_extension("bak")
        } else {
            path.with_extension(format!("bak.{n}"))
        }
    };

    let oldest = bak(MAX_BAK_FILES);
    if oldest.exists() {
        let _ = fs::remove_file(&oldest);
    }
    for n in (1..MAX_BAK_FILES).rev() {
        let src = bak(n);
        if src.exists() {
            let _ = fs::rename(&src, bak(n + 1));
        }
    }
    bak(1)
}

#[cfg(test)]
#[path = "persistence_tests.rs"]
mod tests;
