// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Source→form map (§4.6.2 step 5): tracks form files bound to a source,
//! consulted only for module-based targets when a source is removed.

use crate::error::StorageError;
use crate::persistence::{load_snapshot, save_snapshot};
use kiln_core::store_traits::SourceFormMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Serialize, Deserialize)]
struct FormSnapshot {
    bindings: HashMap<PathBuf, Vec<PathBuf>>,
}

pub struct FsSourceFormMap {
    path: PathBuf,
    state: parking_lot::RwLock<FormSnapshot>,
}

impl FsSourceFormMap {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: parking_lot::RwLock::new(FormSnapshot::default()),
        }
    }

    pub fn bind(&self, source: PathBuf, forms: Vec<PathBuf>) {
        self.state.write().bindings.insert(source, forms);
    }

    pub fn load(&self) -> Result<(), StorageError> {
        if let Some(snapshot) = load_snapshot(&self.path)? {
            *self.state.write() = snapshot;
        }
        Ok(())
    }

    pub fn save(&self) -> Result<(), StorageError> {
        save_snapshot(&self.path, &*self.state.read())
    }

    pub(crate) fn clear(&self) {
        self.state.write().bindings.clear();
    }
}

impl SourceFormMap for FsSourceFormMap {
    fn get_state(&self, source: &Path) -> Vec<PathBuf> {
        self.state
            .read()
            .bindings
            .get(source)
            .cloned()
            .unwrap_or_default()
    }

    fn remove(&self, source: &Path) {
        self.state.write().bindings.remove(source);
    }
}

#[cfg(test)]
#[path = "source_form_map_tests.rs"]
mod tests;
