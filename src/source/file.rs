//! Directory-backed configuration source with hot reload.
//!
//! # Layout
//! ```text
//! <dir>/
//!     app.svc.toml      → namespace "app.svc"
//!     app.db.toml       → namespace "app.db"
//! ```
//!
//! Each file is one flat TOML table. String values are served verbatim,
//! every other value as its JSON rendering so composite fields can decode it.
//!
//! # Design Decisions
//! - A removed file empties its namespace (all keys reported as deleted)
//! - A file that fails to parse keeps the previous snapshot
//! - The notify callback thread is the notification-delivery thread

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use thiserror::Error;

use crate::error::FetchError;
use crate::source::store::{NamespaceStore, Properties};
use crate::source::{ChangeEvent, ChangeListener, ConfigSource};

const EXTENSION: &str = "toml";

/// Errors reading a namespace file.
#[derive(Debug, Error)]
pub enum FileSourceError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// A configuration source reading one TOML file per namespace.
#[derive(Clone)]
pub struct FileSource {
    dir: PathBuf,
    store: Arc<NamespaceStore>,
}

impl FileSource {
    /// Open a directory and load every namespace file in it.
    pub fn open(dir: &Path) -> Result<Self, FileSourceError> {
        let source = Self {
            dir: dir.to_path_buf(),
            store: Arc::new(NamespaceStore::new()),
        };

        for (namespace, path) in namespace_files(dir)? {
            let properties = load_namespace(&path)?;
            tracing::debug!(namespace, keys = properties.len(), "Loaded namespace");
            source.store.replace(&namespace, properties);
        }

        tracing::info!(dir = ?source.dir, namespaces = source.store.namespaces().len(), "File source opened");
        Ok(source)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn namespaces(&self) -> Vec<String> {
        self.store.namespaces()
    }

    /// Re-read one namespace file and deliver the difference to listeners.
    pub fn reload(&self, namespace: &str) -> Result<ChangeEvent, FileSourceError> {
        reload_namespace(&self.store, &self.dir, namespace)
    }

    /// Re-read every namespace, known or newly added, and deliver the
    /// differences to listeners.
    ///
    /// Closes the gap between `open` and a watcher starting: edits made in
    /// between are picked up here. A namespace that fails to load keeps its
    /// current values and is skipped.
    pub fn reload_all(&self) -> Result<Vec<ChangeEvent>, FileSourceError> {
        let mut namespaces: BTreeSet<String> = self.store.namespaces().into_iter().collect();
        namespaces.extend(namespace_files(&self.dir)?.into_iter().map(|(namespace, _)| namespace));

        let mut events = Vec::with_capacity(namespaces.len());
        for namespace in namespaces {
            match reload_namespace(&self.store, &self.dir, &namespace) {
                Ok(event) => {
                    if !event.is_empty() {
                        tracing::info!(namespace, changed = event.changes.len(), "Namespace reloaded");
                    }
                    events.push(event);
                }
                Err(e) => {
                    tracing::error!(namespace, "Failed to reload namespace: {}. Keeping current values.", e);
                }
            }
        }
        Ok(events)
    }

    /// Start watching the directory in a background thread.
    ///
    /// The returned watcher must be kept alive for as long as changes
    /// should be delivered.
    pub fn watch(&self, poll_interval: Duration) -> Result<RecommendedWatcher, notify::Error> {
        let store = self.store.clone();
        let dir = self.dir.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if !(event.kind.is_modify() || event.kind.is_create() || event.kind.is_remove()) {
                        return;
                    }
                    for path in &event.paths {
                        let Some(namespace) = namespace_of(path) else {
                            continue;
                        };
                        tracing::info!(namespace, "Namespace file change detected, reloading...");
                        if let Err(e) = reload_namespace(&store, &dir, &namespace) {
                            tracing::error!(namespace, "Failed to reload namespace: {}. Keeping current values.", e);
                        }
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(poll_interval),
        )?;

        watcher.watch(&self.dir, RecursiveMode::NonRecursive)?;

        tracing::info!(dir = ?self.dir, "Config directory watcher started");
        Ok(watcher)
    }
}

impl ConfigSource for FileSource {
    fn get(&self, namespace: &str, key: &str, default_val: &str) -> Result<String, FetchError> {
        Ok(self
            .store
            .get(namespace, key)
            .unwrap_or_else(|| default_val.to_string()))
    }

    fn subscribe(&self, namespace: &str, listener: Arc<dyn ChangeListener>) -> Result<(), FetchError> {
        self.store.subscribe(namespace, listener);
        Ok(())
    }
}

fn namespace_of(path: &Path) -> Option<String> {
    if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
        return None;
    }
    path.file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn namespace_files(dir: &Path) -> Result<Vec<(String, PathBuf)>, FileSourceError> {
    let io_error = |e| FileSourceError::Io {
        path: dir.to_path_buf(),
        source: e,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        if let Some(namespace) = namespace_of(&path) {
            files.push((namespace, path));
        }
    }
    Ok(files)
}

fn reload_namespace(
    store: &NamespaceStore,
    dir: &Path,
    namespace: &str,
) -> Result<ChangeEvent, FileSourceError> {
    let path = dir.join(format!("{namespace}.{EXTENSION}"));
    let properties = if path.exists() {
        load_namespace(&path)?
    } else {
        Properties::new()
    };
    Ok(store.replace(namespace, properties))
}

fn load_namespace(path: &Path) -> Result<Properties, FileSourceError> {
    let content = fs::read_to_string(path).map_err(|e| FileSourceError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let table: toml::Table = toml::from_str(&content).map_err(|e| FileSourceError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(table
        .into_iter()
        .map(|(key, value)| (key, render(value)))
        .collect())
}

fn render(value: toml::Value) -> String {
    match value {
        toml::Value::String(s) => s,
        other => serde_json::to_string(&other).unwrap_or_else(|_| other.to_string()),
    }
}
