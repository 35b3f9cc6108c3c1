//! Mock implementations of service traits for testing

use super::traits::{Extractor, GraphStore, Transport};
use crate::core::{SysrootError, SysrootResult};
use crate::graph::PackageGraph;
use crate::package::extractor::ArchiveFormat;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Mock transport serving canned responses from memory
///
/// Every requested URL is recorded, so tests can count downloads.
///
/// # Example
///
/// ```
/// use sysroot::di::mocks::MockTransport;
///
/// let transport = MockTransport::new();
/// transport.add_response("http://repo/a.deb", b"payload".to_vec());
/// assert!(transport.requests().is_empty());
/// ```
#[derive(Clone, Default)]
pub struct MockTransport {
    responses: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockTransport {
    /// Create a new mock transport with no responses
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `url`
    pub fn add_response(&self, url: impl Into<String>, body: Vec<u8>) {
        self.responses.lock().unwrap().insert(url.into(), body);
    }

    /// URLs requested so far, in order
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    fn respond(&self, url: &str) -> SysrootResult<Vec<u8>> {
        self.requests.lock().unwrap().push(url.to_string());
        self.responses
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| SysrootError::Transport(format!("{} returned 404 Not Found", url)))
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn fetch(&self, url: &str) -> SysrootResult<Vec<u8>> {
        self.respond(url)
    }

    async fn fetch_to_file(&self, url: &str, dest: &Path) -> SysrootResult<()> {
        let body = self.respond(url)?;
        std::fs::write(dest, body)?;
        Ok(())
    }
}

/// Mock extractor that records calls instead of unpacking
#[derive(Clone, Default)]
pub struct MockExtractor {
    calls: Arc<Mutex<Vec<(ArchiveFormat, PathBuf)>>>,
    fail_on: Arc<Mutex<Option<String>>>,
}

impl MockExtractor {
    /// Create a new mock extractor that always succeeds
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail extraction of any archive whose file name is `file_name`
    pub fn fail_on(&self, file_name: impl Into<String>) {
        *self.fail_on.lock().unwrap() = Some(file_name.into());
    }

    /// Archives extracted so far, in order
    pub fn calls(&self) -> Vec<(ArchiveFormat, PathBuf)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Extractor for MockExtractor {
    async fn extract(&self, format: ArchiveFormat, archive: &Path, _root: &Path) -> SysrootResult<()> {
        let failing = self.fail_on.lock().unwrap().clone();
        if let Some(name) = failing {
            if archive.file_name().is_some_and(|f| f == name.as_str()) {
                return Err(SysrootError::Extraction {
                    archive: archive.to_path_buf(),
                    status: "exit status: 2".to_string(),
                });
            }
        }

        self.calls
            .lock()
            .unwrap()
            .push((format, archive.to_path_buf()));
        Ok(())
    }
}

/// Mock graph store kept in memory
#[derive(Clone, Default)]
pub struct MemoryGraphStore {
    graph: Arc<Mutex<Option<PackageGraph>>>,
    saves: Arc<Mutex<usize>>,
}

impl MemoryGraphStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `graph`
    pub fn with_graph(graph: PackageGraph) -> Self {
        let store = Self::new();
        *store.graph.lock().unwrap() = Some(graph);
        store
    }

    /// Number of times `save` was called
    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap()
    }
}

impl GraphStore for MemoryGraphStore {
    fn load(&self) -> SysrootResult<Option<PackageGraph>> {
        Ok(self.graph.lock().unwrap().clone())
    }

    fn save(&self, graph: &PackageGraph) -> SysrootResult<()> {
        *self.graph.lock().unwrap() = Some(graph.clone());
        *self.saves.lock().unwrap() += 1;
        Ok(())
    }

    fn clear(&self) -> SysrootResult<()> {
        *self.graph.lock().unwrap() = None;
        Ok(())
    }
}
