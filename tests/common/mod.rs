#![allow(dead_code)]

pub mod engines;
pub mod fixtures;
pub mod pdf_assertions;

use lopdf::Document as LopdfDocument;
use polypdf::{Artifact, CycleStatus, GenerationHandle, GenerationHooks, PipelineError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Upper bound for any single wait in these tests.
pub const SETTLE_TIMEOUT: Duration = Duration::from_secs(10);

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Wrapper around a generated PDF with helper methods
pub struct GeneratedPdf {
    pub bytes: Vec<u8>,
    pub doc: LopdfDocument,
}

impl GeneratedPdf {
    /// Create a GeneratedPdf from raw bytes
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, Box<dyn std::error::Error>> {
        let doc = LopdfDocument::load_mem(&bytes)?;
        Ok(Self { bytes, doc })
    }

    pub fn from_artifact(artifact: &Artifact) -> Result<Self, Box<dyn std::error::Error>> {
        Self::from_bytes(artifact.bytes().to_vec())
    }

    /// Get the number of pages in the PDF
    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    /// Text drawn on each page, one line per text operation.
    pub fn page_texts(&self) -> Vec<String> {
        pdf_assertions::page_texts(&self.doc)
    }
}

/// Records everything a generation handle delivers through its hooks.
#[derive(Clone, Default)]
pub struct Recorder {
    starts: Arc<AtomicUsize>,
    blobs: Arc<Mutex<Vec<Artifact>>>,
    errors: Arc<Mutex<Vec<String>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hooks(&self) -> GenerationHooks {
        let starts = Arc::clone(&self.starts);
        let blobs = Arc::clone(&self.blobs);
        let errors = Arc::clone(&self.errors);
        GenerationHooks::new()
            .on_start(move || {
                starts.fetch_add(1, Ordering::SeqCst);
            })
            .on_blob(move |artifact| blobs.lock().unwrap().push(artifact))
            .on_error(move |error: PipelineError| errors.lock().unwrap().push(error.to_string()))
    }

    pub fn starts(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    pub fn blobs(&self) -> Vec<Artifact> {
        self.blobs.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }

    pub fn pdf(&self, index: usize) -> GeneratedPdf {
        let blobs = self.blobs();
        GeneratedPdf::from_artifact(&blobs[index]).expect("delivered blob should be a valid PDF")
    }
}

/// Waits for the handle to settle, failing the test instead of hanging.
pub async fn settle(handle: &GenerationHandle) -> CycleStatus {
    tokio::time::timeout(SETTLE_TIMEOUT, handle.wait_settled())
        .await
        .expect("generation did not settle in time")
}
