use crate::error::RenderError;
use std::sync::Arc;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// A reference-counted container for shared, immutable bytes.
pub type SharedData = Arc<Vec<u8>>;

/// Serialized output of an engine, chunk by chunk.
pub type ByteStream = Box<dyn Iterator<Item = Result<Vec<u8>, RenderError>> + Send>;

/// A complete binary document delivered to the caller (a "blob").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    data: SharedData,
    content_type: &'static str,
}

impl Artifact {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data: Arc::new(data),
            content_type: PDF_CONTENT_TYPE,
        }
    }

    /// Drains `stream` into one artifact. Any failing chunk fails the whole
    /// artifact; no partial output is produced.
    pub fn collect(stream: ByteStream) -> Result<Self, RenderError> {
        let mut data = Vec::new();
        for chunk in stream {
            data.extend_from_slice(&chunk?);
        }
        Ok(Self::new(data))
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn shared(&self) -> SharedData {
        Arc::clone(&self.data)
    }

    pub fn content_type(&self) -> &'static str {
        self.content_type
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
