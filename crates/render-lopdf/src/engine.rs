use crate::flow::{self, PageSize};
use crate::writer::DocumentWriter;
use log::{debug, warn};
use polypdf_idf::DocumentNode;
use polypdf_render_core::{ByteStream, DocumentMetadata, LayoutEngine, RenderError};
use polypdf_types::{NodeKind, PaginationInfo};

const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// The reference engine: one physical page per PAGE node, one line per TEXT.
#[derive(Debug, Clone)]
pub struct LopdfEngine {
    compress: bool,
    chunk_size: usize,
}

impl Default for LopdfEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl LopdfEngine {
    pub fn new() -> Self {
        Self {
            compress: true,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Whether content streams are Flate-compressed. On by default.
    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Size of the chunks the output stream yields.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }
}

impl LayoutEngine for LopdfEngine {
    fn render(&self, document: &DocumentNode, metadata: &DocumentMetadata) -> Result<ByteStream, RenderError> {
        let root = match document.as_element() {
            Some(el) if el.kind == NodeKind::Document => el,
            _ => {
                return Err(RenderError::InvalidDocument(format!(
                    "expected a DOCUMENT root, found {}",
                    document.kind()
                )));
            }
        };

        let pages: Vec<_> = root
            .children
            .iter()
            .filter_map(|child| match child.as_element() {
                Some(el) if el.kind == NodeKind::Page => Some(el),
                _ => {
                    warn!("Skipping non-PAGE child of DOCUMENT: {}", child.kind());
                    None
                }
            })
            .collect();

        let total = pages.len();
        let mut writer = DocumentWriter::new(metadata);
        for (index, page) in pages.iter().enumerate() {
            let info = PaginationInfo::new(index + 1, total).with_sub_page(1, 1);
            let lines = flow::page_lines(page, &info);
            debug!("Page {}/{}: {} line(s)", index + 1, total, lines.len());
            writer.add_page(PageSize::from_page(page), flow::padding(&page.style), &lines)?;
        }

        let bytes = writer.finish(metadata, self.compress)?;
        let chunks: Vec<Result<Vec<u8>, RenderError>> =
            bytes.chunks(self.chunk_size).map(|chunk| Ok(chunk.to_vec())).collect();
        Ok(Box::new(chunks.into_iter()))
    }

    fn name(&self) -> &'static str {
        "lopdf"
    }
}
