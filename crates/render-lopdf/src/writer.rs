use crate::flow::{PageSize, TextLine};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use polypdf_render_core::{DocumentMetadata, RenderError};

const DEFAULT_PDF_VERSION: &str = "1.7";
const LINE_SPACING: f32 = 1.2;

/// Builds the object graph of one PDF document, page by page.
pub(crate) struct DocumentWriter {
    document: Document,
    pages_id: ObjectId,
    page_ids: Vec<ObjectId>,
    resources_id: ObjectId,
}

impl DocumentWriter {
    pub(crate) fn new(metadata: &DocumentMetadata) -> Self {
        let version = metadata.pdf_version.as_deref().unwrap_or(DEFAULT_PDF_VERSION);
        let mut document = Document::with_version(version);
        let pages_id = document.new_object_id();
        let resources_id = document.new_object_id();

        let font_id = document.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        document.objects.insert(
            resources_id,
            Object::Dictionary(dictionary! {
                "Font" => dictionary! { "F1" => font_id },
            }),
        );

        Self {
            document,
            pages_id,
            page_ids: Vec::new(),
            resources_id,
        }
    }

    pub(crate) fn add_page(&mut self, size: PageSize, padding: f32, lines: &[TextLine]) -> Result<(), RenderError> {
        let mut page_ctx = PageContext::new(size, padding);
        for line in lines {
            page_ctx.draw_line(line);
        }
        let content = page_ctx.finish();

        let content_id = self
            .document
            .add_object(Stream::new(Dictionary::new(), content.encode()?));
        let page_id = self.document.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![0.into(), 0.into(), size.width.into(), size.height.into()],
            "Contents" => content_id,
            "Resources" => self.resources_id,
        });
        self.page_ids.push(page_id);
        Ok(())
    }

    /// Closes the page tree, writes the catalog and info dictionaries, and
    /// serializes the document.
    pub(crate) fn finish(mut self, metadata: &DocumentMetadata, compress: bool) -> Result<Vec<u8>, RenderError> {
        let kids: Vec<Object> = self.page_ids.iter().map(|id| Object::from(*id)).collect();
        let count = kids.len() as i64;
        self.document.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let mut catalog = dictionary! { "Type" => "Catalog", "Pages" => self.pages_id };
        if let Some(lang) = &metadata.language {
            catalog.set("Lang", text_string(lang));
        }
        if let Some(mode) = &metadata.page_mode {
            catalog.set("PageMode", Object::Name(pdf_name(mode).into_bytes()));
        }
        if let Some(layout) = &metadata.page_layout {
            catalog.set("PageLayout", Object::Name(pdf_name(layout).into_bytes()));
        }
        let catalog_id = self.document.add_object(catalog);
        self.document.trailer.set("Root", catalog_id);

        let entries = metadata.info_entries();
        if !entries.is_empty() {
            let mut info = Dictionary::new();
            for (name, value) in entries {
                info.set(name, text_string(&value));
            }
            let info_id = self.document.add_object(info);
            self.document.trailer.set("Info", info_id);
        }

        if compress {
            self.document.compress();
        }

        let mut bytes = Vec::new();
        self.document.save_to(&mut bytes)?;
        Ok(bytes)
    }
}

struct PageContext {
    page_height: f32,
    padding: f32,
    cursor_y: f32,
    content: Content,
    state: PageRenderState,
}

/// Graphics state already emitted on this page. Fill color starts out black.
#[derive(Default, Clone)]
struct PageRenderState {
    font_size: f32,
    fill_color: [f32; 3],
}

impl PageContext {
    fn new(size: PageSize, padding: f32) -> Self {
        Self {
            page_height: size.height,
            padding,
            cursor_y: padding,
            content: Content { operations: vec![] },
            state: PageRenderState::default(),
        }
    }

    fn finish(self) -> Content {
        self.content
    }

    fn set_font(&mut self, font_size: f32) {
        if self.state.font_size != font_size {
            self.content
                .operations
                .push(Operation::new("Tf", vec!["F1".into(), font_size.into()]));
            self.state.font_size = font_size;
        }
    }

    fn set_fill_color(&mut self, color: [f32; 3]) {
        if self.state.fill_color != color {
            self.content.operations.push(Operation::new(
                "rg",
                color.iter().map(|c| Object::Real(*c)).collect(),
            ));
            self.state.fill_color = color;
        }
    }

    fn draw_line(&mut self, line: &TextLine) {
        let baseline_y = self.cursor_y + line.font_size * 0.8;
        let pdf_y = self.page_height - baseline_y;
        self.cursor_y += line.font_size * LINE_SPACING;

        self.content.operations.push(Operation::new("BT", vec![]));
        self.set_font(line.font_size);
        self.set_fill_color(line.color);
        self.content
            .operations
            .push(Operation::new("Td", vec![self.padding.into(), pdf_y.into()]));
        self.content.operations.push(Operation::new(
            "Tj",
            vec![Object::String(win_ansi(&line.text), StringFormat::Literal)],
        ));
        self.content.operations.push(Operation::new("ET", vec![]));
    }
}

/// Encodes text for a WinAnsiEncoding font. Characters outside the code page
/// become `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{20}'..='\u{7e}' | '\u{a0}'..='\u{ff}' => c as u8,
            '\u{20ac}' => 0x80,
            '\u{2026}' => 0x85,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201c}' => 0x93,
            '\u{201d}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\t' | '\n' | '\r' => b' ',
            _ => b'?',
        })
        .collect()
}

/// A PDF text string: literal for ASCII, UTF-16BE with a byte order mark
/// otherwise.
fn text_string(value: &str) -> Object {
    if value.is_ascii() {
        return Object::string_literal(value);
    }
    let mut bytes = vec![0xfe, 0xff];
    for unit in value.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

/// `useOutlines` → `UseOutlines`.
fn pdf_name(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}
