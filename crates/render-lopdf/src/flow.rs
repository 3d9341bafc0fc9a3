//! Turns a page subtree into drawable lines.

use log::debug;
use polypdf_idf::{DocumentNode, Element, ElementNode, RenderFn, Style};
use polypdf_types::{NodeKind, PaginationInfo};
use serde_json::Value;

const DEFAULT_FONT_SIZE: f32 = 12.0;

/// Page dimensions in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    pub const A4: PageSize = PageSize { width: 595.0, height: 842.0 };
    pub const LETTER: PageSize = PageSize { width: 612.0, height: 792.0 };
    pub const LEGAL: PageSize = PageSize { width: 612.0, height: 1008.0 };

    /// Reads the `size` and `orientation` props of a PAGE node.
    pub fn from_page(page: &ElementNode) -> Self {
        let size = match page.props.get("size") {
            Some(Value::String(name)) => match name.to_ascii_uppercase().as_str() {
                "LETTER" => PageSize::LETTER,
                "LEGAL" => PageSize::LEGAL,
                "A4" => PageSize::A4,
                other => {
                    debug!("Unknown page size '{}', using A4.", other);
                    PageSize::A4
                }
            },
            Some(Value::Array(dims)) if dims.len() == 2 => {
                match (dims[0].as_f64(), dims[1].as_f64()) {
                    (Some(w), Some(h)) => PageSize { width: w as f32, height: h as f32 },
                    _ => PageSize::A4,
                }
            }
            Some(Value::Object(dims)) => {
                match (
                    dims.get("width").and_then(Value::as_f64),
                    dims.get("height").and_then(Value::as_f64),
                ) {
                    (Some(w), Some(h)) => PageSize { width: w as f32, height: h as f32 },
                    _ => PageSize::A4,
                }
            }
            _ => PageSize::A4,
        };

        if page.props.get_str("orientation") == Some("landscape") {
            PageSize {
                width: size.height,
                height: size.width,
            }
        } else {
            size
        }
    }
}

/// One line of text with the style it is drawn in.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub font_size: f32,
    pub color: [f32; 3],
}

impl TextLine {
    fn styled(text: String, style: &Style) -> Self {
        Self {
            text,
            font_size: font_size(style),
            color: color(style),
        }
    }
}

/// Collects the lines of a page, calling render functions with `info`.
pub(crate) fn page_lines(page: &ElementNode, info: &PaginationInfo) -> Vec<TextLine> {
    let mut lines = Vec::new();
    for child in &page.children {
        collect_node(child, info, &page.style, &mut lines);
    }
    lines
}

fn collect_node(node: &DocumentNode, info: &PaginationInfo, inherited: &Style, lines: &mut Vec<TextLine>) {
    let el = match node {
        DocumentNode::TextInstance(value) => {
            push_line(lines, value.clone(), inherited);
            return;
        }
        DocumentNode::Element(el) => el,
    };
    let style = cascade(inherited, &el.style);

    if let Some(render) = &el.props.render {
        draw_rendered(el.kind, render, info, &style, lines);
        return;
    }

    match el.kind {
        NodeKind::Text => push_line(lines, node.text_content(), &style),
        NodeKind::Page | NodeKind::View | NodeKind::Link | NodeKind::Note => {
            for child in &el.children {
                collect_node(child, info, &style, lines);
            }
        }
        other => debug!("Node kind {} is not drawn by the reference engine.", other),
    }
}

/// Draws what a render function yields in place of the node's children.
fn draw_rendered(
    kind: NodeKind,
    render: &RenderFn,
    info: &PaginationInfo,
    style: &Style,
    lines: &mut Vec<TextLine>,
) {
    let elements = render(info);
    if kind == NodeKind::Text {
        let text: String = elements.iter().map(|element| element_text(element, info)).collect();
        push_line(lines, text, style);
    } else {
        for element in &elements {
            collect_element(element, info, style, lines);
        }
    }
}

fn collect_element(element: &Element, info: &PaginationInfo, inherited: &Style, lines: &mut Vec<TextLine>) {
    match element {
        Element::Text(value) => push_line(lines, value.clone(), inherited),
        Element::Node {
            kind,
            style,
            render,
            children,
            ..
        } => {
            let style = cascade(inherited, style);
            if let Some(render) = render {
                draw_rendered(*kind, render, info, &style, lines);
            } else if *kind == NodeKind::Text {
                push_line(lines, element_text(element, info), &style);
            } else {
                for child in children {
                    collect_element(child, info, &style, lines);
                }
            }
        }
    }
}

/// Text content of an element, with nested render functions resolved.
fn element_text(element: &Element, info: &PaginationInfo) -> String {
    match element {
        Element::Text(value) => value.clone(),
        Element::Node { render: Some(render), .. } => {
            render(info).iter().map(|child| element_text(child, info)).collect()
        }
        Element::Node { children, .. } => children.iter().map(|child| element_text(child, info)).collect(),
    }
}

fn push_line(lines: &mut Vec<TextLine>, text: String, style: &Style) {
    if !text.trim().is_empty() {
        lines.push(TextLine::styled(text, style));
    }
}

/// Text properties inherit; box properties do not.
fn cascade(parent: &Style, own: &Style) -> Style {
    let mut style: Style = parent
        .iter()
        .filter(|(k, _)| matches!(k.as_str(), "fontSize" | "color"))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    style.extend(own.iter().map(|(k, v)| (k.clone(), v.clone())));
    style
}

fn font_size(style: &Style) -> f32 {
    style
        .get("fontSize")
        .and_then(Value::as_f64)
        .map(|v| v as f32)
        .filter(|v| *v > 0.0)
        .unwrap_or(DEFAULT_FONT_SIZE)
}

fn color(style: &Style) -> [f32; 3] {
    let hex = match style.get("color").and_then(Value::as_str) {
        Some(c) => c.trim_start_matches('#'),
        None => return [0.0, 0.0, 0.0],
    };
    if hex.len() != 6 || !hex.is_ascii() {
        return [0.0, 0.0, 0.0];
    }
    let channel = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16)
            .map(|v| v as f32 / 255.0)
            .unwrap_or(0.0)
    };
    [channel(0), channel(2), channel(4)]
}

/// Padding of a page, in points.
pub(crate) fn padding(style: &Style) -> f32 {
    style
        .get("padding")
        .and_then(Value::as_f64)
        .map(|v| v as f32)
        .unwrap_or(40.0)
}
