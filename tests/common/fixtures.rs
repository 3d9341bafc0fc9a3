use polypdf::{ComponentSpec, MountedDocument};
use serde_json::{json, Value};

/// A one-page document with plain text only.
pub fn static_document() -> Value {
    json!({
        "type": "DOCUMENT",
        "props": { "title": "Static", "author": "Tests" },
        "children": [
            { "type": "PAGE", "children": [
                { "type": "TEXT", "text": "Hello, world" },
                { "type": "VIEW", "children": [
                    { "type": "TEXT", "text": "Nested", "style": { "fontSize": 18 } }
                ]}
            ]}
        ]
    })
}

/// `pages` pages, each showing "page X of Y" through a render template.
pub fn numbered_document(pages: usize) -> Value {
    let pages: Vec<Value> = (0..pages)
        .map(|_| {
            json!({ "type": "PAGE", "children": [
                { "type": "TEXT", "render": "page {pageNumber} of {totalPages}" }
            ]})
        })
        .collect();
    json!({ "type": "DOCUMENT", "children": pages })
}

/// A page number footer under regular content.
pub fn report_with_footer() -> Value {
    json!({
        "type": "DOCUMENT",
        "props": { "title": "Report" },
        "children": [
            { "type": "PAGE", "children": [
                { "type": "TEXT", "text": "Summary" },
                { "type": "TEXT", "render": "{pageNumber}/{totalPages}" }
            ]},
            { "type": "PAGE", "children": [
                { "type": "TEXT", "text": "Details" },
                { "type": "TEXT", "render": "{pageNumber}/{totalPages}" }
            ]},
            { "type": "PAGE", "children": [
                { "type": "TEXT", "text": "Appendix" },
                { "type": "TEXT", "render": "{pageNumber}/{totalPages}" }
            ]}
        ]
    })
}

pub fn mount(value: Value) -> MountedDocument {
    let spec: ComponentSpec = serde_json::from_value(value).expect("fixture should be a valid component spec");
    MountedDocument::mount(&spec).expect("fixture should mount")
}
