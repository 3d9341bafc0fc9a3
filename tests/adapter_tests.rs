mod common;

use common::engines::TestEngine;
use common::fixtures::*;
use common::pdf_assertions::font_sizes;
use common::{init_logger, settle, Recorder, TestResult};
use polypdf::types::NodeKind;
use polypdf::{GeneratorBuilder, MountedDocument, Registry};
use serde_json::json;
use std::sync::Arc;

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn style_change_regenerates_with_new_style() -> TestResult {
    init_logger();
    let doc = mount(static_document());
    let engine = TestEngine::new();
    let recorder = Recorder::new();

    let handle = GeneratorBuilder::new()
        .with_shared_engine(engine.clone())
        .with_hooks(recorder.hooks())
        .build()?
        .generate(doc.source())?;
    settle(&handle).await;

    let id = doc.components_of(NodeKind::Text)[0];
    doc.set_style(id, json!({ "fontSize": 30 }).as_object().cloned().unwrap_or_default())?;
    let status = settle(&handle).await;

    assert_eq!(status.cycle, 2);
    assert_eq!(font_sizes(&recorder.pdf(0).doc), vec![12.0, 18.0]);
    assert_eq!(font_sizes(&recorder.pdf(1).doc), vec![30.0, 18.0]);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn foreign_markup_is_ignored() -> TestResult {
    init_logger();
    let doc = mount(json!({
        "type": "DOCUMENT",
        "children": [
            { "type": "div", "text": "not part of the document" },
            { "type": "PAGE", "children": [
                { "type": "TEXT", "text": "Kept" },
                { "type": "", "children": [{ "type": "TEXT", "text": "Dropped" }] }
            ]}
        ]
    }));
    let engine = TestEngine::new();
    let recorder = Recorder::new();

    let handle = GeneratorBuilder::new()
        .with_shared_engine(engine.clone())
        .with_hooks(recorder.hooks())
        .build()?
        .generate(doc.source())?;
    settle(&handle).await;

    let pdf = recorder.pdf(0);
    assert_pdf_page_count!(pdf, 1);
    assert_pdf_page_texts!(pdf, ["Kept"]);
    Ok(())
}

#[test]
fn unmount_releases_registry_entries() -> TestResult {
    let registry = Arc::new(Registry::new());
    let spec = serde_json::from_value(numbered_document(4))?;
    let doc = MountedDocument::mount_in(&spec, Arc::clone(&registry))?;

    // DOCUMENT, four PAGEs, four TEXTs: props and style each, plus four callbacks.
    assert_eq!(registry.len(), 9 * 2 + 4);
    drop(doc);
    assert!(registry.is_empty());
    Ok(())
}

#[test]
fn keys_stay_unique_across_documents_sharing_a_registry() -> TestResult {
    let registry = Arc::new(Registry::new());
    let spec = serde_json::from_value(static_document())?;
    let a = MountedDocument::mount_in(&spec, Arc::clone(&registry))?;
    let b = MountedDocument::mount_in(&spec, Arc::clone(&registry))?;

    let ids_a: Vec<_> = a.components().collect();
    assert!(b.components().all(|id| !ids_a.contains(&id)));

    drop(a);
    assert_eq!(registry.len(), ids_a.len() * 2);
    drop(b);
    assert!(registry.is_empty());
    Ok(())
}
