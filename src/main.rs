use polypdf::{generate_pdf, BlobProvider, CycleState, MountedDocument, PipelineError};
use std::env;
use std::fs;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// A simple CLI to generate a PDF from a JSON component description.
fn main() -> Result<(), PipelineError> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 3 {
        eprintln!("Generates a PDF from a JSON component tree.");
        eprintln!();
        eprintln!("Usage: {} <path/to/document.json> <path/to/output.pdf>", args[0]);
        std::process::exit(1);
    }
    let document_path = &args[1];
    let output_path = &args[2];

    println!("Loading document from {}", document_path);
    let json = fs::read_to_string(document_path)?;
    let document = MountedDocument::from_json(&json)?;

    let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;
    let provider = BlobProvider::new();
    let status = runtime.block_on(async {
        let handle = generate_pdf(document.source(), provider.hooks())?;
        let status = handle.wait_settled().await;
        handle.dispose();
        Ok::<_, PipelineError>(status)
    })?;

    if status.state == CycleState::Failed {
        let state = provider.state();
        let message = state
            .error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "generation failed".to_string());
        return Err(PipelineError::Other(message));
    }

    provider.save_to(output_path)?;
    println!("Successfully generated {}", output_path);
    Ok(())
}
