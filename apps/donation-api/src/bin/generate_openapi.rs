//! Write the OpenAPI document for donation-api.
//!
//! Usage:
//!   cargo run -p donation-api --bin generate-openapi [-- <out.json>]
//!
//! Defaults to `specs/donation-api.json` at the workspace root.

use std::path::{Path, PathBuf};

use utoipa::OpenApi;

fn main() {
    let doc = donation_api::routes::ApiDoc::openapi()
        .to_pretty_json()
        .expect("failed to serialize OpenAPI document");

    let out = std::env::args().nth(1).map(PathBuf::from).unwrap_or_else(|| {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../../specs/donation-api.json")
    });
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent).expect("failed to create output directory");
    }
    std::fs::write(&out, doc).expect("failed to write OpenAPI document");
    println!("Wrote {}", out.display());
}
