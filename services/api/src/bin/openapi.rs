//! services/api/src/bin/openapi.rs
//!
//! Writes the GeoWatch REST contract (auth, AOI and analysis routes) as an
//! OpenAPI document, for the dashboard's client generator and for review.
//!
//! Usage: `openapi [OUTPUT]`, defaulting to `openapi.json`.

use geowatch_api::web::rest::ApiDoc;
use utoipa::OpenApi;

const DEFAULT_OUTPUT: &str = "openapi.json";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let output = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_OUTPUT.to_string());

    let doc = ApiDoc::openapi();
    std::fs::write(&output, doc.to_pretty_json()?)?;

    println!("Wrote {} paths to {}", doc.paths.paths.len(), output);
    Ok(())
}
