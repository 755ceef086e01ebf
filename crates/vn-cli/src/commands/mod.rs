pub mod check;
pub mod endings;
pub mod play;

use std::path::Path;
use std::sync::Arc;

use vn_core::PassageGraph;
use vn_engine::AssetManifest;

/// Read and validate a Twison story file.
fn load_story(path: &Path) -> Result<Arc<PassageGraph>, String> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read story '{}': {e}", path.display()))?;
    let graph = vn_core::twine::parse_story(&json)
        .map_err(|e| format!("invalid story '{}': {e}", path.display()))?;
    tracing::info!(path = %path.display(), passages = graph.len(), "loaded story");
    Ok(Arc::new(graph))
}

/// Read an asset manifest, or an empty one when no path is given.
fn load_assets(path: Option<&Path>) -> Result<Arc<AssetManifest>, String> {
    let Some(path) = path else {
        return Ok(Arc::new(AssetManifest::new()));
    };
    let json = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read assets '{}': {e}", path.display()))?;
    let manifest = AssetManifest::from_json(&json)
        .map_err(|e| format!("invalid assets '{}': {e}", path.display()))?;
    Ok(Arc::new(manifest))
}
