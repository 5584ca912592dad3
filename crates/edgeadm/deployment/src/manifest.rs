//! Offline manifest bundles

use crate::backend::{ManifestRenderer, RenderOptions};
use crate::error::{DeploymentError, Result};
use edgeadm_types::constants::YAML_SEPARATOR;
use edgeadm_types::DeploymentTarget;
use std::path::PathBuf;
use tracing::{debug, instrument};

/// Render `target` and prepend the user-supplied manifest files
///
/// Each extra file is emitted verbatim followed by a YAML document
/// separator, then the rendered chart output.
#[instrument(skip(renderer, target, extra_files), fields(component = %target.component_name))]
pub async fn generate_manifests(
    renderer: &dyn ManifestRenderer,
    target: &DeploymentTarget,
    extra_files: &[PathBuf],
    options: &RenderOptions,
) -> Result<String> {
    let mut bundle = String::new();
    for path in extra_files {
        let content =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| DeploymentError::Manifest {
                    path: path.display().to_string(),
                    source,
                })?;
        debug!(path = %path.display(), "Adding manifest file");
        bundle.push_str(&content);
        if !content.ends_with('\n') {
            bundle.push('\n');
        }
        bundle.push_str(YAML_SEPARATOR);
    }

    let rendered = renderer
        .render(target, options)
        .await
        .map_err(|source| DeploymentError::Render {
            component: target.component_name.clone(),
            source,
        })?;
    bundle.push_str(&rendered);
    Ok(bundle)
}
