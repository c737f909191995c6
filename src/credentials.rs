//! Model service credential discovery
//!
//! The API key for the model service is mounted as a file by the deployment
//! platform. Different platforms mount it in different places, so startup
//! walks an ordered list of candidate paths and takes the first usable file.
//! Not finding one is a supported mode: calls go out without `X-API-Key` and
//! the model service decides whether to reject them.

use std::fmt;
use std::path::{Path, PathBuf};

/// Secret mount used by the docker-compose deployment
pub const DOCKER_COMPOSE_PATH: &str = "/app/secrets/model_credentials";

/// Secret mount used by the kubernetes deployment
pub const KUBERNETES_PATH: &str = "/var/run/secrets/model-service/credentials";

/// Default search order for the credential file
pub fn default_search_paths() -> Vec<PathBuf> {
    vec![
        PathBuf::from(DOCKER_COMPOSE_PATH),
        PathBuf::from(KUBERNETES_PATH),
    ]
}

/// API key for the model service
///
/// Always non-empty and already trimmed. `Debug` never prints the token.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Build a credential from raw file content
    ///
    /// Returns `None` when nothing is left after trimming.
    pub fn new(raw: impl AsRef<str>) -> Option<Self> {
        let token = raw.as_ref().trim();
        if token.is_empty() {
            None
        } else {
            Some(Self(token.to_string()))
        }
    }

    /// Token value, for attaching to outbound requests
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Load the credential from the first usable path
///
/// Paths are tried in order. Missing files are skipped silently; files that
/// exist but cannot be read, or are blank, are skipped with a warning. When
/// nothing usable is found a warning is logged and `None` is returned.
pub fn load<P: AsRef<Path>>(paths: &[P]) -> Option<Credential> {
    for path in paths {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "Credential file not present");
            continue;
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match Credential::new(&content) {
                Some(credential) => {
                    tracing::info!(
                        path = %path.display(),
                        "Loaded model service credential"
                    );
                    return Some(credential);
                }
                None => {
                    tracing::warn!(
                        path = %path.display(),
                        "Credential file is empty, trying next location"
                    );
                }
            },
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Could not read credential file, trying next location"
                );
            }
        }
    }

    let searched: Vec<String> = paths
        .iter()
        .map(|p| p.as_ref().display().to_string())
        .collect();
    tracing::warn!(
        searched = ?searched,
        "No model service credential found; requests will be sent without X-API-Key"
    );
    None
}
