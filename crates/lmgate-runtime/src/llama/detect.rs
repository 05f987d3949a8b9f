//! Locating the llama-server binary.

use std::path::{Path, PathBuf};

use tracing::debug;

/// Binary name searched on `PATH`.
pub const LLAMA_SERVER_BINARY: &str = "llama-server";

/// Find the llama-server binary.
///
/// An explicit path wins and must point at an existing file; otherwise
/// `PATH` is searched.
pub fn locate_llama_server(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        if path.is_file() {
            return Some(path.to_path_buf());
        }
        debug!(path = %path.display(), "Configured llama-server path does not exist");
        return None;
    }

    which::which(LLAMA_SERVER_BINARY).ok()
}
