//! Project root discovery

use std::path::{Path, PathBuf};
use tracing::debug;

/// Entries whose presence marks a directory as the project root
pub const ROOT_MARKERS: [&str; 3] = ["requirements.txt", "README.md", "data"];

/// Upper bound on the number of ancestors inspected
pub const MAX_ASCENT: usize = 64;

/// Walk upward from `start` until a directory holds one of [`ROOT_MARKERS`].
/// Falls back to `start` itself when nothing matches within [`MAX_ASCENT`]
/// levels. Never fails.
pub fn find_project_root(start: &Path) -> PathBuf {
    for dir in start.ancestors().take(MAX_ASCENT + 1) {
        if let Some(marker) = ROOT_MARKERS.iter().find(|m| is_marker(dir, m)) {
            debug!(root = %dir.display(), marker, "project root found");
            return dir.to_path_buf();
        }
    }
    debug!(start = %start.display(), "no project marker found, using start directory");
    start.to_path_buf()
}

fn is_marker(dir: &Path, marker: &str) -> bool {
    let candidate = dir.join(marker);
    if marker == "data" {
        candidate.is_dir()
    } else {
        candidate.is_file()
    }
}
