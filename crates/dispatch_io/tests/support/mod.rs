use std::path::{Path, PathBuf};

use dispatch_io::data_dir::{AGENTS_FILE, EDGES_FILE, NODES_FILE, RESTAURANTS_FILE};

/// The sample data directory shipped with the repository.
pub fn shipped_data_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../data")
}

/// Copy the static sample files into a fresh temp directory so tests can
/// write history and customers without touching the repository.
pub fn scratch_data_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("temp dir");
    for name in [NODES_FILE, EDGES_FILE, RESTAURANTS_FILE, AGENTS_FILE] {
        std::fs::copy(shipped_data_dir().join(name), dir.path().join(name)).expect("copy sample");
    }
    dir
}
