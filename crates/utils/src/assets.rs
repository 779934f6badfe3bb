use std::path::PathBuf;

use directories::ProjectDirs;

/// Default directory for the JSON record files.
///
/// Debug builds keep their data next to the workspace so development runs
/// never touch a real profile.
pub fn data_dir() -> PathBuf {
    if cfg!(debug_assertions) {
        return PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../dev_data");
    }

    match ProjectDirs::from("dev", "roadmap", "roadmap") {
        Some(dirs) => dirs.data_dir().join("data"),
        None => {
            tracing::warn!("No platform data directory available, falling back to ./data");
            PathBuf::from("data")
        }
    }
}
