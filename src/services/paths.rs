use std::path::PathBuf;
use std::sync::OnceLock;

static DATA_DIR: OnceLock<PathBuf> = OnceLock::new();

const SAVEDATA_DIR_NAME: &str = "savedata";
const DATA_DIR_ENV: &str = "ELIAI_DATA_DIR";

fn exe_dir() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    exe.parent().map(|p| p.to_path_buf())
}

/// Resolve and create the application's data directory.
///
/// Single source of truth:
/// - `ELIAI_DATA_DIR` when set
/// - `<exe_dir>/savedata` otherwise
pub(crate) fn init_data_dir() -> Result<PathBuf, String> {
    if let Some(dir) = DATA_DIR.get() {
        return Ok(dir.clone());
    }

    let dir = match std::env::var(DATA_DIR_ENV).ok().filter(|v| !v.trim().is_empty()) {
        Some(dir) => PathBuf::from(dir.trim()),
        None => exe_dir()
            .ok_or_else(|| "Failed to resolve executable directory".to_string())?
            .join(SAVEDATA_DIR_NAME),
    };

    std::fs::create_dir_all(&dir).map_err(|e| format!("Failed to create data directory: {e}"))?;
    let _ = DATA_DIR.set(dir.clone());
    Ok(dir)
}
