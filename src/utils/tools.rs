//! External tool discovery
//!
//! Both fetch capabilities are command-line programs. Search order:
//! 1. Explicit path from the settings
//! 2. Next to the current executable
//! 3. System PATH
//! 4. Common installation directories

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Name of the general-purpose fetch tool
pub const YTDLP: &str = "yt-dlp";

/// Name of the Instagram fetch tool
pub const INSTALOADER: &str = "instaloader";

/// Find `name`, preferring `explicit` when it points at an executable
pub fn find_tool(name: &str, explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        if is_executable(path) {
            info!("✓ Using configured {}: {:?}", name, path);
            return Some(path.to_path_buf());
        }
        warn!("Configured {} is not executable: {:?}", name, path);
    }

    if let Some(adjacent) = find_next_to_exe(name) {
        info!("✓ Using bundled {}: {:?}", name, adjacent);
        return Some(adjacent);
    }

    if let Ok(path) = which::which(name) {
        info!("✓ Using system {}: {:?}", name, path);
        return Some(path);
    }

    if let Some(common) = find_in_common_paths(name) {
        info!("✓ Using {} from common path: {:?}", name, common);
        return Some(common);
    }

    warn!("✗ {} not found anywhere!", name);
    None
}

fn binary_name(name: &str) -> String {
    if cfg!(target_os = "windows") {
        format!("{}.exe", name)
    } else {
        name.to_string()
    }
}

fn find_next_to_exe(name: &str) -> Option<PathBuf> {
    let exe_path = std::env::current_exe().ok()?;
    let candidate = exe_path.parent()?.join(binary_name(name));
    debug!("Checking bundled path: {:?}", candidate);
    is_executable(&candidate).then_some(candidate)
}

fn find_in_common_paths(name: &str) -> Option<PathBuf> {
    let mut dirs_to_check = vec![
        // macOS Homebrew (Apple Silicon)
        PathBuf::from("/opt/homebrew/bin"),
        // macOS Homebrew (Intel)
        PathBuf::from("/usr/local/bin"),
        PathBuf::from("/usr/bin"),
        // Termux
        PathBuf::from("/data/data/com.termux/files/usr/bin"),
    ];
    if let Some(home) = dirs::home_dir() {
        // pip --user
        dirs_to_check.push(home.join(".local").join("bin"));
    }

    dirs_to_check
        .into_iter()
        .map(|dir| dir.join(binary_name(name)))
        .find(|path| is_executable(path))
}

/// Check if a file is executable
fn is_executable(path: &Path) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        match std::fs::metadata(path) {
            Ok(metadata) => metadata.is_file() && metadata.permissions().mode() & 0o111 != 0,
            Err(_) => false,
        }
    }

    #[cfg(not(unix))]
    {
        path.is_file()
    }
}
