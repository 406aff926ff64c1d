use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Name of the data directory, both local and in the home directory
pub const DATA_DIR_NAME: &str = ".dayfocus";

/// Get the data directory - checks for a local .dayfocus first, then falls back to global ~/.dayfocus
pub fn get_data_dir() -> Result<PathBuf> {
    let current_dir = env::current_dir().context("Could not determine current directory")?;
    if let Some(local_dir) = find_local_data_dir(&current_dir) {
        return Ok(local_dir);
    }

    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(DATA_DIR_NAME))
}

/// Find a local .dayfocus directory by walking up the directory tree
fn find_local_data_dir(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir;

    loop {
        let data_dir = current.join(DATA_DIR_NAME);
        if data_dir.is_dir() {
            return Some(data_dir);
        }
        current = current.parent()?;
    }
}

/// Ensure the data directory exists
pub fn ensure_data_dir() -> Result<PathBuf> {
    let dir = get_data_dir()?;
    if !dir.exists() {
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    }
    Ok(dir)
}

/// Initialize a local .dayfocus directory in the current directory
pub fn init_local_data_dir() -> Result<PathBuf> {
    let current_dir = env::current_dir().context("Could not determine current directory")?;
    let data_dir = current_dir.join(DATA_DIR_NAME);

    if data_dir.exists() {
        anyhow::bail!("Data directory already exists: {}", data_dir.display());
    }

    fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create directory: {}", data_dir.display()))?;

    Ok(data_dir)
}

/// The task store (date -> tasks)
pub fn store_file(dir: &Path) -> PathBuf {
    dir.join("data.json")
}

/// User settings
pub fn settings_file(dir: &Path) -> PathBuf {
    dir.join("settings.json")
}

/// Log output (the TUI owns the terminal)
pub fn log_file(dir: &Path) -> PathBuf {
    dir.join("dayfocus.log")
}

/// Atomically write content to a file using temp file + rename
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp_file = NamedTempFile::new_in(dir)
        .context("Failed to create temporary file")?;

    temp_file
        .write_all(content.as_bytes())
        .context("Failed to write to temporary file")?;

    temp_file
        .as_file()
        .sync_all()
        .context("Failed to sync temporary file")?;

    temp_file
        .persist(path)
        .with_context(|| format!("Failed to persist file: {}", path.display()))?;

    Ok(())
}

/// Read file content, return empty string if file doesn't exist
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(String::new());
    }
    fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))
}

/// Create a backup of a file with timestamp
pub fn backup_file<P: AsRef<Path>>(path: P) -> Result<PathBuf> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(path.to_path_buf());
    }

    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let backup_path = path.with_extension(format!("bak.{}.json", timestamp));

    fs::copy(path, &backup_path)
        .with_context(|| format!("Failed to backup file: {}", path.display()))?;

    Ok(backup_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_data_dir() {
        let dir = get_data_dir().unwrap();
        assert!(dir.to_string_lossy().contains(DATA_DIR_NAME));
    }

    #[test]
    fn test_find_local_data_dir_walks_up() {
        let temp_dir = tempfile::tempdir().unwrap();
        let data_dir = temp_dir.path().join(DATA_DIR_NAME);
        fs::create_dir_all(&data_dir).unwrap();
        let nested = temp_dir.path().join("projects").join("notes");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_local_data_dir(&nested), Some(data_dir));
    }

    #[test]
    fn test_file_names() {
        let dir = Path::new("/tmp/focus");
        assert_eq!(store_file(dir), dir.join("data.json"));
        assert_eq!(settings_file(dir), dir.join("settings.json"));
        assert_eq!(log_file(dir), dir.join("dayfocus.log"));
    }

    #[test]
    fn test_atomic_write_and_read() {
        let temp_dir = tempfile::tempdir().unwrap();
        let test_file = temp_dir.path().join("test.json");

        atomic_write(&test_file, "{}").unwrap();
        assert_eq!(read_file(&test_file).unwrap(), "{}");

        atomic_write(&test_file, "{\"a\": 1}").unwrap();
        assert_eq!(read_file(&test_file).unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn test_read_nonexistent_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let test_file = temp_dir.path().join("nonexistent.json");

        assert_eq!(read_file(&test_file).unwrap(), "");
    }

    #[test]
    fn test_backup_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let test_file = temp_dir.path().join("data.json");

        atomic_write(&test_file, "not json").unwrap();
        let backup_path = backup_file(&test_file).unwrap();

        assert_ne!(backup_path, test_file);
        assert_eq!(read_file(&backup_path).unwrap(), "not json");
    }
}
