use crate::ProtoResult;
use std::{
    ffi::OsString,
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
};
use tracing::{debug, warn};
use wgstar_lib::constant::WG_CONF_FILE_MODE;

/// Creates `dir` (and its parents) if it does not exist yet, applying `mode`
/// to the directory we created. Existing directories are left alone.
pub fn ensure_dir(dir: &Path, mode: u32) -> ProtoResult<()> {
    if dir.as_os_str().is_empty() || dir.exists() {
        return Ok(());
    }

    fs::create_dir_all(dir)?;
    set_mode(dir, mode)?;
    debug!("Created directory {} with mode {mode:o}", dir.display());

    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    match path.file_name() {
        Some(name) => {
            let mut tmp = OsString::from(".");
            tmp.push(name);
            tmp.push(".tmp");
            path.with_file_name(tmp)
        }
        None => path.with_extension("tmp"),
    }
}

/// Replaces `path` with `contents`, readable and writable by the owner only.
///
/// The data is written to a sibling temp file first and renamed over the
/// target, so readers never observe a half-written file.
pub fn write_private(path: &Path, contents: &str, dir_mode: u32) -> ProtoResult<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent, dir_mode)?;
    }

    let tmp = temp_path(path);
    let written = write_temp(&tmp, contents).and_then(|_| fs::rename(&tmp, path));

    if let Err(e) = written {
        if let Err(cleanup) = fs::remove_file(&tmp) {
            warn!("Could not remove temp file {}: {cleanup}", tmp.display());
        }
        return Err(e.into());
    }

    Ok(())
}

fn write_temp(tmp: &Path, contents: &str) -> io::Result<()> {
    let mut file = open_private(tmp)?;
    file.write_all(contents.as_bytes())?;
    file.sync_all()?;
    drop(file);

    // `mode` on open is filtered through the umask.
    set_mode(tmp, WG_CONF_FILE_MODE)
}

#[cfg(unix)]
fn open_private(path: &Path) -> io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;

    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(WG_CONF_FILE_MODE)
        .open(path)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> io::Result<File> {
    File::create(path)
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_private_replaces_contents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("wg0.conf");

        write_private(&path, "first\n", 0o700).unwrap();
        write_private(&path, "second\n", 0o700).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second\n");
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn test_temp_path_is_hidden_sibling() {
        assert_eq!(
            temp_path(Path::new("/etc/wireguard/wg0.conf")),
            PathBuf::from("/etc/wireguard/.wg0.conf.tmp")
        );
    }

    #[test]
    #[cfg(unix)]
    fn test_write_private_sets_modes() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        let path = nested.join("wg0.conf");

        write_private(&path, "data\n", 0o700).unwrap();

        let file_mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(file_mode, 0o600);
        let dir_mode = fs::metadata(&nested).unwrap().permissions().mode() & 0o777;
        assert_eq!(dir_mode, 0o700);
    }

    #[test]
    #[cfg(unix)]
    fn test_ensure_dir_leaves_existing_directory_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let existing = dir.path().join("existing");
        fs::create_dir(&existing).unwrap();
        fs::set_permissions(&existing, fs::Permissions::from_mode(0o750)).unwrap();

        ensure_dir(&existing, 0o700).unwrap();

        let mode = fs::metadata(&existing).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o750);
    }
}
