use crate::constants::LISTING_HEADER;
use std::fmt::Write as _;
use std::fs::{self, Metadata};
use std::io;
use std::path::{Path, PathBuf};

/// Filesystem operations the command loop relies on. Every call is
/// resolved against the directory the session is currently in, never the
/// process working directory.
pub trait DirectoryService: Send + Sync {
    /// Tab separated listing of `dir`, one row per entry.
    fn list(&self, dir: &Path) -> io::Result<String>;

    /// Resolves `target` against `current` and returns the new directory.
    fn change_directory(&self, current: &Path, target: &str) -> io::Result<PathBuf>;

    /// Path of a file named by a client, relative to `current`.
    fn resolve(&self, current: &Path, name: &str) -> PathBuf {
        current.join(name)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LocalDirectory;

impl DirectoryService for LocalDirectory {
    fn list(&self, dir: &Path) -> io::Result<String> {
        let mut entries = fs::read_dir(dir)?.collect::<io::Result<Vec<_>>>()?;
        entries.sort_by_key(|entry| entry.file_name());

        let mut listing = String::from(LISTING_HEADER);
        for (id, entry) in entries.iter().enumerate() {
            let metadata = entry.metadata()?;
            let _ = writeln!(
                listing,
                "{}\t{}\t{}\t\t{}",
                id,
                entry.file_name().to_string_lossy(),
                format_mode(&metadata),
                metadata.len()
            );
        }
        Ok(listing)
    }

    fn change_directory(&self, current: &Path, target: &str) -> io::Result<PathBuf> {
        let target = target.trim();
        let candidate = if target.is_empty() {
            current.to_path_buf()
        } else {
            current.join(target)
        };
        let resolved = candidate.canonicalize()?;
        if !resolved.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!("{}: not a directory", target),
            ));
        }
        Ok(resolved)
    }
}

/// `ls`-style ten character mode string, e.g. `drwxr-xr-x`.
pub fn format_mode(metadata: &Metadata) -> String {
    let kind = if metadata.is_dir() {
        'd'
    } else if metadata.file_type().is_symlink() {
        'L'
    } else {
        '-'
    };

    let mut mode = String::with_capacity(10);
    mode.push(kind);
    mode.push_str(&permission_bits(metadata));
    mode
}

#[cfg(unix)]
fn permission_bits(metadata: &Metadata) -> String {
    use std::os::unix::fs::PermissionsExt;

    let bits = metadata.permissions().mode();
    const FLAGS: [(u32, char); 9] = [
        (0o400, 'r'),
        (0o200, 'w'),
        (0o100, 'x'),
        (0o040, 'r'),
        (0o020, 'w'),
        (0o010, 'x'),
        (0o004, 'r'),
        (0o002, 'w'),
        (0o001, 'x'),
    ];
    FLAGS
        .iter()
        .map(|&(flag, c)| if bits & flag != 0 { c } else { '-' })
        .collect()
}

#[cfg(not(unix))]
fn permission_bits(metadata: &Metadata) -> String {
    if metadata.permissions().readonly() {
        "r--r--r--".to_string()
    } else {
        "rw-rw-rw-".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), b"12345").unwrap();
        fs::write(dir.path().join("a.txt"), b"").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();

        let listing = LocalDirectory.list(dir.path()).unwrap();
        let lines: Vec<&str> = listing.lines().collect();
        assert_eq!(lines[0], "ID\tFilename\tMode\tSize(byte)");
        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("0\ta.txt\t-"));
        assert!(lines[2].starts_with("1\tb.txt\t-"));
        assert!(lines[2].ends_with("\t\t5"));
        assert!(lines[3].starts_with("2\tsub\td"));
    }

    #[test]
    fn test_listing_is_stable() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["zeta", "alpha", "mid"] {
            fs::write(dir.path().join(name), name).unwrap();
        }
        let first = LocalDirectory.list(dir.path()).unwrap();
        let second = LocalDirectory.list(dir.path()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_directory_lists_header_only() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(LocalDirectory.list(dir.path()).unwrap(), LISTING_HEADER);
    }

    #[test]
    fn test_change_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("inner")).unwrap();
        fs::write(dir.path().join("file"), b"x").unwrap();
        let root = dir.path().canonicalize().unwrap();

        let inner = LocalDirectory.change_directory(&root, "inner").unwrap();
        assert_eq!(inner, root.join("inner"));

        let back = LocalDirectory.change_directory(&inner, "..").unwrap();
        assert_eq!(back, root);

        assert!(LocalDirectory.change_directory(&root, "missing").is_err());
        assert!(LocalDirectory.change_directory(&root, "file").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_format_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("script.sh");
        fs::write(&path, b"#!/bin/sh").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o754)).unwrap();

        let metadata = fs::metadata(&path).unwrap();
        assert_eq!(format_mode(&metadata), "-rwxr-xr--");
    }
}
