//! Unpacking of downloaded repository archives.
use std::io::{self, BufReader};
use std::path::Path;

use fs_err::{self as fs, File};

use crate::error::ExtractError;

/// Extracts every entry of the zip at `archive` below `target_directory`,
/// keeping the paths recorded in the archive and replacing existing files.
/// An existing directory where the archive has a file is an error.
///
/// Returns the number of files written.
pub fn extract_zip(
    archive: impl AsRef<Path>,
    target_directory: impl AsRef<Path>,
) -> Result<usize, ExtractError> {
    let archive = archive.as_ref();
    let target_directory = target_directory.as_ref();

    let file = File::open(archive)?;
    let mut zip =
        zip::ZipArchive::new(BufReader::new(file)).map_err(ExtractError::InvalidZip)?;

    let mut written = 0;
    for index in 0..zip.len() {
        let mut entry = zip
            .by_index(index)
            .map_err(|source| ExtractError::Entry { index, source })?;
        let relative = entry
            .enclosed_name()
            .ok_or_else(|| ExtractError::UnsafePath(entry.name().to_string()))?;
        let outpath = target_directory.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&outpath)?;
        } else {
            if let Some(parent) = outpath.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut outfile = File::create(&outpath)?;
            io::copy(&mut entry, &mut outfile)?;
            written += 1;
            tracing::trace!(path = %outpath.display(), "extracted");
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = entry.unix_mode() {
                fs::set_permissions(&outpath, std::fs::Permissions::from_mode(mode))?;
            }
        }
    }

    tracing::debug!(files = written, archive = %archive.display(), "archive extracted");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Write};

    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    use super::*;

    fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
        let mut buffer = Vec::new();
        let mut zip = ZipWriter::new(Cursor::new(&mut buffer));
        for (name, contents) in entries {
            if name.ends_with('/') {
                zip.add_directory(*name, SimpleFileOptions::default()).unwrap();
            } else {
                zip.start_file(*name, SimpleFileOptions::default()).unwrap();
                zip.write_all(contents).unwrap();
            }
        }
        zip.finish().unwrap();
        fs::write(path, buffer).unwrap();
    }

    #[test]
    fn extracts_nested_entries() {
        let tempdir = tempfile::tempdir().unwrap();
        let archive = tempdir.path().join("demo.zip");
        write_zip(
            &archive,
            &[
                ("demo-master/", b""),
                ("demo-master/a.txt", b"alpha"),
                ("demo-master/src/b.txt", b"beta"),
            ],
        );

        let written = extract_zip(&archive, tempdir.path()).unwrap();
        assert_eq!(written, 2);
        let root = tempdir.path().join("demo-master");
        assert_eq!(fs::read(root.join("a.txt")).unwrap(), b"alpha");
        assert_eq!(fs::read(root.join("src/b.txt")).unwrap(), b"beta");
    }

    #[test]
    fn overwrites_existing_files() {
        let tempdir = tempfile::tempdir().unwrap();
        let root = tempdir.path().join("demo-master");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("a.txt"), "stale contents that are longer").unwrap();
        fs::write(root.join("untouched.txt"), "kept").unwrap();

        let archive = tempdir.path().join("demo.zip");
        write_zip(&archive, &[("demo-master/a.txt", b"fresh")]);
        extract_zip(&archive, tempdir.path()).unwrap();

        assert_eq!(fs::read_to_string(root.join("a.txt")).unwrap(), "fresh");
        assert_eq!(fs::read_to_string(root.join("untouched.txt")).unwrap(), "kept");
    }

    #[test]
    fn directory_in_place_of_file_is_an_error() {
        let tempdir = tempfile::tempdir().unwrap();
        fs::create_dir_all(tempdir.path().join("demo-master/a.txt")).unwrap();
        let archive = tempdir.path().join("demo.zip");
        write_zip(&archive, &[("demo-master/a.txt", b"fresh")]);

        let result = extract_zip(&archive, tempdir.path());
        assert!(matches!(result, Err(ExtractError::Io(_))));
        assert!(tempdir.path().join("demo-master/a.txt").is_dir());
    }

    #[test]
    fn rejects_entries_escaping_the_target() {
        let tempdir = tempfile::tempdir().unwrap();
        let target = tempdir.path().join("target");
        fs::create_dir_all(&target).unwrap();
        let archive = tempdir.path().join("evil.zip");
        write_zip(&archive, &[("../escaped.txt", b"nope")]);

        let result = extract_zip(&archive, &target);
        assert!(matches!(result, Err(ExtractError::UnsafePath(ref name)) if name == "../escaped.txt"));
        assert!(!tempdir.path().join("escaped.txt").exists());
    }

    #[test]
    fn corrupt_archive_is_an_error() {
        let tempdir = tempfile::tempdir().unwrap();
        let archive = tempdir.path().join("broken.zip");
        fs::write(&archive, b"this is not a zip file").unwrap();

        let result = extract_zip(&archive, tempdir.path());
        assert!(matches!(result, Err(ExtractError::InvalidZip(_))));
    }

    #[test]
    fn missing_archive_is_an_io_error() {
        let tempdir = tempfile::tempdir().unwrap();
        let result = extract_zip(tempdir.path().join("absent.zip"), tempdir.path());
        assert!(
            matches!(result, Err(ExtractError::Io(e)) if e.kind() == io::ErrorKind::NotFound)
        );
    }
}
