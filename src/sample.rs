//! Sample corpus resolution and tar packing.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{HarnessError, Result};
use crate::stream::CountingWriter;

/// The fixed input directory for a run.
///
/// The total uncompressed size is computed once at open time and never
/// changes afterwards; the ratio reported for every trial divides this
/// figure by the artifact size, matching how folder size (not tar stream
/// size) is the conventional baseline for archive benchmarks.
#[derive(Debug)]
pub struct SampleSource {
    root: PathBuf,
    total_bytes: u64,
}

impl SampleSource {
    /// Resolves the sample directory and computes its total byte size.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let meta = fs::metadata(&root)
            .map_err(|e| HarnessError::io(format!("stat sample dir {}", root.display()), e))?;
        if !meta.is_dir() {
            return Err(HarnessError::io(
                format!("open sample dir {}", root.display()),
                std::io::Error::new(std::io::ErrorKind::NotADirectory, "not a directory"),
            ));
        }
        let total_bytes = dir_size(&root)
            .map_err(|e| HarnessError::io(format!("size sample dir {}", root.display()), e))?;
        Ok(SampleSource { root, total_bytes })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Total uncompressed size of the corpus in bytes.
    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    /// Packs the directory tree into `out` as a tar stream.
    ///
    /// Returns the number of packed bytes written.
    pub fn pack(&self, out: &mut dyn Write) -> Result<u64> {
        let mut counter = CountingWriter::new(out);
        {
            let mut builder = tar::Builder::new(&mut counter);
            builder.follow_symlinks(false);
            builder
                .append_dir_all(".", &self.root)
                .map_err(|e| HarnessError::io(format!("pack sample {}", self.root.display()), e))?;
            builder
                .finish()
                .map_err(|e| HarnessError::io("finish tar stream", e))?;
        }
        counter
            .flush()
            .map_err(|e| HarnessError::io("flush tar stream", e))?;
        Ok(counter.bytes_written())
    }
}

/// Recursive sum of regular-file sizes. Symlinks are not followed.
fn dir_size(dir: &Path) -> std::io::Result<u64> {
    let mut total = 0;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let meta = entry.path().symlink_metadata()?;
        if meta.is_dir() {
            total += dir_size(&entry.path())?;
        } else if meta.is_file() {
            total += meta.len();
        }
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), b"hello world").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("b.bin"), vec![7u8; 1000]).unwrap();
        dir
    }

    #[test]
    fn total_bytes_sums_all_files() {
        let dir = fixture();
        let source = SampleSource::open(dir.path()).unwrap();
        assert_eq!(source.total_bytes(), 11 + 1000);
    }

    #[test]
    fn missing_directory_is_an_io_error() {
        let err = SampleSource::open("/nonexistent/sample/dir").unwrap_err();
        assert!(matches!(err, HarnessError::Io { .. }));
    }

    #[test]
    fn file_path_is_rejected() {
        let dir = fixture();
        let err = SampleSource::open(dir.path().join("a.txt")).unwrap_err();
        assert!(matches!(err, HarnessError::Io { .. }));
    }

    #[test]
    fn pack_writes_a_parsable_tar_stream() {
        let dir = fixture();
        let source = SampleSource::open(dir.path()).unwrap();
        let mut packed = Vec::new();
        let written = source.pack(&mut packed).unwrap();
        assert_eq!(written, packed.len() as u64);
        assert!(written > source.total_bytes());

        let mut names: Vec<String> = tar::Archive::new(&packed[..])
            .entries()
            .unwrap()
            .map(|e| e.unwrap().path().unwrap().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert!(names.iter().any(|n| n.ends_with("a.txt")));
        assert!(names.iter().any(|n| n.ends_with("b.bin")));
    }

    #[test]
    fn pack_is_deterministic_for_a_fixed_tree() {
        let dir = fixture();
        let source = SampleSource::open(dir.path()).unwrap();
        let mut first = Vec::new();
        let mut second = Vec::new();
        source.pack(&mut first).unwrap();
        source.pack(&mut second).unwrap();
        assert_eq!(first, second);
    }
}
