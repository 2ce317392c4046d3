use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest file {}: {source}", path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to read line {line} of {}: {source}", path.display())]
    Read {
        path: PathBuf,
        line: usize,
        source: std::io::Error,
    },
}

/// Line-by-line reader over a requirements file.
///
/// The file is opened eagerly so a missing manifest is reported before any
/// output is produced, and closed when the reader is dropped.
pub struct ManifestReader {
    path: PathBuf,
    lines: Lines<BufReader<File>>,
    line_no: usize,
}

impl ManifestReader {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|source| ManifestError::Open {
            path: path.clone(),
            source,
        })?;
        Ok(Self {
            path,
            lines: BufReader::new(file).lines(),
            line_no: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Iterator for ManifestReader {
    type Item = Result<String, ManifestError>;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.lines.next()?;
        self.line_no += 1;
        Some(next.map_err(|source| ManifestError::Read {
            path: self.path.clone(),
            line: self.line_no,
            source,
        }))
    }
}
