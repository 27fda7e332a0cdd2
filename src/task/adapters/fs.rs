//! Filesystem-backed task document using capability-based access.

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use std::io;

use crate::task::ports::{DocumentError, DocumentResult, TaskDocument};

/// Markdown (or any text) file holding the task list.
///
/// Only the parent directory is opened with ambient authority; every later
/// access goes through that directory handle.
#[derive(Debug)]
pub struct FsDocument {
    dir: Dir,
    file_name: String,
    path: Utf8PathBuf,
}

impl FsDocument {
    /// Opens the directory containing `path`.
    ///
    /// The file itself is not touched until [`TaskDocument::read`].
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::NotFound`] when the path has no file name or
    /// the parent directory does not exist, and [`DocumentError::Storage`]
    /// for other I/O failures.
    pub fn open(path: &Utf8Path) -> DocumentResult<Self> {
        let file_name = path
            .file_name()
            .ok_or_else(|| DocumentError::NotFound(path.to_string()))?;
        let parent = path
            .parent()
            .filter(|parent| !parent.as_str().is_empty())
            .unwrap_or_else(|| Utf8Path::new("."));
        let dir = Dir::open_ambient_dir(parent, ambient_authority())
            .map_err(|err| io_error(err, path))?;
        Ok(Self {
            dir,
            file_name: file_name.to_owned(),
            path: path.to_owned(),
        })
    }

    /// Returns the document path as given to [`FsDocument::open`].
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

fn io_error(err: io::Error, path: &Utf8Path) -> DocumentError {
    if err.kind() == io::ErrorKind::NotFound {
        DocumentError::NotFound(path.to_string())
    } else {
        DocumentError::storage(err)
    }
}

#[async_trait]
impl TaskDocument for FsDocument {
    async fn read(&self) -> DocumentResult<String> {
        self.dir
            .read_to_string(&self.file_name)
            .map_err(|err| io_error(err, &self.path))
    }

    async fn write(&self, contents: &str) -> DocumentResult<()> {
        self.dir
            .write(&self.file_name, contents)
            .map_err(|err| io_error(err, &self.path))
    }
}
