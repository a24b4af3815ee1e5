use std::{
    io,
    path::{Path, PathBuf},
    sync::Arc,
};

use snafu::ResultExt;

use crate::modules::{
    error::{EnumerationSnafu, MailFilesResult},
    fileset::{FileHandle, FileRef},
};

/// In-memory tree used to drive flattening and transfers without touching the disk.
#[derive(Debug)]
pub(crate) struct MemFile {
    path: PathBuf,
    size: u64,
    kind: Kind,
}

#[derive(Debug)]
enum Kind {
    File,
    Dir(Vec<FileHandle>),
    /// Link to a directory; its target is never consulted.
    DirLink,
    Unreadable,
}

impl MemFile {
    pub(crate) fn file(path: &str, size: u64) -> FileHandle {
        Arc::new(Self {
            path: PathBuf::from(path),
            size,
            kind: Kind::File,
        })
    }

    pub(crate) fn dir(path: &str, children: Vec<FileHandle>) -> FileHandle {
        Arc::new(Self {
            path: PathBuf::from(path),
            size: 4096,
            kind: Kind::Dir(children),
        })
    }

    pub(crate) fn dir_link(path: &str, size: u64) -> FileHandle {
        Arc::new(Self {
            path: PathBuf::from(path),
            size,
            kind: Kind::DirLink,
        })
    }

    pub(crate) fn unreadable_dir(path: &str) -> FileHandle {
        Arc::new(Self {
            path: PathBuf::from(path),
            size: 4096,
            kind: Kind::Unreadable,
        })
    }
}

impl FileRef for MemFile {
    fn path(&self) -> &Path {
        &self.path
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn is_directory(&self) -> bool {
        !matches!(self.kind, Kind::File)
    }

    fn is_symlink(&self) -> bool {
        matches!(self.kind, Kind::DirLink)
    }

    fn list_children(&self) -> MailFilesResult<Vec<FileHandle>> {
        match &self.kind {
            Kind::Dir(children) => Ok(children.clone()),
            Kind::DirLink => panic!("symbolic link {:?} must not be listed", self.path),
            Kind::File => panic!("regular file {:?} must not be listed", self.path),
            Kind::Unreadable => Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "permission denied",
            ))
            .context(EnumerationSnafu { path: &self.path }),
        }
    }
}
