// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use snafu::ResultExt;

use crate::modules::{
    error::{EnumerationSnafu, MailFilesResult},
    fileset::{FileHandle, FileRef},
};

/// `FileRef` backed by the local file system.
///
/// Metadata is captured once when the handle is opened. Links are inspected
/// with `symlink_metadata`; `is_directory` follows the link to classify its
/// target. A link to a regular file reports the target's size, any other link
/// its own size (the length of the target path).
#[derive(Clone, Debug)]
pub struct LocalFile {
    path: PathBuf,
    size: u64,
    directory: bool,
    symlink: bool,
}

impl LocalFile {
    pub fn open(path: impl Into<PathBuf>) -> MailFilesResult<Self> {
        let path = path.into();
        let meta = fs::symlink_metadata(&path).context(EnumerationSnafu { path: &path })?;
        let symlink = meta.file_type().is_symlink();
        let (directory, size) = if symlink {
            match fs::metadata(&path) {
                Ok(target) if target.is_dir() => (true, meta.len()),
                Ok(target) => (false, target.len()),
                // Dangling link.
                Err(_) => (false, meta.len()),
            }
        } else {
            (meta.is_dir(), meta.len())
        };
        Ok(Self {
            path,
            size,
            directory,
            symlink,
        })
    }

    pub fn handle(path: impl Into<PathBuf>) -> MailFilesResult<FileHandle> {
        Ok(Arc::new(Self::open(path)?))
    }
}

impl FileRef for LocalFile {
    fn path(&self) -> &Path {
        &self.path
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn is_directory(&self) -> bool {
        self.directory
    }

    fn is_symlink(&self) -> bool {
        self.symlink
    }

    /// Children ordered by file name; `read_dir` order is platform dependent.
    fn list_children(&self) -> MailFilesResult<Vec<FileHandle>> {
        let mut paths = Vec::new();
        for entry in fs::read_dir(&self.path).context(EnumerationSnafu { path: &self.path })? {
            let entry = entry.context(EnumerationSnafu { path: &self.path })?;
            paths.push(entry.path());
        }
        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        paths.into_iter().map(LocalFile::handle).collect()
    }
}
