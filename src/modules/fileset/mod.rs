// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::{fmt, path::Path, sync::Arc};

use crate::modules::{error::MailFilesResult, utils::format_size};

pub mod flatten;
pub mod local;
#[cfg(test)]
pub(crate) mod memory;

pub use flatten::flatten;
pub use local::LocalFile;

pub type FileHandle = Arc<dyn FileRef>;

/// Read-only view of a file system entry: a regular file, a directory or a symbolic link.
///
/// Implementations are expected to answer the classification and size queries
/// without touching the disk again; only `list_children` may do I/O.
pub trait FileRef: fmt::Debug + Send + Sync {
    fn path(&self) -> &Path;

    fn name(&self) -> String {
        self.path()
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path().display().to_string())
    }

    fn size(&self) -> u64;

    /// True for directories and for symbolic links that point at one.
    fn is_directory(&self) -> bool;

    fn is_symlink(&self) -> bool;

    fn list_children(&self) -> MailFilesResult<Vec<FileHandle>>;
}

/// A flattened leaf together with its inclusion flag.
#[derive(Clone, Debug)]
pub struct SelectableEntry {
    file: FileHandle,
    pub(crate) included: bool,
}

impl SelectableEntry {
    pub fn new(file: FileHandle) -> Self {
        Self {
            file,
            included: true,
        }
    }

    pub fn file(&self) -> &FileHandle {
        &self.file
    }

    pub fn included(&self) -> bool {
        self.included
    }
}

/// Checkbox label: `name (size)`.
impl fmt::Display for SelectableEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.file.name(), format_size(self.file.size()))
    }
}

/// Leaves in discovery order. Never contains a traversable directory.
#[derive(Clone, Debug, Default)]
pub struct FileSet {
    entries: Vec<SelectableEntry>,
}

impl FileSet {
    pub(crate) fn from_leaves(leaves: Vec<FileHandle>) -> Self {
        Self {
            entries: leaves.into_iter().map(SelectableEntry::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[SelectableEntry] {
        &self.entries
    }

    pub(crate) fn entries_mut(&mut self) -> &mut [SelectableEntry] {
        &mut self.entries
    }

    pub fn total_bytes(&self) -> u64 {
        self.entries.iter().map(|e| e.file.size()).sum()
    }
}
