// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use tracing::debug;

use crate::modules::{
    error::{IndexOutOfRangeSnafu, MailFilesResult},
    fileset::{FileHandle, FileSet, SelectableEntry},
    utils::format_size,
};

#[cfg(test)]
mod tests;

/// Count and byte total of the entries currently included.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Aggregate {
    pub included_count: usize,
    pub included_bytes: u64,
}

impl fmt::Display for Aggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let noun = if self.included_count == 1 { "file" } else { "files" };
        if self.included_count == 0 {
            write!(f, "0 {}", noun)
        } else {
            write!(
                f,
                "{} {} ({})",
                self.included_count,
                noun,
                format_size(self.included_bytes)
            )
        }
    }
}

type AggregateListener = Box<dyn Fn(&Aggregate) + Send>;

/// Owns a flattened file set and its per-entry inclusion flags.
///
/// Every entry starts included. The aggregate is recomputed from scratch after
/// each change, so `included_bytes` always equals the sum over included entries.
pub struct SelectionState {
    files: FileSet,
    aggregate: Aggregate,
    listeners: Vec<AggregateListener>,
}

impl SelectionState {
    pub fn new(mut files: FileSet) -> Self {
        for entry in files.entries_mut() {
            entry.included = true;
        }
        let aggregate = Self::compute(&files);
        Self {
            files,
            aggregate,
            listeners: Vec::new(),
        }
    }

    pub fn entries(&self) -> &[SelectableEntry] {
        self.files.entries()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn aggregate(&self) -> Aggregate {
        self.aggregate
    }

    /// The dialog's info line, e.g. `3 files (1.5 KB)`.
    pub fn summary(&self) -> String {
        self.aggregate.to_string()
    }

    /// Registers a callback fired after every change of an inclusion flag.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: Fn(&Aggregate) + Send + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    pub fn toggle(&mut self, index: usize) -> MailFilesResult<Aggregate> {
        let included = self.entry(index)?.included;
        self.apply(index, !included)
    }

    pub fn set_included(&mut self, index: usize, included: bool) -> MailFilesResult<Aggregate> {
        if self.entry(index)?.included == included {
            return Ok(self.aggregate);
        }
        self.toggle(index)
    }

    /// One line per entry, `[index] [x] name (size)`, with `[ ]` for excluded
    /// entries. The index is the one `toggle` and `set_included` take.
    pub fn labels(&self) -> Vec<String> {
        self.entries()
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                format!(
                    "[{}] [{}] {}",
                    index,
                    if entry.included() { "x" } else { " " },
                    entry
                )
            })
            .collect()
    }

    /// Handles of the included entries, in file set order.
    pub fn included_files(&self) -> Vec<FileHandle> {
        self.files
            .entries()
            .iter()
            .filter(|e| e.included())
            .map(|e| e.file().clone())
            .collect()
    }

    fn entry(&self, index: usize) -> MailFilesResult<&SelectableEntry> {
        let len = self.files.len();
        self.files
            .entries()
            .get(index)
            .ok_or_else(|| IndexOutOfRangeSnafu { index, len }.build())
    }

    fn apply(&mut self, index: usize, included: bool) -> MailFilesResult<Aggregate> {
        let len = self.files.len();
        let entry = self
            .files
            .entries_mut()
            .get_mut(index)
            .ok_or_else(|| IndexOutOfRangeSnafu { index, len }.build())?;
        entry.included = included;
        debug!(
            "Entry {} ({:?}) is now {}",
            index,
            entry.file().path(),
            if included { "included" } else { "excluded" }
        );

        self.aggregate = Self::compute(&self.files);
        for listener in &self.listeners {
            listener(&self.aggregate);
        }
        Ok(self.aggregate)
    }

    fn compute(files: &FileSet) -> Aggregate {
        files
            .entries()
            .iter()
            .filter(|e| e.included())
            .fold(Aggregate::default(), |mut acc, e| {
                acc.included_count += 1;
                acc.included_bytes += e.file().size();
                acc
            })
    }
}

impl fmt::Debug for SelectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionState")
            .field("files", &self.files)
            .field("aggregate", &self.aggregate)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
