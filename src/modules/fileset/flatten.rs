// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::time::Instant;

use tracing::{debug, warn};

use crate::modules::{
    error::MailFilesResult,
    fileset::{FileHandle, FileSet},
};

/// Expands `roots` into a flat list of leaves.
///
/// Depth-first, pre-order, roots in input order and children in listing order.
/// Directories are always expanded and never appear in the result; a symbolic
/// link is a leaf even when it points at a directory, which keeps link cycles
/// out of the walk. The first listing error aborts the whole operation.
pub fn flatten(roots: &[FileHandle]) -> MailFilesResult<FileSet> {
    let start = Instant::now();
    let mut leaves: Vec<FileHandle> = Vec::new();
    let mut directories = 0usize;

    // Pushed in reverse so the next pop is the first unvisited sibling.
    let mut stack: Vec<FileHandle> = roots.iter().rev().cloned().collect();

    while let Some(node) = stack.pop() {
        if node.is_directory() && !node.is_symlink() {
            let children = node.list_children().inspect_err(|e| {
                warn!("Aborting flatten, failed to list {:?}: {}", node.path(), e);
            })?;
            directories += 1;
            stack.extend(children.into_iter().rev());
        } else {
            leaves.push(node);
        }
    }

    let set = FileSet::from_leaves(leaves);
    debug!(
        "Flattened {} roots into {} files ({} bytes) across {} directories in {:?}",
        roots.len(),
        set.len(),
        set.total_bytes(),
        directories,
        start.elapsed()
    );
    Ok(set)
}
