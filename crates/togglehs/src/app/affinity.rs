//! Directory-path affinity between two files.
//!
//! Only the common prefix counts: `/a/b/src/foo` and `/a/b/include/foo` share
//! two segments even though they reconverge at `foo`.

use std::path::Path;

use crate::domain::model::{FileRef, directory_parts};

/// Number of leading directory segments shared by two files.
pub fn affinity(a: &FileRef, b: &FileRef) -> usize {
    common_prefix_len(&a.directory_parts, &b.directory_parts)
}

/// [`affinity`] for raw paths, without requiring either to classify.
pub fn path_affinity(a: &Path, b: &Path) -> usize {
    common_prefix_len(&directory_parts(a), &directory_parts(b))
}

fn common_prefix_len<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    a.iter().zip(b).take_while(|(left, right)| left == right).count()
}
