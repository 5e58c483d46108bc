//! Stream compaction of the active path array.

use crate::path::PathSegment;

/// Partition `paths` in place into still-bouncing paths followed by
/// resolved ones and return the number of still-bouncing paths.
///
/// Order within each side is not preserved; pixel indices carry identity.
pub fn compact_paths(paths: &mut [PathSegment]) -> usize {
    let mut live = 0;
    let mut end = paths.len();
    while live < end {
        if paths[live].is_active() {
            live += 1;
        } else {
            end -= 1;
            paths.swap(live, end);
        }
    }
    live
}
