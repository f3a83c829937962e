//! Triangle index reconstruction.
//!
//! Mesh index buffers arrive either as an explicit list or as a strip. Both
//! are normalized to a list of triangles without degenerate faces and without
//! faces that repeat an earlier one with a different winding.

use std::collections::HashSet;

/// Expand a triangle strip into a flat triangle list.
///
/// Every second triangle swaps its last two indices to keep the winding
/// consistent.
#[must_use]
pub fn unstrip(indices: &[u16]) -> Vec<u16> {
    let mut out = Vec::with_capacity(indices.len().saturating_sub(2) * 3);
    for (i, w) in indices.windows(3).enumerate() {
        if i & 1 == 1 {
            out.extend_from_slice(&[w[0], w[2], w[1]]);
        } else {
            out.extend_from_slice(&[w[0], w[1], w[2]]);
        }
    }
    out
}

/// Group a flat list into triangles, dropping degenerate ones.
///
/// Trailing indices that do not fill a triangle are ignored.
#[must_use]
pub fn group_triangles(indices: &[u16]) -> Vec<[u16; 3]> {
    indices
        .chunks_exact(3)
        .map(|c| [c[0], c[1], c[2]])
        .filter(|&[a, b, c]| a != b && a != c && b != c)
        .collect()
}

/// Drop triangles whose vertex set was already seen, keeping first occurrences.
#[must_use]
pub fn remove_duplicate_triangles(triangles: Vec<[u16; 3]>) -> Vec<[u16; 3]> {
    let mut seen = HashSet::with_capacity(triangles.len());
    triangles
        .into_iter()
        .filter(|triangle| {
            let mut key = *triangle;
            key.sort_unstable();
            seen.insert(key)
        })
        .collect()
}
