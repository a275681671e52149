use std::ops::Range;

/// Up to two in-bounds ranges covering a (possibly wrapped) run of the ring.
///
/// Concatenating `first` and `second` yields the run in logical order.
/// `second` is empty unless the run crosses the end of the backing array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Segments {
    pub(crate) first: Range<usize>,
    pub(crate) second: Range<usize>,
}

/// Splits `len` bytes starting at `start` into ranges within `[0, capacity)`.
///
/// Callers guarantee `start < capacity` and `len <= capacity`.
pub(crate) fn segments(start: usize, len: usize, capacity: usize) -> Segments {
    debug_assert!(start < capacity);
    debug_assert!(len <= capacity);
    let first = len.min(capacity - start);
    Segments {
        first: start..start + first,
        second: 0..len - first,
    }
}
