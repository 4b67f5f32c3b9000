//! Round-robin position over the source registry.

/// Cursor selecting consecutive windows of a fixed-length registry.
///
/// `position` always stays in `0..len`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundRobinCursor {
    position: usize,
    len: usize,
    batch_size: usize,
}

impl RoundRobinCursor {
    /// Cursor at index 0 over `len` items.
    ///
    /// A zero `len` or `batch_size` is treated as 1.
    #[must_use]
    pub fn new(len: usize, batch_size: usize) -> Self {
        Self {
            position: 0,
            len: len.max(1),
            batch_size: batch_size.max(1),
        }
    }

    /// Index of the first item of the next window.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of items in a window, clamped to the registry length.
    #[must_use]
    pub fn window_len(&self) -> usize {
        self.batch_size.min(self.len)
    }

    /// Indices of the next window, wrapping past the end.
    #[must_use]
    pub fn window(&self) -> Vec<usize> {
        (0..self.window_len())
            .map(|offset| (self.position + offset) % self.len)
            .collect()
    }

    /// Move past a completed window.
    pub fn advance(&mut self) {
        self.advance_by(self.batch_size);
    }

    /// Move forward by `count` items.
    pub fn advance_by(&mut self, count: usize) {
        self.position = (self.position + count % self.len) % self.len;
    }
}
