//! Conditional blocks.
//!
//! Output after a `{?}` marker is kept only if some replacement token inside the
//! block produced non-empty text. A block ends at `{.}`, at the next `{?}` or at
//! the end of the template. Blocks do not nest.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum BlockState {
    #[default]
    Closed,
    Open {
        /// Output length when the block opened
        marker: usize,
        satisfied: bool,
    },
}

/// Tracks the open block, if any, against a growing output buffer.
#[derive(Debug, Default)]
pub(crate) struct ConditionalBlock {
    state: BlockState,
}

impl ConditionalBlock {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// `{?}`: settle any open block, then open a new one at the current length.
    pub(crate) fn open(&mut self, out: &mut String) {
        self.settle(out);
        self.state = BlockState::Open {
            marker: out.len(),
            satisfied: false,
        };
    }

    /// `{.}`: settle any open block.
    pub(crate) fn close(&mut self, out: &mut String) {
        self.settle(out);
    }

    /// Note the text a replacement token appended.
    pub(crate) fn record(&mut self, appended: &str) {
        if let BlockState::Open {
            satisfied,
            ..
        } = &mut self.state
        {
            *satisfied |= !appended.is_empty();
        }
    }

    /// End of template.
    pub(crate) fn finish(mut self, out: &mut String) {
        self.settle(out);
    }

    fn settle(&mut self, out: &mut String) {
        if let BlockState::Open {
            marker,
            satisfied: false,
        } = std::mem::take(&mut self.state)
        {
            out.truncate(marker);
        }
    }
}
