//! Per-leaf layout assembly: appends typed ranges at a moving cursor and
//! closes the word with reserved padding.

use crate::encoding::{BitRange, RangeKind};
use crate::error::SpecError;
use crate::spec::INSTRUCTION_WIDTH_BITS;

pub(super) struct LayoutBuilder {
    leaf: String,
    // Wider than any single field so declared widths summing past u32 still
    // arrive at finish() as an exact total instead of wrapping.
    cursor: u64,
    ranges: Vec<BitRange>,
}

impl LayoutBuilder {
    pub(super) fn new(leaf: String) -> Self {
        Self {
            leaf,
            cursor: 0,
            ranges: Vec::new(),
        }
    }

    pub(super) fn constant(&mut self, length: u32, value: u64) {
        self.push(RangeKind::Constant, length, None, Some(value), None);
    }

    pub(super) fn operand(&mut self, name: &str, length: u32) {
        self.push(RangeKind::Operand, length, Some(name.to_string()), None, None);
    }

    pub(super) fn oprnd_flag(&mut self, name: &str, length: u32, oprnd_idx: usize) {
        self.push(
            RangeKind::OprndFlag,
            length,
            Some(name.to_string()),
            None,
            Some(oprnd_idx),
        );
    }

    pub(super) fn modifier(&mut self, name: &str, length: u32) {
        self.push(RangeKind::Modifier, length, Some(name.to_string()), None, None);
    }

    /// Checks the bit budget, pads to the full word, and yields the finished
    /// range list.
    pub(super) fn finish(mut self) -> Result<(String, Vec<BitRange>), SpecError> {
        let word = u64::from(INSTRUCTION_WIDTH_BITS);
        if self.cursor > word {
            return Err(SpecError::BitBudgetExceeded {
                leaf: self.leaf,
                used: self.cursor,
                overflow: self.cursor - word,
            });
        }
        let remainder = (word - self.cursor) as u32;
        self.push(RangeKind::Reserved, remainder, None, Some(0), None);
        Ok((self.leaf, self.ranges))
    }

    fn push(
        &mut self,
        kind: RangeKind,
        length: u32,
        name: Option<String>,
        constant: Option<u64>,
        oprnd_idx: Option<usize>,
    ) {
        // Zero-width fields (single-option enums, 0-bit kinds) occupy no
        // range at all.
        if length == 0 {
            return;
        }
        let start = self.cursor;
        self.cursor = self.cursor.saturating_add(u64::from(length));
        // Once the word is overrun only the running total matters; finish()
        // reports the overflow without materializing out-of-word ranges.
        if self.cursor > u64::from(INSTRUCTION_WIDTH_BITS) {
            return;
        }
        self.ranges.push(BitRange {
            kind,
            start: start as u32,
            length,
            name,
            constant,
            oprnd_idx,
        });
    }
}
