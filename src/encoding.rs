//! Synthesized encoding artifact: per-leaf bit layouts of the 128-bit word.
//!
//! An [`EncodingModel`] is produced once per synthesis run and never mutated
//! afterwards; downstream renderers consume its JSON form read-only.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::SpecError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeKind {
    /// An opcode discriminant; `constant` holds the ordinal.
    Constant,
    Operand,
    OprndFlag,
    Modifier,
    /// Unused trailing bits, constant zero.
    Reserved,
}

/// One contiguous field of a leaf's layout. Per leaf the ranges partition
/// `[0, 128)` exactly: no gaps, no overlaps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BitRange {
    #[serde(rename = "type")]
    pub kind: RangeKind,
    pub start: u32,
    pub length: u32,
    pub name: Option<String>,
    pub constant: Option<u64>,
    /// For `oprnd_flag` ranges: index of the owning operand within the
    /// leaf's accumulated operand list.
    pub oprnd_idx: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeafEncoding {
    pub instruction: String,
    /// Root-to-leaf form keys.
    pub form_path: Vec<String>,
    pub ranges: Vec<BitRange>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncodingStatistics {
    pub instruction_count: usize,
    pub instruction_bits: u32,
    /// Maximum sibling fan-out observed at each form-tree depth.
    pub form_level_counts: Vec<usize>,
    /// Opcode width allocated at each depth, shared by all instructions.
    pub form_level_bits: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncodingMeta {
    pub encoding_version: u32,
    pub statistics: EncodingStatistics,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncodingModel {
    pub meta: EncodingMeta,
    /// Leaf identifier (`<instruction>.<form_key_0>[.<form_key_1>...]`) to
    /// its layout, in deterministic key order.
    pub encodings: BTreeMap<String, LeafEncoding>,
}

impl EncodingModel {
    pub fn to_json_string(&self) -> Result<String, SpecError> {
        serde_json::to_string(self).map_err(SpecError::Json)
    }

    pub fn to_json_string_pretty(&self) -> Result<String, SpecError> {
        serde_json::to_string_pretty(self).map_err(SpecError::Json)
    }
}
