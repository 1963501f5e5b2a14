//! Modifier and operand-flag definitions and their two enum spellings.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Text;

/// The two source spellings of a modifier enum: an ordered label list with
/// positional values 0..N-1, or an explicit label -> value map. Downstream
/// logic only ever sees the canonical label/value view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnumDef {
    Labels(Vec<String>),
    Values(BTreeMap<String, u64>),
}

impl Default for EnumDef {
    fn default() -> Self {
        EnumDef::Labels(Vec::new())
    }
}

impl EnumDef {
    pub fn is_empty(&self) -> bool {
        match self {
            EnumDef::Labels(labels) => labels.is_empty(),
            EnumDef::Values(values) => values.is_empty(),
        }
    }

    pub fn contains_label(&self, label: &str) -> bool {
        match self {
            EnumDef::Labels(labels) => labels.iter().any(|l| l == label),
            EnumDef::Values(values) => values.contains_key(label),
        }
    }

    /// Largest value any label encodes to, or `None` for an empty enum.
    pub fn max_value(&self) -> Option<u64> {
        match self {
            EnumDef::Labels(labels) => (labels.len() as u64).checked_sub(1),
            EnumDef::Values(values) => values.values().max().copied(),
        }
    }

    /// Canonical label -> value table in declaration order.
    pub fn canonical(&self) -> Vec<(&str, u64)> {
        match self {
            EnumDef::Labels(labels) => labels
                .iter()
                .enumerate()
                .map(|(idx, label)| (label.as_str(), idx as u64))
                .collect(),
            EnumDef::Values(values) => values
                .iter()
                .map(|(label, value)| (label.as_str(), *value))
                .collect(),
        }
    }
}

/// An enumerated field altering instruction behavior, defined globally, per
/// instruction, or per form. With no explicit `bits` the encoded width is
/// inferred from the enum.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModifierDef {
    #[serde(rename = "enum")]
    pub options: EnumDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bits: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meaning: Option<Text>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub can_apply_to_inst: Vec<String>,
}

/// Like a modifier, but attached to operands rather than instructions, and
/// constrained to a set of canonical roles (empty list means any role).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OperandFlagDef {
    #[serde(rename = "enum")]
    pub options: EnumDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bits: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meaning: Option<Text>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub can_apply_to_role: Vec<String>,
}
