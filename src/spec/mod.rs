//! Typed model of a gpidl specification document.
//!
//! The model mirrors the source format one-to-one: a flat table of canonical
//! operand roles, global operand-flag and modifier definitions, and an
//! instruction set where each instruction owns a recursive tree of forms.
//! `deny_unknown_fields` on every node preserves the source format's
//! closed-world schema when a model is deserialized from JSON. A model is
//! built once and never mutated afterwards.

mod modifier;
pub mod width;

pub use modifier::{EnumDef, ModifierDef, OperandFlagDef};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::SpecError;

/// Fixed width of every encoded instruction word.
pub const INSTRUCTION_WIDTH_BITS: u32 = 128;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpecModel {
    pub gpidl_version: String,
    /// Operand kind name -> number of encoded bits.
    pub operand_width_bits: BTreeMap<String, u32>,
    /// Operand role categories, unique by name.
    pub canonical_roles: Vec<String>,
    #[serde(default)]
    pub global_oprnd_flag_defs: BTreeMap<String, OperandFlagDef>,
    #[serde(default)]
    pub global_modifier_defs: BTreeMap<String, ModifierDef>,
    /// Declared order is significant: an instruction's ordinal position is
    /// its opcode value.
    pub instructions: Vec<Instruction>,
}

impl SpecModel {
    /// Deserializes a model from a JSON document, rejecting any field the
    /// format does not define.
    pub fn from_json_str(src: &str) -> Result<Self, SpecError> {
        serde_json::from_str(src).map_err(SpecError::Json)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Instruction {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semantics: Option<Semantics>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub local_modifier_defs: BTreeMap<String, ModifierDef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inst_modifiers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fixed_modifiers: Vec<String>,
    /// Root form list; never empty in a valid model.
    pub forms: Vec<Form>,
}

/// One node of an instruction's encoding tree. Sibling order is significant:
/// a form's position within its sibling group is its opcode value at that
/// depth. A form with no children is a leaf and terminates a form path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Form {
    /// Unique among siblings.
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semantics: Option<Semantics>,
    /// Required exactly when the parent declares `fixed_modifiers`: one enum
    /// label per fixed modifier, selecting this form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_modi_vals: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub local_modifier_defs: BTreeMap<String, ModifierDef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inst_modifiers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fixed_modifiers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub operands: Vec<Operand>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub forms: Vec<Form>,
}

impl Form {
    pub fn is_leaf(&self) -> bool {
        self.forms.is_empty()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Operand {
    /// Unique within its form and all ancestor forms.
    pub name: String,
    /// Must name an entry of `canonical_roles`.
    pub role: String,
    /// Must name an entry of `operand_width_bits`.
    pub kind: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub oprnd_flag: Vec<String>,
}

/// Human-facing semantics metadata carried through from the source format.
/// Never interpreted by this crate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Semantics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect: Option<String>,
    #[serde(default, rename = "SASS", skip_serializing_if = "Option::is_none")]
    pub sass: Option<Text>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

/// A free-text field the source format spells as either a single string or a
/// list of strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Text {
    Line(String),
    Lines(Vec<String>),
}
