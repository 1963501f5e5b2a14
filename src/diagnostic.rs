//! Structural violations reported by the spec validator.

use std::fmt;

/// Classification of a structural violation found in a
/// [`SpecModel`](crate::spec::SpecModel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    /// Sibling forms sharing a key, colliding operand names, duplicate enum
    /// labels or values, or repeated entries in a modifier/flag list.
    DuplicateKey,
    /// A role, kind, flag, modifier, default label, or applicability entry
    /// naming an identifier absent from the relevant definition table.
    UnknownReference,
    /// A modifier claimed by overlapping or nested scopes, a local definition
    /// shadowing an outer one, or `fixed_modifiers` on a childless form.
    ModifierScopeConflict,
    /// `fixed_modi_vals` missing, mismatched against the parent's fixed set,
    /// or carrying a label outside the modifier's enum.
    MissingFixedVals,
    /// An explicit `bits` declaration too small for its enum.
    WidthOverflow,
    /// An instruction with an empty forms tree.
    MissingForms,
}

impl ViolationKind {
    /// Stable dotted code for reports and log scraping.
    pub fn code(self) -> &'static str {
        match self {
            ViolationKind::DuplicateKey => "validation.duplicate-key",
            ViolationKind::UnknownReference => "validation.unknown-reference",
            ViolationKind::ModifierScopeConflict => "validation.modifier-scope",
            ViolationKind::MissingFixedVals => "validation.missing-fixed-vals",
            ViolationKind::WidthOverflow => "validation.width-overflow",
            ViolationKind::MissingForms => "validation.missing-forms",
        }
    }
}

/// One violation, addressed by the dotted path of the offending node
/// (e.g. `instructions.IADD.forms.reg.operands[1]`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecDiagnostic {
    pub kind: ViolationKind,
    pub path: String,
    pub message: String,
}

impl SpecDiagnostic {
    pub fn new(kind: ViolationKind, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for SpecDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} [{}]", self.path, self.message, self.kind.code())
    }
}
