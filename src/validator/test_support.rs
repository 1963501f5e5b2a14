//! Shared builders for validator unit tests.

use std::collections::BTreeMap;

use crate::diagnostic::{SpecDiagnostic, ViolationKind};
use crate::error::SpecError;
use crate::spec::{EnumDef, Form, Instruction, ModifierDef, Operand, OperandFlagDef, SpecModel};
use crate::validator::Validator;

/// A minimal well-formed model: two roles, two operand kinds, one global
/// flag (`neg`), one global modifier (`rnd`), and no instructions.
pub(crate) fn base_model() -> SpecModel {
    SpecModel {
        gpidl_version: "1.0".into(),
        operand_width_bits: BTreeMap::from([("reg8".to_string(), 8), ("imm16".to_string(), 16)]),
        canonical_roles: vec!["gpr".into(), "pred".into()],
        global_oprnd_flag_defs: BTreeMap::from([(
            "neg".to_string(),
            OperandFlagDef {
                options: EnumDef::Labels(vec!["off".into(), "on".into()]),
                ..Default::default()
            },
        )]),
        global_modifier_defs: BTreeMap::from([(
            "rnd".to_string(),
            modifier(&["rn", "rm", "rp"]),
        )]),
        instructions: Vec::new(),
    }
}

/// [`base_model`] plus a single instruction `MOV` owning the given forms.
pub(crate) fn model_with_forms(forms: Vec<Form>) -> SpecModel {
    let mut model = base_model();
    model.instructions.push(instruction("MOV", forms));
    model
}

pub(crate) fn instruction(name: &str, forms: Vec<Form>) -> Instruction {
    Instruction {
        name: name.into(),
        forms,
        ..Default::default()
    }
}

pub(crate) fn leaf(key: &str) -> Form {
    Form {
        key: key.into(),
        ..Default::default()
    }
}

pub(crate) fn leaf_with_operands(key: &str, operands: Vec<Operand>) -> Form {
    Form {
        key: key.into(),
        operands,
        ..Default::default()
    }
}

pub(crate) fn operand(name: &str, role: &str, kind: &str) -> Operand {
    Operand {
        name: name.into(),
        role: role.into(),
        kind: kind.into(),
        oprnd_flag: Vec::new(),
    }
}

pub(crate) fn modifier(labels: &[&str]) -> ModifierDef {
    ModifierDef {
        options: EnumDef::Labels(labels.iter().map(|l| l.to_string()).collect()),
        ..Default::default()
    }
}

pub(crate) fn modifier_values(pairs: &[(&str, u64)]) -> ModifierDef {
    ModifierDef {
        options: EnumDef::Values(pairs.iter().map(|(l, v)| (l.to_string(), *v)).collect()),
        ..Default::default()
    }
}

pub(crate) fn validate(model: &SpecModel) -> Result<(), SpecError> {
    Validator::new().validate(model)
}

pub(crate) fn diagnostics_of(err: &SpecError) -> &[SpecDiagnostic] {
    match err {
        SpecError::Validation { diagnostics } => diagnostics,
        other => panic!("expected validation error, got: {other}"),
    }
}

/// Asserts that some diagnostic of the given kind mentions `needle` in its
/// path or message.
pub(crate) fn expect_violation(err: &SpecError, kind: ViolationKind, needle: &str) {
    let diagnostics = diagnostics_of(err);
    assert!(
        diagnostics
            .iter()
            .any(|d| d.kind == kind && (d.message.contains(needle) || d.path.contains(needle))),
        "no {kind:?} diagnostic mentioning '{needle}' in: {diagnostics:?}"
    );
}
