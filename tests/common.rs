//! Shared builders and invariant checks for integration tests.
#![allow(dead_code)]

use std::collections::BTreeMap;

use gpidl::encoding::LeafEncoding;
use gpidl::spec::{EnumDef, Form, Instruction, ModifierDef, Operand, OperandFlagDef, SpecModel};

/// Roles `gpr`/`pred`, kinds `reg8`/`imm16`/`imm125`, flag `neg` (1 bit),
/// modifiers `rnd` (2 bits) and `sat` (1 bit); no instructions.
pub fn base_model() -> SpecModel {
    SpecModel {
        gpidl_version: "1.0".into(),
        operand_width_bits: BTreeMap::from([
            ("reg8".to_string(), 8),
            ("imm16".to_string(), 16),
            ("imm125".to_string(), 125),
        ]),
        canonical_roles: vec!["gpr".into(), "pred".into()],
        global_oprnd_flag_defs: BTreeMap::from([(
            "neg".to_string(),
            OperandFlagDef {
                options: EnumDef::Labels(vec!["off".into(), "on".into()]),
                ..Default::default()
            },
        )]),
        global_modifier_defs: BTreeMap::from([
            (
                "rnd".to_string(),
                ModifierDef {
                    options: EnumDef::Labels(vec!["rn".into(), "rm".into(), "rp".into()]),
                    ..Default::default()
                },
            ),
            (
                "sat".to_string(),
                ModifierDef {
                    options: EnumDef::Labels(vec!["off".into(), "on".into()]),
                    ..Default::default()
                },
            ),
        ]),
        instructions: Vec::new(),
    }
}

pub fn instruction(name: &str, forms: Vec<Form>) -> Instruction {
    Instruction {
        name: name.into(),
        forms,
        ..Default::default()
    }
}

pub fn leaf(key: &str) -> Form {
    Form {
        key: key.into(),
        ..Default::default()
    }
}

pub fn form(key: &str, children: Vec<Form>) -> Form {
    Form {
        key: key.into(),
        forms: children,
        ..Default::default()
    }
}

/// Operand of role `gpr` with no flags.
pub fn operand(name: &str, kind: &str) -> Operand {
    Operand {
        name: name.into(),
        role: "gpr".into(),
        kind: kind.into(),
        oprnd_flag: Vec::new(),
    }
}

/// Asserts that a leaf's ranges partition `[0, 128)` exactly, with unique
/// non-null field names. A flag shared by several operands repeats its name,
/// so named ranges are keyed by `(name, oprnd_idx)`.
pub fn assert_partition(key: &str, encoding: &LeafEncoding) {
    let mut cursor = 0;
    for range in &encoding.ranges {
        assert_eq!(
            range.start, cursor,
            "gap or overlap at bit {cursor} in leaf '{key}'"
        );
        assert!(range.length > 0, "zero-width range in leaf '{key}'");
        cursor += range.length;
    }
    assert_eq!(cursor, 128, "leaf '{key}' does not cover the full word");

    let mut names: Vec<(&str, Option<usize>)> = encoding
        .ranges
        .iter()
        .filter_map(|range| range.name.as_deref().map(|name| (name, range.oprnd_idx)))
        .collect();
    let total = names.len();
    names.sort_unstable();
    names.dedup();
    assert_eq!(total, names.len(), "duplicate field names in leaf '{key}'");
}
