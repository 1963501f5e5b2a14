//! Structural validation of a [`SpecModel`] ahead of encoding synthesis.
//!
//! Validation never stops at the first problem: every violation in the model
//! is collected and reported together. It is purely structural, reads the
//! model without mutating it, and is idempotent. Synthesis refuses to run on
//! a model with any violation.

mod forms;
mod instructions;
mod modifiers;
mod operands;

#[cfg(test)]
pub(crate) mod test_support;

use std::collections::BTreeMap;

use ahash::AHashSet;

use crate::diagnostic::{SpecDiagnostic, ViolationKind};
use crate::error::SpecError;
use crate::spec::{EnumDef, ModifierDef, OperandFlagDef, SpecModel};

#[derive(Default)]
pub struct Validator {
    diagnostics: Vec<SpecDiagnostic>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks every structural invariant of the model. On failure the error
    /// carries the full ordered list of violations.
    pub fn validate(&mut self, model: &SpecModel) -> Result<(), SpecError> {
        let tables = DefTables::build(model);
        self.check_canonical_roles(model);
        for (name, def) in &model.global_oprnd_flag_defs {
            let path = path_key("global_oprnd_flag_defs", name);
            self.check_flag_def(&tables, def, &path);
        }
        for (name, def) in &model.global_modifier_defs {
            let path = path_key("global_modifier_defs", name);
            self.check_modifier_def(&tables, def, &path);
        }
        self.check_instruction_names(model);
        for inst in &model.instructions {
            self.check_instruction(&tables, inst);
        }
        if self.diagnostics.is_empty() {
            Ok(())
        } else {
            Err(SpecError::Validation {
                diagnostics: std::mem::take(&mut self.diagnostics),
            })
        }
    }

    pub(super) fn push(
        &mut self,
        kind: ViolationKind,
        path: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(SpecDiagnostic::new(kind, path, message));
    }

    fn check_canonical_roles(&mut self, model: &SpecModel) {
        let mut seen = AHashSet::new();
        for (idx, role) in model.canonical_roles.iter().enumerate() {
            if !seen.insert(role.as_str()) {
                self.push(
                    ViolationKind::DuplicateKey,
                    path_index("canonical_roles", idx),
                    format!("duplicate canonical role '{role}'"),
                );
            }
        }
    }

    fn check_instruction_names(&mut self, model: &SpecModel) {
        let mut seen = AHashSet::new();
        for inst in &model.instructions {
            if !seen.insert(inst.name.as_str()) {
                self.push(
                    ViolationKind::DuplicateKey,
                    path_key("instructions", &inst.name),
                    format!("instruction '{}' declared multiple times", inst.name),
                );
            }
        }
    }

    /// Flags repeated entries in a modifier or flag name list.
    pub(super) fn check_unique_list(&mut self, items: &[String], path: &str) {
        let mut seen = AHashSet::new();
        for (idx, item) in items.iter().enumerate() {
            if !seen.insert(item.as_str()) {
                self.push(
                    ViolationKind::DuplicateKey,
                    path_index(path, idx),
                    format!("duplicate entry '{item}'"),
                );
            }
        }
    }

    /// A modifier may distinguish forms or be runtime-encoded, never both at
    /// one node.
    pub(super) fn check_modifier_overlap(
        &mut self,
        inst_mods: &[String],
        fixed_mods: &[String],
        path: &str,
    ) {
        let fixed: AHashSet<&str> = fixed_mods.iter().map(String::as_str).collect();
        let mut overlap: Vec<&str> = inst_mods
            .iter()
            .map(String::as_str)
            .filter(|name| fixed.contains(name))
            .collect();
        if !overlap.is_empty() {
            overlap.sort_unstable();
            overlap.dedup();
            self.push(
                ViolationKind::ModifierScopeConflict,
                path,
                format!("inst_modifiers and fixed_modifiers overlap: {overlap:?}"),
            );
        }
    }
}

/// Immutable definition tables built once per validation run and threaded
/// through the recursion, so no check depends on ambient state.
pub(super) struct DefTables<'m> {
    pub roles: AHashSet<&'m str>,
    pub kinds: &'m BTreeMap<String, u32>,
    pub flags: &'m BTreeMap<String, OperandFlagDef>,
    pub global_mods: &'m BTreeMap<String, ModifierDef>,
    pub instruction_names: AHashSet<&'m str>,
}

impl<'m> DefTables<'m> {
    fn build(model: &'m SpecModel) -> Self {
        Self {
            roles: model.canonical_roles.iter().map(String::as_str).collect(),
            kinds: &model.operand_width_bits,
            flags: &model.global_oprnd_flag_defs,
            global_mods: &model.global_modifier_defs,
            instruction_names: model
                .instructions
                .iter()
                .map(|inst| inst.name.as_str())
                .collect(),
        }
    }
}

/// Per-level context accumulated while descending a form tree.
pub(super) struct FormScope<'m> {
    pub instr_local_mods: &'m BTreeMap<String, ModifierDef>,
    /// Modifier names already claimed by an enclosing inst/fixed list.
    pub forbidden_mods: AHashSet<&'m str>,
    /// Operand names declared by ancestor forms.
    pub ancestor_operands: AHashSet<&'m str>,
    /// Local modifier definition names along the path, instruction included.
    pub ancestor_locals: AHashSet<&'m str>,
    /// Fixed modifiers the parent declared, resolved to their enums; every
    /// child must pin each of them via `fixed_modi_vals`.
    pub required_fixed: BTreeMap<&'m str, &'m EnumDef>,
}

/// Resolves fixed-modifier names against instruction-local then global
/// definitions. Unresolvable names are reported elsewhere and skipped here.
pub(super) fn resolve_fixed<'m>(
    names: &'m [String],
    instr_local: &'m BTreeMap<String, ModifierDef>,
    global: &'m BTreeMap<String, ModifierDef>,
) -> BTreeMap<&'m str, &'m EnumDef> {
    names
        .iter()
        .filter_map(|name| {
            instr_local
                .get(name)
                .or_else(|| global.get(name))
                .map(|def| (name.as_str(), &def.options))
        })
        .collect()
}

pub(super) fn path_key(path: &str, key: &str) -> String {
    format!("{path}.{key}")
}

pub(super) fn path_index(path: &str, idx: usize) -> String {
    format!("{path}[{idx}]")
}
