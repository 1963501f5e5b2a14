use std::collections::BTreeMap;

use ahash::AHashSet;

use super::{DefTables, Validator, path_index, path_key};
use crate::diagnostic::ViolationKind;
use crate::spec::width::resolve_width;
use crate::spec::{EnumDef, ModifierDef, OperandFlagDef};

impl Validator {
    pub(super) fn check_modifier_def(
        &mut self,
        tables: &DefTables<'_>,
        def: &ModifierDef,
        path: &str,
    ) {
        self.check_enum(&def.options, def.bits, def.default.as_deref(), path);
        let apply_path = path_key(path, "can_apply_to_inst");
        for (idx, name) in def.can_apply_to_inst.iter().enumerate() {
            if !tables.instruction_names.contains(name.as_str()) {
                self.push(
                    ViolationKind::UnknownReference,
                    path_index(&apply_path, idx),
                    format!("unknown instruction '{name}'"),
                );
            }
        }
    }

    pub(super) fn check_flag_def(
        &mut self,
        tables: &DefTables<'_>,
        def: &OperandFlagDef,
        path: &str,
    ) {
        self.check_enum(&def.options, def.bits, def.default.as_deref(), path);
        let apply_path = path_key(path, "can_apply_to_role");
        for (idx, role) in def.can_apply_to_role.iter().enumerate() {
            if !tables.roles.contains(role.as_str()) {
                self.push(
                    ViolationKind::UnknownReference,
                    path_index(&apply_path, idx),
                    format!("unknown canonical role '{role}'"),
                );
            }
        }
    }

    /// Local definitions extend the modifier scope; redefining an outer name
    /// is rejected so every reference stays unambiguous.
    pub(super) fn check_local_modifier_defs(
        &mut self,
        tables: &DefTables<'_>,
        defs: &BTreeMap<String, ModifierDef>,
        path: &str,
        outer_locals: &AHashSet<&str>,
    ) {
        for (name, def) in defs {
            let entry_path = path_key(path, name);
            if tables.global_mods.contains_key(name) || outer_locals.contains(name.as_str()) {
                self.push(
                    ViolationKind::ModifierScopeConflict,
                    &entry_path,
                    format!("modifier '{name}' shadows a definition from an outer scope"),
                );
            }
            self.check_modifier_def(tables, def, &entry_path);
        }
    }

    fn check_enum(
        &mut self,
        options: &EnumDef,
        bits: Option<u32>,
        default: Option<&str>,
        path: &str,
    ) {
        let enum_path = path_key(path, "enum");
        match options {
            EnumDef::Labels(labels) => {
                let mut seen = AHashSet::new();
                for (idx, label) in labels.iter().enumerate() {
                    if !seen.insert(label.as_str()) {
                        self.push(
                            ViolationKind::DuplicateKey,
                            path_index(&enum_path, idx),
                            format!("duplicate enum label '{label}'"),
                        );
                    }
                }
            }
            EnumDef::Values(values) => {
                let mut seen = AHashSet::new();
                for (label, value) in values {
                    if !seen.insert(*value) {
                        self.push(
                            ViolationKind::DuplicateKey,
                            &enum_path,
                            format!("duplicate enum value {value} for label '{label}'"),
                        );
                    }
                }
            }
        }
        if let Err(overflow) = resolve_width(options, bits) {
            self.push(
                ViolationKind::WidthOverflow,
                path_key(path, "bits"),
                format!(
                    "declared width of {} bit(s) cannot hold enum needing {}",
                    overflow.declared, overflow.required
                ),
            );
        }
        if let Some(default) = default
            && !options.contains_label(default)
        {
            self.push(
                ViolationKind::UnknownReference,
                path_key(path, "default"),
                format!("default label '{default}' not in enum"),
            );
        }
    }
}
