use ahash::AHashSet;

use super::{DefTables, FormScope, Validator, path_key, resolve_fixed};
use crate::diagnostic::ViolationKind;
use crate::spec::Instruction;

impl Validator {
    pub(super) fn check_instruction<'m>(&mut self, tables: &DefTables<'m>, inst: &'m Instruction) {
        let path = path_key("instructions", &inst.name);
        if inst.forms.is_empty() {
            self.push(
                ViolationKind::MissingForms,
                &path,
                "instruction must declare at least one form",
            );
        }

        self.check_local_modifier_defs(
            tables,
            &inst.local_modifier_defs,
            &path_key(&path, "local_modifier_defs"),
            &AHashSet::new(),
        );

        let inst_path = path_key(&path, "inst_modifiers");
        let fixed_path = path_key(&path, "fixed_modifiers");
        self.check_unique_list(&inst.inst_modifiers, &inst_path);
        self.check_unique_list(&inst.fixed_modifiers, &fixed_path);
        self.check_modifier_overlap(&inst.inst_modifiers, &inst.fixed_modifiers, &path);

        for (names, list_path) in [
            (&inst.inst_modifiers, &inst_path),
            (&inst.fixed_modifiers, &fixed_path),
        ] {
            for name in names {
                if !tables.global_mods.contains_key(name)
                    && !inst.local_modifier_defs.contains_key(name)
                {
                    self.push(
                        ViolationKind::UnknownReference,
                        list_path,
                        format!("unknown modifier '{name}'"),
                    );
                }
            }
        }

        let mut forbidden: AHashSet<&str> =
            inst.inst_modifiers.iter().map(String::as_str).collect();
        forbidden.extend(inst.fixed_modifiers.iter().map(String::as_str));
        let scope = FormScope {
            instr_local_mods: &inst.local_modifier_defs,
            forbidden_mods: forbidden,
            ancestor_operands: AHashSet::new(),
            ancestor_locals: inst.local_modifier_defs.keys().map(String::as_str).collect(),
            required_fixed: resolve_fixed(
                &inst.fixed_modifiers,
                &inst.local_modifier_defs,
                tables.global_mods,
            ),
        };
        self.check_forms(tables, &inst.forms, &path_key(&path, "forms"), &scope);
    }
}
