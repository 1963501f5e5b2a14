use std::collections::BTreeMap;

use ahash::AHashMap;

use super::{DefTables, FormScope, Validator, path_key, resolve_fixed};
use crate::diagnostic::ViolationKind;
use crate::spec::{EnumDef, Form};

impl Validator {
    pub(super) fn check_forms<'m>(
        &mut self,
        tables: &DefTables<'m>,
        forms: &'m [Form],
        path: &str,
        scope: &FormScope<'m>,
    ) {
        let mut seen_keys: AHashMap<&str, usize> = AHashMap::new();
        for (idx, form) in forms.iter().enumerate() {
            if let Some(first) = seen_keys.get(form.key.as_str()) {
                self.push(
                    ViolationKind::DuplicateKey,
                    path_key(path, &form.key),
                    format!(
                        "sibling forms {path}[{first}] and {path}[{idx}] share key '{}'",
                        form.key
                    ),
                );
            } else {
                seen_keys.insert(form.key.as_str(), idx);
            }
            self.check_form(tables, form, &path_key(path, &form.key), scope);
        }
    }

    fn check_form<'m>(
        &mut self,
        tables: &DefTables<'m>,
        form: &'m Form,
        form_path: &str,
        scope: &FormScope<'m>,
    ) {
        // A parent's fixed_modifiers oblige every child to pin them; a form
        // without that obligation must not carry fixed_modi_vals at all.
        if scope.required_fixed.is_empty() {
            if form.fixed_modi_vals.is_some() {
                self.push(
                    ViolationKind::MissingFixedVals,
                    form_path,
                    "fixed_modi_vals present without fixed_modifiers in parent",
                );
            }
        } else {
            match &form.fixed_modi_vals {
                None => self.push(
                    ViolationKind::MissingFixedVals,
                    form_path,
                    "missing required field 'fixed_modi_vals'",
                ),
                Some(vals) => self.check_fixed_modi_vals(
                    vals,
                    &path_key(form_path, "fixed_modi_vals"),
                    &scope.required_fixed,
                ),
            }
        }

        self.check_local_modifier_defs(
            tables,
            &form.local_modifier_defs,
            &path_key(form_path, "local_modifier_defs"),
            &scope.ancestor_locals,
        );

        let inst_path = path_key(form_path, "inst_modifiers");
        let fixed_path = path_key(form_path, "fixed_modifiers");
        self.check_unique_list(&form.inst_modifiers, &inst_path);
        self.check_unique_list(&form.fixed_modifiers, &fixed_path);
        self.check_modifier_overlap(&form.inst_modifiers, &form.fixed_modifiers, form_path);

        for name in &form.inst_modifiers {
            if scope.forbidden_mods.contains(name.as_str()) {
                self.push(
                    ViolationKind::ModifierScopeConflict,
                    &inst_path,
                    format!("modifier '{name}' already claimed by an enclosing scope"),
                );
            }
            // Runtime modifiers may resolve against this form's own local
            // definitions; fixed ones only against instruction/global scope.
            if !tables.global_mods.contains_key(name)
                && !scope.instr_local_mods.contains_key(name)
                && !form.local_modifier_defs.contains_key(name)
            {
                self.push(
                    ViolationKind::UnknownReference,
                    &inst_path,
                    format!("unknown modifier '{name}'"),
                );
            }
        }
        for name in &form.fixed_modifiers {
            if scope.forbidden_mods.contains(name.as_str()) {
                self.push(
                    ViolationKind::ModifierScopeConflict,
                    &fixed_path,
                    format!("modifier '{name}' already claimed by an enclosing scope"),
                );
            }
            if !tables.global_mods.contains_key(name)
                && !scope.instr_local_mods.contains_key(name)
            {
                self.push(
                    ViolationKind::UnknownReference,
                    &fixed_path,
                    format!("unknown modifier '{name}'"),
                );
            }
        }
        if !form.fixed_modifiers.is_empty() && form.forms.is_empty() {
            self.push(
                ViolationKind::ModifierScopeConflict,
                form_path,
                "fixed_modifiers requires at least one child form to discriminate",
            );
        }

        let introduced = self.check_operands(
            tables,
            &form.operands,
            &path_key(form_path, "operands"),
            &scope.ancestor_operands,
        );

        if form.forms.is_empty() {
            return;
        }
        let mut forbidden = scope.forbidden_mods.clone();
        forbidden.extend(form.inst_modifiers.iter().map(String::as_str));
        forbidden.extend(form.fixed_modifiers.iter().map(String::as_str));
        let mut ancestor_operands = scope.ancestor_operands.clone();
        ancestor_operands.extend(introduced);
        let mut ancestor_locals = scope.ancestor_locals.clone();
        ancestor_locals.extend(form.local_modifier_defs.keys().map(String::as_str));
        let child_scope = FormScope {
            instr_local_mods: scope.instr_local_mods,
            forbidden_mods: forbidden,
            ancestor_operands,
            ancestor_locals,
            required_fixed: resolve_fixed(
                &form.fixed_modifiers,
                scope.instr_local_mods,
                tables.global_mods,
            ),
        };
        self.check_forms(tables, &form.forms, &path_key(form_path, "forms"), &child_scope);
    }

    fn check_fixed_modi_vals(
        &mut self,
        vals: &BTreeMap<String, String>,
        path: &str,
        required: &BTreeMap<&str, &EnumDef>,
    ) {
        let matches = vals.len() == required.len()
            && vals.keys().all(|name| required.contains_key(name.as_str()));
        if !matches {
            self.push(
                ViolationKind::MissingFixedVals,
                path,
                "keys must match the parent's fixed_modifiers exactly",
            );
        }
        for (name, label) in vals {
            let Some(options) = required.get(name.as_str()) else {
                continue;
            };
            if !options.contains_label(label) {
                self.push(
                    ViolationKind::MissingFixedVals,
                    path_key(path, name),
                    format!("label '{label}' not in enum of fixed modifier '{name}'"),
                );
            }
        }
    }
}
