use ahash::AHashSet;

use super::{DefTables, Validator, path_index, path_key};
use crate::diagnostic::ViolationKind;
use crate::spec::Operand;

impl Validator {
    /// Checks one form's operand list and returns the names it introduces,
    /// for the caller to fold into the ancestor set before recursing.
    pub(super) fn check_operands<'m>(
        &mut self,
        tables: &DefTables<'m>,
        operands: &'m [Operand],
        path: &str,
        ancestors: &AHashSet<&'m str>,
    ) -> AHashSet<&'m str> {
        let mut names = AHashSet::new();
        for (idx, operand) in operands.iter().enumerate() {
            let opr_path = path_index(path, idx);
            if !names.insert(operand.name.as_str()) {
                self.push(
                    ViolationKind::DuplicateKey,
                    path_key(&opr_path, "name"),
                    format!("duplicate operand name '{}'", operand.name),
                );
            }
            if ancestors.contains(operand.name.as_str()) {
                self.push(
                    ViolationKind::DuplicateKey,
                    path_key(&opr_path, "name"),
                    format!(
                        "operand name '{}' shadows an ancestor form's operand",
                        operand.name
                    ),
                );
            }
            if !tables.roles.contains(operand.role.as_str()) {
                self.push(
                    ViolationKind::UnknownReference,
                    path_key(&opr_path, "role"),
                    format!("unknown role '{}'", operand.role),
                );
            }
            if !tables.kinds.contains_key(&operand.kind) {
                self.push(
                    ViolationKind::UnknownReference,
                    path_key(&opr_path, "kind"),
                    format!("unknown kind '{}'", operand.kind),
                );
            }
            let flag_path = path_key(&opr_path, "oprnd_flag");
            self.check_unique_list(&operand.oprnd_flag, &flag_path);
            for (fidx, flag) in operand.oprnd_flag.iter().enumerate() {
                if !tables.flags.contains_key(flag) {
                    self.push(
                        ViolationKind::UnknownReference,
                        path_index(&flag_path, fidx),
                        format!("unknown operand flag '{flag}'"),
                    );
                }
            }
        }
        names
    }
}
