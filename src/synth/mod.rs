//! Version-1 encoding synthesis: a shape census over the validated model,
//! then deterministic field assignment for every leaf.
//!
//! The whole pass is a pure function of the model: instructions take their
//! ordinal position as opcode, forms take their sibling position, and the
//! remaining fields follow in a fixed order (operands, operand flags,
//! modifiers), so identical input always yields byte-identical output.

mod census;
mod layout;

pub use census::ShapeCensus;

use std::collections::BTreeMap;

use smallvec::SmallVec;

use crate::encoding::{EncodingMeta, EncodingModel, EncodingStatistics, LeafEncoding};
use crate::error::SpecError;
use crate::spec::width::resolve_width;
use crate::spec::{EnumDef, Form, Instruction, ModifierDef, Operand, SpecModel};
use crate::validator::Validator;

use layout::LayoutBuilder;

pub const ENCODING_VERSION: u32 = 1;

/// Validates the model and assigns every leaf a complete bit layout. Any
/// structural violation or budget overflow aborts the whole run; there is no
/// partial output.
pub fn synthesize(model: &SpecModel) -> Result<EncodingModel, SpecError> {
    Validator::new().validate(model)?;
    let census = ShapeCensus::take(model);
    let mut synth = Synthesizer {
        model,
        bits_inst: census.instruction_bits(),
        form_bits: census.form_level_bits(),
        encodings: BTreeMap::new(),
    };
    for (inst_idx, inst) in model.instructions.iter().enumerate() {
        synth.walk_instruction(inst, inst_idx as u64)?;
    }
    Ok(EncodingModel {
        meta: EncodingMeta {
            encoding_version: ENCODING_VERSION,
            statistics: EncodingStatistics {
                instruction_count: census.instruction_count,
                instruction_bits: census.instruction_bits(),
                form_level_counts: census.form_level_counts.to_vec(),
                form_level_bits: census.form_level_bits().to_vec(),
            },
        },
        encodings: synth.encodings,
    })
}

struct Synthesizer<'m> {
    model: &'m SpecModel,
    bits_inst: u32,
    form_bits: SmallVec<[u32; 8]>,
    encodings: BTreeMap<String, LeafEncoding>,
}

/// Everything accumulated along a root-to-leaf walk. Each child extends a
/// clone of its parent's context, so sibling traversals stay independent and
/// no ambient state leaks across the tree.
#[derive(Clone)]
struct PathCtx<'m> {
    form_path: Vec<&'m str>,
    form_indices: SmallVec<[u64; 8]>,
    operands: Vec<&'m Operand>,
    modifiers: Vec<&'m str>,
    /// Resolved modifier scope: globals, then instruction locals, then form
    /// locals down the path.
    mod_defs: BTreeMap<&'m str, &'m ModifierDef>,
    /// Fixed modifiers declared at the level above. They precede each form's
    /// own inst_modifiers in the encoded order; in version 1 fixed modifiers
    /// occupy regular modifier fields even though each form pins their value.
    parent_fixed: &'m [String],
}

impl<'m> Synthesizer<'m> {
    fn walk_instruction(&mut self, inst: &'m Instruction, opcode: u64) -> Result<(), SpecError> {
        let mut mod_defs: BTreeMap<&str, &ModifierDef> = self
            .model
            .global_modifier_defs
            .iter()
            .map(|(name, def)| (name.as_str(), def))
            .collect();
        mod_defs.extend(
            inst.local_modifier_defs
                .iter()
                .map(|(name, def)| (name.as_str(), def)),
        );
        let ctx = PathCtx {
            form_path: Vec::new(),
            form_indices: SmallVec::new(),
            operands: Vec::new(),
            modifiers: inst.inst_modifiers.iter().map(String::as_str).collect(),
            mod_defs,
            parent_fixed: &inst.fixed_modifiers,
        };
        self.walk_forms(inst, opcode, &inst.forms, &ctx)
    }

    fn walk_forms(
        &mut self,
        inst: &'m Instruction,
        opcode: u64,
        forms: &'m [Form],
        ctx: &PathCtx<'m>,
    ) -> Result<(), SpecError> {
        for (idx, form) in forms.iter().enumerate() {
            let mut child = ctx.clone();
            child.form_path.push(&form.key);
            child.form_indices.push(idx as u64);
            child.operands.extend(form.operands.iter());
            child
                .modifiers
                .extend(ctx.parent_fixed.iter().map(String::as_str));
            child
                .modifiers
                .extend(form.inst_modifiers.iter().map(String::as_str));
            child.mod_defs.extend(
                form.local_modifier_defs
                    .iter()
                    .map(|(name, def)| (name.as_str(), def)),
            );
            child.parent_fixed = &form.fixed_modifiers;
            if form.forms.is_empty() {
                self.emit_leaf(inst, opcode, &child)?;
            } else {
                self.walk_forms(inst, opcode, &form.forms, &child)?;
            }
        }
        Ok(())
    }

    fn emit_leaf(
        &mut self,
        inst: &'m Instruction,
        opcode: u64,
        ctx: &PathCtx<'m>,
    ) -> Result<(), SpecError> {
        let key = format!("{}.{}", inst.name, ctx.form_path.join("."));
        let mut builder = LayoutBuilder::new(key);

        builder.constant(self.bits_inst, opcode);
        // One opcode field per census depth, even past this leaf's own depth
        // (constant 0 there), so every leaf shares the same opcode prefix
        // shape.
        for (depth, bits) in self.form_bits.iter().enumerate() {
            let value = ctx.form_indices.get(depth).copied().unwrap_or(0);
            builder.constant(*bits, value);
        }

        for operand in &ctx.operands {
            let width = *self
                .model
                .operand_width_bits
                .get(&operand.kind)
                .expect("validated model: operand kind is declared");
            builder.operand(&operand.name, width);
        }

        for (oprnd_idx, operand) in ctx.operands.iter().enumerate() {
            for flag in &operand.oprnd_flag {
                let def = self
                    .model
                    .global_oprnd_flag_defs
                    .get(flag)
                    .expect("validated model: operand flag is defined");
                let width = self.field_width(flag, &def.options, def.bits)?;
                builder.oprnd_flag(flag, width, oprnd_idx);
            }
        }

        for name in &ctx.modifiers {
            let def = ctx
                .mod_defs
                .get(name)
                .expect("validated model: modifier is defined in scope");
            let width = self.field_width(name, &def.options, def.bits)?;
            builder.modifier(name, width);
        }

        let (key, ranges) = builder.finish()?;
        self.encodings.insert(
            key,
            LeafEncoding {
                instruction: inst.name.clone(),
                form_path: ctx.form_path.iter().map(|k| k.to_string()).collect(),
                ranges,
            },
        );
        Ok(())
    }

    fn field_width(
        &self,
        name: &str,
        options: &EnumDef,
        bits: Option<u32>,
    ) -> Result<u32, SpecError> {
        resolve_width(options, bits).map_err(|overflow| SpecError::WidthOverflow {
            path: name.to_string(),
            declared: overflow.declared,
            required: overflow.required,
        })
    }
}
