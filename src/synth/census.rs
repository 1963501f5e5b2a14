//! Pass 1: shape census over the whole instruction set.

use smallvec::SmallVec;

use crate::spec::width::minimal_bits;
use crate::spec::{Form, SpecModel};

/// Instruction count and, per form-tree depth, the maximum sibling fan-out
/// observed across all instructions. Depth 0 is each instruction's own root
/// forms list, so depths line up across instructions of different shapes.
///
/// One width is allocated per depth for the entire instruction set; shallow
/// or narrow subtrees do not get tailored widths. Version 1 keeps this
/// deliberately simple policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeCensus {
    pub instruction_count: usize,
    pub form_level_counts: SmallVec<[usize; 8]>,
}

impl ShapeCensus {
    pub fn take(model: &SpecModel) -> Self {
        let mut counts: SmallVec<[usize; 8]> = SmallVec::new();
        for inst in &model.instructions {
            record(&mut counts, 0, inst.forms.len());
            for form in &inst.forms {
                descend(form, 1, &mut counts);
            }
        }
        Self {
            instruction_count: model.instructions.len(),
            form_level_counts: counts,
        }
    }

    /// Width of the instruction opcode field.
    pub fn instruction_bits(&self) -> u32 {
        minimal_bits(self.instruction_count as u64)
    }

    /// Opcode width allocated at each form-tree depth.
    pub fn form_level_bits(&self) -> SmallVec<[u32; 8]> {
        self.form_level_counts
            .iter()
            .map(|&count| minimal_bits(count as u64))
            .collect()
    }
}

fn descend(form: &Form, depth: usize, counts: &mut SmallVec<[usize; 8]>) {
    if form.forms.is_empty() {
        return;
    }
    record(counts, depth, form.forms.len());
    for child in &form.forms {
        descend(child, depth + 1, counts);
    }
}

fn record(counts: &mut SmallVec<[usize; 8]>, depth: usize, count: usize) {
    if depth >= counts.len() {
        counts.resize(depth + 1, 0);
    }
    if count > counts[depth] {
        counts[depth] = count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::test_support::{base_model, instruction, leaf};

    #[test]
    fn census_tracks_max_fanout_per_depth() {
        let mut deep = leaf("outer");
        deep.forms = vec![leaf("x"), leaf("y"), leaf("z")];
        let mut model = base_model();
        model.instructions.push(instruction("A", vec![deep]));
        model
            .instructions
            .push(instruction("B", vec![leaf("p"), leaf("q")]));

        let census = ShapeCensus::take(&model);
        assert_eq!(census.instruction_count, 2);
        assert_eq!(census.form_level_counts.as_slice(), &[2, 3]);
        assert_eq!(census.instruction_bits(), 1);
        assert_eq!(census.form_level_bits().as_slice(), &[1, 2]);
    }

    #[test]
    fn single_choices_cost_no_bits() {
        let mut model = base_model();
        model.instructions.push(instruction("A", vec![leaf("only")]));
        let census = ShapeCensus::take(&model);
        assert_eq!(census.instruction_bits(), 0);
        assert_eq!(census.form_level_bits().as_slice(), &[0]);
    }

    #[test]
    fn depth_is_measured_per_instruction() {
        // B's root list sits at depth 0 even though A nests deeper.
        let mut mid = leaf("mid");
        mid.forms = vec![leaf("a"), leaf("b"), leaf("c"), leaf("d"), leaf("e")];
        let mut top = leaf("top");
        top.forms = vec![mid];
        let mut model = base_model();
        model.instructions.push(instruction("A", vec![top]));
        model
            .instructions
            .push(instruction("B", vec![leaf("p"), leaf("q"), leaf("r")]));

        let census = ShapeCensus::take(&model);
        assert_eq!(census.form_level_counts.as_slice(), &[3, 1, 5]);
        assert_eq!(census.form_level_bits().as_slice(), &[2, 0, 3]);
    }
}
