//! Bit-width inference for enumerated fields and opcode discriminants.

use super::EnumDef;

/// Smallest width able to distinguish `n` options. Zero and one option both
/// allocate no bits since there is no choice to encode.
pub fn minimal_bits(n: u64) -> u32 {
    if n <= 1 { 0 } else { u64::BITS - (n - 1).leading_zeros() }
}

/// Inferred width of an enum: the bit length of the widest value in its
/// canonical table. Working from the values themselves keeps a value of
/// `u64::MAX` representable without wrapping.
pub fn enum_bits(options: &EnumDef) -> u32 {
    options
        .canonical()
        .iter()
        .map(|&(_, value)| u64::BITS - value.leading_zeros())
        .max()
        .unwrap_or(0)
}

/// An explicitly declared width too small for its enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidthOverflow {
    pub declared: u32,
    pub required: u32,
}

/// Resolves the encoded width of a modifier or flag definition: an explicit
/// `bits` declaration is validated against the enum, otherwise the width is
/// inferred via [`enum_bits`].
pub fn resolve_width(options: &EnumDef, bits: Option<u32>) -> Result<u32, WidthOverflow> {
    let required = enum_bits(options);
    match bits {
        None => Ok(required),
        Some(bits) if bits >= required => Ok(bits),
        Some(bits) => Err(WidthOverflow {
            declared: bits,
            required,
        }),
    }
}
