//! Core of the gpidl encoding toolchain: a typed model of a hierarchical GPU
//! instruction specification, a structural validator over it, and the
//! version-1 encoding synthesizer that assigns every leaf (instruction +
//! form path) a complete, gap-free bit layout of the 128-bit word.
//!
//! The crate is a pure batch transform. [`SpecModel`] is built once (usually
//! from a JSON document) and never mutated; [`Validator`] collects every
//! structural violation before synthesis is allowed to run; [`synthesize`]
//! produces the terminal [`EncodingModel`] artifact consumed by downstream
//! renderers.

pub mod diagnostic;
pub mod encoding;
pub mod error;
pub mod spec;
pub mod synth;
pub mod validator;

pub use encoding::{BitRange, EncodingModel, RangeKind};
pub use error::SpecError;
pub use spec::SpecModel;
pub use synth::{ShapeCensus, synthesize};
pub use validator::Validator;
