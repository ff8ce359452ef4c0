// Domain model for Loopnest Graph: program representation, feature graph,
// and its flat binary form.

pub mod annotation;
pub mod builder;
pub mod encoder;
pub mod graph;
pub mod index_vars;
pub mod program;
pub mod serializer;
