pub(crate) mod arith;
pub(crate) mod common;
