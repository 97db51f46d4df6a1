pub mod literal;
pub mod rule;
pub mod terms;
