//! Word expansions applied between tokenization and execution.

pub mod glob_expander;
pub mod tilde;
