// netsec/src/commands/mod.rs

pub mod clean;
pub mod run;
