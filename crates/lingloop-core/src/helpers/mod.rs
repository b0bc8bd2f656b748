// crates/lingloop-core/src/helpers/mod.rs

pub mod text;
pub mod time;
