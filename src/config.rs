//! Player settings: the `Settings` schema and its loader.
//!
//! Settings come from an optional TOML file and `TUNEDECK__*` environment
//! variables; anything missing keeps its default.

mod load;
mod schema;

pub use load::default_log_path;
pub use schema::*;
