//! Lowering from the V syntax tree to the typed IR
//!
//! Lowering is total over malformed input: error nodes, missing tokens and
//! constructs without a required part all become [`va_ir::Node::Null`], so
//! analysis can run on files that do not parse cleanly. Every record built
//! during one run gets a distinct [`va_ir::NodeId`].
//!
//! ```ignore
//! let tree = lang_v::parse("fn main() {}");
//! let file = va_lower::lower_file(&tree, LowerConfig::default())?;
//! ```

mod config;
mod error;
mod locality;
mod lower;

pub use config::{LowerConfig, UnmodeledTypePolicy};
pub use error::LowerError;
pub use locality::{find_innermost, parent_of, span};
pub use lower::{LoweringContext, lower, lower_file, lower_source_file};
