//! Named-placeholder SQL templates compiled to parameterized queries.
//!
//! `puresql` turns SQL text with `:name`, `:name*`, `:name**`, `:!name`,
//! and `:*generator …*` placeholders into a dialect-specific query string
//! plus an ordered argument array ready for a prepared-statement call.
//!
//! Templates resolve in two phases: a static first pass numbers scalar
//! placeholders without any values, and a valued second pass binds lists,
//! dynamic fragments, and generator macros at call time. The first-pass
//! skeleton can back any number of bindings because resolution never
//! mutates its input context.

pub mod context;
pub mod errors;
pub mod files;
pub mod render;
pub mod resolve;
pub mod split;
pub mod template;

pub use context::{Bindings, Context, Hook, MakeParam, Partial, ResolveOptions};
pub use errors::Error;
pub use files::load_dir;
pub use render::{render, Rendered};
pub use resolve::{resolve, MAX_GENERATOR_DEPTH};
pub use split::split;
pub use template::{parse_named, parse_named_with_options, Template};

/// Re-export of the token vocabulary and lexer.
pub use puresql_parser::{tokenize, LexError, ParamKind, Token};
