/// puresql-parser - lexer for SQL templates with named placeholders
///
/// This crate turns raw SQL template text into the token stream the
/// resolution engine consumes. The surface syntax:
/// - `:name`, `:name*`, `:name**`, `:!name` become `Param` tokens
/// - `:*name :p1 :p2*` becomes a `Generator` token
/// - `-- name: label` markers become `Name` tokens separating templates
/// - other `-- ...` comments are stripped
/// - everything else is `Text`
///
/// Tokens render back to template source form through `Display`, so a
/// partially resolved template can be serialized and re-tokenized.
pub mod lexer;
pub mod token;

pub use lexer::{tokenize, LexError};
pub use token::{ParamKind, Token};
