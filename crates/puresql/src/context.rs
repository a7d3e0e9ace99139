use puresql_parser::Token;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Placeholder factory: 0-based positional index and parameter name in,
/// placeholder text out.
pub type MakeParam = Arc<dyn Fn(usize, &str) -> String + Send + Sync>;

/// Generator hook: companion parameter values in declaration order in,
/// partial SQL fragment out.
pub type Hook = Box<dyn Fn(&[Value]) -> Partial + Send + Sync>;

/// SQL fragment returned by a generator hook, spliced into the template
/// and resolved recursively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partial {
    pub sql: String,
}

impl Partial {
    pub fn new(sql: impl Into<String>) -> Self {
        Self { sql: sql.into() }
    }
}

/// Placeholder and argument policy for one resolution sequence.
#[derive(Clone)]
pub struct ResolveOptions {
    /// Produces the placeholder text for each newly allocated position.
    pub make_param: MakeParam,
    /// If true, every occurrence of a repeated parameter re-contributes its
    /// value to the argument list. Suited to placeholder styles without
    /// backreferences.
    pub repeating_args: bool,
}

impl ResolveOptions {
    /// Numbered `$1, $2, …` placeholders; repeated parameters reuse their
    /// first placeholder and contribute one argument.
    pub fn postgres() -> Self {
        Self {
            make_param: Arc::new(|idx, _| format!("${}", idx + 1)),
            repeating_args: false,
        }
    }

    /// `?` placeholders; repeated parameters re-contribute their values at
    /// every occurrence.
    pub fn mysql() -> Self {
        Self {
            make_param: Arc::new(|_, _| "?".to_string()),
            repeating_args: true,
        }
    }
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self::postgres()
    }
}

impl fmt::Debug for ResolveOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolveOptions")
            .field("repeating_args", &self.repeating_args)
            .finish_non_exhaustive()
    }
}

/// Resolution state for one named template across one or more passes.
///
/// `resolve` never mutates a context in place; it deepens a fresh copy and
/// returns it, so a shared first-pass skeleton stays untouched no matter
/// how many bindings run against it.
#[derive(Debug, Clone)]
pub struct Context {
    /// Token sequence, rewritten in place across passes.
    pub tokens: Vec<Token>,
    /// Parameter name → rendered placeholder text (scalar), joined
    /// placeholder group (list / list-of-lists), or literal value
    /// (dynamic). Once set, a name's replacement never changes.
    pub replacements: HashMap<String, String>,
    /// Parameter names in argument order; grows monotonically.
    pub params: Vec<String>,
    /// Resolved values, rebuilt from `params` on every valued pass.
    pub args: Vec<Value>,
    /// Running count of allocated placeholders, persisted across passes so
    /// a later pass continues numbering rather than restarting.
    pub param_count: usize,
    pub options: ResolveOptions,
}

impl Context {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self::with_options(tokens, ResolveOptions::default())
    }

    pub fn with_options(tokens: Vec<Token>, options: ResolveOptions) -> Self {
        Self {
            tokens,
            replacements: HashMap::new(),
            params: Vec::new(),
            args: Vec::new(),
            param_count: 0,
            options,
        }
    }

    /// The template in colon-placeholder source form, replaced tokens
    /// included. Useful for inspecting a first-pass skeleton.
    pub fn source(&self) -> String {
        self.tokens.iter().map(ToString::to_string).collect()
    }
}

/// Value source for a resolution pass: named values plus generator hooks.
#[derive(Default)]
pub struct Bindings {
    values: HashMap<String, Value>,
    hooks: HashMap<String, Hook>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.values.insert(name.into(), value.into());
        self
    }

    pub fn set_hook(
        &mut self,
        name: impl Into<String>,
        hook: impl Fn(&[Value]) -> Partial + Send + Sync + 'static,
    ) -> &mut Self {
        self.hooks.insert(name.into(), Box::new(hook));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn hook(&self, name: &str) -> Option<&Hook> {
        self.hooks.get(name)
    }
}

impl fmt::Debug for Bindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bindings")
            .field("values", &self.values)
            .field("hooks", &self.hooks.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use puresql_parser::tokenize;

    #[test]
    fn test_default_make_param_is_numbered() {
        let options = ResolveOptions::default();
        assert_eq!((options.make_param)(0, "a"), "$1");
        assert_eq!((options.make_param)(4, "a"), "$5");
        assert!(!options.repeating_args);
    }

    #[test]
    fn test_mysql_options() {
        let options = ResolveOptions::mysql();
        assert_eq!((options.make_param)(7, "a"), "?");
        assert!(options.repeating_args);
    }

    #[test]
    fn test_source_round_trips_unresolved_tokens() {
        let sql = "SELECT * FROM :!table WHERE :a > 5 AND :*gen :a :b**;";
        let ctx = Context::new(tokenize(sql).unwrap());
        assert_eq!(ctx.source(), sql);
    }
}
