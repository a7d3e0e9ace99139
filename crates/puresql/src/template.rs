use crate::context::{Bindings, Context, ResolveOptions};
use crate::errors::Error;
use crate::render::{render, Rendered};
use crate::resolve::{resolve, resolve_structure};
use crate::split::split;
use puresql_parser::{tokenize, Token};
use serde_json::Value;

/// A reusable SQL template wrapping one resolution context.
#[derive(Debug, Clone)]
pub struct Template {
    ctx: Context,
}

impl Template {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            ctx: Context::new(tokens),
        }
    }

    pub fn with_options(tokens: Vec<Token>, options: ResolveOptions) -> Self {
        Self {
            ctx: Context::with_options(tokens, options),
        }
    }

    pub fn from_context(ctx: Context) -> Self {
        Self { ctx }
    }

    /// Tokenize a single template. Use [`parse_named`] for source text
    /// containing `-- name:` markers.
    pub fn parse(sql: &str) -> Result<Self, Error> {
        Ok(Self::new(tokenize(sql)?))
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// First pass: number the static parameters without any values,
    /// yielding a skeleton that later bindings resolve against.
    pub fn prepare(&self) -> Result<Template, Error> {
        Ok(Self {
            ctx: resolve(&self.ctx, None)?,
        })
    }

    /// The argument array for the given values, in placeholder order.
    pub fn map(&self, bindings: &Bindings) -> Result<Vec<Value>, Error> {
        Ok(resolve(&self.ctx, Some(bindings))?.args)
    }

    /// Full resolution and rendering: the prepared-statement query plus its
    /// ordered argument array.
    pub fn map_template(&self, bindings: &Bindings) -> Result<Rendered, Error> {
        render(&resolve(&self.ctx, Some(bindings))?)
    }

    /// Substitute only the structure the given values pin down (dynamic
    /// parameters, list shapes, generators) and return the resulting
    /// concrete template for reuse. No arguments are materialized; bind the
    /// returned template with `map` or `map_template` per call.
    pub fn make_template(&self, bindings: &Bindings) -> Result<Template, Error> {
        Ok(Self {
            ctx: resolve_structure(&self.ctx, bindings)?,
        })
    }
}

/// Tokenize and split source text into its named templates. Content before
/// the first `-- name:` marker is keyed by the empty string.
pub fn parse_named(sql: &str) -> Result<Vec<(String, Template)>, Error> {
    parse_named_with_options(sql, ResolveOptions::default())
}

pub fn parse_named_with_options(
    sql: &str,
    options: ResolveOptions,
) -> Result<Vec<(String, Template)>, Error> {
    Ok(split(tokenize(sql)?)
        .into_iter()
        .map(|(name, tokens)| {
            (
                name,
                Template::with_options(tokens, options.clone()),
            )
        })
        .collect())
}
