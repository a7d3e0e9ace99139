/// Token resolution and generator expansion
use crate::context::{Bindings, Context};
use crate::errors::Error;
use puresql_parser::{tokenize, ParamKind, Token};
use serde_json::Value;
use std::collections::HashMap;
use tracing::warn;

/// Upper bound on nested generator expansion. Hooks can return partials
/// that invoke further generators; past this depth the expansion is
/// treated as cyclic.
pub const MAX_GENERATOR_DEPTH: usize = 32;

/// Resolve a context against an optional value source.
///
/// Without bindings this is a first pass: scalar parameters are numbered
/// and rewritten, while dynamic parameters, lists, and generators stay
/// untouched for a later pass. With bindings every remaining token is
/// resolved and `args` is rebuilt from `params`, so argument order always
/// matches placeholder numbering.
///
/// The input context is left untouched; the deepened copy is returned.
pub fn resolve(ctx: &Context, bindings: Option<&Bindings>) -> Result<Context, Error> {
    let mut local = ctx.clone();
    walk(&mut local, bindings, 0)?;
    if let Some(bindings) = bindings {
        rebuild_args(&mut local, bindings)?;
    }
    Ok(local)
}

/// Valued walk without the final argument rebuild: rewrites dynamic
/// parameters, lists, and generators into a concrete reusable skeleton.
pub(crate) fn resolve_structure(ctx: &Context, bindings: &Bindings) -> Result<Context, Error> {
    let mut local = ctx.clone();
    walk(&mut local, Some(bindings), 0)?;
    Ok(local)
}

fn walk(ctx: &mut Context, bindings: Option<&Bindings>, depth: usize) -> Result<(), Error> {
    for idx in 0..ctx.tokens.len() {
        match ctx.tokens[idx].clone() {
            Token::Text(_) | Token::ReplacedParam(_) | Token::ReplacedGenerator(_) => {}
            Token::Name(label) => return Err(Error::UnexpectedName { label }),
            Token::Param(name) => resolve_param(ctx, idx, name, bindings)?,
            Token::Generator { name, params } => {
                if let Some(bindings) = bindings {
                    expand_generator(ctx, idx, name, params, bindings, depth)?;
                }
            }
        }
    }
    Ok(())
}

fn resolve_param(
    ctx: &mut Context,
    idx: usize,
    name: String,
    bindings: Option<&Bindings>,
) -> Result<(), Error> {
    match ParamKind::of(&name) {
        // Dynamic parameters substitute as raw text and are never assigned
        // an argument position, so they cannot be discovered statically.
        ParamKind::Dynamic => {
            let Some(bindings) = bindings else {
                return Ok(());
            };
            if !ctx.replacements.contains_key(&name) {
                let value = bindings
                    .get(&name)
                    .ok_or_else(|| Error::MissingValue { name: name.clone() })?;
                ctx.replacements.insert(name.clone(), literal_text(value));
            }
            ctx.tokens[idx] = Token::ReplacedParam(name);
        }
        ParamKind::List | ParamKind::ListOfLists => {
            let Some(bindings) = bindings else {
                return Ok(());
            };
            if ctx.replacements.contains_key(&name) {
                if ctx.options.repeating_args {
                    ctx.params.push(name.clone());
                }
                ctx.tokens[idx] = Token::ReplacedParam(name);
                return Ok(());
            }
            let value = bindings
                .get(&name)
                .ok_or_else(|| Error::MissingValue { name: name.clone() })?;
            let replacement = match ParamKind::of(&name) {
                ParamKind::ListOfLists => expand_rows(ctx, &name, value)?,
                _ => expand_list(ctx, &name, value)?,
            };
            ctx.replacements.insert(name.clone(), replacement);
            ctx.params.push(name.clone());
            ctx.tokens[idx] = Token::ReplacedParam(name);
        }
        // Scalars are numbered on first sight even without values; that is
        // what makes the static first pass produce a stable skeleton.
        ParamKind::Scalar => {
            if ctx.replacements.contains_key(&name) {
                if ctx.options.repeating_args {
                    ctx.params.push(name.clone());
                }
            } else {
                let placeholder = (ctx.options.make_param)(ctx.param_count, &name);
                ctx.param_count += 1;
                ctx.replacements.insert(name.clone(), placeholder);
                ctx.params.push(name.clone());
            }
            ctx.tokens[idx] = Token::ReplacedParam(name);
        }
    }
    Ok(())
}

/// One fresh placeholder per list element, joined with commas.
fn expand_list(ctx: &mut Context, name: &str, value: &Value) -> Result<String, Error> {
    let items = value.as_array().ok_or_else(|| Error::ExpectedList {
        name: name.to_string(),
    })?;
    let make_param = ctx.options.make_param.clone();
    let mut placeholders = Vec::with_capacity(items.len());
    for _ in items {
        placeholders.push(make_param(ctx.param_count, name));
        ctx.param_count += 1;
    }
    Ok(placeholders.join(","))
}

/// One parenthesized placeholder group per inner list, groups joined with
/// commas.
fn expand_rows(ctx: &mut Context, name: &str, value: &Value) -> Result<String, Error> {
    let rows = value.as_array().ok_or_else(|| Error::ExpectedListOfLists {
        name: name.to_string(),
    })?;
    let make_param = ctx.options.make_param.clone();
    let mut groups = Vec::with_capacity(rows.len());
    for row in rows {
        let row = row.as_array().ok_or_else(|| Error::ExpectedListOfLists {
            name: name.to_string(),
        })?;
        let mut placeholders = Vec::with_capacity(row.len());
        for _ in row {
            placeholders.push(make_param(ctx.param_count, name));
            ctx.param_count += 1;
        }
        groups.push(format!("({})", placeholders.join(",")));
    }
    Ok(groups.join(","))
}

fn expand_generator(
    ctx: &mut Context,
    idx: usize,
    name: String,
    companions: Vec<String>,
    bindings: &Bindings,
    depth: usize,
) -> Result<(), Error> {
    if depth >= MAX_GENERATOR_DEPTH {
        return Err(Error::CyclicGenerator {
            name,
            limit: MAX_GENERATOR_DEPTH,
        });
    }
    let hook = bindings
        .hook(&name)
        .ok_or_else(|| Error::MissingHook { name: name.clone() })?;
    let mut hook_args = Vec::with_capacity(companions.len());
    for companion in &companions {
        let value = bindings.get(companion).ok_or_else(|| Error::MissingValue {
            name: companion.clone(),
        })?;
        hook_args.push(value.clone());
    }
    let partial = hook(&hook_args);

    let mut subtokens = tokenize(&partial.sql).map_err(|source| Error::PartialLex {
        name: name.clone(),
        source,
    })?;
    subtokens.retain(|token| !matches!(token, Token::Name(_)));
    rename_partial_params(&mut subtokens, &name, &companions);

    // The partial resolves as its own context, inheriting the parent's
    // state so shared names reuse existing placeholders; the continued
    // state merges back afterwards.
    let mut child = Context {
        tokens: subtokens,
        replacements: ctx.replacements.clone(),
        params: ctx.params.clone(),
        args: ctx.args.clone(),
        param_count: ctx.param_count,
        options: ctx.options.clone(),
    };
    walk(&mut child, Some(bindings), depth + 1)?;

    ctx.replacements = child.replacements;
    ctx.params = child.params;
    ctx.args = child.args;
    ctx.param_count = child.param_count;
    ctx.tokens[idx] = Token::ReplacedGenerator(child.tokens);
    Ok(())
}

/// Rename the partial's distinct parameter names onto the companion names
/// in order of first appearance: first distinct name → first companion,
/// second distinct name → second companion, and so on. A distinct name
/// beyond the declared companions keeps its own binding; the overflow is
/// reported but the argument is never dropped.
fn rename_partial_params(tokens: &mut [Token], generator: &str, companions: &[String]) {
    let mut mapping: HashMap<String, String> = HashMap::new();
    let mut next = 0;
    for token in tokens.iter_mut() {
        if let Token::Param(name) = token {
            if !mapping.contains_key(name.as_str()) {
                if next < companions.len() {
                    mapping.insert(name.clone(), companions[next].clone());
                    next += 1;
                } else {
                    warn!(
                        generator = %generator,
                        param = %name,
                        "partial names more parameters than the generator declares"
                    );
                    mapping.insert(name.clone(), name.clone());
                }
            }
            let renamed = &mapping[name.as_str()];
            if renamed != name.as_str() {
                *name = renamed.clone();
            }
        }
    }
}

/// Rebuild `args` from `params` and the value source. Allocation happened
/// in text order during the walk, but `params` records argument order, so
/// iterating it keeps values aligned with placeholder numbering.
fn rebuild_args(ctx: &mut Context, bindings: &Bindings) -> Result<(), Error> {
    ctx.args.clear();
    for name in &ctx.params {
        if !ctx.replacements.contains_key(name) {
            return Err(Error::MissingReplacement { name: name.clone() });
        }
        let value = bindings
            .get(name)
            .ok_or_else(|| Error::MissingValue { name: name.clone() })?;
        push_flattened(&mut ctx.args, value);
    }
    Ok(())
}

/// Arrays flatten one level; nested arrays flatten a second level, matching
/// list and list-of-lists expansion.
fn push_flattened(args: &mut Vec<Value>, value: &Value) {
    match value {
        Value::Array(items) => {
            for item in items {
                match item {
                    Value::Array(inner) => args.extend(inner.iter().cloned()),
                    other => args.push(other.clone()),
                }
            }
        }
        other => args.push(other.clone()),
    }
}

/// Dynamic parameters substitute as raw text; strings drop their JSON
/// quoting.
fn literal_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
