use crate::context::Context;
use crate::errors::Error;
use puresql_parser::Token;
use serde_json::Value;
use std::collections::HashMap;

/// A rendered query with its ordered argument array.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub query: String,
    pub args: Vec<Value>,
}

/// Serialize a context's tokens into a single query string.
///
/// `Text` tokens contribute their literal text, `ReplacedParam` tokens
/// their stored replacement, and `ReplacedGenerator` tokens their
/// recursively rendered subtokens. Unresolved params and generators render
/// back to colon-prefixed source form, so a partially resolved template
/// survives the round trip. Rendering never recomputes resolution state; a
/// context can be rendered repeatedly.
pub fn render(ctx: &Context) -> Result<Rendered, Error> {
    let mut query = String::new();
    render_tokens(&ctx.tokens, &ctx.replacements, &mut query)?;
    Ok(Rendered {
        query,
        args: ctx.args.clone(),
    })
}

fn render_tokens(
    tokens: &[Token],
    replacements: &HashMap<String, String>,
    out: &mut String,
) -> Result<(), Error> {
    for token in tokens {
        match token {
            Token::Text(text) => out.push_str(text),
            Token::ReplacedParam(name) => {
                let replacement =
                    replacements
                        .get(name)
                        .ok_or_else(|| Error::MissingReplacement {
                            name: name.clone(),
                        })?;
                out.push_str(replacement);
            }
            Token::ReplacedGenerator(subtokens) => render_tokens(subtokens, replacements, out)?,
            Token::Param(_) | Token::Generator { .. } => out.push_str(&token.to_string()),
            Token::Name(label) => {
                return Err(Error::UnexpectedName {
                    label: label.clone(),
                })
            }
        }
    }
    Ok(())
}
