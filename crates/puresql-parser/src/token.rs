use std::fmt;

/// One token of a tokenized SQL template.
///
/// `Text`, `Param`, `Generator`, and `Name` come out of the lexer.
/// `ReplacedParam` and `ReplacedGenerator` are rewritten in by resolution
/// once a placeholder has been assigned or a generator expanded.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Verbatim SQL fragment.
    Text(String),
    /// Unresolved placeholder such as `:a`, `:a*`, `:a**`, or `:!table`.
    /// The stored name keeps its affixes.
    Param(String),
    /// Macro invocation `:*name :p1 :p2*`. The stored name keeps its
    /// leading `*`; `params` are the companion parameters in declaration
    /// order, each keeping any star suffix.
    Generator { name: String, params: Vec<String> },
    /// `-- name: label` boundary marker between named templates.
    Name(String),
    /// A param that resolution has assigned a placeholder.
    ReplacedParam(String),
    /// A generator expanded into its own fully-resolved token sequence.
    ReplacedGenerator(Vec<Token>),
}

/// The facet a parameter name encodes through its affixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Plain positional parameter.
    Scalar,
    /// `name*`: one placeholder per list element.
    List,
    /// `name**`: one parenthesized placeholder group per inner list.
    ListOfLists,
    /// `!name`: literal text substitution, never positional.
    Dynamic,
}

impl ParamKind {
    pub fn of(name: &str) -> ParamKind {
        if name.starts_with('!') {
            ParamKind::Dynamic
        } else if name.ends_with("**") {
            ParamKind::ListOfLists
        } else if name.ends_with('*') {
            ParamKind::List
        } else {
            ParamKind::Scalar
        }
    }
}

impl fmt::Display for Token {
    /// Renders the token in template source form. Replaced params print the
    /// colon form of the name they were resolved from, so a partially
    /// resolved template stays serializable and re-tokenizable.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Text(text) => write!(f, "{text}"),
            Token::Param(name) | Token::ReplacedParam(name) => write!(f, ":{name}"),
            Token::Generator { name, params } => {
                write!(f, ":{name}")?;
                for param in params {
                    write!(f, " :{param}")?;
                }
                write!(f, "*")
            }
            Token::Name(label) => writeln!(f, "-- name: {label}"),
            Token::ReplacedGenerator(subtokens) => {
                for token in subtokens {
                    write!(f, "{token}")?;
                }
                Ok(())
            }
        }
    }
}
