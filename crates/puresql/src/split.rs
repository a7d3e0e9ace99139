use puresql_parser::Token;

/// Partition one token stream into named sub-streams at `Name` markers.
///
/// A `Name(label)` token closes the currently accumulating sequence
/// (discarding it if empty) and opens a new one keyed by `label`. Content
/// preceding the first marker is keyed by the empty string; an empty
/// default sequence is omitted entirely. Keys are unique (a repeated label
/// replaces the earlier entry's tokens but keeps its position) and entries
/// follow first-occurrence order.
pub fn split(tokens: Vec<Token>) -> Vec<(String, Vec<Token>)> {
    let mut contexts: Vec<(String, Vec<Token>)> = Vec::new();
    let mut current_name = String::new();
    let mut current: Vec<Token> = Vec::new();

    for token in tokens {
        match token {
            Token::Name(label) => {
                if !current.is_empty() {
                    insert(
                        &mut contexts,
                        std::mem::take(&mut current_name),
                        std::mem::take(&mut current),
                    );
                }
                current_name = label;
            }
            other => current.push(other),
        }
    }
    if !current.is_empty() {
        insert(&mut contexts, current_name, current);
    }

    contexts
}

fn insert(contexts: &mut Vec<(String, Vec<Token>)>, name: String, tokens: Vec<Token>) {
    if let Some(slot) = contexts.iter_mut().find(|(existing, _)| *existing == name) {
        slot.1 = tokens;
    } else {
        contexts.push((name, tokens));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Token {
        Token::Text(s.to_string())
    }

    fn name(s: &str) -> Token {
        Token::Name(s.to_string())
    }

    #[test]
    fn test_split_multi_query_stream() {
        let contexts = split(vec![
            text("SELECT * FROM abc;"),
            name("tquery1"),
            text("SELECT * FROM def;"),
        ]);

        assert_eq!(
            contexts,
            vec![
                ("".to_string(), vec![text("SELECT * FROM abc;")]),
                ("tquery1".to_string(), vec![text("SELECT * FROM def;")]),
            ]
        );
    }

    #[test]
    fn test_no_empty_default_context() {
        let contexts = split(vec![name("q"), text("SELECT 1;")]);
        assert_eq!(contexts, vec![("q".to_string(), vec![text("SELECT 1;")])]);
    }

    #[test]
    fn test_marker_without_tokens_is_discarded() {
        let contexts = split(vec![name("empty"), name("q"), text("SELECT 1;")]);
        assert_eq!(contexts, vec![("q".to_string(), vec![text("SELECT 1;")])]);
    }

    #[test]
    fn test_duplicate_label_replaces_in_place() {
        let contexts = split(vec![
            name("q"),
            text("first"),
            name("other"),
            text("between"),
            name("q"),
            text("second"),
        ]);
        assert_eq!(
            contexts,
            vec![
                ("q".to_string(), vec![text("second")]),
                ("other".to_string(), vec![text("between")]),
            ]
        );
    }

    #[test]
    fn test_insertion_order_follows_first_occurrence() {
        let contexts = split(vec![
            text("zero"),
            name("b"),
            text("one"),
            name("a"),
            text("two"),
        ]);
        let names: Vec<&str> = contexts.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["", "b", "a"]);
    }
}
