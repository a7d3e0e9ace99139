//! Property-based round-trip tests
//!
//! These tests generate template fragments and verify that:
//! 1. The lexer never panics
//! 2. Tokenizing, printing back to source form, and re-tokenizing is stable

use proptest::prelude::*;
use puresql_parser::{tokenize, Token};

fn source_of(tokens: &[Token]) -> String {
    tokens.iter().map(ToString::to_string).collect()
}

/// Helper to perform round-trip test: tokenize → print → tokenize
fn assert_round_trip(template: &str) {
    let first = match tokenize(template) {
        Ok(tokens) => tokens,
        Err(_) => return,
    };

    let printed = source_of(&first);
    let second = tokenize(&printed).unwrap_or_else(|e| {
        panic!(
            "Round-trip failed to tokenize!\nOriginal: {}\nPrinted: {}\nError: {}",
            template, printed, e
        )
    });

    assert_eq!(
        first, second,
        "Round-trip token mismatch!\nOriginal: {}\nPrinted: {}",
        template, printed
    );
}

fn arb_ident() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,8}"
}

fn arb_param() -> impl Strategy<Value = String> {
    (arb_ident(), 0usize..3).prop_map(|(name, stars)| format!(":{}{}", name, "*".repeat(stars)))
}

fn arb_dynamic_param() -> impl Strategy<Value = String> {
    arb_ident().prop_map(|name| format!(":!{name}"))
}

fn arb_generator() -> impl Strategy<Value = String> {
    (
        arb_ident(),
        prop::collection::vec((arb_ident(), 0usize..3), 1..4),
    )
        .prop_map(|(name, params)| {
            let params: Vec<String> = params
                .into_iter()
                .map(|(p, stars)| format!(":{}{}", p, "*".repeat(stars)))
                .collect();
            format!(":*{} {}*", name, params.join(" "))
        })
}

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(" WHERE x = 5 AND ".to_string()),
        Just("SELECT a, b FROM t ".to_string()),
        Just(" IN (1,2,3) OR ".to_string()),
        Just(" <= 17;\n".to_string()),
        Just(" y::int > ".to_string()),
    ]
}

fn arb_marker() -> impl Strategy<Value = String> {
    arb_ident().prop_map(|label| format!("\n-- name: {label}\n"))
}

fn arb_fragment() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => arb_text(),
        3 => arb_param(),
        1 => arb_dynamic_param(),
        1 => arb_generator(),
        1 => arb_marker(),
    ]
}

fn arb_template() -> impl Strategy<Value = String> {
    prop::collection::vec(arb_fragment(), 0..12).prop_map(|parts| parts.join(" "))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Property: generated templates tokenize, print, and re-tokenize stably
    #[test]
    fn prop_template_round_trip(template in arb_template()) {
        assert_round_trip(&template);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// Property: the lexer never panics on arbitrary input
    #[test]
    fn prop_lexer_never_panics(s in "\\PC{0,200}") {
        let _ = tokenize(&s);
    }
}

// ===== Specific edge case round trips =====

#[test]
fn test_round_trip_mixed_params() {
    assert_round_trip("SELECT * FROM :!t WHERE :a > 5 AND :b* IN (1) AND :c** = 2;");
}

#[test]
fn test_round_trip_generator() {
    assert_round_trip("SELECT * FROM t WHERE :*gen :a :b :c***");
}

#[test]
fn test_round_trip_named_templates() {
    assert_round_trip("-- name: one\nSELECT 1;\n-- name: two\nSELECT 2;");
}
