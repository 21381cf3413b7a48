use csv_import_options::{
    EmptyFieldRule, OptionKind, OptionRecord, OptionsError, PreparedField, QuoteRule,
    normalize_quotes,
};
use proptest::prelude::*;

#[test]
fn remove_collapses_doubled_quotes_and_keeps_trailing_text() {
    assert_eq!(
        normalize_quotes(r#"  "say ""hi"" now" tail"#, QuoteRule::Remove).unwrap(),
        r#"say "hi" now tail"#
    );
    assert_eq!(normalize_quotes(r#""""#, QuoteRule::Remove).unwrap(), "");
}

#[test]
fn error_rule_reports_quoted_text() {
    let err = normalize_quotes(r#" "x""#, QuoteRule::Error).unwrap_err();
    assert_eq!(
        err,
        OptionsError::QuoteRuleViolation {
            text: r#" "x""#.to_string()
        }
    );
    assert_eq!(normalize_quotes("x\"", QuoteRule::Error).unwrap(), "x\"");
}

#[test]
fn prepared_numeric_field_strips_quotes_and_affixes() {
    let mut record = OptionRecord::named("amount", "double").unwrap();
    record.set_prefixes(["$"]).unwrap();
    record.set_suffixes([" USD", "USD"]).unwrap();
    assert_eq!(
        record.prepare_field(r#"" $12.50 USD""#).unwrap(),
        PreparedField::Value("12.50".into())
    );
}

#[test]
fn empty_fields_follow_the_empty_field_rule() {
    let mut text = OptionRecord::new(OptionKind::Text);
    text.set_name("comment");
    text.set_empty_field_rule(EmptyFieldRule::Auto);
    assert_eq!(text.prepare_field(r#""""#).unwrap(), PreparedField::Empty);

    let mut numeric = OptionRecord::new(OptionKind::Numeric);
    numeric.set_empty_field_rule(EmptyFieldRule::Auto);
    assert!(numeric.prepare_field("").unwrap().is_missing());

    text.set_empty_field_rule(EmptyFieldRule::Error);
    assert_eq!(
        text.prepare_field("").unwrap_err(),
        OptionsError::EmptyFieldViolation {
            name: "comment".to_string()
        }
    );
}

#[test]
fn sentinels_mark_fields_missing() {
    let mut record = OptionRecord::named("score", "int32").unwrap();
    record.set_treat_as_missing(["N/A"]);
    assert!(record.prepare_field(" N/A ").unwrap().is_missing());
    assert!(record.prepare_field(r#""N/A""#).unwrap().is_missing());
    assert_eq!(record.prepare_field("7").unwrap().as_text(), Some("7"));
}

proptest! {
    #[test]
    fn unquoted_text_passes_through_every_rule(text in "[^\"]{0,24}") {
        for rule in [QuoteRule::Remove, QuoteRule::Keep, QuoteRule::Error] {
            let normalized = normalize_quotes(&text, rule).expect("no quotes");
            prop_assert_eq!(normalized.as_ref(), text.as_str());
        }
    }

    #[test]
    fn keep_is_identity(text in "\\PC{0,24}") {
        let normalized = normalize_quotes(&text, QuoteRule::Keep).expect("keep never fails");
        prop_assert_eq!(normalized.as_ref(), text.as_str());
    }

    #[test]
    fn remove_recovers_escaped_content(body in "[a-z\" ]{0,16}") {
        let quoted = format!("\"{}\"", body.replace('"', "\"\""));
        let normalized = normalize_quotes(&quoted, QuoteRule::Remove).expect("remove never fails");
        prop_assert_eq!(normalized.as_ref(), body.as_str());
    }
}
