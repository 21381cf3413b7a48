//! Quote normalization applied to raw field text before type conversion.

use std::borrow::Cow;

use crate::{
    error::{OptionsError, OptionsResult},
    rules::QuoteRule,
};

const QUOTE: char = '"';

/// True when the text, ignoring surrounding whitespace, opens with a double quote.
pub fn is_quoted(text: &str) -> bool {
    text.trim_start().starts_with(QUOTE)
}

/// Applies `rule` to `text`. Text that does not open with a quote is returned
/// unchanged under every rule.
pub fn normalize_quotes(text: &str, rule: QuoteRule) -> OptionsResult<Cow<'_, str>> {
    if !is_quoted(text) {
        return Ok(Cow::Borrowed(text));
    }
    match rule {
        QuoteRule::Keep => Ok(Cow::Borrowed(text)),
        QuoteRule::Error => Err(OptionsError::QuoteRuleViolation {
            text: text.to_string(),
        }),
        QuoteRule::Remove => Ok(Cow::Owned(strip_enclosing_quotes(text.trim_start()))),
    }
}

/// `quoted` must start with the opening quote. Doubled quotes inside the span
/// collapse to one; the first lone quote closes it and the remainder is kept as-is.
fn strip_enclosing_quotes(quoted: &str) -> String {
    let body = &quoted[QUOTE.len_utf8()..];
    let mut out = String::with_capacity(body.len());
    let mut chars = body.char_indices().peekable();
    while let Some((idx, ch)) = chars.next() {
        if ch != QUOTE {
            out.push(ch);
            continue;
        }
        if matches!(chars.peek(), Some((_, QUOTE))) {
            chars.next();
            out.push(QUOTE);
            continue;
        }
        out.push_str(&body[idx + QUOTE.len_utf8()..]);
        break;
    }
    out
}
