use crate::model::AttrValue;
use crate::resolve::Resolved;

/// `true` or the string `"true"` in any case. Unresolved is never true.
pub fn is_true(value: &Resolved) -> bool {
    match value.value() {
        Some(AttrValue::Bool(b)) => *b,
        Some(AttrValue::String(s)) => s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

pub fn is_non_empty_string(value: &Resolved) -> bool {
    value.as_str().is_some_and(|s| !s.trim().is_empty())
}

/// Exact, case-sensitive literal match.
pub fn equals(value: &Resolved, expected: &str) -> bool {
    value.as_str() == Some(expected)
}

/// Strictly positive number, or a string that parses as one.
pub fn is_positive(value: &AttrValue) -> bool {
    match value {
        AttrValue::Number(n) => n.as_f64().is_some_and(|f| f > 0.0),
        AttrValue::String(s) => s.trim().parse::<f64>().is_ok_and(|f| f > 0.0),
        _ => false,
    }
}
