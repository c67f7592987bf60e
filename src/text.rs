//! Text formatter pipelines.

use crate::error::{IdomError, IdomResult};
use crate::value::Value;

/// A pure value-to-value transform applied to text before it is escaped
pub type Formatter = dyn Fn(Value) -> Value;

/// Thread `value` through `formatters` from left to right.
pub fn apply_formatters(value: Value, formatters: &[&Formatter]) -> Value {
    formatters.iter().fold(value, |acc, f| f(acc))
}

fn trim(v: Value) -> Value {
    match v {
        Value::Str(s) => Value::Str(s.trim().to_string()),
        other => other,
    }
}

fn upper(v: Value) -> Value {
    Value::Str(v.to_string().to_uppercase())
}

fn lower(v: Value) -> Value {
    Value::Str(v.to_string().to_lowercase())
}

fn capitalize(v: Value) -> Value {
    let s = v.to_string();
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => Value::Str(first.to_uppercase().chain(chars).collect()),
        None => Value::Str(s),
    }
}

/// Look up a built-in formatter by name (used by render scripts)
pub fn builtin(name: &str) -> IdomResult<&'static Formatter> {
    let f: &'static Formatter = match name {
        "trim" => &trim,
        "upper" => &upper,
        "lower" => &lower,
        "capitalize" => &capitalize,
        _ => {
            return Err(IdomError::UnknownFormatter {
                name: name.to_string(),
            })
        }
    };
    Ok(f)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formatters_compose_left_to_right() {
        let result = apply_formatters(
            Value::from("Hello wor"),
            &[&|v: Value| v + "l", &|v: Value| v + "d"],
        );
        assert_eq!(result, Value::from("Hello world"));
    }

    #[test]
    fn test_no_formatters_is_identity() {
        assert_eq!(apply_formatters(Value::from(7), &[]), Value::from(7));
    }

    #[test]
    fn test_builtins() {
        let trimmed = builtin("trim").unwrap()(Value::from("  x  "));
        assert_eq!(trimmed, Value::from("x"));
        assert_eq!(builtin("upper").unwrap()(Value::from("abc")), Value::from("ABC"));
        assert_eq!(builtin("lower").unwrap()(Value::from("ABC")), Value::from("abc"));
        assert_eq!(
            builtin("capitalize").unwrap()(Value::from("élan")),
            Value::from("Élan")
        );
        assert!(matches!(
            builtin("reverse"),
            Err(IdomError::UnknownFormatter { .. })
        ));
    }
}
