//! Variable lookup and stringification over JSON variable bags

use serde_json::{Number, Value};

/// Resolve a dotted path (`booking.customer.name`) against a variable bag.
///
/// Returns `None` when a segment is missing or when an intermediate value is
/// not an object. Lookup never fails; callers render `None` as an empty string.
pub fn resolve<'a>(path: &str, variables: &'a Value) -> Option<&'a Value> {
    path.split('.')
        .try_fold(variables, |current, segment| match current {
            Value::Object(map) => map.get(segment),
            _ => None,
        })
}

/// JSON truthiness used by `{{#if}}` blocks.
///
/// Falsy: undefined, `null`, `false`, numeric zero and the empty string.
/// Empty arrays and objects are truthy.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Stringify a value for top-level `{{path}}` substitution.
///
/// Arrays and objects have no scalar form here and render empty.
pub fn scalar_to_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => number_to_string(n),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Array(_)) | Some(Value::Object(_)) | Some(Value::Null) | None => {
            String::new()
        }
    }
}

/// Integral floats (`42.0`) render without a fraction, like integers.
fn number_to_string(n: &Number) -> String {
    match n.as_f64() {
        Some(f)
            if n.is_f64()
                && f.fract() == 0.0
                && f >= i64::MIN as f64
                && f < i64::MAX as f64 =>
        {
            (f as i64).to_string()
        }
        _ => n.to_string(),
    }
}

/// Stringify a value inside an `{{#each}}` body.
///
/// Nested arrays and objects serialize to compact JSON.
pub fn item_to_string(value: Option<&Value>) -> String {
    match value {
        Some(nested @ (Value::Array(_) | Value::Object(_))) => nested.to_string(),
        other => scalar_to_string(other),
    }
}
