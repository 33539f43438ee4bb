//! Filter, search and ordering rules shared by every execution strategy.
//!
//! Records and filter values are JSON values. A filter value constrains a
//! query only when it is a scalar that is not a wildcard sentinel; `null`,
//! the configured sentinels and non-scalars (arrays, objects) all mean
//! "no constraint".

use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde_json::Value;
use tracing::debug;

/// Sentinels that mean "this filter is not constraining the query"
pub const DEFAULT_WILDCARDS: [&str; 4] = ["", "todos", "todas", "all"];

/// Configurable set of string sentinels. JSON `null` (and an absent value)
/// is always a wildcard regardless of the set contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WildcardSet {
    values: BTreeSet<String>,
}

impl WildcardSet {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Exact, case-sensitive membership
    pub fn contains(&self, value: &str) -> bool {
        self.values.contains(value)
    }

    pub fn is_wildcard(&self, value: &Value) -> bool {
        match value {
            Value::Null => true,
            Value::String(s) => self.contains(s),
            _ => false,
        }
    }

    /// Whether `value` should become an equality constraint
    pub fn constrains(&self, value: &Value) -> bool {
        is_scalar(value) && !self.is_wildcard(value)
    }
}

impl Default for WildcardSet {
    fn default() -> Self {
        Self::new(DEFAULT_WILDCARDS)
    }
}

pub fn is_scalar(value: &Value) -> bool {
    matches!(value, Value::String(_) | Value::Number(_) | Value::Bool(_))
}

/// The filter entries that actually constrain a query, in key order.
pub fn effective_filters<'a, I>(filters: I, wildcards: &WildcardSet) -> Vec<(&'a str, &'a Value)>
where
    I: IntoIterator<Item = (&'a String, &'a Value)>,
{
    filters
        .into_iter()
        .filter(|(field, value)| {
            if matches!(value, Value::Array(_) | Value::Object(_)) {
                debug!(field = %field, "Ignoring non-scalar filter value");
                return false;
            }
            wildcards.constrains(value)
        })
        .map(|(field, value)| (field.as_str(), value))
        .collect()
}

/// Equality used for filters: JSON equality, numbers compared by value.
pub fn values_equal(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Number(_), Value::Number(_)) => compare_values(actual, expected) == Ordering::Equal,
        _ => actual == expected,
    }
}

/// Normalised search term, `None` when blank
pub fn search_needle(term: &str) -> Option<String> {
    let trimmed = term.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Case-insensitive substring match; `needle` must already be lowercase.
/// Missing, null and non-scalar values never match.
pub fn contains_folded(value: Option<&Value>, needle: &str) -> bool {
    let haystack = match value {
        Some(Value::String(s)) => s.to_lowercase(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => return false,
    };
    haystack.contains(needle)
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Bool(_) => 0,
        Value::Number(_) => 1,
        Value::String(_) => 2,
        Value::Array(_) => 3,
        Value::Object(_) => 4,
        Value::Null => 5,
    }
}

fn compare_numbers(a: &serde_json::Number, b: &serde_json::Number) -> Ordering {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x.cmp(&y);
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return x.cmp(&y);
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => Ordering::Equal,
    }
}

/// Total order over present values: numbers numerically, strings
/// lexicographically, `false < true`; mixed types by bool < number < string.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => compare_numbers(x, y),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

/// Sort comparator. Missing and `null` keys go last in both directions.
pub fn compare_sort_keys(a: Option<&Value>, b: Option<&Value>, ascending: bool) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => {
            let ord = compare_values(x, y);
            if ascending {
                ord
            } else {
                ord.reverse()
            }
        }
    }
}
