//! Request payload validation
//!
//! A [`Schema`] is the ordered list of fields a payload may carry. Each [`FieldSchema`]
//! declares whether the field must be present, may be null, how a query-string
//! value is coerced, and an ordered list of `(constraint, message)` checks.
//! Fields the schema does not name are ignored.
//!
//! Every field is evaluated; within a field, evaluation stops at the first
//! failing check. All violations are reported together.
//!
//! ```rust
//! use meow_service::validation::{validate, Constraint, FieldSchema, Rule, Schema};
//! use serde_json::json;
//!
//! const PET: &Schema = &[FieldSchema::required(
//!     "name",
//!     &[
//!         (Constraint::IsString, "name must be a string"),
//!         (Constraint::IsNotEmpty, "name should not be empty"),
//!     ],
//! )];
//!
//! let payload = json!({ "name": "" });
//! let violations = validate(PET, payload.as_object().unwrap()).unwrap_err();
//! assert_eq!(violations.iter().next().unwrap().rule, Rule::IsNotEmpty);
//! ```

mod extract;
mod rules;

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;

pub use extract::{FromPayload, ValidatedJson, ValidatedQuery};
pub use rules::{as_integer, is_url, Constraint, Rule};

/// A single failed check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: String,
    pub rule: Rule,
    pub message: String,
}

/// Every check that failed for one payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Violations(Vec<Violation>);

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    /// A rejection with exactly one violation
    pub fn single(field: impl Into<String>, rule: Rule, message: impl Into<String>) -> Self {
        let mut violations = Self::new();
        violations.push(field, rule, message);
        violations
    }

    pub fn push(&mut self, field: impl Into<String>, rule: Rule, message: impl Into<String>) {
        self.0.push(Violation {
            field: field.into(),
            rule,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.0.iter()
    }

    /// Names of the offending fields, in schema order
    pub fn fields(&self) -> Vec<&str> {
        self.0.iter().map(|v| v.field.as_str()).collect()
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.iter().map(|v| v.message.as_str()).collect();
        f.write_str(&messages.join("; "))
    }
}

/// Whether a field must appear and whether `null` is acceptable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Must be present and non-null
    Required,
    /// May be absent; `null` is a violation
    Optional,
    /// May be absent or `null`
    Nullable,
}

/// Conversion applied to string values before checks run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    None,
    /// Query-string integers such as `page=2`
    Integer,
}

/// Declared constraints for one field
#[derive(Debug, Clone, Copy)]
pub struct FieldSchema {
    pub name: &'static str,
    pub presence: Presence,
    pub coercion: Coercion,
    pub checks: &'static [(Constraint, &'static str)],
}

impl FieldSchema {
    pub const fn required(name: &'static str, checks: &'static [(Constraint, &'static str)]) -> Self {
        Self {
            name,
            presence: Presence::Required,
            coercion: Coercion::None,
            checks,
        }
    }

    pub const fn optional(name: &'static str, checks: &'static [(Constraint, &'static str)]) -> Self {
        Self {
            name,
            presence: Presence::Optional,
            coercion: Coercion::None,
            checks,
        }
    }

    pub const fn nullable(name: &'static str, checks: &'static [(Constraint, &'static str)]) -> Self {
        Self {
            name,
            presence: Presence::Nullable,
            coercion: Coercion::None,
            checks,
        }
    }

    #[must_use]
    pub const fn coerce(mut self, coercion: Coercion) -> Self {
        self.coercion = coercion;
        self
    }

    /// Violation reported when the field is missing or wrongly null
    fn missing(&self, violations: &mut Violations) {
        match self.checks.first() {
            Some((constraint, message)) => violations.push(self.name, constraint.rule(), *message),
            None => violations.push(self.name, Rule::IsNotEmpty, format!("{} should not be empty", self.name)),
        }
    }

    fn coerced(&self, value: &Value) -> Value {
        match (self.coercion, value) {
            (Coercion::Integer, Value::String(s)) => {
                numeric(s.trim()).unwrap_or_else(|| value.clone())
            }
            _ => value.clone(),
        }
    }
}

/// Number written in a query string; `1.0` and `1e1` count as integers
fn numeric(text: &str) -> Option<Value> {
    if let Ok(n) = text.parse::<i64>() {
        return Some(Value::from(n));
    }
    let n = text.parse::<f64>().ok().filter(|n| n.is_finite())?;
    let number = Value::from(n);
    Some(as_integer(&number).map_or(number, Value::from))
}

/// Ordered field declarations for one payload
pub type Schema = [FieldSchema];

/// Check `payload` against `schema`, returning the declared fields that passed
pub fn validate(schema: &Schema, payload: &Map<String, Value>) -> Result<Normalized, Violations> {
    let mut violations = Violations::new();
    let mut values = Map::new();

    for field in schema {
        let value = match (payload.get(field.name), field.presence) {
            (None, Presence::Required) | (Some(Value::Null), Presence::Required | Presence::Optional) => {
                field.missing(&mut violations);
                continue;
            }
            (None, _) => continue,
            (Some(Value::Null), Presence::Nullable) => Value::Null,
            (Some(raw), _) => {
                let value = field.coerced(raw);
                let failed = field
                    .checks
                    .iter()
                    .find(|(constraint, _)| !constraint.check(&value));
                if let Some((constraint, message)) = failed {
                    violations.push(field.name, constraint.rule(), *message);
                    continue;
                }
                value
            }
        };
        values.insert(field.name.to_string(), value);
    }

    if violations.is_empty() {
        Ok(Normalized { values })
    } else {
        Err(violations)
    }
}

/// Convert query-string pairs into a payload; every value starts as a string
pub fn query_payload(pairs: HashMap<String, String>) -> Map<String, Value> {
    pairs
        .into_iter()
        .map(|(key, value)| (key, Value::String(value)))
        .collect()
}

/// Fields that passed validation, taken out one at a time
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Normalized {
    values: Map<String, Value>,
}

impl Normalized {
    /// Whether `name` was supplied (including as `null`)
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn take_text(&mut self, name: &str) -> Option<String> {
        match self.values.remove(name)? {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn take_int(&mut self, name: &str) -> Option<i64> {
        as_integer(&self.values.remove(name)?)
    }

    /// `None` when absent, `Some(None)` when explicitly null
    pub fn take_nullable_text(&mut self, name: &str) -> Option<Option<String>> {
        match self.values.remove(name)? {
            Value::String(s) => Some(Some(s)),
            _ => Some(None),
        }
    }

    /// `None` when absent, `Some(None)` when explicitly null
    pub fn take_nullable_int(&mut self, name: &str) -> Option<Option<i64>> {
        let value = self.values.remove(name)?;
        Some(as_integer(&value))
    }

    /// Take a field the schema declared as a required string
    pub fn required_text(&mut self, name: &str) -> Result<String, Violations> {
        self.take_text(name).ok_or_else(|| {
            Violations::single(name, Rule::IsString, format!("{name} must be a string"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SCHEMA: &Schema = &[
        FieldSchema::required(
            "name",
            &[
                (Constraint::IsString, "name must be a string"),
                (Constraint::IsNotEmpty, "name should not be empty"),
            ],
        ),
        FieldSchema::optional("nickname", &[(Constraint::IsString, "nickname must be a string")]),
        FieldSchema::nullable(
            "age",
            &[
                (Constraint::IsInt, "age must be an integer number"),
                (Constraint::Min(0), "age must not be less than 0"),
            ],
        ),
        FieldSchema::optional("page", &[(Constraint::IsInt, "page must be an integer number")])
            .coerce(Coercion::Integer),
    ];

    fn apply(payload: Value) -> Result<Normalized, Violations> {
        validate(SCHEMA, payload.as_object().unwrap())
    }

    #[test]
    fn test_valid_payload_is_normalized() {
        let mut normalized = apply(json!({ "name": "Luna", "age": 3, "page": "2" })).unwrap();
        assert_eq!(normalized.take_text("name").as_deref(), Some("Luna"));
        assert_eq!(normalized.take_nullable_int("age"), Some(Some(3)));
        assert_eq!(normalized.take_int("page"), Some(2));
        assert_eq!(normalized.take_text("nickname"), None);
    }

    #[test]
    fn test_unknown_fields_are_dropped() {
        let normalized = apply(json!({ "name": "Luna", "owner": "root" })).unwrap();
        assert!(!normalized.contains("owner"));
    }

    #[test]
    fn test_all_fields_reported() {
        let violations = apply(json!({ "name": "", "age": -1, "page": "two" })).unwrap_err();
        assert_eq!(violations.fields(), ["name", "age", "page"]);

        let rules: Vec<Rule> = violations.iter().map(|v| v.rule).collect();
        assert_eq!(rules, [Rule::IsNotEmpty, Rule::Min, Rule::IsInt]);
    }

    #[test]
    fn test_first_failure_per_field_only() {
        let violations = apply(json!({ "name": "Luna", "age": "old" })).unwrap_err();
        assert_eq!(violations.fields(), ["age"]);
        assert_eq!(violations.iter().next().unwrap().message, "age must be an integer number");
    }

    #[test]
    fn test_null_handling() {
        let violations = apply(json!({ "name": null })).unwrap_err();
        assert_eq!(violations.iter().next().unwrap().rule, Rule::IsString);

        let violations = apply(json!({ "name": "Luna", "nickname": null })).unwrap_err();
        assert_eq!(violations.fields(), ["nickname"]);

        let mut normalized = apply(json!({ "name": "Luna", "age": null })).unwrap();
        assert!(normalized.contains("age"));
        assert_eq!(normalized.take_nullable_int("age"), Some(None));
    }

    #[test]
    fn test_missing_required_field() {
        let violations = apply(json!({})).unwrap_err();
        assert_eq!(violations.fields(), ["name"]);
        assert_eq!(violations.to_string(), "name must be a string");
    }

    #[test]
    fn test_query_integers_accept_float_notation() {
        for (raw, expected) in [("2", 2), (" 7 ", 7), ("1.0", 1), ("1e1", 10)] {
            let mut normalized = apply(json!({ "name": "Luna", "page": raw })).unwrap();
            assert_eq!(normalized.take_int("page"), Some(expected), "page={raw}");
        }

        for raw in ["1.5", "two", "inf", "NaN", ""] {
            let violations = apply(json!({ "name": "Luna", "page": raw })).unwrap_err();
            assert_eq!(violations.fields(), ["page"], "page={raw}");
        }
    }

    #[test]
    fn test_query_payload() {
        let pairs = HashMap::from([("page".to_string(), "3".to_string())]);
        let payload = query_payload(pairs);
        assert_eq!(payload.get("page"), Some(&json!("3")));
    }
}
