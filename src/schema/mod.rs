//! Minimal JSON-Schema-like descriptors.
//!
//! Primitives declare their input shape with a [`Schema`], and the
//! validator checks incoming parameters against it before a handler
//! runs. The dialect is deliberately small: `type`, `properties`,
//! `required`, `items`, `enum`, numeric bounds, string length bounds,
//! `pattern`, `default`, and `additionalProperties`.
//!
//! Validation is total: it never panics and always returns a
//! [`ValidationResult`] carrying every violation found, not just the
//! first.

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The primitive type a schema constrains a value to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    /// A JSON object.
    Object,
    /// A JSON string.
    String,
    /// Any JSON number.
    Number,
    /// A JSON number without a fractional part.
    Integer,
    /// A JSON boolean.
    Boolean,
    /// A JSON array.
    Array,
}

impl SchemaType {
    /// Returns the lowercase name used in violation messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Object => "object",
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Array => "array",
        }
    }

    /// Checks whether a JSON value inhabits this type.
    #[must_use]
    pub fn matches(self, value: &Value) -> bool {
        match self {
            Self::Object => value.is_object(),
            Self::String => value.is_string(),
            Self::Number => value.is_number(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Boolean => value.is_boolean(),
            Self::Array => value.is_array(),
        }
    }
}

/// Returns the JSON type name of a value, for violation messages.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A single violated constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Dotted path to the offending value ("" for the root).
    pub path: String,
    /// Human-readable description of the violated constraint.
    pub reason: String,
}

impl Violation {
    /// Creates a new violation.
    pub fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Outcome of validating a value against a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// The value satisfies every constraint.
    Ok,
    /// One or more constraints were violated.
    Fail(Vec<Violation>),
}

impl ValidationResult {
    /// Returns `true` if validation passed.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    /// Returns the violations, empty on success.
    #[must_use]
    pub fn into_violations(self) -> Vec<Violation> {
        match self {
            Self::Ok => Vec::new(),
            Self::Fail(violations) => violations,
        }
    }
}

/// A schema descriptor for one value.
///
/// Unknown properties are permitted unless `additionalProperties` is
/// explicitly `false`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schema {
    /// The type this schema constrains a value to.
    #[serde(rename = "type")]
    pub ty: SchemaType,

    /// Human-readable description, surfaced in metadata listings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Nested descriptors for object properties, in declaration order.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, Schema>,

    /// Property names that must be present on an object.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,

    /// Descriptor for array elements.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,

    /// Permitted values.
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,

    /// Inclusive lower bound for numeric values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,

    /// Inclusive upper bound for numeric values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,

    /// Minimum string length in characters.
    #[serde(rename = "minLength", default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,

    /// Maximum string length in characters.
    #[serde(rename = "maxLength", default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,

    /// Regex a string value must match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    /// Value filled in for an absent object property before validation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    /// Set to `false` to reject properties not declared in `properties`.
    #[serde(
        rename = "additionalProperties",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_properties: Option<bool>,
}

impl Schema {
    /// Creates an empty schema of the given type.
    #[must_use]
    pub fn new(ty: SchemaType) -> Self {
        Self {
            ty,
            description: None,
            properties: IndexMap::new(),
            required: Vec::new(),
            items: None,
            enum_values: None,
            minimum: None,
            maximum: None,
            min_length: None,
            max_length: None,
            pattern: None,
            default: None,
            additional_properties: None,
        }
    }

    /// Creates an object schema.
    #[must_use]
    pub fn object() -> Self {
        Self::new(SchemaType::Object)
    }

    /// Creates a string schema.
    #[must_use]
    pub fn string() -> Self {
        Self::new(SchemaType::String)
    }

    /// Creates a number schema.
    #[must_use]
    pub fn number() -> Self {
        Self::new(SchemaType::Number)
    }

    /// Creates an integer schema.
    #[must_use]
    pub fn integer() -> Self {
        Self::new(SchemaType::Integer)
    }

    /// Creates a boolean schema.
    #[must_use]
    pub fn boolean() -> Self {
        Self::new(SchemaType::Boolean)
    }

    /// Creates an array schema with the given element descriptor.
    #[must_use]
    pub fn array_of(items: Self) -> Self {
        let mut schema = Self::new(SchemaType::Array);
        schema.items = Some(Box::new(items));
        schema
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Declares a property.
    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, schema: Self) -> Self {
        self.properties.insert(name.into(), schema);
        self
    }

    /// Marks property names as required.
    #[must_use]
    pub fn with_required<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required.extend(names.into_iter().map(Into::into));
        self
    }

    /// Restricts the value to the given set.
    #[must_use]
    pub fn with_enum(mut self, values: Vec<Value>) -> Self {
        self.enum_values = Some(values);
        self
    }

    /// Sets the inclusive lower bound.
    #[must_use]
    pub const fn with_minimum(mut self, minimum: f64) -> Self {
        self.minimum = Some(minimum);
        self
    }

    /// Sets the inclusive upper bound.
    #[must_use]
    pub const fn with_maximum(mut self, maximum: f64) -> Self {
        self.maximum = Some(maximum);
        self
    }

    /// Sets the minimum string length.
    #[must_use]
    pub const fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = Some(min_length);
        self
    }

    /// Sets the maximum string length.
    #[must_use]
    pub const fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Requires string values to match a regex.
    #[must_use]
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Sets the default filled in when the property is absent.
    #[must_use]
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Rejects properties not declared in `properties`.
    #[must_use]
    pub const fn closed(mut self) -> Self {
        self.additional_properties = Some(false);
        self
    }

    /// Checks that this descriptor is structurally sound.
    ///
    /// Registries call this before accepting a primitive, so a bad
    /// schema is rejected at registration time rather than surfacing as
    /// a confusing validation failure later.
    ///
    /// # Errors
    ///
    /// Returns a description of the first structural problem found:
    /// an unparsable `pattern`, an empty `enum`, or inverted bounds,
    /// recursively through `properties` and `items`.
    pub fn ensure_well_formed(&self) -> Result<(), String> {
        if let Some(ref pattern) = self.pattern {
            Regex::new(pattern).map_err(|e| format!("invalid pattern '{pattern}': {e}"))?;
        }

        if let Some(ref values) = self.enum_values {
            if values.is_empty() {
                return Err("enum must not be empty".to_string());
            }
        }

        if let (Some(min), Some(max)) = (self.minimum, self.maximum) {
            if min > max {
                return Err(format!("minimum {min} exceeds maximum {max}"));
            }
        }

        if let (Some(min), Some(max)) = (self.min_length, self.max_length) {
            if min > max {
                return Err(format!("minLength {min} exceeds maxLength {max}"));
            }
        }

        for (name, property) in &self.properties {
            property
                .ensure_well_formed()
                .map_err(|e| format!("property '{name}': {e}"))?;
        }

        if let Some(ref items) = self.items {
            items.ensure_well_formed().map_err(|e| format!("items: {e}"))?;
        }

        Ok(())
    }

    /// Fills declared `default`s for absent object properties.
    ///
    /// Recurses into nested objects so deeper defaults apply too.
    /// Non-object values are left untouched.
    pub fn apply_defaults(&self, value: &mut Value) {
        let Some(map) = value.as_object_mut() else {
            return;
        };

        for (name, property) in &self.properties {
            if let Some(ref default) = property.default {
                if !map.contains_key(name) {
                    map.insert(name.clone(), default.clone());
                }
            }
            if let Some(nested) = map.get_mut(name) {
                property.apply_defaults(nested);
            }
        }
    }

    /// Validates a value against this schema.
    ///
    /// Collects every violation rather than stopping at the first.
    #[must_use]
    pub fn validate(&self, value: &Value) -> ValidationResult {
        let mut violations = Vec::new();
        self.check(value, "", &mut violations);

        if violations.is_empty() {
            ValidationResult::Ok
        } else {
            ValidationResult::Fail(violations)
        }
    }

    /// Applies defaults, then validates.
    ///
    /// This is the entry point the primitive executors use.
    #[must_use]
    pub fn validate_with_defaults(&self, value: &mut Value) -> ValidationResult {
        self.apply_defaults(value);
        self.validate(value)
    }

    /// Records violations for one value at the given path.
    fn check(&self, value: &Value, path: &str, violations: &mut Vec<Violation>) {
        if !self.ty.matches(value) {
            violations.push(Violation::new(
                path,
                format!(
                    "expected {}, got {}",
                    self.ty.name(),
                    json_type_name(value)
                ),
            ));
            // Deeper constraints are meaningless on the wrong type.
            return;
        }

        if let Some(ref permitted) = self.enum_values {
            if !permitted.contains(value) {
                violations.push(Violation::new(
                    path,
                    format!("value {value} is not one of the permitted values"),
                ));
            }
        }

        match value {
            Value::Object(map) => self.check_object(map, path, violations),
            Value::String(s) => self.check_string(s, path, violations),
            Value::Number(_) => self.check_number(value, path, violations),
            Value::Array(elements) => self.check_array(elements, path, violations),
            _ => {}
        }
    }

    fn check_object(
        &self,
        map: &serde_json::Map<String, Value>,
        path: &str,
        violations: &mut Vec<Violation>,
    ) {
        for name in &self.required {
            if !map.contains_key(name) {
                violations.push(Violation::new(
                    join_path(path, name),
                    "required property is missing",
                ));
            }
        }

        for (name, nested) in map {
            if let Some(property) = self.properties.get(name) {
                property.check(nested, &join_path(path, name), violations);
            } else if self.additional_properties == Some(false) {
                violations.push(Violation::new(
                    join_path(path, name),
                    "property is not permitted here",
                ));
            }
        }
    }

    fn check_string(&self, s: &str, path: &str, violations: &mut Vec<Violation>) {
        let length = s.chars().count();

        if let Some(min) = self.min_length {
            if length < min {
                violations.push(Violation::new(
                    path,
                    format!("string is shorter than minLength {min}"),
                ));
            }
        }

        if let Some(max) = self.max_length {
            if length > max {
                violations.push(Violation::new(
                    path,
                    format!("string is longer than maxLength {max}"),
                ));
            }
        }

        if let Some(ref pattern) = self.pattern {
            match Regex::new(pattern) {
                Ok(regex) => {
                    if !regex.is_match(s) {
                        violations.push(Violation::new(
                            path,
                            format!("string does not match pattern '{pattern}'"),
                        ));
                    }
                }
                // A bad pattern should be caught at registration; if one
                // slips through, report it instead of panicking.
                Err(_) => violations.push(Violation::new(
                    path,
                    format!("schema pattern '{pattern}' is not a valid regex"),
                )),
            }
        }
    }

    fn check_number(&self, value: &Value, path: &str, violations: &mut Vec<Violation>) {
        let Some(n) = value.as_f64() else {
            return;
        };

        if let Some(min) = self.minimum {
            if n < min {
                violations.push(Violation::new(path, format!("{n} is below minimum {min}")));
            }
        }

        if let Some(max) = self.maximum {
            if n > max {
                violations.push(Violation::new(path, format!("{n} is above maximum {max}")));
            }
        }
    }

    fn check_array(&self, elements: &[Value], path: &str, violations: &mut Vec<Violation>) {
        if let Some(ref items) = self.items {
            for (index, element) in elements.iter().enumerate() {
                items.check(element, &format!("{path}[{index}]"), violations);
            }
        }
    }
}

/// Joins a parent path and a property name.
fn join_path(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{path}.{name}")
    }
}
