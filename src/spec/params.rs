//! Named parameter bag.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{SpecError, SpecResult, ensure_not_blank};

/// Dynamic value type for parameter bindings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// Arrays and objects, passed through as JSON.
    Json(serde_json::Value),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Null => write!(f, "NULL"),
            ParamValue::Bool(b) => write!(f, "{}", b),
            ParamValue::Int(n) => write!(f, "{}", n),
            ParamValue::Float(n) => write!(f, "{}", n),
            ParamValue::String(s) => write!(f, "'{}'", s),
            ParamValue::Json(v) => write!(f, "{}", v),
        }
    }
}

impl From<serde_json::Value> for ParamValue {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => ParamValue::Null,
            serde_json::Value::Bool(b) => ParamValue::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => ParamValue::Int(i),
                None => n
                    .as_f64()
                    .map(ParamValue::Float)
                    .unwrap_or_else(|| ParamValue::Json(serde_json::Value::Number(n))),
            },
            serde_json::Value::String(s) => ParamValue::String(s),
            other => ParamValue::Json(other),
        }
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        ParamValue::Int(v as i64)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::String(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::String(v)
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(ParamValue::Null)
    }
}

/// Name to value mapping bound into generated SQL at execution time.
///
/// Names are stored without the `@` prefix. Iteration is in name order, which keeps
/// compiled output deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Parameters {
    values: BTreeMap<String, ParamValue>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter. A later write to the same name replaces the earlier value.
    pub fn add(&mut self, name: impl AsRef<str>, value: impl Into<ParamValue>) -> SpecResult<()> {
        let name = normalize(name.as_ref());
        ensure_not_blank(name, "name")?;
        self.values.insert(name.to_string(), value.into());
        Ok(())
    }

    /// Merge the named fields of a serializable struct or map.
    ///
    /// ```
    /// use qspec::Parameters;
    /// use serde::Serialize;
    ///
    /// #[derive(Serialize)]
    /// struct PriceRange { min_price: i64, max_price: i64 }
    ///
    /// let mut params = Parameters::new();
    /// params.merge_object(&PriceRange { min_price: 10, max_price: 50 }).unwrap();
    /// assert_eq!(params.len(), 2);
    /// ```
    pub fn merge_object<P: Serialize + ?Sized>(&mut self, object: &P) -> SpecResult<()> {
        let value =
            serde_json::to_value(object).map_err(|e| SpecError::Serialize(e.to_string()))?;
        match value {
            serde_json::Value::Object(map) => {
                for (name, value) in map {
                    self.add(name, value)?;
                }
                Ok(())
            }
            // `()` and `None` carry no parameters
            serde_json::Value::Null => Ok(()),
            other => Err(SpecError::Serialize(format!(
                "expected a struct or map of named values, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Merge parameters contributed by a nested specification.
    ///
    /// An equal value under an existing name is deduplicated; a different value is a
    /// [`SpecError::ParameterConflict`].
    pub fn merge_nested(&mut self, nested: &Parameters) -> SpecResult<()> {
        for (name, value) in &nested.values {
            match self.values.get(name) {
                Some(existing) if existing == value => {}
                Some(_) => {
                    return Err(SpecError::ParameterConflict { name: name.clone() });
                }
                None => {
                    self.values.insert(name.clone(), value.clone());
                }
            }
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(normalize(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(normalize(name))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<'a> IntoIterator for &'a Parameters {
    type Item = (&'a String, &'a ParamValue);
    type IntoIter = std::collections::btree_map::Iter<'a, String, ParamValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

fn normalize(name: &str) -> &str {
    name.trim().trim_start_matches('@').trim_start()
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    #[allow(non_snake_case)]
    struct Filter {
        MinPrice: i64,
        Category: &'static str,
        Discount: Option<f64>,
    }

    #[test]
    fn test_merge_object_uses_field_names() {
        let mut params = Parameters::new();
        params
            .merge_object(&Filter {
                MinPrice: 100,
                Category: "Electronics",
                Discount: None,
            })
            .unwrap();

        assert_eq!(params.get("MinPrice"), Some(&ParamValue::Int(100)));
        assert_eq!(params.get("@Category"), Some(&ParamValue::from("Electronics")));
        assert_eq!(params.get("Discount"), Some(&ParamValue::Null));
    }

    #[test]
    fn test_merge_object_rejects_scalars() {
        let mut params = Parameters::new();
        assert!(matches!(params.merge_object(&42), Err(SpecError::Serialize(_))));
        assert!(params.merge_object(&()).is_ok());
        assert!(params.is_empty());
    }

    #[test]
    fn test_add_last_write_wins() {
        let mut params = Parameters::new();
        params.add("Price", 10).unwrap();
        params.add("@Price", 20).unwrap();
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("Price"), Some(&ParamValue::Int(20)));
    }

    #[test]
    fn test_add_trims_around_prefix() {
        let mut params = Parameters::new();
        params.add(" @ MinPrice ", 5).unwrap();
        assert_eq!(params.get("MinPrice"), Some(&ParamValue::Int(5)));
        assert_eq!(params.add("@ ", 1).unwrap_err().param(), Some("name"));
    }

    #[test]
    fn test_merge_nested_conflicts() {
        let mut outer = Parameters::new();
        outer.add("Category", "Books").unwrap();

        let mut same = Parameters::new();
        same.add("Category", "Books").unwrap();
        same.add("Featured", true).unwrap();
        outer.merge_nested(&same).unwrap();
        assert_eq!(outer.len(), 2);

        let mut different = Parameters::new();
        different.add("Category", "Games").unwrap();
        let err = outer.merge_nested(&different).unwrap_err();
        assert!(matches!(err, SpecError::ParameterConflict { ref name } if name == "Category"));
    }

    #[test]
    fn test_json_numbers_keep_their_kind() {
        assert_eq!(ParamValue::from(serde_json::json!(3)), ParamValue::Int(3));
        assert_eq!(ParamValue::from(serde_json::json!(2.5)), ParamValue::Float(2.5));
        assert!(matches!(
            ParamValue::from(serde_json::json!([1, 2])),
            ParamValue::Json(_)
        ));
    }
}
