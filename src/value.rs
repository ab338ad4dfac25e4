//! Values produced by a parse: what options store and what actions receive.

use std::{fmt, str::FromStr};

/// Converts the raw text of an option value before it is stored.
pub type Coerce = Box<dyn Fn(&str) -> Result<Value, String>>;

/// A value stored for an option, under its attribute key.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Str(String),
    Int(i64),
    Float(f64),
    List(Vec<String>),
}

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(it) => Some(*it),
            _ => None,
        }
    }
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(it) => Some(it),
            _ => None,
        }
    }
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(it) => Some(*it),
            _ => None,
        }
    }
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(it) => Some(*it),
            Value::Int(it) => Some(*it as f64),
            _ => None,
        }
    }
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Value::List(it) => Some(it),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(it) => fmt::Display::fmt(it, f),
            Value::Str(it) => fmt::Display::fmt(it, f),
            Value::Int(it) => fmt::Display::fmt(it, f),
            Value::Float(it) => fmt::Display::fmt(it, f),
            Value::List(it) => fmt::Display::fmt(&it.join(","), f),
        }
    }
}

impl From<bool> for Value {
    fn from(it: bool) -> Value {
        Value::Bool(it)
    }
}

impl From<String> for Value {
    fn from(it: String) -> Value {
        Value::Str(it)
    }
}

impl From<&str> for Value {
    fn from(it: &str) -> Value {
        Value::Str(it.to_string())
    }
}

impl From<i64> for Value {
    fn from(it: i64) -> Value {
        Value::Int(it)
    }
}

impl From<f64> for Value {
    fn from(it: f64) -> Value {
        Value::Float(it)
    }
}

impl From<Vec<String>> for Value {
    fn from(it: Vec<String>) -> Value {
        Value::List(it)
    }
}

/// Coercion through [`FromStr`], e.g. `value::parse::<i64>()`.
pub fn parse<T>() -> impl Fn(&str) -> Result<Value, String>
where
    T: FromStr + Into<Value>,
    T::Err: fmt::Display,
{
    |s: &str| s.parse::<T>().map(Into::into).map_err(|err| err.to_string())
}

/// Coercion splitting a comma separated value into a list.
pub fn list(s: &str) -> Result<Value, String> {
    Ok(Value::List(s.split(',').map(str::to_string).collect()))
}

/// What a positional argument spec was bound to when an action runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bound {
    /// No token was supplied. Distinct from an empty string.
    Absent,
    One(String),
    /// Everything captured by a trailing variadic spec.
    Many(Vec<String>),
}

impl Bound {
    pub fn is_absent(&self) -> bool {
        matches!(self, Bound::Absent)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Bound::One(it) => Some(it),
            Bound::Absent | Bound::Many(_) => None,
        }
    }

    /// All tokens bound here, in order.
    pub fn as_slice(&self) -> &[String] {
        match self {
            Bound::Absent => &[],
            Bound::One(it) => std::slice::from_ref(it),
            Bound::Many(it) => it,
        }
    }
}
