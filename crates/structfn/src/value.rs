//! Runtime value types read from and written to structural features.
//!
//! A [`Value`] is the owned form of whatever a feature holds. Absence is
//! expressed as `Option<Value>::None` rather than a null variant, so every
//! read returns `Option<Value>`.
//!
//! [`FromValue`] is the checked cast used by the typed accessors. It never
//! widens: an `Int` stored value does not cast to `i64`.

use std::cmp::Ordering;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use num_bigint::BigInt;

use crate::error::{Result, StructError};
use crate::model::ObjectRef;

/// Runtime value of a structural feature.
///
/// # Example
///
/// ```
/// use structfn::Value;
///
/// let age = Value::from(30);
/// assert_eq!(age, Value::Int(30));
/// assert_eq!(age.type_name(), "int");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Char(char),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    BigInteger(BigInt),
    BigDecimal(BigDecimal),
    String(String),
    Date(DateTime<Utc>),
    /// Reference to another structured object. Compared by identity.
    Object(ObjectRef),
    /// Content of a many-valued feature.
    List(Vec<Value>),
}

/// Declared type of a structural feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Bool,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    BigInteger,
    BigDecimal,
    String,
    Date,
    Object,
    List,
    /// Accepts any value.
    Any,
}

impl ValueType {
    /// Returns the display name of this type.
    pub fn name(self) -> &'static str {
        match self {
            ValueType::Bool => "boolean",
            ValueType::Char => "char",
            ValueType::Short => "short",
            ValueType::Int => "int",
            ValueType::Long => "long",
            ValueType::Float => "float",
            ValueType::Double => "double",
            ValueType::BigInteger => "big integer",
            ValueType::BigDecimal => "big decimal",
            ValueType::String => "string",
            ValueType::Date => "date",
            ValueType::Object => "object",
            ValueType::List => "list",
            ValueType::Any => "any",
        }
    }

    /// Returns `true` if a value of this type may be stored in a feature
    /// declared with it.
    pub fn accepts(self, value: &Value) -> bool {
        self == ValueType::Any || value.value_type() == self
    }
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Value {
    /// Returns the runtime type of this value.
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Bool(_) => ValueType::Bool,
            Value::Char(_) => ValueType::Char,
            Value::Short(_) => ValueType::Short,
            Value::Int(_) => ValueType::Int,
            Value::Long(_) => ValueType::Long,
            Value::Float(_) => ValueType::Float,
            Value::Double(_) => ValueType::Double,
            Value::BigInteger(_) => ValueType::BigInteger,
            Value::BigDecimal(_) => ValueType::BigDecimal,
            Value::String(_) => ValueType::String,
            Value::Date(_) => ValueType::Date,
            Value::Object(_) => ValueType::Object,
            Value::List(_) => ValueType::List,
        }
    }

    /// Returns the display name of this value's type.
    pub fn type_name(&self) -> &'static str {
        self.value_type().name()
    }

    /// Extracts the string value, if present.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Extracts the list content, if present.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Extracts the referenced object, if present.
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Compares two values under their natural ordering.
    ///
    /// Only values of the same variant are ordered, and object references and
    /// lists never are. Floating-point values use total ordering, so `NaN`
    /// sorts above every other number and `-0.0` below `0.0`.
    pub fn natural_cmp(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::Char(a), Value::Char(b)) => Some(a.cmp(b)),
            (Value::Short(a), Value::Short(b)) => Some(a.cmp(b)),
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Long(a), Value::Long(b)) => Some(a.cmp(b)),
            (Value::Float(a), Value::Float(b)) => Some(a.total_cmp(b)),
            (Value::Double(a), Value::Double(b)) => Some(a.total_cmp(b)),
            (Value::BigInteger(a), Value::BigInteger(b)) => Some(a.cmp(b)),
            (Value::BigDecimal(a), Value::BigDecimal(b)) => Some(a.cmp(b)),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

/// Checked conversion out of a [`Value`].
///
/// On mismatch the original value is handed back so the caller can report
/// what was actually stored.
pub trait FromValue: Sized {
    /// Name of the expected type, used in error messages.
    const TYPE_NAME: &'static str;

    /// Converts the value, or returns it unchanged if it has another type.
    fn from_value(value: Value) -> std::result::Result<Self, Value>;
}

macro_rules! value_conversions {
    ($($ty:ty => $variant:ident, $name:literal;)*) => {
        $(
            impl FromValue for $ty {
                const TYPE_NAME: &'static str = $name;

                fn from_value(value: Value) -> std::result::Result<Self, Value> {
                    match value {
                        Value::$variant(v) => Ok(v),
                        other => Err(other),
                    }
                }
            }

            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

value_conversions! {
    bool => Bool, "boolean";
    char => Char, "char";
    i16 => Short, "short";
    i32 => Int, "int";
    i64 => Long, "long";
    f32 => Float, "float";
    f64 => Double, "double";
    BigInt => BigInteger, "big integer";
    BigDecimal => BigDecimal, "big decimal";
    String => String, "string";
    DateTime<Utc> => Date, "date";
    ObjectRef => Object, "object";
    Vec<Value> => List, "list";
}

impl FromValue for Value {
    const TYPE_NAME: &'static str = "any";

    fn from_value(value: Value) -> std::result::Result<Self, Value> {
        Ok(value)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

/// Casts a value read from `feature` to `T`.
pub(crate) fn cast<T: FromValue>(feature: &str, value: Value) -> Result<T> {
    T::from_value(value).map_err(|other| StructError::TypeMismatch {
        feature: feature.to_string(),
        expected: T::TYPE_NAME,
        actual: other.type_name(),
    })
}

/// Casts a possibly-null value, letting null through.
pub(crate) fn cast_nullable<T: FromValue>(
    feature: &str,
    value: Option<Value>,
) -> Result<Option<T>> {
    value.map(|v| cast(feature, v)).transpose()
}

/// Casts a value that must be present.
pub(crate) fn cast_required<T: FromValue>(feature: &str, value: Option<Value>) -> Result<T> {
    match value {
        Some(v) => cast(feature, v),
        None => Err(StructError::NullValue {
            feature: feature.to_string(),
            expected: T::TYPE_NAME,
        }),
    }
}
