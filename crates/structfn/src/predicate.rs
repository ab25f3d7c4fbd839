//! Predicate factories.
//!
//! Each factory captures a property and optional comparison parameters and
//! returns a [`Predicate`]. Applying a predicate can fail: typed reads assert
//! the stored type, and named properties that do not resolve are errors
//! everywhere except [`has_property`], whose whole purpose is that test.
//!
//! # Example
//!
//! ```
//! use structfn::{predicate, Class, DynamicObject, ValueType};
//!
//! let class = Class::builder("Person")
//!     .attribute("name", ValueType::String)
//!     .attribute("age", ValueType::Int)
//!     .build()
//!     .unwrap();
//!
//! let people = vec![
//!     DynamicObject::new(class.clone()).with("name", "Ann").unwrap().with("age", 17).unwrap(),
//!     DynamicObject::new(class.clone()).with("name", "Bob").unwrap().with("age", 30).unwrap(),
//! ];
//!
//! let adults = predicate::value_between("age", 18, 65).filter(&people).unwrap();
//! assert_eq!(adults.len(), 1);
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::error::{Result, StructError};
use crate::model::StructuredObject;
use crate::property::Property;
use crate::value::{cast_required, FromValue, Value};

type TestFn = dyn Fn(&dyn StructuredObject) -> Result<bool> + Send + Sync;

/// A reusable boolean test over structured objects.
#[derive(Clone)]
pub struct Predicate(Arc<TestFn>);

impl Predicate {
    /// Wraps a test function.
    pub fn new<F>(test: F) -> Self
    where
        F: Fn(&dyn StructuredObject) -> Result<bool> + Send + Sync + 'static,
    {
        Predicate(Arc::new(test))
    }

    /// Applies the predicate to an object.
    pub fn test(&self, object: &dyn StructuredObject) -> Result<bool> {
        (self.0)(object)
    }

    /// Both predicates must hold. `other` is skipped when `self` is false.
    pub fn and(self, other: Predicate) -> Predicate {
        Predicate::new(move |obj| Ok(self.test(obj)? && other.test(obj)?))
    }

    /// Either predicate must hold. `other` is skipped when `self` is true.
    pub fn or(self, other: Predicate) -> Predicate {
        Predicate::new(move |obj| Ok(self.test(obj)? || other.test(obj)?))
    }

    /// Inverts the predicate. Errors are not inverted.
    pub fn negate(self) -> Predicate {
        Predicate::new(move |obj| Ok(!self.test(obj)?))
    }

    /// Returns the items the predicate holds for, stopping at the first error.
    pub fn filter<'a, T: StructuredObject>(&self, items: &'a [T]) -> Result<Vec<&'a T>> {
        let mut matched = Vec::new();
        for item in items {
            if self.test(item)? {
                matched.push(item);
            }
        }
        Ok(matched)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate")
    }
}

pub(crate) fn object_has_id(object: &dyn StructuredObject) -> bool {
    object
        .id_attribute()
        .is_some_and(|id| object.is_set(id))
}

/// Tests whether the object's class declares an identifying attribute and
/// that attribute is set on the object.
pub fn has_id() -> Predicate {
    Predicate::new(|obj| Ok(object_has_id(obj)))
}

/// Tests whether the object's class declares a feature with this name.
pub fn has_property(name: impl Into<String>) -> Predicate {
    let name = name.into();
    Predicate::new(move |obj| Ok(obj.class().feature(&name).is_some()))
}

/// Tests whether the property reads as null.
pub fn value_is_null(property: impl Into<Property>) -> Predicate {
    let property = property.into();
    Predicate::new(move |obj| Ok(property.read(obj)?.is_none()))
}

/// Tests the property for equality with a typed literal.
///
/// The stored value must be exactly of type `T`; anything else, including
/// null, fails with a type mismatch. Floating-point literals compare with
/// plain `==`.
pub fn value_eq<T>(property: impl Into<Property>, literal: T) -> Predicate
where
    T: FromValue + PartialEq + Send + Sync + 'static,
{
    let property = property.into();
    Predicate::new(move |obj| {
        let value: T = cast_required(property.name(), property.read(obj)?)?;
        Ok(value == literal)
    })
}

/// Tests the property for value equality with `literal`. A null value is
/// never equal.
pub fn value_equals(property: impl Into<Property>, literal: impl Into<Value>) -> Predicate {
    let property = property.into();
    let literal = literal.into();
    Predicate::new(move |obj| Ok(property.read(obj)?.as_ref() == Some(&literal)))
}

/// Tests `lower <= value < upper` on a typed read.
///
/// The stored value must be exactly of type `T`; null fails.
pub fn value_between<T>(property: impl Into<Property>, lower: T, upper: T) -> Predicate
where
    T: FromValue + PartialOrd + Send + Sync + 'static,
{
    let property = property.into();
    Predicate::new(move |obj| {
        let value: T = cast_required(property.name(), property.read(obj)?)?;
        Ok(lower <= value && value < upper)
    })
}

/// Tests `lower <= value < upper` on a typed read, ordering with `compare`.
pub fn value_between_by<T, F>(
    property: impl Into<Property>,
    lower: T,
    upper: T,
    compare: F,
) -> Predicate
where
    T: FromValue + Send + Sync + 'static,
    F: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
{
    let property = property.into();
    Predicate::new(move |obj| {
        let value: T = cast_required(property.name(), property.read(obj)?)?;
        Ok(compare(&lower, &value) != Ordering::Greater
            && compare(&value, &upper) == Ordering::Less)
    })
}

/// Tests `lower <= value < upper` under [`Value::natural_cmp`].
///
/// Fails if the stored value is null or has no natural ordering against
/// the bounds.
pub fn value_between_values(
    property: impl Into<Property>,
    lower: impl Into<Value>,
    upper: impl Into<Value>,
) -> Predicate {
    let property = property.into();
    let lower = lower.into();
    let upper = upper.into();
    Predicate::new(move |obj| {
        let value: Value = cast_required(property.name(), property.read(obj)?)?;
        let not_comparable = |bound: &Value| StructError::NotComparable {
            feature: property.name().to_string(),
            left: value.type_name(),
            right: bound.type_name(),
        };
        let from_lower = lower
            .natural_cmp(&value)
            .ok_or_else(|| not_comparable(&lower))?;
        let to_upper = value
            .natural_cmp(&upper)
            .ok_or_else(|| not_comparable(&upper))?;
        Ok(from_lower != Ordering::Greater && to_upper == Ordering::Less)
    })
}
