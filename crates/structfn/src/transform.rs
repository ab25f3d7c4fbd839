//! Value-extraction factories.
//!
//! A [`Transform`] reads something out of a structured object: its
//! identifier, its class, or one property, optionally cast to a Rust type.
//! The typed variants are thin wrappers over [`value_as`]; the cast never
//! widens, so an `int` feature read through [`long`] is a type mismatch.

use std::fmt;
use std::iter::{once, Once};
use std::sync::Arc;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use num_bigint::BigInt;

use crate::error::{Result, StructError};
use crate::model::{Class, StructuredObject};
use crate::property::Property;
use crate::value::{cast, cast_nullable, cast_required, FromValue, Value};

type ApplyFn<T> = dyn Fn(&dyn StructuredObject) -> Result<T> + Send + Sync;

/// A reusable extraction function over structured objects.
pub struct Transform<T>(Arc<ApplyFn<T>>);

impl<T: 'static> Transform<T> {
    /// Wraps an extraction function.
    pub fn new<F>(apply: F) -> Self
    where
        F: Fn(&dyn StructuredObject) -> Result<T> + Send + Sync + 'static,
    {
        Transform(Arc::new(apply))
    }

    /// Applies the transform to an object.
    pub fn apply(&self, object: &dyn StructuredObject) -> Result<T> {
        (self.0)(object)
    }

    /// Post-processes every successful result with `f`.
    pub fn map<U, F>(self, f: F) -> Transform<U>
    where
        U: 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        Transform::new(move |obj| self.apply(obj).map(&f))
    }

    /// Applies the transform to every item, stopping at the first error.
    pub fn collect<S: StructuredObject>(&self, items: &[S]) -> Result<Vec<T>> {
        items.iter().map(|item| self.apply(item)).collect()
    }
}

impl<T> Clone for Transform<T> {
    fn clone(&self) -> Self {
        Transform(Arc::clone(&self.0))
    }
}

impl<T> fmt::Debug for Transform<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Transform")
    }
}

fn read_id(object: &dyn StructuredObject) -> Result<(String, Value)> {
    let id = object
        .id_attribute()
        .filter(|id| object.is_set(id))
        .ok_or_else(|| StructError::NoIdentifier {
            class: object.class().name().to_string(),
        })?;
    let value = cast_required::<Value>(&id.name, object.get(id)?)?;
    Ok((id.name.clone(), value))
}

/// Extracts the identifying attribute's value.
///
/// Fails with a precondition error if the class has no identifying
/// attribute or it is unset.
pub fn id() -> Transform<Value> {
    Transform::new(|obj| read_id(obj).map(|(_, value)| value))
}

/// Extracts the identifying attribute's value cast to `T`.
pub fn id_as<T: FromValue + 'static>() -> Transform<T> {
    Transform::new(|obj| {
        let (name, value) = read_id(obj)?;
        cast(&name, value)
    })
}

/// Extracts the raw property value.
pub fn value(property: impl Into<Property>) -> Transform<Option<Value>> {
    let property = property.into();
    Transform::new(move |obj| property.read(obj))
}

/// Extracts the property value cast to `T`. Null stays `None`.
pub fn value_as<T: FromValue + 'static>(property: impl Into<Property>) -> Transform<Option<T>> {
    let property = property.into();
    Transform::new(move |obj| cast_nullable(property.name(), property.read(obj)?))
}

/// Extracts a big-decimal property.
pub fn big_decimal(property: impl Into<Property>) -> Transform<Option<BigDecimal>> {
    value_as(property)
}

/// Extracts a big-integer property.
pub fn big_integer(property: impl Into<Property>) -> Transform<Option<BigInt>> {
    value_as(property)
}

/// Extracts a date property.
pub fn date(property: impl Into<Property>) -> Transform<Option<DateTime<Utc>>> {
    value_as(property)
}

/// Extracts an `int` property.
pub fn integer(property: impl Into<Property>) -> Transform<Option<i32>> {
    value_as(property)
}

/// Extracts a `long` property.
pub fn long(property: impl Into<Property>) -> Transform<Option<i64>> {
    value_as(property)
}

/// Extracts a `short` property.
pub fn short(property: impl Into<Property>) -> Transform<Option<i16>> {
    value_as(property)
}

/// Extracts a `double` property.
pub fn double(property: impl Into<Property>) -> Transform<Option<f64>> {
    value_as(property)
}

/// Extracts a `char` property.
pub fn character(property: impl Into<Property>) -> Transform<Option<char>> {
    value_as(property)
}

/// Extracts a string property.
pub fn string(property: impl Into<Property>) -> Transform<Option<String>> {
    value_as(property)
}

/// Extracts a boolean property.
pub fn boolean(property: impl Into<Property>) -> Transform<Option<bool>> {
    value_as(property)
}

pub(crate) fn required<T: FromValue + 'static>(property: impl Into<Property>) -> Transform<T> {
    let property = property.into();
    Transform::new(move |obj| cast_required(property.name(), property.read(obj)?))
}

/// Extracts an `int` property; null fails.
pub fn to_int(property: impl Into<Property>) -> Transform<i32> {
    required(property)
}

/// Extracts a `long` property; null fails.
pub fn to_long(property: impl Into<Property>) -> Transform<i64> {
    required(property)
}

/// Extracts a `double` property; null fails.
pub fn to_double(property: impl Into<Property>) -> Transform<f64> {
    required(property)
}

/// Wraps an `int` property as a one-element sequence, for feeding
/// per-object values into iterator pipelines with `flat_map`.
pub fn int_stream(property: impl Into<Property>) -> Transform<Once<i32>> {
    to_int(property).map(once)
}

/// Wraps a `long` property as a one-element sequence.
pub fn long_stream(property: impl Into<Property>) -> Transform<Once<i64>> {
    to_long(property).map(once)
}

/// Wraps a `double` property as a one-element sequence.
pub fn double_stream(property: impl Into<Property>) -> Transform<Once<f64>> {
    to_double(property).map(once)
}

/// Extracts the object's class descriptor.
pub fn class() -> Transform<Arc<Class>> {
    Transform::new(|obj| Ok(Arc::clone(obj.class())))
}
