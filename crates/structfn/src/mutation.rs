//! Side-effecting factories that write a single property.
//!
//! No type checking happens here. Whatever the object's [`set`] accepts is
//! written; whatever it rejects comes back as the error.
//!
//! [`set`]: crate::StructuredObject::set

use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::model::StructuredObject;
use crate::property::Property;
use crate::value::Value;

type AcceptFn = dyn Fn(&mut dyn StructuredObject) -> Result<()> + Send + Sync;

/// A reusable write operation over structured objects.
#[derive(Clone)]
pub struct Consumer(Arc<AcceptFn>);

impl Consumer {
    /// Wraps a write operation.
    pub fn new<F>(accept: F) -> Self
    where
        F: Fn(&mut dyn StructuredObject) -> Result<()> + Send + Sync + 'static,
    {
        Consumer(Arc::new(accept))
    }

    /// Applies the write to an object.
    pub fn accept(&self, object: &mut dyn StructuredObject) -> Result<()> {
        (self.0)(object)
    }

    /// Runs `self`, then `next` if `self` succeeded.
    pub fn and_then(self, next: Consumer) -> Consumer {
        Consumer::new(move |obj| {
            self.accept(obj)?;
            next.accept(obj)
        })
    }

    /// Applies the write to every item in order, stopping at the first error.
    /// Items before the failing one keep the written value.
    pub fn apply_all<T: StructuredObject>(&self, items: &mut [T]) -> Result<()> {
        for item in items.iter_mut() {
            self.accept(item)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Consumer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Consumer")
    }
}

/// Sets the property to `value`.
pub fn set_value(property: impl Into<Property>, value: impl Into<Value>) -> Consumer {
    set_optional(property, Some(value.into()))
}

/// Clears the property.
pub fn set_null(property: impl Into<Property>) -> Consumer {
    set_optional(property, None)
}

/// Sets the property to `value`, clearing it when `value` is `None`.
pub fn set_optional(property: impl Into<Property>, value: Option<Value>) -> Consumer {
    let property = property.into();
    Consumer::new(move |obj| property.write(obj, value.clone()))
}
