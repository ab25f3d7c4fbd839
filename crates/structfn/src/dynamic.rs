//! In-memory [`StructuredObject`] backed by a class descriptor and a value map.
//!
//! `DynamicObject` plays the role a host framework's generated or dynamic
//! instance would. It enforces the declared feature types on write, which is
//! where type validation belongs: the factory catalog itself never checks.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{Result, StructError};
use crate::model::{Class, Feature, ObjectRef, StructuredObject};
use crate::value::Value;

/// Instance of a [`Class`] holding its feature values in memory.
///
/// # Example
///
/// ```
/// use structfn::{Class, DynamicObject, StructuredObject, Value, ValueType};
///
/// let class = Class::builder("Person")
///     .attribute("name", ValueType::String)
///     .attribute("age", ValueType::Int)
///     .build()
///     .unwrap();
///
/// let alice = DynamicObject::new(class)
///     .with("name", "Alice")
///     .unwrap()
///     .with("age", 30)
///     .unwrap();
///
/// let age = alice.feature("age").unwrap();
/// assert_eq!(alice.get(&age).unwrap(), Some(Value::Int(30)));
/// ```
#[derive(Debug, Clone)]
pub struct DynamicObject {
    class: Arc<Class>,
    values: HashMap<String, Value>,
}

impl DynamicObject {
    /// Creates an instance with every feature unset.
    pub fn new(class: Arc<Class>) -> Self {
        DynamicObject {
            class,
            values: HashMap::new(),
        }
    }

    /// Sets a feature by name, builder style.
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Result<Self> {
        let feature = self.resolve(name)?;
        self.set(&feature, Some(value.into()))?;
        Ok(self)
    }

    /// Wraps this object so it can be stored in a reference feature.
    pub fn into_shared(self) -> ObjectRef {
        ObjectRef::new(self)
    }

    fn resolve(&self, name: &str) -> Result<Arc<Feature>> {
        self.class
            .feature(name)
            .cloned()
            .ok_or_else(|| self.missing(name))
    }

    fn missing(&self, name: &str) -> StructError {
        StructError::MissingFeature {
            class: self.class.name().to_string(),
            feature: name.to_string(),
        }
    }

    fn check_declared(&self, feature: &Feature) -> Result<()> {
        if self.class.declares(feature) {
            Ok(())
        } else {
            Err(self.missing(&feature.name))
        }
    }

    fn check_type(&self, feature: &Feature, value: &Value) -> Result<()> {
        let accepted = if feature.many {
            match value {
                Value::List(items) => items.iter().all(|v| feature.value_type.accepts(v)),
                _ => false,
            }
        } else {
            feature.value_type.accepts(value)
        };

        if accepted {
            return Ok(());
        }

        let expected = if feature.many {
            "list"
        } else {
            feature.value_type.name()
        };
        let actual = match value {
            Value::List(items) if feature.many => items
                .iter()
                .find(|v| !feature.value_type.accepts(v))
                .map_or("list", Value::type_name),
            other => other.type_name(),
        };
        tracing::debug!(
            class = self.class.name(),
            feature = feature.name.as_str(),
            expected,
            actual,
            "rejected write"
        );
        Err(StructError::TypeMismatch {
            feature: feature.name.clone(),
            expected,
            actual,
        })
    }
}

impl StructuredObject for DynamicObject {
    fn class(&self) -> &Arc<Class> {
        &self.class
    }

    fn get(&self, feature: &Feature) -> Result<Option<Value>> {
        self.check_declared(feature)?;
        let value = match self.values.get(&feature.name) {
            Some(v) => Some(v.clone()),
            None if feature.many => Some(Value::List(Vec::new())),
            None => feature.default.clone(),
        };
        Ok(value)
    }

    fn is_set(&self, feature: &Feature) -> bool {
        self.values.contains_key(&feature.name) && self.class.declares(feature)
    }

    fn set(&mut self, feature: &Feature, value: Option<Value>) -> Result<()> {
        self.check_declared(feature)?;
        match value {
            None => {
                self.values.remove(&feature.name);
            }
            Some(Value::List(items)) if feature.many && items.is_empty() => {
                self.values.remove(&feature.name);
            }
            Some(value) => {
                self.check_type(feature, &value)?;
                self.values.insert(feature.name.clone(), value);
            }
        }
        Ok(())
    }
}
