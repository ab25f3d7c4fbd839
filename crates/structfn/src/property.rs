//! Property addressing: by name or by pre-resolved feature handle.

use std::sync::Arc;

use crate::error::{Result, StructError};
use crate::model::{Feature, StructuredObject};
use crate::value::Value;

/// A structural feature addressed either by name or by handle.
///
/// Names are resolved against the target object's class on every call;
/// nothing is cached, so the same property can be applied to objects of
/// unrelated classes.
///
/// ```
/// use structfn::{Feature, Property, ValueType};
/// use std::sync::Arc;
///
/// let by_name = Property::from("age");
/// let by_handle = Property::from(Arc::new(Feature::attribute("age", ValueType::Int)));
/// assert_eq!(by_name.name(), by_handle.name());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Property {
    /// Resolved against the object's class at call time.
    Named(String),
    /// Used as-is.
    Handle(Arc<Feature>),
}

impl Property {
    /// Returns the property name.
    pub fn name(&self) -> &str {
        match self {
            Property::Named(name) => name,
            Property::Handle(feature) => &feature.name,
        }
    }

    /// Resolves this property against `object`'s class, if it exists there.
    pub fn lookup(&self, object: &dyn StructuredObject) -> Option<Arc<Feature>> {
        match self {
            Property::Named(name) => {
                let found = object.feature(name);
                if found.is_none() {
                    tracing::trace!(
                        class = object.class().name(),
                        feature = name.as_str(),
                        "feature lookup missed"
                    );
                }
                found
            }
            Property::Handle(feature) => Some(Arc::clone(feature)),
        }
    }

    /// Resolves this property, failing if the class has no such feature.
    pub fn resolve(&self, object: &dyn StructuredObject) -> Result<Arc<Feature>> {
        self.lookup(object)
            .ok_or_else(|| StructError::MissingFeature {
                class: object.class().name().to_string(),
                feature: self.name().to_string(),
            })
    }

    /// Resolves and reads this property.
    pub fn read(&self, object: &dyn StructuredObject) -> Result<Option<Value>> {
        let feature = self.resolve(object)?;
        object.get(&feature)
    }

    /// Resolves and writes this property.
    pub fn write(&self, object: &mut dyn StructuredObject, value: Option<Value>) -> Result<()> {
        let feature = self.resolve(object)?;
        object.set(&feature, value)
    }
}

impl From<&str> for Property {
    fn from(name: &str) -> Self {
        Property::Named(name.to_string())
    }
}

impl From<String> for Property {
    fn from(name: String) -> Self {
        Property::Named(name)
    }
}

impl From<Arc<Feature>> for Property {
    fn from(feature: Arc<Feature>) -> Self {
        Property::Handle(feature)
    }
}

impl From<&Arc<Feature>> for Property {
    fn from(feature: &Arc<Feature>) -> Self {
        Property::Handle(Arc::clone(feature))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamic::DynamicObject;
    use crate::model::Class;
    use crate::value::ValueType;

    fn person() -> DynamicObject {
        let class = Class::builder("Person")
            .attribute("age", ValueType::Int)
            .build()
            .unwrap();
        DynamicObject::new(class).with("age", 30).unwrap()
    }

    #[test]
    fn named_resolves() {
        let obj = person();
        let feature = Property::from("age").resolve(&obj).unwrap();
        assert_eq!(feature.name, "age");
        assert_eq!(Property::from("age").read(&obj), Ok(Some(Value::Int(30))));
    }

    #[test]
    fn named_missing() {
        let obj = person();
        assert!(Property::from("height").lookup(&obj).is_none());
        assert_eq!(
            Property::from("height").read(&obj),
            Err(StructError::MissingFeature {
                class: "Person".into(),
                feature: "height".into(),
            })
        );
    }

    #[test]
    fn handle_is_used_as_is() {
        let obj = person();
        let handle = obj.feature("age").unwrap();
        let prop = Property::from(&handle);
        assert!(Arc::ptr_eq(&prop.lookup(&obj).unwrap(), &handle));
    }

    #[test]
    fn foreign_handle_fails_on_read() {
        let obj = person();
        let foreign = Arc::new(Feature::attribute("height", ValueType::Double));
        let err = Property::from(foreign).read(&obj).unwrap_err();
        assert!(matches!(err, StructError::MissingFeature { .. }));
    }

    #[test]
    fn write_through_name() {
        let mut obj = person();
        Property::from("age").write(&mut obj, Some(Value::Int(31))).unwrap();
        assert_eq!(Property::from("age").read(&obj), Ok(Some(Value::Int(31))));
    }
}
