//! Reflective metamodel: class descriptors, structural features and the
//! [`StructuredObject`] capability.
//!
//! The catalog never depends on a concrete modeling framework. A host
//! framework plugs in by implementing [`StructuredObject`] for its instance
//! type; [`DynamicObject`](crate::DynamicObject) is the in-memory adapter
//! shipped with this crate.

use std::fmt;
use std::sync::Arc;

use crate::error::{Result, StructError};
use crate::value::{Value, ValueType};

/// What a structural feature points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureKind {
    /// Holds plain data values.
    Attribute,
    /// Holds references to objects of the named class.
    Reference { target: String },
}

/// A named attribute or reference declared on a class.
///
/// Features are shared as `Arc<Feature>` handles; a handle obtained once can
/// be passed to any factory instead of a name.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    /// Feature name, unique within its class.
    pub name: String,
    /// Attribute or reference.
    pub kind: FeatureKind,
    /// Declared element type.
    pub value_type: ValueType,
    /// Whether the feature holds a list of values.
    pub many: bool,
    /// Value read while the feature is unset.
    pub default: Option<Value>,
}

impl Feature {
    /// Creates a single-valued attribute.
    pub fn attribute(name: impl Into<String>, value_type: ValueType) -> Self {
        Feature {
            name: name.into(),
            kind: FeatureKind::Attribute,
            value_type,
            many: false,
            default: None,
        }
    }

    /// Creates a single-valued reference to objects of class `target`.
    pub fn reference(name: impl Into<String>, target: impl Into<String>) -> Self {
        Feature {
            name: name.into(),
            kind: FeatureKind::Reference {
                target: target.into(),
            },
            value_type: ValueType::Object,
            many: false,
            default: None,
        }
    }

    /// Makes this feature many-valued.
    pub fn many(mut self) -> Self {
        self.many = true;
        self
    }

    /// Sets the value read while the feature is unset.
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Returns `true` for attributes.
    pub fn is_attribute(&self) -> bool {
        matches!(self.kind, FeatureKind::Attribute)
    }

    /// Returns `true` for references.
    pub fn is_reference(&self) -> bool {
        matches!(self.kind, FeatureKind::Reference { .. })
    }
}

/// Class descriptor: a named set of structural features with an optional
/// identifying attribute.
///
/// # Example
///
/// ```
/// use structfn::{Class, ValueType};
///
/// let person = Class::builder("Person")
///     .id("ssn", ValueType::String)
///     .attribute("name", ValueType::String)
///     .attribute("age", ValueType::Int)
///     .build()
///     .unwrap();
///
/// assert!(person.feature("age").is_some());
/// assert_eq!(person.id_attribute().unwrap().name, "ssn");
/// ```
#[derive(Debug)]
pub struct Class {
    name: String,
    features: Vec<Arc<Feature>>,
    id_attribute: Option<Arc<Feature>>,
    super_types: Vec<Arc<Class>>,
}

impl Class {
    /// Starts building a class with the given name.
    pub fn builder(name: impl Into<String>) -> ClassBuilder {
        ClassBuilder {
            name: name.into(),
            features: Vec::new(),
            id: None,
            super_types: Vec::new(),
        }
    }

    /// Returns the class name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns every feature, inherited ones first.
    pub fn features(&self) -> &[Arc<Feature>] {
        &self.features
    }

    /// Resolves a feature by name.
    pub fn feature(&self, name: &str) -> Option<&Arc<Feature>> {
        self.features.iter().find(|f| f.name == name)
    }

    /// Returns `true` if `feature` is one of this class's features.
    pub fn declares(&self, feature: &Feature) -> bool {
        self.features
            .iter()
            .any(|f| std::ptr::eq(f.as_ref(), feature) || f.as_ref() == feature)
    }

    /// Returns the identifying attribute, if the class designates one.
    pub fn id_attribute(&self) -> Option<&Arc<Feature>> {
        self.id_attribute.as_ref()
    }

    /// Returns the direct supertypes.
    pub fn super_types(&self) -> &[Arc<Class>] {
        &self.super_types
    }

    /// Returns `true` if this class is `name` or inherits from it.
    pub fn conforms_to(&self, name: &str) -> bool {
        self.name == name || self.super_types.iter().any(|s| s.conforms_to(name))
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Fluent builder for [`Class`].
#[derive(Debug)]
pub struct ClassBuilder {
    name: String,
    features: Vec<Feature>,
    id: Option<String>,
    super_types: Vec<Arc<Class>>,
}

impl ClassBuilder {
    /// Inherits every feature (and the identifying attribute) of `parent`.
    pub fn extends(mut self, parent: &Arc<Class>) -> Self {
        self.super_types.push(Arc::clone(parent));
        self
    }

    /// Adds a single-valued attribute.
    pub fn attribute(self, name: &str, value_type: ValueType) -> Self {
        self.feature(Feature::attribute(name, value_type))
    }

    /// Adds an attribute and designates it as the identifying attribute.
    pub fn id(mut self, name: &str, value_type: ValueType) -> Self {
        self.id = Some(name.to_string());
        self.feature(Feature::attribute(name, value_type))
    }

    /// Adds a single-valued reference.
    pub fn reference(self, name: &str, target: &str) -> Self {
        self.feature(Feature::reference(name, target))
    }

    /// Adds a fully specified feature.
    pub fn feature(mut self, feature: Feature) -> Self {
        self.features.push(feature);
        self
    }

    /// Finalizes the class.
    ///
    /// Fails if a feature name appears twice (including inherited ones), or
    /// if the identifying feature is a reference or many-valued.
    pub fn build(self) -> Result<Arc<Class>> {
        let mut features: Vec<Arc<Feature>> = Vec::new();
        let mut inherited_id = None;

        for parent in &self.super_types {
            for feature in parent.features() {
                if features.iter().any(|f| f.name == feature.name) {
                    // Diamond inheritance reaches the same feature twice.
                    if features.iter().any(|f| Arc::ptr_eq(f, feature)) {
                        continue;
                    }
                    return Err(StructError::DuplicateFeature {
                        class: self.name,
                        feature: feature.name.clone(),
                    });
                }
                features.push(Arc::clone(feature));
            }
            if inherited_id.is_none() {
                inherited_id = parent.id_attribute().cloned();
            }
        }

        for feature in self.features {
            if features.iter().any(|f| f.name == feature.name) {
                return Err(StructError::DuplicateFeature {
                    class: self.name,
                    feature: feature.name,
                });
            }
            features.push(Arc::new(feature));
        }

        let id_attribute = match self.id {
            Some(id) => features.iter().find(|f| f.name == id).cloned(),
            None => inherited_id,
        };

        if let Some(id) = &id_attribute {
            if !id.is_attribute() || id.many {
                return Err(StructError::InvalidIdentifier {
                    class: self.name,
                    feature: id.name.clone(),
                });
            }
        }

        Ok(Arc::new(Class {
            name: self.name,
            features,
            id_attribute,
            super_types: self.super_types,
        }))
    }
}

/// Reflective access to an object's structural features.
///
/// This is the only seam between the factory catalog and a host framework.
/// Implementors decide how values are stored and which writes they accept.
pub trait StructuredObject {
    /// Returns the object's class descriptor.
    fn class(&self) -> &Arc<Class>;

    /// Reads a feature. `Ok(None)` means the value is null.
    ///
    /// Fails if the feature does not belong to the object's class.
    fn get(&self, feature: &Feature) -> Result<Option<Value>>;

    /// Returns `true` if the feature holds an explicitly set value.
    fn is_set(&self, feature: &Feature) -> bool;

    /// Writes a feature; `None` clears it.
    ///
    /// Implementations may reject values they cannot store.
    fn set(&mut self, feature: &Feature, value: Option<Value>) -> Result<()>;

    /// Resolves a feature of this object's class by name.
    fn feature(&self, name: &str) -> Option<Arc<Feature>> {
        self.class().feature(name).cloned()
    }

    /// Returns the class's identifying attribute, if any.
    fn id_attribute(&self) -> Option<&Arc<Feature>> {
        self.class().id_attribute()
    }
}

/// Shared reference to a structured object, storable as a [`Value`].
///
/// Equality is identity: two references are equal only if they point at the
/// same object.
#[derive(Clone)]
pub struct ObjectRef(Arc<dyn StructuredObject + Send + Sync>);

impl ObjectRef {
    /// Wraps an object.
    pub fn new(object: impl StructuredObject + Send + Sync + 'static) -> Self {
        ObjectRef(Arc::new(object))
    }

    /// Returns the referenced object.
    pub fn object(&self) -> &(dyn StructuredObject + Send + Sync) {
        self.0.as_ref()
    }
}

impl From<Arc<dyn StructuredObject + Send + Sync>> for ObjectRef {
    fn from(object: Arc<dyn StructuredObject + Send + Sync>) -> Self {
        ObjectRef(object)
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectRef({})", self.0.class().name())
    }
}
