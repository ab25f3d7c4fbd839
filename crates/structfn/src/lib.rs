//! structfn - reusable predicates, functions, consumers and comparators over
//! reflective structured objects.
//!
//! A structured object exposes a class descriptor with named structural
//! features (attributes and references) and generic get/set access through
//! them. structfn builds small function values on top of that capability, for
//! use in ordinary iterator pipelines:
//!
//! - [`predicate`]: boolean tests (has identifier, has property, is null,
//!   equals, between)
//! - [`transform`]: value extraction (identifier, raw or typed property,
//!   single-element sequences, class)
//! - [`mutation`]: writes to one property
//! - [`ordering`]: comparators by property value
//!
//! Every factory takes its property either by name, resolved against the
//! target's class on each call, or by a pre-resolved `Arc<Feature>` handle.
//!
//! # Quick Start
//!
//! ```rust
//! use structfn::{mutation, ordering, predicate, transform};
//! use structfn::{Class, DynamicObject, ValueType};
//!
//! let person = Class::builder("Person")
//!     .id("id", ValueType::Long)
//!     .attribute("name", ValueType::String)
//!     .attribute("age", ValueType::Int)
//!     .build()
//!     .unwrap();
//!
//! let make = |id: i64, name: &str, age: i32| {
//!     DynamicObject::new(person.clone())
//!         .with("id", id).unwrap()
//!         .with("name", name).unwrap()
//!         .with("age", age).unwrap()
//! };
//! let mut people = vec![make(1, "Cid", 41), make(2, "Ann", 17), make(3, "Bob", 30)];
//!
//! // Filter
//! let adults = predicate::value_between("age", 18, 65).filter(&people).unwrap();
//! assert_eq!(adults.len(), 2);
//!
//! // Sort
//! ordering::property("name").sort(&mut people).unwrap();
//! let ids = transform::id_as::<i64>().collect(&people).unwrap();
//! assert_eq!(ids, vec![2, 3, 1]);
//!
//! // Mutate
//! mutation::set_value("age", 18).apply_all(&mut people).unwrap();
//! assert!(predicate::value_eq("age", 18).test(&people[0]).unwrap());
//! ```
//!
//! # Plugging in a framework
//!
//! Implement [`StructuredObject`] for the framework's instance type. The
//! catalog only resolves features by name, reads, writes, and asks whether a
//! feature is set; everything else, including type enforcement on write, is
//! the adapter's business. [`DynamicObject`] is the in-memory adapter.
//!
//! # Errors
//!
//! Applying a function value returns [`Result`]. [`StructError::kind`]
//! groups failures into precondition violations, missing features, and type
//! mismatches. Nothing is swallowed internally.

mod dynamic;
mod error;
mod model;
mod property;
mod value;

pub mod mutation;
pub mod ordering;
pub mod predicate;
pub mod transform;

// Re-export public API
pub use dynamic::DynamicObject;
pub use error::{ErrorKind, Result, StructError};
pub use model::{Class, ClassBuilder, Feature, FeatureKind, ObjectRef, StructuredObject};
pub use mutation::Consumer;
pub use ordering::{Comparator, Dir};
pub use predicate::Predicate;
pub use property::Property;
pub use transform::Transform;
pub use value::{FromValue, Value, ValueType};
