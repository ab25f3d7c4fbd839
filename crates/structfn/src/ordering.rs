//! Comparator factories.
//!
//! A [`Comparator`] orders structured objects by a property read through the
//! transform group. Construction never fails; a value that cannot be ordered
//! is reported when two objects are actually compared.
//!
//! [`property`] and [`property_as`] fail on null values. [`nulls_last`] is
//! the null-tolerant variant.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::error::{Result, StructError};
use crate::model::StructuredObject;
use crate::property::Property;
use crate::transform::{self, Transform};
use crate::value::{FromValue, Value};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dir {
    /// Ascending order (smallest first).
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl Dir {
    /// Applies this direction to an ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Dir::Asc => ordering,
            Dir::Desc => ordering.reverse(),
        }
    }
}

type CompareFn =
    dyn Fn(&dyn StructuredObject, &dyn StructuredObject) -> Result<Ordering> + Send + Sync;

/// A reusable ordering over structured objects.
///
/// # Example
///
/// ```
/// use structfn::{ordering, transform, Class, DynamicObject, ValueType};
///
/// let class = Class::builder("Person")
///     .attribute("name", ValueType::String)
///     .attribute("age", ValueType::Int)
///     .build()
///     .unwrap();
///
/// let mut people = vec![
///     DynamicObject::new(class.clone()).with("name", "Cid").unwrap().with("age", 41).unwrap(),
///     DynamicObject::new(class.clone()).with("name", "Ann").unwrap().with("age", 17).unwrap(),
///     DynamicObject::new(class.clone()).with("name", "Bob").unwrap().with("age", 30).unwrap(),
/// ];
///
/// ordering::property("age").sort(&mut people).unwrap();
/// let names = transform::string("name")
///     .map(Option::unwrap_or_default)
///     .collect(&people)
///     .unwrap();
/// assert_eq!(names, vec!["Ann", "Bob", "Cid"]);
/// ```
#[derive(Clone)]
pub struct Comparator(Arc<CompareFn>);

impl Comparator {
    /// Wraps a comparison function.
    pub fn new<F>(compare: F) -> Self
    where
        F: Fn(&dyn StructuredObject, &dyn StructuredObject) -> Result<Ordering>
            + Send
            + Sync
            + 'static,
    {
        Comparator(Arc::new(compare))
    }

    /// Compares two objects.
    pub fn compare(
        &self,
        a: &dyn StructuredObject,
        b: &dyn StructuredObject,
    ) -> Result<Ordering> {
        (self.0)(a, b)
    }

    /// Applies a sort direction.
    pub fn direction(self, dir: Dir) -> Comparator {
        Comparator::new(move |a, b| self.compare(a, b).map(|o| dir.apply(o)))
    }

    /// Reverses the ordering.
    pub fn reversed(self) -> Comparator {
        Comparator::new(move |a, b| self.compare(a, b).map(Ordering::reverse))
    }

    /// Breaks ties with `next`.
    pub fn then_comparing(self, next: Comparator) -> Comparator {
        Comparator::new(move |a, b| match self.compare(a, b)? {
            Ordering::Equal => next.compare(a, b),
            decided => Ok(decided),
        })
    }

    /// Sorts `items` in place (stable).
    ///
    /// Fails with the first comparison error, leaving `items` untouched.
    pub fn sort<T: StructuredObject>(&self, items: &mut [T]) -> Result<()> {
        let mut order: Vec<usize> = (0..items.len()).collect();
        let mut scratch = Vec::with_capacity(items.len());
        if let Err(err) = self.merge_sort(items, &mut order, &mut scratch) {
            tracing::debug!(error = %err, len = items.len(), "sort aborted");
            return Err(err);
        }
        permute(items, order);
        Ok(())
    }

    /// Stable merge sort of `order`, an index vector into `items`.
    fn merge_sort<T: StructuredObject>(
        &self,
        items: &[T],
        order: &mut [usize],
        scratch: &mut Vec<usize>,
    ) -> Result<()> {
        if order.len() < 2 {
            return Ok(());
        }
        let mid = order.len() / 2;
        {
            let (left, right) = order.split_at_mut(mid);
            self.merge_sort(items, left, scratch)?;
            self.merge_sort(items, right, scratch)?;
        }

        scratch.clear();
        let (mut i, mut j) = (0, mid);
        while i < mid && j < order.len() {
            // Take from the right only when strictly smaller.
            if self.compare(&items[order[j]], &items[order[i]])? == Ordering::Less {
                scratch.push(order[j]);
                j += 1;
            } else {
                scratch.push(order[i]);
                i += 1;
            }
        }
        scratch.extend_from_slice(&order[i..mid]);
        scratch.extend_from_slice(&order[j..]);
        order.copy_from_slice(scratch);
        Ok(())
    }
}

/// Rearranges `items` so that position `k` holds the element that was at
/// `order[k]`.
fn permute<T>(items: &mut [T], mut order: Vec<usize>) {
    for start in 0..items.len() {
        let mut current = start;
        while order[current] != current {
            let next = order[current];
            order[current] = current;
            if next == start {
                break;
            }
            items.swap(current, next);
            current = next;
        }
    }
}

impl fmt::Debug for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Comparator")
    }
}

fn natural(feature: &str, a: Value, b: Value) -> Result<Ordering> {
    a.natural_cmp(&b).ok_or_else(|| StructError::NotComparable {
        feature: feature.to_string(),
        left: a.type_name(),
        right: b.type_name(),
    })
}

/// Orders by the property's natural ordering.
///
/// Fails on a null value, and on two values with no natural ordering
/// between them (different types, lists, object references).
pub fn property(property: impl Into<Property>) -> Comparator {
    let property = property.into();
    let feature = property.name().to_string();
    let extract = transform::required::<Value>(property);
    Comparator::new(move |a, b| natural(&feature, extract.apply(a)?, extract.apply(b)?))
}

/// Orders by the property cast to `T`.
///
/// Fails on a null value, if a value is not of type `T`, or if two values
/// are unordered (such as `NaN` for floats).
pub fn property_as<T>(property: impl Into<Property>) -> Comparator
where
    T: FromValue + PartialOrd + 'static,
{
    let property = property.into();
    let feature = property.name().to_string();
    let extract = transform::required::<T>(property);
    Comparator::new(move |a, b| {
        let (a, b) = (extract.apply(a)?, extract.apply(b)?);
        a.partial_cmp(&b).ok_or_else(|| StructError::NotComparable {
            feature: feature.clone(),
            left: T::TYPE_NAME,
            right: T::TYPE_NAME,
        })
    })
}

/// Orders by the property's natural ordering, placing null values after
/// every non-null value.
pub fn nulls_last(property: impl Into<Property>) -> Comparator {
    let property = property.into();
    let feature = property.name().to_string();
    let extract = transform::value(property);
    Comparator::new(move |a, b| match (extract.apply(a)?, extract.apply(b)?) {
        (None, None) => Ok(Ordering::Equal),
        (None, Some(_)) => Ok(Ordering::Greater),
        (Some(_), None) => Ok(Ordering::Less),
        (Some(a), Some(b)) => natural(&feature, a, b),
    })
}

/// Orders by an arbitrary extracted key.
pub fn comparing<K: Ord + 'static>(key: Transform<K>) -> Comparator {
    Comparator::new(move |a, b| Ok(key.apply(a)?.cmp(&key.apply(b)?)))
}
