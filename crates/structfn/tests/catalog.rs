//! End-to-end tests for the factory catalog over the in-memory adapter.

use std::cmp::Ordering;
use std::sync::Arc;

use structfn::{
    mutation, ordering, predicate, transform, Class, Dir, DynamicObject, ErrorKind, Feature,
    StructError, StructuredObject, Value, ValueType,
};

// ============================================================================
// Fixtures
// ============================================================================

fn person_class() -> Arc<Class> {
    Class::builder("Person")
        .id("id", ValueType::Long)
        .attribute("name", ValueType::String)
        .attribute("age", ValueType::Int)
        .attribute("email", ValueType::String)
        .reference("manager", "Person")
        .feature(Feature::attribute("tags", ValueType::String).many())
        .build()
        .unwrap()
}

fn person(id: i64, name: &str, age: i32) -> DynamicObject {
    DynamicObject::new(person_class())
        .with("id", id)
        .unwrap()
        .with("name", name)
        .unwrap()
        .with("age", age)
        .unwrap()
}

fn staff() -> Vec<DynamicObject> {
    vec![
        person(1, "Cid", 41),
        person(2, "Ann", 17),
        person(3, "Bob", 30),
        person(4, "Dee", 65),
    ]
}

fn names(items: &[DynamicObject]) -> Vec<String> {
    transform::string("name")
        .map(Option::unwrap_or_default)
        .collect(items)
        .unwrap()
}

// ============================================================================
// Age = 30
// ============================================================================

#[test]
fn age_30_equality() {
    let bob = person(3, "Bob", 30);
    assert!(predicate::value_eq("age", 30).test(&bob).unwrap());
    assert!(!predicate::value_eq("age", 31).test(&bob).unwrap());
    assert!(predicate::value_equals("age", 30).test(&bob).unwrap());
}

#[test]
fn age_30_between() {
    let bob = person(3, "Bob", 30);
    assert!(predicate::value_between("age", 18, 65).test(&bob).unwrap());
    assert!(predicate::value_between("age", 30, 31).test(&bob).unwrap());
    assert!(!predicate::value_between("age", 31, 65).test(&bob).unwrap());
    assert!(!predicate::value_between("age", 18, 30).test(&bob).unwrap());
}

#[test]
fn age_30_between_values() {
    let bob = person(3, "Bob", 30);
    assert!(predicate::value_between_values("age", 30, 31).test(&bob).unwrap());
    assert!(!predicate::value_between_values("age", 0, 30).test(&bob).unwrap());

    let err = predicate::value_between_values("age", 0i64, 100i64)
        .test(&bob)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
}

#[test]
fn age_read_with_wrong_type_fails() {
    let bob = person(3, "Bob", 30);
    let err = predicate::value_eq("age", 30i64).test(&bob).unwrap_err();
    assert_eq!(
        err,
        StructError::TypeMismatch {
            feature: "age".into(),
            expected: "long",
            actual: "int",
        }
    );
}

// ============================================================================
// Identifiers
// ============================================================================

#[test]
fn identifier_round_trip() {
    let ann = person(2, "Ann", 17);
    assert!(predicate::has_id().test(&ann).unwrap());
    assert_eq!(transform::id().apply(&ann), Ok(Value::Long(2)));
    assert_eq!(transform::id_as::<i64>().apply(&ann), Ok(2));
}

#[test]
fn no_identifier_is_precondition_failure() {
    let note_class = Class::builder("Note")
        .attribute("text", ValueType::String)
        .build()
        .unwrap();
    let note = DynamicObject::new(note_class).with("text", "hi").unwrap();

    assert!(!predicate::has_id().test(&note).unwrap());
    let err = transform::id().apply(&note).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Precondition);
    assert_eq!(
        err.to_string(),
        "object class 'Note' has no identifying attribute"
    );
}

#[test]
fn unset_identifier_is_precondition_failure() {
    let blank = DynamicObject::new(person_class());
    assert!(!predicate::has_id().test(&blank).unwrap());
    assert_eq!(
        transform::id().apply(&blank).unwrap_err().kind(),
        ErrorKind::Precondition
    );
}

#[test]
fn inherited_identifier() {
    let base = Class::builder("Entity")
        .id("uuid", ValueType::String)
        .build()
        .unwrap();
    let doc = Class::builder("Document")
        .extends(&base)
        .attribute("title", ValueType::String)
        .build()
        .unwrap();
    let obj = DynamicObject::new(doc.clone()).with("uuid", "d-1").unwrap();

    assert!(doc.conforms_to("Entity"));
    assert_eq!(transform::id_as::<String>().apply(&obj), Ok("d-1".to_string()));
    assert_eq!(transform::id().apply(&obj).unwrap().as_str(), Some("d-1"));
}

// ============================================================================
// Undeclared properties
// ============================================================================

#[test]
fn undeclared_property() {
    let bob = person(3, "Bob", 30);
    assert!(!predicate::has_property("salary").test(&bob).unwrap());
    assert!(predicate::has_property("email").test(&bob).unwrap());

    for err in [
        transform::value("salary").apply(&bob).unwrap_err(),
        predicate::value_is_null("salary").test(&bob).unwrap_err(),
        ordering::property("salary").compare(&bob, &bob).unwrap_err(),
    ] {
        assert_eq!(err.kind(), ErrorKind::MissingFeature);
    }
}

#[test]
fn handle_from_other_class_is_missing() {
    let other = Class::builder("Pet")
        .attribute("name", ValueType::String)
        .attribute("legs", ValueType::Int)
        .build()
        .unwrap();
    let legs = Arc::clone(other.feature("legs").unwrap());
    let err = transform::value(legs).apply(&person(1, "Cid", 41)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingFeature);
}

// ============================================================================
// Pipelines
// ============================================================================

#[test]
fn filter_map_sort_pipeline() {
    let mut people = staff();

    let working_age = predicate::value_between("age", 18, 65);
    let adults = working_age.filter(&people).unwrap();
    let adult_names: Vec<_> = adults
        .iter()
        .map(|p| transform::string("name").apply(*p).unwrap().unwrap())
        .collect();
    assert_eq!(adult_names, vec!["Cid", "Bob"]);

    ordering::property("age").sort(&mut people).unwrap();
    assert_eq!(names(&people), vec!["Ann", "Bob", "Cid", "Dee"]);

    ordering::property_as::<String>("name")
        .direction(Dir::Desc)
        .sort(&mut people)
        .unwrap();
    assert_eq!(names(&people), vec!["Dee", "Cid", "Bob", "Ann"]);
}

#[test]
fn sum_through_streams() {
    let people = staff();
    let total: i32 = people
        .iter()
        .flat_map(|p| transform::int_stream("age").apply(p).unwrap())
        .sum();
    assert_eq!(total, 41 + 17 + 30 + 65);
}

#[test]
fn combined_predicates() {
    let people = staff();
    let teen_or_named_dee = predicate::value_between("age", 13, 20)
        .or(predicate::value_equals("name", "Dee"));
    let matched = teen_or_named_dee.filter(&people).unwrap();
    assert_eq!(names_of(&matched), vec!["Ann", "Dee"]);

    let without_email = predicate::value_is_null("email");
    assert_eq!(without_email.filter(&people).unwrap().len(), people.len());
    assert!(without_email.negate().filter(&people).unwrap().is_empty());
}

fn names_of(items: &[&DynamicObject]) -> Vec<String> {
    items
        .iter()
        .map(|p| transform::string("name").apply(*p).unwrap().unwrap_or_default())
        .collect()
}

// ============================================================================
// Mutation
// ============================================================================

#[test]
fn mutate_then_query() {
    let mut people = staff();
    mutation::set_value("email", "team@example.org")
        .apply_all(&mut people)
        .unwrap();
    assert!(predicate::value_is_null("email")
        .filter(&people)
        .unwrap()
        .is_empty());

    mutation::set_null("email").accept(&mut people[0]).unwrap();
    assert_eq!(transform::value("email").apply(&people[0]), Ok(None));
}

#[test]
fn set_reference() {
    let boss = person(9, "Zed", 50).into_shared();
    let mut bob = person(3, "Bob", 30);
    mutation::set_value("manager", boss.clone())
        .accept(&mut bob)
        .unwrap();

    let value = transform::value("manager").apply(&bob).unwrap().unwrap();
    let stored = value.as_object().unwrap();
    assert_eq!(stored, &boss);
    assert_eq!(transform::id_as::<i64>().apply(stored.object()), Ok(9));
}

#[test]
fn mutation_type_rejected_by_adapter() {
    let mut bob = person(3, "Bob", 30);
    let err = mutation::set_value("age", "thirty")
        .accept(&mut bob)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    assert_eq!(transform::to_int("age").apply(&bob), Ok(30));
}

#[test]
fn many_valued_feature() {
    let mut bob = person(3, "Bob", 30);
    assert_eq!(
        transform::value("tags").apply(&bob),
        Ok(Some(Value::List(vec![])))
    );

    let tags = Value::List(vec!["admin".into(), "ops".into()]);
    mutation::set_value("tags", tags.clone())
        .accept(&mut bob)
        .unwrap();
    assert_eq!(
        transform::value_as::<Vec<Value>>("tags").apply(&bob),
        Ok(Some(vec!["admin".into(), "ops".into()]))
    );
    let stored = transform::value("tags").apply(&bob).unwrap().unwrap();
    let first = stored.as_list().and_then(|tags| tags.first());
    assert_eq!(first.and_then(Value::as_str), Some("admin"));

    let tags_feature = bob.feature("tags").unwrap();
    assert!(bob.is_set(&tags_feature));
}

// ============================================================================
// Ordering
// ============================================================================

#[test]
fn unset_values_fail_unless_tolerated() {
    let mut people = vec![
        DynamicObject::new(person_class()).with("name", "Nobody").unwrap(),
        person(1, "Cid", 41),
        person(2, "Ann", 17),
    ];
    let err = ordering::property("age").sort(&mut people).unwrap_err();
    assert!(matches!(err, StructError::NullValue { .. }));
    assert_eq!(names(&people), vec!["Nobody", "Cid", "Ann"]);

    ordering::nulls_last("age").sort(&mut people).unwrap();
    assert_eq!(names(&people), vec!["Ann", "Cid", "Nobody"]);
}

#[test]
fn mixed_values_fail_without_panicking() {
    let class = Class::builder("Cell")
        .attribute("label", ValueType::String)
        .attribute("content", ValueType::Any)
        .build()
        .unwrap();
    let mut cells: Vec<_> = (0..150)
        .map(|i| {
            let cell = DynamicObject::new(class.clone())
                .with("label", format!("c{i}").as_str())
                .unwrap();
            if i % 7 == 0 {
                cell.with("content", "text").unwrap()
            } else {
                cell.with("content", (i * 37) % 101).unwrap()
            }
        })
        .collect();
    let labels = transform::string("label");
    let before = labels.collect(&cells).unwrap();

    let err = ordering::property("content").sort(&mut cells).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    assert_eq!(labels.collect(&cells).unwrap(), before);
}

#[test]
fn comparator_reports_first_error() {
    let by_manager = ordering::property("manager");
    let a = person(1, "Cid", 41)
        .with("manager", person(9, "Zed", 50).into_shared())
        .unwrap();
    let b = person(2, "Ann", 17)
        .with("manager", person(8, "Yan", 50).into_shared())
        .unwrap();
    let err = by_manager.compare(&a, &b).unwrap_err();
    assert!(matches!(err, StructError::NotComparable { .. }));

    let mut items = vec![a, b];
    assert!(by_manager.sort(&mut items).is_err());
}

#[test]
fn compare_by_handle() {
    let class = person_class();
    let age = Arc::clone(class.feature("age").unwrap());
    let cmp = ordering::property(&age).then_comparing(ordering::property("name"));
    assert_eq!(
        cmp.compare(&person(1, "Ann", 30), &person(2, "Bob", 30)),
        Ok(Ordering::Less)
    );
    assert_eq!(
        cmp.compare(&person(1, "Ann", 31), &person(2, "Bob", 30)),
        Ok(Ordering::Greater)
    );
}

// ============================================================================
// Sharing
// ============================================================================

#[test]
fn function_values_are_shareable() {
    fn assert_send_sync<T: Send + Sync + Clone>() {}
    assert_send_sync::<structfn::Predicate>();
    assert_send_sync::<structfn::Transform<Option<Value>>>();
    assert_send_sync::<structfn::Consumer>();
    assert_send_sync::<structfn::Comparator>();

    let adult = predicate::value_between("age", 18, 200);
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let adult = adult.clone();
            std::thread::spawn(move || adult.test(&person(i, "T", 10 * i as i32)).unwrap())
        })
        .collect();
    let results: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results, vec![false, false, true, true]);
}
