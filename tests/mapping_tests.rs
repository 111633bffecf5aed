//! Integration tests for the mapping engine.
//!
//! These tests drive the map family through the public API with every kind
//! of extractor, and check the fail-fast contract end to end.

use listwise::{
    Args, Error, ErrorKind, Extractor, FieldPath, FillPolicy, Function, Instability, List, Param,
    PathStep, TableOptions, Value, for_each, map_any, map_bool, map_float, map_int, map_table,
    map_table_with, map_text, map_typed,
};
use parking_lot::Mutex;
use rstest::{fixture, rstest};
use std::sync::Arc;

// =============================================================================
// Fixtures
// =============================================================================

fn ints(values: &[i64]) -> Value {
    Value::from(values.iter().copied().map(Value::from).collect::<List>())
}

#[fixture]
fn users() -> List {
    let user = |name: &str, age: i64, city: &str| {
        Value::from(List::from_named([
            ("name", Value::from(name)),
            ("age", Value::from(age)),
            (
                "address",
                Value::from(List::from_named([("city", Value::from(city))])),
            ),
            ("scores", ints(&[age / 10, age % 10])),
        ]))
    };
    List::from_named([
        ("u1", user("ada", 36, "london")),
        ("u2", user("grace", 85, "new york")),
        ("u3", user("alan", 41, "wilmslow")),
    ])
}

fn length() -> Function {
    Function::unary(|value| Ok(Value::from(i64::try_from(value.child_count()).unwrap_or(i64::MAX))))
}

// =============================================================================
// Scenarios
// =============================================================================

#[rstest]
fn test_map_int_lengths_of_nested_lists() {
    let nested = List::from_values([ints(&[1, 2]), ints(&[3]), ints(&[4, 5, 6])]);
    assert_eq!(map_int(&nested, length()).unwrap(), vec![2, 1, 3]);
}

#[rstest]
fn test_map_any_keeps_length_and_names(users: List) {
    let result = map_any(&users, length()).unwrap();
    assert_eq!(result.len(), users.len());
    assert_eq!(result.names(), users.names());
}

// =============================================================================
// Extractor shorthands
// =============================================================================

#[rstest]
fn test_field_name_extractor(users: List) {
    let names = map_text(&users, "name").unwrap();
    assert_eq!(names.values(), &["ada", "grace", "alan"]);
    assert_eq!(names.get_named("u2"), Some(&"grace".to_string()));
}

#[rstest]
fn test_path_extractor(users: List) {
    let cities = map_text(&users, ["address", "city"]).unwrap();
    assert_eq!(cities.values(), &["london", "new york", "wilmslow"]);

    let first_score =
        map_int(&users, FieldPath::new([PathStep::from("scores"), PathStep::from(0)])).unwrap();
    assert_eq!(first_score.values(), &[3, 8, 4]);
}

#[rstest]
fn test_positional_extractor() {
    let rows = List::from_values([ints(&[1, 2]), ints(&[3, 4])]);
    assert_eq!(map_int(&rows, 1).unwrap(), vec![2, 4]);

    let error = map_int(&rows, 2).unwrap_err();
    assert_eq!(error.root(), &Error::IndexError { index: 2, length: 2 });
    assert_eq!(error.index(), Some(0));

    assert_eq!(map_int(&rows, -1).unwrap_err().kind(), ErrorKind::IndexError);
}

#[rstest]
fn test_missing_field_fails_unless_defaulted(users: List) {
    let error = map_any(&users, "email").unwrap_err();
    assert_eq!(error.kind(), ErrorKind::MissingField);
    assert_eq!(error.index(), Some(0));

    let emails = map_any(&users, Extractor::field("email").with_default("none")).unwrap();
    assert!(emails.iter().all(|email| email == &Value::from("none")));
}

#[rstest]
fn test_path_through_scalar_is_type_mismatch(users: List) {
    let error = map_any(&users, ["name", "first"]).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::TypeMismatch);
}

#[rstest]
fn test_function_with_extra_arguments() {
    let params = [Param::required("x"), Param::optional("exponent", 2)];
    let power = Function::with_params(params, |args| {
        let x = args.named("x").and_then(Value::as_int).unwrap_or(0);
        let exponent = args.named("exponent").and_then(Value::as_int).unwrap_or(1);
        Ok(Value::from(x.pow(u32::try_from(exponent).unwrap_or(0))))
    });
    let numbers = List::from_values([Value::from(2), Value::from(3)]);

    assert_eq!(map_int(&numbers, power.clone()).unwrap(), vec![4, 9]);
    let cubes = Extractor::from(power).with_args(Args::new().with_named("exponent", 3));
    assert_eq!(map_int(&numbers, cubes).unwrap(), vec![8, 27]);
}

// =============================================================================
// Type stability
// =============================================================================

#[rstest]
#[case(Value::from(1.5), Instability::Lossy { found: "1.5".to_string() })]
#[case(Value::from("7"), Instability::Type { found: "text" })]
#[case(Value::null(), Instability::Arity { length: 0 })]
#[case(ints(&[1, 2]), Instability::Arity { length: 2 })]
#[case(ints(&[1]), Instability::Type { found: "list" })]
fn test_map_int_never_coerces(#[case] bad: Value, #[case] reason: Instability) {
    let list = List::from_values([Value::from(1), bad]);
    let identity = Function::unary(|value| Ok(value.clone()));
    assert_eq!(
        map_int(&list, identity).unwrap_err(),
        Error::TypeStability {
            index: 1,
            expected: "int",
            reason,
        }
    );
}

#[rstest]
fn test_lossless_conversions() {
    let identity = Function::unary(|value| Ok(value.clone()));
    let list = List::from_values([Value::from(true), Value::from(2.0)]);
    assert_eq!(map_int(&list, identity.clone()).unwrap(), vec![1, 2]);
    assert_eq!(map_float(&list, identity.clone()).unwrap(), vec![1.0, 2.0]);
    assert_eq!(
        map_bool(&List::from_values([Value::from(false)]), identity.clone()).unwrap(),
        vec![false]
    );
    assert_eq!(
        map_typed::<String>(&List::from_values([Value::from("x")]), identity).unwrap(),
        vec!["x".to_string()]
    );
}

// =============================================================================
// Fail-fast and ordering
// =============================================================================

#[rstest]
fn test_failure_reports_index_and_reason() {
    let list = List::from_values([Value::from(1), Value::from(0), Value::from(2)]);
    let reciprocal = Function::unary(|value| match value.as_int() {
        Some(0) => Err(Error::failed("division by zero")),
        Some(number) => Ok(Value::from(1.0 / number as f64)),
        None => Err(Error::failed("not a number")),
    });
    let error = map_float(&list, reciprocal).unwrap_err();
    assert_eq!(error.index(), Some(1));
    assert_eq!(error.kind(), ErrorKind::Failed);
    assert_eq!(error.to_string(), "in index 1: division by zero");
}

#[rstest]
fn test_for_each_visits_in_order_and_chains(users: List) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let record = Function::unary(move |user| {
        sink.lock().push(Extractor::field("name").apply(user)?);
        Ok(Value::null())
    });
    let returned = for_each(&users, record).unwrap();
    assert_eq!(returned, users);
    assert_eq!(
        *seen.lock(),
        vec![Value::from("ada"), Value::from("grace"), Value::from("alan")]
    );
}

// =============================================================================
// Tables
// =============================================================================

#[rstest]
fn test_map_table_binds_rows(users: List) {
    let summary = Function::unary(|user| {
        let name = Extractor::field("name").apply(user)?;
        let age = Extractor::field("age").apply(user)?;
        Ok(Value::from(List::from_named([("name", name), ("age", age)])))
    });
    let table = map_table(&users, summary).unwrap();
    assert_eq!(table.columns(), &["name", "age"]);
    assert_eq!(table.row_count(), 3);
    assert_eq!(table.cell(2, "name"), Some(&Value::from("alan")));
    assert_eq!(
        table.column("age"),
        Some(List::from_values([Value::from(36), Value::from(85), Value::from(41)]))
    );
}

#[rstest]
fn test_map_table_fill_policies() {
    let records = List::from_values([
        Value::from(List::from_named([("a", 1)])),
        Value::from(List::from_named([("a", 2), ("b", 3)])),
    ]);
    let identity = Function::unary(|value| Ok(value.clone()));

    let table = map_table(&records, identity.clone()).unwrap();
    assert_eq!(table.row(0), Some(List::from_named([("a", Value::from(1)), ("b", Value::null())])));

    let strict = TableOptions::new().with_fill(FillPolicy::Strict);
    let error = map_table_with(&records, identity, &strict).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::TableShape);
    assert_eq!(error.index(), Some(1));
}
