use serde_json::{json, Value};
use sheetpress_core::record::{map_records, RecordFormat};

fn strings(values: &[&str]) -> Vec<Value> {
    values.iter().map(|v| json!(v)).collect()
}

fn ab_format() -> RecordFormat {
    RecordFormat::new(Some(json!("---")), ["a", "b"], "overflow")
}

#[test]
fn splits_on_delimiter_and_collects_overflow() {
    let records = map_records(&strings(&["x", "y", "---", "p", "q", "r"]), &ab_format());

    assert_eq!(records.len(), 2);
    assert_eq!(
        serde_json::to_value(&records).unwrap(),
        json!([
            {"a": "x", "b": "y"},
            {"a": "p", "b": "q", "overflow": ["r"]}
        ])
    );
    assert_eq!(records[0].overflow(), None);
    assert_eq!(records[1].overflow(), Some(&[json!("r")][..]));
    assert_eq!(records[1].overflow_key(), Some("overflow"));
}

#[test]
fn no_delimiter_keeps_one_group() {
    let format = RecordFormat::new(None, ["a", "b"], "EXTRA");
    let records = map_records(&strings(&["x", "---", "y", "z"]), &format);

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].get("a"), Some(&json!("x")));
    assert_eq!(records[0].get("b"), Some(&json!("---")));
    assert_eq!(records[0].overflow(), Some(&strings(&["y", "z"])[..]));
}

#[test]
fn delimiter_without_match_keeps_one_group() {
    let records = map_records(&strings(&["x", "y"]), &ab_format());
    assert_eq!(records.len(), 1);
    assert_eq!(serde_json::to_string(&records[0]).unwrap(), r#"{"a":"x","b":"y"}"#);
}

#[test]
fn short_groups_have_absent_fields() {
    let records = map_records(&strings(&["x", "---", "p", "q"]), &ab_format());

    assert!(records[0].is_present("a"));
    assert!(!records[0].is_present("b"));
    assert_eq!(records[0].get("b"), None);
    assert_eq!(serde_json::to_value(&records[0]).unwrap(), json!({"a": "x"}));
    assert!(records[1].is_present("b"));
}

#[test]
fn trailing_delimiter_leaves_an_empty_record() {
    let records = map_records(&strings(&["x", "y", "---"]), &ab_format());
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].iter().count(), 0);
    assert_eq!(serde_json::to_value(&records[1]).unwrap(), json!({}));
}

#[test]
fn empty_input_is_one_empty_record() {
    let records = map_records(&[], &ab_format());
    assert_eq!(records.len(), 1);
    assert!(!records[0].is_present("a"));
}

#[test]
fn group_order_follows_input_order() {
    let records = map_records(&strings(&["1", "---", "2", "---", "3"]), &ab_format());
    let firsts: Vec<&Value> = records.iter().filter_map(|r| r.get("a")).collect();
    assert_eq!(firsts, vec![&json!("1"), &json!("2"), &json!("3")]);
}

#[test]
fn non_string_delimiters_compare_by_value() {
    let format = RecordFormat::new(Some(Value::Null), ["n"], "rest");
    let records = map_records(&[json!(1), Value::Null, json!(2), json!(3)], &format);

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].get("n"), Some(&json!(1)));
    assert_eq!(records[1].overflow(), Some(&[json!(3)][..]));
}

#[test]
fn nulls_become_absent_on_request() {
    let records = map_records(&[json!("x"), Value::Null], &ab_format());
    assert_eq!(records[0].get("b"), Some(&Value::Null));

    let record = records[0].clone().nulls_as_absent();
    assert!(!record.is_present("b"));
    assert_eq!(record.into_json(), json!({"a": "x"}).as_object().unwrap().clone());
}

#[test]
fn null_delimiter_splits_on_null_cells() {
    let format: RecordFormat = serde_json::from_value(json!({
        "delimiter": null,
        "order": ["a"],
        "overflow_key": "x"
    }))
    .unwrap();
    assert_eq!(format.delimiter, Some(Value::Null));

    let records = map_records(&[json!("p"), Value::Null, json!("q")], &format);
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].get("a"), Some(&json!("p")));
    assert_eq!(records[1].get("a"), Some(&json!("q")));

    let unmatched = map_records(&strings(&["p", "q"]), &format);
    assert_eq!(unmatched.len(), 1, "a null delimiter with no match keeps one group");
}

#[test]
fn missing_delimiter_never_splits() {
    let format: RecordFormat =
        serde_json::from_value(json!({"order": ["a"], "overflow_key": "x"})).unwrap();
    assert_eq!(format.delimiter, None);

    let records = map_records(&[json!("p"), Value::Null, json!("q")], &format);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].overflow(), Some(&[Value::Null, json!("q")][..]));
    assert!(!serde_json::to_value(&format).unwrap().as_object().unwrap().contains_key("delimiter"));
}
