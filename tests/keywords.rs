//! One test group per keyword family: pass/fail, message text and paths.

use draft7_validate::{
    validate, FormatRegistry, JsonPath, PathSegment, SchemaError, SchemaRegistry, ValidationResult, Validator,
    ValidatorConfig,
};
use serde_json::{json, Value};

fn run(schema: Value, data: Value) -> ValidationResult {
    validate(&schema, &data, &SchemaRegistry::new()).expect("schema must be accepted")
}

fn messages(result: &ValidationResult) -> Vec<&str> {
    result.errors.iter().map(|e| e.message.as_str()).collect()
}

fn json_path(value: Value) -> JsonPath {
    serde_json::from_value(value).unwrap()
}

// -----------------------------------------------------------------------
// type
// -----------------------------------------------------------------------

#[test]
fn integer_accepts_integral_floats() {
    let schema = json!({"type": "integer"});
    assert!(run(schema.clone(), json!(3)).valid);
    assert!(run(schema.clone(), json!(3.0)).valid);
    assert!(!run(schema.clone(), json!(3.5)).valid);
    assert!(!run(schema, json!("3")).valid);
}

#[test]
fn number_accepts_integers_and_booleans_are_not_numbers() {
    let schema = json!({"type": "number"});
    assert!(run(schema.clone(), json!(1)).valid);
    assert!(run(schema.clone(), json!(-0.5)).valid);
    assert!(!run(schema, json!(true)).valid);
}

#[test]
fn type_list_matches_any_member() {
    let schema = json!({"type": ["string", "null"]});
    assert!(run(schema.clone(), json!(null)).valid);
    assert!(run(schema.clone(), json!("x")).valid);
    let result = run(schema, json!(1));
    assert_eq!(messages(&result), vec![r#"1 is not of type "string", "null""#]);
}

#[test]
fn unknown_type_name_is_a_schema_error() {
    let err = validate(&json!({"type": "float"}), &json!(1), &SchemaRegistry::new()).unwrap_err();
    assert!(matches!(err, SchemaError::Malformed { .. }));
}

// -----------------------------------------------------------------------
// numeric
// -----------------------------------------------------------------------

#[test]
fn inclusive_bounds_accept_the_limit() {
    let schema = json!({"minimum": 1, "maximum": 3});
    assert!(run(schema.clone(), json!(1)).valid);
    assert!(run(schema.clone(), json!(3.0)).valid);
    assert_eq!(messages(&run(schema.clone(), json!(0.5))), vec!["0.5 is less than the minimum of 1"]);
    assert_eq!(messages(&run(schema, json!(4))), vec!["4 is greater than the maximum of 3"]);
}

#[test]
fn exclusive_bounds_reject_the_limit() {
    let schema = json!({"exclusiveMinimum": 1, "exclusiveMaximum": 3});
    assert!(run(schema.clone(), json!(2)).valid);
    assert_eq!(
        messages(&run(schema.clone(), json!(1))),
        vec!["1 is less than or equal to the minimum of 1"]
    );
    assert_eq!(
        messages(&run(schema, json!(3))),
        vec!["3 is greater than or equal to the maximum of 3"]
    );
}

#[test]
fn large_integers_compare_exactly() {
    let schema = json!({"maximum": 9007199254740992u64});
    assert!(run(schema.clone(), json!(9007199254740992u64)).valid);
    assert!(!run(schema, json!(9007199254740993u64)).valid);
}

#[test]
fn multiple_of_handles_integers_and_decimals() {
    assert!(run(json!({"multipleOf": 3}), json!(9)).valid);
    assert!(run(json!({"multipleOf": 3}), json!(-9)).valid);
    assert!(run(json!({"multipleOf": 0.5}), json!(4.5)).valid);
    assert!(run(json!({"multipleOf": 2}), json!(4.0)).valid);
    assert_eq!(
        messages(&run(json!({"multipleOf": 3}), json!(10))),
        vec!["10 is not a multiple of 3"]
    );
    assert!(!run(json!({"multipleOf": 0.5}), json!(4.2)).valid);
}

#[test]
fn non_numbers_pass_numeric_keywords() {
    assert!(run(json!({"minimum": 10, "multipleOf": 7}), json!("text")).valid);
}

#[test]
fn non_positive_multiple_of_is_a_schema_error() {
    let err = Validator::new(&json!({"multipleOf": 0})).unwrap_err();
    assert!(matches!(err, SchemaError::Malformed { .. }));
}

// -----------------------------------------------------------------------
// string
// -----------------------------------------------------------------------

#[test]
fn length_counts_code_points() {
    let schema = json!({"minLength": 2, "maxLength": 3});
    assert!(run(schema.clone(), json!("ñé")).valid);
    assert!(run(schema.clone(), json!("日本語")).valid);
    assert_eq!(messages(&run(schema.clone(), json!("a"))), vec![r#""a" is too short"#]);
    assert_eq!(messages(&run(schema, json!("abcd"))), vec![r#""abcd" is too long"#]);
}

#[test]
fn pattern_is_unanchored() {
    let schema = json!({"pattern": "b+"});
    assert!(run(schema.clone(), json!("abbbc")).valid);
    assert_eq!(messages(&run(schema, json!("ac"))), vec![r#""ac" does not match "b+""#]);
}

#[test]
fn invalid_pattern_is_a_schema_error() {
    let err = Validator::new(&json!({"pattern": "("})).unwrap_err();
    assert!(matches!(err, SchemaError::InvalidPattern { .. }));
}

// -----------------------------------------------------------------------
// format
// -----------------------------------------------------------------------

#[test]
fn known_formats_are_asserted() {
    assert!(run(json!({"format": "date"}), json!("2024-02-29")).valid);
    assert!(!run(json!({"format": "date"}), json!("2024-02-30")).valid);
    assert!(run(json!({"format": "date-time"}), json!("2024-01-01T12:00:00Z")).valid);
    assert!(run(json!({"format": "ipv4"}), json!("192.168.0.1")).valid);
    assert!(!run(json!({"format": "ipv4"}), json!("256.0.0.1")).valid);
    assert!(run(json!({"format": "ipv6"}), json!("::1")).valid);
    assert!(run(json!({"format": "email"}), json!("a@example.com")).valid);
    assert!(run(json!({"format": "uri"}), json!("https://example.com/x")).valid);
    assert!(!run(json!({"format": "uri"}), json!("not a uri")).valid);
    assert!(run(json!({"format": "json-pointer"}), json!("/a/~0b")).valid);
    assert!(!run(json!({"format": "json-pointer"}), json!("a/b")).valid);

    let result = run(json!({"format": "ipv4"}), json!("x"));
    assert_eq!(messages(&result), vec![r#""x" is not a "ipv4""#]);
}

#[test]
fn unknown_formats_and_non_strings_pass() {
    assert!(run(json!({"format": "color"}), json!("#fff")).valid);
    assert!(run(json!({"format": "ipv4"}), json!(42)).valid);
}

#[test]
fn formats_can_be_annotation_only() {
    let schema = json!({"format": "ipv4"});
    let config = ValidatorConfig {
        assert_formats: false,
        ..ValidatorConfig::default()
    };
    let validator = Validator::with_options(&schema, config, FormatRegistry::draft7()).unwrap();
    assert!(validator.is_valid(&json!("nope"), &SchemaRegistry::new()).unwrap());
}

#[test]
fn custom_format_checkers_are_used() {
    let mut formats = FormatRegistry::new();
    formats.register("even-length", |s| s.chars().count() % 2 == 0);

    let schema = json!({"format": "even-length"});
    let validator = Validator::with_options(&schema, ValidatorConfig::default(), formats).unwrap();
    let registry = SchemaRegistry::new();
    assert!(validator.is_valid(&json!("ab"), &registry).unwrap());
    assert!(!validator.is_valid(&json!("abc"), &registry).unwrap());
}

// -----------------------------------------------------------------------
// arrays
// -----------------------------------------------------------------------

#[test]
fn items_single_schema_applies_to_every_element() {
    let result = run(json!({"items": {"type": "integer"}}), json!([1, "a", 2, "b"]));
    let paths: Vec<&JsonPath> = result.errors.iter().map(|e| &e.instance_path).collect();
    assert_eq!(paths, vec![&json_path(json!([1])), &json_path(json!([3]))]);
    assert_eq!(result.errors[0].schema_path, json_path(json!(["items", "type"])));
}

#[test]
fn items_tuple_applies_by_position() {
    let schema = json!({"items": [{"type": "string"}, {"type": "integer"}]});
    assert!(run(schema.clone(), json!(["a", 1, null, {}])).valid);
    assert!(run(schema.clone(), json!(["a"])).valid);

    let result = run(schema, json!([1, 1]));
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].instance_path, json_path(json!([0])));
    assert_eq!(result.errors[0].schema_path, json_path(json!(["items", 0, "type"])));
}

#[test]
fn additional_items_only_follows_a_tuple() {
    let schema = json!({"items": [{"type": "string"}], "additionalItems": false});
    assert!(run(schema.clone(), json!(["a"])).valid);
    assert_eq!(
        messages(&run(schema.clone(), json!(["a", 1, 2]))),
        vec!["Additional items are not allowed (1, 2 were unexpected)"]
    );
    assert_eq!(
        messages(&run(schema, json!(["a", null]))),
        vec!["Additional items are not allowed (null was unexpected)"]
    );

    let typed = json!({"items": [{}], "additionalItems": {"type": "integer"}});
    let result = run(typed, json!([null, 1, "x"]));
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].instance_path, json_path(json!([2])));
    assert_eq!(result.errors[0].schema_path, json_path(json!(["additionalItems", "type"])));

    assert!(run(json!({"items": {}, "additionalItems": false}), json!([1, 2, 3])).valid);
    assert!(run(json!({"additionalItems": false}), json!([1, 2, 3])).valid);
}

#[test]
fn item_counts() {
    let schema = json!({"minItems": 1, "maxItems": 2});
    assert_eq!(messages(&run(schema.clone(), json!([]))), vec!["[] is too short"]);
    assert_eq!(messages(&run(schema.clone(), json!([1, 2, 3]))), vec!["[1,2,3] is too long"]);
    assert!(run(schema, json!([1])).valid);
}

#[test]
fn unique_items_uses_json_equality() {
    let schema = json!({"uniqueItems": true});
    assert!(run(schema.clone(), json!([1, "1", [1], {"a": 1}])).valid);
    assert!(!run(schema.clone(), json!([1, 1.0])).valid);
    assert!(!run(schema.clone(), json!([{"a": 1, "b": 2}, {"b": 2, "a": 1}])).valid);
    assert_eq!(
        messages(&run(schema, json!([1, 2, 1]))),
        vec!["[1,2,1] has non-unique elements"]
    );
    assert!(run(json!({"uniqueItems": false}), json!([1, 1])).valid);
}

#[test]
fn unique_items_agrees_with_enum_on_large_integral_floats() {
    let big = json!([9_007_199_254_740_994_i64, 9_007_199_254_740_994.0_f64]);
    assert!(!run(json!({"uniqueItems": true}), big.clone()).valid);
    assert!(run(json!({"enum": [9_007_199_254_740_994_i64]}), big[1].clone()).valid);

    let distinct = json!([9_007_199_254_740_993_i64, 9_007_199_254_740_992.0_f64]);
    assert!(run(json!({"uniqueItems": true}), distinct).valid);
}

#[test]
fn contains_needs_one_matching_element() {
    let schema = json!({"contains": {"const": 5}});
    assert!(run(schema.clone(), json!([1, 5])).valid);
    assert_eq!(
        messages(&run(schema.clone(), json!([1, 2]))),
        vec!["[1,2] does not contain items matching the given schema"]
    );
    assert!(!run(schema, json!([])).valid);
}

// -----------------------------------------------------------------------
// objects
// -----------------------------------------------------------------------

#[test]
fn properties_only_check_present_members() {
    let schema = json!({"properties": {"a": {"type": "string"}, "b": {"type": "string"}}});
    assert!(run(schema.clone(), json!({"a": "x"})).valid);
    assert!(run(schema.clone(), json!([1, 2])).valid);

    let result = run(schema, json!({"b": 2}));
    assert_eq!(result.errors[0].instance_path, json_path(json!(["b"])));
    assert_eq!(result.errors[0].schema_path, json_path(json!(["properties", "b", "type"])));
}

#[test]
fn pattern_properties_match_by_regex() {
    let schema = json!({"patternProperties": {"^x-": {"type": "integer"}}});
    assert!(run(schema.clone(), json!({"x-a": 1, "other": "s"})).valid);

    let result = run(schema, json!({"x-a": "s"}));
    assert_eq!(result.errors[0].instance_path, json_path(json!(["x-a"])));
    assert_eq!(result.errors[0].schema_path, json_path(json!(["patternProperties", "^x-", "type"])));
}

#[test]
fn additional_properties_false_lists_the_extras() {
    let schema = json!({"properties": {"a": {}}, "additionalProperties": false});
    assert!(run(schema.clone(), json!({"a": 1})).valid);
    assert_eq!(
        messages(&run(schema.clone(), json!({"a": 1, "b": 2}))),
        vec![r#"Additional properties are not allowed ("b" was unexpected)"#]
    );
    assert_eq!(
        messages(&run(schema, json!({"c": 1, "b": 2}))),
        vec![r#"Additional properties are not allowed ("c", "b" were unexpected)"#]
    );
}

#[test]
fn additional_properties_false_with_patterns_names_the_regexes() {
    let schema = json!({"patternProperties": {"^x-": {}}, "additionalProperties": false});
    assert!(run(schema.clone(), json!({"x-a": 1})).valid);
    assert_eq!(
        messages(&run(schema, json!({"z": 1, "y": 2}))),
        vec![r#""y", "z" do not match any of the regexes: "^x-""#]
    );
}

#[test]
fn additional_properties_schema_checks_each_extra() {
    let schema = json!({"properties": {"a": {}}, "additionalProperties": {"type": "string"}});
    let result = run(schema, json!({"a": 1, "b": "ok", "c": 3}));
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].instance_path, json_path(json!(["c"])));
    assert_eq!(result.errors[0].schema_path, json_path(json!(["additionalProperties", "type"])));
}

#[test]
fn required_reports_each_missing_name_in_order() {
    let result = run(json!({"required": ["b", "a", "c"]}), json!({"a": 1}));
    assert_eq!(
        messages(&result),
        vec![r#""b" is a required property"#, r#""c" is a required property"#]
    );
    assert!(run(json!({"required": ["a"]}), json!("not an object")).valid);
}

#[test]
fn property_counts() {
    let schema = json!({"minProperties": 1, "maxProperties": 1});
    assert_eq!(
        messages(&run(schema.clone(), json!({}))),
        vec!["{} does not have enough properties"]
    );
    assert_eq!(
        messages(&run(schema.clone(), json!({"a": 1, "b": 2}))),
        vec![r#"{"a":1,"b":2} has too many properties"#]
    );
    assert!(run(schema, json!({"a": 1})).valid);
}

#[test]
fn property_names_are_validated_as_strings_at_the_object() {
    let schema = json!({"propertyNames": {"maxLength": 3}});
    assert!(run(schema.clone(), json!({"abc": 1})).valid);

    let result = run(schema, json!({"abcd": 1}));
    assert_eq!(messages(&result), vec![r#""abcd" is too long"#]);
    assert!(result.errors[0].instance_path.is_empty());
    assert_eq!(result.errors[0].schema_path, json_path(json!(["propertyNames", "maxLength"])));
}

#[test]
fn dependencies_accept_names_or_schemas() {
    let schema = json!({
        "dependencies": {
            "card": ["billing"],
            "gift": {"required": ["recipient"]}
        }
    });
    assert!(run(schema.clone(), json!({"name": "x"})).valid);
    assert!(run(schema.clone(), json!({"card": 1, "billing": 2})).valid);

    let names = run(schema.clone(), json!({"card": 1}));
    assert_eq!(messages(&names), vec![r#""billing" is a dependency of "card""#]);
    assert_eq!(names.errors[0].schema_path, json_path(json!(["dependencies"])));

    let schema_form = run(schema, json!({"gift": true}));
    assert_eq!(messages(&schema_form), vec![r#""recipient" is a required property"#]);
    assert_eq!(
        schema_form.errors[0].schema_path,
        json_path(json!(["dependencies", "gift", "required"]))
    );
}

// -----------------------------------------------------------------------
// annotations and malformed schemas
// -----------------------------------------------------------------------

#[test]
fn annotations_and_unknown_keywords_are_ignored() {
    let schema = json!({
        "title": "t",
        "description": "d",
        "default": 5,
        "examples": [1],
        "$comment": "c",
        "x-vendor": {"type": "string"}
    });
    assert!(run(schema, json!(null)).valid);
}

#[test]
fn malformed_keyword_reports_its_schema_path() {
    let err = Validator::new(&json!({"properties": {"a": {"minLength": -1}}})).unwrap_err();
    match err {
        SchemaError::Malformed { schema_path, .. } => {
            assert_eq!(schema_path, json_path(json!(["properties", "a", "minLength"])));
        }
        other => panic!("expected Malformed, got {other:?}"),
    }
}

#[test]
fn malformed_subschemas_are_refused_before_any_instance() {
    for schema in [
        json!({"items": 3}),
        json!({"required": "a"}),
        json!({"required": ["a", "a"]}),
        json!({"anyOf": []}),
        json!({"enum": "x"}),
        json!({"properties": []}),
        json!({"not": "x"}),
    ] {
        assert!(Validator::new(&schema).is_err(), "{schema} should be refused");
    }
}

#[test]
fn schema_errors_display_the_path() {
    let err = Validator::new(&json!({"items": [{"type": 7}]})).unwrap_err();
    assert!(err.to_string().ends_with("at schema path #/items/0/type"), "{err}");
}

#[test]
fn path_segments_serialize_as_strings_and_integers() {
    let path: JsonPath = vec![PathSegment::from("a"), PathSegment::from(0usize)].into_iter().collect();
    assert_eq!(serde_json::to_value(&path).unwrap(), json!(["a", 0]));
}
