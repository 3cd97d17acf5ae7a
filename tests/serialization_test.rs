use std::fs;

use minijinja::Value;
use pipen_filters::filters::serialization::{json_dumps, toml_dumps, toml_loads};
use pipen_filters::renderer::{MiniJinjaRenderer, TemplateRenderer};
use serde_json::json;

fn render(template: &str, context: serde_json::Value) -> pipen_filters::Result<String> {
    MiniJinjaRenderer::new().render(template, &context)
}

fn holds(expr: &str, context: serde_json::Value) -> bool {
    render(&format!("{{{{ 'y' if ({expr}) else 'n' }}}}"), context).unwrap() == "y"
}

#[test]
fn test_json_dumps() {
    assert_eq!(render(r#"{{ {"a": 1} | json }}"#, json!({})).unwrap(), r#"{"a": 1}"#);
    assert_eq!(
        render(r#"{{ data | json_dumps }}"#, json!({"data": {"b": [1, "x", null], "a": true}}))
            .unwrap(),
        r#"{"b": [1, "x", null], "a": true}"#
    );
    assert_eq!(json_dumps(Value::from("é")).unwrap(), r#""\u00e9""#);
}

#[test]
fn test_json_loads() {
    let out = render(r#"{{ ('{"a": [1, 2]}' | json_loads).a[1] }}"#, json!({})).unwrap();
    assert_eq!(out, "2");
    assert!(render(r#"{{ "{" | json_loads }}"#, json!({})).is_err());
}

#[test]
fn test_json_round_trip() {
    let data = json!({"x": [1, 2.5, "s"], "y": {"z": null}});
    assert!(holds("(data | json | json_loads) == data", json!({ "data": data })));
}

#[test]
fn test_toml_null_convention() {
    let value = Value::from_serialize(json!({"a": null}));
    assert_eq!(toml_dumps(value).unwrap(), "a = \"null\"\n");

    assert!(holds(r#"('a = "null"' | toml_loads).a is none"#, json!({})));
}

#[test]
fn test_toml_round_trip_with_nested_nulls() {
    let data = json!({"a": null, "e": [1, null], "f": "x", "b": {"c": null, "d": 1}});
    let dumped = toml_dumps(Value::from_serialize(&data)).unwrap();
    assert_eq!(toml_loads(&dumped).unwrap(), Value::from_serialize(&data));

    assert!(holds("(data | toml | toml_loads) == data", json!({ "data": data })));
}

#[test]
fn test_toml_dumps_requires_table() {
    assert!(toml_dumps(Value::from(1)).is_err());
}

#[test]
fn test_json_and_toml_files() {
    let dir = tempfile::tempdir().unwrap();
    let json_file = dir.path().join("data.json");
    let toml_file = dir.path().join("data.toml");
    fs::write(&json_file, r#"{"a": {"b": 2}}"#).unwrap();
    fs::write(&toml_file, "[a]\nb = 3\nc = \"null\"\n").unwrap();
    let context = json!({"json_file": json_file, "toml_file": toml_file});

    assert_eq!(render("{{ (json_file | json_load).a.b }}", context.clone()).unwrap(), "2");
    assert_eq!(render("{{ (toml_file | toml_load).a.b }}", context.clone()).unwrap(), "3");
    assert!(holds("(toml_file | toml_load).a.c is none", context));
}

#[test]
fn test_config_sources() {
    let dir = tempfile::tempdir().unwrap();
    let toml_file = dir.path().join("config.toml");
    let yaml_file = dir.path().join("config.yml");
    fs::write(&toml_file, "[section]\nkey = \"value\"\n").unwrap();
    fs::write(&yaml_file, "section:\n  key: yaml\n").unwrap();
    let context = json!({"toml_file": toml_file, "yaml_file": yaml_file});

    assert_eq!(render("{{ config({'a': 1}).a }}", json!({})).unwrap(), "1");
    assert_eq!(render(r#"{{ config('{"a": 1}', loader="json").a }}"#, json!({})).unwrap(), "1");
    assert_eq!(render(r#"{{ config('a = 2', "toml").a }}"#, json!({})).unwrap(), "2");
    assert_eq!(render("{{ config(toml_file).section.key }}", context.clone()).unwrap(), "value");
    assert_eq!(render("{{ config(yaml_file).section.key }}", context.clone()).unwrap(), "yaml");
    assert_eq!(
        render("{{ config(as_path(toml_file), loader='toml').section.key }}", context).unwrap(),
        "value"
    );
}

#[test]
fn test_config_unknown_loader() {
    let err = render(r#"{{ config('{"a": 1}') }}"#, json!({})).unwrap_err();
    assert!(err.to_string().contains("Unknown loader: None."));

    let err = render(r#"{{ config('a: 1', loader="yaml") }}"#, json!({})).unwrap_err();
    assert!(err.to_string().contains("Unknown loader: yaml."));
}
