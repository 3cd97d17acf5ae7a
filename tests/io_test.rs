use std::fs;

use pipen_filters::filters::io::{read_content, Content};
use pipen_filters::path::PanPath;
use pipen_filters::renderer::{MiniJinjaRenderer, TemplateRenderer};
use serde_json::json;

#[test]
fn test_read_and_readlines() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("lines.txt");
    fs::write(&file, "123\n456").unwrap();
    let context = json!({"file": file});
    let renderer = MiniJinjaRenderer::new();

    assert_eq!(renderer.render("{{ file | read }}", &context).unwrap(), "123\n456");
    assert_eq!(renderer.render(r#"{{ file | readlines | join("|") }}"#, &context).unwrap(), "123|456");
    assert_eq!(renderer.render("{{ (file | readlines) | length }}", &context).unwrap(), "2");
}

#[test]
fn test_universal_newlines() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("crlf.txt");
    fs::write(&file, "a\r\nb\rc\n").unwrap();
    let path = PanPath::new(file.to_str().unwrap());

    assert_eq!(read_content(&path, "r").unwrap(), Content::Text("a\nb\nc\n".to_string()));
    assert_eq!(read_content(&path, "rb").unwrap(), Content::Bytes(b"a\r\nb\rc\n".to_vec()));
    assert_eq!(read_content(&path, "rb").unwrap().lines().len(), 3);
}

#[test]
fn test_read_errors() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("data.txt");
    fs::write(&file, "x").unwrap();
    let context = json!({"file": file, "missing": dir.path().join("missing")});
    let renderer = MiniJinjaRenderer::new();

    assert!(renderer.render("{{ missing | read }}", &context).is_err());
    assert!(renderer.render(r#"{{ file | read("w") }}"#, &context).is_err());
    assert!(renderer.render(r#"{{ file | read(encoding="latin-1") }}"#, &context).is_err());
    assert_eq!(renderer.render(r#"{{ file | read(encoding="utf-8") }}"#, &context).unwrap(), "x");
}
