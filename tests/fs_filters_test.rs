use std::fs;

use pipen_filters::renderer::{MiniJinjaRenderer, TemplateRenderer};
use serde_json::json;
use tempfile::TempDir;

fn render(template: &str, context: serde_json::Value) -> String {
    MiniJinjaRenderer::new().render(template, &context).unwrap()
}

/// Evaluates a template expression for its truthiness.
fn holds(expr: &str, context: &serde_json::Value) -> bool {
    render(&format!("{{{{ 'y' if ({expr}) else 'n' }}}}"), context.clone()) == "y"
}

fn fixture() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("data.txt"), "abc").unwrap();
    fs::write(dir.path().join("blank.txt"), "  \n\t").unwrap();
    fs::write(dir.path().join("empty.txt"), "").unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    dir
}

#[test]
fn test_type_checks() {
    let dir = fixture();
    let context = json!({
        "file": dir.path().join("data.txt"),
        "dir": dir.path().join("sub"),
        "missing": dir.path().join("missing"),
    });

    assert!(holds("file | isfile", &context));
    assert!(!holds("file | isdir", &context));
    assert!(holds("file | exists", &context));
    assert!(holds("dir | isdir", &context));
    assert!(!holds("dir | isfile", &context));
    assert!(!holds("missing | exists", &context));
    assert!(!holds("missing | islink", &context));
}

#[test_log::test]
fn test_stat_filters() {
    let dir = fixture();
    let context = json!({
        "file": dir.path().join("data.txt"),
        "missing": dir.path().join("missing"),
    });

    assert_eq!(render("{{ file | getsize }}", context.clone()), "3");
    assert!(holds("getmtime(file) > 0", &context));
    assert!(holds("getctime(file) > 0", &context));
    assert!(holds("getatime(file) > 0", &context));
    assert_eq!(
        render(
            "{{ missing | getsize }} {{ missing | getmtime }} {{ missing | getctime }} {{ missing | getatime }}",
            context
        ),
        "-1 -1 -1 -1"
    );
}

#[test]
fn test_cloud_paths_degrade() {
    let context = json!({"path": "s3://bucket/key.txt"});
    assert!(!holds("path | exists", &context));
    assert_eq!(render("{{ path | getsize }}", context), "-1");
}

#[test]
fn test_isempty() {
    let dir = fixture();
    let context = json!({
        "data": dir.path().join("data.txt"),
        "blank": dir.path().join("blank.txt"),
        "empty": dir.path().join("empty.txt"),
        "missing": dir.path().join("missing"),
        "dir": dir.path().join("sub"),
    });

    assert!(!holds("data | isempty", &context));
    assert!(holds("blank | isempty", &context));
    assert!(!holds("blank | isempty(ignore_ws=false)", &context));
    assert!(holds("empty | isempty(false)", &context));
    assert!(!holds("missing | isempty", &context));
    assert!(holds("missing | isempty(nonfile_as_empty=true)", &context));
    assert!(holds("dir | isempty(nonfile_as_empty=true)", &context));
}

#[cfg(unix)]
#[test]
fn test_symlinks() {
    let dir = fixture();
    let link = dir.path().join("link.txt");
    std::os::unix::fs::symlink(dir.path().join("data.txt"), &link).unwrap();
    let context = json!({
        "link": link,
        "file": dir.path().join("data.txt"),
        "target": dir.path().join("data.txt").canonicalize().unwrap(),
    });

    assert!(holds("link | islink", &context));
    assert!(!holds("file | islink", &context));
    assert_eq!(
        render("{{ link | readlink }}", context.clone()),
        dir.path().join("data.txt").display().to_string()
    );
    assert!(holds("(link | realpath) == target", &context));

    let result = MiniJinjaRenderer::new().render("{{ file | readlink }}", &context);
    assert!(result.unwrap_err().to_string().contains("is not a symbolic link"));
}

#[test]
fn test_realpath_of_missing_path() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().canonicalize().unwrap();
    let context = json!({"path": base.join("x/../y.txt")});

    assert_eq!(render("{{ path | realpath }}", context), base.join("y.txt").display().to_string());
}
