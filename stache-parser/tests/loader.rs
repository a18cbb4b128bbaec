//! Integration tests for loading templates and their partials from disk.

use stache_parser::stache::error::TokenizeError;
use stache_parser::stache::loader::{LoaderError, TemplateLoader};
use stache_parser::stache::parsing::Options;
use stache_parser::stache::testing::assert_template;
use std::fs;
use std::path::Path;

fn write(dir: &Path, file: &str, contents: &str) {
    fs::write(dir.join(file), contents).expect("Failed to write fixture");
}

#[test]
fn test_load_single_template() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "greeting.mustache", "Hello {{name}}");

    let template = TemplateLoader::new(dir.path()).load("greeting").unwrap();
    assert_template(&template)
        .item_count(2)
        .item(1, |item| {
            item.assert_output().name("name");
        });
}

#[test]
fn test_load_with_partials_is_transitive() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "page.mustache", "{{>header}}{{#rows}}{{>row}}{{/rows}}");
    write(dir.path(), "header.mustache", "<h1>{{title}}</h1>{{>logo small}}");
    write(dir.path(), "row.mustache", "<li>{{.}}</li>");
    write(dir.path(), "logo.mustache", "<img>");

    let set = TemplateLoader::new(dir.path())
        .load_with_partials("page")
        .unwrap();

    assert_eq!(set.root(), "page");
    assert_eq!(set.names(), vec!["header", "logo", "page", "row"]);
    assert_template(set.get("header").unwrap()).partials(&["logo small"]);
}

#[test]
fn test_recursive_partials_terminate() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "tree.mustache",
        "{{name}}{{#children}}{{>tree}}{{/children}}",
    );

    let set = TemplateLoader::new(dir.path())
        .load_with_partials("tree")
        .unwrap();
    assert_eq!(set.len(), 1);
}

#[test]
fn test_missing_partial_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "page.mustache", "{{>nowhere}}");

    let err = TemplateLoader::new(dir.path())
        .load_with_partials("page")
        .unwrap_err();
    match err {
        LoaderError::Io { path, .. } => assert!(path.ends_with("nowhere.mustache")),
        other => panic!("Expected Io error, got {other:?}"),
    }
}

#[test]
fn test_tokenize_error_keeps_source() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "broken.mustache", "{{#open}}never closed");

    let err = TemplateLoader::new(dir.path()).load("broken").unwrap_err();
    match err {
        LoaderError::Tokenize { source, error, .. } => {
            assert_eq!(source, "{{#open}}never closed");
            assert!(matches!(error, TokenizeError::UnclosedSection { .. }));
        }
        other => panic!("Expected Tokenize error, got {other:?}"),
    }
}

#[test]
fn test_loader_options_apply_to_partials() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "page.hbs", "<%>part%>");
    write(dir.path(), "part.hbs", "<%value%>");

    let set = TemplateLoader::new(dir.path())
        .with_extension("hbs")
        .with_options(Options::with_delimiters("<%", "%>"))
        .load_with_partials("page")
        .unwrap();

    assert_template(set.get("part").unwrap()).item(0, |item| {
        item.assert_output().name("value");
    });
}
