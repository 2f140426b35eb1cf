//! Integration tests for JSON Patch partial updates.

mod helpers;

use serde_json::json;

use crudkit::prelude::*;
use helpers::{Article, TestApp};

fn patch(value: serde_json::Value) -> Patch {
    patch_from_value(value).expect("valid patch")
}

#[tokio::test]
async fn test_replace_and_append() {
    let app = TestApp::new();
    app.seed(vec![Article::new("a", &["x"])]).await;

    let patched = app
        .service
        .patch(
            1,
            &patch(json!([
                {"op": "replace", "path": "/name", "value": "b"},
                {"op": "add", "path": "/tags/-", "value": "y"}
            ])),
        )
        .await
        .unwrap();

    let expected = Article {
        id: Some(1),
        name: "b".to_string(),
        tags: vec!["x".to_string(), "y".to_string()],
        summary: None,
    };
    assert_eq!(patched, expected);
    assert_eq!(app.repo.saves(), vec![expected.clone()]);
    assert_eq!(app.service.find_by_id(1).await.unwrap(), expected);
}

#[tokio::test]
async fn test_empty_patch_writes_original_once() {
    let app = TestApp::new();
    let original = app.seed(vec![Article::new("a", &["x", "z"])]).await.remove(0);

    let patched = app.service.patch(1, &patch(json!([]))).await.unwrap();

    assert_eq!(patched, original);
    assert_eq!(app.repo.saves(), vec![original]);
}

#[tokio::test]
async fn test_add_missing_field_leaves_others() {
    let app = TestApp::new();
    let original = app.seed(vec![Article::new("a", &["x"])]).await.remove(0);

    let patched = app
        .service
        .patch(
            1,
            &patch(json!([{"op": "add", "path": "/summary", "value": "short"}])),
        )
        .await
        .unwrap();

    assert_eq!(patched.summary.as_deref(), Some("short"));
    assert_eq!(patched.id, original.id);
    assert_eq!(patched.name, original.name);
    assert_eq!(patched.tags, original.tags);
}

#[tokio::test]
async fn test_failed_test_operation_writes_nothing() {
    let app = TestApp::new();
    let original = app.seed(vec![Article::new("a", &["x"])]).await.remove(0);

    let err = app
        .service
        .patch(
            1,
            &patch(json!([
                {"op": "replace", "path": "/name", "value": "b"},
                {"op": "test", "path": "/name", "value": "not-b"}
            ])),
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Patch);
    assert!(err.source.is_some());
    assert!(app.repo.saves().is_empty());
    assert_eq!(app.service.find_by_id(1).await.unwrap(), original);
}

#[tokio::test]
async fn test_invalid_path_writes_nothing() {
    let app = TestApp::new();
    app.seed(vec![Article::new("a", &[])]).await;

    let err = app
        .service
        .patch(
            1,
            &patch(json!([{"op": "replace", "path": "/tags/4", "value": "q"}])),
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Patch);
    assert!(app.repo.saves().is_empty());
}

#[tokio::test]
async fn test_shape_mismatch_is_conversion_failure() {
    let app = TestApp::new();
    app.seed(vec![Article::new("a", &["x"])]).await;

    let err = app
        .service
        .patch(
            1,
            &patch(json!([{"op": "replace", "path": "/tags", "value": 5}])),
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Conversion);
    assert_eq!(err.message, "Failed to convert json document to entity");
    assert!(app.repo.saves().is_empty());
}

#[tokio::test]
async fn test_patch_missing_entity_is_not_found() {
    let app = TestApp::new();

    let err = app
        .service
        .patch(5, &patch(json!([{"op": "remove", "path": "/summary"}])))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::NotFound);
    assert!(app.repo.saves().is_empty());
}

#[tokio::test]
async fn test_patch_parsed_from_text() {
    let app = TestApp::new();
    app.seed(vec![Article::new("a", &["x", "y"])]).await;

    let parsed = parse_patch(r#"[{"op": "remove", "path": "/tags/0"}]"#).unwrap();
    let patched = app.service.patch(1, &parsed).await.unwrap();

    assert_eq!(patched.tags, vec!["y".to_string()]);
}

#[tokio::test]
async fn test_sequential_patches_compose() {
    let app = TestApp::new();
    app.seed(vec![Article::new("a", &[])]).await;

    let rename = patch(json!([{"op": "replace", "path": "/name", "value": "renamed"}]));
    let tag = patch(json!([{"op": "add", "path": "/tags/-", "value": "t"}]));

    app.service.patch(1, &rename).await.unwrap();
    app.service.patch(1, &tag).await.unwrap();

    let stored = app.service.find_by_id(1).await.unwrap();
    assert_eq!(stored.name, "renamed");
    assert_eq!(stored.tags, vec!["t".to_string()]);
    assert_eq!(app.repo.saves().len(), 2);
}
