//! Integration tests for mapping listed pages into DTO pages.

mod helpers;

use crudkit::prelude::*;
use helpers::{Article, ArticleDto, TestApp};

#[tokio::test]
async fn test_list_then_map_preserves_page() {
    let app = TestApp::new();
    app.seed(vec![
        Article::new("a", &["x"]),
        Article::new("b", &[]),
        Article::new("c", &["x", "y"]),
    ])
    .await;

    let source = app.service.list(&PageRequest::new(1, 2)).await.unwrap();
    let expected: Vec<ArticleDto> = source
        .content()
        .iter()
        .cloned()
        .map(|a| ArticleDto::try_from(a).unwrap())
        .collect();

    let mapped: Page<ArticleDto> = map_page(source.clone()).unwrap();

    assert_eq!(mapped.total_elements(), source.total_elements());
    assert_eq!(mapped.pageable(), source.pageable());
    assert_eq!(mapped.content(), expected.as_slice());
    assert_eq!(
        mapped.content().iter().map(|d| d.title.as_str()).collect::<Vec<_>>(),
        vec!["a", "b"]
    );
}

#[tokio::test]
async fn test_mapping_failure_aborts_whole_page() {
    let unsaved = vec![
        Article {
            id: Some(1),
            ..Article::new("kept", &[])
        },
        Article::new("unsaved", &[]),
    ];
    let page = Page::new(unsaved, 2, PageRequest::unpaged()).unwrap();

    let err = map_page::<Article, ArticleDto>(page).unwrap_err();

    assert_eq!(err.kind, ErrorKind::Mapping);
    assert_eq!(err.message, "Failed to map page element 1");
    assert_eq!(
        err.source.as_ref().map(|e| e.to_string()),
        Some("article 'unsaved' has no key".to_string())
    );
}

#[tokio::test]
async fn test_map_with_explicit_function() {
    let app = TestApp::new();
    app.seed(vec![Article::new("a", &["x", "y"]), Article::new("b", &["z"])])
        .await;

    let page = app.service.list(&PageRequest::unpaged()).await.unwrap();
    let counts = map_page_with(page, |a: Article| Ok::<_, AppError>(a.tags.len())).unwrap();

    assert_eq!(counts.content(), [2, 1]);
    assert_eq!(counts.total_elements(), 2);
}
