//! Mapping pages of entities into pages of DTOs.
//!
//! Conversions are explicit: either a `TryFrom`/`From` impl on the target
//! type or a closure. Elements are mapped one by one in order; the total
//! element count and the page request carry over unchanged. The first
//! failing element aborts the whole call with an `ErrorKind::Mapping`
//! error wrapping the conversion's own error.

use crudkit_core::error::{AppError, BoxError};
use crudkit_core::result::AppResult;
use crudkit_core::types::Page;

/// Map every element of `page` through `D`'s `TryFrom<S>` impl.
///
/// Types with an infallible `From<S>` impl qualify through the standard
/// blanket `TryFrom` impl.
pub fn map_page<S, D>(page: Page<S>) -> AppResult<Page<D>>
where
    D: TryFrom<S>,
    <D as TryFrom<S>>::Error: Into<BoxError>,
{
    map_page_with(page, <D as TryFrom<S>>::try_from)
}

/// Map every element of `page` through `convert`.
pub fn map_page_with<S, D, F, Er>(page: Page<S>, mut convert: F) -> AppResult<Page<D>>
where
    F: FnMut(S) -> Result<D, Er>,
    Er: Into<BoxError>,
{
    let (content, total_elements, pageable) = page.into_parts();

    let mapped = content
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            convert(item).map_err(|e| {
                AppError::mapping(format!("Failed to map page element {index}"), e)
            })
        })
        .collect::<AppResult<Vec<D>>>()?;

    Page::new(mapped, total_elements, pageable)
}
