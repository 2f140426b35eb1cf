//! Pagination types for list queries.

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::result::AppResult;
use crate::types::sorting::SortField;

/// Default page size.
pub const DEFAULT_PAGE_SIZE: u64 = 25;
/// Maximum page size.
pub const MAX_PAGE_SIZE: u64 = 100;

/// Request parameters for paginated queries.
///
/// A page size of `None` is the "unpaged" request: the store returns
/// every entity in a single page. Page numbers start at 1 and page sizes
/// stay within `1..=MAX_PAGE_SIZE`, however the request is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PageRequestParams")]
pub struct PageRequest {
    page: u64,
    page_size: Option<u64>,
    /// Sort order, applied left to right.
    pub sort: Vec<SortField>,
}

/// Wire form of [`PageRequest`], normalised on the way in.
#[derive(Deserialize)]
struct PageRequestParams {
    #[serde(default = "default_page")]
    page: u64,
    #[serde(default = "default_page_size")]
    page_size: Option<u64>,
    #[serde(default)]
    sort: Vec<SortField>,
}

impl From<PageRequestParams> for PageRequest {
    fn from(params: PageRequestParams) -> Self {
        let request = match params.page_size {
            Some(size) => Self::new(params.page, size),
            None => Self::unpaged(),
        };
        Self {
            sort: params.sort,
            ..request
        }
    }
}

impl PageRequest {
    /// Create a new page request, clamping the page size to
    /// `1..=MAX_PAGE_SIZE`.
    pub fn new(page: u64, page_size: u64) -> Self {
        Self {
            page: page.max(1),
            page_size: Some(page_size.clamp(1, MAX_PAGE_SIZE)),
            sort: Vec::new(),
        }
    }

    /// Create a request for all entities in one page.
    pub fn unpaged() -> Self {
        Self {
            page: 1,
            page_size: None,
            sort: Vec::new(),
        }
    }

    /// Append a sort field to this request.
    pub fn with_sort(mut self, field: SortField) -> Self {
        self.sort.push(field);
        self
    }

    /// Page number (1-based).
    pub fn page(&self) -> u64 {
        self.page
    }

    /// Number of items per page, `None` when unpaged.
    pub fn page_size(&self) -> Option<u64> {
        self.page_size
    }

    /// Whether this request limits the number of results.
    pub fn is_paged(&self) -> bool {
        self.page_size.is_some()
    }

    /// Number of entities to skip.
    pub fn offset(&self) -> u64 {
        match self.page_size {
            Some(size) => self.page.saturating_sub(1).saturating_mul(size),
            None => 0,
        }
    }

    /// Maximum number of entities to return, `None` when unpaged.
    pub fn limit(&self) -> Option<u64> {
        self.page_size
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: Some(DEFAULT_PAGE_SIZE),
            sort: Vec::new(),
        }
    }
}

/// A bounded slice of a larger result set.
///
/// Carries the total number of elements across all pages and the request
/// that produced it. Construct through [`Page::new`], which checks that the
/// content fits the requested page size and that the total is not smaller
/// than the content.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    /// The items on this page.
    content: Vec<T>,
    /// Total number of items across all pages.
    total_elements: u64,
    /// The request that produced this page.
    pageable: PageRequest,
}

impl<T> Page<T> {
    /// Create a new page.
    pub fn new(content: Vec<T>, total_elements: u64, pageable: PageRequest) -> AppResult<Self> {
        let len = content.len() as u64;
        if let Some(size) = pageable.page_size {
            if len > size {
                return Err(AppError::validation(format!(
                    "Page holds {len} elements but page size is {size}"
                )));
            }
        }
        if total_elements < len {
            return Err(AppError::validation(format!(
                "Total element count {total_elements} is smaller than page content {len}"
            )));
        }
        Ok(Self {
            content,
            total_elements,
            pageable,
        })
    }

    /// Create an empty page for the given request.
    pub fn empty(pageable: PageRequest) -> Self {
        Self {
            content: Vec::new(),
            total_elements: 0,
            pageable,
        }
    }

    /// The items on this page.
    pub fn content(&self) -> &[T] {
        &self.content
    }

    /// Consume the page, returning its items.
    pub fn into_content(self) -> Vec<T> {
        self.content
    }

    /// Total number of items across all pages.
    pub fn total_elements(&self) -> u64 {
        self.total_elements
    }

    /// The request that produced this page.
    pub fn pageable(&self) -> &PageRequest {
        &self.pageable
    }

    /// Number of items on this page.
    pub fn number_of_elements(&self) -> usize {
        self.content.len()
    }

    /// Whether this page has no items.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Total number of pages. Always at least 1.
    pub fn total_pages(&self) -> u64 {
        match self.pageable.page_size {
            Some(size) if self.total_elements > 0 => self.total_elements.div_ceil(size.max(1)),
            _ => 1,
        }
    }

    /// Whether a page follows this one.
    pub fn has_next(&self) -> bool {
        self.pageable.page < self.total_pages()
    }

    /// Whether a page precedes this one.
    pub fn has_previous(&self) -> bool {
        self.pageable.is_paged() && self.pageable.page > 1
    }

    /// Map every item, keeping the total and the request.
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            content: self.content.into_iter().map(f).collect(),
            total_elements: self.total_elements,
            pageable: self.pageable,
        }
    }

    /// Split the page into its parts.
    pub fn into_parts(self) -> (Vec<T>, u64, PageRequest) {
        (self.content, self.total_elements, self.pageable)
    }
}

fn default_page() -> u64 {
    1
}

fn default_page_size() -> Option<u64> {
    Some(DEFAULT_PAGE_SIZE)
}
