//! Convenience result type alias for crudkit.

use crate::error::AppError;

/// A specialized `Result` type for crudkit operations.
///
/// Every crate in the workspace returns `AppResult` so that store,
/// codec, patch and mapping failures travel through `?` unchanged.
pub type AppResult<T> = Result<T, AppError>;
