use ds_ast::Accessor;
use thiserror::Error;

/// Failures while lowering a pattern.
///
/// Every variant is a contract violation on the input tree. Nothing here is
/// retried; the caller gets the first failure.
#[derive(Debug, Error)]
pub enum LowerError {
    #[error("rest element at index {index} must be the last of {len} elements")]
    MisplacedRest { index: usize, len: usize },

    #[error("unsupported pattern shape: {0}")]
    UnsupportedPattern(&'static str),

    #[error("destructuring declaration of `{0}` has no initializer")]
    MissingInitializer(String),

    #[error("access path starts with `{0}` instead of a base expression")]
    DetachedAccessor(Accessor),

    #[error("failed to render lowered code")]
    Render(#[from] std::io::Error),
}

pub type Result<T, E = LowerError> = std::result::Result<T, E>;
