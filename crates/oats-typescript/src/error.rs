use oats_core::error::TransformError;

/// Errors from turning a document into a TypeScript module.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error("failed to render module: {0}")]
    Render(#[from] minijinja::Error),
}
