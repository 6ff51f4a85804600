use thiserror::Error;

/// Errors raised while loading scenes and meshes.
///
/// Rendering itself never fails; only the inputs to a render do.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid scene JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("OBJ line {line}: {message}")]
    Obj { line: usize, message: String },

    #[error("invalid scene: {0}")]
    Scene(String),
}

pub type Result<T> = std::result::Result<T, Error>;
