use std::{fmt, path::PathBuf};

#[derive(Debug)]
pub enum RenderError {
    Encode(image::ImageError),
    Write { path: PathBuf, source: std::io::Error },
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Encode(err) => write!(f, "Failed to encode icon as PNG: {err}"),
            RenderError::Write { path, source } => {
                write!(f, "Failed to write icon to {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Encode(err) => Some(err),
            RenderError::Write { source, .. } => Some(source),
        }
    }
}

impl From<image::ImageError> for RenderError {
    fn from(err: image::ImageError) -> Self {
        RenderError::Encode(err)
    }
}
