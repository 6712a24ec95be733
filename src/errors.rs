//! Error types for chart composition and export

use thiserror::Error;

/// Result type alias for chart operations
pub type Result<T> = std::result::Result<T, ChartError>;

/// Errors that can occur while composing or rendering a chart
#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Missing required column: {name}")]
    MissingColumn { name: String },

    #[error("Length mismatch in {context}: expected {expected}, got {actual}")]
    LengthMismatch {
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Nothing to draw: the axes have no data")]
    EmptyChart,

    #[error("Chart rendering failed: {message}")]
    Rendering { message: String },

    #[error("File I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl ChartError {
    pub(crate) fn missing_column(name: &str) -> Self {
        ChartError::MissingColumn {
            name: name.to_string(),
        }
    }

    /// Fails with `LengthMismatch` unless `actual == expected`
    pub(crate) fn check_len(context: &'static str, expected: usize, actual: usize) -> Result<()> {
        if expected == actual {
            Ok(())
        } else {
            Err(ChartError::LengthMismatch {
                context,
                expected,
                actual,
            })
        }
    }
}

impl<T: std::error::Error + Send + Sync + 'static> From<plotters::drawing::DrawingAreaErrorKind<T>>
    for ChartError
{
    fn from(err: plotters::drawing::DrawingAreaErrorKind<T>) -> Self {
        ChartError::Rendering {
            message: format!("Drawing area error: {}", err),
        }
    }
}
