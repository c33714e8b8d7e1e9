//! Crate-level error types.

use std::fmt;

/// Errors produced by the comet crate.
#[derive(Debug)]
pub enum CometError {
    /// WGSL shader composition failure (bad import, parse error).
    ShaderCompose(Box<naga_oil::compose::ComposerError>),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Generic I/O failure.
    Io(std::io::Error),
}

impl fmt::Display for CometError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShaderCompose(e) => {
                write!(f, "shader composition failed: {e}")
            }
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for CometError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            // naga-oil's ComposerError only guarantees Display.
            Self::ShaderCompose(_) | Self::OptionsParse(_) => None,
        }
    }
}

impl From<std::io::Error> for CometError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<naga_oil::compose::ComposerError> for CometError {
    fn from(e: naga_oil::compose::ComposerError) -> Self {
        Self::ShaderCompose(Box::new(e))
    }
}
