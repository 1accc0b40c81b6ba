//! Error types for the Fresco code generation server.
//!
//! This crate provides the foundation error types used across the Fresco
//! workspace.

mod config;
mod image;
mod model;
mod server;

pub use config::ConfigError;
pub use image::ImageError;
pub use model::ModelError;
pub use server::{ServerError, ServerErrorKind};

/// Crate-level error variants.
///
/// Transport and provider failures carry their own local error types
/// (`TransportError`, `OpenAiError`) and convert into these at the crate
/// boundary.
#[derive(Debug, derive_more::From)]
pub enum FrescoErrorKind {
    /// Configuration error
    Config(ConfigError),
    /// Model provider error
    Model(ModelError),
    /// Image generation error
    Image(ImageError),
    /// Server error
    Server(ServerError),
}

impl std::fmt::Display for FrescoErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FrescoErrorKind::Config(e) => write!(f, "{}", e),
            FrescoErrorKind::Model(e) => write!(f, "{}", e),
            FrescoErrorKind::Image(e) => write!(f, "{}", e),
            FrescoErrorKind::Server(e) => write!(f, "{}", e),
        }
    }
}

/// Fresco error with kind discrimination.
#[derive(Debug)]
pub struct FrescoError(Box<FrescoErrorKind>);

impl FrescoError {
    /// Create a new error from a kind.
    pub fn new(kind: FrescoErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &FrescoErrorKind {
        &self.0
    }
}

impl std::fmt::Display for FrescoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Fresco Error: {}", self.0)
    }
}

impl std::error::Error for FrescoError {}

// Generic From implementation for any type that converts to FrescoErrorKind
impl<T> From<T> for FrescoError
where
    T: Into<FrescoErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Fresco operations.
pub type FrescoResult<T> = std::result::Result<T, FrescoError>;
