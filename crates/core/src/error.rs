/// Result alias that carries the custom [`TweenError`] type.
pub type Result<T> = std::result::Result<T, TweenError>;

/// Common error type for the core crate.
///
/// Curve generation and the drivers never fail; errors only surface from
/// the edges: loading configuration and talking to the host event loop.
#[derive(Debug, thiserror::Error)]
pub enum TweenError {
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// The host event loop refused to register or dispatch a source.
    #[error("event loop: {0}")]
    EventLoop(#[from] calloop::Error),
    /// A configuration document could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}
