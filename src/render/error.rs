/// Errors that can occur while rendering histograms
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// I/O error creating the output directory or writing an image
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// SVG parsing or PNG encoding failed
    #[error("PNG encoding error: {0}")]
    Png(String),

    /// The requested image format was not compiled in
    #[error("Image format '{0}' is not available in this build")]
    UnsupportedFormat(&'static str),

    /// Overlay tag that cannot be used as a file name
    #[error("Render tag '{0}' contains a path separator")]
    InvalidTag(String),

    /// Canvas too small to hold the plot
    #[error("Invalid canvas size {width}x{height}")]
    InvalidCanvas {
        /// Width in pixels
        width: u32,
        /// Height in pixels
        height: u32,
    },
}
