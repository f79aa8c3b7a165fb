//! Headless-render collaborator boundary
//!
//! Rendering JavaScript-populated pages is out of scope for this crate; a
//! caller with a headless browser implements [`Renderer`] and hands it to
//! discovery. Render failure is never fatal: the analyzer falls back to the
//! plain HTTP fetch.

use async_trait::async_trait;

/// Output of a successful render
#[derive(Debug, Clone)]
pub struct Rendered {
    /// The rendered DOM serialized to HTML
    pub html: String,
    /// URL the browser ended up on after client-side navigation
    pub final_url: String,
    /// HTTP status of the main document request
    pub status: u16,
}

/// A headless-browser rendering service
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Renders a page and returns its DOM; errors trigger the HTTP fallback
    async fn render(&self, url: &str) -> Result<Rendered, Box<dyn std::error::Error + Send + Sync>>;
}
