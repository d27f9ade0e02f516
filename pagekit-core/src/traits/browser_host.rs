//! 浏览器宿主抽象 Trait

/// Window-level effects the page cannot perform on its own
///
/// Implementations:
/// - CLI: prints to the terminal
/// - Tests: `RecordingHost` (records every call)
pub trait BrowserHost {
    /// Blocking `alert()` dialog
    fn alert(&mut self, message: &str);

    /// `location.href = url`
    fn navigate(&mut self, url: &str);
}

/// Host that drops every effect (logged only)
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHost;

impl BrowserHost for NoopHost {
    fn alert(&mut self, message: &str) {
        log::info!("[Host] alert dropped: {message}");
    }

    fn navigate(&mut self, url: &str) {
        log::info!("[Host] navigation dropped: {url}");
    }
}
