//! Console stand-in for the browser window

use pagekit_core::BrowserHost;
use serde::Serialize;

/// Prints alerts and navigations to stderr and keeps them for the report
#[derive(Debug, Default, Serialize)]
pub struct ConsoleHost {
    pub alerts: Vec<String>,
    pub navigations: Vec<String>,
}

impl BrowserHost for ConsoleHost {
    fn alert(&mut self, message: &str) {
        tracing::warn!("[alert] {message}");
        self.alerts.push(message.to_string());
    }

    fn navigate(&mut self, url: &str) {
        tracing::info!("[navigate] {url}");
        self.navigations.push(url.to_string());
    }
}
