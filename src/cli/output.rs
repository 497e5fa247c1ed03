//! Output formatting for resolution results

use crate::cli::args::VerbosityLevel;
use crate::error::ResolveError;
use serde::Serialize;
use std::time::Duration;

/// JSON envelope printed with `--json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolveResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'static str>,
}

impl ResolveResponse {
    /// Successful resolution
    pub fn resolved(url: &str) -> Self {
        Self {
            success: true,
            url: Some(url.to_string()),
            error: None,
            kind: None,
        }
    }

    /// Failed resolution
    pub fn failed(error: &ResolveError) -> Self {
        Self {
            success: false,
            url: None,
            error: Some(error.to_string()),
            kind: Some(error.kind()),
        }
    }

    /// Serialize to a single JSON line
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Output formatter for kwik-resolver
pub struct OutputFormatter {
    verbosity: VerbosityLevel,
    json: bool,
}

impl OutputFormatter {
    /// Create a new output formatter
    pub fn new(verbosity: VerbosityLevel) -> Self {
        Self {
            verbosity,
            json: false,
        }
    }

    /// Switch result printing to JSON envelopes
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// Print info message
    pub fn info(&self, message: &str) {
        if self.verbosity == VerbosityLevel::Verbose && !self.json {
            eprintln!("ℹ️  {}", message);
        }
    }

    /// Print warning message
    pub fn warning(&self, message: &str) {
        if self.verbosity != VerbosityLevel::Quiet && !self.json {
            eprintln!("⚠️  {}", message);
        }
    }

    /// Print error message
    pub fn error(&self, message: &str) {
        eprintln!("❌ {}", message);
    }

    /// Print the resolved URL on stdout
    pub fn print_resolved(&self, url: &str, elapsed: Duration) -> Result<(), serde_json::Error> {
        if self.json {
            println!("{}", ResolveResponse::resolved(url).to_json()?);
        } else {
            println!("{}", url);
            self.info(&format!("Resolved in {}", format_elapsed(elapsed)));
        }
        Ok(())
    }

    /// Print a failed resolution
    pub fn print_failure(&self, error: &ResolveError) -> Result<(), serde_json::Error> {
        if self.json {
            println!("{}", ResolveResponse::failed(error).to_json()?);
            return Ok(());
        }

        self.error(&error.to_string());
        if error.is_site_change() {
            self.warning("The embed page format may have changed");
        }
        Ok(())
    }
}

/// Format elapsed time as human-readable string
fn format_elapsed(elapsed: Duration) -> String {
    let millis = elapsed.as_millis();
    if millis < 1000 {
        format!("{}ms", millis)
    } else {
        format!("{:.1}s", elapsed.as_secs_f64())
    }
}
