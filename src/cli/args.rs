//! Command line argument parsing

use crate::platform::client::{ResolverConfig, DEFAULT_SITE_ORIGIN};
use clap::Parser;
use std::time::Duration;

/// Resolve a kwik embed link into its direct media URL
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Embed page URL (e.g. https://kwik.cx/e/...)
    pub url: String,

    /// HTTP timeout per request (e.g., 15s, 1m)
    #[arg(long, value_name = "DURATION", default_value = "15s")]
    pub timeout: humantime::Duration,

    /// Override User-Agent header
    #[arg(long, value_name = "USER_AGENT")]
    pub user_agent: Option<String>,

    /// Proxy URL (http/https/socks)
    #[arg(long, value_name = "URL")]
    pub proxy: Option<String>,

    /// Origin the browser headers are pinned to
    #[arg(long, value_name = "URL", default_value = DEFAULT_SITE_ORIGIN)]
    pub origin: String,

    /// Print a JSON result envelope instead of the bare URL
    #[arg(long)]
    pub json: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet output (only errors)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Args {
    /// Get HTTP timeout as Duration
    pub fn timeout_duration(&self) -> Duration {
        self.timeout.into()
    }

    /// Get output verbosity level
    pub fn verbosity_level(&self) -> VerbosityLevel {
        if self.quiet {
            VerbosityLevel::Quiet
        } else if self.verbose {
            VerbosityLevel::Verbose
        } else {
            VerbosityLevel::Normal
        }
    }

    /// Build resolver configuration from the flags
    pub fn resolver_config(&self) -> ResolverConfig {
        let mut config = ResolverConfig::default()
            .with_timeout(self.timeout_duration())
            .with_site_origin(self.origin.as_str());

        if let Some(user_agent) = &self.user_agent {
            config = config.with_user_agent(user_agent.as_str());
        }
        if let Some(proxy) = &self.proxy {
            config = config.with_proxy(proxy.as_str());
        }

        config
    }
}

/// Output verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbosityLevel {
    /// Quiet (only errors)
    Quiet,
    /// Normal
    Normal,
    /// Verbose (debug info)
    Verbose,
}

impl VerbosityLevel {
    /// Log filter used when `RUST_LOG` is not set
    pub fn default_log_filter(&self) -> &'static str {
        match self {
            VerbosityLevel::Quiet => "error",
            VerbosityLevel::Normal => "info",
            VerbosityLevel::Verbose => "debug",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::client::DEFAULT_USER_AGENT;

    #[test]
    fn test_parse_minimal() {
        let args = Args::try_parse_from(["kwik-resolver", "https://kwik.cx/e/abc"]).unwrap();
        assert_eq!(args.url, "https://kwik.cx/e/abc");
        assert_eq!(args.timeout_duration(), Duration::from_secs(15));
        assert_eq!(args.origin, DEFAULT_SITE_ORIGIN);
        assert!(!args.json);
        assert_eq!(args.verbosity_level(), VerbosityLevel::Normal);
    }

    #[test]
    fn test_parse_requires_url() {
        assert!(Args::try_parse_from(["kwik-resolver"]).is_err());
    }

    #[test]
    fn test_parse_all_flags() {
        let args = Args::try_parse_from([
            "kwik-resolver",
            "https://kwik.si/e/abc",
            "--timeout",
            "1m",
            "--user-agent",
            "Custom Agent",
            "--proxy",
            "socks5://127.0.0.1:1080",
            "--origin",
            "https://kwik.si",
            "--json",
            "-v",
        ])
        .unwrap();

        assert_eq!(args.timeout_duration(), Duration::from_secs(60));
        assert_eq!(args.user_agent.as_deref(), Some("Custom Agent"));
        assert_eq!(args.proxy.as_deref(), Some("socks5://127.0.0.1:1080"));
        assert!(args.json);
        assert_eq!(args.verbosity_level(), VerbosityLevel::Verbose);
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Args::try_parse_from(["kwik-resolver", "https://kwik.cx/e/abc", "-q", "-v"]).is_err());
    }

    #[test]
    fn test_args_verbosity_level() {
        let args = Args {
            quiet: true,
            ..Default::default()
        };
        assert_eq!(args.verbosity_level(), VerbosityLevel::Quiet);
        assert_eq!(args.verbosity_level().default_log_filter(), "error");

        let args = Args {
            verbose: true,
            ..Default::default()
        };
        assert_eq!(args.verbosity_level(), VerbosityLevel::Verbose);
        assert_eq!(args.verbosity_level().default_log_filter(), "debug");

        assert_eq!(Args::default().verbosity_level().default_log_filter(), "info");
    }

    #[test]
    fn test_resolver_config_from_args() {
        let args = Args {
            timeout: humantime::Duration::from(Duration::from_secs(3)),
            user_agent: Some("Custom Agent".to_string()),
            proxy: Some("http://proxy:8080".to_string()),
            origin: "https://kwik.si/".to_string(),
            ..Default::default()
        };

        let config = args.resolver_config();
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.user_agent, "Custom Agent");
        assert_eq!(config.proxy_url.as_deref(), Some("http://proxy:8080"));
        assert_eq!(config.site_origin, "https://kwik.si");
    }

    #[test]
    fn test_resolver_config_keeps_defaults() {
        let config = Args::default().resolver_config();
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.proxy_url, None);
        assert_eq!(config.site_origin, DEFAULT_SITE_ORIGIN);
    }
}

// Implement Default for Args to make tests work
impl Default for Args {
    fn default() -> Self {
        Self {
            url: String::new(),
            timeout: humantime::Duration::from(Duration::from_secs(15)),
            user_agent: None,
            proxy: None,
            origin: DEFAULT_SITE_ORIGIN.to_string(),
            json: false,
            verbose: false,
            quiet: false,
        }
    }
}
