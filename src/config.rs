use crate::svg::DEFAULT_TOP_N;
use clap::Parser;
use reqwest::Url;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Process configuration, resolved once at startup.
#[derive(Debug, Clone, Parser)]
#[clap(name = "top-langs", about = "Serves an SVG card of a GitHub user's top languages")]
pub struct Config {
    #[clap(long = "token", help = "GitHub REST API token", env = "GITHUB_TOKEN")]
    pub github_token: Option<String>,

    #[clap(
        long = "api-url",
        help = "GitHub REST API base URL",
        env = "GITHUB_API_URL",
        default_value = "https://api.github.com"
    )]
    pub api_url: Url,

    #[clap(
        long = "bind",
        help = "Address the HTTP server listens on",
        env = "TOP_LANGS_BIND",
        default_value = "0.0.0.0:5000"
    )]
    pub bind: SocketAddr,

    #[clap(
        long = "top-n",
        help = "Maximum number of languages drawn on the card",
        env = "TOP_LANGS_TOP_N",
        default_value_t = DEFAULT_TOP_N
    )]
    pub top_n: usize,

    #[clap(
        long = "static-dir",
        help = "Directory holding favicon.ico",
        env = "TOP_LANGS_STATIC_DIR",
        default_value = "static"
    )]
    pub static_dir: PathBuf,
}

impl Config {
    /// Bearer token to send upstream. An empty value counts as unset.
    pub fn token(&self) -> Option<&str> {
        self.github_token.as_deref().filter(|t| !t.is_empty())
    }
}
