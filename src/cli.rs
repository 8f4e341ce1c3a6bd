use std::path::PathBuf;

use clap::Parser;

use crate::global_constants::{DEFAULT_CONFIG_FILE, DEFAULT_TOKEN_CACHE_FILE};

#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = None)] // read from Cargo.toml
pub struct Cli {
    /// Token cache file
    #[arg(long = "cache", value_name = "path", default_value = DEFAULT_TOKEN_CACHE_FILE)]
    pub cache_file: PathBuf,

    /// Authorization code, overrides `oauth_code` from the config file
    #[arg(long = "code", value_name = "code")]
    pub code: Option<String>,

    /// Run locally in test mode without invoking the camera tool
    #[arg(long = "test")]
    pub test_mode: bool,

    /// Application configuration file
    #[arg(long = "config", value_name = "path", default_value = DEFAULT_CONFIG_FILE)]
    pub config_file: PathBuf,

    /// Open the authorization URL in a browser when a code is needed
    #[arg(long = "open-browser")]
    pub open_browser: bool,
}

impl Cli {
    /// The `--code` flag wins over the config file value; blank values count
    /// as absent.
    pub fn authorization_code<'a>(&'a self, config_code: &'a str) -> Option<&'a str> {
        self.code
            .as_deref()
            .filter(|code| !code.trim().is_empty())
            .or_else(|| Some(config_code).filter(|code| !code.trim().is_empty()))
    }
}

pub fn parse() -> Cli {
    Parser::parse()
}
