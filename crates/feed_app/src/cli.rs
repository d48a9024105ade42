use std::path::PathBuf;

use clap::Parser;
use feed_api::OrderBy;
use log::LevelFilter;

use crate::config::{AppConfig, DEFAULT_CONFIG_FILENAME};
use crate::logging::LogDestination;

#[derive(Parser, Debug)]
#[command(name = "photo_feed", about = "Load a photo listing and report its state")]
pub struct Cli {
    /// RON config file; missing files fall back to defaults.
    #[arg(long, default_value = DEFAULT_CONFIG_FILENAME)]
    pub config: PathBuf,
    /// Sort order: latest, oldest or popular.
    #[arg(long)]
    pub order_by: Option<OrderBy>,
    #[arg(long)]
    pub base_url: Option<String>,
    #[arg(long, env = "UNSPLASH_ACCESS_KEY", hide_env_values = true)]
    pub access_key: Option<String>,
    #[arg(long, value_enum, default_value_t = LogDestination::Terminal)]
    pub log: LogDestination,
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }

    /// Command-line values take precedence over the config file.
    pub fn apply(&self, mut config: AppConfig) -> AppConfig {
        if let Some(order_by) = self.order_by {
            config.order_by = order_by;
        }
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(access_key) = &self.access_key {
            config.access_key = Some(access_key.clone());
        }
        config
    }
}
