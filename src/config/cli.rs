use super::toml_config::ServiceConfig;
use crate::domain::RankingPolicy;
use crate::utils::error::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "supplier-recommender")]
#[command(about = "Recommends suppliers to charities by rating and distance")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory holding charities.csv, suppliers.csv and ratings.csv
    #[arg(long)]
    pub data_dir: Option<String>,

    #[arg(long)]
    pub host: Option<String>,

    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Ranking policy: lexicographic or composite
    #[arg(long)]
    pub policy: Option<RankingPolicy>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[arg(long, help = "Create missing dataset files with header rows before serving")]
    pub init_data: bool,
}

impl CliConfig {
    /// Load the configuration file (if any) and apply command-line overrides.
    pub fn resolve(&self) -> Result<ServiceConfig> {
        let mut config = match &self.config {
            Some(path) => ServiceConfig::from_file(path)?,
            None => ServiceConfig::default(),
        };

        if let Some(dir) = &self.data_dir {
            config.data.dir = dir.clone();
        }
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(policy) = self.policy {
            config.scoring.policy = policy;
        }
        config.logging.verbose |= self.verbose;
        config.logging.json |= self.json_logs;

        Ok(config)
    }
}
