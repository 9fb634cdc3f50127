use std::{net::SocketAddr, path::PathBuf, time::Duration};

use anyhow::Context;
use sme_screener_core::metrics::ScoringConfig;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub export_dir: PathBuf,
    pub scoring: ScoringConfig,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = std::env::var("SME_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .context("Invalid SME_LISTEN_ADDR")?;
        let db_path = std::env::var("SME_DB_PATH").unwrap_or_else(|_| "./db/screener.db".into());
        let cors_allow = std::env::var("SME_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = std::env::var("SME_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "30000".into())
            .parse()
            .unwrap_or(30000);
        let export_dir = std::env::var("SME_EXPORT_DIR").unwrap_or_else(|_| "./export".into());
        let scoring = match std::env::var("SME_SCORING_CONFIG") {
            Ok(path) if !path.trim().is_empty() => {
                ScoringConfig::from_json_file(std::path::Path::new(path.trim()))
                    .context("Invalid SME_SCORING_CONFIG")?
            }
            _ => ScoringConfig::default(),
        };
        Ok(Self {
            listen_addr,
            db_path,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            export_dir: PathBuf::from(export_dir),
            scoring,
        })
    }
}
