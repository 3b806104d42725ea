//! Environment-based server configuration

use std::env;
use std::net::SocketAddr;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid listen address {0:?}")]
    InvalidListenAddr(String),

    #[error("seed activity requires all three of BARRAGE_SEED_COMMENT_TOKEN, BARRAGE_SEED_REVIEW_TOKEN, BARRAGE_SEED_DISPLAY_TOKEN")]
    IncompleteSeed,
}

/// A pre-provisioned activity created at startup with fixed tokens,
/// so clients can be configured before the server first runs.
#[derive(Debug, Clone)]
pub struct SeedActivity {
    pub name: String,
    pub comment_token: String,
    pub review_token: String,
    pub display_token: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub seed: Option<SeedActivity>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw_addr =
            env::var("BARRAGE_LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8881".to_string());
        let listen_addr = raw_addr
            .parse()
            .map_err(|_| ConfigError::InvalidListenAddr(raw_addr))?;

        let seed = match env::var("BARRAGE_SEED_NAME") {
            Ok(name) => {
                let comment_token = env::var("BARRAGE_SEED_COMMENT_TOKEN");
                let review_token = env::var("BARRAGE_SEED_REVIEW_TOKEN");
                let display_token = env::var("BARRAGE_SEED_DISPLAY_TOKEN");
                match (comment_token, review_token, display_token) {
                    (Ok(comment_token), Ok(review_token), Ok(display_token)) => {
                        Some(SeedActivity {
                            name,
                            comment_token,
                            review_token,
                            display_token,
                        })
                    }
                    _ => return Err(ConfigError::IncompleteSeed),
                }
            }
            Err(_) => None,
        };

        Ok(Config { listen_addr, seed })
    }
}
