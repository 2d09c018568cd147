// Runtime configuration, read once at startup from the environment
// (a .env file is loaded first if present).

use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP server binds to
    pub bind_addr: SocketAddr,
    /// sqlx connection string for the content database
    pub database_url: String,
    /// Directory scanned for wall/hero images and served under `/media`
    pub media_root: PathBuf,
    /// URL prefix prepended to scanned filenames, trailing slash included
    pub media_url: String,
    /// Shared secret expected in the `X-Api-Key` header on admin routes
    pub admin_api_key: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr = std::env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8001".to_string())
            .parse()?;

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://data/homepage.db?mode=rwc".to_string());

        let media_root =
            PathBuf::from(std::env::var("MEDIA_ROOT").unwrap_or_else(|_| "./media".to_string()));

        let mut media_url = std::env::var("MEDIA_URL").unwrap_or_else(|_| "/media/".to_string());
        if !media_url.ends_with('/') {
            media_url.push('/');
        }

        let admin_api_key = std::env::var("ADMIN_API_KEY")
            .map_err(|_| anyhow::anyhow!("Missing ADMIN_API_KEY environment variable"))?;

        Ok(Self {
            bind_addr,
            database_url,
            media_root,
            media_url,
            admin_api_key,
        })
    }
}
