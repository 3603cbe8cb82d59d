use std::path::PathBuf;

const PLACEHOLDER_SLID_TOKEN: &str = "yourtoken:4200042";

pub const DEFAULT_API_URL: &str = "https://developer.starline.ru";
pub const DEFAULT_ID_URL: &str = "https://id.starline.ru";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Long-lived user session token (`<token>:<numeric-id>`).
    pub slid_token: String,
    /// Base URL of the session / device-data API.
    pub api_url: String,
    /// Base URL of the StarLineID identity service.
    pub id_url: String,
    /// Directory holding the snapshot cache and the YAML stores.
    pub data_dir: PathBuf,
    pub static_dir: PathBuf,
    /// `STARLINE_ENV=production`: the placeholder token is fatal.
    pub production: bool,
}

impl Config {
    pub fn snapshot_path(&self) -> PathBuf {
        self.data_dir.join("starline_data.json")
    }

    pub fn services_path(&self) -> PathBuf {
        self.data_dir.join("services.yaml")
    }

    pub fn history_path(&self) -> PathBuf {
        self.data_dir.join("services_history.yaml")
    }

    /// The session token, checked before anything talks to the vendor.
    /// Commands that only read local files never call this.
    pub fn session_token(&self) -> anyhow::Result<&str> {
        if self.slid_token == PLACEHOLDER_SLID_TOKEN {
            if self.production {
                anyhow::bail!(
                    "STARLINE_SLID_TOKEN is still the placeholder. \
                     Run `starline-auth` to mint a token before running in production."
                );
            }
            tracing::warn!("STARLINE_SLID_TOKEN is not set, using placeholder; vendor auth will fail");
        }
        validate_slid_token(&self.slid_token)?;
        Ok(&self.slid_token)
    }
}

/// Checks the `<token>:<numeric-id>` shape of a user session token.
pub fn validate_slid_token(token: &str) -> anyhow::Result<()> {
    match token.rsplit_once(':') {
        Some((secret, id))
            if !secret.is_empty() && !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()) =>
        {
            Ok(())
        }
        _ => anyhow::bail!("STARLINE_SLID_TOKEN must have the form '<token>:<numeric-id>'"),
    }
}

pub fn load() -> anyhow::Result<Config> {
    dotenvy::dotenv().ok();

    let slid_token = std::env::var("STARLINE_SLID_TOKEN")
        .unwrap_or_else(|_| PLACEHOLDER_SLID_TOKEN.into());

    Ok(Config {
        port: std::env::var("STARLINE_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(8001),
        slid_token,
        api_url: std::env::var("STARLINE_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into()),
        id_url: std::env::var("STARLINE_ID_URL").unwrap_or_else(|_| DEFAULT_ID_URL.into()),
        data_dir: std::env::var("STARLINE_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(".")),
        static_dir: std::env::var("STARLINE_STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("static")),
        production: std::env::var("STARLINE_ENV").is_ok_and(|v| v == "production"),
    })
}
