//! Mints a long-lived StarLine user session (slid) token.
//!
//! Runs the three-step StarLineID handshake once and prints the token for the
//! operator to put into `STARLINE_SLID_TOKEN`.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use starline_dash::config::DEFAULT_ID_URL;
use starline_dash::starline::identity::{ApplicationCredential, IdentityClient};

/// Obtain a StarLine slid token from app and user credentials
#[derive(Parser)]
#[command(name = "starline-auth", version, about)]
struct Args {
    /// Application identifier (my.starline.ru, developers section)
    #[arg(short = 'i', long = "appId")]
    app_id: String,

    /// Application secret
    #[arg(short = 's', long = "appSecret")]
    app_secret: String,

    /// User account login
    #[arg(short = 'l', long)]
    login: String,

    /// User account password
    #[arg(short = 'p', long)]
    password: String,

    /// StarLineID base URL
    #[arg(long, env = "STARLINE_ID_URL", default_value = DEFAULT_ID_URL, hide = true)]
    id_url: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "starline_dash=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let app = ApplicationCredential {
        app_id: args.app_id,
        app_secret: args.app_secret,
    };

    let client = IdentityClient::new(args.id_url)?;
    match client.handshake(&app, &args.login, &args.password).await {
        Ok(token) => {
            println!("{}", token);
            Ok(())
        }
        Err(e) => {
            match e.vendor_payload() {
                Some(payload) => tracing::error!(payload = %payload, "StarLine handshake rejected"),
                None => tracing::error!("StarLine handshake failed: {}", e),
            }
            Err(e.into())
        }
    }
}
