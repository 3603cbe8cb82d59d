use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use starline_dash::starline::session::SessionClient;
use starline_dash::{api, config, jobs, AppState};

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "starline_dash=info,tower_http=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = cli::Cli::parse();
    let cfg = config::load()?;

    match args.command {
        Some(cli::Commands::Serve { port }) => {
            let port = port.unwrap_or(cfg.port);
            run_server(cfg, port).await
        }
        Some(cli::Commands::Refresh) => refresh_once(cfg).await,
        Some(cli::Commands::Status) => {
            print_status(cfg);
            Ok(())
        }
        None => {
            let port = cfg.port;
            run_server(cfg, port).await
        }
    }
}

async fn run_server(cfg: config::Config, port: u16) -> anyhow::Result<()> {
    let client = SessionClient::new(cfg.api_url.clone(), cfg.session_token()?)?;
    let state = Arc::new(AppState::new(cfg));

    jobs::refresh::spawn(client, state.snapshots.clone());
    tracing::info!(
        period_secs = jobs::refresh::REFRESH_PERIOD.as_secs(),
        "Background StarLine refresher started"
    );

    let app = api::router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("StarLine dashboard listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn refresh_once(cfg: config::Config) -> anyhow::Result<()> {
    let mut client = SessionClient::new(cfg.api_url.clone(), cfg.session_token()?)?;
    let state = AppState::new(cfg);

    if !jobs::refresh::run_cycle(&mut client, &state.snapshots).await {
        anyhow::bail!("refresh failed; cached snapshot left unchanged");
    }
    println!("Snapshot written to {}", state.snapshots.path().display());
    Ok(())
}

fn print_status(cfg: config::Config) {
    let state = AppState::new(cfg);
    let snapshot = state.snapshots.load();

    println!("Status:   {} {}", snapshot.status().indicator(), snapshot.status());
    match snapshot.mileage() {
        Some(m) => println!("Mileage:  {} km", m),
        None => println!("Mileage:  unknown"),
    }
    println!(
        "Updated:  {}",
        snapshot.update_timestamp().as_deref().unwrap_or("never")
    );

    if let Some(obd) = snapshot.obd() {
        if let Some(litres) = obd.fuel_litres {
            println!("Fuel:     {:.1} l", litres);
        }
    }
    if let Some(battery) = snapshot.common().and_then(|c| c.battery) {
        println!("Battery:  {:.1} V", battery);
    }
    for entry in snapshot.balance() {
        if let Some(value) = entry.value {
            println!("Balance:  {} {}", value, entry.currency.as_deref().unwrap_or(""));
        }
    }

    if let Some(mileage) = snapshot.mileage() {
        for s in state.services.list(mileage) {
            println!("{:<30} {:>8} km left", s.description, s.remain_km);
        }
    }
}
