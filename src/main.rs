//! Internal administration backend entry point.

use citadel::{
    auth::PasswordHasher, config::AppConfig, db, models::user::Role,
    repository::UserRepository, routes, telemetry,
};
use tokio::net::TcpListener;
use tokio::signal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 {
        match args[1].as_str() {
            "--version" => {
                println!("citadel {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" => {
                print_help();
                return Ok(());
            }
            _ => {
                eprintln!("Unknown argument: {}", args[1]);
                print_help();
                std::process::exit(1);
            }
        }
    }

    // .env files for development; production sets real environment variables.
    if let Ok(profile) = std::env::var("CITADEL_ENV") {
        dotenv::from_filename(format!(".env.{}", profile)).ok();
    } else {
        dotenv::from_filename(".env.local").ok();
        dotenv::dotenv().ok();
    }

    // A missing signing key aborts here, before anything listens.
    let config = AppConfig::from_env().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        anyhow::anyhow!("Failed to load configuration: {}", e)
    })?;

    telemetry::init_telemetry(&config);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Citadel starting...");

    let db_pool = db::create_pool(&config.database).await?;
    db::run_migrations(&db_pool).await?;

    tracing::info!("Database initialized");

    if config.security.seed_default_users {
        seed_default_users(&db_pool).await?;
    }

    spawn_session_reaper(db_pool.clone());

    let state = routes::build_state(std::sync::Arc::new(config.clone()), db_pool)?;
    let app = routes::create_router(state);

    let addr = &config.server.addr;
    let listener = TcpListener::bind(addr).await?;

    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(
            config.server.graceful_shutdown_timeout_secs,
        ))
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Development fixture accounts. Passwords are hashed like any other
/// account; existing usernames are left untouched.
async fn seed_default_users(pool: &sqlx::SqlitePool) -> anyhow::Result<()> {
    const SEEDS: &[(&str, &str, Role)] = &[
        ("wayne", "bat123", Role::Admin),
        ("lucius", "fox123", Role::Manager),
        ("dick", "night", Role::Employee),
        ("alfred", "pennyworth", Role::Employee),
    ];

    let repo = UserRepository::new(pool.clone());
    let hasher = PasswordHasher::new();

    for (username, password, role) in SEEDS {
        if repo.find_by_username(username).await?.is_some() {
            continue;
        }

        let hash = hasher.hash(password).map_err(|e| anyhow::anyhow!("{e}"))?;
        match repo.create(username, &hash, *role).await {
            Ok(_) => tracing::info!(username = %username, role = %role, "Seeded default user"),
            Err(citadel::error::AppError::Conflict(_)) => {}
            Err(e) => return Err(anyhow::anyhow!("{e}")),
        }
    }

    Ok(())
}

/// Expired sessions are invisible to validation but still occupy rows;
/// sweep them periodically.
fn spawn_session_reaper(pool: sqlx::SqlitePool) {
    tokio::spawn(async move {
        let repo = citadel::repository::SessionRepository::new(pool);
        let mut interval = tokio::time::interval(tokio::time::Duration::from_secs(300));
        loop {
            interval.tick().await;
            match repo.reap_expired().await {
                Ok(0) => {}
                Ok(n) => tracing::debug!(reaped = n, "Expired sessions removed"),
                Err(e) => tracing::warn!(error = %e, "Session reaper sweep failed"),
            }
        }
    });
}

async fn shutdown_signal(timeout_secs: u64) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Ctrl+C received, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Terminate signal received, starting graceful shutdown");
        },
    }

    tokio::time::sleep(tokio::time::Duration::from_secs(timeout_secs)).await;
    tracing::warn!("Graceful shutdown timeout reached, forcing exit");
}

fn print_help() {
    println!("citadel {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Usage: citadel [options]");
    println!();
    println!("Options:");
    println!("  --version     Print version information and exit");
    println!("  --help        Print this help and exit");
    println!();
    println!("Environment:");
    println!("  All configuration is read from CITADEL_-prefixed variables;");
    println!("  see .env.example for the available options.");
    println!("  CITADEL_SECURITY__JWT_SECRET is required and has no default.");
}
