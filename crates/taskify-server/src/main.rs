//! taskify server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! configured task store, and serves the JSON API over HTTP.
//!
//! # Password hash generation
//!
//! To generate the argon2 PHC string for an account's `password_hash`:
//!
//! ```
//! cargo run -p taskify-server --bin server -- --hash-password
//! ```

use std::{
  path::{Path, PathBuf},
  sync::Arc,
  time::Duration,
};

use anyhow::Context as _;
use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use clap::Parser;
use rand_core::OsRng;
use taskify_core::{access::CallerId, store::TaskStore};
use taskify_server::{Backend, ServerConfig};
use taskify_store_local::LocalStore;
use taskify_store_sqlite::SqliteStore;
use tokio::{net::TcpListener, signal};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Taskify task API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Print the argon2 hash for a password entered on stdin and exit.
  #[arg(long)]
  hash_password: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  if cli.hash_password {
    let password = read_password()?;
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .map_err(|e| anyhow::anyhow!("argon2 error: {e}"))?
      .to_string();
    println!("{hash}");
    return Ok(());
  }

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("TASKIFY"))
    .build()
    .context("failed to read config file")?;

  let cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  anyhow::ensure!(!cfg.jwt_secret.is_empty(), "jwt_secret must not be empty");
  if cfg.accounts.is_empty() {
    tracing::warn!("no accounts configured; nobody can log in");
  }

  let store_path = expand_tilde(&cfg.store_path);

  match cfg.backend {
    Backend::Sqlite => {
      let store = SqliteStore::open(&store_path)
        .await
        .with_context(|| format!("failed to open store at {store_path:?}"))?;
      serve(store, &cfg).await
    }
    Backend::Local => {
      let store = LocalStore::open(&store_path)
        .await
        .with_context(|| format!("failed to open store at {store_path:?}"))?
        .with_latency(Duration::from_millis(cfg.local_latency_ms));
      if let Some(owner) = &cfg.seed_owner {
        let added = store
          .seed_sample_tasks(&CallerId::from(owner.as_str()))
          .await
          .context("failed to seed sample tasks")?;
        if added > 0 {
          tracing::info!(owner = %owner, added, "seeded sample tasks");
        }
      }
      serve(store, &cfg).await
    }
  }
}

async fn serve<S>(store: S, cfg: &ServerConfig) -> anyhow::Result<()>
where
  S: TaskStore + 'static,
{
  let state = taskify_server::api_state(Arc::new(store), cfg);
  let app = taskify_server::router(state);
  let address = cfg.address();

  tracing::info!(backend = ?cfg.backend, "Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  tracing::info!("server stopped");
  Ok(())
}

async fn shutdown_signal() {
  if let Err(error) = signal::ctrl_c().await {
    tracing::warn!(%error, "failed to install Ctrl+C handler");
    std::future::pending::<()>().await;
  }
  tracing::info!("received Ctrl+C, shutting down");
}

/// Read a password from stdin.
fn read_password() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  print!("Password: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  io::stdin().lock().read_line(&mut line)?;
  Ok(line.trim_end_matches(['\n', '\r']).to_string())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
