use anyhow::Result;
use bikeshare::{config::CityCatalog, session};
use std::io;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    // stdout carries the report, so logs go to stderr
    let env = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,bikeshare=info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(io::stderr)
        .init();
    info!("startup");

    std::panic::set_hook(Box::new(|info| {
        eprintln!("panic: {:?}", info);
    }));

    // ─── 2) city catalog ─────────────────────────────────────────────
    let catalog = CityCatalog::from_env()?;

    // ─── 3) interactive sessions ─────────────────────────────────────
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout().lock();
    let sessions = session::run(&catalog, &mut input, &mut out)?;

    info!(sessions, "all done");
    Ok(())
}
