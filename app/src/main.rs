use clap::Parser;
use mimalloc::MiMalloc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::{App, Args};

mod app;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let args = Args::parse();
    let mut app = App::new(&args)?;
    if let Some(path) = &args.dot {
        std::fs::write(path, prenorm::render::to_dot(app.network()))?;
    }
    let report = app.run()?;
    report.print();
    Ok(())
}
