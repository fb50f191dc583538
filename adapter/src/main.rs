use anyhow::{bail, Context};
use clap::Parser;
use server::MissionServer;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use store::{DiskStore, MemoryStore, MissionStore};
use tokio::runtime::Builder as TokioBuilder;
use workflow::config::AdapterConfig;
use workflow::runner::{render_document, Runner};

mod server;
mod store;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Turns geotagged risk cells into GeoJSON drone missions")]
struct Args {
    /// Load adapter settings from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    /// Convert a single risk file offline
    #[arg(long)]
    input: Option<PathBuf>,
    /// Where to write the offline mission (defaults to the download directory)
    #[arg(long)]
    output: Option<PathBuf>,
    /// Flight altitude in metres above ground
    #[arg(long)]
    altitude: Option<f64>,
    /// Hover time at each waypoint in seconds
    #[arg(long)]
    hover: Option<f64>,
    /// Serve the HTTP intake until Ctrl+C
    #[arg(long, default_value_t = false)]
    serve: bool,
    #[arg(long)]
    bind: Option<SocketAddr>,
    #[arg(long)]
    download_dir: Option<PathBuf>,
    /// Keep served missions in memory instead of the download directory
    #[arg(long, default_value_t = false)]
    in_memory: bool,
}

fn run_offline(runner: &Runner, input: &Path, output: Option<&Path>) -> anyhow::Result<()> {
    let raw = fs::read(input).with_context(|| format!("reading risk file {}", input.display()))?;
    let params = runner.config().default_parameters();
    let conversion = runner
        .execute(&raw, &params)
        .with_context(|| format!("converting {}", input.display()))?;

    for rejection in &conversion.rejections {
        println!(
            "  rejected record {} -> {}",
            rejection.index, rejection.reason
        );
    }
    if conversion.document.is_empty() {
        bail!(
            "no valid waypoints could be generated from {} ({} records rejected)",
            input.display(),
            conversion.rejections.len()
        );
    }

    let rendered = render_document(&conversion.document)?;
    let destination = match output {
        Some(path) => {
            fs::write(path, &rendered)
                .with_context(|| format!("writing mission {}", path.display()))?;
            path.to_path_buf()
        }
        None => {
            let store = DiskStore::open(&runner.config().download_dir)?;
            let name = store.put(&rendered)?;
            store.dir().join(name)
        }
    };

    println!(
        "Offline run -> waypoints {}, rejected {}, mission {}",
        conversion.waypoint_count(),
        conversion.rejections.len(),
        destination.display()
    );
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => AdapterConfig::load(path)?,
        None => AdapterConfig::default(),
    }
    .with_overrides(args.altitude, args.hover, args.bind, args.download_dir.clone());

    let runner = Arc::new(Runner::new(config.clone()));

    if let Some(input) = &args.input {
        run_offline(&runner, input, args.output.as_deref())?;
    }
    if args.serve {
        let store: Arc<dyn MissionStore> = if args.in_memory {
            Arc::new(MemoryStore::new())
        } else {
            Arc::new(DiskStore::open(&config.download_dir)?)
        };
        let server = MissionServer::new(runner.clone(), store);
        let runtime = TokioBuilder::new_multi_thread()
            .enable_all()
            .build()
            .context("creating runtime for the HTTP intake")?;
        runtime.block_on(server.serve(config.bind))?;
    }
    if args.input.is_none() && !args.serve {
        eprintln!("nothing to do: pass --input <FILE> or --serve");
    }

    Ok(())
}
