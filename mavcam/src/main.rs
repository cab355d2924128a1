use clap::Parser;
use mavcam::{
    Dispatcher, MemoryDeviceControl, ParameterSource, ParameterStore, Responder,
    ResponderConfig, ResponderTiming, Result, TomlFile,
};
use std::path::PathBuf;
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::EnvFilter;

/// MAVLink camera component.
///
/// Announces a video stream to a GCS, and answers its camera protocol
/// requests. Every option can also be set with an environment variable.
#[derive(Debug, Parser)]
#[clap(verbatim_doc_comment)]
struct CliParser {
    /// URL of the RTSP video stream. If unset, no stream URL is announced.
    #[clap(long, env = "CAMERA_URL")]
    pub url: Option<String>,

    /// Component ID of the camera.
    #[clap(long, env = "CAMERA_ID")]
    pub camera_id: u8,

    /// Name of the camera and its video stream.
    #[clap(long, env = "CAMERA_NAME")]
    pub name: String,

    /// Host of the GCS.
    #[clap(long, env = "SYSTEM_HOST")]
    pub host: String,

    /// UDP port of the GCS.
    #[clap(long, env = "SYSTEM_PORT")]
    pub port: u16,

    /// System ID the camera belongs to.
    #[clap(long, env = "SYSTEM_ID")]
    pub system_id: u8,

    /// Parameter definition file.
    #[clap(
        long,
        env = "CAMERA_DEFINITIONS",
        default_value = "camera_definitions/example.toml"
    )]
    pub definitions: PathBuf,
}

/// Waits for SIGINT or SIGTERM.
#[cfg(unix)]
async fn shutdown_signal() -> Result<()> {
    use tokio::signal::unix::{signal, SignalKind};
    let mut sigterm = signal(SignalKind::terminate())?;
    tokio::select! {
        r = tokio::signal::ctrl_c() => r?,
        _ = sigterm.recv() => (),
    }
    Ok(())
}

#[cfg(not(unix))]
async fn shutdown_signal() -> Result<()> {
    tokio::signal::ctrl_c().await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .compact()
        .init();
    let opts = CliParser::parse();

    let config = ResponderConfig::new(
        opts.camera_id,
        opts.name,
        opts.host,
        opts.port,
        opts.system_id,
        opts.url,
    )?;
    if config.stream_url().is_empty() {
        warn!("no stream URL configured");
    }

    // There is no hardware backend here, so controls live in memory, starting
    // at their defaults. The parameter table itself is still loaded on first
    // use.
    let source = TomlFile::new(&opts.definitions);
    let device = match source.load() {
        Ok(definitions) => MemoryDeviceControl::from_definitions(&definitions),
        Err(e) => {
            warn!(
                "cannot load parameter definitions from {}: {e}",
                opts.definitions.display()
            );
            MemoryDeviceControl::new()
        }
    };

    info!(
        "starting camera {:?} (component {}) in system {}",
        config.name, config.camera_id, config.system_id
    );
    let dispatcher = Dispatcher::new(config, ParameterStore::new(source), device);
    let responder = Responder::bind(dispatcher, ResponderTiming::default()).await?;
    let handle = responder.start();

    let stop = handle.stop_handle();
    tokio::task::spawn(async move {
        if let Err(e) = shutdown_signal().await {
            warn!("cannot wait for shutdown signals: {e}");
            return;
        }
        info!("SIGINT or SIGTERM received, stopping");
        stop.stop();
    });

    handle.join().await
}
