use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use anyhow::Context;
use clap::Parser;
use futures::future::join_all;
use analytics_proxy::{
    AnalyticsSession,
    AppState,
    ConfigError,
    Credentials,
    config::{Instance, DEFAULT_BIND_HOST},
    handlers::routes,
    logging::init_logging,
    upstream::{AnalyticsApi, HttpAnalyticsApi},
};

#[derive(Debug, Parser)]
#[command(name = "analytics-proxy", about = "Serves cached visitor statistics from the analytics backend")]
struct Args {
    /// Instance to run; both when omitted
    #[arg(long, value_enum)]
    instance: Option<Instance>,

    #[arg(long, default_value = DEFAULT_BIND_HOST)]
    host: IpAddr,

    /// Overrides the instance's port
    #[arg(long)]
    port: Option<u16>,

    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let dotenv = dotenvy::dotenv();
    init_logging(args.verbose);

    match dotenv {
        Ok(path) => tracing::info!(path = %path.display(), "loaded environment file"),
        Err(e) if e.not_found() => {}
        Err(e) => return Err(e).context("failed to read .env file"),
    }

    let credentials = Credentials::from_env()?;
    let instances = match args.instance {
        Some(instance) => vec![instance],
        None => Instance::ALL.to_vec(),
    };
    if args.port.is_some() && instances.len() > 1 {
        return Err(ConfigError::PortWithAll.into());
    }

    let api: Arc<dyn AnalyticsApi> = Arc::new(HttpAnalyticsApi::new(credentials.base_url.clone()));

    let mut servers = Vec::with_capacity(instances.len());
    for instance in instances {
        let session = AnalyticsSession::new(api.clone(), credentials.clone());
        let state = Arc::new(AppState::new(session, instance.aliases()));
        let addr = SocketAddr::new(args.host, args.port.unwrap_or(instance.port()));

        let (local_addr, server) = warp::serve(routes(state))
            .try_bind_ephemeral(addr)
            .with_context(|| format!("failed to bind {}", addr))?;

        tracing::info!(instance = instance.name(), "analytics proxy running on http://{}", local_addr);
        servers.push(server);
    }

    join_all(servers).await;
    Ok(())
}
