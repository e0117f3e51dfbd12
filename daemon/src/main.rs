//! Badge daemon: CLI entry point for the verification service.

mod config;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use badge_groups::{XrpcClient, XrpcConfig};
use badge_lifecycle::{Engine, EngineSettings};
use badge_modules::ModuleRegistry;
use badge_naming::NamingResolver;
use badge_rpc::{AppState, RpcMetrics, RpcServer};
use badge_store::SessionStore;
use badge_store_lmdb::LmdbEnvironment;
use badge_types::{Handle, ModuleKey, PolicyParams, SystemClock};
use badge_utils::LogFormat;
use clap::Parser;

use crate::config::{ServiceConfig, PASSWORD_ENV};

#[derive(Parser)]
#[command(name = "badge-daemon", about = "Verified badge service")]
struct Cli {
    /// Path to a TOML configuration file. CLI flags and env vars override it.
    #[arg(long, env = "BADGE_CONFIG")]
    config: Option<PathBuf>,

    /// Directory of the LMDB environment.
    #[arg(long, env = "BADGE_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// HTTP port for `serve`.
    #[arg(long, env = "BADGE_RPC_PORT")]
    rpc_port: Option<u16>,

    /// Bearer token for the admin endpoints.
    #[arg(long, env = "BADGE_API_TOKEN", hide_env_values = true)]
    api_token: Option<String>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "BADGE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "BADGE_LOG_FORMAT")]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Serve the HTTP API.
    Serve,
    /// Re-validate enrolled identities and apply probation.
    Reconcile {
        /// Only this handle.
        #[arg(long)]
        handle: Option<String>,
    },
    /// Current validity of one handle's memberships, without writes.
    Status {
        #[arg(long)]
        handle: String,
    },
    /// Create the missing lists and starter packs of a module.
    Provision {
        #[arg(long)]
        module: String,
    },
    /// List the built-in modules.
    Modules,
}

impl Cli {
    fn load_config(&self) -> anyhow::Result<ServiceConfig> {
        let mut config = match &self.config {
            Some(path) => ServiceConfig::from_toml_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => ServiceConfig::default(),
        };
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(port) = self.rpc_port {
            config.rpc_port = port;
        }
        if let Some(token) = &self.api_token {
            config.api_token = Some(token.clone());
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.log_format = format.clone();
        }
        Ok(config)
    }
}

fn build_engine(config: &ServiceConfig, params: &PolicyParams) -> anyhow::Result<Arc<Engine>> {
    config.validate_graph_settings()?;
    let password = std::env::var(PASSWORD_ENV)
        .with_context(|| format!("{PASSWORD_ENV} must hold the operator password"))?;

    let env = LmdbEnvironment::open(&config.data_dir, config.lmdb_map_size)
        .with_context(|| format!("opening LMDB at {}", config.data_dir.display()))?;
    let memberships = Arc::new(env.default_store());
    let failures = Arc::new(env.failure_store());
    let clock = Arc::new(SystemClock);

    let client = XrpcClient::new(
        XrpcConfig {
            service_url: config.service_url.clone(),
            operator_handle: config.operator_handle.clone(),
            operator_did: config.operator_did.clone(),
            password,
            labeler_did: config.labeler_did.clone(),
            chat_service_did: config.chat_service_did.clone(),
            timeout: config.request_timeout(),
        },
        SessionStore::new(memberships.clone()),
        clock.clone(),
    );
    let registry =
        ModuleRegistry::builtin(&config.validation_base_url, config.request_timeout());

    let settings = EngineSettings {
        operator_handle: config.operator_handle.clone(),
        web_base_url: config.web_base_url.clone(),
        site_url: config.site_url.clone(),
        blacklist: config.blacklist()?,
    };
    Ok(Arc::new(Engine::new(
        Arc::new(registry),
        Arc::new(client),
        memberships,
        failures,
        clock,
        params,
        settings,
    )))
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.load_config()?;
    let format: LogFormat = config.log_format.parse()?;
    badge_utils::init_tracing(&config.log_level, format)?;

    let params = PolicyParams::default();

    match cli.command {
        Command::Modules => {
            let registry =
                ModuleRegistry::builtin(&config.validation_base_url, config.request_timeout());
            let mut modules = registry.modules();
            modules.sort_by(|a, b| a.key.as_str().cmp(b.key.as_str()));
            for module in modules {
                println!("{:<12} {}", module.key.as_str(), module.display_name);
            }
        }
        Command::Serve => {
            let engine = build_engine(&config, &params)?;
            let state = AppState {
                engine,
                metrics: Arc::new(RpcMetrics::new()?),
                api_token: config.api_token.clone(),
            };
            if state.api_token.is_none() {
                tracing::warn!("no api_token configured; admin endpoints are disabled");
            }
            let server = RpcServer::new(config.rpc_port, state);
            tokio::select! {
                result = server.start() => result.context("HTTP server failed")?,
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("shutdown signal received");
                }
            }
            tracing::info!("badge daemon exited cleanly");
        }
        Command::Reconcile { handle } => {
            let engine = build_engine(&config, &params)?;
            let report = match handle {
                Some(raw) => {
                    let handle = Handle::parse(&raw)?;
                    engine.driver.reconcile_handle(&handle).await?
                }
                None => engine.driver.reconcile_all().await?,
            };
            print_json(&report)?;
        }
        Command::Status { handle } => {
            let engine = build_engine(&config, &params)?;
            let handle = Handle::parse(&handle)?;
            print_json(&engine.driver.status(&handle).await?)?;
        }
        Command::Provision { module } => {
            let engine = build_engine(&config, &params)?;
            let key = ModuleKey::parse(&module)?;
            let module = engine.enrollment.registry().module(key.as_str())?;
            let naming = NamingResolver::new(&params).resolve(module)?;
            let report = engine.assigner.provision_all(&naming).await?;
            for title in &report.created_lists {
                println!("created list          {title}");
            }
            for title in &report.created_starter_packs {
                println!("created starter pack  {title}");
            }
            if report.created_lists.is_empty() && report.created_starter_packs.is_empty() {
                println!("{key}: every group already exists");
            }
        }
    }

    Ok(())
}
