//! Core application

use anyhow::{Context, Result};

use crate::api::ApiServer;
use crate::api::openapi::build_openapi;
use crate::api::routes::users::UsersApiState;
use crate::core::banner;
use crate::core::cli::{self, CliConfig, Commands};
use crate::core::config::AppConfig;
use crate::core::constants::{APP_NAME_LOWER, ENV_LOG};
use crate::core::shutdown::ShutdownService;

pub struct CoreApp {
    pub shutdown: ShutdownService,
    pub config: AppConfig,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub async fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        Self::init_logging();

        tracing::debug!("Application starting");

        let (cli_config, command) = cli::parse();
        tracing::trace!(command = ?command, "Parsed command");

        let app = Self::init(&cli_config)?;

        match command {
            Some(Commands::Openapi) => app.print_openapi(),
            Some(Commands::Start) | None => Self::start_server(app).await,
        }
    }

    fn init(cli: &CliConfig) -> Result<Self> {
        let config = AppConfig::load(cli)?;
        Ok(Self {
            shutdown: ShutdownService::new(),
            config,
        })
    }

    fn print_openapi(&self) -> Result<()> {
        let users = UsersApiState::new(&self.config.filters_config(), &self.config.filters.sort_param)
            .context("Failed to compile users filter specification")?;
        let doc = build_openapi(&users)?;
        println!("{}", serde_json::to_string_pretty(&doc)?);
        Ok(())
    }

    fn init_logging() {
        let default_filter = format!("info,{}=info", APP_NAME_LOWER);

        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(default_filter);

        tracing_subscriber::fmt()
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .compact()
            .with_env_filter(filter)
            .init();
    }

    async fn start_server(app: Self) -> Result<()> {
        app.shutdown.install_signal_handlers();

        banner::print_banner(
            &app.config.server.host,
            app.config.server.port,
            &app.config.filters.alias_style.to_string(),
            &app.config.filters.sort_param,
        );

        ApiServer::new(app).start().await?;
        tracing::debug!("Shutdown complete");

        Ok(())
    }
}
