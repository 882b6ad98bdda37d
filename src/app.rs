//! Main application orchestration and execution

use crate::{
    cli::Cli,
    config::{display_config_summary, load_config, validate_config},
    error::Result,
    logging::Logger,
    models::Config,
    output::{OutputCoordinator, OutputFormatterFactory},
    probe::{ProbeRunner, RunContext},
    targets,
    types::{RunOutcome, Target},
};

/// Main application struct that coordinates all components
pub struct App {
    cli: Cli,
}

impl App {
    /// Create a new application instance with CLI configuration
    pub fn new(cli: Cli) -> Result<Self> {
        Ok(Self { cli })
    }

    /// Run the application
    pub async fn run(self) -> Result<RunOutcome> {
        let config = load_config(self.cli.clone())?;
        let logger = Logger::with_config("APP", &config);

        let mut coordinator = OutputCoordinator::stdout(OutputFormatterFactory::create_formatter(&config));

        if self.cli.list {
            coordinator.display_target_list(&targets::all())?;
            return Ok(RunOutcome::Completed);
        }

        let name = self.cli.target.clone().unwrap_or_default();
        let target = targets::resolve(&name)?;

        if config.debug {
            logger
                .debug("Configuration loaded")
                .field("summary", display_config_summary(&config))
                .log()
                .await;
        }

        // Warnings go to stderr so `--json` output stays clean
        for warning in validate_config(&config)? {
            eprintln!("{}", warning.format(config.enable_color && !config.json_output()));
        }

        logger.add_context_field("target", &target.name).await;
        logger
            .info(&format!("Starting probe of {}", target))
            .field("count", config.packet_count)
            .log()
            .await;

        let outcome = Self::run_probe(&config, &logger, &target, &mut coordinator).await?;

        logger
            .info("Run complete")
            .field("outcome", format!("{:?}", outcome))
            .log()
            .await;

        Ok(outcome)
    }

    async fn run_probe(
        config: &Config,
        logger: &Logger,
        target: &Target,
        coordinator: &mut OutputCoordinator<std::io::Stdout>,
    ) -> Result<RunOutcome> {
        let ctx = RunContext::new(config.stop_grace());
        let runner = ProbeRunner::with_logger(config, logger.named("PROBE"));

        // Listen for Ctrl-C before ping starts
        let stopper = {
            let handle = ctx.handle();
            let logger = logger.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    logger.info("Interrupt received, stopping test").log().await;
                    if let Some(termination) = handle.cancel().await {
                        logger
                            .debug(&format!("Ping terminated: {:?}", termination))
                            .log()
                            .await;
                    }
                }
            })
        };

        if let Err(e) = coordinator.display_header(target, config.packet_count) {
            stopper.abort();
            return Err(e);
        }
        let mut events = runner.run(target, config.packet_count, ctx.clone());

        let mut write_result = Ok(());
        while let Some(event) = events.recv().await {
            if let Err(e) = coordinator.display_event(&event) {
                // stdout is gone (e.g. a closed pipe); stop the run and report once it has wound down
                ctx.request();
                write_result = Err(e);
                break;
            }
        }

        if write_result.is_err() {
            drop(events);
            if let Some(termination) = ctx.cancel().await {
                logger
                    .debug(&format!("Ping terminated: {:?}", termination))
                    .log()
                    .await;
            }
        }

        if ctx.is_cancelled() && write_result.is_ok() {
            // Interrupted: the listener may still be waiting out the grace window
            let _ = stopper.await;
        } else {
            stopper.abort();
        }

        write_result?;
        coordinator.finish(target)
    }
}
