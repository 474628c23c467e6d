//! orphan-studio CLI
#![deny(unsafe_code)]

use anyhow::Context;
use clap::Parser;
use orphan_studio::{Cli, Commands, commands};
use orphan_studio_core::config::ConfigLoader;
use tracing::debug;

mod observability;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    cli.color.apply();

    if cli.version_only {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // arg_required_else_help ensures we have --version-only or a subcommand
    let Some(command) = cli.command else {
        return Ok(());
    };

    if let Some(ref dir) = cli.chdir {
        std::env::set_current_dir(dir)
            .with_context(|| format!("failed to change directory to {}", dir.display()))?;
    }

    let cwd = std::env::current_dir().context("failed to determine current directory")?;
    let cwd = camino::Utf8PathBuf::try_from(cwd).map_err(|e| {
        anyhow::anyhow!(
            "current directory is not valid UTF-8: {}",
            e.into_path_buf().display()
        )
    })?;
    let mut loader = ConfigLoader::new().with_project_search(&cwd);
    if let Some(ref config_path) = cli.config {
        let config_path = camino::Utf8PathBuf::try_from(config_path.clone()).map_err(|e| {
            anyhow::anyhow!(
                "config path is not valid UTF-8: {}",
                e.into_path_buf().display()
            )
        })?;
        loader = loader.with_file(&config_path);
    }
    let (config, config_sources) = loader.load().context("failed to load configuration")?;

    let obs_config = observability::ObservabilityConfig::from_env_with_overrides(
        config
            .log_dir
            .as_ref()
            .map(|dir| dir.as_std_path().to_path_buf()),
    );
    let env_filter = observability::env_filter(cli.quiet, cli.verbose, config.log_level.as_str());
    let _guard = observability::init_observability(&obs_config, env_filter)
        .context("failed to initialize logging/tracing")?;

    debug!(
        verbose = cli.verbose,
        quiet = cli.quiet,
        json = cli.json,
        color = ?cli.color,
        chdir = ?cli.chdir,
        "CLI initialized"
    );

    let max_input = config.input_limit();
    let data_override = cli.data.as_deref();

    // Execute command
    let result = match command {
        Commands::Rhymes(args) => commands::rhymes::cmd_rhymes(
            args,
            cli.json,
            &commands::load_rhyme_bank(data_override, &config),
            config.suggestion_limit(),
            config.explore_limit(),
        ),
        Commands::Search(args) => commands::search::cmd_search(
            args,
            cli.json,
            &commands::load_rhyme_bank(data_override, &config),
            config.search_limit(),
        ),
        Commands::Cursor(args) => commands::cursor::cmd_cursor(
            args,
            cli.json,
            &commands::load_rhyme_bank(data_override, &config),
            config.suggestion_limit(),
            max_input,
        ),
        Commands::Stats(args) => commands::stats::cmd_stats(args, cli.json, max_input),
        Commands::Studio(args) => commands::session_store(args.session.as_deref(), &config)
            .and_then(|store| {
                let options = commands::studio::StudioOptions {
                    suggestion_limit: config.suggestion_limit(),
                    explore_limit: config.explore_limit(),
                    search_limit: config.search_limit(),
                    debounce: config.autosave_debounce(),
                };
                let data = commands::load_rhyme_bank(data_override, &config);
                commands::studio::cmd_studio(args, cli.json, &data, &store, options)
            }),
        Commands::Session(args) => commands::session_store(args.session.as_deref(), &config)
            .and_then(|store| commands::session::cmd_session(args, cli.json, &store)),
        Commands::Info(args) => commands::info::cmd_info(
            args,
            cli.json,
            &config,
            &config_sources,
            &commands::load_rhyme_bank(data_override, &config),
        ),
        #[cfg(feature = "mcp")]
        Commands::Serve(args) => {
            let limits = orphan_studio::server::ServerLimits {
                suggestion_limit: config.suggestion_limit(),
                explore_limit: config.explore_limit(),
                search_limit: config.search_limit(),
                max_input,
            };
            let data = commands::load_rhyme_bank(data_override, &config);
            let rt = tokio::runtime::Runtime::new()
                .context("failed to create async runtime for MCP server")?;
            rt.block_on(commands::serve::cmd_serve(args, data, limits))
        }
    };
    if let Err(ref err) = result {
        tracing::error!(error = %err, "fatal error");
    }
    result
}
