mod app;
mod cli;

use std::process::ExitCode;

use clap::Parser;
use log::{debug, info};
use tern_core::config::{CacheBackend, KernelConfig};
use tern_core::kernel::{EnvironmentMap, ErrorHandler};
use tern_core::{Dispatch, Kernel, KernelError, Request};

use crate::cli::{CacheCommand, CliArgs, Commands};

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let env = env_logger::Env::default().default_filter_or(default_level);
    if let Err(e) = env_logger::Builder::from_env(env).try_init() {
        eprintln!("Failed to initialize env_logger: {}", e);
    }
}

fn load_config(args: &CliArgs) -> Result<KernelConfig, KernelError> {
    let mut config = KernelConfig::load_or_default(args.config.as_deref())?;
    if let Some(cache_dir) = &args.cache_dir {
        config.cache.backend = CacheBackend::File;
        config.cache.directory = cache_dir.clone();
    }
    if let Some(env_file) = &args.env_file {
        config.env_file = env_file.clone();
    }
    debug!("Effective config: {:?}", config);
    Ok(config)
}

async fn run(args: CliArgs) -> Result<(), KernelError> {
    let config = load_config(&args)?;
    let context = app::context(config)?;

    match args.command {
        Commands::Dispatch { path, method } => {
            let mut kernel = Kernel::new(context).await?;
            app::bind_environment(&mut kernel)?;
            match kernel.handle(&Request::new(method, path)).await? {
                Dispatch::Handled { path, handler } => info!("{} handled by {}", path, handler),
                Dispatch::NotFound { path } => info!("{} did not match any route", path),
            }
        }
        Commands::Cache {
            command: CacheCommand::Clear,
        } => {
            let pool = context.open_cache_pool()?;
            let removed = pool.clear()?;
            let noun = if removed == 1 { "entry" } else { "entries" };
            println!("Removed {} cached {} from the {} cache", removed, noun, pool.name());
        }
        Commands::Env => {
            let env = EnvironmentMap::new(context.env_source().load()?);
            for (name, value) in env.iter() {
                println!("{}={}", name, value);
            }
        }
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_logging(args.verbose);
    ErrorHandler::initialize();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            ErrorHandler::report(&e);
            eprintln!("Error: {}", ErrorHandler::describe(&e));
            ExitCode::FAILURE
        }
    }
}
