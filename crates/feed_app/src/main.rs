mod cli;
mod config;
mod logging;
mod render;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use feed_api::{Photo, ReqwestPhotoService};
use feed_core::{PhotosViewModel, ViewState};
use feed_logging::{feed_error, feed_info};

use cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::initialize(cli.log, cli.log_level());

    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            feed_error!("{:#}", err);
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
    let config = cli.apply(config::load_config(&cli.config)?);
    let service = ReqwestPhotoService::new(config.api_settings())
        .context("failed to build photo API client")?;
    let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;

    let mut view_model = PhotosViewModel::new(Arc::new(service), runtime.handle().clone());
    view_model.subscribe(|state: &ViewState<Vec<Photo>>| {
        println!("{}", render::render_state(state));
    });

    feed_info!("Requesting {} photos from {}", config.order_by, config.base_url);
    view_model.load(config.order_by);
    runtime.block_on(view_model.wait_for_response());

    for photo in view_model.photos() {
        println!("{}", render::render_photo(photo));
    }
    let failed = matches!(view_model.state(), ViewState::Failed(_));
    view_model.teardown();

    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
