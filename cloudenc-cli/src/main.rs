mod cli;
mod commands;
mod config;
mod error;

use std::process;

use clap::Parser;
use cloudenc::CloudencClient;
use tracing::{Level, error};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use crate::{
    cli::{Args, Commands},
    config::ConfigProvider,
    error::{AppError, Result},
};

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = run(args).await {
        error!("Application error: {e}");
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    init_logging(args.verbose, args.quiet);

    let overrides = parse_overrides(&args.set)?;
    let config = ConfigProvider::load(overrides)?;

    let mut builder = CloudencClient::builder(config.api_key()?);
    if let Some(org) = config.tenant_org_id() {
        builder = builder.tenant_org_id(org);
    }
    let client = builder.build().map_err(AppError::Api)?;

    match args.command {
        Commands::Batch => commands::batch::run(&client, &config).await,
        Commands::PerTitle => commands::per_title::run(&client, &config).await,
        Commands::CencDrm => commands::cenc_drm::run(&client, &config).await,
        Commands::SpekeDrm => commands::speke_drm::run(&client, &config).await,
        Commands::HdrConversion => commands::hdr_conversion::run(&client, &config).await,
        Commands::Filters => commands::filters::run(&client, &config).await,
        Commands::Concatenation => commands::concatenation::run(&client, &config).await,
        Commands::MultiCodec => commands::multi_codec::run(&client, &config).await,
        Commands::RtmpLive => commands::rtmp_live::run(&client, &config).await,
        Commands::Ssai => commands::ssai::run(&client, &config).await,
        Commands::ChannelMixing => commands::channel_mixing::run(&client, &config).await,
    }
}

fn parse_overrides(set: &[String]) -> Result<Vec<(String, String)>> {
    set.iter()
        .map(|entry| {
            entry
                .split_once('=')
                .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
                .ok_or_else(|| AppError::InvalidOverride(entry.clone()))
        })
        .collect()
}

fn init_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(Level::INFO.into())
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_level(verbose))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_split_on_the_first_equals_sign() {
        let parsed = parse_overrides(&["DRM_FAIRPLAY_URI=skd://a=b".to_string()]).unwrap();
        assert_eq!(
            parsed,
            vec![("DRM_FAIRPLAY_URI".to_string(), "skd://a=b".to_string())]
        );
    }

    #[test]
    fn override_without_equals_is_rejected() {
        assert!(matches!(
            parse_overrides(&["JUSTAKEY".to_string()]),
            Err(AppError::InvalidOverride(_))
        ));
    }
}
