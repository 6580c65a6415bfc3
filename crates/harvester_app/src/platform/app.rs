use std::sync::Arc;

use anyhow::Context;
use harvest_logging::{harvest_error, harvest_info, LogDestination};
use harvester_engine::{harvest, CatalogLister, FeedBuilder, HarvestConfig, ReqwestFetcher};
use log::LevelFilter;

/// Lists the whole catalog, then writes one feed per book into the working
/// directory.
pub fn run_app() -> anyhow::Result<()> {
    harvest_logging::initialize(LogDestination::Both, LevelFilter::Info);

    let output_dir = std::env::current_dir().context("no working directory")?;
    let config = HarvestConfig::default_with_output(output_dir);
    harvest_info!(
        "Harvesting {} pages of {} with {} workers",
        config.catalog_pages,
        config.listing_url,
        config.workers
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.workers)
        .enable_all()
        .build()
        .context("failed to start tokio runtime")?;

    runtime.block_on(run(config))
}

async fn run(config: HarvestConfig) -> anyhow::Result<()> {
    let fetcher = Arc::new(ReqwestFetcher::new(config.fetch.clone())?);

    let lister = CatalogLister::new(fetcher.clone(), config.catalog_pages);
    let addresses = match lister.list_books(&config.listing_url).await {
        Ok(addresses) => addresses,
        Err(err) => {
            harvest_error!(
                "Discarding {} addresses found before page {}",
                err.collected.len(),
                err.page
            );
            return Err(err.into());
        }
    };
    harvest_info!("Found {} books", addresses.len());

    let builder = Arc::new(FeedBuilder::from_config(fetcher, &config));
    let report = harvest(builder, addresses, config.workers).await;

    harvest_info!(
        "Done: {} feeds written, {} failed, {} of {} completed",
        report.succeeded(),
        report.failed(),
        report.completions.len(),
        report.total()
    );
    Ok(())
}
