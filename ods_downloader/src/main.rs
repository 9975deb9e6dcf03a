use anyhow::Context;
use clap::Parser;
use ods_downloader::{
    clock::SystemClock,
    config::{DownloaderConfig, StorageConfig},
    fetcher::RegistryOrganisationFetcher,
    io::{
        s3::S3ObjectStore,
        store::{LocalObjectStore, ObjectStore},
    },
    logging::init_logging,
    pipeline::OdsDownloader,
    probe::TracingProbe,
    registry::ods_portal::{RegistryClient, ReqwestTransport},
    service::MetadataService,
};
use shared_utils::env::ProcessEnv;
use tracing::{error, info};

#[derive(Parser)]
#[command(
    version,
    about = "Builds the monthly organisation metadata document from the ODS registry"
)]
struct Cli {
    /// Print the document to stdout instead of writing it to the object store
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging().context("failed to initialise logging")?;

    if let Err(err) = run(cli).await {
        error!(error = format!("{err:#}"), "ODS download failed");
        return Err(err);
    }
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = DownloaderConfig::from_env(&ProcessEnv)?;
    info!(
        date_anchor = %config.date_anchor,
        build_tag = %config.build_tag,
        search_url = %config.search_url,
        "starting ODS download"
    );

    match config.storage.clone() {
        StorageConfig::S3 { endpoint_url } => {
            execute(cli, config, S3ObjectStore::new(endpoint_url)).await
        }
        StorageConfig::Local { root } => execute(cli, config, LocalObjectStore::new(root)).await,
    }
}

async fn execute(
    cli: Cli,
    config: DownloaderConfig,
    store: impl ObjectStore,
) -> anyhow::Result<()> {
    let client = RegistryClient::new(ReqwestTransport::new()?, config.search_url.clone());
    let service = MetadataService::new(RegistryOrganisationFetcher::new(client), TracingProbe);
    let downloader = OdsDownloader::new(config, service, store, SystemClock);

    if cli.dry_run {
        let document = downloader.build_document().await?;
        println!("{}", serde_json::to_string_pretty(&document)?);
    } else {
        let uri = downloader.run().await?;
        info!(uri = %uri, "ODS download complete");
    }
    Ok(())
}
