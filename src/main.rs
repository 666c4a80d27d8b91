use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use vidscribe::application::ports::BatchTranscriptionClient;
use vidscribe::application::services::{JobPoller, ScratchSpace, TranscriptionService};
use vidscribe::infrastructure::audio::FfmpegAudioExtractor;
use vidscribe::infrastructure::observability::{TracingConfig, init_tracing};
use vidscribe::infrastructure::speech::{AzureBatchTranscriptionClient, JobOptions};
use vidscribe::infrastructure::storage::BlobStoreFactory;
use vidscribe::presentation::config::SpeechSettings;
use vidscribe::presentation::{AppState, Environment, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment)?;

    init_tracing(&TracingConfig::new(environment, &settings.logging));

    let pipeline = &settings.pipeline;
    let extractor = Arc::new(FfmpegAudioExtractor::new(
        &pipeline.ffmpeg_path,
        pipeline.conversion_timeout(),
    ));
    let blob_store = BlobStoreFactory::create(&settings.storage)?;
    let speech_client = speech_client(&settings.speech)?;
    let poller = JobPoller::new(
        Arc::clone(&speech_client),
        pipeline.poll_interval(),
        pipeline.poll_timeout(),
    );

    let transcription_service = Arc::new(TranscriptionService::new(
        ScratchSpace::new(&pipeline.scratch_dir),
        extractor,
        blob_store,
        speech_client,
        poller,
        settings.storage.sas_expiry(),
    ));

    let shutdown = CancellationToken::new();
    let state = AppState::new(transcription_service)
        .with_shutdown(shutdown.clone())
        .with_max_upload_bytes(settings.server.max_upload_bytes());

    let router = create_router(state);

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        container = %settings.storage.container,
        scratch_dir = %pipeline.scratch_dir,
        "Listening"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

fn speech_client(
    settings: &SpeechSettings,
) -> anyhow::Result<Arc<dyn BatchTranscriptionClient>> {
    let options = JobOptions {
        locale: settings.locale.clone(),
        display_name: settings.display_name.clone(),
        punctuation_mode: settings.punctuation_mode.clone(),
        word_level_timestamps: settings.word_level_timestamps,
    };

    let client = match &settings.endpoint {
        Some(endpoint) => {
            AzureBatchTranscriptionClient::with_endpoint(endpoint, &settings.key, options)?
        }
        None => AzureBatchTranscriptionClient::for_region(&settings.region, &settings.key, options)?,
    };

    Ok(Arc::new(client))
}

async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    tracing::info!("Shutdown signal received, cancelling in-flight transcriptions");
    shutdown.cancel();
}
