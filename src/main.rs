use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use caresight::application::ports::AssessmentRepository;
use caresight::application::services::{
    AnalysisService, PipelineConfig, ReviewPipeline, TaskTracker,
};
use caresight::infrastructure::llm::OpenAiChatClient;
use caresight::infrastructure::media::FfmpegProcessor;
use caresight::infrastructure::observability::{TracingConfig, init_tracing};
use caresight::infrastructure::persistence::{
    InMemoryAssessmentRepository, PgAssessmentRepository, create_pool,
};
use caresight::infrastructure::prompts::{FilePromptSource, PromptPaths};
use caresight::infrastructure::storage::MediaStoreFactory;
use caresight::infrastructure::stt::OpenAiTranscriber;
use caresight::infrastructure::text_processing::FixedWindowSplitter;
use caresight::presentation::{AppState, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env().context("configuration")?;

    init_tracing(TracingConfig::default(), settings.server.port);

    let media_store =
        MediaStoreFactory::create(&settings.storage).context("media store")?;

    let processor = Arc::new(FfmpegProcessor::new());

    let speech_to_text = Arc::new(
        OpenAiTranscriber::new(
            settings.llm.api_key.clone(),
            settings.llm.base_url.clone(),
            Some(settings.transcription.model.clone()),
        )
        .context("transcription client")?,
    );

    let llm = Arc::new(
        OpenAiChatClient::new(
            settings.llm.api_key.clone(),
            settings.llm.base_url.clone(),
            settings.llm.chat_model.clone(),
            settings.llm.max_tokens,
            settings.llm.temperature,
        )
        .context("llm client")?,
    );

    let windower = Arc::new(FixedWindowSplitter::new(
        settings.pipeline.max_window_tokens,
    ));

    let prompts = Arc::new(FilePromptSource::new(PromptPaths::from_dir(
        &settings.pipeline.prompt_dir,
    )));

    let assessments: Arc<dyn AssessmentRepository> = match &settings.database.url {
        Some(url) => {
            let pool = create_pool(url, settings.database.max_connections)
                .await
                .context("database pool")?;
            Arc::new(PgAssessmentRepository::new(pool))
        }
        None => {
            tracing::warn!(
                "DATABASE_URL not set, assessments are kept in memory and lost on restart"
            );
            Arc::new(InMemoryAssessmentRepository::new())
        }
    };

    let tracker = Arc::new(TaskTracker::new());

    let pipeline = Arc::new(ReviewPipeline::new(
        Arc::clone(&media_store),
        processor,
        speech_to_text,
        windower,
        llm,
        prompts,
        Arc::clone(&assessments),
        Arc::clone(&tracker),
        PipelineConfig {
            chunk_byte_ceiling: settings.pipeline.chunk_byte_ceiling,
            model_name: settings.llm.chat_model.clone(),
        },
    ));

    let analysis_service = Arc::new(AnalysisService::new(pipeline, tracker, assessments));

    let state = AppState {
        analysis_service,
        media_store,
        settings: settings.clone(),
    };

    let router = create_router(state);

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("server address")?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
