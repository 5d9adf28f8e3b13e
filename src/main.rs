use anyhow::Context;
use cert_coach::app::App;
use cert_coach::config::Config;
use cert_coach::llm::gateways::OpenAIGateway;
use cert_coach::llm::LlmClient;
use cert_coach::store::ConversationStore;
use cert_coach::web::{self, AppContext};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;
    if config.openai.api_key.is_empty() {
        warn!("OPENAI_API_KEY is not set; every completion will report an error");
    }

    let gateway = Arc::new(OpenAIGateway::with_config(config.openai.clone()));
    let client = LlmClient::new(config.model.clone(), gateway);
    let store = ConversationStore::new(config.conversations_dir.clone());
    info!(
        model = %config.model,
        conversations = %config.conversations_dir.display(),
        "Configuration loaded"
    );

    let ctx = AppContext::new(App::new(config.default_user.clone()), client, store);
    web::serve(ctx, config.bind)
        .await
        .with_context(|| format!("Server on {} failed", config.bind))?;
    Ok(())
}
