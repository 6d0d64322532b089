use bank_criteria::clients::embedder::HttpEmbedder;
use bank_criteria::clients::llm::ChatClient;
use bank_criteria::db::{ensure_schema, establish_connection_pool};
use bank_criteria::models::config::AppConfig;
use bank_criteria::processing::batch::{ProcessFilter, process_raw_data};
use bank_criteria::processing::extraction::CriterionExtractor;
use bank_criteria::repository::DieselRepository;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let pool = match establish_connection_pool(&config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };

    {
        let mut conn = match pool.get() {
            Ok(conn) => conn,
            Err(e) => {
                log::error!("Failed to get database connection: {e}");
                std::process::exit(1);
            }
        };
        if let Err(e) = ensure_schema(&mut conn) {
            log::error!("Failed to apply database schema: {e}");
            std::process::exit(1);
        }
    }

    let repo = DieselRepository::new(pool);

    let chat_client = match ChatClient::new(
        &config.model_api_base,
        &config.model,
        config.llm_api_key.clone(),
    ) {
        Ok(client) => client,
        Err(e) => {
            log::error!("Failed to build LLM client: {e}");
            std::process::exit(1);
        }
    };
    let extractor = CriterionExtractor::new(chat_client);

    let embedder = match HttpEmbedder::new(&config.embedder_url, config.embedder_dimensions) {
        Ok(embedder) => embedder,
        Err(e) => {
            log::error!("Failed to build embedding client: {e}");
            std::process::exit(1);
        }
    };

    log::info!("Starting daily criteria processing");
    let summary = process_raw_data(&repo, &extractor, &embedder, &ProcessFilter::default()).await;
    log::info!("Finished daily criteria processing: {summary}");
}
