//! DECSA Bot console entry point
//!
//! Runs the conversation engine against stdin/stdout as user `console:local`.
//! `/start` and `/reset` clear the conversation; `/quit` exits.

use secrecy::ExposeSecret;
use std::sync::Arc;
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use decsa_bot::adapters::{
    CachedClaimValidator, CachedIntentClassifier, ConsoleSender, InMemoryConversationStore,
    InMemoryCustomerDirectory, InMemoryResponseCache, MockClaimValidator, MockIntentClassifier,
    OpenAIChatClient, OpenAIClaimValidator, OpenAIConfig, OpenAIIntentClassifier,
    RedisConversationStore, RedisResponseCache,
};
use decsa_bot::application::{
    HandleInboundMessageCommand, HandleInboundMessageHandler, ResetConversationHandler, ResetKind,
    TurnConfig,
};
use decsa_bot::config::{AppConfig, LoggingConfig, RedisConfig};
use decsa_bot::domain::conversation::{ConversationEngine, EngineConfig, EngineServices};
use decsa_bot::domain::foundation::{Channel, UserKey};
use decsa_bot::ports::{ClaimValidator, ConversationStore, IntentClassifier, ResponseCache};

/// Environment variable naming a JSON fixture for the customer directory.
const FIXTURES_VAR: &str = "DECSA_BOT_FIXTURES";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;
    init_tracing(&config.logging)?;

    tracing::info!("Starting DECSA Bot v{}", env!("CARGO_PKG_VERSION"));

    let (store, cache) = init_memory(config.redis.as_ref()).await;
    let (classifier, validator) = init_models(&config, cache)?;
    let directory = Arc::new(init_directory().await?);

    let engine = ConversationEngine::new(
        EngineServices {
            classifier,
            validator,
            identities: directory.clone(),
            complaints: directory.clone(),
            updates: directory.clone(),
            invoices: directory,
        },
        EngineConfig {
            max_cascade_hops: config.conversation.max_cascade_hops,
            call_timeout: config.conversation.call_timeout(),
        },
    );

    let sender = Arc::new(ConsoleSender::new());
    let turn_config = TurnConfig {
        history_window: config.conversation.history_window,
        store_timeout: config
            .redis
            .as_ref()
            .map(RedisConfig::timeout)
            .unwrap_or(TurnConfig::default().store_timeout),
    };
    let messages =
        HandleInboundMessageHandler::new(Arc::new(engine), store.clone(), sender.clone(), turn_config);
    let resets = ResetConversationHandler::new(store, sender, messages.locks());

    let user = UserKey::new(Channel::Console, "local")?;
    println!("Escribí tu mensaje (/start, /reset, /quit).");

    let mut lines = BufReader::new(io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let result = match line {
            "" => continue,
            "/quit" | "/exit" => break,
            "/start" => resets.handle(&user, ResetKind::Start).await,
            "/reset" => resets.handle(&user, ResetKind::Reset).await,
            text => messages
                .handle(HandleInboundMessageCommand::new(user.clone(), text))
                .await
                .map(|_| ()),
        };
        if let Err(e) = result {
            tracing::error!(error = %e, "Message could not be handled");
        }
    }

    tracing::info!("Console closed");
    Ok(())
}

fn init_tracing(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = config.env_filter()?;

    // Logs go to stderr so replies stay readable on stdout.
    let fmt_layer = if config.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
    Ok(())
}

/// Conversation store and response cache: Redis when configured and
/// reachable, in-memory otherwise.
async fn init_memory(
    redis: Option<&RedisConfig>,
) -> (Arc<dyn ConversationStore>, Arc<dyn ResponseCache>) {
    if let Some(redis) = redis {
        match connect_redis(redis).await {
            Ok(conn) => {
                tracing::info!("Using Redis conversation store and cache");
                return (
                    Arc::new(RedisConversationStore::new(conn.clone())),
                    Arc::new(RedisResponseCache::new(conn)),
                );
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to connect to Redis. Falling back to in-memory.");
            }
        }
    } else {
        tracing::info!("Redis not configured, using in-memory conversation store");
    }

    (
        Arc::new(InMemoryConversationStore::new()),
        Arc::new(InMemoryResponseCache::new()),
    )
}

async fn connect_redis(
    config: &RedisConfig,
) -> Result<redis::aio::MultiplexedConnection, Box<dyn std::error::Error>> {
    let client = redis::Client::open(config.url.as_str())?;
    let conn =
        tokio::time::timeout(config.timeout(), client.get_multiplexed_tokio_connection()).await??;
    Ok(conn)
}

type Models = (Arc<dyn IntentClassifier>, Arc<dyn ClaimValidator>);

fn init_models(
    config: &AppConfig,
    cache: Arc<dyn ResponseCache>,
) -> Result<Models, Box<dyn std::error::Error>> {
    let Some(api_key) = config.ai.openai_api_key.as_ref().filter(|_| config.ai.has_openai())
    else {
        tracing::warn!("No OpenAI API key configured, running the offline classifier");
        return Ok((
            Arc::new(MockIntentClassifier::new()),
            Arc::new(MockClaimValidator::new()),
        ));
    };

    let client = Arc::new(OpenAIChatClient::new(
        OpenAIConfig::new(api_key.expose_secret().as_str())
            .with_model(&config.ai.model)
            .with_base_url(&config.ai.base_url)
            .with_timeout(config.ai.timeout())
            .with_temperature(config.ai.temperature),
    )?);
    tracing::info!(model = %config.ai.model, "Using OpenAI classifier and validator");

    let ttl = config.ai.cache_ttl();
    Ok((
        Arc::new(CachedIntentClassifier::new(
            Arc::new(OpenAIIntentClassifier::new(client.clone())),
            cache.clone(),
            ttl,
        )),
        Arc::new(CachedClaimValidator::new(
            Arc::new(OpenAIClaimValidator::new(client)),
            cache,
            ttl,
        )),
    ))
}

async fn init_directory() -> Result<InMemoryCustomerDirectory, Box<dyn std::error::Error>> {
    match std::env::var(FIXTURES_VAR) {
        Ok(path) => {
            let json = tokio::fs::read_to_string(&path).await?;
            let directory = InMemoryCustomerDirectory::from_json(&json)?;
            tracing::info!(path = %path, "Customer directory loaded from fixture");
            Ok(directory)
        }
        Err(_) => {
            tracing::warn!("{} not set, customer directory is empty", FIXTURES_VAR);
            Ok(InMemoryCustomerDirectory::new())
        }
    }
}
