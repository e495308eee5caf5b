use std::sync::Arc;
use tracing::info;
use turn_flow::{Flow, FlowBuilder, FlowRunner, SessionStorage};

use crate::{
    card::{AdaptiveCardRenderer, CardRenderer},
    catalog::Catalog,
    config::ServiceConfig,
    error::RecommendationError,
    genre::GenreResolver,
    interrupt::GlobalCommands,
    recognizer::{HttpRecognizer, Recognizer, UnconfiguredRecognizer},
    selector::RecommendationSelector,
    steps::{ConfirmStep, IntroStep, RecommendStep, RecommendationState, ResolveGenreStep},
};

pub const FLOW_ID: &str = "music_recommendation";

/// Collaborators the recommendation steps are wired with
#[derive(Clone)]
pub struct Dependencies {
    pub catalog: Arc<Catalog>,
    pub recognizer: Arc<dyn Recognizer>,
    pub selector: Arc<RecommendationSelector>,
    pub renderer: Arc<dyn CardRenderer>,
}

impl Dependencies {
    /// Built-in catalog plus whatever the configuration enables
    pub fn from_config(config: &ServiceConfig) -> Result<Self, RecommendationError> {
        let catalog = Arc::new(Catalog::builtin());
        catalog.validate()?;

        let recognizer: Arc<dyn Recognizer> = match &config.recognizer_endpoint {
            Some(endpoint) => {
                info!(endpoint = %endpoint, "Using HTTP recognizer");
                Arc::new(HttpRecognizer::new(
                    endpoint.clone(),
                    config.recognizer_key.clone(),
                    config.recognizer_timeout,
                )?)
            }
            None => {
                info!("No recognizer configured, genres will be offered as a list");
                Arc::new(UnconfiguredRecognizer)
            }
        };

        let selector = match config.seed {
            Some(seed) => RecommendationSelector::seeded(catalog.clone(), seed),
            None => RecommendationSelector::new(catalog.clone()),
        };

        Ok(Self {
            catalog,
            recognizer,
            selector: Arc::new(selector),
            renderer: Arc::new(AdaptiveCardRenderer::new(config.search_prefix.clone())),
        })
    }
}

/// Intro → ResolveGenre → Recommend → Confirm, with cancel/restart commands
pub fn build_recommendation_flow(deps: &Dependencies) -> Flow<RecommendationState> {
    let resolver = GenreResolver::new(deps.catalog.clone());

    FlowBuilder::new(FLOW_ID)
        .add_step(Arc::new(IntroStep::new(deps.recognizer.clone())))
        .add_step(Arc::new(ResolveGenreStep::new(
            deps.recognizer.clone(),
            resolver.clone(),
            deps.catalog.clone(),
        )))
        .add_step(Arc::new(RecommendStep::new(
            resolver,
            deps.selector.clone(),
            deps.renderer.clone(),
        )))
        .add_step(Arc::new(ConfirmStep))
        .with_interrupt_handler(Arc::new(GlobalCommands))
        .build()
}

pub fn create_flow_runner(
    deps: &Dependencies,
    session_storage: Arc<dyn SessionStorage<RecommendationState>>,
) -> FlowRunner<RecommendationState> {
    let flow = Arc::new(build_recommendation_flow(deps));
    FlowRunner::new(flow, session_storage)
}
