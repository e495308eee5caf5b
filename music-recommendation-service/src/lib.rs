pub mod card;
pub mod catalog;
pub mod config;
pub mod error;
pub mod genre;
pub mod interrupt;
pub mod logging;
pub mod recognizer;
pub mod selector;
pub mod service;
pub mod steps;
pub mod workflow;

pub use config::{LogFormat, ServiceConfig};
pub use error::RecommendationError;
pub use service::{AppState, build_router};
pub use workflow::{Dependencies, FLOW_ID, build_recommendation_flow, create_flow_runner};
