pub mod config;
pub mod error;
pub mod ffi;
pub mod input;
pub mod output;
pub mod route;
pub mod scoring;
pub mod weather;

pub use config::ScoringConfig;
pub use error::{LabelError, ScoreError};
pub use scoring::{
    LegCost, PolicyLabel, RouteAssessment, RouteScore, RouteScorer, risk_label_from_score,
    score_route_from_weather_matrix,
};
pub use weather::{Column, WeatherMatrix};
