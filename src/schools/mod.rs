//! School recommendations: profile and school records, the curated catalog,
//! prompt construction, and the recommender that calls the LLM.

pub mod catalog;
pub mod model;
pub mod prompts;
pub mod recommender;

pub use catalog::{CatalogEntry, SchoolCatalog};
pub use model::{School, UserProfile};
pub use recommender::{LlmRecommender, RecommenderConfig, SchoolRecommender};
