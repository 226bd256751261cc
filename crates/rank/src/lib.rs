pub mod engine;
pub mod pipeline;
pub mod summary;

pub use engine::{RankEngine, cosine_similarity};
pub use pipeline::{HookPipeline, PipelineError};
pub use summary::style_hint;
