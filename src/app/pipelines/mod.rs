pub mod follow_pipeline;

pub use follow_pipeline::FollowPipeline;
