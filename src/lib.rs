pub mod logger;
pub mod stereo_pipeline;
