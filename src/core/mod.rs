//! Configuration and the pipeline that applies it

pub mod config;
pub mod pipeline;
