pub mod chart;
pub mod config;
pub mod output;
pub mod profile;
pub mod scoring;
pub mod world;
