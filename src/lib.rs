pub mod config;
pub mod entries;
pub mod error;
pub mod essential;
pub mod http_client;
pub mod pacer;
pub mod persist;
pub mod pipeline;
pub mod profile;
pub mod ranking;
pub mod scoring;
pub mod tracks;
pub mod units;
