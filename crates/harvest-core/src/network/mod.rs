mod client;
mod config;

pub use client::{FetchError, FetchResult, Fetcher, HttpFetcher};
pub use config::FetchConfig;
