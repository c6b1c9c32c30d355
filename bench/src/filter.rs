use crate::config::BenchConfig;
use reqwest::header::{HeaderMap, HeaderName};

const CACHE_MISS: &str = "Miss";

/// Decides from response metadata whether an exchange becomes a sample.
pub trait SampleFilter: Send + Sync {
    fn retain(&self, headers: &HeaderMap) -> bool;
}

#[derive(Debug, Default)]
pub struct RetainAll;

impl SampleFilter for RetainAll {
    fn retain(&self, _headers: &HeaderMap) -> bool {
        true
    }
}

/// Discards responses whose cache header reports a miss, so that only
/// cache hits are measured when the target sits behind a CDN.
#[derive(Debug)]
pub struct CacheHitOnly {
    header: HeaderName,
}

impl CacheHitOnly {
    pub fn new(header: HeaderName) -> Self {
        CacheHitOnly { header }
    }
}

impl SampleFilter for CacheHitOnly {
    fn retain(&self, headers: &HeaderMap) -> bool {
        match headers.get(&self.header).map(|value| value.to_str()) {
            Some(Ok(value)) => !value.contains(CACHE_MISS),
            _ => true,
        }
    }
}

pub fn from_config(config: &BenchConfig) -> Box<dyn SampleFilter> {
    if config.only_hit {
        Box::new(CacheHitOnly::new(config.cache_header.clone()))
    } else {
        Box::new(RetainAll)
    }
}
