use crate::providers::yahoo::DEFAULT_BASE_URL;

/// 快照来源标签，供前端区分数据来源
pub const DEFAULT_SOURCE_TAG: &str = "GHA";

pub struct Config {
    pub output_path: String,
    pub timeout_secs: u64,
    pub base_url: String,
    pub source_tag: String,
}

impl Config {
    pub fn new() -> Self {
        Self {
            output_path: "data.json".to_string(),
            timeout_secs: 30,
            base_url: DEFAULT_BASE_URL.to_string(),
            source_tag: DEFAULT_SOURCE_TAG.to_string(),
        }
    }

    pub fn with_output_path(mut self, path: &str) -> Self {
        self.output_path = path.to_string();
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_source_tag(mut self, tag: &str) -> Self {
        self.source_tag = tag.to_string();
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
