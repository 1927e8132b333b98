use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    /// Timeout applied to every candidate-page fetch.
    pub scraper_request_timeout_secs: u64,
    pub scraper_user_agent: String,
    /// How many result URLs to take from each search phrase.
    pub search_results_per_query: usize,
    /// Courtesy pause between search phrases, not a retry backoff.
    pub search_inter_query_delay_ms: u64,
    pub search_locale: String,
    pub physical_results_cap: usize,
    pub online_results_cap: usize,
    pub merged_results_cap: usize,
    pub viacep_base_url: String,
    pub search_base_url: String,
    pub osrm_base_url: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field(
                "scraper_request_timeout_secs",
                &self.scraper_request_timeout_secs,
            )
            .field("scraper_user_agent", &self.scraper_user_agent)
            .field("search_results_per_query", &self.search_results_per_query)
            .field(
                "search_inter_query_delay_ms",
                &self.search_inter_query_delay_ms,
            )
            .field("search_locale", &self.search_locale)
            .field("physical_results_cap", &self.physical_results_cap)
            .field("online_results_cap", &self.online_results_cap)
            .field("merged_results_cap", &self.merged_results_cap)
            .field("viacep_base_url", &self.viacep_base_url)
            .field("search_base_url", &self.search_base_url)
            .field("osrm_base_url", &self.osrm_base_url)
            .finish()
    }
}
