use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Qualifying list scraped by `collect` (both genders on one page)
pub const DEFAULT_COLLECT_URL: &str =
    "https://tf.tfrrs.org/lists/5352/2025_2026_NCAA_Division_I_Indoor_Qualifying_List?gender=";

/// Placeholder replaced by the snapshot date in file names
pub const DATE_PLACEHOLDER: &str = "{date}";

/// What to do when no snapshot yields a cutoff
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptySeriesPolicy {
    /// Draw an empty chart
    Render,
    /// Fail the build with `EmptySeries`
    Fail,
}

impl EmptySeriesPolicy {
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "render" => Ok(EmptySeriesPolicy::Render),
            "fail" => Ok(EmptySeriesPolicy::Fail),
            _ => Err(format!("Invalid EMPTY_SERIES_POLICY: {}. Must be render or fail", s)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EmptySeriesPolicy::Render => "render",
            EmptySeriesPolicy::Fail => "fail",
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Invalid LOG_FORMAT: {}. Must be pretty or json", s)),
        }
    }
}

/// Where snapshots are read from
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// Directory path or `http(s)://` base URL
    pub location: String,
    pub index_file: String,
    pub snapshot_file_template: String,
    pub fetch_timeout_secs: u64,
    /// Upper bound on in-flight snapshot fetches; 0 means unbounded
    pub max_concurrent_fetches: usize,
}

/// Chart output settings
#[derive(Debug, Clone)]
pub struct ChartConfig {
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// Qualifying list scraper settings
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    pub url: String,
    pub top_n: usize,
    pub user_agent: String,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub source: SourceConfig,
    pub chart: ChartConfig,
    pub collector: CollectorConfig,
    pub cutoff_rank: u32,
    pub empty_series_policy: EmptySeriesPolicy,
    pub log_level: String,
    pub log_format: LogFormat,
}

fn parsed<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T, String> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| format!("Invalid {}: {}", key, raw)),
        None => Ok(default),
    }
}

impl SourceConfig {
    /// Create source config from an arbitrary key lookup
    pub fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let defaults = Self::default();

        let location = lookup("DATA_SOURCE").unwrap_or(defaults.location);
        let index_file = lookup("INDEX_FILE").unwrap_or(defaults.index_file);
        let snapshot_file_template =
            lookup("SNAPSHOT_FILE_TEMPLATE").unwrap_or(defaults.snapshot_file_template);
        let fetch_timeout_secs = parsed(lookup, "FETCH_TIMEOUT_SECS", defaults.fetch_timeout_secs)?;
        let max_concurrent_fetches =
            parsed(lookup, "MAX_CONCURRENT_FETCHES", defaults.max_concurrent_fetches)?;

        // Validate configuration
        if location.trim().is_empty() {
            return Err("DATA_SOURCE must not be empty".to_string());
        }

        if !snapshot_file_template.contains(DATE_PLACEHOLDER) {
            return Err(format!(
                "SNAPSHOT_FILE_TEMPLATE must contain {}: {}",
                DATE_PLACEHOLDER, snapshot_file_template
            ));
        }

        if fetch_timeout_secs == 0 {
            return Err("FETCH_TIMEOUT_SECS must be greater than 0".to_string());
        }

        Ok(Self {
            location,
            index_file,
            snapshot_file_template,
            fetch_timeout_secs,
            max_concurrent_fetches,
        })
    }

    /// Check if snapshots come over HTTP rather than from disk
    pub fn is_remote(&self) -> bool {
        self.location.starts_with("http://") || self.location.starts_with("https://")
    }

    /// File name of the snapshot for a date
    pub fn snapshot_file_name(&self, date: &str) -> String {
        self.snapshot_file_template.replace(DATE_PLACEHOLDER, date)
    }

    /// Get fetch timeout as Duration
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            location: "data".to_string(),
            index_file: "dates.json".to_string(),
            snapshot_file_template: "tfrrs_data ({date}).json".to_string(),
            fetch_timeout_secs: 10,
            max_concurrent_fetches: 8,
        }
    }
}

impl ChartConfig {
    pub fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let defaults = Self::default();

        let output = lookup("CHART_OUTPUT").map(PathBuf::from).unwrap_or(defaults.output);
        let width = parsed(lookup, "CHART_WIDTH", defaults.width)?;
        let height = parsed(lookup, "CHART_HEIGHT", defaults.height)?;

        if width == 0 || height == 0 {
            return Err("CHART_WIDTH and CHART_HEIGHT must be greater than 0".to_string());
        }

        Ok(Self { output, width, height })
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("cutoff_chart.svg"),
            width: 1280,
            height: 720,
        }
    }
}

impl CollectorConfig {
    pub fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let defaults = Self::default();

        let url = lookup("COLLECT_URL").unwrap_or(defaults.url);
        let top_n = parsed(lookup, "COLLECT_TOP_N", defaults.top_n)?;
        let user_agent = lookup("COLLECT_USER_AGENT").unwrap_or(defaults.user_agent);

        if top_n == 0 {
            return Err("COLLECT_TOP_N must be greater than 0".to_string());
        }

        Ok(Self { url, top_n, user_agent })
    }
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_COLLECT_URL.to_string(),
            top_n: 20,
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
        }
    }
}

impl AppConfig {
    /// Create application config from environment variables
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(&|key: &str| env::var(key).ok())
    }

    /// Create application config from an arbitrary key lookup
    pub fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let source = SourceConfig::from_lookup(lookup)?;
        let chart = ChartConfig::from_lookup(lookup)?;
        let collector = CollectorConfig::from_lookup(lookup)?;

        let cutoff_rank = parsed(lookup, "CUTOFF_RANK", 16u32)?;

        let empty_series_policy = match lookup("EMPTY_SERIES_POLICY") {
            Some(raw) => EmptySeriesPolicy::from_str(&raw)?,
            None => EmptySeriesPolicy::Render,
        };

        let log_level = lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        let log_format = match lookup("LOG_FORMAT") {
            Some(raw) => LogFormat::from_str(&raw)?,
            None => LogFormat::Pretty,
        };

        if cutoff_rank == 0 {
            return Err("CUTOFF_RANK must be greater than 0".to_string());
        }

        // Validate log level
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&log_level.to_lowercase().as_str()) {
            return Err(format!(
                "Invalid LOG_LEVEL: {}. Must be one of: {:?}",
                log_level, valid_log_levels
            ));
        }

        Ok(Self {
            source,
            chart,
            collector,
            cutoff_rank,
            empty_series_policy,
            log_level: log_level.to_lowercase(),
            log_format,
        })
    }

    /// Directory the collector writes into (the local data source)
    pub fn data_dir(&self) -> PathBuf {
        if self.source.is_remote() {
            PathBuf::from("data")
        } else {
            PathBuf::from(&self.source.location)
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            chart: ChartConfig::default(),
            collector: CollectorConfig::default(),
            cutoff_rank: 16,
            empty_series_policy: EmptySeriesPolicy::Render,
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}
