use crate::clustering::{ClusteringError, ClusteringParams, ClusteringResult, Linkage};
use crate::core::float::ClusterFloat;
use crate::distances::DistanceKind;
use log::{error, LevelFilter};
use serde::Deserialize;
use std::fmt;

#[derive(Debug, Deserialize)]
pub struct ClusteringParamsConfig {
    pub linkage: String,  // E.g., "average"
    pub distance: String, // E.g., "euclidean"
    pub target_cluster_count: usize,
    #[serde(default = "default_use_cache")]
    pub use_cache: bool,
}

fn default_use_cache() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    pub level: String, // Log level, e.g., "info", "debug", "warn", "error"
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub clustering_params: ClusteringParamsConfig,
    pub data_file: Option<String>, // Path to the delimited data file
    #[serde(default)]
    pub logging: LoggingConfig,
    pub output_path: Option<String>, // Directory to store the clustering outcome
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Configuration:")?;
        writeln!(f, "  Clustering Parameters:")?;
        writeln!(f, "    Linkage: {}", self.clustering_params.linkage)?;
        writeln!(f, "    Distance: {}", self.clustering_params.distance)?;
        writeln!(
            f,
            "    Target Cluster Count: {}",
            self.clustering_params.target_cluster_count
        )?;
        writeln!(f, "    Use Cache: {}", self.clustering_params.use_cache)?;
        if let Some(data_file) = &self.data_file {
            writeln!(f, "  Data File: {}", data_file)?;
        } else {
            writeln!(f, "  Data File: None")?;
        }
        writeln!(f, "  Logging:")?;
        writeln!(f, "    Level: {}", self.logging.level)?;
        if let Some(output_path) = &self.output_path {
            writeln!(f, "  Output Path: {}", output_path)?;
        } else {
            writeln!(f, "  Output Path: None")?;
        }
        Ok(())
    }
}

impl Config {
    /// Reads the YAML configuration file and returns a validated `Config`.
    pub fn from_file(file_path: &str) -> ClusteringResult<Self> {
        let file_content = std::fs::read_to_string(file_path)?;
        Self::from_yaml_str(&file_content)
    }

    pub fn from_yaml_str(yaml: &str) -> ClusteringResult<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ClusteringResult<()> {
        self.linkage()?;
        self.distance()?;
        if self.clustering_params.target_cluster_count == 0 {
            return Err(ClusteringError::InvalidTargetCount(0));
        }
        self.level_filter()?;
        Ok(())
    }

    pub fn linkage(&self) -> ClusteringResult<Linkage> {
        self.clustering_params.linkage.parse()
    }

    pub fn distance(&self) -> ClusteringResult<DistanceKind> {
        self.clustering_params.distance.parse()
    }

    /// Converts `ClusteringParamsConfig` into `ClusteringParams`.
    pub fn to_clustering_params<F: ClusterFloat>(&self) -> ClusteringResult<ClusteringParams<F>> {
        let params = ClusteringParams::new(
            self.linkage()?,
            self.distance()?,
            self.clustering_params.target_cluster_count,
        );
        Ok(params.with_cache(self.clustering_params.use_cache))
    }

    pub fn level_filter(&self) -> ClusteringResult<LevelFilter> {
        match self.logging.level.to_lowercase().as_str() {
            "debug" => Ok(LevelFilter::Debug),
            "info" => Ok(LevelFilter::Info),
            "warn" => Ok(LevelFilter::Warn),
            "error" => Ok(LevelFilter::Error),
            _ => Err(ClusteringError::Config(format!(
                "Unsupported log level: {}",
                self.logging.level
            ))),
        }
    }

    /// Sets up logging based on the logging level in the configuration.
    pub fn setup_logging(&self) -> ClusteringResult<()> {
        let level_filter = self.level_filter()?;
        if let Err(e) = env_logger::Builder::new()
            .filter_level(level_filter)
            .try_init()
        {
            error!("Failed to initialize logger: {}", e);
        }
        Ok(())
    }
}
