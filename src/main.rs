use std::error::Error;
use std::fs;
use std::path::Path;

use clap::Parser;
use hiclust::clustering::{save_outcome, Config, HierarchicalClustering, RunMonitor};
use hiclust::core::read_rows;
use hiclust::visualization::print_cluster_analysis;
use log::info;

const DEFAULT_CONFIG: &str = "demos/config.yaml";

#[derive(Parser, Debug)]
#[command(name = "hiclust")]
#[command(author, version, about = "Agglomerative hierarchical clustering of delimited data files", long_about = None)]
struct Cli {
    /// Path to the YAML configuration
    #[arg(default_value = DEFAULT_CONFIG)]
    config: String,

    /// Override the data file named in the configuration
    #[arg(short, long)]
    data: Option<String>,

    /// Cell delimiter of the data file
    #[arg(short = 'D', long, default_value_t = ',')]
    delimiter: char,
}

/// Logs progress each time another tenth of the merges is done.
struct ProgressLogger {
    next_tenth: u32,
}

impl RunMonitor for ProgressLogger {
    fn report_progress(&mut self, fraction: f64) {
        while fraction * 10.0 >= self.next_tenth as f64 && self.next_tenth <= 10 {
            info!("Progress: {}%", self.next_tenth * 10);
            self.next_tenth += 1;
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let config = Config::from_file(&cli.config)?;
    config.setup_logging()?;
    info!("{}", config);

    let delimiter = u8::try_from(cli.delimiter).map_err(|_| "Delimiter must be a single-byte character")?;
    let data_file = cli
        .data
        .as_deref()
        .or(config.data_file.as_deref())
        .ok_or("No data_file set in the configuration")?;
    let rows = read_rows(data_file, delimiter)?;
    info!("Read {} rows from {}", rows.len(), data_file);

    let params = config.to_clustering_params::<f64>()?;
    let mut monitor = ProgressLogger { next_tenth: 1 };
    let outcome = HierarchicalClustering::new(params, rows)?.fit_with_monitor(&mut monitor)?;

    print_cluster_analysis(&outcome);
    println!("\n{}", outcome.partition);

    if let Some(output_path) = &config.output_path {
        fs::create_dir_all(output_path)?;
        let path = Path::new(output_path).join("outcome.bin.gz");
        save_outcome(&outcome, &path)?;
        info!("Saved clustering outcome to {}", path.display());
    }
    Ok(())
}
