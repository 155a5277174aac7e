use crate::clustering::{ClusteringOutcome, PartitionSnapshot};
use crate::core::float::ClusterFloat;
use colored::Colorize;
use std::fmt;

/// Number of trailing merges listed in the report.
const LAST_MERGES: usize = 5;

pub fn print_cluster_analysis<F: ClusterFloat>(outcome: &ClusteringOutcome<F>) {
    println!("\n{}", "=== Cluster Analysis ===".bold());

    let stats = calculate_cluster_stats(outcome);
    print_summary_statistics(outcome, &stats);
    print_detailed_cluster_info(&stats);
    print_last_merges(outcome);
}

fn calculate_cluster_stats<F: ClusterFloat>(outcome: &ClusteringOutcome<F>) -> Vec<ClusterStats> {
    let partition = &outcome.partition;
    let clusters = outcome.root.cut(partition.cluster_count());

    partition
        .members()
        .into_iter()
        .enumerate()
        .map(|(idx, members)| {
            // The cut node holding this cluster's first row gives its merge height.
            let merge_height = members
                .first()
                .and_then(|id| {
                    clusters
                        .iter()
                        .find(|node| node.row_ids().contains(id))
                        .map(|node| node.height().to_f64().unwrap_or(f64::NAN))
                })
                .unwrap_or(0.0);
            ClusterStats {
                label: PartitionSnapshot::label(idx),
                size: members.len(),
                merge_height,
                sample: members.iter().take(3).map(|id| id.to_string()).collect(),
            }
        })
        .collect()
}

#[derive(Debug)]
struct ClusterStats {
    label: String,
    size: usize,
    merge_height: f64,
    sample: Vec<String>,
}

impl fmt::Display for ClusterStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} rows, Merge Height: {:.3}, e.g. {}",
            self.label,
            self.size,
            self.merge_height,
            self.sample.join(", ")
        )
    }
}

fn print_summary_statistics<F: ClusterFloat>(outcome: &ClusteringOutcome<F>, stats: &[ClusterStats]) {
    println!("\n{}", "Summary Statistics:".bold());
    println!("Total Clusters: {}", stats.len());

    let total_points: usize = stats.iter().map(|s| s.size).sum();
    let avg_cluster_size = total_points as f64 / stats.len().max(1) as f64;
    let largest = stats.iter().map(|s| s.size).max().unwrap_or(0);

    println!("Total Rows: {}", total_points);
    println!("Average Cluster Size: {:.2}", avg_cluster_size);
    println!("Largest Cluster: {}", largest);
    println!("Merges: {}", outcome.fusion_trace.len());
    println!("Root Height: {:.3}", outcome.root.height());
    if !outcome.fusion_trace.is_monotonic() {
        println!("{}", "Merge distances are not monotonic".yellow());
    }
}

fn print_detailed_cluster_info(stats: &[ClusterStats]) {
    println!("\n{}", "Detailed Cluster Information:".bold());
    let total: usize = stats.iter().map(|s| s.size).sum();
    for stat in stats {
        let info = format!("{}", stat);
        match stat.size {
            1 => println!("{}", info.red()),
            size if size * 2 > total => {
                println!("{}", info.yellow())
            }
            _ => println!("{}", info.green()),
        }
    }
}

fn print_last_merges<F: ClusterFloat>(outcome: &ClusteringOutcome<F>) {
    println!("\n{}", "Last Merges:".bold());
    let steps = outcome.fusion_trace.steps();
    for fusion in steps.iter().skip(steps.len().saturating_sub(LAST_MERGES)) {
        println!(
            "  ├── {} clusters left at distance {:.3}",
            fusion.cluster_count, fusion.distance
        );
    }
}
