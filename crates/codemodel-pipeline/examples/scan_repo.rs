//! Scan one or two directories and print the resulting model.
//!
//! Usage:
//!   cargo run --example scan_repo -- <dir>            # artifacts + dependencies
//!   cargo run --example scan_repo -- <baseline> <dir> # plus drift report

use codemodel_drift::{DriftEngine, ValidationReportGenerator};
use codemodel_graph::DependencyAnalyzerSet;
use codemodel_pipeline::RepositoryScanner;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let first = args.next().expect("usage: scan_repo <dir> [<current-dir>]");
    let second = args.next();

    let scanner = RepositoryScanner::new();
    let baseline = scanner.scan_to_snapshot(&first).await?;
    println!(
        "{}: {} symbols, {} relations, {} endpoints",
        first,
        baseline.symbols.len(),
        baseline.relations.len(),
        baseline.endpoints.len()
    );

    let dependencies = DependencyAnalyzerSet::new().analyze(&baseline);
    println!("{} dependency edges", dependencies.len());

    if let Some(current_dir) = second {
        let current = scanner.scan_to_snapshot(&current_dir).await?;
        let findings = DriftEngine::new().evaluate(&baseline, &current);
        let generator = ValidationReportGenerator::new();
        let report = generator.generate(findings, None);
        println!("\n{}", generator.to_markdown(&report));
    }

    Ok(())
}
