//! Generate Command
//!
//! Scan a project and write its overview documents.
//!
//! Usage:
//!   overviewgen generate [PATH] [--output DIR]

use std::path::{Path, PathBuf};

use crate::cli::Output;
use crate::config::ConfigLoader;
use crate::pipeline::OverviewPipeline;
use crate::types::Result;

pub fn run(path: Option<PathBuf>, config: Option<&Path>, output: Option<PathBuf>) -> Result<()> {
    let out = Output::new();
    let root = path.unwrap_or_else(|| PathBuf::from("."));
    let (scan_config, config_path) = ConfigLoader::load(&root, config)?;

    let mut pipeline = OverviewPipeline::new(&root, scan_config);
    if let Some(dir) = output {
        pipeline = pipeline.with_output_dir(dir);
    }

    out.header("Project Overview");
    out.field("Root", root.display());
    out.field("Config", config_path.display());

    let summary = pipeline.run().inspect_err(|e| {
        if e.is_classification_conflict() {
            out.error("Category rules overlap; no documents were written");
        }
    })?;

    out.section("Scan");
    out.field("Files", summary.scan.files.len());
    out.field("Types", summary.scan.type_count());
    out.field("Endpoints", summary.scan.endpoint_count());
    let categorized = summary
        .classified
        .iter()
        .filter(|c| c.category.is_some())
        .count();
    out.field("Categorized", categorized);
    if !summary.scan.unparsed.is_empty() {
        out.warning(&format!(
            "{} file(s) produced no types",
            summary.scan.unparsed.len()
        ));
    }

    out.section("Documents");
    for name in &summary.generation.written {
        out.item(name);
    }
    for name in &summary.generation.skipped {
        out.info(&format!("Skipped {} (no files in its categories)", name));
    }

    out.success(&format!(
        "Overview written to {}",
        summary.generation.output_dir.display()
    ));
    Ok(())
}
