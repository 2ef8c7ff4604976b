//! Classify Command
//!
//! Dry run of category assignment: scans the project and reports which
//! category each file lands in without writing any document.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::cli::Output;
use crate::config::ConfigLoader;
use crate::pipeline::OverviewPipeline;
use crate::types::Result;

/// Files listed per category before the rest are summarized
const PREVIEW_LIMIT: usize = 3;

pub fn run(path: Option<PathBuf>, config: Option<&Path>, all: bool) -> Result<()> {
    let out = Output::new();
    let root = path.unwrap_or_else(|| PathBuf::from("."));
    let (scan_config, _) = ConfigLoader::load(&root, config)?;
    let pipeline = OverviewPipeline::new(&root, scan_config);

    let sources = pipeline.discover();
    let scan = pipeline.scan(&sources);
    let classified = pipeline.classify(&scan.files)?;

    let mut by_category: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    let mut unclassified = 0;
    for file in &classified {
        match &file.category {
            Some(category) => by_category
                .entry(category.as_str())
                .or_default()
                .push(file.relative_path.as_str()),
            None => unclassified += 1,
        }
    }

    out.header("Categories");
    for rule in &pipeline.config().categories {
        let files = by_category.get(rule.name.as_str()).map_or(&[][..], Vec::as_slice);
        out.section(&format!("{} ({})", rule.name, files.len()));

        let shown = if all { files.len() } else { PREVIEW_LIMIT };
        for path in files.iter().take(shown) {
            out.item(path);
        }
        if files.len() > shown {
            out.item(&format!("... and {} more", files.len() - shown));
        }
    }

    println!();
    out.success(&format!(
        "{} file(s) classified, {} without a category",
        classified.len() - unclassified,
        unclassified
    ));
    Ok(())
}
