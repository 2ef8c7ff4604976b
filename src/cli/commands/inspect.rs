//! Inspect Command
//!
//! Run the scanner on a single file and print what it extracted.

use std::fs;
use std::path::Path;

use crate::analyzer::parser::create_parser_for_path;
use crate::cli::Output;
use crate::types::{FileMetadata, OverviewError, Result};

pub fn run(file: &Path, format: &str) -> Result<()> {
    let path = file.to_string_lossy().replace('\\', "/");
    let parser = create_parser_for_path(&path).ok_or_else(|| {
        OverviewError::Config(format!("No parser for file: {}", file.display()))
    })?;

    let content = fs::read_to_string(file)?;
    let metadata = parser.parse(&path, &content)?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&metadata)?),
        "text" => print_text(&metadata),
        other => {
            return Err(OverviewError::Config(format!(
                "Unknown format: {}. Valid values: text, json",
                other
            )));
        }
    }
    Ok(())
}

fn print_text(metadata: &FileMetadata) {
    let out = Output::new();
    out.header(&metadata.relative_path);
    out.field("Language", metadata.language);

    if metadata.is_empty() {
        out.warning("No types found");
        return;
    }

    for record in &metadata.types {
        out.section(&format!("{} ({})", record.name, record.kind));
        if !record.base_types.is_empty() {
            out.field("Base", record.base_types.join(", "));
        }
        if !record.implemented_interfaces.is_empty() {
            out.field("Implements", record.implemented_interfaces.join(", "));
        }
        if !record.enum_values.is_empty() {
            out.field("Values", record.enum_values.join(", "));
        }
        for member in &record.members {
            out.item(&format!("[{}] {}", member.kind, member.signature));
        }
        for endpoint in &record.endpoints {
            let dtos = if endpoint.dto_type_names.is_empty() {
                String::new()
            } else {
                format!(" ({})", endpoint.dto_type_names.join(", "))
            };
            out.item(&format!(
                "{} {} -> {}{}",
                endpoint.http_method, endpoint.route, endpoint.handler_name, dtos
            ));
        }
    }
}
