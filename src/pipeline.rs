//! Overview Pipeline
//!
//! ```text
//! discover → scan (per file) → classify (barrier) → render → write
//! ```
//!
//! Files are scanned one at a time with no shared state. Classification only
//! starts once every file is scanned, and fails with every conflict found.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use crate::analyzer::parser::create_parser;
use crate::analyzer::scanner::{WorkspaceScanner, is_excluded_path};
use crate::classifier::{CategoryMatcher, ClassifiedFile};
use crate::config::ScanConfig;
use crate::constants::output::{API_ENDPOINTS_FILE, PROJECT_STRUCTURE_FILE};
use crate::report::{DirectoryTree, MarkdownGenerator, OutputWriter};
use crate::types::{FileMetadata, Result, SourceFile};

/// Scanner output for a set of files.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    /// One entry per scanned file, including files with no types
    pub files: Vec<FileMetadata>,
    /// Relative paths of files that produced zero type records
    pub unparsed: Vec<String>,
}

impl ScanOutcome {
    pub fn type_count(&self) -> usize {
        self.files.iter().map(|f| f.types.len()).sum()
    }

    pub fn endpoint_count(&self) -> usize {
        self.files.iter().map(|f| f.endpoints().count()).sum()
    }
}

/// Documents written by one run.
#[derive(Debug)]
pub struct GenerationSummary {
    pub output_dir: PathBuf,
    /// File names, in write order
    pub written: Vec<String>,
    /// Generated files skipped because none of their categories matched
    pub skipped: Vec<String>,
}

#[derive(Debug)]
pub struct RunSummary {
    pub scan: ScanOutcome,
    pub classified: Vec<ClassifiedFile>,
    pub generation: GenerationSummary,
}

pub struct OverviewPipeline {
    root: PathBuf,
    config: ScanConfig,
    output_dir: PathBuf,
}

impl OverviewPipeline {
    pub fn new(root: impl Into<PathBuf>, config: ScanConfig) -> Self {
        let root = root.into();
        let output_dir = root.join(&config.output_dir);
        Self {
            root,
            config,
            output_dir,
        }
    }

    /// Override the configured output directory
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Discover, scan, classify and write every report.
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn run(&self) -> Result<RunSummary> {
        let sources = self.discover();
        info!("Found {} source files", sources.len());

        let scan = self.scan(&sources);
        info!(
            "Scanned {} files ({} types, {} endpoints, {} without types)",
            scan.files.len(),
            scan.type_count(),
            scan.endpoint_count(),
            scan.unparsed.len()
        );

        let classified = self.classify(&scan.files)?;
        let generation = self.generate(&scan, &classified)?;

        Ok(RunSummary {
            scan,
            classified,
            generation,
        })
    }

    pub fn discover(&self) -> Vec<SourceFile> {
        self.workspace().scan()
    }

    /// Scan each file independently.
    ///
    /// A file without a parser or without any recognizable type is recorded
    /// as unparsed; neither case is an error.
    pub fn scan(&self, sources: &[SourceFile]) -> ScanOutcome {
        let mut outcome = ScanOutcome::default();

        for source in sources {
            let parsed = create_parser(source.language())
                .and_then(|parser| parser.parse(&source.path, &source.text));
            match parsed {
                Ok(metadata) => {
                    let metadata = metadata.with_relative_path(&source.relative_path);
                    if metadata.is_empty() {
                        debug!(path = %source.relative_path, "No types found");
                        outcome.unparsed.push(source.relative_path.clone());
                    }
                    outcome.files.push(metadata);
                }
                Err(e) => {
                    warn!(path = %source.relative_path, error = %e, "Skipping file");
                    outcome.unparsed.push(source.relative_path.clone());
                }
            }
        }

        outcome
    }

    /// Assign categories once every file has been scanned.
    pub fn classify(&self, files: &[FileMetadata]) -> Result<Vec<ClassifiedFile>> {
        let matcher = CategoryMatcher::new(&self.config.categories);
        let classified = matcher.classify_all(
            files
                .iter()
                .map(|f| (f.relative_path.as_str(), f.extension.as_str())),
        )?;
        Ok(classified)
    }

    /// Render and write `ProjectStructure.md`, `ApiEndpoints.md` (when
    /// configured) and every generated file with at least one matching file.
    pub fn generate(
        &self,
        scan: &ScanOutcome,
        classified: &[ClassifiedFile],
    ) -> Result<GenerationSummary> {
        let markdown = MarkdownGenerator::new(&self.config.markdown);
        let writer = OutputWriter::new(&self.output_dir);
        let mut written = Vec::new();
        let mut skipped = Vec::new();

        let tree = self.directory_tree();
        writer.write(
            PROJECT_STRUCTURE_FILE,
            &markdown.project_structure(&tree, &self.config.project_structure),
        )?;
        written.push(PROJECT_STRUCTURE_FILE.to_string());

        if let Some(filter) = &self.config.api_endpoints {
            writer.write(API_ENDPOINTS_FILE, &markdown.api_endpoints(&scan.files, filter))?;
            written.push(API_ENDPOINTS_FILE.to_string());
        }

        let categorized: Vec<(&FileMetadata, &str)> = scan
            .files
            .iter()
            .zip(classified)
            .filter_map(|(file, c)| c.category.as_deref().map(|category| (file, category)))
            .collect();

        for document in &self.config.generated_files {
            let relevant: Vec<(&FileMetadata, &str)> = categorized
                .iter()
                .copied()
                .filter(|(_, category)| document.included_categories.iter().any(|c| c == category))
                .collect();

            if relevant.is_empty() {
                debug!("Skipping {}: no files in its categories", document.name);
                skipped.push(document.name.clone());
                continue;
            }

            let content =
                markdown.category_document(document, &relevant, &self.config.categories);
            writer.write(&document.name, &content)?;
            written.push(document.name.clone());
        }

        info!(
            "Generated {} in {}",
            written.join(", "),
            self.output_dir.display()
        );

        Ok(GenerationSummary {
            output_dir: self.output_dir.clone(),
            written,
            skipped,
        })
    }

    fn workspace(&self) -> WorkspaceScanner {
        WorkspaceScanner::new(&self.root)
            .with_excluded_paths(self.config.project_structure.excluded_paths.clone())
    }

    /// Every file under the root except the output directory itself
    fn directory_tree(&self) -> DirectoryTree {
        let output_prefix = self
            .output_dir
            .strip_prefix(&self.root)
            .ok()
            .map(|p| p.to_string_lossy().replace('\\', "/"))
            .filter(|p| !p.is_empty());

        let paths = self.workspace().paths().into_iter().filter(|path| {
            output_prefix
                .as_ref()
                .is_none_or(|prefix| !is_excluded_path(path, &[format!("{}/**", prefix)]))
        });

        DirectoryTree::from_paths(
            self.root_name(),
            paths,
            &self.config.project_structure.excluded_extensions,
        )
    }

    fn root_name(&self) -> String {
        self.root
            .canonicalize()
            .ok()
            .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .unwrap_or_else(|| self.root.display().to_string())
    }
}
