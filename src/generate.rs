use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::diff::{diff_hash, parse_file_diff};
use crate::render::{
    render_file, render_index, render_json, render_review_page, write_assets, CodeFormatter,
    FileContent, IndexEntry, RenderedFile, ReviewExport, ReviewPage,
};
use crate::scan::{assign_findings, AssignedFindings, RawIssue};
use crate::vcs::{apply_filter, ChangedFile, FilterRule, FileStatus, Vcs};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Html,
    Json,
}

/// Everything that shapes the output besides the change itself.
pub struct Options {
    pub out_dir: PathBuf,
    pub format: OutputFormat,
    pub context: usize,
    pub expand_step: usize,
    pub filter: Vec<FilterRule>,
}

/// Generates one review page per change plus the index.
pub struct Generator<'a> {
    vcs: &'a dyn Vcs,
    formatter: CodeFormatter,
    options: Options,
    /// Every analyzer issue; each change picks the ones matching its files
    scan_issues: Vec<RawIssue>,
}

impl<'a> Generator<'a> {
    pub fn new(vcs: &'a dyn Vcs, formatter: CodeFormatter, options: Options, scan_issues: Vec<RawIssue>) -> Self {
        Generator {
            vcs,
            formatter,
            options,
            scan_issues,
        }
    }

    /// Generate pages for `ids`. A change that fails is logged and skipped;
    /// the index lists the ones that succeeded. Returns the written files.
    pub fn run(&self, ids: &[String]) -> Result<Vec<PathBuf>> {
        let out_dir = &self.options.out_dir;
        std::fs::create_dir_all(out_dir)
            .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;
        write_assets(out_dir).context("Failed to write page assets")?;

        let mut written = Vec::new();
        let mut entries = Vec::new();
        for id in ids {
            match self.generate_change(id) {
                Ok((path, entry)) => {
                    log::info!("Generated {} for {} {}", path.display(), self.vcs.name(), id);
                    written.push(path);
                    entries.push(entry);
                }
                Err(e) => log::error!("Skipping {} {}: {:#}", self.vcs.name(), id, e),
            }
        }

        let index_path = out_dir.join("index.html");
        std::fs::write(&index_path, render_index(self.vcs.name(), &entries))
            .with_context(|| format!("Failed to write {}", index_path.display()))?;
        written.push(index_path);
        Ok(written)
    }

    fn generate_change(&self, id: &str) -> Result<(PathBuf, IndexEntry)> {
        let info = self.vcs.change_info(id)?;
        let files: Vec<ChangedFile> = self
            .vcs
            .changed_files(id)?
            .into_iter()
            .filter(|f| apply_filter(&self.options.filter, f))
            .collect();
        log::debug!("{} {}: {} files after filtering", self.vcs.name(), id, files.len());

        let paths: Vec<String> = files.iter().map(|f| f.path.clone()).collect();
        let findings = assign_findings(self.scan_issues.clone(), &paths);

        let rendered = files
            .into_iter()
            .map(|file| self.render_changed_file(id, file, &findings))
            .collect::<Result<Vec<_>>>()?;

        let page_name = self.vcs.page_name(&info);
        let (path, body) = match self.options.format {
            OutputFormat::Html => {
                let html = render_review_page(&ReviewPage {
                    vcs_name: self.vcs.name(),
                    info: &info,
                    files: &rendered,
                    findings: &findings,
                    formatter: &self.formatter,
                    expand_step: self.options.expand_step,
                })?;
                (self.options.out_dir.join(&page_name), html)
            }
            OutputFormat::Json => {
                let json = render_json(&ReviewExport {
                    change: &info,
                    files: &rendered,
                    unmatched_findings: &findings.unmatched,
                })?;
                let name = Path::new(&page_name).with_extension("json");
                (self.options.out_dir.join(name), json)
            }
        };
        std::fs::write(&path, body).with_context(|| format!("Failed to write {}", path.display()))?;

        let entry = IndexEntry {
            page: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or(page_name),
            file_count: rendered.len(),
            finding_count: findings.total(),
            info,
        };
        Ok((path, entry))
    }

    fn render_changed_file(&self, id: &str, file: ChangedFile, findings: &AssignedFindings) -> Result<RenderedFile> {
        let raw = self
            .vcs
            .file_diff(id, &file)
            .with_context(|| format!("Failed to diff {}", file.path))?;
        let diff = parse_file_diff(&raw);

        let content = if file.status == FileStatus::Deleted {
            FileContent::Available(Vec::new())
        } else {
            let read = FileContent::read(self.vcs.root(), &file.path);
            if let Err(e) = &read {
                log::warn!("{e}");
            }
            FileContent::from(read)
        };

        let rendering = render_file(
            &file.path,
            &diff,
            &content,
            findings.for_file(&file.path),
            self.options.context,
        );

        Ok(RenderedFile {
            diff_hash: diff_hash(&raw),
            preamble: diff.preamble,
            rendering,
            lines: content.lines().to_vec(),
            file,
        })
    }
}
