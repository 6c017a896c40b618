use serde::Serialize;
use std::collections::BTreeMap;

use super::highlight::CodeFormatter;
use super::html::{html_escape, render_file_table};
use super::panel::render_panel;
use super::rows::FileRendering;
use super::tree::{build_tree, render_tree};
use crate::scan::{AssignedFindings, Finding};
use crate::vcs::{ChangeInfo, ChangedFile};

/// One changed file, fully processed and ready to be placed on a page.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedFile {
    pub file: ChangedFile,
    pub diff_hash: String,
    /// Diff header lines (`Index:`, `---`, `+++`)
    pub preamble: Vec<String>,
    pub rendering: FileRendering,
    /// Post-change lines, embedded for client-side expansion
    #[serde(skip)]
    pub lines: Vec<String>,
}

pub struct ReviewPage<'a> {
    pub vcs_name: &'a str,
    pub info: &'a ChangeInfo,
    pub files: &'a [RenderedFile],
    pub findings: &'a AssignedFindings,
    pub formatter: &'a CodeFormatter,
    pub expand_step: usize,
}

/// Assemble the review page of one change.
pub fn render_review_page(page: &ReviewPage) -> serde_json::Result<String> {
    let info = page.info;
    let changed: Vec<ChangedFile> = page.files.iter().map(|f| f.file.clone()).collect();
    let tree = render_tree(&build_tree(&changed));
    let panel = render_panel(page.findings);
    let diffs: String = page
        .files
        .iter()
        .enumerate()
        .map(|(i, f)| render_diff_container(i, f, page.formatter, page.expand_step))
        .collect();
    let contents = embedded_contents(page.files)?;

    let id_label = if page.vcs_name == "svn" { "Revision" } else { "Commit" };
    let email = if info.email.is_empty() {
        String::new()
    } else {
        format!(" &lt;{}&gt;", html_escape(&info.email))
    };

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Review: {title}</title>
    <link rel="stylesheet" href="assets/style.css">
</head>
<body>
    <div class="header">
        <h1>{title}</h1>
        <div class="change-info">
            <div class="change-info-item">
                <div class="change-info-label">Author</div>
                <div>{author}{email}</div>
            </div>
            <div class="change-info-item">
                <div class="change-info-label">{id_label}</div>
                <div>{id}</div>
            </div>
            <div class="change-info-item">
                <div class="change-info-label">Date</div>
                <div>{date}</div>
            </div>
        </div>
        <div class="change-message">{body}</div>
    </div>
    <div class="review-main">
        <div class="file-list-panel">
            <input type="text" class="file-search-box" placeholder="Search files..." />
            <div class="file-list file-tree-container">
                {tree}
            </div>
        </div>
        {panel}
        <div class="diff-panel">
{diffs}        </div>
    </div>
    <div class="footer">Generated by review-page ({file_count} files)</div>
    <script id="new-file-contents" type="application/json">{contents}</script>
    <script src="assets/script.js"></script>
</body>
</html>
"#,
        title = html_escape(&info.subject),
        author = html_escape(&info.author),
        id = html_escape(&info.id),
        date = html_escape(&info.date),
        body = html_escape(&info.body),
        file_count = page.files.len(),
    ))
}

fn render_diff_container(index: usize, f: &RenderedFile, formatter: &CodeFormatter, expand_step: usize) -> String {
    let preamble = if f.preamble.is_empty() {
        String::new()
    } else {
        format!(
            "<pre class=\"diff-preamble\">{}</pre>",
            html_escape(&f.preamble.join("\n"))
        )
    };
    let banner = match &f.rendering.content_missing {
        Some(reason) => format!(
            r#"<div class="content-missing">Full file content unavailable, context lines are blank: {}</div>"#,
            html_escape(reason)
        ),
        None => String::new(),
    };

    format!(
        r#"            <div id="diff-{index}" class="diff-container" data-diff-hash="{hash}">
                <div class="diff-header">
                    <span class="file-status {status_class}">{status}</span>
                    <div>{path}</div>
                </div>
                {banner}{preamble}
                <div class="diff-content">
{table}
                </div>
            </div>
"#,
        hash = f.diff_hash,
        status_class = f.file.status.css_class(),
        status = f.file.status.label(),
        path = html_escape(&f.file.path),
        table = render_file_table(&f.rendering, formatter, expand_step),
    )
}

/// File lines keyed by path as JSON, safe to place inside a `<script>` element.
fn embedded_contents(files: &[RenderedFile]) -> serde_json::Result<String> {
    let map: BTreeMap<&str, &[String]> = files
        .iter()
        .map(|f| (f.file.path.as_str(), f.lines.as_slice()))
        .collect();
    Ok(serde_json::to_string(&map)?.replace("</", "<\\/"))
}

/// A generated page as listed on the index.
pub struct IndexEntry {
    pub info: ChangeInfo,
    pub page: String,
    pub file_count: usize,
    pub finding_count: usize,
}

pub fn render_index(vcs_name: &str, entries: &[IndexEntry]) -> String {
    let (heading, id_label, id_prefix) = match vcs_name {
        "svn" => ("SVN Revision Reviews", "Revision", "r"),
        _ => ("Git Commit Reviews", "Commit", ""),
    };

    let items: String = entries
        .iter()
        .map(|e| {
            let findings = if e.finding_count > 0 {
                format!(
                    r#"
                <div class="change-meta-item"><strong>Findings:</strong> {}</div>"#,
                    e.finding_count
                )
            } else {
                String::new()
            };
            format!(
                r#"        <div class="change-item">
            <div class="change-title"><a href="{page}">{subject}</a></div>
            <div class="change-meta">
                <div class="change-meta-item"><strong>Author:</strong> {author}</div>
                <div class="change-meta-item"><strong>Date:</strong> {date}</div>
                <div class="change-meta-item"><strong>{id_label}:</strong> {id_prefix}{id}</div>
                <div class="change-meta-item"><strong>Files:</strong> {files}</div>{findings}
            </div>
        </div>
"#,
                page = html_escape(&e.page),
                subject = html_escape(&e.info.subject),
                author = html_escape(&e.info.author),
                date = html_escape(&e.info.date),
                id = html_escape(&e.info.short_id),
                files = e.file_count,
            )
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{heading}</title>
    <link rel="stylesheet" href="assets/style.css">
</head>
<body>
    <div class="header">
        <h1>{heading}</h1>
    </div>
    <div class="change-list">
{items}    </div>
    <div class="footer">Generated by review-page</div>
</body>
</html>
"#
    )
}

/// Row model of a whole change, for `--format json`.
#[derive(Debug, Serialize)]
pub struct ReviewExport<'a> {
    pub change: &'a ChangeInfo,
    pub files: &'a [RenderedFile],
    pub unmatched_findings: &'a [Finding],
}

pub fn render_json(export: &ReviewExport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(export)
}
