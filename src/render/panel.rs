use super::html::html_escape;
use crate::scan::{AssignedFindings, Finding};

/// The findings list shown beside the diff. Items for findings that landed in
/// the diff jump to their annotation row; the rest are listed without a target.
pub fn render_panel(findings: &AssignedFindings) -> String {
    if findings.total() == 0 {
        return String::new();
    }

    let items: String = findings.all().map(|(f, linked)| render_item(f, linked)).collect();

    format!(
        r#"<div class="scan-results-panel">
<div class="scan-results-title">Scan results ({count})</div>
<div class="scan-results-list">
{items}</div>
</div>"#,
        count = findings.total(),
    )
}

fn render_item(f: &Finding, linked: bool) -> String {
    let class = match f.severity.css_class() {
        "" => "scan-result-item".to_string(),
        sev => format!("scan-result-item {sev}"),
    };
    let jump = if linked {
        format!(r#" data-jump="{}""#, html_escape(&f.anchor_id()))
    } else {
        String::new()
    };
    let count = if f.occurrence_count > 1 {
        format!(" ({} issues)", f.occurrence_count)
    } else {
        String::new()
    };

    format!(
        r#"<div class="{class}" data-line="{line}"{jump}>
<div class="file-name">{file}</div>
<div class="line-number"><span class="scan-severity">{severity}</span> line {line}{count}</div>
<div class="description">{description}</div>
<div class="suggestion">{suggestion}</div>
</div>
"#,
        line = f.line,
        file = html_escape(&f.file),
        severity = f.severity.label(),
        description = html_escape(&f.description),
        suggestion = html_escape(&f.suggestion),
    )
}
