use super::highlight::{CodeFormatter, FileFormatter};
use super::rows::{
    synthetic_header_label, Annotation, CodeRow, ExpandControl, ExpandDirection, FileRendering, Row,
    RowKind,
};

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn row_class(kind: RowKind) -> &'static str {
    match kind {
        RowKind::HunkHeader => "diff-hunk-header",
        RowKind::SyntheticHeader => "synthetic-hunk-header",
        RowKind::Added => "diff-added",
        RowKind::Removed => "diff-removed",
        RowKind::Context => "diff-context",
        RowKind::Other => "diff-other",
        RowKind::SyntheticContext => "diff-context synthetic-context",
        RowKind::ExpandedContext => "diff-context expanded-context",
        RowKind::Annotation => "scan-result-row",
        RowKind::Expand => "diff-expand",
    }
}

/// Render a file's rows as the diff table, or the "No changes" placeholder.
pub fn render_file_table(rendering: &FileRendering, formatter: &CodeFormatter, expand_step: usize) -> String {
    if rendering.no_changes {
        return r#"<div class="diff-empty">No changes</div>"#.to_string();
    }

    let mut code_formatter = formatter.for_file(&rendering.path);
    let body: String = rendering
        .rows
        .iter()
        .map(|row| render_row(row, &mut code_formatter, expand_step))
        .collect();

    format!(
        r#"<table class="diff-table" data-filename="{path}" data-last-line="{last}">
<tbody>
{body}</tbody>
</table>"#,
        path = html_escape(&rendering.path),
        last = rendering.last_line,
    )
}

fn render_row(row: &Row, formatter: &mut FileFormatter<'_>, expand_step: usize) -> String {
    // Headers and expand controls mark a jump in line numbers
    if !matches!(row, Row::Code(_) | Row::Annotation(_)) {
        formatter.reset();
    }

    match row {
        Row::HunkHeader { text } => format!(
            "<tr class=\"{}\"><td colspan=\"4\">{}</td></tr>\n",
            row_class(RowKind::HunkHeader),
            html_escape(text)
        ),
        Row::SyntheticHeader(s) => format!(
            "<tr class=\"{}\" data-trigger-line=\"{}\"><td colspan=\"4\">{}</td></tr>\n",
            row_class(RowKind::SyntheticHeader),
            s.triggering_line,
            html_escape(&synthetic_header_label(s))
        ),
        Row::Code(code) => render_code_row(code, row.sign(), formatter),
        Row::Annotation(a) => render_annotation_row(a),
        Row::Expand(c) => render_expand_row(c, expand_step),
    }
}

fn render_code_row(code: &CodeRow, sign: &str, formatter: &mut FileFormatter<'_>) -> String {
    let content = match code.kind {
        RowKind::Other => html_escape(&code.content),
        kind => formatter.format(&code.content, kind),
    };
    let new_attr = code
        .new_num
        .map(|n| format!(" data-new-line=\"{n}\""))
        .unwrap_or_default();
    let sign = if sign.trim().is_empty() { "&nbsp;" } else { sign };

    format!(
        "<tr class=\"{class}\"{new_attr}><td class=\"diff-sign\">{sign}</td><td class=\"diff-line-num\">{old}</td><td class=\"diff-line-num\">{new}</td><td class=\"diff-line-content\">{content}</td></tr>\n",
        class = row_class(code.kind),
        old = line_num(code.old_num),
        new = line_num(code.new_num),
    )
}

fn line_num(n: Option<usize>) -> String {
    n.map(|n| n.to_string()).unwrap_or_default()
}

fn render_annotation_row(a: &Annotation) -> String {
    let count = if a.occurrence_count > 1 {
        format!(r#" <span class="scan-count">({} issues)</span>"#, a.occurrence_count)
    } else {
        String::new()
    };
    let class = match a.severity.css_class() {
        "" => row_class(RowKind::Annotation).to_string(),
        sev => format!("{} {sev}", row_class(RowKind::Annotation)),
    };

    format!(
        r#"<tr class="{class}" id="{anchor}" data-line="{line}"><td class="diff-sign">!</td><td class="diff-line-num"></td><td class="diff-line-num"></td><td class="diff-line-content"><div class="scan-result-inline"><div class="scan-result-title"><span class="scan-severity">{severity}</span> line {line}{count}</div><div class="description">{description}</div><div class="suggestion">{suggestion}</div></div></td></tr>
"#,
        anchor = html_escape(&a.anchor),
        line = a.line,
        severity = a.severity.label(),
        description = html_escape(&a.description),
        suggestion = html_escape(&a.suggestion),
    )
}

fn render_expand_row(c: &ExpandControl, step: usize) -> String {
    let (dir, step_icon, all_icon) = match c.direction {
        ExpandDirection::Above => ("above", "&#8593;", "&#8607;"),
        ExpandDirection::Below => ("below", "&#8595;", "&#8609;"),
    };
    let range = format!(
        r#"data-context-start="{}" data-context-end="{}""#,
        c.start, c.end
    );

    let step_button = if c.len() > step {
        format!(
            r#"<span class="expand-icon" data-expand="{dir}-step" data-step="{step}" {range} title="Show {step} more lines">{step_icon} {step}</span>"#
        )
    } else {
        String::new()
    };

    format!(
        r#"<tr class="{class} expand-row" data-direction="{dir}"><td class="diff-sign"></td><td colspan="3">{step_button}<span class="expand-icon" data-expand="{dir}-all" {range} title="Show all hidden lines">{all_icon} {len} hidden lines ({start}-{end})</span></td></tr>
"#,
        class = row_class(RowKind::Expand),
        len = c.len(),
        start = c.start,
        end = c.end,
    )
}
