use std::path::Path;

pub const STYLE_CSS: &str = r#"* { box-sizing: border-box; margin: 0; padding: 0; }
body {
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Helvetica, Arial, sans-serif;
    line-height: 1.6;
    color: #24292e;
    background: #f5f5f5;
    padding: 20px;
}
a { color: #0366d6; text-decoration: none; }
a:hover { text-decoration: underline; }

.header, .change-list, .file-list, .scan-results-list, .diff-container {
    background: #fff;
    border: 1px solid #e1e4e8;
    border-radius: 3px;
}
.header { padding: 16px; margin-bottom: 20px; }
.header h1 { font-size: 24px; margin-bottom: 8px; }
.change-info, .change-meta { display: flex; flex-wrap: wrap; }
.change-info-item { margin: 0 24px 8px 0; }
.change-info-label { font-weight: 600; color: #586069; }
.change-message {
    background: #f6f8fa;
    border: 1px solid #e1e4e8;
    border-radius: 3px;
    padding: 16px;
    margin-top: 8px;
    white-space: pre-wrap;
}
.change-item { padding: 16px; border-bottom: 1px solid #e1e4e8; }
.change-item:last-child { border-bottom: none; }
.change-title { font-weight: 600; margin-bottom: 8px; }
.change-meta { color: #586069; font-size: 12px; }
.change-meta-item { margin-right: 16px; }

.review-main { display: flex; gap: 24px; min-height: 400px; }
.file-list-panel, .scan-results-panel {
    position: sticky;
    top: 0;
    align-self: flex-start;
    max-height: 100vh;
    overflow-y: auto;
}
.file-list-panel { width: 300px; min-width: 220px; }
.scan-results-panel { width: 22%; min-width: 200px; }
.scan-results-title { font-weight: 600; margin-bottom: 8px; }
.diff-panel { flex: 1 1 0%; min-width: 0; }

.file-search-box {
    width: 100%;
    padding: 8px 12px;
    margin-bottom: 8px;
    border: 1px solid #e1e4e8;
    border-radius: 3px;
}
.file-tree { list-style: none; }
.file-tree .folder-label { cursor: pointer; font-weight: 600; padding: 4px 12px; display: flex; align-items: center; }
.file-tree .folder-caret { display: inline-block; width: 1em; margin-right: 4px; transform: rotate(90deg); transition: transform 0.2s; }
.file-tree .file-folder.collapsed > ul { display: none; }
.file-tree .file-folder.collapsed > .folder-label .folder-caret { transform: rotate(0deg); }
.file-tree .file-folder > ul { margin-left: 1em; border-left: 1px dotted #e1e4e8; padding-left: 0.5em; }
.file-item { padding: 4px 12px; display: flex; align-items: center; cursor: pointer; font-size: 13px; }
.file-item.active { background: #f1f8ff; }
.file-name { word-break: break-all; }
.file-status { margin-right: 8px; font-weight: 600; font-size: 11px; }
.file-status.added { color: #28a745; }
.file-status.modified { color: #0366d6; }
.file-status.deleted { color: #d73a49; }
.file-status.renamed, .file-status.copied { color: #6f42c1; }

.scan-result-item { padding: 8px; border-bottom: 1px solid #e1e4e8; font-size: 12px; }
.scan-result-item:last-child { border-bottom: none; }
.scan-result-item[data-jump] { cursor: pointer; }
.scan-result-item.severe { background: #ffebee; }
.scan-result-item .line-number { color: #586069; font-weight: 600; }
.scan-result-item .description, .scan-result-inline .description { white-space: pre-wrap; }
.scan-result-item .suggestion, .scan-result-inline .suggestion { color: #586069; font-style: italic; white-space: pre-wrap; }
.scan-severity { font-weight: 700; color: #856404; }
.severe .scan-severity { color: #dc3545; }

.diff-container { margin-bottom: 20px; overflow: hidden; }
.diff-header {
    background: #f6f8fa;
    padding: 8px 16px;
    border-bottom: 1px solid #e1e4e8;
    font-family: 'JetBrains Mono', Menlo, Monaco, 'Courier New', monospace;
    font-size: 12px;
    display: flex;
}
.diff-preamble { padding: 4px 16px; color: #6a737d; font-size: 11px; background: #fafbfc; }
.content-missing { padding: 8px 16px; background: #fff8c5; color: #735c0f; font-size: 12px; }
.diff-content { overflow-x: auto; }
.diff-empty { padding: 16px; color: #586069; font-style: italic; }
.diff-table {
    width: 100%;
    border-collapse: collapse;
    font-family: 'JetBrains Mono', Menlo, Monaco, 'Courier New', monospace;
    font-size: 12px;
    tab-size: 4;
}
.diff-sign { width: 1%; padding: 0 8px; text-align: center; user-select: none; }
.diff-line-num { width: 1%; padding: 0 8px; text-align: right; color: #959da5; user-select: none; border-right: 1px solid #e1e4e8; }
.diff-line-content { padding: 0 8px; white-space: pre; }
.diff-hunk-header td, .synthetic-hunk-header td { background: #f1f8ff; color: #586069; padding: 2px 8px; }
.synthetic-hunk-header td { background: #fffbdd; font-style: italic; }
.diff-added { background: rgba(40, 167, 69, 0.15); }
.diff-added .diff-sign { color: #28a745; }
.diff-removed { background: rgba(220, 53, 69, 0.15); }
.diff-removed .diff-sign { color: #d73a49; }
.synthetic-context { background: #fdfdf6; }
.expanded-context { background: #fafbfc; }
.diff-other .diff-line-content { color: #6a737d; font-style: italic; }

.scan-result-row td { background: #fff3cd; }
.scan-result-row.severe td { background: #f8d7da; }
.scan-result-inline {
    white-space: normal;
    border-left: 4px solid #f39c12;
    padding: 6px 10px;
    margin: 4px 0;
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
}
.scan-result-row.severe .scan-result-inline { border-left-color: #dc3545; }
.scan-result-title { font-weight: 600; }
.scan-count { color: #6c757d; font-weight: normal; }
.scan-result-highlight td { animation: highlight-flash 1.6s ease-out; }
@keyframes highlight-flash {
    0% { background-color: rgba(0, 123, 255, 0.5); }
    100% { background-color: transparent; }
}

.expand-row td { padding: 2px 4px; background: #f1f8ff; color: #586069; }
.expand-icon { cursor: pointer; margin-right: 12px; user-select: none; }
.expand-icon:hover { color: #0366d6; }

.footer { margin-top: 40px; text-align: center; color: #586069; font-size: 12px; }
"#;

/// Page behavior. The expand handler mirrors the row model: an above control
/// reveals the lines nearest the block below it, a below control the lines
/// nearest the block above, and lines already in the table are never added twice.
pub const SCRIPT_JS: &str = r#"document.addEventListener('DOMContentLoaded', function () {
    document.querySelectorAll('.folder-label').forEach(function (label) {
        label.addEventListener('click', function () {
            label.parentElement.classList.toggle('collapsed');
        });
    });

    const fileItems = document.querySelectorAll('.file-item');
    fileItems.forEach(function (item) {
        item.addEventListener('click', function () {
            fileItems.forEach(function (i) { i.classList.remove('active'); });
            item.classList.add('active');
            const target = document.getElementById(item.getAttribute('data-diff-id'));
            if (target) {
                target.scrollIntoView({ behavior: 'smooth', block: 'start' });
            }
        });
    });

    document.querySelectorAll('.scan-result-item[data-jump]').forEach(function (item) {
        item.addEventListener('click', function () {
            const row = document.getElementById(item.getAttribute('data-jump'));
            if (row) {
                row.scrollIntoView({ behavior: 'smooth', block: 'center' });
                row.classList.add('scan-result-highlight');
                setTimeout(function () { row.classList.remove('scan-result-highlight'); }, 1600);
            }
        });
    });

    const searchBox = document.querySelector('.file-search-box');
    if (searchBox) {
        searchBox.addEventListener('input', function () {
            const query = searchBox.value.toLowerCase();
            document.querySelectorAll('.file-tree .file-leaf').forEach(function (leaf) {
                leaf.style.display = leaf.textContent.toLowerCase().includes(query) ? '' : 'none';
            });
            Array.from(document.querySelectorAll('.file-tree .file-folder')).reverse().forEach(function (folder) {
                const visible = Array.from(folder.querySelectorAll(':scope > ul > li')).some(function (child) {
                    return child.style.display !== 'none';
                });
                folder.style.display = visible ? '' : 'none';
            });
        });
    }

    const contentsElem = document.getElementById('new-file-contents');
    const contents = contentsElem ? JSON.parse(contentsElem.textContent) : {};

    function escapeHtml(text) {
        const map = { '&': '&amp;', '<': '&lt;', '>': '&gt;', '"': '&quot;', "'": '&#39;' };
        return text.replace(/[&<>"']/g, function (m) { return map[m]; });
    }

    function contextRow(lineNum, text) {
        const tr = document.createElement('tr');
        tr.className = 'diff-context expanded-context';
        tr.setAttribute('data-new-line', lineNum);
        tr.innerHTML = "<td class=\"diff-sign\">&nbsp;</td><td class=\"diff-line-num\"></td>" +
            "<td class=\"diff-line-num\">" + lineNum + "</td>" +
            "<td class=\"diff-line-content\">" + escapeHtml(text) + "</td>";
        return tr;
    }

    function expand(btn) {
        const controlRow = btn.closest('tr');
        const table = btn.closest('table');
        const tbody = table.tBodies[0];
        const lines = contents[table.getAttribute('data-filename')] || [];
        const [direction, variant] = btn.getAttribute('data-expand').split('-');
        const start = parseInt(btn.getAttribute('data-context-start'), 10);
        const end = parseInt(btn.getAttribute('data-context-end'), 10);
        const step = parseInt(btn.getAttribute('data-step') || '10', 10);
        const take = variant === 'all' ? end - start + 1 : Math.min(step, end - start + 1);

        let from = start, to = end;
        if (direction === 'above') {
            from = end - take + 1;
        } else {
            to = start + take - 1;
        }

        const present = new Set();
        tbody.querySelectorAll('tr[data-new-line]').forEach(function (row) {
            present.add(parseInt(row.getAttribute('data-new-line'), 10));
        });

        const anchor = direction === 'above' ? controlRow.nextSibling : controlRow;
        for (let n = from; n <= to; n++) {
            if (!present.has(n)) {
                tbody.insertBefore(contextRow(n, lines[n - 1] || ''), anchor);
            }
        }

        const remainingStart = direction === 'above' ? start : to + 1;
        const remainingEnd = direction === 'above' ? from - 1 : end;
        if (remainingStart > remainingEnd) {
            controlRow.remove();
            return;
        }
        controlRow.querySelectorAll('.expand-icon').forEach(function (icon) {
            icon.setAttribute('data-context-start', remainingStart);
            icon.setAttribute('data-context-end', remainingEnd);
            if (icon.getAttribute('data-expand').endsWith('-all')) {
                const count = remainingEnd - remainingStart + 1;
                const arrow = icon.textContent.split(' ')[0];
                icon.textContent = arrow + ' ' + count + ' hidden lines (' + remainingStart + '-' + remainingEnd + ')';
            } else if (remainingEnd - remainingStart + 1 <= step) {
                icon.remove();
            }
        });
    }

    document.querySelectorAll('.diff-table').forEach(function (table) {
        table.addEventListener('click', function (event) {
            const btn = event.target.closest('.expand-icon');
            if (btn) {
                expand(btn);
            }
        });
    });
});
"#;

/// Write `assets/style.css` and `assets/script.js` under `out_dir`.
pub fn write_assets(out_dir: &Path) -> std::io::Result<()> {
    let dir = out_dir.join("assets");
    std::fs::create_dir_all(&dir)?;
    std::fs::write(dir.join("style.css"), STYLE_CSS)?;
    std::fs::write(dir.join("script.js"), SCRIPT_JS)?;
    Ok(())
}
