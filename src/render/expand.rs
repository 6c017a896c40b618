use std::collections::HashSet;

use super::content::FileContent;
use super::rows::{CodeRow, ExpandDirection, Row, RowKind};

/// How much an expand control reveals per invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpandMode {
    Step(usize),
    All,
}

/// Invoke the expand control at `index`.
///
/// An above-control reveals the lines closest to the block below it and
/// inserts them right after itself; a below-control reveals the lines right
/// after the block above it and inserts them before itself. The control is
/// narrowed to what remains, or removed once its range is exhausted.
/// Returns the number of rows inserted; anything other than a control at
/// `index` is left alone.
pub fn expand(rows: &mut Vec<Row>, index: usize, mode: ExpandMode, content: &FileContent) -> usize {
    let Some(Row::Expand(control)) = rows.get(index).cloned() else {
        return 0;
    };

    let take = match mode {
        ExpandMode::Step(n) => n.max(1).min(control.len()),
        ExpandMode::All => control.len(),
    };
    if take == 0 {
        rows.remove(index);
        return 0;
    }

    let (start, end, remaining) = match control.direction {
        ExpandDirection::Above => {
            let start = control.end + 1 - take;
            (start, control.end, (control.start, start - 1))
        }
        ExpandDirection::Below => {
            let end = control.start + take - 1;
            (control.start, end, (end + 1, control.end))
        }
    };
    let exhausted = remaining.0 > remaining.1;

    let inserted = match control.direction {
        ExpandDirection::Above => {
            let n = reveal(rows, index + 1, start, end, content);
            if let Row::Expand(c) = &mut rows[index] {
                c.end = remaining.1;
            }
            n
        }
        ExpandDirection::Below => {
            let n = reveal(rows, index, start, end, content);
            if let Row::Expand(c) = &mut rows[index + n] {
                c.start = remaining.0;
            }
            n
        }
    };

    if exhausted {
        let at = match control.direction {
            ExpandDirection::Above => index,
            ExpandDirection::Below => index + inserted,
        };
        rows.remove(at);
    }

    log::debug!(
        "expanded {:?} {}-{}: {} rows, control {}",
        control.direction,
        start,
        end,
        inserted,
        if exhausted { "removed" } else { "narrowed" }
    );
    inserted
}

/// Insert context rows for `[start, end]` at position `at`, skipping every
/// line number the table already shows. Calling it again with the same range
/// inserts nothing.
pub fn reveal(rows: &mut Vec<Row>, at: usize, start: usize, end: usize, content: &FileContent) -> usize {
    let present: HashSet<usize> = rows.iter().filter_map(Row::new_num).collect();
    let fresh: Vec<Row> = (start..=end)
        .filter(|n| !present.contains(n))
        .map(|n| {
            Row::Code(CodeRow {
                kind: RowKind::ExpandedContext,
                old_num: None,
                new_num: Some(n),
                content: content.line(n).to_string(),
            })
        })
        .collect();
    let count = fresh.len();
    let at = at.min(rows.len());
    rows.splice(at..at, fresh);
    count
}
