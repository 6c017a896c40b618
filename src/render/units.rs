use crate::diff::{DiffHunk, LineKind};
use crate::scan::SyntheticHunk;

/// One block of the rendered table: a hunk from the diff, or a context block
/// fabricated for a finding.
#[derive(Debug, Clone, Copy)]
pub enum RenderUnit<'a> {
    Real(&'a DiffHunk),
    Synthetic(SyntheticHunk),
}

impl RenderUnit<'_> {
    pub fn start(&self) -> usize {
        match self {
            RenderUnit::Real(hunk) => hunk.new_start,
            RenderUnit::Synthetic(s) => s.start,
        }
    }

    /// Last new-file line the unit renders. For real hunks this follows the
    /// lines actually replayed, which agrees with the header for well-formed diffs.
    pub fn end(&self) -> usize {
        match self {
            RenderUnit::Real(hunk) => {
                let shown = hunk
                    .lines
                    .iter()
                    .filter(|l| matches!(l.kind, LineKind::Added | LineKind::Context))
                    .count();
                (hunk.new_start + shown).saturating_sub(1)
            }
            RenderUnit::Synthetic(s) => s.end,
        }
    }
}

/// Real and synthetic units in ascending start order. The sort is stable and
/// puts real hunks first on equal starts; units are never merged.
pub fn ordered_units<'a>(hunks: &'a [DiffHunk], synthetic: &[SyntheticHunk]) -> Vec<RenderUnit<'a>> {
    let mut units: Vec<RenderUnit<'a>> = hunks
        .iter()
        .map(RenderUnit::Real)
        .chain(synthetic.iter().copied().map(RenderUnit::Synthetic))
        .collect();
    units.sort_by_key(|u| (u.start(), matches!(u, RenderUnit::Synthetic(_))));
    units
}
