mod assets;
mod content;
mod expand;
mod highlight;
mod html;
mod page;
mod panel;
mod rows;
mod tree;
mod units;

pub use assets::write_assets;
pub use content::FileContent;
pub use expand::{expand, reveal, ExpandMode};
pub use highlight::{CodeFormatter, FileFormatter, HighlightSession, Highlighter};
pub use html::{html_escape, render_file_table};
pub use page::{render_index, render_json, render_review_page, IndexEntry, RenderedFile, ReviewExport, ReviewPage};
pub use panel::render_panel;
pub use rows::{
    render_file, Annotation, CodeRow, ExpandControl, ExpandDirection, FileRendering, Row, RowKind,
};
pub use tree::{build_tree, render_tree, FileEntry, FileNode};
pub use units::{ordered_units, RenderUnit};
