use std::collections::BTreeMap;

use super::html::html_escape;
use crate::vcs::{ChangedFile, FileStatus};

/// A changed file placed in the tree; `index` is its position on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub index: usize,
    pub name: String,
    pub status: FileStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileNode {
    Leaf(FileEntry),
    Directory(BTreeMap<String, FileNode>),
}

/// Nest changed files by path component. Children are sorted by name.
pub fn build_tree(files: &[ChangedFile]) -> BTreeMap<String, FileNode> {
    let mut root: BTreeMap<String, FileNode> = BTreeMap::new();
    'files: for (index, file) in files.iter().enumerate() {
        let parts: Vec<&str> = file.path.split('/').filter(|p| !p.is_empty()).collect();
        let Some((name, dirs)) = parts.split_last() else {
            continue;
        };

        let mut level = &mut root;
        for dir in dirs {
            let node = level
                .entry(dir.to_string())
                .or_insert_with(|| FileNode::Directory(BTreeMap::new()));
            if matches!(node, FileNode::Leaf(_)) {
                // the directory wins over a file of the same name
                log::warn!("{} is both a file and a directory", dir);
                *node = FileNode::Directory(BTreeMap::new());
            }
            match node {
                FileNode::Directory(children) => level = children,
                FileNode::Leaf(_) => continue 'files,
            }
        }
        level.insert(
            name.to_string(),
            FileNode::Leaf(FileEntry {
                index,
                name: name.to_string(),
                status: file.status.clone(),
            }),
        );
    }
    root
}

/// Render the tree as nested `<ul class="file-tree">` lists.
pub fn render_tree(tree: &BTreeMap<String, FileNode>) -> String {
    let mut out = String::new();
    render_level(tree, "", 0, &mut out);
    out
}

fn render_level(tree: &BTreeMap<String, FileNode>, parent: &str, depth: usize, out: &mut String) {
    out.push_str(if depth == 0 {
        r#"<ul class="file-tree root">"#
    } else {
        r#"<ul class="file-tree">"#
    });

    for (name, node) in tree {
        match node {
            FileNode::Leaf(entry) => {
                out.push_str(&format!(
                    r#"<li class="file-leaf"><div class="file-item" data-diff-id="diff-{idx}"><span class="file-status {class}">{label}</span><span class="file-name">{name}</span></div></li>"#,
                    idx = entry.index,
                    class = entry.status.css_class(),
                    label = entry.status.label(),
                    name = html_escape(&entry.name),
                ));
            }
            FileNode::Directory(children) => {
                let path = format!("{parent}{name}/");
                let folder_id = format!("folder-{}", path.trim_end_matches('/').replace(['/', ' '], "-"));
                out.push_str(&format!(
                    r#"<li class="file-folder" data-folder="{name}"><div class="folder-label" data-folder-id="{id}"><span class="folder-caret">&#9654;</span><span class="folder-name">{name}</span></div>"#,
                    name = html_escape(name),
                    id = html_escape(&folder_id),
                ));
                render_level(children, &path, depth + 1, out);
                out.push_str("</li>");
            }
        }
    }
    out.push_str("</ul>");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn changed(path: &str, status: FileStatus) -> ChangedFile {
        ChangedFile {
            path: path.to_string(),
            source_path: path.to_string(),
            status,
        }
    }

    fn sample() -> Vec<ChangedFile> {
        vec![
            changed("src/net/conn.c", FileStatus::Modified),
            changed("README", FileStatus::Added),
            changed("src/main.c", FileStatus::Deleted),
        ]
    }

    #[test]
    fn files_nest_under_their_directories() {
        let tree = build_tree(&sample());
        assert_eq!(tree.len(), 2);
        let Some(FileNode::Directory(src)) = tree.get("src") else {
            panic!("src should be a directory");
        };
        assert!(matches!(src.get("main.c"), Some(FileNode::Leaf(FileEntry { index: 2, .. }))));
        assert!(matches!(src.get("net"), Some(FileNode::Directory(_))));
        assert!(matches!(tree.get("README"), Some(FileNode::Leaf(FileEntry { index: 1, .. }))));
    }

    #[test]
    fn rendered_tree_links_leaves_to_diffs() {
        let html = render_tree(&build_tree(&sample()));
        assert!(html.starts_with(r#"<ul class="file-tree root">"#));
        assert!(html.contains(r#"data-diff-id="diff-0""#));
        assert!(html.contains(r#"<span class="file-status deleted">Deleted</span><span class="file-name">main.c</span>"#));
        assert!(html.contains(r#"data-folder-id="folder-src-net""#));
        // entries sort by name, not by kind
        assert!(html.find("README").unwrap() < html.find("folder-src").unwrap());
    }

    #[test]
    fn empty_list_renders_empty_tree() {
        assert_eq!(render_tree(&build_tree(&[])), r#"<ul class="file-tree root"></ul>"#);
    }
}
