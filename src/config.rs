use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewConfig {
    #[serde(default)]
    pub context: ContextConfig,
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub svn: SvnConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// [context] section: how much surrounding code findings and expand controls show
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextConfig {
    /// Lines on each side of a finding in its synthetic hunk
    #[serde(default = "default_window")]
    pub window: usize,
    /// Lines revealed per click of a step expand control
    #[serde(default = "default_window")]
    pub expand_step: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Directory of analyzer JSON reports, relative to the repository
    #[serde(default)]
    pub results_dir: Option<String>,
    /// Directories at which absolute report paths become repository-relative
    #[serde(default = "default_path_markers")]
    pub path_markers: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SvnConfig {
    #[serde(default = "default_strip_prefixes")]
    pub strip_prefixes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_true")]
    pub syntax_highlight: bool,
    #[serde(default = "default_theme")]
    pub theme: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: String,
    /// Changes to generate when no revision is given
    #[serde(default = "default_count")]
    pub count: usize,
}

fn default_true() -> bool {
    true
}

fn default_window() -> usize {
    10
}

fn default_count() -> usize {
    10
}

fn default_path_markers() -> Vec<String> {
    ["Server", "src", "source", "code"].map(String::from).to_vec()
}

fn default_strip_prefixes() -> Vec<String> {
    ["trunk/", "branches/main/", "branches/master/"].map(String::from).to_vec()
}

fn default_theme() -> String {
    "InspiredGitHub".into()
}

fn default_output_dir() -> String {
    "review_pages".into()
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            window: default_window(),
            expand_step: default_window(),
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            results_dir: None,
            path_markers: default_path_markers(),
        }
    }
}

impl Default for SvnConfig {
    fn default() -> Self {
        Self {
            strip_prefixes: default_strip_prefixes(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            syntax_highlight: true,
            theme: default_theme(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            count: default_count(),
        }
    }
}

/// Load config by merging global defaults with per-repo overrides.
/// Priority: per-repo `.review-page.toml` > global `~/.config/review-page/config.toml` > built-in defaults.
/// Merging is deep: individual fields within sections (e.g. `[context]`) override independently.
pub fn load_config(repo_root: &Path) -> ReviewConfig {
    let global_path = dirs::config_dir().map(|d| d.join("review-page").join("config.toml"));
    let local_path = repo_root.join(".review-page.toml");
    load_config_from(global_path.as_deref(), &local_path)
}

fn load_config_from(global_path: Option<&Path>, local_path: &Path) -> ReviewConfig {
    let global_table = global_path.and_then(read_table);
    let local_table = read_table(local_path);

    let merged = match (global_table, local_table) {
        (Some(mut global), Some(local)) => {
            deep_merge(&mut global, local);
            toml::Value::Table(global)
        }
        (Some(global), None) => toml::Value::Table(global),
        (None, Some(local)) => toml::Value::Table(local),
        (None, None) => return ReviewConfig::default(),
    };

    merged.try_into().unwrap_or_else(|e| {
        log::warn!("Invalid configuration, using defaults: {}", e);
        ReviewConfig::default()
    })
}

fn read_table(path: &Path) -> Option<toml::Table> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str::<toml::Table>(&content) {
        Ok(table) => {
            log::debug!("Loaded config from {}", path.display());
            Some(table)
        }
        Err(e) => {
            log::warn!("Ignoring {}: {}", path.display(), e);
            None
        }
    }
}

/// Recursively merge `overlay` into `base`. Overlay values win; nested tables are merged recursively.
fn deep_merge(
    base: &mut toml::map::Map<String, toml::Value>,
    overlay: toml::map::Map<String, toml::Value>,
) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(base_table)), toml::Value::Table(overlay_table)) => {
                deep_merge(base_table, overlay_table);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(None, &dir.path().join(".review-page.toml"));
        assert_eq!(config.context.window, 10);
        assert_eq!(config.context.expand_step, 10);
        assert_eq!(config.scan.path_markers, vec!["Server", "src", "source", "code"]);
        assert_eq!(config.svn.strip_prefixes[0], "trunk/");
        assert!(config.display.syntax_highlight);
        assert_eq!(config.output.dir, "review_pages");
    }

    #[test]
    fn local_overrides_global_field_by_field() {
        let dir = tempfile::tempdir().unwrap();
        let global = dir.path().join("global.toml");
        let local = dir.path().join(".review-page.toml");
        std::fs::write(&global, "[context]\nwindow = 5\nexpand_step = 20\n[display]\ntheme = \"base16-ocean.dark\"\n").unwrap();
        std::fs::write(&local, "[context]\nwindow = 3\n[scan]\nresults_dir = \"scan\"\n").unwrap();

        let config = load_config_from(Some(&global), &local);
        assert_eq!(config.context.window, 3);
        assert_eq!(config.context.expand_step, 20);
        assert_eq!(config.display.theme, "base16-ocean.dark");
        assert_eq!(config.scan.results_dir.as_deref(), Some("scan"));
        assert_eq!(config.scan.path_markers.len(), 4);
    }

    #[test]
    fn repo_config_document_is_read_from_the_repo_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(".review-page.toml"),
            "[context]\nwindow = 4\n\n[svn]\nstrip_prefixes = [\"project/trunk/\"]\n\n[output]\ncount = 3\n",
        )
        .unwrap();

        let table = read_table(&dir.path().join(".review-page.toml")).unwrap();
        assert!(table.contains_key("context"));
        assert!(table.contains_key("svn"));

        let config = load_config_from(None, &dir.path().join(".review-page.toml"));
        assert_eq!(config.context.window, 4);
        assert_eq!(config.svn.strip_prefixes, vec!["project/trunk/"]);
        assert_eq!(config.output.count, 3);
        assert_eq!(config.context.expand_step, 10);
    }

    #[test]
    fn invalid_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join(".review-page.toml");
        std::fs::write(&local, "[context\nwindow = ").unwrap();
        assert_eq!(load_config_from(None, &local).context.window, 10);

        std::fs::write(&local, "[context]\nwindow = \"wide\"\n").unwrap();
        assert_eq!(load_config_from(None, &local).context.window, 10);
    }
}
