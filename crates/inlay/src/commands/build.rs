//! Site build command.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use inlay_model::{Database, TutorialNode};
use inlay_render::builder::default_sort_keys;
use inlay_render::{MenuOptions, MenuOverrides, RenderConfig, SiteBuilder};

/// Configuration file structure (inlay.toml).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    destination: Option<String>,
    template: Option<String>,
    title: Option<String>,
    readme: Option<String>,
    mainpagetitle: Option<String>,
    encoding: Option<String>,
    output_source_files: Option<bool>,
    layout_file: Option<String>,
    use_longname_in_nav: Option<bool>,
    minify: Option<bool>,
    static_files: StaticFilesConfig,
    menu: MenuOverrides,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct StaticFilesConfig {
    include: Vec<String>,
    /// Accepted as an alias of `include` for older configs.
    paths: Vec<String>,
}

impl StaticFilesConfig {
    fn effective(&self) -> Vec<PathBuf> {
        let list = if self.include.is_empty() {
            &self.paths
        } else {
            &self.include
        };
        list.iter().map(PathBuf::from).collect()
    }
}

/// Load configuration from inlay.toml if it exists.
/// Returns an error if the config file exists but is malformed.
fn load_config(path: &Path) -> Result<ConfigFile> {
    if path.exists() {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: ConfigFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        tracing::info!("Loaded config from {}", path.display());
        return Ok(config);
    }
    Ok(ConfigFile::default())
}

fn parse_sort_keys(spec: &str) -> Vec<String> {
    let keys: Vec<String> = spec
        .split(',')
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
        .collect();
    if keys.is_empty() {
        default_sort_keys()
    } else {
        keys
    }
}

/// Run the build command.
pub fn run(
    config_path: &Path,
    data: &Path,
    tutorials: Option<&Path>,
    output: Option<PathBuf>,
) -> Result<()> {
    tracing::info!("Building reference site...");

    let file_config = load_config(config_path)?;

    let doclets = fs::read_to_string(data)
        .with_context(|| format!("Failed to read doclet database {}", data.display()))?;
    let mut db = Database::from_json(&doclets)?;
    tracing::debug!("Loaded {} doclets", db.len());

    let tutorials = match tutorials {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read tutorial tree {}", path.display()))?;
            TutorialNode::root_from_json(&text)?
        }
        None => TutorialNode::empty_root(),
    };

    let readme = match &file_config.readme {
        Some(path) => Some(
            fs::read_to_string(path)
                .with_context(|| format!("Failed to read readme {}", path))?,
        ),
        None => None,
    };

    let defaults = RenderConfig::default();
    let config = RenderConfig {
        destination: output
            .or_else(|| file_config.destination.as_deref().map(PathBuf::from))
            .unwrap_or(defaults.destination),
        template_dir: file_config.template.as_deref().map(PathBuf::from),
        site_title: file_config.title.unwrap_or(defaults.site_title),
        readme,
        mainpagetitle: file_config.mainpagetitle,
        encoding: file_config.encoding.unwrap_or(defaults.encoding),
        output_source_files: file_config
            .output_source_files
            .unwrap_or(defaults.output_source_files),
        static_files: file_config.static_files.effective(),
        layout_file: file_config.layout_file,
        use_longname_in_nav: file_config
            .use_longname_in_nav
            .unwrap_or(defaults.use_longname_in_nav),
        minify: file_config.minify.unwrap_or(defaults.minify),
        menu: MenuOptions::merged(&file_config.menu),
        sort_keys: file_config
            .menu
            .defaultsortby
            .as_deref()
            .map(parse_sort_keys)
            .unwrap_or_else(default_sort_keys),
    };

    let stats = SiteBuilder::new(config).build(&mut db, &tutorials)?;

    tracing::info!(
        "Rendered {} pages, {} source listings and {} tutorials in {}ms",
        stats.pages,
        stats.source_pages,
        stats.tutorial_pages,
        stats.duration_ms
    );
    tracing::info!("Output: {}", stats.output_dir.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_full_config() {
        let toml = r#"
destination = "site"
title = "Widgets API"
readme = "README.md"
mainpagetitle = "Widgets"
output_source_files = false
use_longname_in_nav = true
minify = false

[static_files]
include = ["extra/assets"]

[menu]
defaultsortby = "kind, longname"

[menu.classes]
showchildren = false
sortby = false

[menu.events]
show = false
"#;

        let config: ConfigFile = toml::from_str(toml).unwrap();

        assert_eq!(config.destination.as_deref(), Some("site"));
        assert_eq!(config.output_source_files, Some(false));
        assert_eq!(config.static_files.effective(), vec![PathBuf::from("extra/assets")]);

        let menu = MenuOptions::merged(&config.menu);
        assert!(!menu.classes.showchildren);
        assert_eq!(menu.classes.sortby, None);
        assert!(!menu.events.show);
        // untouched categories keep their defaults
        assert!(menu.namespaces.showchildren);

        assert_eq!(
            config.menu.defaultsortby.as_deref().map(parse_sort_keys),
            Some(vec!["kind".to_string(), "longname".to_string()])
        );
    }

    #[test]
    fn paths_is_accepted_as_an_include_alias() {
        let with_paths: ConfigFile =
            toml::from_str("[static_files]\npaths = [\"a\"]\n").unwrap();
        assert_eq!(with_paths.static_files.effective(), vec![PathBuf::from("a")]);

        let both: ConfigFile =
            toml::from_str("[static_files]\ninclude = [\"a\"]\npaths = [\"b\"]\n").unwrap();
        // the canonical key wins when both are present
        assert_eq!(both.static_files.effective(), vec![PathBuf::from("a")]);
    }

    #[test]
    fn sort_keys_fall_back_to_the_default_order() {
        assert_eq!(parse_sort_keys(" , "), default_sort_keys());
        assert_eq!(
            parse_sort_keys("longname, version, since"),
            default_sort_keys()
        );
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config: ConfigFile = toml::from_str("").unwrap();
        assert!(config.destination.is_none());
        assert!(config.static_files.effective().is_empty());

        let menu = MenuOptions::merged(&config.menu);
        assert!(menu.modules.show);
        assert!(menu.events.filtermodule);
    }
}
