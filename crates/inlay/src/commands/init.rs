//! Config scaffolding command.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

const DEFAULT_CONFIG: &str = r#"# Inlay configuration

destination = "docs/api"
title = "Documentation"
# readme = "README.md"
# mainpagetitle = "Main Page"
# template = "path/to/template-bundle"
# layout_file = "layout.html"
output_source_files = true
use_longname_in_nav = false
minify = true

[static_files]
# Files and directories copied verbatim into the output
include = []

[menu]
# defaultsortby = "longname, version, since"

# Per-category overrides, e.g.:
# [menu.classes]
# showchildren = true
# sortby = "kind"
"#;

/// Run the init command.
pub fn run(force: bool) -> Result<()> {
    let path = Path::new("inlay.toml");
    if path.exists() && !force {
        bail!("inlay.toml already exists; pass --force to overwrite");
    }

    fs::write(path, DEFAULT_CONFIG).context("Failed to write inlay.toml")?;

    tracing::info!("Wrote inlay.toml");
    tracing::info!("Next: inlay build --data doclets.json");
    Ok(())
}
