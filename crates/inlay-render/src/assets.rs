//! Static assets for generated sites.
//!
//! The embedded template bundle ships a stylesheet and a small menu script;
//! user-configured static files are copied into the output tree with their
//! directory structure preserved.

use std::fs;
use std::io;
use std::path::Path;

use walkdir::WalkDir;

/// Asset pipeline utilities.
pub struct AssetPipeline;

impl AssetPipeline {
    /// The default stylesheet.
    pub fn stylesheet() -> String {
        DEFAULT_CSS.to_string()
    }

    /// The sidebar menu script.
    pub fn menu_script() -> String {
        DEFAULT_JS.to_string()
    }

    /// Minify CSS using lightningcss.
    pub fn minify_css(css: &str) -> Result<String, String> {
        use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| format!("CSS parse error: {}", e))?;

        let minified = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| format!("CSS minify error: {}", e))?;

        Ok(minified.code)
    }
}

/// Write the embedded bundle's static files into the output directory.
pub fn write_default_assets(outdir: &Path, minify: bool) -> io::Result<()> {
    let styles = outdir.join("styles");
    fs::create_dir_all(&styles)?;

    let css = AssetPipeline::stylesheet();
    let css = if minify {
        AssetPipeline::minify_css(&css).unwrap_or(css)
    } else {
        css
    };
    fs::write(styles.join("inlay.css"), css)?;

    let scripts = outdir.join("scripts");
    fs::create_dir_all(&scripts)?;
    fs::write(scripts.join("menu.js"), AssetPipeline::menu_script())?;

    Ok(())
}

/// Copy a template bundle's `static/` directory verbatim into the output
/// directory. Returns the number of files copied; a bundle without a
/// `static/` directory copies nothing.
pub fn copy_template_static(template_dir: &Path, outdir: &Path) -> io::Result<usize> {
    let static_dir = template_dir.join("static");
    if !static_dir.is_dir() {
        return Ok(0);
    }
    copy_tree(&static_dir, outdir)
}

/// Copy user-configured static files and directories into the output
/// directory, preserving structure relative to each configured root.
pub fn copy_static_files(paths: &[std::path::PathBuf], outdir: &Path) -> io::Result<usize> {
    let mut copied = 0;

    for root in paths {
        if !root.exists() {
            tracing::warn!("Static file path not found: {}", root.display());
            continue;
        }

        if root.is_file() {
            let name = root.file_name().unwrap_or(root.as_os_str());
            fs::copy(root, outdir.join(name))?;
            copied += 1;
            continue;
        }

        copied += copy_tree(root, outdir)?;
    }

    Ok(copied)
}

fn copy_tree(from: &Path, to: &Path) -> io::Result<usize> {
    let mut copied = 0;

    for entry in WalkDir::new(from)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let relative = path.strip_prefix(from).unwrap_or(path);
        let dest = to.join(relative);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(path, &dest)?;
        copied += 1;
    }

    Ok(copied)
}

const DEFAULT_CSS: &str = r#"/* Inlay reference theme */

:root {
  --sidebar-width: 280px;
  --content-max-width: 900px;
  --background: #ffffff;
  --foreground: #1f2328;
  --muted: #f6f8fa;
  --muted-foreground: #59636e;
  --border: #d1d9e0;
  --primary: #0969da;
  --accent: #eaeef2;
}

* {
  box-sizing: border-box;
  margin: 0;
  padding: 0;
}

body {
  font-family: system-ui, -apple-system, sans-serif;
  background: var(--background);
  color: var(--foreground);
  line-height: 1.6;
}

.layout {
  display: grid;
  grid-template-columns: var(--sidebar-width) 1fr;
  min-height: 100vh;
}

/* Sidebar */
.sidebar {
  background: var(--muted);
  border-right: 1px solid var(--border);
  padding: 1.5rem 1rem;
  position: sticky;
  top: 0;
  height: 100vh;
  overflow-y: auto;
  font-size: 0.9rem;
}

.menu-section-title {
  font-weight: 600;
  margin: 1rem 0 0.25rem;
}

.sidebar ul {
  list-style: none;
  margin-left: 0.75rem;
}

.sidebar a {
  color: var(--muted-foreground);
  text-decoration: none;
}

.sidebar a:hover {
  color: var(--primary);
}

.sidebar em.disabled {
  color: var(--muted-foreground);
  font-style: normal;
}

li.parent > .menu-arrow {
  display: inline-block;
  width: 0.6rem;
  height: 0.6rem;
  margin-right: 0.25rem;
  border-right: 2px solid var(--muted-foreground);
  border-bottom: 2px solid var(--muted-foreground);
  transform: rotate(-45deg);
  transition: transform 0.15s;
}

li.parent.open > .menu-arrow {
  transform: rotate(45deg);
}

li.parent > ul {
  display: none;
}

li.parent.open > ul {
  display: block;
}

/* Main content */
.main {
  padding: 2rem;
  max-width: var(--content-max-width);
}

.page-title {
  font-size: 2rem;
  font-weight: 700;
  margin-bottom: 1.5rem;
}

.doc header h2.name {
  font-size: 1.25rem;
  font-family: ui-monospace, monospace;
  margin: 1.5rem 0 0.75rem;
  padding-bottom: 0.5rem;
  border-bottom: 1px solid var(--border);
}

.ancestors {
  font-size: 0.85rem;
  color: var(--muted-foreground);
}

.type-signature,
.signature-attributes {
  color: var(--muted-foreground);
  font-weight: 400;
}

.signature-attributes {
  font-size: 0.75em;
  font-style: italic;
}

.return-type {
  color: var(--muted-foreground);
}

.subsection-title {
  font-size: 1.35rem;
  margin-top: 2rem;
  padding-bottom: 0.5rem;
  border-bottom: 2px solid var(--border);
}

.description {
  margin-bottom: 1rem;
}

/* Parameter tables */
table.params {
  border-collapse: collapse;
  width: 100%;
  margin: 0.75rem 0 1.25rem;
  font-size: 0.9rem;
}

table.params th,
table.params td {
  border: 1px solid var(--border);
  padding: 0.4rem 0.6rem;
  text-align: left;
}

table.params th {
  background: var(--muted);
}

/* Code */
pre.prettyprint {
  background: var(--muted);
  border: 1px solid var(--border);
  border-radius: 0.375rem;
  padding: 1rem;
  overflow-x: auto;
  font-family: ui-monospace, monospace;
  font-size: 0.875rem;
  margin-bottom: 1rem;
}

code {
  font-family: ui-monospace, monospace;
  font-size: 0.9em;
}

.code-caption {
  font-style: italic;
  color: var(--muted-foreground);
}

dl.details {
  font-size: 0.85rem;
  color: var(--muted-foreground);
  margin: 0.5rem 0 1rem;
}

dl.details dt {
  font-weight: 600;
  display: inline-block;
  margin-right: 0.5rem;
}

dl.details dd {
  display: inline;
}

a {
  color: var(--primary);
}

@media (max-width: 1024px) {
  .layout {
    grid-template-columns: 1fr;
  }

  .sidebar {
    position: static;
    height: auto;
    border-right: none;
    border-bottom: 1px solid var(--border);
  }
}
"#;

const DEFAULT_JS: &str = r#"// Inlay reference site - sidebar behavior
(function() {
  'use strict';

  // Collapsible menu sections
  document.querySelectorAll('.sidebar li.parent').forEach(item => {
    const arrow = item.querySelector('.menu-arrow');
    if (!arrow) return;

    arrow.addEventListener('click', () => {
      item.classList.toggle('open');
    });
  });

  // Expand the group containing the current page
  const current = window.location.pathname.split('/').pop();
  document.querySelectorAll('.sidebar a').forEach(link => {
    const href = link.getAttribute('href') || '';
    if (href.split('#')[0] === current) {
      link.classList.add('active');
      let parent = link.closest('li.parent');
      while (parent) {
        parent.classList.add('open');
        parent = parent.parentElement.closest('li.parent');
      }
    }
  });
})();
"#;
