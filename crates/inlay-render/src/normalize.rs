//! Doclet normalization and source-file indexing.
//!
//! The first pass over the database: resets display fields, splits example
//! captions, rewrites `@see` hash references into links, and collects the
//! set of source files the doclets reference. Malformed input degrades to a
//! safe default; nothing in this pass fails a run.

use std::collections::BTreeMap;

use regex::Regex;

use inlay_model::{Database, Meta};

use crate::links::{html_safe, LinkRegistry};

/// One distinct source file referenced by the database.
#[derive(Debug, Clone)]
pub struct SourceFileEntry {
    pub resolved: String,
    pub shortened: Option<String>,
}

/// Source files keyed by their computed path, in deterministic order.
#[derive(Debug, Clone, Default)]
pub struct SourceFiles {
    entries: BTreeMap<String, SourceFileEntry>,
}

impl SourceFiles {
    pub fn insert(&mut self, path: String) {
        self.entries
            .entry(path.clone())
            .or_insert(SourceFileEntry {
                resolved: path,
                shortened: None,
            });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SourceFileEntry> {
        self.entries.values()
    }

    pub fn shortened_for(&self, path: &str) -> Option<&str> {
        self.entries.get(path).and_then(|e| e.shortened.as_deref())
    }

    /// Strip the longest common directory prefix from every path and
    /// normalize separators to forward slashes. No-op when empty.
    pub fn shorten(&mut self) {
        if self.entries.is_empty() {
            return;
        }

        let normalized: Vec<String> = self
            .entries
            .values()
            .map(|e| e.resolved.replace('\\', "/"))
            .collect();
        let prefix = common_prefix(&normalized);

        for entry in self.entries.values_mut() {
            let path = entry.resolved.replace('\\', "/");
            let short = path.strip_prefix(&prefix).unwrap_or(&path);
            entry.shortened = Some(short.to_string());
        }
    }
}

/// Longest common directory prefix of a set of file paths, including the
/// trailing separator. A single path yields its parent directory.
fn common_prefix(paths: &[String]) -> String {
    let Some(first) = paths.first() else {
        return String::new();
    };

    let split = |p: &str| p.split('/').map(str::to_string).collect::<Vec<_>>();

    let head = split(first);
    // never consume a path's final (filename) component
    let mut common = head.len().saturating_sub(1);
    for path in &paths[1..] {
        let parts = split(path);
        let limit = common.min(parts.len().saturating_sub(1));
        let mut matched = 0;
        while matched < limit && parts[matched] == head[matched] {
            matched += 1;
        }
        common = matched;
    }

    if common == 0 {
        String::new()
    } else {
        format!("{}/", head[..common].join("/"))
    }
}

/// The source path a doclet's meta points at: `path/filename` unless the
/// recorded path is absent or the literal `"null"`.
pub fn source_path_from_meta(meta: &Meta) -> Option<String> {
    if meta.filename.is_empty() {
        return None;
    }
    match meta.path.as_deref() {
        Some(path) if !path.is_empty() && path != "null" => Some(format!(
            "{}/{}",
            path.trim_end_matches(['/', '\\']),
            meta.filename
        )),
        _ => Some(meta.filename.clone()),
    }
}

fn hash_to_link(url: &str, hash: &str) -> String {
    let base = match url.find('#') {
        Some(pos) => &url[..pos],
        None => url,
    };
    format!(
        "<a href=\"{}{}\">{}</a>",
        base,
        html_safe(hash),
        html_safe(hash)
    )
}

/// Run the normalizer over every doclet and collect the source-file set.
pub fn normalize_doclets(db: &mut Database, links: &mut LinkRegistry) -> SourceFiles {
    let caption =
        Regex::new(r"(?is)^\s*<caption>(.+?)</caption>\s*\n(.*)$").expect("caption pattern compiles");

    let mut sources = SourceFiles::default();

    for doclet in db.iter_mut() {
        doclet.attribs.clear();

        for example in &mut doclet.examples {
            if !example.caption.is_empty() {
                continue;
            }
            if let Some(caps) = caption.captures(&example.code) {
                example.caption = caps[1].to_string();
                example.code = caps[2].to_string();
            }
        }

        if doclet.see.iter().any(|s| is_hash_ref(s)) {
            let url = links.create_link(doclet);
            for entry in &mut doclet.see {
                if is_hash_ref(entry) {
                    *entry = hash_to_link(&url, entry);
                }
            }
        }

        if let Some(meta) = &doclet.meta {
            if let Some(path) = source_path_from_meta(meta) {
                sources.insert(path);
            }
        }
    }

    sources
}

fn is_hash_ref(entry: &str) -> bool {
    entry.len() > 1 && entry.starts_with('#')
}

/// Copy each entry's shortened path back onto the doclets that reference
/// it. A failed lookup leaves `shortpath` unset.
pub fn apply_shortpaths(db: &mut Database, sources: &SourceFiles) {
    for doclet in db.iter_mut() {
        let Some(meta) = &mut doclet.meta else {
            continue;
        };
        if let Some(path) = source_path_from_meta(meta) {
            if let Some(short) = sources.shortened_for(&path) {
                meta.shortpath = Some(short.to_string());
            }
        }
    }
}
