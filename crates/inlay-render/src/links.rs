//! Cross-reference link registry and resolver.
//!
//! Maps longnames to output URLs, hands out collision-free filenames, and
//! rewrites `{@link}` markup in rendered HTML. The mapping is built once per
//! run and stays stable for its duration.

use std::collections::{BTreeMap, HashSet};

use regex::Regex;

use inlay_model::{Doclet, TutorialNode};

/// Escape text for embedding in HTML.
pub fn html_safe(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}

/// Longname-to-URL registry shared by every rendering stage.
#[derive(Debug)]
pub struct LinkRegistry {
    longname_to_url: BTreeMap<String, String>,
    filenames: BTreeMap<String, String>,
    used: HashSet<String>,
    tutorial_urls: BTreeMap<String, String>,
    link_bracket: Regex,
    link_inline: Regex,
}

impl Default for LinkRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkRegistry {
    pub fn new() -> Self {
        Self {
            longname_to_url: BTreeMap::new(),
            filenames: BTreeMap::new(),
            used: HashSet::new(),
            tutorial_urls: BTreeMap::new(),
            link_bracket: Regex::new(r"\[([^\[\]]+)\]\{@link\s+([^}\s|]+)\s*\}")
                .expect("link pattern compiles"),
            link_inline: Regex::new(r"\{@link\s+([^}\s|]+)(?:[\s|]+([^}]+))?\}")
                .expect("link pattern compiles"),
        }
    }

    /// Hand out a filename no earlier caller has received.
    pub fn unique_filename(&mut self, base: &str) -> String {
        let sanitized = sanitize_filename(base);
        let mut candidate = format!("{sanitized}.html");
        let mut counter = 0;
        while self.used.contains(&candidate) {
            candidate = format!("{sanitized}_{counter}.html");
            counter += 1;
        }
        self.used.insert(candidate.clone());
        candidate
    }

    /// The output filename backing a longname, allocated on first use so
    /// repeated lookups agree.
    pub fn filename_for(&mut self, longname: &str) -> String {
        if let Some(existing) = self.filenames.get(longname) {
            return existing.clone();
        }
        let filename = self.unique_filename(longname);
        self.filenames.insert(longname.to_string(), filename.clone());
        filename
    }

    /// Canonical URL of a doclet: container kinds get their own file,
    /// members become a fragment on their parent's page, parentless members
    /// land on the global page.
    pub fn create_link(&mut self, doclet: &Doclet) -> String {
        if doclet.kind.is_container() {
            return self.filename_for(&doclet.longname);
        }
        let file = match &doclet.memberof {
            Some(parent) => self.filename_for(parent),
            None => self.filename_for("global"),
        };
        format!("{}#{}", file, doclet.name)
    }

    pub fn register(&mut self, longname: &str, url: &str) {
        self.longname_to_url
            .insert(longname.to_string(), url.to_string());
    }

    pub fn url_for(&self, longname: &str) -> Option<&str> {
        self.longname_to_url.get(longname).map(String::as_str)
    }

    /// All registered (longname, url) pairs in deterministic order.
    pub fn urls(&self) -> impl Iterator<Item = (&str, &str)> {
        self.longname_to_url
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// An anchor tag when the longname is known, the bare text otherwise.
    pub fn linkto(&self, longname: &str, text: &str) -> String {
        match self.url_for(longname) {
            Some(url) => format!("<a href=\"{url}\">{text}</a>"),
            None => text.to_string(),
        }
    }

    /// Claim a `tutorial-<name>.html` URL for every node under the root.
    pub fn register_tutorials(&mut self, root: &TutorialNode) {
        for child in &root.children {
            let url = self.unique_filename(&format!("tutorial-{}", child.name));
            self.tutorial_urls.insert(child.name.clone(), url);
            self.register_tutorials(child);
        }
    }

    pub fn tutorial_url(&self, name: &str) -> Option<&str> {
        self.tutorial_urls.get(name).map(String::as_str)
    }

    /// Link to a tutorial page; unknown tutorials render as a disabled label.
    pub fn tutorial_link(&self, name: &str, title: &str) -> String {
        let label = if title.is_empty() { name } else { title };
        match self.tutorial_url(name) {
            Some(url) => format!("<a href=\"{url}\">Tutorial: {}</a>", html_safe(label)),
            None => format!("<em class=\"disabled\">Tutorial: {}</em>", html_safe(label)),
        }
    }

    /// Rewrite `{@link target}`, `{@link target|label}`, `{@link target
    /// label}` and `[label]{@link target}` markup into anchors. Unknown
    /// targets degrade to their label as plain text.
    pub fn resolve_links(&self, html: &str) -> String {
        let pass_one = self
            .link_bracket
            .replace_all(html, |caps: &regex::Captures<'_>| {
                self.linkto(&caps[2], &html_safe(&caps[1]))
            });
        self.link_inline
            .replace_all(&pass_one, |caps: &regex::Captures<'_>| {
                let target = &caps[1];
                let label = caps
                    .get(2)
                    .map(|m| m.as_str().trim())
                    .filter(|s| !s.is_empty())
                    .unwrap_or(target);
                self.linkto(target, &html_safe(label))
            })
            .into_owned()
    }
}

/// Turn a longname into a name safe for every common filesystem.
fn sanitize_filename(base: &str) -> String {
    let mut name = base.to_string();
    for tag in ["module", "external", "event", "package"] {
        let prefix = format!("{tag}:");
        if let Some(rest) = name.strip_prefix(&prefix) {
            name = format!("{tag}-{rest}");
            break;
        }
    }

    let mapped: String = name
        .chars()
        .map(|c| match c {
            '\\' | '/' | '?' | '*' | ':' | '|' | '\'' | '"' | '<' | '>' | '#' => '_',
            '~' => '-',
            c => c,
        })
        .collect();

    let trimmed = mapped.trim_start_matches(['.', '-']);
    if trimmed.is_empty() {
        "_".to_string()
    } else {
        trimmed.to_string()
    }
}
