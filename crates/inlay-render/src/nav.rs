//! Navigation menu construction.
//!
//! The menu is a fixed-order concatenation of category sections, each
//! rendered flat or with one level of member children. Per-category display
//! and sort behavior comes from a defaults table shallow-merged with user
//! overrides.

use regex::Regex;
use serde::Deserialize;

use inlay_model::{Database, Doclet, Members, TutorialNode};

use crate::links::{html_safe, LinkRegistry};

/// Effective display options for one navigation category.
#[derive(Debug, Clone)]
pub struct CategoryOptions {
    pub show: bool,
    pub showchildren: bool,
    pub sortby: Option<String>,
    pub filtermodule: bool,
}

impl CategoryOptions {
    fn shown() -> Self {
        Self {
            show: true,
            showchildren: false,
            sortby: None,
            filtermodule: false,
        }
    }
}

/// Effective options for every category.
#[derive(Debug, Clone)]
pub struct MenuOptions {
    pub modules: CategoryOptions,
    pub namespaces: CategoryOptions,
    pub classes: CategoryOptions,
    pub globals: CategoryOptions,
    pub events: CategoryOptions,
    pub mixins: CategoryOptions,
    pub interfaces: CategoryOptions,
    pub tutorials: CategoryOptions,
    pub externals: CategoryOptions,
}

impl Default for MenuOptions {
    fn default() -> Self {
        let grouped = |showchildren: bool| CategoryOptions {
            showchildren,
            sortby: Some("kind".to_string()),
            ..CategoryOptions::shown()
        };
        Self {
            modules: CategoryOptions::shown(),
            namespaces: grouped(true),
            classes: grouped(true),
            globals: grouped(false),
            events: CategoryOptions {
                filtermodule: true,
                ..CategoryOptions::shown()
            },
            mixins: CategoryOptions::shown(),
            interfaces: CategoryOptions::shown(),
            tutorials: CategoryOptions::shown(),
            externals: CategoryOptions::shown(),
        }
    }
}

/// A sort selector as it appears in configuration: a field name, or a
/// boolean to switch sorting off.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SortBy {
    Disabled(bool),
    Field(String),
}

/// Partial per-category override; unset keys keep their default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CategoryOverride {
    pub show: Option<bool>,
    pub showchildren: Option<bool>,
    pub sortby: Option<SortBy>,
    pub filtermodule: Option<bool>,
}

/// User-supplied menu configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MenuOverrides {
    pub defaultsortby: Option<String>,
    pub modules: CategoryOverride,
    pub namespaces: CategoryOverride,
    pub classes: CategoryOverride,
    pub globals: CategoryOverride,
    pub events: CategoryOverride,
    pub mixins: CategoryOverride,
    pub interfaces: CategoryOverride,
    pub tutorials: CategoryOverride,
    pub externals: CategoryOverride,
}

fn apply(target: &mut CategoryOptions, over: &CategoryOverride) {
    if let Some(show) = over.show {
        target.show = show;
    }
    if let Some(showchildren) = over.showchildren {
        target.showchildren = showchildren;
    }
    if let Some(sortby) = &over.sortby {
        target.sortby = match sortby {
            SortBy::Field(field) => Some(field.clone()),
            SortBy::Disabled(_) => None,
        };
    }
    if let Some(filtermodule) = over.filtermodule {
        target.filtermodule = filtermodule;
    }
}

impl MenuOptions {
    /// Defaults merged with user overrides, key by key.
    pub fn merged(overrides: &MenuOverrides) -> Self {
        let mut options = Self::default();
        apply(&mut options.modules, &overrides.modules);
        apply(&mut options.namespaces, &overrides.namespaces);
        apply(&mut options.classes, &overrides.classes);
        apply(&mut options.globals, &overrides.globals);
        apply(&mut options.events, &overrides.events);
        apply(&mut options.mixins, &overrides.mixins);
        apply(&mut options.interfaces, &overrides.interfaces);
        apply(&mut options.tutorials, &overrides.tutorials);
        apply(&mut options.externals, &overrides.externals);
        options
    }
}

#[derive(Debug, Clone, Copy)]
enum LinkStyle {
    Symbol,
    External,
}

/// Builds the sidebar menu for one run.
pub struct NavBuilder<'a> {
    db: &'a Database,
    links: &'a LinkRegistry,
    options: &'a MenuOptions,
    use_longname: bool,
    prefix: Regex,
}

impl<'a> NavBuilder<'a> {
    pub fn new(
        db: &'a Database,
        links: &'a LinkRegistry,
        options: &'a MenuOptions,
        use_longname: bool,
    ) -> Self {
        Self {
            db,
            links,
            options,
            use_longname,
            prefix: Regex::new(r"\b(module|event):").expect("prefix pattern compiles"),
        }
    }

    /// The full menu in fixed section order; empty or disabled sections are
    /// omitted entirely.
    pub fn build(&self, members: &Members, tutorials: &TutorialNode) -> String {
        let opts = self.options;
        let mut nav = String::from("<nav>");
        nav.push_str("<div class=\"menu-section-title\"><a href=\"index.html\">Home</a></div>");

        if opts.modules.show {
            nav.push_str(&self.flat_section(
                &members.modules,
                "Modules",
                LinkStyle::Symbol,
                None,
                None,
            ));
        }

        if opts.namespaces.show {
            if opts.namespaces.showchildren {
                nav.push_str(&self.children_section(
                    &members.namespaces,
                    "Namespaces",
                    opts.namespaces.sortby.as_deref(),
                ));
            } else {
                nav.push_str(&self.flat_section(
                    &members.namespaces,
                    "Namespaces",
                    LinkStyle::Symbol,
                    None,
                    None,
                ));
            }
        }

        if opts.classes.show {
            if opts.classes.showchildren {
                nav.push_str(&self.children_section(
                    &members.classes,
                    "Classes",
                    opts.classes.sortby.as_deref(),
                ));
            } else {
                nav.push_str(&self.flat_section(
                    &members.classes,
                    "Classes",
                    LinkStyle::Symbol,
                    None,
                    None,
                ));
            }
        }

        if opts.globals.show {
            nav.push_str(&self.flat_section(
                &members.globals,
                "Global",
                LinkStyle::Symbol,
                opts.globals.sortby.as_deref(),
                Some("global"),
            ));
        }

        if opts.events.show {
            let events: Vec<Doclet> = members
                .events
                .iter()
                .filter(|e| {
                    !opts.events.filtermodule
                        || e.memberof
                            .as_deref()
                            .map_or(true, |m| !m.starts_with("module:"))
                })
                .cloned()
                .collect();
            nav.push_str(&self.flat_section(
                &events,
                "Events",
                LinkStyle::Symbol,
                opts.events.sortby.as_deref(),
                None,
            ));
        }

        if opts.mixins.show {
            nav.push_str(&self.flat_section(
                &members.mixins,
                "Mixins",
                LinkStyle::Symbol,
                None,
                None,
            ));
        }

        if opts.interfaces.show {
            nav.push_str(&self.flat_section(
                &members.interfaces,
                "Interfaces",
                LinkStyle::Symbol,
                None,
                None,
            ));
        }

        if opts.tutorials.show {
            nav.push_str(&self.tutorial_section(tutorials));
        }

        if opts.externals.show {
            nav.push_str(&self.flat_section(
                &members.externals,
                "Externals",
                LinkStyle::External,
                None,
                None,
            ));
        }

        nav.push_str("</nav>");
        nav
    }

    fn item_link(&self, item: &Doclet, style: LinkStyle) -> String {
        let display = if self.use_longname {
            item.longname.as_str()
        } else {
            item.name.as_str()
        };
        let label = self.prefix.replace_all(display, "");
        let label = match style {
            LinkStyle::Symbol => label.as_ref(),
            LinkStyle::External => label.trim_matches('"'),
        };
        self.links.linkto(&item.longname, &html_safe(label))
    }

    /// Render items as a flat list, optionally sorted by a field with a
    /// collapsible group header emitted whenever the field value changes.
    /// Items missing the sort field keep their relative order and get no
    /// header.
    fn flat_section(
        &self,
        items: &[Doclet],
        heading: &str,
        style: LinkStyle,
        sortby: Option<&str>,
        heading_target: Option<&str>,
    ) -> String {
        if items.is_empty() {
            return String::new();
        }

        let heading_html = match heading_target {
            Some(target) => self.links.linkto(target, heading),
            None => heading.to_string(),
        };

        let mut nav = format!("<div class=\"menu-section-title\">{heading_html}</div><ul>");
        let mut list: Vec<&Doclet> = items.iter().collect();
        if let Some(field) = sortby {
            sort_refs(&mut list, field);
        }
        nav.push_str(&self.grouped_items(&list, style, sortby));
        nav.push_str("</ul>");
        nav
    }

    fn grouped_items(&self, items: &[&Doclet], style: LinkStyle, sortby: Option<&str>) -> String {
        let mut out = String::new();
        let mut current: Option<&str> = None;

        for item in items {
            if let Some(field) = sortby {
                if let Some(value) = item.field(field) {
                    if current != Some(value) {
                        if current.is_some() {
                            out.push_str("</ul></li>");
                        }
                        out.push_str("<li class=\"parent\"><div class=\"menu-arrow\"></div>");
                        out.push_str(&html_safe(&title_case(value)));
                        out.push_str("<ul>");
                        current = Some(value);
                    }
                }
            }
            out.push_str("<li>");
            out.push_str(&self.item_link(item, style));
            out.push_str("</li>");
        }

        if current.is_some() {
            out.push_str("</ul></li>");
        }
        out
    }

    /// Render items as expandable nodes listing their direct members; items
    /// without members collapse to flat leaves.
    fn children_section(&self, items: &[Doclet], heading: &str, sortby: Option<&str>) -> String {
        if items.is_empty() {
            return String::new();
        }

        let mut nav = format!("<div class=\"menu-section-title\">{heading}</div><ul>");
        for item in items {
            let mut children = self.db.members_of(&item.longname);
            if children.is_empty() {
                nav.push_str("<li>");
                nav.push_str(&self.item_link(item, LinkStyle::Symbol));
                nav.push_str("</li>");
                continue;
            }

            nav.push_str("<li class=\"parent\"><div class=\"menu-arrow\"></div>");
            nav.push_str(&self.item_link(item, LinkStyle::Symbol));
            nav.push_str("<ul>");
            if let Some(field) = sortby {
                sort_refs(&mut children, field);
            }
            nav.push_str(&self.grouped_items(&children, LinkStyle::Symbol, sortby));
            nav.push_str("</ul></li>");
        }
        nav.push_str("</ul>");
        nav
    }

    fn tutorial_section(&self, root: &TutorialNode) -> String {
        if root.children.is_empty() {
            return String::new();
        }

        let mut nav = String::from("<div class=\"menu-section-title\">Tutorials</div><ul>");
        for child in &root.children {
            nav.push_str("<li>");
            nav.push_str(&self.links.tutorial_link(&child.name, &child.title));
            nav.push_str("</li>");
        }
        nav.push_str("</ul>");
        nav
    }
}

/// Stable sort; a field absent on either side compares equal.
fn sort_refs(items: &mut [&Doclet], field: &str) {
    items.sort_by(|a, b| match (a.field(field), b.field(field)) {
        (Some(x), Some(y)) => x.cmp(y),
        _ => std::cmp::Ordering::Equal,
    });
}

fn title_case(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
