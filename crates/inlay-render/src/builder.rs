//! Site builder.
//!
//! One `SiteBuilder` value is the whole run context: configuration, template
//! engine, and link registry. `build` drives the pipeline passes in a fixed
//! order and discards all state when it returns.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use inlay_model::{Database, Doclet, Kind, TutorialNode};

use crate::assets;
use crate::links::{html_safe, LinkRegistry};
use crate::nav::{MenuOptions, NavBuilder};
use crate::normalize::{apply_shortpaths, normalize_doclets, SourceFiles};
use crate::signature::{
    add_attribs, add_signature_params, add_signature_returns, add_signature_types, needs_signature,
};
use crate::templates::{PageContext, TemplateEngine, TutorialChild, TutorialContext};

/// Configuration for one rendering run.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Output root directory
    pub destination: PathBuf,

    /// Template bundle directory replacing the embedded templates
    pub template_dir: Option<PathBuf>,

    /// Site title shown in page titles
    pub site_title: String,

    /// Readme markdown rendered onto the home page
    pub readme: Option<String>,

    /// Longname of the fabricated home-page doclet
    pub mainpagetitle: Option<String>,

    /// Source listing encoding; only UTF-8 decodes natively
    pub encoding: String,

    /// Emit pretty-printed source pages
    pub output_source_files: bool,

    /// Files and directories to copy verbatim into the output
    pub static_files: Vec<PathBuf>,

    /// Template name used as the page layout
    pub layout_file: Option<String>,

    /// Show longnames instead of names in the navigation
    pub use_longname_in_nav: bool,

    /// Minify the generated stylesheet
    pub minify: bool,

    /// Navigation menu options
    pub menu: MenuOptions,

    /// Doclet sort keys, applied in order
    pub sort_keys: Vec<String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            destination: PathBuf::from("docs/api"),
            template_dir: None,
            site_title: "Documentation".to_string(),
            readme: None,
            mainpagetitle: None,
            encoding: "utf-8".to_string(),
            output_source_files: true,
            static_files: vec![],
            layout_file: None,
            use_longname_in_nav: false,
            minify: true,
            menu: MenuOptions::default(),
            sort_keys: default_sort_keys(),
        }
    }
}

/// The default doclet ordering.
pub fn default_sort_keys() -> Vec<String> {
    vec![
        "longname".to_string(),
        "version".to_string(),
        "since".to_string(),
    ]
}

/// Result of a rendering run.
#[derive(Debug)]
pub struct BuildStats {
    /// Reference pages written
    pub pages: usize,

    /// Pretty-printed source pages written
    pub source_pages: usize,

    /// Tutorial pages written
    pub tutorial_pages: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Effective output directory
    pub output_dir: PathBuf,
}

/// Errors that can occur during a run.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to create output directory {path}: {message}")]
    OutputDir { path: String, message: String },

    #[error("Failed to render template: {0}")]
    Template(String),

    #[error("Failed to write {path}: {message}")]
    Write { path: String, message: String },

    #[error("Failed to copy static files: {0}")]
    StaticCopy(String),
}

/// Run context for one site build.
pub struct SiteBuilder {
    config: RenderConfig,
    templates: TemplateEngine,
    links: LinkRegistry,
    nav: String,
    outdir: PathBuf,
}

impl SiteBuilder {
    pub fn new(config: RenderConfig) -> Self {
        let mut templates = match &config.template_dir {
            Some(dir) => TemplateEngine::from_dir(dir),
            None => TemplateEngine::new(),
        };
        if let Some(layout) = &config.layout_file {
            templates.set_layout(layout.clone());
        }

        let outdir = config.destination.clone();
        Self {
            config,
            templates,
            links: LinkRegistry::new(),
            nav: String::new(),
            outdir,
        }
    }

    /// Render the whole site.
    pub fn build(
        &mut self,
        db: &mut Database,
        tutorials: &TutorialNode,
    ) -> Result<BuildStats, BuildError> {
        let start = Instant::now();

        // claim the special filenames before anything else can take them;
        // 'index' stays unregistered because it is also a valid longname
        let index_url = self.links.unique_filename("index");
        let global_url = self.links.filename_for("global");
        self.links.register("global", &global_url);
        self.links.register_tutorials(tutorials);

        db.prune();
        db.sort_by_fields(&self.config.sort_keys);

        let mut sources = normalize_doclets(db, &mut self.links);

        // nest the output under the package name and version when known
        self.outdir = self.config.destination.clone();
        if let Some(package) = db.find(|d| d.kind == Kind::Package).into_iter().next() {
            if !package.name.is_empty() {
                self.outdir = self.outdir.join(&package.name);
                if let Some(version) = package.version.as_deref().filter(|v| !v.is_empty()) {
                    self.outdir = self.outdir.join(version);
                }
            }
        }
        fs::create_dir_all(&self.outdir).map_err(|e| BuildError::OutputDir {
            path: self.outdir.display().to_string(),
            message: e.to_string(),
        })?;

        match &self.config.template_dir {
            Some(dir) => {
                assets::copy_template_static(dir, &self.outdir)
                    .map_err(|e| BuildError::StaticCopy(e.to_string()))?;
            }
            None => {
                assets::write_default_assets(&self.outdir, self.config.minify)
                    .map_err(|e| BuildError::StaticCopy(e.to_string()))?;
            }
        }
        assets::copy_static_files(&self.config.static_files, &self.outdir)
            .map_err(|e| BuildError::StaticCopy(e.to_string()))?;

        sources.shorten();
        apply_shortpaths(db, &sources);

        // canonical URLs; the first registration for a longname wins
        for doclet in db.iter() {
            if self.links.url_for(&doclet.longname).is_none() {
                let url = self.links.create_link(doclet);
                self.links.register(&doclet.longname, &url);
            }
        }

        // anchors and signatures
        for doclet in db.iter_mut() {
            let url = self.links.url_for(&doclet.longname).unwrap_or("");
            doclet.id = Some(match url.find('#') {
                Some(pos) => url[pos + 1..].to_string(),
                None => doclet.name.clone(),
            });

            if needs_signature(doclet) {
                add_signature_params(doclet);
                add_signature_returns(doclet, &self.links);
                add_attribs(doclet);
            }
        }

        // ancestors and member types, once the urls all exist
        let ancestors: Vec<Vec<String>> = db
            .iter()
            .map(|d| ancestor_links(db, d, &self.links))
            .collect();
        for (doclet, chain) in db.iter_mut().zip(ancestors) {
            doclet.ancestors = chain;
        }

        for doclet in db.iter_mut() {
            if doclet.kind == Kind::Member {
                add_signature_types(doclet, &self.links);
                add_attribs(doclet);
            }
            if doclet.kind == Kind::Constant {
                add_signature_types(doclet, &self.links);
                add_attribs(doclet);
                doclet.kind = Kind::Member;
            }
        }

        let members = db.members();

        self.nav = {
            let nav = NavBuilder::new(
                db,
                &self.links,
                &self.config.menu,
                self.config.use_longname_in_nav,
            );
            nav.build(&members, tutorials)
        };

        attach_module_symbols(db);

        // source pages come first so reference pages can link to them
        let mut source_pages = 0;
        if self.config.output_source_files {
            source_pages = self.generate_source_files(db, &sources)?;
        }

        let mut pages = 0;

        if !members.globals.is_empty() {
            self.generate(db, "Global", &members.globals, &global_url, true)?;
            pages += 1;
        }

        // the home page shows the package, the readme, and the file list
        let readme_html = self.config.readme.as_deref().map(render_markdown);
        let main_longname = self
            .config
            .mainpagetitle
            .clone()
            .unwrap_or_else(|| "Main Page".to_string());
        let mut home_docs: Vec<Doclet> = db
            .find(|d| d.kind == Kind::Package)
            .into_iter()
            .cloned()
            .collect();
        home_docs.push(Doclet::main_page(&main_longname, readme_html));
        home_docs.extend(db.find(|d| d.kind == Kind::File).into_iter().cloned());
        self.generate(db, "Home", &home_docs, &index_url, true)?;
        pages += 1;

        // one page per registered URL with doclets of a container kind
        let targets: Vec<(String, String)> = self
            .links
            .urls()
            .map(|(longname, url)| (longname.to_string(), url.to_string()))
            .collect();
        for (longname, url) in &targets {
            for (kind, label) in [
                (Kind::Module, "Module"),
                (Kind::Class, "Class"),
                (Kind::Namespace, "Namespace"),
                (Kind::Mixin, "Mixin"),
                (Kind::External, "External"),
                (Kind::Interface, "Interface"),
            ] {
                let docs: Vec<Doclet> = db
                    .find(|d| d.kind == kind && &d.longname == longname)
                    .into_iter()
                    .cloned()
                    .collect();
                if docs.is_empty() {
                    continue;
                }
                let title = format!("{label}: {}", docs[0].name);
                self.generate(db, &title, &docs, url, true)?;
                pages += 1;
            }
        }

        let tutorial_pages = self.save_children(tutorials)?;

        Ok(BuildStats {
            pages,
            source_pages,
            tutorial_pages,
            duration_ms: start.elapsed().as_millis() as u64,
            output_dir: self.outdir.clone(),
        })
    }

    /// Render one page and write it into the output directory.
    fn generate(
        &self,
        db: &Database,
        title: &str,
        docs: &[Doclet],
        filename: &str,
        resolve_links: bool,
    ) -> Result<(), BuildError> {
        let mut members = Vec::new();
        let mut methods = Vec::new();
        let mut events = Vec::new();
        let mut typedefs = Vec::new();

        for doc in docs.iter().filter(|d| d.kind.is_container()) {
            for child in db.members_of(&doc.longname) {
                match child.kind {
                    Kind::Member => members.push(child.clone()),
                    Kind::Function => methods.push(child.clone()),
                    Kind::Event => events.push(child.clone()),
                    Kind::Typedef => typedefs.push(child.clone()),
                    _ => {}
                }
            }
        }

        let ctx = PageContext {
            title: title.to_string(),
            site_title: self.config.site_title.clone(),
            docs: docs.to_vec(),
            members,
            methods,
            events,
            typedefs,
            nav: self.nav.clone(),
        };

        let html = self
            .templates
            .render_page("container.html", &ctx)
            .map_err(|e| BuildError::Template(e.to_string()))?;
        let html = if resolve_links {
            self.links.resolve_links(&html)
        } else {
            html
        };

        let outpath = self.outdir.join(filename);
        fs::write(&outpath, html).map_err(|e| BuildError::Write {
            path: outpath.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Pretty-print every referenced source file. Unreadable files are
    /// logged and their page emitted without a source body.
    fn generate_source_files(
        &mut self,
        db: &Database,
        sources: &SourceFiles,
    ) -> Result<usize, BuildError> {
        if !matches!(
            self.config.encoding.to_ascii_lowercase().as_str(),
            "utf-8" | "utf8"
        ) {
            tracing::warn!(
                "Unsupported encoding {:?}; reading source files as UTF-8",
                self.config.encoding
            );
        }

        // links are keyed to the shortened path each doclet carries in
        // meta.shortpath
        let mut planned = Vec::new();
        for entry in sources.iter() {
            let shortened = entry
                .shortened
                .clone()
                .unwrap_or_else(|| entry.resolved.clone());
            let outfile = self.links.unique_filename(&shortened);
            self.links.register(&shortened, &outfile);
            planned.push((entry.resolved.clone(), shortened, outfile));
        }

        let mut count = 0;
        for (resolved, shortened, outfile) in planned {
            let code = match fs::read(&resolved) {
                Ok(bytes) => html_safe(&String::from_utf8_lossy(&bytes)),
                Err(e) => {
                    tracing::error!("Error while generating source file {}: {}", resolved, e);
                    String::new()
                }
            };

            let doc = Doclet::source_listing(&shortened, code);
            self.generate(db, &format!("Source: {shortened}"), &[doc], &outfile, false)?;
            count += 1;
        }

        Ok(count)
    }

    /// Depth-first tutorial generation; the root itself gets no page.
    fn save_children(&self, node: &TutorialNode) -> Result<usize, BuildError> {
        let mut count = 0;
        for child in &node.children {
            self.generate_tutorial(child)?;
            count += 1 + self.save_children(child)?;
        }
        Ok(count)
    }

    fn generate_tutorial(&self, node: &TutorialNode) -> Result<(), BuildError> {
        let Some(url) = self.links.tutorial_url(&node.name) else {
            return Ok(());
        };

        let children = node
            .children
            .iter()
            .map(|child| TutorialChild {
                name: child.name.clone(),
                title: child.title.clone(),
                url: self
                    .links
                    .tutorial_url(&child.name)
                    .unwrap_or_default()
                    .to_string(),
            })
            .collect();

        let ctx = TutorialContext {
            title: format!("Tutorial: {}", node.title),
            site_title: self.config.site_title.clone(),
            header: node.title.clone(),
            content: render_markdown(&node.content),
            children,
            nav: self.nav.clone(),
        };

        let html = self
            .templates
            .render_tutorial(&ctx)
            .map_err(|e| BuildError::Template(e.to_string()))?;
        let html = self.links.resolve_links(&html);

        let outpath = self.outdir.join(url);
        fs::write(&outpath, html).map_err(|e| BuildError::Write {
            path: outpath.display().to_string(),
            message: e.to_string(),
        })
    }
}

/// Breadcrumb links for a doclet's `memberof` chain, outermost ancestor
/// first, each followed by the scope punctuation of the element after it.
fn ancestor_links(db: &Database, doclet: &Doclet, links: &LinkRegistry) -> Vec<String> {
    let mut chain: Vec<&Doclet> = Vec::new();
    let mut current = doclet.memberof.as_deref();
    // memberof chains come from outside; cap the walk in case of a cycle
    while let Some(parent_longname) = current {
        if chain.len() > 32 {
            break;
        }
        let Some(parent) = db
            .find(|d| d.longname == parent_longname)
            .into_iter()
            .next()
        else {
            break;
        };
        chain.push(parent);
        current = parent.memberof.as_deref();
    }
    chain.reverse();

    chain
        .iter()
        .enumerate()
        .map(|(i, ancestor)| {
            let next_scope = if i + 1 < chain.len() {
                chain[i + 1].scope
            } else {
                doclet.scope
            };
            let punctuation = next_scope.map(|s| s.punctuation()).unwrap_or("");
            format!(
                "{}{}",
                links.linkto(&ancestor.longname, &html_safe(&ancestor.name)),
                punctuation
            )
        })
        .collect()
}

/// Attach a module's exported classes and functions (doclets sharing the
/// module's longname) for display on the module page.
fn attach_module_symbols(db: &mut Database) {
    let mut exported: HashMap<String, Vec<Doclet>> = HashMap::new();
    for doclet in db.iter() {
        if doclet.longname.starts_with("module:")
            && matches!(doclet.kind, Kind::Class | Kind::Function)
        {
            exported
                .entry(doclet.longname.clone())
                .or_default()
                .push(doclet.clone());
        }
    }
    if exported.is_empty() {
        return;
    }

    for module in db.iter_mut() {
        if module.kind != Kind::Module {
            continue;
        }
        let Some(symbols) = exported.get(&module.longname) else {
            continue;
        };
        // symbols without a description stay hidden, except classes, whose
        // constructor signature always shows
        let attached: Vec<Doclet> = symbols
            .iter()
            .filter(|s| s.description.is_some() || s.kind == Kind::Class)
            .cloned()
            .map(|mut symbol| {
                symbol.name = format!(
                    "{}\"))",
                    symbol.name.replacen("module:", "(require(\"", 1)
                );
                symbol
            })
            .collect();
        if !attached.is_empty() {
            module.modules = Some(attached);
        }
    }
}

fn render_markdown(text: &str) -> String {
    use pulldown_cmark::{html, Options, Parser};

    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS;
    let parser = Parser::new_ext(text, options);

    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}
