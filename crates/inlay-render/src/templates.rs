//! Template engine for rendering documentation pages.
//!
//! Pages render in two stages: the page template produces the article HTML,
//! then the layout template wraps it together with the navigation menu. A
//! template directory on disk can replace the embedded bundle; the layout
//! template name is configurable either way.

use std::path::Path;

use minijinja::{context, Environment};

use inlay_model::Doclet;

/// Context for rendering a reference page.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PageContext {
    /// Page title
    pub title: String,
    /// Site title
    pub site_title: String,
    /// Doclets that resolve to this page
    pub docs: Vec<Doclet>,
    /// Member doclets grouped by kind
    pub members: Vec<Doclet>,
    pub methods: Vec<Doclet>,
    pub events: Vec<Doclet>,
    pub typedefs: Vec<Doclet>,
    /// Pre-built navigation HTML
    pub nav: String,
}

/// Context for rendering a tutorial page.
#[derive(Debug, Clone, serde::Serialize)]
pub struct TutorialContext {
    pub title: String,
    pub site_title: String,
    /// The tutorial's own heading
    pub header: String,
    /// Rendered body HTML
    pub content: String,
    pub children: Vec<TutorialChild>,
    pub nav: String,
}

/// A child entry on a tutorial page.
#[derive(Debug, Clone, serde::Serialize)]
pub struct TutorialChild {
    pub name: String,
    pub title: String,
    pub url: String,
}

/// Template engine backed by minijinja.
pub struct TemplateEngine {
    env: Environment<'static>,
    layout: String,
}

impl TemplateEngine {
    /// Engine with the embedded default templates.
    pub fn new() -> Self {
        let mut env = Environment::new();

        env.add_template_owned("layout.html".to_string(), LAYOUT_TEMPLATE.to_string())
            .expect("layout template parses");
        env.add_template_owned("container.html".to_string(), CONTAINER_TEMPLATE.to_string())
            .expect("container template parses");
        env.add_template_owned("tutorial.html".to_string(), TUTORIAL_TEMPLATE.to_string())
            .expect("tutorial template parses");

        Self {
            env,
            layout: "layout.html".to_string(),
        }
    }

    /// Engine loading every template from a bundle directory instead.
    pub fn from_dir(dir: &Path) -> Self {
        let mut env = Environment::new();
        env.set_loader(minijinja::path_loader(dir));
        Self {
            env,
            layout: "layout.html".to_string(),
        }
    }

    /// Use a different template as the page layout.
    pub fn set_layout(&mut self, name: String) {
        self.layout = name;
    }

    /// Render a reference page and wrap it in the layout.
    pub fn render_page(
        &self,
        template: &str,
        ctx: &PageContext,
    ) -> Result<String, minijinja::Error> {
        let content = self.env.get_template(template)?.render(ctx)?;
        self.wrap(&content, &ctx.title, &ctx.site_title, &ctx.nav)
    }

    /// Render a tutorial page and wrap it in the layout.
    pub fn render_tutorial(&self, ctx: &TutorialContext) -> Result<String, minijinja::Error> {
        let content = self.env.get_template("tutorial.html")?.render(ctx)?;
        self.wrap(&content, &ctx.title, &ctx.site_title, &ctx.nav)
    }

    fn wrap(
        &self,
        content: &str,
        title: &str,
        site_title: &str,
        nav: &str,
    ) -> Result<String, minijinja::Error> {
        let layout = self.env.get_template(&self.layout)?;
        layout.render(context! {
            content => content,
            title => title,
            site_title => site_title,
            nav => nav,
        })
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

const LAYOUT_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ title }} - {{ site_title }}</title>
  <link rel="stylesheet" href="styles/inlay.css">
</head>
<body>
  <div class="layout">
    <nav class="sidebar">
      {{ nav | safe }}
    </nav>
    <main class="main">
      <h1 class="page-title">{{ title }}</h1>
      {{ content | safe }}
    </main>
  </div>
  <script src="scripts/menu.js"></script>
</body>
</html>"##;

const CONTAINER_TEMPLATE: &str = r##"{% macro detail(doc) %}
<header>
  {% if doc.ancestors %}<div class="ancestors">{% for ancestor in doc.ancestors %}{{ ancestor | safe }}{% endfor %}</div>{% endif %}
  <h2 class="name"{% if doc.id %} id="{{ doc.id }}"{% endif %}>{{ doc.attribs | safe }}{{ doc.name }}{% if doc.signature %}{{ doc.signature | safe }}{% endif %}</h2>
</header>
{% if doc.description %}<div class="description">{{ doc.description | safe }}</div>{% endif %}
{% if doc.augments %}
<h5>Extends</h5>
<ul class="extends">{% for parent in doc.augments %}<li>{@link {{ parent }}}</li>{% endfor %}</ul>
{% endif %}
{% if doc.params %}
<h5>Parameters</h5>
<table class="params">
  <thead><tr><th>Name</th><th>Type</th><th>Attributes</th><th>Description</th></tr></thead>
  <tbody>
  {% for param in doc.params %}
    <tr>
      <td class="name"><code>{% if param.name %}{{ param.name }}{% endif %}</code></td>
      <td class="type">{% if param.type %}{% for name in param.type.names %}{% if not loop.first %} | {% endif %}{@link {{ name }}}{% endfor %}{% endif %}</td>
      <td class="attributes">{% if param.optional %}&lt;optional&gt; {% endif %}{% if param.variable %}&lt;repeatable&gt; {% endif %}{% if param.nullable %}&lt;nullable&gt; {% endif %}</td>
      <td class="description">{% if param.description %}{{ param.description | safe }}{% endif %}</td>
    </tr>
  {% endfor %}
  </tbody>
</table>
{% endif %}
{% if doc.returns %}
<h5>Returns</h5>
<ul class="returns">
{% for ret in doc.returns %}
  <li>{% if ret.description %}{{ ret.description | safe }}{% endif %}{% if ret.type %} <span class="param-type">{% for name in ret.type.names %}{% if not loop.first %} | {% endif %}{@link {{ name }}}{% endfor %}</span>{% endif %}</li>
{% endfor %}
</ul>
{% endif %}
{% if doc.examples %}
<h5>Examples</h5>
{% for example in doc.examples %}
{% if example.caption %}<p class="code-caption">{{ example.caption | safe }}</p>{% endif %}
<pre class="prettyprint"><code>{{ example.code }}</code></pre>
{% endfor %}
{% endif %}
{% if doc.see %}
<h5>See</h5>
<ul class="see-list">{% for ref in doc.see %}<li>{{ ref | safe }}</li>{% endfor %}</ul>
{% endif %}
{% if doc.meta and doc.meta.shortpath %}
<dl class="details">
  <dt class="tag-source">Source</dt>
  <dd class="tag-source">{@link {{ doc.meta.shortpath }}}{% if doc.meta.lineno %}, line {{ doc.meta.lineno }}{% endif %}</dd>
</dl>
{% endif %}
{% endmacro %}
{% for doc in docs %}
<article class="doc">
{% if doc.kind == "mainpage" %}
  {% if doc.readme %}<section class="readme">{{ doc.readme | safe }}</section>{% endif %}
{% elif doc.kind == "source" %}
  <section class="source">
    <pre class="prettyprint source"><code>{{ doc.code | safe }}</code></pre>
  </section>
{% elif doc.kind == "package" %}
  <section class="package">
    <h2>{{ doc.name }}{% if doc.version %} {{ doc.version }}{% endif %}</h2>
    {% if doc.description %}<div class="description">{{ doc.description | safe }}</div>{% endif %}
  </section>
{% elif doc.kind == "file" %}
  <section class="file">
    <h2{% if doc.id %} id="{{ doc.id }}"{% endif %}>{{ doc.name }}</h2>
    {% if doc.description %}<div class="description">{{ doc.description | safe }}</div>{% endif %}
  </section>
{% else %}
  {{ detail(doc) }}
  {% if doc.modules %}
  <section class="module-exports">
    <h3 class="subsection-title">Exports</h3>
    {% for symbol in doc.modules %}{{ detail(symbol) }}{% endfor %}
  </section>
  {% endif %}
{% endif %}
</article>
{% endfor %}
{% if members %}
<section class="subsection">
  <h3 class="subsection-title">Members</h3>
  {% for doc in members %}{{ detail(doc) }}{% endfor %}
</section>
{% endif %}
{% if methods %}
<section class="subsection">
  <h3 class="subsection-title">Methods</h3>
  {% for doc in methods %}{{ detail(doc) }}{% endfor %}
</section>
{% endif %}
{% if events %}
<section class="subsection">
  <h3 class="subsection-title">Events</h3>
  {% for doc in events %}{{ detail(doc) }}{% endfor %}
</section>
{% endif %}
{% if typedefs %}
<section class="subsection">
  <h3 class="subsection-title">Type Definitions</h3>
  {% for doc in typedefs %}{{ detail(doc) }}{% endfor %}
</section>
{% endif %}"##;

const TUTORIAL_TEMPLATE: &str = r##"<article class="tutorial">
<header>
  <h2>{{ header }}</h2>
</header>
{% if children %}
<ul class="tutorial-children">
{% for child in children %}
  <li><a href="{{ child.url }}">{{ child.title }}</a></li>
{% endfor %}
</ul>
{% endif %}
<div class="content">
{{ content | safe }}
</div>
</article>"##;

#[cfg(test)]
mod tests {
    use super::*;
    use inlay_model::Kind;

    fn page(docs: Vec<Doclet>) -> PageContext {
        PageContext {
            title: "Class: Shape".to_string(),
            site_title: "My API".to_string(),
            docs,
            members: vec![],
            methods: vec![],
            events: vec![],
            typedefs: vec![],
            nav: "<nav></nav>".to_string(),
        }
    }

    #[test]
    fn wraps_pages_in_the_layout() {
        let engine = TemplateEngine::new();
        let doclet = Doclet {
            longname: "Shape".into(),
            name: "Shape".into(),
            kind: Kind::Class,
            id: Some("Shape".into()),
            description: Some("<p>A shape.</p>".into()),
            ..Doclet::default()
        };

        let html = engine.render_page("container.html", &page(vec![doclet])).unwrap();

        assert!(html.contains("<title>Class: Shape - My API</title>"));
        assert!(html.contains("<h2 class=\"name\" id=\"Shape\">"));
        assert!(html.contains("<p>A shape.</p>"));
    }

    #[test]
    fn signatures_render_unescaped() {
        let engine = TemplateEngine::new();
        let doclet = Doclet {
            longname: "foo".into(),
            name: "foo".into(),
            kind: Kind::Function,
            id: Some("foo".into()),
            signature: Some("<span class=\"signature\">()</span>".into()),
            ..Doclet::default()
        };

        let html = engine.render_page("container.html", &page(vec![doclet])).unwrap();

        assert!(html.contains("foo<span class=\"signature\">()</span>"));
    }

    #[test]
    fn param_types_emit_link_markup_for_resolution() {
        let engine = TemplateEngine::new();
        let doclet = Doclet {
            longname: "foo".into(),
            name: "foo".into(),
            kind: Kind::Function,
            params: vec![inlay_model::Param {
                name: Some("base".into()),
                type_: Some(inlay_model::TypeExpr {
                    names: vec!["Color".into()],
                }),
                ..inlay_model::Param::default()
            }],
            ..Doclet::default()
        };

        let html = engine.render_page("container.html", &page(vec![doclet])).unwrap();

        // left for the link-resolution pass
        assert!(html.contains("{@link Color}"));
    }

    #[test]
    fn example_code_is_escaped() {
        let engine = TemplateEngine::new();
        let doclet = Doclet {
            longname: "foo".into(),
            name: "foo".into(),
            kind: Kind::Function,
            examples: vec![inlay_model::Example {
                caption: "Basic".into(),
                code: "if (a < b) { foo(); }".into(),
            }],
            ..Doclet::default()
        };

        let html = engine.render_page("container.html", &page(vec![doclet])).unwrap();

        assert!(html.contains("<p class=\"code-caption\">Basic</p>"));
        assert!(html.contains("if (a &lt; b) { foo(); }"));
    }

    #[test]
    fn tutorials_list_their_children() {
        let engine = TemplateEngine::new();
        let ctx = TutorialContext {
            title: "Tutorial: Setup".to_string(),
            site_title: "My API".to_string(),
            header: "Setup".to_string(),
            content: "<p>Install things.</p>".to_string(),
            children: vec![TutorialChild {
                name: "advanced".to_string(),
                title: "Advanced Setup".to_string(),
                url: "tutorial-advanced.html".to_string(),
            }],
            nav: String::new(),
        };

        let html = engine.render_tutorial(&ctx).unwrap();

        assert!(html.contains("<h2>Setup</h2>"));
        assert!(html.contains("<a href=\"tutorial-advanced.html\">Advanced Setup</a>"));
        assert!(html.contains("<p>Install things.</p>"));
    }
}
