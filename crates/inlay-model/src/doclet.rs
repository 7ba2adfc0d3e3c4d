//! Doclet records produced by a parser front-end.
//!
//! One [`Doclet`] describes one documented entity. The renderer mutates a
//! handful of display fields (`attribs`, `signature`, `id`, `ancestors`) in
//! place over the course of a run; everything else arrives from the parser.

use serde::{Deserialize, Serialize};

/// Kind tag of a documented entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Class,
    Constant,
    Event,
    External,
    File,
    Function,
    Interface,
    /// Fabricated for the home page; never emitted by a parser.
    MainPage,
    Member,
    Mixin,
    Module,
    Namespace,
    Package,
    /// Fabricated for pretty-printed source listings.
    Source,
    Typedef,
    #[serde(other)]
    #[default]
    Other,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Class => "class",
            Kind::Constant => "constant",
            Kind::Event => "event",
            Kind::External => "external",
            Kind::File => "file",
            Kind::Function => "function",
            Kind::Interface => "interface",
            Kind::MainPage => "mainpage",
            Kind::Member => "member",
            Kind::Mixin => "mixin",
            Kind::Module => "module",
            Kind::Namespace => "namespace",
            Kind::Package => "package",
            Kind::Source => "source",
            Kind::Typedef => "typedef",
            Kind::Other => "other",
        }
    }

    /// Kinds that get their own output page; everything else is addressed
    /// as a fragment on its parent's page.
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            Kind::Class
                | Kind::External
                | Kind::Interface
                | Kind::MainPage
                | Kind::Mixin
                | Kind::Module
                | Kind::Namespace
                | Kind::Source
        )
    }
}

/// Membership scope of a doclet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Global,
    Static,
    Instance,
    Inner,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Global => "global",
            Scope::Static => "static",
            Scope::Instance => "instance",
            Scope::Inner => "inner",
        }
    }

    /// Punctuation separating a member from its parent in a longname.
    pub fn punctuation(&self) -> &'static str {
        match self {
            Scope::Global => "",
            Scope::Static => ".",
            Scope::Instance => "#",
            Scope::Inner => "~",
        }
    }
}

/// Access modifier of a doclet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    Private,
    Protected,
    Public,
    Package,
}

impl Access {
    pub fn as_str(&self) -> &'static str {
        match self {
            Access::Private => "private",
            Access::Protected => "protected",
            Access::Public => "public",
            Access::Package => "package",
        }
    }
}

/// A declared type: a union of type names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeExpr {
    #[serde(default)]
    pub names: Vec<String>,
}

/// One documented parameter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Param {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub type_: Option<TypeExpr>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub nullable: Option<bool>,
    /// Rest parameter.
    #[serde(default)]
    pub variable: bool,
}

/// One documented return value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReturnDoc {
    #[serde(default, rename = "type")]
    pub type_: Option<TypeExpr>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub nullable: Option<bool>,
}

/// A usage example split into caption and code.
///
/// Parsers emit examples as plain strings; the normalizer pass splits off a
/// leading `<caption>` block. Both shapes deserialize.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "ExampleRepr")]
pub struct Example {
    pub caption: String,
    pub code: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ExampleRepr {
    Text(String),
    Split { caption: String, code: String },
}

impl From<ExampleRepr> for Example {
    fn from(repr: ExampleRepr) -> Self {
        match repr {
            ExampleRepr::Text(code) => Example {
                caption: String::new(),
                code,
            },
            ExampleRepr::Split { caption, code } => Example { caption, code },
        }
    }
}

/// Source location of a doclet.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub lineno: Option<u64>,
    /// Display path after common-prefix stripping; computed per run.
    #[serde(default)]
    pub shortpath: Option<String>,
}

/// One documentation record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doclet {
    pub longname: String,
    pub name: String,
    pub kind: Kind,
    #[serde(default)]
    pub memberof: Option<String>,
    #[serde(default)]
    pub scope: Option<Scope>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub augments: Vec<String>,
    #[serde(default)]
    pub params: Vec<Param>,
    #[serde(default)]
    pub returns: Vec<ReturnDoc>,
    #[serde(default, rename = "type")]
    pub type_: Option<TypeExpr>,
    #[serde(default)]
    pub examples: Vec<Example>,
    #[serde(default)]
    pub see: Vec<String>,
    #[serde(default)]
    pub meta: Option<Meta>,
    #[serde(default)]
    pub access: Option<Access>,
    #[serde(default, rename = "virtual")]
    pub virtual_: bool,
    #[serde(default)]
    pub readonly: bool,
    #[serde(default, rename = "async")]
    pub async_: bool,
    #[serde(default)]
    pub generator: bool,
    #[serde(default)]
    pub nullable: Option<bool>,
    #[serde(default)]
    pub undocumented: bool,
    #[serde(default)]
    pub ignore: bool,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub since: Option<String>,

    // Display fields computed once per run.
    #[serde(default)]
    pub attribs: String,
    #[serde(default)]
    pub signature: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub ancestors: Vec<String>,
    /// Exported symbols attached to a module doclet.
    #[serde(default)]
    pub modules: Option<Vec<Doclet>>,
    /// Rendered readme HTML; main-page doclet only.
    #[serde(default)]
    pub readme: Option<String>,
    /// Escaped source text; source-listing doclet only.
    #[serde(default)]
    pub code: Option<String>,
}

impl Default for Doclet {
    fn default() -> Self {
        Doclet {
            longname: String::new(),
            name: String::new(),
            kind: Kind::Other,
            memberof: None,
            scope: None,
            description: None,
            augments: Vec::new(),
            params: Vec::new(),
            returns: Vec::new(),
            type_: None,
            examples: Vec::new(),
            see: Vec::new(),
            meta: None,
            access: None,
            virtual_: false,
            readonly: false,
            async_: false,
            generator: false,
            nullable: None,
            undocumented: false,
            ignore: false,
            version: None,
            since: None,
            attribs: String::new(),
            signature: None,
            id: None,
            ancestors: Vec::new(),
            modules: None,
            readme: None,
            code: None,
        }
    }
}

impl Doclet {
    /// Fabricate the home-page doclet.
    pub fn main_page(longname: &str, readme_html: Option<String>) -> Self {
        Doclet {
            longname: longname.to_string(),
            name: longname.to_string(),
            kind: Kind::MainPage,
            readme: readme_html,
            ..Doclet::default()
        }
    }

    /// Fabricate a pretty-printed source listing doclet.
    pub fn source_listing(shortpath: &str, code: String) -> Self {
        Doclet {
            longname: shortpath.to_string(),
            name: shortpath.to_string(),
            kind: Kind::Source,
            code: Some(code),
            ..Doclet::default()
        }
    }

    /// Look up a sortable field by name. Absent fields return `None` and
    /// compare equal to everything.
    pub fn field(&self, name: &str) -> Option<&str> {
        match name {
            "longname" => Some(&self.longname),
            "name" => Some(&self.name),
            "kind" => Some(self.kind.as_str()),
            "memberof" => self.memberof.as_deref(),
            "scope" => self.scope.map(|s| s.as_str()),
            "access" => self.access.map(|a| a.as_str()),
            "version" => self.version.as_deref(),
            "since" => self.since.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn deserializes_full_record() {
        let json = r#"{
            "longname": "module:color/mixer.blend",
            "name": "blend",
            "kind": "function",
            "memberof": "module:color/mixer",
            "scope": "static",
            "params": [
                {"name": "base", "type": {"names": ["Color"]}, "optional": true},
                {"name": "ratio", "type": {"names": ["number"]}, "nullable": false}
            ],
            "returns": [{"type": {"names": ["Color"]}}],
            "meta": {"path": "/src/color", "filename": "mixer.js", "lineno": 42}
        }"#;

        let doclet: Doclet = serde_json::from_str(json).unwrap();

        assert_eq!(doclet.kind, Kind::Function);
        assert_eq!(doclet.scope, Some(Scope::Static));
        assert_eq!(doclet.params.len(), 2);
        assert!(doclet.params[0].optional);
        assert_eq!(doclet.params[1].nullable, Some(false));
        assert_eq!(doclet.meta.unwrap().lineno, Some(42));
    }

    #[test]
    fn unknown_kind_degrades() {
        let json = r#"{"longname": "x", "name": "x", "kind": "wibble"}"#;
        let doclet: Doclet = serde_json::from_str(json).unwrap();
        assert_eq!(doclet.kind, Kind::Other);
    }

    #[test]
    fn example_accepts_both_shapes() {
        let bare: Example = serde_json::from_str(r#""foo();""#).unwrap();
        assert_eq!(bare.caption, "");
        assert_eq!(bare.code, "foo();");

        let split: Example =
            serde_json::from_str(r#"{"caption": "Basic", "code": "foo();"}"#).unwrap();
        assert_eq!(split.caption, "Basic");
        assert_eq!(split.code, "foo();");
    }

    #[test]
    fn keyword_fields_use_renames() {
        let json = r#"{
            "longname": "Shape#area",
            "name": "area",
            "kind": "function",
            "virtual": true,
            "async": true,
            "type": {"names": ["number"]}
        }"#;

        let doclet: Doclet = serde_json::from_str(json).unwrap();

        assert!(doclet.virtual_);
        assert!(doclet.async_);
        assert_eq!(doclet.type_.unwrap().names, vec!["number"]);
    }

    #[test]
    fn field_lookup_covers_sort_keys() {
        let doclet = Doclet {
            longname: "ns.Thing".into(),
            name: "Thing".into(),
            kind: Kind::Class,
            version: Some("1.2.0".into()),
            ..Doclet::default()
        };

        assert_eq!(doclet.field("longname"), Some("ns.Thing"));
        assert_eq!(doclet.field("kind"), Some("class"));
        assert_eq!(doclet.field("version"), Some("1.2.0"));
        assert_eq!(doclet.field("since"), None);
        assert_eq!(doclet.field("bogus"), None);
    }

    #[test]
    fn scope_punctuation() {
        assert_eq!(Scope::Static.punctuation(), ".");
        assert_eq!(Scope::Instance.punctuation(), "#");
        assert_eq!(Scope::Inner.punctuation(), "~");
        assert_eq!(Scope::Global.punctuation(), "");
    }
}
