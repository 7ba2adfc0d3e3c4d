//! Queryable in-memory collection of doclets.
//!
//! The database is the single source of truth for a run: every pipeline
//! stage reads it, and the mutating passes update records in place through
//! `iter_mut`. Records are never removed after the initial prune.

use crate::doclet::{Doclet, Kind, Scope};

/// Errors raised while loading a doclet collection.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("invalid doclet database: {0}")]
    InvalidDatabase(String),
}

/// Partition of the database into navigation categories.
#[derive(Debug, Clone, Default)]
pub struct Members {
    pub classes: Vec<Doclet>,
    pub externals: Vec<Doclet>,
    pub events: Vec<Doclet>,
    pub globals: Vec<Doclet>,
    pub mixins: Vec<Doclet>,
    pub modules: Vec<Doclet>,
    pub namespaces: Vec<Doclet>,
    pub interfaces: Vec<Doclet>,
}

/// The symbol database.
#[derive(Debug, Clone, Default)]
pub struct Database {
    doclets: Vec<Doclet>,
}

impl Database {
    pub fn new(doclets: Vec<Doclet>) -> Self {
        Self { doclets }
    }

    /// Load a database from the JSON array a parser front-end emits.
    pub fn from_json(text: &str) -> Result<Self, ModelError> {
        let doclets: Vec<Doclet> = serde_json::from_str(text)
            .map_err(|e| ModelError::InvalidDatabase(e.to_string()))?;
        Ok(Self::new(doclets))
    }

    pub fn len(&self) -> usize {
        self.doclets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doclets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Doclet> {
        self.doclets.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Doclet> {
        self.doclets.iter_mut()
    }

    /// Drop records flagged as undocumented or ignored.
    pub fn prune(&mut self) {
        self.doclets.retain(|d| !d.undocumented && !d.ignore);
    }

    /// Stable multi-key sort. A field absent on either side of a comparison
    /// counts as equal rank for that key, so relative input order survives.
    pub fn sort_by_fields(&mut self, fields: &[String]) {
        self.doclets.sort_by(|a, b| {
            for field in fields {
                if let (Some(x), Some(y)) = (a.field(field), b.field(field)) {
                    match x.cmp(y) {
                        std::cmp::Ordering::Equal => continue,
                        ord => return ord,
                    }
                }
            }
            std::cmp::Ordering::Equal
        });
    }

    /// Predicate query over all records.
    pub fn find<P>(&self, predicate: P) -> Vec<&Doclet>
    where
        P: Fn(&Doclet) -> bool,
    {
        self.doclets.iter().filter(|d| predicate(d)).collect()
    }

    /// Direct members of a longname.
    pub fn members_of(&self, longname: &str) -> Vec<&Doclet> {
        self.find(|d| d.memberof.as_deref() == Some(longname))
    }

    /// Partition the database into navigation categories.
    pub fn members(&self) -> Members {
        let by_kind = |kind: Kind| -> Vec<Doclet> {
            self.doclets
                .iter()
                .filter(|d| d.kind == kind)
                .cloned()
                .collect()
        };

        let globals = self
            .doclets
            .iter()
            .filter(|d| {
                d.scope == Some(Scope::Global)
                    && d.memberof.is_none()
                    && matches!(
                        d.kind,
                        Kind::Member | Kind::Function | Kind::Constant | Kind::Typedef
                    )
            })
            .cloned()
            .collect();

        Members {
            classes: by_kind(Kind::Class),
            externals: by_kind(Kind::External),
            events: by_kind(Kind::Event),
            globals,
            mixins: by_kind(Kind::Mixin),
            modules: by_kind(Kind::Module),
            namespaces: by_kind(Kind::Namespace),
            interfaces: by_kind(Kind::Interface),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn doclet(longname: &str, kind: Kind) -> Doclet {
        Doclet {
            longname: longname.into(),
            name: longname.rsplit(['.', '#', '~']).next().unwrap().into(),
            kind,
            ..Doclet::default()
        }
    }

    #[test]
    fn prune_drops_flagged_records() {
        let mut visible = doclet("a", Kind::Function);
        visible.version = Some("1".into());
        let mut hidden = doclet("b", Kind::Function);
        hidden.undocumented = true;
        let mut ignored = doclet("c", Kind::Function);
        ignored.ignore = true;

        let mut db = Database::new(vec![visible, hidden, ignored]);
        db.prune();

        assert_eq!(db.len(), 1);
        assert_eq!(db.iter().next().unwrap().longname, "a");
    }

    #[test]
    fn sort_is_stable_for_missing_fields() {
        let mut first = doclet("z", Kind::Function);
        first.version = Some("2".into());
        let second = doclet("m", Kind::Function);
        let mut third = doclet("a", Kind::Function);
        third.version = Some("1".into());

        let mut db = Database::new(vec![first, second, third]);
        // "version" is absent on the middle record; it must keep its
        // relative position against both neighbours.
        db.sort_by_fields(&["version".to_string()]);

        let order: Vec<&str> = db.iter().map(|d| d.longname.as_str()).collect();
        assert_eq!(order, vec!["z", "m", "a"]);
    }

    #[test]
    fn sort_applies_keys_in_order() {
        let mut a = doclet("beta", Kind::Function);
        a.since = Some("2".into());
        let mut b = doclet("alpha", Kind::Function);
        b.since = Some("1".into());
        let mut c = doclet("alpha", Kind::Member);
        c.since = Some("2".into());

        let mut db = Database::new(vec![a, b, c]);
        db.sort_by_fields(&["longname".to_string(), "since".to_string()]);

        let order: Vec<(String, Option<String>)> = db
            .iter()
            .map(|d| (d.longname.clone(), d.since.clone()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("alpha".to_string(), Some("1".to_string())),
                ("alpha".to_string(), Some("2".to_string())),
                ("beta".to_string(), Some("2".to_string())),
            ]
        );
    }

    #[test]
    fn members_partition() {
        let mut global_fn = doclet("clamp", Kind::Function);
        global_fn.scope = Some(Scope::Global);
        let mut owned_fn = doclet("ns.helper", Kind::Function);
        owned_fn.scope = Some(Scope::Global);
        owned_fn.memberof = Some("ns".into());
        let mut event = doclet("module:m.event:tick", Kind::Event);
        event.memberof = Some("module:m".into());

        let db = Database::new(vec![
            doclet("Shape", Kind::Class),
            doclet("module:m", Kind::Module),
            doclet("ns", Kind::Namespace),
            global_fn,
            owned_fn,
            event,
        ]);

        let members = db.members();
        assert_eq!(members.classes.len(), 1);
        assert_eq!(members.modules.len(), 1);
        assert_eq!(members.namespaces.len(), 1);
        assert_eq!(members.events.len(), 1);
        // memberof disqualifies a doclet from the globals bucket even when
        // its scope says global.
        assert_eq!(members.globals.len(), 1);
        assert_eq!(members.globals[0].longname, "clamp");
    }

    #[test]
    fn find_and_members_of() {
        let mut method = doclet("Shape#area", Kind::Function);
        method.memberof = Some("Shape".into());

        let db = Database::new(vec![doclet("Shape", Kind::Class), method]);

        assert_eq!(db.find(|d| d.kind == Kind::Class).len(), 1);
        let members = db.members_of("Shape");
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].longname, "Shape#area");
    }

    #[test]
    fn from_json_rejects_garbage() {
        assert!(Database::from_json("{not json").is_err());
        assert!(Database::from_json(r#"[{"longname": "a"}]"#).is_err());
        assert!(Database::from_json(r#"[]"#).unwrap().is_empty());
    }
}
