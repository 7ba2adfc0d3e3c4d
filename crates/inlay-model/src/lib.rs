//! Doclet data model and symbol database.
//!
//! This crate holds the record types a parser front-end emits for each
//! documented entity, plus the queryable in-memory database the renderer
//! walks, and the tutorial tree for narrative documentation pages.

pub mod database;
pub mod doclet;
pub mod tutorial;

pub use database::{Database, Members, ModelError};
pub use doclet::{Access, Doclet, Example, Kind, Meta, Param, ReturnDoc, Scope, TypeExpr};
pub use tutorial::{TutorialError, TutorialNode};
