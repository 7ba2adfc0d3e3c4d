//! Static site renderer for inlay API documentation.
//!
//! Turns a pre-parsed symbol database into a static HTML site: navigation
//! menu, cross-reference links, formatted signatures, one page per
//! documented entity, and pretty-printed source listings.

pub mod assets;
pub mod builder;
pub mod links;
pub mod nav;
pub mod normalize;
pub mod signature;
pub mod templates;

pub use builder::{BuildError, BuildStats, RenderConfig, SiteBuilder};
pub use links::LinkRegistry;
pub use nav::{MenuOptions, MenuOverrides};
