//! # NullTrace Incremental DOM String Renderer
//!
//! Turns a stream of "open element / set attribute / write text / close
//! element" calls into escaped markup, without building a tree.
//!
//! ## Features
//! - Stack-based frame tracking with open/close mismatch detection
//! - Static attributes (always written) and dynamic attributes (written only when truthy)
//! - Text and attribute escaping for XSS-safe output
//! - Composable text formatter pipelines
//! - Nested, reentrant render sessions: a `patch` inside another render never leaks into it
//! - YAML render scripts for fixtures and the `idom-render` CLI
//!
//! ## Example — render to a string
//! ```
//! use nulltrace_idom::{render_to_string, Attrs, Value};
//!
//! let html = render_to_string(|s| {
//!     let statics = Attrs::from_flat(&["id", "greeting"]);
//!     s.element_open("p", None, Some(&statics), &Attrs::new())?;
//!     s.text("Hello wor", &[&|v: Value| v + "l", &|v: Value| v + "d"])?;
//!     s.element_close("p")
//! })
//! .unwrap();
//!
//! assert_eq!(html, r#"<p id="greeting">Hello world</p>"#);
//! ```
//!
//! ## Example — patch a target
//! ```
//! use nulltrace_idom::{patch, Attrs, MarkupTarget};
//!
//! let mut target = MarkupTarget::with_markup("<b>stale</b>");
//! patch(&mut target, |s| {
//!     s.element_open_start("div", None, None)?;
//!     s.attr("data-expanded", false)?;
//!     s.element_open_end()?;
//!     s.element_close("div")
//! })
//! .unwrap();
//!
//! assert_eq!(target.inner_html(), "<div></div>");
//! ```

pub mod attributes;
pub mod config;
pub mod controller;
pub mod error;
pub mod escape;
pub mod frame;
pub mod script;
pub mod session;
pub mod sink;
pub mod text;
pub mod value;

// --- Core types ---
pub use attributes::Attrs;
pub use config::RenderConfig;
pub use error::{IdomError, IdomResult};
pub use frame::{ElementRef, Frame, FramePhase, SessionId, SessionState};
pub use session::Session;
pub use sink::{MarkupTarget, Sink};
pub use text::Formatter;
pub use value::Value;

// --- Session controller ---
pub use controller::{
    active_session, nesting_depth, patch, patch_with, render_to_string, render_to_string_with,
};

// --- Escaping ---
pub use escape::{escape_attribute_value, escape_text};

// --- Scripts ---
pub use script::{Instruction, RenderScript, ScriptOutput};

/// Parse a YAML render script and render it
pub fn render_script(yaml: &str) -> IdomResult<ScriptOutput> {
    RenderScript::from_yaml(yaml)?.render()
}
