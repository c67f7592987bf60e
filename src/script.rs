//! Render scripts: a YAML list of streaming calls replayed against a session.
//!
//! ```yaml
//! config:
//!   maxDepth: 32
//! ops:
//!   - op: open
//!     tag: ul
//!     statics: [[class, list]]
//!   - op: void
//!     tag: input
//!     dynamics: [[disabled, false]]
//!   - op: text
//!     value: "  hello  "
//!     formatters: [trim, upper]
//!   - op: patch
//!     target: sidebar
//!     ops:
//!       - op: text
//!         value: rendered elsewhere
//!   - op: close
//!     tag: ul
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::attributes::Attrs;
use crate::config::RenderConfig;
use crate::controller::{patch_with, render_to_string_with};
use crate::error::IdomResult;
use crate::session::Session;
use crate::sink::MarkupTarget;
use crate::text::{builtin, Formatter};
use crate::value::Value;

/// One streaming call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Instruction {
    Open {
        tag: String,
        #[serde(default)]
        key: Option<String>,
        #[serde(default)]
        statics: Option<Attrs>,
        #[serde(default)]
        dynamics: Attrs,
    },
    OpenStart {
        tag: String,
        #[serde(default)]
        key: Option<String>,
        #[serde(default)]
        statics: Option<Attrs>,
    },
    Attr {
        name: String,
        #[serde(default)]
        value: Value,
    },
    OpenEnd,
    Close {
        tag: String,
    },
    Void {
        tag: String,
        #[serde(default)]
        key: Option<String>,
        #[serde(default)]
        statics: Option<Attrs>,
        #[serde(default)]
        dynamics: Attrs,
    },
    Text {
        #[serde(default)]
        value: Value,
        #[serde(default)]
        formatters: Vec<String>,
    },
    /// Render `ops` in a nested session into the named side target
    Patch {
        target: String,
        ops: Vec<Instruction>,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderScript {
    #[serde(default)]
    pub config: RenderConfig,
    pub ops: Vec<Instruction>,
}

/// Markup of the top-level session plus every patched side target
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScriptOutput {
    pub markup: String,
    pub targets: BTreeMap<String, MarkupTarget>,
}

impl RenderScript {
    pub fn from_yaml(yaml: &str) -> IdomResult<Self> {
        let script: RenderScript = serde_yaml::from_str(yaml)?;
        script.config.validate()?;
        Ok(script)
    }

    pub fn render(&self) -> IdomResult<ScriptOutput> {
        let mut targets = BTreeMap::new();
        let markup = render_to_string_with(&self.config, |session| {
            replay(session, &self.ops, &mut targets, &self.config)
        })?;
        Ok(ScriptOutput { markup, targets })
    }
}

fn resolve_formatters(names: &[String]) -> IdomResult<Vec<&'static Formatter>> {
    names.iter().map(|name| builtin(name)).collect()
}

/// Apply `ops` to `session` in order, stopping at the first error.
pub fn replay(
    session: &mut Session,
    ops: &[Instruction],
    targets: &mut BTreeMap<String, MarkupTarget>,
    config: &RenderConfig,
) -> IdomResult<()> {
    for op in ops {
        match op {
            Instruction::Open {
                tag,
                key,
                statics,
                dynamics,
            } => session.element_open(tag, key.as_deref(), statics.as_ref(), dynamics)?,
            Instruction::OpenStart { tag, key, statics } => {
                session.element_open_start(tag, key.as_deref(), statics.as_ref())?
            }
            Instruction::Attr { name, value } => session.attr(name, value.clone())?,
            Instruction::OpenEnd => session.element_open_end()?,
            Instruction::Close { tag } => session.element_close(tag)?,
            Instruction::Void {
                tag,
                key,
                statics,
                dynamics,
            } => session.element_void(tag, key.as_deref(), statics.as_ref(), dynamics)?,
            Instruction::Text { value, formatters } => {
                let formatters = resolve_formatters(formatters)?;
                session.text(value.clone(), &formatters)?
            }
            Instruction::Patch { target, ops } => {
                // taken out of the map so the nested replay can patch other targets
                let mut sink = targets.remove(target).unwrap_or_default();
                let result = patch_with(config, &mut sink, |inner| {
                    replay(inner, ops, targets, config)
                });
                targets.insert(target.clone(), sink);
                result?
            }
        }
    }
    Ok(())
}
