use std::sync::atomic::{AtomicU64, Ordering};

use crate::attributes::{validate_tag_name, write_attribute, write_dynamic, write_static, Attrs};
use crate::config::RenderConfig;
use crate::error::{IdomError, IdomResult};
use crate::escape::escape_text;
use crate::frame::{ElementRef, Frame, FramePhase, FrameStack, SessionId, SessionState};
use crate::text::{apply_formatters, Formatter};
use crate::value::Value;

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

/// One isolated rendering pass
///
/// A session owns its output buffer and its stack of open elements.
/// Sessions are created by [`crate::render_to_string`] and [`crate::patch`]
/// and handed to the render callback as `&mut Session`; nothing written to
/// one session can reach another.
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    buffer: String,
    frames: FrameStack,
    config: RenderConfig,
}

impl Session {
    pub(crate) fn new(config: &RenderConfig) -> Self {
        Self {
            id: SessionId(NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed)),
            buffer: String::with_capacity(config.initial_capacity),
            frames: FrameStack::new(),
            config: config.clone(),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.frames.state()
    }

    /// Number of currently open elements
    pub fn depth(&self) -> usize {
        self.frames.depth()
    }

    /// Markup written so far
    pub fn markup(&self) -> &str {
        &self.buffer
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Render the start tag into a scratch buffer, then push the frame and
    /// append it. On error neither `buffer` nor `frames` is touched.
    ///
    /// With `dynamics` present the start tag is closed with `>`.
    fn start_tag(
        &mut self,
        tag: &str,
        key: Option<&str>,
        statics: Option<&Attrs>,
        dynamics: Option<&Attrs>,
    ) -> IdomResult<()> {
        self.frames.ensure_not_open()?;
        validate_tag_name(tag)?;

        let mut start = String::with_capacity(tag.len() + 1);
        start.push('<');
        start.push_str(tag);
        let mut written = write_static(&mut start, statics)?;

        let phase = match dynamics {
            Some(dynamics) => {
                written |= write_dynamic(&mut start, dynamics)?;
                start.push('>');
                FramePhase::InProgress
            }
            None => FramePhase::Open,
        };

        let max_depth = self.config.max_depth;
        let frame = self.frames.push(Frame::new(tag, key, phase), max_depth)?;
        frame.attributes_written = written;
        self.buffer.push_str(&start);
        Ok(())
    }

    /// Open `tag`, write its attributes and close the start tag.
    ///
    /// `statics` are always written; `dynamics` only when truthy.
    pub fn element_open(
        &mut self,
        tag: &str,
        key: Option<&str>,
        statics: Option<&Attrs>,
        dynamics: &Attrs,
    ) -> IdomResult<()> {
        self.start_tag(tag, key, statics, Some(dynamics))
    }

    /// Open `tag` but leave the start tag accepting [`Session::attr`] calls
    /// until [`Session::element_open_end`].
    pub fn element_open_start(
        &mut self,
        tag: &str,
        key: Option<&str>,
        statics: Option<&Attrs>,
    ) -> IdomResult<()> {
        self.start_tag(tag, key, statics, None)
    }

    /// Append a conditional attribute to the pending start tag.
    pub fn attr(&mut self, name: &str, value: impl Into<Value>) -> IdomResult<()> {
        let frame = match self.frames.top_mut() {
            Some(frame) if frame.phase == FramePhase::Open => frame,
            _ => {
                return Err(IdomError::InvalidAttributeContext {
                    operation: "attr".to_string(),
                })
            }
        };

        let value = value.into();
        if value.is_truthy() {
            frame.attributes_written |= write_attribute(&mut self.buffer, name, &value)?;
        }
        Ok(())
    }

    /// Close the pending start tag.
    pub fn element_open_end(&mut self) -> IdomResult<()> {
        match self.frames.top_mut() {
            Some(frame) if frame.phase == FramePhase::Open => {
                frame.phase = FramePhase::InProgress;
                self.buffer.push('>');
                Ok(())
            }
            _ => Err(IdomError::InvalidAttributeContext {
                operation: "element_open_end".to_string(),
            }),
        }
    }

    /// Close the innermost open element, which must be `tag`.
    pub fn element_close(&mut self, tag: &str) -> IdomResult<()> {
        self.frames.ensure_not_open()?;
        let frame = self.frames.pop_matching(tag)?;
        if frame.is_void {
            tracing::trace!(tag = %frame.tag, "closing void element");
        }

        self.buffer.push_str("</");
        self.buffer.push_str(&frame.tag);
        self.buffer.push('>');
        Ok(())
    }

    /// Open and immediately close an element with no children.
    ///
    /// Renders `<tag attrs></tag>`; there is no self-closing form.
    pub fn element_void(
        &mut self,
        tag: &str,
        key: Option<&str>,
        statics: Option<&Attrs>,
        dynamics: &Attrs,
    ) -> IdomResult<()> {
        self.element_open(tag, key, statics, dynamics)?;
        if let Some(frame) = self.frames.top_mut() {
            frame.is_void = true;
        }
        self.element_close(tag)
    }

    /// Write a text node, running `value` through `formatters` first.
    pub fn text(&mut self, value: impl Into<Value>, formatters: &[&Formatter]) -> IdomResult<()> {
        self.frames.ensure_not_open()?;
        let value = apply_formatters(value.into(), formatters);
        let rendered = value.to_string();
        self.buffer.push_str(&escape_text(&rendered));
        Ok(())
    }

    /// Handle to the element currently being rendered into
    pub fn current_element(&self) -> Option<ElementRef<'_>> {
        self.frames.top().map(|frame| ElementRef {
            session: self.id,
            depth: self.frames.depth(),
            tag: &frame.tag,
            key: frame.key.as_deref(),
        })
    }

    /// Consume the session, returning its markup if every element was closed.
    pub(crate) fn finish(self) -> IdomResult<String> {
        self.frames.ensure_balanced()?;
        Ok(self.buffer)
    }
}
