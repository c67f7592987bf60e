use serde::Serialize;

use crate::error::{IdomError, IdomResult};

/// Unique identifier of a render session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SessionId(pub(crate) u64);

impl SessionId {
    pub fn get(&self) -> u64 {
        self.0
    }
}

/// Attribute-writing phase of an open element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FramePhase {
    /// Start tag written, attributes may still be appended
    Open,
    /// Start tag closed, children may be written
    InProgress,
}

/// Observable state of a session's frame stack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionState {
    Idle,
    Open,
    InProgress,
}

/// One open, not yet closed element
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub tag: String,
    pub key: Option<String>,
    pub is_void: bool,
    pub phase: FramePhase,
    pub attributes_written: bool,
}

impl Frame {
    pub fn new(tag: &str, key: Option<&str>, phase: FramePhase) -> Self {
        Self {
            tag: tag.to_string(),
            key: key.map(str::to_string),
            is_void: false,
            phase,
            attributes_written: false,
        }
    }
}

/// Handle to the innermost open element of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementRef<'a> {
    pub session: SessionId,
    /// 1-based depth of the element in its session
    pub depth: usize,
    pub tag: &'a str,
    pub key: Option<&'a str>,
}

/// Stack of open elements
///
/// Frames live in a `Vec` and the top of the stack is the last entry.
/// Closing checks the popped frame's tag against the requested one.
#[derive(Debug, Clone, Default)]
pub struct FrameStack {
    frames: Vec<Frame>,
}

impl FrameStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn top(&self) -> Option<&Frame> {
        self.frames.last()
    }

    pub fn top_mut(&mut self) -> Option<&mut Frame> {
        self.frames.last_mut()
    }

    pub fn state(&self) -> SessionState {
        match self.top().map(|f| f.phase) {
            None => SessionState::Idle,
            Some(FramePhase::Open) => SessionState::Open,
            Some(FramePhase::InProgress) => SessionState::InProgress,
        }
    }

    /// Push a frame, enforcing `max_depth`.
    pub fn push(&mut self, frame: Frame, max_depth: usize) -> IdomResult<&mut Frame> {
        if self.frames.len() >= max_depth {
            return Err(IdomError::MaxNestingDepthExceeded { max_depth });
        }
        self.frames.push(frame);
        let index = self.frames.len() - 1;
        Ok(&mut self.frames[index])
    }

    /// Pop the innermost frame if its tag matches `tag`.
    ///
    /// The stack is left unchanged on mismatch.
    pub fn pop_matching(&mut self, tag: &str) -> IdomResult<Frame> {
        match self.frames.pop() {
            Some(top) if top.tag == tag => Ok(top),
            Some(top) => {
                let expected = Some(top.tag.clone());
                self.frames.push(top);
                Err(IdomError::MismatchedTag {
                    expected,
                    found: tag.to_string(),
                })
            }
            None => Err(IdomError::MismatchedTag {
                expected: None,
                found: tag.to_string(),
            }),
        }
    }

    /// Fail if the innermost frame is still accepting attributes.
    pub fn ensure_not_open(&self) -> IdomResult<()> {
        match self.top() {
            Some(frame) if frame.phase == FramePhase::Open => Err(IdomError::UnterminatedOpenTag {
                tag: frame.tag.clone(),
            }),
            _ => Ok(()),
        }
    }

    /// Fail unless every frame has been closed.
    pub fn ensure_balanced(&self) -> IdomResult<()> {
        match self.top() {
            Some(frame) => Err(IdomError::UnclosedElement {
                tag: frame.tag.clone(),
                depth: self.depth(),
            }),
            None => Ok(()),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Frame> {
        self.frames.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop_matching() {
        let mut stack = FrameStack::new();
        assert_eq!(stack.state(), SessionState::Idle);

        stack.push(Frame::new("ul", None, FramePhase::InProgress), 8).unwrap();
        stack.push(Frame::new("li", Some("a"), FramePhase::Open), 8).unwrap();
        assert_eq!(stack.state(), SessionState::Open);
        assert_eq!(stack.depth(), 2);

        let li = stack.pop_matching("li").unwrap();
        assert_eq!(li.key.as_deref(), Some("a"));
        assert_eq!(stack.state(), SessionState::InProgress);
    }

    #[test]
    fn test_pop_mismatch_leaves_stack_intact() {
        let mut stack = FrameStack::new();
        stack.push(Frame::new("div", None, FramePhase::InProgress), 8).unwrap();

        let err = stack.pop_matching("span").unwrap_err();
        assert_eq!(
            err,
            IdomError::MismatchedTag {
                expected: Some("div".to_string()),
                found: "span".to_string(),
            }
        );
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_pop_on_empty_stack() {
        let mut stack = FrameStack::new();
        assert!(matches!(
            stack.pop_matching("div"),
            Err(IdomError::MismatchedTag { expected: None, .. })
        ));
    }

    #[test]
    fn test_max_depth() {
        let mut stack = FrameStack::new();
        stack.push(Frame::new("a", None, FramePhase::InProgress), 1).unwrap();
        assert!(matches!(
            stack.push(Frame::new("b", None, FramePhase::InProgress), 1),
            Err(IdomError::MaxNestingDepthExceeded { max_depth: 1 })
        ));
    }

    #[test]
    fn test_ensure_balanced() {
        let mut stack = FrameStack::new();
        assert!(stack.ensure_balanced().is_ok());
        stack.push(Frame::new("p", None, FramePhase::InProgress), 8).unwrap();
        assert!(matches!(
            stack.ensure_balanced(),
            Err(IdomError::UnclosedElement { depth: 1, .. })
        ));
    }
}
