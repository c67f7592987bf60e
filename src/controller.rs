//! Session controller: `render_to_string` and `patch`.
//!
//! Every call creates a fresh [`Session`], marks it active for the current
//! thread, runs the callback, and delivers the markup to a [`Sink`].
//! Calls nest freely: an inner call gets its own session, and the active
//! pointer is restored by a guard on every exit path, unwinding included.

use std::cell::RefCell;

use crate::config::RenderConfig;
use crate::error::IdomResult;
use crate::frame::SessionId;
use crate::session::Session;
use crate::sink::Sink;

thread_local! {
    static ACTIVE_SESSIONS: RefCell<Vec<SessionId>> = const { RefCell::new(Vec::new()) };
}

/// Innermost session currently rendering on this thread
pub fn active_session() -> Option<SessionId> {
    ACTIVE_SESSIONS.with(|active| active.borrow().last().copied())
}

/// Number of sessions currently rendering on this thread
pub fn nesting_depth() -> usize {
    ACTIVE_SESSIONS.with(|active| active.borrow().len())
}

/// Keeps a session on the active stack for as long as it is alive
struct ActivationGuard {
    id: SessionId,
}

impl ActivationGuard {
    fn activate(id: SessionId) -> Self {
        ACTIVE_SESSIONS.with(|active| active.borrow_mut().push(id));
        Self { id }
    }
}

impl Drop for ActivationGuard {
    fn drop(&mut self) {
        // thread-local may already be gone during thread teardown
        let _ = ACTIVE_SESSIONS.try_with(|active| {
            let popped = active.borrow_mut().pop();
            debug_assert_eq!(popped, Some(self.id), "active session stack out of order");
        });
    }
}

fn run_session<F>(config: &RenderConfig, callback: F) -> IdomResult<String>
where
    F: FnOnce(&mut Session) -> IdomResult<()>,
{
    let parent = active_session();
    let mut session = Session::new(config);
    let id = session.id();
    let _guard = ActivationGuard::activate(id);

    tracing::debug!(
        session = id.get(),
        parent = ?parent.map(|p| p.get()),
        "render session started"
    );

    let result = callback(&mut session).and_then(|()| session.finish());

    match &result {
        Ok(markup) => {
            tracing::debug!(session = id.get(), bytes = markup.len(), "render session finished")
        }
        Err(err) => {
            tracing::warn!(session = id.get(), error = %err, "render session failed, output discarded")
        }
    }
    result
}

/// Run `callback` in a new session and replace `target`'s markup with the result.
///
/// On error the target is left untouched.
pub fn patch_with<S, F>(config: &RenderConfig, target: &mut S, callback: F) -> IdomResult<()>
where
    S: Sink + ?Sized,
    F: FnOnce(&mut Session) -> IdomResult<()>,
{
    let markup = run_session(config, callback)?;
    target.accept(markup);
    Ok(())
}

/// [`patch_with`] using the default configuration
pub fn patch<S, F>(target: &mut S, callback: F) -> IdomResult<()>
where
    S: Sink + ?Sized,
    F: FnOnce(&mut Session) -> IdomResult<()>,
{
    patch_with(&RenderConfig::default(), target, callback)
}

/// Run `callback` in a new session and return the markup it produced.
pub fn render_to_string_with<F>(config: &RenderConfig, callback: F) -> IdomResult<String>
where
    F: FnOnce(&mut Session) -> IdomResult<()>,
{
    let mut out = String::new();
    patch_with(config, &mut out, callback)?;
    Ok(out)
}

/// [`render_to_string_with`] using the default configuration
pub fn render_to_string<F>(callback: F) -> IdomResult<String>
where
    F: FnOnce(&mut Session) -> IdomResult<()>,
{
    render_to_string_with(&RenderConfig::default(), callback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::Attrs;
    use crate::error::IdomError;
    use crate::sink::MarkupTarget;

    #[test]
    fn test_active_session_tracking() {
        assert_eq!(active_session(), None);

        let html = render_to_string(|outer| {
            assert_eq!(active_session(), Some(outer.id()));
            assert_eq!(nesting_depth(), 1);

            let mut side = MarkupTarget::new();
            patch(&mut side, |inner| {
                assert_eq!(active_session(), Some(inner.id()));
                assert_eq!(nesting_depth(), 2);
                Ok(())
            })?;

            assert_eq!(active_session(), Some(outer.id()));
            Ok(())
        })
        .unwrap();

        assert_eq!(html, "");
        assert_eq!(active_session(), None);
    }

    #[test]
    fn test_active_session_restored_after_inner_error() {
        render_to_string(|outer| {
            let mut side = MarkupTarget::new();
            let err = patch(&mut side, |inner| inner.element_close("div")).unwrap_err();
            assert!(matches!(err, IdomError::MismatchedTag { .. }));
            assert_eq!(active_session(), Some(outer.id()));
            Ok(())
        })
        .unwrap();
        assert_eq!(nesting_depth(), 0);
    }

    #[test]
    fn test_active_session_restored_after_panic() {
        let result = std::panic::catch_unwind(|| {
            render_to_string(|_| -> IdomResult<()> { panic!("callback blew up") })
        });
        assert!(result.is_err());
        assert_eq!(nesting_depth(), 0);
    }

    #[test]
    fn test_failed_patch_keeps_previous_markup() {
        let mut target = MarkupTarget::with_markup("<p>old</p>");
        let err = patch(&mut target, |s| {
            s.element_open("p", None, None, &Attrs::new())?;
            s.text("new", &[])
        })
        .unwrap_err();

        assert!(matches!(err, IdomError::UnclosedElement { .. }));
        assert_eq!(target.inner_html(), "<p>old</p>");
    }

    #[test]
    fn test_config_depth_limit_applies() {
        let config = RenderConfig::default().with_max_depth(2);
        let err = render_to_string_with(&config, |s| {
            s.element_open("a", None, None, &Attrs::new())?;
            s.element_open("b", None, None, &Attrs::new())?;
            s.element_open("c", None, None, &Attrs::new())
        })
        .unwrap_err();
        assert_eq!(err, IdomError::MaxNestingDepthExceeded { max_depth: 2 });
    }
}
