/// Destination of a completed session's markup
///
/// A sink receives the full buffer exactly once, after the session
/// finished without error. It must replace whatever it held before.
pub trait Sink {
    fn accept(&mut self, markup: String);
}

/// Plain string accumulator: the string is overwritten with the markup
impl Sink for String {
    fn accept(&mut self, markup: String) {
        *self = markup;
    }
}

/// An object with a single writable markup field, the way a DOM node
/// exposes `innerHTML`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkupTarget {
    pub inner_html: String,
}

impl MarkupTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_markup(markup: impl Into<String>) -> Self {
        Self {
            inner_html: markup.into(),
        }
    }

    pub fn inner_html(&self) -> &str {
        &self.inner_html
    }
}

impl Sink for MarkupTarget {
    fn accept(&mut self, markup: String) {
        self.inner_html = markup;
    }
}

impl<S: Sink + ?Sized> Sink for &mut S {
    fn accept(&mut self, markup: String) {
        (**self).accept(markup);
    }
}
