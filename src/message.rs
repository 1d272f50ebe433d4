//! Lazily rendered log messages

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

type Render = Arc<dyn Fn() -> String + Send + Sync>;

/// A log message that is only rendered when a record passes filtering
///
/// Built from a literal (`"text".into()`), an owned `String`, or a deferred
/// closure via [`Message::lazy`] / [`message!`](crate::message!). Rendering
/// has no side effects and returns the same text every time it is called.
#[derive(Clone)]
pub struct Message {
    inner: Inner,
}

#[derive(Clone)]
enum Inner {
    Literal(Cow<'static, str>),
    Deferred(Render),
}

impl Message {
    /// Create a message whose text is produced on demand
    pub fn lazy<F>(render: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        Self {
            inner: Inner::Deferred(Arc::new(render)),
        }
    }

    /// Render the message text
    pub fn render(&self) -> Cow<'_, str> {
        match &self.inner {
            Inner::Literal(text) => Cow::Borrowed(text.as_ref()),
            Inner::Deferred(render) => Cow::Owned(render()),
        }
    }
}

impl From<&'static str> for Message {
    fn from(text: &'static str) -> Self {
        Self {
            inner: Inner::Literal(Cow::Borrowed(text)),
        }
    }
}

impl From<String> for Message {
    fn from(text: String) -> Self {
        Self {
            inner: Inner::Literal(Cow::Owned(text)),
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            Inner::Literal(text) => f.debug_tuple("Message").field(text).finish(),
            Inner::Deferred(_) => f.write_str("Message(<deferred>)"),
        }
    }
}

/// Build a [`Message`] from format arguments without formatting up front
///
/// Arguments are moved into the render closure, so they must be
/// `Send + Sync + 'static`.
///
/// ```
/// let user = String::from("ada");
/// let msg = rotalog::message!("signed in as {}", user);
/// assert_eq!(msg.to_string(), "signed in as ada");
/// ```
#[macro_export]
macro_rules! message {
    ($($arg:tt)+) => {
        $crate::Message::lazy(move || ::std::format!($($arg)+))
    };
}
