//! Message formatting
//!
//! Turns a level and raw message into display text: an icon prefix, a body
//! paginated to a maximum line width, upper-casing for error and critical,
//! and divider lines around debug output.

use std::borrow::Cow;

use crate::level::Level;

/// Default maximum line width for pagination
pub const DEFAULT_MAX_LINE_WIDTH: usize = 80;

/// Divider wrapped around debug message bodies
pub const DEBUG_DIVIDER: &str = "--------------------";

/// A formatted record ready for delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedMessage {
    /// Icon for the level, or `None` when icons are suppressed
    pub icon: Option<&'static str>,
    /// Paginated, level-transformed body
    pub body: String,
}

impl FormattedMessage {
    /// Full display text: icon, a space, then the body
    pub fn text(&self) -> String {
        match self.icon {
            Some(icon) => format!("{} {}", icon, self.body),
            None => self.body.clone(),
        }
    }
}

/// Formatter configuration shared by every record of a logger
#[derive(Debug, Clone, Copy)]
pub struct Formatter {
    max_line_width: usize,
    debug_output: bool,
}

impl Formatter {
    /// Create a formatter
    ///
    /// `debug_output` controls whether `Level::Debug` records are produced at all.
    pub fn new(max_line_width: usize, debug_output: bool) -> Self {
        Self {
            max_line_width: max_line_width.max(1),
            debug_output,
        }
    }

    /// Whether records at `level` produce output under this configuration
    pub fn emits(&self, level: Level) -> bool {
        level != Level::Debug || self.debug_output
    }

    /// Format a message, or `None` when the level is suppressed
    pub fn format(&self, level: Level, raw: &str, display_icon: bool) -> Option<FormattedMessage> {
        if !self.emits(level) {
            return None;
        }

        let icon = display_icon.then(|| level.icon());
        let shaped = if level.shouts() {
            Cow::Owned(raw.to_uppercase())
        } else {
            Cow::Borrowed(raw)
        };

        let body = if level == Level::Debug {
            let paginated = paginate(&shaped, self.max_line_width);
            format!("{}\n{}\n{}", DEBUG_DIVIDER, paginated, DEBUG_DIVIDER)
        } else {
            // The icon and its space share the first line with the body
            let prefix = icon.map_or(0, |icon| icon.chars().count() + 1);
            let first_width = self.max_line_width.saturating_sub(prefix);
            paginate_indented(&shaped, first_width, self.max_line_width)
        };

        Some(FormattedMessage { icon, body })
    }
}

/// Greedily pack whitespace-separated tokens into lines of at most `width` chars
///
/// A token longer than `width` is kept whole on its own line. Lines are joined
/// with `\n` and no trailing newline is added.
pub fn paginate(text: &str, width: usize) -> String {
    paginate_indented(text, width, width)
}

/// Like [`paginate`], but the first line only has room for `first_width` chars
///
/// The first token always starts the first line, however long it is.
pub fn paginate_indented(text: &str, first_width: usize, width: usize) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for token in text.split_whitespace() {
        let token_len = token.chars().count();
        let budget = if lines.is_empty() { first_width } else { width };
        if current.is_empty() {
            current.push_str(token);
            current_len = token_len;
        } else if current_len + 1 + token_len <= budget {
            current.push(' ');
            current.push_str(token);
            current_len += 1 + token_len;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(token);
            current_len = token_len;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines.join("\n")
}
