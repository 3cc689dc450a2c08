//! Plain code writer: indentation bookkeeping and JSDoc comment emission.

/// Column limit for generated source.
const MAX_WIDTH: usize = 80;

/// Appends lines of generated code to an owned buffer, two spaces per
/// indentation level.
#[derive(Debug, Default)]
pub struct CodeWriter {
    buf: String,
    indent: usize,
}

impl CodeWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write one line at the current indentation. An empty string writes a
    /// blank line with no trailing spaces.
    pub fn line(&mut self, s: &str) {
        if s.is_empty() {
            self.buf.push('\n');
            return;
        }
        for _ in 0..self.indent {
            self.buf.push_str("  ");
        }
        self.buf.push_str(s);
        self.buf.push('\n');
    }

    pub fn blank(&mut self) {
        self.buf.push('\n');
    }

    /// Append preformatted text verbatim.
    pub fn raw(&mut self, s: &str) {
        self.buf.push_str(s);
    }

    pub fn push(&mut self) {
        self.indent += 1;
    }

    pub fn pop(&mut self) {
        debug_assert!(self.indent > 0);
        self.indent = self.indent.saturating_sub(1);
    }

    /// Emit a JSDoc comment: `text` wrapped to the width available at the
    /// current indentation, then one `@param` line per `(name, description)`
    /// pair that has a description. Emits nothing when there is nothing to
    /// say. `*/` sequences are escaped so descriptions cannot close the
    /// comment early.
    pub fn doc(&mut self, text: Option<&str>, params: &[(String, Option<String>)]) {
        let width = self.wrap_width();
        let mut lines: Vec<String> = Vec::new();
        if let Some(text) = text {
            let text = escape_doc(text);
            if !text.trim().is_empty() {
                lines.extend(wrap(&text, width));
            }
        }
        let mut param_lines: Vec<String> = Vec::new();
        for (name, description) in params {
            if let Some(description) = description {
                let description = escape_doc(description);
                if !description.trim().is_empty() {
                    param_lines.push(format!("@param {name} {}", collapse(&description)));
                }
            }
        }
        if lines.is_empty() && param_lines.is_empty() {
            return;
        }
        if !lines.is_empty() && !param_lines.is_empty() {
            lines.push(String::new());
        }
        lines.extend(param_lines);

        if lines.len() == 1 && lines[0].len() + 7 <= MAX_WIDTH.saturating_sub(self.indent * 2) {
            self.line(&format!("/** {} */", lines[0]));
            return;
        }
        self.line("/**");
        for line in &lines {
            if line.is_empty() {
                self.line(" *");
            } else {
                self.line(&format!(" * {line}"));
            }
        }
        self.line(" */");
    }

    /// Width available for doc text: the column limit less the ` * ` gutter
    /// and the current indentation.
    fn wrap_width(&self) -> usize {
        MAX_WIDTH.saturating_sub(3 + self.indent * 2)
    }

    pub fn finish(self) -> String {
        self.buf
    }
}

/// Greedy whitespace wrap. Words longer than `width` get a line of their own.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            if current.is_empty() {
                current = word.to_string();
            } else if current.len() + 1 + word.len() <= width {
                current.push(' ');
                current.push_str(word);
            } else {
                lines.push(std::mem::take(&mut current));
                current = word.to_string();
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    lines
}

fn escape_doc(text: &str) -> String {
    text.replace("*/", "*\\/")
}

fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
