//! Parser for the `dbus-send --print-reply` text dump.
//!
//! The dump is line oriented. After a `method return ...` header, each line holds one token of
//! a nested value:
//!
//! ```text
//! method return time=1700000000.0 sender=:1.42 -> destination=:1.99 serial=7 reply_serial=2
//!    array [
//!       dict entry(
//!          string "name"
//!          variant             string "V1"
//!       )
//!    ]
//! ```
//!
//! The grammar is small enough for a hand written recursive descent over a line cursor:
//!
//! ```text
//! value      := scalar | variant | array | dict_entry
//! scalar     := ("string \"" text "\"") | ("int32 " n) | ("int64 " n) | ("uint32 " n)
//!             | ("uint64 " n) | ("double " x) | ("boolean " b)
//! variant    := "variant" (scalar | "array [" ... | <newline> value)
//! array      := "array [" value* "]"
//! dict_entry := "dict entry(" value value ")"
//! ```
//!
//! Strings may span several physical lines: an opening `string "` whose line does not end in a
//! quote continues over the following raw lines until one ends in an unescaped quote. The pieces
//! are joined with `\n`.
//!
//! An array whose children are all dict entries becomes a [`RemoteValue::Map`] (insertion
//! ordered). Any other array is a [`RemoteValue::List`]; dict entries that show up in a mixed
//! array are kept as two element lists. Lines that match nothing are skipped, as are closers
//! that have no opener. Parsing never fails.

use super::value::{Record, RemoteValue};

/// Parse a complete reply dump into a value. A reply without a body is [`RemoteValue::Void`].
pub fn parse(text: &str) -> RemoteValue {
    let mut cursor = ReplyCursor::new(text);
    cursor.skip_header();
    cursor.top_level()
}

/// Element of an array body: either a plain value or a dict entry pair.
#[derive(Debug)]
enum Node {
    Value(RemoteValue),
    Entry(String, RemoteValue),
}

impl Node {
    fn into_value(self) -> RemoteValue {
        match self {
            Node::Value(value) => value,
            Node::Entry(key, value) => RemoteValue::List(vec![RemoteValue::Str(key), value]),
        }
    }
}

struct ReplyCursor<'a> {
    lines: Vec<&'a str>,
    pos: usize,
}

impl<'a> ReplyCursor<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<&'a str> {
        self.lines.get(self.pos).map(|line| line.trim())
    }

    fn advance(&mut self) -> Option<&'a str> {
        let line = self.lines.get(self.pos).copied();
        if line.is_some() {
            self.pos += 1;
        }
        line
    }

    fn at_end(&self) -> bool {
        self.pos >= self.lines.len()
    }

    fn skip_header(&mut self) {
        if self
            .peek()
            .is_some_and(|line| line.starts_with("method return"))
        {
            self.pos += 1;
        }
    }

    fn top_level(&mut self) -> RemoteValue {
        loop {
            match self.node() {
                Some(node) => return node.into_value(),
                None if self.at_end() => return RemoteValue::Void,
                None => {
                    // Stray closer at the top level.
                    self.pos += 1;
                }
            }
        }
    }

    /// Read the next node. Returns `None` at end of input or at a closer (`]` or `)`), which is
    /// left in place for the enclosing construct to consume.
    fn node(&mut self) -> Option<Node> {
        loop {
            let raw = self.lines.get(self.pos).copied()?;
            let line = raw.trim_start();
            let trimmed = line.trim_end();

            if trimmed == "]" || trimmed == ")" {
                return None;
            }
            if trimmed.is_empty() {
                self.pos += 1;
                continue;
            }

            if let Some(tail) = trimmed.strip_prefix("array [") {
                self.pos += 1;
                return Some(Node::Value(self.array(tail)));
            }

            if trimmed.starts_with("dict entry(") {
                self.pos += 1;
                return Some(self.dict_entry());
            }

            if let Some(rest) = line.strip_prefix("variant") {
                self.pos += 1;
                return self.variant(rest);
            }

            self.pos += 1;
            if let Some(value) = self.scalar(line) {
                return Some(Node::Value(value));
            }

            log::trace!("skipping unrecognised reply line: {trimmed}");
        }
    }

    fn variant(&mut self, rest: &'a str) -> Option<Node> {
        let inline = rest.trim_start();
        if inline.trim_end().is_empty() {
            return self.node();
        }
        if let Some(tail) = inline.trim_end().strip_prefix("array [") {
            return Some(Node::Value(self.array(tail)));
        }
        match self.scalar(inline) {
            Some(value) => Some(Node::Value(value)),
            None => {
                log::trace!("skipping unrecognised variant payload: {}", inline.trim_end());
                self.node()
            }
        }
    }

    /// Parse an array body. `tail` is whatever followed `array [` on the opening line.
    fn array(&mut self, tail: &str) -> RemoteValue {
        if tail.trim() == "]" {
            return RemoteValue::List(Vec::new());
        }

        let mut children = Vec::new();
        loop {
            match self.node() {
                Some(node) => children.push(node),
                None => match self.peek() {
                    None => break,
                    Some("]") => {
                        self.pos += 1;
                        break;
                    }
                    Some(_) => {
                        // A `)` with no dict entry open.
                        self.pos += 1;
                    }
                },
            }
        }

        build_array(children)
    }

    fn dict_entry(&mut self) -> Node {
        let key = self.node().map(Node::into_value).unwrap_or_default();
        let value = self.node().map(Node::into_value).unwrap_or_default();

        // Anything left before the closing paren is not part of the pair.
        loop {
            match self.peek() {
                None => break,
                Some(")") => {
                    self.pos += 1;
                    break;
                }
                Some("]") => break,
                Some(_) => {
                    if self.node().is_none() {
                        break;
                    }
                }
            }
        }

        Node::Entry(key.to_text(), value)
    }

    /// Decode a scalar token. `line` has its leading whitespace removed but keeps trailing
    /// whitespace, which matters for strings.
    fn scalar(&mut self, line: &str) -> Option<RemoteValue> {
        if let Some(body) = line.strip_prefix("string \"") {
            return Some(RemoteValue::Str(self.string_body(body)));
        }

        let token = line.trim_end();
        for prefix in ["int32 ", "int64 ", "uint32 ", "uint64 "] {
            if let Some(digits) = token.strip_prefix(prefix) {
                let digits = digits.trim();
                return Some(
                    digits
                        .parse::<i64>()
                        .map(RemoteValue::Int)
                        .unwrap_or_else(|_| RemoteValue::Str(digits.to_string())),
                );
            }
        }
        if let Some(number) = token.strip_prefix("double ") {
            let number = number.trim();
            return Some(
                number
                    .parse::<f64>()
                    .map(RemoteValue::Float)
                    .unwrap_or_else(|_| RemoteValue::Str(number.to_string())),
            );
        }
        if let Some(flag) = token.strip_prefix("boolean ") {
            return Some(match flag.trim() {
                "true" => RemoteValue::Bool(true),
                "false" => RemoteValue::Bool(false),
                other => RemoteValue::Str(other.to_string()),
            });
        }
        None
    }

    /// Finish a string whose first line (after the opening quote) is `first`. A first line
    /// ending in a quote is always complete; continuation lines are taken raw until one ends in
    /// an unescaped quote.
    fn string_body(&mut self, first: &str) -> String {
        if let Some(closed) = first.trim_end().strip_suffix('"') {
            return closed.to_string();
        }

        let mut parts = vec![first.to_string()];
        while let Some(line) = self.advance() {
            if let Some(closed) = strip_closing_quote(line) {
                parts.push(closed.to_string());
                break;
            }
            parts.push(line.to_string());
        }
        parts.join("\n")
    }
}

/// If `text` ends (ignoring trailing whitespace) with a quote that is not escaped, return the
/// text before that quote.
fn strip_closing_quote(text: &str) -> Option<&str> {
    let trimmed = text.trim_end();
    let body = trimmed.strip_suffix('"')?;
    if body.ends_with('\\') {
        None
    } else {
        Some(body)
    }
}

fn build_array(children: Vec<Node>) -> RemoteValue {
    let all_entries =
        !children.is_empty() && children.iter().all(|node| matches!(node, Node::Entry(..)));

    if all_entries {
        let mut map = Record::with_capacity(children.len());
        for node in children {
            if let Node::Entry(key, value) = node {
                map.insert(key, value);
            }
        }
        RemoteValue::Map(map)
    } else {
        RemoteValue::List(children.into_iter().map(Node::into_value).collect())
    }
}
