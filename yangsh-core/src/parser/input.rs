//
// Copyright (c) The Yangsh Core Contributors
//
// SPDX-License-Identifier: MIT
//

/// A cheap, copyable cursor over the input line. Backtracking is a plain
/// copy-and-restore of the cursor value.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Input<'a> {
    src: &'a str,
    pos: usize,
}

// ===== impl Input =====

impl<'a> Input<'a> {
    pub(crate) fn new(src: &'a str) -> Input<'a> {
        Input { src, pos: 0 }
    }

    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    pub(crate) fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    pub(crate) fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    pub(crate) fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub(crate) fn starts_with(&self, s: &str) -> bool {
        self.rest().starts_with(s)
    }

    pub(crate) fn bump(&mut self, bytes: usize) {
        self.pos += bytes;
    }

    pub(crate) fn eat_char(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    pub(crate) fn eat(&mut self, lit: &str) -> bool {
        if self.starts_with(lit) {
            self.pos += lit.len();
            true
        } else {
            false
        }
    }

    /// Consumes a whitespace run; true if at least one character went.
    pub(crate) fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
        self.pos > start
    }

    /// A YANG identifier: a letter or underscore followed by letters,
    /// digits, `_`, `-` and `.`.
    pub(crate) fn identifier(&mut self) -> Option<&'a str> {
        let rest = self.rest();
        let first = rest.chars().next()?;
        if !first.is_ascii_alphabetic() && first != '_' {
            return None;
        }
        let end = rest
            .char_indices()
            .find(|(_, c)| !is_identifier_char(*c))
            .map(|(idx, _)| idx)
            .unwrap_or(rest.len());
        self.pos += end;
        Some(&rest[..end])
    }

    /// A module prefix: an identifier immediately followed by `:`, with a
    /// non-whitespace character required after the colon.
    pub(crate) fn module_prefix(&mut self) -> Option<&'a str> {
        let save = *self;
        if let Some(name) = self.identifier()
            && self.eat_char(':')
            && matches!(self.peek(), Some(c) if !c.is_whitespace())
        {
            return Some(name);
        }
        *self = save;
        None
    }

    /// A balanced single- or double-quoted string. No escapes; any
    /// character except the matching quote is allowed inside.
    pub(crate) fn quoted_string(&mut self) -> Option<&'a str> {
        let quote = match self.peek() {
            Some(c @ ('\'' | '"')) => c,
            _ => return None,
        };
        let inner = &self.rest()[1..];
        let end = inner.find(quote)?;
        self.pos += end + 2;
        Some(&inner[..end])
    }

    /// Consumes and returns the maximal run of non-whitespace characters.
    pub(crate) fn take_word(&mut self) -> &'a str {
        let rest = self.rest();
        let end = rest
            .char_indices()
            .find(|(_, c)| c.is_whitespace())
            .map(|(idx, _)| idx)
            .unwrap_or(rest.len());
        self.pos += end;
        &rest[..end]
    }

    /// The upcoming word, without consuming it.
    pub(crate) fn peek_word(&self) -> &'a str {
        let mut probe = *self;
        probe.take_word()
    }
}

// ===== global functions =====

pub(crate) fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')
}
