//! Whitespace tokenizer over raw document bytes.
//!
//! A token is a maximal run of non-whitespace bytes. Tokens are borrowed
//! views into the document buffer: nothing is copied, and a [`Token`] cannot
//! outlive the buffer it was cut from.
//!
//! Whitespace follows the C locale `isspace` set (space, `\t`, `\n`, `\v`,
//! `\f`, `\r`). Every other byte, including non-ASCII bytes, is token content,
//! so invalid UTF-8 is never an error here.
//!
//! ```text
//! let words: Vec<_> = tokenize(b"buy  now\n").map(|t| t.as_bytes()).collect();
//! assert_eq!(words, [&b"buy"[..], &b"now"[..]]);
//! ```

use std::fmt;
use std::iter::FusedIterator;

/// Returns true for the bytes treated as word separators.
#[inline]
pub fn is_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r')
}

/// A read-only view (offset + length) into a document buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    offset: usize,
    text: &'a [u8],
}

impl<'a> Token<'a> {
    /// Byte offset of the token within its buffer.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Tokens produced by [`tokenize`] are never empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.text
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(self.text))
    }
}

/// Lazy token stream over a buffer.
///
/// Cloning the iterator (or calling [`tokenize`] again) restarts it from the
/// same position and reproduces the same sequence.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    buf: &'a [u8],
    pos: usize,
}

/// Split `buf` into whitespace-delimited tokens.
pub fn tokenize(buf: &[u8]) -> Tokens<'_> {
    Tokens { buf, pos: 0 }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let buf = self.buf;

        while self.pos < buf.len() && is_space(buf[self.pos]) {
            self.pos += 1;
        }
        if self.pos == buf.len() {
            return None;
        }

        let start = self.pos;
        while self.pos < buf.len() && !is_space(buf[self.pos]) {
            self.pos += 1;
        }

        Some(Token {
            offset: start,
            text: &buf[start..self.pos],
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.buf.len() - self.pos;
        // Each token needs one byte plus a separator, except the last.
        (0, Some((remaining + 1) / 2))
    }
}

impl FusedIterator for Tokens<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(buf: &[u8]) -> Vec<&[u8]> {
        tokenize(buf).map(|t| t.as_bytes()).collect()
    }

    #[test]
    fn test_basic_split() {
        assert_eq!(words(b"buy now money"), vec![&b"buy"[..], &b"now"[..], &b"money"[..]]);
    }

    #[test]
    fn test_empty_and_blank_buffers() {
        assert!(words(b"").is_empty());
        assert!(words(b" \t\r\n\x0b\x0c").is_empty());
    }

    #[test]
    fn test_trailing_token_without_whitespace() {
        assert_eq!(words(b"  hello"), vec![&b"hello"[..]]);
    }

    #[test]
    fn test_trailing_whitespace_yields_no_empty_token() {
        let tokens: Vec<_> = tokenize(b"a b \n\n").collect();
        assert_eq!(tokens.len(), 2);
        assert!(tokens.iter().all(|t| !t.is_empty()));
    }

    #[test]
    fn test_offsets_point_into_buffer() {
        let buf = b"\tfoo  bar";
        let tokens: Vec<_> = tokenize(buf).collect();
        assert_eq!(tokens[0].offset(), 1);
        assert_eq!(tokens[1].offset(), 6);
        for t in &tokens {
            assert_eq!(&buf[t.offset()..t.offset() + t.len()], t.as_bytes());
        }
    }

    #[test]
    fn test_non_ascii_bytes_are_content() {
        let buf = b"caf\xc3\xa9 na\xc3\xafve \xff";
        assert_eq!(words(buf).len(), 3);
        assert_eq!(words(b"ab\xffcd"), vec![&b"ab\xffcd"[..]]);
    }

    #[test]
    fn test_case_sensitive_and_punctuation_kept() {
        assert_eq!(words(b"Free! free"), vec![&b"Free!"[..], &b"free"[..]]);
    }

    #[test]
    fn test_matches_split_on_whitespace_runs() {
        let buf = b"  Subject: re:\tmeeting \r\n\r\n  see you  at 10am\x0b\x0cbye ";
        let expected: Vec<&[u8]> = buf
            .split(|&b| is_space(b))
            .filter(|field| !field.is_empty())
            .collect();
        assert_eq!(words(buf), expected);
    }

    #[test]
    fn test_restartable() {
        let buf = b"one two three";
        let tokens = tokenize(buf);
        let first: Vec<_> = tokens.clone().collect();
        let second: Vec<_> = tokens.collect();
        assert_eq!(first, second);
        assert_eq!(first, tokenize(buf).collect::<Vec<_>>());
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let buf = b"\n\nlorem   ipsum\tdolor\r\nsit amet, \x0cconsectetur\n";
        let tokens: Vec<&[u8]> = words(buf);
        assert!(tokens.iter().all(|t| !t.iter().any(|&b| is_space(b))));

        let joined = tokens.join(&b' ');
        assert_eq!(words(&joined), tokens);
    }

    #[test]
    fn test_fused_after_exhaustion() {
        let mut tokens = tokenize(b"x");
        assert!(tokens.next().is_some());
        assert!(tokens.next().is_none());
        assert!(tokens.next().is_none());
    }

    #[test]
    fn test_display_is_lossy_utf8() {
        let token = tokenize(b"hello").next().unwrap();
        assert_eq!(token.to_string(), "hello");
    }
}
