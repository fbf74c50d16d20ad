//! The decode context and the scanner primitives every codec is built on.
//!
//! A [`Decoder`] borrows the full input up front — this crate does not parse
//! incrementally across discontinuous buffers. Every primitive here is
//! byte-granular: [`Decoder::peek`] returns a `u8`, never a `char`, and the
//! null byte `0x00` signals end-of-input without itself being an error.

use alloc::{string::String, vec::Vec};

use bstr::ByteSlice;

use crate::error::DecodeError;

/// Cursor over a borrowed byte slice, used for the lifetime of one decode
/// call and never shared across threads.
#[derive(Debug)]
pub struct Decoder<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Decoder<'a> {
    /// Start a decode context at the beginning of `input`.
    #[must_use]
    pub fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }

    /// Bytes not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.input.len() - self.pos
    }

    /// Whether the cursor has reached the end of the input.
    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.remaining() == 0
    }

    /// The error offset for a failure detected `d` bytes past the cursor
    /// (usually `0`, for "right here").
    #[must_use]
    pub fn offset(&self, d: usize) -> usize {
        self.pos + d
    }

    /// Current cursor position, in bytes from the start of the input.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[must_use]
    pub(crate) fn rest(&self) -> &'a [u8] {
        &self.input[self.pos..]
    }

    /// The byte at the cursor, or `0x00` if at end of input. Never advances.
    #[must_use]
    pub fn peek(&self) -> u8 {
        self.input.get(self.pos).copied().unwrap_or(0)
    }

    fn peek_at(&self, d: usize) -> u8 {
        self.input.get(self.pos + d).copied().unwrap_or(0)
    }

    /// Consume one byte, failing with `msg` if at end of input.
    pub fn next(&mut self, msg: &'static str) -> Result<u8, DecodeError> {
        let b = *self
            .input
            .get(self.pos)
            .ok_or_else(|| DecodeError::new(msg, self.offset(0)))?;
        self.pos += 1;
        Ok(b)
    }

    /// Advance `n` bytes, failing if fewer than `n` remain.
    pub fn skip(&mut self, n: usize) -> Result<(), DecodeError> {
        if self.remaining() < n {
            return Err(DecodeError::unexpected_end_of_input(self.offset(0)));
        }
        self.pos += n;
        Ok(())
    }

    /// Consume one byte, failing with `"Unexpected input"` if it is not `c`.
    pub fn advance_past(&mut self, c: u8) -> Result<(), DecodeError> {
        let offset = self.offset(0);
        let b = self.next("Unexpected end of input")?;
        if b != c {
            return Err(DecodeError::unexpected_input(offset));
        }
        Ok(())
    }

    /// Require that the next 4 bytes equal `s`, then advance past them.
    /// Used for the literal tails `ull`, `rue`, `alse` (after the leading
    /// `n`/`t`/`f` has already been consumed).
    pub fn advance_past_four(&mut self, s: &[u8; 4]) -> Result<(), DecodeError> {
        let offset = self.offset(0);
        if self.remaining() < 4 {
            return Err(DecodeError::unexpected_end_of_input(offset));
        }
        if &self.input[self.pos..self.pos + 4] != s {
            return Err(DecodeError::unexpected_input(offset));
        }
        self.pos += 4;
        Ok(())
    }

    /// Advance past `{' ', '\t', '\n', '\r'}` runs. Never fails; stops at
    /// end-of-input. No other characters count as whitespace, by design —
    /// this is not a Unicode-whitespace scan.
    pub fn skip_past_whitespace(&mut self) {
        while matches!(self.peek(), b' ' | b'\t' | b'\n' | b'\r') {
            self.pos += 1;
        }
    }

    /// Advance past a full JSON string (`"..."`), without materializing the
    /// decoded text. Used by [`Self::skip_value`] and, composed with actual
    /// decoding, by the string codec.
    ///
    /// `bstr`'s `find_byteset` jumps straight to the next quote-or-backslash
    /// instead of testing one byte at a time — a portable stand-in for a
    /// dedicated SIMD scan.
    pub fn advance_past_string(&mut self) -> Result<(), DecodeError> {
        self.advance_past(b'"')?;
        loop {
            let rest = self.rest();
            let Some(hit) = rest.find_byteset(b"\"\\") else {
                self.pos = self.input.len();
                return Err(DecodeError::unterminated_string(self.offset(0)));
            };
            self.pos += hit;
            match self.peek() {
                b'"' => {
                    self.pos += 1;
                    return Ok(());
                }
                b'\\' => {
                    let escape_offset = self.offset(0);
                    self.pos += 1;
                    self.skip_one_escape(escape_offset)?;
                }
                _ => unreachable!("find_byteset only matches '\"' or '\\\\'"),
            }
        }
    }

    fn skip_one_escape(&mut self, backslash_offset: usize) -> Result<(), DecodeError> {
        let escape_char_offset = self.offset(0);
        let c = self.next("Unterminated string")?;
        match c {
            b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't' => Ok(()),
            b'u' => {
                for _ in 0..4 {
                    let d = self.next(r"\u must be followed by 4 hex digits")?;
                    if !d.is_ascii_hexdigit() {
                        return Err(DecodeError::invalid_unicode_escape(escape_char_offset));
                    }
                }
                Ok(())
            }
            _ => {
                let _ = backslash_offset;
                Err(DecodeError::invalid_escape_character(escape_char_offset))
            }
        }
    }

    /// Advance past any well-formed JSON value without producing it.
    pub fn skip_value(&mut self) -> Result<(), DecodeError> {
        self.skip_past_whitespace();
        match self.peek() {
            b'{' => self.advance_past_comma_separated(b'{', b'}', |ctx| {
                ctx.advance_past_string()?;
                ctx.skip_past_whitespace();
                ctx.advance_past(b':')?;
                ctx.skip_past_whitespace();
                ctx.skip_value()
            }),
            b'[' => self.advance_past_comma_separated(b'[', b']', Decoder::skip_value),
            b'"' => self.advance_past_string(),
            b't' => {
                self.pos += 1;
                self.skip_literal_tail(b"rue")
            }
            b'f' => {
                self.pos += 1;
                self.skip_literal_tail(b"alse")
            }
            b'n' => {
                self.pos += 1;
                self.skip_literal_tail(b"ull")
            }
            b'-' | b'0'..=b'9' => self.skip_number(),
            _ => Err(DecodeError::unexpected_input(self.offset(0))),
        }
    }

    fn skip_literal_tail(&mut self, tail: &[u8]) -> Result<(), DecodeError> {
        let offset = self.offset(0);
        if self.remaining() < tail.len() || &self.input[self.pos..self.pos + tail.len()] != tail {
            return Err(DecodeError::unexpected_input(offset));
        }
        self.pos += tail.len();
        Ok(())
    }

    fn skip_number(&mut self) -> Result<(), DecodeError> {
        self.scan_number_span()?;
        Ok(())
    }

    /// Scan a JSON number's grammar (sign, integer part, optional fraction,
    /// optional exponent) and return the matched span as text, without
    /// interpreting it. Shared by `skip_value` and the number codec.
    pub(crate) fn scan_number_span(&mut self) -> Result<&'a str, DecodeError> {
        let start = self.pos;
        let offset = self.offset(0);
        if self.peek() == b'-' {
            self.pos += 1;
        }
        match self.peek() {
            b'0' => self.pos += 1,
            b'1'..=b'9' => {
                self.pos += 1;
                while self.peek().is_ascii_digit() {
                    self.pos += 1;
                }
            }
            _ => return Err(DecodeError::unexpected_input(offset)),
        }
        if self.peek() == b'.' {
            self.pos += 1;
            if !self.peek().is_ascii_digit() {
                return Err(DecodeError::unexpected_input(self.offset(0)));
            }
            while self.peek().is_ascii_digit() {
                self.pos += 1;
            }
        }
        if matches!(self.peek(), b'e' | b'E') {
            self.pos += 1;
            if matches!(self.peek(), b'+' | b'-') {
                self.pos += 1;
            }
            if !self.peek().is_ascii_digit() {
                return Err(DecodeError::unexpected_input(self.offset(0)));
            }
            while self.peek().is_ascii_digit() {
                self.pos += 1;
            }
        }
        core::str::from_utf8(&self.input[start..self.pos])
            .map_err(|_| DecodeError::unexpected_input(offset))
    }

    /// Generic driver shared by object and array decoding: consume `intro`,
    /// skip whitespace, and — if the next byte is not `outro` — invoke
    /// `parse` once, then repeatedly while the next byte is not `outro`,
    /// consume a `,`, skip whitespace, invoke `parse` again. Finally consume
    /// `outro`.
    ///
    /// Precondition on `parse` (not re-checked defensively): it must either
    /// advance the cursor past one element or return `Err`. A `parse` that
    /// does neither would make this driver loop forever; that is a bug in
    /// the calling codec, not a malformed-input case this function guards
    /// against.
    pub fn advance_past_comma_separated(
        &mut self,
        intro: u8,
        outro: u8,
        mut parse: impl FnMut(&mut Self) -> Result<(), DecodeError>,
    ) -> Result<(), DecodeError> {
        self.advance_past(intro)?;
        self.skip_past_whitespace();
        if self.peek() != outro {
            parse(self)?;
            self.skip_past_whitespace();
            while self.peek() != outro {
                self.advance_past(b',')?;
                self.skip_past_whitespace();
                parse(self)?;
                self.skip_past_whitespace();
            }
        }
        self.advance_past(outro)
    }

    /// Decode a JSON string's content (escapes fully resolved) into an owned
    /// `String`. Unlike [`Self::advance_past_string`], this materializes the
    /// text; used for object keys and by the string codec.
    pub fn decode_string(&mut self) -> Result<String, DecodeError> {
        self.advance_past(b'"')?;
        let mut out = String::new();
        loop {
            let rest = self.rest();
            let hit = rest.find_byteset(b"\"\\");
            let Some(hit) = hit else {
                self.pos = self.input.len();
                return Err(DecodeError::unterminated_string(self.offset(0)));
            };
            // SAFETY-free: the scanned span contains no `"` or `\`, and is a
            // slice of the original UTF-8 input between two such bytes, so it
            // is itself valid UTF-8 as long as the input is. A non-UTF-8
            // input byte here means the caller handed us non-UTF-8 JSON text,
            // which is itself malformed.
            let chunk = core::str::from_utf8(&rest[..hit])
                .map_err(|_| DecodeError::unexpected_input(self.offset(0)))?;
            out.push_str(chunk);
            self.pos += hit;
            match self.peek() {
                b'"' => {
                    self.pos += 1;
                    return Ok(out);
                }
                b'\\' => {
                    self.pos += 1;
                    self.decode_one_escape(&mut out)?;
                }
                _ => unreachable!("find_byteset only matches '\"' or '\\\\'"),
            }
        }
    }

    fn decode_one_escape(&mut self, out: &mut String) -> Result<(), DecodeError> {
        let escape_char_offset = self.offset(0);
        let c = self.next("Unterminated string")?;
        match c {
            b'"' => out.push('"'),
            b'\\' => out.push('\\'),
            b'/' => out.push('/'),
            b'b' => out.push('\u{0008}'),
            b'f' => out.push('\u{000C}'),
            b'n' => out.push('\n'),
            b'r' => out.push('\r'),
            b't' => out.push('\t'),
            b'u' => {
                let unit = self.decode_hex4(escape_char_offset)?;
                self.push_utf16_unit(unit, escape_char_offset, out)?;
            }
            _ => return Err(DecodeError::invalid_escape_character(escape_char_offset)),
        }
        Ok(())
    }

    fn decode_hex4(&mut self, escape_char_offset: usize) -> Result<u16, DecodeError> {
        let mut unit: u16 = 0;
        for _ in 0..4 {
            let d = self.next(r"\u must be followed by 4 hex digits")?;
            let digit = (d as char)
                .to_digit(16)
                .ok_or_else(|| DecodeError::invalid_unicode_escape(escape_char_offset))?;
            unit = unit * 16 + digit as u16;
        }
        Ok(unit)
    }

    /// Combine a `\uXXXX` code unit with a following low surrogate if
    /// present, otherwise push it directly. A lone surrogate (high with no
    /// following low, or a bare low surrogate) is replaced with U+FFFD — the
    /// same lossy policy `str::from_utf8_lossy` uses elsewhere in the
    /// ecosystem.
    fn push_utf16_unit(
        &mut self,
        unit: u16,
        escape_char_offset: usize,
        out: &mut String,
    ) -> Result<(), DecodeError> {
        if (0xD800..=0xDBFF).contains(&unit) {
            if self.peek() == b'\\' && self.peek_at(1) == b'u' {
                let save = self.pos;
                self.pos += 2;
                let low_offset = self.offset(0);
                let low = self.decode_hex4(low_offset)?;
                if (0xDC00..=0xDFFF).contains(&low) {
                    let c = 0x10000
                        + (u32::from(unit) - 0xD800) * 0x400
                        + (u32::from(low) - 0xDC00);
                    out.push(char::from_u32(c).unwrap_or('\u{FFFD}'));
                    return Ok(());
                }
                self.pos = save;
            }
            out.push('\u{FFFD}');
            return Ok(());
        }
        if (0xDC00..=0xDFFF).contains(&unit) {
            out.push('\u{FFFD}');
            return Ok(());
        }
        out.push(char::from_u32(u32::from(unit)).unwrap_or_else(|| {
            log::trace!("unreachable non-surrogate code unit failed to convert at {escape_char_offset}");
            '\u{FFFD}'
        }));
        Ok(())
    }
}
