//! Character reference decoding for text and attribute values.
//!
//! Contract:
//! - Named references are decoded only from the small table below and only when
//!   `;`-terminated. Unknown names pass through unchanged.
//! - Numeric references (`&#215;`, `&#xD7;`) require a terminating `;` and a
//!   bounded digit run; anything else passes through unchanged.
//! - A well-formed numeric reference naming NUL, a surrogate or a value above
//!   U+10FFFF decodes to U+FFFD and is reported.

use std::borrow::Cow;

const NAMED: &[(&[u8], char)] = &[
    (b"amp;", '&'),
    (b"lt;", '<'),
    (b"gt;", '>'),
    (b"quot;", '"'),
    (b"apos;", '\''),
    (b"nbsp;", '\u{00A0}'),
    (b"copy;", '\u{00A9}'),
    (b"reg;", '\u{00AE}'),
    (b"hellip;", '\u{2026}'),
    (b"mdash;", '\u{2014}'),
    (b"ndash;", '\u{2013}'),
];

const MAX_HEX_DIGITS: usize = 6;
const MAX_DEC_DIGITS: usize = 7;

/// Decoded text plus byte offsets (relative to the decoded slice's source) of
/// references that were replaced with U+FFFD.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Decoded<'a> {
    pub(crate) text: Cow<'a, str>,
    pub(crate) invalid: Vec<usize>,
}

pub(crate) fn decode_character_references(s: &str) -> Decoded<'_> {
    let bytes = s.as_bytes();
    let Some(first) = memchr::memchr(b'&', bytes) else {
        return Decoded {
            text: Cow::Borrowed(s),
            invalid: Vec::new(),
        };
    };

    let mut out = String::with_capacity(s.len());
    let mut invalid = Vec::new();
    out.push_str(&s[..first]);
    let mut i = first;

    while i < bytes.len() {
        let next_amp = memchr::memchr(b'&', &bytes[i..]).map(|rel| i + rel);
        let Some(amp) = next_amp else {
            out.push_str(&s[i..]);
            break;
        };
        out.push_str(&s[i..amp]);
        match match_reference(bytes, amp) {
            Some(Reference::Char { ch, len }) => {
                out.push(ch);
                i = amp + len;
            }
            Some(Reference::Invalid { len }) => {
                out.push('\u{FFFD}');
                invalid.push(amp);
                i = amp + len;
            }
            None => {
                out.push('&');
                i = amp + 1;
            }
        }
    }

    Decoded {
        text: Cow::Owned(out),
        invalid,
    }
}

enum Reference {
    Char { ch: char, len: usize },
    Invalid { len: usize },
}

fn match_reference(bytes: &[u8], amp: usize) -> Option<Reference> {
    let rest = &bytes[amp + 1..];
    if let Some(body) = rest.strip_prefix(b"#") {
        let (digits_at, radix, max) = match body.first().copied() {
            Some(b'x' | b'X') => (2usize, 16, MAX_HEX_DIGITS),
            _ => (1usize, 10, MAX_DEC_DIGITS),
        };
        let digits = &rest[digits_at..];
        let run = digits
            .iter()
            .take(max + 1)
            .take_while(|b| {
                if radix == 16 {
                    b.is_ascii_hexdigit()
                } else {
                    b.is_ascii_digit()
                }
            })
            .count();
        if run == 0 || run > max || digits.get(run) != Some(&b';') {
            return None;
        }
        // Digits are ASCII, so this slice is valid UTF-8.
        let text = std::str::from_utf8(&digits[..run]).ok()?;
        let len = 1 + digits_at + run + 1;
        let value = u32::from_str_radix(text, radix).ok()?;
        return match char::from_u32(value) {
            Some(ch) if value != 0 => Some(Reference::Char { ch, len }),
            _ => Some(Reference::Invalid { len }),
        };
    }
    NAMED
        .iter()
        .find(|(name, _)| rest.starts_with(name))
        .map(|(name, ch)| Reference::Char {
            ch: *ch,
            len: 1 + name.len(),
        })
}

#[cfg(test)]
mod tests {
    use super::decode_character_references as decode;

    fn text(s: &str) -> String {
        decode(s).text.into_owned()
    }

    #[test]
    fn plain_text_is_borrowed() {
        let out = decode("no references here");
        assert!(matches!(out.text, std::borrow::Cow::Borrowed(_)));
    }

    #[test]
    fn decodes_named_and_numeric() {
        assert_eq!(text("a &amp; b &lt;i&gt;"), "a & b <i>");
        assert_eq!(text("&#215;&#xD7;&#XD7;"), "×××");
        assert_eq!(text("π &amp; σ"), "π & σ");
    }

    #[test]
    fn passes_through_unknown_and_unterminated() {
        assert_eq!(text("&bogus; &amp &#215 &#; &#x;"), "&bogus; &amp &#215 &#; &#x;");
        assert_eq!(text("&#12345678;"), "&#12345678;");
        assert_eq!(text("&&amp;"), "&&");
    }

    #[test]
    fn invalid_scalars_become_replacement_and_are_reported() {
        let out = decode("x&#xD800;y&#0;");
        assert_eq!(out.text, "x\u{FFFD}y\u{FFFD}");
        assert_eq!(out.invalid, vec![1, 10]);
        assert_eq!(text("&#x110000;"), "\u{FFFD}");
    }
}
