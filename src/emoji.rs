//! Emoji shortcode scanner.
//!
//! Replaces `:shortcode:` patterns with the emoji glyph, leaving unknown
//! names untouched.

use std::borrow::Cow;

/// Replace every known `:shortcode:` in `markdown` with its emoji.
///
/// ```
/// use gfm_render::emojify;
///
/// assert_eq!(emojify("ship it :rocket:"), "ship it 🚀");
/// assert_eq!(emojify("time 10:30:00"), "time 10:30:00");
/// ```
pub fn emojify(markdown: &str) -> Cow<'_, str> {
    let spans = scan_shortcodes(markdown);
    if spans.is_empty() {
        return Cow::Borrowed(markdown);
    }

    let mut out = String::with_capacity(markdown.len());
    let mut last = 0;
    for (start, end, glyph) in spans {
        out.push_str(&markdown[last..start]);
        out.push_str(glyph);
        last = end;
    }
    out.push_str(&markdown[last..]);
    Cow::Owned(out)
}

/// Scan `text` for known shortcodes.
///
/// Returns `(start_byte, end_byte, glyph)` tuples covering the colons.
fn scan_shortcodes(text: &str) -> Vec<(usize, usize, &'static str)> {
    let mut results = Vec::new();
    let bytes = text.as_bytes();
    let mut pos = 0;

    while pos < bytes.len() {
        if bytes[pos] != b':' {
            pos += 1;
            continue;
        }

        let name_start = pos + 1;
        let name_len = bytes[name_start..]
            .iter()
            .take_while(|&&b| is_shortcode_byte(b))
            .count();
        let close = name_start + name_len;

        if name_len > 0 && bytes.get(close) == Some(&b':') {
            if let Some(emoji) = emojis::get_by_shortcode(&text[name_start..close]) {
                results.push((pos, close + 1, emoji.as_str()));
                pos = close + 1;
                continue;
            }
            // The closing colon may open the next shortcode.
            pos = close;
            continue;
        }
        pos += 1;
    }

    results
}

fn is_shortcode_byte(b: u8) -> bool {
    b.is_ascii_lowercase() || b.is_ascii_digit() || matches!(b, b'_' | b'+' | b'-')
}
