use cssparser::serialize_name;

/// Direction placeholder replaced by `left` (`right` in rtl mode).
pub const START: &str = "__START__";
/// Direction placeholder replaced by `right` (`left` in rtl mode).
pub const END: &str = "__END__";

const COMMA_MASK: &str = "__ATOMIZER_COMMA__";
const ESCAPED_COMMA: &str = "\\,";

/// Backslash-escapes everything in `raw` except ASCII alphanumerics, `-`,
/// `_` and whitespace.
pub fn escape_selector(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 8);
    let mut chunk_start = 0;
    for (i, ch) in raw.char_indices() {
        if ch.is_whitespace() {
            escape_chunk(&raw[chunk_start..i], &mut out);
            out.push(ch);
            chunk_start = i + ch.len_utf8();
        }
    }
    escape_chunk(&raw[chunk_start..], &mut out);
    out
}

// Writing into a `String` cannot fail.
fn escape_chunk(chunk: &str, out: &mut String) {
    let _ = serialize_name(chunk, out);
}

/// Hides escaped commas so a compiler splitting selector lists on `,`
/// leaves them alone.
pub fn mask_commas(selector: &str) -> String {
    selector.replace(ESCAPED_COMMA, COMMA_MASK)
}

pub fn unmask_commas(css: &str) -> String {
    css.replace(COMMA_MASK, ESCAPED_COMMA)
}

pub fn replace_constants(css: &str, rtl: bool) -> String {
    let (start, end) = if rtl { ("right", "left") } else { ("left", "right") };
    css.replace(START, start).replace(END, end)
}
