//! Textual repair applied to model output before JSON parsing.
//!
//! Exactly one malformation is repaired: a comma directly before a closing
//! `]` or `}` (whitespace in between is allowed). Commas inside string
//! literals are left alone. No other fix-ups belong here.

/// Trim surrounding whitespace and drop trailing commas before `]`/`}`.
///
/// The result is a fixed point: `strip_trailing_commas(strip_trailing_commas(s))`
/// equals `strip_trailing_commas(s)`.
pub fn strip_trailing_commas(raw: &str) -> String {
    let text = raw.trim();
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;

    for ch in text.chars() {
        if in_string {
            out.push(ch);
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => {
                in_string = true;
                out.push(ch);
            }
            '}' | ']' => {
                drop_dangling_commas(&mut out);
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }

    out
}

/// Remove commas that precede the current position, looking past
/// whitespace. Whitespace between the comma and the closer is kept.
fn drop_dangling_commas(out: &mut String) {
    loop {
        let content_end = out.trim_end().len();
        if !out[..content_end].ends_with(',') {
            return;
        }
        out.remove(content_end - 1);
    }
}
