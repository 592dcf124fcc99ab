//! Text measurement and fitting. Plotters cannot measure text without a loaded
//! font, so layout works from per-glyph width estimates.

/// Approximate advance of one glyph as a fraction of the font size.
fn glyph_em(c: char) -> f32 {
    match c {
        'i' | 'j' | 'l' | '.' | ',' | ':' | ';' | '\'' | '|' | '!' => 0.30,
        'f' | 't' | 'r' | ' ' | '(' | ')' | '-' => 0.40,
        'm' | 'w' | 'M' | 'W' | '@' | '%' => 0.85,
        c if c.is_ascii_uppercase() => 0.68,
        c if c.is_ascii_digit() => 0.58,
        _ => 0.56,
    }
}

/// Estimated pixel width of `text` at `font_px`.
pub fn estimate_text_width_px(text: &str, font_px: u32) -> u32 {
    let em: f32 = text.chars().map(glyph_em).sum();
    (em * font_px as f32).ceil() as u32
}

/// Cut `text` so it fits `max_px`, ending with an ellipsis when shortened.
pub fn truncate_to_width(text: &str, font_px: u32, max_px: u32) -> String {
    if estimate_text_width_px(text, font_px) <= max_px {
        return text.to_string();
    }
    let budget = max_px.saturating_sub(estimate_text_width_px("…", font_px));
    let mut out = String::new();
    let mut used = 0u32;
    for c in text.chars() {
        let w = (glyph_em(c) * font_px as f32).ceil() as u32;
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    let mut out = out.trim_end().to_string();
    out.push('…');
    out
}

/// Greedy word wrap into lines no wider than `max_px`; at most `max_lines`, the last
/// one truncated if text remains.
pub fn wrap_text_to_width(text: &str, font_px: u32, max_px: u32, max_lines: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut cur = String::new();
    for word in text.split_whitespace() {
        let candidate = if cur.is_empty() {
            word.to_string()
        } else {
            format!("{cur} {word}")
        };
        if cur.is_empty() || estimate_text_width_px(&candidate, font_px) <= max_px {
            cur = candidate;
        } else {
            lines.push(std::mem::take(&mut cur));
            cur = word.to_string();
        }
    }
    if !cur.is_empty() {
        lines.push(cur);
    }
    if max_lines > 0 && lines.len() > max_lines {
        let rest = lines.split_off(max_lines - 1).join(" ");
        lines.push(truncate_to_width(&rest, font_px, max_px));
    }
    lines
        .into_iter()
        .map(|l| truncate_to_width(&l, font_px, max_px))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_respects_line_limit() {
        let lines = wrap_text_to_width("one two three four five six seven", 16, 80, 2);
        assert_eq!(lines.len(), 2);
        assert!(lines[1].ends_with('…'));
        assert!(lines.iter().all(|l| estimate_text_width_px(l, 16) <= 80));
    }
}
