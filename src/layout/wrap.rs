use crate::fonts::{FontRegistry, FontStyle};

/// Greedy word wrap. Every produced line measures at most `max_width` under
/// `fonts.text_width(style, .., size)`, except a lone character wider than
/// the whole column. Explicit newlines start a new paragraph and a blank
/// source line is kept as an empty line.
pub fn wrap_text(
    fonts: &FontRegistry,
    style: FontStyle,
    size: f32,
    max_width: f32,
    text: &str,
) -> Vec<String> {
    let fits = |s: &str| fonts.text_width(style, s, size) <= max_width;
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();
        let mut any_word = false;

        for word in paragraph.split_whitespace() {
            any_word = true;
            if !current.is_empty() {
                let candidate = format!("{current} {word}");
                if fits(&candidate) {
                    current = candidate;
                    continue;
                }
                lines.push(std::mem::take(&mut current));
            }
            if fits(word) {
                current = word.to_string();
            } else {
                let mut pieces = split_word(word, &fits);
                current = pieces.pop().unwrap_or_default();
                lines.extend(pieces);
            }
        }

        if any_word {
            lines.push(current);
        } else {
            lines.push(String::new());
        }
    }

    lines
}

/// Break an overlong word into the fewest pieces that each fit.
fn split_word(word: &str, fits: &impl Fn(&str) -> bool) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();
    for ch in word.chars() {
        piece.push(ch);
        if !fits(&piece) && piece.chars().count() > 1 {
            piece.pop();
            pieces.push(std::mem::take(&mut piece));
            piece.push(ch);
        }
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}

/// Wrap, then keep at most `max_lines`, ending the last kept line with an
/// ellipsis when text was cut.
pub fn wrap_clamped(
    fonts: &FontRegistry,
    style: FontStyle,
    size: f32,
    max_width: f32,
    text: &str,
    max_lines: usize,
) -> Vec<String> {
    let mut lines = wrap_text(fonts, style, size, max_width, text);
    if lines.len() <= max_lines {
        return lines;
    }
    lines.truncate(max_lines);
    if let Some(last) = lines.last_mut() {
        while !last.is_empty()
            && fonts.text_width(style, &format!("{last}…"), size) > max_width
        {
            last.pop();
        }
        let trimmed = last.trim_end().len();
        last.truncate(trimmed);
        last.push('…');
    }
    lines
}

