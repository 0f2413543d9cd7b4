use unicode_width::UnicodeWidthChar;

/// Word-wraps `text` to `width` display columns.
///
/// Hard newlines are kept (`\r\n` and lone `\r` count as newlines), tabs expand to four spaces,
/// and breaks prefer whitespace or trailing punctuation. A word longer than `width` is split
/// mid-word. A zero `width` disables wrapping. Always returns at least one line.
pub fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let mut out = Vec::new();
    for raw in text.split('\n') {
        let raw = raw.replace('\t', "    ");
        if width == 0 || raw.is_empty() {
            out.push(raw);
            continue;
        }
        wrap_line(&raw, width, &mut out);
    }
    if out.is_empty() {
        out.push(String::new());
    }
    out
}

fn wrap_line(raw: &str, max_cols: usize, out: &mut Vec<String>) {
    let mut line = String::new();
    let mut line_cols = 0usize;
    // Byte index in `line` just after the last break opportunity.
    let mut soft_break: Option<usize> = None;

    for ch in raw.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if line_cols + w > max_cols {
            if let Some(split) = soft_break.take() {
                let rest = line.split_off(split);
                out.push(line.trim_end().to_string());
                line = rest.trim_start().to_string();
                line_cols = display_width(&line);
            }
            if line_cols + w > max_cols && !line.is_empty() {
                out.push(std::mem::take(&mut line));
                line_cols = 0;
            }
        }

        if line.is_empty() && ch.is_whitespace() {
            continue;
        }

        line.push(ch);
        line_cols += w;

        if ch.is_whitespace() || is_break_after(ch) {
            soft_break = Some(line.len());
        }
    }

    if !line.is_empty() {
        out.push(line.trim_end().to_string());
    }
}

fn is_break_after(ch: char) -> bool {
    matches!(
        ch,
        ',' | ';' | '.' | ':' | ')' | ']' | '}' | '|' | '/' | '?' | '!' | '-'
    )
}

fn display_width(s: &str) -> usize {
    s.chars()
        .map(|c| UnicodeWidthChar::width(c).unwrap_or(0))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_on_word_boundaries() {
        assert_eq!(wrap_words("hello world", 5), vec!["hello", "world"]);
        assert_eq!(
            wrap_words("the quick brown fox", 10),
            vec!["the quick", "brown fox"]
        );
    }

    #[test]
    fn splits_words_longer_than_width() {
        assert_eq!(wrap_words("abcdefgh", 3), vec!["abc", "def", "gh"]);
    }

    #[test]
    fn keeps_hard_newlines_and_blank_lines() {
        assert_eq!(wrap_words("a\n\nb", 10), vec!["a", "", "b"]);
        assert_eq!(wrap_words("a\r\nb", 10), vec!["a", "b"]);
    }

    #[test]
    fn empty_text_yields_one_line() {
        assert_eq!(wrap_words("", 10), vec![String::new()]);
    }

    #[test]
    fn breaks_after_punctuation() {
        assert_eq!(wrap_words("one,two", 5), vec!["one,", "two"]);
    }
}
