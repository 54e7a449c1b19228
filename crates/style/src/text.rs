use serde::{Deserialize, Serialize};

/// Horizontal alignment of a field's text inside its box.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlign {
    /// The x coordinate text is anchored to for a box starting at `x` with `width`.
    pub fn anchor_x(self, x: f32, width: f32) -> f32 {
        match self {
            TextAlign::Left => x,
            TextAlign::Center => x + width / 2.0,
            TextAlign::Right => x + width,
        }
    }

    /// Left edge of a line of `line_width` anchored at `anchor_x`.
    pub fn line_start(self, anchor_x: f32, line_width: f32) -> f32 {
        match self {
            TextAlign::Left => anchor_x,
            TextAlign::Center => anchor_x - line_width / 2.0,
            TextAlign::Right => anchor_x - line_width,
        }
    }
}

/// Splits `text` into lines no wider than `max_width` according to `measure`.
///
/// Explicit newlines always break. Words wider than the limit are broken
/// between characters, which is also how unspaced scripts wrap.
pub fn wrap_lines<F>(text: &str, max_width: Option<f32>, mut measure: F) -> Vec<String>
where
    F: FnMut(&str) -> f32,
{
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let paragraph = paragraph.trim_end_matches('\r');
        match max_width {
            Some(max) if measure(paragraph) > max => {
                wrap_paragraph(paragraph, max, &mut measure, &mut lines)
            }
            _ => lines.push(paragraph.to_string()),
        }
    }
    lines
}

fn wrap_paragraph<F>(paragraph: &str, max: f32, measure: &mut F, lines: &mut Vec<String>)
where
    F: FnMut(&str) -> f32,
{
    let mut line = String::new();
    for word in paragraph.split_whitespace() {
        let candidate = if line.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", line, word)
        };
        if measure(&candidate) <= max {
            line = candidate;
            continue;
        }
        if !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }
        if measure(word) <= max {
            line = word.to_string();
            continue;
        }
        for ch in word.chars() {
            let mut next = line.clone();
            next.push(ch);
            if !line.is_empty() && measure(&next) > max {
                lines.push(std::mem::take(&mut line));
                line.push(ch);
            } else {
                line = next;
            }
        }
    }
    lines.push(line);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_by_alignment() {
        assert_eq!(TextAlign::Left.anchor_x(20.0, 390.0), 20.0);
        assert_eq!(TextAlign::Center.anchor_x(20.0, 390.0), 215.0);
        assert_eq!(TextAlign::Right.anchor_x(20.0, 390.0), 410.0);
    }

    #[test]
    fn test_line_start_inverts_anchor() {
        let anchor = TextAlign::Center.anchor_x(0.0, 100.0);
        assert_eq!(TextAlign::Center.line_start(anchor, 40.0), 30.0);
        assert_eq!(TextAlign::Right.line_start(100.0, 40.0), 60.0);
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&TextAlign::Center).unwrap(), "\"center\"");
        let a: TextAlign = serde_json::from_str("\"right\"").unwrap();
        assert_eq!(a, TextAlign::Right);
    }

    fn per_char(s: &str) -> f32 {
        s.chars().count() as f32 * 10.0
    }

    #[test]
    fn test_fits_on_one_line() {
        assert_eq!(wrap_lines("hello", Some(100.0), per_char), ["hello"]);
        assert_eq!(wrap_lines("no limit at all", None, per_char), ["no limit at all"]);
    }

    #[test]
    fn test_wraps_on_spaces() {
        assert_eq!(
            wrap_lines("one two three", Some(80.0), per_char),
            ["one two", "three"]
        );
    }

    #[test]
    fn test_breaks_long_words_between_chars() {
        assert_eq!(
            wrap_lines("안녕하세요반갑습니다", Some(40.0), per_char),
            ["안녕하세", "요반갑습", "니다"]
        );
    }

    #[test]
    fn test_explicit_newlines() {
        assert_eq!(wrap_lines("a\r\n\nb", Some(100.0), per_char), ["a", "", "b"]);
    }
}
