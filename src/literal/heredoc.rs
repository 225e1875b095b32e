//! Heredoc openers and squiggly-heredoc dedenting.
//!
//! `<<-` only lets the closing delimiter be indented, so its body is left
//! alone. `<<~` removes the smallest indentation found at the start of any
//! literal body line. Lines that are blank or only whitespace do not count,
//! and neither do lines that start with an interpolation. Tabs advance to
//! the next multiple of eight columns.

const TAB_WIDTH: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeredocKind {
    /// `<<FOO`
    Plain,
    /// `<<-FOO`
    Dash,
    /// `<<~FOO`
    Squiggly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteStyle {
    Double,
    Single,
    Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Heredoc {
    pub kind: HeredocKind,
    pub quote: QuoteStyle,
}

impl Heredoc {
    /// Classifies a heredoc opening token such as `<<~'EOS'`. Returns `None`
    /// for anything that is not a heredoc opener.
    pub fn from_opener(token: &str) -> Option<Self> {
        let rest = token.strip_prefix("<<")?;
        let (kind, rest) = match rest.chars().next() {
            Some('~') => (HeredocKind::Squiggly, &rest[1..]),
            Some('-') => (HeredocKind::Dash, &rest[1..]),
            _ => (HeredocKind::Plain, rest),
        };
        let quote = match rest.chars().next() {
            Some('\'') => QuoteStyle::Single,
            Some('`') => QuoteStyle::Command,
            _ => QuoteStyle::Double,
        };
        Some(Self { kind, quote })
    }
}

/// Dedents the literal segments of a squiggly heredoc body in place.
/// `None` entries stand for interpolated segments.
pub fn dedent_squiggly(parts: &mut [Option<String>]) {
    let Some(width) = common_indent(parts) else {
        return;
    };
    if width == 0 {
        return;
    }
    let mut line_start = true;
    for part in parts.iter_mut() {
        let Some(text) = part else {
            line_start = false;
            continue;
        };
        let mut out = String::with_capacity(text.len());
        for (index, line) in text.split_inclusive('\n').enumerate() {
            if index > 0 || line_start {
                out.push_str(strip_indent(line, width));
            } else {
                out.push_str(line);
            }
        }
        if !text.is_empty() {
            line_start = text.ends_with('\n');
        }
        *text = out;
    }
}

/// Smallest indentation over the body lines that count.
fn common_indent(parts: &[Option<String>]) -> Option<usize> {
    let mut width: Option<usize> = None;
    let mut line_start = true;
    for (position, part) in parts.iter().enumerate() {
        let Some(text) = part else {
            line_start = false;
            continue;
        };
        let followed_by_code = matches!(parts.get(position + 1), Some(None));
        let lines: Vec<&str> = text.split_inclusive('\n').collect();
        for (index, line) in lines.iter().enumerate() {
            if index == 0 && !line_start {
                continue;
            }
            let (indent, rest) = measure(line);
            let runs_into_code = index + 1 == lines.len() && !line.ends_with('\n') && followed_by_code;
            if rest.trim_end_matches(['\n', '\r']).is_empty() && !runs_into_code {
                continue;
            }
            width = Some(width.map_or(indent, |w| w.min(indent)));
        }
        if !text.is_empty() {
            line_start = text.ends_with('\n');
        }
    }
    width
}

/// Column width of the leading whitespace and the text after it.
fn measure(line: &str) -> (usize, &str) {
    let mut column = 0;
    for (offset, ch) in line.char_indices() {
        match ch {
            ' ' => column += 1,
            '\t' => column = (column / TAB_WIDTH + 1) * TAB_WIDTH,
            _ => return (column, &line[offset..]),
        }
    }
    (column, "")
}

/// Removes leading whitespace up to `width` columns. A tab that would cross
/// the boundary is kept.
fn strip_indent(line: &str, width: usize) -> &str {
    let mut column = 0;
    for (offset, ch) in line.char_indices() {
        if column >= width {
            return &line[offset..];
        }
        let next = match ch {
            ' ' => column + 1,
            '\t' => (column / TAB_WIDTH + 1) * TAB_WIDTH,
            _ => return &line[offset..],
        };
        if next > width {
            return &line[offset..];
        }
        column = next;
    }
    ""
}
