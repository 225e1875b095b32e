//! Rendering of canonical trees and errors for the terminal.

use super::args::OutputFormat;
use crate::sexp::Sexp;

/// Renders one normalized tree; an empty program prints as `nil`.
pub fn render(tree: Option<&Sexp>, format: OutputFormat, lines: bool) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(&tree),
        OutputFormat::Sexp => Ok(match tree {
            None => "nil".to_string(),
            Some(tree) if lines => tree.to_string_with_lines(),
            Some(tree) => tree.to_string(),
        }),
    }
}

/// Prints any diagnostic with miette's report formatting.
pub fn print_error(error: impl miette::Diagnostic + Send + Sync + 'static) {
    eprintln!("{:?}", miette::Report::new(error));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::s;
    use crate::sexp::{sym, Item};

    #[test]
    fn empty_programs_render_as_nil() {
        assert_eq!(render(None, OutputFormat::Sexp, false).unwrap(), "nil");
    }

    #[test]
    fn json_carries_tags_and_lines() {
        let tree = s!("call"; Item::Nil, sym("foo")).with_line(Some(3));
        let json = render(Some(&tree), OutputFormat::Json, false).unwrap();
        assert!(json.contains("\"tag\": \"call\""));
        assert!(json.contains("\"line\": 3"));
    }
}
