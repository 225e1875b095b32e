//! Replay of a recorded grammar trace.
//!
//! A trace is what an LR grammar does while it parses: shift a token, push a
//! literal value, reduce the top N values with an event. Replaying it drives
//! any [`ParserEvents`] sink exactly as the grammar would.

use super::{ParserEvents, RubyGrammar};
use crate::config::SourceFile;
use crate::errors::{malformed_node, NormalizeResult};
use crate::raw::{Position, Raw};

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// A scanner token. Its value is pushed when `keep` is set and dropped
    /// otherwise (comments, keywords, punctuation).
    Scan {
        kind: String,
        token: String,
        position: Position,
        keep: bool,
    },
    /// A literal value such as `nil`, `false` or an operator symbol.
    Push(Raw),
    /// Pops `arity` values and pushes the event's result.
    Reduce { event: String, arity: usize },
}

/// A recorded trace, built step by step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventScript {
    steps: Vec<Step>,
}

impl EventScript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Shift a token and keep its value.
    pub fn scan(self, kind: &str, token: &str, line: usize, column: usize) -> Self {
        self.scan_step(kind, token, line, column, true)
    }

    /// Shift a token whose value the grammar does not use.
    pub fn skip(self, kind: &str, token: &str, line: usize, column: usize) -> Self {
        self.scan_step(kind, token, line, column, false)
    }

    pub fn push(mut self, value: Raw) -> Self {
        self.steps.push(Step::Push(value));
        self
    }

    pub fn nil(self) -> Self {
        self.push(Raw::Nil)
    }

    pub fn reduce(mut self, event: &str, arity: usize) -> Self {
        self.steps.push(Step::Reduce {
            event: event.to_string(),
            arity,
        });
        self
    }

    fn scan_step(mut self, kind: &str, token: &str, line: usize, column: usize, keep: bool) -> Self {
        self.steps.push(Step::Scan {
            kind: kind.to_string(),
            token: token.to_string(),
            position: Position::new(line, column),
            keep,
        });
        self
    }
}

impl RubyGrammar for EventScript {
    fn drive(
        &mut self,
        _source: &SourceFile,
        events: &mut dyn ParserEvents,
    ) -> NormalizeResult<Option<Raw>> {
        let mut stack: Vec<Raw> = Vec::new();
        for step in &self.steps {
            match step {
                Step::Scan {
                    kind,
                    token,
                    position,
                    keep,
                } => {
                    let value = events.on_scanner_event(kind, token, *position)?;
                    if *keep {
                        stack.push(value);
                    }
                }
                Step::Push(value) => stack.push(value.clone()),
                Step::Reduce { event, arity } => {
                    if stack.len() < *arity {
                        return Err(malformed_node(
                            event.clone(),
                            format!("needs {} values, {} on the stack", arity, stack.len()),
                        ));
                    }
                    let args = stack.split_off(stack.len() - arity);
                    stack.push(events.on_parser_event(event, args)?);
                }
            }
        }
        match stack.len() {
            0 => Ok(None),
            1 => Ok(stack.pop()),
            n => Err(malformed_node(
                "program",
                format!("{} values left on the stack", n),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::RawNode;

    struct Recorder(Vec<String>);

    impl ParserEvents for Recorder {
        fn on_scanner_event(&mut self, kind: &str, token: &str, position: Position) -> NormalizeResult<Raw> {
            self.0.push(format!("scan {}", kind));
            Ok(Raw::Node(RawNode::token(kind, token, position)))
        }

        fn on_parser_event(&mut self, event: &str, args: Vec<Raw>) -> NormalizeResult<Raw> {
            self.0.push(format!("{}/{}", event, args.len()));
            Ok(Raw::Node(RawNode::new(event, args)))
        }
    }

    #[test]
    fn replays_in_order() {
        let mut script = EventScript::new()
            .scan("ident", "foo", 1, 0)
            .reduce("vcall", 1)
            .skip("comment", "# x\n", 1, 4)
            .reduce("program", 1);
        let mut recorder = Recorder(Vec::new());
        let raw = script
            .drive(&SourceFile::named("t"), &mut recorder)
            .unwrap()
            .unwrap();
        assert_eq!(recorder.0, ["scan ident", "vcall/1", "scan comment", "program/1"]);
        assert_eq!(raw.to_string(), r#"[:program, [:vcall, [:@ident, "foo", [1, 0]]]]"#);
    }

    #[test]
    fn underflow_is_reported() {
        let mut script = EventScript::new().reduce("binary", 3);
        let mut recorder = Recorder(Vec::new());
        assert!(script.drive(&SourceFile::named("t"), &mut recorder).is_err());
    }
}
