//! Line-number propagation over canonical trees.
//!
//! Both passes only fill in missing lines; a line that has been set is never
//! changed, so running either pass twice gives the same tree.

use crate::sexp::Sexp;

/// Pushes `line` onto every descendant that has none. Descendants that
/// already carry a line pass their own line further down.
pub fn trickle_down(node: &mut Sexp, line: Option<usize>) {
    node.set_line_if_unset(line);
    let line = node.line;
    for child in node.child_nodes_mut() {
        trickle_down(child, line);
    }
}

/// Gives every node without a line the line of its first lined child,
/// working bottom-up. Returns the node's line afterwards.
pub fn trickle_up(node: &mut Sexp) -> Option<usize> {
    let mut first = None;
    for child in node.child_nodes_mut() {
        let line = trickle_up(child);
        if first.is_none() {
            first = line;
        }
    }
    node.set_line_if_unset(first);
    node.line
}
