//! Plain-text rendering for terminal summaries.

use crate::tree::{count_nodes, Node, SlowCall};
use crate::utils::config::MAX_TEXT_DEPTH;

/// Render a hierarchy as an indented tree
///
/// ```text
/// OrderController.place (100ms)
/// ├─ OrderService.create (60ms)
/// │  └─ Order.getId x2 (2ms)
/// └─ Mailer.send (30ms) !
/// ```
///
/// Levels below `MAX_TEXT_DEPTH` are collapsed into a single "more calls" line.
pub fn render_tree(root: &Node) -> String {
    let mut lines = vec![node_line(root)];
    let mut pending = Vec::new();
    push_children(root, "", 1, &mut pending);

    while let Some(line) = pending.pop() {
        let (branch, indent) = if line.last {
            ("└─ ", "   ")
        } else {
            ("├─ ", "│  ")
        };

        lines.push(format!("{}{}{}", line.prefix, branch, node_line(line.node)));

        if line.node.children.is_empty() {
            continue;
        }

        let prefix = format!("{}{}", line.prefix, indent);
        if line.depth >= MAX_TEXT_DEPTH {
            lines.push(format!(
                "{}└─ ... {} more calls",
                prefix,
                count_nodes(line.node) - 1
            ));
        } else {
            push_children(line.node, &prefix, line.depth + 1, &mut pending);
        }
    }

    lines.join("\n")
}

/// One line still to be printed
struct PendingLine<'a> {
    node: &'a Node,
    prefix: String,
    last: bool,
    depth: usize,
}

/// Queue `node`'s children so the first one is popped first
fn push_children<'a>(
    node: &'a Node,
    prefix: &str,
    depth: usize,
    pending: &mut Vec<PendingLine<'a>>,
) {
    let last = node.children.len().saturating_sub(1);

    for (i, child) in node.children.iter().enumerate().rev() {
        pending.push(PendingLine {
            node: child,
            prefix: prefix.to_string(),
            last: i == last,
            depth,
        });
    }
}

fn node_line(node: &Node) -> String {
    let mut line = node.record.short_label();

    if node.is_merged() {
        line.push_str(&format!(" x{}", node.merge_count()));
    }

    line.push_str(&format!(" ({}ms)", node.total_duration()));

    if node.record.has_error() {
        line.push_str(" !");
    }

    line
}

/// Table of the slowest calls
pub fn render_slowest_calls(calls: &[SlowCall]) -> String {
    let mut lines = Vec::new();

    lines.push("  SLOWEST CALLS".to_string());
    lines.push(format!(
        "  {:<42} {:>10} {:>6} {:>7}",
        "Call", "ms", "count", "%"
    ));
    lines.push(format!("  {}", "-".repeat(68)));

    for call in calls {
        // Truncate label if too long for display
        let label = if call.label.chars().count() > 42 {
            let tail: String = call
                .label
                .chars()
                .rev()
                .take(39)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            format!("...{}", tail)
        } else {
            call.label.clone()
        };

        lines.push(format!(
            "  {:<42} {:>10} {:>6} {:>6.1}%",
            label, call.duration, call.merged_count, call.percentage
        ));
    }

    lines.join("\n")
}
