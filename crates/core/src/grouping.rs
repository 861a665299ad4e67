//! Merging of positioned spans into visual line groups.

use std::cmp::Ordering;

use crate::types::{SpanGroup, TextSpan};

/// Default maximum vertical distance between members of one group.
pub const LINE_THRESHOLD: f32 = 5.0;

/// Default maximum horizontal gap between members of one group.
pub const WORD_THRESHOLD: f32 = 20.0;

/// Group spans that sit on the same visual line.
///
/// Spans are sorted top-to-bottom, then left-to-right. A span joins the open
/// group when its `y` is within `line_threshold` of the group's last member
/// and it starts no more than `word_threshold` to the right of that member's
/// right edge.
pub fn group_spans(spans: &[TextSpan], line_threshold: f32, word_threshold: f32) -> Vec<SpanGroup> {
    if spans.is_empty() {
        return Vec::new();
    }

    let mut sorted: Vec<&TextSpan> = spans.iter().collect();
    sorted.sort_by(|a, b| {
        a.y.partial_cmp(&b.y)
            .unwrap_or(Ordering::Equal)
            .then(a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal))
    });

    let mut groups: Vec<SpanGroup> = Vec::new();
    let mut current: Vec<&TextSpan> = vec![sorted[0]];

    for span in sorted.into_iter().skip(1) {
        let joins = current.last().is_some_and(|last| {
            let y_diff = (span.y - last.y).abs();
            let x_gap = span.x - last.bbox.x1;
            y_diff <= line_threshold && x_gap <= word_threshold
        });

        if joins {
            current.push(span);
        } else {
            groups.push(merge_group(&current));
            current = vec![span];
        }
    }

    groups.push(merge_group(&current));
    groups
}

/// Merge member spans: texts joined by single spaces, position and box from
/// the first member, the largest size, and bold if any member is bold.
fn merge_group(members: &[&TextSpan]) -> SpanGroup {
    let first = members[0];
    let text = members
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let font_size = members
        .iter()
        .map(|s| s.font_size)
        .fold(f32::MIN, f32::max);
    let bold = members.iter().any(|s| s.bold);

    SpanGroup {
        text,
        x: first.x,
        y: first.y,
        font_size,
        bold,
        bbox: first.bbox,
    }
}
