use crate::domain::entities::options::SortDirection;
use crate::domain::entities::order_line::{OrderLine, OutputRow};

/// Stable sort on the group key, then the order id, so lines inside a group
/// come out in order-id order. Fully equal lines keep their input order in
/// both directions.
pub fn sort_lines(lines: &mut [OrderLine], direction: SortDirection) {
    let by_key = |a: &OrderLine, b: &OrderLine| {
        a.group_key
            .key_cmp(&b.group_key)
            .then_with(|| a.order_id.key_cmp(&b.order_id))
    };
    match direction {
        SortDirection::Asc => lines.sort_by(by_key),
        SortDirection::Desc => lines.sort_by(|a, b| by_key(b, a)),
    }
}

/// Runs of adjacent lines with equal keys. Only partitions by key when the
/// input is already sorted on that key.
pub fn group_lines(lines: &[OrderLine]) -> Vec<&[OrderLine]> {
    lines
        .chunk_by(|prev, next| prev.group_key.same_key(&next.group_key))
        .collect()
}

/// Each group's projected lines followed by one separator.
pub fn separate_groups(groups: &[&[OrderLine]]) -> Vec<OutputRow> {
    let mut rows = Vec::with_capacity(groups.iter().map(|g| g.len() + 1).sum());
    for group in groups {
        rows.extend(group.iter().map(|line| OutputRow::Line(line.project())));
        rows.push(OutputRow::Separator);
    }
    rows
}
