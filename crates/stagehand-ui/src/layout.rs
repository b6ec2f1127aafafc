//! Menu item placement. Every function here positions the given nodes
//! relative to their parent's origin and leaves everything else alone.
//!
//! Spacing uses each node's content size multiplied by its own scale. A NaN
//! dimension counts as zero.

use stagehand_core::*;

pub const DEFAULT_PADDING: f32 = 5.0;

/// Gap between rows and columns in the grid layouts.
pub const GRID_GAP: f32 = 5.0;

fn scaled_size(tree: &NodeTree, id: NodeId) -> Size {
    let Some(n) = tree.get(id) else {
        return Size::ZERO;
    };
    let w = n.content_size.width * n.scale_x;
    let h = n.content_size.height * n.scale_y;
    Size::new(
        if w.is_nan() { 0.0 } else { w },
        if h.is_nan() { 0.0 } else { h },
    )
}

fn place(tree: &mut NodeTree, id: NodeId, at: Vec2) {
    if let Some(n) = tree.get_mut(id) {
        n.position = at;
    }
}

/// Splits `items` into consecutive groups of `counts[i]` items.
///
/// Panics if a count is zero or the counts do not add up to exactly
/// `items.len()`.
fn partition<'a>(items: &'a [NodeId], counts: &[u32], what: &str) -> Vec<&'a [NodeId]> {
    let mut groups = Vec::with_capacity(counts.len());
    let mut rest = items;
    for &count in counts {
        assert!(count > 0, "grid layout: a {what} cannot hold zero items");
        let count = count as usize;
        assert!(
            count <= rest.len(),
            "grid layout: {what} counts ask for more items than the menu has"
        );
        let (group, tail) = rest.split_at(count);
        groups.push(group);
        rest = tail;
    }
    assert!(
        rest.is_empty(),
        "grid layout: {} item(s) left over after the last {what}",
        rest.len()
    );
    groups
}

pub fn align_items_vertically(tree: &mut NodeTree, items: &[NodeId]) {
    align_items_vertically_with_padding(tree, items, DEFAULT_PADDING);
}

/// Stacks items top to bottom, centered on the parent origin.
pub fn align_items_vertically_with_padding(tree: &mut NodeTree, items: &[NodeId], padding: f32) {
    let height: f32 = items
        .iter()
        .map(|&id| scaled_size(tree, id).height + padding)
        .sum::<f32>()
        - padding;

    let mut y = height / 2.0;
    for &id in items {
        let h = scaled_size(tree, id).height;
        place(tree, id, Vec2::new(0.0, y - h / 2.0));
        y -= h + padding;
    }
}

pub fn align_items_horizontally(tree: &mut NodeTree, items: &[NodeId]) {
    align_items_horizontally_with_padding(tree, items, DEFAULT_PADDING);
}

/// Lines items up left to right, centered on the parent origin.
pub fn align_items_horizontally_with_padding(tree: &mut NodeTree, items: &[NodeId], padding: f32) {
    let width: f32 = items
        .iter()
        .map(|&id| scaled_size(tree, id).width + padding)
        .sum::<f32>()
        - padding;

    let mut x = -width / 2.0;
    for &id in items {
        let w = scaled_size(tree, id).width;
        place(tree, id, Vec2::new(x + w / 2.0, 0.0));
        x += w + padding;
    }
}

/// Grid filled row by row. `rows[i]` is the number of items in row `i`;
/// each row spreads its items evenly across `win_width`.
///
/// Panics unless `rows` partitions `items` exactly.
pub fn align_items_in_columns(tree: &mut NodeTree, items: &[NodeId], rows: &[u32], win_width: f32) {
    let rows = partition(items, rows, "row");
    let row_heights: Vec<f32> = rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|&id| scaled_size(tree, id).height)
                .fold(0.0, f32::max)
        })
        .collect();
    let height = row_heights.iter().map(|h| h + GRID_GAP).sum::<f32>() - GRID_GAP;

    let mut y = height / 2.0;
    for (row, row_height) in rows.iter().zip(&row_heights) {
        let w = win_width / (1 + row.len()) as f32;
        let mut x = w;
        for &id in *row {
            let h = scaled_size(tree, id).height;
            place(tree, id, Vec2::new(x - win_width / 2.0, y - h / 2.0));
            x += w;
        }
        y -= row_height + GRID_GAP;
    }
}

/// Grid filled column by column. `columns[i]` is the number of items in
/// column `i`; columns are packed side by side and centered as a block,
/// each column stacked from its own top.
///
/// Panics unless `columns` partitions `items` exactly.
pub fn align_items_in_rows(tree: &mut NodeTree, items: &[NodeId], columns: &[u32]) {
    let columns = partition(items, columns, "column");
    let widths: Vec<f32> = columns
        .iter()
        .map(|col| {
            col.iter()
                .map(|&id| scaled_size(tree, id).width)
                .fold(0.0, f32::max)
        })
        .collect();
    let heights: Vec<f32> = columns
        .iter()
        .map(|col| {
            col.iter()
                .map(|&id| scaled_size(tree, id).height + GRID_GAP)
                .sum::<f32>()
                - GRID_GAP
        })
        .collect();
    let width = widths.iter().map(|w| w + GRID_GAP).sum::<f32>() - GRID_GAP;

    let mut x = -width / 2.0;
    for ((col, col_width), col_height) in columns.iter().zip(&widths).zip(&heights) {
        let mut y = col_height / 2.0;
        for &id in *col {
            let h = scaled_size(tree, id).height;
            place(tree, id, Vec2::new(x + col_width / 2.0, y - h / 2.0));
            y -= h + GRID_GAP;
        }
        x += col_width + GRID_GAP;
    }
}
