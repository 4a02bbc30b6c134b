//! Box layout and connection routing
//!
//! Boxes are sized from their measured text and registered on a
//! [`LogicTree`]; the router turns pairs of boxes into waypoint paths that
//! the geometry engine outlines.

pub mod config;
pub mod error;
pub mod routing;
pub mod text;
pub mod tree;
pub mod types;

pub use config::TreeConfig;
pub use error::LayoutError;
pub use routing::{
    route_bisplit, route_connection, route_curve, Branch, CurveStyle, RouteOptions, RoutingMode,
    SplitRoute,
};
pub use text::{CharWidthMeasure, TextMeasure};
pub use tree::*;
pub use types::*;

/// Compute Levenshtein edit distance between two strings
fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let m = a_chars.len();
    let n = b_chars.len();

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    let mut prev: Vec<usize> = (0..=n).collect();
    let mut row = vec![0usize; n + 1];

    for i in 1..=m {
        row[0] = i;
        for j in 1..=n {
            let cost = usize::from(a_chars[i - 1] != b_chars[j - 1]);
            row[j] = (prev[j] + 1).min(row[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut row);
    }

    prev[n]
}

/// Box names within `max_distance` edits of `target`, closest first
pub(crate) fn find_similar(target: &str, names: &[&str], max_distance: usize) -> Vec<String> {
    let mut candidates: Vec<(&str, usize)> = names
        .iter()
        .filter_map(|name| {
            let dist = levenshtein_distance(name, target);
            (dist <= max_distance && dist > 0).then_some((*name, dist))
        })
        .collect();

    candidates.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)));
    candidates
        .into_iter()
        .map(|(name, _)| name.to_string())
        .take(3)
        .collect()
}
