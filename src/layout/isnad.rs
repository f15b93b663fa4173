//! Chain layout: rows by position, columns by distinct narrator at that position

use std::collections::{HashMap, HashSet};
use crate::backend::HadithIsnad;
use super::{GraphData, GraphLink, GraphNode};

/// Node box and spacing used by the chain layout
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainMetrics {
    pub width: f64,
    pub node_width: f64,
    pub node_height: f64,
}

impl ChainMetrics {
    pub fn for_width(width: f64) -> Self {
        Self {
            width,
            node_width: 120.0,
            node_height: 140.0,
        }
    }

    pub fn vertical_spacing(&self) -> f64 {
        self.node_height * 1.5
    }

    pub fn top_margin(&self) -> f64 {
        self.node_height / 2.0
    }

    pub fn horizontal_offset(&self) -> f64 {
        self.node_width
    }

    pub fn root_x(&self) -> f64 {
        self.width / 2.0
    }
}

impl Default for ChainMetrics {
    fn default() -> Self {
        Self::for_width(super::DEFAULT_WIDTH)
    }
}

/// Lay out every chain of a hadith.
///
/// Row `i` holds the narrators found at index `i` of any chain. A narrator shared by
/// several chains is placed once, where it is first met, and keeps that position. Every
/// chain contributes a link per adjacent pair, so shared segments repeat their links.
pub fn layout_isnad(isnad: &HadithIsnad, metrics: ChainMetrics) -> GraphData {
    let mut graph = GraphData::default();

    let mut levels: HashMap<usize, Vec<&str>> = HashMap::new();
    for chain in &isnad.chains {
        for (index, narrator) in chain.narrators.iter().enumerate() {
            let level = levels.entry(index).or_default();
            if !level.contains(&narrator.id.as_str()) {
                level.push(&narrator.id);
            }
        }
    }

    let offset = metrics.horizontal_offset();
    let min_x = offset;
    let max_x = metrics.width - offset;
    let mut seen: HashSet<&str> = HashSet::new();

    for chain in &isnad.chains {
        let mut parent_x: Option<f64> = None;

        for (index, narrator) in chain.narrators.iter().enumerate() {
            if seen.insert(&narrator.id) {
                let y = metrics.top_margin() + index as f64 * metrics.vertical_spacing();
                let level = levels.get(&index).map(Vec::as_slice).unwrap_or(&[]);
                let slot = level.iter().position(|id| *id == narrator.id).unwrap_or(0);

                let x = if level.len() == 1 {
                    metrics.root_x()
                } else {
                    parent_x.unwrap_or_else(|| {
                        let spread = (metrics.width - 2.0 * offset) / (level.len().saturating_sub(1).max(1)) as f64;
                        offset + slot as f64 * spread
                    })
                };
                // max/min rather than clamp: a canvas narrower than two offsets must not panic
                let x = x.min(max_x).max(min_x);
                parent_x = Some(x);

                graph.nodes.push(GraphNode::for_isnad_narrator(narrator, x, y).pinned());
            }

            if let Some(next) = chain.narrators.get(index + 1) {
                graph.links.push(GraphLink::straight(&narrator.id, &next.id));
            }
        }
    }

    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{IsnadNarrator, Sanad};

    fn narrator(id: &str) -> IsnadNarrator {
        IsnadNarrator {
            id: id.to_string(),
            name: format!("narrator {id}"),
            grade: None,
        }
    }

    fn isnad(chains: &[&[&str]]) -> HadithIsnad {
        HadithIsnad {
            hadith_no: "1".to_string(),
            chains: chains
                .iter()
                .enumerate()
                .map(|(i, ids)| Sanad {
                    sanad_no: (i + 1).to_string(),
                    narrators: ids.iter().map(|id| narrator(id)).collect(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_single_chain_is_a_centered_column() {
        let graph = layout_isnad(&isnad(&[&["a", "b", "c"]]), ChainMetrics::default());

        assert_eq!(graph.nodes.len(), 3);
        for (i, node) in graph.nodes.iter().enumerate() {
            assert_eq!(node.x, 400.0);
            assert_eq!(node.y, 70.0 + i as f64 * 210.0);
            assert_eq!(node.fx, Some(node.x));
            assert_eq!(node.fy, Some(node.y));
        }

        let pairs: Vec<_> = graph.links.iter().map(|l| (l.source.as_str(), l.target.as_str())).collect();
        assert_eq!(pairs, vec![("a", "b"), ("b", "c")]);
    }

    #[test]
    fn test_branching_chains_spread_and_follow_parent() {
        // shared root, two branches of two narrators each
        let graph = layout_isnad(
            &isnad(&[&["root", "b1", "c1"], &["root", "b2", "c2"]]),
            ChainMetrics::default(),
        );

        assert_eq!(graph.nodes.len(), 5);
        assert_eq!(graph.node("root").unwrap().x, 400.0);

        // first chain: parent x is the root's, so the branch stays under it
        assert_eq!(graph.node("b1").unwrap().x, 400.0);
        assert_eq!(graph.node("c1").unwrap().x, 400.0);

        // second chain: root already placed, parent unset, so b2 takes its slot in the row
        let b2 = graph.node("b2").unwrap();
        assert_eq!(b2.x, 120.0 + 1.0 * (800.0 - 240.0));
        assert_eq!(b2.y, 280.0);
        assert_eq!(graph.node("c2").unwrap().x, b2.x);
    }

    #[test]
    fn test_links_repeat_for_shared_segments() {
        let graph = layout_isnad(&isnad(&[&["a", "b"], &["a", "b"]]), ChainMetrics::default());
        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.links.len(), 2);
    }

    #[test]
    fn test_x_is_clamped_into_canvas() {
        let metrics = ChainMetrics::for_width(300.0);
        let graph = layout_isnad(&isnad(&[&["a", "x"], &["b", "y"], &["c", "z"]]), metrics);
        for node in &graph.nodes {
            assert!(node.x >= 120.0 && node.x <= 180.0, "x = {}", node.x);
        }
    }

    #[test]
    fn test_empty_isnad() {
        let graph = layout_isnad(&isnad(&[]), ChainMetrics::default());
        assert!(graph.is_empty());
        assert!(graph.links.is_empty());
    }
}
