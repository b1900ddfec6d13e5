//! Layered layout - assigns every component a layer and a canvas position

use archgraph_core::layout::LayerAssignment;
use archgraph_core::{Graph, Position, PositionedGraph};
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, instrument};

pub const CANVAS_WIDTH: u32 = 1200;
pub const CANVAS_HEIGHT: u32 = 800;
pub const MARGIN: i32 = 100;
pub const LAYER_SPACING: i32 = 250;
pub const NODE_SPACING: i32 = 150;
/// Passes of the cycle-tolerant layering before giving up on leftovers
pub const MAX_PEEL_PASSES: usize = 10;

/// Canvas geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub margin: i32,
    pub layer_spacing: i32,
    pub node_spacing: i32,
    pub max_peel_passes: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            margin: MARGIN,
            layer_spacing: LAYER_SPACING,
            node_spacing: NODE_SPACING,
            max_peel_passes: MAX_PEEL_PASSES,
        }
    }
}

/// Left-to-right layered layout: one column per layer, each column
/// centered vertically on the canvas
#[derive(Debug, Clone, Default)]
pub struct GraphLayout {
    config: LayoutConfig,
}

impl GraphLayout {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Position every component of `graph`
    #[instrument(skip_all, fields(components = graph.components().len()))]
    pub fn layout(&self, graph: &Graph) -> PositionedGraph {
        let layers = self.assign_layers(graph);

        let mut columns: BTreeMap<usize, Vec<&str>> = BTreeMap::new();
        for (name, layer) in &layers {
            columns.entry(*layer).or_default().push(name.as_str());
        }

        let mut placed: HashMap<&str, Position> = HashMap::new();
        let height = f64::from(self.config.canvas_height);
        let spacing = f64::from(self.config.node_spacing);
        for (layer, names) in &columns {
            let x = self.config.margin + *layer as i32 * self.config.layer_spacing;
            let span = (names.len() - 1) as f64 * spacing;
            let start_y = (height - span) / 2.0;
            for (j, name) in names.iter().enumerate() {
                let y = start_y + j as f64 * spacing;
                placed.insert(*name, Position::new(x, y as i32));
            }
        }

        let positions = graph
            .components()
            .iter()
            .filter_map(|name| placed.get(name.as_str()).map(|p| (name.clone(), *p)))
            .collect();

        PositionedGraph {
            positions,
            canvas_width: self.config.canvas_width,
            canvas_height: self.config.canvas_height,
        }
    }

    /// Layer per component, in component order.
    ///
    /// Acyclic graphs get longest-path layers, so every edge points at
    /// least one layer to the right. Graphs with a cycle fall back to
    /// peeling, which always terminates but may leave back-edges.
    ///
    /// Peeling stops at the first pass that places nothing. Leftovers go one
    /// layer past the highest assigned one, not to a fixed layer after the
    /// pass cap.
    pub fn assign_layers(&self, graph: &Graph) -> LayerAssignment {
        let (digraph, nodes) = build_digraph(graph);

        let layers = match toposort(&digraph, None) {
            Ok(order) => longest_path_layers(&digraph, &order),
            Err(cycle) => {
                debug!(
                    "Cycle through '{}', using peeling layering",
                    digraph[cycle.node_id()]
                );
                self.peel_layers(&digraph)
            }
        };

        nodes
            .into_iter()
            .map(|(name, idx)| (name, layers.get(&idx).copied().unwrap_or(0)))
            .collect()
    }

    fn peel_layers(&self, digraph: &DiGraph<&str, &str>) -> HashMap<NodeIndex, usize> {
        let mut layers: HashMap<NodeIndex, usize> = digraph
            .node_indices()
            .filter(|idx| {
                digraph
                    .neighbors_directed(*idx, Direction::Incoming)
                    .next()
                    .is_none()
            })
            .map(|idx| (idx, 0))
            .collect();

        let mut layer = 1;
        for _ in 0..self.config.max_peel_passes {
            if layers.len() == digraph.node_count() {
                break;
            }
            let ready: Vec<NodeIndex> = digraph
                .node_indices()
                .filter(|idx| !layers.contains_key(idx))
                .filter(|idx| {
                    digraph
                        .neighbors_directed(*idx, Direction::Incoming)
                        .all(|pred| layers.contains_key(&pred))
                })
                .collect();
            if ready.is_empty() {
                break;
            }
            for idx in ready {
                layers.insert(idx, layer);
            }
            layer += 1;
        }

        let final_layer = layers.values().max().map_or(0, |max| max + 1);
        for idx in digraph.node_indices() {
            layers.entry(idx).or_insert(final_layer);
        }
        layers
    }
}

/// One node per component, one edge per relationship
fn build_digraph(graph: &Graph) -> (DiGraph<&str, &str>, Vec<(String, NodeIndex)>) {
    let mut digraph = DiGraph::new();
    let mut index: HashMap<&str, NodeIndex> = HashMap::new();
    let mut nodes = Vec::with_capacity(graph.components().len());

    for name in graph.components() {
        let idx = digraph.add_node(name.as_str());
        index.insert(name.as_str(), idx);
        nodes.push((name.clone(), idx));
    }
    for rel in graph.relationships() {
        if let (Some(from), Some(to)) = (index.get(rel.from.as_str()), index.get(rel.to.as_str())) {
            digraph.add_edge(*from, *to, rel.rel_type.as_str());
        }
    }

    (digraph, nodes)
}

fn longest_path_layers(
    digraph: &DiGraph<&str, &str>,
    order: &[NodeIndex],
) -> HashMap<NodeIndex, usize> {
    let mut layers: HashMap<NodeIndex, usize> = HashMap::with_capacity(order.len());
    for idx in order {
        let layer = digraph
            .neighbors_directed(*idx, Direction::Incoming)
            .filter_map(|pred| layers.get(&pred).copied())
            .max()
            .map_or(0, |max| max + 1);
        layers.insert(*idx, layer);
    }
    layers
}

#[cfg(test)]
mod tests {
    use super::*;
    use archgraph_core::Relationship;

    fn graph(components: &[&str], edges: &[(&str, &str)]) -> Graph {
        Graph::new(
            components.iter().map(|s| s.to_string()).collect(),
            edges
                .iter()
                .map(|(from, to)| Relationship::new(*from, *to, "request"))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_one_root_two_children() {
        let g = graph(&["Gateway", "Orders", "Users"], &[("Gateway", "Orders"), ("Gateway", "Users")]);
        let positioned = GraphLayout::default().layout(&g);

        assert_eq!(positioned.canvas_width, 1200);
        assert_eq!(positioned.canvas_height, 800);
        assert_eq!(positioned.position("Gateway"), Some(Position::new(100, 400)));
        assert_eq!(positioned.position("Orders"), Some(Position::new(350, 325)));
        assert_eq!(positioned.position("Users"), Some(Position::new(350, 475)));
    }

    #[test]
    fn test_longest_path_layers() {
        let g = graph(
            &["Client", "Gateway", "Service", "Database"],
            &[
                ("Client", "Gateway"),
                ("Gateway", "Service"),
                ("Service", "Database"),
                ("Client", "Database"),
            ],
        );
        let layers = GraphLayout::default().assign_layers(&g);
        assert_eq!(layers["Client"], 0);
        assert_eq!(layers["Gateway"], 1);
        assert_eq!(layers["Service"], 2);
        assert_eq!(layers["Database"], 3);
    }

    #[test]
    fn test_acyclic_edges_point_right() {
        let g = graph(
            &["A", "B", "C", "D", "E", "F"],
            &[("A", "C"), ("B", "C"), ("C", "D"), ("A", "E"), ("E", "D"), ("D", "F"), ("B", "F")],
        );
        let layers = GraphLayout::default().assign_layers(&g);
        for rel in g.relationships() {
            assert!(layers[&rel.to] >= layers[&rel.from] + 1, "{}", rel);
        }
    }

    #[test]
    fn test_isolated_nodes_share_layer_zero() {
        let g = graph(&["A", "B"], &[]);
        let positioned = GraphLayout::default().layout(&g);
        assert_eq!(positioned.position("A"), Some(Position::new(100, 325)));
        assert_eq!(positioned.position("B"), Some(Position::new(100, 475)));
    }

    #[test]
    fn test_crowded_column_goes_above_canvas() {
        let names: Vec<String> = (0..8).map(|i| format!("N{}", i)).collect();
        let g = Graph::new(names, vec![]).unwrap();
        let positioned = GraphLayout::default().layout(&g);
        assert_eq!(positioned.position("N0"), Some(Position::new(100, -125)));
        assert_eq!(positioned.position("N7"), Some(Position::new(100, 925)));
    }

    #[test]
    fn test_cycle_with_entry_point() {
        let g = graph(
            &["Client", "Service", "Worker", "Queue"],
            &[
                ("Client", "Service"),
                ("Service", "Queue"),
                ("Queue", "Worker"),
                ("Worker", "Service"),
            ],
        );
        let layers = GraphLayout::default().assign_layers(&g);
        assert_eq!(layers.len(), 4);
        assert_eq!(layers["Client"], 0);
        // the cycle never frees up, so its members share the final layer
        assert_eq!(layers["Service"], 1);
        assert_eq!(layers["Worker"], 1);
        assert_eq!(layers["Queue"], 1);
    }

    #[test]
    fn test_cycle_with_downstream_chain() {
        let g = graph(
            &["A", "B", "Root", "C", "D"],
            &[("A", "B"), ("B", "A"), ("Root", "C"), ("C", "D")],
        );
        let layers = GraphLayout::default().assign_layers(&g);
        assert_eq!(layers["Root"], 0);
        assert_eq!(layers["C"], 1);
        assert_eq!(layers["D"], 2);
        assert_eq!(layers["A"], 3);
        assert_eq!(layers["B"], 3);
    }

    #[test]
    fn test_pure_cycle_terminates() {
        let g = graph(&["A", "B", "C"], &[("A", "B"), ("B", "C"), ("C", "A")]);
        let positioned = GraphLayout::default().layout(&g);
        assert_eq!(positioned.positions.len(), 3);
        for name in ["A", "B", "C"] {
            assert_eq!(positioned.position(name).map(|p| p.x), Some(100));
        }
    }

    #[test]
    fn test_self_loop_is_a_cycle() {
        let g = Graph::new(
            vec!["Retry".into(), "Sink".into()],
            vec![
                Relationship::new("Retry", "Retry", "request"),
                Relationship::new("Retry", "Sink", "request"),
            ],
        )
        .unwrap();
        let layers = GraphLayout::default().assign_layers(&g);
        assert_eq!(layers.len(), 2);
        assert_eq!(layers["Retry"], layers["Sink"]);
    }

    #[test]
    fn test_peeling_respects_pass_cap() {
        let names: Vec<String> = (0..15).map(|i| format!("N{:02}", i)).collect();
        let mut rels: Vec<Relationship> = names
            .windows(2)
            .map(|w| Relationship::new(w[0].clone(), w[1].clone(), "request"))
            .collect();
        rels.push(Relationship::new("X", "Y", "request"));
        rels.push(Relationship::new("Y", "X", "request"));
        let mut all = names.clone();
        all.push("X".into());
        all.push("Y".into());
        let g = Graph::new(all, rels).unwrap();

        let layers = GraphLayout::default().assign_layers(&g);
        assert_eq!(layers["N00"], 0);
        assert_eq!(layers["N10"], 10);
        // chain members past the cap land on the final layer with the cycle
        assert_eq!(layers["N11"], 11);
        assert_eq!(layers["N14"], 11);
        assert_eq!(layers["X"], 11);
        assert_eq!(layers.len(), 17);
    }
}
