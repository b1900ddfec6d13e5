//! Positioned graph - the layout contract handed to renderers

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Layer index per component name, in component order
pub type LayerAssignment = IndexMap<String, usize>;

/// Integer canvas coordinates of a component's anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// One position per canonical component plus the canvas size
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionedGraph {
    pub positions: IndexMap<String, Position>,
    pub canvas_width: u32,
    pub canvas_height: u32,
}

impl PositionedGraph {
    pub fn position(&self, name: &str) -> Option<Position> {
        self.positions.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positioned_graph_json_keys() {
        let mut positions = IndexMap::new();
        positions.insert("Client".to_string(), Position::new(100, 400));
        let graph = PositionedGraph {
            positions,
            canvas_width: 1200,
            canvas_height: 800,
        };

        let json = serde_json::to_value(&graph).unwrap();
        assert_eq!(json["canvasWidth"], 1200);
        assert_eq!(json["canvasHeight"], 800);
        assert_eq!(json["positions"]["Client"]["x"], 100);
        assert_eq!(graph.position("Client"), Some(Position::new(100, 400)));
        assert_eq!(graph.position("Cache"), None);
    }
}
