use crate::{
    foundation::core::Point,
    foundation::error::SceneforgeResult,
    graph::model::{Edge, Node},
    graph::store::{EdgePorts, GraphStore},
};

/// Borrowed view of the graph handed to the canvas collaborator, which
/// renders it with its `NodeKind -> renderer` registry.
#[derive(Clone, Debug, serde::Serialize)]
pub struct GraphSnapshot<'a> {
    pub nodes: &'a [Node],
    pub edges: &'a [Edge],
}

impl GraphStore {
    pub fn snapshot(&self) -> GraphSnapshot<'_> {
        GraphSnapshot {
            nodes: self.nodes(),
            edges: self.edges(),
        }
    }
}

/// A user gesture on a node, reported back by the canvas.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum NodeChange {
    Position { id: String, position: Point },
    Remove { id: String },
}

/// A user gesture on an edge, reported back by the canvas.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum EdgeChange {
    Remove { id: String },
}

/// Apply a canvas node patch. Unknown ids are skipped: the gesture may
/// race a cascade delete, and the canvas re-syncs from the next snapshot.
pub fn apply_node_changes(store: &mut GraphStore, changes: &[NodeChange]) {
    for change in changes {
        match change {
            NodeChange::Position { id, position } => {
                if let Some(node) = store.node_mut(id) {
                    node.position = *position;
                }
            }
            NodeChange::Remove { id } => store.delete_node(id),
        }
    }
}

pub fn apply_edge_changes(store: &mut GraphStore, changes: &[EdgeChange]) {
    for change in changes {
        match change {
            EdgeChange::Remove { id } => store.delete_edge(id),
        }
    }
}

/// The canvas `onConnect` gesture.
pub fn on_connect(
    store: &mut GraphStore,
    source: &str,
    target: &str,
    ports: EdgePorts,
) -> SceneforgeResult<()> {
    store.connect(source, target, ports).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::model::NodeKind;

    fn two_node_store() -> GraphStore {
        let mut store = GraphStore::new();
        store
            .add_node(Node::new("1", NodeKind::Prompt, Point::new(0.0, 0.0)))
            .unwrap();
        store
            .add_node(Node::new("2", NodeKind::ImageSettings, Point::new(10.0, 0.0)))
            .unwrap();
        store
    }

    #[test]
    fn position_change_moves_the_node() {
        let mut store = two_node_store();
        apply_node_changes(
            &mut store,
            &[NodeChange::Position {
                id: "1".into(),
                position: Point::new(50.0, 60.0),
            }],
        );
        assert_eq!(store.node("1").unwrap().position, Point::new(50.0, 60.0));
    }

    #[test]
    fn remove_change_cascades_like_delete_node() {
        let mut store = two_node_store();
        on_connect(&mut store, "1", "2", EdgePorts::default()).unwrap();
        apply_node_changes(&mut store, &[NodeChange::Remove { id: "2".into() }]);
        assert!(store.edges().is_empty());
        assert!(store.edges_are_consistent());
    }

    #[test]
    fn snapshot_serializes_for_the_canvas() {
        let mut store = two_node_store();
        on_connect(&mut store, "1", "2", EdgePorts::default()).unwrap();
        let json = serde_json::to_value(store.snapshot()).unwrap();
        assert_eq!(json["nodes"].as_array().unwrap().len(), 2);
        assert_eq!(json["edges"][0]["id"], "e-1-2");
    }
}
