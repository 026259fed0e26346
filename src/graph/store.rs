use crate::{
    foundation::core::Point,
    foundation::error::{SceneforgeError, SceneforgeResult},
    graph::id::IdAllocator,
    graph::model::{Edge, Node, NodeKind},
};

/// Optional port names for a new connection.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EdgePorts {
    pub source: Option<String>,
    pub target: Option<String>,
}

/// Holds the current set of nodes and edges, in insertion order.
///
/// Referential integrity is maintained transactionally: an edge only ever
/// exists while both of its endpoint nodes do, and deleting a node removes
/// every touching edge in the same operation.
#[derive(Clone, Debug, Default)]
pub struct GraphStore {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    pub fn contains_edge(&self, id: &str) -> bool {
        self.edge(id).is_some()
    }

    pub fn add_node(&mut self, node: Node) -> SceneforgeResult<()> {
        if self.contains_node(&node.id) {
            return Err(SceneforgeError::duplicate_id(&node.id));
        }
        self.nodes.push(node);
        Ok(())
    }

    /// Bulk insert for multi-node sub-pipelines. Validates every id before
    /// mutating, so a failed batch leaves the store untouched.
    pub fn add_nodes(&mut self, nodes: Vec<Node>) -> SceneforgeResult<()> {
        for (i, node) in nodes.iter().enumerate() {
            if self.contains_node(&node.id) || nodes[..i].iter().any(|n| n.id == node.id) {
                return Err(SceneforgeError::duplicate_id(&node.id));
            }
        }
        self.nodes.extend(nodes);
        Ok(())
    }

    /// Bulk insert for pre-wired edges. Endpoints must already be present.
    pub fn add_edges(&mut self, edges: Vec<Edge>) -> SceneforgeResult<()> {
        for (i, edge) in edges.iter().enumerate() {
            if self.contains_edge(&edge.id) || edges[..i].iter().any(|e| e.id == edge.id) {
                return Err(SceneforgeError::duplicate_id(&edge.id));
            }
            for endpoint in [&edge.source, &edge.target] {
                if !self.contains_node(endpoint) {
                    return Err(SceneforgeError::unknown_endpoint(endpoint));
                }
            }
        }
        self.edges.extend(edges);
        Ok(())
    }

    /// Connect two existing nodes, synthesizing the edge id
    /// `"e-{source}-{target}"` and default styling metadata.
    pub fn connect(
        &mut self,
        source: &str,
        target: &str,
        ports: EdgePorts,
    ) -> SceneforgeResult<&Edge> {
        for endpoint in [source, target] {
            if !self.contains_node(endpoint) {
                return Err(SceneforgeError::unknown_endpoint(endpoint));
            }
        }
        let mut edge = Edge::between(source, target);
        edge.source_port = ports.source;
        edge.target_port = ports.target;
        if self.contains_edge(&edge.id) {
            return Err(SceneforgeError::duplicate_id(&edge.id));
        }
        let index = self.edges.len();
        self.edges.push(edge);
        Ok(&self.edges[index])
    }

    /// Remove a node and, atomically, every edge touching it. Deleting an
    /// absent id is a no-op.
    pub fn delete_node(&mut self, id: &str) {
        let before = self.nodes.len();
        self.nodes.retain(|n| n.id != id);
        if self.nodes.len() != before {
            self.edges.retain(|e| !e.touches(id));
        }
    }

    pub fn delete_edge(&mut self, id: &str) {
        self.edges.retain(|e| e.id != id);
    }

    /// Insert a processing node "into" an existing connection: removes
    /// `edge_id` and replaces it with `edge_in -> node -> edge_out`.
    ///
    /// Fails with `UnknownEdge` when the insertion point vanished between
    /// the gesture and the call.
    pub fn splice_node(
        &mut self,
        edge_id: &str,
        node: Node,
        edge_in: Edge,
        edge_out: Edge,
    ) -> SceneforgeResult<()> {
        if !self.contains_edge(edge_id) {
            return Err(SceneforgeError::unknown_edge(edge_id));
        }
        if self.contains_node(&node.id) {
            return Err(SceneforgeError::duplicate_id(&node.id));
        }
        for edge in [&edge_in, &edge_out] {
            for endpoint in [&edge.source, &edge.target] {
                if *endpoint != node.id && !self.contains_node(endpoint) {
                    return Err(SceneforgeError::unknown_endpoint(endpoint));
                }
            }
        }

        self.delete_edge(edge_id);
        self.nodes.push(node);
        self.edges.push(edge_in);
        self.edges.push(edge_out);
        Ok(())
    }

    /// Insert the stock 3-node image workflow (prompt -> settings ->
    /// preview) with consecutive bare ids, auto-wired, as one transaction.
    pub fn insert_image_workflow(
        &mut self,
        ids: &mut IdAllocator,
        base: Point,
    ) -> SceneforgeResult<[String; 3]> {
        let prompt_id = ids.next_id();
        let settings_id = ids.next_id();
        let preview_id = ids.next_id();

        self.add_nodes(vec![
            Node::new(prompt_id.clone(), NodeKind::Prompt, base),
            Node::new(
                settings_id.clone(),
                NodeKind::ImageSettings,
                Point::new(base.x + 300.0, base.y),
            ),
            Node::new(
                preview_id.clone(),
                NodeKind::ImagePreview,
                Point::new(base.x + 600.0, base.y),
            ),
        ])?;
        self.add_edges(vec![
            Edge::between(prompt_id.clone(), settings_id.clone()),
            Edge::between(settings_id.clone(), preview_id.clone()).to_port("a"),
        ])?;

        Ok([prompt_id, settings_id, preview_id])
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// True when every edge's endpoints are present. Holding after every
    /// operation is the store's core invariant.
    pub fn edges_are_consistent(&self) -> bool {
        self.edges
            .iter()
            .all(|e| self.contains_node(&e.source) && self.contains_node(&e.target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str) -> Node {
        Node::new(id, NodeKind::Prompt, Point::new(0.0, 0.0))
    }

    fn seeded_store() -> GraphStore {
        let mut store = GraphStore::new();
        store.add_node(node("1")).unwrap();
        store.add_node(node("2")).unwrap();
        store.connect("1", "2", EdgePorts::default()).unwrap();
        store
    }

    #[test]
    fn add_node_rejects_duplicate_id() {
        let mut store = seeded_store();
        let err = store.add_node(node("1")).unwrap_err();
        assert!(matches!(err, SceneforgeError::DuplicateId(id) if id == "1"));
    }

    #[test]
    fn add_nodes_is_all_or_nothing() {
        let mut store = seeded_store();
        let err = store
            .add_nodes(vec![node("3"), node("1"), node("4")])
            .unwrap_err();
        assert!(matches!(err, SceneforgeError::DuplicateId(_)));
        assert!(!store.contains_node("3"));
        assert!(!store.contains_node("4"));
    }

    #[test]
    fn connect_rejects_unknown_endpoint() {
        let mut store = seeded_store();
        let err = store.connect("1", "missing", EdgePorts::default()).unwrap_err();
        assert!(matches!(err, SceneforgeError::UnknownEndpoint(id) if id == "missing"));
    }

    #[test]
    fn connect_synthesizes_edge_id_and_style() {
        let store = seeded_store();
        let edge = store.edge("e-1-2").unwrap();
        assert_eq!(edge.style.kind, "smoothstep");
        assert!(edge.style.animated);
    }

    #[test]
    fn delete_node_cascades_edges_and_is_idempotent() {
        let mut store = seeded_store();
        store.delete_node("1");
        assert!(!store.contains_node("1"));
        assert!(store.edges().is_empty());
        assert!(store.edges_are_consistent());

        // Absent id: no-op, not an error.
        store.delete_node("1");
        assert_eq!(store.nodes().len(), 1);
    }

    #[test]
    fn splice_rewires_through_the_new_node() {
        let mut store = seeded_store();
        let mid = node("3");
        let edge_in = Edge::between("1", "3");
        let edge_out = Edge::between("3", "2");
        store.splice_node("e-1-2", mid, edge_in, edge_out).unwrap();

        assert!(!store.contains_edge("e-1-2"));
        assert!(store.contains_edge("e-1-3"));
        assert!(store.contains_edge("e-3-2"));
        assert!(store.edges_are_consistent());
    }

    #[test]
    fn splice_fails_when_insertion_point_vanished() {
        let mut store = seeded_store();
        store.delete_edge("e-1-2");
        let err = store
            .splice_node(
                "e-1-2",
                node("3"),
                Edge::between("1", "3"),
                Edge::between("3", "2"),
            )
            .unwrap_err();
        assert!(matches!(err, SceneforgeError::UnknownEdge(_)));
        assert!(!store.contains_node("3"));
    }

    #[test]
    fn image_workflow_inserts_three_wired_nodes() {
        let mut store = GraphStore::new();
        let mut ids = IdAllocator::with_seed(3);
        let [prompt, settings, preview] = store
            .insert_image_workflow(&mut ids, Point::new(300.0, 200.0))
            .unwrap();
        assert_eq!([prompt.as_str(), settings.as_str(), preview.as_str()], ["3", "4", "5"]);
        assert_eq!(store.nodes().len(), 3);
        assert_eq!(store.edges().len(), 2);
        assert!(store.contains_edge("e-3-4"));
        assert!(store.contains_edge("e-4-5"));
        assert!(store.edges_are_consistent());
    }
}
