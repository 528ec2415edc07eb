//! Node and edge arena
//!
//! `GraphStore` owns every node and edge. Nodes are addressed by [`NodeId`]
//! and edges by [`EdgeId`], both plain indices into the store's vectors, so
//! the cross references between nodes and edges are never dangling and the
//! whole graph is released at once when the store is dropped.
//!
//! The store has no interior synchronisation. Mutation takes `&mut self`, so
//! the single writer is whoever owns the store; see [`crate::pipeline`].

use ahash::AHashMap;

use super::colorizer::NodeColor;
use crate::kmer::{Kmer, Orientation};

/// Handle of a node in a [`GraphStore`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Index of the node in [`GraphStore::nodes`]
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Handle of an edge in a [`GraphStore`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(usize);

impl EdgeId {
    /// Index of the edge in [`GraphStore::edges`]
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// One canonical k-mer in the graph
#[derive(Debug, Clone)]
pub struct Node {
    kmer: Kmer,
    /// Haplotype classification, assigned by the colorizer
    pub color: NodeColor,
    /// Marker value recorded when the node was created
    pub value: u64,
    out_fwd: Vec<EdgeId>,
    out_rev: Vec<EdgeId>,
}

impl Node {
    fn new(kmer: Kmer, value: u64) -> Self {
        Self {
            kmer,
            color: NodeColor::default(),
            value,
            out_fwd: Vec::new(),
            out_rev: Vec::new(),
        }
    }

    /// Canonical k-mer; never changes after creation
    #[inline]
    pub fn kmer(&self) -> Kmer {
        self.kmer
    }

    /// Edges leaving the given strand of this node, in insertion order
    #[inline]
    pub fn outgoing(&self, orientation: Orientation) -> &[EdgeId] {
        match orientation {
            Orientation::Forward => &self.out_fwd,
            Orientation::Reverse => &self.out_rev,
        }
    }

    /// Number of outgoing edges over both strands
    pub fn degree(&self) -> usize {
        self.out_fwd.len() + self.out_rev.len()
    }
}

/// Directed adjacency between two node strands, weighted by supporting reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    /// Origin node
    pub from: NodeId,
    /// Strand of the origin node
    pub orient_from: Orientation,
    /// Target node
    pub to: NodeId,
    /// Strand of the target node
    pub orient_to: Orientation,
    /// Number of observations of this exact adjacency
    pub weight: u64,
    /// Whether the two k-mers were seen as consecutive windows of a read,
    /// overlapping by `k - 1` bases
    pub overlapping: bool,
}

/// Owner of all nodes and edges of the linkage graph
#[derive(Debug, Default)]
pub struct GraphStore {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    index: AHashMap<Kmer, NodeId>,
}

impl GraphStore {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the node for a k-mer, creating it if needed
    ///
    /// The k-mer is canonicalised first, so a k-mer and its reverse
    /// complement resolve to the same node.
    #[inline]
    pub fn get_or_create_node(&mut self, kmer: Kmer) -> NodeId {
        self.get_or_create_node_with_value(kmer, 0)
    }

    /// Like [`get_or_create_node`](Self::get_or_create_node), recording
    /// `value` if the node is new. An existing node keeps its value.
    pub fn get_or_create_node_with_value(&mut self, kmer: Kmer, value: u64) -> NodeId {
        let canonical = kmer.canonical();
        if let Some(&id) = self.index.get(&canonical) {
            return id;
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(canonical, value));
        self.index.insert(canonical, id);
        id
    }

    /// Record one observation of `from(orient_from) -> to(orient_to)`
    ///
    /// Increments the weight of the matching edge or creates it with weight 1.
    /// Self-loops are ordinary edges. The two k-mers are taken to be
    /// consecutive windows of a read.
    #[inline]
    pub fn add_or_merge_edge(
        &mut self,
        from: NodeId,
        orient_from: Orientation,
        to: NodeId,
        orient_to: Orientation,
    ) -> EdgeId {
        self.add_or_merge_edge_with_overlap(from, orient_from, to, orient_to, true)
    }

    /// Like [`add_or_merge_edge`](Self::add_or_merge_edge) for k-mers that
    /// may lie apart in the read
    ///
    /// An edge overlaps once any of its observations was `overlapping`.
    pub fn add_or_merge_edge_with_overlap(
        &mut self,
        from: NodeId,
        orient_from: Orientation,
        to: NodeId,
        orient_to: Orientation,
        overlapping: bool,
    ) -> EdgeId {
        let existing = self.nodes[from.index()]
            .outgoing(orient_from)
            .iter()
            .copied()
            .find(|&eid| {
                let edge = &self.edges[eid.index()];
                edge.to == to && edge.orient_to == orient_to
            });

        if let Some(eid) = existing {
            let edge = &mut self.edges[eid.index()];
            edge.weight += 1;
            edge.overlapping |= overlapping;
            return eid;
        }

        let eid = EdgeId(self.edges.len());
        self.edges.push(Edge {
            from,
            orient_from,
            to,
            orient_to,
            weight: 1,
            overlapping,
        });
        let node = &mut self.nodes[from.index()];
        match orient_from {
            Orientation::Forward => node.out_fwd.push(eid),
            Orientation::Reverse => node.out_rev.push(eid),
        }
        eid
    }

    /// Node for a k-mer (either strand), if present
    pub fn find_node(&self, kmer: &Kmer) -> Option<NodeId> {
        self.index.get(&kmer.canonical()).copied()
    }

    /// Edge `from(orient_from) -> to(orient_to)`, if present
    pub fn find_edge(
        &self,
        from: NodeId,
        orient_from: Orientation,
        to: NodeId,
        orient_to: Orientation,
    ) -> Option<EdgeId> {
        self.node(from)
            .outgoing(orient_from)
            .iter()
            .copied()
            .find(|&eid| {
                let edge = self.edge(eid);
                edge.to == to && edge.orient_to == orient_to
            })
    }

    /// Node by handle
    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Edge by handle
    #[inline]
    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.index()]
    }

    /// Outgoing edges of one strand of a node
    #[inline]
    pub fn outgoing(&self, id: NodeId, orientation: Orientation) -> &[EdgeId] {
        self.node(id).outgoing(orientation)
    }

    /// All nodes in creation order
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Assign a node's haplotype color
    #[inline]
    pub fn set_color(&mut self, id: NodeId, color: NodeColor) {
        self.nodes[id.index()].color = color;
    }

    /// Node handles in creation order
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    /// All edges in creation order
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Number of nodes
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of distinct edges
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Sum of all edge weights
    pub fn total_edge_weight(&self) -> u64 {
        self.edges.iter().map(|e| e.weight).sum()
    }

    /// Whether the graph has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node handles ordered by ascending canonical k-mer
    ///
    /// This order depends only on graph content, not on insertion order.
    pub fn sorted_node_ids(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.node_ids().collect();
        ids.sort_unstable_by_key(|&id| self.nodes[id.index()].kmer);
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kmer(s: &str) -> Kmer {
        Kmer::from_str(s).unwrap()
    }

    #[test]
    fn test_node_identity_under_reverse_complement() {
        let mut store = GraphStore::new();
        let a = store.get_or_create_node(kmer("AAAC"));
        let b = store.get_or_create_node(kmer("GTTT"));
        let c = store.get_or_create_node(kmer("AAAC"));
        assert_eq!(a, b);
        assert_eq!(a, c);
        assert_eq!(store.num_nodes(), 1);
        assert_eq!(store.node(a).kmer.to_string(), "AAAC");
    }

    #[test]
    fn test_value_set_only_on_creation() {
        let mut store = GraphStore::new();
        let a = store.get_or_create_node_with_value(kmer("ACGA"), 4);
        let b = store.get_or_create_node_with_value(kmer("ACGA"), 9);
        assert_eq!(a, b);
        assert_eq!(store.node(a).value, 4);
    }

    #[test]
    fn test_edge_merge_increments_weight() {
        let mut store = GraphStore::new();
        let a = store.get_or_create_node(kmer("AAAA"));
        let b = store.get_or_create_node(kmer("AAAC"));

        let e1 = store.add_or_merge_edge(a, Orientation::Forward, b, Orientation::Forward);
        let e2 = store.add_or_merge_edge(a, Orientation::Forward, b, Orientation::Forward);
        let e3 = store.add_or_merge_edge(a, Orientation::Forward, b, Orientation::Forward);
        assert_eq!(e1, e2);
        assert_eq!(e2, e3);
        assert_eq!(store.num_edges(), 1);
        assert_eq!(store.edge(e1).weight, 3);
        assert_eq!(store.outgoing(a, Orientation::Forward), &[e1]);
        assert!(store.outgoing(a, Orientation::Reverse).is_empty());
        assert!(store.outgoing(b, Orientation::Forward).is_empty());
    }

    #[test]
    fn test_orientation_pairs_are_distinct_edges() {
        let mut store = GraphStore::new();
        let a = store.get_or_create_node(kmer("AAAA"));
        let b = store.get_or_create_node(kmer("AAAC"));

        store.add_or_merge_edge(a, Orientation::Forward, b, Orientation::Forward);
        store.add_or_merge_edge(a, Orientation::Forward, b, Orientation::Reverse);
        store.add_or_merge_edge(a, Orientation::Reverse, b, Orientation::Forward);
        store.add_or_merge_edge(b, Orientation::Forward, a, Orientation::Reverse);
        assert_eq!(store.num_edges(), 4);
        assert_eq!(store.node(a).degree(), 3);
        assert_eq!(store.total_edge_weight(), 4);
        assert!(store
            .find_edge(a, Orientation::Reverse, b, Orientation::Forward)
            .is_some());
        assert!(store
            .find_edge(b, Orientation::Reverse, a, Orientation::Forward)
            .is_none());
    }

    #[test]
    fn test_set_color_keeps_identity() {
        let mut store = GraphStore::new();
        let a = store.get_or_create_node(kmer("AAAA"));
        let c = store.get_or_create_node(kmer("CCCC"));

        store.set_color(a, NodeColor::HapA);
        assert_eq!(store.node(a).color, NodeColor::HapA);
        assert_eq!(store.node(c).color, NodeColor::Unknown);
        assert_eq!(store.node(a).kmer(), kmer("AAAA"));
        assert_eq!(store.get_or_create_node(kmer("CCCC")), c);
        assert_eq!(store.num_nodes(), 2);
        assert_eq!(store.node_ids().collect::<Vec<_>>(), vec![a, c]);
    }

    #[test]
    fn test_handles_span_the_address_space() {
        assert_eq!(std::mem::size_of::<NodeId>(), std::mem::size_of::<usize>());
        assert_eq!(std::mem::size_of::<EdgeId>(), std::mem::size_of::<usize>());
    }

    #[test]
    fn test_overlap_flag_is_sticky() {
        let mut store = GraphStore::new();
        let a = store.get_or_create_node(kmer("AAAA"));
        let b = store.get_or_create_node(kmer("CCCC"));

        let (fwd, rev) = (Orientation::Forward, Orientation::Reverse);
        let e = store.add_or_merge_edge_with_overlap(a, fwd, b, rev, false);
        assert!(!store.edge(e).overlapping);
        store.add_or_merge_edge(a, fwd, b, rev);
        store.add_or_merge_edge_with_overlap(a, fwd, b, rev, false);
        assert!(store.edge(e).overlapping);
        assert_eq!(store.edge(e).weight, 3);
    }

    #[test]
    fn test_self_loop_is_kept() {
        let mut store = GraphStore::new();
        let a = store.get_or_create_node(kmer("AAAA"));
        let e = store.add_or_merge_edge(a, Orientation::Forward, a, Orientation::Forward);
        store.add_or_merge_edge(a, Orientation::Forward, a, Orientation::Forward);
        assert_eq!(store.num_edges(), 1);
        assert_eq!(store.edge(e).from, store.edge(e).to);
        assert_eq!(store.edge(e).weight, 2);
    }

    #[test]
    fn test_sorted_node_ids() {
        let mut store = GraphStore::new();
        for s in ["CCCC", "AAAA", "ACCC"] {
            store.get_or_create_node(kmer(s));
        }
        let order: Vec<String> = store
            .sorted_node_ids()
            .into_iter()
            .map(|id| store.node(id).kmer.to_string())
            .collect();
        assert_eq!(order, vec!["AAAA", "ACCC", "CCCC"]);
    }

    #[test]
    fn test_find_node() {
        let mut store = GraphStore::new();
        let id = store.get_or_create_node(kmer("GGGG"));
        assert_eq!(store.find_node(&kmer("CCCC")), Some(id));
        assert_eq!(store.find_node(&kmer("AAAA")), None);
        assert!(!store.is_empty());
    }
}
