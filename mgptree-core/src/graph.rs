use crate::store::RecordStore;
use mgptree_scanner::{PersonId, PersonName};
use petgraph::algo::is_cyclic_directed;
use petgraph::graphmap::DiGraphMap;
use std::collections::{BTreeMap, VecDeque};
use tracing::{debug, warn};

/// A person included in a plot, with their distance from the nearest root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    pub id: PersonId,
    pub name: PersonName,
    pub title: Option<String>,
    pub institution: Option<String>,
    pub year: Option<String>,
    pub distance: u32,
}

/// Ancestry graph with edges pointing from advisor to advisee.
#[derive(Debug, Clone)]
pub struct AncestryGraph {
    graph: DiGraphMap<PersonId, ()>,
    nodes: BTreeMap<PersonId, GraphNode>,
}

impl AncestryGraph {
    /// Collect everyone within `depth` advisor hops of `roots`.
    ///
    /// Distances are measured here, not taken from the generation stored at
    /// scrape time. Roots missing from the store are skipped. Advisor ids
    /// with no record are left out, so every edge joins two plotted nodes.
    pub fn build(store: &RecordStore, roots: &[PersonId], depth: u32) -> Self {
        let mut distances: BTreeMap<PersonId, u32> = BTreeMap::new();
        let mut queue: VecDeque<(PersonId, u32)> = VecDeque::new();

        for &root in roots {
            if !store.contains(root) {
                warn!("Root {} is not in the database, skipping", root);
                continue;
            }
            if distances.insert(root, 0).is_none() {
                queue.push_back((root, 0));
            }
        }

        while let Some((id, distance)) = queue.pop_front() {
            if distance >= depth {
                continue;
            }
            let Some(record) = store.get(id) else {
                continue;
            };
            for &advisor in &record.advisors {
                if store.contains(advisor) && !distances.contains_key(&advisor) {
                    distances.insert(advisor, distance + 1);
                    queue.push_back((advisor, distance + 1));
                }
            }
        }

        let mut graph = DiGraphMap::new();
        let mut nodes = BTreeMap::new();
        for (&id, &distance) in &distances {
            let Some(record) = store.get(id) else {
                continue;
            };
            graph.add_node(id);
            nodes.insert(
                id,
                GraphNode {
                    id,
                    name: record.name.clone(),
                    title: record.title.clone(),
                    institution: record.institution.clone(),
                    year: record.year.clone(),
                    distance,
                },
            );
        }

        for &advisee in distances.keys() {
            let Some(record) = store.get(advisee) else {
                continue;
            };
            for &advisor in &record.advisors {
                if distances.contains_key(&advisor) {
                    graph.add_edge(advisor, advisee, ());
                }
            }
        }

        let built = Self { graph, nodes };
        if built.has_cycle() {
            warn!("Advisor links contain a cycle; the data source may be inconsistent");
        }
        debug!(
            "Built graph with {} node(s) and {} edge(s) at depth {}",
            built.node_count(),
            built.edge_count(),
            depth
        );
        built
    }

    /// Nodes in ascending id order.
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.values()
    }

    pub fn node(&self, id: PersonId) -> Option<&GraphNode> {
        self.nodes.get(&id)
    }

    pub fn node_ids(&self) -> Vec<PersonId> {
        self.nodes.keys().copied().collect()
    }

    /// `(advisor, advisee)` pairs in ascending order.
    pub fn edges(&self) -> Vec<(PersonId, PersonId)> {
        let mut edges: Vec<(PersonId, PersonId)> =
            self.graph.all_edges().map(|(advisor, advisee, _)| (advisor, advisee)).collect();
        edges.sort_unstable();
        edges
    }

    pub fn contains_node(&self, id: PersonId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn contains_edge(&self, advisor: PersonId, advisee: PersonId) -> bool {
        self.graph.contains_edge(advisor, advisee)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn has_cycle(&self) -> bool {
        is_cyclic_directed(&self.graph)
    }
}
