//! Candidate decomposition tree.
//!
//! Starting from the union of a small reference partition, every reference
//! member is intersected with and subtracted from the nodes discovered so far.
//! Any resulting subset that is large enough and closely resembles one or more
//! reference members becomes a child node labelled by those members. The
//! labels with their largest subsets are the candidate groupings.
//!
//! ```text
//! └── [A+B+C] => union
//!     ├── [A] => A ∩ union
//!     │   └── [C] => (A ∩ union) ∩ C
//!     └── [B] => B ∩ union
//! ```

use log::debug;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt::{self, Display};

use crate::config::DecompositionConfig;
use crate::error::Result;
use crate::similarity::jaccard;
use crate::types::Taggable;

/// A labelled subset of elements (words or identities)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item<T> {
    pub label: String,
    pub data: BTreeSet<T>,
}

impl<T: Ord> Item<T> {
    pub fn new(label: impl Into<String>, data: impl IntoIterator<Item = T>) -> Self {
        Self {
            label: label.into(),
            data: data.into_iter().collect(),
        }
    }
}

impl Item<String> {
    /// An entity's name and the text of its words
    pub fn from_taggable<E: Taggable + ?Sized>(entity: &E) -> Self {
        Self::new(entity.name(), entity.elements())
    }
}

/// Representative subset for one label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate<T> {
    pub label: String,
    pub data: BTreeSet<T>,
}

/// Result of a decomposition run over a reference partition
#[derive(Debug, Clone)]
pub struct DecompositionTree<T> {
    graph: DiGraph<Item<T>, ()>,
    root: NodeIndex,
    index: BTreeMap<String, Vec<NodeIndex>>,
}

impl<T: Ord + Clone> DecompositionTree<T> {
    /// Build with the default cutoff (0.6) and minimum subset size (2)
    pub fn build(reference: &[Item<T>]) -> Self {
        Self::expand(DecompositionConfig::default(), reference)
    }

    /// Build with a custom cutoff and minimum subset size
    pub fn build_with(config: DecompositionConfig, reference: &[Item<T>]) -> Result<Self> {
        config.validate()?;
        Ok(Self::expand(config, reference))
    }

    fn expand(config: DecompositionConfig, reference: &[Item<T>]) -> Self {
        let mut graph: DiGraph<Item<T>, ()> = DiGraph::new();
        let mut index: BTreeMap<String, Vec<NodeIndex>> = BTreeMap::new();

        let mut queue: VecDeque<Item<T>> = VecDeque::with_capacity(reference.len() + 1);
        queue.push_back(union_item(reference));
        queue.extend(reference.iter().cloned());

        let mut frontier: Vec<NodeIndex> = Vec::new();
        let mut visited: BTreeSet<BTreeSet<T>> = BTreeSet::new();

        while let Some(w) = queue.pop_front() {
            if frontier.is_empty() {
                frontier.push(graph.add_node(w));
                continue;
            }

            if !visited.insert(w.data.clone()) {
                continue;
            }

            // Nodes attached while processing `w` are not compared against it.
            let snapshot = frontier.clone();
            for each in snapshot {
                let current = &graph[each].data;
                let common: BTreeSet<T> = w.data.intersection(current).cloned().collect();
                let diffs: BTreeSet<T> = current.difference(&w.data).cloned().collect();

                for subset in [common, diffs] {
                    if subset.len() < config.min_shared {
                        continue;
                    }

                    let matches = matching_members(&config, reference, &subset);
                    if matches.is_empty() {
                        continue;
                    }

                    let label = label_for(matches);
                    let node = graph.add_node(Item {
                        label: label.clone(),
                        data: subset,
                    });
                    graph.add_edge(each, node, ());
                    frontier.push(node);
                    debug!("{} attached under {}", label, graph[each].label);

                    let nodes = index.entry(label).or_default();
                    if !nodes.iter().any(|&n| graph[n].data == graph[node].data) {
                        nodes.push(node);
                    }
                }
            }
        }

        Self {
            graph,
            root: NodeIndex::new(0),
            index,
        }
    }

    /// The union node every other node descends from
    pub fn root(&self) -> &Item<T> {
        &self.graph[self.root]
    }

    pub fn root_index(&self) -> NodeIndex {
        self.root
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn item(&self, node: NodeIndex) -> Option<&Item<T>> {
        self.graph.node_weight(node)
    }

    /// Children of `node` in the order they were attached
    pub fn children(&self, node: NodeIndex) -> Vec<NodeIndex> {
        let mut children: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(node, Direction::Outgoing)
            .collect();
        children.sort_unstable();
        children
    }

    pub fn parent(&self, node: NodeIndex) -> Option<NodeIndex> {
        self.graph
            .neighbors_directed(node, Direction::Incoming)
            .next()
    }

    /// Distinct labels discovered, sorted
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.index.keys().map(String::as_str)
    }

    /// For every label, the largest subset recorded under it (first one on ties)
    pub fn candidates(&self) -> Vec<Candidate<T>> {
        self.index
            .iter()
            .filter_map(|(label, nodes)| {
                let mut best: Option<&Item<T>> = None;
                for &node in nodes {
                    let item = &self.graph[node];
                    if best.map_or(true, |b| item.data.len() > b.data.len()) {
                        best = Some(item);
                    }
                }
                best.map(|item| Candidate {
                    label: label.clone(),
                    data: item.data.clone(),
                })
            })
            .collect()
    }
}

impl<T: Ord + Clone + Display> DecompositionTree<T> {
    /// Indented text rendering, one `label => [elements]` line per node
    pub fn render(&self) -> String {
        self.to_string()
    }

    fn fmt_node(
        &self,
        f: &mut fmt::Formatter<'_>,
        node: NodeIndex,
        prefix: &str,
        is_tail: bool,
    ) -> fmt::Result {
        let connector = if is_tail { "└── " } else { "├── " };
        writeln!(f, "{prefix}{connector}{}", self.graph[node])?;

        let children = self.children(node);
        let child_prefix = format!("{prefix}{}", if is_tail { "    " } else { "│   " });
        for (i, &child) in children.iter().enumerate() {
            self.fmt_node(f, child, &child_prefix, i + 1 == children.len())?;
        }
        Ok(())
    }
}

impl<T: Ord + Clone + Display> Display for DecompositionTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_node(f, self.root, "", true)
    }
}

impl<T: Display> Display for Item<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} => [", self.label)?;
        for (i, element) in self.data.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{element}")?;
        }
        f.write_str("]")
    }
}

/// Decompose a set of entities by their word texts
pub fn decompose<E: Taggable>(entities: &[E]) -> DecompositionTree<String> {
    let reference: Vec<Item<String>> = entities.iter().map(Item::from_taggable).collect();
    DecompositionTree::build(&reference)
}

fn union_item<T: Ord + Clone>(reference: &[Item<T>]) -> Item<T> {
    let names: BTreeSet<&str> = reference.iter().map(|i| i.label.as_str()).collect();
    Item {
        label: label_for(names),
        data: reference
            .iter()
            .flat_map(|i| i.data.iter().cloned())
            .collect(),
    }
}

fn matching_members<'r, T: Ord>(
    config: &DecompositionConfig,
    reference: &'r [Item<T>],
    subset: &BTreeSet<T>,
) -> BTreeSet<&'r str> {
    reference
        .iter()
        .filter(|member| jaccard(&member.data, subset) > config.similarity_cutoff)
        .map(|member| member.label.as_str())
        .collect()
}

/// `[A+B+C]` from sorted, distinct member names
fn label_for<'n>(names: impl IntoIterator<Item = &'n str>) -> String {
    let names: BTreeSet<&str> = names.into_iter().collect();
    let joined: Vec<&str> = names.into_iter().collect();
    format!("[{}]", joined.join("+"))
}
