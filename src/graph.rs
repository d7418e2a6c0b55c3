//! # Dependency Graph
//!
//! Reference graph between models (and, in lazy-binding runs, between the
//! generated object types) together with the cycle detector that decides
//! which references must be deferred.

use crate::naming::output_type_name;
use crate::schema::{FieldKind, FieldLocation, Model, Schema};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Model name to the names it references. Self references and references
/// to undeclared names are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    edges: BTreeMap<String, BTreeSet<String>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Graph over `nodes`; edges touching an unknown node are dropped.
    pub fn from_edges<N, E, S>(nodes: N, edges: E) -> Self
    where
        N: IntoIterator<Item = S>,
        E: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        let mut graph = Self::new();
        for node in nodes {
            graph.add_node(node);
        }
        for (from, to) in edges {
            graph.add_edge(from, to);
        }
        graph
    }

    pub fn add_node(&mut self, name: impl Into<String>) {
        self.edges.entry(name.into()).or_default();
    }

    /// Returns false when the edge was dropped.
    pub fn add_edge(&mut self, from: impl Into<String>, to: impl Into<String>) -> bool {
        let (from, to) = (from.into(), to.into());
        if from == to || !self.edges.contains_key(&to) {
            return false;
        }
        match self.edges.get_mut(&from) {
            Some(targets) => targets.insert(to),
            None => false,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.edges.contains_key(name)
    }

    pub fn dependencies(&self, name: &str) -> Option<&BTreeSet<String>> {
        self.edges.get(name)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.edges.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(BTreeSet::len).sum()
    }
}

/// Unordered name pairs known to take part in a reference cycle, stored as
/// `min:max`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CircularPairSet {
    pairs: BTreeSet<String>,
}

pub fn canonical_pair(a: &str, b: &str) -> String {
    if a < b {
        format!("{a}:{b}")
    } else {
        format!("{b}:{a}")
    }
}

impl CircularPairSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, a: &str, b: &str) -> bool {
        self.pairs.insert(canonical_pair(a, b))
    }

    pub fn contains(&self, a: &str, b: &str) -> bool {
        self.pairs.contains(&canonical_pair(a, b))
    }

    pub fn extend(&mut self, other: &CircularPairSet) {
        self.pairs.extend(other.pairs.iter().cloned());
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl fmt::Display for CircularPairSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pairs: Vec<&str> = self.iter().collect();
        write!(f, "{{{}}}", pairs.join(", "))
    }
}

/// Edges `model -> referenced model` for every object field.
pub fn build_graph(models: &[Model]) -> DependencyGraph {
    let mut graph = DependencyGraph::new();
    for model in models {
        graph.add_node(model.name.as_str());
    }
    for model in models {
        for field in model.fields.iter().filter(|f| f.kind == FieldKind::Object) {
            graph.add_edge(model.name.as_str(), field.type_name.as_str());
        }
    }
    tracing::debug!(
        "[PNGC] Dependency graph: {} models, {} relations",
        graph.len(),
        graph.edge_count()
    );
    graph
}

/// Edges between generated object types: input fields to their input
/// object candidates, output fields to the output types they return.
/// Renamed inputs are followed through `aliases`. `Query` and `Mutation`
/// never become files and are left out.
pub fn build_type_graph<F>(schema: &Schema, aliases: &BTreeMap<String, String>, is_model: F) -> DependencyGraph
where
    F: Fn(&str) -> bool,
{
    let resolve = |name: &str| -> String {
        let mut current = name;
        for _ in 0..=aliases.len() {
            match aliases.get(current) {
                Some(next) => current = next,
                None => break,
            }
        }
        current.to_string()
    };
    let output_name = |name: &str| if is_model(name) { name.to_string() } else { output_type_name(name) };
    let outputs = || {
        schema
            .output_object_types
            .iter()
            .filter(|o| !matches!(o.name.as_str(), "Query" | "Mutation"))
    };

    let mut graph = DependencyGraph::new();
    for input in schema.input_object_types.iter() {
        graph.add_node(resolve(&input.name));
    }
    for output in outputs() {
        graph.add_node(output_name(&output.name));
    }
    for input in schema.input_object_types.iter() {
        let from = resolve(&input.name);
        for candidate in input.fields.iter().flat_map(|f| f.input_types.iter()) {
            if candidate.location == FieldLocation::InputObjectTypes {
                graph.add_edge(from.as_str(), resolve(&candidate.type_name));
            }
        }
    }
    for output in outputs() {
        let from = output_name(&output.name);
        for field in &output.fields {
            if field.output_type.location == FieldLocation::OutputObjectTypes {
                graph.add_edge(from.as_str(), output_name(&field.output_type.type_name));
            }
        }
    }
    tracing::debug!(
        "[PNGC] Type graph: {} types, {} references",
        graph.len(),
        graph.edge_count()
    );
    graph
}

/// Depth-first search that records, for every back edge, each consecutive
/// pair on the current path from the revisited node to the end (wrapping
/// around). This lists every pair found on a discovered cycle path but is
/// not an exhaustive closure over overlapping cycles.
pub fn detect_cycles(graph: &DependencyGraph) -> CircularPairSet {
    let mut pairs = CircularPairSet::new();
    let mut visited: BTreeSet<&str> = BTreeSet::new();
    let mut on_stack: BTreeSet<&str> = BTreeSet::new();
    let mut path: Vec<&str> = Vec::new();

    for root in graph.nodes() {
        if visited.contains(root) {
            continue;
        }
        // (node, remaining dependencies) frames replace recursion.
        let mut frames: Vec<(&str, Vec<&str>)> = Vec::new();
        enter(graph, root, &mut frames, &mut visited, &mut on_stack, &mut path);

        while let Some((_, pending)) = frames.last_mut() {
            match pending.pop() {
                Some(dep) if !visited.contains(dep) => {
                    enter(graph, dep, &mut frames, &mut visited, &mut on_stack, &mut path);
                }
                Some(dep) => {
                    if on_stack.contains(dep) {
                        record_cycle(&path, dep, &mut pairs);
                    }
                }
                None => {
                    if let Some((node, _)) = frames.pop() {
                        path.pop();
                        on_stack.remove(node);
                    }
                }
            }
        }
    }

    tracing::debug!("[PNGC] Detected {} circular pairs", pairs.len());
    pairs
}

fn enter<'g>(
    graph: &'g DependencyGraph,
    node: &'g str,
    frames: &mut Vec<(&'g str, Vec<&'g str>)>,
    visited: &mut BTreeSet<&'g str>,
    on_stack: &mut BTreeSet<&'g str>,
    path: &mut Vec<&'g str>,
) {
    visited.insert(node);
    on_stack.insert(node);
    path.push(node);
    // Reversed so that `pop` yields dependencies in ascending order.
    let pending = graph
        .dependencies(node)
        .map(|deps| deps.iter().rev().map(String::as_str).collect())
        .unwrap_or_default();
    frames.push((node, pending));
}

fn record_cycle(path: &[&str], start: &str, pairs: &mut CircularPairSet) {
    let Some(index) = path.iter().position(|n| *n == start) else {
        return;
    };
    let cycle = &path[index..];
    for (i, a) in cycle.iter().enumerate() {
        let b = cycle[(i + 1) % cycle.len()];
        pairs.insert(a, b);
    }
}

pub fn has_circular_dependency(pairs: &CircularPairSet, a: &str, b: &str) -> bool {
    pairs.contains(a, b)
}

/// Every name that appears in at least one circular pair.
pub fn models_in_cycles(pairs: &CircularPairSet) -> BTreeSet<String> {
    pairs
        .iter()
        .filter_map(|pair| pair.split_once(':'))
        .flat_map(|(a, b)| [a.to_string(), b.to_string()])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Field;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn user_post() -> Vec<Model> {
        vec![
            Model::new(
                "User",
                vec![Field::scalar("id", "Int"), Field::object("posts", "Post").list()],
            ),
            Model::new(
                "Post",
                vec![Field::scalar("id", "Int"), Field::object("author", "User")],
            ),
        ]
    }

    #[test]
    fn test_empty_graph() {
        let graph = build_graph(&[]);
        assert!(graph.is_empty());
        assert!(detect_cycles(&graph).is_empty());
    }

    #[test]
    fn test_user_post_cycle() {
        let graph = build_graph(&user_post());
        assert!(graph.dependencies("User").unwrap().contains("Post"));
        assert!(graph.dependencies("Post").unwrap().contains("User"));

        let pairs = detect_cycles(&graph);
        assert_eq!(pairs.iter().collect::<Vec<_>>(), vec!["Post:User"]);
        assert!(has_circular_dependency(&pairs, "User", "Post"));
        assert!(has_circular_dependency(&pairs, "Post", "User"));
        assert!(!has_circular_dependency(&pairs, "User", "Comment"));
    }

    #[test]
    fn test_self_and_dangling_references_are_dropped() {
        let models = vec![Model::new(
            "Category",
            vec![
                Field::object("parent", "Category").optional(),
                Field::object("owner", "Ghost"),
            ],
        )];
        let graph = build_graph(&models);
        assert!(graph.dependencies("Category").unwrap().is_empty());
        assert!(detect_cycles(&graph).is_empty());
    }

    #[test]
    fn test_chain_without_cycle() {
        let graph = DependencyGraph::from_edges(["A", "B", "C"], [("A", "B"), ("B", "C")]);
        assert!(detect_cycles(&graph).is_empty());
    }

    #[test]
    fn test_three_node_cycle_records_path_pairs() {
        let graph = DependencyGraph::from_edges(["A", "B", "C"], [("A", "B"), ("B", "C"), ("C", "A")]);
        let pairs = detect_cycles(&graph);
        assert_eq!(pairs.iter().collect::<Vec<_>>(), vec!["A:B", "A:C", "B:C"]);
        assert_eq!(
            models_in_cycles(&pairs),
            ["A", "B", "C"].iter().map(|s| s.to_string()).collect()
        );
    }

    #[test]
    fn test_overlapping_cycles_are_not_closed() {
        // A -> B -> A and A -> C -> A share A only; B and C never pair.
        let graph = DependencyGraph::from_edges(
            ["A", "B", "C"],
            [("A", "B"), ("B", "A"), ("A", "C"), ("C", "A")],
        );
        let pairs = detect_cycles(&graph);
        assert!(pairs.contains("A", "B"));
        assert!(pairs.contains("A", "C"));
        assert!(!pairs.contains("B", "C"));
    }

    #[test]
    fn test_type_graph_follows_aliases() {
        use crate::schema::{InputType, OutputType, SchemaArg, SchemaField, TypeRef};

        let arg = |name: &str, target: &str| SchemaArg {
            name: name.into(),
            input_types: vec![TypeRef::new(target, FieldLocation::InputObjectTypes)],
            is_required: false,
            is_nullable: true,
        };
        let mut schema = Schema::default();
        schema.input_object_types.prisma = vec![
            InputType {
                name: "UserWhereInput".into(),
                fields: vec![arg("posts", "PostListRelationFilter"), arg("name", "StringNullableFilter")],
            },
            InputType {
                name: "PostListRelationFilter".into(),
                fields: vec![arg("some", "PostWhereInput")],
            },
            InputType {
                name: "PostWhereInput".into(),
                fields: vec![arg("author", "UserWhereInput")],
            },
            InputType {
                name: "StringFilter".into(),
                fields: Vec::new(),
            },
        ];
        schema.output_object_types.prisma = vec![
            OutputType {
                name: "Query".into(),
                fields: Vec::new(),
            },
            OutputType {
                name: "UserCountOutputType".into(),
                fields: Vec::new(),
            },
        ];
        schema.output_object_types.model = vec![OutputType {
            name: "User".into(),
            fields: vec![SchemaField {
                name: "_count".into(),
                output_type: TypeRef::new("UserCountOutputType", FieldLocation::OutputObjectTypes),
                args: Vec::new(),
                is_nullable: false,
            }],
        }];
        let aliases = [("StringNullableFilter".to_string(), "StringFilter".to_string())]
            .into_iter()
            .collect();

        let graph = build_type_graph(&schema, &aliases, |n| n == "User");
        assert!(!graph.contains("Query"));
        assert!(graph.dependencies("UserWhereInput").unwrap().contains("StringFilter"));
        assert!(graph.dependencies("User").unwrap().contains("UserCount"));
        let pairs = detect_cycles(&graph);
        assert!(pairs.contains("PostWhereInput", "UserWhereInput"));
    }

    fn arb_edges() -> impl Strategy<Value = Vec<(usize, usize)>> {
        prop::collection::vec((0usize..8, 0usize..8), 0..24)
    }

    proptest! {
        #[test]
        fn prop_mutual_references_are_always_captured(edges in arb_edges()) {
            let names: Vec<String> = (0..8).map(|i| format!("M{i}")).collect();
            let graph = DependencyGraph::from_edges(
                names.clone(),
                edges.iter().map(|(a, b)| (names[*a].clone(), names[*b].clone())),
            );
            let pairs = detect_cycles(&graph);
            for (a, b) in &edges {
                let (a, b) = (&names[*a], &names[*b]);
                let forward = graph.dependencies(a).map(|d| d.contains(b)).unwrap_or(false);
                let backward = graph.dependencies(b).map(|d| d.contains(a)).unwrap_or(false);
                if forward && backward {
                    prop_assert!(pairs.contains(a, b));
                }
            }
        }

        #[test]
        fn prop_forward_only_edges_have_no_cycles(edges in arb_edges()) {
            let names: Vec<String> = (0..8).map(|i| format!("M{i}")).collect();
            let graph = DependencyGraph::from_edges(
                names.clone(),
                edges
                    .iter()
                    .filter(|(a, b)| a < b)
                    .map(|(a, b)| (names[*a].clone(), names[*b].clone())),
            );
            prop_assert!(detect_cycles(&graph).is_empty());
        }
    }
}
