//! Read-only indexed view over analyzed components.
//!
//! Components live in a flat arena (`Vec<Component>`). Relationships are
//! name-keyed lookups into index maps built once at construction; there
//! are no component-to-component references.

use std::collections::{HashMap, HashSet};

use crate::component::Component;
use crate::pattern::Matcher;
use crate::utils::paths;

/// Maximum number of components a graph holds. The rest are dropped.
pub const MAX_COMPONENTS: usize = 10_000;

/// Maximum DFS stack depth during cycle search.
pub const MAX_CYCLE_DEPTH: usize = 1_000;

/// Errors from building a graph out of untyped input.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// The top-level value is not a list of components.
    #[error("expected an array of components or an object with a `components` array, got {found}")]
    NotAComponentList {
        /// JSON type that was found instead.
        found: &'static str,
    },
}

/// Indexed, immutable component graph.
///
/// Indexes are a snapshot of the component list given to [`ComponentGraph::new`].
/// A different component set needs a new graph.
#[derive(Debug, Default)]
pub struct ComponentGraph {
    components: Vec<Component>,
    by_name: HashMap<String, usize>,
    by_path: HashMap<String, usize>,
    dependents: HashMap<String, Vec<usize>>,
}

/// DFS colors for cycle search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

/// One DFS stack frame: node index plus cursor into its dependency list.
struct Frame {
    node: usize,
    next_dep: usize,
}

impl ComponentGraph {
    /// Builds the graph and its indexes.
    ///
    /// Input beyond [`MAX_COMPONENTS`] is truncated with a warning. A
    /// component whose name was already seen is kept in the list but left
    /// out of every index, and a warning is logged; it never fails.
    #[must_use]
    pub fn new(mut components: Vec<Component>) -> Self {
        if components.len() > MAX_COMPONENTS {
            tracing::warn!(
                "Component graph capped at {} components, dropping {}",
                MAX_COMPONENTS,
                components.len() - MAX_COMPONENTS
            );
            components.truncate(MAX_COMPONENTS);
        }

        let mut by_name = HashMap::with_capacity(components.len());
        let mut by_path = HashMap::with_capacity(components.len());
        let mut dependents: HashMap<String, Vec<usize>> = HashMap::new();

        for (idx, component) in components.iter().enumerate() {
            if by_name.contains_key(&component.name) {
                tracing::warn!(
                    "Duplicate component name `{}` at {}, keeping first occurrence",
                    component.name,
                    component.file_path
                );
                continue;
            }
            by_name.insert(component.name.clone(), idx);

            by_path.entry(component.file_path.clone()).or_insert(idx);

            for dep in &component.dependencies {
                let entry = dependents.entry(dep.clone()).or_default();
                if !entry.contains(&idx) {
                    entry.push(idx);
                }
            }
        }

        Self {
            components,
            by_name,
            by_path,
            dependents,
        }
    }

    /// Builds a graph from untyped JSON analyzer output.
    ///
    /// Accepts a bare array or an object with a `components` array. Entries
    /// that do not deserialize as [`Component`] are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NotAComponentList`] if the value has neither shape.
    pub fn from_json(value: serde_json::Value) -> Result<Self, GraphError> {
        let items = match value {
            serde_json::Value::Array(items) => items,
            serde_json::Value::Object(mut map) => match map.remove("components") {
                Some(serde_json::Value::Array(items)) => items,
                _ => return Err(GraphError::NotAComponentList { found: "object" }),
            },
            other => {
                return Err(GraphError::NotAComponentList {
                    found: json_type_name(&other),
                })
            }
        };

        let total = items.len();
        let components: Vec<Component> = items
            .into_iter()
            .filter_map(|item| match serde_json::from_value(item) {
                Ok(c) => Some(c),
                Err(e) => {
                    tracing::debug!("Skipping malformed component: {e}");
                    None
                }
            })
            .collect();

        if components.len() < total {
            tracing::debug!(
                "Dropped {} of {} malformed component entries",
                total - components.len(),
                total
            );
        }

        Ok(Self::new(components))
    }

    /// Returns all components in input order.
    #[must_use]
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Number of components in the graph.
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Returns `true` if the graph has no components.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Looks up a component by name.
    #[must_use]
    pub fn get_component(&self, name: &str) -> Option<&Component> {
        self.by_name.get(name).map(|&idx| &self.components[idx])
    }

    /// Looks up a component by its file path.
    #[must_use]
    pub fn get_component_by_path(&self, path: &str) -> Option<&Component> {
        self.by_path.get(path).map(|&idx| &self.components[idx])
    }

    /// Resolves a component's dependency names to components.
    ///
    /// Names with no component in this graph are skipped.
    #[must_use]
    pub fn get_dependencies(&self, name: &str) -> Vec<&Component> {
        self.get_component(name)
            .map(|c| {
                c.dependencies
                    .iter()
                    .filter_map(|dep| self.get_component(dep))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Returns the components whose dependency list names `name`.
    #[must_use]
    pub fn get_dependents(&self, name: &str) -> Vec<&Component> {
        self.dependents
            .get(name)
            .map(|idxs| idxs.iter().map(|&idx| &self.components[idx]).collect())
            .unwrap_or_default()
    }

    /// Returns every component whose file path matches any of the matchers.
    ///
    /// Components with an empty or null-containing path are never returned.
    #[must_use]
    pub fn get_files_in_layer<M>(&self, matchers: &[M]) -> Vec<&Component>
    where
        M: AsRef<Matcher>,
    {
        self.components
            .iter()
            .filter(|c| is_well_formed_path(&c.file_path))
            .filter(|c| {
                let path = paths::to_forward_slashes(&c.file_path);
                matchers.iter().any(|m| m.as_ref().matches_path(&path))
            })
            .collect()
    }

    /// Finds dependency cycles.
    ///
    /// Each cycle is returned as a node-name sequence that ends with its
    /// start node repeated (`["A", "B", "A"]`). Iterative DFS with
    /// in-progress/done marking; a dependency on an in-progress node closes
    /// a cycle. The same cycle reached from different start nodes is
    /// reported once, deduplicated by its rotation starting at the
    /// lexicographically smallest name.
    ///
    /// Paths deeper than [`MAX_CYCLE_DEPTH`] are not explored further.
    #[must_use]
    pub fn find_cycles(&self) -> Vec<Vec<String>> {
        let mut marks: Vec<Option<Mark>> = vec![None; self.components.len()];
        let mut seen: HashSet<String> = HashSet::new();
        let mut cycles = Vec::new();

        for start in 0..self.components.len() {
            let indexed = self.by_name.get(&self.components[start].name) == Some(&start);
            if marks[start].is_some() || !indexed {
                continue;
            }

            let mut stack = vec![Frame {
                node: start,
                next_dep: 0,
            }];
            let mut path: Vec<usize> = vec![start];
            marks[start] = Some(Mark::InProgress);

            while let Some(frame) = stack.last_mut() {
                let deps = &self.components[frame.node].dependencies;
                let Some(dep_name) = deps.get(frame.next_dep) else {
                    marks[frame.node] = Some(Mark::Done);
                    stack.pop();
                    path.pop();
                    continue;
                };
                frame.next_dep += 1;

                let Some(&dep) = self.by_name.get(dep_name) else {
                    continue;
                };

                match marks[dep] {
                    Some(Mark::InProgress) => {
                        if let Some(pos) = path.iter().position(|&n| n == dep) {
                            let mut cycle: Vec<String> = path[pos..]
                                .iter()
                                .map(|&n| self.components[n].name.clone())
                                .collect();
                            if seen.insert(canonical_cycle_key(&cycle)) {
                                cycle.push(self.components[dep].name.clone());
                                cycles.push(cycle);
                            }
                        }
                    }
                    Some(Mark::Done) => {}
                    None => {
                        if stack.len() >= MAX_CYCLE_DEPTH {
                            tracing::warn!(
                                "Cycle search depth limit ({}) reached at `{}`, skipping edge",
                                MAX_CYCLE_DEPTH,
                                dep_name
                            );
                            continue;
                        }
                        marks[dep] = Some(Mark::InProgress);
                        stack.push(Frame {
                            node: dep,
                            next_dep: 0,
                        });
                        path.push(dep);
                    }
                }
            }
        }

        cycles
    }
}

/// Dedup key for a cycle (without the repeated closing node): the
/// sequence rotated to start at its lexicographically smallest member.
fn canonical_cycle_key(cycle: &[String]) -> String {
    let Some(min_idx) = cycle
        .iter()
        .enumerate()
        .min_by(|a, b| a.1.cmp(b.1))
        .map(|(i, _)| i)
    else {
        return String::new();
    };
    let mut rotated: Vec<&str> = cycle[min_idx..].iter().map(String::as_str).collect();
    rotated.extend(cycle[..min_idx].iter().map(String::as_str));
    rotated.join(" -> ")
}

fn is_well_formed_path(path: &str) -> bool {
    !path.trim().is_empty() && !path.contains('\0')
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::PatternOptions;
    use serde_json::json;

    fn comp(name: &str, deps: &[&str]) -> Component {
        deps.iter().fold(
            Component::new(name, format!("src/{name}.ts")),
            |c, d| c.with_dependency(*d),
        )
    }

    fn sorted_names(components: &[&Component]) -> Vec<String> {
        let mut names: Vec<String> = components.iter().map(|c| c.name.clone()).collect();
        names.sort();
        names
    }

    #[test]
    fn lookup_by_name_and_path() {
        let graph = ComponentGraph::new(vec![comp("A", &[]), comp("B", &[])]);
        assert_eq!(graph.get_component("A").unwrap().file_path, "src/A.ts");
        assert_eq!(graph.get_component_by_path("src/B.ts").unwrap().name, "B");
        assert!(graph.get_component("Missing").is_none());
        assert!(graph.get_component_by_path("src/Missing.ts").is_none());
    }

    #[test]
    fn dependencies_drop_unresolved_names() {
        let graph = ComponentGraph::new(vec![comp("A", &["B", "External"]), comp("B", &[])]);
        let deps = graph.get_dependencies("A");
        assert_eq!(sorted_names(&deps), vec!["B"]);
        assert!(graph.get_dependencies("Missing").is_empty());
    }

    #[test]
    fn dependents_mirror_dependency_edges() {
        let graph = ComponentGraph::new(vec![
            comp("A", &["C"]),
            comp("B", &["C", "C"]),
            comp("C", &[]),
        ]);
        assert_eq!(sorted_names(&graph.get_dependents("C")), vec!["A", "B"]);
        assert!(graph.get_dependents("A").is_empty());

        for component in graph.components() {
            for other in graph.components() {
                let listed = component.dependencies.contains(&other.name);
                let reverse = graph
                    .get_dependents(&other.name)
                    .iter()
                    .any(|c| c.name == component.name);
                assert_eq!(listed, reverse);
            }
        }
    }

    #[test]
    fn duplicate_names_keep_first_occurrence() {
        let graph = ComponentGraph::new(vec![
            Component::new("User", "src/a/User.ts"),
            Component::new("User", "src/b/User.ts"),
        ]);
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.get_component("User").unwrap().file_path, "src/a/User.ts");
        assert!(graph.get_component_by_path("src/b/User.ts").is_none());
    }

    #[test]
    fn duplicate_name_edges_do_not_leak_into_dependents() {
        let graph = ComponentGraph::new(vec![
            Component::new("User", "src/a/User.ts"),
            Component::new("User", "src/b/User.ts").with_dependency("B"),
            comp("B", &[]),
        ]);
        assert!(graph.get_dependents("B").is_empty());
        assert!(graph.get_component("User").unwrap().dependencies.is_empty());

        let cyclic = ComponentGraph::new(vec![
            comp("A", &[]),
            comp("A", &["B"]),
            comp("B", &["A"]),
        ]);
        assert_eq!(sorted_names(&cyclic.get_dependents("A")), vec!["B"]);
        assert!(cyclic.find_cycles().is_empty());
    }

    #[test]
    fn truncates_oversized_input() {
        let components: Vec<Component> = (0..MAX_COMPONENTS + 5)
            .map(|i| Component::new(format!("C{i}"), format!("src/C{i}.ts")))
            .collect();
        let graph = ComponentGraph::new(components);
        assert_eq!(graph.len(), MAX_COMPONENTS);
        assert!(graph.get_component("C0").is_some());
        assert!(graph.get_component(&format!("C{MAX_COMPONENTS}")).is_none());
    }

    #[test]
    fn files_in_layer_use_or_semantics() {
        let graph = ComponentGraph::new(vec![
            Component::new("User", "src/domain/User.ts"),
            Component::new("Api", "src/api/Api.ts"),
            Component::new("Button", "src/ui/Button.ts"),
            Component::new("Broken", ""),
        ]);
        let matchers = vec![
            Matcher::compile("src/domain", PatternOptions::default()).unwrap(),
            Matcher::compile("src/api/**", PatternOptions::default()).unwrap(),
        ];
        let files = graph.get_files_in_layer(&matchers);
        assert_eq!(sorted_names(&files), vec!["Api", "User"]);

        let none: Vec<Matcher> = Vec::new();
        assert!(graph.get_files_in_layer(&none).is_empty());
    }

    #[test]
    fn acyclic_graphs_have_no_cycles() {
        assert!(ComponentGraph::new(vec![]).find_cycles().is_empty());
        assert!(ComponentGraph::new(vec![comp("A", &[])]).find_cycles().is_empty());

        let dag = ComponentGraph::new(vec![
            comp("A", &["B", "C"]),
            comp("B", &["D"]),
            comp("C", &["D"]),
            comp("D", &["External"]),
        ]);
        assert!(dag.find_cycles().is_empty());
    }

    #[test]
    fn two_node_cycle_reported_once() {
        let graph = ComponentGraph::new(vec![comp("A", &["B"]), comp("B", &["A"])]);
        let cycles = graph.find_cycles();
        assert_eq!(cycles, vec![vec!["A", "B", "A"]]);
    }

    #[test]
    fn self_loop_is_a_cycle() {
        let graph = ComponentGraph::new(vec![comp("A", &["A"])]);
        assert_eq!(graph.find_cycles(), vec![vec!["A", "A"]]);
    }

    #[test]
    fn cycle_search_is_deterministic() {
        let graph = ComponentGraph::new(vec![
            comp("C", &["A"]),
            comp("A", &["B"]),
            comp("B", &["C", "D"]),
            comp("D", &["B"]),
        ]);
        let first = graph.find_cycles();
        assert_eq!(first.len(), 2);
        assert_eq!(first, graph.find_cycles());
        for cycle in &first {
            assert_eq!(cycle.first(), cycle.last());
        }
    }

    #[test]
    fn canonical_key_rotates_to_smallest() {
        let a = canonical_cycle_key(&["B".into(), "C".into(), "A".into()]);
        let b = canonical_cycle_key(&["A".into(), "B".into(), "C".into()]);
        assert_eq!(a, b);
        assert_eq!(a, "A -> B -> C");
    }

    #[test]
    fn deep_chain_does_not_overflow() {
        let n = MAX_CYCLE_DEPTH * 3;
        let mut components: Vec<Component> = (0..n)
            .map(|i| comp(&format!("N{i:05}"), &[format!("N{:05}", i + 1).as_str()]))
            .collect();
        components.push(comp(&format!("N{n:05}"), &["N00000"]));
        let graph = ComponentGraph::new(components);
        // Every DFS is cut at the cap, so the closing edge is never followed.
        assert!(graph.find_cycles().is_empty());
    }

    #[test]
    fn short_cycle_found_next_to_capped_chain() {
        let n = MAX_CYCLE_DEPTH * 3;
        let mut components: Vec<Component> = (0..n)
            .map(|i| comp(&format!("N{i:05}"), &[format!("N{:05}", i + 1).as_str()]))
            .collect();
        components.push(comp(&format!("N{n:05}"), &["N00000"]));
        components.push(comp("A", &["B"]));
        components.push(comp("B", &["A"]));
        let graph = ComponentGraph::new(components);
        assert_eq!(graph.find_cycles(), vec![vec!["A", "B", "A"]]);
    }

    #[test]
    fn cycle_within_cap_is_found_at_depth() {
        let depth = MAX_CYCLE_DEPTH - 10;
        let mut components: Vec<Component> = (0..depth)
            .map(|i| comp(&format!("N{i:05}"), &[format!("N{:05}", i + 1).as_str()]))
            .collect();
        components.push(comp(&format!("N{depth:05}"), &["N00000"]));
        let graph = ComponentGraph::new(components);
        let cycles = graph.find_cycles();
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].len(), depth + 2);
        assert_eq!(cycles[0].first().map(String::as_str), Some("N00000"));
        assert_eq!(cycles[0].last().map(String::as_str), Some("N00000"));
    }

    #[test]
    fn from_json_accepts_array_and_wrapper() {
        let arr = json!([
            {"name": "A", "filePath": "src/A.ts", "dependencies": ["B"]},
            {"name": "B", "filePath": "src/B.ts"},
            {"filePath": "missing-name.ts"},
            42
        ]);
        let graph = ComponentGraph::from_json(arr).unwrap();
        assert_eq!(graph.len(), 2);

        let wrapped = json!({"components": [{"name": "A", "filePath": "src/A.ts"}]});
        assert_eq!(ComponentGraph::from_json(wrapped).unwrap().len(), 1);
    }

    #[test]
    fn from_json_keeps_component_with_one_bad_import() {
        let value = json!([{
            "name": "User",
            "filePath": "src/domain/User.ts",
            "imports": [
                {"path": "../ui/Button", "line": 15},
                {"path": "./x", "line": -1}
            ]
        }]);
        let graph = ComponentGraph::from_json(value).unwrap();
        assert_eq!(graph.len(), 1);
        let user = graph.get_component("User").unwrap();
        assert_eq!(user.imports.len(), 2);
        assert_eq!(user.imports[1].line(), None);
    }

    #[test]
    fn from_json_rejects_non_lists() {
        assert!(matches!(
            ComponentGraph::from_json(json!("nope")),
            Err(GraphError::NotAComponentList { found: "string" })
        ));
        assert!(matches!(
            ComponentGraph::from_json(json!(null)),
            Err(GraphError::NotAComponentList { found: "null" })
        ));
        assert!(ComponentGraph::from_json(json!({"other": []})).is_err());
    }
}
