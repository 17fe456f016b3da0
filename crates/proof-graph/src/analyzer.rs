use indexmap::IndexSet;
use proof_core::{ProofStep, StepId};

use crate::result::{CycleError, GraphResult, StepDepth};

/// Minimum number of distinct dependents that makes a node a bottleneck.
pub const BOTTLENECK_IN_DEGREE: usize = 3;

/// Analyzes proof dependency structure.
///
/// The analyzer is stateless: every call to [`GraphAnalyzer::analyze`] builds
/// its own adjacency arena and memoization tables and drops them on return,
/// so a single instance may be shared freely.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphAnalyzer;

impl GraphAnalyzer {
    /// Creates a new analyzer.
    pub fn new() -> Self {
        Self
    }

    /// Analyzes the provided steps.
    ///
    /// Dependencies naming unknown identifiers become metadata-less nodes and
    /// never cause a failure.
    pub fn analyze(&self, steps: &[ProofStep]) -> GraphResult {
        let graph = DependencyGraph::build(steps);
        let step_depths = graph.step_depths();
        let depth = step_depths.iter().map(|entry| entry.depth).max().unwrap_or(0);
        let cycles = graph.detect_cycles();
        let bottlenecks = graph.bottlenecks();
        let topological_order = if cycles.is_empty() {
            Some(graph.topological_order())
        } else {
            None
        };
        let critical_path = topological_order
            .as_deref()
            .map(|order| graph.critical_path(order))
            .unwrap_or_default();

        let errors: Vec<CycleError> = cycles
            .iter()
            .map(|cycle| CycleError::circular(graph.ids(cycle)))
            .collect();

        tracing::debug!(
            steps = steps.len(),
            nodes = graph.len(),
            depth,
            cycles = errors.len(),
            bottlenecks,
            "dependency graph analyzed"
        );

        GraphResult {
            depth,
            cycles: errors.len(),
            errors,
            bottlenecks,
            critical_path: graph.ids(&critical_path),
            topological_order: topological_order.map(|order| graph.ids(&order)),
            step_depths,
        }
    }
}

/// Per-call adjacency arena. Edges point from a dependency to its dependents.
struct DependencyGraph<'a> {
    steps: &'a [ProofStep],
    nodes: IndexSet<&'a StepId>,
    dependents: Vec<IndexSet<usize>>,
    step_of: Vec<Option<usize>>,
}

impl<'a> DependencyGraph<'a> {
    fn build(steps: &'a [ProofStep]) -> Self {
        let mut graph = Self {
            steps,
            nodes: IndexSet::new(),
            dependents: Vec::new(),
            step_of: Vec::new(),
        };
        for (position, step) in steps.iter().enumerate() {
            let node = graph.intern(&step.id);
            if graph.step_of[node].is_none() {
                graph.step_of[node] = Some(position);
            }
            for dependency in &step.dependencies {
                let source = graph.intern(dependency);
                graph.dependents[source].insert(node);
            }
        }
        graph
    }

    fn intern(&mut self, id: &'a StepId) -> usize {
        let (index, inserted) = self.nodes.insert_full(id);
        if inserted {
            self.dependents.push(IndexSet::new());
            self.step_of.push(None);
        }
        index
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn ids(&self, indices: &[usize]) -> Vec<StepId> {
        indices
            .iter()
            .filter_map(|index| self.nodes.get_index(*index))
            .map(|id| (*id).clone())
            .collect()
    }

    fn node_of(&self, id: &StepId) -> Option<usize> {
        self.nodes.get_index_of(id)
    }

    /// Traversal roots: steps in submission order, then nodes only known as dependencies.
    fn roots(&self) -> impl Iterator<Item = usize> + '_ {
        self.steps
            .iter()
            .filter_map(|step| self.node_of(&step.id))
            .chain(0..self.len())
    }

    fn step_depths(&self) -> Vec<StepDepth> {
        let mut memo: Vec<Option<usize>> = vec![None; self.len()];
        let mut on_path = vec![false; self.len()];
        let mut seen = vec![false; self.len()];
        let mut depths = Vec::new();
        for step in self.steps {
            let Some(node) = self.node_of(&step.id) else {
                continue;
            };
            let depth = self.depth_of(node, &mut memo, &mut on_path);
            if !seen[node] {
                seen[node] = true;
                depths.push(StepDepth {
                    id: step.id.clone(),
                    depth,
                });
            }
        }
        depths
    }

    /// Resolves a node without descending: memoized, on the current path,
    /// metadata-less or a leaf. `None` means its dependencies must be visited.
    fn settled_depth(
        &self,
        node: usize,
        memo: &mut [Option<usize>],
        on_path: &[bool],
    ) -> Option<usize> {
        if let Some(depth) = memo[node] {
            return Some(depth);
        }
        if on_path[node] {
            return Some(0);
        }
        let Some(step) = self.step_of[node].map(|position| &self.steps[position]) else {
            return Some(0);
        };
        if step.dependencies.is_empty() {
            memo[node] = Some(1);
            return Some(1);
        }
        None
    }

    /// Memoized depth with an explicit work stack of
    /// `(node, dependencies, next dependency, deepest so far)` frames.
    fn depth_of(&self, root: usize, memo: &mut [Option<usize>], on_path: &mut [bool]) -> usize {
        if let Some(depth) = self.settled_depth(root, memo, on_path) {
            return depth;
        }

        let mut stack: Vec<(usize, &'a [StepId], usize, usize)> = Vec::new();
        self.enter_depth_frame(root, on_path, &mut stack);
        let mut root_depth = 0;
        while let Some(top) = stack.len().checked_sub(1) {
            let (node, dependencies, next, _) = stack[top];
            if let Some(dependency) = dependencies.get(next) {
                stack[top].2 += 1;
                let Some(source) = self.node_of(dependency) else {
                    continue;
                };
                match self.settled_depth(source, memo, on_path) {
                    Some(depth) => stack[top].3 = stack[top].3.max(depth),
                    None => self.enter_depth_frame(source, on_path, &mut stack),
                }
                continue;
            }

            let depth = 1 + stack[top].3;
            on_path[node] = false;
            memo[node] = Some(depth);
            stack.pop();
            match stack.last_mut() {
                Some(parent) => parent.3 = parent.3.max(depth),
                None => root_depth = depth,
            }
        }
        root_depth
    }

    fn enter_depth_frame(
        &self,
        node: usize,
        on_path: &mut [bool],
        stack: &mut Vec<(usize, &'a [StepId], usize, usize)>,
    ) {
        let steps: &'a [ProofStep] = self.steps;
        let dependencies = self.step_of[node]
            .map(|position| steps[position].dependencies.as_slice())
            .unwrap_or_default();
        on_path[node] = true;
        stack.push((node, dependencies, 0, 0));
    }

    fn detect_cycles(&self) -> Vec<Vec<usize>> {
        let mut visited = vec![false; self.len()];
        let mut on_stack = vec![false; self.len()];
        let mut cycles = Vec::new();
        for root in self.roots() {
            if !visited[root] {
                self.cycle_dfs(root, &mut visited, &mut on_stack, &mut cycles);
            }
        }
        cycles
    }

    /// Depth-first search over `(node, next dependent)` frames. The frame
    /// stack doubles as the current path, so a back edge closes the slice
    /// from the target's frame.
    fn cycle_dfs(
        &self,
        root: usize,
        visited: &mut [bool],
        on_stack: &mut [bool],
        cycles: &mut Vec<Vec<usize>>,
    ) {
        let mut stack: Vec<(usize, usize)> = vec![(root, 0)];
        visited[root] = true;
        on_stack[root] = true;

        while let Some(top) = stack.len().checked_sub(1) {
            let (node, next) = stack[top];
            let Some(&target) = self.dependents[node].get_index(next) else {
                on_stack[node] = false;
                stack.pop();
                continue;
            };
            stack[top].1 += 1;

            if !visited[target] {
                visited[target] = true;
                on_stack[target] = true;
                stack.push((target, 0));
            } else if on_stack[target] {
                if let Some(start) = stack.iter().position(|(entry, _)| *entry == target) {
                    let mut cycle: Vec<usize> = stack[start..].iter().map(|(entry, _)| *entry).collect();
                    cycle.push(target);
                    cycles.push(cycle);
                }
            }
        }
    }

    fn bottlenecks(&self) -> usize {
        self.dependents
            .iter()
            .filter(|dependents| dependents.len() >= BOTTLENECK_IN_DEGREE)
            .count()
    }

    fn topological_order(&self) -> Vec<usize> {
        let mut visited = vec![false; self.len()];
        let mut postorder = Vec::with_capacity(self.len());
        for root in self.roots() {
            if !visited[root] {
                self.postorder_dfs(root, &mut visited, &mut postorder);
            }
        }
        postorder.reverse();
        postorder
    }

    fn postorder_dfs(&self, root: usize, visited: &mut [bool], postorder: &mut Vec<usize>) {
        let mut stack: Vec<(usize, usize)> = vec![(root, 0)];
        visited[root] = true;
        while let Some(top) = stack.len().checked_sub(1) {
            let (node, next) = stack[top];
            match self.dependents[node].get_index(next) {
                Some(&target) => {
                    stack[top].1 += 1;
                    if !visited[target] {
                        visited[target] = true;
                        stack.push((target, 0));
                    }
                }
                None => {
                    postorder.push(node);
                    stack.pop();
                }
            }
        }
    }

    /// Longest path over an acyclic order, in nodes. Metadata-less nodes
    /// carry no depth, so they are left off the path as well.
    fn critical_path(&self, order: &[usize]) -> Vec<usize> {
        let is_step = |node: usize| self.step_of[node].is_some();
        let Some(first) = order.iter().copied().find(|node| is_step(*node)) else {
            return Vec::new();
        };
        let mut distance = vec![0usize; self.len()];
        let mut parent: Vec<Option<usize>> = vec![None; self.len()];
        for &node in order.iter().filter(|node| is_step(**node)) {
            for &next in &self.dependents[node] {
                let candidate = distance[node] + 1;
                if candidate > distance[next] {
                    distance[next] = candidate;
                    parent[next] = Some(node);
                }
            }
        }

        let mut end = first;
        for &node in order.iter().filter(|node| is_step(**node)) {
            if distance[node] > distance[end] {
                end = node;
            }
        }

        let mut path = vec![end];
        let mut current = end;
        while let Some(previous) = parent[current] {
            path.push(previous);
            current = previous;
        }
        path.reverse();
        path
    }
}
