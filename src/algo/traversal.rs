//! Breadth-first and depth-first traversal
//!
//! The engine only talks to a [`Store`]: it resolves the start node with
//! `find_first`, then repeatedly asks for `neighbors` while the caller's
//! policy decides what to enqueue, what to record and when to stop.
//!
//! Each run keeps a path-taken set of unordered id pairs. A pair is expanded at
//! most once per run, in either direction, which is what makes runs over
//! cyclic graphs terminate. Nodes themselves are not deduplicated: a node
//! reachable over several distinct edges is visited once per edge. Callers that
//! want each node once filter on their own visited set.

use crate::graph::{GraphResult, Node, NodeId, NodePredicate, Store};
use crate::scheduler::CooperativeYield;
use rustc_hash::FxHashSet;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, warn};

/// Queue discipline of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalOrder {
    /// Dequeue from the front
    BreadthFirst,
    /// Dequeue from the back
    DepthFirst,
}

impl TraversalOrder {
    fn next<T>(self, queue: &mut VecDeque<T>) -> Option<T> {
        match self {
            TraversalOrder::BreadthFirst => queue.pop_front(),
            TraversalOrder::DepthFirst => queue.pop_back(),
        }
    }
}

/// Selects which candidate neighbors to enqueue: `(candidates, depth, node)`.
/// May drop and reorder; `depth` is the depth the survivors will get.
pub type FilterFn<'a> = dyn FnMut(Vec<Node>, usize, &Node) -> Vec<Node> + Send + 'a;

/// Called for every dequeued entry: `(node, depth, parent)`
pub type ProgressFn<'a> = dyn FnMut(&Node, usize, Option<&Node>) + Send + 'a;

/// Ends the run on the current entry when it returns `true`: `(node, depth, parent)`
pub type FinishFn<'a> = dyn FnMut(&Node, usize, Option<&Node>) -> bool + Send + 'a;

/// Caller-supplied policy for one traversal run. Every hook is optional.
pub struct TraversalPolicy<'a> {
    start: Option<Box<NodePredicate<'a>>>,
    filter: Option<Box<FilterFn<'a>>>,
    progress: Option<Box<ProgressFn<'a>>>,
    finish: Option<Box<FinishFn<'a>>>,
    yield_interval: Option<usize>,
}

impl<'a> TraversalPolicy<'a> {
    pub fn new() -> Self {
        Self {
            start: None,
            filter: None,
            progress: None,
            finish: None,
            yield_interval: None,
        }
    }

    /// Start from the first node in store order matching `predicate`.
    /// Without one the run starts from the first node in store order.
    pub fn start_at(mut self, predicate: impl Fn(&Node) -> bool + Send + Sync + 'a) -> Self {
        self.start = Some(Box::new(predicate));
        self
    }

    pub fn filter(
        mut self,
        filter: impl FnMut(Vec<Node>, usize, &Node) -> Vec<Node> + Send + 'a,
    ) -> Self {
        self.filter = Some(Box::new(filter));
        self
    }

    pub fn on_progress(mut self, progress: impl FnMut(&Node, usize, Option<&Node>) + Send + 'a) -> Self {
        self.progress = Some(Box::new(progress));
        self
    }

    pub fn finish_when(
        mut self,
        finish: impl FnMut(&Node, usize, Option<&Node>) -> bool + Send + 'a,
    ) -> Self {
        self.finish = Some(Box::new(finish));
        self
    }

    /// Yield to the scheduler after every `interval` queue entries
    pub fn yield_every(mut self, interval: usize) -> Self {
        self.yield_interval = Some(interval);
        self
    }

    /// Apply `interval` unless the caller already chose one
    pub(crate) fn default_yield_interval(mut self, interval: usize) -> Self {
        self.yield_interval.get_or_insert(interval);
        self
    }
}

impl Default for TraversalPolicy<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TraversalPolicy<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TraversalPolicy")
            .field("start", &self.start.is_some())
            .field("filter", &self.filter.is_some())
            .field("progress", &self.progress.is_some())
            .field("finish", &self.finish.is_some())
            .field("yield_interval", &self.yield_interval)
            .finish()
    }
}

struct QueueEntry {
    parent: Option<Arc<Node>>,
    node: Node,
    depth: usize,
}

/// Record the unordered pair `(a, b)`; returns `false` if it was already taken
fn take_path(taken: &mut FxHashSet<(NodeId, NodeId)>, a: NodeId, b: NodeId) -> bool {
    let key = if a <= b { (a, b) } else { (b, a) };
    taken.insert(key)
}

/// Run one traversal over `store`.
///
/// Returns `Ok(None)` when no start node matched, otherwise the node the run
/// ended on: the one accepted by the finish hook, or the last node expanded
/// once the graph ran out. Any store error aborts the run; progress already
/// reported is not rolled back.
pub async fn traverse<S>(
    store: &S,
    order: TraversalOrder,
    policy: TraversalPolicy<'_>,
) -> GraphResult<Option<Node>>
where
    S: Store + ?Sized,
{
    let TraversalPolicy {
        start,
        mut filter,
        mut progress,
        mut finish,
        yield_interval,
    } = policy;

    let Some(start) = store.find_first(start.as_deref()).await? else {
        debug!("No start node matched, traversal finished without a result");
        return Ok(None);
    };
    debug!("Starting {:?} traversal from {}", order, start.id);

    let mut queue = VecDeque::new();
    queue.push_back(QueueEntry {
        parent: None,
        node: start,
        depth: 0,
    });
    let mut taken: FxHashSet<(NodeId, NodeId)> = FxHashSet::default();
    let mut yielder = CooperativeYield::new(yield_interval.unwrap_or(1));

    while let Some(QueueEntry { parent, node, depth }) = order.next(&mut queue) {
        yielder.step().await;

        if let Some(progress) = progress.as_mut() {
            progress(&node, depth, parent.as_deref());
        }
        if let Some(finish) = finish.as_mut() {
            if finish(&node, depth, parent.as_deref()) {
                debug!("Traversal finished at {} (depth {}) after {} steps", node.id, depth, yielder.steps());
                return Ok(Some(node));
            }
        }

        let exclude = parent.as_ref().map(|p| p.id);
        let neighbors = match store.neighbors(&node, exclude).await {
            Ok(neighbors) => neighbors,
            Err(err) => {
                warn!("Traversal aborted at {}: {}", node.id, err);
                return Err(err);
            }
        };

        let mut candidates: Vec<Node> = neighbors
            .into_iter()
            .filter(|neighbor| take_path(&mut taken, node.id, neighbor.id))
            .collect();
        if let Some(filter) = filter.as_mut() {
            candidates = filter(candidates, depth + 1, &node);
        }

        if queue.is_empty() && candidates.is_empty() {
            debug!("Traversal ran out of graph at {} after {} steps", node.id, yielder.steps());
            return Ok(Some(node));
        }

        let current = Arc::new(node);
        queue.extend(candidates.into_iter().map(|neighbor| QueueEntry {
            parent: Some(Arc::clone(&current)),
            node: neighbor,
            depth: depth + 1,
        }));
    }

    Ok(None)
}

/// Breadth-first run over `store`
pub async fn bfs<S>(store: &S, policy: TraversalPolicy<'_>) -> GraphResult<Option<Node>>
where
    S: Store + ?Sized,
{
    traverse(store, TraversalOrder::BreadthFirst, policy).await
}

/// Depth-first run over `store`
pub async fn dfs<S>(store: &S, policy: TraversalPolicy<'_>) -> GraphResult<Option<Node>>
where
    S: Store + ?Sized,
{
    traverse(store, TraversalOrder::DepthFirst, policy).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GraphError, MemoryStore};
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::collections::HashSet;

    fn is(value: Value) -> impl Fn(&Node) -> bool + Send + Sync {
        move |node: &Node| node.data == value
    }

    /// a - b - c - a triangle plus a pendant d on c
    async fn triangle() -> (MemoryStore, [NodeId; 4]) {
        let store = MemoryStore::new();
        let a = store.add_node(json!("a")).await.unwrap();
        let b = store.add_node(json!("b")).await.unwrap();
        let c = store.add_node(json!("c")).await.unwrap();
        let d = store.add_node(json!("d")).await.unwrap();
        store.add_edge(a, b).await.unwrap();
        store.add_edge(b, c).await.unwrap();
        store.add_edge(c, a).await.unwrap();
        store.add_edge(c, d).await.unwrap();
        (store, [a, b, c, d])
    }

    #[test]
    fn test_take_path_is_symmetric() {
        let mut taken = FxHashSet::default();
        let a = NodeId::generate();
        let b = NodeId::generate();
        assert!(take_path(&mut taken, a, b));
        assert!(!take_path(&mut taken, b, a));
        assert!(!take_path(&mut taken, a, b));
    }

    #[tokio::test]
    async fn test_no_start_node() {
        let (store, _) = triangle().await;
        let mut visits = 0;
        let result = bfs(
            &store,
            TraversalPolicy::new()
                .start_at(is(json!("missing")))
                .on_progress(|_, _, _| visits += 1),
        )
        .await
        .unwrap();

        assert!(result.is_none());
        assert_eq!(visits, 0);
    }

    #[tokio::test]
    async fn test_empty_store() {
        let store = MemoryStore::new();
        assert!(dfs(&store, TraversalPolicy::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_cyclic_graph_terminates_and_reaches_all() {
        for order in [TraversalOrder::BreadthFirst, TraversalOrder::DepthFirst] {
            let (store, ids) = triangle().await;
            let mut seen = HashSet::new();
            let mut visits = 0;
            let last = traverse(
                &store,
                order,
                TraversalPolicy::new()
                    .start_at(is(json!("a")))
                    .on_progress(|node, _, _| {
                        seen.insert(node.id);
                        visits += 1;
                    }),
            )
            .await
            .unwrap();

            assert!(last.is_some());
            assert_eq!(seen, ids.iter().copied().collect());
            // Four edges, each expanded once: the cycle reaches one node twice.
            assert_eq!(visits, 5);
        }
    }

    #[tokio::test]
    async fn test_tree_visits_each_node_once() {
        let store = MemoryStore::new();
        let root = store.add_node(json!("root")).await.unwrap();
        let mut all = vec![root];
        for i in 0..3 {
            let child = store.add_node(json!(i)).await.unwrap();
            store.add_edge(root, child).await.unwrap();
            all.push(child);
            for j in 0..2 {
                let leaf = store.add_node(json!(format!("{}-{}", i, j))).await.unwrap();
                store.add_edge(child, leaf).await.unwrap();
                all.push(leaf);
            }
        }

        let mut visited = Vec::new();
        bfs(
            &store,
            TraversalPolicy::new()
                .start_at(is(json!("root")))
                .on_progress(|node, _, _| visited.push(node.id)),
        )
        .await
        .unwrap();

        assert_eq!(visited.len(), all.len());
        let unique: HashSet<NodeId> = visited.iter().copied().collect();
        assert_eq!(unique.len(), all.len());
    }

    #[tokio::test]
    async fn test_bfs_depths_non_decreasing() {
        let (store, _) = triangle().await;
        let mut depths = Vec::new();
        bfs(
            &store,
            TraversalPolicy::new()
                .start_at(is(json!("a")))
                .on_progress(|_, depth, _| depths.push(depth)),
        )
        .await
        .unwrap();

        assert_eq!(depths[0], 0);
        assert!(depths.windows(2).all(|w| w[0] <= w[1]));
    }

    #[tokio::test]
    async fn test_finish_checked_before_expansion() {
        let (store, [a, b, _, _]) = triangle().await;
        let mut visits = Vec::new();
        let found = bfs(
            &store,
            TraversalPolicy::new()
                .start_at(is(json!("a")))
                .on_progress(|node, _, _| visits.push(node.id))
                .finish_when(|node, _, _| node.data == json!("a")),
        )
        .await
        .unwrap()
        .unwrap();

        assert_eq!(found.id, a);
        assert_eq!(visits, vec![a]);

        let found = dfs(
            &store,
            TraversalPolicy::new()
                .start_at(is(json!("a")))
                .finish_when(|_, depth, parent| depth == 1 && parent.is_some_and(|p| p.id == a)),
        )
        .await
        .unwrap()
        .unwrap();
        // DFS pops the most recently enqueued neighbor; a's neighbors arrive newest-edge-first.
        assert_eq!(found.id, b);
    }

    #[tokio::test]
    async fn test_progress_reports_parent() {
        let (store, [a, _, _, _]) = triangle().await;
        let mut parents = Vec::new();
        dfs(
            &store,
            TraversalPolicy::new()
                .start_at(is(json!("a")))
                .on_progress(|node, depth, parent| {
                    parents.push((node.id, depth, parent.map(|p| p.id)))
                }),
        )
        .await
        .unwrap();

        assert_eq!(parents[0], (a, 0, None));
        assert!(parents[1..].iter().all(|(_, depth, parent)| *depth > 0 && parent.is_some()));
    }

    #[tokio::test]
    async fn test_filter_can_prune_and_reorder() {
        let (store, [a, b, c, d]) = triangle().await;

        // Keep only the neighbor with the smallest label at each step.
        let mut order = Vec::new();
        bfs(
            &store,
            TraversalPolicy::new()
                .start_at(is(json!("a")))
                .filter(|mut candidates, _, _| {
                    candidates.sort_by(|x, y| x.data.as_str().cmp(&y.data.as_str()));
                    candidates.truncate(1);
                    candidates
                })
                .on_progress(|node, _, _| order.push(node.id)),
        )
        .await
        .unwrap();

        // Pairs dropped by the filter stay taken: a - c was marked while
        // expanding a, so c can only move on to d.
        assert_eq!(order, vec![a, b, c, d]);
        assert_eq!(order.iter().filter(|id| **id == a).count(), 1);
    }

    #[tokio::test]
    async fn test_filter_receives_child_depth() {
        let (store, _) = triangle().await;
        let mut seen = Vec::new();
        bfs(
            &store,
            TraversalPolicy::new()
                .start_at(is(json!("a")))
                .filter(|candidates, depth, node| {
                    seen.push((node.data.clone(), depth));
                    if depth < 2 {
                        candidates
                    } else {
                        Vec::new()
                    }
                }),
        )
        .await
        .unwrap();

        assert_eq!(seen[0], (json!("a"), 1));
        assert!(seen[1..].iter().all(|(_, depth)| *depth == 2));
    }

    #[tokio::test]
    async fn test_disconnected_nodes_not_reached() {
        let (store, _) = triangle().await;
        let island = store.add_node(json!("island")).await.unwrap();

        let mut seen = HashSet::new();
        bfs(
            &store,
            TraversalPolicy::new()
                .start_at(is(json!("a")))
                .on_progress(|node, _, _| {
                    seen.insert(node.id);
                }),
        )
        .await
        .unwrap();

        assert!(!seen.contains(&island));
        assert_eq!(seen.len(), 4);
    }

    #[tokio::test]
    async fn test_directed_edges_respected() {
        let store = MemoryStore::new();
        let a = store.add_node(json!("a")).await.unwrap();
        let b = store.add_node(json!("b")).await.unwrap();
        let c = store.add_node(json!("c")).await.unwrap();
        store.add_directed_edge(b, a).await.unwrap();
        store.add_directed_edge(a, c).await.unwrap();

        let mut seen = Vec::new();
        bfs(
            &store,
            TraversalPolicy::new()
                .start_at(is(json!("a")))
                .on_progress(|node, _, _| seen.push(node.id)),
        )
        .await
        .unwrap();

        assert_eq!(seen, vec![a, c]);
    }

    /// Delegates to a memory store but fails every neighbor lookup after the first
    struct FlakyStore {
        inner: MemoryStore,
        calls: std::sync::atomic::AtomicUsize,
    }

    #[async_trait]
    impl Store for FlakyStore {
        async fn add_node(&self, data: Value) -> GraphResult<NodeId> {
            self.inner.add_node(data).await
        }
        async fn node(&self, id: NodeId) -> GraphResult<Option<Node>> {
            self.inner.node(id).await
        }
        async fn nodes(&self) -> GraphResult<Vec<Node>> {
            self.inner.nodes().await
        }
        async fn data(&self, id: NodeId) -> GraphResult<Value> {
            self.inner.data(id).await
        }
        async fn set_data(&self, id: NodeId, data: Value) -> GraphResult<Value> {
            self.inner.set_data(id, data).await
        }
        async fn update_data(&self, id: NodeId, partial: Value) -> GraphResult<Value> {
            self.inner.update_data(id, partial).await
        }
        async fn find(&self, predicate: Option<&NodePredicate<'_>>) -> GraphResult<Vec<Node>> {
            self.inner.find(predicate).await
        }
        async fn find_first(&self, predicate: Option<&NodePredicate<'_>>) -> GraphResult<Option<Node>> {
            self.inner.find_first(predicate).await
        }
        async fn remove_node(&self, id: NodeId) -> GraphResult<()> {
            self.inner.remove_node(id).await
        }
        async fn remove_all_nodes(&self) -> GraphResult<()> {
            self.inner.remove_all_nodes().await
        }
        async fn add_edge(&self, id1: NodeId, id2: NodeId) -> GraphResult<()> {
            self.inner.add_edge(id1, id2).await
        }
        async fn add_directed_edge(&self, from: NodeId, to: NodeId) -> GraphResult<()> {
            self.inner.add_directed_edge(from, to).await
        }
        async fn remove_edge(&self, id1: NodeId, id2: NodeId) -> GraphResult<()> {
            self.inner.remove_edge(id1, id2).await
        }
        async fn remove_all_edges(&self, id: NodeId) -> GraphResult<()> {
            self.inner.remove_all_edges(id).await
        }
        async fn adjacent(&self, id1: NodeId, id2: NodeId) -> GraphResult<bool> {
            self.inner.adjacent(id1, id2).await
        }
        async fn neighbors(&self, node: &Node, exclude: Option<NodeId>) -> GraphResult<Vec<Node>> {
            let call = self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            if call > 0 {
                return Err(GraphError::Storage("backend unavailable".to_string()));
            }
            self.inner.neighbors(node, exclude).await
        }
    }

    #[tokio::test]
    async fn test_store_error_aborts_run() {
        let store = FlakyStore {
            inner: MemoryStore::new(),
            calls: std::sync::atomic::AtomicUsize::new(0),
        };
        let a = store.add_node(json!("a")).await.unwrap();
        let b = store.add_node(json!("b")).await.unwrap();
        let c = store.add_node(json!("c")).await.unwrap();
        store.add_edge(a, b).await.unwrap();
        store.add_edge(b, c).await.unwrap();

        let mut visits = 0;
        let result = bfs(
            &store,
            TraversalPolicy::new()
                .start_at(is(json!("a")))
                .on_progress(|_, _, _| visits += 1),
        )
        .await;

        assert_eq!(
            result,
            Err(GraphError::Storage("backend unavailable".to_string()))
        );
        // Progress already reported stays reported.
        assert_eq!(visits, 2);
    }

    #[tokio::test]
    async fn test_yield_interval_does_not_change_order() {
        let mut runs = Vec::new();
        let (store, _) = triangle().await;
        for interval in [1, 2, 100] {
            let mut seen = Vec::new();
            dfs(
                &store,
                TraversalPolicy::new()
                    .start_at(is(json!("a")))
                    .yield_every(interval)
                    .on_progress(|node, depth, _| seen.push((node.id, depth))),
            )
            .await
            .unwrap();
            runs.push(seen);
        }
        assert_eq!(runs[0], runs[1]);
        assert_eq!(runs[1], runs[2]);
    }

    #[test]
    fn test_default_yield_interval_keeps_explicit_choice() {
        let policy = TraversalPolicy::new().yield_every(7).default_yield_interval(1);
        assert_eq!(policy.yield_interval, Some(7));

        let policy = TraversalPolicy::new().default_yield_interval(3);
        assert_eq!(policy.yield_interval, Some(3));
    }
}
