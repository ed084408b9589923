//! The heuristic search state machine.
//!
//! A [`Search`] session owns its open set, closed set, best-known costs and
//! predecessor links. The expansion order is supplied by a
//! [`SearchStrategy`]; the session only drives the strategy until it reports
//! a terminal state and then rebuilds the path.

use std::cmp::{Ordering, Reverse};
use std::collections::{BTreeMap, BTreeSet, BinaryHeap};
use std::fmt;

use crate::error::{Result, SearchError};
use crate::heuristics::Heuristic;
use crate::traits::SearchMap;

/// The state of a search session.
///
/// `Ready` → `Searching` → `Success` | `Failed`. Only [`Search::init`] leaves
/// a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchState {
    Ready,
    Searching,
    Success,
    Failed,
}

impl fmt::Display for SearchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Ready => "READY",
            Self::Searching => "SEARCHING",
            Self::Success => "SUCCESS",
            Self::Failed => "FAILED",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Open-set entries
// ---------------------------------------------------------------------------

/// An open-set entry, ordered by `(priority, node)`.
#[derive(Debug, Clone, Copy)]
struct QueueEntry<P> {
    priority: f32,
    node: P,
}

impl<P: Ord> PartialEq for QueueEntry<P> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<P: Ord> Eq for QueueEntry<P> {}

impl<P: Ord> PartialOrd for QueueEntry<P> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<P: Ord> Ord for QueueEntry<P> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .total_cmp(&other.priority)
            .then_with(|| self.node.cmp(&other.node))
    }
}

// ---------------------------------------------------------------------------
// Frontier
// ---------------------------------------------------------------------------

/// The bookkeeping a strategy works on during one execution.
///
/// Cleared and reseeded by every [`Search::execute`] call.
pub struct Frontier<P> {
    origin: P,
    goal: P,
    // Min-heap on (priority, node).
    open: BinaryHeap<Reverse<QueueEntry<P>>>,
    closed: BTreeSet<P>,
    cost_to_node: BTreeMap<P, f32>,
    previous: BTreeMap<P, P>,
    // scratch buffer for neighbour queries
    nbuf: Vec<P>,
}

impl<P: Copy + Ord> Frontier<P> {
    fn new(origin: P, goal: P) -> Self {
        Self {
            origin,
            goal,
            open: BinaryHeap::new(),
            closed: BTreeSet::new(),
            cost_to_node: BTreeMap::new(),
            previous: BTreeMap::new(),
            nbuf: Vec::with_capacity(8),
        }
    }

    /// Drop all state from a previous execution and seed the origin at cost 0.
    fn reseed(&mut self, origin: P, goal: P) {
        self.origin = origin;
        self.goal = goal;
        self.open.clear();
        self.closed.clear();
        self.cost_to_node.clear();
        self.previous.clear();
        self.cost_to_node.insert(origin, 0.0);
        self.push(origin, 0.0);
    }

    #[inline]
    pub fn origin(&self) -> P {
        self.origin
    }

    #[inline]
    pub fn goal(&self) -> P {
        self.goal
    }

    /// Insert `node` into the open set. Stale duplicates are allowed.
    pub fn push(&mut self, node: P, priority: f32) {
        self.open.push(Reverse(QueueEntry { priority, node }));
    }

    /// Remove the open entry with the lowest priority.
    pub fn pop(&mut self) -> Option<(P, f32)> {
        self.open
            .pop()
            .map(|Reverse(entry)| (entry.node, entry.priority))
    }

    /// Number of entries (including stale ones) in the open set.
    pub fn open_len(&self) -> usize {
        self.open.len()
    }

    /// Mark `node` as finalized. Returns `false` if it already was.
    pub fn close(&mut self, node: P) -> bool {
        self.closed.insert(node)
    }

    #[inline]
    pub fn is_closed(&self, node: P) -> bool {
        self.closed.contains(&node)
    }

    /// Number of finalized nodes.
    pub fn closed_len(&self) -> usize {
        self.closed.len()
    }

    /// Best known cost from the origin to `node`.
    pub fn cost_to(&self, node: P) -> Option<f32> {
        self.cost_to_node.get(&node).copied()
    }

    /// Record `cost` as the cost of reaching `to` through `from` if it
    /// improves on the best known one. Returns whether it did.
    pub fn relax(&mut self, from: P, to: P, cost: f32) -> bool {
        if self.cost_to(to).is_some_and(|known| known <= cost) {
            return false;
        }
        self.cost_to_node.insert(to, cost);
        self.previous.insert(to, from);
        true
    }

    /// Query `map` for the neighbours of `node` and hand each one to `visit`.
    pub fn expand<M>(&mut self, map: &M, node: P, mut visit: impl FnMut(&mut Self, P))
    where
        M: SearchMap<P> + ?Sized,
    {
        let mut nbuf = std::mem::take(&mut self.nbuf);
        nbuf.clear();
        map.neighbours(node, &mut nbuf);
        for &next in &nbuf {
            visit(self, next);
        }
        self.nbuf = nbuf;
    }

    /// Walk predecessor links back from the goal, excluding the origin.
    fn reconstruct_path(&self) -> Option<Vec<P>> {
        let mut path = Vec::new();
        let mut current = self.goal;
        while current != self.origin {
            path.push(current);
            current = *self.previous.get(&current)?;
        }
        path.reverse();
        Some(path)
    }
}

// ---------------------------------------------------------------------------
// Strategy
// ---------------------------------------------------------------------------

/// One step of a search algorithm.
///
/// A step usually pops a node from the open set, checks it against the goal
/// and expands it. Returning [`SearchState::Searching`] asks for another
/// step; any other state ends the execution.
pub trait SearchStrategy<P, M: ?Sized> {
    fn step(
        &mut self,
        frontier: &mut Frontier<P>,
        map: &M,
        heuristic: &dyn Fn(P, P) -> f32,
    ) -> SearchState;
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// A search session over `map` from an origin to a goal.
pub struct Search<'m, P, M: ?Sized, S> {
    map: &'m M,
    strategy: S,
    heuristic: Heuristic<P>,
    state: SearchState,
    frontier: Frontier<P>,
    path: Vec<P>,
}

impl<'m, P, M, S> Search<'m, P, M, S>
where
    P: Copy + Ord + fmt::Debug,
    M: SearchMap<P> + ?Sized,
    S: SearchStrategy<P, M>,
{
    /// Create a session in the `Ready` state.
    pub fn new(
        map: &'m M,
        origin: P,
        goal: P,
        heuristic: impl Fn(P, P) -> f32 + 'static,
        strategy: S,
    ) -> Self {
        Self {
            map,
            strategy,
            heuristic: Box::new(heuristic),
            state: SearchState::Ready,
            frontier: Frontier::new(origin, goal),
            path: Vec::new(),
        }
    }

    /// Reset the session with new endpoints and heuristic, from any state.
    pub fn init(&mut self, origin: P, goal: P, heuristic: impl Fn(P, P) -> f32 + 'static) {
        self.heuristic = Box::new(heuristic);
        self.reset(origin, goal);
    }

    /// Reset the session with new endpoints, keeping the current heuristic.
    pub fn reset(&mut self, origin: P, goal: P) {
        self.frontier.origin = origin;
        self.frontier.goal = goal;
        self.path.clear();
        self.state = SearchState::Ready;
    }

    #[inline]
    pub fn state(&self) -> SearchState {
        self.state
    }

    #[inline]
    pub fn origin(&self) -> P {
        self.frontier.origin
    }

    #[inline]
    pub fn goal(&self) -> P {
        self.frontier.goal
    }

    /// Number of nodes finalized by the last execution.
    pub fn expanded(&self) -> usize {
        self.frontier.closed_len()
    }

    /// Run the search to completion.
    ///
    /// Fails unless the session is `Ready`. Returns the terminal state,
    /// either `Success` or `Failed`.
    pub fn execute(&mut self) -> Result<SearchState> {
        if self.state != SearchState::Ready {
            return Err(SearchError::InvalidState {
                operation: "execute",
                state: self.state,
            });
        }

        let (origin, goal) = (self.frontier.origin, self.frontier.goal);
        self.frontier.reseed(origin, goal);
        self.path.clear();

        self.state = SearchState::Searching;
        while self.state == SearchState::Searching {
            self.state = self
                .strategy
                .step(&mut self.frontier, self.map, &*self.heuristic);
        }

        if self.state == SearchState::Success {
            match self.frontier.reconstruct_path() {
                Some(path) => self.path = path,
                None => {
                    log::warn!("search {origin:?} -> {goal:?}: broken predecessor chain");
                    self.state = SearchState::Failed;
                }
            }
        }

        log::debug!(
            "search {:?} -> {:?}: {} after expanding {} nodes (path length {})",
            origin,
            goal,
            self.state,
            self.expanded(),
            self.path.len()
        );
        Ok(self.state)
    }

    /// Reset to `origin`/`goal` with the current heuristic and execute.
    pub fn execute_between(&mut self, origin: P, goal: P) -> Result<SearchState> {
        self.reset(origin, goal);
        self.execute()
    }

    /// The path found by a successful search.
    ///
    /// Starts at the step after the origin and ends at the goal.
    pub fn path(&self) -> Result<&[P]> {
        if self.state != SearchState::Success {
            return Err(SearchError::InvalidState {
                operation: "read the path of",
                state: self.state,
            });
        }
        Ok(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Nodes `0..len` on a line; node `i` links to `i - 1` and `i + 1`.
    struct LineGraph {
        len: i32,
        cut: Option<i32>,
    }

    impl SearchMap<i32> for LineGraph {
        fn neighbours(&self, pos: i32, buf: &mut Vec<i32>) {
            for next in [pos - 1, pos + 1] {
                if (0..self.len).contains(&next) && Some(next) != self.cut {
                    buf.push(next);
                }
            }
        }

        fn cost(&self, _from: i32, _to: i32) -> f32 {
            1.0
        }
    }

    /// Pops without looking at costs and stops at the goal.
    struct GreedyWalk {
        steps: usize,
    }

    impl<M: SearchMap<i32>> SearchStrategy<i32, M> for GreedyWalk {
        fn step(
            &mut self,
            frontier: &mut Frontier<i32>,
            map: &M,
            heuristic: &dyn Fn(i32, i32) -> f32,
        ) -> SearchState {
            self.steps += 1;
            let Some((node, _)) = frontier.pop() else {
                return SearchState::Failed;
            };
            if node == frontier.goal() {
                return SearchState::Success;
            }
            if !frontier.close(node) {
                return SearchState::Searching;
            }
            let goal = frontier.goal();
            frontier.expand(map, node, |frontier, next| {
                if !frontier.is_closed(next) && frontier.relax(node, next, 0.0) {
                    frontier.push(next, heuristic(next, goal));
                }
            });
            SearchState::Searching
        }
    }

    fn distance(a: i32, b: i32) -> f32 {
        (a - b).abs() as f32
    }

    #[test]
    fn new_session_is_ready_and_has_no_path() {
        let graph = LineGraph { len: 5, cut: None };
        let search = Search::new(&graph, 0, 4, distance, GreedyWalk { steps: 0 });
        assert_eq!(search.state(), SearchState::Ready);
        assert!(matches!(
            search.path(),
            Err(SearchError::InvalidState {
                state: SearchState::Ready,
                ..
            })
        ));
    }

    #[test]
    fn execute_drives_strategy_to_success() {
        let graph = LineGraph { len: 5, cut: None };
        let mut search = Search::new(&graph, 0, 4, distance, GreedyWalk { steps: 0 });
        assert_eq!(search.execute(), Ok(SearchState::Success));
        assert_eq!(search.path().unwrap(), &[1, 2, 3, 4]);
        assert!(search.strategy.steps >= 5);
    }

    #[test]
    fn execute_twice_is_an_invalid_state() {
        let graph = LineGraph { len: 5, cut: None };
        let mut search = Search::new(&graph, 0, 4, distance, GreedyWalk { steps: 0 });
        search.execute().unwrap();
        let err = search.execute().unwrap_err();
        assert_eq!(
            err,
            SearchError::InvalidState {
                operation: "execute",
                state: SearchState::Success
            }
        );
    }

    #[test]
    fn exhausted_open_set_fails() {
        let graph = LineGraph {
            len: 5,
            cut: Some(2),
        };
        let mut search = Search::new(&graph, 0, 4, distance, GreedyWalk { steps: 0 });
        assert_eq!(search.execute(), Ok(SearchState::Failed));
        assert!(search.path().is_err());
    }

    #[test]
    fn init_resets_from_terminal_state() {
        let graph = LineGraph { len: 6, cut: None };
        let mut search = Search::new(&graph, 0, 2, distance, GreedyWalk { steps: 0 });
        search.execute().unwrap();
        search.init(5, 3, |a, b| distance(a, b) * 2.0);
        assert_eq!(search.state(), SearchState::Ready);
        assert!(search.path().is_err());
        assert_eq!(search.execute(), Ok(SearchState::Success));
        assert_eq!(search.path().unwrap(), &[4, 3]);
        assert_eq!((search.origin(), search.goal()), (5, 3));
    }

    #[test]
    fn execute_between_keeps_heuristic() {
        let graph = LineGraph { len: 6, cut: None };
        let mut search = Search::new(&graph, 0, 2, distance, GreedyWalk { steps: 0 });
        assert_eq!(search.execute_between(3, 0), Ok(SearchState::Success));
        assert_eq!(search.path().unwrap(), &[2, 1, 0]);
    }

    #[test]
    fn origin_equal_to_goal_gives_empty_path() {
        let graph = LineGraph { len: 3, cut: None };
        let mut search = Search::new(&graph, 1, 1, distance, GreedyWalk { steps: 0 });
        assert_eq!(search.execute(), Ok(SearchState::Success));
        assert!(search.path().unwrap().is_empty());
    }

    #[test]
    fn open_set_pops_lowest_priority_then_lowest_node() {
        let mut frontier = Frontier::new(0, 0);
        frontier.push(7, 2.0);
        frontier.push(5, 1.0);
        frontier.push(3, 2.0);
        frontier.push(9, 1.0);
        let order: Vec<_> = std::iter::from_fn(|| frontier.pop()).collect();
        assert_eq!(order, vec![(5, 1.0), (9, 1.0), (3, 2.0), (7, 2.0)]);
    }

    #[test]
    fn relax_only_accepts_improvements() {
        let mut frontier = Frontier::new(0, 9);
        assert!(frontier.relax(0, 4, 3.0));
        assert!(!frontier.relax(1, 4, 3.0));
        assert!(frontier.relax(2, 4, 1.5));
        assert_eq!(frontier.cost_to(4), Some(1.5));
        assert_eq!(frontier.previous.get(&4), Some(&2));
    }

    #[test]
    fn state_display_matches_tags() {
        assert_eq!(SearchState::Ready.to_string(), "READY");
        assert_eq!(SearchState::Failed.to_string(), "FAILED");
    }
}
