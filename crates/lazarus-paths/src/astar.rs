use std::fmt::Debug;

use lazarus_core::Position2D;

use crate::heuristics::manhattan;
use crate::search::{Frontier, Search, SearchState, SearchStrategy};
use crate::traits::SearchMap;

/// A* expansion: nodes leave the open set in order of
/// `cost so far + heuristic(node, goal)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AStar;

impl<P, M> SearchStrategy<P, M> for AStar
where
    P: Copy + Ord + Debug,
    M: SearchMap<P> + ?Sized,
{
    fn step(
        &mut self,
        frontier: &mut Frontier<P>,
        map: &M,
        heuristic: &dyn Fn(P, P) -> f32,
    ) -> SearchState {
        let Some((current, _)) = frontier.pop() else {
            return SearchState::Failed;
        };

        // Stale duplicate of an already finalized node.
        if frontier.is_closed(current) {
            return SearchState::Searching;
        }

        let goal = frontier.goal();
        if current == goal {
            return SearchState::Success;
        }

        frontier.close(current);
        let Some(current_cost) = frontier.cost_to(current) else {
            return SearchState::Searching;
        };

        frontier.expand(map, current, |frontier, next| {
            if frontier.is_closed(next) {
                return;
            }
            let cost = current_cost + map.cost(current, next);
            if frontier.relax(current, next, cost) {
                log::trace!("open {next:?} at cost {cost}");
                frontier.push(next, cost + heuristic(next, goal));
            }
        });

        SearchState::Searching
    }
}

/// An A* session over a grid addressed by [`Position2D`].
pub type AStarSearch<'m, M> = Search<'m, Position2D, M, AStar>;

impl<'m, M> Search<'m, Position2D, M, AStar>
where
    M: SearchMap<Position2D> + ?Sized,
{
    /// A* from `origin` to `goal` guided by [`manhattan`] distance.
    pub fn astar(map: &'m M, origin: Position2D, goal: Position2D) -> Self {
        Search::new(map, origin, goal, manhattan, AStar)
    }
}
