/// The map contract consumed by the search framework.
///
/// Any graph exposing adjacency and traversal costs can be searched; the
/// framework never looks at a concrete map type.
pub trait SearchMap<P> {
    /// Append the nodes reachable in one step from `pos` into `buf`.
    /// The caller clears `buf` before calling.
    fn neighbours(&self, pos: P, buf: &mut Vec<P>);

    /// Cost of moving from `from` to the adjacent node `to`.
    fn cost(&self, from: P, to: P) -> f32;
}

