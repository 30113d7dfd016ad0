//! Decompositions and their depth-first enumeration
//!
//! A decomposition is a vector of multiplicities, one per alphabet position.
//! Every decomposer enumerates its results through [`depth_first`], which
//! walks alphabet positions from the highest index down to index 1 with an
//! explicit frame stack and resolves index 0 at the leaves.

use std::ops::ControlFlow;

/// Multiplicities index-aligned with the alphabet
pub type Decomposition = Vec<u64>;

/// Per-position multiplicity constraints
///
/// Position `i` must be used between `min` and `max` times (inclusive).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompositionBounds {
    bounds: Vec<(u64, u64)>,
}

impl CompositionBounds {
    /// Bounds that accept any multiplicity at every position
    pub fn unbounded(size: usize) -> Self {
        Self {
            bounds: vec![(0, u64::MAX); size],
        }
    }

    /// Constrain position `index` to `min..=max`
    pub fn with_bound(mut self, index: usize, min: u64, max: u64) -> Self {
        self.bounds[index] = (min, max);
        self
    }

    /// Number of alphabet positions covered
    pub fn size(&self) -> usize {
        self.bounds.len()
    }

    /// Bounds at position `index`
    pub fn bound(&self, index: usize) -> (u64, u64) {
        self.bounds[index]
    }

    /// Check whether a decomposition satisfies every bound
    pub fn contains(&self, decomposition: &[u64]) -> bool {
        decomposition.len() == self.bounds.len()
            && decomposition
                .iter()
                .zip(&self.bounds)
                .all(|(&count, &(min, max))| (min..=max).contains(&count))
    }
}

/// One level of the traversal
struct Frame<S> {
    /// Alphabet position decided by this frame
    index: usize,
    /// Feasible (multiplicity, remaining state) pairs
    choices: Vec<(u64, S)>,
    /// Next choice to visit
    next: usize,
}

/// Enumerate decompositions depth first
///
/// # Arguments
/// * `size` - Number of alphabet positions (at least 1)
/// * `root` - Remaining state for the full mass (e.g. the mass itself)
/// * `candidates` - Fills the feasible `(multiplicity, remaining state)` pairs
///   for position `index >= 1`
/// * `leaf` - Multiplicity of position 0 for a remaining state, `None` if the
///   state cannot be completed
/// * `emit` - Receives every complete decomposition; `Break` stops the walk
///
/// # Returns
/// `Break` if `emit` stopped the traversal, `Continue` otherwise
pub(crate) fn depth_first<S, C, L, F>(
    size: usize,
    root: S,
    mut candidates: C,
    mut leaf: L,
    mut emit: F,
) -> ControlFlow<()>
where
    S: Copy,
    C: FnMut(usize, S, &mut Vec<(u64, S)>),
    L: FnMut(S) -> Option<u64>,
    F: FnMut(&[u64]) -> ControlFlow<()>,
{
    let mut partial = vec![0u64; size];

    if size == 1 {
        if let Some(count) = leaf(root) {
            partial[0] = count;
            return emit(&partial);
        }
        return ControlFlow::Continue(());
    }

    let mut choices = Vec::new();
    candidates(size - 1, root, &mut choices);
    let mut stack = Vec::with_capacity(size);
    stack.push(Frame {
        index: size - 1,
        choices,
        next: 0,
    });

    while let Some(frame) = stack.last_mut() {
        if frame.next == frame.choices.len() {
            stack.pop();
            continue;
        }

        let (count, state) = frame.choices[frame.next];
        frame.next += 1;
        let index = frame.index;
        partial[index] = count;

        if index == 1 {
            if let Some(count0) = leaf(state) {
                partial[0] = count0;
                if emit(&partial).is_break() {
                    return ControlFlow::Break(());
                }
            }
        } else {
            let mut choices = Vec::new();
            candidates(index - 1, state, &mut choices);
            stack.push(Frame {
                index: index - 1,
                choices,
                next: 0,
            });
        }
    }

    ControlFlow::Continue(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Unpruned enumeration over plain weights, for exercising the traversal
    fn enumerate_naive(weights: &[u64], mass: u64) -> Vec<Decomposition> {
        let mut results = Vec::new();
        let _ = depth_first(
            weights.len(),
            mass,
            |index, remaining: u64, out| {
                for n in 0..=remaining / weights[index] {
                    out.push((n, remaining - n * weights[index]));
                }
            },
            |remaining| (remaining % weights[0] == 0).then(|| remaining / weights[0]),
            |d| {
                results.push(d.to_vec());
                ControlFlow::Continue(())
            },
        );
        results
    }

    #[test]
    fn test_depth_first_single_position() {
        assert_eq!(enumerate_naive(&[3], 9), vec![vec![3]]);
        assert!(enumerate_naive(&[3], 10).is_empty());
    }

    #[test]
    fn test_depth_first_partitions() {
        let mut results = enumerate_naive(&[1, 2, 3], 6);
        results.sort();
        assert_eq!(
            results,
            vec![
                vec![0, 0, 2],
                vec![0, 3, 0],
                vec![1, 1, 1],
                vec![2, 2, 0],
                vec![3, 0, 1],
                vec![4, 1, 0],
                vec![6, 0, 0],
            ]
        );
    }

    #[test]
    fn test_depth_first_break() {
        let mut seen = 0;
        let flow = depth_first(
            2,
            10u64,
            |_, remaining: u64, out| {
                for n in 0..=remaining / 2 {
                    out.push((n, remaining - 2 * n));
                }
            },
            Some,
            |_| {
                seen += 1;
                if seen == 3 {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            },
        );
        assert!(flow.is_break());
        assert_eq!(seen, 3);
    }

    #[test]
    fn test_composition_bounds() {
        let bounds = CompositionBounds::unbounded(3).with_bound(1, 1, 2);
        assert_eq!(bounds.size(), 3);
        assert_eq!(bounds.bound(1), (1, 2));
        assert!(bounds.contains(&[5, 1, 0]));
        assert!(bounds.contains(&[0, 2, 9]));
        assert!(!bounds.contains(&[5, 0, 0]));
        assert!(!bounds.contains(&[5, 3, 0]));
        assert!(!bounds.contains(&[5, 1]));
    }
}
