//! Keyed enter/update/exit reconciliation of rendered elements.
//!
//! A [`ReconciledSet`] remembers what was drawn last, keyed by a stable
//! identity. Feeding it the next logical set yields a [`SetDiff`] that any
//! backend can apply: entered elements, retained elements with a transition
//! from their old to their new state, and removed elements.

use d3rs::ease::ease_cubic_in_out;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

use crate::transform::{LinePath, ScreenPoint};

/// Linear interpolation between two visual states, `t` in `[0, 1]`.
pub trait Lerp {
    fn lerp(&self, to: &Self, t: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(&self, to: &Self, t: f32) -> Self {
        self + (to - self) * t
    }
}

impl Lerp for ScreenPoint {
    fn lerp(&self, to: &Self, t: f32) -> Self {
        ScreenPoint::new(self.x.lerp(&to.x, t), self.y.lerp(&to.y, t))
    }
}

impl Lerp for LinePath {
    /// Point-wise. When the vertex counts differ, the shorter path is padded
    /// with its last vertex.
    fn lerp(&self, to: &Self, t: f32) -> Self {
        let n = self.points.len().max(to.points.len());
        let at = |path: &LinePath, i: usize| {
            path.points
                .get(i)
                .or_else(|| path.points.last())
                .copied()
                .unwrap_or_default()
        };
        let points = (0..n)
            .map(|i| {
                if self.points.is_empty() {
                    at(to, i)
                } else if to.points.is_empty() {
                    at(self, i)
                } else {
                    at(self, i).lerp(&at(to, i), t)
                }
            })
            .collect();
        LinePath { points }
    }
}

/// Animated change of one element's state.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition<T> {
    pub from: T,
    pub to: T,
    pub duration: Duration,
}

impl<T: Lerp + Clone> Transition<T> {
    pub fn new(from: T, to: T, duration: Duration) -> Self {
        Self { from, to, duration }
    }

    /// Already at its final state.
    pub fn settled(value: T) -> Self {
        Self {
            from: value.clone(),
            to: value,
            duration: Duration::ZERO,
        }
    }

    /// State after `elapsed` has passed since the transition started,
    /// eased cubic-in-out.
    pub fn at(&self, elapsed: Duration) -> T {
        if self.duration.is_zero() || elapsed >= self.duration {
            return self.to.clone();
        }
        let t = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        self.from.lerp(&self.to, ease_cubic_in_out(t) as f32)
    }
}

impl<T: PartialEq> Transition<T> {
    pub fn is_noop(&self) -> bool {
        self.from == self.to
    }
}

/// Outcome of one reconciliation pass.
#[derive(Clone, Debug, PartialEq)]
pub struct SetDiff<K, T> {
    pub entered: Vec<(K, Transition<T>)>,
    pub updated: Vec<(K, Transition<T>)>,
    pub exited: Vec<(K, T)>,
}

impl<K, T> Default for SetDiff<K, T> {
    fn default() -> Self {
        Self {
            entered: Vec::new(),
            updated: Vec::new(),
            exited: Vec::new(),
        }
    }
}

impl<K: PartialEq, T> SetDiff<K, T> {
    pub fn entered_keys(&self) -> impl Iterator<Item = &K> {
        self.entered.iter().map(|(k, _)| k)
    }

    pub fn updated_keys(&self) -> impl Iterator<Item = &K> {
        self.updated.iter().map(|(k, _)| k)
    }

    pub fn exited_keys(&self) -> impl Iterator<Item = &K> {
        self.exited.iter().map(|(k, _)| k)
    }

    /// Entered and updated elements: everything still on screen.
    pub fn live(&self) -> impl Iterator<Item = &(K, Transition<T>)> {
        self.entered.iter().chain(self.updated.iter())
    }

    pub fn is_unchanged(&self) -> bool
    where
        T: PartialEq,
    {
        self.entered.is_empty() && self.exited.is_empty() && self.updated.iter().all(|(_, tr)| tr.is_noop())
    }
}

/// The elements currently on screen, keyed by identity.
#[derive(Clone, Debug)]
pub struct ReconciledSet<K, T> {
    order: Vec<K>,
    elements: HashMap<K, T>,
}

impl<K, T> Default for ReconciledSet<K, T> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            elements: HashMap::new(),
        }
    }
}

impl<K, T> ReconciledSet<K, T>
where
    K: Eq + Hash + Clone,
    T: Lerp + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn get(&self, key: &K) -> Option<&T> {
        self.elements.get(key)
    }

    pub fn keys(&self) -> &[K] {
        &self.order
    }

    /// Replaces the rendered set with `next`.
    ///
    /// Keys seen before transition from their old state over `duration`.
    /// New keys start from `entry(key, target)`; passing the target back
    /// makes them appear in place. Keys missing from `next` exit. Only the
    /// first occurrence of a duplicated key is kept.
    pub fn reconcile<I, F>(&mut self, next: I, duration: Duration, entry: F) -> SetDiff<K, T>
    where
        I: IntoIterator<Item = (K, T)>,
        F: Fn(&K, &T) -> T,
    {
        let mut diff = SetDiff::default();
        let mut previous = std::mem::take(&mut self.elements);
        let previous_order = std::mem::take(&mut self.order);

        for (key, target) in next {
            if self.elements.contains_key(&key) {
                continue;
            }
            match previous.remove(&key) {
                Some(old) => diff
                    .updated
                    .push((key.clone(), Transition::new(old, target.clone(), duration))),
                None => {
                    let start = entry(&key, &target);
                    diff.entered
                        .push((key.clone(), Transition::new(start, target.clone(), duration)));
                }
            }
            self.order.push(key.clone());
            self.elements.insert(key, target);
        }

        for key in previous_order {
            if let Some(old) = previous.remove(&key) {
                diff.exited.push((key, old));
            }
        }
        diff
    }

    /// Removes everything, reporting each element as exited.
    pub fn clear(&mut self) -> SetDiff<K, T> {
        self.reconcile(std::iter::empty(), Duration::ZERO, |_, t| t.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_sampling() {
        let tr = Transition::new(0.0_f32, 10.0, Duration::from_millis(200));
        assert_eq!(tr.at(Duration::ZERO), 0.0);
        assert_eq!(tr.at(Duration::from_millis(100)), 5.0);
        assert_eq!(tr.at(Duration::from_millis(500)), 10.0);
    }

    #[test]
    fn test_transition_eases_in_and_out() {
        let tr = Transition::new(0.0_f32, 10.0, Duration::from_millis(200));
        assert_eq!(tr.at(Duration::from_millis(50)), 0.625);
        assert_eq!(tr.at(Duration::from_millis(150)), 9.375);
        assert_eq!(Transition::settled(3.0_f32).at(Duration::ZERO), 3.0);
    }

    #[test]
    fn test_duplicate_keys_keep_first() {
        let mut set: ReconciledSet<u32, f32> = ReconciledSet::new();
        let diff = set.reconcile(vec![(1, 1.0), (1, 2.0)], Duration::ZERO, |_, t| *t);
        assert_eq!(diff.entered.len(), 1);
        assert_eq!(set.get(&1), Some(&1.0));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_path_lerp_pads_shorter_path() {
        let from = LinePath {
            points: vec![ScreenPoint::new(0.0, 0.0)],
        };
        let to = LinePath {
            points: vec![ScreenPoint::new(10.0, 0.0), ScreenPoint::new(20.0, 10.0)],
        };
        let mid = from.lerp(&to, 0.5);
        assert_eq!(
            mid.points,
            vec![ScreenPoint::new(5.0, 0.0), ScreenPoint::new(10.0, 5.0)]
        );
    }
}
