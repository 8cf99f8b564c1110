//! Nearest-entity and distance queries over flat collections
//!
//! Linear scans: every agent calls these every step, so they never allocate.

use crate::core::types::Vec2;

/// Anything that occupies a point on the world surface
pub trait Positioned {
    fn position(&self) -> Vec2;
}

impl Positioned for Vec2 {
    fn position(&self) -> Vec2 {
        *self
    }
}

impl<T: Positioned + ?Sized> Positioned for &T {
    fn position(&self) -> Vec2 {
        (**self).position()
    }
}

/// Euclidean distance between two positioned things
pub fn distance(a: &impl Positioned, b: &impl Positioned) -> f32 {
    a.position().distance(&b.position())
}

/// Element minimizing distance to `source`, or `None` for an empty input
///
/// The first element at the minimal distance wins.
pub fn find_nearest<T, I, F>(source: Vec2, candidates: I, position: F) -> Option<T>
where
    I: IntoIterator<Item = T>,
    F: Fn(&T) -> Vec2,
{
    let mut best: Option<T> = None;
    let mut best_dist = f32::INFINITY;
    for candidate in candidates {
        let d = position(&candidate).distance(&source);
        if d < best_dist {
            best_dist = d;
            best = Some(candidate);
        }
    }
    best
}

/// Mean position of the given points, `None` when there are none
pub fn centroid(points: impl IntoIterator<Item = Vec2>) -> Option<Vec2> {
    let mut sum = Vec2::ZERO;
    let mut count = 0usize;
    for p in points {
        sum += p;
        count += 1;
    }
    (count > 0).then(|| sum / count as f32)
}
