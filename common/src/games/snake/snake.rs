use std::collections::{HashSet, VecDeque};

use super::types::{Direction, Point};

#[derive(Clone, Debug)]
pub struct Snake {
    body: VecDeque<Point>,
    body_set: HashSet<Point>,
}

impl Snake {
    /// Builds a snake with its head at `head` and the body trailing away
    /// from the heading, one segment per cell.
    pub fn new(head: Point, direction: Direction, length: usize) -> Self {
        let (dx, dy) = direction.delta();
        let mut body = VecDeque::new();
        let mut body_set = HashSet::new();

        for i in 0..length.max(1) as i32 {
            let segment = Point::new(head.x - dx * i, head.y - dy * i);
            body.push_back(segment);
            body_set.insert(segment);
        }

        Self { body, body_set }
    }

    pub fn head(&self) -> Point {
        *self.body.front().expect("Snake body should never be empty")
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn contains(&self, point: Point) -> bool {
        self.body_set.contains(&point)
    }

    pub fn push_head(&mut self, point: Point) {
        self.body.push_front(point);
        self.body_set.insert(point);
    }

    pub fn pop_tail(&mut self) {
        if let Some(tail) = self.body.pop_back() {
            self.body_set.remove(&tail);
        }
    }

    pub fn segments(&self) -> impl Iterator<Item = &Point> {
        self.body.iter()
    }

    #[cfg(test)]
    pub(crate) fn from_segments(segments: impl IntoIterator<Item = Point>) -> Self {
        let body: VecDeque<Point> = segments.into_iter().collect();
        let body_set: HashSet<Point> = body.iter().copied().collect();
        Self { body, body_set }
    }
}
