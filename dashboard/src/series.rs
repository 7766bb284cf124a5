use crate::model::SeriesPoint;
use std::collections::VecDeque;

/// Number of points each chart keeps
pub const SERIES_CAPACITY: usize = 15;

/// Fixed-capacity metric history; the oldest point is evicted first.
#[derive(Debug, Clone)]
pub struct SeriesBuffer {
    points: VecDeque<SeriesPoint>,
    capacity: usize,
}

impl Default for SeriesBuffer {
    fn default() -> Self {
        Self::with_capacity(SERIES_CAPACITY)
    }
}

impl SeriesBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    pub fn push(&mut self, label: impl Into<String>, value: f64) {
        self.points.push_back(SeriesPoint {
            label: label.into(),
            value,
        });
        while self.points.len() > self.capacity {
            self.points.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SeriesPoint> {
        self.points.iter()
    }

    pub fn to_vec(&self) -> Vec<SeriesPoint> {
        self.points.iter().cloned().collect()
    }
}
