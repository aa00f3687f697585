use std::collections::BTreeMap;
use std::fmt;

/// Sparse histogram of integer widths, kept in ascending key order.
#[derive(Clone, Debug, Default)]
pub struct WidthHistogram {
    counts: BTreeMap<i32, usize>,
}

impl WidthHistogram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increase(&mut self, width: i32, count: usize) {
        *self.counts.entry(width).or_insert(0) += count;
    }

    pub fn total_count(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Ascending (width, count) pairs.
    pub fn entries(&self) -> impl Iterator<Item = (i32, usize)> + '_ {
        self.counts.iter().map(|(&w, &c)| (w, c))
    }

    /// Expand the histogram into a flat sample table for clustering.
    pub fn to_samples(&self) -> Vec<f64> {
        let mut samples = Vec::with_capacity(self.total_count());
        for (width, count) in self.entries() {
            samples.extend(std::iter::repeat(width as f64).take(count));
        }
        samples
    }
}

impl fmt::Display for WidthHistogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (w, c)) in self.entries().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{w}:{c}")?;
        }
        write!(f, "}}")
    }
}
