use serde::{Deserialize, Serialize};

use crate::WeightError;

/// An ordered list of `(weight, item)` pairs.
///
/// Insertion order is preserved and significant: training walks the list by
/// index, so a fixed random seed upstream reproduces the same run.
///
/// Weights are not kept normalized automatically. After [`set_weight`] the
/// caller is responsible for calling [`normalized`] before the weights are
/// treated as a probability distribution.
///
/// [`set_weight`]: WeightedList::set_weight
/// [`normalized`]: WeightedList::normalized
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedList<T> {
    entries: Vec<(f64, T)>,
}

impl<T> Default for WeightedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> WeightedList<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Creates a list where each item has weight `1/n`.
    #[expect(clippy::cast_precision_loss)]
    pub fn uniform<I>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let items = items.into_iter().collect::<Vec<_>>();
        let weight = 1.0 / items.len() as f64;
        Self {
            entries: items.into_iter().map(|item| (weight, item)).collect(),
        }
    }

    /// Appends an item with the given weight.
    pub fn add_weight(&mut self, weight: f64, item: T) {
        self.entries.push((weight, item));
    }

    /// Returns the weight of the item at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[must_use]
    pub fn weight(&self, index: usize) -> f64 {
        self.entries[index].0
    }

    /// Replaces the weight of the item at `index`.
    ///
    /// The list must be renormalized afterwards if it is used as a distribution.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn set_weight(&mut self, index: usize, weight: f64) {
        self.entries[index].0 = weight;
    }

    /// Returns the item at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[must_use]
    pub fn item(&self, index: usize) -> &T {
        &self.entries[index].1
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(weight, item)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (f64, &T)> + '_ {
        self.entries.iter().map(|(weight, item)| (*weight, item))
    }

    /// Iterates over the items in insertion order.
    pub fn items(&self) -> impl Iterator<Item = &T> + '_ {
        self.entries.iter().map(|(_, item)| item)
    }

    /// Sum of all weights.
    #[must_use]
    pub fn total_weight(&self) -> f64 {
        self.entries.iter().map(|(weight, _)| weight).sum()
    }

    /// Scales every weight so the weights sum to 1.0.
    ///
    /// Fails instead of producing NaN weights when the total is zero or not
    /// finite.
    ///
    /// ```
    /// use polyglot_core::WeightedList;
    ///
    /// let mut list = WeightedList::new();
    /// list.add_weight(1.0, 'a');
    /// list.add_weight(3.0, 'b');
    /// let list = list.normalized().unwrap();
    /// assert_eq!(list.weight(0), 0.25);
    /// assert_eq!(list.weight(1), 0.75);
    /// ```
    pub fn normalized(self) -> Result<Self, WeightError> {
        let total = self.total_weight();
        if !total.is_finite() {
            return Err(WeightError::NonFiniteTotalWeight { total });
        }
        if total == 0.0 {
            return Err(WeightError::ZeroTotalWeight);
        }
        Ok(Self {
            entries: self
                .entries
                .into_iter()
                .map(|(weight, item)| (weight / total, item))
                .collect(),
        })
    }

    /// Returns the items matching `predicate`, weights unchanged.
    ///
    /// The result is not renormalized.
    #[must_use]
    pub fn values_with<P>(&self, mut predicate: P) -> Self
    where
        T: Clone,
        P: FnMut(&T) -> bool,
    {
        Self {
            entries: self
                .entries
                .iter()
                .filter(|(_, item)| predicate(item))
                .cloned()
                .collect(),
        }
    }
}

impl<T> FromIterator<(f64, T)> for WeightedList<T> {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (f64, T)>,
    {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
