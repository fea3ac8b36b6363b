use std::collections::HashSet;

/// Brand names already committed by a written batch
///
/// Rebuilt from the checkpoint store at start-up and extended only after a
/// batch write succeeds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessedSet {
    brands: HashSet<String>,
}

impl ProcessedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, brand: &str) -> bool {
        self.brands.contains(brand)
    }

    /// Marks a brand as committed, returning false if it already was
    pub fn insert(&mut self, brand: impl Into<String>) -> bool {
        self.brands.insert(brand.into())
    }

    pub fn extend<I, S>(&mut self, brands: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.brands.extend(brands.into_iter().map(Into::into));
    }

    pub fn len(&self) -> usize {
        self.brands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.brands.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ProcessedSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}
