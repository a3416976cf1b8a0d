//! Ordered page collections

use std::ops::Index;

/// Ordered sequence of pages; the position of a page is its index
///
/// Generic over the page representation so that each codec can carry
/// its own decoded frame type.
#[derive(Debug, Clone, PartialEq)]
pub struct Document<P> {
    pages: Vec<P>,
}

impl<P> Document<P> {
    /// Creates an empty document
    pub fn new() -> Self {
        Document { pages: Vec::new() }
    }

    /// Appends a page at the end
    pub fn push(&mut self, page: P) {
        self.pages.push(page);
    }

    /// Number of pages
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Whether the document has no pages
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Page at `index`
    pub fn get(&self, index: usize) -> Option<&P> {
        self.pages.get(index)
    }

    /// First page
    pub fn first(&self) -> Option<&P> {
        self.pages.first()
    }

    /// All pages in order
    pub fn pages(&self) -> &[P] {
        &self.pages
    }

    /// Iterates over pages in order
    pub fn iter(&self) -> std::slice::Iter<'_, P> {
        self.pages.iter()
    }

    /// Consumes the document and returns its pages
    pub fn into_pages(self) -> Vec<P> {
        self.pages
    }
}

impl<P> Default for Document<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> From<Vec<P>> for Document<P> {
    fn from(pages: Vec<P>) -> Self {
        Document { pages }
    }
}

impl<P> FromIterator<P> for Document<P> {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Document { pages: iter.into_iter().collect() }
    }
}

impl<P> IntoIterator for Document<P> {
    type Item = P;
    type IntoIter = std::vec::IntoIter<P>;

    fn into_iter(self) -> Self::IntoIter {
        self.pages.into_iter()
    }
}

impl<'a, P> IntoIterator for &'a Document<P> {
    type Item = &'a P;
    type IntoIter = std::slice::Iter<'a, P>;

    fn into_iter(self) -> Self::IntoIter {
        self.pages.iter()
    }
}

impl<P> Index<usize> for Document<P> {
    type Output = P;

    fn index(&self, index: usize) -> &P {
        &self.pages[index]
    }
}
