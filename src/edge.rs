//! A module for working with edges.

use std::{
    cmp::Ordering,
    hash::{Hash, Hasher},
};

/// A pair of users connected by a follow. Edges don't have a direction, despite the
/// `source`-`target` nomenclature used: `alice -> bob` and `bob -> alice` are the same edge.
#[derive(Clone, Debug, Eq)]
pub struct Edge<T> {
    source: T,
    target: T,
}

impl<T> Edge<T> {
    /// Creates a new edge from two vertices.
    ///
    /// # Examples
    ///
    /// ```
    /// use cartography::edge::Edge;
    ///
    /// let edge = Edge::new("alice", "bob");
    /// assert_eq!(edge, Edge::new("bob", "alice"));
    /// ```
    pub fn new(source: T, target: T) -> Self {
        Self { source, target }
    }

    /// Returns the vertex the edge was created from.
    pub fn source(&self) -> &T {
        &self.source
    }

    /// Returns the vertex the edge was created towards.
    pub fn target(&self) -> &T {
        &self.target
    }

    /// Returns whether the edge contains the given vertex.
    ///
    /// # Examples
    ///
    /// ```
    /// use cartography::edge::Edge;
    ///
    /// let edge = Edge::new("alice", "bob");
    ///
    /// assert!(edge.contains(&"alice"));
    /// assert!(!edge.contains(&"carol"));
    /// ```
    pub fn contains(&self, vertex: &T) -> bool
    where
        T: PartialEq,
    {
        self.source() == vertex || self.target() == vertex
    }

    /// Returns whether both ends of the edge are the same vertex, e.g. a user listed among
    /// their own followers.
    pub fn is_loop(&self) -> bool
    where
        T: PartialEq,
    {
        self.source == self.target
    }

    /// Returns the two vertices with the smaller one first, so the pair can be listed in a
    /// stable order regardless of how the edge was inserted.
    ///
    /// # Examples
    ///
    /// ```
    /// use cartography::edge::Edge;
    ///
    /// assert_eq!(Edge::new("carol", "alice").ordered(), (&"alice", &"carol"));
    /// ```
    pub fn ordered(&self) -> (&T, &T)
    where
        T: Ord,
    {
        match self.source.cmp(&self.target) {
            Ordering::Greater => (&self.target, &self.source),
            _ => (&self.source, &self.target),
        }
    }
}

//
// Trait implementations
//

impl<T: PartialEq> PartialEq for Edge<T> {
    fn eq(&self, other: &Self) -> bool {
        let (a, b) = (&self.source, &self.target);
        let (c, d) = (&other.source, &other.target);

        a == d && b == c || a == c && b == d
    }
}

impl<T: Hash + Ord> Hash for Edge<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Hashing the ordered pair keeps hash(a, b) == hash(b, a).
        let (a, b) = self.ordered();
        a.hash(state);
        b.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new() {
        let (source, target) = ("alice", "bob");

        assert_eq!(Edge::new(source, target), Edge { source, target })
    }

    #[test]
    fn contains() {
        let edge = Edge::new("alice", "bob");

        assert!(edge.contains(&"alice"));
        assert!(edge.contains(&"bob"));
        assert!(!edge.contains(&"carol"));
    }

    #[test]
    fn is_loop() {
        assert!(Edge::new("alice", "alice").is_loop());
        assert!(!Edge::new("alice", "bob").is_loop());
    }

    #[test]
    fn ordered() {
        let forward = Edge::new(String::from("alice"), String::from("bob"));
        let backward = Edge::new(String::from("bob"), String::from("alice"));

        assert_eq!(forward.ordered(), backward.ordered());
        assert_eq!(forward.ordered().0, "alice");
    }

    //
    // Trait implementations
    //

    #[test]
    fn partial_eq() {
        let (a, b, c) = ("alice", "bob", "carol");

        assert_eq!(Edge::new(a, b), Edge::new(a, b));
        assert_eq!(Edge::new(a, b), Edge::new(b, a));
        assert_ne!(Edge::new(a, b), Edge::new(a, c));
    }

    #[test]
    fn hash() {
        use std::collections::hash_map::DefaultHasher;

        let (a, b) = (String::from("alice"), String::from("bob"));

        let mut h1 = DefaultHasher::new();
        let mut h2 = DefaultHasher::new();

        Edge::new(a.clone(), b.clone()).hash(&mut h1);
        Edge::new(b, a).hash(&mut h2);

        // Verify k1 == k2 => hash(k1) == hash(k2).
        assert_eq!(h1.finish(), h2.finish());
    }
}
