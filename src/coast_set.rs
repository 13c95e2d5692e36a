//! Set of coastal coordinates with O(1) insert, remove and random pick.
//!
//! Membership order is irrelevant to the algorithms, but the backing vector
//! keeps a deterministic order so seeded runs reproduce exactly.

use std::collections::HashMap;

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::grid::Coord;

#[derive(Clone, Debug, Default)]
pub struct CoastSet {
    items: Vec<Coord>,
    index: HashMap<Coord, usize>,
}

impl CoastSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, c: Coord) -> bool {
        self.index.contains_key(&c)
    }

    /// Insert a coordinate; returns false if it was already present.
    pub fn insert(&mut self, c: Coord) -> bool {
        if self.index.contains_key(&c) {
            return false;
        }
        self.index.insert(c, self.items.len());
        self.items.push(c);
        true
    }

    /// Remove a coordinate; returns false if it was absent.
    pub fn remove(&mut self, c: Coord) -> bool {
        let Some(idx) = self.index.remove(&c) else {
            return false;
        };
        self.items.swap_remove(idx);
        if let Some(&moved) = self.items.get(idx) {
            self.index.insert(moved, idx);
        }
        true
    }

    /// Uniformly pick a member.
    pub fn choose(&self, rng: &mut ChaCha8Rng) -> Option<Coord> {
        if self.items.is_empty() {
            None
        } else {
            Some(self.items[rng.gen_range(0..self.items.len())])
        }
    }

    /// Keep only members satisfying `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(Coord) -> bool) {
        let items = std::mem::take(&mut self.items);
        self.index.clear();
        for c in items {
            if keep(c) {
                self.insert(c);
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Coord> + '_ {
        self.items.iter().copied()
    }

    pub fn as_slice(&self) -> &[Coord] {
        &self.items
    }
}

impl FromIterator<Coord> for CoastSet {
    fn from_iter<I: IntoIterator<Item = Coord>>(iter: I) -> Self {
        let mut set = CoastSet::new();
        for c in iter {
            set.insert(c);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_insert_remove_keeps_index_consistent() {
        let mut set: CoastSet = (0..5).map(|i| Coord::new(i, 0)).collect();
        assert_eq!(set.len(), 5);
        assert!(!set.insert(Coord::new(2, 0)));

        assert!(set.remove(Coord::new(1, 0)));
        assert!(!set.remove(Coord::new(1, 0)));
        assert_eq!(set.len(), 4);

        // The swapped-in element must still be removable
        assert!(set.remove(Coord::new(4, 0)));
        assert!(set.contains(Coord::new(0, 0)));
        assert!(set.contains(Coord::new(2, 0)));
        assert!(set.contains(Coord::new(3, 0)));
        assert!(!set.contains(Coord::new(4, 0)));
    }

    #[test]
    fn test_choose_and_retain() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut set = CoastSet::new();
        assert_eq!(set.choose(&mut rng), None);

        for i in 0..10 {
            set.insert(Coord::new(i, i));
        }
        let picked = set.choose(&mut rng).unwrap();
        assert!(set.contains(picked));

        set.retain(|c| c.x % 2 == 0);
        assert_eq!(set.len(), 5);
        assert!(set.iter().all(|c| c.x % 2 == 0));
        assert!(set.remove(Coord::new(4, 4)));
        assert_eq!(set.len(), 4);
    }
}
