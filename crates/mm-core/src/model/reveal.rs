use crate::model::hand::Hand;
use crate::model::item::Item;
use crate::random::RandomSource;
use serde::{Deserialize, Serialize};

pub const MAX_REVEALED: usize = 2;

/// Hand positions disclosed before the reveal stage, in draw order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealedSet {
    indices: Vec<usize>,
}

impl RevealedSet {
    pub fn none() -> Self {
        Self::default()
    }

    /// Builds a set from explicit indices. Returns `None` for more than
    /// `MAX_REVEALED` entries, duplicates, or indices outside `0..hand_len`.
    pub fn from_indices(indices: Vec<usize>, hand_len: usize) -> Option<Self> {
        if indices.len() > MAX_REVEALED {
            return None;
        }
        for (pos, &idx) in indices.iter().enumerate() {
            if idx >= hand_len || indices[..pos].contains(&idx) {
                return None;
            }
        }
        Some(Self { indices })
    }

    /// Picks how many items to show (uniform over 0..=2) and then that many
    /// distinct positions. Only the hand length is consulted.
    pub fn draw<R: RandomSource + ?Sized>(hand_len: usize, rng: &mut R) -> Self {
        let count = (rng.uniform_int(0, MAX_REVEALED as u32) as usize).min(hand_len);
        let mut pool: Vec<usize> = (0..hand_len).collect();
        let mut indices = Vec::with_capacity(count);
        for _ in 0..count {
            let pick = rng.index(pool.len());
            indices.push(pool.swap_remove(pick));
        }
        Self { indices }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// The visible items only, in reveal order.
    pub fn visible(&self, hand: &Hand) -> Vec<Item> {
        self.indices
            .iter()
            .filter_map(|&idx| hand.get(idx))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{MAX_REVEALED, RevealedSet};
    use crate::model::hand::Hand;
    use crate::model::item::Item;
    use crate::random::ScriptedSource;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn draws_are_distinct_and_in_bounds() {
        let mut rng = StdRng::seed_from_u64(11);
        for len in 3..=5 {
            for _ in 0..300 {
                let set = RevealedSet::draw(len, &mut rng);
                assert!(set.len() <= MAX_REVEALED);
                for (pos, idx) in set.indices().iter().enumerate() {
                    assert!(*idx < len);
                    assert!(!set.indices()[..pos].contains(idx));
                }
            }
        }
    }

    #[test]
    fn scripted_draw_picks_from_remaining_pool() {
        // count 2, first pick position 0, then pool is [4, 1, 2, 3] and position 0 is 4
        let mut source = ScriptedSource::new().with_ints([2, 0, 0]);
        let set = RevealedSet::draw(5, &mut source);
        assert_eq!(set.indices(), &[0, 4]);
    }

    #[test]
    fn zero_count_reveals_nothing() {
        let mut source = ScriptedSource::new().with_ints([0]);
        assert!(RevealedSet::draw(4, &mut source).is_empty());
    }

    #[test]
    fn from_indices_validates() {
        assert!(RevealedSet::from_indices(vec![0, 2], 3).is_some());
        assert!(RevealedSet::from_indices(vec![1, 1], 3).is_none());
        assert!(RevealedSet::from_indices(vec![3], 3).is_none());
        assert!(RevealedSet::from_indices(vec![0, 1, 2], 3).is_none());
    }

    #[test]
    fn visible_returns_items_at_indices() {
        let hand = Hand::with_items(vec![Item::die(2), Item::die(5), Item::die(3)]);
        let set = RevealedSet::from_indices(vec![2, 0], 3).expect("valid set");
        assert_eq!(set.visible(&hand), vec![Item::die(3), Item::die(2)]);
    }
}
