use crate::model::item::Item;
use crate::model::mode::GameMode;
use crate::model::suit::Suit;
use crate::random::RandomSource;
use serde::{Deserialize, Serialize};

pub const MIN_HAND_SIZE: usize = 3;
pub const MAX_HAND_SIZE: usize = 5;

/// Validated hand length within `MIN_HAND_SIZE..=MAX_HAND_SIZE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandSize(usize);

impl HandSize {
    pub const fn new(len: usize) -> Option<Self> {
        if len >= MIN_HAND_SIZE && len <= MAX_HAND_SIZE {
            Some(Self(len))
        } else {
            None
        }
    }

    pub const fn get(self) -> usize {
        self.0
    }
}

/// Items in deal order. Unlike a card hand this is never re-sorted: revealed
/// indices refer to positions in this order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    items: Vec<Item>,
}

impl Hand {
    pub fn with_items(items: Vec<Item>) -> Self {
        Self { items }
    }

    /// Draws a fresh hand. The size is uniform over 3..=5 unless supplied;
    /// each value (and suit, for cards) is an independent uniform draw.
    pub fn generate<R: RandomSource + ?Sized>(
        mode: GameMode,
        size: Option<HandSize>,
        rng: &mut R,
    ) -> Self {
        let len = match size {
            Some(size) => size.get(),
            None => rng.uniform_int(MIN_HAND_SIZE as u32, MAX_HAND_SIZE as u32) as usize,
        };
        let range = mode.value_range();
        let items = (0..len)
            .map(|_| {
                let value = rng.uniform_int(u32::from(*range.start()), u32::from(*range.end())) as u8;
                if mode.has_suits() {
                    let suit = Suit::ALL[rng.index(Suit::ALL.len())];
                    Item::card(value, suit)
                } else {
                    Item::die(value)
                }
            })
            .collect();
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<Item> {
        self.items.get(index).copied()
    }

    /// Sum of every value; the settlement price of the round.
    pub fn total(&self) -> u32 {
        self.items.iter().map(|item| u32::from(item.value)).sum()
    }

    pub fn fits(&self, mode: GameMode) -> bool {
        HandSize::new(self.len()).is_some() && self.items.iter().all(|item| item.fits(mode))
    }
}

#[cfg(test)]
mod tests {
    use super::{Hand, HandSize, MAX_HAND_SIZE, MIN_HAND_SIZE};
    use crate::model::item::Item;
    use crate::model::mode::GameMode;
    use crate::model::suit::Suit;
    use crate::random::ScriptedSource;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn generated_hands_respect_mode_ranges() {
        let mut rng = StdRng::seed_from_u64(42);
        for mode in GameMode::ALL {
            for _ in 0..200 {
                let hand = Hand::generate(mode, None, &mut rng);
                assert!((MIN_HAND_SIZE..=MAX_HAND_SIZE).contains(&hand.len()));
                assert!(hand.fits(mode), "{mode}: {hand:?}");
            }
        }
    }

    #[test]
    fn every_size_appears() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut seen = [false; MAX_HAND_SIZE + 1];
        for _ in 0..200 {
            seen[Hand::generate(GameMode::Dice, None, &mut rng).len()] = true;
        }
        assert!(seen[3] && seen[4] && seen[5]);
    }

    #[test]
    fn explicit_size_skips_size_draw() {
        let mut source = ScriptedSource::new().with_ints([7, 1, 12, 0, 5, 2, 9, 3]);
        let hand = Hand::generate(GameMode::Cards, HandSize::new(4), &mut source);
        assert_eq!(
            hand.items(),
            &[
                Item::card(7, Suit::Diamonds),
                Item::card(12, Suit::Hearts),
                Item::card(5, Suit::Clubs),
                Item::card(9, Suit::Spades),
            ]
        );
        assert!(source.is_exhausted());
    }

    #[test]
    fn dice_hands_draw_no_suits() {
        let mut source = ScriptedSource::new().with_ints([3, 1, 6, 4]);
        let hand = Hand::generate(GameMode::Dice, None, &mut source);
        assert_eq!(hand.items(), &[Item::die(1), Item::die(6), Item::die(4)]);
        assert_eq!(hand.total(), 11);
    }

    #[test]
    fn hand_size_bounds() {
        assert!(HandSize::new(2).is_none());
        assert_eq!(HandSize::new(3).map(HandSize::get), Some(3));
        assert_eq!(HandSize::new(5).map(HandSize::get), Some(5));
        assert!(HandSize::new(6).is_none());
    }
}
