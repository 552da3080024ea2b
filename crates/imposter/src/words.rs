//! Word supply and imposter selection.
//!
//! Both are injectable seams so tests can substitute deterministic
//! stand-ins (see [`crate::testing`]) and assert exact outcomes instead of
//! statistical ones.

use rand::{thread_rng, Rng};

/// Supplies the secret word for a round.
pub trait WordSource: Send + Sync {
    /// Draw one word for a new round.
    fn draw(&self) -> String;
}

/// Selects which player becomes the imposter for a round.
pub trait ImposterPicker: Send + Sync {
    /// Pick an index into the player list. `count` is always at least 1.
    fn pick(&self, count: usize) -> usize;
}

/// The fixed word list used by [`BuiltinWords`].
///
/// Everyday nouns that are easy to discuss obliquely, which is what keeps
/// the imposter guessing.
pub const WORDS: &[&str] = &[
    "pizza",
    "beach",
    "library",
    "guitar",
    "winter",
    "camping",
    "airport",
    "birthday",
    "coffee",
    "circus",
    "museum",
    "firework",
    "submarine",
    "karaoke",
    "avalanche",
    "lighthouse",
    "barbecue",
    "carnival",
    "telescope",
    "waterfall",
    "honeymoon",
    "scarecrow",
    "treadmill",
    "volcano",
    "orchestra",
    "parachute",
    "aquarium",
    "campfire",
    "elevator",
    "hammock",
    "iceberg",
    "jungle",
    "kite",
    "lemonade",
    "marathon",
    "nightmare",
    "origami",
    "picnic",
    "quicksand",
    "rainbow",
    "sandcastle",
    "tornado",
    "umbrella",
    "vampire",
    "windmill",
    "yoga",
    "zipline",
    "snowman",
];

/// Draws uniformly at random from the built-in word list.
#[derive(Debug, Default)]
pub struct BuiltinWords;

impl WordSource for BuiltinWords {
    fn draw(&self) -> String {
        WORDS[thread_rng().gen_range(0..WORDS.len())].to_string()
    }
}

/// Picks the imposter seat uniformly at random.
#[derive(Debug, Default)]
pub struct UniformPicker;

impl ImposterPicker for UniformPicker {
    fn pick(&self, count: usize) -> usize {
        thread_rng().gen_range(0..count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_words_draw_from_the_list() {
        let source = BuiltinWords;
        for _ in 0..50 {
            let word = source.draw();
            assert!(WORDS.contains(&word.as_str()), "unexpected word {word}");
        }
    }

    #[test]
    fn word_list_has_no_blanks_or_duplicates() {
        use std::collections::HashSet;
        let unique: HashSet<&&str> = WORDS.iter().collect();
        assert_eq!(unique.len(), WORDS.len());
        assert!(WORDS.iter().all(|w| !w.is_empty()));
    }

    #[test]
    fn uniform_picker_stays_in_range() {
        let picker = UniformPicker;
        for count in 1..=8 {
            for _ in 0..50 {
                assert!(picker.pick(count) < count);
            }
        }
    }
}
