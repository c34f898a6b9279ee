//! Fisher–Yates shuffling over an explicit random source.

use rand::Rng;

/// Return a uniformly shuffled copy of `items`, leaving the input untouched.
///
/// Backward scan: position `i` is swapped with a random index in `[0, i]`.
pub fn shuffle<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut shuffled = items.to_vec();
    for i in (1..shuffled.len()).rev() {
        let j = rng.random_range(0..=i);
        shuffled.swap(i, j);
    }
    shuffled
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn preserves_multiset() {
        let mut rng = StdRng::seed_from_u64(7);
        let input = vec![3, 1, 4, 1, 5, 9, 2, 6, 5, 3, 5];
        for _ in 0..50 {
            let mut shuffled = shuffle(&input, &mut rng);
            let mut expected = input.clone();
            shuffled.sort();
            expected.sort();
            assert_eq!(shuffled, expected);
        }
    }

    #[test]
    fn accepts_trait_object_rng() {
        let mut seeded = StdRng::seed_from_u64(3);
        let rng: &mut dyn rand::RngCore = &mut seeded;
        let mut shuffled = shuffle(&[1, 2, 3, 4], rng);
        shuffled.sort();
        assert_eq!(shuffled, vec![1, 2, 3, 4]);
    }

    #[test]
    fn does_not_mutate_input() {
        let mut rng = StdRng::seed_from_u64(1);
        let input = vec!["a", "b", "c", "d"];
        let _ = shuffle(&input, &mut rng);
        assert_eq!(input, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn empty_and_single_unchanged() {
        let mut rng = StdRng::seed_from_u64(1);
        let empty: Vec<u8> = vec![];
        assert!(shuffle(&empty, &mut rng).is_empty());
        assert_eq!(shuffle(&[42], &mut rng), vec![42]);
    }

    #[test]
    fn produces_more_than_one_ordering() {
        let mut rng = StdRng::seed_from_u64(99);
        let input: Vec<u32> = (0..6).collect();
        let first = shuffle(&input, &mut rng);
        let differs = (0..20).any(|_| shuffle(&input, &mut rng) != first);
        assert!(differs);
    }
}
