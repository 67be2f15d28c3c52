// Arena Property Tests
//
// Randomized checks of the bump arithmetic and save/restore behavior.

use arrowhead_mem::LinearArena;
use proptest::prelude::*;

const CAPACITY: usize = 4096;

proptest! {
    #[test]
    fn pushes_are_contiguous_and_bounded(sizes in proptest::collection::vec(0usize..256, 1..32)) {
        let arena = LinearArena::create(CAPACITY);
        let mut expected = 0usize;

        for size in sizes {
            match arena.try_push(size) {
                Ok(block) => {
                    prop_assert_eq!(block.as_ptr().addr() - arena.base().as_ptr().addr(), expected);
                    expected += size;
                }
                Err(_) => prop_assert!(expected + size > CAPACITY),
            }
            prop_assert_eq!(arena.pos(), expected);
            prop_assert!(arena.pos() <= arena.capacity());
            prop_assert_eq!(arena.cursor().as_ptr().addr(), arena.base().as_ptr().addr() + arena.pos());
        }
    }

    #[test]
    fn restore_returns_exact_position(
        before in 0usize..1024,
        after in proptest::collection::vec(0usize..256, 0..8),
    ) {
        let arena = LinearArena::create(CAPACITY);
        arena.push(before);

        let saved = arena.pos();
        let cursor = arena.cursor();
        for size in after {
            arena.push(size);
        }
        arena.set_pos_back(saved);

        prop_assert_eq!(arena.pos(), saved);
        prop_assert_eq!(arena.cursor(), cursor);
    }

    #[test]
    fn pop_clamps_at_zero(pushed in 0usize..CAPACITY, popped in 0usize..2 * CAPACITY) {
        let arena = LinearArena::create(CAPACITY);
        arena.push(pushed);
        arena.pop(popped);

        prop_assert_eq!(arena.pos(), pushed.saturating_sub(popped));
    }

    #[test]
    fn clear_is_idempotent(pushed in 0usize..CAPACITY, repeats in 1usize..4) {
        let arena = LinearArena::create(CAPACITY);
        arena.push(pushed);

        for _ in 0..repeats {
            arena.clear();
            prop_assert_eq!(arena.pos(), 0);
            prop_assert_eq!(arena.cursor(), arena.base());
        }
    }

    #[test]
    fn typed_pushes_are_aligned(padding in 0usize..16, count in 0usize..16) {
        let arena = LinearArena::create(CAPACITY);
        arena.push(padding);

        let wide = arena.push_array::<u64>(count);
        prop_assert_eq!(wide.as_ptr().addr() % std::mem::align_of::<u64>(), 0);

        arena.push(1);
        let vector = arena.push_struct::<u128>();
        prop_assert_eq!(vector.as_ptr().addr() % std::mem::align_of::<u128>(), 0);
    }
}
