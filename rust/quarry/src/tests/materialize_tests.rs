use ordered_float::OrderedFloat;

use super::{counted, pulls};
use crate::{ErrorKind, Sequence, SortOrder, seq};

#[derive(Debug, Clone, PartialEq)]
struct Person {
    name: &'static str,
    age: u32,
    score: f64,
}

fn people() -> Sequence<'static, Person> {
    seq![
        Person { name: "Bob", age: 30, score: 7.5 },
        Person { name: "Alice", age: 25, score: 9.0 },
        Person { name: "Charlie", age: 35, score: 7.5 },
    ]
}

#[test]
fn test_order_by_key_ascending() {
    let names = people()
        .order_by_key(|p| p.age, SortOrder::Ascending)
        .map(|p| p.name)
        .to_vec();
    assert_eq!(names, vec!["Alice", "Bob", "Charlie"]);
}

#[test]
fn test_order_by_key_descending_is_stable() {
    let names = people()
        .order_by_key(|p| OrderedFloat(p.score), SortOrder::Descending)
        .map(|p| p.name)
        .to_vec();
    assert_eq!(names, vec!["Alice", "Bob", "Charlie"]);
}

#[test]
fn test_order_by_strings_bytewise() {
    let sorted = seq!["pear", "Apple", "apple", "Zoo"].order_by_key(|s| *s, SortOrder::Ascending);
    assert_eq!(sorted.to_vec(), vec!["Apple", "Zoo", "apple", "pear"]);
}

#[test]
fn test_order_by_comparator() {
    let sorted = seq![2.5f64, -1.0, 10.0, 0.0].order_by(|a, b| b.total_cmp(a));
    assert_eq!(sorted.to_vec(), vec![10.0, 2.5, 0.0, -1.0]);

    let by_len_then_alpha = seq!["bb", "a", "ab", "c"].order_by(|a, b| {
        a.len().cmp(&b.len()).then_with(|| a.cmp(b))
    });
    assert_eq!(by_len_then_alpha.to_vec(), vec!["a", "c", "ab", "bb"]);
}

#[test]
fn test_materialization_is_deferred() {
    let (source, pulled) = counted(10);
    let reversed = source.reverse();
    assert_eq!(pulls(&pulled), 0);
    assert_eq!(reversed.first().unwrap(), 9);
    assert_eq!(pulls(&pulled), 10);
    assert_eq!(reversed.take(3).to_vec(), vec![9, 8, 7]);
}

#[test]
fn test_reverse_twice_is_identity() {
    let seq = Sequence::range(0, 7);
    assert_eq!(seq.reverse().reverse().to_vec(), seq.to_vec());
    assert!(Sequence::<u8>::empty().reverse().is_empty());
}

#[test]
fn test_shuffle_is_permutation() {
    let seq = Sequence::range(0, 100);
    let mut shuffled = seq.shuffle().to_vec();
    assert_eq!(shuffled.len(), 100);
    shuffled.sort();
    assert_eq!(shuffled, seq.to_vec());
}

#[test]
fn test_shuffle_with_seed_is_reproducible() {
    let seq = Sequence::range(0, 50);
    let a = seq.shuffle_with(fastrand::Rng::with_seed(42));
    let b = seq.shuffle_with(fastrand::Rng::with_seed(42));
    assert_eq!(a.to_vec(), b.to_vec());
    assert_eq!(a.to_vec(), a.to_vec());
    assert_ne!(a.to_vec(), seq.to_vec());
}

#[test]
fn test_skip_last_take_last() {
    let seq = seq![1, 2, 3, 4, 5];
    assert_eq!(seq.skip_last(2).to_vec(), vec![1, 2, 3]);
    assert!(seq.skip_last(5).is_empty());
    assert!(seq.skip_last(9).is_empty());
    assert_eq!(seq.skip_last(0).count(), 5);

    assert_eq!(seq.take_last(2).to_vec(), vec![4, 5]);
    assert_eq!(seq.take_last(9).to_vec(), vec![1, 2, 3, 4, 5]);
    assert!(seq.take_last(0).is_empty());
}

#[test]
fn test_chunk() {
    let chunks = seq!["a", "b", "c", "d", "e", "f", "g", "h"].chunk(3).unwrap();
    let sizes: Vec<usize> = chunks.iter().map(|c| c.count()).collect();
    assert_eq!(sizes, vec![3, 3, 2]);
    assert_eq!(chunks.last().unwrap().to_vec(), vec!["g", "h"]);
    assert_eq!(chunks.flatten().count(), 8);
}

#[test]
fn test_chunk_exact_and_empty() {
    assert_eq!(Sequence::range(0, 4).chunk(2).unwrap().count(), 2);
    assert!(Sequence::<i32>::empty().chunk(3).unwrap().is_empty());
}

#[test]
fn test_chunk_zero_is_rejected() {
    let err = Sequence::range(0, 4).chunk(0).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::InvalidArgument { .. }));
}

#[test]
fn test_order_by_equal_keys_keep_source_order() {
    let pairs = seq![(1, 'a'), (0, 'b'), (1, 'c'), (0, 'd')];
    let sorted = pairs.order_by(|x, y| x.0.cmp(&y.0));
    assert_eq!(sorted.map(|p| p.1).to_vec(), vec!['b', 'd', 'a', 'c']);
}
