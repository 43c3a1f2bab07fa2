use super::{counted, pulls};
use crate::{Sequence, seq};

#[test]
fn test_group_by_first_char() {
    let words = seq!["apple", "banana", "cherry", "apricot", "blueberry"];
    let groups = words.group_by(|w| w.as_bytes()[0]);

    assert_eq!(groups.len(), 3);
    assert_eq!(groups.keys().copied().collect::<Vec<_>>(), vec![b'a', b'b', b'c']);
    assert_eq!(groups.get(&b'a').unwrap().to_vec(), vec!["apple", "apricot"]);
    assert_eq!(groups.get(&b'b').unwrap().to_vec(), vec!["banana", "blueberry"]);
    assert_eq!(groups.get(&b'c').unwrap().to_vec(), vec!["cherry"]);
    assert!(groups.get(&b'z').is_none());
    assert!(!groups.contains_key(&b'z'));
}

#[test]
fn test_group_by_preserves_first_seen_key_order() {
    let seq = Sequence::range(0, 20);
    let groups = seq.group_by(|x| (x * 7) % 5);
    let keys: Vec<i64> = groups.iter().map(|(k, _)| *k).collect();
    assert_eq!(keys, vec![0, 2, 4, 1, 3]);

    let total: usize = groups.into_iter().map(|(_, g)| g.count()).sum();
    assert_eq!(total, 20);
}

#[test]
fn test_group_by_is_eager() {
    let (source, pulled) = counted(6);
    let groups = source.group_by(|x| x % 2 == 0);
    assert_eq!(pulls(&pulled), 6);
    assert_eq!(groups.get(&true).unwrap().to_vec(), vec![0, 2, 4]);
    assert_eq!(pulls(&pulled), 6);
}

#[test]
fn test_group_by_empty() {
    let groups = Sequence::<u8>::empty().group_by(|x| *x);
    assert!(groups.is_empty());
    assert_eq!(format!("{groups:?}"), "[]");
}

#[test]
fn test_partition() {
    let (even, odd) = Sequence::range(1, 10).partition(|x| x % 2 == 0);
    assert_eq!(even.to_vec(), vec![2, 4, 6, 8, 10]);
    assert_eq!(odd.to_vec(), vec![1, 3, 5, 7, 9]);
    assert_eq!(even.first().unwrap(), 2);
}

#[test]
fn test_partition_single_pass() {
    let (source, pulled) = counted(8);
    let (small, large) = source.partition(|x| *x < 3);
    assert_eq!(pulls(&pulled), 8);
    assert_eq!(small.count() + large.count(), 8);
}
