use super::*;
use rustc_hash::FxHashSet;

#[test]
fn names_are_prefixed_hex() {
    let name = next_name();
    assert!(name.starts_with('v'));
    assert!(u64::from_str_radix(&name[1..], 16).is_ok());
    assert!(!name[1..].chars().any(|c| c.is_ascii_lowercase()));
}

#[test]
fn names_are_unique_across_threads() {
    let handles: Vec<_> = (0..4)
        .map(|_| std::thread::spawn(|| (0..500).map(|_| next_name()).collect::<Vec<_>>()))
        .collect();
    let mut seen = FxHashSet::default();
    for handle in handles {
        for name in handle.join().unwrap() {
            assert!(seen.insert(name), "duplicate name");
        }
    }
    assert_eq!(seen.len(), 2000);
}
