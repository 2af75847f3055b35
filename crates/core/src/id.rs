use std::{
    fmt,
    sync::atomic::{AtomicUsize, Ordering},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for NodeId {
    fn from(id: usize) -> Self {
        Self(id)
    }
}

/// Hands out node identities. Every call to [`IdGenerator::next_id`] returns a value
/// no earlier call on the same generator has returned; there is no way to rewind.
#[derive(Debug, Default)]
pub struct IdGenerator {
    next: AtomicUsize,
}

static GLOBAL_IDS: IdGenerator = IdGenerator::new();

impl IdGenerator {
    pub const fn new() -> Self {
        Self {
            next: AtomicUsize::new(0),
        }
    }

    /// The generator shared by every node built without an explicit one.
    pub fn global() -> &'static IdGenerator {
        &GLOBAL_IDS
    }

    pub fn next_id(&self) -> NodeId {
        NodeId(self.next.fetch_add(1, Ordering::Relaxed))
    }

    /// The identity the next call to `next_id` will return.
    pub fn peek(&self) -> NodeId {
        NodeId(self.next.load(Ordering::Relaxed))
    }
}

#[test]
fn ids_start_at_zero_and_advance() {
    let ids = IdGenerator::new();
    assert_eq!(ids.peek(), NodeId(0));
    assert_eq!(ids.next_id(), NodeId(0));
    assert_eq!(ids.next_id(), NodeId(1));
    assert_eq!(ids.next_id(), NodeId(2));
    assert_eq!(ids.peek(), NodeId(3));
}

#[test]
fn global_ids_are_monotonic() {
    let a = IdGenerator::global().next_id();
    let b = IdGenerator::global().next_id();
    assert!(b > a);
}

#[test]
fn ids_are_unique_across_threads() {
    use rustc_hash::FxHashSet;
    use std::{sync::Arc, thread};

    let ids = Arc::new(IdGenerator::new());
    let handles = (0..4)
        .map(|_| {
            let ids = Arc::clone(&ids);
            thread::spawn(move || (0..1000).map(|_| ids.next_id()).collect::<Vec<_>>())
        })
        .collect::<Vec<_>>();

    let mut seen = FxHashSet::default();
    for handle in handles {
        for id in handle.join().unwrap() {
            assert!(seen.insert(id), "{id} handed out twice");
        }
    }
    assert_eq!(seen.len(), 4000);
    assert_eq!(ids.peek(), NodeId(4000));
}
