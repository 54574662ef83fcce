//! Bound method registrations
//!
//! Methods are keyed by receiver, then by method. Registering the same
//! (receiver, method) pair again does not store another delegate; it bumps
//! the multiplicity of the existing [`Subscription`], whose delegate is then
//! called that many times per dispatch.

use indexmap::IndexMap;

use crate::callable::Delegate;
use crate::identity::{FunctionId, ReceiverId};

/// One (receiver, method) registration and how many times it was added
pub struct Subscription<A, R> {
    delegate: Delegate<A, R>,
    multiplicity: usize,
}

impl<A, R> Subscription<A, R> {
    /// The bound delegate shared by every duplicate registration
    pub fn delegate(&self) -> &Delegate<A, R> {
        &self.delegate
    }

    /// Number of times the pair is registered (always at least 1)
    pub fn multiplicity(&self) -> usize {
        self.multiplicity
    }
}

impl<A, R> std::fmt::Debug for Subscription<A, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("delegate", &self.delegate)
            .field("multiplicity", &self.multiplicity)
            .finish()
    }
}

/// Receiver identity to the methods registered on that receiver
pub(crate) struct MemberTable<A, R> {
    receivers: IndexMap<ReceiverId, IndexMap<FunctionId, Subscription<A, R>>>,
}

impl<A, R> MemberTable<A, R> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            receivers: IndexMap::with_capacity(capacity),
        }
    }

    /// Register a bound delegate, or bump the multiplicity of an existing one
    ///
    /// `make` is only called when the pair is new. Returns the multiplicity
    /// after the call.
    pub(crate) fn add(
        &mut self,
        receiver: ReceiverId,
        function: FunctionId,
        make: impl FnOnce() -> Delegate<A, R>,
    ) -> usize {
        let subscription = self
            .receivers
            .entry(receiver)
            .or_default()
            .entry(function)
            .and_modify(|s| s.multiplicity += 1)
            .or_insert_with(|| Subscription {
                delegate: make(),
                multiplicity: 1,
            });
        subscription.multiplicity
    }

    /// Drop one registration of the pair
    ///
    /// The subscription is deleted when its multiplicity reaches zero, and
    /// the receiver with its last subscription. Returns `false` if the pair
    /// was not registered.
    pub(crate) fn remove(&mut self, receiver: ReceiverId, function: FunctionId) -> bool {
        let Some(functions) = self.receivers.get_mut(&receiver) else {
            return false;
        };
        let Some(subscription) = functions.get_mut(&function) else {
            return false;
        };

        subscription.multiplicity -= 1;
        if subscription.multiplicity == 0 {
            functions.shift_remove(&function);
            if functions.is_empty() {
                self.receivers.shift_remove(&receiver);
            }
        }
        true
    }

    /// Drop every subscription of one receiver
    ///
    /// Returns the sum of the removed multiplicities.
    pub(crate) fn remove_receiver(&mut self, receiver: ReceiverId) -> usize {
        self.receivers
            .shift_remove(&receiver)
            .map_or(0, |functions| {
                functions.values().map(Subscription::multiplicity).sum()
            })
    }

    /// Drop every subscription whose receiver is gone
    ///
    /// Returns the sum of the removed multiplicities.
    pub(crate) fn purge_stale(&mut self) -> usize {
        let mut removed = 0;
        self.receivers.retain(|_, functions| {
            functions.retain(|_, subscription| {
                let alive = subscription.delegate.is_alive();
                if !alive {
                    removed += subscription.multiplicity;
                }
                alive
            });
            !functions.is_empty()
        });
        removed
    }

    /// Multiplicity of the pair, 0 if not registered
    pub(crate) fn multiplicity(&self, receiver: ReceiverId, function: FunctionId) -> usize {
        self.receivers
            .get(&receiver)
            .and_then(|functions| functions.get(&function))
            .map_or(0, Subscription::multiplicity)
    }

    /// Sum of multiplicities over all receivers
    pub(crate) fn count(&self) -> usize {
        self.iter().map(Subscription::multiplicity).sum()
    }

    /// Every subscription, receiver by receiver in first-registration order
    pub(crate) fn iter(&self) -> impl Iterator<Item = &Subscription<A, R>> + '_ {
        self.receivers.values().flat_map(|functions| functions.values())
    }

    /// True if both tables hold the same receivers, with the same methods
    /// at the same multiplicities
    pub(crate) fn same_subscriptions(&self, other: &Self) -> bool {
        self.receivers.len() == other.receivers.len()
            && self.receivers.iter().all(|(receiver, functions)| {
                let Some(others) = other.receivers.get(receiver) else {
                    return false;
                };
                functions.len() == others.len()
                    && functions.iter().all(|(function, subscription)| {
                        others
                            .get(function)
                            .is_some_and(|o| o.multiplicity == subscription.multiplicity)
                    })
            })
    }

    pub(crate) fn clear(&mut self) {
        self.receivers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::receiver::Receiver;

    #[derive(Default)]
    struct Log {
        calls: Vec<&'static str>,
    }

    impl Log {
        fn foo(&mut self, _: ()) {
            self.calls.push("foo");
        }

        fn bar(&mut self, _: ()) {
            self.calls.push("bar");
        }
    }

    fn foo_id() -> FunctionId {
        FunctionId::of_method(&Log::foo)
    }

    fn bar_id() -> FunctionId {
        FunctionId::of_method(&Log::bar)
    }

    fn add_foo(table: &mut MemberTable<(), ()>, receiver: &Receiver<Log>) -> usize {
        table.add(receiver.id(), foo_id(), || {
            Delegate::method(receiver, Log::foo)
        })
    }

    fn add_bar(table: &mut MemberTable<(), ()>, receiver: &Receiver<Log>) -> usize {
        table.add(receiver.id(), bar_id(), || {
            Delegate::method(receiver, Log::bar)
        })
    }

    #[test]
    fn test_add_counts_duplicates() {
        let log = Receiver::new(Log::default());
        let mut table = MemberTable::with_capacity(0);

        assert_eq!(add_foo(&mut table, &log), 1);
        assert_eq!(add_foo(&mut table, &log), 2);
        assert_eq!(add_bar(&mut table, &log), 1);

        assert_eq!(table.multiplicity(log.id(), foo_id()), 2);
        assert_eq!(table.count(), 3);
        // One stored delegate per pair
        assert_eq!(table.iter().count(), 2);
    }

    #[test]
    fn test_duplicate_reuses_delegate() {
        let log = Receiver::new(Log::default());
        let mut table = MemberTable::with_capacity(0);
        add_foo(&mut table, &log);

        let mut built = false;
        table.add(log.id(), foo_id(), || {
            built = true;
            Delegate::method(&log, Log::foo)
        });

        assert!(!built);
    }

    #[test]
    fn test_remove_decrements_then_deletes() {
        let log = Receiver::new(Log::default());
        let mut table = MemberTable::with_capacity(0);
        add_foo(&mut table, &log);
        add_foo(&mut table, &log);

        assert!(table.remove(log.id(), foo_id()));
        assert_eq!(table.multiplicity(log.id(), foo_id()), 1);

        assert!(table.remove(log.id(), foo_id()));
        assert_eq!(table.multiplicity(log.id(), foo_id()), 0);
        assert_eq!(table.count(), 0);
        assert!(table.receivers.is_empty());

        assert!(!table.remove(log.id(), foo_id()));
    }

    #[test]
    fn test_remove_unregistered_pair() {
        let a = Receiver::new(Log::default());
        let b = Receiver::new(Log::default());
        let mut table = MemberTable::with_capacity(0);
        add_foo(&mut table, &a);

        // Unknown receiver
        assert!(!table.remove(b.id(), foo_id()));
        // Known receiver, unknown method
        assert!(!table.remove(a.id(), bar_id()));

        assert_eq!(table.count(), 1);
    }

    #[test]
    fn test_same_method_different_receivers() {
        let a = Receiver::new(Log::default());
        let b = Receiver::new(Log::default());
        let mut table = MemberTable::with_capacity(0);

        add_foo(&mut table, &a);
        add_foo(&mut table, &b);

        assert_eq!(table.multiplicity(a.id(), foo_id()), 1);
        assert_eq!(table.multiplicity(b.id(), foo_id()), 1);
        assert_eq!(table.count(), 2);
    }

    #[test]
    fn test_remove_receiver() {
        let a = Receiver::new(Log::default());
        let b = Receiver::new(Log::default());
        let mut table = MemberTable::with_capacity(0);
        add_foo(&mut table, &a);
        add_foo(&mut table, &a);
        add_bar(&mut table, &a);
        add_bar(&mut table, &b);

        assert_eq!(table.remove_receiver(a.id()), 3);
        assert_eq!(table.count(), 1);
        assert_eq!(table.remove_receiver(a.id()), 0);
    }

    #[test]
    fn test_purge_stale() {
        let a = Receiver::new(Log::default());
        let b = Receiver::new(Log::default());
        let mut table = MemberTable::with_capacity(0);
        add_foo(&mut table, &a);
        add_foo(&mut table, &a);
        add_bar(&mut table, &b);

        drop(a);

        assert_eq!(table.purge_stale(), 2);
        assert_eq!(table.count(), 1);
        assert_eq!(table.receivers.len(), 1);
    }

    #[test]
    fn test_same_subscriptions() {
        let a = Receiver::new(Log::default());
        let mut left = MemberTable::with_capacity(0);
        let mut right = MemberTable::with_capacity(0);

        add_foo(&mut left, &a);
        add_foo(&mut right, &a);
        assert!(left.same_subscriptions(&right));

        add_foo(&mut right, &a);
        assert!(!left.same_subscriptions(&right));

        add_foo(&mut left, &a);
        add_bar(&mut left, &a);
        assert!(!left.same_subscriptions(&right));
        assert!(!right.same_subscriptions(&left));
    }
}
