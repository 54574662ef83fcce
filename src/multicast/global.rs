//! Free function registrations
//!
//! Every registration of a free function is stored as its own [`Delegate`],
//! so registering the same function twice keeps two independently removable
//! copies under one key. There is no counter.

use indexmap::IndexMap;

use crate::callable::Delegate;
use crate::identity::FunctionId;

/// Function identity to the ordered copies registered for it
pub(crate) struct GlobalTable<A, R> {
    entries: IndexMap<FunctionId, Vec<Delegate<A, R>>>,
}

impl<A, R> GlobalTable<A, R> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
        }
    }

    /// Append one more copy of `function`
    ///
    /// Returns the number of copies now registered for it.
    pub(crate) fn add<F>(&mut self, function: F) -> usize
    where
        F: Fn(A) -> R + 'static,
    {
        let delegate = Delegate::function(function);
        let copies = self.entries.entry(delegate.function_id()).or_default();
        copies.push(delegate);
        copies.len()
    }

    /// Remove one copy of the function identified by `id`
    ///
    /// The first copy in registration order goes; all copies behave the
    /// same. The key is dropped with its last copy. Returns `false` if the
    /// function was not registered.
    pub(crate) fn remove(&mut self, id: FunctionId) -> bool {
        let Some(copies) = self.entries.get_mut(&id) else {
            return false;
        };

        copies.remove(0);
        if copies.is_empty() {
            self.entries.shift_remove(&id);
        }
        true
    }

    /// Number of copies registered for the function identified by `id`
    pub(crate) fn copies(&self, id: FunctionId) -> usize {
        self.entries.get(&id).map_or(0, Vec::len)
    }

    /// Total number of copies across all functions
    pub(crate) fn count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Every copy, grouped by function in first-registration order
    pub(crate) fn iter(&self) -> impl Iterator<Item = &Delegate<A, R>> + '_ {
        self.entries.values().flatten()
    }

    /// True if both tables hold the same set of functions
    ///
    /// How many copies each function has is not compared.
    pub(crate) fn same_functions(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self.entries.keys().all(|id| other.entries.contains_key(id))
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one(_: ()) -> u8 {
        1
    }

    fn two(_: ()) -> u8 {
        2
    }

    #[test]
    fn test_add_duplicates() {
        let mut table = GlobalTable::with_capacity(0);

        assert_eq!(table.add(one), 1);
        assert_eq!(table.add(one), 2);
        assert_eq!(table.add(two), 1);

        assert_eq!(table.copies(FunctionId::of_function(&one)), 2);
        assert_eq!(table.count(), 3);
    }

    #[test]
    fn test_iteration_order() {
        let mut table = GlobalTable::with_capacity(0);
        table.add(two);
        table.add(one);
        table.add(two);

        let results: Vec<u8> = table.iter().map(|d| d.invoke(()).unwrap()).collect();
        assert_eq!(results, vec![2, 2, 1]);
    }

    #[test]
    fn test_remove_one_copy() {
        let mut table = GlobalTable::with_capacity(0);
        table.add(one);
        table.add(one);
        let id = FunctionId::of_function(&one);

        assert!(table.remove(id));
        assert_eq!(table.copies(id), 1);

        assert!(table.remove(id));
        assert_eq!(table.copies(id), 0);
        assert_eq!(table.count(), 0);

        // Nothing left to remove
        assert!(!table.remove(id));
    }

    #[test]
    fn test_remove_unregistered() {
        let mut table = GlobalTable::with_capacity(0);
        table.add(one);

        assert!(!table.remove(FunctionId::of_function(&two)));
        assert_eq!(table.count(), 1);
    }

    #[test]
    fn test_same_functions_ignores_copies() {
        let mut a = GlobalTable::with_capacity(0);
        let mut b = GlobalTable::with_capacity(0);

        a.add(one);
        b.add(one);
        b.add(one);
        assert!(a.same_functions(&b));

        b.add(two);
        assert!(!a.same_functions(&b));
        assert!(!b.same_functions(&a));
    }

    #[test]
    fn test_clear() {
        let mut table = GlobalTable::with_capacity(4);
        table.add(one);
        table.add(two);

        table.clear();

        assert_eq!(table.count(), 0);
        assert_eq!(table.iter().count(), 0);
    }
}
