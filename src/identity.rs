//! Identity tokens for registered functions and receivers
//!
//! A [`FunctionId`] is derived from the type of a function item. Every
//! function and method in Rust has its own zero-sized item type, so the id
//! is unique per function even when the optimizer merges two bodies into one
//! address. The id of a method is the same no matter which receiver it is
//! bound to. A [`ReceiverId`] is assigned once, when a
//! [`Receiver`](crate::Receiver) is created, and is never reused. Neither
//! token is ever dereferenced.
//!
//! Function pointers (`fn(A) -> R`) are rejected at compile time: all
//! pointers of one signature share a type and could not be told apart.
//! Pass the function by name instead.

use std::any::TypeId;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};

/// Next receiver id to hand out
static NEXT_RECEIVER_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque identity of a free function or of a method independent of its receiver
#[derive(Clone, Copy)]
pub struct FunctionId {
    type_id: TypeId,
    name: &'static str,
}

impl FunctionId {
    /// Identity of a free function
    pub fn of_function<F, A, R>(_function: &F) -> Self
    where
        F: Fn(A) -> R + 'static,
    {
        Self::of_item::<F>()
    }

    /// Identity of a method taking its receiver mutably
    pub fn of_method<F, T, A, R>(_method: &F) -> Self
    where
        F: Fn(&mut T, A) -> R + 'static,
    {
        Self::of_item::<F>()
    }

    /// Identity of a method taking its receiver by shared reference
    pub fn of_method_ref<F, T, A, R>(_method: &F) -> Self
    where
        F: Fn(&T, A) -> R + 'static,
    {
        Self::of_item::<F>()
    }

    fn of_item<F: 'static>() -> Self {
        const {
            assert!(
                std::mem::size_of::<F>() == 0,
                "pass functions by name; fn pointers and capturing closures have no identity"
            )
        };

        Self {
            type_id: TypeId::of::<F>(),
            name: std::any::type_name::<F>(),
        }
    }

    /// Path of the function, for logging
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for FunctionId {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for FunctionId {}

impl Hash for FunctionId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl std::fmt::Debug for FunctionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("FunctionId").field(&self.name).finish()
    }
}

impl std::fmt::Display for FunctionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}

/// Opaque identity of one receiver instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReceiverId(u64);

impl ReceiverId {
    /// Allocate a fresh, process-unique id
    pub(crate) fn next() -> Self {
        Self(NEXT_RECEIVER_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value, useful for logging
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ReceiverId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "receiver#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    thread_local! {
        static HITS: Cell<u32> = const { Cell::new(0) };
    }

    fn double(x: i32) -> i32 {
        x * 2
    }

    fn triple(x: i32) -> i32 {
        x * 3
    }

    // Identical bodies; release builds may fold them into one address
    fn on_save(_: i32) {
        HITS.with(|hits| hits.set(hits.get() + 1));
    }

    fn on_load(_: i32) {
        HITS.with(|hits| hits.set(hits.get() + 1));
    }

    struct Counter {
        value: i32,
    }

    impl Counter {
        fn bump(&mut self, by: i32) {
            self.value += by;
        }

        fn bump_again(&mut self, by: i32) {
            self.value += by;
        }

        fn peek(&self, _: ()) -> i32 {
            self.value
        }
    }

    #[test]
    fn test_function_id_stable() {
        let a = FunctionId::of_function(&double);
        let b = FunctionId::of_function(&double);
        assert_eq!(a, b);
    }

    #[test]
    fn test_function_id_distinct() {
        let a = FunctionId::of_function(&double);
        let b = FunctionId::of_function(&triple);
        assert_ne!(a, b);
    }

    #[test]
    fn test_identical_bodies_distinct() {
        assert_ne!(
            FunctionId::of_function(&on_save),
            FunctionId::of_function(&on_load)
        );
        assert_ne!(
            FunctionId::of_method(&Counter::bump),
            FunctionId::of_method(&Counter::bump_again)
        );
    }

    #[test]
    fn test_method_id_ignores_receiver() {
        let mut first = Counter { value: 0 };
        let mut second = Counter { value: 10 };
        Counter::bump(&mut first, 1);
        Counter::bump(&mut second, 1);

        let a = FunctionId::of_method(&Counter::bump);
        let b = FunctionId::of_method(&Counter::bump);
        let c = FunctionId::of_method_ref(&Counter::peek);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(Counter::peek(&second, ()), 11);
    }

    #[test]
    fn test_receiver_ids_unique() {
        let a = ReceiverId::next();
        let b = ReceiverId::next();
        assert_ne!(a, b);
        assert!(b.as_u64() > a.as_u64());
    }

    #[test]
    fn test_display() {
        let id = ReceiverId::next();
        assert_eq!(id.to_string(), format!("receiver#{}", id.as_u64()));

        let f = FunctionId::of_function(&double);
        assert!(f.to_string().ends_with("double"));
        assert_eq!(f.name(), f.to_string());
    }
}
