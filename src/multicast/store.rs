//! Multicast delegate handle
//!
//! [`MultiCast`] owns one table of free function registrations and one table
//! of bound method registrations and dispatches a single call to all of them.

use crate::callable::Delegate;
use crate::error::DelegateError;
use crate::identity::{FunctionId, ReceiverId};
use crate::receiver::Receiver;

use super::config::MultiCastConfig;
use super::global::GlobalTable;
use super::member::{MemberTable, Subscription};

/// A handle that calls every registered function and method on one invoke
///
/// # Dispatch order
///
/// Free functions run first, then bound methods. Within each group, entries
/// run in the order they were first registered; duplicates of a free function
/// run back to back, and a method registered `n` times on a receiver runs `n`
/// times in a row. Removing an entry keeps the relative order of the rest.
///
/// # Result
///
/// The value returned by a dispatch is the result of the **last** call made,
/// or `None` if nothing was called.
///
/// # Ownership
///
/// The handle exclusively owns its delegates and is not `Clone`. Bound
/// methods hold their receiver weakly, so registering never keeps a receiver
/// alive.
///
/// # Dropped receivers
///
/// Methods whose receiver has been dropped are skipped by
/// [`invoke`](Self::invoke) but stay registered, and keep counting toward
/// [`member_count`](Self::member_count), until the next `add*` or `remove*`
/// call prunes them. Call [`purge_stale`](Self::purge_stale) to prune them
/// without changing anything else.
pub struct MultiCast<A, R = ()> {
    globals: GlobalTable<A, R>,
    members: MemberTable<A, R>,
    config: MultiCastConfig,
}

impl<A, R> MultiCast<A, R> {
    /// Create an empty handle with default configuration
    pub fn new() -> Self {
        Self::with_config(MultiCastConfig::default())
    }

    /// Create an empty handle with custom configuration
    pub fn with_config(config: MultiCastConfig) -> Self {
        Self {
            globals: GlobalTable::with_capacity(config.global_capacity),
            members: MemberTable::with_capacity(config.receiver_capacity),
            config,
        }
    }

    /// Get the handle configuration
    pub fn config(&self) -> &MultiCastConfig {
        &self.config
    }

    /// Register a free function
    ///
    /// Every call stores another independent copy. Returns the number of
    /// copies of `function` now registered.
    pub fn add<F>(&mut self, function: F) -> usize
    where
        F: Fn(A) -> R + 'static,
    {
        self.prune_stale();

        let id = FunctionId::of_function(&function);
        let copies = self.globals.add(function);

        tracing::debug!(
            function = %id,
            copies = copies,
            "Function registered"
        );

        copies
    }

    /// Register a method taking its receiver mutably
    ///
    /// Registering the same pair again raises its multiplicity instead of
    /// storing another delegate. Returns the multiplicity after the call.
    pub fn add_method<T, M>(&mut self, receiver: &Receiver<T>, method: M) -> usize
    where
        T: 'static,
        M: Fn(&mut T, A) -> R + 'static,
    {
        self.prune_stale();

        let function = FunctionId::of_method(&method);
        let multiplicity = self.members.add(receiver.id(), function, || {
            Delegate::method(receiver, method)
        });
        self.log_method_added(receiver.id(), function, multiplicity);
        multiplicity
    }

    /// Register a method taking its receiver by shared reference
    pub fn add_method_ref<T, M>(&mut self, receiver: &Receiver<T>, method: M) -> usize
    where
        T: 'static,
        M: Fn(&T, A) -> R + 'static,
    {
        self.prune_stale();

        let function = FunctionId::of_method_ref(&method);
        let multiplicity = self.members.add(receiver.id(), function, || {
            Delegate::method_ref(receiver, method)
        });
        self.log_method_added(receiver.id(), function, multiplicity);
        multiplicity
    }

    /// Remove one registration of a free function
    ///
    /// Removing a function that is not registered does nothing and returns
    /// `false`.
    pub fn remove<F>(&mut self, function: F) -> bool
    where
        F: Fn(A) -> R + 'static,
    {
        self.prune_stale();

        let id = FunctionId::of_function(&function);
        let removed = self.globals.remove(id);

        if removed {
            tracing::debug!(
                function = %id,
                copies = self.globals.copies(id),
                "Function unregistered"
            );
        } else {
            tracing::debug!(function = %id, "Function not registered, nothing removed");
        }

        removed
    }

    /// Remove one registration of a mutable method on `receiver`
    pub fn remove_method<T, M>(&mut self, receiver: &Receiver<T>, method: M) -> bool
    where
        M: Fn(&mut T, A) -> R + 'static,
    {
        self.prune_stale();
        self.remove_pair(receiver.id(), FunctionId::of_method(&method))
    }

    /// Remove one registration of a shared-reference method on `receiver`
    pub fn remove_method_ref<T, M>(&mut self, receiver: &Receiver<T>, method: M) -> bool
    where
        M: Fn(&T, A) -> R + 'static,
    {
        self.prune_stale();
        self.remove_pair(receiver.id(), FunctionId::of_method_ref(&method))
    }

    /// Remove every method registered on one receiver
    ///
    /// Returns the number of registrations removed.
    pub fn remove_receiver(&mut self, receiver: ReceiverId) -> usize {
        let removed = self.members.remove_receiver(receiver);

        if removed > 0 {
            tracing::debug!(receiver = %receiver, removed = removed, "Receiver unregistered");
        } else {
            tracing::debug!(receiver = %receiver, "Receiver not registered, nothing removed");
        }

        self.prune_stale();
        removed
    }

    /// Remove every method whose receiver has been dropped
    ///
    /// Returns the number of registrations removed.
    pub fn purge_stale(&mut self) -> usize {
        let removed = self.members.purge_stale();

        if removed > 0 {
            tracing::debug!(removed = removed, "Stale receivers purged");
        }

        removed
    }

    /// Remove every registration
    pub fn clear(&mut self) {
        self.globals.clear();
        self.members.clear();

        tracing::debug!("Multicast delegate cleared");
    }

    /// True if at least one copy of `function` is registered
    pub fn contains<F>(&self, function: F) -> bool
    where
        F: Fn(A) -> R + 'static,
    {
        self.copies(function) > 0
    }

    /// Number of copies of `function` registered
    pub fn copies<F>(&self, function: F) -> usize
    where
        F: Fn(A) -> R + 'static,
    {
        self.globals.copies(FunctionId::of_function(&function))
    }

    /// Multiplicity of a mutable method on `receiver`, 0 if not registered
    pub fn method_multiplicity<T, M>(&self, receiver: &Receiver<T>, method: M) -> usize
    where
        M: Fn(&mut T, A) -> R + 'static,
    {
        let function = FunctionId::of_method(&method);
        self.members.multiplicity(receiver.id(), function)
    }

    /// Multiplicity of a shared-reference method on `receiver`
    pub fn method_ref_multiplicity<T, M>(&self, receiver: &Receiver<T>, method: M) -> usize
    where
        M: Fn(&T, A) -> R + 'static,
    {
        let function = FunctionId::of_method_ref(&method);
        self.members.multiplicity(receiver.id(), function)
    }

    /// Method subscriptions in dispatch order
    pub fn subscriptions(&self) -> impl Iterator<Item = &Subscription<A, R>> + '_ {
        self.members.iter()
    }

    /// Total number of registrations
    pub fn count(&self) -> usize {
        self.member_count() + self.global_count()
    }

    /// Number of method registrations, counting multiplicity
    pub fn member_count(&self) -> usize {
        self.members.count()
    }

    /// Number of free function registrations, counting copies
    pub fn global_count(&self) -> usize {
        self.globals.count()
    }

    /// True if nothing is registered
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    fn remove_pair(&mut self, receiver: ReceiverId, function: FunctionId) -> bool {
        let removed = self.members.remove(receiver, function);

        if removed {
            tracing::debug!(
                receiver = %receiver,
                function = %function,
                multiplicity = self.members.multiplicity(receiver, function),
                "Method unregistered"
            );
        } else {
            tracing::debug!(
                receiver = %receiver,
                function = %function,
                "Method not registered, nothing removed"
            );
        }

        removed
    }

    fn log_method_added(&self, receiver: ReceiverId, function: FunctionId, multiplicity: usize) {
        tracing::debug!(
            receiver = %receiver,
            function = %function,
            multiplicity = multiplicity,
            "Method registered"
        );
    }

    fn prune_stale(&mut self) {
        let pruned = self.members.purge_stale();

        if pruned > 0 {
            tracing::debug!(pruned = pruned, "Dropped receivers pruned");
        }
    }
}

impl<A: Clone, R> MultiCast<A, R> {
    /// Call every registration with `args`
    ///
    /// Methods whose receiver was dropped or is already borrowed are skipped.
    /// Returns the result of the last call made, `None` if nothing ran.
    pub fn invoke(&self, args: A) -> Option<R> {
        let warn = self.config.warn_on_stale;

        let result = self.dispatch(args, |err| {
            if warn {
                tracing::warn!(
                    receiver = %err.receiver(),
                    function = %err.function(),
                    error = %err,
                    "Skipping method"
                );
            }
            Ok(())
        });

        // The skip handler never fails
        result.unwrap_or(None)
    }

    /// Call every registration with `args`, stopping at the first method that
    /// cannot be called
    ///
    /// Calls made before the failure are not undone.
    pub fn try_invoke(&self, args: A) -> Result<Option<R>, DelegateError> {
        self.dispatch(args, Err)
    }

    /// Like [`invoke`](Self::invoke), returning `R::default()` if nothing ran
    pub fn invoke_or_default(&self, args: A) -> R
    where
        R: Default,
    {
        self.invoke(args).unwrap_or_default()
    }

    fn dispatch<F>(&self, args: A, mut on_error: F) -> Result<Option<R>, DelegateError>
    where
        F: FnMut(DelegateError) -> Result<(), DelegateError>,
    {
        tracing::trace!(
            globals = self.global_count(),
            members = self.member_count(),
            "Invoking multicast delegate"
        );

        let mut last = None;

        for delegate in self.globals.iter() {
            last = Some(delegate.invoke(args.clone())?);
        }

        for subscription in self.members.iter() {
            for _ in 0..subscription.multiplicity() {
                match subscription.delegate().invoke(args.clone()) {
                    Ok(value) => last = Some(value),
                    Err(err) => {
                        on_error(err)?;
                        // Remaining repetitions would fail the same way
                        break;
                    }
                }
            }
        }

        Ok(last)
    }
}

impl<A, R> Default for MultiCast<A, R> {
    fn default() -> Self {
        Self::new()
    }
}

/// Handles are equal when they hold the same methods on the same receivers at
/// the same multiplicities, and the same set of free functions. How many
/// copies of a free function each handle holds is not compared.
impl<A, R> PartialEq for MultiCast<A, R> {
    fn eq(&self, other: &Self) -> bool {
        self.members.same_subscriptions(&other.members)
            && self.globals.same_functions(&other.globals)
    }
}

impl<A, R> Eq for MultiCast<A, R> {}

impl<A, R> std::fmt::Debug for MultiCast<A, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultiCast")
            .field("global_count", &self.global_count())
            .field("member_count", &self.member_count())
            .finish()
    }
}
