//! Receiver handles for bound methods
//!
//! A method can only be registered against a [`Receiver`], which pairs the
//! value with an assigned [`ReceiverId`]. Delegates keep a [`WeakReceiver`],
//! so registering a method never keeps the receiver alive, and a receiver
//! that has been dropped is detected at call time instead of dereferenced.

use std::cell::{Ref, RefCell, RefMut};
use std::rc::{Rc, Weak};

use crate::identity::ReceiverId;

/// Shared, single-threaded handle to a value that methods are bound to
///
/// Cloning a `Receiver` yields another handle to the same value with the
/// same id.
pub struct Receiver<T> {
    id: ReceiverId,
    cell: Rc<RefCell<T>>,
}

impl<T> Receiver<T> {
    /// Wrap a value and assign it a fresh id
    pub fn new(value: T) -> Self {
        Self {
            id: ReceiverId::next(),
            cell: Rc::new(RefCell::new(value)),
        }
    }

    /// Identity used as the outer key of method registrations
    pub fn id(&self) -> ReceiverId {
        self.id
    }

    /// Immutably borrow the value
    ///
    /// Panics if the value is currently mutably borrowed.
    pub fn borrow(&self) -> Ref<'_, T> {
        self.cell.borrow()
    }

    /// Mutably borrow the value
    ///
    /// Panics if the value is currently borrowed.
    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        self.cell.borrow_mut()
    }

    /// Create a non-owning handle to this receiver
    pub fn downgrade(&self) -> WeakReceiver<T> {
        WeakReceiver {
            id: self.id,
            cell: Rc::downgrade(&self.cell),
        }
    }

    pub(crate) fn cell(&self) -> &RefCell<T> {
        &self.cell
    }
}

impl<T> Clone for Receiver<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            cell: Rc::clone(&self.cell),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Receiver<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Receiver")
            .field("id", &self.id)
            .field("value", &self.cell)
            .finish()
    }
}

/// Non-owning handle to a [`Receiver`]
pub struct WeakReceiver<T> {
    id: ReceiverId,
    cell: Weak<RefCell<T>>,
}

impl<T> WeakReceiver<T> {
    /// Identity of the receiver this handle was created from
    pub fn id(&self) -> ReceiverId {
        self.id
    }

    /// Get a strong handle back, if the receiver is still alive
    pub fn upgrade(&self) -> Option<Receiver<T>> {
        self.cell.upgrade().map(|cell| Receiver { id: self.id, cell })
    }

    /// Check whether any strong handle to the receiver remains
    pub fn is_alive(&self) -> bool {
        self.cell.strong_count() > 0
    }
}

impl<T> Clone for WeakReceiver<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            cell: Weak::clone(&self.cell),
        }
    }
}

impl<T> std::fmt::Debug for WeakReceiver<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeakReceiver")
            .field("id", &self.id)
            .field("alive", &self.is_alive())
            .finish()
    }
}
