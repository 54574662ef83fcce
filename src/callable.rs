//! Single-target delegates
//!
//! A [`Delegate`] hides whether it calls a free function or a method bound
//! to a [`Receiver`] behind one [`Delegate::invoke`] operation. It is the
//! unit stored by [`MultiCast`](crate::MultiCast).
//!
//! Functions and methods are passed by name (`Delegate::function(on_save)`,
//! `Delegate::method(&recorder, Recorder::on_frame)`); see
//! [`FunctionId`] for why function pointers are not accepted. Arguments are
//! passed by value; use a tuple for several arguments.

use crate::error::DelegateError;
use crate::identity::{FunctionId, ReceiverId};
use crate::receiver::{Receiver, WeakReceiver};

/// A method bound to a receiver, with the receiver type erased
trait BoundMethod<A, R> {
    fn receiver_id(&self) -> ReceiverId;
    fn function_id(&self) -> FunctionId;
    fn is_alive(&self) -> bool;
    fn call(&self, args: A) -> Result<R, DelegateError>;
}

/// Method taking its receiver as `&mut T`
struct MutMethod<T, M> {
    receiver: WeakReceiver<T>,
    method: M,
    id: FunctionId,
}

impl<T, M, A, R> BoundMethod<A, R> for MutMethod<T, M>
where
    M: Fn(&mut T, A) -> R,
{
    fn receiver_id(&self) -> ReceiverId {
        self.receiver.id()
    }

    fn function_id(&self) -> FunctionId {
        self.id
    }

    fn is_alive(&self) -> bool {
        self.receiver.is_alive()
    }

    fn call(&self, args: A) -> Result<R, DelegateError> {
        let receiver = self
            .receiver
            .upgrade()
            .ok_or_else(|| DelegateError::StaleReceiver {
                receiver: self.receiver_id(),
                function: self.id,
            })?;

        let mut value = receiver
            .cell()
            .try_borrow_mut()
            .map_err(|_| DelegateError::ReceiverBusy {
                receiver: self.receiver_id(),
                function: self.id,
            })?;

        Ok((self.method)(&mut value, args))
    }
}

/// Method taking its receiver as `&T`
struct RefMethod<T, M> {
    receiver: WeakReceiver<T>,
    method: M,
    id: FunctionId,
}

impl<T, M, A, R> BoundMethod<A, R> for RefMethod<T, M>
where
    M: Fn(&T, A) -> R,
{
    fn receiver_id(&self) -> ReceiverId {
        self.receiver.id()
    }

    fn function_id(&self) -> FunctionId {
        self.id
    }

    fn is_alive(&self) -> bool {
        self.receiver.is_alive()
    }

    fn call(&self, args: A) -> Result<R, DelegateError> {
        let receiver = self
            .receiver
            .upgrade()
            .ok_or_else(|| DelegateError::StaleReceiver {
                receiver: self.receiver_id(),
                function: self.id,
            })?;

        let value = receiver
            .cell()
            .try_borrow()
            .map_err(|_| DelegateError::ReceiverBusy {
                receiver: self.receiver_id(),
                function: self.id,
            })?;

        Ok((self.method)(&value, args))
    }
}

enum Target<A, R> {
    Function {
        call: Box<dyn Fn(A) -> R>,
        id: FunctionId,
    },
    Method(Box<dyn BoundMethod<A, R>>),
}

/// A single invocable target: a free function or a bound method
pub struct Delegate<A, R = ()> {
    target: Target<A, R>,
}

impl<A, R> Delegate<A, R> {
    /// Delegate calling a free function
    pub fn function<F>(function: F) -> Self
    where
        F: Fn(A) -> R + 'static,
    {
        let id = FunctionId::of_function(&function);
        Self {
            target: Target::Function {
                call: Box::new(function),
                id,
            },
        }
    }

    /// Delegate calling `method` on `receiver` with a mutable borrow
    ///
    /// The delegate holds the receiver weakly.
    pub fn method<T, M>(receiver: &Receiver<T>, method: M) -> Self
    where
        T: 'static,
        M: Fn(&mut T, A) -> R + 'static,
    {
        let id = FunctionId::of_method(&method);
        Self {
            target: Target::Method(Box::new(MutMethod {
                receiver: receiver.downgrade(),
                method,
                id,
            })),
        }
    }

    /// Delegate calling `method` on `receiver` with a shared borrow
    pub fn method_ref<T, M>(receiver: &Receiver<T>, method: M) -> Self
    where
        T: 'static,
        M: Fn(&T, A) -> R + 'static,
    {
        let id = FunctionId::of_method_ref(&method);
        Self {
            target: Target::Method(Box::new(RefMethod {
                receiver: receiver.downgrade(),
                method,
                id,
            })),
        }
    }

    /// Call the target
    ///
    /// Free functions always succeed. Bound methods fail if the receiver was
    /// dropped or is already borrowed.
    pub fn invoke(&self, args: A) -> Result<R, DelegateError> {
        match &self.target {
            Target::Function { call, .. } => Ok(call(args)),
            Target::Method(bound) => bound.call(args),
        }
    }

    /// Identity of the function or method, independent of any receiver
    pub fn function_id(&self) -> FunctionId {
        match &self.target {
            Target::Function { id, .. } => *id,
            Target::Method(bound) => bound.function_id(),
        }
    }

    /// Receiver of a bound method, `None` for free functions
    pub fn receiver_id(&self) -> Option<ReceiverId> {
        match &self.target {
            Target::Function { .. } => None,
            Target::Method(bound) => Some(bound.receiver_id()),
        }
    }

    /// Whether the delegate can still be called
    pub fn is_alive(&self) -> bool {
        match &self.target {
            Target::Function { .. } => true,
            Target::Method(bound) => bound.is_alive(),
        }
    }
}

impl<A, R> std::fmt::Debug for Delegate<A, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Delegate")
            .field("function", &self.function_id())
            .field("receiver", &self.receiver_id())
            .finish()
    }
}
