//! # delegates-rs
//!
//! Single and multicast delegates for free functions and bound methods.
//!
//! A [`Delegate`] wraps one callable target. A [`MultiCast`] holds any number
//! of free functions and methods bound to [`Receiver`]s, and calls all of
//! them on one [`invoke`](MultiCast::invoke).
//!
//! ## Identity
//!
//! Free functions are identified by the type of their function item, so they
//! must be passed by name rather than as `fn` pointers. Methods are
//! identified by the pair (receiver, method), where the receiver identity is
//! a [`ReceiverId`] assigned when the [`Receiver`] is created. Delegates hold
//! receivers weakly: a dropped receiver is skipped (or reported by
//! [`MultiCast::try_invoke`]) instead of being called.
//!
//! ## Example
//!
//! ```rust
//! use delegates_rs::{MultiCast, Receiver};
//!
//! struct Counter {
//!     total: i32,
//! }
//!
//! impl Counter {
//!     fn add(&mut self, value: i32) -> i32 {
//!         self.total += value;
//!         self.total
//!     }
//! }
//!
//! fn double(value: i32) -> i32 {
//!     value * 2
//! }
//!
//! let counter = Receiver::new(Counter { total: 0 });
//!
//! let mut multi = MultiCast::new();
//! multi.add(double);
//! multi.add_method(&counter, Counter::add);
//! multi.add_method(&counter, Counter::add);
//!
//! // `double` runs once, `Counter::add` twice; the last result is returned
//! assert_eq!(multi.invoke(5), Some(10));
//! assert_eq!(counter.borrow().total, 10);
//! assert_eq!(multi.count(), 3);
//!
//! multi.remove_method(&counter, Counter::add);
//! assert_eq!(multi.member_count(), 1);
//! ```
//!
//! ## Threading
//!
//! Everything here is single-threaded: [`Receiver`] is built on `Rc` and
//! `RefCell`, so neither it nor a [`MultiCast`] holding methods can cross
//! threads. A handle cannot be mutated while it is being invoked.

pub mod callable;
pub mod error;
pub mod identity;
pub mod multicast;
pub mod receiver;

pub use callable::Delegate;
pub use error::DelegateError;
pub use identity::{FunctionId, ReceiverId};
pub use multicast::{MultiCast, MultiCastConfig, Subscription};
pub use receiver::{Receiver, WeakReceiver};
