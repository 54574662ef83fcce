//! Multicast delegates
//!
//! A [`MultiCast`] handle dispatches one call to every registered free
//! function and bound method, and returns the result of the last call.
//!
//! # Architecture
//!
//! ```text
//!                              MultiCast<A, R>
//!            ┌──────────────────────────┴──────────────────────────┐
//!            ▼                                                     ▼
//!      GlobalTable                                            MemberTable
//!  FunctionId ─► [Delegate, Delegate, ..]       ReceiverId ─► FunctionId ─► Subscription
//!  (one delegate per registration)                            { delegate, multiplicity }
//!            │                                                     │
//!            └──────────► invoke(args) ◄───────────────────────────┘
//!                 1. every global copy, first-registration order
//!                 2. every subscription, `multiplicity` times
//!                 result = last value produced
//! ```
//!
//! # Duplicate registrations
//!
//! The two tables count duplicates differently, and this shows in equality:
//! free function copies are separate list entries and are not compared,
//! method duplicates share one delegate with a counter that is compared.

mod config;
mod global;
mod member;
mod store;

pub use config::MultiCastConfig;
pub use member::Subscription;
pub use store::MultiCast;
