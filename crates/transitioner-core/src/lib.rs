//! # Host primitives
//!
//! Transitioner never talks to a concrete view tree. Everything it needs from
//! the host goes through the small pieces in this crate:
//!
//! - [`Key`]: caller-supplied identity of a child (string or integer).
//! - [`StyleNode`]: a retained node whose inline style can be written and read.
//! - [`FrameScheduler`] / [`TimerScheduler`]: "next paint" and "after N ms".
//! - [`Scope`]: cleanups that run once, when the owner is torn down.
//!
//! ## Deterministic hosts
//!
//! [`ManualScheduler`] implements both scheduling traits and only moves when
//! told to, which is what headless hosts and tests want:
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use transitioner_core::*;
//! use web_time::Duration;
//!
//! let sched = ManualScheduler::new();
//! let fired = Rc::new(Cell::new(false));
//! let f = fired.clone();
//! sched.set_timeout(Duration::from_millis(500), Box::new(move || f.set(true)));
//!
//! sched.advance(Duration::from_millis(499));
//! assert!(!fired.get());
//! sched.advance(Duration::from_millis(1));
//! assert!(fired.get());
//! ```
//!
//! ## Scopes
//!
//! A [`Scope`] collects cleanups (cancel a timer, detach a listener) and runs
//! them exactly once on [`Scope::dispose`]. Anything registered after disposal
//! runs immediately, so late timers can't outlive their owner.

pub mod key;
pub mod node;
pub mod scheduler;
pub mod scope;
pub mod tests;

pub use key::*;
pub use node::*;
pub use scheduler::*;
pub use scope::*;
