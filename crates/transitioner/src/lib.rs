//! # Transition groups
//!
//! A transition group sits between a host's list of keyed children and what
//! is actually on screen. When children come and go it keeps the leaving ones
//! displayed until their leave transition finishes, and runs appear / enter
//! transitions for the new ones.
//!
//! - [`child_mapping`] / [`merge_mappings`]: keyed snapshots and the
//!   prev/next union that keeps leaving children next to their old neighbours.
//! - [`TransitionGroup`]: the coordinator. Owns the display set, the
//!   in-flight keys and the appear / enter / leave state machine.
//! - [`TransitionHandle`] / [`Done`]: per-key hooks and their one-shot
//!   completion signal.
//! - [`Transitioner`]: a ready-made host that runs CSS-style
//!   [`TransitionSpec`]s on bound [`StyleNode`]s.
//!
//! ## Driving a group by hand
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use transitioner::*;
//!
//! let group: TransitionGroup<&str> = TransitionGroup::new();
//! group.mount([Child::keyed("a", "A"), Child::keyed("b", "B")]);
//!
//! // `b` gets a leave hook that holds on to its completion token.
//! let pending = Rc::new(RefCell::new(None));
//! let p = pending.clone();
//! let b = Rc::new(TransitionHandle::new().on_will_leave(move |done| {
//!     *p.borrow_mut() = Some(done);
//! }));
//! group.attach(&Key::from("b"), &b);
//!
//! group.update([Child::keyed("a", "A")]);
//! assert_eq!(group.display_keys(), [Key::from("a"), Key::from("b")]);
//! assert_eq!(group.state_of(&Key::from("b")), Some(ChildState::Leaving));
//!
//! pending.borrow_mut().take().unwrap().complete();
//! assert_eq!(group.display_keys(), [Key::from("a")]);
//! ```
//!
//! ## Style transitions
//!
//! [`Transitioner`] wraps every child with a [`TransitionerConfig`] (default
//! duration and timing function plus optional appear / enter / leave specs),
//! mounts a [`StyleTransitionChild`] per key and lets the host's
//! [`FrameScheduler`] / [`TimerScheduler`] drive the timing. Timing tokens
//! go through [`resolve_timing_function`]: `"cubic.easeIn"` and
//! `"easeInCubic"` both become `cubic-bezier(.55,.055,.675,.19)`.

pub mod child_mapping;
pub mod config;
pub mod error;
pub mod group;
pub mod handle;
pub mod host;
pub mod style;
pub mod timing;

pub use child_mapping::*;
pub use config::*;
pub use error::*;
pub use group::*;
pub use handle::*;
pub use host::*;
pub use style::*;
pub use timing::*;

pub use transitioner_core::{
    FrameScheduler, Key, ManualScheduler, MemoryNode, Scope, StyleNode, TimerId, TimerScheduler,
};
