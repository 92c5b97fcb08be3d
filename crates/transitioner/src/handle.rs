use std::fmt;
use std::rc::{Rc, Weak};

use transitioner_core::Key;

/// Which lifecycle transition a key is going through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    Appear,
    Enter,
    Leave,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Appear => "appear",
            Phase::Enter => "enter",
            Phase::Leave => "leave",
        })
    }
}

pub type WillHook = Rc<dyn Fn(Done)>;
pub type DidHook = Rc<dyn Fn()>;

/// Per-key lifecycle hooks, each one optional.
///
/// A missing `will_*` hook means "finished immediately". Every `will_*` hook
/// receives a [`Done`] token and must eventually call [`Done::complete`];
/// until then the key stays mid-transition.
#[derive(Clone, Default)]
pub struct TransitionHandle {
    pub will_appear: Option<WillHook>,
    pub did_appear: Option<DidHook>,
    pub will_enter: Option<WillHook>,
    pub did_enter: Option<DidHook>,
    pub will_leave: Option<WillHook>,
    pub did_leave: Option<DidHook>,
}

impl TransitionHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_will_appear(mut self, f: impl Fn(Done) + 'static) -> Self {
        self.will_appear = Some(Rc::new(f));
        self
    }
    pub fn on_did_appear(mut self, f: impl Fn() + 'static) -> Self {
        self.did_appear = Some(Rc::new(f));
        self
    }
    pub fn on_will_enter(mut self, f: impl Fn(Done) + 'static) -> Self {
        self.will_enter = Some(Rc::new(f));
        self
    }
    pub fn on_did_enter(mut self, f: impl Fn() + 'static) -> Self {
        self.did_enter = Some(Rc::new(f));
        self
    }
    pub fn on_will_leave(mut self, f: impl Fn(Done) + 'static) -> Self {
        self.will_leave = Some(Rc::new(f));
        self
    }
    pub fn on_did_leave(mut self, f: impl Fn() + 'static) -> Self {
        self.did_leave = Some(Rc::new(f));
        self
    }

    pub fn will(&self, phase: Phase) -> Option<&WillHook> {
        match phase {
            Phase::Appear => self.will_appear.as_ref(),
            Phase::Enter => self.will_enter.as_ref(),
            Phase::Leave => self.will_leave.as_ref(),
        }
    }

    pub fn did(&self, phase: Phase) -> Option<&DidHook> {
        match phase {
            Phase::Appear => self.did_appear.as_ref(),
            Phase::Enter => self.did_enter.as_ref(),
            Phase::Leave => self.did_leave.as_ref(),
        }
    }
}

impl fmt::Debug for TransitionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionHandle")
            .field("will_appear", &self.will_appear.is_some())
            .field("did_appear", &self.did_appear.is_some())
            .field("will_enter", &self.will_enter.is_some())
            .field("did_enter", &self.did_enter.is_some())
            .field("will_leave", &self.will_leave.is_some())
            .field("did_leave", &self.did_leave.is_some())
            .finish()
    }
}

/// Receiver of completion signals; implemented by the group.
pub(crate) trait CompletionSink {
    fn complete(self: Rc<Self>, phase: Phase, key: Key);
    fn is_live(&self) -> bool;
}

/// One-shot completion signal for a single transition.
///
/// Consumed by [`Done::complete`], so it can fire at most once. Completing
/// after the group was torn down (or dropped) does nothing.
pub struct Done {
    sink: Weak<dyn CompletionSink>,
    phase: Phase,
    key: Key,
    settled: bool,
}

impl Done {
    pub(crate) fn new(sink: Weak<dyn CompletionSink>, phase: Phase, key: Key) -> Self {
        Self {
            sink,
            phase,
            key,
            settled: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn key(&self) -> &Key {
        &self.key
    }

    /// Signals that the visual transition finished.
    pub fn complete(mut self) {
        self.settled = true;
        if let Some(sink) = self.sink.upgrade() {
            sink.complete(self.phase, self.key.clone());
        }
    }

    /// Drops the token without signalling. Used when the owner of the
    /// transition is torn down.
    pub fn abandon(mut self) {
        self.settled = true;
    }
}

impl Drop for Done {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        if let Some(sink) = self.sink.upgrade()
            && sink.is_live()
        {
            log::warn!(
                "{} of `{}` dropped without completing; key stays mid-transition",
                self.phase,
                self.key
            );
        }
    }
}

impl fmt::Debug for Done {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Done")
            .field("phase", &self.phase)
            .field("key", &self.key)
            .finish()
    }
}
