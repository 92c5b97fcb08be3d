//! Transition group: keeps leaving children on screen and drives every key
//! through appear / enter / leave.
//!
//! A host drives the group in three phases per pass, mirroring a render
//! cycle:
//!
//! 1. [`TransitionGroup::receive`] takes the new children, commits the merged
//!    display set and queues the keys that need to enter or leave.
//! 2. [`TransitionGroup::render`] yields the display set through the child
//!    factory; the host mounts it and [`attach`](TransitionGroup::attach)es a
//!    handle per key.
//! 3. [`TransitionGroup::commit`] starts the queued transitions.
//!
//! [`mount`](TransitionGroup::mount) / [`update`](TransitionGroup::update)
//! run all three for hosts whose handles are already attached.
//!
//! Completion signals are not handled re-entrantly. Starts and completions go
//! through one command queue; whatever a step produces (a synchronous
//! completion, a follow-up leave or enter) runs before anything queued
//! earlier. A transition that completes from inside its own hook is therefore
//! fully processed, removal from the display set included, before the next
//! queued transition starts.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::{Rc, Weak};

use transitioner_core::Key;

use crate::child_mapping::{Child, ChildMapping, child_mapping, merge_mappings};
use crate::handle::{CompletionSink, Done, Phase, TransitionHandle};

/// Where a key currently is in its lifecycle. Keys that were never displayed,
/// or already finished leaving, have no state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChildState {
    Appearing,
    Entering,
    Idle,
    Leaving,
}

impl From<Phase> for ChildState {
    fn from(phase: Phase) -> Self {
        match phase {
            Phase::Appear => ChildState::Appearing,
            Phase::Enter => ChildState::Entering,
            Phase::Leave => ChildState::Leaving,
        }
    }
}

/// One displayed child after the child factory ran.
#[derive(Clone, Debug, PartialEq)]
pub struct Rendered<E> {
    pub key: Key,
    pub element: E,
}

#[derive(Debug)]
enum Command {
    Start(Phase, Key),
    Finish(Phase, Key),
}

struct GroupState<T> {
    mounted: bool,
    /// Everything on screen, leaving children included.
    display: ChildMapping<T>,
    /// Children from the latest `receive`.
    latest: ChildMapping<T>,
    transitioning: HashMap<Key, Phase>,
    refs: HashMap<Key, Weak<TransitionHandle>>,
    keys_to_appear: Vec<Key>,
    keys_to_enter: Vec<Key>,
    keys_to_leave: Vec<Key>,
}

impl<T> Default for GroupState<T> {
    fn default() -> Self {
        Self {
            mounted: false,
            display: ChildMapping::new(),
            latest: ChildMapping::new(),
            transitioning: HashMap::new(),
            refs: HashMap::new(),
            keys_to_appear: Vec::new(),
            keys_to_enter: Vec::new(),
            keys_to_leave: Vec::new(),
        }
    }
}

type Listener = Rc<dyn Fn(&[Key])>;

struct Inner<T> {
    state: RefCell<GroupState<T>>,
    commands: RefCell<VecDeque<Command>>,
    /// Commands produced by the step being processed; they run before
    /// anything queued earlier.
    staged: RefCell<Vec<Command>>,
    pumping: Cell<bool>,
    torn_down: Cell<bool>,
    listeners: RefCell<Vec<Listener>>,
}

/// Coordinator for a keyed set of children.
///
/// `T` is the raw child payload, `E` what the child factory turns it into.
/// Dropping the group tears it down.
pub struct TransitionGroup<T: 'static, E = T> {
    inner: Rc<Inner<T>>,
    child_factory: Box<dyn Fn(&T) -> E>,
}

impl<T: Clone + 'static> TransitionGroup<T, T> {
    /// Group with the identity child factory.
    pub fn new() -> Self {
        Self::with_child_factory(T::clone)
    }
}

impl<T: Clone + 'static> Default for TransitionGroup<T, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + 'static, E> TransitionGroup<T, E> {
    pub fn with_child_factory(child_factory: impl Fn(&T) -> E + 'static) -> Self {
        Self {
            inner: Rc::new(Inner {
                state: RefCell::new(GroupState::default()),
                commands: RefCell::new(VecDeque::new()),
                staged: RefCell::new(Vec::new()),
                pumping: Cell::new(false),
                torn_down: Cell::new(false),
                listeners: RefCell::new(Vec::new()),
            }),
            child_factory: Box::new(child_factory),
        }
    }

    /// Takes the next children and commits the merged display set.
    ///
    /// The first call mounts: every child is queued to appear. Later calls
    /// queue new keys to enter and dropped keys to leave, skipping keys that
    /// are already mid-transition. Nothing starts until [`commit`](Self::commit).
    pub fn receive(&self, children: impl IntoIterator<Item = Child<T>>) {
        if self.inner.torn_down.get() {
            log::debug!("TransitionGroup: receive after teardown ignored");
            return;
        }
        let next = child_mapping(children);
        let mut st = self.inner.state.borrow_mut();

        if !st.mounted {
            st.mounted = true;
            st.keys_to_appear = next.keys().cloned().collect();
            st.display = next.clone();
            st.latest = next;
            return;
        }

        let prev = std::mem::take(&mut st.display);
        st.display = merge_mappings(&prev, &next);

        for key in next.keys() {
            if !prev.contains_key(key) && !st.transitioning.contains_key(key) {
                st.keys_to_enter.push(key.clone());
            }
        }
        for key in prev.keys() {
            if !next.contains_key(key) && !st.transitioning.contains_key(key) {
                st.keys_to_leave.push(key.clone());
            }
        }

        st.latest = next;
    }

    /// The display set in order, each child passed through the child factory.
    pub fn render(&self) -> Vec<Rendered<E>> {
        let st = self.inner.state.borrow();
        st.display
            .iter()
            .map(|(key, child)| Rendered {
                key: key.clone(),
                element: (self.child_factory)(child),
            })
            .collect()
    }

    /// Registers the live handle for `key`. The group only keeps a weak
    /// reference; the host owns the handle.
    pub fn attach(&self, key: &Key, handle: &Rc<TransitionHandle>) {
        self.inner
            .state
            .borrow_mut()
            .refs
            .insert(key.clone(), Rc::downgrade(handle));
    }

    /// Starts everything queued by the last [`receive`](Self::receive):
    /// appears, then enters, then leaves, each in input order.
    pub fn commit(&self) {
        if self.inner.torn_down.get() {
            return;
        }
        {
            let mut st = self.inner.state.borrow_mut();
            let mut commands = self.inner.commands.borrow_mut();
            let appear = std::mem::take(&mut st.keys_to_appear);
            let enter = std::mem::take(&mut st.keys_to_enter);
            let leave = std::mem::take(&mut st.keys_to_leave);
            commands.extend(appear.into_iter().map(|k| Command::Start(Phase::Appear, k)));
            commands.extend(enter.into_iter().map(|k| Command::Start(Phase::Enter, k)));
            commands.extend(leave.into_iter().map(|k| Command::Start(Phase::Leave, k)));
        }
        self.inner.pump();
    }

    pub fn mount(&self, children: impl IntoIterator<Item = Child<T>>) {
        self.update(children);
    }

    pub fn update(&self, children: impl IntoIterator<Item = Child<T>>) {
        self.receive(children);
        self.commit();
    }

    /// Called with the display keys whenever a finished leave removes a child.
    pub fn subscribe(&self, f: impl Fn(&[Key]) + 'static) {
        self.inner.listeners.borrow_mut().push(Rc::new(f));
    }

    /// Stops everything. Pending and future completions become no-ops.
    pub fn teardown(&self) {
        if self.inner.torn_down.replace(true) {
            return;
        }
        log::debug!("TransitionGroup: teardown");
        self.inner.commands.borrow_mut().clear();
        self.inner.staged.borrow_mut().clear();
        self.inner.state.borrow_mut().refs.clear();
        self.inner.listeners.borrow_mut().clear();
    }

    pub fn is_torn_down(&self) -> bool {
        self.inner.torn_down.get()
    }

    pub fn display_keys(&self) -> Vec<Key> {
        self.inner.state.borrow().display.keys().cloned().collect()
    }

    pub fn display(&self) -> ChildMapping<T> {
        self.inner.state.borrow().display.clone()
    }

    pub fn is_transitioning(&self, key: &Key) -> bool {
        self.inner.state.borrow().transitioning.contains_key(key)
    }

    pub fn transitioning_keys(&self) -> Vec<Key> {
        let st = self.inner.state.borrow();
        let mut keys: Vec<Key> = st.transitioning.keys().cloned().collect();
        keys.sort_by_key(|k| st.display.get_index_of(k));
        keys
    }

    pub fn state_of(&self, key: &Key) -> Option<ChildState> {
        let st = self.inner.state.borrow();
        match st.transitioning.get(key) {
            Some(phase) => Some((*phase).into()),
            None if st.display.contains_key(key) => Some(ChildState::Idle),
            None => None,
        }
    }
}

impl<T: 'static, E> Drop for TransitionGroup<T, E> {
    fn drop(&mut self) {
        self.inner.torn_down.set(true);
        self.inner.commands.borrow_mut().clear();
    }
}

impl<T: 'static> Inner<T> {
    /// Drains the command queue. Re-entrant calls just leave their commands
    /// for the outer drain.
    fn pump(self: &Rc<Self>) {
        if self.pumping.replace(true) {
            return;
        }
        loop {
            if self.torn_down.get() {
                self.commands.borrow_mut().clear();
                self.staged.borrow_mut().clear();
                break;
            }
            let next = self.commands.borrow_mut().pop_front();
            match next {
                Some(Command::Start(phase, key)) => self.start(phase, key),
                Some(Command::Finish(phase, key)) => self.finish(phase, key),
                None => break,
            }
            let staged = std::mem::take(&mut *self.staged.borrow_mut());
            let mut commands = self.commands.borrow_mut();
            for cmd in staged.into_iter().rev() {
                commands.push_front(cmd);
            }
        }
        self.pumping.set(false);
    }

    fn start(self: &Rc<Self>, phase: Phase, key: Key) {
        let handle = {
            let mut st = self.state.borrow_mut();
            if let Some(current) = st.transitioning.get(&key) {
                log::debug!("{phase} of `{key}` skipped; already in {current}");
                return;
            }
            if !st.display.contains_key(&key) {
                log::debug!("{phase} of `{key}` skipped; no longer displayed");
                return;
            }
            if phase == Phase::Leave && st.latest.contains_key(&key) {
                log::debug!("leave of `{key}` skipped; back in the latest children");
                return;
            }
            st.transitioning.insert(key.clone(), phase);
            st.refs.get(&key).and_then(Weak::upgrade)
        };

        log::debug!("{phase} start: `{key}`");
        let weak: Weak<Self> = Rc::downgrade(self);
        let sink: Weak<dyn CompletionSink> = weak;
        let done = Done::new(sink, phase, key);
        match handle.as_ref().and_then(|h| h.will(phase)) {
            Some(hook) => hook(done),
            None => done.complete(),
        }
    }

    fn finish(self: &Rc<Self>, phase: Phase, key: Key) {
        let handle = self.state.borrow().refs.get(&key).and_then(Weak::upgrade);
        if let Some(did) = handle.as_ref().and_then(|h| h.did(phase)) {
            did();
        }
        if self.torn_down.get() {
            return;
        }

        let mut removed = false;
        {
            let mut st = self.state.borrow_mut();
            st.transitioning.remove(&key);
            let present = st.latest.contains_key(&key);
            log::debug!("{phase} done: `{key}`");

            match phase {
                Phase::Appear | Phase::Enter if !present => {
                    // Removed before it had fully come in
                    log::debug!("`{key}` was removed during {phase}; leaving");
                    self.staged
                        .borrow_mut()
                        .push(Command::Start(Phase::Leave, key));
                }
                Phase::Leave if present => {
                    // Came back before it had fully left
                    log::debug!("`{key}` came back during leave; entering");
                    self.staged
                        .borrow_mut()
                        .push(Command::Start(Phase::Enter, key));
                }
                Phase::Leave => {
                    st.display.shift_remove(&key);
                    st.refs.remove(&key);
                    removed = true;
                }
                Phase::Appear | Phase::Enter => {}
            }
        }

        if removed {
            self.notify();
        }
    }

    fn notify(&self) {
        let keys: Vec<Key> = self.state.borrow().display.keys().cloned().collect();
        let listeners: Vec<Listener> = self.listeners.borrow().clone();
        for listener in listeners {
            listener(&keys);
        }
    }
}

impl<T: 'static> CompletionSink for Inner<T> {
    fn complete(self: Rc<Self>, phase: Phase, key: Key) {
        if self.torn_down.get() {
            return;
        }
        if self.pumping.get() {
            self.staged.borrow_mut().push(Command::Finish(phase, key));
            return;
        }
        self.commands
            .borrow_mut()
            .push_back(Command::Finish(phase, key));
        self.pump();
    }

    fn is_live(&self) -> bool {
        !self.torn_down.get()
    }
}
