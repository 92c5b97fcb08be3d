//! High-level host: a [`TransitionGroup`] whose children run style
//! transitions on their bound visual nodes.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::{Rc, Weak};

use indexmap::IndexMap;
use transitioner_core::{FrameScheduler, Key, StyleNode, TimerScheduler};

use crate::child_mapping::Child;
use crate::config::TransitionerConfig;
use crate::error::TransitionError;
use crate::group::{ChildState, Rendered, TransitionGroup};
use crate::handle::TransitionHandle;
use crate::style::StyleTransitionChild;

/// Resolves the retained node a key's transitions write to.
pub trait NodeBinding {
    fn node_for(&self, key: &Key) -> Option<Rc<dyn StyleNode>>;
}

impl<F> NodeBinding for F
where
    F: Fn(&Key) -> Option<Rc<dyn StyleNode>>,
{
    fn node_for(&self, key: &Key) -> Option<Rc<dyn StyleNode>> {
        self(key)
    }
}

impl NodeBinding for HashMap<Key, Rc<dyn StyleNode>> {
    fn node_for(&self, key: &Key) -> Option<Rc<dyn StyleNode>> {
        self.get(key).cloned()
    }
}

/// A child wrapped with the transition configuration of the render pass
/// that produced it.
#[derive(Clone, Debug)]
pub struct TransitionChild<T> {
    pub child: T,
    pub config: Rc<TransitionerConfig>,
}

enum Mounted {
    Styled(StyleTransitionChild),
    /// No node could be bound; every phase completes immediately.
    Bare(Rc<TransitionHandle>),
}

impl Mounted {
    fn handle(&self) -> &Rc<TransitionHandle> {
        match self {
            Mounted::Styled(c) => c.handle(),
            Mounted::Bare(h) => h,
        }
    }

    fn unmount(&self) {
        if let Mounted::Styled(c) = self {
            c.unmount();
        }
    }
}

struct Inner<T: 'static> {
    group: TransitionGroup<T, TransitionChild<T>>,
    binding: Box<dyn NodeBinding>,
    frames: Rc<dyn FrameScheduler>,
    timers: Rc<dyn TimerScheduler>,
    mounted: RefCell<IndexMap<Key, Mounted>>,
}

/// Owns one mounted instance per displayed key and keeps them in sync with
/// the group's display set. Dropping it cancels every outstanding timer.
pub struct Transitioner<T: 'static> {
    inner: Rc<Inner<T>>,
}

impl<T: Clone + 'static> Transitioner<T> {
    pub fn new(
        config: TransitionerConfig,
        binding: impl NodeBinding + 'static,
        frames: Rc<dyn FrameScheduler>,
        timers: Rc<dyn TimerScheduler>,
    ) -> Self {
        let config = Rc::new(config);
        let group = TransitionGroup::with_child_factory(move |child: &T| TransitionChild {
            child: child.clone(),
            config: config.clone(),
        });
        let inner = Rc::new(Inner {
            group,
            binding: Box::new(binding),
            frames,
            timers,
            mounted: RefCell::new(IndexMap::new()),
        });

        let weak: Weak<Inner<T>> = Rc::downgrade(&inner);
        inner.group.subscribe(move |_| {
            if let Some(inner) = weak.upgrade() {
                inner.reconcile();
            }
        });

        Self { inner }
    }

    pub fn mount(&self, children: impl IntoIterator<Item = Child<T>>) {
        self.update(children);
    }

    pub fn update(&self, children: impl IntoIterator<Item = Child<T>>) {
        self.inner.group.receive(children);
        self.inner.reconcile();
        self.inner.group.commit();
    }

    /// Cancels every outstanding timer and stops all transitions.
    pub fn teardown(&self) {
        self.inner.group.teardown();
        let mounted = std::mem::take(&mut *self.inner.mounted.borrow_mut());
        for m in mounted.values() {
            m.unmount();
        }
    }

    pub fn group(&self) -> &TransitionGroup<T, TransitionChild<T>> {
        &self.inner.group
    }

    pub fn display_keys(&self) -> Vec<Key> {
        self.inner.group.display_keys()
    }

    pub fn state_of(&self, key: &Key) -> Option<ChildState> {
        self.inner.group.state_of(key)
    }

    /// Restores the original inline style of `key`'s node.
    pub fn revert_styles(&self, key: &Key) {
        if let Some(Mounted::Styled(c)) = self.inner.mounted.borrow().get(key) {
            c.revert_styles();
        }
    }

    pub fn is_mounted(&self, key: &Key) -> bool {
        self.inner.mounted.borrow().contains_key(key)
    }
}

impl<T: Clone + 'static> Inner<T> {
    /// Mounts instances for newly displayed keys, unmounts the ones that are
    /// gone and attaches every handle to the group.
    fn reconcile(&self) {
        if self.group.is_torn_down() {
            return;
        }
        let rendered: Vec<Rendered<TransitionChild<T>>> = self.group.render();
        let keep: HashSet<&Key> = rendered.iter().map(|r| &r.key).collect();

        let mut mounted = self.mounted.borrow_mut();
        mounted.retain(|key, m| {
            let alive = keep.contains(key);
            if !alive {
                m.unmount();
            }
            alive
        });

        for r in &rendered {
            match mounted.get(&r.key) {
                Some(Mounted::Styled(c)) => c.set_config(r.element.config.clone()),
                Some(Mounted::Bare(_)) => {}
                None => {
                    let m = self.mount_child(&r.key, r.element.config.clone());
                    mounted.insert(r.key.clone(), m);
                }
            }
        }

        for r in &rendered {
            if let Some(m) = mounted.get(&r.key) {
                self.group.attach(&r.key, m.handle());
            }
        }
    }

    fn mount_child(&self, key: &Key, config: Rc<TransitionerConfig>) -> Mounted {
        match self.binding.node_for(key) {
            Some(node) => Mounted::Styled(StyleTransitionChild::new(
                key.clone(),
                node,
                config,
                self.frames.clone(),
                self.timers.clone(),
            )),
            None => {
                let err = TransitionError::UnboundNode(key.clone());
                log::warn!("{err}; transitions complete immediately");
                Mounted::Bare(Rc::new(TransitionHandle::new()))
            }
        }
    }
}
