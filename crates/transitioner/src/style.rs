//! CSS-style property transitions on a retained node.
//!
//! Running a [`TransitionSpec`] is three steps:
//!
//! 1. write the `from` style plus `transition-delay`, `transition-duration`,
//!    `transition-property` and `transition-timing-function`, then force a
//!    layout read so the engine sees the start state;
//! 2. on the next frame, write the `to` style;
//! 3. after `duration`, signal completion.
//!
//! [`StyleTransitionChild`] is the mounted per-key instance that does this for
//! appear, enter and leave and hands the group a [`TransitionHandle`].

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;
use transitioner_core::{FrameScheduler, Key, Scope, StyleNode, TimerId, TimerScheduler};
use web_time::Duration;

use crate::config::TransitionerConfig;
use crate::error::{Result, TransitionError};
use crate::handle::{Done, Phase, TransitionHandle};
use crate::timing::resolve_timing_function;

/// Property name (camelCase or dash-case) → value.
pub type StyleMap = IndexMap<String, String>;

/// `backgroundColor` → `background-color`. Dash-case input is unchanged.
pub fn camel_to_dash(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, ch) in name.char_indices() {
        if ch.is_ascii_uppercase() {
            if i > 0 {
                out.push('-');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Comma-joined dash-case names, as `transition-property` wants them.
pub fn property_list(style: &StyleMap) -> String {
    style
        .keys()
        .map(|k| camel_to_dash(k))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn style_map<'a>(props: impl IntoIterator<Item = (&'a str, &'a str)>) -> StyleMap {
    props
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .collect()
}

/// One from → to transition. Unset fields fall back to the transitioner's
/// defaults (`delay` falls back to zero).
#[derive(Clone, Debug, PartialEq, Default)]
pub struct TransitionSpec {
    pub from: StyleMap,
    pub to: StyleMap,
    pub duration: Option<Duration>,
    pub timing_function: Option<String>,
    pub delay: Option<Duration>,
}

impl TransitionSpec {
    pub fn new<'a>(
        from: impl IntoIterator<Item = (&'a str, &'a str)>,
        to: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        Self {
            from: style_map(from),
            to: style_map(to),
            ..Default::default()
        }
    }

    /// Builds a spec from optional parts, failing if `from` or `to` is missing.
    pub fn try_from_parts(from: Option<StyleMap>, to: Option<StyleMap>) -> Result<Self> {
        let from = from.ok_or(TransitionError::MissingFrom)?;
        let to = to.ok_or(TransitionError::MissingTo)?;
        Ok(Self {
            from,
            to,
            ..Default::default()
        })
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn timing_function(mut self, token: impl Into<String>) -> Self {
        self.timing_function = Some(token.into());
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Resolves defaults and produces the styles to write.
    pub fn plan(&self, defaults: &TransitionerConfig) -> TransitionPlan {
        let delay = self.delay.unwrap_or(Duration::ZERO);
        let duration = self.duration.unwrap_or(defaults.duration);
        let token = self
            .timing_function
            .as_deref()
            .unwrap_or(&defaults.timing_function);
        let timing_function = resolve_timing_function(token).to_owned();

        let mut start = self.from.clone();
        start.insert("transitionDelay".into(), format!("{}ms", delay.as_millis()));
        start.insert(
            "transitionDuration".into(),
            format!("{}ms", duration.as_millis()),
        );
        start.insert("transitionProperty".into(), property_list(&self.from));
        start.insert("transitionTimingFunction".into(), timing_function.clone());

        TransitionPlan {
            start,
            end: self.to.clone(),
            duration,
            delay,
            timing_function,
        }
    }
}

/// A spec with every default resolved.
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionPlan {
    /// `from` plus the `transition*` properties.
    pub start: StyleMap,
    pub end: StyleMap,
    pub duration: Duration,
    pub delay: Duration,
    pub timing_function: String,
}

struct ChildInner {
    key: Key,
    node: Rc<dyn StyleNode>,
    config: RefCell<Rc<TransitionerConfig>>,
    frames: Rc<dyn FrameScheduler>,
    timers: Rc<dyn TimerScheduler>,
    scope: Scope,
    /// Completion timer of the transition in flight. The group never runs two
    /// phases of one key at once, so there is at most one.
    timer: Rc<Cell<Option<TimerId>>>,
    /// Value each written property had before we first touched it.
    original: RefCell<HashMap<String, Option<String>>>,
    changed: RefCell<Vec<String>>,
}

/// Mounted instance for one key: runs style transitions on its node.
///
/// Unmounting cancels outstanding timers; frame callbacks that were already
/// requested see the unmount and do nothing.
pub struct StyleTransitionChild {
    inner: Rc<ChildInner>,
    handle: Rc<TransitionHandle>,
}

impl StyleTransitionChild {
    pub fn new(
        key: Key,
        node: Rc<dyn StyleNode>,
        config: Rc<TransitionerConfig>,
        frames: Rc<dyn FrameScheduler>,
        timers: Rc<dyn TimerScheduler>,
    ) -> Self {
        let scope = Scope::new();
        let timer: Rc<Cell<Option<TimerId>>> = Rc::default();
        {
            let (timers, timer) = (timers.clone(), timer.clone());
            scope.add_disposer(move || {
                if let Some(id) = timer.take() {
                    timers.clear_timeout(id);
                }
            });
        }
        let inner = Rc::new(ChildInner {
            key,
            node,
            config: RefCell::new(config),
            frames,
            timers,
            scope,
            timer,
            original: RefCell::new(HashMap::new()),
            changed: RefCell::new(Vec::new()),
        });
        let handle = Rc::new(
            TransitionHandle::new()
                .on_will_appear(will(&inner, Phase::Appear))
                .on_will_enter(will(&inner, Phase::Enter))
                .on_will_leave(will(&inner, Phase::Leave)),
        );
        Self { inner, handle }
    }

    pub fn key(&self) -> &Key {
        &self.inner.key
    }

    pub fn handle(&self) -> &Rc<TransitionHandle> {
        &self.handle
    }

    /// Swaps in the configuration from the latest render pass.
    pub fn set_config(&self, config: Rc<TransitionerConfig>) {
        *self.inner.config.borrow_mut() = config;
    }

    /// Restores every property this child wrote to its original value.
    pub fn revert_styles(&self) {
        let changed = std::mem::take(&mut *self.inner.changed.borrow_mut());
        let original = self.inner.original.borrow();
        for property in changed {
            let value = original.get(&property).cloned().flatten();
            self.inner
                .node
                .set_style(&property, value.as_deref().unwrap_or(""));
        }
    }

    pub fn unmount(&self) {
        log::debug!("`{}`: unmount", self.inner.key);
        self.inner.scope.dispose();
    }

    pub fn is_unmounted(&self) -> bool {
        self.inner.scope.is_disposed()
    }
}

impl Drop for StyleTransitionChild {
    fn drop(&mut self) {
        self.inner.scope.dispose();
    }
}

fn will(inner: &Rc<ChildInner>, phase: Phase) -> impl Fn(Done) + 'static {
    let weak: Weak<ChildInner> = Rc::downgrade(inner);
    move |done| match weak.upgrade() {
        Some(child) => child.run(phase, done),
        None => done.abandon(),
    }
}

impl ChildInner {
    fn run(self: &Rc<Self>, phase: Phase, done: Done) {
        if self.scope.is_disposed() {
            done.abandon();
            return;
        }
        let config = self.config.borrow().clone();
        match config.spec_for(phase) {
            Some(spec) => self.execute(spec.plan(&config), done),
            None => done.complete(),
        }
    }

    fn execute(self: &Rc<Self>, plan: TransitionPlan, done: Done) {
        log::debug!(
            "`{}`: {} over {:?} ({})",
            self.key,
            done.phase(),
            plan.duration,
            plan.timing_function
        );
        self.add_style(&plan.start);
        self.node.force_layout();

        let this = self.clone();
        self.frames.request_frame(Box::new(move || {
            if this.scope.is_disposed() {
                done.abandon();
                return;
            }
            this.add_style(&plan.end);
            let slot = this.timer.clone();
            let id = this.timers.set_timeout(
                plan.duration,
                Box::new(move || {
                    slot.set(None);
                    done.complete();
                }),
            );
            this.timer.set(Some(id));
        }));
    }

    fn add_style(&self, style: &StyleMap) {
        for (property, value) in style {
            let property = camel_to_dash(property);
            let before = self.node.style(&property);
            self.node.set_style(&property, value);
            if self.node.style(&property).as_deref() == Some(value.as_str()) {
                self.original
                    .borrow_mut()
                    .entry(property.clone())
                    .or_insert(before);
                let mut changed = self.changed.borrow_mut();
                if !changed.contains(&property) {
                    changed.push(property);
                }
            }
        }
    }
}
