use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Lifetime of a mounted thing: a list of cleanups plus a torn-down flag.
///
/// Clones share state. Disposal runs child scopes first, then this scope's
/// disposers in registration order. Dropping the last clone disposes too.
pub struct Scope {
    inner: Rc<ScopeInner>,
}

struct ScopeInner {
    disposed: Cell<bool>,
    disposers: RefCell<Vec<Box<dyn FnOnce()>>>,
    children: RefCell<Vec<Scope>>,
}

impl Scope {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(ScopeInner {
                disposed: Cell::new(false),
                disposers: RefCell::new(Vec::new()),
                children: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.get()
    }

    /// Registers a cleanup. On an already disposed scope it runs right away.
    pub fn add_disposer(&self, disposer: impl FnOnce() + 'static) {
        if self.is_disposed() {
            disposer();
            return;
        }
        self.inner.disposers.borrow_mut().push(Box::new(disposer));
    }

    /// Cleanups registered and not yet run.
    pub fn pending_disposers(&self) -> usize {
        self.inner.disposers.borrow().len()
    }

    pub fn child(&self) -> Scope {
        let child = Scope::new();
        if self.is_disposed() {
            child.dispose();
        } else {
            self.inner.children.borrow_mut().push(child.clone());
        }
        child
    }

    /// Idempotent.
    pub fn dispose(&self) {
        if self.inner.disposed.replace(true) {
            return;
        }
        self.inner.run_cleanups();
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Scope {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl ScopeInner {
    fn run_cleanups(&self) {
        let children = std::mem::take(&mut *self.children.borrow_mut());
        for child in children {
            child.dispose();
        }

        let disposers = std::mem::take(&mut *self.disposers.borrow_mut());
        for disposer in disposers {
            disposer();
        }
    }
}

impl Drop for ScopeInner {
    fn drop(&mut self) {
        if !self.disposed.replace(true) {
            self.run_cleanups();
        }
    }
}
