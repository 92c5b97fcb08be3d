#[cfg(test)]
mod tests {
    use crate::key::*;
    use crate::node::*;
    use crate::scheduler::*;
    use crate::scope::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use web_time::Duration;

    #[test]
    fn test_key_kinds_are_distinct() {
        assert_ne!(Key::from(1), Key::from("1"));
        assert_eq!(Key::from("a"), Key::Str("a".into()));
        assert_eq!(Key::from(7).to_string(), "7");
        assert_eq!(Key::from("x").as_str(), Some("x"));
    }

    #[test]
    fn test_scope_explicit_dispose() {
        let cleaned_up = Rc::new(RefCell::new(0));

        let scope = Scope::new();
        let c = cleaned_up.clone();
        scope.add_disposer(move || *c.borrow_mut() += 1);

        assert_eq!(*cleaned_up.borrow(), 0);
        assert_eq!(scope.pending_disposers(), 1);
        scope.dispose();
        assert_eq!(scope.pending_disposers(), 0);
        assert_eq!(*cleaned_up.borrow(), 1);

        // Second dispose is a no-op
        scope.dispose();
        assert_eq!(*cleaned_up.borrow(), 1);
        assert!(scope.is_disposed());
    }

    #[test]
    fn test_scope_late_disposer_runs_immediately() {
        let scope = Scope::new();
        scope.dispose();

        let ran = Rc::new(RefCell::new(false));
        let r = ran.clone();
        scope.add_disposer(move || *r.borrow_mut() = true);
        assert!(*ran.borrow());
    }

    #[test]
    fn test_scope_children_dispose_first() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let parent = Scope::new();
        let child = parent.child();

        let o = order.clone();
        parent.add_disposer(move || o.borrow_mut().push("parent"));
        let o = order.clone();
        child.add_disposer(move || o.borrow_mut().push("child"));

        parent.dispose();
        assert_eq!(*order.borrow(), vec!["child", "parent"]);
        assert!(child.is_disposed());
    }

    #[test]
    fn test_scope_drop_runs_cleanups() {
        let ran = Rc::new(RefCell::new(false));
        {
            let scope = Scope::new();
            let r = ran.clone();
            scope.add_disposer(move || *r.borrow_mut() = true);
        }
        assert!(*ran.borrow());
    }

    #[test]
    fn test_timers_fire_in_deadline_order() {
        let sched = ManualScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        for (name, ms) in [("slow", 300u64), ("fast", 100), ("mid", 200), ("mid2", 200)] {
            let l = log.clone();
            sched.set_timeout(
                Duration::from_millis(ms),
                Box::new(move || l.borrow_mut().push(name)),
            );
        }

        assert_eq!(sched.advance(Duration::from_millis(250)), 3);
        assert_eq!(*log.borrow(), vec!["fast", "mid", "mid2"]);
        assert_eq!(sched.now(), Duration::from_millis(250));
        assert_eq!(sched.pending_timers(), 1);
    }

    #[test]
    fn test_cleared_timer_never_fires() {
        let sched = ManualScheduler::new();
        let fired = Rc::new(RefCell::new(false));
        let f = fired.clone();
        let id = sched.set_timeout(
            Duration::from_millis(10),
            Box::new(move || *f.borrow_mut() = true),
        );
        sched.clear_timeout(id);
        // clearing twice is fine
        sched.clear_timeout(id);

        sched.advance(Duration::from_secs(1));
        assert!(!*fired.borrow());
    }

    #[test]
    fn test_timer_scheduled_from_timer_uses_its_deadline() {
        let sched = Rc::new(ManualScheduler::new());
        let at = Rc::new(RefCell::new(None));

        let s = sched.clone();
        let a = at.clone();
        sched.set_timeout(
            Duration::from_millis(100),
            Box::new(move || {
                let s2 = s.clone();
                let a2 = a.clone();
                s.set_timeout(
                    Duration::from_millis(50),
                    Box::new(move || *a2.borrow_mut() = Some(s2.now())),
                );
            }),
        );

        sched.advance(Duration::from_millis(200));
        assert_eq!(*at.borrow(), Some(Duration::from_millis(150)));
    }

    #[test]
    fn test_frames_scheduled_during_frame_wait() {
        let sched = Rc::new(ManualScheduler::new());
        let count = Rc::new(RefCell::new(0));

        let s = sched.clone();
        let c = count.clone();
        sched.request_frame(Box::new(move || {
            *c.borrow_mut() += 1;
            let c2 = c.clone();
            s.request_frame(Box::new(move || *c2.borrow_mut() += 1));
        }));

        assert_eq!(sched.run_frame(), 1);
        assert_eq!(*count.borrow(), 1);
        assert_eq!(sched.pending_frames(), 1);
        sched.run_until_idle();
        assert_eq!(*count.borrow(), 2);
    }

    #[test]
    fn test_memory_node_tracks_writes() {
        let node = MemoryNode::with_style([("opacity", "1")]).rejecting("bogus");
        node.set_style("opacity", "0");
        node.set_style("bogus", "1");
        node.set_style("transform", "scale(0.5)");

        assert_eq!(node.style("opacity").as_deref(), Some("0"));
        assert_eq!(node.style("bogus"), None);
        assert_eq!(node.history().len(), 2);

        node.set_style("transform", "");
        assert_eq!(node.snapshot(), vec![("opacity".to_string(), "0".to_string())]);

        node.force_layout();
        assert_eq!(node.layout_reads(), 1);
    }
}
