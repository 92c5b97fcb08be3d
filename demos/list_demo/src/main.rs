use std::collections::HashMap;
use std::rc::Rc;

use transitioner::{Child, Key, Transitioner, TransitionerConfig};
use transitioner_core::{ManualScheduler, MemoryNode, StyleNode};
use web_time::Duration;

const CONFIG: &str = r#"
duration = 250
timingFunction = "easeOutCubic"

[transitionEnter]
from = { opacity = 0, maxHeight = "0px" }
to = { opacity = 1, maxHeight = "48px" }

[transitionLeave]
from = { opacity = 1 }
to = { opacity = 0 }
timingFunction = "quad.easeIn"
duration = 150
"#;

const ITEMS: [&str; 5] = ["inbox", "drafts", "sent", "spam", "trash"];

fn children(keys: &[&'static str]) -> Vec<Child<&'static str>> {
    keys.iter().map(|k| Child::keyed(*k, *k)).collect()
}

fn print_nodes(nodes: &HashMap<Key, Rc<MemoryNode>>, shown: &[Key]) {
    for key in shown {
        let Some(node) = nodes.get(key) else { continue };
        let opacity = node.style("opacity").unwrap_or_else(|| "-".into());
        log::info!("  {key}: opacity={opacity}");
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = TransitionerConfig::from_toml_str(CONFIG)?;
    let sched = Rc::new(ManualScheduler::new());
    let nodes: HashMap<Key, Rc<MemoryNode>> = ITEMS
        .iter()
        .map(|k| (Key::from(*k), Rc::new(MemoryNode::new())))
        .collect();
    let binding: HashMap<Key, Rc<dyn StyleNode>> = nodes
        .iter()
        .map(|(k, n)| (k.clone(), n.clone() as Rc<dyn StyleNode>))
        .collect();

    let list: Transitioner<&'static str> = Transitioner::new(config, binding, sched.clone(), sched.clone());
    list.mount(children(&["inbox", "drafts", "sent"]));

    let steps: [&[&'static str]; 4] = [
        &["inbox", "sent", "spam"],
        &["inbox", "drafts", "sent", "spam"],
        &["trash"],
        &["inbox", "trash"],
    ];

    for next in steps {
        log::info!("update -> {next:?}");
        list.update(children(next));
        log::info!("display: {:?}", list.display_keys());

        sched.run_frame();
        sched.advance(Duration::from_millis(150));
        log::info!("after 150ms: {:?}", list.display_keys());
        print_nodes(&nodes, &list.display_keys());

        sched.run_until_idle();
        log::info!("settled: {:?}", list.display_keys());
    }

    list.teardown();
    log::info!("torn down at {:?}", sched.now());
    Ok(())
}
