use std::collections::BTreeSet;

use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// Identifies a unit of upstream work in a [`WorkGraph`].
    pub struct TaskId;
}

/// Lineage of a deferred value: which upstream work has to complete before it
/// can be read. Opaque to the values themselves; scheduling lives elsewhere.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ValueProducer {
    /// Nothing has to run first.
    #[default]
    NoProducer,
    /// Produced by something that cannot be tracked.
    Unknown,
    Task(TaskId),
    Plus(Box<ValueProducer>, Box<ValueProducer>),
}

impl ValueProducer {
    pub fn task(id: TaskId) -> Self {
        ValueProducer::Task(id)
    }

    /// Union of two producers. No deduplication is performed.
    pub fn plus(left: ValueProducer, right: ValueProducer) -> Self {
        ValueProducer::Plus(Box::new(left), Box::new(right))
    }

    pub fn is_known(&self) -> bool {
        match self {
            ValueProducer::NoProducer | ValueProducer::Task(_) => true,
            ValueProducer::Unknown => false,
            ValueProducer::Plus(left, right) => left.is_known() || right.is_known(),
        }
    }

    /// Visits every task in the union, left before right.
    pub fn visit_producer_tasks(&self, visitor: &mut impl FnMut(TaskId)) {
        match self {
            ValueProducer::NoProducer | ValueProducer::Unknown => {}
            ValueProducer::Task(id) => visitor(*id),
            ValueProducer::Plus(left, right) => {
                left.visit_producer_tasks(visitor);
                right.visit_producer_tasks(visitor);
            }
        }
    }

    pub fn tasks(&self) -> BTreeSet<TaskId> {
        let mut out = BTreeSet::new();
        self.visit_producer_tasks(&mut |id| {
            out.insert(id);
        });
        out
    }
}

struct TaskNode {
    name: String,
}

/// Registry of producing tasks, used to give producers readable names.
#[derive(Default)]
pub struct WorkGraph {
    tasks: SlotMap<TaskId, TaskNode>,
}

impl WorkGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_task(&mut self, name: impl Into<String>) -> TaskId {
        let name = name.into();
        log::debug!("work graph: registered task '{}'", name);
        self.tasks.insert(TaskNode { name })
    }

    pub fn name(&self, id: TaskId) -> Option<&str> {
        self.tasks.get(id).map(|node| node.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Names of the tasks behind `producer`, in visit order.
    pub fn describe(&self, producer: &ValueProducer) -> Vec<String> {
        let mut names = Vec::new();
        producer.visit_producer_tasks(&mut |id| match self.name(id) {
            Some(name) => names.push(name.to_string()),
            None => {
                log::warn!("work graph: producer refers to unregistered task {id:?}");
                names.push(format!("{id:?}"));
            }
        });
        names
    }
}
