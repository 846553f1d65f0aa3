//! DOM Observers
//!
//! MutationObserver registrations and their record queues. A registration
//! watches one target node; records accumulate until the host takes them,
//! so any number of changes coalesce into one delivery.

use crate::{DomError, DomResult, DomTree, NodeId};

/// Handle to a registered mutation observer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(pub(crate) u32);

/// Mutation observer options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutationObserverInit {
    pub child_list: bool,
    pub attributes: bool,
    pub character_data: bool,
    pub subtree: bool,
    pub attribute_old_value: bool,
    pub character_data_old_value: bool,
    pub attribute_filter: Option<Vec<String>>,
}

impl MutationObserverInit {
    /// Apply the implied flags and reject options that observe nothing
    pub fn normalize(mut self) -> DomResult<Self> {
        if self.attribute_old_value || self.attribute_filter.is_some() {
            self.attributes = true;
        }
        if self.character_data_old_value {
            self.character_data = true;
        }
        if !(self.child_list || self.attributes || self.character_data) {
            return Err(DomError::InvalidObserverOptions);
        }
        Ok(self)
    }

    fn wants(&self, record: &MutationRecord) -> bool {
        match record.mutation_type {
            MutationType::ChildList => self.child_list,
            MutationType::CharacterData => self.character_data,
            MutationType::Attributes => {
                self.attributes
                    && match (&self.attribute_filter, &record.attribute_name) {
                        (Some(filter), Some(name)) => filter.iter().any(|f| f == name),
                        _ => true,
                    }
            }
        }
    }

    fn wants_old_value(&self, mutation_type: MutationType) -> bool {
        match mutation_type {
            MutationType::Attributes => self.attribute_old_value,
            MutationType::CharacterData => self.character_data_old_value,
            MutationType::ChildList => false,
        }
    }
}

/// Mutation record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    pub mutation_type: MutationType,
    pub target: NodeId,
    pub added_nodes: Vec<NodeId>,
    pub removed_nodes: Vec<NodeId>,
    pub previous_sibling: Option<NodeId>,
    pub next_sibling: Option<NodeId>,
    pub attribute_name: Option<String>,
    pub old_value: Option<String>,
}

impl MutationRecord {
    pub(crate) fn child_list(
        target: NodeId,
        added_nodes: Vec<NodeId>,
        removed_nodes: Vec<NodeId>,
        previous_sibling: Option<NodeId>,
        next_sibling: Option<NodeId>,
    ) -> Self {
        Self {
            mutation_type: MutationType::ChildList,
            target,
            added_nodes,
            removed_nodes,
            previous_sibling,
            next_sibling,
            attribute_name: None,
            old_value: None,
        }
    }

    pub(crate) fn attribute(target: NodeId, name: &str, old_value: Option<String>) -> Self {
        Self {
            mutation_type: MutationType::Attributes,
            target,
            added_nodes: Vec::new(),
            removed_nodes: Vec::new(),
            previous_sibling: None,
            next_sibling: None,
            attribute_name: Some(name.to_string()),
            old_value,
        }
    }

    pub(crate) fn character_data(target: NodeId, old_value: String) -> Self {
        Self {
            mutation_type: MutationType::CharacterData,
            target,
            added_nodes: Vec::new(),
            removed_nodes: Vec::new(),
            previous_sibling: None,
            next_sibling: None,
            attribute_name: None,
            old_value: Some(old_value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationType {
    Attributes,
    CharacterData,
    ChildList,
}

/// Mutation observer registration
#[derive(Debug)]
pub(crate) struct MutationObserver {
    id: ObserverId,
    target: NodeId,
    options: MutationObserverInit,
    records: Vec<MutationRecord>,
}

impl MutationObserver {
    fn interested_in(&self, tree: &DomTree, record: &MutationRecord) -> bool {
        let in_scope = record.target == self.target
            || (self.options.subtree && tree.contains(self.target, record.target));
        in_scope && self.options.wants(record)
    }
}

/// All observer registrations of one document
#[derive(Debug, Default)]
pub(crate) struct ObserverRegistry {
    observers: Vec<MutationObserver>,
    next_id: u32,
}

impl ObserverRegistry {
    pub fn observe(&mut self, target: NodeId, options: MutationObserverInit) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.observers.push(MutationObserver {
            id,
            target,
            options,
            records: Vec::new(),
        });
        id
    }

    /// Drop a registration and its undelivered records
    pub fn disconnect(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|o| o.id != id);
        self.observers.len() != before
    }

    pub fn is_registered(&self, id: ObserverId) -> bool {
        self.observers.iter().any(|o| o.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Queue a record on every interested registration
    pub fn queue(&mut self, tree: &DomTree, record: MutationRecord) {
        for observer in &mut self.observers {
            if !observer.interested_in(tree, &record) {
                continue;
            }
            let mut record = record.clone();
            if !observer.options.wants_old_value(record.mutation_type) {
                record.old_value = None;
            }
            observer.records.push(record);
        }
    }

    pub fn take_records(&mut self, id: ObserverId) -> Vec<MutationRecord> {
        self.observers
            .iter_mut()
            .find(|o| o.id == id)
            .map(|o| std::mem::take(&mut o.records))
            .unwrap_or_default()
    }

    /// Registrations with undelivered records, in registration order
    pub fn pending(&self) -> Vec<ObserverId> {
        self.observers
            .iter()
            .filter(|o| !o.records.is_empty())
            .map(|o| o.id)
            .collect()
    }
}
