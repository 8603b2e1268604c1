use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Energy,
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceType::Energy => write!(f, "energy"),
        }
    }
}

/// Shared-capacity container: every resource type draws from the same
/// total capacity.
#[derive(PartialEq, Eq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct Store {
    pub capacity: u32,
    #[serde(default)]
    pub contents: BTreeMap<ResourceType, u32>,
}

impl Store {
    pub fn new(capacity: u32) -> Store {
        Store {
            capacity,
            contents: BTreeMap::new(),
        }
    }

    pub fn with(capacity: u32, resource: ResourceType, amount: u32) -> Store {
        let mut store = Store::new(capacity);
        store.add(resource, amount);
        store
    }

    pub fn get_capacity(&self) -> u32 {
        self.capacity
    }

    pub fn get_used_capacity(&self, resource: Option<ResourceType>) -> u32 {
        match resource {
            Some(resource) => self.contents.get(&resource).copied().unwrap_or(0),
            None => self.contents.values().sum(),
        }
    }

    pub fn get_free_capacity(&self) -> u32 {
        self.capacity.saturating_sub(self.get_used_capacity(None))
    }

    pub fn is_full(&self) -> bool {
        self.get_free_capacity() == 0
    }

    pub fn is_empty(&self) -> bool {
        self.get_used_capacity(None) == 0
    }

    /// Adds up to `amount`, returning what actually fit.
    pub fn add(&mut self, resource: ResourceType, amount: u32) -> u32 {
        let accepted = amount.min(self.get_free_capacity());

        if accepted > 0 {
            *self.contents.entry(resource).or_insert(0) += accepted;
        }

        accepted
    }

    /// Removes up to `amount`, returning what was actually taken.
    pub fn remove(&mut self, resource: ResourceType, amount: u32) -> u32 {
        let available = self.get_used_capacity(Some(resource));
        let taken = amount.min(available);

        if taken == available {
            self.contents.remove(&resource);
        } else if let Some(current) = self.contents.get_mut(&resource) {
            *current -= taken;
        }

        taken
    }
}
