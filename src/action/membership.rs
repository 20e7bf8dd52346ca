use std::collections::HashSet;

/// Applied or saved project ids. Insert and remove are idempotent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MembershipSet {
    ids: HashSet<String>,
}

impl MembershipSet {
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        self.ids.insert(id.into())
    }

    pub fn remove(&mut self, id: &str) -> bool {
        self.ids.remove(id)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
