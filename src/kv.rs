use indexmap::IndexMap;
use std::fmt::{Display, Formatter};
use std::num::ParseIntError;
use std::str::FromStr;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryId(u64);

impl Display for EntryId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntryId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(EntryId)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    id: EntryId,
    key: String,
    value: String,
}

impl Entry {
    pub fn id(&self) -> EntryId {
        self.id
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

#[derive(Debug, Clone, Default)]
pub struct KeyValueList {
    entries: Vec<Entry>,
    next_id: u64,
}

impl KeyValueList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self) -> EntryId {
        let id = EntryId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            key: String::new(),
            value: String::new(),
        });
        id
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) -> EntryId {
        let id = self.add();
        self.update_key(id, key);
        self.update_value(id, value);
        id
    }

    pub fn update_key(&mut self, id: EntryId, key: impl Into<String>) -> bool {
        match self.find_mut(id) {
            Some(entry) => {
                entry.key = key.into();
                true
            }
            None => {
                debug!(%id, "ignoring key update for missing entry");
                false
            }
        }
    }

    pub fn update_value(&mut self, id: EntryId, value: impl Into<String>) -> bool {
        match self.find_mut(id) {
            Some(entry) => {
                entry.value = value.into();
                true
            }
            None => {
                debug!(%id, "ignoring value update for missing entry");
                false
            }
        }
    }

    pub fn remove(&mut self, id: EntryId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        before != self.entries.len()
    }

    pub fn to_map(&self) -> IndexMap<String, String> {
        let mut map = IndexMap::with_capacity(self.entries.len());
        for entry in self.entries.iter().filter(|e| !e.key.is_empty()) {
            map.insert(entry.key.clone(), entry.value.clone());
        }
        map
    }

    pub fn get(&self, id: EntryId) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn find_mut(&mut self, id: EntryId) -> Option<&mut Entry> {
        self.entries.iter_mut().find(|e| e.id == id)
    }
}
