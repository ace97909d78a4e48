//! The accumulated list of fetched records, keyed by id.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::state::PokemonRecord;

/// Records in fetch order with an id index.
///
/// Pages are upserted: a record whose id is already present replaces the
/// stored one in place, so refetching an overlapping offset never grows the
/// list with duplicates. Serializes as a plain list.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<PokemonRecord>", into = "Vec<PokemonRecord>")]
pub struct Roster {
    records: Vec<PokemonRecord>,
    index: HashMap<u32, usize>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn as_slice(&self) -> &[PokemonRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &PokemonRecord> {
        self.records.iter()
    }

    pub fn get(&self, id: u32) -> Option<&PokemonRecord> {
        self.index.get(&id).map(|&pos| &self.records[pos])
    }

    /// Drop everything and load `records` as the new list.
    pub fn replace(&mut self, records: Vec<PokemonRecord>) {
        self.records.clear();
        self.index.clear();
        self.upsert(records);
    }

    /// Insert or update each record, returning how many ids were new.
    pub fn upsert(&mut self, records: Vec<PokemonRecord>) -> usize {
        let mut added = 0;
        for record in records {
            match self.index.get(&record.id) {
                Some(&pos) => self.records[pos] = record,
                None => {
                    self.index.insert(record.id, self.records.len());
                    self.records.push(record);
                    added += 1;
                }
            }
        }
        added
    }

    /// Records whose type tags include `type_name`, in list order.
    pub fn with_type(&self, type_name: &str) -> Vec<PokemonRecord> {
        self.records
            .iter()
            .filter(|record| record.has_type(type_name))
            .cloned()
            .collect()
    }

    /// Union of every type tag in first-seen order.
    pub fn type_options(&self) -> Vec<String> {
        let mut options: Vec<String> = Vec::new();
        for type_name in self.records.iter().flat_map(|record| record.types.iter()) {
            if !options.contains(type_name) {
                options.push(type_name.clone());
            }
        }
        options
    }
}

impl From<Vec<PokemonRecord>> for Roster {
    fn from(records: Vec<PokemonRecord>) -> Self {
        let mut roster = Roster::new();
        roster.upsert(records);
        roster
    }
}

impl From<Roster> for Vec<PokemonRecord> {
    fn from(roster: Roster) -> Self {
        roster.records
    }
}
