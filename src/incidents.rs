//! Incident registry: incidents keyed by number, listed in load order.

use std::collections::HashMap;

use crate::model::Incident;
use crate::view::Region;

#[derive(Debug, Default)]
pub struct IncidentRegistry {
    incidents: Vec<Incident>,
    by_number: HashMap<u32, usize>,
}

impl IncidentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an incident. Returns the incident back if its number is taken.
    pub fn add(&mut self, incident: Incident) -> Result<(), Incident> {
        if self.by_number.contains_key(&incident.number) {
            return Err(incident);
        }
        self.by_number.insert(incident.number, self.incidents.len());
        self.incidents.push(incident);
        Ok(())
    }

    pub fn get(&self, number: u32) -> Option<&Incident> {
        let Some(&i) = self.by_number.get(&number) else {
            log::debug!("no incident numbered {number}");
            return None;
        };
        Some(&self.incidents[i])
    }

    pub fn contains(&self, number: u32) -> bool {
        self.by_number.contains_key(&number)
    }

    pub fn len(&self) -> usize {
        self.incidents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.incidents.is_empty()
    }

    /// Incidents in the order they were added.
    pub fn iter(&self) -> impl Iterator<Item = &Incident> {
        self.incidents.iter()
    }

    pub fn toggle(&mut self, number: u32) -> Option<Region> {
        let &i = self.by_number.get(&number)?;
        self.incidents[i].toggle();
        Some(Region::IncidentSummary(number))
    }

    pub fn expand_all(&mut self) -> Vec<Region> {
        self.set_all(true)
    }

    pub fn collapse_all(&mut self) -> Vec<Region> {
        self.set_all(false)
    }

    fn set_all(&mut self, expanded: bool) -> Vec<Region> {
        self.incidents
            .iter_mut()
            .filter(|incident| incident.expanded != expanded)
            .map(|incident| {
                incident.toggle();
                Region::IncidentSummary(incident.number)
            })
            .collect()
    }
}
