//! The timeline: every event of the script, kept sorted by time.
//!
//! Answers "which event is current at second T" and owns the expand/collapse
//! and highlight state of its events. Mutations return the [`Region`]s the
//! presentation layer has to redraw; a mutation that changes nothing
//! returns nothing.

use std::collections::HashMap;

use crate::model::{Evaluation, EvaluationId, EvaluationsId, Event, EventId, PropertiesId};
use crate::view::Region;

/// Which groups a bulk expand/collapse applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Events,
    Properties,
    Evaluations,
    All,
}

/// Events sorted ascending by time, with id indexes for O(1) lookup.
#[derive(Debug, Default)]
pub struct Timeline {
    events: Vec<Event>,
    by_id: HashMap<EventId, usize>,
    properties: HashMap<PropertiesId, EventId>,
    evaluations: HashMap<EvaluationsId, EventId>,
    evaluation: HashMap<EvaluationId, (EventId, usize)>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an event, keeping the timeline sorted.
    ///
    /// Insertion is stable: an event lands after every event already present
    /// with the same time.
    pub fn add(&mut self, event: Event) {
        let at = self.events.partition_point(|e| e.time <= event.time);

        self.properties.insert(event.properties.id, event.id);
        self.evaluations.insert(event.evaluations.id, event.id);
        for (i, eval) in event.evaluations.items.iter().enumerate() {
            self.evaluation.insert(eval.id, (event.id, i));
        }

        self.events.insert(at, event);
        for (i, e) in self.events.iter().enumerate().skip(at) {
            self.by_id.insert(e.id, i);
        }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events in ascending time order.
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    pub fn get(&self, id: EventId) -> Option<&Event> {
        let Some(&i) = self.by_id.get(&id) else {
            log::debug!("no event with id {id}");
            return None;
        };
        Some(&self.events[i])
    }

    fn get_mut(&mut self, id: EventId) -> Option<&mut Event> {
        let Some(&i) = self.by_id.get(&id) else {
            log::debug!("no event with id {id}");
            return None;
        };
        Some(&mut self.events[i])
    }

    pub fn evaluation(&self, id: EvaluationId) -> Option<&Evaluation> {
        let (owner, i) = self.locate_evaluation(id)?;
        self.get(owner).map(|e| &e.evaluations.items[i])
    }

    pub fn evaluation_mut(&mut self, id: EvaluationId) -> Option<&mut Evaluation> {
        let (owner, i) = self.locate_evaluation(id)?;
        self.get_mut(owner).map(|e| &mut e.evaluations.items[i])
    }

    fn locate_evaluation(&self, id: EvaluationId) -> Option<(EventId, usize)> {
        let found = self.evaluation.get(&id).copied();
        if found.is_none() {
            log::debug!("no evaluation with id {id}");
        }
        found
    }

    /// Every evaluation in timeline order.
    pub fn all_evaluations(&self) -> impl Iterator<Item = &Evaluation> {
        self.events.iter().flat_map(|e| e.evaluations.items.iter())
    }

    /// The events of one incident, in ascending time order.
    pub fn events_for_incident(&self, number: u32) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(move |e| e.incident == number)
    }

    /// The last event that has executed by second `time`.
    ///
    /// Returns the event with the greatest time `<= time`; among events
    /// sharing that time, the one inserted last. `None` before the first
    /// event.
    pub fn current_event_as_of(&self, time: i64) -> Option<&Event> {
        let executed = self.events.partition_point(|e| e.time.to_seconds() <= time);
        executed.checked_sub(1).map(|i| &self.events[i])
    }

    /// The event currently highlighted, if any.
    pub fn highlighted(&self) -> Option<&Event> {
        self.events.iter().find(|e| e.highlighted)
    }

    // ── Expand / collapse ──

    pub fn toggle_event(&mut self, id: EventId) -> Option<Region> {
        let event = self.get_mut(id)?;
        event.toggle();
        Some(Region::EventBody(id))
    }

    pub fn toggle_properties(&mut self, id: PropertiesId) -> Option<Region> {
        let Some(&owner) = self.properties.get(&id) else {
            log::debug!("no properties with id {id}");
            return None;
        };
        self.get_mut(owner)?.properties.toggle();
        Some(Region::Properties(id))
    }

    pub fn toggle_evaluations(&mut self, id: EvaluationsId) -> Option<Region> {
        let Some(&owner) = self.evaluations.get(&id) else {
            log::debug!("no evaluations with id {id}");
            return None;
        };
        self.get_mut(owner)?.evaluations.toggle();
        Some(Region::Evaluations(id))
    }

    pub fn expand_all(&mut self, target: Target) -> Vec<Region> {
        self.set_all(target, true)
    }

    pub fn collapse_all(&mut self, target: Target) -> Vec<Region> {
        self.set_all(target, false)
    }

    /// Toggles only the groups not already in the wanted state, so a
    /// repeated call produces no redraws.
    fn set_all(&mut self, target: Target, expanded: bool) -> Vec<Region> {
        let mut regions = Vec::new();
        let (properties, evaluations, events) = match target {
            Target::Events => (false, false, true),
            Target::Properties => (true, false, false),
            Target::Evaluations => (false, true, false),
            Target::All => (true, true, true),
        };

        for event in &mut self.events {
            if properties && event.properties.expanded != expanded {
                event.properties.toggle();
                regions.push(Region::Properties(event.properties.id));
            }
            if evaluations && event.evaluations.expanded != expanded {
                event.evaluations.toggle();
                regions.push(Region::Evaluations(event.evaluations.id));
            }
            if events && event.expanded != expanded {
                event.toggle();
                regions.push(Region::EventBody(event.id));
            }
        }
        regions
    }

    // ── Highlight ──

    /// Marks an event as the current one. The caller keeps highlighting
    /// exclusive; see [`HighlightController`](crate::highlight::HighlightController).
    pub fn highlight(&mut self, id: EventId) -> Option<Region> {
        self.get_mut(id)?.highlighted = true;
        Some(Region::EventHeader(id))
    }

    pub fn unhighlight(&mut self, id: EventId) -> Option<Region> {
        self.get_mut(id)?.highlighted = false;
        Some(Region::EventHeader(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::{Content, Evaluations, IdAllocator, Properties, Time};

    /// Builds events with fresh ids; each gets one evaluation when `graded`.
    struct Builder {
        ids: IdAllocator,
    }

    impl Builder {
        fn new() -> Self {
            Self {
                ids: IdAllocator::default(),
            }
        }

        fn event(&mut self, incident: u32, time: Time, graded: bool) -> Event {
            let evaluations = if graded {
                vec![Evaluation::new(
                    self.ids.evaluation(),
                    "CAD",
                    Content::Text("Verify the incident".into()),
                )]
            } else {
                vec![]
            };
            Event::new(
                self.ids.event(),
                time,
                incident,
                Properties::new(self.ids.properties(), vec![]),
                Evaluations::new(self.ids.evaluations(), evaluations),
            )
        }
    }

    fn three_minute_timeline() -> Timeline {
        let mut b = Builder::new();
        let mut timeline = Timeline::new();
        timeline.add(b.event(187, Time::new(0, 0, 0), false));
        timeline.add(b.event(187, Time::new(0, 1, 0), false));
        timeline.add(b.event(187, Time::new(0, 2, 0), true));
        timeline
    }

    fn seconds_of(event: Option<&Event>) -> Option<i64> {
        event.map(|e| e.time.to_seconds())
    }

    fn is_sorted(timeline: &Timeline) -> bool {
        timeline.iter().is_sorted_by_key(|e| e.time.to_seconds())
    }

    #[test]
    fn stays_sorted_after_every_insertion() {
        let mut b = Builder::new();
        let mut timeline = Timeline::new();
        for secs in [300, 0, 120, 120, 45, 3600, 1, 299, 0] {
            timeline.add(b.event(1, Time::from_seconds(secs), false));
            assert!(is_sorted(&timeline));
        }
        assert_eq!(timeline.len(), 9);
    }

    #[test]
    fn ids_resolve_after_reordering_inserts() {
        let mut b = Builder::new();
        let mut timeline = Timeline::new();
        let late = b.event(1, Time::new(0, 5, 0), false);
        let early = b.event(1, Time::new(0, 1, 0), false);
        let (late_id, early_id) = (late.id, early.id);
        timeline.add(late);
        timeline.add(early);

        assert_eq!(timeline.get(late_id).unwrap().time, Time::new(0, 5, 0));
        assert_eq!(timeline.get(early_id).unwrap().time, Time::new(0, 1, 0));
    }

    #[test]
    fn lookup_between_events() {
        let timeline = three_minute_timeline();
        assert_eq!(seconds_of(timeline.current_event_as_of(90)), Some(60));
    }

    #[test]
    fn lookup_boundary_is_inclusive() {
        let timeline = three_minute_timeline();
        assert_eq!(seconds_of(timeline.current_event_as_of(0)), Some(0));
        assert_eq!(seconds_of(timeline.current_event_as_of(60)), Some(60));
    }

    #[test]
    fn lookup_before_first_event_is_none() {
        let timeline = three_minute_timeline();
        assert!(timeline.current_event_as_of(-1).is_none());
    }

    #[test]
    fn lookup_after_last_event_is_last() {
        let timeline = three_minute_timeline();
        assert_eq!(seconds_of(timeline.current_event_as_of(10_000)), Some(120));
    }

    #[test]
    fn lookup_on_empty_timeline() {
        assert!(Timeline::new().current_event_as_of(0).is_none());
    }

    #[test]
    fn lookup_on_single_event() {
        let mut b = Builder::new();
        let mut timeline = Timeline::new();
        timeline.add(b.event(1, Time::new(0, 0, 30), false));

        assert!(timeline.current_event_as_of(29).is_none());
        assert_eq!(seconds_of(timeline.current_event_as_of(30)), Some(30));
        assert_eq!(seconds_of(timeline.current_event_as_of(31)), Some(30));
    }

    #[test]
    fn lookup_matches_linear_scan() {
        let mut b = Builder::new();
        let mut timeline = Timeline::new();
        for secs in [40, 10, 10, 95, 0, 60, 61, 200] {
            timeline.add(b.event(1, Time::from_seconds(secs), false));
        }

        for t in -5..250 {
            let expected = timeline
                .iter()
                .filter(|e| e.time.to_seconds() <= t)
                .last()
                .map(|e| e.id);
            assert_eq!(timeline.current_event_as_of(t).map(|e| e.id), expected, "t = {t}");
        }
    }

    #[test]
    fn equal_times_break_ties_by_insertion() {
        let mut b = Builder::new();
        let mut timeline = Timeline::new();
        let a = b.event(1, Time::new(0, 2, 0), false);
        let later = b.event(1, Time::new(0, 2, 0), false);
        let later_id = later.id;
        timeline.add(a);
        timeline.add(later);

        assert_eq!(timeline.current_event_as_of(120).unwrap().id, later_id);
    }

    #[test]
    fn events_for_incident_in_time_order() {
        let mut b = Builder::new();
        let mut timeline = Timeline::new();
        timeline.add(b.event(188, Time::new(0, 10, 0), false));
        timeline.add(b.event(187, Time::new(0, 2, 0), false));
        timeline.add(b.event(187, Time::new(0, 0, 0), false));
        timeline.add(b.event(187, Time::new(0, 1, 0), false));

        let times: Vec<i64> = timeline
            .events_for_incident(187)
            .map(|e| e.time.to_seconds())
            .collect();
        assert_eq!(times, vec![0, 60, 120]);
        assert_eq!(timeline.events_for_incident(999).count(), 0);
    }

    #[test]
    fn lookups_miss_quietly() {
        let mut timeline = three_minute_timeline();
        assert!(timeline.get(EventId(42)).is_none());
        assert!(timeline.toggle_properties(PropertiesId(42)).is_none());
        assert!(timeline.evaluation(EvaluationId(42)).is_none());
    }

    #[test]
    fn evaluation_found_by_id() {
        let mut timeline = three_minute_timeline();
        let id = timeline.all_evaluations().next().unwrap().id;

        timeline.evaluation_mut(id).unwrap().record_rating(4).unwrap();
        assert_eq!(
            timeline.evaluation(id).and_then(|e| e.rating).map(|r| r.value()),
            Some(4)
        );
    }

    #[test]
    fn toggle_flips_each_call() {
        let mut timeline = three_minute_timeline();
        let id = timeline.iter().next().unwrap().id;

        assert_eq!(timeline.toggle_event(id), Some(Region::EventBody(id)));
        assert!(!timeline.get(id).unwrap().expanded);
        timeline.toggle_event(id);
        assert!(timeline.get(id).unwrap().expanded);
        assert!(timeline.toggle_event(EventId(99)).is_none());
    }

    #[test]
    fn collapsing_event_keeps_group_state() {
        let mut timeline = three_minute_timeline();
        let event = timeline.iter().next().unwrap();
        let (id, props) = (event.id, event.properties.id);

        timeline.toggle_properties(props);
        timeline.toggle_event(id);
        timeline.toggle_event(id);

        let event = timeline.get(id).unwrap();
        assert!(event.expanded);
        assert!(!event.properties.expanded);
    }

    #[test]
    fn collapse_all_twice_is_a_no_op() {
        let mut timeline = three_minute_timeline();

        let first = timeline.collapse_all(Target::All);
        assert_eq!(first.len(), 9);
        assert!(timeline.iter().all(|e| {
            !e.expanded && !e.properties.expanded && !e.evaluations.expanded
        }));

        let second = timeline.collapse_all(Target::All);
        assert!(second.is_empty());
        assert!(timeline.iter().all(|e| !e.expanded));
    }

    #[test]
    fn bulk_ops_only_touch_their_target() {
        let mut timeline = three_minute_timeline();

        let regions = timeline.collapse_all(Target::Evaluations);
        assert!(regions.iter().all(|r| matches!(r, Region::Evaluations(_))));
        assert!(timeline.iter().all(|e| e.expanded && e.properties.expanded));
        assert!(timeline.iter().all(|e| !e.evaluations.expanded));
    }

    #[test]
    fn expand_all_skips_already_expanded() {
        let mut timeline = three_minute_timeline();
        let id = timeline.iter().nth(1).unwrap().id;
        timeline.toggle_event(id);

        let regions = timeline.expand_all(Target::Events);
        assert_eq!(regions, vec![Region::EventBody(id)]);
    }

    #[test]
    fn highlight_sets_and_clears() {
        let mut timeline = three_minute_timeline();
        let id = timeline.iter().next().unwrap().id;

        assert_eq!(timeline.highlight(id), Some(Region::EventHeader(id)));
        assert_eq!(timeline.highlighted().map(|e| e.id), Some(id));
        timeline.unhighlight(id);
        assert!(timeline.highlighted().is_none());
    }
}
