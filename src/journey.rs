//! The journey timeline.
//!
//! Loads one descriptor whose keys are arbitrary event identifiers, sorts
//! the events chronologically, groups them into collapsible year and month
//! sections, and renders each event as a styled card. Section toggling is a
//! two-state machine driven by abstract user intents, applied to the tree as
//! a plain attribute/class update.

use std::collections::BTreeMap;

use crate::content::{EventRecord, Journey};
use crate::fetch::Fetcher;
use crate::html::{Element, message};

/// Content base for the journey page.
pub const JOURNEY_PATH: &str = "media/journey";

/// Reveal delay step between consecutive cards of a month, in milliseconds.
const REVEAL_STEP_MS: usize = 100;

/// One timeline event with its identifier from the journey document.
#[derive(Debug, Clone)]
pub struct Event {
    pub key: String,
    pub record: EventRecord,
}

impl Event {
    /// Calendar month, with an absent month treated as 0 so it sorts before
    /// any real month.
    pub fn month(&self) -> u32 {
        self.record.month.unwrap_or(0)
    }
}

/// Events grouped by year, then month, both ascending.
pub type Grouped = BTreeMap<i32, BTreeMap<u32, Vec<Event>>>;

/// Converts the journey document into events sorted ascending by year,
/// then month. The sort is stable, so events sharing a year and month keep
/// their document order.
pub fn parse_events(journey: Journey) -> Vec<Event> {
    let mut events: Vec<Event> = journey
        .into_iter()
        .map(|(key, record)| Event { key, record })
        .collect();
    events.sort_by_key(|event| (event.record.year, event.month()));
    events
}

/// Groups sorted events into the year → month → events structure. The
/// `BTreeMap` keys give ascending years and months with 0 first for free.
pub fn group_events(events: Vec<Event>) -> Grouped {
    let mut grouped = Grouped::new();
    for event in events {
        grouped
            .entry(event.record.year)
            .or_default()
            .entry(event.month())
            .or_default()
            .push(event);
    }
    grouped
}

fn month_name(month: u32) -> String {
    let month = u8::try_from(month)
        .ok()
        .and_then(|m| chrono::Month::try_from(m).ok());
    match month {
        Some(month) => month.name()[..3].to_string(),
        None => "Date Unknown".to_string(),
    }
}

/// Renders the whole timeline container.
pub fn render(fetcher: &Fetcher) -> Element {
    let timeline = Element::new("main").attr("id", "timeline").class("timeline");

    let Some(journey) = fetcher.json::<Journey>(format!("{JOURNEY_PATH}/content.json")) else {
        return timeline.child(message("No journey data found."));
    };

    let events = parse_events(journey);
    if events.is_empty() {
        return timeline.child(message("No journey events available."));
    }

    let grouped = group_events(events);
    timeline.children(
        grouped
            .iter()
            .map(|(year, months)| year_section(*year, months).into()),
    )
}

/// Renders one collapsible year section, initially collapsed.
pub fn year_section(year: i32, months: &BTreeMap<u32, Vec<Event>>) -> Element {
    let header = Element::new("div")
        .class("year-header")
        .attr("role", "button")
        .attr("tabindex", "0")
        .attr("aria-expanded", "false")
        .child(Element::new("h3").class("year-title").text(year.to_string()))
        .child(Element::new("span").class("year-toggle").text("▶"));

    let content = Element::new("div").class("year-content").children(
        months
            .iter()
            .map(|(month, events)| month_container(*month, events).into()),
    );

    Element::new("div")
        .class("year-section")
        .child(header)
        .child(content)
}

fn month_container(month: u32, events: &[Event]) -> Element {
    let cards = events
        .iter()
        .enumerate()
        .map(|(i, event)| timeline_card(&event.record, i).into());

    Element::new("div")
        .class("month-container")
        .child(
            Element::new("div")
                .class("month-header")
                .child(Element::new("h4").class("month-title").text(month_name(month))),
        )
        .child(Element::new("div").class("month-events").children(cards))
}

/// Renders one event card, staggered by its position within the month.
pub fn timeline_card(event: &EventRecord, index: usize) -> Element {
    let style = event.card_style.as_deref().unwrap_or("default");
    let mut card = Element::new("div")
        .class("timeline-card")
        .class(format!("card-{style}"))
        .attr("style", format!("animation-delay: {}ms", index * REVEAL_STEP_MS));

    if let Some(image) = &event.image {
        let mut container = Element::new("div").class("timeline-image");
        if style != "default" {
            container = container.child(
                Element::new("div")
                    .class("value-label")
                    .class(format!("value-{style}"))
                    .text(style.to_uppercase()),
            );
        }
        container = container.child(
            Element::new("img")
                .attr("src", format!("{JOURNEY_PATH}/{image}"))
                .attr("alt", event.description.as_deref().unwrap_or("Journey milestone"))
                .attr("loading", "lazy"),
        );
        card = card.child(container);
    }

    if let Some(description) = &event.description {
        // The part after the first " - " becomes a subtitle.
        let mut parts = description.split(" - ");
        let main = parts.next().unwrap_or_default();
        let subtitle = parts.next().filter(|part| !part.is_empty());

        card = card.child(
            Element::new("div")
                .class("timeline-description")
                .child(Element::new("p").class("description-main").text(main))
                .maybe(subtitle.map(|subtitle| {
                    Element::new("p").class("description-subtitle").text(subtitle)
                })),
        );
    }

    card
}

/// Expansion state of a year section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SectionState {
    #[default]
    Collapsed,
    Expanded,
}

/// Abstract user input on a year header, decoupled from device binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserIntent {
    Click,
    EnterKey,
    SpaceKey,
    /// Any other key press; never toggles.
    OtherKey,
}

impl SectionState {
    /// Applies an intent: click, Enter and Space toggle, anything else is
    /// a no-op.
    pub fn apply(self, intent: UserIntent) -> SectionState {
        match intent {
            UserIntent::Click | UserIntent::EnterKey | UserIntent::SpaceKey => match self {
                SectionState::Collapsed => SectionState::Expanded,
                SectionState::Expanded => SectionState::Collapsed,
            },
            UserIntent::OtherKey => self,
        }
    }
}

/// Applies a section state to a rendered year section: marker class on the
/// content, ARIA state and glyph on the header.
pub fn apply_section_state(section: &mut Element, state: SectionState) {
    let expanded = state == SectionState::Expanded;

    if let Some(content) = section.find_class_mut("year-content") {
        content.toggle_class("expanded", expanded);
    }
    if let Some(header) = section.find_class_mut("year-header") {
        header.set_attr("aria-expanded", expanded.to_string());
    }
    if let Some(toggle) = section.find_class_mut("year-toggle") {
        toggle.set_text(if expanded { "▼" } else { "▶" });
    }
}
