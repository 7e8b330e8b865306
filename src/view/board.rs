//! Events section: sorting bar, list container and the empty placeholder.

use super::component::{Component, ElementCache};

const SORT_ITEMS: &[(&str, &str, bool)] = &[
    ("day", "Day", false),
    ("event", "Event", true),
    ("time", "Time", false),
    ("price", "Price", false),
    ("offer", "Offers", true),
];

#[derive(Default)]
pub struct SortingView {
    cache: ElementCache,
}

impl SortingView {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Component for SortingView {
    fn template(&self) -> String {
        let items: String = SORT_ITEMS
            .iter()
            .enumerate()
            .map(|(index, (name, label, disabled))| {
                let checked = if index == 0 { " checked" } else { "" };
                let disabled = if *disabled { " disabled" } else { "" };
                format!(
                    r#"<div class="trip-sort__item trip-sort__item--{name}">
                <input id="sort-{name}" class="trip-sort__input visually-hidden" type="radio" name="trip-sort" value="sort-{name}"{checked}{disabled}>
                <label class="trip-sort__btn" for="sort-{name}">{label}</label>
              </div>"#
                )
            })
            .collect();

        format!(
            r##"<form class="trip-events__trip-sort trip-sort" action="#" method="get">
              {items}
            </form>"##
        )
    }

    fn cache(&self) -> &ElementCache {
        &self.cache
    }
}

/// `<ul>` that waypoint and edit form items are rendered into.
#[derive(Default)]
pub struct TripEventsListView {
    cache: ElementCache,
}

impl TripEventsListView {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Component for TripEventsListView {
    fn template(&self) -> String {
        r#"<ul class="trip-events__list"></ul>"#.to_string()
    }

    fn cache(&self) -> &ElementCache {
        &self.cache
    }
}

/// Shown instead of the list when there are no waypoints.
#[derive(Default)]
pub struct NoPointsView {
    cache: ElementCache,
}

impl NoPointsView {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Component for NoPointsView {
    fn template(&self) -> String {
        r#"<p class="trip-events__msg">Click New Event to create your first point</p>"#.to_string()
    }

    fn cache(&self) -> &ElementCache {
        &self.cache
    }
}
