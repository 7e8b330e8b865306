//! Header chrome: route summary, menu tabs and filters.

use crate::markup::escape;
use crate::model::Waypoint;

use super::component::{Component, ElementCache};
use super::format::{humanize_date, DATE_FORMAT};

// =============================================================================
// ROUTE
// =============================================================================

/// Container for the route summary, prepended to the trip header.
#[derive(Default)]
pub struct RouteWrapperView {
    cache: ElementCache,
}

impl RouteWrapperView {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Component for RouteWrapperView {
    fn template(&self) -> String {
        r#"<section class="trip-main__trip-info trip-info"></section>"#.to_string()
    }

    fn cache(&self) -> &ElementCache {
        &self.cache
    }
}

/// Route title and date span.
///
/// Up to three destinations are listed in full; longer routes show the first
/// and last with an ellipsis between.
pub struct RouteInfoView {
    title: String,
    dates: String,
    cache: ElementCache,
}

impl RouteInfoView {
    pub fn new(points: &[Waypoint]) -> Self {
        let names: Vec<&str> = points.iter().map(|p| p.destination.name.as_str()).collect();
        let title = match names.as_slice() {
            [] => String::new(),
            [first, .., last] if names.len() > 3 => format!("{first} — … — {last}"),
            _ => names.join(" — "),
        };

        let dates = match (points.first(), points.last()) {
            (Some(first), Some(last)) => format!(
                "{} — {}",
                humanize_date(first.date_from, DATE_FORMAT),
                humanize_date(last.date_to, DATE_FORMAT)
            ),
            _ => String::new(),
        };

        Self {
            title,
            dates,
            cache: ElementCache::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn dates(&self) -> &str {
        &self.dates
    }
}

impl Component for RouteInfoView {
    fn template(&self) -> String {
        format!(
            r#"<div class="trip-info__main">
              <h1 class="trip-info__title">{}</h1>
              <p class="trip-info__dates">{}</p>
            </div>"#,
            escape(&self.title),
            escape(&self.dates)
        )
    }

    fn cache(&self) -> &ElementCache {
        &self.cache
    }
}

/// Trip total: base prices plus checked offers.
pub struct RouteCostView {
    total: u32,
    cache: ElementCache,
}

impl RouteCostView {
    pub fn new(points: &[Waypoint]) -> Self {
        Self {
            total: points.iter().map(Waypoint::total_price).sum(),
            cache: ElementCache::new(),
        }
    }

    pub fn total(&self) -> u32 {
        self.total
    }
}

impl Component for RouteCostView {
    fn template(&self) -> String {
        format!(
            r#"<p class="trip-info__cost">
              Total: &euro;&nbsp;<span class="trip-info__cost-value">{}</span>
            </p>"#,
            self.total
        )
    }

    fn cache(&self) -> &ElementCache {
        &self.cache
    }
}

// =============================================================================
// MENU + FILTERS
// =============================================================================

#[derive(Default)]
pub struct MenuNavView {
    cache: ElementCache,
}

impl MenuNavView {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Component for MenuNavView {
    fn template(&self) -> String {
        r##"<nav class="trip-controls__trip-tabs trip-tabs">
              <a class="trip-tabs__btn trip-tabs__btn--active" href="#">Table</a>
              <a class="trip-tabs__btn" href="#">Stats</a>
            </nav>"##
            .to_string()
    }

    fn cache(&self) -> &ElementCache {
        &self.cache
    }
}

/// Radio group of filter names. The first filter starts checked.
pub struct FiltersView {
    filters: Vec<String>,
    cache: ElementCache,
}

impl FiltersView {
    pub fn new(filters: Vec<String>) -> Self {
        Self {
            filters,
            cache: ElementCache::new(),
        }
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl Component for FiltersView {
    fn template(&self) -> String {
        let items: String = self
            .filters
            .iter()
            .enumerate()
            .map(|(index, name)| {
                let checked = if index == 0 { " checked" } else { "" };
                let value = escape(name);
                format!(
                    r#"<div class="trip-filters__filter">
                  <input id="filter-{value}" class="trip-filters__filter-input visually-hidden" type="radio" name="trip-filter" value="{value}"{checked}>
                  <label class="trip-filters__filter-label" for="filter-{value}">{label}</label>
                </div>"#,
                    label = escape(&capitalize(name)),
                )
            })
            .collect();

        format!(
            r##"<form class="trip-filters" action="#" method="get">
                {items}
                <button class="visually-hidden" type="submit">Accept filter</button>
              </form>"##
        )
    }

    fn cache(&self) -> &ElementCache {
        &self.cache
    }
}
