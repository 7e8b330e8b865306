//! Read-only waypoint card.

use crate::dom;
use crate::error::Result;
use crate::events::{self, InteractionKind};
use crate::markup::escape;
use crate::model::{Offer, Waypoint};
use crate::types::NodeId;

use super::component::{Component, ElementCache};
use super::format::{format_duration, humanize_date, DATE_FORMAT, MACHINE_FORMAT, TIME_FORMAT};
use super::Callback;

pub struct WaypointView {
    point: Waypoint,
    on_edit_click: Callback,
    cache: ElementCache,
}

impl WaypointView {
    /// `on_edit_click` runs when the rollup button is clicked.
    pub fn new(point: Waypoint, on_edit_click: Callback) -> Self {
        Self {
            point,
            on_edit_click,
            cache: ElementCache::new(),
        }
    }

    pub fn point(&self) -> &Waypoint {
        &self.point
    }
}

fn offer_template(offer: &Offer) -> String {
    format!(
        r#"<li class="event__offer">
      <span class="event__offer-title">{title}</span>
      &plus;&euro;&nbsp;
      <span class="event__offer-price">{price}</span>
    </li>"#,
        title = escape(&offer.title),
        price = offer.price,
    )
}

fn selected_offers_template(point: &Waypoint) -> String {
    if !point.has_offers() {
        return String::new();
    }
    let offers: String = point.checked_offers().map(offer_template).collect();
    format!(
        r#"<h4 class="visually-hidden">Offers:</h4>
                <ul class="event__selected-offers">{offers}</ul>"#
    )
}

impl Component for WaypointView {
    fn template(&self) -> String {
        let point = &self.point;
        let favorite_class = if point.is_favorite {
            "event__favorite-btn event__favorite-btn--active"
        } else {
            "event__favorite-btn"
        };

        format!(
            r#"<li class="trip-events__item">
              <div class="event">
                <time class="event__date" datetime="{from_machine}">{date}</time>
                <div class="event__type">
                  <img class="event__type-icon" width="42" height="42" src="img/icons/{kind}.png" alt="Event type icon">
                </div>
                <h3 class="event__title">{label} {destination}</h3>
                <div class="event__schedule">
                  <p class="event__time">
                    <time class="event__start-time" datetime="{from_machine}">{time_from}</time>
                    &mdash;
                    <time class="event__end-time" datetime="{to_machine}">{time_to}</time>
                  </p>
                  <p class="event__duration">{duration}</p>
                </div>
                <p class="event__price">
                  &euro;&nbsp;<span class="event__price-value">{price}</span>
                </p>
                {offers}
                <button class="{favorite_class}" type="button">
                  <span class="visually-hidden">Add to favorite</span>
                  <svg class="event__favorite-icon" width="28" height="28" viewBox="0 0 28 28">
                    <path d="M14 21l-8.22899 4.3262 1.57159-9.1631L.685209 9.67376 9.8855 8.33688 14 0l4.1145 8.33688 9.2003 1.33688-6.6574 6.48934 1.5716 9.1631L14 21z"/>
                  </svg>
                </button>
                <button class="event__rollup-btn" type="button">
                  <span class="visually-hidden">Open event</span>
                </button>
              </div>
            </li>"#,
            from_machine = humanize_date(point.date_from, MACHINE_FORMAT),
            to_machine = humanize_date(point.date_to, MACHINE_FORMAT),
            date = humanize_date(point.date_from, DATE_FORMAT),
            kind = point.event_type.as_str(),
            label = point.event_type.label(),
            destination = escape(&point.destination.name),
            time_from = humanize_date(point.date_from, TIME_FORMAT),
            time_to = humanize_date(point.date_to, TIME_FORMAT),
            duration = format_duration(point.duration()),
            price = point.base_price,
            offers = selected_offers_template(point),
        )
    }

    fn cache(&self) -> &ElementCache {
        &self.cache
    }

    fn on_materialize(&self, node: NodeId) -> Result<()> {
        if let Some(button) = dom::query_class(node, "event__rollup-btn") {
            let on_edit_click = self.on_edit_click.clone();
            // Dropped with the node
            let _ = events::on(button, InteractionKind::Click, move |_| on_edit_click());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{query_class, query_class_all, reset_document, text_content};
    use crate::events::{click, reset_interaction_state};
    use crate::model::{Destination, EventType};
    use chrono::{TimeZone, Utc};
    use std::cell::Cell;
    use std::rc::Rc;

    fn setup() {
        reset_document();
        reset_interaction_state();
    }

    fn sample(offers: Vec<Offer>) -> Waypoint {
        Waypoint::new(
            "1",
            EventType::Flight,
            Destination::new("Geneva", "Lake city"),
            Utc.with_ymd_and_hms(2026, 3, 18, 10, 30, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 3, 19, 12, 0, 0).unwrap(),
            160,
        )
        .unwrap()
        .with_offers(offers)
    }

    fn noop() -> Callback {
        Rc::new(|| {})
    }

    #[test]
    fn test_renders_point_fields() {
        setup();
        let view = WaypointView::new(sample(Vec::new()), noop());
        let node = view.element().unwrap();

        let title = query_class(node, "event__title").unwrap();
        assert_eq!(text_content(title), "Flight Geneva");
        let date = query_class(node, "event__date").unwrap();
        assert_eq!(text_content(date), "Mar 18");
        let duration = query_class(node, "event__duration").unwrap();
        assert_eq!(text_content(duration), "01D 01H 30M");
        let price = query_class(node, "event__price-value").unwrap();
        assert_eq!(text_content(price), "160");
    }

    #[test]
    fn test_only_checked_offers_shown() {
        setup();
        let view = WaypointView::new(
            sample(vec![
                Offer::new("Add luggage", 30, true),
                Offer::new("Switch to comfort", 100, false),
                Offer::new("Choose seats", 5, true),
            ]),
            noop(),
        );
        let node = view.element().unwrap();

        let titles: Vec<String> = query_class_all(node, "event__offer-title")
            .into_iter()
            .map(text_content)
            .collect();
        assert_eq!(titles, vec!["Add luggage", "Choose seats"]);
    }

    #[test]
    fn test_no_offer_block_without_checked_offers() {
        setup();
        let view = WaypointView::new(sample(vec![Offer::new("Add meal", 15, false)]), noop());
        let node = view.element().unwrap();
        assert!(query_class(node, "event__selected-offers").is_none());
    }

    #[test]
    fn test_favorite_class() {
        setup();
        let view = WaypointView::new(sample(Vec::new()).favorite(true), noop());
        let node = view.element().unwrap();
        assert!(query_class(node, "event__favorite-btn--active").is_some());
    }

    #[test]
    fn test_destination_is_escaped() {
        setup();
        let mut point = sample(Vec::new());
        point.destination.name = "<Rome & Co>".to_string();
        let view = WaypointView::new(point, noop());
        let node = view.element().unwrap();
        let title = query_class(node, "event__title").unwrap();
        assert_eq!(text_content(title), "Flight <Rome & Co>");
    }

    #[test]
    fn test_rollup_click_calls_handler() {
        setup();
        let clicks = Rc::new(Cell::new(0));
        let clicks_clone = clicks.clone();
        let view = WaypointView::new(
            sample(Vec::new()),
            Rc::new(move || clicks_clone.set(clicks_clone.get() + 1)),
        );
        let node = view.element().unwrap();

        // Clicking elsewhere on the card does nothing
        click(query_class(node, "event__title").unwrap());
        assert_eq!(clicks.get(), 0);

        let button = query_class(node, "event__rollup-btn").unwrap();
        click(button);
        assert_eq!(clicks.get(), 1);

        // The span inside the button bubbles up to it
        let label = dom::children(button)[0];
        click(label);
        assert_eq!(clicks.get(), 2);
    }
}
