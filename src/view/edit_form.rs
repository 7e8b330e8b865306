//! Inline edit form for one waypoint.

use crate::dom;
use crate::error::Result;
use crate::events::{self, InteractionKind};
use crate::markup::escape;
use crate::model::{EventType, Waypoint};
use crate::types::NodeId;

use super::component::{Component, ElementCache};
use super::format::{humanize_date, FORM_FORMAT};
use super::Callback;

/// Destination names offered by the destination datalist.
const DESTINATIONS: &[&str] = &["Amsterdam", "Geneva", "Chamonix"];

pub struct EditFormView {
    point: Waypoint,
    on_form_submit: Callback,
    cache: ElementCache,
}

impl EditFormView {
    /// `on_form_submit` runs when the form is submitted.
    pub fn new(point: Waypoint, on_form_submit: Callback) -> Self {
        Self {
            point,
            on_form_submit,
            cache: ElementCache::new(),
        }
    }

    pub fn point(&self) -> &Waypoint {
        &self.point
    }
}

fn type_item_template(kind: EventType, current: EventType, id: &str) -> String {
    let checked = if kind == current { " checked" } else { "" };
    format!(
        r#"<div class="event__type-item">
                          <input id="event-type-{slug}-{id}" class="event__type-input visually-hidden" type="radio" name="event-type" value="{slug}"{checked}>
                          <label class="event__type-label event__type-label--{slug}" for="event-type-{slug}-{id}">{label}</label>
                        </div>"#,
        slug = kind.as_str(),
        label = kind.label(),
    )
}

fn offers_section_template(point: &Waypoint, id: &str) -> String {
    if point.offers.is_empty() {
        return String::new();
    }

    let selectors: String = point
        .offers
        .iter()
        .enumerate()
        .map(|(index, offer)| {
            let checked = if offer.checked { " checked" } else { "" };
            format!(
                r#"<div class="event__offer-selector">
                        <input class="event__offer-checkbox visually-hidden" id="event-offer-{index}-{id}" type="checkbox" name="event-offer-{index}"{checked}>
                        <label class="event__offer-label" for="event-offer-{index}-{id}">
                          <span class="event__offer-title">{title}</span>
                          &plus;&euro;&nbsp;
                          <span class="event__offer-price">{price}</span>
                        </label>
                      </div>"#,
                title = escape(&offer.title),
                price = offer.price,
            )
        })
        .collect();

    format!(
        r#"<section class="event__section event__section--offers">
                    <h3 class="event__section-title event__section-title--offers">Offers</h3>
                    <div class="event__available-offers">{selectors}</div>
                  </section>"#
    )
}

fn destination_section_template(point: &Waypoint) -> String {
    let destination = &point.destination;
    if destination.description.is_empty() && destination.pictures.is_empty() {
        return String::new();
    }

    let photos = if destination.pictures.is_empty() {
        String::new()
    } else {
        let pictures: String = destination
            .pictures
            .iter()
            .map(|picture| {
                format!(
                    r#"<img class="event__photo" src="{}" alt="{}">"#,
                    escape(&picture.src),
                    escape(&picture.description)
                )
            })
            .collect();
        format!(
            r#"<div class="event__photos-container">
                      <div class="event__photos-tape">{pictures}</div>
                    </div>"#
        )
    };

    format!(
        r#"<section class="event__section event__section--destination">
                    <h3 class="event__section-title event__section-title--destination">Destination</h3>
                    <p class="event__destination-description">{description}</p>
                    {photos}
                  </section>"#,
        description = escape(&destination.description),
    )
}

impl Component for EditFormView {
    fn template(&self) -> String {
        let point = &self.point;
        let id = escape(&point.id);
        let types: String = EventType::ALL
            .iter()
            .map(|&kind| type_item_template(kind, point.event_type, &id))
            .collect();
        let options: String = DESTINATIONS
            .iter()
            .map(|name| format!(r#"<option value="{name}"></option>"#))
            .collect();

        format!(
            r##"<li class="trip-events__item">
              <form class="event event--edit" action="#" method="post">
                <header class="event__header">
                  <div class="event__type-wrapper">
                    <label class="event__type event__type-btn" for="event-type-toggle-{id}">
                      <span class="visually-hidden">Choose event type</span>
                      <img class="event__type-icon" width="17" height="17" src="img/icons/{kind}.png" alt="Event type icon">
                    </label>
                    <input class="event__type-toggle visually-hidden" id="event-type-toggle-{id}" type="checkbox">
                    <div class="event__type-list">
                      <fieldset class="event__type-group">
                        <legend class="visually-hidden">Event type</legend>
                        {types}
                      </fieldset>
                    </div>
                  </div>
                  <div class="event__field-group event__field-group--destination">
                    <label class="event__label event__type-output" for="event-destination-{id}">{label}</label>
                    <input class="event__input event__input--destination" id="event-destination-{id}" type="text" name="event-destination" value="{destination}" list="destination-list-{id}">
                    <datalist id="destination-list-{id}">{options}</datalist>
                  </div>
                  <div class="event__field-group event__field-group--time">
                    <label class="visually-hidden" for="event-start-time-{id}">From</label>
                    <input class="event__input event__input--time" id="event-start-time-{id}" type="text" name="event-start-time" value="{date_from}">
                    &mdash;
                    <label class="visually-hidden" for="event-end-time-{id}">To</label>
                    <input class="event__input event__input--time" id="event-end-time-{id}" type="text" name="event-end-time" value="{date_to}">
                  </div>
                  <div class="event__field-group event__field-group--price">
                    <label class="event__label" for="event-price-{id}">
                      <span class="visually-hidden">Price</span>
                      &euro;
                    </label>
                    <input class="event__input event__input--price" id="event-price-{id}" type="text" name="event-price" value="{price}">
                  </div>
                  <button class="event__save-btn btn btn--blue" type="submit">Save</button>
                  <button class="event__reset-btn" type="reset">Delete</button>
                  <button class="event__rollup-btn" type="button">
                    <span class="visually-hidden">Open event</span>
                  </button>
                </header>
                <section class="event__details">
                  {offers}
                  {destination_section}
                </section>
              </form>
            </li>"##,
            kind = point.event_type.as_str(),
            label = point.event_type.label(),
            destination = escape(&point.destination.name),
            date_from = humanize_date(point.date_from, FORM_FORMAT),
            date_to = humanize_date(point.date_to, FORM_FORMAT),
            price = point.base_price,
            offers = offers_section_template(point, &id),
            destination_section = destination_section_template(point),
        )
    }

    fn cache(&self) -> &ElementCache {
        &self.cache
    }

    fn on_materialize(&self, node: NodeId) -> Result<()> {
        if let Some(form) = dom::query_tag(node, "form") {
            let on_form_submit = self.on_form_submit.clone();
            // Dropped with the node
            let _ = events::on(form, InteractionKind::Submit, move |_| on_form_submit());
        }
        Ok(())
    }
}
