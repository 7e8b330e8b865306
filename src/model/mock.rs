//! Random waypoints for demos and tests.

use chrono::{DateTime, TimeDelta, Utc};
use rand::seq::IndexedRandom;
use rand::Rng;

use super::point::{Destination, EventType, Offer, Picture, Waypoint};

const CITIES: &[&str] = &[
    "Amsterdam",
    "Geneva",
    "Chamonix",
    "Saint Petersburg",
    "Barcelona",
    "Rome",
    "Vienna",
];

const SENTENCES: &[&str] = &[
    "Lorem ipsum dolor sit amet, consectetur adipiscing elit.",
    "Cras aliquet varius magna, non porta ligula feugiat eget.",
    "Fusce tristique felis at fermentum pharetra.",
    "Aliquam id orci ut lectus varius viverra.",
    "Nullam nunc ex, convallis sed finibus eget, sollicitudin eget ante.",
    "Phasellus eros mauris, condimentum sed nibh vitae, sodales efficitur ipsum.",
    "Sed blandit, eros vel aliquam faucibus, purus ex euismod diam.",
];

const OFFER_TITLES: &[&str] = &[
    "Add luggage",
    "Switch to comfort class",
    "Add meal",
    "Choose seats",
    "Travel by train",
    "Order Uber",
];

fn random_destination<R: Rng + ?Sized>(rng: &mut R) -> Destination {
    let name = CITIES.choose(rng).copied().unwrap_or("Amsterdam");
    let sentence_count = rng.random_range(1..=3);
    let description = SENTENCES
        .choose_multiple(rng, sentence_count)
        .copied()
        .collect::<Vec<_>>()
        .join(" ");
    let pictures = (0..rng.random_range(0..=3))
        .map(|_| Picture {
            src: format!("https://loremflickr.com/248/152?random={}", rng.random_range(0..1000)),
            description: format!("{name} parliament building"),
        })
        .collect();

    Destination {
        name: name.to_string(),
        description,
        pictures,
    }
}

fn random_offers<R: Rng + ?Sized>(rng: &mut R) -> Vec<Offer> {
    let offer_count = rng.random_range(0..=4);
    OFFER_TITLES
        .choose_multiple(rng, offer_count)
        .map(|title| Offer::new(*title, rng.random_range(5..=20) * 5, rng.random_bool(0.5)))
        .collect()
}

/// One random waypoint. `index` becomes the id.
pub fn random_waypoint<R: Rng + ?Sized>(index: usize, rng: &mut R, base: DateTime<Utc>) -> Waypoint {
    let event_type = EventType::ALL.choose(rng).copied().unwrap_or(EventType::Taxi);
    let date_from = base + TimeDelta::minutes(rng.random_range(-3 * 24 * 60..=3 * 24 * 60));
    let date_to = date_from + TimeDelta::minutes(rng.random_range(15..=2 * 24 * 60));

    Waypoint {
        id: index.to_string(),
        event_type,
        destination: random_destination(rng),
        date_from,
        date_to,
        base_price: rng.random_range(2..=120) * 10,
        offers: random_offers(rng),
        is_favorite: rng.random_bool(0.3),
    }
}

/// `count` random waypoints, sorted by start date.
pub fn random_waypoints<R: Rng + ?Sized>(count: usize, rng: &mut R, base: DateTime<Utc>) -> Vec<Waypoint> {
    let mut points: Vec<Waypoint> = (0..count).map(|i| random_waypoint(i, rng, base)).collect();
    points.sort_by_key(|point| point.date_from);
    points
}
