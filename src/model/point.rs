//! Waypoint records.

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};

use crate::error::{BoardError, Result};

/// Kind of transport or activity at a waypoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    Taxi,
    Bus,
    Train,
    Ship,
    Drive,
    Flight,
    CheckIn,
    Sightseeing,
    Restaurant,
}

impl EventType {
    pub const ALL: [EventType; 9] = [
        Self::Taxi,
        Self::Bus,
        Self::Train,
        Self::Ship,
        Self::Drive,
        Self::Flight,
        Self::CheckIn,
        Self::Sightseeing,
        Self::Restaurant,
    ];

    /// Lowercase slug, also the icon file name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Taxi => "taxi",
            Self::Bus => "bus",
            Self::Train => "train",
            Self::Ship => "ship",
            Self::Drive => "drive",
            Self::Flight => "flight",
            Self::CheckIn => "check-in",
            Self::Sightseeing => "sightseeing",
            Self::Restaurant => "restaurant",
        }
    }

    /// Capitalized label for type pickers.
    pub fn label(self) -> &'static str {
        match self {
            Self::Taxi => "Taxi",
            Self::Bus => "Bus",
            Self::Train => "Train",
            Self::Ship => "Ship",
            Self::Drive => "Drive",
            Self::Flight => "Flight",
            Self::CheckIn => "Check-in",
            Self::Sightseeing => "Sightseeing",
            Self::Restaurant => "Restaurant",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Photo attached to a destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picture {
    pub src: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Destination {
    pub name: String,
    pub description: String,
    pub pictures: Vec<Picture>,
}

impl Destination {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            pictures: Vec::new(),
        }
    }
}

/// Optional add-on for a waypoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Offer {
    pub title: String,
    pub price: u32,
    /// Whether the offer is included in the trip.
    pub checked: bool,
}

impl Offer {
    pub fn new(title: impl Into<String>, price: u32, checked: bool) -> Self {
        Self {
            title: title.into(),
            price,
            checked,
        }
    }
}

/// One itinerary stop.
#[derive(Debug, Clone, PartialEq)]
pub struct Waypoint {
    pub id: String,
    pub event_type: EventType,
    pub destination: Destination,
    pub date_from: DateTime<Utc>,
    pub date_to: DateTime<Utc>,
    pub base_price: u32,
    pub offers: Vec<Offer>,
    pub is_favorite: bool,
}

impl Waypoint {
    /// Create a waypoint without offers.
    ///
    /// # Errors
    ///
    /// `InvalidDateRange` if `date_to` is before `date_from`.
    pub fn new(
        id: impl Into<String>,
        event_type: EventType,
        destination: Destination,
        date_from: DateTime<Utc>,
        date_to: DateTime<Utc>,
        base_price: u32,
    ) -> Result<Self> {
        let id = id.into();
        if date_to < date_from {
            return Err(BoardError::InvalidDateRange { id });
        }
        Ok(Self {
            id,
            event_type,
            destination,
            date_from,
            date_to,
            base_price,
            offers: Vec::new(),
            is_favorite: false,
        })
    }

    pub fn with_offers(mut self, offers: Vec<Offer>) -> Self {
        self.offers = offers;
        self
    }

    pub fn favorite(mut self, is_favorite: bool) -> Self {
        self.is_favorite = is_favorite;
        self
    }

    /// Checked offers, in their original order.
    pub fn checked_offers(&self) -> impl Iterator<Item = &Offer> {
        self.offers.iter().filter(|offer| offer.checked)
    }

    pub fn has_offers(&self) -> bool {
        self.checked_offers().next().is_some()
    }

    pub fn duration(&self) -> TimeDelta {
        self.date_to - self.date_from
    }

    /// Base price plus every checked offer.
    pub fn total_price(&self) -> u32 {
        self.base_price + self.checked_offers().map(|offer| offer.price).sum::<u32>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 18, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_date_range_enforced() {
        let err = Waypoint::new("1", EventType::Taxi, Destination::default(), at(12), at(10), 20);
        assert!(matches!(err, Err(BoardError::InvalidDateRange { id }) if id == "1"));

        let same = Waypoint::new("2", EventType::Taxi, Destination::default(), at(10), at(10), 20);
        assert!(same.is_ok());
    }

    #[test]
    fn test_checked_offers_keep_order() {
        let point = Waypoint::new("1", EventType::Flight, Destination::default(), at(10), at(12), 100)
            .unwrap()
            .with_offers(vec![
                Offer::new("Add luggage", 30, true),
                Offer::new("Switch to comfort", 100, false),
                Offer::new("Choose seats", 5, true),
            ]);

        let titles: Vec<&str> = point.checked_offers().map(|o| o.title.as_str()).collect();
        assert_eq!(titles, vec!["Add luggage", "Choose seats"]);
        assert_eq!(point.total_price(), 135);
        assert_eq!(point.duration(), TimeDelta::hours(2));
    }

    #[test]
    fn test_event_type_names() {
        assert_eq!(EventType::CheckIn.to_string(), "check-in");
        assert_eq!(EventType::CheckIn.label(), "Check-in");
        assert_eq!(EventType::ALL.len(), 9);
    }
}
