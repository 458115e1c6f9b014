use serde::Serialize;

pub const ITINERARY_DAYS: u8 = 5;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DaySection {
    pub day: u8,
    pub body: String,
    pub fallback: bool,
}

/// Splits an itinerary narrative on its `**Day N` markers.
///
/// The narrative is free text, so this is a best-effort scan: a day whose marker is
/// missing gets a one-line placeholder for that day only.
pub fn split_itinerary(narrative: &str, location: &str) -> Vec<DaySection> {
    (1..=ITINERARY_DAYS)
        .map(|day| match day_body(narrative, day) {
            Some(body) => DaySection { day, body: body.to_string(), fallback: false },
            None => DaySection { day, body: placeholder_line(location), fallback: true },
        })
        .collect()
}

fn day_body(narrative: &str, day: u8) -> Option<&str> {
    let marker = format!("**Day {day}");
    let next_marker = format!("**Day {}", day + 1);

    let start = narrative.find(&marker)? + marker.len();
    let rest = &narrative[start..];
    let end = [rest.find(&marker), rest.find(&next_marker)]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(rest.len());

    Some(&rest[..end])
}

fn placeholder_line(location: &str) -> String {
    format!("- Explore {location} (Affinity: 80).")
}
