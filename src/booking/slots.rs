use time::{Date, PrimitiveDateTime, Time, format_description::FormatItem, macros::format_description};

pub const OPENING_HOUR: u8 = 8;
pub const CLOSING_HOUR: u8 = 20;

const DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");
const APPOINTMENT_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

/// Every bookable hour of a day, in order.
pub fn day_hours() -> impl Iterator<Item = u8> {
    OPENING_HOUR..=CLOSING_HOUR
}

/// Extract the hour from a booked-time string.
///
/// Accepts `HH:MM`, `HH:MM:SS` and date-times such as `2024-05-01T09:00:00`
/// or `2024-05-01 09:00`.
pub fn parse_hour(raw: &str) -> Option<u8> {
    let raw = raw.trim();
    let time_part = raw
        .rsplit(|c: char| c == 'T' || c == ' ')
        .next()
        .unwrap_or(raw);
    let (hour, rest) = time_part.split_once(':')?;
    if rest.is_empty() || !rest.chars().take(2).all(|c| c.is_ascii_digit()) {
        return None;
    }
    let hour: u8 = hour.parse().ok()?;
    (hour < 24).then_some(hour)
}

/// Hours of the fixed day range not present in `booked`, ascending.
///
/// Entries that cannot be read as a time are ignored.
pub fn available_hours<S: AsRef<str>>(booked: &[S]) -> Vec<u8> {
    let taken: Vec<u8> = booked.iter().filter_map(|b| parse_hour(b.as_ref())).collect();
    day_hours().filter(|hour| !taken.contains(hour)).collect()
}

/// [`available_hours`] as offered at local time `now`: nothing on past days,
/// and on `now`'s own day only hours that have not started yet.
pub fn bookable_hours<S: AsRef<str>>(booked: &[S], date: Date, now: PrimitiveDateTime) -> Vec<u8> {
    if date < now.date() {
        return Vec::new();
    }
    let mut hours = available_hours(booked);
    if date == now.date() {
        hours.retain(|hour| *hour > now.hour());
    }
    hours
}

pub fn slot_label(hour: u8) -> String {
    format!("{:02}:00", hour)
}

pub fn format_date(date: Date) -> String {
    date.format(DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

pub fn parse_date(raw: &str) -> Option<Date> {
    Date::parse(raw.trim(), DATE_FORMAT).ok()
}

/// `appointment_date` value sent when booking `hour` on `date`.
pub fn appointment_timestamp(date: Date, hour: u8) -> Option<String> {
    if !(OPENING_HOUR..=CLOSING_HOUR).contains(&hour) {
        return None;
    }
    let time = Time::from_hms(hour, 0, 0).ok()?;
    PrimitiveDateTime::new(date, time)
        .format(APPOINTMENT_FORMAT)
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    #[test]
    fn parses_common_time_shapes() {
        assert_eq!(parse_hour("09:00"), Some(9));
        assert_eq!(parse_hour("14:30:00"), Some(14));
        assert_eq!(parse_hour("2024-05-01T08:00:00"), Some(8));
        assert_eq!(parse_hour("2024-05-01 20:00"), Some(20));
        assert_eq!(parse_hour("noon"), None);
        assert_eq!(parse_hour("25:00"), None);
        assert_eq!(parse_hour("9:"), None);
    }

    #[test]
    fn nothing_booked_leaves_whole_day() {
        let none: [&str; 0] = [];
        assert_eq!(available_hours(&none), (8..=20).collect::<Vec<u8>>());
    }

    #[test]
    fn booked_hours_are_removed() {
        assert_eq!(
            available_hours(&["09:00", "14:00"]),
            vec![8, 10, 11, 12, 13, 15, 16, 17, 18, 19, 20]
        );
    }

    #[test]
    fn every_subset_of_the_day_is_subtracted_exactly() {
        let hours: Vec<u8> = day_hours().collect();
        // 13 hours -> 8192 subsets, small enough to check them all.
        for mask in 0u32..(1 << hours.len()) {
            let booked: Vec<String> = hours
                .iter()
                .enumerate()
                .filter(|(i, _)| (mask >> *i) & 1 == 1)
                .map(|(_, h)| slot_label(*h))
                .collect();
            let expected: Vec<u8> = hours
                .iter()
                .enumerate()
                .filter(|(i, _)| (mask >> *i) & 1 == 0)
                .map(|(_, h)| *h)
                .collect();
            assert_eq!(available_hours(&booked), expected);
        }
    }

    #[test]
    fn hours_outside_the_day_do_not_matter() {
        assert_eq!(available_hours(&["06:00", "23:00"]).len(), 13);
    }

    #[test]
    fn appointment_timestamp_format() {
        let day = date!(2024 - 05 - 01);
        assert_eq!(
            appointment_timestamp(day, 9).as_deref(),
            Some("2024-05-01T09:00:00")
        );
        assert_eq!(appointment_timestamp(day, 7), None);
        assert_eq!(format_date(day), "2024-05-01");
        assert_eq!(parse_date("2024-05-01"), Some(day));
    }

    #[test]
    fn started_hours_are_not_offered_today() {
        let now = datetime!(2024-05-01 10:30);
        assert_eq!(
            bookable_hours(&["12:00"], date!(2024 - 05 - 01), now),
            vec![11, 13, 14, 15, 16, 17, 18, 19, 20]
        );
        let late = datetime!(2024-05-01 20:05);
        let none: [&str; 0] = [];
        assert!(bookable_hours(&none, date!(2024 - 05 - 01), late).is_empty());
    }

    #[test]
    fn other_days_are_not_clipped_by_the_clock() {
        let now = datetime!(2024-05-01 15:00);
        assert_eq!(
            bookable_hours(&["09:00"], date!(2024 - 05 - 02), now),
            available_hours(&["09:00"])
        );
        assert!(bookable_hours(&["09:00"], date!(2024 - 04 - 30), now).is_empty());
    }
}
