use chrono::{NaiveDate, NaiveTime};
use rusqlite::Connection;

use crate::db::queries;
use crate::models::{Home, HomeCatalog};

/// Schedule entries not yet booked, in schedule order. A slot counts as
/// booked as soon as any booking holds it, whatever that booking's status.
pub fn remaining_slots(schedule: &[NaiveTime], booked: &[NaiveTime]) -> Vec<NaiveTime> {
    schedule
        .iter()
        .filter(|slot| !booked.contains(slot))
        .copied()
        .collect()
}

pub fn available_slots(
    conn: &Connection,
    catalog: &HomeCatalog,
    date: NaiveDate,
    home: Home,
) -> anyhow::Result<Vec<NaiveTime>> {
    let booked = queries::booked_times(conn, date, home)?;
    Ok(remaining_slots(catalog.slots(), &booked))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::models::NewBooking;

    fn t(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M").unwrap()
    }

    fn labels(slots: &[NaiveTime]) -> Vec<String> {
        slots.iter().map(|s| s.format("%H:%M").to_string()).collect()
    }

    fn book(conn: &Connection, home: Home, date: NaiveDate, time: &str) {
        let booking = NewBooking {
            first_name: "Test".to_string(),
            last_name: None,
            email: "test@example.com".to_string(),
            phone_number: "+1234567890".to_string(),
            preferred_home: home,
            preferred_date: date,
            preferred_time: t(time),
            notes: None,
        };
        queries::create_booking(conn, &booking, chrono::Utc::now().naive_utc()).unwrap();
    }

    #[test]
    fn test_nothing_booked_returns_full_schedule() {
        let catalog = HomeCatalog::bellavista();
        assert_eq!(remaining_slots(catalog.slots(), &[]), catalog.slots());
    }

    #[test]
    fn test_booked_slot_removed_order_kept() {
        let catalog = HomeCatalog::bellavista();
        let remaining = remaining_slots(catalog.slots(), &[t("10:00"), t("15:00")]);
        assert_eq!(labels(&remaining), ["09:00", "11:00", "14:00", "16:00"]);
    }

    #[test]
    fn test_off_schedule_booking_ignored() {
        let catalog = HomeCatalog::bellavista();
        let remaining = remaining_slots(catalog.slots(), &[t("12:30")]);
        assert_eq!(remaining.len(), 6);
    }

    #[test]
    fn test_available_slots_from_store() {
        let conn = db::init_db(":memory:").unwrap();
        let catalog = HomeCatalog::bellavista();
        let date = NaiveDate::from_ymd_opt(2030, 3, 4).unwrap();

        book(&conn, Home::Cardiff, date, "10:00");
        book(&conn, Home::Cardiff, date, "10:00");
        book(&conn, Home::Barry, date, "09:00");
        book(&conn, Home::Cardiff, date.succ_opt().unwrap(), "11:00");

        let slots = available_slots(&conn, &catalog, date, Home::Cardiff).unwrap();
        assert_eq!(labels(&slots), ["09:00", "11:00", "14:00", "15:00", "16:00"]);

        let slots = available_slots(&conn, &catalog, date, Home::Waverley).unwrap();
        assert_eq!(slots.len(), 6);
    }
}
