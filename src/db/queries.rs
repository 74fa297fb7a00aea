use anyhow::Context;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rusqlite::{params, Connection};

use crate::models::{Booking, BookingStatus, Home, NewBooking};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

const BOOKING_COLUMNS: &str = "id, first_name, last_name, email, phone_number, preferred_home, \
     preferred_date, preferred_time, notes, status, created_at, updated_at";

// ── Bookings ──

pub fn create_booking(
    conn: &Connection,
    booking: &NewBooking,
    now: NaiveDateTime,
) -> anyhow::Result<Booking> {
    let timestamp = now.format(TIMESTAMP_FORMAT).to_string();

    conn.execute(
        "INSERT INTO tour_bookings (first_name, last_name, email, phone_number, preferred_home, preferred_date, preferred_time, notes, status, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)",
        params![
            booking.first_name,
            booking.last_name,
            booking.email,
            booking.phone_number,
            booking.preferred_home.as_str(),
            booking.preferred_date.format(DATE_FORMAT).to_string(),
            booking.preferred_time.format(TIME_FORMAT).to_string(),
            booking.notes,
            BookingStatus::Pending.as_str(),
            timestamp,
        ],
    )?;

    Ok(Booking {
        id: conn.last_insert_rowid(),
        first_name: booking.first_name.clone(),
        last_name: booking.last_name.clone(),
        email: booking.email.clone(),
        phone_number: booking.phone_number.clone(),
        preferred_home: booking.preferred_home,
        preferred_date: booking.preferred_date,
        preferred_time: booking.preferred_time,
        notes: booking.notes.clone(),
        status: BookingStatus::Pending,
        created_at: now,
        updated_at: now,
    })
}

pub fn get_booking_by_id(conn: &Connection, id: i64) -> anyhow::Result<Option<Booking>> {
    let result = conn.query_row(
        &format!("SELECT {BOOKING_COLUMNS} FROM tour_bookings WHERE id = ?1"),
        params![id],
        |row| Ok(parse_booking_row(row)),
    );

    match result {
        Ok(booking) => Ok(Some(booking?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Newest first. `status_filter` narrows to one status.
pub fn list_bookings(
    conn: &Connection,
    status_filter: Option<BookingStatus>,
    limit: i64,
) -> anyhow::Result<Vec<Booking>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {BOOKING_COLUMNS} FROM tour_bookings
         WHERE ?1 IS NULL OR status = ?1
         ORDER BY created_at DESC, id DESC LIMIT ?2"
    ))?;

    let rows = stmt.query_map(
        params![status_filter.map(|s| s.as_str()), limit],
        |row| Ok(parse_booking_row(row)),
    )?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

pub fn update_booking_status(
    conn: &Connection,
    id: i64,
    status: BookingStatus,
    now: NaiveDateTime,
) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE tour_bookings SET status = ?1, updated_at = ?2 WHERE id = ?3",
        params![status.as_str(), now.format(TIMESTAMP_FORMAT).to_string(), id],
    )?;
    Ok(count > 0)
}

/// Times already taken for a (date, home) pair, whatever their status.
pub fn booked_times(
    conn: &Connection,
    date: NaiveDate,
    home: Home,
) -> anyhow::Result<Vec<NaiveTime>> {
    let mut stmt = conn.prepare(
        "SELECT DISTINCT preferred_time FROM tour_bookings
         WHERE preferred_date = ?1 AND preferred_home = ?2",
    )?;

    let rows = stmt.query_map(
        params![date.format(DATE_FORMAT).to_string(), home.as_str()],
        |row| row.get::<_, String>(0),
    )?;

    let mut times = vec![];
    for row in rows {
        times.push(parse_time(&row?)?);
    }
    Ok(times)
}

// ── Counts ──

pub fn count_bookings(conn: &Connection) -> anyhow::Result<i64> {
    let count = conn.query_row("SELECT COUNT(*) FROM tour_bookings", [], |row| row.get(0))?;
    Ok(count)
}

pub fn count_by_status(conn: &Connection) -> anyhow::Result<Vec<(BookingStatus, i64)>> {
    let mut stmt = conn.prepare("SELECT status, COUNT(*) FROM tour_bookings GROUP BY status")?;
    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
    })?;

    let mut counts = vec![];
    for row in rows {
        let (status, count) = row?;
        let status = BookingStatus::parse(&status)
            .with_context(|| format!("unknown booking status in database: {status}"))?;
        counts.push((status, count));
    }
    Ok(counts)
}

pub fn count_by_home(conn: &Connection) -> anyhow::Result<Vec<(Home, i64)>> {
    let mut stmt =
        conn.prepare("SELECT preferred_home, COUNT(*) FROM tour_bookings GROUP BY preferred_home")?;
    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
    })?;

    let mut counts = vec![];
    for row in rows {
        let (home, count) = row?;
        let home = Home::parse(&home)
            .with_context(|| format!("unknown home in database: {home}"))?;
        counts.push((home, count));
    }
    Ok(counts)
}

fn parse_time(s: &str) -> anyhow::Result<NaiveTime> {
    NaiveTime::parse_from_str(s, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .with_context(|| format!("invalid stored time: {s}"))
}

fn parse_timestamp(s: &str) -> anyhow::Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .with_context(|| format!("invalid stored timestamp: {s}"))
}

fn parse_booking_row(row: &rusqlite::Row) -> anyhow::Result<Booking> {
    let id: i64 = row.get(0)?;
    let first_name: String = row.get(1)?;
    let last_name: Option<String> = row.get(2)?;
    let email: String = row.get(3)?;
    let phone_number: String = row.get(4)?;
    let home_str: String = row.get(5)?;
    let date_str: String = row.get(6)?;
    let time_str: String = row.get(7)?;
    let notes: Option<String> = row.get(8)?;
    let status_str: String = row.get(9)?;
    let created_at_str: String = row.get(10)?;
    let updated_at_str: String = row.get(11)?;

    let preferred_home = Home::parse(&home_str)
        .with_context(|| format!("unknown home in database: {home_str}"))?;
    let status = BookingStatus::parse(&status_str)
        .with_context(|| format!("unknown booking status in database: {status_str}"))?;
    let preferred_date = NaiveDate::parse_from_str(&date_str, DATE_FORMAT)
        .with_context(|| format!("invalid stored date: {date_str}"))?;

    Ok(Booking {
        id,
        first_name,
        last_name,
        email,
        phone_number,
        preferred_home,
        preferred_date,
        preferred_time: parse_time(&time_str)?,
        notes,
        status,
        created_at: parse_timestamp(&created_at_str)?,
        updated_at: parse_timestamp(&updated_at_str)?,
    })
}
