use chrono::{NaiveDate, NaiveTime};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::models::{Event, EventDraft, Venue, VenueDraft};
use crate::paths;

pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open_default() -> rusqlite::Result<Self> {
        let path = paths::database_path();
        paths::ensure_parent(&path);
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init_schema()?;
        store.seed_if_empty()?;
        Ok(store)
    }

    pub fn open_in_memory() -> rusqlite::Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> rusqlite::Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS venues(
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                capacity INTEGER NOT NULL,
                address TEXT NOT NULL,
                latitude REAL,
                longitude REAL
            );
            CREATE TABLE IF NOT EXISTS events(
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                date TEXT NOT NULL,
                time TEXT,
                venue_id INTEGER REFERENCES venues(id),
                description TEXT
            );",
        )?;
        Ok(())
    }

    pub fn seed_if_empty(&self) -> rusqlite::Result<()> {
        if self.count_venues()? > 0 || self.count_events()? > 0 {
            return Ok(());
        }

        let venues = [
            ("Old Trafford", 75_000, "Stretford, M16 0RA", 53.4631, -2.2913),
            ("Kilburn Building", 100, "Oxford Rd, M13 9PL", 53.4675, -2.2340),
            ("Crawford House", 100, "Booth St E, M13 9SS", 53.4685, -2.2348),
        ];
        let mut venue_ids = Vec::with_capacity(venues.len());
        for (name, capacity, address, lat, lon) in venues {
            let venue = self.insert_venue(
                &VenueDraft {
                    name: name.to_string(),
                    capacity,
                    address: address.to_string(),
                },
                Some((lat, lon)),
            )?;
            venue_ids.push(venue.id);
        }

        let events: [(&str, &str, Option<&str>, usize); 7] = [
            ("Concert1", "2025-01-01", Some("08:00"), 0),
            ("Event Alpha", "2025-07-11", Some("12:30"), 2),
            ("Beta", "2025-07-11", Some("10:00"), 1),
            ("Apple", "2025-07-12", None, 1),
            ("Former", "2025-01-11", Some("11:00"), 2),
            ("Previous", "2025-01-11", Some("18:30"), 1),
            ("Past", "2025-01-10", Some("17:00"), 1),
        ];
        for (name, date, time, venue_idx) in events {
            self.insert_event(&EventDraft {
                name: name.to_string(),
                date: parse_seed_date(date)?,
                time: time.map(parse_seed_time).transpose()?,
                venue_id: Some(venue_ids[venue_idx]),
                description: None,
            })?;
        }

        Ok(())
    }

    // Events

    pub fn count_events(&self) -> rusqlite::Result<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM events", [], |row| row.get(0))
    }

    /// All events ordered by date, then time. Untimed events come first
    /// within a date (SQL NULLs sort low); the upcoming engine applies its
    /// own ordering rule on top.
    pub fn find_all_events(&self) -> rusqlite::Result<Vec<Event>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, date, time, venue_id, description
             FROM events ORDER BY date ASC, time ASC",
        )?;
        let rows = stmt.query_map([], event_from_row)?;
        rows.collect()
    }

    pub fn find_event(&self, id: i64) -> rusqlite::Result<Option<Event>> {
        self.conn
            .query_row(
                "SELECT id, name, date, time, venue_id, description
                 FROM events WHERE id = ?1",
                params![id],
                event_from_row,
            )
            .optional()
    }

    pub fn insert_event(&self, draft: &EventDraft) -> rusqlite::Result<Event> {
        self.conn.execute(
            "INSERT INTO events (name, date, time, venue_id, description)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                draft.name,
                draft.date,
                draft.time,
                draft.venue_id,
                draft.description
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        Ok(Event {
            id,
            name: draft.name.clone(),
            date: draft.date,
            time: draft.time,
            venue_id: draft.venue_id,
            description: draft.description.clone(),
        })
    }

    pub fn update_event(&self, event: &Event) -> rusqlite::Result<usize> {
        self.conn.execute(
            "UPDATE events SET name = ?2, date = ?3, time = ?4, venue_id = ?5, description = ?6
             WHERE id = ?1",
            params![
                event.id,
                event.name,
                event.date,
                event.time,
                event.venue_id,
                event.description
            ],
        )
    }

    pub fn exists_event(&self, id: i64) -> rusqlite::Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM events WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    pub fn exists_event_for_venue(&self, venue_id: i64) -> rusqlite::Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM events WHERE venue_id = ?1",
            params![venue_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    pub fn delete_event(&self, id: i64) -> rusqlite::Result<usize> {
        self.conn
            .execute("DELETE FROM events WHERE id = ?1", params![id])
    }

    pub fn delete_all_events(&self) -> rusqlite::Result<usize> {
        self.conn.execute("DELETE FROM events", [])
    }

    // Venues

    pub fn count_venues(&self) -> rusqlite::Result<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM venues", [], |row| row.get(0))
    }

    pub fn find_all_venues(&self) -> rusqlite::Result<Vec<Venue>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, capacity, address, latitude, longitude
             FROM venues ORDER BY id ASC",
        )?;
        let rows = stmt.query_map([], venue_from_row)?;
        rows.collect()
    }

    pub fn find_venue(&self, id: i64) -> rusqlite::Result<Option<Venue>> {
        self.conn
            .query_row(
                "SELECT id, name, capacity, address, latitude, longitude
                 FROM venues WHERE id = ?1",
                params![id],
                venue_from_row,
            )
            .optional()
    }

    pub fn find_venues_by_name(&self, query: &str) -> rusqlite::Result<Vec<Venue>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, capacity, address, latitude, longitude
             FROM venues WHERE lower(name) LIKE '%' || lower(?1) || '%'
             ORDER BY id ASC",
        )?;
        let rows = stmt.query_map(params![query], venue_from_row)?;
        rows.collect()
    }

    pub fn insert_venue(
        &self,
        draft: &VenueDraft,
        coordinates: Option<(f64, f64)>,
    ) -> rusqlite::Result<Venue> {
        let (latitude, longitude) = match coordinates {
            Some((lat, lon)) => (Some(lat), Some(lon)),
            None => (None, None),
        };
        self.conn.execute(
            "INSERT INTO venues (name, capacity, address, latitude, longitude)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![draft.name, draft.capacity, draft.address, latitude, longitude],
        )?;
        let id = self.conn.last_insert_rowid();
        Ok(Venue {
            id,
            name: draft.name.clone(),
            capacity: draft.capacity,
            address: draft.address.clone(),
            latitude,
            longitude,
        })
    }

    pub fn update_venue(&self, venue: &Venue) -> rusqlite::Result<usize> {
        self.conn.execute(
            "UPDATE venues SET name = ?2, capacity = ?3, address = ?4,
                 latitude = ?5, longitude = ?6
             WHERE id = ?1",
            params![
                venue.id,
                venue.name,
                venue.capacity,
                venue.address,
                venue.latitude,
                venue.longitude
            ],
        )
    }

    pub fn exists_venue(&self, id: i64) -> rusqlite::Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM venues WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    pub fn delete_venue(&self, id: i64) -> rusqlite::Result<usize> {
        self.conn
            .execute("DELETE FROM venues WHERE id = ?1", params![id])
    }
}

fn event_from_row(row: &Row<'_>) -> rusqlite::Result<Event> {
    Ok(Event {
        id: row.get(0)?,
        name: row.get(1)?,
        date: row.get(2)?,
        time: row.get(3)?,
        venue_id: row.get(4)?,
        description: row.get(5)?,
    })
}

fn venue_from_row(row: &Row<'_>) -> rusqlite::Result<Venue> {
    Ok(Venue {
        id: row.get(0)?,
        name: row.get(1)?,
        capacity: row.get(2)?,
        address: row.get(3)?,
        latitude: row.get(4)?,
        longitude: row.get(5)?,
    })
}

fn parse_seed_date(value: &str) -> rusqlite::Result<NaiveDate> {
    value.parse().map_err(|err| {
        rusqlite::Error::FromSqlConversionFailure(
            value.len(),
            rusqlite::types::Type::Text,
            Box::new(err),
        )
    })
}

fn parse_seed_time(value: &str) -> rusqlite::Result<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M").map_err(|err| {
        rusqlite::Error::FromSqlConversionFailure(
            value.len(),
            rusqlite::types::Type::Text,
            Box::new(err),
        )
    })
}
