use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Home {
    Cardiff,
    Barry,
    Waverley,
    CollegeFields,
}

impl Home {
    pub fn as_str(&self) -> &'static str {
        match self {
            Home::Cardiff => "cardiff",
            Home::Barry => "barry",
            Home::Waverley => "waverley",
            Home::CollegeFields => "college-fields",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "cardiff" => Some(Home::Cardiff),
            "barry" => Some(Home::Barry),
            "waverley" => Some(Home::Waverley),
            "college-fields" => Some(Home::CollegeFields),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Facility {
    pub key: Home,
    /// Short display label, used for stats keys, listings and emails.
    pub label: String,
    /// Full location name returned by the nearest-home lookup.
    pub name: String,
    pub address: String,
    pub phone: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Facilities and the daily tour schedule. Built once at start-up and shared
/// read-only through the application state.
#[derive(Debug, Clone)]
pub struct HomeCatalog {
    facilities: Vec<Facility>,
    slots: Vec<NaiveTime>,
    average_speed_kmh: f64,
}

impl HomeCatalog {
    pub fn new(facilities: Vec<Facility>, slots: Vec<NaiveTime>, average_speed_kmh: f64) -> Self {
        Self {
            facilities,
            slots,
            average_speed_kmh,
        }
    }

    pub fn bellavista() -> Self {
        let facility = |key, label: &str, name: &str, address: &str, phone: &str, lat, lon| Facility {
            key,
            label: label.to_string(),
            name: name.to_string(),
            address: address.to_string(),
            phone: phone.to_string(),
            latitude: lat,
            longitude: lon,
        };

        let facilities = vec![
            facility(
                Home::Cardiff,
                "Cardiff",
                "Bellavista Cardiff",
                "Cardiff, Wales, UK",
                "029 2000 0000",
                51.4816,
                -3.1791,
            ),
            facility(
                Home::Barry,
                "Barry",
                "Bellavista Barry",
                "Barry, Vale of Glamorgan, Wales, UK",
                "01446 700 000",
                51.3998,
                -3.2826,
            ),
            facility(
                Home::Waverley,
                "Waverley",
                "Waverley Care Centre",
                "Waverley, Wales, UK",
                "029 2100 0000",
                51.4850,
                -3.1750,
            ),
            facility(
                Home::CollegeFields,
                "College Fields",
                "College Fields",
                "College Fields, Wales, UK",
                "029 2200 0000",
                51.4900,
                -3.1800,
            ),
        ];

        let slots = [(9, 0), (10, 0), (11, 0), (14, 0), (15, 0), (16, 0)]
            .into_iter()
            .filter_map(|(h, m)| NaiveTime::from_hms_opt(h, m, 0))
            .collect();

        Self::new(facilities, slots, 40.0)
    }

    pub fn facilities(&self) -> &[Facility] {
        &self.facilities
    }

    pub fn facility(&self, home: Home) -> Option<&Facility> {
        self.facilities.iter().find(|f| f.key == home)
    }

    /// Label for a home, falling back to its key if the catalog lacks it.
    pub fn label(&self, home: Home) -> &str {
        self.facility(home)
            .map(|f| f.label.as_str())
            .unwrap_or_else(|| home.as_str())
    }

    pub fn slots(&self) -> &[NaiveTime] {
        &self.slots
    }

    pub fn average_speed_kmh(&self) -> f64 {
        self.average_speed_kmh
    }
}
