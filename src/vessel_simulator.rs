use chrono::{DateTime, Timelike, Utc};
use noise::{Fbm, NoiseFn, Perlin};

use crate::aivdo;
use crate::config::{FixConfig, FixMode};
use crate::nmea::{format_latitude, format_longitude, Sentence, SentenceBlock};

// Reference fix emitted verbatim in static mode
const REFERENCE_TIME: &str = "194546.127";
const REFERENCE_DATE: &str = "200220";
const REFERENCE_SPEED_KNOTS: f64 = 2372.1;
const REFERENCE_COURSE_DEG: f64 = 93.7;

const WANDER_SEED: u32 = 42;

// Simulated GPS receiver producing one block of navigation sentences per fix
pub struct VesselSimulator {
    fix: FixConfig,
    wander: Fbm<Perlin>,
}

// One computed position/time observation, before sentence formatting
struct FixSnapshot {
    time: String,
    date: String,
    utc_second: u32,
    latitude: f64,
    longitude: f64,
    speed_knots: f64,
    course_deg: f64,
}

impl FixSnapshot {
    fn reference() -> Self {
        Self {
            time: REFERENCE_TIME.to_string(),
            date: REFERENCE_DATE.to_string(),
            utc_second: 46,
            latitude: 52.0 + 31.525 / 60.0,
            longitude: 13.0 + 23.391 / 60.0,
            speed_knots: REFERENCE_SPEED_KNOTS,
            course_deg: REFERENCE_COURSE_DEG,
        }
    }
}

impl VesselSimulator {
    pub fn new(fix: FixConfig) -> Self {
        Self {
            fix,
            wander: Fbm::<Perlin>::new(WANDER_SEED),
        }
    }

    /// Builds the sentence block for one simulated instant: a GGA fix, a GSA
    /// satellite-geometry sentence, an RMC recommended-minimum sentence, and
    /// optionally an own-ship AIVDO position report. Every sentence is
    /// checksum-valid by construction; the same instant always produces the
    /// same block.
    pub fn block_at(&self, now: DateTime<Utc>) -> SentenceBlock {
        let fix = match self.fix.mode {
            FixMode::Static => FixSnapshot::reference(),
            FixMode::Live => self.live_fix(now),
        };

        let mut sentences = vec![gga(&fix), gsa(), rmc(&fix)];
        if let Some(mmsi) = self.fix.mmsi {
            sentences.push(aivdo::position_report(
                mmsi,
                fix.latitude,
                fix.longitude,
                fix.speed_knots,
                fix.course_deg,
                fix.utc_second,
            ));
        }

        SentenceBlock::new(sentences)
    }

    // Smooth wander around the configured base fix, keyed by time alone so
    // generation stays a pure function of the instant.
    fn live_fix(&self, now: DateTime<Utc>) -> FixSnapshot {
        let t = now.timestamp_millis() as f64 / 1000.0;

        let latitude = self.fix.base_latitude + self.wander.get([t * 0.002, 31.7, 0.0]) * 0.02;
        let longitude = self.fix.base_longitude + self.wander.get([t * 0.002, 64.1, 0.0]) * 0.02;
        let speed_knots =
            (self.fix.base_speed_knots + self.wander.get([t * 0.01, 7.3, 0.0]) * 2.0).max(0.0);
        let course_deg = (self.fix.base_course_deg
            + self.wander.get([t * 0.01, 12.9, 0.0]) * 20.0)
            .rem_euclid(360.0);

        FixSnapshot {
            time: now.format("%H%M%S%.3f").to_string(),
            date: now.format("%d%m%y").to_string(),
            utc_second: now.second(),
            latitude,
            longitude,
            speed_knots,
            course_deg,
        }
    }
}

fn gga(fix: &FixSnapshot) -> Sentence {
    let (latitude, ns) = format_latitude(fix.latitude);
    let (longitude, ew) = format_longitude(fix.longitude);
    Sentence::parametric(
        "GPGGA",
        vec![
            fix.time.clone(),
            latitude,
            ns.to_string(),
            longitude,
            ew.to_string(),
            "1".to_string(),  // fix quality: GPS
            "12".to_string(), // satellites in use
            "1.0".to_string(),
            "0.0".to_string(), // antenna altitude
            "M".to_string(),
            "0.0".to_string(), // geoidal separation
            "M".to_string(),
            String::new(), // no differential data
            String::new(),
        ],
    )
}

fn gsa() -> Sentence {
    let mut fields = vec!["A".to_string(), "3".to_string()];
    fields.extend((1..=12).map(|id| format!("{:02}", id)));
    fields.extend(["1.0", "1.0", "1.0"].map(str::to_string)); // PDOP, HDOP, VDOP
    Sentence::parametric("GPGSA", fields)
}

fn rmc(fix: &FixSnapshot) -> Sentence {
    let (latitude, ns) = format_latitude(fix.latitude);
    let (longitude, ew) = format_longitude(fix.longitude);
    Sentence::parametric(
        "GPRMC",
        vec![
            fix.time.clone(),
            "A".to_string(), // data valid
            latitude,
            ns.to_string(),
            longitude,
            ew.to_string(),
            format!("{:.1}", fix.speed_knots),
            format!("{:05.1}", fix.course_deg),
            fix.date.clone(),
            "000.0".to_string(), // magnetic variation
            "W".to_string(),
        ],
    )
}
