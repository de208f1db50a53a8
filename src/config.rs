use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use crate::error::{ServerError, ServerResult};

pub const DEFAULT_PORT: u16 = 4001;
pub const DEFAULT_SEND_INTERVAL: Duration = Duration::from_millis(1000);

/// Whether generated fixes repeat the reference sample or follow the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixMode {
    Static,
    Live,
}

/// Simulated-vessel parameters. The base values anchor live-mode wander;
/// static mode emits the reference fix unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct FixConfig {
    pub mode: FixMode,
    pub base_latitude: f64,
    pub base_longitude: f64,
    pub base_speed_knots: f64,
    pub base_course_deg: f64,
    /// Own-ship MMSI; when set, each block carries an AIVDO position report.
    pub mmsi: Option<u32>,
}

impl Default for FixConfig {
    fn default() -> Self {
        Self {
            mode: FixMode::Static,
            base_latitude: 52.0 + 31.525 / 60.0,
            base_longitude: 13.0 + 23.391 / 60.0,
            base_speed_knots: 8.5,
            base_course_deg: 93.7,
            mmsi: None,
        }
    }
}

impl FixConfig {
    pub fn with_mode(mut self, mode: FixMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_base_position(mut self, latitude: f64, longitude: f64) -> Self {
        self.base_latitude = latitude;
        self.base_longitude = longitude;
        self
    }

    pub fn with_mmsi(mut self, mmsi: u32) -> Self {
        self.mmsi = Some(mmsi);
        self
    }
}

/// Server configuration, immutable after process start.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedConfig {
    pub bind_addr: IpAddr,
    pub port: u16,
    pub send_interval: Duration,
    pub fix: FixConfig,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            send_interval: DEFAULT_SEND_INTERVAL,
            fix: FixConfig::default(),
        }
    }
}

impl FeedConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bind_addr(mut self, bind_addr: IpAddr) -> Self {
        self.bind_addr = bind_addr;
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_send_interval(mut self, send_interval: Duration) -> Self {
        self.send_interval = send_interval;
        self
    }

    pub fn with_fix(mut self, fix: FixConfig) -> Self {
        self.fix = fix;
        self
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }

    /// Loads configuration from the `AIS_FEED_*` environment variables.
    /// Unset variables keep their defaults; an unparseable value is a
    /// startup error.
    pub fn from_env() -> ServerResult<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> ServerResult<Self> {
        let mut config = Self::default();

        if let Some(value) = get("AIS_FEED_BIND") {
            config.bind_addr = value
                .parse()
                .map_err(|_| invalid("AIS_FEED_BIND", &value))?;
        }
        if let Some(value) = get("AIS_FEED_PORT") {
            config.port = value
                .parse()
                .map_err(|_| invalid("AIS_FEED_PORT", &value))?;
        }
        if let Some(value) = get("AIS_FEED_INTERVAL_MS") {
            let millis: u64 = value
                .parse()
                .ok()
                .filter(|&millis| millis > 0)
                .ok_or_else(|| invalid("AIS_FEED_INTERVAL_MS", &value))?;
            config.send_interval = Duration::from_millis(millis);
        }
        if let Some(value) = get("AIS_FEED_FIX_MODE") {
            config.fix.mode = match value.to_ascii_lowercase().as_str() {
                "static" => FixMode::Static,
                "live" => FixMode::Live,
                _ => return Err(invalid("AIS_FEED_FIX_MODE", &value)),
            };
        }
        if let Some(value) = get("AIS_FEED_MMSI") {
            config.fix.mmsi = Some(
                value
                    .parse()
                    .map_err(|_| invalid("AIS_FEED_MMSI", &value))?,
            );
        }

        Ok(config)
    }
}

fn invalid(var: &'static str, value: &str) -> ServerError {
    ServerError::InvalidConfig {
        var,
        value: value.to_string(),
    }
}
