use crate::{
    protocol::message::CameraCapFlags,
    Error, Result,
};
use std::time::{Duration, Instant};

/// Static configuration of a [Responder][crate::Responder].
///
/// This is built once at start-up, and never changes afterwards.
#[derive(Debug, Clone)]
pub struct ResponderConfig {
    /// Component ID of the camera; also the video source ID.
    pub camera_id: u8,
    /// Name of the camera and its video stream.
    pub name: String,
    /// Host of the GCS.
    pub host: String,
    /// UDP port of the GCS.
    pub port: u16,
    /// System ID the camera belongs to.
    pub system_id: u8,
    pub capabilities: CameraCapFlags,
    /// URL of the video stream, if it is being served.
    pub stream_url: Option<String>,
    boot: Instant,
}

impl ResponderConfig {
    /// Makes a new configuration, recording the current time as the boot time.
    ///
    /// ## Errors
    ///
    /// * [`Error::Config`] when `name` or `host` are empty, or when
    ///   `camera_id` or `system_id` are 0 (which MAVLink reserves for
    ///   broadcast).
    pub fn new(
        camera_id: u8,
        name: impl Into<String>,
        host: impl Into<String>,
        port: u16,
        system_id: u8,
        stream_url: Option<String>,
    ) -> Result<Self> {
        let name = name.into();
        let host = host.into();
        if name.is_empty() {
            return Err(Error::Config("camera name must not be empty".to_string()));
        }
        if host.is_empty() {
            return Err(Error::Config("system host must not be empty".to_string()));
        }
        if camera_id == 0 {
            return Err(Error::Config("camera ID must not be 0".to_string()));
        }
        if system_id == 0 {
            return Err(Error::Config("system ID must not be 0".to_string()));
        }

        Ok(Self {
            camera_id,
            name,
            host,
            port,
            system_id,
            capabilities: CameraCapFlags::HAS_VIDEO_STREAM,
            stream_url,
            boot: Instant::now(),
        })
    }

    /// Whole seconds since this configuration was made.
    ///
    /// Saturates rather than wrapping, which takes about 136 years.
    pub fn boot_seconds(&self) -> u32 {
        u32::try_from(self.boot.elapsed().as_secs()).unwrap_or(u32::MAX)
    }

    /// The stream URL, or an empty string if there is no stream.
    pub fn stream_url(&self) -> &str {
        self.stream_url.as_deref().unwrap_or_default()
    }

    /// `host:port` of the GCS.
    pub fn peer(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Protocol timing.
///
/// The defaults match what GCS software expects from a camera; tests use
/// shorter values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponderTiming {
    /// How long to wait for a response to each handshake heartbeat.
    pub handshake_timeout: Duration,
    /// Number of handshake heartbeats to send before giving up.
    pub handshake_attempts: u32,
    /// Delay after each handshake attempt.
    pub handshake_delay: Duration,
    /// How long to wait for a message in each loop iteration.
    pub recv_timeout: Duration,
    /// Delay after each loop iteration.
    pub quantum: Duration,
    /// Number of loop iterations between heartbeats.
    pub heartbeat_interval: u64,
}

impl Default for ResponderTiming {
    fn default() -> Self {
        Self {
            handshake_timeout: Duration::from_millis(500),
            handshake_attempts: 10,
            handshake_delay: Duration::from_millis(500),
            recv_timeout: Duration::from_millis(100),
            quantum: Duration::from_millis(100),
            heartbeat_interval: 10,
        }
    }
}
