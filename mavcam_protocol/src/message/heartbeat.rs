//! # Heartbeat; 1 message
use super::message_info;
use binrw::binrw;
use num_traits::FromPrimitive;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// `HEARTBEAT` (#0): announces the presence of a component on the link.
///
/// Every component sends this about once per second. The type and autopilot
/// fields tell the receiver what sort of component it's looking at.
///
/// ## Packet format
///
/// * `u32`: custom mode (autopilot-specific)
/// * `u8`: [`MavType`]
/// * `u8`: [`MavAutopilot`]
/// * `u8`: base mode flags
/// * `u8`: system status ([`MavState`])
/// * `u8`: MAVLink version, always 3
#[binrw]
#[brw(little)]
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct Heartbeat {
    pub custom_mode: u32,
    pub typ: u8,
    pub autopilot: u8,
    pub base_mode: u8,
    pub system_status: u8,
    pub mavlink_version: u8,
}

message_info!(Heartbeat, 0, 50, 9);

impl Heartbeat {
    /// Version of the MAVLink protocol that goes in every heartbeat.
    pub const MAVLINK_VERSION: u8 = 3;

    /// Makes a heartbeat for a camera component in standby.
    pub const fn camera() -> Self {
        Self {
            custom_mode: 0,
            typ: MavType::Camera as u8,
            autopilot: MavAutopilot::Generic as u8,
            base_mode: 0,
            system_status: MavState::Standby as u8,
            mavlink_version: Self::MAVLINK_VERSION,
        }
    }

    /// Gets the component type, if it is known.
    pub fn mav_type(&self) -> Option<MavType> {
        MavType::from_u8(self.typ)
    }

    /// Gets the autopilot type, if it is known.
    pub fn mav_autopilot(&self) -> Option<MavAutopilot> {
        MavAutopilot::from_u8(self.autopilot)
    }

    /// Gets the system status, if it is known.
    pub fn state(&self) -> Option<MavState> {
        MavState::from_u8(self.system_status)
    }
}

/// Component type (`MAV_TYPE`).
#[derive(Debug, FromPrimitive, ToPrimitive, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum MavType {
    Generic = 0,
    FixedWing = 1,
    Quadrotor = 2,
    Coaxial = 3,
    Helicopter = 4,
    AntennaTracker = 5,
    /// Ground control station.
    Gcs = 6,
    Airship = 7,
    FreeBalloon = 8,
    Rocket = 9,
    GroundRover = 10,
    SurfaceBoat = 11,
    Submarine = 12,
    Hexarotor = 13,
    Octorotor = 14,
    Tricopter = 15,
    FlappingWing = 16,
    Kite = 17,
    OnboardController = 18,
    Gimbal = 26,
    Adsb = 27,
    Camera = 30,
    ChargingStation = 31,
    Flarm = 32,
    Servo = 33,
    Odid = 34,
    Battery = 36,
    Parachute = 37,
    Log = 38,
    Osd = 39,
    Imu = 40,
    Gps = 41,
    Winch = 42,
}

/// Autopilot type (`MAV_AUTOPILOT`).
///
/// Components which aren't flight controllers send [`Generic`][Self::Generic],
/// except ground stations, which send [`Invalid`][Self::Invalid].
#[derive(Debug, FromPrimitive, ToPrimitive, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum MavAutopilot {
    Generic = 0,
    Reserved = 1,
    Slugs = 2,
    Ardupilotmega = 3,
    Openpilot = 4,
    Invalid = 8,
    Px4 = 12,
}

/// System status (`MAV_STATE`).
#[derive(Debug, FromPrimitive, ToPrimitive, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum MavState {
    Uninit = 0,
    Boot = 1,
    Calibrating = 2,
    Standby = 3,
    Active = 4,
    Critical = 5,
    Emergency = 6,
    Poweroff = 7,
    FlightTermination = 8,
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{message::MessageInfo, Message, Result};
    use binrw::{BinRead, BinWrite};
    use std::io::Cursor;

    #[test]
    fn gcs_heartbeat() -> Result<()> {
        let cmd = hex::decode("000000000608c00403")?;
        let msg = Message::read_args(&mut Cursor::new(&cmd), (Heartbeat::ID,))?;
        let Message::Heartbeat(hb) = msg else {
            panic!("wrong message type");
        };
        assert_eq!(Some(MavType::Gcs), hb.mav_type());
        assert_eq!(Some(MavAutopilot::Invalid), hb.mav_autopilot());
        assert_eq!(Some(MavState::Active), hb.state());
        assert_eq!(0xc0, hb.base_mode);

        let mut out = Cursor::new(Vec::with_capacity(cmd.len()));
        Message::from(hb).write(&mut out)?;
        assert_eq!(cmd, out.into_inner());
        Ok(())
    }

    #[test]
    fn unknown_type() -> Result<()> {
        let cmd = hex::decode("00000000fefe000303")?;
        let Message::Heartbeat(hb) = Message::read_args(&mut Cursor::new(&cmd), (0,))? else {
            panic!("wrong message type");
        };
        assert_eq!(None, hb.mav_type());
        assert_eq!(None, hb.mav_autopilot());
        assert_eq!(Some(MavState::Standby), hb.state());
        Ok(())
    }
}
