#![allow(rustdoc::private_intra_doc_links)]

use crate::{message::Message, Error, Result};
use binrw::{binrw, BinRead, BinWrite};
use modular_bitfield::{bitfield, prelude::B7};
use std::io::Cursor;

/// Length of the optional frame signature, in bytes.
const SIGNATURE_LENGTH: usize = 13;

/// Incompatibility flags.
///
/// A receiver must drop frames with flags it does not understand. The only
/// flag defined so far is [`signed`][Self::signed].
#[bitfield(bits = 8)]
#[repr(u8)]
#[derive(BinRead, BinWrite, Debug, Default, PartialEq, Eq, Clone, Copy)]
#[br(map = From::<u8>::from)]
#[bw(map = |&x| Into::<u8>::into(x))]
pub struct IncompatFlags {
    /// The frame carries a 13 byte signature after the checksum.
    pub signed: bool,
    #[skip]
    __: B7,
}

/// [MavFrame] is the basic unit of communication over a MAVLink v2 link.
///
/// Every [Message] is carried in exactly one frame, and one UDP datagram
/// normally carries exactly one frame.
///
/// ## Frame format
///
/// * `u8`: start marker (`0xfd`)
/// * `u8`: [payload] length
/// * `u8`: [incompatibility flags]
/// * `u8`: [compatibility flags]
/// * `u8`: [sequence number]
/// * `u8`: [sender system ID]
/// * `u8`: [sender component ID]
/// * `u24`: [message ID]
/// * [payload]
/// * `u16`: [checksum]
/// * 13 bytes: [signature] (only if [IncompatFlags::signed])
///
/// Trailing null bytes of the payload are stripped by the sender, and must be
/// restored by the receiver before the payload can be parsed.
///
/// [payload]: Self::payload
/// [incompatibility flags]: Self::incompat_flags
/// [compatibility flags]: Self::compat_flags
/// [sequence number]: Self::sequence
/// [sender system ID]: Self::system_id
/// [sender component ID]: Self::component_id
/// [message ID]: Self::message_id
/// [checksum]: Self::checksum
/// [signature]: Self::signature
#[binrw]
#[derive(Debug, Clone, PartialEq, Eq)]
#[brw(little, magic = 0xfdu8)]
pub struct MavFrame {
    #[br(temp)]
    #[bw(try_calc(u8::try_from(payload.len())))]
    length: u8,

    pub incompat_flags: IncompatFlags,

    pub compat_flags: u8,

    /// Sender's frame counter, used to detect lost frames. Wraps at 255.
    pub sequence: u8,

    pub system_id: u8,

    pub component_id: u8,

    /// 24-bit message identifier, which selects the [Message] variant.
    #[br(map = |b: [u8; 3]| u32::from_le_bytes([b[0], b[1], b[2], 0]))]
    #[bw(map = |v: &u32| { let b = v.to_le_bytes(); [b[0], b[1], b[2]] })]
    pub message_id: u32,

    #[br(count = length)]
    payload: Vec<u8>,

    /// X.25 checksum over everything after the start marker, seeded with the
    /// message's [CRC_EXTRA][crate::MessageInfo::CRC_EXTRA].
    pub checksum: u16,

    /// Signature, which is carried but never verified.
    #[br(if(incompat_flags.signed()))]
    pub signature: Option<[u8; SIGNATURE_LENGTH]>,
}

impl MavFrame {
    /// Length of the headers, excluding the start marker.
    const HEADERS_LENGTH: usize = 9;

    /// Maximum frame size, including headers and signature.
    pub const MAX_FRAME_LENGTH: usize = 1 + Self::HEADERS_LENGTH + 255 + 2 + SIGNATURE_LENGTH;

    const MAX_MESSAGE_ID: u32 = 0xff_ffff;

    /// Makes an unsigned frame carrying `message`.
    ///
    /// ## Errors
    ///
    /// * [`Error::UnknownMessage`] when `message` is [`Message::Unknown`], as
    ///   there is no checksum seed for it.
    pub fn new(sequence: u8, system_id: u8, component_id: u8, message: &Message) -> Result<Self> {
        let message_id = message.id();
        let Some((crc_extra, _)) = Message::lookup(message_id) else {
            error!("cannot frame unknown message {message_id}");
            return Err(Error::UnknownMessage(message_id));
        };
        if message_id > Self::MAX_MESSAGE_ID {
            return Err(Error::InvalidLength);
        }

        let mut out = Cursor::new(Vec::new());
        message.write(&mut out)?;
        let mut payload = out.into_inner();

        // Strip trailing nulls, but always keep the first byte.
        let used = payload.iter().rposition(|b| *b != 0).map_or(1, |p| p + 1);
        payload.truncate(used);
        if payload.len() > usize::from(u8::MAX) {
            return Err(Error::InvalidLength);
        }

        let mut frame = Self {
            incompat_flags: IncompatFlags::new(),
            compat_flags: 0,
            sequence,
            system_id,
            component_id,
            message_id,
            payload,
            checksum: 0,
            signature: None,
        };
        frame.checksum = frame.compute_checksum(crc_extra);
        Ok(frame)
    }

    /// The payload as it appeared on the wire, with trailing nulls stripped.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Decodes the [Message] carried in this frame.
    ///
    /// Unimplemented message IDs are returned as [`Message::Unknown`], without
    /// checking the checksum.
    ///
    /// ## Errors
    ///
    /// * [`Error::ChecksumMismatch`] when the checksum is wrong
    /// * [`Error::BinRwError`] when the payload could not be parsed
    pub fn message(&self) -> Result<Message> {
        let Some((crc_extra, length)) = Message::lookup(self.message_id) else {
            trace!("unimplemented message {}", self.message_id);
            return Ok(Message::Unknown {
                id: self.message_id,
                payload: self.payload.clone(),
            });
        };

        let expected = self.compute_checksum(crc_extra);
        if expected != self.checksum {
            return Err(Error::ChecksumMismatch {
                message_id: self.message_id,
                expected,
                actual: self.checksum,
            });
        }

        // Restore stripped nulls. Longer payloads come from a newer dialect
        // with extension fields we don't know about yet.
        let mut body = self.payload.clone();
        body.resize(length, 0);

        Ok(Message::read_args(&mut Cursor::new(body), (self.message_id,))?)
    }

    fn compute_checksum(&self, crc_extra: u8) -> u16 {
        let id = self.message_id.to_le_bytes();
        // Payload is at most 255 bytes, enforced on construction and parse.
        let headers: [u8; Self::HEADERS_LENGTH] = [
            self.payload.len() as u8,
            self.incompat_flags.into(),
            self.compat_flags,
            self.sequence,
            self.system_id,
            self.component_id,
            id[0],
            id[1],
            id[2],
        ];

        let crc = headers
            .iter()
            .chain(self.payload.iter())
            .fold(0xffff, |crc, b| crc_accumulate(crc, *b));
        crc_accumulate(crc, crc_extra)
    }
}

/// Accumulates one byte into a CRC-16/MCRF4XX ("X.25") checksum.
pub const fn crc_accumulate(crc: u16, b: u8) -> u16 {
    let mut tmp = b ^ (crc as u8);
    tmp ^= tmp << 4;
    let tmp = tmp as u16;
    (crc >> 8) ^ (tmp << 8) ^ (tmp << 3) ^ (tmp >> 4)
}

/// Calculates the checksum of `bytes`, followed by `crc_extra`.
pub fn checksum(bytes: &[u8], crc_extra: u8) -> u16 {
    let crc = bytes.iter().fold(0xffff, |crc, b| crc_accumulate(crc, *b));
    crc_accumulate(crc, crc_extra)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::message::{CommandAck, Heartbeat, MavCmd, MavResult, MavState, MavType};
    use std::io::Cursor;

    #[test]
    fn crc_check_value() {
        let crc = b"123456789"
            .iter()
            .fold(0xffff, |crc, b| crc_accumulate(crc, *b));
        assert_eq!(0x6f91, crc);
    }

    #[test]
    fn flags() -> Result<()> {
        let mut c = Cursor::new([0; 1]);
        IncompatFlags::new().with_signed(true).write(&mut c)?;
        assert_eq!([1], c.into_inner());
        Ok(())
    }

    #[test]
    fn heartbeat() -> Result<()> {
        let cmd = hex::decode("fd090000000164000000000000001e00000303445e")?;
        let frame = MavFrame::read(&mut Cursor::new(&cmd))?;
        assert_eq!(0, frame.sequence);
        assert_eq!(1, frame.system_id);
        assert_eq!(100, frame.component_id);
        assert_eq!(0, frame.message_id);
        assert_eq!(None, frame.signature);

        let Message::Heartbeat(hb) = frame.message()? else {
            panic!("wrong message type");
        };
        assert_eq!(Some(MavType::Camera), hb.mav_type());
        assert_eq!(Some(MavState::Standby), hb.state());

        let expected = MavFrame::new(0, 1, 100, &Heartbeat::camera().into())?;
        assert_eq!(expected, frame);

        let mut out = Cursor::new(Vec::with_capacity(cmd.len()));
        frame.write(&mut out)?;
        assert_eq!(cmd, out.into_inner());
        Ok(())
    }

    #[test]
    fn truncated_payload() -> Result<()> {
        // COMMAND_LONG with the trailing confirmation byte stripped.
        let cmd = hex::decode(concat!(
            "fd20000003ffbe4c0000",
            "0000803f000000000000000000000000000000000000000000000000",
            "c8090164",
            "db40",
        ))?;
        let frame = MavFrame::read(&mut Cursor::new(&cmd))?;
        assert_eq!(32, frame.payload().len());

        let Message::CommandLong(c) = frame.message()? else {
            panic!("wrong message type");
        };
        assert_eq!(MavCmd::RequestVideoStreamInformation as u16, c.command);
        assert_eq!(Some(MavCmd::RequestVideoStreamInformation), c.mav_cmd());
        assert_eq!(1., c.param1);
        assert_eq!(1, c.target_system);
        assert_eq!(100, c.target_component);
        assert_eq!(0, c.confirmation);

        let mut out = Cursor::new(Vec::new());
        frame.write(&mut out)?;
        assert_eq!(cmd, out.into_inner());
        Ok(())
    }

    #[test]
    fn command_ack() -> Result<()> {
        let ack = CommandAck::new(
            MavCmd::RequestVideoStreamInformation as u16,
            MavResult::Accepted,
            255,
            190,
        );
        let frame = MavFrame::new(1, 1, 100, &ack.into())?;
        let mut out = Cursor::new(Vec::new());
        frame.write(&mut out)?;
        assert_eq!(
            hex::decode("fd0a00000101644d0000c809000000000000ffbe5e9c")?,
            out.into_inner()
        );
        Ok(())
    }

    #[test]
    fn checksum_mismatch() -> Result<()> {
        let cmd = hex::decode("fd090000000164000000000000001e00000303445f")?;
        let frame = MavFrame::read(&mut Cursor::new(&cmd))?;
        assert!(matches!(
            frame.message(),
            Err(Error::ChecksumMismatch {
                message_id: 0,
                expected: 0x5e44,
                actual: 0x5f44,
            })
        ));
        Ok(())
    }

    #[test]
    fn unknown_message() -> Result<()> {
        let cmd = hex::decode("fd0200000001015634120102abcd")?;
        let frame = MavFrame::read(&mut Cursor::new(&cmd))?;
        let msg = frame.message()?;
        assert_eq!(0x123456, msg.id());
        assert_eq!(
            Message::Unknown {
                id: 0x123456,
                payload: vec![1, 2],
            },
            msg
        );

        assert!(matches!(
            MavFrame::new(0, 1, 1, &msg),
            Err(Error::UnknownMessage(0x123456))
        ));
        Ok(())
    }

    #[test]
    fn signed() -> Result<()> {
        let cmd = hex::decode(concat!(
            "fd090100050164000000",
            "000000001e00000303",
            "d100",
            "0102030405060708090a0b0c0d",
        ))?;
        let frame = MavFrame::read(&mut Cursor::new(&cmd))?;
        assert!(frame.incompat_flags.signed());
        assert_eq!(
            Some([1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13]),
            frame.signature
        );
        assert!(matches!(frame.message()?, Message::Heartbeat(_)));

        let mut out = Cursor::new(Vec::new());
        frame.write(&mut out)?;
        assert_eq!(cmd, out.into_inner());
        Ok(())
    }

    #[test]
    fn bad_magic() -> Result<()> {
        let cmd = hex::decode("fe090000000164000000000000001e00000303445e")?;
        assert!(MavFrame::read(&mut Cursor::new(&cmd)).is_err());
        Ok(())
    }
}
