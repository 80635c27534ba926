//! Application-mode value registers.
//!
//! One byte tuner values are addressed by adding a [`ValueId`] to a base
//! opcode. Wider registers (frequency, DC and IQ correction) have their own
//! opcodes and are checked against their wire width before anything is sent.

use crate::codec::{decode_u16, decode_u32, encode_u16, encode_u32};
use crate::error::{FcdError, FcdResult};
use crate::protocol::Command;
use crate::session::Session;

pub const SET_VALUE_BASE: u8 = 110;
pub const GET_VALUE_BASE: u8 = 150;

/// Largest frequency accepted by the 3 byte kHz command
pub const MAX_FREQUENCY_KHZ: u32 = 0x00ff_ffff;

/// One byte tuner registers in wire order
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueId {
    LnaGain = 0,
    LnaEnhance,
    Band,
    RfFilter,
    MixerGain,
    BiasCurrent,
    MixerFilter,
    IfGain1,
    IfGainMode,
    IfRcFilter,
    IfGain2,
    IfGain3,
    IfFilter,
    IfGain4,
    IfGain5,
    IfGain6,
    BiasTee,
}

impl ValueId {
    pub const ALL: [ValueId; 17] = [
        ValueId::LnaGain,
        ValueId::LnaEnhance,
        ValueId::Band,
        ValueId::RfFilter,
        ValueId::MixerGain,
        ValueId::BiasCurrent,
        ValueId::MixerFilter,
        ValueId::IfGain1,
        ValueId::IfGainMode,
        ValueId::IfRcFilter,
        ValueId::IfGain2,
        ValueId::IfGain3,
        ValueId::IfFilter,
        ValueId::IfGain4,
        ValueId::IfGain5,
        ValueId::IfGain6,
        ValueId::BiasTee,
    ];

    pub fn set_opcode(self) -> u8 {
        SET_VALUE_BASE + self as u8
    }

    pub fn get_opcode(self) -> u8 {
        GET_VALUE_BASE + self as u8
    }
}

impl TryFrom<u8> for ValueId {
    type Error = FcdError;

    fn try_from(index: u8) -> FcdResult<Self> {
        ValueId::ALL
            .get(index as usize)
            .copied()
            .ok_or_else(|| FcdError::InvalidArgument(format!("Unknown value register {}", index)))
    }
}

pub fn set_value(session: &mut Session, id: ValueId, value: u8) -> FcdResult<()> {
    session.set(id.set_opcode(), &[value])
}

pub fn get_value(session: &mut Session, id: ValueId) -> FcdResult<u8> {
    let raw = session.get(id.get_opcode(), 1)?;
    Ok(raw[0])
}

/// Set a register by raw index, rejecting unknown indices before any exchange
pub fn set_value_by_index(session: &mut Session, index: u8, value: u8) -> FcdResult<()> {
    set_value(session, ValueId::try_from(index)?, value)
}

pub fn get_value_by_index(session: &mut Session, index: u8) -> FcdResult<u8> {
    get_value(session, ValueId::try_from(index)?)
}

pub fn set_frequency_hz(session: &mut Session, frequency: u32) -> FcdResult<()> {
    session.set(Command::SetFrequencyHz.into(), &encode_u32(frequency))
}

pub fn get_frequency_hz(session: &mut Session) -> FcdResult<u32> {
    let raw = session.get(Command::GetFrequencyHz.into(), 4)?;
    Ok(decode_u32(&raw))
}

/// Legacy 3 byte kHz tuning command
pub fn set_frequency_khz(session: &mut Session, frequency: u32) -> FcdResult<()> {
    if frequency > MAX_FREQUENCY_KHZ {
        return Err(FcdError::InvalidArgument(format!(
            "Frequency {} kHz does not fit in 24 bits",
            frequency
        )));
    }
    session.set(Command::SetFrequencyKhz.into(), &encode_u32(frequency)[..3])
}

fn to_i16(value: i32, name: &str) -> FcdResult<i16> {
    i16::try_from(value)
        .map_err(|_| FcdError::InvalidArgument(format!("{} {} out of range", name, value)))
}

fn to_u16(value: u32, name: &str) -> FcdResult<u16> {
    u16::try_from(value)
        .map_err(|_| FcdError::InvalidArgument(format!("{} {} out of range", name, value)))
}

/// Set the I and Q DC offset correction
pub fn set_dc_correction(session: &mut Session, i: i32, q: i32) -> FcdResult<()> {
    let i = to_i16(i, "I correction")?;
    let q = to_i16(q, "Q correction")?;
    let payload = [encode_u16(i as u16), encode_u16(q as u16)].concat();
    session.set(Command::SetDcCorrection.into(), &payload)
}

pub fn get_dc_correction(session: &mut Session) -> FcdResult<(i16, i16)> {
    let raw = session.get(Command::GetDcCorrection.into(), 4)?;
    Ok((decode_u16(&raw[0..2]) as i16, decode_u16(&raw[2..4]) as i16))
}

/// Set IQ phase (signed, 0 centred) and gain (unsigned, 32768 centred) correction
pub fn set_iq_correction(session: &mut Session, phase: i32, gain: u32) -> FcdResult<()> {
    let phase = to_i16(phase, "Phase correction")?;
    let gain = to_u16(gain, "Gain correction")?;
    let payload = [encode_u16(phase as u16), encode_u16(gain)].concat();
    session.set(Command::SetIqCorrection.into(), &payload)
}

pub fn get_iq_correction(session: &mut Session) -> FcdResult<(i16, u16)> {
    let raw = session.get(Command::GetIqCorrection.into(), 4)?;
    Ok((decode_u16(&raw[0..2]) as i16, decode_u16(&raw[2..4])))
}

pub fn set_bias_tee(session: &mut Session, enabled: bool) -> FcdResult<()> {
    set_value(session, ValueId::BiasTee, u8::from(enabled))
}

pub fn get_bias_tee(session: &mut Session) -> FcdResult<bool> {
    Ok(get_value(session, ValueId::BiasTee)? != 0)
}

/// IF signal strength, roughly 0 at -35 dBm and 70 at -10 dBm
pub fn get_if_rssi(session: &mut Session) -> FcdResult<u8> {
    let raw = session.get(Command::GetIfRssi.into(), 1)?;
    Ok(raw[0])
}

pub fn get_pll_lock(session: &mut Session) -> FcdResult<bool> {
    let raw = session.get(Command::GetPllLock.into(), 1)?;
    Ok(raw[0] & 1 != 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::mock::MockTransport;

    fn session(mock: &MockTransport) -> Session {
        Session::with_transport(Box::new(mock.clone()), None)
    }

    #[test]
    fn test_value_opcodes() {
        assert_eq!(ValueId::LnaGain.set_opcode(), 110);
        assert_eq!(ValueId::BiasTee.set_opcode(), 126);
        assert_eq!(ValueId::IfGain1.get_opcode(), 157);
        assert_eq!(ValueId::try_from(16).unwrap(), ValueId::BiasTee);
    }

    #[test]
    fn test_unknown_index_rejected_without_exchange() {
        let mock = MockTransport::new();
        let mut session = session(&mock);

        assert!(matches!(
            set_value_by_index(&mut session, 17, 1),
            Err(FcdError::InvalidArgument(_))
        ));
        assert!(matches!(
            get_value_by_index(&mut session, 200),
            Err(FcdError::InvalidArgument(_))
        ));
        assert!(mock.written().is_empty());
    }

    #[test]
    fn test_set_value_frame() {
        let mock = MockTransport::new();
        mock.respond(112, &[]);

        set_value_by_index(&mut session(&mock), 2, 3).unwrap();
        assert_eq!(&mock.written()[0][..4], &[0, 112, 3, 0]);
    }

    #[test]
    fn test_get_value_reads_one_byte() {
        let mock = MockTransport::new();
        mock.respond(166, &[1]);

        assert!(get_bias_tee(&mut session(&mock)).unwrap());
    }

    #[test]
    fn test_frequency_round_trip() {
        let mock = MockTransport::new();
        mock.respond(101, &[]).respond(102, &encode_u32(145_800_000));

        let mut session = session(&mock);
        set_frequency_hz(&mut session, 145_800_000).unwrap();
        assert_eq!(get_frequency_hz(&mut session).unwrap(), 145_800_000);
        assert_eq!(&mock.written()[0][2..6], &encode_u32(145_800_000));
    }

    #[test]
    fn test_frequency_khz_width() {
        let mock = MockTransport::new();
        mock.respond(100, &[]);

        let mut session = session(&mock);
        set_frequency_khz(&mut session, 145_800).unwrap();
        assert_eq!(&mock.written()[0][2..6], &[0x88, 0x39, 0x02, 0x00]);

        assert!(matches!(
            set_frequency_khz(&mut session, 0x0100_0000),
            Err(FcdError::InvalidArgument(_))
        ));
        assert_eq!(mock.written().len(), 1);
    }

    #[test]
    fn test_dc_correction_overflow_rejected() {
        let mock = MockTransport::new();
        let mut session = session(&mock);

        assert!(matches!(
            set_dc_correction(&mut session, 40000, 0),
            Err(FcdError::InvalidArgument(_))
        ));
        assert!(matches!(
            set_dc_correction(&mut session, 0, -40000),
            Err(FcdError::InvalidArgument(_))
        ));
        assert!(mock.written().is_empty());
    }

    #[test]
    fn test_dc_correction_encoding() {
        let mock = MockTransport::new();
        mock.respond(106, &[]).respond(107, &[0xff, 0xff, 0x00, 0x80]);

        let mut session = session(&mock);
        set_dc_correction(&mut session, -2, 300).unwrap();
        assert_eq!(&mock.written()[0][2..6], &[0xfe, 0xff, 0x2c, 0x01]);
        assert_eq!(get_dc_correction(&mut session).unwrap(), (-1, i16::MIN));
    }

    #[test]
    fn test_iq_correction() {
        let mock = MockTransport::new();
        mock.respond(108, &[]).respond(109, &[0x00, 0x00, 0x00, 0x80]);

        let mut session = session(&mock);
        assert!(matches!(
            set_iq_correction(&mut session, 0, 70000),
            Err(FcdError::InvalidArgument(_))
        ));
        set_iq_correction(&mut session, -5, 32768).unwrap();
        assert_eq!(&mock.written()[0][2..6], &[0xfb, 0xff, 0x00, 0x80]);
        assert_eq!(get_iq_correction(&mut session).unwrap(), (0, 32768));
    }
}
