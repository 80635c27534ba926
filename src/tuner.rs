//! Typed values for the one byte tuner registers.

use crate::error::{FcdError, FcdResult};
use crate::registers::{ValueId, get_value, set_value};
use crate::session::Session;

/// A tuner register value with a fixed set of wire encodings
pub trait TunerSetting: Sized + Copy {
    const ID: ValueId;

    fn to_byte(self) -> u8;

    fn from_byte(byte: u8) -> Option<Self>;
}

pub fn set_setting<T: TunerSetting>(session: &mut Session, setting: T) -> FcdResult<()> {
    set_value(session, T::ID, setting.to_byte())
}

pub fn get_setting<T: TunerSetting>(session: &mut Session) -> FcdResult<T> {
    let byte = get_value(session, T::ID)?;
    T::from_byte(byte).ok_or(FcdError::UnexpectedValue {
        opcode: T::ID.get_opcode(),
        value: byte,
    })
}

/// Declares a `#[repr(u8)]` enum whose discriminants are the wire values of
/// one tuner register.
macro_rules! tuner_setting {
    (
        $(#[$meta:meta])*
        $name:ident => $id:ident {
            $($(#[$vmeta:meta])* $variant:ident = $value:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(u8)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($(#[$vmeta])* $variant = $value),+
        }

        impl TunerSetting for $name {
            const ID: ValueId = ValueId::$id;

            fn to_byte(self) -> u8 {
                self as u8
            }

            fn from_byte(byte: u8) -> Option<Self> {
                match byte {
                    $($value => Some($name::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

tuner_setting! {
    /// LNA (front end) gain
    LnaGain => LnaGain {
        Minus5_0Db = 0,
        Minus2_5Db = 1,
        Plus0_0Db = 4,
        Plus2_5Db = 5,
        Plus5_0Db = 6,
        Plus7_5Db = 7,
        Plus10_0Db = 8,
        Plus12_5Db = 9,
        Plus15_0Db = 10,
        Plus17_5Db = 11,
        Plus20_0Db = 12,
        Plus25_0Db = 13,
        Plus30_0Db = 14,
    }
}

tuner_setting! {
    LnaEnhance => LnaEnhance {
        Off = 0,
        Level0 = 1,
        Level1 = 3,
        Level2 = 5,
        Level3 = 7,
    }
}

tuner_setting! {
    /// RF band selection
    Band => Band {
        /// DC - 220 MHz
        Vhf2 = 0,
        /// 220 - 350 MHz
        Vhf3 = 1,
        /// 350 MHz - 1 GHz
        Uhf = 2,
        /// Above 1 GHz
        LBand = 3,
    }
}

/// RF front end filter.
///
/// The register holds a 0-15 index whose meaning depends on the selected
/// [`Band`], so the named filters of different bands share values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RfFilter(u8);

impl RfFilter {
    // VHF II
    pub const LPF_268_MHZ: RfFilter = RfFilter(0);
    pub const LPF_299_MHZ: RfFilter = RfFilter(8);
    // VHF III
    pub const LPF_509_MHZ: RfFilter = RfFilter(0);
    pub const LPF_656_MHZ: RfFilter = RfFilter(8);
    // UHF
    pub const BPF_360_MHZ: RfFilter = RfFilter(0);
    pub const BPF_380_MHZ: RfFilter = RfFilter(1);
    pub const BPF_405_MHZ: RfFilter = RfFilter(2);
    pub const BPF_425_MHZ: RfFilter = RfFilter(3);
    pub const BPF_450_MHZ: RfFilter = RfFilter(4);
    pub const BPF_475_MHZ: RfFilter = RfFilter(5);
    pub const BPF_505_MHZ: RfFilter = RfFilter(6);
    pub const BPF_540_MHZ: RfFilter = RfFilter(7);
    pub const BPF_575_MHZ: RfFilter = RfFilter(8);
    pub const BPF_615_MHZ: RfFilter = RfFilter(9);
    pub const BPF_670_MHZ: RfFilter = RfFilter(10);
    pub const BPF_720_MHZ: RfFilter = RfFilter(11);
    pub const BPF_760_MHZ: RfFilter = RfFilter(12);
    pub const BPF_840_MHZ: RfFilter = RfFilter(13);
    pub const BPF_890_MHZ: RfFilter = RfFilter(14);
    pub const BPF_970_MHZ: RfFilter = RfFilter(15);
    // L band
    pub const BPF_1300_MHZ: RfFilter = RfFilter(0);
    pub const BPF_1320_MHZ: RfFilter = RfFilter(1);
    pub const BPF_1360_MHZ: RfFilter = RfFilter(2);
    pub const BPF_1410_MHZ: RfFilter = RfFilter(3);
    pub const BPF_1445_MHZ: RfFilter = RfFilter(4);
    pub const BPF_1460_MHZ: RfFilter = RfFilter(5);
    pub const BPF_1490_MHZ: RfFilter = RfFilter(6);
    pub const BPF_1530_MHZ: RfFilter = RfFilter(7);
    pub const BPF_1560_MHZ: RfFilter = RfFilter(8);
    pub const BPF_1590_MHZ: RfFilter = RfFilter(9);
    pub const BPF_1640_MHZ: RfFilter = RfFilter(10);
    pub const BPF_1660_MHZ: RfFilter = RfFilter(11);
    pub const BPF_1680_MHZ: RfFilter = RfFilter(12);
    pub const BPF_1700_MHZ: RfFilter = RfFilter(13);
    pub const BPF_1720_MHZ: RfFilter = RfFilter(14);
    pub const BPF_1750_MHZ: RfFilter = RfFilter(15);

    const MAX_INDEX: u8 = 15;

    /// Filter index, `None` above 15
    pub fn new(index: u8) -> Option<Self> {
        (index <= Self::MAX_INDEX).then_some(RfFilter(index))
    }

    pub fn index(self) -> u8 {
        self.0
    }
}

impl TunerSetting for RfFilter {
    const ID: ValueId = ValueId::RfFilter;

    fn to_byte(self) -> u8 {
        self.0
    }

    fn from_byte(byte: u8) -> Option<Self> {
        RfFilter::new(byte)
    }
}

tuner_setting! {
    MixerGain => MixerGain {
        Plus4_0Db = 0,
        Plus12_0Db = 1,
    }
}

tuner_setting! {
    BiasCurrent => BiasCurrent {
        LBand = 0,
        Current1 = 1,
        Current2 = 2,
        VuBand = 3,
    }
}

tuner_setting! {
    /// Mixer output filter bandwidth
    MixerFilter => MixerFilter {
        Mhz27_0 = 0,
        Mhz4_6 = 8,
        Mhz4_2 = 9,
        Mhz3_8 = 10,
        Mhz3_4 = 11,
        Mhz3_0 = 12,
        Mhz2_7 = 13,
        Mhz2_3 = 14,
        Mhz1_9 = 15,
    }
}

tuner_setting! {
    /// IF amplifier 1 gain
    IfGain1 => IfGain1 {
        Minus3_0Db = 0,
        Plus6_0Db = 1,
    }
}

tuner_setting! {
    IfGainMode => IfGainMode {
        Linearity = 0,
        Sensitivity = 1,
    }
}

tuner_setting! {
    IfRcFilter => IfRcFilter {
        Mhz21_4 = 0,
        Mhz21_0 = 1,
        Mhz17_6 = 2,
        Mhz14_7 = 3,
        Mhz12_4 = 4,
        Mhz10_6 = 5,
        Mhz9_0 = 6,
        Mhz7_7 = 7,
        Mhz6_4 = 8,
        Mhz5_3 = 9,
        Mhz4_4 = 10,
        Mhz3_4 = 11,
        Mhz2_6 = 12,
        Mhz1_8 = 13,
        Mhz1_2 = 14,
        Mhz1_0 = 15,
    }
}

tuner_setting! {
    IfGain2 => IfGain2 {
        Plus0_0Db = 0,
        Plus3_0Db = 1,
        Plus6_0Db = 2,
        Plus9_0Db = 3,
    }
}

tuner_setting! {
    IfGain3 => IfGain3 {
        Plus0_0Db = 0,
        Plus3_0Db = 1,
        Plus6_0Db = 2,
        Plus9_0Db = 3,
    }
}

tuner_setting! {
    /// IF channel filter bandwidth
    IfFilter => IfFilter {
        Mhz5_50 = 0,
        Mhz5_30 = 1,
        Mhz5_00 = 2,
        Mhz4_80 = 3,
        Mhz4_60 = 4,
        Mhz4_40 = 5,
        Mhz4_30 = 6,
        Mhz4_10 = 7,
        Mhz3_90 = 8,
        Mhz3_80 = 9,
        Mhz3_70 = 10,
        Mhz3_60 = 11,
        Mhz3_40 = 12,
        Mhz3_30 = 13,
        Mhz3_20 = 14,
        Mhz3_10 = 15,
        Mhz3_00 = 16,
        Mhz2_95 = 17,
        Mhz2_90 = 18,
        Mhz2_80 = 19,
        Mhz2_75 = 20,
        Mhz2_70 = 21,
        Mhz2_60 = 22,
        Mhz2_55 = 23,
        Mhz2_50 = 24,
        Mhz2_45 = 25,
        Mhz2_40 = 26,
        Mhz2_30 = 27,
        Mhz2_28 = 28,
        Mhz2_24 = 29,
        Mhz2_20 = 30,
        Mhz2_15 = 31,
    }
}

tuner_setting! {
    IfGain4 => IfGain4 {
        Plus0_0Db = 0,
        Plus1_0Db = 1,
        Plus2_0Db = 2,
    }
}

tuner_setting! {
    IfGain5 => IfGain5 {
        Plus3_0Db = 0,
        Plus6_0Db = 1,
        Plus9_0Db = 2,
        Plus12_0Db = 3,
        Plus15_0Db = 4,
    }
}

tuner_setting! {
    IfGain6 => IfGain6 {
        Plus3_0Db = 0,
        Plus6_0Db = 1,
        Plus9_0Db = 2,
        Plus12_0Db = 3,
        Plus15_0Db = 4,
    }
}
