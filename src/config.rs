//! Driver configuration and register value tables.

/// Chip identity reported by the `Version` register.
pub const CHIP_VERSION: u8 = 0x24;

/// Crystal oscillator frequency, Hz.
pub const FXOSC: u32 = 32_000_000;

/// Supported ISM sub-bands, MHz, exclusive bounds.
pub const SUB_BANDS: [(f32, f32); 3] = [(290.0, 340.0), (431.0, 510.0), (862.0, 1020.0)];

pub const BIT_RATE_MIN: u32 = 1_200;
pub const BIT_RATE_MAX: u32 = 300_000;

/// Radio mode. Discriminants are positioned in `OpMode` bits 4..2.
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    Sleep = 0x00,
    #[default]
    Standby = 0x04,
    Tx = 0x0C,
    Rx = 0x10,
}

/// Configuration parameters
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Carrier frequency, MHz.
    pub frequency: f32,
    /// Bit rate, bit/s.
    pub bit_rate: u32,
    /// Upper bound on the transmit completion wait. `None` spins until the
    /// chip reports the FIFO flushed, however long that takes.
    pub tx_timeout_ms: Option<u32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            frequency: 434.0,
            bit_rate: 4_800,
            tx_timeout_ms: None,
        }
    }
}

/// Carrier frequency register triple.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Frequency {
    raw: [u8; 3],
}

impl Frequency {
    /// Encodes a frequency in MHz as `round(freq * 2^19 / 32)`, the FRF
    /// word in units of FXOSC / 2^19.
    pub fn new(mhz: f32) -> Self {
        let val = (mhz * (1u32 << 19) as f32 / 32.0 + 0.5) as u32;
        Self {
            raw: [(val >> 16) as u8, (val >> 8) as u8, val as u8],
        }
    }

    pub fn as_bytes(&self) -> [u8; 3] {
        self.raw
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Frequency {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "Frequency {{ {:02x} }}", self.raw)
    }
}

/// Bit-rate register pair.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct BitRate {
    raw: [u8; 2],
}

impl BitRate {
    /// Encodes a bit rate in bit/s as `round(FXOSC / rate)`.
    pub const fn new(bit_rate: u32) -> Self {
        let val = (FXOSC + bit_rate / 2) / bit_rate;
        Self {
            raw: [(val >> 8) as u8, val as u8],
        }
    }

    pub fn as_bytes(&self) -> [u8; 2] {
        self.raw
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for BitRate {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "BitRate {{ {:02x} }}", self.raw)
    }
}

// OpMode
pub const SEQUENCER_ON: u8 = 0b0000_0000;
pub const LISTEN_OFF: u8 = 0b0000_0000;

// DataModul
pub const PACKET_MODE: u8 = 0b0000_0000;
pub const MODULATION_FSK: u8 = 0b0000_0000;
pub const NO_SHAPING: u8 = 0b0000_0000;

// Ocp
pub const OCP_ON: u8 = 0b0001_0000;

// Fdev, 5 kHz in units of FXOSC / 2^19
pub const FDEV_MSB: u8 = 0x00;
pub const FDEV_LSB: u8 = 0x52;

// RxBw
pub const DCC_FREQ: u8 = 0b0100_0000;
pub const RX_BW_MANT_16: u8 = 0b0000_0000;
pub const RX_BW_EXP: u8 = 0b0000_0010;

// RssiThresh
pub const RSSI_THRESHOLD: u8 = 0xE4;

// DioMapping1
pub const DIO0_PACKET_SENT: u8 = 0b0000_0000;
pub const DIO0_PAYLOAD_READY: u8 = 0b0100_0000;
pub const DIO1_TIMEOUT: u8 = 0b0011_0000;

// DioMapping2
pub const CLK_OUT_OFF: u8 = 0b0000_0111;

// SyncConfig
pub const SYNC_ON: u8 = 0b1000_0000;
pub const FIFO_FILL_CONDITION_SYNC: u8 = 0b0000_0000;
pub const SYNC_SIZE_2_BYTES: u8 = 0b0000_1000;
pub const SYNC_TOL_0: u8 = 0b0000_0000;
pub const SYNC_WORD: [u8; 2] = [0x2D, 0x64];

// PacketConfig1
pub const PACKET_FORMAT_VARIABLE: u8 = 0b1000_0000;
pub const DC_FREE_NONE: u8 = 0b0000_0000;
pub const CRC_ON: u8 = 0b0001_0000;
pub const CRC_AUTOCLEAR_ON: u8 = 0b0000_0000;
pub const ADDRESS_FILTERING_OFF: u8 = 0b0000_0000;

// PacketConfig2
pub const INTER_PACKET_RX_DELAY_NONE: u8 = 0b0000_0000;
pub const AUTO_RX_RESTART_ON: u8 = 0b0000_0010;
pub const AES_OFF: u8 = 0b0000_0000;

// PayloadLength, variable-length mode: maximum accepted frame length
pub const PAYLOAD_LENGTH_MAX: u8 = 0xFF;

// FifoThresh
pub const TX_START_FIFO_NOT_EMPTY: u8 = 0b1000_0000;
pub const FIFO_THRESHOLD: u8 = 0b0000_1111;

// PaLevel
pub const PA0_ON: u8 = 0b1000_0000;
pub const OUTPUT_POWER_MAX: u8 = 0b0001_1111;

// RxTimeout1/2, units of 16 bit periods
pub const TIMEOUT_RX_START: u8 = 0xFF;
pub const TIMEOUT_RSSI_THRESH: u8 = 0xFF;

// TestDagc
pub const DAGC_LOW_BETA_OFF: u8 = 0x30;

// TestPa1/TestPa2, +20 dBm boost vs normal operation
pub const PA1_NORMAL: u8 = 0x55;
pub const PA1_BOOST: u8 = 0x5D;
pub const PA2_NORMAL: u8 = 0x70;
pub const PA2_BOOST: u8 = 0x7C;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frequency_encoding() {
        // 433.0 MHz: 433 * 2^19 / 32 = 7094272 = 0x6C4000
        assert_eq!(Frequency::new(433.0).as_bytes(), [0x6C, 0x40, 0x00]);
        // 868.0 MHz: 868 * 16384 = 14221312 = 0xD90000
        assert_eq!(Frequency::new(868.0).as_bytes(), [0xD9, 0x00, 0x00]);
    }

    #[test]
    fn bit_rate_encoding() {
        // round(32e6 / 9600) = 3333 = 0x0D05
        assert_eq!(BitRate::new(9_600).as_bytes(), [0x0D, 0x05]);
        // round(32e6 / 19200) = 1667 = 0x0683
        assert_eq!(BitRate::new(19_200).as_bytes(), [0x06, 0x83]);
        // round(32e6 / 300000) = 107
        assert_eq!(BitRate::new(300_000).as_bytes(), [0x00, 0x6B]);
    }
}
