//! SX1231 register map and bit-field descriptors.

/// Register addresses
#[allow(dead_code)]
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Register {
    Fifo = 0x00,
    OpMode = 0x01,
    DataModul = 0x02,
    BitrateMsb = 0x03,
    BitrateLsb = 0x04,
    FdevMsb = 0x05,
    FdevLsb = 0x06,
    FrfMsb = 0x07,
    FrfMid = 0x08,
    FrfLsb = 0x09,
    Version = 0x10,
    PaLevel = 0x11,
    Ocp = 0x13,
    RxBw = 0x19,
    RssiValue = 0x24,
    DioMapping1 = 0x25,
    DioMapping2 = 0x26,
    IrqFlags1 = 0x27,
    IrqFlags2 = 0x28,
    RssiThresh = 0x29,
    RxTimeout1 = 0x2A,
    RxTimeout2 = 0x2B,
    SyncConfig = 0x2E,
    SyncValue1 = 0x2F,
    SyncValue2 = 0x30,
    PacketConfig1 = 0x37,
    PayloadLength = 0x38,
    FifoThresh = 0x3C,
    PacketConfig2 = 0x3D,
    TestPa1 = 0x5A,
    TestPa2 = 0x5C,
    TestDagc = 0x6F,
}

impl Register {
    pub fn addr(self) -> u8 {
        self as u8
    }

    /// SPI address byte for a read access.
    pub fn read(self) -> u8 {
        self as u8 & 0x7F
    }

    /// SPI address byte for a write access (wnr bit set).
    pub fn write(self) -> u8 {
        self as u8 | 0x80
    }
}

/// Bit-field descriptor: a register address plus the bit span the field
/// occupies. Values handed to [`crate::transport::Transport::write_field`]
/// are expected to be positioned inside the register already.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Field {
    pub reg: Register,
    pub msb: u8,
    pub lsb: u8,
}

impl Field {
    pub const fn new(reg: Register, msb: u8, lsb: u8) -> Self {
        Self { reg, msb, lsb }
    }

    /// Field covering the full register.
    pub const fn whole(reg: Register) -> Self {
        Self::new(reg, 7, 0)
    }

    /// Mask of the bits between `msb` and `lsb`, inclusive.
    pub const fn mask(self) -> u8 {
        ((0xFFu16 >> (7 - self.msb)) as u8) & (0xFFu8 << self.lsb)
    }
}

/// Fields written by the driver that cover less than a whole register.
pub mod fields {
    use super::{Field, Register};

    pub const SEQUENCER_LISTEN: Field = Field::new(Register::OpMode, 7, 6);
    pub const MODE: Field = Field::new(Register::OpMode, 4, 2);
    pub const MODULATION: Field = Field::new(Register::DataModul, 6, 3);
    pub const SHAPING: Field = Field::new(Register::DataModul, 1, 0);
    pub const FDEV_MSB: Field = Field::new(Register::FdevMsb, 5, 0);
    pub const OCP: Field = Field::new(Register::Ocp, 4, 4);
    pub const DIO0_TX: Field = Field::new(Register::DioMapping1, 7, 6);
    pub const DIO_RX: Field = Field::new(Register::DioMapping1, 7, 4);
    pub const CLK_OUT: Field = Field::new(Register::DioMapping2, 2, 0);
    pub const FIFO_OVERRUN: Field = Field::new(Register::IrqFlags2, 4, 4);
    pub const PACKET_FORMAT: Field = Field::new(Register::PacketConfig1, 7, 1);
    pub const INTER_PACKET_RX_DELAY: Field = Field::new(Register::PacketConfig2, 7, 4);
    pub const RESTART_AES: Field = Field::new(Register::PacketConfig2, 1, 0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_masks() {
        assert_eq!(Field::whole(Register::RxBw).mask(), 0xFF);
        assert_eq!(fields::MODE.mask(), 0b0001_1100);
        assert_eq!(fields::OCP.mask(), 0b0001_0000);
        assert_eq!(fields::SEQUENCER_LISTEN.mask(), 0b1100_0000);
        assert_eq!(fields::PACKET_FORMAT.mask(), 0b1111_1110);
        assert_eq!(fields::SHAPING.mask(), 0b0000_0011);
    }

    #[test]
    fn access_address_bytes() {
        assert_eq!(Register::Version.read(), 0x10);
        assert_eq!(Register::Version.write(), 0x90);
        assert_eq!(Register::Fifo.read(), 0x00);
        assert_eq!(Register::Fifo.write(), 0x80);
    }
}
