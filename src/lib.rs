//! A platform agnostic Rust driver for the SX1231 FSK packet transceiver,
//! based on the `embedded-hal` traits.
//!
//! The radio is driven entirely through its register file over a
//! [`transport::Transport`] capability; every operation is a blocking call
//! that returns once the chip signals completion or a bounded wait expires.
#![cfg_attr(not(test), no_std)]

use config::*;
use embedded_hal::{delay::DelayNs, spi};
use irq::{IrqFlags1, IrqFlags2};
use packet::{Packet, ADDRESS_LEN};
use registers::{fields, Field, Register};
use transport::Transport;

pub mod config;
pub mod irq;
pub mod packet;
pub mod registers;
pub mod transport;

pub const SX1231_MODE: spi::Mode = embedded_hal::spi::MODE_0;

/// Identity probe attempts before giving up on the chip.
const DETECT_ATTEMPTS: u32 = 10;
/// Delay between identity probes; covers the chip's own power-on reset.
const DETECT_RETRY_MS: u32 = 1_000;
/// Poll step of the bounded transmit completion wait.
const TX_POLL_MS: u32 = 1;

/// SX1231 error
#[derive(PartialEq)]
pub enum Error<E> {
    /// The identity register never matched the expected chip version.
    ChipNotFound,
    /// Requested carrier frequency is outside the supported sub-bands.
    InvalidFrequency,
    /// Requested bit rate is outside 1.2-300 kbit/s.
    InvalidBitRate,
    /// Frame would not fit the one-byte FIFO length field.
    PacketTooLong,
    /// The chip-generated receive timeout fired before a packet arrived.
    RxTimeout,
    /// The caller's transmit wait budget expired.
    TxTimeout,
    /// Transport failure, propagated verbatim.
    Transport(E),
}

impl<E> From<E> for Error<E> {
    fn from(err: E) -> Self {
        Error::Transport(err)
    }
}

impl<E: core::fmt::Debug> core::fmt::Debug for Error<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ChipNotFound => write!(f, "Chip Not Found"),
            Self::InvalidFrequency => write!(f, "Invalid Frequency"),
            Self::InvalidBitRate => write!(f, "Invalid Bit Rate"),
            Self::PacketTooLong => write!(f, "Packet Too Long"),
            Self::RxTimeout => write!(f, "RX Timeout"),
            Self::TxTimeout => write!(f, "TX Timeout"),
            Self::Transport(err) => write!(f, "Transport Error: {:?}", err),
        }
    }
}

/// Driver for the SX1231
pub struct SX1231<T, DELAY> {
    transport: T,
    delay: DELAY,
    cfg: Config,
}

impl<T, DELAY> SX1231<T, DELAY>
where
    T: Transport,
    DELAY: DelayNs,
{
    /// Create a new SX1231 driver.
    ///
    /// Opens the transport, probes the identity register until the chip
    /// answers, then applies the full configuration in `cfg`. On a failed
    /// probe the transport session is closed before the error is returned.
    pub fn try_new(transport: T, delay: DELAY, cfg: Config) -> Result<Self, Error<T::Error>> {
        let mut radio = SX1231 {
            transport,
            delay,
            cfg,
        };
        radio.detect()?;
        radio.apply_config(cfg.frequency, cfg.bit_rate)?;
        Ok(radio)
    }

    /// Releases the transport and delay provider.
    pub fn release(self) -> (T, DELAY) {
        (self.transport, self.delay)
    }

    /// Current carrier frequency, MHz.
    pub fn frequency(&self) -> f32 {
        self.cfg.frequency
    }

    /// Current bit rate, bit/s.
    pub fn bit_rate(&self) -> u32 {
        self.cfg.bit_rate
    }

    fn detect(&mut self) -> Result<(), Error<T::Error>> {
        self.transport.open()?;
        for _attempt in 1..=DETECT_ATTEMPTS {
            let version = self.transport.read_register(Register::Version)?;
            if version == CHIP_VERSION {
                #[cfg(feature = "defmt")]
                defmt::trace!("chip found on attempt {}", _attempt);
                return Ok(());
            }
            #[cfg(feature = "defmt")]
            defmt::trace!(
                "version 0x{:02x} on attempt {} of {}",
                version,
                _attempt,
                DETECT_ATTEMPTS
            );
            self.delay.delay_ms(DETECT_RETRY_MS);
        }
        // best effort; a close failure must not mask the probe result
        self.transport.close().ok();
        Err(Error::ChipNotFound)
    }

    /// Reconfigure the radio.
    ///
    /// On success the stored settings are replaced; on any failure they are
    /// left untouched. A transport failure mid-sequence leaves the chip's
    /// registers partially written, there is no rollback.
    pub fn configure(&mut self, frequency: f32, bit_rate: u32) -> Result<(), Error<T::Error>> {
        #[cfg(feature = "defmt")]
        defmt::trace!("configure({}, {})", frequency, bit_rate);
        self.apply_config(frequency, bit_rate)?;
        self.cfg.frequency = frequency;
        self.cfg.bit_rate = bit_rate;
        Ok(())
    }

    /// Set the carrier frequency, MHz, keeping the stored bit rate.
    pub fn set_frequency(&mut self, frequency: f32) -> Result<(), Error<T::Error>> {
        self.configure(frequency, self.cfg.bit_rate)
    }

    /// Set the bit rate, bit/s, keeping the stored carrier frequency.
    pub fn set_bit_rate(&mut self, bit_rate: u32) -> Result<(), Error<T::Error>> {
        self.configure(self.cfg.frequency, bit_rate)
    }

    fn apply_config(&mut self, frequency: f32, bit_rate: u32) -> Result<(), Error<T::Error>> {
        if !SUB_BANDS
            .iter()
            .any(|&(lo, hi)| frequency > lo && frequency < hi)
        {
            return Err(Error::InvalidFrequency);
        }
        if !(BIT_RATE_MIN..=BIT_RATE_MAX).contains(&bit_rate) {
            return Err(Error::InvalidBitRate);
        }

        self.set_mode(Mode::Standby)?;

        self.transport
            .write_field(fields::SEQUENCER_LISTEN, SEQUENCER_ON | LISTEN_OFF)?;
        self.transport.write_field(fields::OCP, OCP_ON)?;
        self.transport
            .write_field(fields::MODULATION, PACKET_MODE | MODULATION_FSK)?;
        self.transport.write_field(fields::SHAPING, NO_SHAPING)?;

        let rate = BitRate::new(bit_rate).as_bytes();
        self.transport
            .write_field(Field::whole(Register::BitrateMsb), rate[0])?;
        self.transport
            .write_field(Field::whole(Register::BitrateLsb), rate[1])?;

        self.transport.write_field(fields::FDEV_MSB, FDEV_MSB)?;
        self.transport
            .write_field(Field::whole(Register::FdevLsb), FDEV_LSB)?;

        let frf = Frequency::new(frequency).as_bytes();
        self.transport
            .write_field(Field::whole(Register::FrfMsb), frf[0])?;
        self.transport
            .write_field(Field::whole(Register::FrfMid), frf[1])?;
        self.transport
            .write_field(Field::whole(Register::FrfLsb), frf[2])?;

        self.transport.write_field(
            Field::whole(Register::RxBw),
            DCC_FREQ | RX_BW_MANT_16 | RX_BW_EXP,
        )?;
        self.transport
            .write_field(Field::whole(Register::RssiThresh), RSSI_THRESHOLD)?;
        self.transport
            .write_field(fields::FIFO_OVERRUN, IrqFlags2::FifoOverrun.bits())?;
        self.transport.write_field(fields::CLK_OUT, CLK_OUT_OFF)?;

        self.transport.write_field(
            Field::whole(Register::SyncConfig),
            SYNC_ON | FIFO_FILL_CONDITION_SYNC | SYNC_SIZE_2_BYTES | SYNC_TOL_0,
        )?;
        self.transport
            .write_field(Field::whole(Register::SyncValue1), SYNC_WORD[0])?;
        self.transport
            .write_field(Field::whole(Register::SyncValue2), SYNC_WORD[1])?;

        self.transport.write_field(
            fields::PACKET_FORMAT,
            PACKET_FORMAT_VARIABLE
                | DC_FREE_NONE
                | CRC_ON
                | CRC_AUTOCLEAR_ON
                | ADDRESS_FILTERING_OFF,
        )?;
        self.transport
            .write_field(fields::INTER_PACKET_RX_DELAY, INTER_PACKET_RX_DELAY_NONE)?;
        self.transport
            .write_field(fields::RESTART_AES, AUTO_RX_RESTART_ON | AES_OFF)?;

        self.transport
            .write_field(Field::whole(Register::PayloadLength), PAYLOAD_LENGTH_MAX)?;
        self.transport.write_field(
            Field::whole(Register::FifoThresh),
            TX_START_FIFO_NOT_EMPTY | FIFO_THRESHOLD,
        )?;
        self.transport
            .write_field(Field::whole(Register::PaLevel), PA0_ON | OUTPUT_POWER_MAX)?;
        self.transport
            .write_field(Field::whole(Register::RxTimeout1), TIMEOUT_RX_START)?;
        self.transport
            .write_field(Field::whole(Register::RxTimeout2), TIMEOUT_RSSI_THRESH)?;
        self.transport
            .write_field(Field::whole(Register::TestDagc), DAGC_LOW_BETA_OFF)?;
        Ok(())
    }

    /// Transmit one packet, blocking until the chip reports the FIFO
    /// flushed over the air or the configured wait budget expires.
    pub fn transmit(&mut self, packet: &Packet) -> Result<(), Error<T::Error>> {
        #[cfg(feature = "defmt")]
        defmt::trace!("transmit({} payload bytes)", packet.data.len());
        let length = packet.wire_len();
        if length >= 256 {
            return Err(Error::PacketTooLong);
        }

        self.set_mode(Mode::Standby)?;
        self.transport
            .write_field(fields::DIO0_TX, DIO0_PACKET_SENT)?;
        self.clear_irq_flags()?;

        self.transport
            .write_register(Register::Fifo, length as u8)?;
        self.transport.write_burst(Register::Fifo, &packet.source)?;
        self.transport
            .write_burst(Register::Fifo, &packet.destination)?;
        self.transport.write_burst(Register::Fifo, &packet.data)?;

        self.set_mode(Mode::Tx)?;
        self.transport
            .write_field(Field::whole(Register::TestPa1), PA1_BOOST)?;
        self.transport
            .write_field(Field::whole(Register::TestPa2), PA2_BOOST)?;

        let mut waited_ms = 0;
        while !self.transport.primary_event()? {
            if let Some(limit) = self.cfg.tx_timeout_ms {
                if waited_ms >= limit {
                    self.clear_irq_flags()?;
                    return Err(Error::TxTimeout);
                }
                self.delay.delay_ms(TX_POLL_MS);
                waited_ms += TX_POLL_MS;
            }
        }

        self.clear_irq_flags()?;
        Ok(())
    }

    /// Receive one packet, blocking until one arrives or the chip's own
    /// receive timeout fires.
    ///
    /// The returned packet owns a freshly built payload buffer sized to the
    /// received frame.
    pub fn receive(&mut self) -> Result<Packet, Error<T::Error>> {
        #[cfg(feature = "defmt")]
        defmt::trace!("receive()");
        self.set_mode(Mode::Standby)?;
        self.transport
            .write_field(fields::DIO_RX, DIO0_PAYLOAD_READY | DIO1_TIMEOUT)?;
        self.clear_irq_flags()?;

        self.set_mode(Mode::Rx)?;
        self.transport
            .write_field(Field::whole(Register::TestPa1), PA1_NORMAL)?;
        self.transport
            .write_field(Field::whole(Register::TestPa2), PA2_NORMAL)?;

        while !self.transport.primary_event()? {
            if self.transport.secondary_event()? {
                self.clear_irq_flags()?;
                return Err(Error::RxTimeout);
            }
        }

        let length = self.transport.read_register(Register::Fifo)? as usize;

        let mut packet = Packet::new([0; ADDRESS_LEN], [0; ADDRESS_LEN]);
        self.transport
            .read_burst(Register::Fifo, &mut packet.source)?;
        self.transport
            .read_burst(Register::Fifo, &mut packet.destination)?;

        // frames shorter than the address header carry no payload
        let payload_len = length.saturating_sub(2 * ADDRESS_LEN);
        packet
            .data
            .resize(payload_len, 0)
            .map_err(|_| Error::PacketTooLong)?;
        self.transport
            .read_burst(Register::Fifo, &mut packet.data)?;

        self.clear_irq_flags()?;
        Ok(packet)
    }

    /// Enter sleep mode.
    pub fn sleep(&mut self) -> Result<(), Error<T::Error>> {
        self.set_mode(Mode::Sleep)
    }

    /// Enter standby mode.
    pub fn standby(&mut self) -> Result<(), Error<T::Error>> {
        self.set_mode(Mode::Standby)
    }

    /// Select the operating mode.
    ///
    /// Best effort: the mode field is written and never read back, the chip
    /// is trusted to accept any of the four modes.
    pub fn set_mode(&mut self, mode: Mode) -> Result<(), Error<T::Error>> {
        #[cfg(feature = "defmt")]
        defmt::trace!("set_mode({})", mode);
        self.transport.write_field(fields::MODE, mode as u8)?;
        Ok(())
    }

    /// Current received signal strength, -dBm.
    pub fn rssi(&mut self) -> Result<u8, Error<T::Error>> {
        let raw = self.transport.read_register(Register::RssiValue)?;
        Ok(raw / 2)
    }

    /// Current interrupt flag registers.
    pub fn irq_flags(&mut self) -> Result<(IrqFlags1, IrqFlags2), Error<T::Error>> {
        let flags1 = self.transport.read_register(Register::IrqFlags1)?;
        let flags2 = self.transport.read_register(Register::IrqFlags2)?;
        Ok((
            IrqFlags1::from_bits_truncate(flags1),
            IrqFlags2::from_bits_truncate(flags2),
        ))
    }

    /// Clear every latched event in both interrupt flag registers.
    pub fn clear_irq_flags(&mut self) -> Result<(), Error<T::Error>> {
        self.transport
            .write_register(Register::IrqFlags1, 0b1111_1111)?;
        self.transport
            .write_register(Register::IrqFlags2, 0b1111_1111)?;
        Ok(())
    }
}
