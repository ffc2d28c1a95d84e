//! Register-bus access consumed by the driver.

use crate::registers::{Field, Register};
use embedded_hal::{
    digital::InputPin,
    spi::{self, Operation},
};

/// Register-level access to the radio plus the two event pin states.
///
/// The driver performs every operation through this capability and never
/// owns the bus itself, so the caller decides how access is serialized.
pub trait Transport {
    type Error;

    /// Opens the bus session. Defaults to a no-op.
    fn open(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Ends the bus session. Defaults to a no-op.
    fn close(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn read_register(&mut self, reg: Register) -> Result<u8, Self::Error>;

    fn write_register(&mut self, reg: Register, value: u8) -> Result<(), Self::Error>;

    /// Burst read of `buf.len()` bytes from `reg`.
    fn read_burst(&mut self, reg: Register, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Burst write of `data` to `reg`.
    fn write_burst(&mut self, reg: Register, data: &[u8]) -> Result<(), Self::Error>;

    /// Read-modify-write confined to the bits `field` covers. `value` must
    /// already be positioned inside the register.
    fn write_field(&mut self, field: Field, value: u8) -> Result<(), Self::Error> {
        let old = self.read_register(field.reg)?;
        let new = (old & !field.mask()) | (value & field.mask());
        self.write_register(field.reg, new)
    }

    /// State of the pin mapped to the primary packet event (DIO0).
    fn primary_event(&mut self) -> Result<bool, Self::Error>;

    /// State of the pin mapped to the secondary packet event (DIO1).
    fn secondary_event(&mut self) -> Result<bool, Self::Error>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    type Error = T::Error;

    fn open(&mut self) -> Result<(), Self::Error> {
        T::open(self)
    }

    fn close(&mut self) -> Result<(), Self::Error> {
        T::close(self)
    }

    fn read_register(&mut self, reg: Register) -> Result<u8, Self::Error> {
        T::read_register(self, reg)
    }

    fn write_register(&mut self, reg: Register, value: u8) -> Result<(), Self::Error> {
        T::write_register(self, reg, value)
    }

    fn read_burst(&mut self, reg: Register, buf: &mut [u8]) -> Result<(), Self::Error> {
        T::read_burst(self, reg, buf)
    }

    fn write_burst(&mut self, reg: Register, data: &[u8]) -> Result<(), Self::Error> {
        T::write_burst(self, reg, data)
    }

    fn write_field(&mut self, field: Field, value: u8) -> Result<(), Self::Error> {
        T::write_field(self, field, value)
    }

    fn primary_event(&mut self) -> Result<bool, Self::Error> {
        T::primary_event(self)
    }

    fn secondary_event(&mut self) -> Result<bool, Self::Error> {
        T::secondary_event(self)
    }
}

/// SPI transport error
#[derive(PartialEq)]
pub enum BusError<E> {
    /// Event pin read failed.
    Pin,
    /// SPI transfer failed.
    Transfer(E),
}

impl<E: core::fmt::Debug> core::fmt::Debug for BusError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Pin => write!(f, "GPIO Error"),
            Self::Transfer(err) => write!(f, "SPI Error: {:?}", err),
        }
    }
}

/// Bus access over SPI with the two packet-event pins.
///
/// Single register access is `[addr | 0x80, value]` for writes and
/// `[addr & 0x7F]` followed by one read byte for reads; bursts keep the
/// chip selected and move N data bytes after the address byte.
pub struct SpiTransport<SPI, DIO0, DIO1> {
    spi: SPI,
    dio0: DIO0,
    dio1: DIO1,
}

impl<SPI, DIO0, DIO1> SpiTransport<SPI, DIO0, DIO1>
where
    SPI: spi::SpiDevice,
    DIO0: InputPin,
    DIO1: InputPin,
{
    pub fn new(spi: SPI, dio0: DIO0, dio1: DIO1) -> Self {
        Self { spi, dio0, dio1 }
    }

    /// Releases the SPI bus and event pins.
    pub fn release(self) -> (SPI, DIO0, DIO1) {
        (self.spi, self.dio0, self.dio1)
    }
}

impl<SPI, DIO0, DIO1> Transport for SpiTransport<SPI, DIO0, DIO1>
where
    SPI: spi::SpiDevice,
    DIO0: InputPin,
    DIO1: InputPin,
{
    type Error = BusError<SPI::Error>;

    fn read_register(&mut self, reg: Register) -> Result<u8, Self::Error> {
        let mut scratch = [0];
        self.spi
            .transaction(&mut [
                Operation::Write(&[reg.read()]),
                Operation::Read(&mut scratch),
            ])
            .map_err(BusError::Transfer)?;
        Ok(scratch[0])
    }

    fn write_register(&mut self, reg: Register, value: u8) -> Result<(), Self::Error> {
        self.spi
            .transaction(&mut [Operation::Write(&[reg.write(), value])])
            .map_err(BusError::Transfer)
    }

    fn read_burst(&mut self, reg: Register, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.spi
            .transaction(&mut [Operation::Write(&[reg.read()]), Operation::Read(buf)])
            .map_err(BusError::Transfer)
    }

    fn write_burst(&mut self, reg: Register, data: &[u8]) -> Result<(), Self::Error> {
        self.spi
            .transaction(&mut [Operation::Write(&[reg.write()]), Operation::Write(data)])
            .map_err(BusError::Transfer)
    }

    fn primary_event(&mut self) -> Result<bool, Self::Error> {
        self.dio0.is_high().map_err(|_| BusError::Pin)
    }

    fn secondary_event(&mut self) -> Result<bool, Self::Error> {
        self.dio1.is_high().map_err(|_| BusError::Pin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registers::fields;
    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State, Transaction as PinTransaction,
    };
    use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction as SpiTransaction};

    fn transport(
        spi: &[SpiTransaction<u8>],
        dio0: &[PinTransaction],
        dio1: &[PinTransaction],
    ) -> SpiTransport<SpiMock<u8>, PinMock, PinMock> {
        SpiTransport::new(SpiMock::new(spi), PinMock::new(dio0), PinMock::new(dio1))
    }

    fn done(transport: SpiTransport<SpiMock<u8>, PinMock, PinMock>) {
        let (mut spi, mut dio0, mut dio1) = transport.release();
        spi.done();
        dio0.done();
        dio1.done();
    }

    #[test]
    fn read_register_clears_wnr_bit() {
        let spi = [
            SpiTransaction::transaction_start(),
            SpiTransaction::write_vec(vec![Register::Version.read()]),
            SpiTransaction::read_vec(vec![0x24]),
            SpiTransaction::transaction_end(),
        ];
        let mut t = transport(&spi, &[], &[]);

        assert_eq!(t.read_register(Register::Version), Ok(0x24));

        done(t);
    }

    #[test]
    fn write_register_sets_wnr_bit() {
        let spi = [
            SpiTransaction::transaction_start(),
            SpiTransaction::write_vec(vec![Register::OpMode.write(), 0x04]),
            SpiTransaction::transaction_end(),
        ];
        let mut t = transport(&spi, &[], &[]);

        t.write_register(Register::OpMode, 0x04).unwrap();

        done(t);
    }

    #[test]
    fn burst_write_keeps_chip_selected() {
        let spi = [
            SpiTransaction::transaction_start(),
            SpiTransaction::write_vec(vec![Register::Fifo.write()]),
            SpiTransaction::write_vec(vec![0xDE, 0xAD, 0xBE, 0xEF]),
            SpiTransaction::transaction_end(),
        ];
        let mut t = transport(&spi, &[], &[]);

        t.write_burst(Register::Fifo, &[0xDE, 0xAD, 0xBE, 0xEF])
            .unwrap();

        done(t);
    }

    #[test]
    fn burst_read_fills_buffer() {
        let spi = [
            SpiTransaction::transaction_start(),
            SpiTransaction::write_vec(vec![Register::Fifo.read()]),
            SpiTransaction::read_vec(vec![0x01, 0x02, 0x03]),
            SpiTransaction::transaction_end(),
        ];
        let mut t = transport(&spi, &[], &[]);

        let mut buf = [0; 3];
        t.read_burst(Register::Fifo, &mut buf).unwrap();
        assert_eq!(buf, [0x01, 0x02, 0x03]);

        done(t);
    }

    #[test]
    fn write_field_touches_only_masked_bits() {
        let spi = [
            SpiTransaction::transaction_start(),
            SpiTransaction::write_vec(vec![Register::OpMode.read()]),
            SpiTransaction::read_vec(vec![0b0100_0100]),
            SpiTransaction::transaction_end(),
            SpiTransaction::transaction_start(),
            // mode bits swap 0x04 -> 0x10, bit 6 survives
            SpiTransaction::write_vec(vec![Register::OpMode.write(), 0b0101_0000]),
            SpiTransaction::transaction_end(),
        ];
        let mut t = transport(&spi, &[], &[]);

        t.write_field(fields::MODE, 0x10).unwrap();

        done(t);
    }

    #[test]
    fn event_pins_report_state() {
        let dio0 = [PinTransaction::get(State::High)];
        let dio1 = [PinTransaction::get(State::Low)];
        let mut t = transport(&[], &dio0, &dio1);

        assert_eq!(t.primary_event(), Ok(true));
        assert_eq!(t.secondary_event(), Ok(false));

        done(t);
    }
}
