use bitflags::bitflags;

bitflags! {
    /// `IrqFlags1` register
    #[derive(Copy, Clone, Default, PartialEq, Debug)]
    pub struct IrqFlags1: u8 {
        const ModeReady = (1 << 7);
        const RxReady = (1 << 6);
        const TxReady = (1 << 5);
        const PllLock = (1 << 4);
        const Rssi = (1 << 3);
        const Timeout = (1 << 2);
        const AutoMode = (1 << 1);
        const SyncAddressMatch = 1;
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for IrqFlags1 {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "IrqFlags1 {{ 0b{0=0..8:08b} }}", self.bits())
    }
}

bitflags! {
    /// `IrqFlags2` register
    #[derive(Copy, Clone, Default, PartialEq, Debug)]
    pub struct IrqFlags2: u8 {
        const FifoFull = (1 << 7);
        const FifoNotEmpty = (1 << 6);
        const FifoLevel = (1 << 5);
        const FifoOverrun = (1 << 4);
        const PacketSent = (1 << 3);
        const PayloadReady = (1 << 2);
        const CrcOk = (1 << 1);
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for IrqFlags2 {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "IrqFlags2 {{ 0b{0=0..8:08b} }}", self.bits())
    }
}
