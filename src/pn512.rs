use embedded_hal::delay::DelayNs;
use embedded_hal::spi::SpiDevice;

use crate::commands;
use crate::errors::Error;
use crate::registers::*;

/// Capacity of the driver's scratch buffers. The largest single bus transfer
/// is one address byte plus `BUFFER_SIZE - 1` payload bytes.
pub const BUFFER_SIZE: usize = 256;

const AUTO_TEST_ENABLE_SELF_TEST: u8 = 0x09;
const INITIATOR_BIT: u8 = 0b0001_0000;
const TX1_TX2_RF_ENABLE: u8 = 0b1000_0010;
const FIFO_FLUSH: u8 = 0b1000_0000;
const TX_LAST_BITS_7: u8 = 0b0000_0111;
const START_SEND: u8 = 0b1000_0000;
const ALL_IRQ_FLAGS: u8 = 0b0111_1111;
const RX_AND_IDLE_IRQ: u8 = 0b0011_0000;
const MODEM_STATE_MASK: u8 = 0b0000_0111;
const MODE_CRC_PRESET_MASK: u8 = 0b0000_0011;

const CRC_TEST_PAYLOAD: &[u8] = b"Hello, world!";
const CRC_TEST_EXPECTED: [u8; 2] = [0xD1, 0x5E]; // CRC-16 (KERMIT)

/// ATQA a MIFARE card answers the wake-up probe with.
const ATQA_MIFARE: [u8; 2] = [0x44, 0x00];

/// Result block the chip's diagnostic firmware leaves in the FIFO after a
/// successful self-test.
const SELF_TEST_EXPECTED: [u8; 64] = [
    0x00, 0xEB, 0x66, 0xBA, 0x57, 0xBF, 0x23, 0x95,
    0xD0, 0xE3, 0x0D, 0x3D, 0x27, 0x89, 0x5C, 0xDE,
    0x9D, 0x3B, 0xA7, 0x00, 0x21, 0x5B, 0x89, 0x82,
    0x51, 0x3A, 0xEB, 0x02, 0x0C, 0xA5, 0x00, 0x49,
    0x7C, 0x84, 0x4D, 0xB3, 0xCC, 0xD2, 0x1B, 0x81,
    0x5D, 0x48, 0x76, 0xD5, 0x71, 0x61, 0x21, 0xA9,
    0x86, 0x96, 0x83, 0x38, 0xCF, 0x9D, 0x5B, 0x6D,
    0xDC, 0x15, 0xBA, 0x3E, 0x7D, 0x95, 0x3B, 0x2F,
];

/// PN512 driver over an already-configured SPI device.
///
/// All methods are blocking and take `&mut self`; one operation is in flight
/// per instance at a time, enforced by the borrow. The two scratch buffers
/// are overwritten on every call and never handed out by reference.
pub struct Pn512<SPI, D> {
    spi: SPI,
    delay: D,
    tx_buf: [u8; BUFFER_SIZE],
    rx_buf: [u8; BUFFER_SIZE],
    poll_limit: Option<u32>,
}

impl<SPI, D> Pn512<SPI, D>
where
    SPI: SpiDevice<u8>,
    D: DelayNs,
{
    pub fn new(spi: SPI, delay: D) -> Self {
        Pn512 {
            spi,
            delay,
            tx_buf: [0; BUFFER_SIZE],
            rx_buf: [0; BUFFER_SIZE],
            poll_limit: None,
        }
    }

    /// Bounds both polling loops at `polls` status reads, after which they
    /// fail with [`Error::Timeout`]. The default is to wait forever, which
    /// matches the chip manual's sequences but hangs the calling thread if
    /// the chip never signals completion.
    pub fn with_poll_limit(mut self, polls: u32) -> Self {
        self.poll_limit = Some(polls);
        self
    }

    /// Consumes the driver and hands the SPI device and delay source back to
    /// the host for release.
    pub fn close(self) -> (SPI, D) {
        (self.spi, self.delay)
    }

    pub fn write_register(&mut self, reg: u8, value: u8) -> Result<(), Error<SPI::Error>> {
        self.tx_buf[0] = spi_write_address(reg);
        self.tx_buf[1] = value;
        self.spi.write(&self.tx_buf[..2]).map_err(Error::Spi)
    }

    /// Reads one register. The chip pipelines SPI responses, so the byte
    /// clocked out during the address phase belongs to the previous transfer;
    /// only the second received byte carries the register value.
    pub fn read_register(&mut self, reg: u8) -> Result<u8, Error<SPI::Error>> {
        self.tx_buf[0] = spi_read_address(reg);
        self.tx_buf[1] = 0x00;
        self.spi
            .transfer(&mut self.rx_buf[..2], &self.tx_buf[..2])
            .map_err(Error::Spi)?;
        Ok(self.rx_buf[1])
    }

    /// Streams `data` into a register as one transfer. The payload must be
    /// shorter than [`BUFFER_SIZE`]; one buffer byte is reserved for the
    /// address.
    pub fn write_data(&mut self, reg: u8, data: &[u8]) -> Result<(), Error<SPI::Error>> {
        if data.len() >= BUFFER_SIZE {
            return Err(Error::NoRoom);
        }
        self.tx_buf[0] = spi_write_address(reg);
        self.tx_buf[1..=data.len()].copy_from_slice(data);
        self.spi
            .write(&self.tx_buf[..data.len() + 1])
            .map_err(Error::Spi)
    }

    /// Streams `out.len()` bytes out of a register as one transfer. The chip
    /// advances its internal pointer on each address byte it receives, so the
    /// request repeats the read address once per byte with a trailing zero to
    /// clock out the final value; the first received byte is pipeline residue
    /// and is discarded.
    pub fn read_data(&mut self, reg: u8, out: &mut [u8]) -> Result<(), Error<SPI::Error>> {
        let len = out.len();
        if len >= BUFFER_SIZE {
            return Err(Error::NoRoom);
        }
        self.tx_buf[..len].fill(spi_read_address(reg));
        self.tx_buf[len] = 0x00;
        self.spi
            .transfer(&mut self.rx_buf[..len + 1], &self.tx_buf[..len + 1])
            .map_err(Error::Spi)?;
        out.copy_from_slice(&self.rx_buf[1..len + 1]);
        Ok(())
    }

    pub fn write_fifo(&mut self, data: &[u8]) -> Result<(), Error<SPI::Error>> {
        self.write_data(FIFO_DATA_REG, data)
    }

    pub fn read_fifo(&mut self, out: &mut [u8]) -> Result<(), Error<SPI::Error>> {
        self.read_data(FIFO_DATA_REG, out)
    }

    pub fn write_command(&mut self, command: u8) -> Result<(), Error<SPI::Error>> {
        self.write_register(COMMAND_REG, command)
    }

    /// Polls the command register until the active command is Idle again.
    /// Sleeps 1 ms between reads.
    pub fn wait_for_idle(&mut self) -> Result<(), Error<SPI::Error>> {
        let mut polls = 0u32;
        loop {
            self.delay.delay_ms(1);
            let command = self.read_register(COMMAND_REG)? & commands::COMMAND_MASK;
            if command == commands::IDLE {
                return Ok(());
            }
            polls += 1;
            if self.poll_limit.is_some_and(|limit| polls >= limit) {
                return Err(Error::Timeout);
            }
        }
    }

    /// Polls the interrupt flags until both the receive-complete and idle
    /// bits are set. Transceive completion is signaled here, not by the
    /// command register, which keeps showing Transceive.
    pub fn wait_for_transceive_complete(&mut self) -> Result<(), Error<SPI::Error>> {
        let mut polls = 0u32;
        loop {
            self.delay.delay_ms(1);
            let irq = self.read_register(COMM_IRQ_REG)?;
            if irq & RX_AND_IDLE_IRQ == RX_AND_IDLE_IRQ {
                return Ok(());
            }
            polls += 1;
            if self.poll_limit.is_some_and(|limit| polls >= limit) {
                return Err(Error::Timeout);
            }
        }
    }

    /// Polls the status register until the modem state machine is idle.
    pub fn wait_for_modem_idle(&mut self) -> Result<(), Error<SPI::Error>> {
        let mut polls = 0u32;
        loop {
            self.delay.delay_ms(1);
            let status = self.read_register(STATUS2_REG)?;
            if status & MODEM_STATE_MASK == 0 {
                return Ok(());
            }
            polls += 1;
            if self.poll_limit.is_some_and(|limit| polls >= limit) {
                return Err(Error::Timeout);
            }
        }
    }

    pub fn soft_reset(&mut self) -> Result<(), Error<SPI::Error>> {
        self.write_command(commands::SOFT_RESET)
    }

    /// Reads the chip's software version register.
    pub fn version(&mut self) -> Result<u8, Error<SPI::Error>> {
        self.read_register(VERSION_REG)
    }

    /// Runs the chip's digital self-test according to the instructions in the
    /// manual. Returns `true` if the 64-byte result block matches the
    /// documented signature.
    pub fn self_test(&mut self) -> Result<bool, Error<SPI::Error>> {
        self.soft_reset()?;

        // Clear the internal buffer by writing 25 bytes of 00h, then run the
        // Config command.
        self.write_fifo(&[0x00; 25])?;
        self.write_command(commands::CONFIGURE)?;
        self.wait_for_idle()?;

        // Enable the self-test.
        self.write_register(AUTO_TEST_REG, AUTO_TEST_ENABLE_SELF_TEST)?;

        // With the self-test enabled, CalcCRC runs the test once a byte is
        // in the FIFO.
        self.write_fifo(&[0x00])?;
        self.write_command(commands::CALC_CRC)?;
        self.wait_for_idle()?;

        let mut result = [0u8; SELF_TEST_EXPECTED.len()];
        self.read_fifo(&mut result)?;
        Ok(result == SELF_TEST_EXPECTED)
    }

    /// Exercises the CRC coprocessor over a fixed payload and checks the
    /// result against the known CRC-16 value.
    pub fn test_crc(&mut self) -> Result<bool, Error<SPI::Error>> {
        self.soft_reset()?;

        // CRC preset value 0x0000.
        let mode = self.read_register(MODE_REG)?;
        self.write_register(MODE_REG, mode & !MODE_CRC_PRESET_MASK)?;
        self.write_command(commands::CALC_CRC)?;

        self.write_fifo(CRC_TEST_PAYLOAD)?;

        let mut crc = [0u8; 2];
        crc[0] = self.read_register(CRC_RESULT_REG_H)?;
        crc[1] = self.read_register(CRC_RESULT_REG_L)?;

        // Leave CRC mode.
        self.write_command(commands::IDLE)?;

        Ok(crc == CRC_TEST_EXPECTED)
    }

    /// Sends a WUPA frame and checks the answer against the MIFARE ATQA.
    /// Returns `true` if a card woke up and answered as expected.
    pub fn try_activate_card(&mut self) -> Result<bool, Error<SPI::Error>> {
        // Writing NoCmdChange clears the RcvOff and PowerDown bits without
        // disturbing the active command, re-arming the receiver.
        self.write_register(COMMAND_REG, commands::NO_CMD_CHANGE)?;

        // Initiator mode.
        let control = self.read_register(CONTROL_REG)?;
        self.write_register(CONTROL_REG, control | INITIATOR_BIT)?;

        // RF field on, both antenna drivers.
        self.write_register(TX_CONTROL_REG, TX1_TX2_RF_ENABLE)?;

        self.flush_fifo()?;

        // WUPA is a 7-bit command, so set the framing params.
        let framing = self.read_register(BIT_FRAMING_REG)?;
        self.write_register(BIT_FRAMING_REG, framing | TX_LAST_BITS_7)?;

        self.write_fifo(&[commands::PICC_WUPA])?;

        self.clear_all_interrupt_flags()?;

        self.write_command(commands::TRANSCEIVE)?;

        // StartSend has no effect until Transceive is active, so it is set
        // last.
        let framing = self.read_register(BIT_FRAMING_REG)?;
        self.write_register(BIT_FRAMING_REG, framing | START_SEND)?;

        self.wait_for_transceive_complete()?;

        // Cancel Transceive so the chip does not drop back into receive
        // mode after this exchange.
        self.write_command(commands::IDLE)?;

        let mut atqa = [0u8; 2];
        self.read_fifo(&mut atqa)?;
        Ok(atqa == ATQA_MIFARE)
    }

    fn flush_fifo(&mut self) -> Result<(), Error<SPI::Error>> {
        self.write_register(FIFO_LEVEL_REG, FIFO_FLUSH)
    }

    fn clear_all_interrupt_flags(&mut self) -> Result<(), Error<SPI::Error>> {
        self.write_register(COMM_IRQ_REG, ALL_IRQ_FLAGS)
    }
}
