// Register addresses of the PN512, 6-bit (0x00..=0x3F). These are the raw
// addresses from the datasheet; the SPI address byte is derived by
// spi_read_address / spi_write_address.

// Command and Status Registers
pub const COMMAND_REG: u8 = 0x01;        // Starts and stops command execution; low nibble is the command
pub const COMM_IRQ_REG: u8 = 0x04;       // Interrupt request bits
pub const STATUS2_REG: u8 = 0x08;        // Receiver and transmitter status bits
pub const FIFO_DATA_REG: u8 = 0x09;      // FIFO data input/output
pub const FIFO_LEVEL_REG: u8 = 0x0A;     // Number of bytes in the FIFO buffer; high bit flushes it
pub const CONTROL_REG: u8 = 0x0C;        // Miscellaneous control bits, including initiator mode
pub const BIT_FRAMING_REG: u8 = 0x0D;    // Adjustments for bit-oriented frames; StartSend bit

// Communication Configuration
pub const MODE_REG: u8 = 0x11;           // Defines general modes for transmitting and receiving
pub const TX_CONTROL_REG: u8 = 0x14;     // Controls the logical behavior of the antenna driver pins TX1 and TX2
pub const TX_AUTO_REG: u8 = 0x15;        // Controls the setting of the transmission modulation

// CRC and Test Registers
pub const CRC_RESULT_REG_H: u8 = 0x21;   // CRC calculation result, MSB
pub const CRC_RESULT_REG_L: u8 = 0x22;   // CRC calculation result, LSB
pub const AUTO_TEST_REG: u8 = 0x36;      // Controls the self-test
pub const VERSION_REG: u8 = 0x37;        // Shows the software version

/// Address byte that starts an SPI register read. The high bit signals a
/// read; the 6-bit register address sits one bit up, low bit reserved zero.
pub fn spi_read_address(reg: u8) -> u8 {
    0x80 | ((reg & 0x3F) << 1)
}

/// Address byte that starts an SPI register write. High bit clear.
pub fn spi_write_address(reg: u8) -> u8 {
    (reg & 0x3F) << 1
}
