// Commands for the PN512. A command occupies the low nibble of COMMAND_REG.

/// Masks the command bits out of a COMMAND_REG value.
pub const COMMAND_MASK: u8 = 0b0000_1111;

pub const IDLE: u8 = 0b0000;               // no action, cancels current command execution
pub const CONFIGURE: u8 = 0b0001;          // configures the PN512 for FeliCa, MIFARE and NFCIP-1 communication
pub const GENERATE_RANDOM_ID: u8 = 0b0010; // generates a 10-byte random ID number
pub const CALC_CRC: u8 = 0b0011;           // activates the CRC coprocessor or performs a self test
pub const TRANSMIT: u8 = 0b0100;           // transmits data from the FIFO buffer
pub const NO_CMD_CHANGE: u8 = 0b0111;      // modifies CommandReg bits without affecting the command
pub const RECEIVE: u8 = 0b1000;            // activates the receiver circuits
pub const TRANSCEIVE: u8 = 0b1100;         // transmits from FIFO and activates the receiver after transmission
pub const AUTOCOLL: u8 = 0b1101;           // FeliCa polling and MIFARE anticollision (card operation mode)
pub const MF_AUTHENT: u8 = 0b1110;         // performs the MIFARE standard authentication as a reader
pub const SOFT_RESET: u8 = 0b1111;         // resets the PN512

// Card-side (PICC) frame bytes, pre-shifted for the 7-bit short frame format.
pub const PICC_REQA: u8 = 0x26 << 1;
pub const PICC_WUPA: u8 = 0x52 << 1;
