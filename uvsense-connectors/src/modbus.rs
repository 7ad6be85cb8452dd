//! Modbus RTU adapter
//!
//! ## Frames
//!
//! The sensor answers "read input registers" (function 0x04) on a 9600 8N1
//! serial line. One 16-bit register per word requested:
//!
//! ```text
//! request:   unit | 0x04 | start hi | start lo | count hi | count lo | crc lo | crc hi
//! response:  unit | 0x04 | byte count | data (2 × count, big-endian) | crc lo | crc hi
//! exception: unit | 0x84 | code | crc lo | crc hi
//! ```
//!
//! The device address doubles as the unit id. The CRC is CRC-16/MODBUS
//! (reflected polynomial 0xA001, initial value 0xFFFF), sent low byte first.
//!
//! ## Timeouts
//!
//! `embedded-io` has no notion of time; the serial implementation's own read
//! timeout ends a silent exchange, which surfaces as an unexpected end of
//! frame and maps to `TransportError::Timeout`.

use embedded_io::{Read, ReadExactError, Write};
use heapless::Vec;
use thiserror::Error;
use uvsense_core::{Transport, TransportError};

/// Read input registers
pub const READ_INPUT_REGISTERS: u8 = 0x04;

/// Set on the function code of an exception response
pub const EXCEPTION_FLAG: u8 = 0x80;

/// Largest register count in one request
pub const MAX_REGISTERS: usize = 125;

const MAX_FRAME: usize = 3 + 2 * MAX_REGISTERS + 2;

/// Modbus exchange failures
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModbusError {
    /// The serial port failed
    #[error("serial I/O failure: {0:?}")]
    Io(embedded_io::ErrorKind),

    /// The response ended early or never came
    #[error("response ended early")]
    UnexpectedEof,

    /// Response CRC does not match its contents
    #[error("CRC mismatch: computed {computed:#06X}, received {received:#06X}")]
    Crc {
        /// CRC of the received bytes
        computed: u16,
        /// CRC carried by the frame
        received: u16,
    },

    /// Response came from another unit
    #[error("response from unit {actual}, expected {expected}")]
    UnitMismatch {
        /// Unit addressed
        expected: u8,
        /// Unit that answered
        actual: u8,
    },

    /// Response function code is not the one requested
    #[error("unexpected function code {0:#04X}")]
    UnexpectedFunction(u8),

    /// Response byte count disagrees with the request
    #[error("byte count {actual}, expected {expected}")]
    ByteCount {
        /// Bytes requested
        expected: usize,
        /// Bytes announced
        actual: usize,
    },

    /// The device answered with an exception
    #[error("device exception {0}")]
    Exception(u8),

    /// Request covers more registers than one frame can carry
    #[error("request too large")]
    TooLarge,
}

impl From<ModbusError> for TransportError {
    fn from(err: ModbusError) -> Self {
        match err {
            ModbusError::Io(_) => TransportError::Io,
            ModbusError::UnexpectedEof => TransportError::Timeout,
            ModbusError::Crc { .. } => TransportError::Corrupted { reason: "crc mismatch" },
            ModbusError::UnitMismatch { .. } => TransportError::Corrupted {
                reason: "unit id mismatch",
            },
            ModbusError::UnexpectedFunction(_) => TransportError::Corrupted {
                reason: "unexpected function code",
            },
            ModbusError::ByteCount { expected, actual } => {
                TransportError::ShortRead { expected, actual }
            }
            ModbusError::Exception(code) => TransportError::DeviceException { code },
            ModbusError::TooLarge => TransportError::Corrupted {
                reason: "request too large",
            },
        }
    }
}

fn io_error<E: embedded_io::Error>(err: E) -> ModbusError {
    ModbusError::Io(err.kind())
}

fn read_error<E: embedded_io::Error>(err: ReadExactError<E>) -> ModbusError {
    match err {
        ReadExactError::UnexpectedEof => ModbusError::UnexpectedEof,
        ReadExactError::Other(err) => io_error(err),
    }
}

/// CRC-16/MODBUS over `bytes`
pub fn crc16(bytes: &[u8]) -> u16 {
    let mut crc: u16 = 0xFFFF;
    for &byte in bytes {
        crc ^= u16::from(byte);
        for _ in 0..8 {
            crc = if crc & 1 != 0 { (crc >> 1) ^ 0xA001 } else { crc >> 1 };
        }
    }
    crc
}

/// Build a "read input registers" request
pub fn read_request(unit: u8, start: u16, count: u16) -> [u8; 8] {
    let [start_hi, start_lo] = start.to_be_bytes();
    let [count_hi, count_lo] = count.to_be_bytes();
    let mut frame = [unit, READ_INPUT_REGISTERS, start_hi, start_lo, count_hi, count_lo, 0, 0];
    let [crc_lo, crc_hi] = crc16(&frame[..6]).to_le_bytes();
    frame[6] = crc_lo;
    frame[7] = crc_hi;
    frame
}

fn check_crc(frame: &[u8]) -> Result<(), ModbusError> {
    let (body, tail) = frame.split_at(frame.len() - 2);
    let received = u16::from_le_bytes([tail[0], tail[1]]);
    let computed = crc16(body);
    if computed == received {
        Ok(())
    } else {
        Err(ModbusError::Crc { computed, received })
    }
}

/// Modbus RTU master on one serial port, serving one bus number
pub struct ModbusTransport<S> {
    serial: S,
    bus: u8,
}

impl<S: Read + Write> ModbusTransport<S> {
    /// Master on `serial`, answering as bus `bus`
    pub fn new(serial: S, bus: u8) -> Self {
        Self { serial, bus }
    }

    /// Give the serial port back
    pub fn release(self) -> S {
        self.serial
    }

    /// Read `count` input registers starting at `start` from `unit`.
    ///
    /// Returns the register data bytes, big-endian per register.
    pub fn read_input_registers(
        &mut self,
        unit: u8,
        start: u16,
        count: u16,
    ) -> Result<Vec<u8, MAX_FRAME>, ModbusError> {
        if count == 0 || usize::from(count) > MAX_REGISTERS {
            return Err(ModbusError::TooLarge);
        }

        let request = read_request(unit, start, count);
        self.serial.write_all(&request).map_err(io_error)?;
        self.serial.flush().map_err(io_error)?;

        let mut frame: Vec<u8, MAX_FRAME> = Vec::new();
        let mut header = [0u8; 3];
        self.serial.read_exact(&mut header).map_err(read_error)?;
        frame.extend_from_slice(&header).map_err(|_| ModbusError::TooLarge)?;

        let [answered_unit, function, third] = header;
        if function == READ_INPUT_REGISTERS | EXCEPTION_FLAG {
            let mut crc = [0u8; 2];
            self.serial.read_exact(&mut crc).map_err(read_error)?;
            frame.extend_from_slice(&crc).map_err(|_| ModbusError::TooLarge)?;
            check_crc(&frame)?;
            return Err(ModbusError::Exception(third));
        }

        let expected = 2 * usize::from(count);
        let announced = usize::from(third);
        if announced > expected {
            return Err(ModbusError::ByteCount {
                expected,
                actual: announced,
            });
        }

        let mut rest = [0u8; 2 * MAX_REGISTERS + 2];
        let rest = &mut rest[..announced + 2];
        self.serial.read_exact(rest).map_err(read_error)?;
        frame.extend_from_slice(rest).map_err(|_| ModbusError::TooLarge)?;
        check_crc(&frame)?;

        if answered_unit != unit {
            return Err(ModbusError::UnitMismatch {
                expected: unit,
                actual: answered_unit,
            });
        }
        if function != READ_INPUT_REGISTERS {
            return Err(ModbusError::UnexpectedFunction(function));
        }
        if announced != expected {
            return Err(ModbusError::ByteCount {
                expected,
                actual: announced,
            });
        }

        let mut data = Vec::new();
        data.extend_from_slice(&frame[3..3 + announced])
            .map_err(|_| ModbusError::TooLarge)?;
        Ok(data)
    }
}

impl<S: Read + Write> Transport for ModbusTransport<S> {
    fn read_block(
        &mut self,
        bus: u8,
        address: u8,
        register: u8,
        buf: &mut [u8],
    ) -> Result<usize, TransportError> {
        if bus != self.bus {
            return Err(TransportError::BusUnavailable { bus });
        }
        let count = u16::try_from(buf.len().div_ceil(2)).map_err(|_| ModbusError::TooLarge)?;
        let data = self.read_input_registers(address, u16::from(register), count)?;
        let n = data.len().min(buf.len());
        buf[..n].copy_from_slice(&data[..n]);
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Serial line replaying a canned response and capturing writes
    struct Line {
        response: VecDeque<u8>,
        written: std::vec::Vec<u8>,
    }

    impl Line {
        fn answering(response: &[u8]) -> Self {
            Self {
                response: response.iter().copied().collect(),
                written: std::vec::Vec::new(),
            }
        }
    }

    impl embedded_io::ErrorType for Line {
        type Error = embedded_io::ErrorKind;
    }

    impl Read for Line {
        fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
            let mut n = 0;
            while n < buf.len() {
                match self.response.pop_front() {
                    Some(byte) => {
                        buf[n] = byte;
                        n += 1;
                    }
                    None => break,
                }
            }
            Ok(n)
        }
    }

    impl Write for Line {
        fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    fn with_crc(body: &[u8]) -> std::vec::Vec<u8> {
        let mut frame = body.to_vec();
        frame.extend_from_slice(&crc16(body).to_le_bytes());
        frame
    }

    #[test]
    fn crc_matches_reference_frame() {
        // Well-known "read holding register 0 of unit 1" frame
        assert_eq!(crc16(&[0x01, 0x03, 0x00, 0x00, 0x00, 0x01]).to_le_bytes(), [0x84, 0x0A]);

        // A frame followed by its own CRC leaves no residue
        let frame = read_request(0x23, 0x0006, 1);
        assert_eq!(crc16(&frame), 0);
    }

    #[test]
    fn request_layout() {
        let frame = read_request(0x23, 0x0007, 1);
        assert_eq!(&frame[..6], &[0x23, 0x04, 0x00, 0x07, 0x00, 0x01]);
    }

    #[test]
    fn reads_register_big_endian() {
        let response = with_crc(&[0x23, 0x04, 0x02, 0x01, 0x2C]);
        let mut modbus = ModbusTransport::new(Line::answering(&response), 0);

        let mut buf = [0u8; 2];
        assert_eq!(modbus.read_block(0, 0x23, 0x06, &mut buf), Ok(2));
        assert_eq!(u16::from_be_bytes(buf), 300);

        let line = modbus.release();
        assert_eq!(line.written, read_request(0x23, 0x06, 1));
    }

    #[test]
    fn exception_response() {
        let response = with_crc(&[0x23, 0x84, 0x02]);
        let mut modbus = ModbusTransport::new(Line::answering(&response), 0);
        assert_eq!(
            modbus.read_input_registers(0x23, 0x06, 1),
            Err(ModbusError::Exception(2))
        );

        let response = with_crc(&[0x23, 0x84, 0x02]);
        let mut modbus = ModbusTransport::new(Line::answering(&response), 0);
        let mut buf = [0u8; 2];
        assert_eq!(
            modbus.read_block(0, 0x23, 0x06, &mut buf),
            Err(TransportError::DeviceException { code: 2 })
        );
    }

    #[test]
    fn corrupted_response_is_rejected() {
        let mut response = with_crc(&[0x23, 0x04, 0x02, 0x01, 0x2C]);
        response[4] ^= 0x01;
        let mut modbus = ModbusTransport::new(Line::answering(&response), 0);
        assert!(matches!(
            modbus.read_input_registers(0x23, 0x06, 1),
            Err(ModbusError::Crc { .. })
        ));
    }

    #[test]
    fn wrong_unit_is_rejected() {
        let response = with_crc(&[0x38, 0x04, 0x02, 0x01, 0x2C]);
        let mut modbus = ModbusTransport::new(Line::answering(&response), 0);
        assert_eq!(
            modbus.read_input_registers(0x23, 0x06, 1),
            Err(ModbusError::UnitMismatch { expected: 0x23, actual: 0x38 })
        );
    }

    #[test]
    fn silence_is_a_timeout() {
        let mut modbus = ModbusTransport::new(Line::answering(&[]), 0);
        let mut buf = [0u8; 2];
        assert_eq!(modbus.read_block(0, 0x23, 0x00, &mut buf), Err(TransportError::Timeout));
        assert_eq!(
            modbus.read_block(1, 0x23, 0x00, &mut buf),
            Err(TransportError::BusUnavailable { bus: 1 })
        );
    }
}
