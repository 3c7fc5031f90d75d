use crate::{Error, FeatureReport};
use scroll::{Pwrite, LE};
use std::time::Duration;

pub const USB_VENDOR_ID: u16 = 0x258a;
pub const USB_PRODUCT_ID: u16 = 0x000c;

/// Exact length of a firmware image, on file and on the device.
pub const FIRMWARE_SIZE: usize = 14 * 1024;

/// Data transfers move in blocks of this size.
pub const BLOCK_SIZE: usize = 2048;

/// A data frame is a report id, an opcode and one block.
pub const DATA_FRAME_SIZE: usize = BLOCK_SIZE + 2;

/// Command frames need room for the report id, the opcode and a 4 byte payload.
pub const MIN_REQUEST_SIZE: usize = 6;

pub const REPORT_ID_COMMAND: u8 = 0x05;
pub const REPORT_ID_DATA: u8 = 0x06;

pub const CMD_READ_SETUP: u8 = 0x52;
pub const CMD_WRITE_SETUP: u8 = 0x57;
pub const CMD_ERASE: u8 = 0x65;
pub const CMD_READ_DATA: u8 = 0x72;
pub const CMD_WRITE_DATA: u8 = 0x77;

/// Fill byte of the frame that erases the program area.
pub const ERASE_PROGRAM_FILL: u8 = 0x45;
/// Fill byte of the end-of-programming marker frame.
pub const END_PROGRAM_FILL: u8 = 0x55;

/// Flash settle time after every block transfer, read or write.
pub const BLOCK_SETTLE: Duration = Duration::from_millis(10);
/// Flash settle time after erasing the identity region.
pub const ERASE_SETTLE: Duration = Duration::from_millis(200);

/// Send a frame and require the device to accept all of it. A short transfer
/// leaves the controller in an unknown programming state, so it is an error,
/// never retried at this level.
pub fn xmit<T: FeatureReport>(d: &T, frame: &[u8]) -> Result<(), Error> {
    let sent = d.send_feature(frame)?;

    if sent != frame.len() {
        return Err(Error::Transfer);
    }

    Ok(())
}

/// Request a feature report into `frame` and require it to come back full
/// length. The report id and opcode must already be set in `frame`.
pub fn rx<T: FeatureReport>(d: &T, frame: &mut [u8]) -> Result<(), Error> {
    let received = d.get_feature(frame)?;

    if received != frame.len() {
        return Err(Error::Transfer);
    }

    Ok(())
}

/// Build a command frame of the configured request size: report id, opcode,
/// payload, zero padded to `request_size`.
pub fn command_frame(request_size: usize, opcode: u8, payload: &[u8]) -> Result<Vec<u8>, Error> {
    if request_size < MIN_REQUEST_SIZE || payload.len() + 2 > request_size {
        return Err(Error::Arguments);
    }

    let mut frame = vec![0_u8; request_size];
    frame[0] = REPORT_ID_COMMAND;
    frame[1] = opcode;
    frame[2..2 + payload.len()].copy_from_slice(payload);

    Ok(frame)
}

/// Build a read or write setup frame. The payload is two zero bytes followed
/// by the 16 bit data length, low byte first.
pub fn setup_frame(request_size: usize, opcode: u8, data_len: usize) -> Result<Vec<u8>, Error> {
    if data_len > usize::from(u16::max_value()) {
        return Err(Error::Arguments);
    }

    let mut payload = [0_u8; 4];
    payload.pwrite_with::<u16>(data_len as u16, 2, LE)?;

    command_frame(request_size, opcode, &payload)
}

/// Build a marker frame: every byte set to `fill` except the leading report id.
pub fn marker_frame(request_size: usize, fill: u8) -> Result<Vec<u8>, Error> {
    if request_size < MIN_REQUEST_SIZE {
        return Err(Error::Arguments);
    }

    let mut frame = vec![fill; request_size];
    frame[0] = REPORT_ID_COMMAND;

    Ok(frame)
}

impl From<scroll::Error> for Error {
    fn from(_err: scroll::Error) -> Self {
        Error::Parse
    }
}
