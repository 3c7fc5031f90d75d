use crate::command::{
    command_frame, rx, xmit, CMD_ERASE, CMD_READ_DATA, CMD_READ_SETUP, CMD_WRITE_DATA,
    CMD_WRITE_SETUP, ERASE_SETTLE,
};
use crate::{Error, FeatureReport};
use scroll::{Pread, Pwrite, BE};
use std::thread;

/// Address and length of the identity region in flash.
const IDENTITY_REGION: [u8; 4] = [0x80, 0xff, 0x08, 0x00];

/// Orientation flag stored alongside the serial number.
const SENSOR_ORIENTATION: u8 = 1;

///Vendor id, product id and serial number as stored in the identity region.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeviceIdentity {
    pub vendor_id: u16,
    pub product_id: u16,
    pub serial: u16,
}

///Read the identity region, then erase it and write the same triple back.
///The region does not survive a firmware write, so this runs after every
///flash to leave the device usable. Returns the recovered identity.
pub fn write_identity<T: FeatureReport>(d: &T, request_size: usize) -> Result<DeviceIdentity, Error> {
    // address the identity region
    xmit(d, &command_frame(request_size, CMD_READ_SETUP, &IDENTITY_REGION)?)?;

    let mut frame = command_frame(request_size, CMD_READ_DATA, &[])?;
    rx(d, &mut frame)?;
    let vendor_id = frame.pread_with::<u16>(2, BE)?;
    let product_id = frame.pread_with::<u16>(4, BE)?;

    // the serial number comes back on a second request of the same frame
    rx(d, &mut frame)?;
    let serial = frame.pread_with::<u16>(4, BE)?;

    let identity = DeviceIdentity {
        vendor_id,
        product_id,
        serial,
    };

    println!(
        "VID: {:04x} PID: {:04x} Serial: {:04x}",
        identity.vendor_id, identity.product_id, identity.serial
    );

    // erase the region; this is a real flash erase, give it time to settle
    xmit(
        d,
        &command_frame(request_size, CMD_ERASE, &[0xff, 0x00, 0x00, 0x00])?,
    )?;
    thread::sleep(ERASE_SETTLE);

    xmit(d, &command_frame(request_size, CMD_WRITE_SETUP, &IDENTITY_REGION)?)?;

    // vendor and product id, high byte first
    let mut payload = [0_u8; 4];
    let mut offset = 0;
    payload.gwrite_with::<u16>(identity.vendor_id, &mut offset, BE)?;
    payload.gwrite_with::<u16>(identity.product_id, &mut offset, BE)?;
    xmit(d, &command_frame(request_size, CMD_WRITE_DATA, &payload)?)?;

    // orientation flag, reserved byte, then the serial number
    let mut payload = [0_u8; 4];
    payload[0] = SENSOR_ORIENTATION;
    payload.pwrite_with::<u16>(identity.serial, 2, BE)?;
    xmit(d, &command_frame(request_size, CMD_WRITE_DATA, &payload)?)?;

    Ok(identity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockDevice;
    use std::cell::{Cell, RefCell};

    #[test]
    fn reads_triple_and_writes_it_back() {
        let frames: RefCell<Vec<Vec<u8>>> = RefCell::new(Vec::new());
        let reads = Cell::new(0_usize);

        let d = MockDevice {
            sender: |data: &[u8]| {
                frames.borrow_mut().push(data.to_vec());
                data.len()
            },
            getter: |buf: &mut [u8]| {
                assert_eq!(buf.len(), 8);
                match reads.get() {
                    0 => {
                        // vendor 0x258a, product 0x000c
                        buf[2] = 0x25;
                        buf[3] = 0x8a;
                        buf[4] = 0x00;
                        buf[5] = 0x0c;
                    }
                    1 => {
                        // serial 0x1234
                        buf[4] = 0x12;
                        buf[5] = 0x34;
                    }
                    _ => panic!("unexpected read"),
                }
                reads.set(reads.get() + 1);
                buf.len()
            },
        };

        let identity = write_identity(&d, 8).unwrap();
        assert_eq!(
            identity,
            DeviceIdentity {
                vendor_id: 0x258a,
                product_id: 0x000c,
                serial: 0x1234,
            }
        );

        drop(d);
        let frames = frames.into_inner();
        assert_eq!(frames.len(), 5);

        assert_eq!(frames[0], vec![0x05, 0x52, 0x80, 0xff, 0x08, 0x00, 0x00, 0x00]);
        assert_eq!(frames[1], vec![0x05, 0x65, 0xff, 0x00, 0x00, 0x00, 0x00, 0x00]);
        assert_eq!(frames[2], vec![0x05, 0x57, 0x80, 0xff, 0x08, 0x00, 0x00, 0x00]);
        assert_eq!(frames[3], vec![0x05, 0x77, 0x25, 0x8a, 0x00, 0x0c, 0x00, 0x00]);
        assert_eq!(frames[4], vec![0x05, 0x77, 0x01, 0x00, 0x12, 0x34, 0x00, 0x00]);
    }

    #[test]
    fn short_identity_read_aborts() {
        let d = MockDevice {
            sender: |data: &[u8]| data.len(),
            getter: |buf: &mut [u8]| buf.len() - 1,
        };

        assert_eq!(write_identity(&d, 8), Err(Error::Transfer));
    }
}
