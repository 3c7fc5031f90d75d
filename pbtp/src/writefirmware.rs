use crate::command::{
    setup_frame, xmit, BLOCK_SETTLE, BLOCK_SIZE, CMD_WRITE_DATA, CMD_WRITE_SETUP, DATA_FRAME_SIZE,
    REPORT_ID_DATA,
};
use crate::{Error, FeatureReport};
use std::thread;

///Transmit `data` to the device in 2048 byte blocks. The length must be a
///multiple of the block size. Aborts on the first short transfer, no
///internal retry.
pub fn write_firmware<T: FeatureReport>(
    d: &T,
    data: &[u8],
    request_size: usize,
) -> Result<(), Error> {
    if data.is_empty() || data.len() % BLOCK_SIZE != 0 {
        return Err(Error::Arguments);
    }

    let setup = setup_frame(request_size, CMD_WRITE_SETUP, data.len())?;
    xmit(d, &setup)?;

    for (i, block) in data.chunks(BLOCK_SIZE).enumerate() {
        xmit(d, &data_frame(block, i == 0))?;
        thread::sleep(BLOCK_SETTLE);
    }

    // The stock updater replays the setup command and block 0 once the whole
    // image has streamed out, and always zeroes the first payload byte of
    // block 0. Unexplained controller behaviour, kept as-is.
    xmit(d, &setup)?;
    xmit(d, &data_frame(&data[..BLOCK_SIZE], true))?;
    thread::sleep(BLOCK_SETTLE);

    Ok(())
}

fn data_frame(block: &[u8], first: bool) -> Vec<u8> {
    let mut frame = vec![0_u8; DATA_FRAME_SIZE];
    frame[0] = REPORT_ID_DATA;
    frame[1] = CMD_WRITE_DATA;
    frame[2..].copy_from_slice(block);

    if first {
        frame[2] = 0x00;
    }

    frame
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockDevice;
    use std::cell::RefCell;

    #[test]
    fn blocks_then_setup_and_block_zero_again() {
        let frames: RefCell<Vec<Vec<u8>>> = RefCell::new(Vec::new());
        let d = MockDevice {
            sender: |data: &[u8]| {
                frames.borrow_mut().push(data.to_vec());
                data.len()
            },
            getter: |_: &mut [u8]| panic!("no read expected"),
        };

        let mut data = vec![0xaa_u8; 2 * BLOCK_SIZE];
        data[0] = 0x17;
        write_firmware(&d, &data, 8).unwrap();

        drop(d);
        let frames = frames.into_inner();
        assert_eq!(frames.len(), 5);

        // setup carries the length, low byte first
        assert_eq!(frames[0], vec![0x05, 0x57, 0x00, 0x00, 0x00, 0x10, 0x00, 0x00]);
        assert_eq!(frames[3], frames[0]);

        // block 0 goes out with its first payload byte forced to zero
        assert_eq!(&frames[1][..3], &[0x06, 0x77, 0x00]);
        assert_eq!(&frames[1][3..], &data[1..BLOCK_SIZE]);
        assert_eq!(frames[4], frames[1]);

        // block 1 is verbatim
        assert_eq!(&frames[2][..2], &[0x06, 0x77]);
        assert_eq!(&frames[2][2..], &data[BLOCK_SIZE..]);
    }

    #[test]
    fn short_transfer_aborts() {
        let sends = RefCell::new(0_usize);

        let d = MockDevice {
            sender: |data: &[u8]| {
                let mut sends = sends.borrow_mut();
                *sends += 1;
                // accept the setup and block 0, truncate block 1
                if *sends == 3 {
                    data.len() - 1
                } else {
                    data.len()
                }
            },
            getter: |_: &mut [u8]| panic!("no read expected"),
        };

        let data = vec![0_u8; 2 * BLOCK_SIZE];
        assert_eq!(write_firmware(&d, &data, 8), Err(Error::Transfer));
        assert_eq!(*sends.borrow(), 3);
    }

    #[test]
    fn rejects_unaligned_length() {
        let d = MockDevice {
            sender: |_: &[u8]| panic!("no transfer expected"),
            getter: |_: &mut [u8]| panic!("no transfer expected"),
        };

        assert_eq!(write_firmware(&d, &[0_u8; 100], 8), Err(Error::Arguments));
        assert_eq!(write_firmware(&d, &[], 8), Err(Error::Arguments));
    }
}
