use crate::command::{
    rx, setup_frame, xmit, BLOCK_SETTLE, BLOCK_SIZE, CMD_READ_DATA, CMD_READ_SETUP,
    DATA_FRAME_SIZE, REPORT_ID_DATA,
};
use crate::{Error, FeatureReport};
use std::thread;

///Fill `data` from the device in 2048 byte blocks. The buffer length selects
///how much is read and must be a multiple of the block size. Aborts on the
///first short transfer, no internal retry.
pub fn read_firmware<T: FeatureReport>(
    d: &T,
    data: &mut [u8],
    request_size: usize,
) -> Result<(), Error> {
    if data.is_empty() || data.len() % BLOCK_SIZE != 0 {
        return Err(Error::Arguments);
    }

    let setup = setup_frame(request_size, CMD_READ_SETUP, data.len())?;
    xmit(d, &setup)?;

    for block in data.chunks_mut(BLOCK_SIZE) {
        let mut frame = [0_u8; DATA_FRAME_SIZE];
        frame[0] = REPORT_ID_DATA;
        frame[1] = CMD_READ_DATA;

        rx(d, &mut frame)?;
        thread::sleep(BLOCK_SETTLE);

        block.copy_from_slice(&frame[2..]);
    }

    Ok(())
}
