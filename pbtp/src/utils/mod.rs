use crate::command::FIRMWARE_SIZE;
use crate::{
    end_program, erase_program, read_firmware, write_firmware, write_identity, Error, FeatureReport,
};

/// Additional attempts after a first failed write or verify.
pub const RETRIES: u32 = 5;

///Run `op`, allowing `retries` additional attempts after a first failure.
///Short-circuits on the first success, returns the last error otherwise.
pub fn retry<F>(retries: u32, what: &str, mut op: F) -> Result<(), Error>
where
    F: FnMut() -> Result<(), Error>,
{
    let mut attempts_left = retries;

    loop {
        let err = match op() {
            Ok(()) => return Ok(()),
            Err(e) => e,
        };

        if attempts_left == 0 {
            return Err(err);
        }

        log::warn!(
            "Failed to {}: {:?}. Retrying... ({} attempts left)",
            what,
            err,
            attempts_left
        );
        attempts_left -= 1;
    }
}

/// Erase, write, verify and finalize a firmware image on an opened device.
///
/// The image length is checked before the device is touched. Write and
/// verify carry independent retry budgets of [`RETRIES`] additional attempts
/// each; a verify attempt reads the full image back and compares it byte for
/// byte, so a failed readback and a content mismatch both count against the
/// verify budget. After a clean verify the identity region is reprogrammed
/// and the end marker sent.
pub fn flash_firmware<T: FeatureReport>(
    d: &T,
    image: &[u8],
    request_size: usize,
) -> Result<(), Error> {
    if image.len() != FIRMWARE_SIZE {
        return Err(Error::Arguments);
    }

    erase_program(d, request_size)?;

    retry(RETRIES, "write firmware", || {
        write_firmware(d, image, request_size)
    })?;

    retry(RETRIES, "verify firmware", || {
        let mut readback = vec![0_u8; image.len()];
        read_firmware(d, &mut readback, request_size)?;

        if readback != image {
            log::warn!("Firmware read from device differs from written!");
            return Err(Error::Verification);
        }

        Ok(())
    })?;

    write_identity(d, request_size)?;

    end_program(d, request_size)
}

/// Read the full firmware image off an opened device.
pub fn dump_firmware<T: FeatureReport>(d: &T, request_size: usize) -> Result<Vec<u8>, Error> {
    let mut image = vec![0_u8; FIRMWARE_SIZE];
    read_firmware(d, &mut image, request_size)?;

    Ok(image)
}
