///Framing helpers, frame constants and error conversions for the protocol.
mod command;
pub use command::*;

///Pull the firmware image off the device in fixed size blocks.
mod readfirmware;
pub use readfirmware::*;

///Push a firmware image onto the device in fixed size blocks. Block 0 is replayed at the end of the stream.
mod writefirmware;
pub use writefirmware::*;

///Read the vendor id, product id and serial number and rewrite them into a freshly erased identity region.
mod writeidentity;
pub use writeidentity::*;

///Erase the first seven pages of program flash ahead of a write.
mod eraseprogram;
pub use eraseprogram::*;

///Leave programming mode once the image and identity are in place.
mod endprogram;
pub use endprogram::*;

/// Closure backed stand-in device for exercising the protocol off hardware.
pub mod mock;
pub use mock::*;

/// Erase/write/verify/finalize sequencing and the retry policy around it.
pub mod utils;

#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    Arguments,
    Parse,
    Transfer,
    Transmission,
    Verification,
}

///trait to implement HID feature report devices
pub trait FeatureReport {
    fn send_feature(&self, data: &[u8]) -> Result<usize, Error>;
    fn get_feature(&self, buf: &mut [u8]) -> Result<usize, Error>;
}

#[cfg(feature = "hidapi")]
mod hidapi_trait;
