use crate::command::{marker_frame, xmit, END_PROGRAM_FILL};
use crate::{Error, FeatureReport};

///Send the end-of-programming marker. The device drops out of programming
///mode and starts running the new image.
pub fn end_program<T: FeatureReport>(d: &T, request_size: usize) -> Result<(), Error> {
    xmit(d, &marker_frame(request_size, END_PROGRAM_FILL)?)
}
