use crate::command::{marker_frame, xmit, ERASE_PROGRAM_FILL};
use crate::{Error, FeatureReport};

///Erase the first seven pages of program flash. The frame is the erase fill
///byte repeated for the whole request, behind the report id.
pub fn erase_program<T: FeatureReport>(d: &T, request_size: usize) -> Result<(), Error> {
    xmit(d, &marker_frame(request_size, ERASE_PROGRAM_FILL)?)
}
