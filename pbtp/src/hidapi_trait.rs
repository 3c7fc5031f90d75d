use crate::{Error, FeatureReport};
use hidapi::HidDevice;

impl FeatureReport for HidDevice {
    fn send_feature(&self, data: &[u8]) -> Result<usize, Error> {
        // hidapi already fails the call on a short transfer, so a completed
        // send counts as the full frame
        self.send_feature_report(data).map(|_| data.len()).map_err(|e| e.into())
    }
    fn get_feature(&self, buf: &mut [u8]) -> Result<usize, Error> {
        self.get_feature_report(buf).map_err(|e| e.into())
    }
}

impl From<hidapi::HidError> for Error {
    fn from(_err: hidapi::HidError) -> Self {
        Error::Transmission
    }
}
