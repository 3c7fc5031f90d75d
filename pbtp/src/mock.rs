use crate::{Error, FeatureReport};

///Closure backed device. The sender sees every outgoing frame and answers
///with the number of bytes accepted; the getter fills the request buffer and
///answers with the number of bytes returned. Length mismatches injected here
///surface as transfer errors in the protocol code.
pub struct MockDevice<S, G>
where
    S: Fn(&[u8]) -> usize,
    G: Fn(&mut [u8]) -> usize,
{
    pub sender: S,
    pub getter: G,
}

impl<S, G> FeatureReport for MockDevice<S, G>
where
    S: Fn(&[u8]) -> usize,
    G: Fn(&mut [u8]) -> usize,
{
    fn send_feature(&self, data: &[u8]) -> Result<usize, Error> {
        Ok((self.sender)(data))
    }
    fn get_feature(&self, buf: &mut [u8]) -> Result<usize, Error> {
        Ok((self.getter)(buf))
    }
}
