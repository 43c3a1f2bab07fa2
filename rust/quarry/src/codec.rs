//! JSON encoding of sequences.
//!
//! A sequence serializes as an array of its elements, streamed straight from a
//! pass over the sequence, and deserializes from such an array into an owned,
//! restartable sequence.

use std::io::Write;

use quarry_common::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::Sequence;

impl<'a, T> Serialize for Sequence<'a, T>
where
    T: Serialize + 'a,
{
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

impl<'de, 'a, T> Deserialize<'de> for Sequence<'a, T>
where
    T: Deserialize<'de> + Clone + Send + Sync + 'a,
{
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Vec::<T>::deserialize(deserializer).map(Sequence::from_vec)
    }
}

impl<'a, T> Sequence<'a, T>
where
    T: Serialize + 'a,
{
    /// Encodes the sequence as a JSON array.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(Error::encode)
    }

    /// Streams the sequence into `writer` as a JSON array.
    pub fn to_json_writer<W>(&self, writer: W) -> Result<()>
    where
        W: Write,
    {
        serde_json::to_writer(writer, self).map_err(Error::encode)
    }
}
