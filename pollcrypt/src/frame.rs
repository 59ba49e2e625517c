//! Length-prefixed framing of decrypted votes.
//!
//! Each item is written as a big-endian `u32` length followed by the item bytes.
//! An empty list encodes to an empty buffer.

use crate::*;

const LENGTH_PREFIX: usize = 4;

/// Concatenate `items`, each prefixed with its length.
pub fn encode_frame<T: AsRef<[u8]>>(items: &[T]) -> Result<Vec<u8>, Error> {
    let total = items
        .iter()
        .map(|item| LENGTH_PREFIX + item.as_ref().len())
        .sum();
    let mut framed = Vec::with_capacity(total);

    for (index, item) in items.iter().enumerate() {
        let item = item.as_ref();
        let len = u32::try_from(item.len()).map_err(|_| Error::PlaintextTooLarge(index))?;
        framed.extend_from_slice(&len.to_be_bytes());
        framed.extend_from_slice(item);
    }

    Ok(framed)
}

/// Split a framed payload back into its items.
pub fn decode_frame(mut framed: &[u8]) -> Result<Vec<Vec<u8>>, Error> {
    let mut items = Vec::new();

    while !framed.is_empty() {
        if framed.len() < LENGTH_PREFIX {
            return Err(Error::MalformedFrame);
        }
        let (prefix, rest) = framed.split_at(LENGTH_PREFIX);
        let mut len = [0u8; LENGTH_PREFIX];
        len.copy_from_slice(prefix);
        let len = u32::from_be_bytes(len) as usize;

        if rest.len() < len {
            return Err(Error::MalformedFrame);
        }
        let (item, rest) = rest.split_at(len);
        items.push(item.to_vec());
        framed = rest;
    }

    Ok(items)
}
