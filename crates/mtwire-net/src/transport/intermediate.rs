// Copyright 2020 - developers of the `mtwire` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use super::Transport;
use mtwire_proto::errors::TransportError;

/// A transport that guarantees every frame's payload is already padded to
/// 4 bytes, at the cost of a fixed 4-byte length prefix and a one-time
/// `0xeeeeeeee` magic on the first packet sent.
///
/// * Overhead: small.
/// * Minimum envelope length: 4 bytes.
/// * Maximum envelope length: 4 bytes.
#[derive(Default)]
pub struct Intermediate {
    sent_magic: bool,
}

impl Transport for Intermediate {
    const MAX_OVERHEAD: usize = 4;

    fn pack(&mut self, input: &[u8], output: &mut Vec<u8>) {
        if !self.sent_magic {
            output.extend_from_slice(&[0xee, 0xee, 0xee, 0xee]);
            self.sent_magic = true;
        }
        output.extend_from_slice(&(input.len() as u32).to_le_bytes());
        output.extend_from_slice(input);
    }

    fn unpack(&mut self, input: &[u8], output: &mut Vec<u8>) -> Result<usize, TransportError> {
        if input.len() < 4 {
            return Err(TransportError::MissingBytes(4));
        }

        let mut len_bytes = [0u8; 4];
        len_bytes.copy_from_slice(&input[..4]);
        let len = u32::from_le_bytes(len_bytes) as usize;
        let total = 4 + len;
        if input.len() < total {
            return Err(TransportError::MissingBytes(total));
        }

        output.extend_from_slice(&input[4..total]);
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips() {
        let mut sender = Intermediate::default();
        let input = vec![1, 2, 3, 4, 5, 6, 7, 8];
        let mut framed = Vec::new();
        sender.pack(&input, &mut framed);
        assert_eq!(&framed[..4], &[0xee, 0xee, 0xee, 0xee]);

        let mut receiver = Intermediate::default();
        let mut out = Vec::new();
        let consumed = receiver.unpack(&framed[4..], &mut out).unwrap();
        assert_eq!(consumed, framed.len() - 4);
        assert_eq!(out, input);
    }
}
