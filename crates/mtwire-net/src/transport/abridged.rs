// Copyright 2020 - developers of the `mtwire` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use super::Transport;
use mtwire_proto::errors::TransportError;

/// The lightest MTProto transport. The first byte sent on a fresh
/// connection is the magic `0xef`; every frame after that is a single
/// length byte (`payload_len / 4`) when it fits, or `0x7f` followed by a
/// 3-byte little-endian length otherwise.
///
/// * Overhead: very small.
/// * Minimum envelope length: 1 byte.
/// * Maximum envelope length: 4 bytes.
#[derive(Default)]
pub struct Abridged {
    sent_magic: bool,
}

impl Transport for Abridged {
    const MAX_OVERHEAD: usize = 4;

    fn pack(&mut self, input: &[u8], output: &mut Vec<u8>) {
        assert_eq!(input.len() % 4, 0, "payload must be a multiple of 4 bytes");

        if !self.sent_magic {
            output.push(0xef);
            self.sent_magic = true;
        }

        let len = input.len() / 4;
        if len < 127 {
            output.push(len as u8);
        } else {
            output.push(0x7f);
            output.extend_from_slice(&(len as u32).to_le_bytes()[..3]);
        }
        output.extend_from_slice(input);
    }

    fn unpack(&mut self, input: &[u8], output: &mut Vec<u8>) -> Result<usize, TransportError> {
        if input.is_empty() {
            return Err(TransportError::MissingBytes(1));
        }

        let (header_len, len) = if input[0] < 127 {
            (1, input[0] as u32)
        } else {
            if input.len() < 4 {
                return Err(TransportError::MissingBytes(4));
            }
            let mut len = [0u8; 4];
            len[..3].copy_from_slice(&input[1..4]);
            (4, u32::from_le_bytes(len))
        };

        let body_len = len as usize * 4;
        let total = header_len + body_len;
        if input.len() < total {
            return Err(TransportError::MissingBytes(total));
        }

        output.extend_from_slice(&input[header_len..total]);
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(n: usize) -> Vec<u8> {
        (0..n).map(|i| (i & 0xff) as u8).collect()
    }

    #[test]
    fn sends_magic_once() {
        let mut transport = Abridged::default();
        let mut out = Vec::new();
        transport.pack(&payload(4), &mut out);
        assert_eq!(out[0], 0xef);

        let mut out2 = Vec::new();
        transport.pack(&payload(4), &mut out2);
        assert_ne!(out2[0], 0xef);
    }

    #[test]
    fn round_trips_small_payload() {
        let mut sender = Abridged::default();
        let input = payload(128);
        let mut framed = Vec::new();
        sender.pack(&input, &mut framed);
        assert_eq!(&framed[1..2], &[32]);

        let mut receiver = Abridged::default();
        let mut out = Vec::new();
        let consumed = receiver.unpack(&framed[1..], &mut out).unwrap();
        assert_eq!(consumed, framed.len() - 1);
        assert_eq!(out, input);
    }

    #[test]
    fn round_trips_large_payload() {
        let mut sender = Abridged::default();
        let input = payload(1024);
        let mut framed = Vec::new();
        sender.pack(&input, &mut framed);
        assert_eq!(&framed[1..5], &[127, 0, 1, 0]);

        let mut receiver = Abridged::default();
        let mut out = Vec::new();
        receiver.unpack(&framed[1..], &mut out).unwrap();
        assert_eq!(out, input);
    }

    #[test]
    fn reports_missing_bytes() {
        let mut transport = Abridged::default();
        let mut out = Vec::new();
        assert_eq!(
            transport.unpack(&[1], &mut out),
            Err(TransportError::MissingBytes(5))
        );
    }
}
