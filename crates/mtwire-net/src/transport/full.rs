// Copyright 2020 - developers of the `mtwire` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use super::Transport;
use crc32fast::Hasher;
use mtwire_proto::errors::TransportError;

/// The basic MTProto transport. Every frame carries its own length,
/// a monotonic sequence number and a CRC32 checksum, so corruption and
/// reordering are detected without help from the lower layers.
///
/// * Overhead: medium.
/// * Minimum envelope length: 12 bytes.
/// * Maximum envelope length: 12 bytes.
#[derive(Default)]
pub struct Full {
    send_seq: u32,
    recv_seq: u32,
}

impl Transport for Full {
    const MAX_OVERHEAD: usize = 12;

    fn pack(&mut self, input: &[u8], output: &mut Vec<u8>) {
        let len = input.len() + 4 + 4 + 4;
        let len_bytes = (len as u32).to_le_bytes();
        let seq_bytes = self.send_seq.to_le_bytes();

        let crc = {
            let mut hasher = Hasher::new();
            hasher.update(&len_bytes);
            hasher.update(&seq_bytes);
            hasher.update(input);
            hasher.finalize()
        };

        output.extend_from_slice(&len_bytes);
        output.extend_from_slice(&seq_bytes);
        output.extend_from_slice(input);
        output.extend_from_slice(&crc.to_le_bytes());

        self.send_seq += 1;
    }

    fn unpack(&mut self, input: &[u8], output: &mut Vec<u8>) -> Result<usize, TransportError> {
        if input.len() < 4 {
            return Err(TransportError::MissingBytes(4));
        }

        let mut len_bytes = [0u8; 4];
        len_bytes.copy_from_slice(&input[..4]);
        let len = u32::from_le_bytes(len_bytes) as usize;
        if input.len() < len {
            return Err(TransportError::MissingBytes(len));
        }
        if len < 12 {
            return Err(TransportError::BadLen { got: len as u32 });
        }

        let mut seq_bytes = [0u8; 4];
        seq_bytes.copy_from_slice(&input[4..8]);
        let seq = u32::from_le_bytes(seq_bytes);
        if seq != self.recv_seq {
            return Err(TransportError::BadSeq {
                expected: self.recv_seq,
                got: seq,
            });
        }

        let body = &input[8..len - 4];

        let mut crc_bytes = [0u8; 4];
        crc_bytes.copy_from_slice(&input[len - 4..len]);
        let crc = u32::from_le_bytes(crc_bytes);

        let valid_crc = {
            let mut hasher = Hasher::new();
            hasher.update(&len_bytes);
            hasher.update(&seq_bytes);
            hasher.update(body);
            hasher.finalize()
        };
        if crc != valid_crc {
            return Err(TransportError::BadCrc {
                expected: valid_crc,
                got: crc,
            });
        }

        self.recv_seq += 1;
        output.extend_from_slice(body);
        Ok(len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips() {
        let mut sender = Full::default();
        let input = vec![1, 2, 3, 4, 5, 6, 7, 8];
        let mut framed = Vec::new();
        sender.pack(&input, &mut framed);

        let mut receiver = Full::default();
        let mut out = Vec::new();
        let consumed = receiver.unpack(&framed, &mut out).unwrap();
        assert_eq!(consumed, framed.len());
        assert_eq!(out, input);
    }

    #[test]
    fn rejects_bad_seq() {
        let mut sender = Full::default();
        let input = vec![1, 2, 3, 4];
        let mut framed = Vec::new();
        sender.pack(&input, &mut framed);
        sender.pack(&input, &mut framed[..0].to_vec());

        let mut receiver = Full::default();
        receiver.recv_seq = 5;
        let mut out = Vec::new();
        assert_eq!(
            receiver.unpack(&framed, &mut out),
            Err(TransportError::BadSeq {
                expected: 5,
                got: 0
            })
        );
    }
}
