//! CRC32 helpers shared between encode and decode.
//!
//! The message CRC is not an independent checksum of the header/payload
//! bytes; it continues the running CRC32 state left over from hashing the
//! prelude. `crc32fast::Hasher::new_with_initial` gives us that continuation
//! directly, so there is no need to concatenate buffers just to re-hash from
//! zero.

use crc32fast::Hasher;

/// CRC32 (IEEE 802.3 polynomial) of `data`, from a zero initial state.
#[must_use]
pub fn checksum(data: &[u8]) -> u32 {
    crc32fast::hash(data)
}

/// CRC32 of `data`, continuing from running state `seed`.
#[must_use]
pub fn checksum_seeded(seed: u32, data: &[u8]) -> u32 {
    let mut hasher = Hasher::new_with_initial(seed);
    hasher.update(data);
    hasher.finalize()
}

/// CRC32 of `first || second`, continuing from running state `seed`.
///
/// Used by frame decode, where the prelude CRC bytes and the headers/payload
/// body are two separate slices rather than one contiguous buffer.
#[must_use]
pub fn checksum_seeded_parts(seed: u32, first: &[u8], second: &[u8]) -> u32 {
    let mut hasher = Hasher::new_with_initial(seed);
    hasher.update(first);
    hasher.update(second);
    hasher.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn continuation_matches_concatenation() {
        let prelude = b"abcdefgh";
        let seed = checksum(prelude);
        let rest = b"the rest of the message";

        let continued = checksum_seeded(seed, rest);
        let concatenated = checksum(&[prelude.as_slice(), rest.as_slice()].concat());
        assert_eq!(continued, concatenated);
    }

    #[test]
    fn seeded_parts_matches_seeded_single_buffer() {
        let seed = 0x1234_5678;
        let a = b"part one";
        let b = b"part two";
        let combined = [a.as_slice(), b.as_slice()].concat();
        assert_eq!(checksum_seeded_parts(seed, a, b), checksum_seeded(seed, &combined));
    }
}
