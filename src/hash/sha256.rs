// SHA-256 engine
// Incremental buffer, Merkle-Damgard finalization and the compression function

use std::fmt;

use super::error::HashError;

/// Size of one compression block in bytes
pub const BLOCK_SIZE: usize = 64;

/// Size of a SHA-256 digest in bytes
pub const DIGEST_SIZE: usize = 32;

// Offset of the 64-bit length field inside the final block
const LENGTH_OFFSET: usize = BLOCK_SIZE - 8;

const K: [u32; 64] = [
    0x428a2f98, 0x71374491, 0xb5c0fbcf, 0xe9b5dba5, 0x3956c25b, 0x59f111f1, 0x923f82a4, 0xab1c5ed5,
    0xd807aa98, 0x12835b01, 0x243185be, 0x550c7dc3, 0x72be5d74, 0x80deb1fe, 0x9bdc06a7, 0xc19bf174,
    0xe49b69c1, 0xefbe4786, 0x0fc19dc6, 0x240ca1cc, 0x2de92c6f, 0x4a7484aa, 0x5cb0a9dc, 0x76f988da,
    0x983e5152, 0xa831c66d, 0xb00327c8, 0xbf597fc7, 0xc6e00bf3, 0xd5a79147, 0x06ca6351, 0x14292967,
    0x27b70a85, 0x2e1b2138, 0x4d2c6dfc, 0x53380d13, 0x650a7354, 0x766a0abb, 0x81c2c92e, 0x92722c85,
    0xa2bfe8a1, 0xa81a664b, 0xc24b8b70, 0xc76c51a3, 0xd192e819, 0xd6990624, 0xf40e3585, 0x106aa070,
    0x19a4c116, 0x1e376c08, 0x2748774c, 0x34b0bcb5, 0x391c0cb3, 0x4ed8aa4a, 0x5b9cca4f, 0x682e6ff3,
    0x748f82ee, 0x78a5636f, 0x84c87814, 0x8cc70208, 0x90befffa, 0xa4506ceb, 0xbef9a3f7, 0xc67178f2,
];

const INITIAL_STATE: [u32; 8] = [
    0x6a09e667, 0xbb67ae85, 0x3c6ef372, 0xa54ff53a, 0x510e527f, 0x9b05688c, 0x1f83d9ab, 0x5be0cd19,
];

#[inline(always)]
const fn rotr(x: u32, n: u32) -> u32 {
    x.rotate_right(n)
}

#[inline(always)]
const fn ch(x: u32, y: u32, z: u32) -> u32 {
    (x & y) ^ (!x & z)
}

#[inline(always)]
const fn maj(x: u32, y: u32, z: u32) -> u32 {
    (x & y) ^ (x & z) ^ (y & z)
}

#[inline(always)]
const fn big_sigma0(x: u32) -> u32 {
    rotr(x, 2) ^ rotr(x, 13) ^ rotr(x, 22)
}

#[inline(always)]
const fn big_sigma1(x: u32) -> u32 {
    rotr(x, 6) ^ rotr(x, 11) ^ rotr(x, 25)
}

#[inline(always)]
const fn small_sigma0(x: u32) -> u32 {
    rotr(x, 7) ^ rotr(x, 18) ^ (x >> 3)
}

#[inline(always)]
const fn small_sigma1(x: u32) -> u32 {
    rotr(x, 17) ^ rotr(x, 19) ^ (x >> 10)
}

/// Mix one 64-byte block into `state`
fn compress(state: &mut [u32; 8], block: &[u8; BLOCK_SIZE]) {
    let mut w = [0u32; 64];
    for (i, word) in block.chunks_exact(4).enumerate() {
        w[i] = u32::from_be_bytes([word[0], word[1], word[2], word[3]]);
    }
    for i in 16..64 {
        w[i] = small_sigma1(w[i - 2])
            .wrapping_add(w[i - 7])
            .wrapping_add(small_sigma0(w[i - 15]))
            .wrapping_add(w[i - 16]);
    }

    let [mut a, mut b, mut c, mut d, mut e, mut f, mut g, mut h] = *state;

    for i in 0..64 {
        let t1 = h
            .wrapping_add(big_sigma1(e))
            .wrapping_add(ch(e, f, g))
            .wrapping_add(K[i])
            .wrapping_add(w[i]);
        let t2 = big_sigma0(a).wrapping_add(maj(a, b, c));

        h = g;
        g = f;
        f = e;
        e = d.wrapping_add(t1);
        d = c;
        c = b;
        b = a;
        a = t1.wrapping_add(t2);
    }

    for (word, v) in state.iter_mut().zip([a, b, c, d, e, f, g, h]) {
        *word = word.wrapping_add(v);
    }
}

/// Incremental SHA-256 hasher
///
/// Feed bytes with [`Sha256::update`] in chunks of any size, then consume the
/// hasher with [`Sha256::finalize`]. The digest only depends on the byte
/// sequence, never on how it was split across `update` calls.
///
/// `finalize` takes the hasher by value, so a finalized hasher cannot be
/// updated or finalized again.
#[derive(Clone)]
pub struct Sha256 {
    state: [u32; 8],
    buffer: [u8; BLOCK_SIZE],
    buffer_len: usize,
    bit_length: u64,
    // Diagnostic count of compressed blocks, including padding blocks
    blocks: u64,
}

impl Sha256 {
    /// Create a hasher holding the SHA-256 initial hash values
    pub fn new() -> Self {
        Self {
            state: INITIAL_STATE,
            buffer: [0u8; BLOCK_SIZE],
            buffer_len: 0,
            bit_length: 0,
            blocks: 0,
        }
    }

    /// Absorb `data` into the hash
    pub fn update(&mut self, mut data: &[u8]) {
        if self.buffer_len > 0 {
            let needed = BLOCK_SIZE - self.buffer_len;
            if data.len() < needed {
                self.buffer[self.buffer_len..self.buffer_len + data.len()].copy_from_slice(data);
                self.buffer_len += data.len();
                return;
            }
            self.buffer[self.buffer_len..].copy_from_slice(&data[..needed]);
            let block = self.buffer;
            self.process_block(&block);
            self.buffer_len = 0;
            data = &data[needed..];
        }

        let mut blocks = data.chunks_exact(BLOCK_SIZE);
        for block in &mut blocks {
            // chunks_exact guarantees the length
            let mut full = [0u8; BLOCK_SIZE];
            full.copy_from_slice(block);
            self.process_block(&full);
        }

        let rest = blocks.remainder();
        self.buffer[..rest.len()].copy_from_slice(rest);
        self.buffer_len = rest.len();
    }

    /// Apply the padding rule and return the digest
    pub fn finalize(mut self) -> Digest {
        self.finish()
    }

    /// Number of bytes absorbed so far
    pub fn len(&self) -> u64 {
        self.bit_length / 8 + self.buffer_len as u64
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn process_block(&mut self, block: &[u8; BLOCK_SIZE]) {
        compress(&mut self.state, block);
        self.bit_length = self.bit_length.wrapping_add((BLOCK_SIZE * 8) as u64);
        self.blocks += 1;
    }

    fn finish(&mut self) -> Digest {
        let total_bits = self
            .bit_length
            .wrapping_add((self.buffer_len as u64) * 8);

        let mut i = self.buffer_len;
        self.buffer[i] = 0x80;
        i += 1;

        if i > LENGTH_OFFSET {
            self.buffer[i..].fill(0);
            compress(&mut self.state, &self.buffer);
            self.blocks += 1;
            i = 0;
        }
        self.buffer[i..LENGTH_OFFSET].fill(0);

        self.buffer[LENGTH_OFFSET..].copy_from_slice(&total_bits.to_be_bytes());
        compress(&mut self.state, &self.buffer);
        self.blocks += 1;

        let mut out = [0u8; DIGEST_SIZE];
        for (chunk, word) in out.chunks_exact_mut(4).zip(self.state.iter()) {
            chunk.copy_from_slice(&word.to_be_bytes());
        }
        Digest(out)
    }
}

impl Default for Sha256 {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Sha256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sha256")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

impl std::io::Write for Sha256 {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Hash `data` in one call
pub fn sha256(data: &[u8]) -> Digest {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize()
}

/// A finished 32-byte SHA-256 digest
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digest([u8; DIGEST_SIZE]);

impl Digest {
    /// Raw digest bytes, most significant byte of state word 0 first
    pub fn as_bytes(&self) -> &[u8; DIGEST_SIZE] {
        &self.0
    }

    pub fn into_bytes(self) -> [u8; DIGEST_SIZE] {
        self.0
    }

    /// 64-character lowercase hexadecimal form
    pub fn to_hex(&self) -> String {
        format!("{:x}", self)
    }

    /// Parse a 64-character hex digest (either case)
    pub fn from_hex(text: &str) -> Result<Self, HashError> {
        let text = text.trim();
        let invalid = |reason: &str| HashError::InvalidDigest {
            value: text.to_string(),
            reason: reason.to_string(),
        };

        if text.len() != DIGEST_SIZE * 2 {
            return Err(invalid("expected 64 hexadecimal characters"));
        }

        let mut out = [0u8; DIGEST_SIZE];
        for (byte, pair) in out.iter_mut().zip(text.as_bytes().chunks_exact(2)) {
            let hi = hex_value(pair[0]).ok_or_else(|| invalid("contains a non-hexadecimal character"))?;
            let lo = hex_value(pair[1]).ok_or_else(|| invalid("contains a non-hexadecimal character"))?;
            *byte = (hi << 4) | lo;
        }
        Ok(Digest(out))
    }
}

fn hex_value(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl From<[u8; DIGEST_SIZE]> for Digest {
    fn from(bytes: [u8; DIGEST_SIZE]) -> Self {
        Digest(bytes)
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::LowerHex for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.0 {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(self, f)
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({:x})", self)
    }
}

impl serde::Serialize for Digest {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}
