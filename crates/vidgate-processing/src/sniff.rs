//! Magic-byte check for uploaded video payloads
//!
//! The declared Content-Type is attacker-controlled; before handing a staged
//! file to the external tools we require the bytes to actually start with an
//! MP4 `ftyp` box.

/// Minimum prefix length needed for the check.
pub const SNIFF_LEN: usize = 12;

/// True when the buffer starts with an ISO BMFF `ftyp` box (MP4/MOV family).
pub fn looks_like_mp4(header: &[u8]) -> bool {
    header.len() >= SNIFF_LEN && &header[4..8] == b"ftyp"
}
