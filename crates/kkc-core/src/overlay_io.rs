//! On-disk framing for the mutable overlays: 4 magic bytes, a version byte,
//! then the records as a bincode `Vec`.

use std::fs;
use std::io;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

const HEADER_LEN: usize = 5;

fn invalid(msg: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg)
}

pub(crate) fn encode<T: Serialize>(
    magic: &[u8; 4],
    version: u8,
    records: &[T],
) -> io::Result<Vec<u8>> {
    let body = bincode::serialize(records).map_err(io::Error::other)?;
    let mut buf = Vec::with_capacity(HEADER_LEN + body.len());
    buf.extend_from_slice(magic);
    buf.push(version);
    buf.extend_from_slice(&body);
    Ok(buf)
}

pub(crate) fn decode<T: DeserializeOwned>(
    magic: &[u8; 4],
    version: u8,
    bytes: &[u8],
) -> io::Result<Vec<T>> {
    let name = String::from_utf8_lossy(magic);
    if bytes.len() < HEADER_LEN {
        return Err(invalid(format!("{name}: too short")));
    }
    let (header, body) = bytes.split_at(HEADER_LEN);
    if &header[..4] != magic {
        return Err(invalid(format!("bad magic (expected {name})")));
    }
    if header[4] != version {
        return Err(invalid(format!("{name}: unsupported version {}", header[4])));
    }
    bincode::deserialize(body).map_err(|e| invalid(format!("{name}: {e}")))
}

/// Write to a sibling `.tmp` file, then rename over `path`.
pub(crate) fn save_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)
}

/// File contents, or `None` when the file does not exist yet.
pub(crate) fn read_optional(path: &Path) -> io::Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}
