use std::fs::{self, File};
use std::path::Path;

use memmap2::Mmap;
use tracing::info;

use super::trie_dict::TrieDictionary;
use super::DictError;

const MAGIC: &[u8; 4] = b"KKDX";
const VERSION: u8 = 1;
/// magic(4) + version(1) + reserved(3) + body_len(4) + crc32(4)
const HEADER_SIZE: usize = 4 + 1 + 3 + 4 + 4;

impl TrieDictionary {
    pub fn to_bytes(&self) -> Result<Vec<u8>, DictError> {
        let body = bincode::serialize(self).map_err(DictError::Serialize)?;
        let body_len: u32 = body
            .len()
            .try_into()
            .map_err(|_| DictError::Parse("dictionary body exceeds u32::MAX".to_string()))?;

        let mut buf = Vec::with_capacity(HEADER_SIZE + body.len());
        buf.extend_from_slice(MAGIC);
        buf.push(VERSION);
        buf.extend_from_slice(&[0u8; 3]); // reserved
        buf.extend_from_slice(&body_len.to_le_bytes());
        buf.extend_from_slice(&crc32fast::hash(&body).to_le_bytes());
        buf.extend_from_slice(&body);
        Ok(buf)
    }

    /// Decodes and fully validates a KKDX image. Any defect is an error; no
    /// partially usable dictionary is ever returned.
    pub fn from_bytes(data: &[u8]) -> Result<Self, DictError> {
        if data.len() < 5 {
            return Err(DictError::InvalidHeader);
        }
        if &data[..4] != MAGIC {
            return Err(DictError::InvalidMagic);
        }
        if data[4] != VERSION {
            return Err(DictError::UnsupportedVersion(data[4]));
        }
        if data.len() < HEADER_SIZE {
            return Err(DictError::InvalidHeader);
        }

        let body_len = u32::from_le_bytes([data[8], data[9], data[10], data[11]]) as usize;
        let stored = u32::from_le_bytes([data[12], data[13], data[14], data[15]]);
        let body = &data[HEADER_SIZE..];
        if body.len() < body_len {
            return Err(DictError::Corrupt(format!(
                "truncated body: header declares {body_len} bytes, found {}",
                body.len()
            )));
        }
        if body.len() > body_len {
            return Err(DictError::Corrupt(format!(
                "{} trailing bytes after body",
                body.len() - body_len
            )));
        }
        let computed = crc32fast::hash(body);
        if computed != stored {
            return Err(DictError::ChecksumMismatch { stored, computed });
        }

        let dict: TrieDictionary = bincode::deserialize(body).map_err(DictError::Deserialize)?;
        dict.validate()?;
        Ok(dict)
    }

    /// Opens a dictionary file through a memory map, so the raw image is not
    /// copied onto the heap before decoding. The mapping is dropped once the
    /// dictionary is decoded.
    pub fn open(path: &Path) -> Result<Self, DictError> {
        let file = File::open(path)?;
        // SAFETY: the mapping is read-only and lives only for the decode below.
        let mmap = unsafe { Mmap::map(&file)? };
        let dict = Self::from_bytes(&mmap)?;
        let (readings, tokens) = dict.stats();
        info!(path = %path.display(), readings, tokens, "dictionary loaded");
        Ok(dict)
    }

    pub fn save(&self, path: &Path) -> Result<(), DictError> {
        Ok(fs::write(path, self.to_bytes()?)?)
    }
}
