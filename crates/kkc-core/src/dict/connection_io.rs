use std::fs::{self, File};
use std::path::Path;

use memmap2::Mmap;
use tracing::info;

use super::connection::{ConnectionMatrix, CostStorage, HEADER_SIZE, MAGIC, VERSION};
use super::DictError;

fn parse_field<T: std::str::FromStr>(field: &str, what: &str) -> Result<T, DictError>
where
    T::Err: std::fmt::Display,
{
    field
        .parse()
        .map_err(|e| DictError::Parse(format!("invalid {what} '{field}': {e}")))
}

impl ConnectionMatrix {
    /// Parses a text matrix, auto-detecting the layout:
    /// - Mozc: header `N` (or `N N`), then one cost per line in row-major order.
    /// - MeCab: header `N N`, then `right_id left_id cost` triplets.
    pub fn from_text(text: &str) -> Result<Self, DictError> {
        let mut lines = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .peekable();

        let header = lines
            .next()
            .ok_or_else(|| DictError::Parse("empty matrix".to_string()))?;
        let dims: Vec<&str> = header.split_whitespace().collect();
        let num_ids: u16 = match dims.as_slice() {
            [n] => parse_field(n, "num_ids")?,
            [l, r] => {
                let l: u16 = parse_field(l, "num_left")?;
                let r: u16 = parse_field(r, "num_right")?;
                if l != r {
                    return Err(DictError::Parse(format!(
                        "num_left ({l}) != num_right ({r})"
                    )));
                }
                l
            }
            _ => {
                return Err(DictError::Parse(format!(
                    "expected 1 or 2 values in header, got {}",
                    dims.len()
                )));
            }
        };
        let n = num_ids as usize;
        let expected = n * n;

        let triplets = lines
            .peek()
            .is_some_and(|l| l.split_whitespace().count() == 3);

        let costs = if triplets {
            let mut costs = vec![0i16; expected];
            for line in lines {
                let fields: Vec<&str> = line.split_whitespace().collect();
                let [right, left, cost] = fields.as_slice() else {
                    return Err(DictError::Parse(format!(
                        "expected 3 fields, got {}: '{line}'",
                        fields.len()
                    )));
                };
                // MeCab lists the earlier morpheme's right id first.
                let prev: usize = parse_field(right, "right_id")?;
                let next: usize = parse_field(left, "left_id")?;
                if prev >= n || next >= n {
                    return Err(DictError::Parse(format!(
                        "id out of range: ({prev}, {next}) with {n} ids"
                    )));
                }
                costs[prev * n + next] = parse_field(cost, "cost")?;
            }
            costs
        } else {
            let mut costs = Vec::with_capacity(expected);
            for line in lines {
                costs.push(parse_field::<i16>(line, "cost")?);
            }
            costs
        };

        Self::from_costs(num_ids, costs)
    }

    /// Rejects an empty matrix, a cost count other than `num_ids²` and
    /// negative costs.
    pub(super) fn check_costs(
        num_ids: u16,
        count: usize,
        mut costs: impl Iterator<Item = i16>,
    ) -> Result<(), DictError> {
        if num_ids == 0 {
            return Err(DictError::Corrupt("connection matrix has no ids".into()));
        }
        let expected = num_ids as usize * num_ids as usize;
        if count != expected {
            return Err(DictError::Corrupt(format!(
                "expected {expected} connection costs, got {count}"
            )));
        }
        if let Some(bad) = costs.find(|&c| c < 0) {
            return Err(DictError::Corrupt(format!("negative connection cost {bad}")));
        }
        Ok(())
    }

    /// Validates a KKCX image and returns `num_ids`.
    fn validate_image(data: &[u8]) -> Result<u16, DictError> {
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
        let num_ids = u16::from_le_bytes([data[5], data[6]]);
        let body = &data[HEADER_SIZE..];
        if body.len() % 2 != 0 {
            return Err(DictError::Corrupt(format!(
                "cost data has odd length {}",
                body.len()
            )));
        }
        Self::check_costs(
            num_ids,
            body.len() / 2,
            body.chunks_exact(2).map(|b| i16::from_le_bytes([b[0], b[1]])),
        )?;
        Ok(num_ids)
    }

    /// Opens a KKCX file through a read-only memory map.
    pub fn open(path: &Path) -> Result<Self, DictError> {
        let file = File::open(path)?;
        // SAFETY: the mapping is read-only and owned by the returned matrix;
        // asset files are not modified while an engine is running.
        let mmap = unsafe { Mmap::map(&file)? };
        let num_ids = Self::validate_image(&mmap)?;
        info!(path = %path.display(), num_ids, "connection matrix mapped");
        Ok(Self {
            num_ids,
            storage: CostStorage::Mapped(mmap),
        })
    }

    /// Parses a KKCX image into an owned matrix.
    pub fn from_bytes(data: &[u8]) -> Result<Self, DictError> {
        let num_ids = Self::validate_image(data)?;
        let costs = data[HEADER_SIZE..]
            .chunks_exact(2)
            .map(|b| i16::from_le_bytes([b[0], b[1]]))
            .collect();
        Ok(Self {
            num_ids,
            storage: CostStorage::Owned(costs),
        })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let n = self.num_ids as usize;
        let mut buf = Vec::with_capacity(HEADER_SIZE + n * n * 2);
        buf.extend_from_slice(MAGIC);
        buf.push(VERSION);
        buf.extend_from_slice(&self.num_ids.to_le_bytes());
        for left in 0..self.num_ids {
            for right in 0..self.num_ids {
                buf.extend_from_slice(&self.cost(left, right).to_le_bytes());
            }
        }
        buf
    }

    pub fn save(&self, path: &Path) -> Result<(), DictError> {
        Ok(fs::write(path, self.to_bytes())?)
    }
}
