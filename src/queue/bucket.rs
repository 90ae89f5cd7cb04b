//! Priority bucket layout
//!
//! Each priority level lives in its own redb table. The table name is the
//! prefix `pq-` followed by the priority encoded big-endian at a fixed width
//! and rendered as lower-case hex. The width depends only on the highest
//! priority of the queue, so every bucket of one queue has a name of the same
//! length and names sort the same way as priorities.

use redb::TableDefinition;

const BUCKET_PREFIX: &str = "pq-";

/// Bucket table: message key (8 bytes big-endian) to payload
pub type BucketTable<'a> = TableDefinition<'a, &'static [u8], &'static [u8]>;

/// Number of bytes used to encode a priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BucketWidth {
    One,
    Two,
    Four,
    Eight,
}

impl BucketWidth {
    /// Smallest width able to hold every priority up to `max_priority`
    pub fn for_max_priority(max_priority: u64) -> Self {
        if max_priority <= 0xFF {
            BucketWidth::One
        } else if max_priority <= 0xFFFF {
            BucketWidth::Two
        } else if max_priority <= 0xFFFF_FFFF {
            BucketWidth::Four
        } else {
            BucketWidth::Eight
        }
    }

    pub fn bytes(self) -> usize {
        match self {
            BucketWidth::One => 1,
            BucketWidth::Two => 2,
            BucketWidth::Four => 4,
            BucketWidth::Eight => 8,
        }
    }

    /// Big-endian encoding of `priority` at this width
    pub fn encode(self, priority: u64) -> Vec<u8> {
        let full = priority.to_be_bytes();
        full[full.len() - self.bytes()..].to_vec()
    }

    /// Table name holding messages of `priority`
    pub fn bucket_name(self, priority: u64) -> String {
        let hex: String = self
            .encode(priority)
            .iter()
            .map(|byte| format!("{:02x}", byte))
            .collect();
        format!("{}{}", BUCKET_PREFIX, hex)
    }

    /// Recover the priority from a table name written at this width
    ///
    /// Names of other widths or unrelated tables yield `None`.
    pub fn parse_bucket_name(self, name: &str) -> Option<u64> {
        let hex = name.strip_prefix(BUCKET_PREFIX)?;
        let canonical = hex
            .bytes()
            .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'));
        if hex.len() != self.bytes() * 2 || !canonical {
            return None;
        }
        u64::from_str_radix(hex, 16).ok()
    }
}
