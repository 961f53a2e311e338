//! Hash-chained append-only audit log
//!
//! Each entry commits to the previous entry's hash, so rewriting or dropping
//! an earlier row is detectable by [`AuditLog::verify_integrity`]. The log
//! has no update or delete operations.

use crate::error::AuditError;
use serde::Serialize;
use sha2::{Digest, Sha256};

const GENESIS: [u8; 32] = [0u8; 32];

/// One sealed audit entry
#[derive(Debug, Clone, PartialEq)]
pub struct AuditEntry<T> {
    /// Position in the log, starting at 0
    pub sequence: u64,
    /// The audited record
    pub record: T,
    /// Hash of the previous entry (zeros for the first)
    pub prev_hash: [u8; 32],
    /// Hash over sequence, previous hash and the encoded record
    pub hash: [u8; 32],
}

impl<T> AuditEntry<T> {
    /// Hex form of this entry's hash
    #[must_use]
    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash)
    }
}

/// Append-only log of `T`
#[derive(Debug, Clone)]
pub struct AuditLog<T> {
    entries: Vec<AuditEntry<T>>,
}

impl<T> Default for AuditLog<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T: Serialize> AuditLog<T> {
    /// Create empty log
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seal and append a record
    ///
    /// # Errors
    /// Fails without modifying the log if the record cannot be encoded.
    pub fn append(&mut self, record: T) -> Result<&AuditEntry<T>, AuditError> {
        let sequence = self.entries.len() as u64;
        let prev_hash = self.entries.last().map_or(GENESIS, |e| e.hash);
        let hash = compute_hash(sequence, &prev_hash, &record)?;

        self.entries.push(AuditEntry {
            sequence,
            record,
            prev_hash,
            hash,
        });
        Ok(&self.entries[self.entries.len() - 1])
    }

    /// Entries oldest first
    #[inline]
    #[must_use]
    pub fn entries(&self) -> &[AuditEntry<T>] {
        &self.entries
    }

    /// Records oldest first
    pub fn records(&self) -> impl DoubleEndedIterator<Item = &T> {
        self.entries.iter().map(|e| &e.record)
    }

    /// Number of entries
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Hash of the newest entry, hex encoded
    #[must_use]
    pub fn head_hash(&self) -> String {
        hex::encode(self.entries.last().map_or(GENESIS, |e| e.hash))
    }

    /// Recompute every hash and check the chain links
    ///
    /// # Errors
    /// Returns the sequence number of the first entry that does not verify.
    pub fn verify_integrity(&self) -> Result<(), AuditError> {
        let mut prev = GENESIS;
        for (idx, entry) in self.entries.iter().enumerate() {
            let sequence = idx as u64;
            if entry.sequence != sequence || entry.prev_hash != prev {
                return Err(AuditError::IntegrityViolation { sequence });
            }
            let expected = compute_hash(sequence, &prev, &entry.record)?;
            if entry.hash != expected {
                return Err(AuditError::IntegrityViolation { sequence });
            }
            prev = entry.hash;
        }
        Ok(())
    }
}

fn compute_hash<T: Serialize>(
    sequence: u64,
    prev_hash: &[u8; 32],
    record: &T,
) -> Result<[u8; 32], AuditError> {
    let encoded = serde_json::to_vec(record)?;
    let mut hasher = Sha256::new();
    hasher.update(sequence.to_le_bytes());
    hasher.update(prev_hash);
    hasher.update(&encoded);
    Ok(hasher.finalize().into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize)]
    struct Note {
        text: String,
    }

    fn note(text: &str) -> Note {
        Note {
            text: text.to_string(),
        }
    }

    #[test]
    fn chain_links_entries() {
        let mut log = AuditLog::new();
        let first_hash = log.append(note("created")).unwrap().hash;
        let second = log.append(note("updated")).unwrap();

        assert_eq!(second.sequence, 1);
        assert_eq!(second.prev_hash, first_hash);
        assert!(log.verify_integrity().is_ok());
        assert_eq!(log.head_hash(), log.entries()[1].hash_hex());
    }

    #[test]
    fn tampered_record_is_detected() {
        let mut log = AuditLog::new();
        log.append(note("advisor -> sales_leader")).unwrap();
        log.append(note("sales_leader -> team_leader")).unwrap();

        log.entries[0].record = note("advisor -> supreme_leader");

        assert!(matches!(
            log.verify_integrity(),
            Err(AuditError::IntegrityViolation { sequence: 0 })
        ));
    }

    #[test]
    fn dropped_entry_is_detected() {
        let mut log = AuditLog::new();
        log.append(note("a")).unwrap();
        log.append(note("b")).unwrap();
        log.append(note("c")).unwrap();

        log.entries.remove(1);

        assert!(log.verify_integrity().is_err());
    }

    #[test]
    fn empty_log_verifies() {
        let log: AuditLog<Note> = AuditLog::new();
        assert!(log.verify_integrity().is_ok());
        assert_eq!(log.head_hash(), hex::encode([0u8; 32]));
    }
}
