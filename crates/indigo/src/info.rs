//! Per-namespace id counter.

use serde::{Deserialize, Serialize};

/// Store id of the counter within the record namespace.
pub const INFO_ID: &str = "info";

/// Highest id ever issued in a namespace. Ids are never reused, even after
/// the record holding one is deleted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitiesInfo {
    max_id: u64,
}

impl EntitiesInfo {
    pub fn new(max_id: u64) -> Self {
        Self { max_id }
    }

    pub fn max_id(&self) -> u64 {
        self.max_id
    }

    /// Issue the next id.
    pub fn generate_id(&mut self) -> u64 {
        self.max_id += 1;
        self.max_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_id_is_consecutive() {
        let mut info = EntitiesInfo::new(41);
        let ids: Vec<u64> = (0..3).map(|_| info.generate_id()).collect();
        assert_eq!(ids, vec![42, 43, 44]);
        assert_eq!(info.max_id(), 44);
    }

    #[test]
    fn test_starts_at_one() {
        assert_eq!(EntitiesInfo::default().generate_id(), 1);
    }

    #[test]
    fn test_retried_attempt_reissues_same_ids() {
        let stored = EntitiesInfo::new(10);

        // First attempt is discarded before commit
        let mut attempt = stored;
        assert_eq!(attempt.generate_id(), 11);

        let mut retry = stored;
        assert_eq!(retry.generate_id(), 11);
        assert_eq!(retry.generate_id(), 12);
    }

    #[test]
    fn test_serialized_form() {
        let json = serde_json::to_string(&EntitiesInfo::new(7)).unwrap();
        assert_eq!(json, r#"{"maxId":7}"#);
    }
}
