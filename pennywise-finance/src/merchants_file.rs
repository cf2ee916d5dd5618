//! Load and save `recurring_merchants.json`:
//! `[{ "merchant_id": "merch_000094..." }, ...]`

use anyhow::{Context, Result};
use pennywise_core::{RecurringMerchantEntry, RecurringMerchants};
use std::fs;
use std::path::Path;
use tracing::warn;

/// Read the recurring merchant list. A missing file is an empty list.
pub fn load_recurring_merchants(path: impl AsRef<Path>) -> Result<RecurringMerchants> {
    let path = path.as_ref();
    if !path.exists() {
        warn!(
            path = %path.display(),
            "recurring merchants file not found; nothing will be projected"
        );
        return Ok(RecurringMerchants::default());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let entries: Vec<RecurringMerchantEntry> =
        serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))?;

    let merchants = RecurringMerchants::from_entries(&entries);
    if merchants.len() != entries.len() {
        warn!(
            path = %path.display(),
            duplicates = entries.len() - merchants.len(),
            "duplicate merchant ids ignored"
        );
    }
    Ok(merchants)
}

pub fn save_recurring_merchants(
    path: impl AsRef<Path>,
    merchants: &RecurringMerchants,
) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let s = serde_json::to_string_pretty(&merchants.to_entries())?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_preserves_order_and_drops_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recurring_merchants.json");
        fs::write(
            &path,
            r#"[{"merchant_id":"merch_b"},{"merchant_id":"merch_a"},{"merchant_id":"merch_b"}]"#,
        )
        .unwrap();

        let merchants = load_recurring_merchants(&path).unwrap();
        assert_eq!(merchants.iter().collect::<Vec<_>>(), vec!["merch_b", "merch_a"]);
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let merchants = load_recurring_merchants(dir.path().join("nope.json")).unwrap();
        assert!(merchants.is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("recurring_merchants.json");
        save_recurring_merchants(&path, &RecurringMerchants::new(["merch_1", "merch_2"])).unwrap();
        let loaded = load_recurring_merchants(&path).unwrap();
        assert_eq!(loaded, RecurringMerchants::new(["merch_1", "merch_2"]));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recurring_merchants.json");
        fs::write(&path, r#"[{"id":"merch_1"}]"#).unwrap();
        let err = load_recurring_merchants(&path).unwrap_err();
        assert!(err.to_string().starts_with("parse "));
    }
}
