// 📝 Report Writer - human-readable text report + JSON export
//
// The text layout is consumed by existing tooling: keep banners, section
// headers and field labels byte-for-byte.

use crate::record::{GeneratedRecord, TIMESTAMP_FORMAT};
use anyhow::{Context, Result};
use chrono::Local;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

pub const REPORT_TITLE: &str = "Card Helper v1.0 - Card and Person Information Generator";

fn banner() -> String {
    "=".repeat(80)
}

/// Render the full text report
pub fn render_report(records: &[GeneratedRecord], generated_at: &str) -> String {
    let mut out = String::new();
    let rule = banner();

    // write! into a String cannot fail
    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out, "{}", REPORT_TITLE);
    let _ = writeln!(out, "Generated: {}", generated_at);
    let _ = writeln!(out, "Quantity: {} records", records.len());
    let _ = writeln!(out, "{}\n", rule);

    for (idx, record) in records.iter().enumerate() {
        render_record(&mut out, idx + 1, record, &rule);
    }

    out
}

fn render_record(out: &mut String, number: usize, record: &GeneratedRecord, rule: &str) {
    let card = &record.card;
    let addr = &record.address;

    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out, "Record #{}", number);
    let _ = writeln!(out, "{}\n", rule);

    let _ = writeln!(out, "【Person Information】");
    let _ = writeln!(out, "Name: {}", record.name);
    let _ = writeln!(out, "Generated: {}\n", record.timestamp);

    let _ = writeln!(out, "【Card Information】");
    let _ = writeln!(out, "Card Number: {}", card.card_number);
    let _ = writeln!(out, "Formatted: {}", card.card_number_formatted);
    let _ = writeln!(out, "Expiry: {}", card.expiry);
    let _ = writeln!(out, "CVV: {}", card.cvv);
    let _ = writeln!(out, "Brand: {}", card.brand);
    let _ = writeln!(out, "Bank: {}", card.bank);
    let _ = writeln!(out, "Country: {} ({})\n", card.country_name, card.country);

    let _ = writeln!(out, "【Address Information】");
    let _ = writeln!(out, "Street: {}", addr.street);
    let _ = writeln!(out, "City: {}", addr.city);
    let _ = writeln!(out, "State: {}", addr.state);
    let _ = writeln!(out, "ZIP: {}", addr.zip);
    let _ = writeln!(out, "Country: {}", addr.country);
    let _ = writeln!(out, "Source: {}\n", addr.source.as_str());

    let _ = writeln!(out, "【Simple Format】");
    let _ = writeln!(out, "{}", card.pipe_line());
    let _ = writeln!(out, "{}", record.name);
    let _ = writeln!(out, "{}\n", addr.one_line());
}

/// Write the text report, stamped with the current local time
pub fn save_report<P: AsRef<Path>>(path: P, records: &[GeneratedRecord]) -> Result<()> {
    let generated_at = Local::now().format(TIMESTAMP_FORMAT).to_string();
    let content = render_report(records, &generated_at);

    fs::write(path.as_ref(), content)
        .with_context(|| format!("Failed to write report: {:?}", path.as_ref()))
}

/// Write records as a pretty-printed JSON array
pub fn save_json<P: AsRef<Path>>(path: P, records: &[GeneratedRecord]) -> Result<()> {
    let json = serde_json::to_string_pretty(records).context("Failed to serialize records")?;

    fs::write(path.as_ref(), json)
        .with_context(|| format!("Failed to write JSON export: {:?}", path.as_ref()))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{CardRecord, ExpiryDate};
    use crate::entities::address::{Address, AddressSource};

    fn sample_record() -> GeneratedRecord {
        GeneratedRecord {
            id: "00000000-0000-4000-8000-000000000000".to_string(),
            name: "Mary Smith".to_string(),
            card: CardRecord {
                card_number: "4517109512345674".to_string(),
                card_number_formatted: "4517 1095 1234 5674".to_string(),
                expiry: ExpiryDate::new(3, 29).unwrap(),
                cvv: "482".to_string(),
                brand: "Visa".to_string(),
                bank: "Jyske Bank".to_string(),
                country: "DK".to_string(),
                country_name: "Denmark".to_string(),
            },
            address: Address {
                street: "1 Market St".to_string(),
                city: "San Francisco".to_string(),
                state: "CA".to_string(),
                zip: "94105".to_string(),
                country: "US".to_string(),
                source: AddressSource::Database,
            },
            timestamp: "2026-10-19 09:30:00".to_string(),
        }
    }

    #[test]
    fn test_report_layout() {
        let report = render_report(&[sample_record()], "2026-10-19 09:30:01");
        let rule = "=".repeat(80);

        let expected = format!(
            "{rule}\n\
             Card Helper v1.0 - Card and Person Information Generator\n\
             Generated: 2026-10-19 09:30:01\n\
             Quantity: 1 records\n\
             {rule}\n\n\
             {rule}\n\
             Record #1\n\
             {rule}\n\n\
             【Person Information】\n\
             Name: Mary Smith\n\
             Generated: 2026-10-19 09:30:00\n\n\
             【Card Information】\n\
             Card Number: 4517109512345674\n\
             Formatted: 4517 1095 1234 5674\n\
             Expiry: 03/29\n\
             CVV: 482\n\
             Brand: Visa\n\
             Bank: Jyske Bank\n\
             Country: Denmark (DK)\n\n\
             【Address Information】\n\
             Street: 1 Market St\n\
             City: San Francisco\n\
             State: CA\n\
             ZIP: 94105\n\
             Country: US\n\
             Source: database\n\n\
             【Simple Format】\n\
             4517109512345674|03/29|482\n\
             Mary Smith\n\
             1 Market St, San Francisco, CA 94105\n\n",
            rule = rule
        );

        assert_eq!(report, expected);
    }

    #[test]
    fn test_report_numbers_records() {
        let records = vec![sample_record(), sample_record(), sample_record()];
        let report = render_report(&records, "now");

        assert!(report.contains("Quantity: 3 records"));
        assert!(report.contains("Record #1\n"));
        assert!(report.contains("Record #3\n"));
        assert!(!report.contains("Record #4"));
    }

    #[test]
    fn test_save_report_and_json() {
        let dir = tempfile::tempdir().unwrap();
        let txt = dir.path().join("generated_cards.txt");
        let json = dir.path().join("generated_cards.json");
        let records = vec![sample_record()];

        save_report(&txt, &records).unwrap();
        save_json(&json, &records).unwrap();

        let text = fs::read_to_string(&txt).unwrap();
        assert!(text.starts_with(&"=".repeat(80)));
        assert!(text.contains("4517109512345674|03/29|482"));

        let parsed: Vec<GeneratedRecord> =
            serde_json::from_str(&fs::read_to_string(&json).unwrap()).unwrap();
        assert_eq!(parsed, records);
    }

    #[test]
    fn test_save_report_to_missing_dir_fails() {
        let result = save_report("/nonexistent/dir/report.txt", &[sample_record()]);
        assert!(result.is_err());
    }
}
