pub mod file;
pub mod stdin;

use tradalytics_core::RawTable;

/// Decode CSV text into a row table. The first record is the header row;
/// ragged rows are accepted and padded by the engine.
pub fn parse_csv(text: &str) -> Result<RawTable, Box<dyn std::error::Error>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(RawTable::new(headers, rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv_quoted_dates() {
        let text = "Date (GMT+1),Market,Setup,P/L,W/L\n\
                    \"June 4, 2025 9:41 PM (GMT+1)\",NQ,ORB,\"$1,250.00\",W\n\
                    \"June 5, 2025 9:41 PM (GMT+1)\",ES,,-$75.00,L\n";
        let table = parse_csv(text).unwrap();
        assert_eq!(table.headers[0], "Date (GMT+1)");
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0][0], "June 4, 2025 9:41 PM (GMT+1)");
        assert_eq!(table.rows[0][3], "$1,250.00");
        assert_eq!(table.rows[1][2], "");
    }

    #[test]
    fn test_parse_csv_ragged_rows() {
        let text = "Date,Market,P/L,W/L\nJune 4, 2025,NQ\n";
        let table = parse_csv(text).unwrap();
        assert_eq!(table.rows.len(), 1);
    }
}
