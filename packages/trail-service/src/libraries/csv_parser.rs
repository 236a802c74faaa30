use crate::models::RawRecord;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CsvError {
    #[error("CSV must have at least a header row and one data row")]
    TooFewLines,
}

/// Parse CSV text into records keyed by the header row.
///
/// Blank data lines are skipped. A row shorter than the header gets empty
/// strings for the missing columns; extra columns are dropped.
pub fn parse_csv(text: &str) -> Result<Vec<RawRecord>, CsvError> {
    let lines: Vec<&str> = text.trim().split('\n').collect();
    if lines.len() < 2 {
        return Err(CsvError::TooFewLines);
    }

    let headers: Vec<String> = parse_csv_line(lines[0])
        .into_iter()
        .map(|h| h.trim().to_string())
        .collect();

    let records = lines[1..]
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let values = parse_csv_line(line);
            headers
                .iter()
                .enumerate()
                .map(|(i, header)| {
                    let value = values.get(i).map(|v| v.trim()).unwrap_or_default();
                    (header.clone(), value.to_string())
                })
                .collect::<RawRecord>()
        })
        .collect();

    Ok(records)
}

/// Split one line on commas. A double quote toggles quoted state and is
/// dropped; there is no escaped-quote or multi-line support.
pub fn parse_csv_line(line: &str) -> Vec<String> {
    let mut result = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in line.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => result.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }

    result.push(current);
    result
}
