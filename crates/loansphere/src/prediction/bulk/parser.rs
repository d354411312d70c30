use std::collections::HashSet;
use std::io::Read;

use super::BulkError;

pub(crate) struct ParsedTable {
    pub(crate) headers: Vec<String>,
    pub(crate) rows: Vec<Vec<String>>,
    /// Header names that occurred more than once before renaming.
    pub(crate) duplicated: Vec<String>,
}

pub(crate) fn parse_table<R: Read>(reader: R) -> Result<ParsedTable, BulkError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|header| header.trim_start_matches('\u{feff}').to_string())
        .collect();

    if headers.iter().all(|header| header.is_empty()) {
        return Err(BulkError::Empty);
    }

    let (headers, duplicated) = disambiguate(headers);

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(ParsedTable {
        headers,
        rows,
        duplicated,
    })
}

/// Give every column a unique name: blank headers become `Unnamed: {index}` and repeats
/// become `{name}.1`, `{name}.2`.
fn disambiguate(headers: Vec<String>) -> (Vec<String>, Vec<String>) {
    let mut seen: HashSet<String> = headers
        .iter()
        .filter(|header| !header.is_empty())
        .cloned()
        .collect();
    let mut first_use = HashSet::new();
    let mut duplicated = Vec::new();
    let mut renamed = Vec::with_capacity(headers.len());

    for (index, header) in headers.into_iter().enumerate() {
        if header.is_empty() {
            let mut name = format!("Unnamed: {index}");
            let mut suffix = 0;
            while seen.contains(&name) {
                suffix += 1;
                name = format!("Unnamed: {index}.{suffix}");
            }
            seen.insert(name.clone());
            renamed.push(name);
            continue;
        }

        if first_use.insert(header.clone()) {
            renamed.push(header);
            continue;
        }

        if !duplicated.contains(&header) {
            duplicated.push(header.clone());
        }
        let mut suffix = 1;
        let mut name = format!("{header}.{suffix}");
        while seen.contains(&name) {
            suffix += 1;
            name = format!("{header}.{suffix}");
        }
        seen.insert(name.clone());
        renamed.push(name);
    }

    (renamed, duplicated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_byte_order_mark_and_whitespace() {
        let table =
            parse_table("\u{feff}Term , Purpose\n 1 , Other \n".as_bytes()).expect("parses");
        assert_eq!(table.headers, vec!["Term", "Purpose"]);
        assert_eq!(table.rows, vec![vec!["1".to_string(), "Other".to_string()]]);
    }

    #[test]
    fn ragged_rows_are_parse_failures() {
        let error = parse_table("Term,Purpose\n1\n".as_bytes())
            .err()
            .expect("ragged row rejected");
        assert!(matches!(error, BulkError::Parse(_)));
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(
            parse_table("".as_bytes()).err(),
            Some(BulkError::Empty)
        ));
    }

    #[test]
    fn duplicate_headers_are_renamed_and_recorded() {
        let table = parse_table("Term,Term,Term.1,Term\n0,1,2,3\n".as_bytes()).expect("parses");
        assert_eq!(table.headers, vec!["Term", "Term.2", "Term.1", "Term.3"]);
        assert_eq!(table.duplicated, vec!["Term"]);
        assert_eq!(table.rows[0], vec!["0", "1", "2", "3"]);
    }

    #[test]
    fn blank_trailing_headers_get_positional_names() {
        let table = parse_table("Term,Purpose,,\n1,Other,,\n".as_bytes()).expect("parses");
        assert_eq!(table.headers, vec!["Term", "Purpose", "Unnamed: 2", "Unnamed: 3"]);
        assert!(table.duplicated.is_empty());
        assert_eq!(table.rows[0], vec!["1", "Other", "", ""]);
    }
}
