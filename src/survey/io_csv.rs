// Primitives for reading and writing CSV files.

use std::fs::File;

use crate::survey::{
    io_common::{RawCell, RawTable},
    *,
};

pub fn read_csv_table(path: &str) -> TallyResult<RawTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;
    let header: Vec<String> = rdr
        .headers()
        .context(CsvLineParseSnafu { path, lineno: 1usize })?
        .iter()
        .map(|s| s.to_string())
        .collect();
    debug!("read_csv_table: {:?} header: {:?}", path, header);

    let mut rows: Vec<(usize, Vec<RawCell>)> = Vec::new();
    for (idx, line_r) in rdr.records().enumerate() {
        // The header is line 1.
        let lineno = idx + 2;
        let line = line_r.context(CsvLineParseSnafu { path, lineno })?;
        let cells: Vec<RawCell> = line
            .iter()
            .map(|s| {
                if s.is_empty() {
                    RawCell::Empty
                } else {
                    RawCell::Text(s.to_string())
                }
            })
            .collect();
        rows.push((lineno, cells));
    }
    debug!("read_csv_table: {:?}: {} rows", path, rows.len());
    Ok(RawTable {
        path: path.to_string(),
        header,
        rows,
    })
}

pub fn write_csv_table(path: &str, header: &[&str], rows: &[Vec<String>]) -> TallyResult<()> {
    let mut wtr: csv::Writer<File> =
        csv::Writer::from_path(path).context(CsvWriteSnafu { path })?;
    wtr.write_record(header).context(CsvWriteSnafu { path })?;
    for row in rows.iter() {
        wtr.write_record(row).context(CsvWriteSnafu { path })?;
    }
    wtr.flush()
        .map_err(csv::Error::from)
        .context(CsvWriteSnafu { path })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_read_table() {
        let p = std::env::temp_dir()
            .join("touchtally_io_csv_test.csv")
            .display()
            .to_string();
        write_csv_table(
            &p,
            &["Respondent ID", "like1_x", "like1_y"],
            &[
                vec!["a".to_string(), "1.5".to_string(), "2".to_string()],
                vec!["b".to_string(), String::new(), String::new()],
            ],
        )
        .unwrap();
        let t = read_csv_table(&p).unwrap();
        assert_eq!(t.header, vec!["Respondent ID", "like1_x", "like1_y"]);
        assert_eq!(t.rows.len(), 2);
        assert_eq!(t.rows[0].0, 2);
        assert_eq!(t.rows[0].1[1], RawCell::Text("1.5".to_string()));
        assert_eq!(t.rows[1].1[1], RawCell::Empty);
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            read_csv_table("/nonexistent/touchtally/area.csv"),
            Err(SurveyError::CsvOpen { .. })
        ));
    }
}
