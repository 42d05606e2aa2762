// Primitives for reading Excel files.

use calamine::{open_workbook, DataType, Reader, Xlsx};

use crate::survey::{
    io_common::{RawCell, RawTable},
    *,
};

pub fn read_excel_table(path: &str, worksheet_name_o: Option<&str>) -> TallyResult<RawTable> {
    let wrange = get_range(path, worksheet_name_o)?;

    let mut iter = wrange.rows();
    let header: Vec<String> = iter
        .next()
        .context(EmptyExcelSnafu { path })?
        .iter()
        .map(|dt| match dt {
            DataType::String(s) => s.clone(),
            DataType::Empty => String::new(),
            x => format!("{:?}", x),
        })
        .collect();
    debug!("read_excel_table: {:?} header: {:?}", path, header);

    let rows: Vec<(usize, Vec<RawCell>)> = iter
        .enumerate()
        .map(|(idx, row)| {
            // Line 1 is the header, the numbering starts at 1 as in the spreadsheet.
            let lineno = idx + 2;
            (lineno, row.iter().map(read_cell).collect())
        })
        .collect();
    debug!("read_excel_table: {:?}: {} rows", path, rows.len());

    Ok(RawTable {
        path: path.to_string(),
        header,
        rows,
    })
}

fn read_cell(cell: &DataType) -> RawCell {
    match cell {
        DataType::Empty => RawCell::Empty,
        DataType::Float(f) => RawCell::Number(*f),
        DataType::Int(i) => RawCell::Number(*i as f64),
        DataType::String(s) => RawCell::Text(s.clone()),
        // Booleans, dates and errors are not coordinates: kept as text to be reported.
        x => RawCell::Text(format!("{:?}", x)),
    }
}

fn get_range(path: &str, worksheet_name_o: Option<&str>) -> TallyResult<calamine::Range<DataType>> {
    debug!(
        "read_excel_table: path: {:?} worksheet: {:?}",
        &path, &worksheet_name_o
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    // A worksheet name was provided, use it.
    if let Some(worksheet_name) = worksheet_name_o {
        let wrange = workbook
            .worksheet_range(worksheet_name)
            .context(MissingWorksheetSnafu {
                name: worksheet_name,
                path,
            })?
            .context(OpeningExcelSnafu { path })?;
        Ok(wrange)
    } else {
        let all_worksheets = workbook.worksheets();
        match all_worksheets.as_slice() {
            [] => EmptyExcelSnafu { path }.fail(),
            [(worksheet_name, wrange)] => {
                debug!(
                    "read_excel_table: path: {:?} worksheet: {:?}",
                    &path, &worksheet_name
                );
                Ok(wrange.clone())
            }
            [(worksheet_name, wrange), ..] => {
                warn!(
                    "{} has {} worksheets, using the first one ({}). Set the worksheet name to use another one.",
                    path,
                    all_worksheets.len(),
                    worksheet_name
                );
                Ok(wrange.clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells() {
        assert_eq!(read_cell(&DataType::Empty), RawCell::Empty);
        assert_eq!(read_cell(&DataType::Int(3)), RawCell::Number(3.0));
        assert_eq!(read_cell(&DataType::Float(2.5)), RawCell::Number(2.5));
        assert_eq!(
            read_cell(&DataType::String("r1".to_string())),
            RawCell::Text("r1".to_string())
        );
        assert!(matches!(read_cell(&DataType::Bool(true)), RawCell::Text(_)));
    }

    fn workbook() -> String {
        format!("{}/testdata/excel/survey.xlsx", env!("CARGO_MANIFEST_DIR"))
    }

    #[test]
    fn first_worksheet_by_default() {
        let t = read_excel_table(&workbook(), None).unwrap();
        assert_eq!(t.header[0], "Respondent ID");
        assert_eq!(t.header.len(), 9);
        assert_eq!(t.rows.len(), 4);
        let (lineno, cells) = &t.rows[2];
        assert_eq!(*lineno, 4);
        assert_eq!(cells[0], RawCell::Text("r3".to_string()));
        assert_eq!(cells[1], RawCell::Number(15.0));
        assert_eq!(cells[3], RawCell::Text("NA".to_string()));
        assert_eq!(cells[4], RawCell::Empty);
    }

    #[test]
    fn named_worksheet() {
        let t = read_excel_table(&workbook(), Some("areas")).unwrap();
        assert_eq!(t.header, vec!["name", "x", "y"]);
        assert_eq!(t.rows.len(), 12);
        assert_eq!(t.rows[4].1[0], RawCell::Text("shop".to_string()));
        assert_eq!(t.rows[4].1[1], RawCell::Number(10.0));
    }

    #[test]
    fn unknown_worksheet() {
        assert!(matches!(
            read_excel_table(&workbook(), Some("Form1")),
            Err(SurveyError::MissingWorksheet { .. })
        ));
    }

    #[test]
    fn missing_workbook() {
        assert!(matches!(
            read_excel_table("/nonexistent/touchtally/response.xlsx", None),
            Err(SurveyError::OpeningExcel { .. })
        ));
    }
}
