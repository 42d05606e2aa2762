use crate::survey::*;

use serde::{Deserialize, Serialize};

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "surveyName")]
    pub survey_name: String,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
    #[serde(rename = "markerRadius")]
    pub marker_radius: Option<u32>,
    #[serde(rename = "writeCsvTables")]
    pub write_csv_tables: Option<bool>,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Provider {
    Csv,
    Xlsx,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct FileSource {
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
    /// Only used for the responses.
    #[serde(rename = "idColumn")]
    pub id_column: Option<String>,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
}

impl FileSource {
    pub fn new(provider: &str, file_path: &str) -> FileSource {
        FileSource {
            provider: provider.to_string(),
            file_path: file_path.to_string(),
            id_column: None,
            excel_worksheet_name: None,
        }
    }

    pub fn provider(&self) -> TallyResult<Provider> {
        match self.provider.as_str() {
            "csv" => Ok(Provider::Csv),
            "xlsx" | "excel" => Ok(Provider::Xlsx),
            x => UnknownProviderSnafu { provider: x }.fail(),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct SurveyConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: OutputSettings,
    /// Without areas, the touches are only drawn on the background image.
    #[serde(rename = "regionSource")]
    pub region_source: Option<FileSource>,
    #[serde(rename = "responseSource")]
    pub response_source: FileSource,
    #[serde(rename = "backgroundImage")]
    pub background_image: Option<String>,
}

/// Guesses the provider of a file from its extension. Defaults to csv.
pub fn guess_provider(path: &str) -> String {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase());
    match ext.as_deref() {
        Some("xlsx") => "xlsx".to_string(),
        _ => "csv".to_string(),
    }
}

pub fn read_config(path: &str) -> TallyResult<SurveyConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: SurveyConfig = serde_json::from_str(&contents).context(ParsingJsonSnafu {})?;
    Ok(config)
}

pub fn read_summary(path: &str) -> TallyResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_config() {
        let js = r#"{
            "outputSettings": {
                "surveyName": "Entrance hall",
                "outputDirectory": "out",
                "markerRadius": 6
            },
            "regionSource": {"provider": "csv", "filePath": "area.csv"},
            "responseSource": {
                "provider": "xlsx",
                "filePath": "response.xlsx",
                "idColumn": "ID",
                "excelWorksheetName": "Form1"
            },
            "backgroundImage": "hall.png"
        }"#;
        let config: SurveyConfig = serde_json::from_str(js).unwrap();
        assert_eq!(config.output_settings.marker_radius, Some(6));
        assert_eq!(config.output_settings.write_csv_tables, None);
        assert_eq!(config.region_source.as_ref().unwrap().provider().unwrap(), Provider::Csv);
        assert_eq!(config.response_source.provider().unwrap(), Provider::Xlsx);
        assert_eq!(config.response_source.id_column.as_deref(), Some("ID"));
        assert_eq!(config.background_image.as_deref(), Some("hall.png"));
    }

    #[test]
    fn optional_fields_can_be_left_out() {
        let js = r#"{
            "outputSettings": {"surveyName": "s"},
            "regionSource": {"provider": "csv", "filePath": "area.csv"},
            "responseSource": {"provider": "csv", "filePath": "response.csv"}
        }"#;
        let config: SurveyConfig = serde_json::from_str(js).unwrap();
        assert_eq!(config.background_image, None);
        assert_eq!(config.output_settings.output_directory, None);
    }

    #[test]
    fn areas_are_optional() {
        let js = r#"{
            "outputSettings": {"surveyName": "s", "outputDirectory": "out"},
            "responseSource": {"provider": "csv", "filePath": "response.csv"},
            "backgroundImage": "hall.png"
        }"#;
        let config: SurveyConfig = serde_json::from_str(js).unwrap();
        assert_eq!(config.region_source, None);
    }

    #[test]
    fn guess_provider_from_extension() {
        assert_eq!(guess_provider("a/b/response.XLSX"), "xlsx");
        assert_eq!(guess_provider("response.csv"), "csv");
        assert_eq!(guess_provider("response"), "csv");
    }
}
