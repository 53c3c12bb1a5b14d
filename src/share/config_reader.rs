use crate::share::*;

use serde::{Deserialize, Serialize};

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceSettings {
    pub provider: Option<String>,
    #[serde(rename = "filePath")]
    pub file_path: Option<String>,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
    pub delimiter: Option<String>,
}

#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulesSettings {
    #[serde(rename = "wideColumnThreshold")]
    pub wide_column_threshold: Option<usize>,
    #[serde(rename = "sumTolerance")]
    pub sum_tolerance: Option<f64>,
    pub unit: Option<String>,
}

impl RulesSettings {
    pub fn to_rules(&self) -> ShareResult<NormalizeRules> {
        let defaults = NormalizeRules::DEFAULT_RULES;
        let res = NormalizeRules {
            wide_column_threshold: match self.wide_column_threshold {
                None => defaults.wide_column_threshold,
                Some(x) if (1..=16).contains(&x) => x,
                Some(x) => {
                    whatever!("wideColumnThreshold must be between 1 and 16, got {}", x)
                }
            },
            sum_tolerance: match self.sum_tolerance {
                None => defaults.sum_tolerance,
                Some(x) if x >= 0.0 => x,
                Some(x) => {
                    whatever!("sumTolerance cannot be negative, got {}", x)
                }
            },
            unit: match self.unit.as_deref() {
                None | Some("auto") => UnitMode::Auto,
                Some("fraction") => UnitMode::Fraction,
                Some("percentage") => UnitMode::Percentage,
                Some(x) => {
                    whatever!(
                        "Cannot use unit {:?}: expected auto, fraction or percentage",
                        x
                    )
                }
            },
        };
        Ok(res)
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "outputPath")]
    pub output_path: Option<String>,
    #[serde(rename = "summaryPath")]
    pub summary_path: Option<String>,
    #[serde(rename = "topType")]
    pub top_type: Option<String>,
    #[serde(rename = "topN")]
    pub top_n: Option<usize>,
}

#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShareConfig {
    #[serde(default)]
    pub source: SourceSettings,
    #[serde(default)]
    pub rules: RulesSettings,
    #[serde(rename = "outputSettings", default)]
    pub output_settings: OutputSettings,
}

pub fn read_config(path: &str) -> ShareResult<ShareConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: ShareConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    debug!("read_config: {:?}", config);
    Ok(config)
}

/// Joins a path from the configuration file to the directory of this file.
pub fn resolve_relative(config_path: &str, file_path: &str) -> String {
    if Path::new(file_path).is_absolute() {
        return file_path.to_string();
    }
    match Path::new(config_path).parent() {
        Some(root) => {
            let p: PathBuf = [root, Path::new(file_path)].iter().collect();
            p.as_path().display().to_string()
        }
        None => file_path.to_string(),
    }
}
