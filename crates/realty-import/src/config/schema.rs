use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    pub version: String,
    #[serde(default = "default_data_root")]
    pub data_root: String,
    #[serde(default)]
    pub database_path: Option<String>,
    #[serde(default)]
    pub sources: SourceDirs,
    #[serde(default)]
    pub periods: PeriodConfig,
    #[serde(default = "default_har_reports")]
    pub har_reports: Vec<ReportMapping>,
    #[serde(default)]
    pub retry: RetryConfig,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            data_root: default_data_root(),
            database_path: None,
            sources: SourceDirs::default(),
            periods: PeriodConfig::default(),
            har_reports: default_har_reports(),
            retry: RetryConfig::default(),
        }
    }
}

impl ImportConfig {
    /// Base directory of one import group.
    pub fn group_dir(&self, group: ImportGroup) -> PathBuf {
        let sub = match group {
            ImportGroup::DataProcess12 => &self.sources.dataprocess1,
            ImportGroup::DataProcess3 => &self.sources.dataprocess3,
            ImportGroup::HarMls => &self.sources.har_mls,
        };
        PathBuf::from(&self.data_root).join(sub)
    }
}

fn default_data_root() -> String {
    "Core Agent Architecture -Webiste".to_string()
}

/// The three source trees, imported in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImportGroup {
    DataProcess12,
    DataProcess3,
    HarMls,
}

impl ImportGroup {
    pub const ALL: [ImportGroup; 3] = [
        ImportGroup::DataProcess12,
        ImportGroup::DataProcess3,
        ImportGroup::HarMls,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            ImportGroup::DataProcess12 => "dataprocess1-2",
            ImportGroup::DataProcess3 => "dataprocess3",
            ImportGroup::HarMls => "har-mls",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ImportGroup::DataProcess12 => "Data Process 1-2",
            ImportGroup::DataProcess3 => "Data Process 3",
            ImportGroup::HarMls => "HAR MLS Monthly Reports",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceDirs {
    #[serde(default = "default_dataprocess1")]
    pub dataprocess1: String,
    #[serde(default = "default_dataprocess3")]
    pub dataprocess3: String,
    #[serde(default = "default_har_mls")]
    pub har_mls: String,
}

fn default_dataprocess1() -> String {
    "Data Processing".to_string()
}

fn default_dataprocess3() -> String {
    "DataProcess 3".to_string()
}

fn default_har_mls() -> String {
    "Data process 4".to_string()
}

impl Default for SourceDirs {
    fn default() -> Self {
        Self {
            dataprocess1: default_dataprocess1(),
            dataprocess3: default_dataprocess3(),
            har_mls: default_har_mls(),
        }
    }
}

/// Reporting periods used when a source row carries no date of its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodConfig {
    #[serde(default = "default_market_data_year")]
    pub market_data_year: i32,
    #[serde(default = "default_har_report_year")]
    pub har_report_year: i32,
    #[serde(default = "default_mls_snapshot_date")]
    pub mls_snapshot_date: String,
}

fn default_market_data_year() -> i32 {
    2024
}

fn default_har_report_year() -> i32 {
    2025
}

fn default_mls_snapshot_date() -> String {
    "2024-10-01".to_string()
}

impl Default for PeriodConfig {
    fn default() -> Self {
        Self {
            market_data_year: default_market_data_year(),
            har_report_year: default_har_report_year(),
            mls_snapshot_date: default_mls_snapshot_date(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    Monthly,
    Quarterly,
    Seasonal,
}

impl ReportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::Monthly => "monthly",
            ReportType::Quarterly => "quarterly",
            ReportType::Seasonal => "seasonal",
        }
    }
}

/// Maps one HAR report folder to the month it describes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMapping {
    pub folder: String,
    pub month: u32,
    pub report_type: ReportType,
}

impl ReportMapping {
    fn new(folder: &str, month: u32, report_type: ReportType) -> Self {
        Self {
            folder: folder.to_string(),
            month,
            report_type,
        }
    }
}

fn default_har_reports() -> Vec<ReportMapping> {
    use ReportType::*;
    vec![
        ReportMapping::new("Houston Association of Realtors (HAR) MLS Data Rep", 1, Monthly),
        ReportMapping::new("Houston Association of Realtors MLS Market Report", 2, Monthly),
        ReportMapping::new("Houston Association of Realtors (HAR) MLS Data Ana", 3, Monthly),
        ReportMapping::new("Houston Association of Realtors MLS Market Analysi", 4, Monthly),
        ReportMapping::new("Houston Association of Realtors MLS Market Analysi-June", 6, Monthly),
        ReportMapping::new("Houston Association of Realtors MLS Data Report_ J", 7, Monthly),
        ReportMapping::new("Houston Metro Area Real Estate Market Analysis_ Ju", 7, Monthly),
        ReportMapping::new("Houston Real Estate Market Analysis_ August-Decemb", 8, Seasonal),
        ReportMapping::new("Harris County Texas Summer 2025 Real Estate Market", 6, Seasonal),
    ]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,
}

fn default_max_attempts() -> u32 {
    1
}

fn default_backoff_ms() -> u64 {
    250
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_ms: default_backoff_ms(),
        }
    }
}
