pub mod anova;
pub mod batch;
pub mod chart;
pub mod config;
pub mod config_loader;
pub mod error;
pub mod report;
pub mod significance;
pub mod source;
pub mod special;

pub use anova::{one_way_anova, AnovaResult, ObservationGroup};
pub use batch::{ChartComparator, ChartComparison};
pub use chart::{Chart, GroupSummary, GroupTrend, Reading, SubjectSeries, TrendPoint};
pub use config::{AnalysisConfig, AppConfig, BatchConfig, OutputConfig, OutputFormat};
pub use config_loader::ConfigLoader;
pub use error::{Result, StatsError};
pub use report::ReportFormatter;
pub use significance::{format_f_statistic, format_p_value, Significance};
pub use source::{source_for_path, ChartSource, CsvChartSource, JsonChartSource};
pub use special::{f_cdf, f_survival, ln_gamma, regularized_incomplete_beta};
