use std::path::Path;

use serde::Deserialize;

use crate::error::{AppResult, ConfigError};

/// Program configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Folder that receives downloaded files
    pub output_folder: String,
    /// Folder scanned by `batch-export`
    pub quiz_folder: String,
    /// Export template used when none is given
    pub default_template: String,
    /// Export format used when none is given
    pub default_format: String,
    // --- school defaults printed in headers ---
    pub school_name: String,
    pub school_address: String,
    pub class_name: String,
    pub teacher_name: String,
    // --- export defaults ---
    pub include_answers: bool,
    pub include_points: bool,
    // --- simulated latency ---
    pub generation_delay_min_ms: u64,
    pub generation_delay_max_ms: u64,
    pub export_delay_min_ms: u64,
    pub export_delay_max_ms: u64,
    /// Probability in [0, 1] that mock generation takes the failure branch
    pub generation_failure_rate: f64,
    /// Origin used to build share links
    pub share_origin: String,
    /// Exports running at once in `batch-export`
    pub max_concurrent_exports: usize,
    /// Whether to log at debug level
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_folder: "downloads".to_string(),
            quiz_folder: "quizzes".to_string(),
            default_template: "school-standard".to_string(),
            default_format: "pdf".to_string(),
            school_name: "ISTITUTO COMPRENSIVO \"ALESSANDRO MANZONI\"".to_string(),
            school_address: "Via dei Promessi Sposi, 25 - 20100 Milano (MI)".to_string(),
            class_name: "3°A".to_string(),
            teacher_name: String::new(),
            include_answers: false,
            include_points: true,
            generation_delay_min_ms: 2000,
            generation_delay_max_ms: 4000,
            export_delay_min_ms: 1000,
            export_delay_max_ms: 2000,
            generation_failure_rate: 0.0,
            share_origin: "https://www.teachinghub.it".to_string(),
            max_concurrent_exports: 4,
            verbose_logging: false,
        }
    }
}

/// Optional overrides read from a TOML file
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    output_folder: Option<String>,
    quiz_folder: Option<String>,
    default_template: Option<String>,
    default_format: Option<String>,
    school_name: Option<String>,
    school_address: Option<String>,
    class_name: Option<String>,
    teacher_name: Option<String>,
    include_answers: Option<bool>,
    include_points: Option<bool>,
    generation_delay_min_ms: Option<u64>,
    generation_delay_max_ms: Option<u64>,
    export_delay_min_ms: Option<u64>,
    export_delay_max_ms: Option<u64>,
    generation_failure_rate: Option<f64>,
    share_origin: Option<String>,
    max_concurrent_exports: Option<usize>,
    verbose_logging: Option<bool>,
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Self {
        Self::default().with_env()
    }

    /// Load a TOML file, then let environment variables override it
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::error::AppError::file_read_failed(path.display().to_string(), e))?;
        let file: ConfigFile = toml::from_str(&content).map_err(|e| ConfigError::InvalidFile {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let d = Self::default();
        let config = Self {
            output_folder: file.output_folder.unwrap_or(d.output_folder),
            quiz_folder: file.quiz_folder.unwrap_or(d.quiz_folder),
            default_template: file.default_template.unwrap_or(d.default_template),
            default_format: file.default_format.unwrap_or(d.default_format),
            school_name: file.school_name.unwrap_or(d.school_name),
            school_address: file.school_address.unwrap_or(d.school_address),
            class_name: file.class_name.unwrap_or(d.class_name),
            teacher_name: file.teacher_name.unwrap_or(d.teacher_name),
            include_answers: file.include_answers.unwrap_or(d.include_answers),
            include_points: file.include_points.unwrap_or(d.include_points),
            generation_delay_min_ms: file
                .generation_delay_min_ms
                .unwrap_or(d.generation_delay_min_ms),
            generation_delay_max_ms: file
                .generation_delay_max_ms
                .unwrap_or(d.generation_delay_max_ms),
            export_delay_min_ms: file.export_delay_min_ms.unwrap_or(d.export_delay_min_ms),
            export_delay_max_ms: file.export_delay_max_ms.unwrap_or(d.export_delay_max_ms),
            generation_failure_rate: file
                .generation_failure_rate
                .unwrap_or(d.generation_failure_rate),
            share_origin: file.share_origin.unwrap_or(d.share_origin),
            max_concurrent_exports: file
                .max_concurrent_exports
                .unwrap_or(d.max_concurrent_exports),
            verbose_logging: file.verbose_logging.unwrap_or(d.verbose_logging),
        }
        .with_env();

        config.validate()?;
        Ok(config)
    }

    fn with_env(self) -> Self {
        Self {
            output_folder: env_or("TEACHING_HUB_OUTPUT_FOLDER", self.output_folder),
            quiz_folder: env_or("TEACHING_HUB_QUIZ_FOLDER", self.quiz_folder),
            default_template: env_or("TEACHING_HUB_TEMPLATE", self.default_template),
            default_format: env_or("TEACHING_HUB_FORMAT", self.default_format),
            school_name: env_or("TEACHING_HUB_SCHOOL_NAME", self.school_name),
            school_address: env_or("TEACHING_HUB_SCHOOL_ADDRESS", self.school_address),
            class_name: env_or("TEACHING_HUB_CLASS_NAME", self.class_name),
            teacher_name: env_or("TEACHING_HUB_TEACHER_NAME", self.teacher_name),
            include_answers: env_or("TEACHING_HUB_INCLUDE_ANSWERS", self.include_answers),
            include_points: env_or("TEACHING_HUB_INCLUDE_POINTS", self.include_points),
            generation_delay_min_ms: env_or(
                "TEACHING_HUB_GENERATION_DELAY_MIN_MS",
                self.generation_delay_min_ms,
            ),
            generation_delay_max_ms: env_or(
                "TEACHING_HUB_GENERATION_DELAY_MAX_MS",
                self.generation_delay_max_ms,
            ),
            export_delay_min_ms: env_or("TEACHING_HUB_EXPORT_DELAY_MIN_MS", self.export_delay_min_ms),
            export_delay_max_ms: env_or("TEACHING_HUB_EXPORT_DELAY_MAX_MS", self.export_delay_max_ms),
            generation_failure_rate: env_or(
                "TEACHING_HUB_FAILURE_RATE",
                self.generation_failure_rate,
            ),
            share_origin: env_or("TEACHING_HUB_SHARE_ORIGIN", self.share_origin),
            max_concurrent_exports: env_or(
                "TEACHING_HUB_MAX_CONCURRENT_EXPORTS",
                self.max_concurrent_exports,
            ),
            verbose_logging: env_or("VERBOSE_LOGGING", self.verbose_logging),
        }
    }

    /// Reject inverted delay ranges and a zero export concurrency
    pub fn validate(&self) -> AppResult<()> {
        if self.max_concurrent_exports == 0 {
            return Err(ConfigError::InvalidConcurrency.into());
        }
        for (min_ms, max_ms) in [
            (self.generation_delay_min_ms, self.generation_delay_max_ms),
            (self.export_delay_min_ms, self.export_delay_max_ms),
        ] {
            if min_ms > max_ms {
                return Err(ConfigError::InvalidDelayRange { min_ms, max_ms }.into());
            }
        }
        Ok(())
    }

    /// Config with every artificial delay disabled (tests, batch runs)
    pub fn without_delays(mut self) -> Self {
        self.generation_delay_min_ms = 0;
        self.generation_delay_max_ms = 0;
        self.export_delay_min_ms = 0;
        self.export_delay_max_ms = 0;
        self
    }

    /// School header defaults as a `SchoolInfo`
    pub fn school_info(&self) -> crate::models::SchoolInfo {
        crate::models::SchoolInfo {
            school_name: self.school_name.clone(),
            school_address: self.school_address.clone(),
            class_name: self.class_name.clone(),
            date: None,
            teacher_name: (!self.teacher_name.is_empty()).then(|| self.teacher_name.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_without_delays_zeroes_bounds() {
        let config = Config::default().without_delays();
        assert_eq!(config.generation_delay_max_ms, 0);
        assert_eq!(config.export_delay_max_ms, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_inverted_delay_range_is_rejected() {
        let config = Config {
            export_delay_min_ms: 500,
            export_delay_max_ms: 100,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_school_info_omits_empty_teacher() {
        let info = Config::default().school_info();
        assert!(info.teacher_name.is_none());
        assert_eq!(info.class_name, "3°A");
    }

    #[test]
    fn test_from_toml_file_overrides_defaults() {
        let dir = std::env::temp_dir().join(format!("th-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "class_name = \"5°B\"\nexport_delay_max_ms = 10\nexport_delay_min_ms = 0\n")
            .unwrap();

        let config = Config::from_toml_file(&path).unwrap();
        assert_eq!(config.export_delay_max_ms, 10);
        assert_eq!(config.school_name, Config::default().school_name);

        std::fs::remove_dir_all(&dir).ok();
    }
}
