// THEORY:
// The `survey` module is the batch layer on top of the cloud detector. A single
// satellite pass produces many independent skies, and a survey counts all of
// them at once.
//
// Key architectural principles:
// 1.  **Independent Work**: Each sky is counted by the same single-threaded
//     detector used everywhere else. No state is shared between skies, so the
//     only coordination needed is handing out work and collecting answers.
// 2.  **Round-Robin Dispatch**: Skies are dealt to `workers` batches in turn,
//     and every batch runs on tokio's blocking pool, since counting is pure CPU
//     work with no suspension points.
// 3.  **Ordered Results**: Reports come back in the same order the skies went
//     in, regardless of which worker finished first.

use std::path::Path;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core_modules::cloud::Cloud;
use crate::core_modules::cloud_detector::cloud_detector::{count_sky, find_clouds};
use crate::core_modules::error::{Result, SkyError};
use crate::core_modules::sky::Sky;

/// Configuration for a `CloudSurvey`, allowing for tunable behavior.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SurveyConfig {
    /// Number of blocking tasks the skies are spread across.
    pub workers: usize,
    /// Attach the full `Cloud` list to every report, not just the count.
    pub collect_clouds: bool,
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            workers: num_cpus::get(),
            collect_clouds: false,
        }
    }
}

impl SurveyConfig {
    /// Reads a JSON config. Missing fields keep their defaults.
    pub fn from_json(input: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(SkyError::InvalidConfig(
                "a survey needs at least one worker".to_string(),
            ));
        }
        Ok(())
    }
}

/// The result of counting one sky.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurveyReport {
    pub name: String,
    pub width: usize,
    pub height: usize,
    pub cloud_count: usize,
    /// Empty unless `collect_clouds` was set.
    pub clouds: Vec<Cloud>,
}

impl SurveyReport {
    fn build(name: String, sky: &Sky, collect_clouds: bool) -> Self {
        let (cloud_count, clouds) = if collect_clouds {
            let clouds = find_clouds(sky);
            (clouds.len(), clouds)
        } else {
            (count_sky(sky), Vec::new())
        };

        Self {
            name,
            width: sky.width(),
            height: sky.height(),
            cloud_count,
            clouds,
        }
    }
}

/// Totals across every report of a survey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SurveySummary {
    pub skies: usize,
    pub total_clouds: usize,
    /// Size in cells of the largest cloud seen; `None` when clouds were not collected.
    pub largest_cloud: Option<usize>,
    /// Name of the sky with the most clouds.
    pub cloudiest: Option<String>,
}

impl SurveySummary {
    pub fn from_reports(reports: &[SurveyReport]) -> Self {
        let largest_cloud = reports
            .iter()
            .flat_map(|r| r.clouds.iter().map(|c| c.size_in_cells))
            .max();
        // Ties go to the earliest sky.
        let cloudiest = reports
            .iter()
            .rev()
            .max_by_key(|r| r.cloud_count)
            .filter(|r| r.cloud_count > 0)
            .map(|r| r.name.clone());

        Self {
            skies: reports.len(),
            total_clouds: reports.iter().map(|r| r.cloud_count).sum(),
            largest_cloud,
            cloudiest,
        }
    }
}

/// Counts batches of skies across a pool of blocking workers.
pub struct CloudSurvey {
    config: SurveyConfig,
}

impl CloudSurvey {
    pub fn new(config: SurveyConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SurveyConfig {
        &self.config
    }

    /// Counts every sky and returns the reports in input order.
    pub async fn run(&self, skies: Vec<(String, Sky)>) -> Result<Vec<SurveyReport>> {
        let total = skies.len();
        let worker_count = self.config.workers.min(total.max(1));
        info!(skies = total, workers = worker_count, "survey started");

        let mut batches: Vec<Vec<(usize, String, Sky)>> = vec![Vec::new(); worker_count];
        let mut worker_idx = 0;
        for (index, (name, sky)) in skies.into_iter().enumerate() {
            batches[worker_idx].push((index, name, sky));
            worker_idx = (worker_idx + 1) % worker_count;
        }

        let collect_clouds = self.config.collect_clouds;
        let workers = batches.into_iter().enumerate().map(|(worker, batch)| {
            tokio::task::spawn_blocking(move || {
                debug!(worker, skies = batch.len(), "worker started");
                batch
                    .into_iter()
                    .map(|(index, name, sky)| (index, SurveyReport::build(name, &sky, collect_clouds)))
                    .collect::<Vec<_>>()
            })
        });

        let mut indexed: Vec<(usize, SurveyReport)> = Vec::with_capacity(total);
        for finished in join_all(workers).await {
            indexed.extend(finished?);
        }
        indexed.sort_unstable_by_key(|(index, _)| *index);

        let reports: Vec<SurveyReport> = indexed.into_iter().map(|(_, report)| report).collect();
        info!(
            skies = reports.len(),
            clouds = reports.iter().map(|r| r.cloud_count).sum::<usize>(),
            "survey finished"
        );
        Ok(reports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samples;

    fn named_samples() -> Vec<(String, Sky)> {
        samples::all()
            .into_iter()
            .enumerate()
            .map(|(i, sky)| (format!("pass-{}", i + 1), sky))
            .collect()
    }

    #[test]
    fn default_config_uses_every_cpu() {
        let config = SurveyConfig::default();
        assert_eq!(config.workers, num_cpus::get());
        assert!(!config.collect_clouds);
    }

    #[test]
    fn json_config_fills_missing_fields() {
        let config = SurveyConfig::from_json(r#"{"collect_clouds": true}"#).unwrap();
        assert!(config.collect_clouds);
        assert_eq!(config.workers, num_cpus::get());

        let config = SurveyConfig::from_json(r#"{"workers": 3}"#).unwrap();
        assert_eq!(config.workers, 3);
    }

    #[test]
    fn zero_workers_is_rejected() {
        assert!(matches!(
            SurveyConfig::from_json(r#"{"workers": 0}"#),
            Err(SkyError::InvalidConfig(_))
        ));
        let config = SurveyConfig {
            workers: 0,
            collect_clouds: false,
        };
        assert!(CloudSurvey::new(config).is_err());
    }

    #[tokio::test]
    async fn reports_come_back_in_input_order() {
        let survey = CloudSurvey::new(SurveyConfig {
            workers: 3,
            collect_clouds: false,
        })
        .unwrap();

        let reports = survey.run(named_samples()).await.unwrap();
        let names: Vec<&str> = reports.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["pass-1", "pass-2", "pass-3", "pass-4"]);

        let counts: Vec<usize> = reports.iter().map(|r| r.cloud_count).collect();
        assert_eq!(counts, samples::EXPECTED_COUNTS);
        assert!(reports.iter().all(|r| r.clouds.is_empty()));
    }

    #[tokio::test]
    async fn survey_matches_sequential_counts() {
        let skies: Vec<(String, Sky)> = (0..40)
            .map(|i| {
                let rows = (0..6)
                    .map(|y| (0..7).map(|x| ((x * 7 + y * 3 + i) % 10) as i32).collect())
                    .collect();
                (format!("sky-{i}"), Sky::new(rows).unwrap())
            })
            .collect();
        let expected: Vec<usize> = skies.iter().map(|(_, sky)| count_sky(sky)).collect();

        let survey = CloudSurvey::new(SurveyConfig {
            workers: 4,
            collect_clouds: true,
        })
        .unwrap();
        let reports = survey.run(skies).await.unwrap();

        let counts: Vec<usize> = reports.iter().map(|r| r.cloud_count).collect();
        assert_eq!(counts, expected);
        assert!(reports.iter().all(|r| r.clouds.len() == r.cloud_count));
    }

    #[tokio::test]
    async fn empty_survey_is_empty() {
        let survey = CloudSurvey::new(SurveyConfig::default()).unwrap();
        assert!(survey.run(Vec::new()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn summary_totals_reports() {
        let survey = CloudSurvey::new(SurveyConfig {
            workers: 2,
            collect_clouds: true,
        })
        .unwrap();
        let reports = survey.run(named_samples()).await.unwrap();
        let summary = SurveySummary::from_reports(&reports);

        assert_eq!(summary.skies, 4);
        assert_eq!(summary.total_clouds, 8);
        assert_eq!(summary.largest_cloud, Some(9));
        assert_eq!(summary.cloudiest.as_deref(), Some("pass-1"));
    }
}
