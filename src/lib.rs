// THEORY:
// This file is the entry point for the `cloud_count` library crate. It exposes
// the cloud detector (the flood-fill counter) together with the `Sky` grid it
// runs on, the loaders that build skies from files, and the `survey` layer that
// counts many skies at once.
//
// The counting core lives in `core_modules` and never touches I/O or threads.
// `samples` and `survey` are callers of that core, not part of it.

pub mod core_modules;
pub mod samples;
pub mod survey;

pub use core_modules::cloud::Cloud;
pub use core_modules::cloud_detector::cloud_detector::{
    ScanOrder, count_clouds, count_sky, count_sky_in_order, find_clouds,
};
pub use core_modules::error::{Result, SkyError};
pub use core_modules::sky::{CLOUD_THRESHOLD, HeatIndex, Point, Sky, is_cloud_index};
pub use core_modules::sky_loader::sky_loader;
pub use survey::{CloudSurvey, SurveyConfig, SurveyReport, SurveySummary};
