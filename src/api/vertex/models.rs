use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use serde_json::{Map, Value};
use validator::ValidationErrors;

use crate::api::extract::{field_error, not_an_object, FieldReader};

/// Which request a job descriptor is built for
///
/// The mode only decides which fields are mandatory; both modes share the
/// same record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum JobMode {
    Update,
    Describe,
}

const UPDATE_REQUIRED: &[&str] = &[
    "input_filename",
    "display_name",
    "schedule_value",
    "time_zone",
    "gcs_notebook_source",
];

const DESCRIBE_REQUIRED: &[&str] = &[
    "input_filename",
    "display_name",
    "schedule_value",
    "time_zone",
];

impl JobMode {
    /// Fields that must hold a value for this mode
    pub fn required_fields(self) -> &'static [&'static str] {
        match self {
            JobMode::Update => UPDATE_REQUIRED,
            JobMode::Describe => DESCRIBE_REQUIRED,
        }
    }
}

/// Validated parameters of one scheduled notebook-execution job
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobDescriptor {
    pub input_filename: Option<String>,
    pub display_name: Option<String>,
    pub machine_type: Option<String>,
    pub accelerator_type: Option<String>,
    pub accelerator_count: Option<u32>,
    pub kernel_name: Option<String>,
    pub schedule_value: Option<String>,
    pub time_zone: Option<String>,
    pub max_run_count: Option<String>,
    pub region: Option<String>,
    pub cloud_storage_bucket: Option<String>,
    /// Passed to the executor positionally, order is kept as supplied
    pub parameters: Option<Vec<String>>,
    pub service_account: Option<String>,
    pub network: Option<String>,
    pub subnetwork: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub gcs_notebook_source: Option<String>,
    pub disk_type: Option<String>,
    pub disk_size: Option<String>,
}

impl JobDescriptor {
    /// Build a descriptor from a decoded JSON object
    ///
    /// Unknown keys are ignored. All missing required fields, type mismatches
    /// and constraint violations are reported together.
    pub fn from_map(mode: JobMode, data: &Map<String, Value>) -> Result<Self, ValidationErrors> {
        let mut reader = FieldReader::new(data);

        let descriptor = JobDescriptor {
            input_filename: reader.text("input_filename"),
            display_name: reader.text("display_name"),
            machine_type: reader.text("machine_type"),
            accelerator_type: reader.text("accelerator_type"),
            accelerator_count: reader.count("accelerator_count"),
            kernel_name: reader.text("kernel_name"),
            schedule_value: reader.text("schedule_value"),
            time_zone: reader.text("time_zone"),
            max_run_count: reader.integer_text("max_run_count"),
            region: reader.text("region"),
            cloud_storage_bucket: reader.text("cloud_storage_bucket"),
            parameters: reader.text_list("parameters"),
            service_account: reader.text("service_account"),
            network: reader.text("network"),
            subnetwork: reader.text("subnetwork"),
            start_time: reader.text("start_time"),
            end_time: reader.text("end_time"),
            gcs_notebook_source: match mode {
                JobMode::Update => reader.text("gcs_notebook_source"),
                JobMode::Describe => None,
            },
            disk_type: reader.text("disk_type"),
            disk_size: reader.integer_text("disk_size"),
        };

        for &field in mode.required_fields() {
            reader.require(field);
        }

        descriptor.check_constraints(&mut reader);

        if reader.has_errors() {
            Err(reader.into_errors())
        } else {
            Ok(descriptor)
        }
    }

    /// Build a descriptor from any JSON value; only objects are accepted
    pub fn from_value(mode: JobMode, value: &Value) -> Result<Self, ValidationErrors> {
        match value {
            Value::Object(data) => Self::from_map(mode, data),
            _ => Err(not_an_object()),
        }
    }

    /// Cross-field and content rules
    ///
    /// Fields that failed type checks are `None` here, so no rule fires twice
    /// for the same bad input.
    fn check_constraints(&self, reader: &mut FieldReader<'_>) {
        for (field, value) in [
            ("input_filename", &self.input_filename),
            ("display_name", &self.display_name),
            ("accelerator_type", &self.accelerator_type),
        ] {
            if value.as_deref() == Some("") {
                reader.add(
                    field,
                    field_error("length", format!("{} must not be empty", field), None),
                );
            }
        }

        if self.accelerator_count.is_some() && !reader.is_present("accelerator_type") {
            reader.add(
                "accelerator_type",
                field_error(
                    "required_with",
                    "accelerator_type is required when accelerator_count is set".to_string(),
                    None,
                ),
            );
        }

        let start = parse_timestamp(reader, "start_time", self.start_time.as_deref());
        let end = parse_timestamp(reader, "end_time", self.end_time.as_deref());
        if let (Some(start), Some(end)) = (start, end) {
            if end <= start {
                reader.add(
                    "end_time",
                    field_error("range", "end_time must be after start_time".to_string(), None),
                );
            }
        }
    }
}

fn parse_timestamp(
    reader: &mut FieldReader<'_>,
    field: &'static str,
    value: Option<&str>,
) -> Option<DateTime<FixedOffset>> {
    let value = value?;
    match DateTime::parse_from_rfc3339(value) {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            reader.add(
                field,
                field_error(
                    "type",
                    format!("{} must be an RFC 3339 timestamp", field),
                    Some("an RFC 3339 timestamp"),
                ),
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn nightly() -> Map<String, Value> {
        match json!({
            "input_filename": "job.ipynb",
            "display_name": "Nightly",
            "schedule_value": "0 2 * * *",
            "time_zone": "UTC",
            "region": "us-central1",
            "cloud_storage_bucket": "my-bucket",
            "service_account": "svc@proj.iam",
            "network": "default",
            "subnetwork": "default",
            "disk_type": "pd-standard",
            "disk_size": "100",
            "gcs_notebook_source": "gs://bucket/job.ipynb"
        }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    fn error_fields(errors: &ValidationErrors) -> Vec<String> {
        let mut fields: Vec<String> = errors
            .field_errors()
            .keys()
            .map(|field| field.to_string())
            .collect();
        fields.sort();
        fields
    }

    #[test]
    fn nightly_update_job_is_accepted() {
        let job = JobDescriptor::from_map(JobMode::Update, &nightly()).unwrap();

        assert_eq!(job.input_filename.as_deref(), Some("job.ipynb"));
        assert_eq!(job.display_name.as_deref(), Some("Nightly"));
        assert_eq!(job.schedule_value.as_deref(), Some("0 2 * * *"));
        assert_eq!(job.time_zone.as_deref(), Some("UTC"));
        assert_eq!(job.region.as_deref(), Some("us-central1"));
        assert_eq!(job.cloud_storage_bucket.as_deref(), Some("my-bucket"));
        assert_eq!(job.service_account.as_deref(), Some("svc@proj.iam"));
        assert_eq!(job.network.as_deref(), Some("default"));
        assert_eq!(job.subnetwork.as_deref(), Some("default"));
        assert_eq!(job.disk_type.as_deref(), Some("pd-standard"));
        assert_eq!(job.disk_size.as_deref(), Some("100"));
        assert_eq!(job.gcs_notebook_source.as_deref(), Some("gs://bucket/job.ipynb"));
        assert_eq!(job.accelerator_type, None);
        assert_eq!(job.accelerator_count, None);
        assert_eq!(job.parameters, None);
    }

    #[test]
    fn missing_schedule_value_is_named() {
        let mut data = nightly();
        data.remove("schedule_value");

        let errors = JobDescriptor::from_map(JobMode::Update, &data).unwrap_err();
        assert_eq!(error_fields(&errors), vec!["schedule_value"]);
        assert_eq!(errors.field_errors()["schedule_value"][0].code, "required");
    }

    #[test]
    fn every_missing_required_field_is_reported() {
        let errors = JobDescriptor::from_map(JobMode::Update, &Map::new()).unwrap_err();
        assert_eq!(
            error_fields(&errors),
            vec![
                "display_name",
                "gcs_notebook_source",
                "input_filename",
                "schedule_value",
                "time_zone",
            ]
        );
    }

    #[test]
    fn describe_mode_does_not_require_notebook_source() {
        let mut data = nightly();
        data.remove("gcs_notebook_source");

        assert!(JobDescriptor::from_map(JobMode::Update, &data).is_err());
        let job = JobDescriptor::from_map(JobMode::Describe, &data).unwrap();
        assert_eq!(job.gcs_notebook_source, None);
    }

    #[test]
    fn describe_mode_ignores_notebook_source() {
        let job = JobDescriptor::from_map(JobMode::Describe, &nightly()).unwrap();
        assert_eq!(job.gcs_notebook_source, None);
    }

    #[test]
    fn parameters_keep_their_order() {
        let mut data = nightly();
        data.insert("parameters".into(), json!(["z=1", "a=2", "m=3"]));

        let job = JobDescriptor::from_map(JobMode::Update, &data).unwrap();
        assert_eq!(
            job.parameters,
            Some(vec!["z=1".to_string(), "a=2".to_string(), "m=3".to_string()])
        );
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let mut data = nightly();
        data.insert("composer_environment_name".into(), json!("env-1"));
        data.insert("retry_count".into(), json!(3));

        let job = JobDescriptor::from_map(JobMode::Update, &data).unwrap();
        let serialized = serde_json::to_value(&job).unwrap();
        assert!(serialized.get("composer_environment_name").is_none());
        assert!(serialized.get("retry_count").is_none());
    }

    #[test]
    fn construction_is_deterministic() {
        let data = nightly();
        let first = JobDescriptor::from_map(JobMode::Update, &data).unwrap();
        let second = JobDescriptor::from_map(JobMode::Update, &data).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn type_and_missing_errors_are_batched() {
        let mut data = nightly();
        data.remove("time_zone");
        data.insert("accelerator_type".into(), json!("NVIDIA_TESLA_T4"));
        data.insert("accelerator_count".into(), json!("two"));
        data.insert("parameters".into(), json!("a=1"));

        let errors = JobDescriptor::from_map(JobMode::Update, &data).unwrap_err();
        assert_eq!(
            error_fields(&errors),
            vec!["accelerator_count", "parameters", "time_zone"]
        );
        let field_errors = errors.field_errors();
        let count_error = &field_errors["accelerator_count"][0];
        assert_eq!(count_error.code, "type");
        assert_eq!(
            count_error.params.get("expected"),
            Some(&json!("a non-negative integer"))
        );
    }

    #[test]
    fn wrongly_typed_required_field_is_not_also_missing() {
        let mut data = nightly();
        data.insert("display_name".into(), json!(7));

        let errors = JobDescriptor::from_map(JobMode::Update, &data).unwrap_err();
        let field_errors = errors.field_errors();
        let display_errors = &field_errors["display_name"];
        assert_eq!(display_errors.len(), 1);
        assert_eq!(display_errors[0].code, "type");
    }

    #[test]
    fn accelerator_count_needs_a_type() {
        let mut data = nightly();
        data.insert("accelerator_count".into(), json!(1));

        let errors = JobDescriptor::from_map(JobMode::Update, &data).unwrap_err();
        assert_eq!(error_fields(&errors), vec!["accelerator_type"]);

        data.insert("accelerator_type".into(), json!("NVIDIA_TESLA_T4"));
        let job = JobDescriptor::from_map(JobMode::Update, &data).unwrap();
        assert_eq!(job.accelerator_count, Some(1));
    }

    #[test]
    fn wrongly_typed_accelerator_type_is_reported_once() {
        let mut data = nightly();
        data.insert("accelerator_type".into(), json!(5));
        data.insert("accelerator_count".into(), json!(1));

        let errors = JobDescriptor::from_map(JobMode::Update, &data).unwrap_err();
        assert_eq!(error_fields(&errors), vec!["accelerator_type"]);
        let field_errors = errors.field_errors();
        let type_errors = &field_errors["accelerator_type"];
        assert_eq!(type_errors.len(), 1);
        assert_eq!(type_errors[0].code, "type");
    }

    #[test]
    fn empty_accelerator_type_is_rejected() {
        let mut data = nightly();
        data.insert("accelerator_type".into(), json!(""));
        data.insert("accelerator_count".into(), json!(2));

        let errors = JobDescriptor::from_map(JobMode::Update, &data).unwrap_err();
        let field_errors = errors.field_errors();
        let type_errors = &field_errors["accelerator_type"];
        assert_eq!(type_errors.len(), 1);
        assert_eq!(type_errors[0].code, "length");
    }

    #[test]
    fn accelerator_count_accepts_numeric_string() {
        let mut data = nightly();
        data.insert("accelerator_type".into(), json!("NVIDIA_TESLA_T4"));
        data.insert("accelerator_count".into(), json!("4"));

        let job = JobDescriptor::from_map(JobMode::Update, &data).unwrap();
        assert_eq!(job.accelerator_count, Some(4));
    }

    #[test]
    fn max_run_count_is_kept_as_text() {
        let mut data = nightly();
        data.insert("max_run_count".into(), json!(10));
        let job = JobDescriptor::from_map(JobMode::Update, &data).unwrap();
        assert_eq!(job.max_run_count.as_deref(), Some("10"));

        data.insert("max_run_count".into(), json!("ten"));
        let errors = JobDescriptor::from_map(JobMode::Update, &data).unwrap_err();
        assert_eq!(error_fields(&errors), vec!["max_run_count"]);
    }

    #[test]
    fn empty_optional_text_is_not_unset() {
        let mut data = nightly();
        data.insert("kernel_name".into(), json!(""));
        data.insert("machine_type".into(), Value::Null);

        let job = JobDescriptor::from_map(JobMode::Update, &data).unwrap();
        assert_eq!(job.kernel_name, Some(String::new()));
        assert_eq!(job.machine_type, None);
    }

    #[test]
    fn empty_display_name_is_rejected() {
        let mut data = nightly();
        data.insert("display_name".into(), json!(""));

        let errors = JobDescriptor::from_map(JobMode::Update, &data).unwrap_err();
        assert_eq!(errors.field_errors()["display_name"][0].code, "length");
    }

    #[test]
    fn schedule_window_must_be_ordered() {
        let mut data = nightly();
        data.insert("start_time".into(), json!("2025-03-01T10:00:00.000Z"));
        data.insert("end_time".into(), json!("2025-04-01T10:00:00Z"));
        assert!(JobDescriptor::from_map(JobMode::Update, &data).is_ok());

        data.insert("end_time".into(), json!("2025-02-01T10:00:00Z"));
        let errors = JobDescriptor::from_map(JobMode::Update, &data).unwrap_err();
        assert_eq!(error_fields(&errors), vec!["end_time"]);
        assert_eq!(errors.field_errors()["end_time"][0].code, "range");
    }

    #[test]
    fn malformed_timestamp_is_rejected() {
        let mut data = nightly();
        data.insert("start_time".into(), json!("next tuesday"));

        let errors = JobDescriptor::from_map(JobMode::Update, &data).unwrap_err();
        assert_eq!(error_fields(&errors), vec!["start_time"]);
    }

    #[test]
    fn non_object_body_is_rejected() {
        let errors = JobDescriptor::from_value(JobMode::Update, &json!(["job.ipynb"])).unwrap_err();
        assert_eq!(error_fields(&errors), vec!["body"]);
    }
}
