use serde::Serialize;
use serde_json::{Map, Value};
use validator::{Validate, ValidationErrors};

use crate::api::extract::{not_an_object, FieldReader};

/// Cloud storage bucket used as the default artifact destination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Validate)]
pub struct BucketDescriptor {
    #[validate(length(
        min = 3,
        max = 63,
        message = "bucket_name must be between 3 and 63 characters"
    ))]
    pub bucket_name: String,
}

impl BucketDescriptor {
    pub fn from_map(data: &Map<String, Value>) -> Result<Self, ValidationErrors> {
        let mut reader = FieldReader::new(data);
        let bucket_name = reader.text("bucket_name");
        reader.require("bucket_name");

        match bucket_name {
            Some(bucket_name) if !reader.has_errors() => {
                let bucket = BucketDescriptor { bucket_name };
                bucket.validate()?;
                Ok(bucket)
            }
            _ => Err(reader.into_errors()),
        }
    }

    pub fn from_value(value: &Value) -> Result<Self, ValidationErrors> {
        match value {
            Value::Object(data) => Self::from_map(data),
            _ => Err(not_an_object()),
        }
    }
}
