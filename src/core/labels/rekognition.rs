//! AWS Rekognition label detection.
//!
//! The SDK is async; the detector owns a current-thread runtime and blocks on
//! each call so callers stay synchronous.

use super::{Label, LabelDetector, LabelRequest};
use crate::error::LabelError;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_rekognition::error::DisplayErrorContext;
use aws_sdk_rekognition::types::{Image, S3Object};
use aws_sdk_rekognition::Client;
use tokio::runtime::{Builder, Runtime};
use tracing::debug;

/// Label detector backed by the Rekognition `DetectLabels` API
pub struct RekognitionDetector {
    client: Client,
    runtime: Runtime,
}

impl RekognitionDetector {
    /// Build a client from the standard AWS environment (credentials chain,
    /// profile, `AWS_REGION`), with `region` taking precedence when given.
    pub fn from_env(region: Option<&str>) -> Result<Self, LabelError> {
        let runtime = blocking_runtime()?;

        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(Region::new(region.to_string()));
        }
        let sdk_config = runtime.block_on(loader.load());

        debug!(region = ?sdk_config.region(), "created Rekognition client");
        Ok(Self {
            client: Client::new(&sdk_config),
            runtime,
        })
    }

    /// Wrap an already configured client
    pub fn from_client(client: Client) -> Result<Self, LabelError> {
        Ok(Self {
            client,
            runtime: blocking_runtime()?,
        })
    }
}

fn blocking_runtime() -> Result<Runtime, LabelError> {
    Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(LabelError::Runtime)
}

impl LabelDetector for RekognitionDetector {
    fn detect(
        &self,
        bucket: &str,
        name: &str,
        request: &LabelRequest,
    ) -> Result<Vec<Label>, LabelError> {
        let image = Image::builder()
            .s3_object(S3Object::builder().bucket(bucket).name(name).build())
            .build();

        let call = self
            .client
            .detect_labels()
            .image(image)
            .max_labels(i32::try_from(request.max_labels).unwrap_or(i32::MAX))
            .min_confidence(request.min_confidence)
            .send();

        let output = self
            .runtime
            .block_on(call)
            .map_err(|e| LabelError::Service(DisplayErrorContext(&e).to_string()))?;

        // Labels without a name carry nothing worth reporting
        let labels = output
            .labels()
            .iter()
            .filter_map(|label| {
                Some(Label {
                    name: label.name()?.to_string(),
                    confidence: label.confidence().unwrap_or_default(),
                })
            })
            .collect();

        Ok(labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_rekognition::operation::detect_labels::DetectLabelsOutput;
    use aws_sdk_rekognition::types::Label as RekognitionLabel;
    use aws_smithy_mocks::{mock, mock_client};

    #[test]
    fn detect_sends_s3_object_and_thresholds() {
        let rule = mock!(Client::detect_labels)
            .match_requests(|req| {
                let object = req.image().and_then(|image| image.s3_object());
                object.and_then(|o| o.bucket()) == Some("tero-test")
                    && object.and_then(|o| o.name()) == Some("1.jpg")
                    && req.max_labels() == Some(2)
                    && req.min_confidence() == Some(75.0)
            })
            .then_output(|| {
                DetectLabelsOutput::builder()
                    .labels(RekognitionLabel::builder().name("Cat").confidence(98.5).build())
                    .labels(RekognitionLabel::builder().name("Pet").confidence(91.0).build())
                    .build()
            });
        let detector = RekognitionDetector::from_client(mock_client!(aws_sdk_rekognition, [&rule])).unwrap();

        let labels = detector
            .detect("tero-test", "1.jpg", &LabelRequest::new(2, 75.0))
            .unwrap();

        assert_eq!(rule.num_calls(), 1);
        assert_eq!(
            labels,
            vec![
                Label {
                    name: "Cat".to_string(),
                    confidence: 98.5,
                },
                Label {
                    name: "Pet".to_string(),
                    confidence: 91.0,
                },
            ]
        );
    }

    #[test]
    fn unnamed_labels_are_dropped() {
        let rule = mock!(Client::detect_labels).then_output(|| {
            DetectLabelsOutput::builder()
                .labels(RekognitionLabel::builder().confidence(99.0).build())
                .labels(RekognitionLabel::builder().name("Tree").build())
                .build()
        });
        let detector = RekognitionDetector::from_client(mock_client!(aws_sdk_rekognition, [&rule])).unwrap();

        let labels = detector
            .detect("bucket", "park.jpg", &LabelRequest::default())
            .unwrap();

        // A missing confidence reads as zero
        assert_eq!(
            labels,
            vec![Label {
                name: "Tree".to_string(),
                confidence: 0.0,
            }]
        );
    }

    #[test]
    fn empty_response_gives_no_labels() {
        let rule = mock!(Client::detect_labels).then_output(|| DetectLabelsOutput::builder().build());
        let detector = RekognitionDetector::from_client(mock_client!(aws_sdk_rekognition, [&rule])).unwrap();

        let labels = detector
            .detect("bucket", "empty.jpg", &LabelRequest::default())
            .unwrap();
        assert!(labels.is_empty());
    }
}
