//! # Labels Module
//!
//! Asks a remote vision service what an image contains.
//!
//! ## How It Works
//! 1. Validate the request thresholds
//! 2. Match on the [`ImageReference`]: only S3 objects can be sent
//! 3. Hand bucket/key and thresholds to a [`LabelDetector`]
//!
//! The production detector is [`RekognitionDetector`]; tests plug in their own.

mod reference;
mod rekognition;

pub use reference::ImageReference;
pub use rekognition::RekognitionDetector;

use crate::error::LabelError;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A detected label and how sure the service is about it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Label {
    /// Label name, e.g. "Person"
    pub name: String,
    /// Confidence in percent, 0-100
    pub confidence: f32,
}

/// Thresholds sent with a detection request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelRequest {
    /// Maximum number of labels to return
    pub max_labels: u32,
    /// Only return labels with at least this confidence (0-100)
    pub min_confidence: f32,
}

impl LabelRequest {
    /// Create a request with explicit thresholds
    pub fn new(max_labels: u32, min_confidence: f32) -> Self {
        Self {
            max_labels,
            min_confidence,
        }
    }

    fn validate(&self) -> Result<(), LabelError> {
        if self.max_labels == 0 {
            return Err(LabelError::InvalidRequest(
                "max_labels must be at least 1".to_string(),
            ));
        }
        if !(0.0..=100.0).contains(&self.min_confidence) {
            return Err(LabelError::InvalidRequest(format!(
                "min_confidence {} is outside 0-100",
                self.min_confidence
            )));
        }
        Ok(())
    }
}

impl Default for LabelRequest {
    fn default() -> Self {
        Self::new(5, 80.0)
    }
}

/// A service that labels images stored in S3
pub trait LabelDetector {
    /// Detect labels on object `name` in `bucket`
    fn detect(
        &self,
        bucket: &str,
        name: &str,
        request: &LabelRequest,
    ) -> Result<Vec<Label>, LabelError>;
}

/// Labels for `image`, as returned by `detector`.
///
/// Local files are rejected with [`LabelError::UnsupportedReference`].
pub fn detect_labels<D: LabelDetector + ?Sized>(
    detector: &D,
    image: &ImageReference,
    request: &LabelRequest,
) -> Result<Vec<Label>, LabelError> {
    request.validate()?;

    match image {
        ImageReference::S3 { bucket, name } => {
            let labels = detector.detect(bucket, name, request)?;
            debug!(image = %image, count = labels.len(), "detected labels");
            Ok(labels)
        }
        ImageReference::Local { path } => {
            Err(LabelError::UnsupportedReference { path: path.clone() })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Returns canned labels and records what it was asked
    struct FakeDetector {
        labels: Vec<Label>,
        calls: RefCell<Vec<(String, String, LabelRequest)>>,
    }

    impl FakeDetector {
        fn new(labels: Vec<Label>) -> Self {
            Self {
                labels,
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl LabelDetector for FakeDetector {
        fn detect(
            &self,
            bucket: &str,
            name: &str,
            request: &LabelRequest,
        ) -> Result<Vec<Label>, LabelError> {
            self.calls
                .borrow_mut()
                .push((bucket.to_string(), name.to_string(), *request));
            Ok(self
                .labels
                .iter()
                .filter(|l| l.confidence >= request.min_confidence)
                .take(request.max_labels as usize)
                .cloned()
                .collect())
        }
    }

    fn people() -> Vec<Label> {
        vec![
            Label { name: "People".to_string(), confidence: 98.76 },
            Label { name: "Person".to_string(), confidence: 98.77 },
            Label { name: "Crowd".to_string(), confidence: 61.2 },
        ]
    }

    #[test]
    fn s3_reference_is_sent_to_detector() {
        let detector = FakeDetector::new(people());
        let image = ImageReference::s3("tero-test", "1.jpg");

        let labels = detect_labels(&detector, &image, &LabelRequest::new(2, 80.0)).unwrap();

        assert_eq!(labels.len(), 2);
        let calls = detector.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "tero-test");
        assert_eq!(calls[0].1, "1.jpg");
        assert_eq!(calls[0].2.max_labels, 2);
    }

    #[test]
    fn empty_response_is_empty_list() {
        let detector = FakeDetector::new(Vec::new());
        let image = ImageReference::s3("tero-test", "blank.jpg");

        let labels = detect_labels(&detector, &image, &LabelRequest::default()).unwrap();
        assert!(labels.is_empty());
    }

    #[test]
    fn local_reference_is_rejected_without_calling_detector() {
        let detector = FakeDetector::new(people());
        let image = ImageReference::local("1.jpg");

        let result = detect_labels(&detector, &image, &LabelRequest::default());

        assert!(matches!(result, Err(LabelError::UnsupportedReference { .. })));
        assert!(detector.calls.borrow().is_empty());
    }

    #[test]
    fn invalid_thresholds_are_rejected() {
        let detector = FakeDetector::new(people());
        let image = ImageReference::s3("b", "k");

        for request in [LabelRequest::new(0, 80.0), LabelRequest::new(5, 120.0)] {
            let result = detect_labels(&detector, &image, &request);
            assert!(matches!(result, Err(LabelError::InvalidRequest(_))));
        }
    }

    #[test]
    fn default_request_matches_helper_defaults() {
        let request = LabelRequest::default();
        assert_eq!(request.max_labels, 5);
        assert_eq!(request.min_confidence, 80.0);
    }

    #[test]
    fn label_serializes_with_service_keys() {
        let label = Label { name: "Person".to_string(), confidence: 99.0 };
        let json = serde_json::to_value(&label).unwrap();
        assert_eq!(json["Name"], "Person");
        assert_eq!(json["Confidence"], 99.0);
    }
}
