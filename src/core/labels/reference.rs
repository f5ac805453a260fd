//! Where an image lives.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

const S3_SCHEME: &str = "s3://";

/// An image either in an S3 bucket or on the local filesystem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImageReference {
    /// Object `name` in `bucket`
    S3 { bucket: String, name: String },
    /// File on local disk
    Local { path: PathBuf },
}

impl ImageReference {
    /// Reference an S3 object
    pub fn s3(bucket: impl Into<String>, name: impl Into<String>) -> Self {
        Self::S3 {
            bucket: bucket.into(),
            name: name.into(),
        }
    }

    /// Reference a local file
    pub fn local(path: impl Into<PathBuf>) -> Self {
        Self::Local { path: path.into() }
    }
}

/// `s3://bucket/key` parses as an S3 object; anything else is a local path.
///
/// An `s3://` string without both a bucket and a key is kept as a local path,
/// which later fails loudly rather than querying the wrong object.
impl FromStr for ImageReference {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(rest) = s.strip_prefix(S3_SCHEME) {
            if let Some((bucket, name)) = rest.split_once('/') {
                if !bucket.is_empty() && !name.is_empty() {
                    return Ok(Self::s3(bucket, name));
                }
            }
        }
        Ok(Self::local(s))
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::S3 { bucket, name } => write!(f, "{}{}/{}", S3_SCHEME, bucket, name),
            Self::Local { path } => write!(f, "{}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_s3_uri() {
        let image: ImageReference = "s3://tero-test/holiday/1.jpg".parse().unwrap();
        assert_eq!(image, ImageReference::s3("tero-test", "holiday/1.jpg"));
    }

    #[test]
    fn plain_path_is_local() {
        let image: ImageReference = "photos/1.jpg".parse().unwrap();
        assert_eq!(image, ImageReference::local("photos/1.jpg"));
    }

    #[test]
    fn s3_uri_without_key_is_local() {
        let image: ImageReference = "s3://tero-test/".parse().unwrap();
        assert!(matches!(image, ImageReference::Local { .. }));
    }

    #[test]
    fn display_round_trips() {
        let image = ImageReference::s3("bucket", "a/b.png");
        let parsed: ImageReference = image.to_string().parse().unwrap();
        assert_eq!(parsed, image);
    }
}
