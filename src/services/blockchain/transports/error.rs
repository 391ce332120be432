//! Error types of the JSON-RPC transports.

use std::collections::HashMap;

use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while moving JSON-RPC requests over the network
#[derive(Debug, Error)]
pub enum TransportError {
	/// The endpoint answered with a non-success HTTP status
	#[error("HTTP error: status {status_code} for URL {url}: {body}")]
	Http {
		status_code: reqwest::StatusCode,
		url: String,
		body: String,
		#[source]
		source: Option<BoxError>,
		metadata: Option<HashMap<String, String>>,
	},

	/// The request never got a response
	#[error("Network error: {message}")]
	Network {
		message: String,
		#[source]
		source: Option<BoxError>,
		metadata: Option<HashMap<String, String>>,
	},

	/// The response body was not valid JSON
	#[error("Failed to parse JSON-RPC response: {message}")]
	ResponseParse {
		message: String,
		#[source]
		source: Option<BoxError>,
		metadata: Option<HashMap<String, String>>,
	},

	/// The request body could not be serialized
	#[error("Failed to serialize request JSON: {message}")]
	RequestSerialization {
		message: String,
		#[source]
		source: Option<BoxError>,
		metadata: Option<HashMap<String, String>>,
	},

	/// Switching to a fallback endpoint failed
	#[error("URL rotation error: {message}")]
	UrlRotation {
		message: String,
		#[source]
		source: Option<BoxError>,
		metadata: Option<HashMap<String, String>>,
	},
}

impl TransportError {
	pub fn http(
		status_code: reqwest::StatusCode,
		url: String,
		body: String,
		source: Option<BoxError>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::Http {
			status_code,
			url,
			body,
			source,
			metadata,
		}
	}

	pub fn network(
		message: impl Into<String>,
		source: Option<BoxError>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::Network {
			message: message.into(),
			source,
			metadata,
		}
	}

	pub fn response_parse(
		message: impl Into<String>,
		source: Option<BoxError>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ResponseParse {
			message: message.into(),
			source,
			metadata,
		}
	}

	pub fn request_serialization(
		message: impl Into<String>,
		source: Option<BoxError>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::RequestSerialization {
			message: message.into(),
			source,
			metadata,
		}
	}

	pub fn url_rotation(
		message: impl Into<String>,
		source: Option<BoxError>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::UrlRotation {
			message: message.into(),
			source,
			metadata,
		}
	}

	/// Metadata attached to the error, if any
	pub fn metadata(&self) -> Option<&HashMap<String, String>> {
		match self {
			Self::Http { metadata, .. }
			| Self::Network { metadata, .. }
			| Self::ResponseParse { metadata, .. }
			| Self::RequestSerialization { metadata, .. }
			| Self::UrlRotation { metadata, .. } => metadata.as_ref(),
		}
	}
}
