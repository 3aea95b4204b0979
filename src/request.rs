//! Minimal HTTP request model consumed by the form pipeline.

use anyhow::Context;
use bytes::Bytes;
use hyper::{HeaderMap, Method, Uri};
use percent_encoding::percent_decode_str;
use std::collections::BTreeMap;

/// Multi-valued form values, keyed by field name.
///
/// Keys iterate in sorted order so that decoding submitted values is
/// deterministic regardless of how the request serialized them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
	values: BTreeMap<String, Vec<String>>,
}

impl FormValues {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
		self.values.entry(key.into()).or_default().push(value.into());
	}

	/// First value submitted for `key`, if any.
	pub fn get(&self, key: &str) -> Option<&str> {
		self.values
			.get(key)
			.and_then(|v| v.first())
			.map(String::as_str)
	}

	pub fn get_all(&self, key: &str) -> &[String] {
		self.values.get(key).map(Vec::as_slice).unwrap_or(&[])
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
		self.values.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
	}

	/// Parses a raw query string. Pairs are split on the first `=` only, so
	/// `=` inside a value (e.g. Base64) survives, and both sides are
	/// percent-decoded.
	pub fn from_query(query: Option<&str>) -> Self {
		let mut values = Self::new();
		let Some(query) = query else {
			return values;
		};

		for pair in query.split('&').filter(|p| !p.is_empty()) {
			let mut parts = pair.splitn(2, '=');
			let key = parts.next().unwrap_or("");
			let value = parts.next().unwrap_or("");
			values.append(
				percent_decode_str(key).decode_utf8_lossy().into_owned(),
				percent_decode_str(value).decode_utf8_lossy().into_owned(),
			);
		}

		values
	}

	/// Parses an `application/x-www-form-urlencoded` body. A body that is not
	/// valid UTF-8 is a malformed submission and fails.
	pub fn from_urlencoded(body: &[u8]) -> anyhow::Result<Self> {
		std::str::from_utf8(body).context("request body is not valid utf-8")?;

		let mut values = Self::new();
		for (key, value) in url::form_urlencoded::parse(body) {
			values.append(key.into_owned(), value.into_owned());
		}
		Ok(values)
	}
}

/// An incoming HTTP request, reduced to what form processing needs: method,
/// URI, headers and the raw body.
#[derive(Debug, Clone)]
pub struct Request {
	method: Method,
	uri: Uri,
	headers: HeaderMap,
	body: Bytes,
}

impl Request {
	/// ```
	/// use formflow::Request;
	/// use hyper::Method;
	///
	/// let request = Request::builder()
	/// 	.method(Method::GET)
	/// 	.uri("/signup?name=John")
	/// 	.build()
	/// 	.unwrap();
	///
	/// assert_eq!(request.path(), "/signup");
	/// assert_eq!(request.query_values().get("name"), Some("John"));
	/// ```
	pub fn builder() -> RequestBuilder {
		RequestBuilder::default()
	}

	pub fn method(&self) -> &Method {
		&self.method
	}

	pub fn uri(&self) -> &Uri {
		&self.uri
	}

	pub fn path(&self) -> &str {
		self.uri.path()
	}

	pub fn headers(&self) -> &HeaderMap {
		&self.headers
	}

	pub fn body(&self) -> &Bytes {
		&self.body
	}

	/// Values carried in the query string.
	pub fn query_values(&self) -> FormValues {
		FormValues::from_query(self.uri.query())
	}

	/// Values carried in the urlencoded request body.
	pub fn body_form_values(&self) -> anyhow::Result<FormValues> {
		FormValues::from_urlencoded(&self.body)
	}
}

/// Builder for test and adapter construction of [`Request`].
#[derive(Debug, Default)]
pub struct RequestBuilder {
	method: Option<Method>,
	uri: Option<String>,
	headers: HeaderMap,
	body: Bytes,
}

impl RequestBuilder {
	pub fn method(mut self, method: Method) -> Self {
		self.method = Some(method);
		self
	}

	pub fn uri(mut self, uri: impl Into<String>) -> Self {
		self.uri = Some(uri.into());
		self
	}

	pub fn headers(mut self, headers: HeaderMap) -> Self {
		self.headers = headers;
		self
	}

	pub fn body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	pub fn build(self) -> anyhow::Result<Request> {
		let uri: Uri = self
			.uri
			.unwrap_or_else(|| "/".to_string())
			.parse()
			.context("invalid request uri")?;

		Ok(Request {
			method: self.method.unwrap_or(Method::GET),
			uri,
			headers: self.headers,
			body: self.body,
		})
	}
}
