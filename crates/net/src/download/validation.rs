//! URL validation and HTTP response validation for downloads

use std::path::{Component, Path};
use updatekit_errors::{Error, NetworkError, StorageError};
use url::Url;

/// Validate URL and check for supported protocols
///
/// # Errors
///
/// Returns an error if the URL does not parse or uses a scheme other than
/// `http` or `https`.
pub fn validate_url(url: &str) -> Result<Url, Error> {
    let parsed = Url::parse(url).map_err(|e| NetworkError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(NetworkError::InvalidUrl(format!("unsupported scheme: {scheme}")).into()),
    }
}

/// Append `file_name` to `base` as a single path segment
///
/// The name is percent-encoded, so a `/`, `?` or `#` inside it cannot
/// change which resource is requested.
///
/// # Errors
///
/// Returns an error if `base` is not a valid http or https URL.
pub fn join_url(base: &str, file_name: &str) -> Result<Url, Error> {
    let mut url = validate_url(base)?;
    url.path_segments_mut()
        .map_err(|()| NetworkError::InvalidUrl(format!("not a base URL: {base}")))?
        .pop_if_empty()
        .push(file_name);
    Ok(url)
}

/// Accept `name` only if it names a file directly inside a directory
///
/// # Errors
///
/// Returns `InvalidFileName` for empty names, `.` and `..`, and names
/// containing a path separator.
pub fn validate_file_name(name: &str) -> Result<&str, Error> {
    let mut components = Path::new(name).components();
    let single = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );

    if single && !name.contains(['/', '\\']) {
        Ok(name)
    } else {
        Err(StorageError::InvalidFileName {
            name: name.to_string(),
        }
        .into())
    }
}

/// Reject responses that do not carry a usable body
///
/// # Errors
///
/// Returns `HttpError` for a non-success status and `EmptyResponse` when the
/// server announces a zero-length body.
pub fn validate_response(response: &reqwest::Response) -> Result<(), Error> {
    let status = response.status();

    if !status.is_success() {
        return Err(NetworkError::HttpError {
            status: status.as_u16(),
            message: status.to_string(),
        }
        .into());
    }

    if response.content_length() == Some(0) {
        return Err(NetworkError::EmptyResponse {
            url: response.url().to_string(),
        }
        .into());
    }

    Ok(())
}
