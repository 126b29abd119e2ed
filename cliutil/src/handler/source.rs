//! Content readers for URI-valued options.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use url::Url;

use crate::error::{BindError, BindResult};

/// Read the content found at `uri`.
///
/// Plain paths and `file:` URIs are read from the local filesystem.
/// `http:` and `https:` URIs are fetched with a blocking GET. A one-letter
/// scheme is taken to be a Windows drive prefix and read as a path.
///
/// # Errors
///
/// Returns [`BindError::SchemeNotSupported`] for any other scheme and
/// [`BindError::Read`] when the content cannot be fetched.
pub fn read_uri(uri: &str) -> BindResult<String> {
    let url = match Url::parse(uri) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => return read_path(uri),
        Err(err) => {
            return Err(BindError::read(uri, io::Error::new(io::ErrorKind::InvalidInput, err)));
        }
    };
    match url.scheme() {
        "file" => {
            let path = url.to_file_path().map_err(|()| {
                BindError::read(uri, io::Error::new(io::ErrorKind::InvalidInput, "not a local path"))
            })?;
            read_path(&path)
        }
        "http" | "https" => fetch(uri),
        drive if drive.len() == 1 => read_path(uri),
        scheme => Err(BindError::SchemeNotSupported {
            scheme: scheme.to_owned(),
        }),
    }
}

fn read_path(location: impl AsRef<Path>) -> BindResult<String> {
    let path = location.as_ref();
    fs::read_to_string(path).map_err(|err| BindError::read(path.display().to_string(), err))
}

fn fetch(uri: &str) -> BindResult<String> {
    tracing::debug!(url = uri, "fetching option content");
    let response = ureq::get(uri)
        .call()
        .map_err(|err| BindError::read(uri, io::Error::other(err.to_string())))?;
    let mut body = String::new();
    response
        .into_reader()
        .read_to_string(&mut body)
        .map_err(|err| BindError::read(uri, err))?;
    Ok(body)
}
