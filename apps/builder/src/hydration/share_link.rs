//! Share links: a serialized (partial) document carried in the `#fragment` of
//! the address the session was opened with.
//!
//! Fragment format: percent-encoded base64 (standard alphabet) of the JSON
//! document. Plain percent-encoded JSON is accepted as well.

use std::string::FromUtf8Error;

use base64::{engine::general_purpose::STANDARD, Engine};
use thiserror::Error;

use crate::document::model::DocumentModel;
use crate::document::partial::PartialDocument;

#[derive(Debug, Error)]
pub enum ShareLinkError {
    #[error("share link fragment is empty")]
    Empty,

    #[error("share link is not valid UTF-8: {0}")]
    Encoding(#[from] FromUtf8Error),

    #[error("share link payload is not a document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The navigable address of the session, split into base and fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationContext {
    base: String,
    fragment: Option<String>,
}

impl NavigationContext {
    pub fn parse(address: &str) -> Self {
        match address.split_once('#') {
            Some((base, fragment)) => Self {
                base: base.to_string(),
                fragment: Some(fragment.to_string()).filter(|f| !f.is_empty()),
            },
            None => Self {
                base: address.to_string(),
                fragment: None,
            },
        }
    }

    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    pub fn address(&self) -> String {
        match &self.fragment {
            Some(fragment) => format!("{}#{}", self.base, fragment),
            None => self.base.clone(),
        }
    }

    /// Strips the fragment so a reload does not apply the payload again.
    pub fn clear_fragment(&mut self) -> Option<String> {
        self.fragment.take()
    }

    /// The base address with `fragment` appended, replacing any current one.
    pub fn with_fragment(&self, fragment: &str) -> String {
        format!("{}#{}", self.base, fragment)
    }
}

pub fn decode_share_payload(fragment: &str) -> Result<PartialDocument, ShareLinkError> {
    let raw = fragment.strip_prefix('#').unwrap_or(fragment).trim();
    if raw.is_empty() {
        return Err(ShareLinkError::Empty);
    }
    let text = urlencoding::decode(raw)?;

    let json = match STANDARD.decode(text.trim()) {
        Ok(bytes) => String::from_utf8(bytes)?,
        Err(_) => text.into_owned(),
    };
    Ok(PartialDocument::from_json(&json)?)
}

pub fn encode_share_payload(model: &DocumentModel) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string(model)?;
    Ok(urlencoding::encode(&STANDARD.encode(json)).into_owned())
}

/// Full share link for `model`, rooted at the session's address.
pub fn share_link(
    navigation: &NavigationContext,
    model: &DocumentModel,
) -> Result<String, serde_json::Error> {
    Ok(navigation.with_fragment(&encode_share_payload(model)?))
}
