use crate::error::RequestError;

use bytes::Bytes;
use encoding_rs::SHIFT_JIS;
use flate2::read::{DeflateDecoder, GzDecoder};
use std::io::{self, Read};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentEncoding {
    Identity,
    Gzip,
    Deflate,
    Zstd,
}

impl ContentEncoding {
    pub fn parse_header(value: &str) -> Result<Vec<ContentEncoding>, String> {
        value
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| match s.to_ascii_lowercase().as_str() {
                "identity" => Ok(ContentEncoding::Identity),
                "gzip" | "x-gzip" => Ok(ContentEncoding::Gzip),
                "deflate" => Ok(ContentEncoding::Deflate),
                "zstd" => Ok(ContentEncoding::Zstd),
                other => Err(other.to_string()),
            })
            .collect()
    }

    pub fn decompress(&self, data: &[u8]) -> io::Result<Bytes> {
        let mut out = Vec::new();
        match self {
            ContentEncoding::Identity => return Ok(Bytes::copy_from_slice(data)),
            ContentEncoding::Gzip => {
                GzDecoder::new(data).read_to_end(&mut out)?;
            }
            ContentEncoding::Deflate => {
                DeflateDecoder::new(data).read_to_end(&mut out)?;
            }
            ContentEncoding::Zstd => {
                out = zstd::decode_all(data)?;
            }
        }
        Ok(Bytes::from(out))
    }
}

pub fn decode_body(body: Bytes, content_encoding: Option<&str>) -> Result<String, RequestError> {
    let codings = match content_encoding {
        Some(value) => ContentEncoding::parse_header(value).map_err(|coding| {
            RequestError::UnexpectedShape(format!("unsupported content encoding: {coding}"))
        })?,
        None => Vec::new(),
    };

    let mut data = body;
    for coding in codings.iter().rev() {
        data = coding.decompress(&data).map_err(|e| {
            RequestError::UnexpectedShape(format!("failed to decode {coding:?} body: {e}"))
        })?;
    }

    match String::from_utf8(data.to_vec()) {
        Ok(s) => Ok(s),
        Err(utf8e) => {
            let (text, _, had_errors) = SHIFT_JIS.decode(&data);
            if had_errors {
                return Err(RequestError::UnexpectedShape(format!(
                    "body is neither utf-8 nor shift-jis: {utf8e}"
                )));
            }
            Ok(text.into_owned())
        }
    }
}
