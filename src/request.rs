use crate::error::ConfigError;
use crate::kv::KeyValueList;

use indexmap::IndexMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub const DEFAULT_URL: &str = "https://jsonplaceholder.typicode.com/posts";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

const GET_ENCODINGS: &[BodyEncoding] = &[
    BodyEncoding::Json,
    BodyEncoding::Form,
    BodyEncoding::Raw,
    BodyEncoding::None,
];

const WRITE_ENCODINGS: &[BodyEncoding] = &[
    BodyEncoding::UrlEncoded,
    BodyEncoding::FormData,
    BodyEncoding::Json,
    BodyEncoding::Form,
    BodyEncoding::Raw,
    BodyEncoding::None,
];

impl Method {
    pub const ALL: [Method; 4] = [Method::Get, Method::Post, Method::Put, Method::Delete];

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }

    pub fn body_encodings(&self) -> &'static [BodyEncoding] {
        match self {
            Method::Get => GET_ENCODINGS,
            _ => WRITE_ENCODINGS,
        }
    }

    pub fn default_body_encoding(&self) -> BodyEncoding {
        match self {
            Method::Get => BodyEncoding::None,
            _ => BodyEncoding::Json,
        }
    }

    pub fn to_reqwest(self) -> reqwest::Method {
        match self {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownMethod(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyEncoding {
    UrlEncoded,
    FormData,
    Json,
    Form,
    Raw,
    #[default]
    None,
}

impl BodyEncoding {
    pub const ALL: [BodyEncoding; 6] = [
        BodyEncoding::UrlEncoded,
        BodyEncoding::FormData,
        BodyEncoding::Json,
        BodyEncoding::Form,
        BodyEncoding::Raw,
        BodyEncoding::None,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BodyEncoding::UrlEncoded => "x-www-form-urlencoded",
            BodyEncoding::FormData => "Form Data",
            BodyEncoding::Json => "JSON",
            BodyEncoding::Form => "Form",
            BodyEncoding::Raw => "Raw",
            BodyEncoding::None => "None",
        }
    }
}

impl Display for BodyEncoding {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BodyEncoding {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        let alias = match wanted.to_ascii_lowercase().as_str() {
            "urlencoded" => Some(BodyEncoding::UrlEncoded),
            "formdata" | "form-data" => Some(BodyEncoding::FormData),
            _ => None,
        };
        alias
            .or_else(|| {
                BodyEncoding::ALL
                    .into_iter()
                    .find(|e| e.as_str().eq_ignore_ascii_case(wanted))
            })
            .ok_or_else(|| ConfigError::UnknownEncoding(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Headers,
    Body,
    Cookies,
    Params,
}

impl ListKind {
    pub const ALL: [ListKind; 4] = [
        ListKind::Headers,
        ListKind::Body,
        ListKind::Cookies,
        ListKind::Params,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ListKind::Headers => "Headers",
            ListKind::Body => "Body",
            ListKind::Cookies => "Cookies",
            ListKind::Params => "Params",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RequestConfig {
    method: Method,
    url: String,
    body_encoding: BodyEncoding,
    headers: KeyValueList,
    body: KeyValueList,
    cookies: KeyValueList,
    params: KeyValueList,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self::new(DEFAULT_URL)
    }
}

impl RequestConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            body_encoding: Method::Get.default_body_encoding(),
            headers: KeyValueList::new(),
            body: KeyValueList::new(),
            cookies: KeyValueList::new(),
            params: KeyValueList::new(),
        }
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn set_method(&mut self, method: Method) {
        self.method = method;
        self.body_encoding = method.default_body_encoding();
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = url.into();
    }

    pub fn body_encoding(&self) -> BodyEncoding {
        self.body_encoding
    }

    pub fn set_body_encoding(&mut self, encoding: BodyEncoding) -> Result<(), ConfigError> {
        if !self.method.body_encodings().contains(&encoding) {
            return Err(ConfigError::UnsupportedEncoding {
                method: self.method.to_string(),
                encoding: encoding.to_string(),
            });
        }
        self.body_encoding = encoding;
        Ok(())
    }

    pub fn effective_headers(&self) -> IndexMap<String, String> {
        self.headers.to_map()
    }

    pub fn headers(&self) -> &KeyValueList {
        &self.headers
    }

    pub fn body(&self) -> &KeyValueList {
        &self.body
    }

    pub fn cookies(&self) -> &KeyValueList {
        &self.cookies
    }

    pub fn params(&self) -> &KeyValueList {
        &self.params
    }

    pub fn list(&self, kind: ListKind) -> &KeyValueList {
        match kind {
            ListKind::Headers => &self.headers,
            ListKind::Body => &self.body,
            ListKind::Cookies => &self.cookies,
            ListKind::Params => &self.params,
        }
    }

    pub fn list_mut(&mut self, kind: ListKind) -> &mut KeyValueList {
        match kind {
            ListKind::Headers => &mut self.headers,
            ListKind::Body => &mut self.body,
            ListKind::Cookies => &mut self.cookies,
            ListKind::Params => &mut self.params,
        }
    }
}
