use crate::decoder::decode_body;
use crate::error::RequestError;
use crate::request::{BodyEncoding, Method, RequestConfig};
use crate::result_set::{Record, ResultSet};

use reqwest::{
    header::{CONTENT_ENCODING, CONTENT_TYPE, COOKIE},
    multipart, Client, Request,
};
use serde_json::Value;
use std::fmt::Debug;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const DEFAULT_USER_AGENT: &str = concat!("leomaine/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct ExecutorOptions {
    pub timeout: Option<Duration>,
    pub insecure: bool,
    // cookies are edited in the form but only sent when this is on
    pub send_cookies: bool,
    pub user_agent: String,
}

impl Default for ExecutorOptions {
    fn default() -> Self {
        Self {
            timeout: None,
            insecure: false,
            send_cookies: false,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

pub struct RequestExecutor {
    client: Client,
    options: ExecutorOptions,
}

impl Debug for RequestExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("client", &"Client")
            .field("options", &self.options)
            .finish()
    }
}

impl RequestExecutor {
    pub fn new(options: ExecutorOptions) -> Result<Self, RequestError> {
        let client = Self::build_client(&options)?;
        Ok(Self { client, options })
    }

    pub fn options(&self) -> &ExecutorOptions {
        &self.options
    }

    pub async fn execute(&self, config: &RequestConfig) -> Result<ResultSet, RequestError> {
        let req = self.build_request(config)?;
        debug!(method = %req.method(), url = %req.url(), "sending request");

        let res = self.client.execute(req).await?;
        let status = res.status();
        if !status.is_success() {
            warn!(%status, url = config.url(), "server answered with a non-success status");
        }

        let content_encoding = res
            .headers()
            .get(CONTENT_ENCODING)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body_bytes = res.bytes().await?;
        let body = decode_body(body_bytes, content_encoding.as_deref())?;

        let rows = parse_rows(&body, config.method())?;
        info!(%status, rows = rows.len(), "request completed");
        Ok(ResultSet::new(rows))
    }

    fn build_request(&self, config: &RequestConfig) -> Result<Request, RequestError> {
        let method = config.method();
        let mut req_builder = self.client.request(method.to_reqwest(), config.url());

        for (key, value) in config.effective_headers() {
            req_builder = req_builder.header(key, value);
        }

        let params = config.params().to_map();
        if !params.is_empty() {
            req_builder = req_builder.query(&params);
        }

        if self.options.send_cookies {
            let cookies = config.cookies().to_map();
            if !cookies.is_empty() {
                let cookie = cookies
                    .iter()
                    .map(|(k, v)| format!("{k}={v}"))
                    .collect::<Vec<_>>()
                    .join("; ");
                req_builder = req_builder.header(COOKIE, cookie);
            }
        }

        // GET never carries a body, whatever encoding the form shows.
        if method != Method::Get {
            let body = config.body().to_map();
            req_builder = match config.body_encoding() {
                BodyEncoding::None => req_builder,
                BodyEncoding::Json => req_builder.json(&body),
                BodyEncoding::Form | BodyEncoding::UrlEncoded => req_builder.form(&body),
                BodyEncoding::FormData => {
                    let form = body
                        .into_iter()
                        .fold(multipart::Form::new(), |form, (k, v)| form.text(k, v));
                    req_builder.multipart(form)
                }
                BodyEncoding::Raw => {
                    let text = body
                        .iter()
                        .map(|(k, v)| format!("{k}={v}"))
                        .collect::<Vec<_>>()
                        .join("\n");
                    req_builder.header(CONTENT_TYPE, "text/plain").body(text)
                }
            };
        }

        Ok(req_builder.build()?)
    }

    fn build_client(options: &ExecutorOptions) -> Result<Client, RequestError> {
        let mut cli_builder = Client::builder()
            .user_agent(options.user_agent.as_str())
            .danger_accept_invalid_certs(options.insecure);

        if let Some(timeout) = options.timeout {
            cli_builder = cli_builder.timeout(timeout);
        }

        Ok(cli_builder.build()?)
    }
}

pub fn parse_rows(body: &str, method: Method) -> Result<Vec<Record>, RequestError> {
    let json: Value = serde_json::from_str(body)
        .map_err(|e| RequestError::UnexpectedShape(format!("body is not JSON: {e}")))?;

    match json {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::Object(map) => Ok(to_record(map)),
                other => Err(RequestError::UnexpectedShape(format!(
                    "element {i} is {}, expected an object",
                    json_kind(&other)
                ))),
            })
            .collect(),
        Value::Object(map) if method != Method::Get => Ok(vec![to_record(map)]),
        other => Err(RequestError::UnexpectedShape(format!(
            "body is {}, expected an array of objects",
            json_kind(&other)
        ))),
    }
}

fn to_record(map: serde_json::Map<String, Value>) -> Record {
    map.into_iter()
        .map(|(k, v)| {
            let cell = match v {
                Value::String(s) => s,
                Value::Null => String::new(),
                other => other.to_string(),
            };
            (k, cell)
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
