use leomaine::profile::{Profile, DEFAULT_INI_FILE_PATH, DEFAULT_INI_SECTION};
use leomaine::{Method, PageSize};

use anyhow::{bail, Result};
use std::ffi::OsString;
use std::time::Duration;

pub use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct ClapArgs {
    #[clap(help = "URL to send the request to")]
    url: Option<String>,
    #[clap(short = 'X', long, help = "HTTP method (GET/POST/PUT/DELETE)")]
    method: Option<Method>,
    #[clap(
        short = 'H',
        long = "header",
        value_name = "KEY: VALUE",
        help = "HTTP header to send with the request"
    )]
    headers: Vec<String>,
    #[clap(short = 'p', long, default_value = DEFAULT_INI_SECTION, help = "profile name")]
    profile: String,
    #[clap(short = 'c', long, default_value = DEFAULT_INI_FILE_PATH, help = "profile file")]
    config: String,
    #[clap(short = 's', long, help = "rows per page (5, 10, 25 or 50)")]
    page_size: Option<PageSize>,
    #[clap(short = 't', long, value_name = "SECONDS", help = "request timeout, none by default")]
    timeout: Option<u64>,
    #[clap(
        short = 'k',
        long,
        help = "Allow insecure server connections when using SSL"
    )]
    insecure: bool,
    #[clap(long, help = "send the cookie list as a Cookie header")]
    send_cookies: bool,
    #[clap(long, help = "send once, print the first page and exit")]
    once: bool,
    #[clap(
        short = 'v',
        long,
        help = "Print verbose message",
        default_value = "false"
    )]
    verbose: bool,
}

#[derive(Debug)]
pub struct CommandLineArgs {
    url: Option<String>,
    method: Option<Method>,
    headers: Vec<(String, String)>,
    profile: String,
    config: String,
    page_size: Option<PageSize>,
    timeout: Option<Duration>,
    insecure: bool,
    send_cookies: bool,
    once: bool,
    verbose: bool,
}

fn split_header(s: &str) -> Result<(String, String)> {
    match s.split_once(':') {
        Some((k, v)) if !k.trim().is_empty() => Ok((k.trim().to_string(), v.trim().to_string())),
        _ => bail!("Invalid header format: {s}, expected \"Key: Value\""),
    }
}

impl CommandLineArgs {
    pub fn parse() -> Result<Self> {
        Self::from_clap(ClapArgs::parse())
    }

    #[allow(dead_code)]
    pub fn parse_from<I, T>(itr: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::from_clap(ClapArgs::parse_from(itr))
    }

    fn from_clap(args: ClapArgs) -> Result<Self> {
        let headers = args
            .headers
            .iter()
            .map(|h| split_header(h))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            url: args.url,
            method: args.method,
            headers,
            profile: args.profile,
            config: args.config,
            page_size: args.page_size,
            timeout: args.timeout.map(Duration::from_secs),
            insecure: args.insecure,
            send_cookies: args.send_cookies,
            once: args.once,
            verbose: args.verbose,
        })
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }

    pub fn config(&self) -> &str {
        &self.config
    }

    pub fn once(&self) -> bool {
        self.once
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn merge_into(&self, mut profile: Profile) -> Profile {
        if let Some(url) = &self.url {
            profile.url = Some(url.clone());
        }
        if let Some(method) = self.method {
            profile.method = Some(method);
            // the profile's encoding may not exist for the new method
            profile.encoding = None;
        }
        if let Some(page_size) = self.page_size {
            profile.page_size = Some(page_size);
        }
        if let Some(timeout) = self.timeout {
            profile.timeout = Some(timeout);
        }
        profile.insecure |= self.insecure;
        profile.send_cookies |= self.send_cookies;
        profile.headers.extend(self.headers.iter().cloned());
        profile
    }
}
