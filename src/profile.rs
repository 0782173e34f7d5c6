use crate::executor::ExecutorOptions;
use crate::request::{BodyEncoding, ListKind, Method, RequestConfig};
use crate::result_set::PageSize;

use anyhow::{Context, Result};
use ini::{EscapePolicy, Ini, Properties};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_INI_FILE_PATH: &str = "~/.leomaine";
pub const DEFAULT_INI_SECTION: &str = "default";

const INI_URL: &str = "url";
const INI_METHOD: &str = "method";
const INI_ENCODING: &str = "encoding";
const INI_PAGE_SIZE: &str = "page_size";
const INI_TIMEOUT: &str = "timeout";
const INI_INSECURE: &str = "insecure";
const INI_SEND_COOKIES: &str = "send_cookies";

const HEADER_SHORTHAND: &str = "@";

fn list_prefix(kind: ListKind) -> &'static str {
    match kind {
        ListKind::Headers => "header.",
        ListKind::Body => "body.",
        ListKind::Cookies => "cookie.",
        ListKind::Params => "param.",
    }
}

/// A saved starting point for a session, one INI section per profile.
///
/// ```ini
/// [default]
/// url = https://jsonplaceholder.typicode.com/posts
/// method = GET
/// page_size = 10
/// timeout = 30
/// @Accept = application/json
/// param.userId = 1
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Profile {
    pub url: Option<String>,
    pub method: Option<Method>,
    pub encoding: Option<BodyEncoding>,
    pub page_size: Option<PageSize>,
    pub timeout: Option<Duration>,
    pub insecure: bool,
    pub send_cookies: bool,
    pub headers: Vec<(String, String)>,
    pub body: Vec<(String, String)>,
    pub cookies: Vec<(String, String)>,
    pub params: Vec<(String, String)>,
}

impl Profile {
    /// Loads section `name` from `file_path`. A missing file or section is
    /// not an error.
    pub fn load(file_path: &str, name: &str) -> Result<Option<Profile>> {
        let extended_path = shellexpand::tilde(file_path).to_string();
        if !Path::new(&extended_path).exists() {
            debug!(path = %extended_path, "profile file not found");
            return Ok(None);
        }
        let ini = Ini::load_from_file(&extended_path)
            .with_context(|| format!("failed to read profile file {extended_path}"))?;
        let section = match ini.section(Some(name)) {
            Some(s) => s,
            None => return Ok(None),
        };

        fn try_get<T>(section: &Properties, key: &str) -> Result<Option<T>>
        where
            T: FromStr,
            T::Err: std::fmt::Display,
        {
            section
                .get(key)
                .map(|s| {
                    s.trim()
                        .parse::<T>()
                        .map_err(|e| anyhow::anyhow!("invalid value for {key}: {e}"))
                })
                .transpose()
        }

        let mut profile = Profile {
            url: try_get(section, INI_URL)?,
            method: try_get(section, INI_METHOD)?,
            encoding: try_get(section, INI_ENCODING)?,
            page_size: try_get(section, INI_PAGE_SIZE)?,
            timeout: try_get::<u64>(section, INI_TIMEOUT)?.map(Duration::from_secs),
            insecure: try_get(section, INI_INSECURE)?.unwrap_or(false),
            send_cookies: try_get(section, INI_SEND_COOKIES)?.unwrap_or(false),
            ..Default::default()
        };

        for (key, value) in section.iter() {
            if let Some(name) = key.strip_prefix(HEADER_SHORTHAND) {
                profile.headers.push((name.to_string(), value.to_string()));
                continue;
            }
            for kind in ListKind::ALL {
                if let Some(name) = key.strip_prefix(list_prefix(kind)) {
                    profile
                        .entries_mut(kind)
                        .push((name.to_string(), value.to_string()));
                }
            }
        }

        Ok(Some(profile))
    }

    pub fn save(&self, file_path: &str, name: &str) -> Result<()> {
        let path = shellexpand::tilde(file_path).to_string();
        let mut conf = if Path::new(&path).exists() {
            Ini::load_from_file(&path).with_context(|| format!("failed to read {path}"))?
        } else {
            Ini::new()
        };
        conf.delete(Some(name));

        let mut sect = conf.with_section(Some(name.to_string()));
        if let Some(url) = &self.url {
            sect.set(INI_URL, url.as_str());
        }
        if let Some(method) = self.method {
            sect.set(INI_METHOD, method.as_str());
        }
        if let Some(encoding) = self.encoding {
            sect.set(INI_ENCODING, encoding.as_str());
        }
        if let Some(page_size) = self.page_size {
            sect.set(INI_PAGE_SIZE, page_size.to_string());
        }
        if let Some(timeout) = self.timeout {
            sect.set(INI_TIMEOUT, timeout.as_secs().to_string());
        }
        sect.set(INI_INSECURE, self.insecure.to_string());
        sect.set(INI_SEND_COOKIES, self.send_cookies.to_string());

        for kind in ListKind::ALL {
            for (k, v) in self.entries(kind) {
                sect.add(format!("{}{k}", list_prefix(kind)), v.as_str());
            }
        }

        // keys may hold '=' or ':', which would split them on reload
        conf.write_to_file_policy(&path, EscapePolicy::Reserved)
            .with_context(|| format!("failed to write profile file {path}"))?;
        Ok(())
    }

    /// Seeds a request form from the profile. Entries are appended to the
    /// lists already present in `config`.
    pub fn apply(&self, config: &mut RequestConfig) -> Result<()> {
        if let Some(url) = &self.url {
            config.set_url(url.as_str());
        }
        if let Some(method) = self.method {
            config.set_method(method);
        }
        if let Some(encoding) = self.encoding {
            config.set_body_encoding(encoding)?;
        }
        for kind in ListKind::ALL {
            let list = config.list_mut(kind);
            for (k, v) in self.entries(kind) {
                list.push(k.as_str(), v.as_str());
            }
        }
        Ok(())
    }

    pub fn executor_options(&self) -> ExecutorOptions {
        ExecutorOptions {
            timeout: self.timeout,
            insecure: self.insecure,
            send_cookies: self.send_cookies,
            ..Default::default()
        }
    }

    pub fn entries(&self, kind: ListKind) -> &[(String, String)] {
        match kind {
            ListKind::Headers => &self.headers,
            ListKind::Body => &self.body,
            ListKind::Cookies => &self.cookies,
            ListKind::Params => &self.params,
        }
    }

    fn entries_mut(&mut self, kind: ListKind) -> &mut Vec<(String, String)> {
        match kind {
            ListKind::Headers => &mut self.headers,
            ListKind::Body => &mut self.body,
            ListKind::Cookies => &mut self.cookies,
            ListKind::Params => &mut self.params,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempPath};

    const TEST_URL: &str = "http://test-server/posts";
    const TEST_CONTENT_TYPE: &str = "application/json";
    const TEST_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7)";

    fn create_ini_file(content: &str) -> Result<TempPath> {
        let mut file = NamedTempFile::new()?;
        file.write_all(content.as_bytes())?;
        Ok(file.into_temp_path())
    }

    fn path_str(path: &TempPath) -> String {
        path.to_str().unwrap().to_string()
    }

    #[test]
    fn load_reads_scalars_and_lists() -> Result<()> {
        let temp_path = create_ini_file(&format!(
            "[{DEFAULT_INI_SECTION}]\n\
             url={TEST_URL}\n\
             method=post\n\
             encoding=Form Data\n\
             page_size=25\n\
             timeout=30\n\
             insecure=true\n\
             send_cookies=true\n\
             @Content-Type={TEST_CONTENT_TYPE}\n\
             header.User-Agent={TEST_USER_AGENT}\n\
             body.title=hello\n\
             cookie.session=abc\n\
             param.userId=1\n"
        ))?;

        let profile = Profile::load(&path_str(&temp_path), DEFAULT_INI_SECTION)?.unwrap();
        assert_eq!(profile.url.as_deref(), Some(TEST_URL));
        assert_eq!(profile.method, Some(Method::Post));
        assert_eq!(profile.encoding, Some(BodyEncoding::FormData));
        assert_eq!(profile.page_size, Some(PageSize::TwentyFive));
        assert_eq!(profile.timeout, Some(Duration::from_secs(30)));
        assert!(profile.insecure);
        assert!(profile.send_cookies);
        assert_eq!(
            profile.headers,
            vec![
                ("Content-Type".to_string(), TEST_CONTENT_TYPE.to_string()),
                ("User-Agent".to_string(), TEST_USER_AGENT.to_string()),
            ]
        );
        assert_eq!(profile.body, vec![("title".to_string(), "hello".to_string())]);
        assert_eq!(profile.cookies, vec![("session".to_string(), "abc".to_string())]);
        assert_eq!(profile.params, vec![("userId".to_string(), "1".to_string())]);

        temp_path.close()?;
        Ok(())
    }

    #[test]
    fn missing_file_or_section_is_none() -> Result<()> {
        assert!(Profile::load("/nonexistent/leomaine.ini", DEFAULT_INI_SECTION)?.is_none());

        let temp_path = create_ini_file("[other]\nurl=http://x\n")?;
        assert!(Profile::load(&path_str(&temp_path), DEFAULT_INI_SECTION)?.is_none());
        Ok(())
    }

    #[test]
    fn bad_values_are_errors() -> Result<()> {
        let temp_path = create_ini_file("[default]\npage_size=7\n")?;
        assert!(Profile::load(&path_str(&temp_path), DEFAULT_INI_SECTION).is_err());

        let temp_path = create_ini_file("[default]\nmethod=PATCH\n")?;
        assert!(Profile::load(&path_str(&temp_path), DEFAULT_INI_SECTION).is_err());
        Ok(())
    }

    #[test]
    fn save_then_load_keeps_profile() -> Result<()> {
        let profile = Profile {
            url: Some(TEST_URL.to_string()),
            method: Some(Method::Put),
            encoding: Some(BodyEncoding::Raw),
            page_size: Some(PageSize::Ten),
            timeout: Some(Duration::from_secs(5)),
            insecure: false,
            send_cookies: true,
            headers: vec![("Accept".to_string(), TEST_CONTENT_TYPE.to_string())],
            body: vec![("title".to_string(), "x".to_string())],
            cookies: vec![],
            params: vec![("page".to_string(), "2".to_string())],
        };
        let temp_file = NamedTempFile::new()?;
        let path = temp_file.path().to_str().unwrap().to_string();

        profile.save(&path, "work")?;
        let loaded = Profile::load(&path, "work")?.unwrap();
        assert_eq!(loaded, profile);
        Ok(())
    }

    #[test]
    fn save_keeps_repeated_and_reserved_keys() -> Result<()> {
        let profile = Profile {
            url: Some("http://test-server/posts?a=1#top".to_string()),
            body: vec![
                ("tag".to_string(), "a".to_string()),
                ("tag".to_string(), "b".to_string()),
                ("x=y".to_string(), "z".to_string()),
            ],
            cookies: vec![("a:b".to_string(), "c;d".to_string())],
            ..Default::default()
        };
        let temp_file = NamedTempFile::new()?;
        let path = temp_file.path().to_str().unwrap().to_string();

        profile.save(&path, DEFAULT_INI_SECTION)?;
        let loaded = Profile::load(&path, DEFAULT_INI_SECTION)?.unwrap();
        assert_eq!(loaded.url, profile.url);
        assert_eq!(loaded.body, profile.body);
        assert_eq!(loaded.cookies, profile.cookies);
        Ok(())
    }

    #[test]
    fn apply_seeds_request_config() -> Result<()> {
        let profile = Profile {
            url: Some(TEST_URL.to_string()),
            method: Some(Method::Post),
            encoding: Some(BodyEncoding::UrlEncoded),
            headers: vec![("Accept".to_string(), TEST_CONTENT_TYPE.to_string())],
            params: vec![("userId".to_string(), "1".to_string())],
            ..Default::default()
        };
        let mut config = RequestConfig::default();
        profile.apply(&mut config)?;

        assert_eq!(config.url(), TEST_URL);
        assert_eq!(config.method(), Method::Post);
        assert_eq!(config.body_encoding(), BodyEncoding::UrlEncoded);
        assert_eq!(config.effective_headers()["Accept"], TEST_CONTENT_TYPE);
        assert_eq!(config.params().to_map()["userId"], "1");
        Ok(())
    }

    #[test]
    fn apply_rejects_encoding_not_offered_for_method() {
        let profile = Profile {
            encoding: Some(BodyEncoding::FormData),
            ..Default::default()
        };
        let mut config = RequestConfig::default();
        assert!(profile.apply(&mut config).is_err());
    }
}
