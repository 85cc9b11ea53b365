// Configuration for the yt-dlp collaborator

use super::utils::find_ytdlp;

pub const ENV_YTDLP_PATH: &str = "YTDLP_PATH";
pub const ENV_YTDLP_PYTHON: &str = "YTDLP_PYTHON";
pub const ENV_YTDLP_PROXY: &str = "YTDLP_PROXY";
pub const ENV_YTDLP_COOKIES: &str = "YTDLP_COOKIES";
pub const ENV_YTDLP_COOKIES_FROM_BROWSER: &str = "YTDLP_COOKIES_FROM_BROWSER";

/// Configuration for extraction and download calls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractorConfig {
    /// yt-dlp binary
    pub ytdlp_path: String,
    /// Interpreter that has the yt_dlp module (used for probing)
    pub python_cmd: String,
    /// SOCKS5/HTTP proxy URL
    pub proxy: Option<String>,
    /// Path to cookies.txt file
    pub cookies_path: Option<String>,
    /// Browser to read cookies from (chrome, firefox, ...)
    pub cookies_from_browser: Option<String>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            ytdlp_path: "yt-dlp".to_string(),
            python_cmd: "python3".to_string(),
            proxy: None,
            cookies_path: None,
            cookies_from_browser: None,
        }
    }
}

impl ExtractorConfig {
    /// Read overrides from the environment; unset or blank variables keep defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut config = Self::default()
            .with_ytdlp_path(get(ENV_YTDLP_PATH).unwrap_or_else(find_ytdlp))
            .with_proxy(get(ENV_YTDLP_PROXY))
            .with_cookies_path(get(ENV_YTDLP_COOKIES))
            .with_cookies_from_browser(get(ENV_YTDLP_COOKIES_FROM_BROWSER));

        if let Some(python) = get(ENV_YTDLP_PYTHON) {
            config = config.with_python_cmd(python);
        }
        config
    }

    pub fn with_ytdlp_path(mut self, path: impl Into<String>) -> Self {
        self.ytdlp_path = path.into();
        self
    }

    pub fn with_python_cmd(mut self, cmd: impl Into<String>) -> Self {
        self.python_cmd = cmd.into();
        self
    }

    pub fn with_proxy(mut self, proxy: Option<String>) -> Self {
        self.proxy = proxy;
        self
    }

    pub fn with_cookies_path(mut self, path: Option<String>) -> Self {
        self.cookies_path = path;
        self
    }

    pub fn with_cookies_from_browser(mut self, browser: Option<String>) -> Self {
        self.cookies_from_browser = browser;
        self
    }

    /// Network and auth arguments shared by every yt-dlp call
    pub fn common_args(&self) -> Vec<String> {
        let mut args = Vec::new();

        if let Some(path) = &self.cookies_path {
            args.push("--cookies".to_string());
            args.push(path.clone());
        } else if let Some(browser) = &self.cookies_from_browser {
            args.push("--cookies-from-browser".to_string());
            args.push(browser.clone());
        }

        if let Some(proxy) = &self.proxy {
            args.push("--proxy".to_string());
            args.push(proxy.clone());
        }

        args
    }
}
