//! Access token sources

use boxwalk_core::{BwError, BwResult};
use oauth2::AccessToken;
use std::path::PathBuf;

/// Environment variable read when nothing else supplies a token
pub const DEFAULT_TOKEN_ENV: &str = "BOX_ACCESS_TOKEN";

/// Where the access token comes from
#[derive(Debug, Clone)]
pub enum TokenSource {
    Inline(AccessToken),
    /// A file whose whole content is the token
    File(PathBuf),
    /// An environment variable holding the token
    Env(String),
}

impl TokenSource {
    pub fn inline(token: impl Into<String>) -> Self {
        TokenSource::Inline(AccessToken::new(token.into()))
    }

    /// Read the token, trimming surrounding whitespace
    pub fn resolve(&self) -> BwResult<AccessToken> {
        let raw = match self {
            TokenSource::Inline(token) => token.secret().clone(),
            TokenSource::File(path) => std::fs::read_to_string(path).map_err(|e| {
                BwError::Config(format!("cannot read token file {}: {}", path.display(), e))
            })?,
            TokenSource::Env(var) => std::env::var(var).map_err(|_| {
                BwError::Config(format!("environment variable {} is not set", var))
            })?,
        };

        let token = raw.trim();
        if token.is_empty() {
            return Err(BwError::Config(format!("empty access token from {}", self.describe())));
        }
        Ok(AccessToken::new(token.to_string()))
    }

    pub fn describe(&self) -> String {
        match self {
            TokenSource::Inline(_) => "configuration".to_string(),
            TokenSource::File(path) => format!("file {}", path.display()),
            TokenSource::Env(var) => format!("${}", var),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_inline() {
        let token = TokenSource::inline("abc").resolve().unwrap();
        assert_eq!(token.secret(), "abc");
    }

    #[test]
    fn test_inline_debug_hides_secret() {
        let source = TokenSource::inline("s3cret");
        assert!(!format!("{:?}", source).contains("s3cret"));
    }

    #[test]
    fn test_file_is_trimmed() -> anyhow::Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "  token-from-file  ")?;

        let token = TokenSource::File(file.path().to_path_buf()).resolve()?;
        assert_eq!(token.secret(), "token-from-file");
        Ok(())
    }

    #[test]
    fn test_missing_file() {
        let source = TokenSource::File(PathBuf::from("/nonexistent/boxwalk/token"));
        assert!(matches!(source.resolve(), Err(BwError::Config(_))));
    }

    #[test]
    fn test_empty_token() -> anyhow::Result<()> {
        let file = NamedTempFile::new()?;
        let err = TokenSource::File(file.path().to_path_buf()).resolve().unwrap_err();
        assert!(matches!(err, BwError::Config(ref m) if m.contains("empty access token")));
        Ok(())
    }

    #[test]
    fn test_env() {
        let var = "BOXWALK_TEST_TOKEN_ENV_SET";
        std::env::set_var(var, "from-env\n");
        let token = TokenSource::Env(var.into()).resolve().unwrap();
        assert_eq!(token.secret(), "from-env");
        std::env::remove_var(var);
    }

    #[test]
    fn test_env_missing() {
        let source = TokenSource::Env("BOXWALK_TEST_TOKEN_ENV_UNSET".into());
        assert!(matches!(source.resolve(), Err(BwError::Config(_))));
        assert_eq!(source.describe(), "$BOXWALK_TEST_TOKEN_ENV_UNSET");
    }
}
