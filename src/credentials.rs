//! Transient push credentials
//!
//! A [CredentialGuard] lives for one release run. Dropping it removes every
//! trace of the secret it provisioned.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::{CredentialMode, Secret};
use crate::error::Result;

pub const NETRC_FILE: &str = ".netrc";

/// Environment variable that carries the token to git children in
/// [CredentialMode::Environment].
pub const TOKEN_ENV: &str = "RELEASE_ACTION_TOKEN";

/// Credentials provisioned for the duration of a run
pub struct CredentialGuard {
    netrc: Option<NetrcFile>,
    env: Vec<(String, String)>,
}

struct NetrcFile {
    path: PathBuf,
    /// Content of a `.netrc` that existed before the run
    previous: Option<Vec<u8>>,
}

impl CredentialGuard {
    /// Provision credentials for `host` on behalf of `owner`.
    ///
    /// `home` receives the `.netrc` in [CredentialMode::Netrc]; nothing is
    /// written to disk in [CredentialMode::Environment].
    pub fn provision(
        mode: CredentialMode,
        home: &Path,
        host: &str,
        owner: &str,
        token: &Secret,
    ) -> Result<Self> {
        match mode {
            CredentialMode::Netrc => {
                let path = home.join(NETRC_FILE);
                let previous = match fs::read(&path) {
                    Ok(bytes) => Some(bytes),
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
                    Err(e) => return Err(e.into()),
                };
                write_private(&path, netrc_entry(host, owner, token).as_bytes())?;
                debug!(path = %path.display(), host, "wrote netrc credentials");

                Ok(CredentialGuard {
                    netrc: Some(NetrcFile { path, previous }),
                    env: Vec::new(),
                })
            }
            CredentialMode::Environment => {
                debug!(host, "injecting credential helper through the environment");
                Ok(CredentialGuard {
                    netrc: None,
                    env: helper_env(host, owner, token),
                })
            }
        }
    }

    /// Environment to pass to git processes
    pub fn git_env(&self) -> &[(String, String)] {
        &self.env
    }

    /// Path of the credential file, if one was written
    pub fn netrc_path(&self) -> Option<&Path> {
        self.netrc.as_ref().map(|netrc| netrc.path.as_path())
    }

    /// Whether a `.netrc` already existed and will be restored on drop
    pub fn replaced_existing(&self) -> bool {
        self.netrc
            .as_ref()
            .is_some_and(|netrc| netrc.previous.is_some())
    }
}

impl Drop for CredentialGuard {
    fn drop(&mut self) {
        let Some(netrc) = self.netrc.take() else {
            return;
        };
        let result = match &netrc.previous {
            Some(bytes) => write_private(&netrc.path, bytes),
            None => fs::remove_file(&netrc.path).map_err(Into::into),
        };
        match result {
            Ok(()) => debug!(path = %netrc.path.display(), "removed transient credentials"),
            Err(e) => warn!(path = %netrc.path.display(), error = %e, "failed to clean up credentials"),
        }
    }
}

/// One `.netrc` machine entry
pub fn netrc_entry(host: &str, owner: &str, token: &Secret) -> String {
    format!(
        "machine {}\nlogin {}\npassword {}\n",
        host,
        owner,
        token.expose()
    )
}

/// `GIT_CONFIG_*` entries installing a credential helper scoped to one process.
///
/// The helper is an inline shell function that answers `get` requests with the
/// owner and the token read from [TOKEN_ENV].
fn helper_env(host: &str, owner: &str, token: &Secret) -> Vec<(String, String)> {
    let helper = format!(
        "!f() {{ test \"$1\" = get && echo username={} && echo \"password=${}\"; }}; f",
        owner, TOKEN_ENV
    );
    vec![
        ("GIT_CONFIG_COUNT".to_string(), "1".to_string()),
        (
            "GIT_CONFIG_KEY_0".to_string(),
            format!("credential.https://{}.helper", host),
        ),
        ("GIT_CONFIG_VALUE_0".to_string(), helper),
        (TOKEN_ENV.to_string(), token.expose().to_string()),
    ]
}

fn write_private(path: &Path, contents: &[u8]) -> Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    file.write_all(contents)?;

    // `mode` only applies on creation; tighten a file that already existed.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }
    Ok(())
}
