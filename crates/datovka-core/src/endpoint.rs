//! Service endpoints and login descriptors.
//!
//! The service exposes six SOAP endpoints whose URLs depend on the target
//! environment and on whether the client logs in with a password or a
//! system certificate. Loading certificates is left to the transport.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Target ISDS environment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Public test environment (czebox.cz)
    Test,
    /// Production environment (mojedatovaschranka.cz)
    #[default]
    Production,
}

impl Environment {
    fn host_suffix(self) -> &'static str {
        match self {
            Environment::Test => ".czebox.cz/",
            Environment::Production => ".mojedatovaschranka.cz/",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "test" => Ok(Environment::Test),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(format!("Unknown environment: {other}")),
        }
    }
}

/// SOAP services of the Data Box system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    /// Message operations (`dz`)
    Operations,
    /// Message information (`dx`)
    Info,
    /// Data box search (`df`)
    Search,
    /// Data box access management (`DsManage`)
    Access,
    /// System statistics (`DsManage`)
    Stat,
    /// Large message transfer (`vodz`)
    VoDZ,
}

impl Service {
    /// All services in declaration order
    pub const ALL: [Service; 6] = [
        Service::Operations,
        Service::Info,
        Service::Search,
        Service::Access,
        Service::Stat,
        Service::VoDZ,
    ];

    fn path(self) -> &'static str {
        match self {
            Service::Operations => "dz",
            Service::Info => "dx",
            Service::Search => "df",
            Service::Access | Service::Stat => "DsManage",
            Service::VoDZ => "vodz",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Service::Operations => "operations",
            Service::Info => "info",
            Service::Search => "search",
            Service::Access => "access",
            Service::Stat => "stat",
            Service::VoDZ => "vodz",
        };
        f.write_str(name)
    }
}

/// Certificate login variants
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CertificateMode {
    /// Filing service: system certificate only
    #[default]
    FilingService,
    /// Hosted filing service: system certificate plus data box ID
    HostedFilingService,
}

/// How the client authenticates
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Username and password (HTTP basic auth)
    Password {
        /// Login name
        username: String,
        /// Password
        password: String,
    },
    /// Client certificate
    Certificate {
        /// Path to the PKCS#12 bundle
        path: PathBuf,
        /// Bundle password
        password: Option<String>,
        /// Login variant
        mode: CertificateMode,
        /// Data box accessed in hosted mode
        data_box_id: Option<String>,
    },
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Password { username, .. } => f
                .debug_struct("Password")
                .field("username", username)
                .finish_non_exhaustive(),
            Credentials::Certificate {
                path,
                mode,
                data_box_id,
                ..
            } => f
                .debug_struct("Certificate")
                .field("path", path)
                .field("mode", mode)
                .field("data_box_id", data_box_id)
                .finish_non_exhaustive(),
        }
    }
}

impl Credentials {
    /// Whether this is a certificate login
    #[must_use]
    pub fn uses_certificate(&self) -> bool {
        matches!(self, Credentials::Certificate { .. })
    }

    /// `Authorization` header value, if the login sends one
    ///
    /// Password login sends `user:password`. Hosted filing service sends the
    /// data box ID with an empty password alongside the certificate.
    #[must_use]
    pub fn basic_auth_header(&self) -> Option<String> {
        let pair = match self {
            Credentials::Password { username, password } => format!("{username}:{password}"),
            Credentials::Certificate {
                mode: CertificateMode::HostedFilingService,
                data_box_id: Some(id),
                ..
            } => format!("{id}:"),
            Credentials::Certificate { .. } => return None,
        };
        Some(format!("Basic {}", STANDARD.encode(pair.as_bytes())))
    }
}

/// URL of `service` for the given environment and login
///
/// # Example
///
/// ```
/// use datovka_core::endpoint::{Environment, Service, service_url_for};
///
/// assert_eq!(
///     service_url_for(Environment::Test, None, Service::Operations),
///     "https://ws1.czebox.cz/DS/dz"
/// );
/// ```
#[must_use]
pub fn service_url_for(
    environment: Environment,
    certificate: Option<CertificateMode>,
    service: Service,
) -> String {
    let mut url = String::from(match service {
        Service::VoDZ => "https://ws2",
        _ => "https://ws1",
    });

    if certificate.is_some() {
        url.push('c');
    }
    url.push_str(environment.host_suffix());

    match certificate {
        Some(CertificateMode::FilingService) => url.push_str("cert/"),
        Some(CertificateMode::HostedFilingService) => url.push_str("hspis/"),
        None => {}
    }

    url.push_str("DS/");
    url.push_str(service.path());
    url
}

/// URL of `service` for the given credentials
#[must_use]
pub fn service_url(
    environment: Environment,
    credentials: &Credentials,
    service: Service,
) -> String {
    let certificate = match credentials {
        Credentials::Password { .. } => None,
        Credentials::Certificate { mode, .. } => Some(*mode),
    };
    service_url_for(environment, certificate, service)
}
