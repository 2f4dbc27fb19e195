//! Options altering the Subject Alternative Names of an issued certificate.
//!
//! Options are applied in order. Each kind replaces whatever an earlier
//! option of the same kind set. With no options at all a certificate is
//! valid for `localhost` and `127.0.0.1`; once any option is given those
//! defaults no longer apply.

use std::net::{IpAddr, Ipv4Addr};

pub const DEFAULT_DOMAIN: &str = "localhost";
pub const DEFAULT_IP: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

/// A single alteration of the signed certificate parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignOption {
    /// Replace the IP address SANs.
    Ips(Vec<IpAddr>),
    /// Replace the DNS name SANs.
    Domains(Vec<String>),
}

impl SignOption {
    /// Make the certificate valid for exactly these IP addresses.
    ///
    /// # Example
    ///
    /// ```
    /// use certtest::cert::options::SignOption;
    /// use std::net::{IpAddr, Ipv4Addr};
    ///
    /// let option = SignOption::with_ips([IpAddr::V4(Ipv4Addr::new(10, 0, 0, 5))]);
    /// assert_eq!(option, SignOption::Ips(vec!["10.0.0.5".parse().unwrap()]));
    /// ```
    pub fn with_ips<I>(ips: I) -> Self
    where
        I: IntoIterator<Item = IpAddr>,
    {
        SignOption::Ips(ips.into_iter().collect())
    }

    /// Make the certificate valid for exactly these DNS names.
    pub fn with_domains<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SignOption::Domains(domains.into_iter().map(Into::into).collect())
    }
}

/// Accumulated result of applying a sequence of [`SignOption`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignOptions {
    domains: Option<Vec<String>>,
    ips: Option<Vec<IpAddr>>,
}

impl SignOptions {
    /// Apply `options` left to right on top of an empty record.
    pub fn from_options<'a, I>(options: I) -> Self
    where
        I: IntoIterator<Item = &'a SignOption>,
    {
        let mut opts = SignOptions::default();
        for option in options {
            opts.apply(option);
        }
        opts
    }

    pub fn apply(&mut self, option: &SignOption) {
        match option {
            SignOption::Ips(ips) => self.ips = Some(ips.clone()),
            SignOption::Domains(domains) => self.domains = Some(domains.clone()),
        }
    }

    /// DNS names the certificate will carry.
    pub fn domains(&self) -> Vec<String> {
        match (&self.domains, &self.ips) {
            (None, None) => vec![DEFAULT_DOMAIN.to_string()],
            (domains, _) => domains.clone().unwrap_or_default(),
        }
    }

    /// IP addresses the certificate will carry.
    pub fn ips(&self) -> Vec<IpAddr> {
        match (&self.domains, &self.ips) {
            (None, None) => vec![DEFAULT_IP],
            (_, ips) => ips.clone().unwrap_or_default(),
        }
    }
}
