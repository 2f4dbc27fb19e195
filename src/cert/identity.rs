//! Subject identity and validity shared by every generated certificate.
//!
//! The organisational fields are fixed; only the common name varies between
//! authorities and leaves.

use rcgen::{CertificateParams, DistinguishedName, DnType};
use time::{Duration, OffsetDateTime};

pub const ORGANIZATION: &str = "certtest Organization";
pub const ORGANIZATIONAL_UNIT: &str = "certtest Unit";
pub const COUNTRY: &str = "AQ";
pub const PROVINCE: &str = "Ross Island";
pub const LOCALITY: &str = "McMurdo Station";

/// Lifetime of every certificate, authorities included.
pub const VALIDITY_DAYS: i64 = 365;

/// Backdating applied to `not_before` to absorb clock skew.
pub const BACKDATE_MINUTES: i64 = 1;

/// Build the subject name for `common_name` with the fixed organisation
/// fields.
///
/// # Example
///
/// ```
/// use certtest::cert::identity::subject_name;
///
/// let dn = subject_name("root1");
/// assert_eq!(dn.iter().count(), 6);
/// ```
pub fn subject_name(common_name: &str) -> DistinguishedName {
    let mut dn = DistinguishedName::new();
    dn.push(DnType::CountryName, COUNTRY);
    dn.push(DnType::StateOrProvinceName, PROVINCE);
    dn.push(DnType::LocalityName, LOCALITY);
    dn.push(DnType::OrganizationName, ORGANIZATION);
    dn.push(DnType::OrganizationalUnitName, ORGANIZATIONAL_UNIT);
    dn.push(DnType::CommonName, common_name);
    dn
}

/// Set the validity window starting now.
pub fn set_validity(params: &mut CertificateParams) {
    set_validity_from(params, OffsetDateTime::now_utc());
}

fn set_validity_from(params: &mut CertificateParams, now: OffsetDateTime) {
    params.not_before = now - Duration::minutes(BACKDATE_MINUTES);
    params.not_after = params.not_before + Duration::days(VALIDITY_DAYS);
}
