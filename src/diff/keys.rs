//! Artifact and semantic key derivation.
//!
//! Pure string derivations, deterministic and total: malformed inputs
//! degrade to tagged fallback keys rather than erroring. The artifact key
//! identifies one physical record; the semantic key groups related records
//! (e.g. multi-arch variants of one image) across versions and digests.

use crate::model::Package;

/// Prefix tagging semantic keys derived from unparseable purl locators.
pub const MALFORMED_PURL_TAG: &str = "malformed-purl:";

/// Prefix tagging keys for records with no purl reference at all.
pub const NO_PURL_TAG: &str = "no-purl:";

/// Maximally specific identity of one physical package record: the purl
/// locator when present, else a synthetic `no-purl:` key.
#[must_use]
pub fn artifact_key(pkg: &Package) -> String {
    // An empty locator counts as no purl at all.
    pkg.purl()
        .filter(|purl| !purl.is_empty())
        .map_or_else(|| no_purl_key(pkg), std::string::ToString::to_string)
}

/// Coarser identity grouping related artifacts.
///
/// Strips the purl type segment, the `@version-or-digest` suffix, and
/// every qualifier except `arch`, so records differing only in digest or
/// non-arch qualifiers land in the same group while per-architecture
/// variants stay distinct:
/// `pkg:oci/app@sha256:aaa?arch=amd64` → `pkg:app?arch=amd64`.
#[must_use]
pub fn semantic_key(pkg: &Package) -> String {
    let Some(purl) = pkg.purl() else {
        return no_purl_key(pkg);
    };
    semantic_key_of_purl(purl).unwrap_or_else(|| format!("{MALFORMED_PURL_TAG}{purl}"))
}

/// The digest/version component compared by the change summary: the purl
/// substring after `@` and before any `?`, falling back to `versionInfo`.
#[must_use]
pub fn purl_digest(pkg: &Package) -> Option<String> {
    pkg.purl()
        .and_then(|purl| {
            purl.split_once('@')
                .map(|(_, rest)| rest.split('?').next().unwrap_or(rest).to_string())
        })
        .or_else(|| pkg.version_info.clone())
}

fn no_purl_key(pkg: &Package) -> String {
    format!(
        "{NO_PURL_TAG}{}@{}",
        pkg.name,
        pkg.version_info.as_deref().unwrap_or_default()
    )
}

fn semantic_key_of_purl(purl: &str) -> Option<String> {
    let rest = purl.strip_prefix("pkg:")?;
    let (body, qualifiers) = match rest.split_once('?') {
        Some((body, qualifiers)) => (body, Some(qualifiers)),
        None => (rest, None),
    };
    let path = body.split('@').next().unwrap_or(body);
    // The type segment is redundant within one ecosystem; grouping keys
    // carry the namespace/name path only.
    let (_, name_path) = path.split_once('/')?;
    if name_path.is_empty() {
        return None;
    }

    let mut key = format!("pkg:{name_path}");
    if let Some(arch) = qualifiers.and_then(|q| qualifier_value(q, "arch")) {
        key.push_str("?arch=");
        key.push_str(arch);
    }
    Some(key)
}

fn qualifier_value<'a>(qualifiers: &'a str, name: &str) -> Option<&'a str> {
    qualifiers.split('&').find_map(|pair| {
        pair.split_once('=')
            .filter(|(key, _)| *key == name)
            .map(|(_, value)| value)
    })
}
