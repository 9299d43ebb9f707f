//! Linux packaging settings (Arch User Repository, Debian).

use serde::Deserialize;
use std::path::PathBuf;

/// Arch User Repository packaging.
///
/// ```toml
/// [arch]
/// dir = "build/arch"
/// pkgdesc = "modern PHP webmail client"
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ArchSettings {
    /// Directory holding `PKGBUILD`, `.SRCINFO` and the auxiliary sources.
    pub dir: PathBuf,
    /// Auxiliary sources digested next to the tarball, relative to `dir`.
    pub sources: Vec<String>,
    /// Package description.
    pub pkgdesc: String,
    /// Upstream URL.
    pub url: String,
    /// License identifier.
    pub license: String,
    /// Build-time dependencies.
    pub makedepends: Vec<String>,
    /// Runtime dependencies.
    pub depends: Vec<String>,
    /// Optional dependencies in `name: reason` form.
    pub optdepends: Vec<String>,
}

impl Default for ArchSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("build/arch"),
            sources: vec!["snappymail.sysusers".into(), "snappymail.tmpfiles".into()],
            pkgdesc: "modern PHP webmail client".into(),
            url: "https://github.com/the-djmaze/snappymail".into(),
            license: "AGPL3".into(),
            makedepends: vec![
                "php".into(),
                "nodejs".into(),
                "yarn".into(),
                "gulp".into(),
            ],
            depends: vec!["php-fpm".into()],
            optdepends: vec![
                "mariadb: storage backend for contacts".into(),
                "php-pgsql: storage backend for contacts".into(),
                "php-sqlite: storage backend for contacts".into(),
            ],
        }
    }
}

/// Debian package (.deb) configuration.
///
/// Dependencies follow Debian package syntax:
/// - `package-name` - Any version
/// - `package-name (>= 1.0)` - Minimum version
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct DebianSettings {
    /// Installation prefix of the release tree inside the package.
    pub install_prefix: String,
    /// Debian revision appended to the upstream version.
    pub revision: u32,
    /// `Maintainer:` field.
    pub maintainer: String,
    /// `Section:` field.
    pub section: String,
    /// `Priority:` field.
    pub priority: String,
    /// `Depends:` entries.
    pub depends: Vec<String>,
    /// `Recommends:` entries.
    pub recommends: Vec<String>,
    /// `Homepage:` field.
    pub homepage: String,
    /// Short and long description.
    pub description: String,
    /// `Origin:`/`Label:` of the repository `Release` file.
    pub origin: String,
    /// `Suite:`/`Codename:` of the repository `Release` file.
    pub suite: String,
}

impl Default for DebianSettings {
    fn default() -> Self {
        Self {
            install_prefix: "usr/share/snappymail".into(),
            revision: 1,
            maintainer: "SnappyMail <info@snappymail.eu>".into(),
            section: "web".into(),
            priority: "optional".into(),
            depends: vec![
                "php (>= 7.4)".into(),
                "php-curl".into(),
                "php-json".into(),
                "php-mbstring".into(),
                "php-xml".into(),
            ],
            recommends: vec!["php-gd".into(), "php-intl".into(), "php-sqlite3".into()],
            homepage: "https://snappymail.eu".into(),
            description: "modern PHP webmail client".into(),
            origin: "SnappyMail".into(),
            suite: "stable".into(),
        }
    }
}
