//! Minimal SnappyMail source tree for unit tests.

use std::path::Path;

const FILES: &[(&str, &str)] = &[
    ("package.json", r#"{"name": "snappymail", "version": "2.3.1"}"#),
    ("integrations/cloudron/Dockerfile", "FROM base\nARG VERSION=2.2.0\n"),
    ("integrations/cloudron/DESCRIPTION.md", "<upstream>2.2.0</upstream>\n"),
    (
        ".docker/release/files/usr/local/include/application.ini",
        "[version]\ncurrent = \"2.2.0\"\n",
    ),
    ("integrations/nextcloud/snappymail/VERSION", "2.2.0"),
    (
        "integrations/nextcloud/snappymail/appinfo/info.xml",
        "<info><version>2.2.0</version></info>\n",
    ),
    (
        "integrations/virtualmin/snappymail.pl",
        "sub script_snappymail_versions\n{\nreturn ( \"2.2.0\" );\n}\n",
    ),
    ("snappymail/v/0.0.0/app/handle.php", "<?php\n"),
    ("snappymail/v/0.0.0/static/js/app.js", "app();"),
    ("snappymail/v/0.0.0/static/js/boot.js", "boot();"),
    ("snappymail/v/0.0.0/static/css/app.css", "body{}"),
    ("data/.htaccess", "Require all denied\n"),
    ("data/README.md", "data\n"),
    ("_include.php", "<?php\n"),
    (".htaccess", "Options -Indexes\n"),
    ("index.php", "<?php\n$sVersion = '0.0.0';\n"),
    ("README.md", "# SnappyMail\n"),
    ("dev/serviceworker.js", "self.addEventListener('push', () => {});\n"),
    ("build/arch/snappymail.sysusers", "u snappymail - - /var/lib/snappymail\n"),
    ("build/arch/snappymail.tmpfiles", "d /var/lib/snappymail 0750 snappymail snappymail\n"),
    ("build/arch/PKGBUILD", "pkgname=snappymail\npkgver=2.2.0\nb2sums=('x'\n        'y')\n"),
];

/// Writes the tree into `root`.
pub(crate) fn write_source_tree(root: &Path) {
    for (path, contents) in FILES {
        let path = root.join(path);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }
}

/// A temporary directory holding the tree.
pub(crate) fn source_tree() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_source_tree(dir.path());
    dir
}
