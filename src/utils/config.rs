//! Application configuration constants.
//! Limits and classification tables in one place.

use std::sync::OnceLock;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    pkg_name: &'static str,
    config_filename: String,
    url_prefix: String,
    env_max_files: String,
    env_log: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                pkg_name: pkg,
                config_filename: format!(".{pkg}.toml"),
                url_prefix: format!("blob:{pkg}/"),
                env_max_files: format!("{}_MAX_FILES", pkg.to_uppercase()),
                env_log: format!("{}_LOG", pkg.to_uppercase()),
            }
        })
    }

    pub fn pkg_name(&self) -> &str {
        self.pkg_name
    }

    /// Per-directory config file read by the CLI (e.g. `.dropwalk.toml`).
    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }

    /// Prefix of revocable object references handed to image consumers.
    pub fn url_prefix(&self) -> &str {
        &self.url_prefix
    }

    /// Environment variable overriding the drop budget (e.g. `DROPWALK_MAX_FILES`).
    pub fn env_max_files(&self) -> &str {
        &self.env_max_files
    }

    /// Log filter variable in `env_logger` syntax (e.g. `DROPWALK_LOG=trace`).
    pub fn env_log(&self) -> &str {
        &self.env_log
    }
}

// ---- Budget / traversal ----

/// Hard cap on harvested files per drop event.
pub const MAX_DROP_FILES: usize = 2000;

/// Children per legacy listing page for local sources (browsers page directory readers at 100).
pub const LEGACY_PAGE_SIZE: usize = 100;

// ---- Classification ----

/// Media-type prefix for images.
pub const IMAGE_MIME_PREFIX: &str = "image/";

/// Media-type prefix for plain text families.
pub const TEXT_MIME_PREFIX: &str = "text/";

/// Declared kinds that carry no information; extension fallbacks apply.
pub const UNRELIABLE_CONTENT_KINDS: &[&str] = &["", "application/octet-stream"];

/// Structured-text application types decoded as text.
pub const TEXT_APPLICATION_KINDS: &[&str] = &[
    "application/json",
    "application/ld+json",
    "application/xml",
    "application/javascript",
    "application/ecmascript",
    "application/typescript",
    "application/x-typescript",
    "application/x-javascript",
    "application/yaml",
    "application/x-yaml",
    "application/toml",
    "application/x-toml",
    "application/x-sh",
    "application/x-shellscript",
    "application/sql",
    "application/graphql",
    "application/x-httpd-php",
    "application/x-tex",
    "application/x-ndjson",
    "application/csv",
];

/// Image extensions trusted when the declared kind is empty or unreliable.
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "bmp", "webp", "svg", "ico", "tiff", "tif", "avif", "heic",
];

/// Source, config and markup extensions decoded as text.
pub const TEXT_EXTENSIONS: &[&str] = &[
    // Programming languages
    "rs", "py", "js", "mjs", "cjs", "ts", "jsx", "tsx", "go", "c", "cc", "cpp", "h", "hpp",
    "java", "kt", "kts", "swift", "rb", "php", "cs", "fs", "scala", "clj", "hs", "ml",
    "elm", "ex", "exs", "erl", "lua", "r", "jl", "nim", "zig", "dart", "pl", "pm",
    // Web
    "html", "htm", "css", "scss", "sass", "less", "vue", "svelte", "astro",
    // Config/Data
    "json", "jsonc", "json5", "ndjson", "yaml", "yml", "toml", "xml", "ini", "conf", "cfg",
    "env", "properties", "csv", "tsv", "lock",
    // Shell/Scripts
    "sh", "bash", "zsh", "fish", "ps1", "bat", "cmd",
    // Documentation
    "txt", "md", "markdown", "mdx", "rst", "adoc", "org", "tex", "bib", "log",
    // Other
    "sql", "graphql", "gql", "proto", "diff", "patch", "dockerfile", "gitignore",
    "gitattributes", "editorconfig",
];

// ---- OS metadata files ----

/// File names skipped when `skip_os_junk` is set.
pub const OS_JUNK_FILES: &[&str] = &[
    ".DS_Store",
    ".AppleDouble",
    ".LSOverride",
    "Thumbs.db",
    "ehthumbs.db",
    "Desktop.ini",
    "desktop.ini",
    ".directory",
];

/// Directory names skipped when `skip_os_junk` is set.
pub const OS_JUNK_DIRS: &[&str] = &["__MACOSX", "$RECYCLE.BIN", ".Trashes", ".Spotlight-V100"];
