/// POEditor v2 API root
pub const DEFAULT_POEDITOR_API_URL: &str = "https://api.poeditor.com/v2";
/// Google Translate endpoint used by the public web client
pub const DEFAULT_TRANSLATE_API_URL: &str = "https://translate.googleapis.com/translate_a/single";
/// Material Design Icons metadata feed
pub const DEFAULT_ICONS_META_URL: &str =
    "https://raw.githubusercontent.com/Templarian/MaterialDesign/master/meta.json";

/// Configuration for the translation audit.
///
/// Credentials come from the command line; everything else is read from the
/// environment (or a `.env` file) with defaults matching the checked-in layout.
#[derive(Debug, Clone)]
pub struct AuditConfig {
    // POEditor
    pub api_token: String,
    pub project_id: u64,
    pub poeditor_api_url: String,

    // Machine translation
    pub translate_api_url: String,
    pub target_language: String,

    // Report
    pub template_path: Option<String>,
    pub output_path: String,

    // Snapshot cache
    pub translations_cache: String,
    pub fuzzy_cache: String,
}

impl AuditConfig {
    pub fn from_env(api_token: String, project_id: u64) -> Self {
        Self {
            api_token,
            project_id,
            poeditor_api_url: std::env::var("POEDITOR_API_URL")
                .unwrap_or_else(|_| DEFAULT_POEDITOR_API_URL.to_string()),

            translate_api_url: std::env::var("TRANSLATE_API_URL")
                .unwrap_or_else(|_| DEFAULT_TRANSLATE_API_URL.to_string()),
            target_language: std::env::var("AUDIT_TARGET_LANGUAGE")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| "en".to_string()),

            template_path: std::env::var("AUDIT_TEMPLATE").ok(),
            output_path: std::env::var("AUDIT_OUTPUT")
                .unwrap_or_else(|_| "output.html".to_string()),

            translations_cache: std::env::var("AUDIT_TRANSLATIONS_CACHE")
                .unwrap_or_else(|_| "tmp.json".to_string()),
            fuzzy_cache: std::env::var("AUDIT_FUZZY_CACHE")
                .unwrap_or_else(|_| "3.json".to_string()),
        }
    }
}

/// Configuration for the drawable icon sync.
#[derive(Debug, Clone)]
pub struct DrawablesConfig {
    pub manifest_path: String,
    pub meta_url: String,
}

impl DrawablesConfig {
    pub fn from_env() -> Self {
        Self {
            manifest_path: std::env::var("ICONS_MANIFEST")
                .unwrap_or_else(|_| "icons.json".to_string()),
            meta_url: std::env::var("ICONS_META_URL")
                .unwrap_or_else(|_| DEFAULT_ICONS_META_URL.to_string()),
        }
    }
}
