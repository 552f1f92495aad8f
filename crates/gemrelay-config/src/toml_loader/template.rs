//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# gemrelay configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[server]
# bind = "0.0.0.0"
# port = 5000                     # overridden by PORT
# cors_origin = "http://localhost:5173"

[provider]
# The API key is normally read from API_KEY or GEMINI_API_KEY.
# api_key = ""
# api_base = "https://generativelanguage.googleapis.com/v1beta/models"
# max_output_tokens = 500         # 1-8192
# temperature = 0.7               # 0.0-2.0
# connect_timeout_secs = 10
# request_timeout_secs = 120

[models]
# Tried in order; the first one that answers the probe is used until restart.
# candidates = [
#   "gemini-pro",
#   "gemini-1.0-pro",
#   "gemini-1.5-pro",
#   "models/gemini-pro",
#   "models/gemini-1.0-pro",
#   "models/gemini-1.5-pro",
# ]
# probe_prompt = "Hello"
# listing_prompt = "test"
# reprobe_on_provider_error = false

[delivery]
# chunk_word_count = 3            # 1-100
# inter_chunk_delay_ms = 50       # 0-10000

[sessions]
# idle_ttl_secs = 3600            # unset = keep until cleared

[logging]
# level = "gemrelay=info,gemrelay_ai=info,gemrelay_config=info"   # overridden by GEMRELAY_LOG / RUST_LOG
# json = false
"##
    .to_string()
}
