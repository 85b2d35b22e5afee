// Application configuration, loaded from environment variables and CLI flags.

use std::path::PathBuf;

use crate::coach;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Directory containing the static board frontend.
    /// When set, the backend serves static files from this path.
    pub static_dir: Option<PathBuf>,
    /// Commentary provider credential. Absent means commentary falls
    /// back to local template text; the server still runs.
    pub openrouter_key: Option<String>,
    /// Model requested from the commentary provider.
    pub openrouter_model: String,
    /// Provider endpoint, overridable for testing.
    pub openrouter_base_url: String,
    /// JSON file with the deployment's coach persona.
    pub persona_file: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables and CLI arguments.
    ///
    /// Environment variables:
    /// - `PORT` - HTTP server port (default: 10000)
    /// - `STATIC_DIR` - Path to the board frontend for static file serving
    /// - `OPENROUTER_KEY` - Commentary provider credential (optional)
    /// - `OPENROUTER_MODEL` - Provider model name (default: `gpt-4o-mini`)
    /// - `OPENROUTER_BASE_URL` - Provider endpoint override
    /// - `PERSONA_FILE` - Path to the deployment's persona JSON
    ///
    /// CLI flags:
    /// - `--port <PORT>` - Override the port
    pub fn load() -> Self {
        let args: Vec<String> = std::env::args().collect();

        // Port: CLI flag --port takes precedence, then env var, then default
        let port = Self::parse_cli_value(&args, "--port")
            .and_then(|v| v.parse().ok())
            .or_else(|| std::env::var("PORT").ok().and_then(|v| v.parse().ok()))
            .unwrap_or(10000);

        let static_dir = std::env::var("STATIC_DIR").ok().map(PathBuf::from);
        let openrouter_key = std::env::var("OPENROUTER_KEY").ok();
        let openrouter_model = std::env::var("OPENROUTER_MODEL")
            .unwrap_or_else(|_| coach::DEFAULT_MODEL.to_string());
        let openrouter_base_url = std::env::var("OPENROUTER_BASE_URL")
            .unwrap_or_else(|_| coach::DEFAULT_BASE_URL.to_string());
        let persona_file = std::env::var("PERSONA_FILE").ok().map(PathBuf::from);

        Config {
            port,
            static_dir,
            openrouter_key,
            openrouter_model,
            openrouter_base_url,
            persona_file,
        }
    }

    /// Parse a CLI flag value like `--port 8080`.
    fn parse_cli_value(args: &[String], flag: &str) -> Option<String> {
        args.windows(2).find_map(|pair| {
            if pair[0] == flag {
                Some(pair[1].clone())
            } else {
                None
            }
        })
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Config {
            port: 0,
            static_dir: None,
            openrouter_key: None,
            openrouter_model: coach::DEFAULT_MODEL.to_string(),
            openrouter_base_url: coach::DEFAULT_BASE_URL.to_string(),
            persona_file: None,
        }
    }
}
