use std::io::ErrorKind;
use std::path::PathBuf;
use std::{env, fs, io};

use serde::Deserialize;

use crate::content::diagram;

#[derive(Deserialize)]
pub struct Paths {
    pub posts_dir: PathBuf,
    pub template_dir: PathBuf,
    pub public_dir: PathBuf,
}

/// Site identity, used by the landing page and the RSS channel.
#[derive(Deserialize)]
pub struct Site {
    pub title: String,
    pub url: String,
    pub description: String,
}

#[derive(Deserialize)]
pub struct Render {
    pub page_size: u32,
    pub diagram_base_url: Option<String>,
}

impl Render {
    pub fn diagram_base_url(&self) -> &str {
        self.diagram_base_url
            .as_deref()
            .unwrap_or(diagram::DEFAULT_BASE_URL)
    }
}

#[derive(Deserialize)]
pub struct Server {
    pub address: String,
    pub port: u16,
}

#[derive(Deserialize)]
pub struct Log {
    pub level: LogLevel,
    pub log_to_console: bool,
    pub location: Option<PathBuf>,
}

#[derive(Deserialize, Copy, Clone)]
pub enum LogLevel {
    Critical = 0,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Deserialize)]
pub struct Config {
    pub site: Site,
    pub paths: Paths,
    pub render: Render,
    pub server: Server,
    pub log: Option<Log>,
}

fn parse_path(path: PathBuf) -> PathBuf {
    if path.starts_with("${exe_dir}") {
        let cur_exe = env::current_exe().unwrap();
        let exe_dir = cur_exe.parent().unwrap().to_str().unwrap();
        let str_path = path.to_str().unwrap();
        PathBuf::from(str_path.replace("${exe_dir}", exe_dir))
    } else {
        path
    }
}

pub fn read_config(cfg_path: &PathBuf) -> io::Result<Config> {
    let cfg_content = match fs::read_to_string(cfg_path) {
        Ok(content) => content,
        Err(e) => {
            return Err(io::Error::new(
                e.kind(),
                format!(
                    "Error opening configuration file {}: {}",
                    cfg_path.display(),
                    e
                ),
            ))
        }
    };

    let mut cfg: Config = match toml::from_str::<Config>(cfg_content.as_str()) {
        Ok(cfg) => cfg,
        Err(e) => {
            return Err(io::Error::new(
                ErrorKind::InvalidData,
                format!("Error parsing configuration file: {}", e),
            ))
        }
    };

    cfg.paths = Paths {
        posts_dir: parse_path(cfg.paths.posts_dir),
        template_dir: parse_path(cfg.paths.template_dir),
        public_dir: parse_path(cfg.paths.public_dir),
    };

    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[site]
title = "Inkpost"
url = "https://blog.example.com"
description = "Notes on software"

[paths]
posts_dir = "content/posts"
template_dir = "res/templates"
public_dir = "public"

[render]
page_size = 10

[server]
address = "127.0.0.1"
port = 8080
"#;

    #[test]
    fn test_parse_sample_config() {
        let cfg: Config = toml::from_str(SAMPLE).unwrap();
        assert_eq!(cfg.site.title, "Inkpost");
        assert_eq!(cfg.paths.posts_dir, PathBuf::from("content/posts"));
        assert_eq!(cfg.render.page_size, 10);
        assert_eq!(cfg.render.diagram_base_url(), diagram::DEFAULT_BASE_URL);
        assert_eq!(cfg.server.port, 8080);
        assert!(cfg.log.is_none());
    }

    #[test]
    fn test_diagram_base_url_override() {
        let sample = SAMPLE.replace(
            "page_size = 10",
            "page_size = 10\ndiagram_base_url = \"https://uml.internal/svg\"",
        );
        let cfg: Config = toml::from_str(&sample).unwrap();
        assert_eq!(cfg.render.diagram_base_url(), "https://uml.internal/svg");
    }
}
