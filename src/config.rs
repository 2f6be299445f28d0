use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Input file read when nothing else is configured.
pub const DEFAULT_INPUT: &str = "tree.xml";
/// Output file written when nothing else is configured.
pub const DEFAULT_OUTPUT: &str = "new_tree.xml";
/// Element searched for when nothing else is configured.
pub const DEFAULT_ELEMENT: &str = "li";
/// Text inserted before the found element when nothing else is configured.
pub const DEFAULT_INSERT: &str = "<new_element>Content</new_element>";

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub element: Option<String>,
    pub insert: Option<String>,
    pub reverse: bool,
    pub perf: bool,
    pub debug_log: Option<PathBuf>,
}

impl ConfigFlags {
    pub fn union(&self, other: &Self) -> Self {
        Self {
            input: other.input.clone().or_else(|| self.input.clone()),
            output: other.output.clone().or_else(|| self.output.clone()),
            element: other.element.clone().or_else(|| self.element.clone()),
            insert: other.insert.clone().or_else(|| self.insert.clone()),
            reverse: self.reverse || other.reverse,
            perf: self.perf || other.perf,
            debug_log: other.debug_log.clone().or_else(|| self.debug_log.clone()),
        }
    }

    pub fn input_path(&self) -> PathBuf {
        self.input
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT))
    }

    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT))
    }

    pub fn element_name(&self) -> &str {
        self.element.as_deref().unwrap_or(DEFAULT_ELEMENT)
    }

    pub fn insert_text(&self) -> &str {
        self.insert.as_deref().unwrap_or(DEFAULT_INSERT)
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("tagedit").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("tagedit")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("tagedit").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(".config").join("tagedit").join("config");
        }
    }

    PathBuf::from(".tageditrc")
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".tageditrc")
}

/// Read saved flags from `path`.
///
/// Each line holds one flag; everything after the first run of whitespace
/// is its value, so inserted XML may contain spaces.
pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| match line.split_once(char::is_whitespace) {
            Some((flag, value)) => vec![flag.to_owned(), value.trim_start().to_owned()],
            None => vec![line.to_owned()],
        })
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = Vec::new();
    lines.push("# tagedit defaults (saved with --save)".to_string());
    if let Some(input) = &flags.input {
        lines.push(format!("--input {}", input.display()));
    }
    if let Some(output) = &flags.output {
        lines.push(format!("--output {}", output.display()));
    }
    if let Some(element) = &flags.element {
        lines.push(format!("--element {element}"));
    }
    if let Some(insert) = &flags.insert {
        lines.push(format!("--insert {insert}"));
    }
    if flags.reverse {
        lines.push("--reverse".to_string());
    }
    if flags.perf {
        lines.push("--perf".to_string());
    }
    if let Some(path) = &flags.debug_log {
        lines.push(format!("--debug-log {}", path.display()));
    }
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        if token == "--reverse" {
            flags.reverse = true;
        } else if token == "--perf" {
            flags.perf = true;
        } else if let Some((name, value)) = token.split_once('=') {
            apply_value(&mut flags, name, value);
        } else if is_value_flag(token) {
            if let Some(next) = tokens.get(i + 1) {
                apply_value(&mut flags, token, next);
                i += 1;
            }
        }
        i += 1;
    }
    flags
}

fn is_value_flag(name: &str) -> bool {
    matches!(
        name,
        "--input" | "--output" | "--element" | "--insert" | "--debug-log"
    )
}

fn apply_value(flags: &mut ConfigFlags, name: &str, value: &str) {
    match name {
        "--input" => flags.input = Some(PathBuf::from(value)),
        "--output" => flags.output = Some(PathBuf::from(value)),
        "--element" => flags.element = Some(value.to_owned()),
        "--insert" => flags.insert = Some(value.to_owned()),
        "--debug-log" => flags.debug_log = Some(PathBuf::from(value)),
        _ => {}
    }
}
