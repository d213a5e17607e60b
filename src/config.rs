use std::collections::HashMap;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use derive_deref::{Deref, DerefMut};
use serde::{Deserialize, Deserializer, de};

use crate::{
  action::Action,
  utils::{PROJECT_NAME, get_config_dir},
};

const CONFIG: &str = include_str!("../.config/config.json5");
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

#[derive(Clone, Debug, Deserialize)]
pub struct ApiConfig {
  pub base_url: String,
  #[serde(default)]
  pub token: Option<String>,
}

impl Default for ApiConfig {
  fn default() -> Self {
    ApiConfig { base_url: DEFAULT_BASE_URL.to_string(), token: None }
  }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
  #[serde(default)]
  pub api: ApiConfig,
  #[serde(default)]
  pub keybindings: KeyBindings,
}

impl Config {
  /// Layers the bundled defaults, the user's config file and `DISCIPLINE_MANAGER_*` variables.
  pub fn new() -> Result<Self, config::ConfigError> {
    let default_config: Config = json5::from_str(CONFIG).map_err(|e| config::ConfigError::Foreign(Box::new(e)))?;
    let config_dir = get_config_dir();
    let mut builder = config::Config::builder().set_default("api.base_url", default_config.api.base_url.clone())?;

    let config_files = [
      ("config.json5", config::FileFormat::Json5),
      ("config.json", config::FileFormat::Json),
      ("config.yaml", config::FileFormat::Yaml),
      ("config.toml", config::FileFormat::Toml),
      ("config.ini", config::FileFormat::Ini),
    ];
    for (file, format) in &config_files {
      builder = builder.add_source(config::File::from(config_dir.join(file)).format(*format).required(false));
    }
    builder = builder.add_source(config::Environment::with_prefix(&PROJECT_NAME).prefix_separator("_").separator("__"));

    let mut cfg: Self = builder.build()?.try_deserialize()?;
    cfg.merge_defaults(default_config);
    Ok(cfg)
  }

  /// An empty token means no credential.
  pub fn token(&self) -> Option<String> {
    self.api.token.clone().filter(|token| !token.trim().is_empty())
  }

  fn merge_defaults(&mut self, defaults: Config) {
    for (key, action) in defaults.keybindings.0 {
      self.keybindings.entry(key).or_insert(action);
    }
  }
}

/// Keys handled by the app itself while the input is not focused.
#[derive(Clone, Debug, Default, Deref, DerefMut)]
pub struct KeyBindings(pub HashMap<KeyEvent, Action>);

impl<'de> Deserialize<'de> for KeyBindings {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    let parsed_map = HashMap::<String, Action>::deserialize(deserializer)?;
    let keybindings = parsed_map
      .into_iter()
      .map(|(key_str, action)| parse_key_event(&key_str).map(|key| (key, action)).map_err(de::Error::custom))
      .collect::<Result<_, _>>()?;
    Ok(KeyBindings(keybindings))
  }
}

/// Parses bindings such as `<q>`, `<Ctrl-c>` or `<alt-shift-enter>`.
pub fn parse_key_event(raw: &str) -> Result<KeyEvent, String> {
  let inner = raw.strip_prefix('<').and_then(|s| s.strip_suffix('>')).unwrap_or(raw);
  let lowered = inner.to_ascii_lowercase();
  let (remaining, modifiers) = extract_modifiers(&lowered);
  parse_key_code_with_modifiers(remaining, modifiers)
}

fn extract_modifiers(raw: &str) -> (&str, KeyModifiers) {
  let mut modifiers = KeyModifiers::empty();
  let mut current = raw;

  loop {
    match current {
      rest if rest.starts_with("ctrl-") => {
        modifiers.insert(KeyModifiers::CONTROL);
        current = &rest[5..];
      },
      rest if rest.starts_with("alt-") => {
        modifiers.insert(KeyModifiers::ALT);
        current = &rest[4..];
      },
      rest if rest.starts_with("shift-") => {
        modifiers.insert(KeyModifiers::SHIFT);
        current = &rest[6..];
      },
      _ => break,
    };
  }

  (current, modifiers)
}

fn parse_key_code_with_modifiers(raw: &str, mut modifiers: KeyModifiers) -> Result<KeyEvent, String> {
  let c = match raw {
    "esc" => KeyCode::Esc,
    "enter" => KeyCode::Enter,
    "left" => KeyCode::Left,
    "right" => KeyCode::Right,
    "up" => KeyCode::Up,
    "down" => KeyCode::Down,
    "home" => KeyCode::Home,
    "end" => KeyCode::End,
    "pageup" => KeyCode::PageUp,
    "pagedown" => KeyCode::PageDown,
    "backtab" => {
      modifiers.insert(KeyModifiers::SHIFT);
      KeyCode::BackTab
    },
    "backspace" => KeyCode::Backspace,
    "delete" => KeyCode::Delete,
    "insert" => KeyCode::Insert,
    "space" => KeyCode::Char(' '),
    "hyphen" | "minus" => KeyCode::Char('-'),
    "tab" => KeyCode::Tab,
    f if f.len() > 1 && f.starts_with('f') => {
      let number = f[1..].parse::<u8>().map_err(|_| format!("Unable to parse `{raw}`"))?;
      KeyCode::F(number)
    },
    c if c.chars().count() == 1 => {
      let mut c = c.chars().next().unwrap_or_default();
      if modifiers.contains(KeyModifiers::SHIFT) {
        c = c.to_ascii_uppercase();
      }
      KeyCode::Char(c)
    },
    _ => return Err(format!("Unable to parse {raw}")),
  };
  Ok(KeyEvent::new(c, modifiers))
}
