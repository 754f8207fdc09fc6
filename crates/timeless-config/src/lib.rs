//! Timeless site configuration
//!
//! This crate provides centralized configuration for the site interaction
//! layer, loading settings from `timeless.toml`. Every section falls back to
//! the values the production site ships with.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "timeless.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Main configuration structure for the site
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SiteConfig {
    /// Scroll-reveal library options
    pub reveal: RevealConfig,
    /// Smooth scrolling and section offsets
    pub scroll: ScrollConfig,
    /// Mobile drawer markers
    pub drawer: DrawerConfig,
    /// Contact form rules and messages
    pub form: FormConfig,
    /// Hero timeline
    pub hero: HeroConfig,
    /// Scroll-triggered card groups
    pub cards: CardsConfig,
}

/// Options handed to the scroll-reveal library (`[data-aos]` elements).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    pub enabled: bool,
    pub duration_ms: u32,
    /// Animate only the first time an element enters the viewport
    pub once: bool,
    /// Animate out again when scrolling past the element
    pub mirror: bool,
    /// Trigger distance from the bottom of the viewport
    pub offset_px: f64,
    pub easing: String,
}

/// Smooth scroll and header compensation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    /// Space kept between the header and a scrolled-to section
    pub margin_px: f64,
    /// Delay before honouring a URL fragment after load
    pub hash_delay_ms: u32,
    pub smooth_duration_ms: u32,
    /// Quiet period after the last resize before offsets are recomputed
    pub resize_debounce_ms: u32,
    pub section_margin_extra_px: f64,
    pub section_margin_min_px: f64,
}

/// Markers used by the mobile drawer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawerConfig {
    pub trigger_selector: String,
    pub panel_selector: String,
    pub open_class: String,
    pub body_class: String,
}

/// Contact form validation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    pub selector: String,
    pub name_field: String,
    pub email_field: String,
    pub message_field: String,
    pub name_min_len: usize,
    pub message_min_len: usize,
    pub submit_delay_ms: u32,
    pub messages: FormMessages,
}

/// User-facing copy for the contact form
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FormMessages {
    pub name: String,
    pub email: String,
    pub message: String,
    pub success: String,
    pub failure: String,
}

/// How the hero headline is fragmented before it is animated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SplitMode {
    #[default]
    Words,
    Letters,
}

/// Hero intro timeline
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HeroConfig {
    pub split: SplitMode,
    /// Default easing of the whole timeline
    pub easing: String,
    pub reveal_ms: f32,
    pub reveal_scale_from: f64,
    pub reveal_blur_px: f64,
    pub reveal_easing: String,
    /// Pause between the image reveal and its dismissal
    pub dismiss_pause_ms: f32,
    pub dismiss_ms: f32,
    pub dismiss_scale_to: f64,
    pub dismiss_blur_px: f64,
    pub dismiss_easing: String,
    pub text_ms: f32,
    pub text_rise_px: f64,
    pub text_stagger_ms: f32,
    pub text_stagger_start_ms: f32,
    /// Overlap of the headline stage with the end of the dismissal
    pub text_overlap_ms: f32,
    pub cta_ms: f32,
    pub cta_rise_px: f64,
    pub cta_stagger_ms: f32,
    pub cta_overlap_ms: f32,
    pub pulse_scale: f64,
    pub pulse_ms: f32,
    pub pulse_easing: String,
}

/// Scroll-triggered card groups
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CardsConfig {
    /// Fraction of the viewport height the group top must reach
    pub viewport_threshold: f64,
    pub duration_ms: f32,
    pub easing: String,
    pub stagger_ms: f32,
    pub rise_px: f64,
    pub tilt_deg: f64,
    pub fan_spread_px: f64,
    pub fan_rotate_deg: f64,
    pub groups: Vec<CardGroupConfig>,
}

/// Reveal flavour of a card group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CardEffect {
    #[default]
    Rise,
    /// Fan out horizontally around the middle card
    Fan,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardGroupConfig {
    pub name: String,
    pub container: String,
    pub items: String,
    #[serde(default)]
    pub effect: CardEffect,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            duration_ms: 900,
            once: false,
            mirror: true,
            offset_px: 40.0,
            easing: "ease-out-cubic".to_string(),
        }
    }
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            margin_px: 10.0,
            hash_delay_ms: 220,
            smooth_duration_ms: 450,
            resize_debounce_ms: 200,
            section_margin_extra_px: 8.0,
            section_margin_min_px: 10.0,
        }
    }
}

impl Default for DrawerConfig {
    fn default() -> Self {
        Self {
            trigger_selector: ".hamburger".to_string(),
            panel_selector: "#mobile-drawer".to_string(),
            open_class: "open".to_string(),
            body_class: "menu-open".to_string(),
        }
    }
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            selector: "#contactForm".to_string(),
            name_field: "nombre".to_string(),
            email_field: "email".to_string(),
            message_field: "mensaje".to_string(),
            name_min_len: 2,
            message_min_len: 10,
            submit_delay_ms: 600,
            messages: FormMessages::default(),
        }
    }
}

impl Default for FormMessages {
    fn default() -> Self {
        Self {
            name: "Ingresa tu nombre (mínimo 2 caracteres).".to_string(),
            email: "Ingresa un correo electrónico válido.".to_string(),
            message: "Cuéntanos un poco más (mínimo 10 caracteres).".to_string(),
            success: "¡Gracias! Hemos recibido tu mensaje.".to_string(),
            failure: "Hubo un problema al enviar tu mensaje. Intenta de nuevo.".to_string(),
        }
    }
}

impl Default for HeroConfig {
    fn default() -> Self {
        Self {
            split: SplitMode::Words,
            easing: "easeOutExpo".to_string(),
            reveal_ms: 1000.0,
            reveal_scale_from: 1.9,
            reveal_blur_px: 12.0,
            reveal_easing: "easeOutCubic".to_string(),
            dismiss_pause_ms: 500.0,
            dismiss_ms: 1000.0,
            dismiss_scale_to: 1.5,
            dismiss_blur_px: 10.0,
            dismiss_easing: "easeInCubic".to_string(),
            text_ms: 1000.0,
            text_rise_px: 40.0,
            text_stagger_ms: 220.0,
            text_stagger_start_ms: 200.0,
            text_overlap_ms: 200.0,
            cta_ms: 800.0,
            cta_rise_px: 30.0,
            cta_stagger_ms: 150.0,
            cta_overlap_ms: 600.0,
            pulse_scale: 1.03,
            pulse_ms: 4000.0,
            pulse_easing: "easeInOutSine".to_string(),
        }
    }
}

impl Default for CardsConfig {
    fn default() -> Self {
        let group = |name: &str, container: &str, effect| CardGroupConfig {
            name: name.to_string(),
            container: container.to_string(),
            items: ".card".to_string(),
            effect,
        };
        Self {
            viewport_threshold: 0.8,
            duration_ms: 900.0,
            easing: "easeOutCubic".to_string(),
            stagger_ms: 120.0,
            rise_px: 40.0,
            tilt_deg: -4.0,
            fan_spread_px: 60.0,
            fan_rotate_deg: 6.0,
            groups: vec![
                group("features", ".features", CardEffect::Rise),
                group("clientes", ".clientes", CardEffect::Rise),
                group("productos", ".productos", CardEffect::Fan),
                group("contacto", ".contacto, #contacto", CardEffect::Rise),
            ],
        }
    }
}

impl SiteConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `timeless.toml` from the current directory, or return the
    /// default configuration if it is missing or unreadable
    pub fn load_or_default() -> Self {
        Self::load_from_file(DEFAULT_CONFIG_FILE).unwrap_or_default()
    }
}
