// Layer configuration — the surface the host's factory reads
//
// The routing layer has exactly one option: which direction it routes.
// Configs are plain serde-derived structs; reading them from disk or wire
// is the host's concern, not this crate's.

use serde::{Deserialize, Serialize};

/// Which way the switch routes samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwitchMode {
    /// Pick one of several equally-shaped candidate inputs per sample and
    /// copy it into the single output at the same sample position.
    SelectOne,
    /// Scatter the single shared input across several outputs, packing each
    /// destination's samples contiguously in encounter order.
    PartitionMany,
}

/// Configuration for a [`Switch`](crate::Switch) layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchConfig {
    pub mode: SwitchMode,
}

impl Default for SwitchConfig {
    fn default() -> Self {
        SwitchConfig {
            mode: SwitchMode::SelectOne,
        }
    }
}

/// A named layer instance as the host's factory sees it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerConfig {
    /// Instance name, for diagnostics.
    pub name: String,
    /// Registry type name, e.g. `"Switch"`.
    pub layer_type: String,
    /// Switch options, when `layer_type` is a switch.
    #[serde(default)]
    pub switch: Option<SwitchConfig>,
}

impl LayerConfig {
    /// Config for a switch layer with the given mode.
    pub fn switch(name: impl Into<String>, mode: SwitchMode) -> Self {
        LayerConfig {
            name: name.into(),
            layer_type: "Switch".to_string(),
            switch: Some(SwitchConfig { mode }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_switch_config_shorthand() {
        let cfg = LayerConfig::switch("router", SwitchMode::PartitionMany);
        assert_eq!(cfg.layer_type, "Switch");
        assert_eq!(cfg.switch.unwrap().mode, SwitchMode::PartitionMany);
    }

    #[test]
    fn test_missing_switch_options_default() {
        // A config without switch options deserializes to None; the factory
        // then falls back to SwitchConfig::default().
        let json = r#"{"name": "r", "layer_type": "Switch"}"#;
        let cfg: LayerConfig = serde_json::from_str(json).unwrap();
        assert!(cfg.switch.is_none());
        assert_eq!(SwitchConfig::default().mode, SwitchMode::SelectOne);
    }
}
