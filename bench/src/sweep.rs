//! Sweep configurations and result documents.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::BenchError;

/// Renderer selection for a sweep configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Renderer {
    Forward,
    Deferred,
}

impl Renderer {
    /// Lowercase name, as used in config documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            Renderer::Forward => "forward",
            Renderer::Deferred => "deferred",
        }
    }
}

/// One renderer configuration in a sweep.
///
/// Field names here match the sweep-results schema;
/// [`engine_config`](Self::engine_config) produces the config document
/// the headless binary consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepConfig {
    pub renderer: Renderer,
    pub msaa: u32,
    pub prepass: bool,
    pub clustered: bool,
    pub hdr_bloom: bool,
    pub shadows: bool,
    pub pos_shadows: bool,
}

impl SweepConfig {
    /// The config document consumed by the headless binary's `--config`.
    pub fn engine_config(&self) -> Value {
        json!({
            "renderer": self.renderer.as_str(),
            "hdrBloom": self.hdr_bloom,
            "msaa": self.msaa,
            "clusteredLights": self.clustered,
            "directionalLightShadows": self.shadows,
            "forwardDepthPrepass": self.prepass,
            "clusteredLightsShadows": self.pos_shadows,
        })
    }

    /// Parse a headless-binary config document back into a sweep config.
    ///
    /// Missing fields take the matrix defaults (forward renderer, no
    /// MSAA, everything off).
    pub fn from_engine_config(document: &Value) -> Self {
        Self {
            renderer: if document["renderer"] == "deferred" {
                Renderer::Deferred
            } else {
                Renderer::Forward
            },
            msaa: document["msaa"].as_u64().unwrap_or(1) as u32,
            prepass: document["forwardDepthPrepass"].as_bool().unwrap_or(false),
            clustered: document["clusteredLights"].as_bool().unwrap_or(false),
            hdr_bloom: document["hdrBloom"].as_bool().unwrap_or(false),
            shadows: document["directionalLightShadows"].as_bool().unwrap_or(false),
            pos_shadows: document["clusteredLightsShadows"].as_bool().unwrap_or(false),
        }
    }

    /// Short tag for table rows, e.g. `F4ZcHSSps`.
    ///
    /// Uppercase means on: renderer letter, msaa factor, depth prepass,
    /// clustered lights, HDR bloom (L = LDR), directional shadows,
    /// positional shadows.
    pub fn tag(&self) -> String {
        let mut tag = String::new();
        tag.push(match self.renderer {
            Renderer::Forward => 'F',
            Renderer::Deferred => 'D',
        });
        tag.push_str(&self.msaa.to_string());
        tag.push_str(if self.prepass { "Z" } else { "z" });
        tag.push_str(if self.clustered { "C" } else { "c" });
        tag.push_str(if self.hdr_bloom { "H" } else { "L" });
        tag.push_str(if self.shadows { "SS" } else { "ss" });
        tag.push_str(if self.pos_shadows { "PS" } else { "ps" });
        tag
    }
}

/// Generate the full sweep matrix.
///
/// Sweeps renderer, MSAA, depth prepass, clustered lights, HDR bloom and
/// both shadow kinds. MSAA and the depth prepass only apply to the
/// forward renderer, so those deferred combinations are skipped.
pub fn generate_configs() -> Vec<SweepConfig> {
    let mut configs = Vec::new();
    for renderer in [Renderer::Forward, Renderer::Deferred] {
        for msaa in [1u32, 4] {
            if msaa != 1 && renderer == Renderer::Deferred {
                continue;
            }
            for prepass in [false, true] {
                if prepass && renderer == Renderer::Deferred {
                    continue;
                }
                for clustered in [false, true] {
                    for hdr_bloom in [false, true] {
                        for shadows in [false, true] {
                            for pos_shadows in [false, true] {
                                configs.push(SweepConfig {
                                    renderer,
                                    msaa,
                                    prepass,
                                    clustered,
                                    hdr_bloom,
                                    shadows,
                                    pos_shadows,
                                });
                            }
                        }
                    }
                }
            }
        }
    }
    configs
}

/// One completed run in a sweep-results document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    pub config: SweepConfig,
    /// Mean average frame time across iterations, in microseconds.
    pub avg: f64,
    /// Sample standard deviation of the iterations, in microseconds.
    pub stdev: f64,
    pub gpu: String,
    pub version: String,
    pub width: u32,
    pub height: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpu_cycles: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bandwidth_read: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bandwidth_write: Option<f64>,
}

/// A sweep-results document: `{ "runs": [...] }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SweepResults {
    pub runs: Vec<RunRecord>,
}

/// Read and parse a sweep-results file.
pub fn read_results_file(path: &Path) -> Result<SweepResults, BenchError> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Write a sweep-results file as pretty JSON.
pub fn write_results_file(path: &Path, results: &SweepResults) -> Result<(), BenchError> {
    let text = serde_json::to_string_pretty(results)?;
    std::fs::write(path, text)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> SweepConfig {
        SweepConfig {
            renderer: Renderer::Forward,
            msaa: 1,
            prepass: false,
            clustered: false,
            hdr_bloom: false,
            shadows: false,
            pos_shadows: false,
        }
    }

    #[test]
    fn matrix_size_and_skip_rules() {
        let configs = generate_configs();
        // forward: 2 msaa * 2 prepass * 16 = 64; deferred: 16
        assert_eq!(configs.len(), 80);
        assert!(configs
            .iter()
            .all(|c| c.renderer == Renderer::Forward || c.msaa == 1));
        assert!(configs
            .iter()
            .all(|c| c.renderer == Renderer::Forward || !c.prepass));
    }

    #[test]
    fn matrix_has_no_duplicates() {
        let configs = generate_configs();
        for (i, a) in configs.iter().enumerate() {
            assert!(!configs[i + 1..].contains(a));
        }
    }

    #[test]
    fn engine_config_uses_engine_key_names() {
        let mut config = base_config();
        config.renderer = Renderer::Deferred;
        config.hdr_bloom = true;
        let document = config.engine_config();

        assert_eq!(document["renderer"], "deferred");
        assert_eq!(document["hdrBloom"], true);
        assert_eq!(document["msaa"], 1);
        assert_eq!(document["clusteredLights"], false);
        assert_eq!(document["directionalLightShadows"], false);
        assert_eq!(document["forwardDepthPrepass"], false);
        assert_eq!(document["clusteredLightsShadows"], false);
    }

    #[test]
    fn tag_encodes_every_dimension() {
        let mut config = base_config();
        assert_eq!(config.tag(), "F1zcLssps");

        config.renderer = Renderer::Deferred;
        config.hdr_bloom = true;
        config.shadows = true;
        assert_eq!(config.tag(), "D1zcHSSps");

        config.renderer = Renderer::Forward;
        config.msaa = 4;
        config.prepass = true;
        config.clustered = true;
        config.pos_shadows = true;
        assert_eq!(config.tag(), "F4ZCHSSPS");
    }

    #[test]
    fn engine_config_round_trips() {
        for config in generate_configs() {
            let document = config.engine_config();
            assert_eq!(SweepConfig::from_engine_config(&document), config);
        }
    }

    #[test]
    fn from_engine_config_defaults_missing_fields() {
        let config = SweepConfig::from_engine_config(&json!({ "renderer": "deferred" }));
        assert_eq!(config.renderer, Renderer::Deferred);
        assert_eq!(config.msaa, 1);
        assert!(!config.prepass && !config.clustered && !config.hdr_bloom);
    }

    #[test]
    fn results_round_trip_through_json() {
        let results = SweepResults {
            runs: vec![RunRecord {
                config: base_config(),
                avg: 12000.0,
                stdev: 120.0,
                gpu: "TestGPU".to_owned(),
                version: "1.2.3".to_owned(),
                width: 1280,
                height: 720,
                gpu_cycles: None,
                bandwidth_read: None,
                bandwidth_write: None,
            }],
        };

        let text = serde_json::to_string(&results).unwrap();
        // absent counters are omitted entirely
        assert!(!text.contains("gpu_cycles"));

        let parsed: SweepResults = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.runs.len(), 1);
        assert_eq!(parsed.runs[0].config, base_config());
        assert_eq!(parsed.runs[0].avg, 12000.0);
    }

    #[test]
    fn renderer_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Renderer::Forward).unwrap(), "\"forward\"");
        assert_eq!(
            serde_json::to_string(&Renderer::Deferred).unwrap(),
            "\"deferred\""
        );
    }
}
