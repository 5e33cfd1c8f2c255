//! Configuração do estimador (aladdin.toml)
//!
//! Todos os campos têm padrão; um arquivo vazio equivale a
//! `EstimatorConfig::default()`.
//!
//! ```toml
//! name = "Aladdin_table"
//! accuracy = 70
//! technology_nm = 40
//! reference_width = 32
//! default_latency_ns = 5.0
//! latency_buckets = [6, 10]
//! tables_dir = "/opt/aladdin/data"
//! ```

use crate::constants;
use crate::error::{EstimatorError, EstimatorResult};
use crate::latency::LatencyBuckets;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuração do estimador
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EstimatorConfig {
    /// Nome reportado ao host
    pub name: String,
    /// Acurácia retornada para toda requisição suportada (1-100)
    pub accuracy: u8,
    /// Único nó tecnológico suportado (nm)
    pub technology_nm: u32,
    /// Largura de dados das tabelas (bits)
    pub reference_width: u32,
    /// Latência usada quando a requisição não informa (ns)
    pub default_latency_ns: f64,
    /// Buckets de latência presentes nas tabelas
    pub latency_buckets: LatencyBuckets,
    /// Diretório com os CSVs; `None` usa as tabelas embutidas
    pub tables_dir: Option<PathBuf>,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            name: constants::ESTIMATOR_NAME.into(),
            accuracy: constants::DEFAULT_ACCURACY,
            technology_nm: constants::TECHNOLOGY_NM,
            reference_width: constants::REFERENCE_WIDTH,
            default_latency_ns: constants::DEFAULT_LATENCY_NS,
            latency_buckets: LatencyBuckets::default(),
            tables_dir: None,
        }
    }
}

impl EstimatorConfig {
    /// Lê configuração de texto TOML
    pub fn from_toml_str(text: &str) -> EstimatorResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Lê configuração de arquivo TOML
    pub fn load(path: impl AsRef<Path>) -> EstimatorResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| EstimatorError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Define acurácia
    pub fn with_accuracy(mut self, accuracy: u8) -> Self {
        self.accuracy = accuracy;
        self
    }

    /// Usa tabelas de um diretório
    pub fn with_tables_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.tables_dir = Some(dir.into());
        self
    }

    /// Valida limites
    pub fn validate(&self) -> EstimatorResult<()> {
        if !(1..=100).contains(&self.accuracy) {
            return Err(EstimatorError::InvalidConfig(format!(
                "accuracy must be in 1..=100, got {}",
                self.accuracy
            )));
        }
        if self.reference_width == 0 {
            return Err(EstimatorError::InvalidConfig(
                "reference_width must be positive".into(),
            ));
        }
        if !self.default_latency_ns.is_finite() || self.default_latency_ns < 0.0 {
            return Err(EstimatorError::InvalidConfig(format!(
                "default_latency_ns must be a non-negative number, got {}",
                self.default_latency_ns
            )));
        }
        Ok(())
    }
}
