//! # ⚡ Aladdin-table — Estimativa de Energia por Tabela de Referência
//!
//! Plug-in de estimativa de energia para primitivas de hardware em 40nm.
//! Dada uma requisição (classe primitiva, atributos, ação, argumentos), informa
//! se consegue estimar a energia e com que acurácia, e retorna a energia por
//! ação em picojoules a partir de tabelas Aladdin pré-medidas.
//!
//! ## Arquitetura
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      ALADDIN TABLE ESTIMATOR                    │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────────┐ │
//! │  │  Request    │  │  RuleSet    │  │     TableSource         │ │
//! │  │ (normaliza) │  │ (1 por      │  │ (CSV embutido/diretório)│ │
//! │  │             │  │  classe)    │  │                         │ │
//! │  └──────┬──────┘  └──────┬──────┘  └───────────┬─────────────┘ │
//! │         │                │                      │               │
//! │         ▼                ▼                      ▼               │
//! │  ┌─────────────────────────────────────────────────────────────┐│
//! │  │ latência → bucket → linha da tabela → idle | dynamic (pJ)  ││
//! │  └─────────────────────────────────────────────────────────────┘│
//! │                            │                                    │
//! │         ┌──────────────────┴──────────────────┐                │
//! │         ▼                                      ▼                │
//! │  ┌─────────────┐                      ┌─────────────┐          │
//! │  │  Linear     │                      │ Quadrática  │          │
//! │  │ (somadores) │                      │(multiplic.) │          │
//! │  └─────────────┘                      └─────────────┘          │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Uso
//!
//! ```
//! use aladdin_table::{AladdinTable, EnergyEstimator, Request};
//!
//! let estimator = AladdinTable::new();
//! let request = Request::new("adder")
//!     .with_attribute("technology", "40nm")
//!     .with_attribute("datawidth", 16)
//!     .with_action("add");
//!
//! assert_eq!(estimator.primitive_action_supported(&request), 70);
//! let energy = estimator.estimate_energy(&request).unwrap();
//! assert!(energy > 0.0);
//! ```

pub mod config;
pub mod error;
pub mod estimator;
pub mod interpolation;
pub mod latency;
pub mod request;
pub mod rules;
pub mod table;

// Re-exports
pub use config::EstimatorConfig;
pub use error::{EstimatorError, EstimatorResult};
pub use estimator::{AladdinTable, EnergyEstimator, Estimate};
pub use interpolation::{Anchor, InterpolationLaw};
pub use latency::LatencyBuckets;
pub use request::{Action, Request, Technology};
pub use rules::{Contribution, Rule, RuleContext, RuleSet};
pub use table::{DirectoryTables, EmbeddedTables, ReferenceTable, TableId, TableRow, TableSource};

use std::fmt;
use std::str::FromStr;

/// Constantes de referência das tabelas Aladdin
pub mod constants {
    /// Nome reportado ao host
    pub const ESTIMATOR_NAME: &str = "Aladdin_table";

    /// Acurácia auto-declarada das estimativas Aladdin (0-100)
    pub const DEFAULT_ACCURACY: u8 = 70;

    /// Nó tecnológico em que as tabelas foram medidas (nm)
    pub const TECHNOLOGY_NM: u32 = 40;

    /// Largura de dados das tabelas aritméticas inteiras (bits)
    pub const REFERENCE_WIDTH: u32 = 32;

    /// Latência assumida quando a requisição não informa (ns)
    pub const DEFAULT_LATENCY_NS: f64 = 5.0;

    /// Buckets de latência tabelados (ns)
    pub const LATENCY_BUCKETS_NS: [u32; 2] = [6, 10];
}

/// Classes primitivas suportadas pelo estimador
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveClass {
    /// Banco de registradores
    Regfile,
    /// Unidade bit a bit
    Bitwise,
    /// Somador inteiro
    Adder,
    /// Multiplicador inteiro
    Multiplier,
    /// Multiplica-acumula inteiro
    Mac,
    /// Somador ponto flutuante (precisão simples)
    Fp32Adder,
    /// Multiplicador ponto flutuante (precisão simples)
    Fp32Multiplier,
    /// MAC ponto flutuante (precisão simples)
    Fp32Mac,
    /// Somador ponto flutuante (precisão dupla)
    Fp64Adder,
    /// Multiplicador ponto flutuante (precisão dupla)
    Fp64Multiplier,
    /// MAC ponto flutuante (precisão dupla)
    Fp64Mac,
}

impl PrimitiveClass {
    /// Todas as classes, na ordem em que são anunciadas ao host
    pub const ALL: [PrimitiveClass; 11] = [
        PrimitiveClass::Regfile,
        PrimitiveClass::Bitwise,
        PrimitiveClass::Adder,
        PrimitiveClass::Multiplier,
        PrimitiveClass::Mac,
        PrimitiveClass::Fp32Adder,
        PrimitiveClass::Fp32Multiplier,
        PrimitiveClass::Fp32Mac,
        PrimitiveClass::Fp64Adder,
        PrimitiveClass::Fp64Multiplier,
        PrimitiveClass::Fp64Mac,
    ];

    /// Nome canônico usado pelo host
    pub fn name(&self) -> &'static str {
        match self {
            PrimitiveClass::Regfile => "regfile",
            PrimitiveClass::Bitwise => "bitwise",
            PrimitiveClass::Adder => "adder",
            PrimitiveClass::Multiplier => "multiplier",
            PrimitiveClass::Mac => "mac",
            PrimitiveClass::Fp32Adder => "fp32adder",
            PrimitiveClass::Fp32Multiplier => "fp32multiplier",
            PrimitiveClass::Fp32Mac => "fp32mac",
            PrimitiveClass::Fp64Adder => "fp64adder",
            PrimitiveClass::Fp64Multiplier => "fp64multiplier",
            PrimitiveClass::Fp64Mac => "fp64mac",
        }
    }
}

impl fmt::Display for PrimitiveClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PrimitiveClass {
    type Err = EstimatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PrimitiveClass::ALL
            .into_iter()
            .find(|class| class.name() == s)
            .ok_or_else(|| EstimatorError::UnknownClass(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_names_roundtrip() {
        for class in PrimitiveClass::ALL {
            assert_eq!(class.name().parse::<PrimitiveClass>().unwrap(), class);
        }
    }

    #[test]
    fn test_unknown_class() {
        let err = "sram".parse::<PrimitiveClass>().unwrap_err();
        assert!(matches!(err, EstimatorError::UnknownClass(name) if name == "sram"));
    }

    #[test]
    fn test_class_names_are_case_sensitive() {
        assert!("Adder".parse::<PrimitiveClass>().is_err());
        assert!("regFile".parse::<PrimitiveClass>().is_err());
    }

    #[test]
    fn test_serde_uses_host_names() {
        let json = serde_json::to_string(&PrimitiveClass::Fp32Mac).unwrap();
        assert_eq!(json, "\"fp32mac\"");
        let class: PrimitiveClass = serde_json::from_str("\"fp64multiplier\"").unwrap();
        assert_eq!(class, PrimitiveClass::Fp64Multiplier);
    }

    #[test]
    fn test_constants() {
        assert!(constants::DEFAULT_ACCURACY > 0 && constants::DEFAULT_ACCURACY <= 100);
        assert!(constants::LATENCY_BUCKETS_NS.windows(2).all(|w| w[0] < w[1]));
    }
}
