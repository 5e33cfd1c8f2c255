//! Erros do estimador de energia por tabela

use std::path::PathBuf;
use thiserror::Error;

/// Resultado de operações de estimativa
pub type EstimatorResult<T> = Result<T, EstimatorError>;

/// Erros de consulta e estimativa de energia
#[derive(Debug, Error)]
pub enum EstimatorError {
    /// Classe primitiva desconhecida
    #[error("Unknown primitive class: {0}")]
    UnknownClass(String),

    /// Nenhuma regra registrada para a classe (capacidade e despacho fora de sincronia)
    #[error("No energy rule registered for primitive class '{0}'")]
    RuleNotFound(String),

    /// Bucket de latência ausente da tabela de referência
    #[error("Latency bucket {bucket}ns not found in table '{table}'")]
    LookupMiss { table: String, bucket: u32 },

    /// Atributo obrigatório ausente na requisição
    #[error("Missing required attribute '{0}'")]
    MissingAttribute(String),

    /// Atributo com valor não numérico ou inválido
    #[error("Invalid value for attribute '{name}': {value}")]
    InvalidAttribute { name: String, value: String },

    /// Pontos de interpolação com mesmo x
    #[error("Degenerate interpolation anchors: both at x = {0}")]
    DegenerateAnchors(f64),

    /// Configuração inválida
    #[error("Invalid estimator configuration: {0}")]
    InvalidConfig(String),

    /// Erro ao ler arquivo de tabela
    #[error("Failed to read table {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Erro de formato CSV
    #[error("Malformed reference table '{table}': {source}")]
    Csv {
        table: String,
        #[source]
        source: csv::Error,
    },

    /// Erro de formato TOML
    #[error("Malformed configuration: {0}")]
    Toml(#[from] toml::de::Error),
}
