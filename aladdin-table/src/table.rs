//! Tabelas de referência (CSV)
//!
//! Cada classe medida diretamente tem uma tabela própria: uma linha por bucket
//! de latência, com energia ociosa e dinâmica, a 32 bits e 40nm. As tabelas são
//! relidas a cada consulta; nada é mantido em cache entre chamadas.

use crate::error::{EstimatorError, EstimatorResult};
use crate::request::Action;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Identificador de tabela de referência
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TableId {
    /// Registrador de 32 bits
    Reg,
    /// Somador inteiro de 32 bits
    Adder,
    /// Multiplicador inteiro de 32 bits
    Multiplier,
    /// Operação bit a bit
    Bitwise,
    /// Somador de precisão simples
    FpSpAdder,
    /// Multiplicador de precisão simples
    FpSpMultiplier,
    /// Somador de precisão dupla
    FpDpAdder,
    /// Multiplicador de precisão dupla
    FpDpMultiplier,
}

impl TableId {
    /// Nome do arquivo CSV
    pub fn file_name(&self) -> &'static str {
        match self {
            TableId::Reg => "reg.csv",
            TableId::Adder => "adder.csv",
            TableId::Multiplier => "multiplier.csv",
            TableId::Bitwise => "bitwise.csv",
            TableId::FpSpAdder => "fp_sp_adder.csv",
            TableId::FpSpMultiplier => "fp_sp_multiplier.csv",
            TableId::FpDpAdder => "fp_dp_adder.csv",
            TableId::FpDpMultiplier => "fp_dp_multiplier.csv",
        }
    }

    fn embedded_csv(&self) -> &'static str {
        match self {
            TableId::Reg => include_str!("../data/reg.csv"),
            TableId::Adder => include_str!("../data/adder.csv"),
            TableId::Multiplier => include_str!("../data/multiplier.csv"),
            TableId::Bitwise => include_str!("../data/bitwise.csv"),
            TableId::FpSpAdder => include_str!("../data/fp_sp_adder.csv"),
            TableId::FpSpMultiplier => include_str!("../data/fp_sp_multiplier.csv"),
            TableId::FpDpAdder => include_str!("../data/fp_dp_adder.csv"),
            TableId::FpDpMultiplier => include_str!("../data/fp_dp_multiplier.csv"),
        }
    }
}

/// Linha de uma tabela de referência
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    /// Latência em ns, mantida como texto para comparação exata com o bucket
    #[serde(rename = "latency(ns)")]
    pub latency: String,
    /// Energia ociosa (pJ)
    #[serde(rename = "idle energy(pJ)")]
    pub idle_pj: f64,
    /// Energia dinâmica (pJ)
    #[serde(rename = "dynamic energy(pJ)")]
    pub dynamic_pj: f64,
}

impl TableRow {
    /// Energia da coluna correspondente à ação
    pub fn energy(&self, action: Action) -> f64 {
        match action {
            Action::Idle => self.idle_pj,
            Action::Dynamic => self.dynamic_pj,
        }
    }
}

/// Tabela de referência carregada
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceTable {
    name: String,
    rows: Vec<TableRow>,
}

impl ReferenceTable {
    /// Cria tabela a partir de linhas já lidas
    pub fn new(name: impl Into<String>, rows: Vec<TableRow>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Lê tabela CSV com cabeçalho
    pub fn from_reader<R: Read>(name: impl Into<String>, reader: R) -> EstimatorResult<Self> {
        let name = name.into();
        let mut csv_reader = csv::Reader::from_reader(reader);
        let rows = csv_reader
            .deserialize::<TableRow>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| EstimatorError::Csv {
                table: name.clone(),
                source,
            })?;

        Ok(Self { name, rows })
    }

    /// Nome da tabela (nome do arquivo)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Linhas na ordem do arquivo
    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    /// Busca a energia do bucket de latência
    ///
    /// # Erros
    ///
    /// `LookupMiss` se nenhuma linha tiver `latency(ns)` igual ao bucket.
    pub fn lookup(&self, bucket: u32, action: Action) -> EstimatorResult<f64> {
        let key = bucket.to_string();
        self.rows
            .iter()
            .find(|row| row.latency == key)
            .map(|row| row.energy(action))
            .ok_or_else(|| EstimatorError::LookupMiss {
                table: self.name.clone(),
                bucket,
            })
    }
}

/// Fonte das tabelas de referência
pub trait TableSource: Send + Sync {
    /// Descrição da fonte (para logs)
    fn describe(&self) -> String;

    /// Carrega a tabela a partir da fonte
    fn load(&self, table: TableId) -> EstimatorResult<ReferenceTable>;
}

/// Tabelas embutidas no binário a partir de `data/`
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedTables;

impl TableSource for EmbeddedTables {
    fn describe(&self) -> String {
        "embedded".into()
    }

    fn load(&self, table: TableId) -> EstimatorResult<ReferenceTable> {
        ReferenceTable::from_reader(table.file_name(), table.embedded_csv().as_bytes())
    }
}

/// Tabelas lidas de um diretório em disco
#[derive(Debug, Clone)]
pub struct DirectoryTables {
    root: PathBuf,
}

impl DirectoryTables {
    /// Usa `root/<arquivo>.csv` para cada tabela
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Diretório raiz
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl TableSource for DirectoryTables {
    fn describe(&self) -> String {
        self.root.display().to_string()
    }

    fn load(&self, table: TableId) -> EstimatorResult<ReferenceTable> {
        let path = self.root.join(table.file_name());
        let file = File::open(&path).map_err(|source| EstimatorError::Io {
            path: path.clone(),
            source,
        })?;
        ReferenceTable::from_reader(table.file_name(), file)
    }
}
