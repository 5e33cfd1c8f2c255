//! Estimador Aladdin (contrato de plug-in)
//!
//! O host primeiro pergunta se a requisição é suportada
//! (`primitive_action_supported`) e só então pede a energia
//! (`estimate_energy`). A estimativa não revalida a requisição.

use crate::config::EstimatorConfig;
use crate::error::{EstimatorError, EstimatorResult};
use crate::request::{Action, Request};
use crate::rules::{Contribution, RuleContext, RuleSet};
use crate::table::{DirectoryTables, EmbeddedTables, TableSource};
use crate::PrimitiveClass;
use serde::Serialize;
use std::collections::BTreeSet;

/// Contrato entre o host e um estimador de energia
pub trait EnergyEstimator: Send + Sync {
    /// Nome do estimador
    fn name(&self) -> &str;

    /// Classes primitivas que o estimador reconhece
    fn supported_classes(&self) -> BTreeSet<String>;

    /// Acurácia para a requisição (0 = não suportada)
    fn primitive_action_supported(&self, request: &Request) -> u8;

    /// Energia da ação em picojoules
    ///
    /// Pré-condição: `primitive_action_supported(request) > 0`.
    fn estimate_energy(&self, request: &Request) -> EstimatorResult<f64>;
}

/// Resultado detalhado de uma estimativa
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Estimate {
    /// Classe estimada
    pub class: PrimitiveClass,
    /// Coluna de energia usada
    pub action: Action,
    /// Energia total (pJ)
    pub energy_pj: f64,
    /// Termos por tabela consultada
    pub contributions: Vec<Contribution>,
}

/// Estimador baseado nas tabelas Aladdin de 40nm
pub struct AladdinTable {
    config: EstimatorConfig,
    tables: Box<dyn TableSource>,
    rules: RuleSet,
}

impl AladdinTable {
    /// Estimador padrão com tabelas embutidas
    pub fn new() -> Self {
        Self {
            config: EstimatorConfig::default(),
            tables: Box::new(EmbeddedTables),
            rules: RuleSet::standard(),
        }
    }

    /// Cria estimador a partir de configuração
    ///
    /// Usa `tables_dir` quando presente, senão as tabelas embutidas.
    pub fn with_config(config: EstimatorConfig) -> EstimatorResult<Self> {
        let tables: Box<dyn TableSource> = match &config.tables_dir {
            Some(dir) => Box::new(DirectoryTables::new(dir)),
            None => Box::new(EmbeddedTables),
        };
        Self::with_tables(config, tables)
    }

    /// Cria estimador com fonte de tabelas explícita
    pub fn with_tables(
        config: EstimatorConfig,
        tables: Box<dyn TableSource>,
    ) -> EstimatorResult<Self> {
        config.validate()?;
        tracing::debug!(
            name = %config.name,
            tables = %tables.describe(),
            accuracy = config.accuracy,
            "estimator initialized"
        );
        Ok(Self {
            config,
            tables,
            rules: RuleSet::standard(),
        })
    }

    /// Substitui o conjunto de regras
    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    /// Configuração ativa
    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Estimativa com detalhamento por tabela
    ///
    /// # Erros
    ///
    /// * `RuleNotFound` - classe sem regra registrada
    /// * `LookupMiss` - bucket de latência ausente da tabela
    /// * `MissingAttribute` / `InvalidAttribute` - atributos da regra
    pub fn estimate(&self, request: &Request) -> EstimatorResult<Estimate> {
        let class: PrimitiveClass = request
            .class_name
            .parse()
            .map_err(|_| EstimatorError::RuleNotFound(request.class_name.clone()))?;
        let rule = self.rules.get(class)?;

        let ctx = RuleContext {
            tables: self.tables.as_ref(),
            buckets: &self.config.latency_buckets,
            default_latency_ns: self.config.default_latency_ns,
            reference_width: self.config.reference_width,
            rules: &self.rules,
        };
        let contributions = rule.evaluate(class, request, &ctx)?;
        let energy_pj: f64 = contributions.iter().map(|c| c.energy_pj).sum();

        tracing::debug!(
            class = %class,
            action = %request.action_name,
            bucket = ?contributions.first().map(|c| c.latency_bucket),
            terms = contributions.len(),
            energy_pj,
            "energy estimated"
        );

        Ok(Estimate {
            class,
            action: request.action(),
            energy_pj,
            contributions,
        })
    }
}

impl Default for AladdinTable {
    fn default() -> Self {
        Self::new()
    }
}

impl EnergyEstimator for AladdinTable {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn supported_classes(&self) -> BTreeSet<String> {
        PrimitiveClass::ALL
            .into_iter()
            .filter(|class| self.rules.contains(*class))
            .map(|class| class.name().to_string())
            .collect()
    }

    fn primitive_action_supported(&self, request: &Request) -> u8 {
        if !request.attributes.contains_key("technology") {
            tracing::warn!(
                class = %request.class_name,
                "no technology specified in the request, cannot perform estimation"
            );
        }

        let technology_matches = request
            .technology()
            .is_some_and(|tech| tech.nanometers() == self.config.technology_nm);
        let class_supported = request
            .class_name
            .parse::<PrimitiveClass>()
            .is_ok_and(|class| self.rules.contains(class));

        if technology_matches && class_supported {
            self.config.accuracy
        } else {
            0
        }
    }

    fn estimate_energy(&self, request: &Request) -> EstimatorResult<f64> {
        self.estimate(request).map(|estimate| estimate.energy_pj)
    }
}
