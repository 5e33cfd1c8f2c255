//! Requisição de estimativa (interface com o host)
//!
//! Uma `Request` descreve uma única ação de uma primitiva: classe, atributos
//! estruturais, nome da ação e argumentos da ação. Vive apenas durante uma
//! consulta.

use crate::error::{EstimatorError, EstimatorResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Nome da ação que seleciona a coluna de energia ociosa
pub const IDLE_ACTION: &str = "idle";

/// Requisição de estimativa de energia
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    /// Classe primitiva (ex.: "adder", "fp32mac")
    pub class_name: String,
    /// Atributos estruturais (datawidth, width, num, technology, latency)
    #[serde(default)]
    pub attributes: BTreeMap<String, Value>,
    /// Ação executada ("idle" ou qualquer ação ativa)
    pub action_name: String,
    /// Argumentos da ação (não usados pelas regras atuais)
    #[serde(default)]
    pub arguments: BTreeMap<String, Value>,
}

impl Request {
    /// Cria requisição vazia para uma classe, com ação dinâmica genérica
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            attributes: BTreeMap::new(),
            action_name: "dynamic".into(),
            arguments: BTreeMap::new(),
        }
    }

    /// Adiciona um atributo
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Define a ação
    pub fn with_action(mut self, action_name: impl Into<String>) -> Self {
        self.action_name = action_name.into();
        self
    }

    /// Adiciona um argumento de ação
    pub fn with_argument(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.arguments.insert(name.into(), value.into());
        self
    }

    /// Coluna de energia selecionada pela ação
    pub fn action(&self) -> Action {
        Action::from_name(&self.action_name)
    }

    /// Nó tecnológico normalizado, se presente e reconhecível
    pub fn technology(&self) -> Option<Technology> {
        self.attributes.get("technology").and_then(Technology::from_value)
    }

    /// Lê atributo numérico obrigatório
    ///
    /// Aceita números JSON e strings numéricas.
    pub fn attribute_f64(&self, name: &str) -> EstimatorResult<f64> {
        self.optional_attribute_f64(name)?
            .ok_or_else(|| EstimatorError::MissingAttribute(name.to_string()))
    }

    /// Lê atributo numérico opcional
    pub fn optional_attribute_f64(&self, name: &str) -> EstimatorResult<Option<f64>> {
        let Some(value) = self.attributes.get(name) else {
            return Ok(None);
        };

        let parsed = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };

        match parsed {
            Some(v) if v.is_finite() => Ok(Some(v)),
            _ => Err(EstimatorError::InvalidAttribute {
                name: name.to_string(),
                value: value.to_string(),
            }),
        }
    }
}

/// Coluna de energia da tabela
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Energia ociosa (`idle energy(pJ)`)
    Idle,
    /// Energia dinâmica (`dynamic energy(pJ)`)
    Dynamic,
}

impl Action {
    /// Toda ação diferente de "idle" colapsa na coluna dinâmica
    pub fn from_name(name: &str) -> Self {
        if name == IDLE_ACTION {
            Action::Idle
        } else {
            Action::Dynamic
        }
    }
}

/// Nó tecnológico canônico (nm)
///
/// `40`, `40.0`, `"40"` e `"40nm"` normalizam todos para `Technology(40)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Technology(pub u32);

impl Technology {
    /// Normaliza o valor bruto do atributo `technology`
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => {
                if let Some(v) = n.as_u64() {
                    return u32::try_from(v).ok().map(Technology);
                }
                let v = n.as_f64()?;
                if v >= 0.0 && v.fract() == 0.0 && v <= f64::from(u32::MAX) {
                    Some(Technology(v as u32))
                } else {
                    None
                }
            }
            Value::String(s) => Self::parse(s),
            _ => None,
        }
    }

    /// Normaliza `"40"` ou `"40nm"`
    pub fn parse(s: &str) -> Option<Self> {
        let digits = s.strip_suffix("nm").unwrap_or(s);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok().map(Technology)
    }

    /// Valor em nanômetros
    pub fn nanometers(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for Technology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}nm", self.0)
    }
}
