//! Regras de composição de energia por classe primitiva
//!
//! Cada classe suportada mapeia para exatamente uma `Rule`, resolvida na
//! construção do estimador:
//!
//! | Classe                         | Regra                                   |
//! |--------------------------------|-----------------------------------------|
//! | `regfile`                      | `reg.csv` × `width`                     |
//! | `bitwise`                      | `bitwise.csv` × `num`                   |
//! | `adder`, `fp32adder`, ...      | tabela de 32 bits, interpolação linear  |
//! | `multiplier`, `fp32multiplier` | tabela de 32 bits, interpolação quadr.  |
//! | `mac`, `fp32mac`, `fp64mac`    | somador + multiplicador                 |

use crate::error::{EstimatorError, EstimatorResult};
use crate::interpolation::{Anchor, InterpolationLaw};
use crate::latency::LatencyBuckets;
use crate::request::Request;
use crate::table::{TableId, TableSource};
use crate::PrimitiveClass;
use serde::Serialize;
use std::collections::HashMap;

/// Atributo de latência (ns)
pub const LATENCY_ATTRIBUTE: &str = "latency";

/// Atributo de largura de dados (bits)
pub const DATAWIDTH_ATTRIBUTE: &str = "datawidth";

/// Estratégia de cálculo de energia de uma classe
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// Energia da tabela multiplicada por um atributo de contagem
    Scaled {
        table: TableId,
        attribute: &'static str,
    },
    /// Energia da tabela extrapolada pela largura de dados
    WidthInterpolated {
        table: TableId,
        law: InterpolationLaw,
    },
    /// Soma das regras de outras classes, avaliadas com a mesma requisição
    Composite(Vec<PrimitiveClass>),
}

/// Parâmetros compartilhados por todas as regras durante uma consulta
pub struct RuleContext<'a> {
    pub tables: &'a dyn TableSource,
    pub buckets: &'a LatencyBuckets,
    pub default_latency_ns: f64,
    pub reference_width: u32,
    pub rules: &'a RuleSet,
}

/// Contribuição de uma tabela para a energia final
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contribution {
    /// Classe folha que gerou o termo
    pub class: PrimitiveClass,
    /// Tabela consultada
    pub table: TableId,
    /// Bucket de latência usado (ns)
    pub latency_bucket: u32,
    /// Valor lido da tabela (pJ)
    pub table_energy_pj: f64,
    /// Termo após escala/interpolação (pJ)
    pub energy_pj: f64,
}

impl Rule {
    /// Avalia a regra, retornando um termo por tabela consultada
    pub fn evaluate(
        &self,
        class: PrimitiveClass,
        request: &Request,
        ctx: &RuleContext<'_>,
    ) -> EstimatorResult<Vec<Contribution>> {
        match self {
            Rule::Scaled { table, attribute } => {
                let count = request.attribute_f64(attribute)?;
                if count < 0.0 {
                    return Err(EstimatorError::InvalidAttribute {
                        name: (*attribute).into(),
                        value: count.to_string(),
                    });
                }
                let (latency_bucket, table_energy_pj) = lookup(*table, request, ctx)?;
                Ok(vec![Contribution {
                    class,
                    table: *table,
                    latency_bucket,
                    table_energy_pj,
                    energy_pj: table_energy_pj * count,
                }])
            }
            Rule::WidthInterpolated { table, law } => {
                let width = request.attribute_f64(DATAWIDTH_ATTRIBUTE)?;
                if width < 0.0 {
                    return Err(EstimatorError::InvalidAttribute {
                        name: DATAWIDTH_ATTRIBUTE.into(),
                        value: width.to_string(),
                    });
                }
                let (latency_bucket, table_energy_pj) = lookup(*table, request, ctx)?;
                let known = [
                    Anchor::new(0.0, 0.0),
                    Anchor::new(f64::from(ctx.reference_width), table_energy_pj),
                ];
                Ok(vec![Contribution {
                    class,
                    table: *table,
                    latency_bucket,
                    table_energy_pj,
                    energy_pj: law.apply(width, known)?,
                }])
            }
            Rule::Composite(parts) => {
                let mut contributions = Vec::with_capacity(parts.len());
                for part in parts {
                    let rule = ctx.rules.get(*part)?;
                    if matches!(rule, Rule::Composite(_)) {
                        return Err(EstimatorError::InvalidConfig(format!(
                            "composite rule for '{class}' nests composite '{part}'"
                        )));
                    }
                    contributions.extend(rule.evaluate(*part, request, ctx)?);
                }
                Ok(contributions)
            }
        }
    }
}

/// Consulta compartilhada: latência → bucket → coluna da tabela
fn lookup(table: TableId, request: &Request, ctx: &RuleContext<'_>) -> EstimatorResult<(u32, f64)> {
    let latency = request
        .optional_attribute_f64(LATENCY_ATTRIBUTE)?
        .unwrap_or(ctx.default_latency_ns);
    let bucket = ctx.buckets.discretize(latency)?;
    let energy = ctx.tables.load(table)?.lookup(bucket, request.action())?;
    Ok((bucket, energy))
}

/// Mapa classe → regra
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: HashMap<PrimitiveClass, Rule>,
}

impl RuleSet {
    /// Regras Aladdin para todas as classes suportadas
    pub fn standard() -> Self {
        use InterpolationLaw::{Linear, Quadratic};
        use PrimitiveClass::*;

        let width = |table, law| Rule::WidthInterpolated { table, law };

        Self::from_rules([
            (Regfile, Rule::Scaled { table: TableId::Reg, attribute: "width" }),
            (Bitwise, Rule::Scaled { table: TableId::Bitwise, attribute: "num" }),
            (Adder, width(TableId::Adder, Linear)),
            (Multiplier, width(TableId::Multiplier, Quadratic)),
            (Mac, Rule::Composite(vec![Adder, Multiplier])),
            (Fp32Adder, width(TableId::FpSpAdder, Linear)),
            (Fp32Multiplier, width(TableId::FpSpMultiplier, Quadratic)),
            (Fp32Mac, Rule::Composite(vec![Fp32Adder, Fp32Multiplier])),
            (Fp64Adder, width(TableId::FpDpAdder, Linear)),
            (Fp64Multiplier, width(TableId::FpDpMultiplier, Quadratic)),
            (Fp64Mac, Rule::Composite(vec![Fp64Adder, Fp64Multiplier])),
        ])
    }

    /// Cria a partir de pares classe/regra
    pub fn from_rules(rules: impl IntoIterator<Item = (PrimitiveClass, Rule)>) -> Self {
        Self {
            rules: rules.into_iter().collect(),
        }
    }

    /// Regra da classe
    ///
    /// # Erros
    ///
    /// `RuleNotFound` se a classe não tiver regra registrada.
    pub fn get(&self, class: PrimitiveClass) -> EstimatorResult<&Rule> {
        self.rules
            .get(&class)
            .ok_or_else(|| EstimatorError::RuleNotFound(class.name().to_string()))
    }

    /// Classes com regra registrada
    pub fn contains(&self, class: PrimitiveClass) -> bool {
        self.rules.contains_key(&class)
    }

    /// Número de classes com regra
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Verdadeiro se nenhuma regra estiver registrada
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
