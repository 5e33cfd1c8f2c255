//! Discretização de latência em buckets tabelados
//!
//! A latência contínua da requisição é arredondada para cima e encaixada no
//! menor bucket que a comporta. Acima do maior bucket, usa-se o maior.
//!
//! Com os buckets padrão `[6, 10]`: `(-∞, 6] → 6`, `(6, 10] → 10`, `> 10 → 10`.

use crate::constants;
use crate::error::{EstimatorError, EstimatorResult};
use serde::{Deserialize, Serialize};

/// Conjunto ordenado de buckets de latência (ns)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u32>", into = "Vec<u32>")]
pub struct LatencyBuckets {
    buckets: Vec<u32>,
}

impl LatencyBuckets {
    /// Cria conjunto de buckets; exige lista não vazia e estritamente crescente
    pub fn new(buckets: Vec<u32>) -> EstimatorResult<Self> {
        if buckets.is_empty() {
            return Err(EstimatorError::InvalidConfig(
                "latency bucket list is empty".into(),
            ));
        }
        if !buckets.windows(2).all(|w| w[0] < w[1]) {
            return Err(EstimatorError::InvalidConfig(format!(
                "latency buckets must be strictly increasing: {buckets:?}"
            )));
        }
        Ok(Self { buckets })
    }

    /// Buckets em ordem crescente
    pub fn as_slice(&self) -> &[u32] {
        &self.buckets
    }

    /// Maior bucket
    pub fn largest(&self) -> u32 {
        // new() garante lista não vazia
        self.buckets[self.buckets.len() - 1]
    }

    /// Mapeia uma latência (ns) para o bucket da tabela
    ///
    /// # Erros
    ///
    /// `InvalidAttribute` se a latência não for finita.
    pub fn discretize(&self, latency_ns: f64) -> EstimatorResult<u32> {
        if !latency_ns.is_finite() {
            return Err(EstimatorError::InvalidAttribute {
                name: "latency".into(),
                value: latency_ns.to_string(),
            });
        }

        let ceiled = latency_ns.ceil();
        let bucket = self
            .buckets
            .iter()
            .copied()
            .find(|&b| ceiled <= f64::from(b))
            .unwrap_or_else(|| self.largest());

        Ok(bucket)
    }
}

impl Default for LatencyBuckets {
    fn default() -> Self {
        Self {
            buckets: constants::LATENCY_BUCKETS_NS.to_vec(),
        }
    }
}

impl TryFrom<Vec<u32>> for LatencyBuckets {
    type Error = EstimatorError;

    fn try_from(buckets: Vec<u32>) -> Result<Self, Self::Error> {
        Self::new(buckets)
    }
}

impl From<LatencyBuckets> for Vec<u32> {
    fn from(buckets: LatencyBuckets) -> Self {
        buckets.buckets
    }
}
